//! The `examsim reset` command.

use std::path::PathBuf;

use anyhow::Result;

use examsim_core::config::load_config_from;
use examsim_core::storage::AnswerStore;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = AnswerStore::new(&config.storage_path);

    if store.path().exists() {
        store.clear()?;
        println!("Cleared saved answers in {}", store.path().display());
    } else {
        println!("No saved answers.");
    }

    Ok(())
}
