//! The `examsim init` command.

use anyhow::Result;

use examsim_core::config::SAMPLE_CONFIG;
use examsim_core::sample::SAMPLE_QUESTIONS_JSON;

pub fn execute() -> Result<()> {
    // Create examsim.toml
    if std::path::Path::new("examsim.toml").exists() {
        println!("examsim.toml already exists, skipping.");
    } else {
        std::fs::write("examsim.toml", SAMPLE_CONFIG)?;
        println!("Created examsim.toml");
    }

    // Create the sample question file
    let questions_path = std::path::Path::new("questions.json");
    if questions_path.exists() {
        println!("questions.json already exists, skipping.");
    } else {
        std::fs::write(questions_path, SAMPLE_QUESTIONS_JSON)?;
        println!("Created questions.json");
    }

    println!("\nNext steps:");
    println!("  1. Edit questions.json or extract your own: examsim extract --input notes.txt --output questions.json");
    println!("  2. Run: examsim validate --questions questions.json");
    println!("  3. Run: examsim practice   or   examsim exam --count 10 --minutes 15");

    Ok(())
}
