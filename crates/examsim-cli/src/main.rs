//! examsim CLI — practice quizzes and timed exams in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "examsim", version, about = "Quiz and timed exam simulator")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and sample question file
    Init,

    /// Validate a question file
    Validate {
        /// Path to a JSON question file or text document
        #[arg(long)]
        questions: PathBuf,
    },

    /// Extract questions from a text document
    Extract {
        /// Text document; pages are separated by form feeds
        #[arg(long)]
        input: PathBuf,

        /// Write the extracted questions here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Practice with immediate feedback
    Practice {
        /// Question source (defaults to the configured file or the bundled sample)
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Shuffle the question order before starting
        #[arg(long)]
        shuffle: bool,
    },

    /// Take a timed exam
    Exam {
        /// Question source (defaults to the configured file or the bundled sample)
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Number of questions to draw (10-270)
        #[arg(long)]
        count: Option<u32>,

        /// Time limit in minutes (5-300)
        #[arg(long)]
        minutes: Option<u32>,

        /// Write the results report here (.json or .md)
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show statistics for the saved answers
    Stats {
        /// Question source (defaults to the configured file or the bundled sample)
        #[arg(long)]
        questions: Option<PathBuf>,
    },

    /// Clear the saved answers
    Reset,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examsim=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { questions } => commands::validate::execute(questions).await,
        Commands::Extract { input, output } => commands::extract::execute(input, output).await,
        Commands::Practice { questions, shuffle } => {
            commands::practice::execute(questions, shuffle, config).await
        }
        Commands::Exam {
            questions,
            count,
            minutes,
            report,
        } => commands::exam::execute(questions, count, minutes, report, config).await,
        Commands::Stats { questions } => commands::stats::execute(questions, config).await,
        Commands::Reset => commands::reset::execute(config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
