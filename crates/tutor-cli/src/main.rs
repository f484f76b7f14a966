use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "tutor")]
#[command(about = "Tutor - course-support chatbot with interaction frequency analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat over a course document in an interactive session
    Chat {
        /// Course to open, by catalog name (prompts when omitted)
        #[arg(long)]
        course: Option<String>,

        /// Session id to resume (a fresh one is generated when omitted)
        #[arg(long)]
        session: Option<String>,

        /// Directory the course documents are read from
        #[arg(long, default_value = "courses")]
        documents_dir: PathBuf,
    },
    /// List the configured courses
    Courses,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            course,
            session,
            documents_dir,
        } => commands::chat::run(course, session, documents_dir).await?,
        Commands::Courses => commands::courses::run()?,
    }

    Ok(())
}
