use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use uuid::Uuid;

use tutor_application::{AnalysisOutcome, AskOutcome, ChatUseCase};
use tutor_core::session::ChatSession;
use tutor_infrastructure::paths::TutorPaths;
use tutor_infrastructure::{CourseCatalog, PdfDocumentStore, SupabaseInteractionRepository};
use tutor_interaction::GeminiClient;

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct ChatHelper {
    commands: Vec<String>,
}

impl ChatHelper {
    fn new() -> Self {
        Self {
            commands: vec!["/analyze".to_string()],
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

/// Runs the interactive chat session.
///
/// Wires the Gemini gateway, the Supabase repository, and the document
/// store together, opens (or resumes) a session for the chosen course, and
/// then loops on user input until 'quit'/'exit' or Ctrl-D. Every question
/// goes through answer, classification, and persistence; '/analyze' runs
/// the frequency analysis over the session so far.
pub async fn run(
    course: Option<String>,
    session: Option<String>,
    documents_dir: PathBuf,
) -> Result<()> {
    let catalog = CourseCatalog::load()?;
    if catalog.is_empty() {
        println!(
            "{}",
            "No courses configured. Add [[course]] entries to config.toml.".yellow()
        );
        return Ok(());
    }

    let helper = ChatHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    let course_name = match course {
        Some(name) => name,
        None => pick_course(&catalog, &mut rl)?,
    };
    let document_id = catalog
        .document_for(&course_name)
        .ok_or_else(|| {
            anyhow::anyhow!("Unknown course '{course_name}'. Run 'tutor courses' to list them.")
        })?
        .to_string();
    tracing::debug!("Course '{}' uses document '{}'", course_name, document_id);

    let session_id = session.unwrap_or_else(|| Uuid::new_v4().to_string());

    // First run: write the credential template so there is a file to fill in.
    if let Err(err) = TutorPaths::ensure_secret_file() {
        tracing::warn!("Could not create the secret file template: {}", err);
    }

    let gateway = Arc::new(GeminiClient::try_from_env()?);
    let repository = Arc::new(SupabaseInteractionRepository::try_from_env()?);
    let documents = Arc::new(PdfDocumentStore::new(documents_dir));
    let usecase = ChatUseCase::new(gateway, repository, documents);

    println!("{}", format!("Loading '{}'...", course_name).bright_black());
    let start = usecase
        .open_session(&session_id, &course_name, &document_id)
        .await?;
    if let Some(warning) = &start.warning {
        println!("{}", warning.yellow());
    }
    let mut chat = start.session;

    println!();
    println!("{}", "=== Tutor ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Course: {} | Session: {}", course_name, session_id).bright_black()
    );
    println!(
        "{}",
        "Ask a question, type '/analyze' to analyze your interactions, or 'quit' to exit."
            .bright_black()
    );
    println!();

    replay_history(&chat);

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                // Handle quit command
                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if !trimmed.is_empty() {
                    let _ = rl.add_history_entry(&line);
                }

                if trimmed == "/analyze" {
                    run_analysis(&usecase, &chat).await;
                    continue;
                }

                // The raw line goes through; only command detection trims.
                match usecase.ask(&mut chat, &line).await {
                    AskOutcome::Blank => {
                        println!("{}", "Please enter a question.".yellow());
                    }
                    AskOutcome::Answered {
                        interaction,
                        warnings,
                    } => {
                        for warning in &warnings {
                            println!("{}", warning.yellow());
                        }
                        for answer_line in interaction.response.lines() {
                            println!("{}", answer_line.bright_blue());
                        }
                        println!();
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

/// Prompts for a course by number or name until a listed one is chosen.
fn pick_course(
    catalog: &CourseCatalog,
    rl: &mut Editor<ChatHelper, DefaultHistory>,
) -> Result<String> {
    println!("{}", "Available courses:".bright_magenta().bold());
    for (index, course) in catalog.courses().iter().enumerate() {
        println!("  {}. {}", index + 1, course.name.bold());
    }

    loop {
        let line = rl.readline("Select a course (number or name): ")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Ok(number) = input.parse::<usize>() {
            if let Some(course) = number.checked_sub(1).and_then(|i| catalog.courses().get(i)) {
                return Ok(course.name.clone());
            }
        } else if let Some(course) = catalog
            .courses()
            .iter()
            .find(|course| course.name.eq_ignore_ascii_case(input))
        {
            return Ok(course.name.clone());
        }

        println!("{}", "No such course. Enter a listed number or name.".yellow());
    }
}

/// Replays the loaded history in its stored order (newest first).
fn replay_history(chat: &ChatSession) {
    if chat.history.is_empty() {
        return;
    }

    for interaction in &chat.history {
        println!("{} {}", "You:".green().bold(), interaction.question);
        println!("{} {}", "Bot:".bright_blue().bold(), interaction.response);
        println!("{}", "---".bright_black());
    }
    println!();
}

async fn run_analysis(usecase: &ChatUseCase, chat: &ChatSession) {
    println!("{}", "Analyzing interactions...".bright_black());
    match usecase.analyze(chat).await {
        AnalysisOutcome::InsufficientData { need, .. } => {
            println!(
                "{}",
                format!("You need at least {} interactions to analyze.", need).yellow()
            );
        }
        AnalysisOutcome::Completed { report, warnings } => {
            for warning in &warnings {
                println!("{}", warning.yellow());
            }
            println!(
                "{}",
                format!("Most Frequent Topic: {}", report.most_frequent_topic).bright_cyan()
            );
            println!(
                "{}",
                format!("Most Frequent Question Type: {}", report.most_frequent_type).bright_cyan()
            );
            println!(
                "{}",
                format!("User Skill Level: {}", report.skill_level).bright_cyan()
            );
            if !report.future_questions.is_empty() {
                println!("{}", "Questions you might ask next:".bright_magenta());
                for question in &report.future_questions {
                    println!("  {}", format!("- {}", question).bright_blue());
                }
            }
            println!();
        }
    }
}
