//! Console output and interactive prompts for the refinement loop.

use anyhow::Context;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::errors::AppError;
use crate::extract::JobRecord;
use crate::session::runner::FeedbackSource;

pub struct Ui;

impl Ui {
    pub fn new() -> Self {
        Self
    }

    pub fn banner(&self) {
        println!("{}", "coverforge — tailored cover letters, iterated with you".bold());
    }

    pub fn section(&self, title: &str) {
        println!("\n{}", format!("── {title} ──").bold().blue());
    }

    pub fn info(&self, msg: &str) {
        println!("{} {msg}", "·".blue());
    }

    pub fn success(&self, msg: &str) {
        println!("{} {msg}", "✔".green());
    }

    pub fn warn(&self, msg: &str) {
        eprintln!("{} {msg}", "!".yellow());
    }

    pub fn error(&self, msg: &str) {
        eprintln!("{} {msg}", "✘".red());
    }

    pub fn extracted(&self, job: &JobRecord) {
        self.info(&format!(
            "Applying to {} — {}",
            job.company_name.bold(),
            job.job_title.bold()
        ));
    }

    pub fn preview(&self, letter: &str) {
        println!("\n{}", "┄".repeat(64).dimmed());
        println!("{letter}");
        println!("{}", "┄".repeat(64).dimmed());
        println!(
            "{}",
            "Press Enter (or 'yes') to approve, type feedback to revise, \
             'no' to reject outright, 'stop' to abandon."
                .dimmed()
        );
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

/// Interactive line input backed by rustyline.
pub struct ConsolePrompt {
    editor: DefaultEditor,
}

impl ConsolePrompt {
    pub fn new() -> Result<Self, AppError> {
        let editor = DefaultEditor::new()
            .context("failed to initialize line editor")
            .map_err(AppError::Internal)?;
        Ok(Self { editor })
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, AppError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(&line);
                Ok(Some(line))
            }
            // Ctrl-C / Ctrl-D mean "I'm done here".
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(AppError::Internal(anyhow::anyhow!(
                "failed to read input: {e}"
            ))),
        }
    }
}

impl FeedbackSource for ConsolePrompt {
    fn read_feedback(&mut self) -> Result<Option<String>, AppError> {
        self.read_line("feedback> ")
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, AppError> {
        let answer = self.read_line(&format!("{prompt} [y/N] "))?;
        Ok(matches!(
            answer.as_deref().map(str::trim).map(str::to_lowercase).as_deref(),
            Some("y") | Some("yes")
        ))
    }
}
