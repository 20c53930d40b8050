//! CLI commands and terminal adapters

pub mod context;
pub mod style;
mod sync;

pub use sync::run_sync;

use anstream::println;
use approval_sync::error::{Error, Result};
use approval_sync::sync::{Interaction, MessagePreview, ProgressCallback, SyncStep};
use async_trait::async_trait;
use dialoguer::Confirm;
use indicatif::ProgressBar;
use std::sync::Mutex;
use std::time::Duration;
use style::{Stylize, check, cross, diff_line, spinner_style};
use tracing::warn;

/// Terminal progress output
///
/// External-command steps get a spinner; everything else prints plain lines.
#[derive(Default)]
pub struct CliProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    fn take_spinner(&self) -> Option<ProgressBar> {
        self.spinner.lock().ok().and_then(|mut s| s.take())
    }

    fn with_spinner_suspended(&self, f: impl FnOnce()) {
        let guard = self.spinner.lock().ok();
        match guard.as_ref().and_then(|g| g.as_ref()) {
            Some(spinner) => spinner.suspend(f),
            None => f(),
        }
    }
}

const fn shows_spinner(step: SyncStep) -> bool {
    matches!(step, SyncStep::FetchChange | SyncStep::Cleanup) || step.is_mutating()
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_step_started(&self, step: SyncStep) {
        if !shows_spinner(step) {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(format!("{}...", capitalize(&step.to_string())));
        spinner.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    async fn on_step_finished(&self, step: SyncStep) {
        if let Some(spinner) = self.take_spinner() {
            spinner.finish_with_message(format!("{} {}", check(), capitalize(&step.to_string())));
        }
    }

    async fn on_step_failed(&self, step: SyncStep, error: &Error) {
        let spinner = self.take_spinner();
        if error.is_clean_stop() {
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            return;
        }
        let line = format!("{} {} failed", cross(), capitalize(&step.to_string()));
        match spinner {
            Some(spinner) => spinner.abandon_with_message(line),
            None => println!("{line}"),
        }
    }

    async fn on_message(&self, message: &str) {
        self.with_spinner_suspended(|| println!("  {message}"));
    }

    async fn on_warning(&self, message: &str) {
        self.with_spinner_suspended(|| println!("  {} {}", "warning:".warn(), message));
    }

    async fn on_preview(&self, preview: &MessagePreview) {
        println!();
        println!("{}", "Current message:".emphasis());
        print_indented(&preview.original);
        println!();
        println!("{}", "New message:".emphasis());
        print_indented(&preview.candidate);
        println!();
        println!("{}", "Diff:".emphasis());
        for line in preview.diff.lines() {
            println!("  {}", diff_line(line));
        }
        println!();
        println!(
            "{} {}",
            "Commit date:".emphasis(),
            preview.timestamp.to_rfc3339().accent()
        );
        println!();
    }
}

fn print_indented(text: &str) {
    for line in text.lines() {
        println!("  {line}");
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Confirmation prompt on the terminal
pub struct DialoguerInteraction;

#[async_trait]
impl Interaction for DialoguerInteraction {
    async fn confirm(&self, prompt: &str) -> Result<bool> {
        let prompt = prompt.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::new().with_prompt(prompt).default(false).interact()
        })
        .await
        .map_err(|e| Error::Internal(format!("confirmation prompt panicked: {e}")))?;

        // No terminal to ask on counts as "no"
        Ok(answer.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read confirmation");
            false
        }))
    }
}
