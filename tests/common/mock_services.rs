//! Mock collaborators for pipeline tests
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use approval_sync::error::{Error, Result};
use approval_sync::exec::{CommandOutput, CommandRunner, CommandSpec};
use approval_sync::review::ReviewService;
use approval_sync::sync::{Interaction, MessagePreview, ProgressCallback, SyncStep};
use async_trait::async_trait;
use std::sync::Mutex;

/// Command runner with scripted results
///
/// Commands whose display string starts with a registered prefix get the
/// registered output; everything else succeeds with empty output. Every
/// call is recorded.
#[derive(Default)]
pub struct MockRunner {
    responses: Mutex<Vec<(String, CommandOutput)>>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `output` for commands starting with `prefix`
    pub fn respond(&self, prefix: &str, output: CommandOutput) {
        self.responses
            .lock()
            .unwrap()
            .push((prefix.to_string(), output));
    }

    /// Make commands starting with `prefix` exit 1 with `stderr`
    pub fn fail_on(&self, prefix: &str, stderr: &str) {
        self.respond(prefix, CommandOutput::failed(1, stderr));
    }

    /// All recorded commands
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded command lines
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(CommandSpec::display).collect()
    }

    /// Recorded `git <subcommand>` names, in order
    pub fn git_subcommands(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter(|c| c.program == "git")
            .filter_map(|c| c.args.first().cloned())
            .collect()
    }

    /// Whether any `rm` was issued
    pub fn removed_anything(&self) -> bool {
        self.calls().iter().any(|c| c.program == "rm")
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(command.clone());
        let line = command.display();
        let responses = self.responses.lock().unwrap();
        Ok(responses
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map_or_else(|| CommandOutput::ok(""), |(_, out)| out.clone()))
    }
}

/// Review service returning fixed records
pub struct MockReviewService {
    records: Vec<serde_json::Value>,
    error: Option<String>,
    queries: Mutex<Vec<String>>,
}

impl MockReviewService {
    /// Service returning `records` for every query
    pub fn with_records(records: Vec<serde_json::Value>) -> Self {
        Self {
            records,
            error: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Service failing every query with a review API error
    pub fn failing(message: &str) -> Self {
        Self {
            records: Vec::new(),
            error: Some(message.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Change ids queried so far
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewService for MockReviewService {
    async fn query_changes(&self, change_id: &str) -> Result<Vec<serde_json::Value>> {
        self.queries.lock().unwrap().push(change_id.to_string());
        match self.error {
            Some(ref message) => Err(Error::ReviewApi(message.clone())),
            None => Ok(self.records.clone()),
        }
    }
}

/// Interaction with a fixed answer that records prompts
pub struct ScriptedInteraction {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedInteraction {
    /// Always answer yes
    pub fn yes() -> Self {
        Self {
            answer: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answer no
    pub fn no() -> Self {
        Self {
            answer: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts shown so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Interaction for ScriptedInteraction {
    async fn confirm(&self, prompt: &str) -> Result<bool> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer)
    }
}

/// Progress event captured by [`RecordingProgress`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started(SyncStep),
    Finished(SyncStep),
    Failed(SyncStep, String),
    Message(String),
    Warning(String),
    Preview(MessagePreview),
}

/// Progress callback that records every event
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    /// All events in order
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Steps that were started, in order
    pub fn started_steps(&self) -> Vec<SyncStep> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Started(step) => Some(step),
                _ => None,
            })
            .collect()
    }

    /// Warning texts
    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Warning(w) => Some(w),
                _ => None,
            })
            .collect()
    }

    /// Informational messages
    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// The preview, if one was shown
    pub fn preview(&self) -> Option<MessagePreview> {
        self.events().into_iter().find_map(|e| match e {
            ProgressEvent::Preview(p) => Some(p),
            _ => None,
        })
    }

    fn push(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_step_started(&self, step: SyncStep) {
        self.push(ProgressEvent::Started(step));
    }

    async fn on_step_finished(&self, step: SyncStep) {
        self.push(ProgressEvent::Finished(step));
    }

    async fn on_step_failed(&self, step: SyncStep, error: &Error) {
        self.push(ProgressEvent::Failed(step, error.to_string()));
    }

    async fn on_message(&self, message: &str) {
        self.push(ProgressEvent::Message(message.to_string()));
    }

    async fn on_warning(&self, message: &str) {
        self.push(ProgressEvent::Warning(message.to_string()));
    }

    async fn on_preview(&self, preview: &MessagePreview) {
        self.push(ProgressEvent::Preview(preview.clone()));
    }
}
