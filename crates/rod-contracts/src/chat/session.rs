use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Image,
}

/// One conversation entry. Never mutated after creation; insertion order
/// is display order. `content` is either display text or an image
/// reference (URL or data URI); `prompt` keeps the original request text
/// for image messages. `timestamp` is display-formatted, not sortable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub kind: ContentKind,
    pub content: String,
    pub prompt: Option<String>,
    pub timestamp: String,
}

/// Why a submission did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    EmptyPrompt,
    RequestInFlight,
}

impl fmt::Display for SubmitRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitRejection::EmptyPrompt => f.write_str("Please enter a message"),
            SubmitRejection::RequestInFlight => {
                f.write_str("A request is already in flight")
            }
        }
    }
}

/// Append-only conversation log plus the submission state machine.
///
/// At most one request may be in flight; the flag is the sole concurrency
/// guard. `last_error` is cleared when a new submission starts and is the
/// only error surfaced; errors are never appended as messages.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: String,
    messages: Vec<Message>,
    in_flight: bool,
    last_error: Option<String>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
            in_flight: false,
            last_error: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// `idle -> submitting`: appends the user message, clears the previous
    /// error, raises the in-flight flag, and hands back the prompt text to
    /// send. Blank input and an in-flight request both reject without
    /// touching the log.
    pub fn begin(&mut self, text: &str) -> Result<String, SubmitRejection> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SubmitRejection::EmptyPrompt);
        }
        if self.in_flight {
            return Err(SubmitRejection::RequestInFlight);
        }
        self.messages.push(Message {
            role: Role::User,
            kind: ContentKind::Text,
            content: trimmed.to_string(),
            prompt: None,
            timestamp: now_time(),
        });
        self.last_error = None;
        self.in_flight = true;
        Ok(trimmed.to_string())
    }

    /// `submitting -> idle` on success: appends the assistant message.
    pub fn complete(
        &mut self,
        kind: ContentKind,
        content: impl Into<String>,
        prompt: Option<String>,
    ) {
        self.messages.push(Message {
            role: Role::Assistant,
            kind,
            content: content.into(),
            prompt,
            timestamp: now_time(),
        });
        self.in_flight = false;
    }

    /// `submitting -> idle` on failure: records the error, appends nothing.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
        self.in_flight = false;
    }

    /// New chat: drops the whole message sequence and the error. Ignored
    /// while a request is in flight.
    pub fn clear(&mut self) {
        if self.in_flight {
            return;
        }
        self.messages.clear();
        self.last_error = None;
    }

    /// Most recent user prompt, for resubmission.
    pub fn last_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == Role::User)
            .map(|message| message.content.as_str())
    }

    /// Most recent assistant image artifact, for saving.
    pub fn last_image(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == Role::Assistant && message.kind == ContentKind::Image)
    }
}

fn now_time() -> String {
    Local::now().format("%H:%M").to_string()
}
