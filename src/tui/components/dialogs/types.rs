//! Core dialog types
//!
//! Identifiers, construction options, lifecycle events and errors shared by
//! the dialog component and its manager.

use super::element::Element;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long a configured effect gets to run before the dialog is detached
pub const HIDE_TRANSITION: Duration = Duration::from_millis(500);

/// Unique identifier for dialog instances
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogId(pub String);

impl DialogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DialogId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DialogId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body content of a dialog
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Plain text placed in the body paragraph
    Text(String),
    /// A prebuilt element that takes the body paragraph's place
    Element(Element),
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Element> for Message {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// Options accepted when constructing a dialog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogOptions {
    pub title: Option<String>,
    pub message: Option<Message>,
}

impl DialogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Lifecycle events emitted by a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// The dialog was attached and presented
    Show,
    /// The dialog was detached. Carries the native return value, if any.
    Hide { return_value: Option<String> },
}

/// Signals raised by the dialog surface itself rather than by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Escape key or native cancel gesture
    Cancel,
    /// The native element closed
    Close,
    /// The close control embedded in the template was activated
    CloseControl,
}

/// Result type for dialog operations
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Dialog-specific error types
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("Dialog with ID '{0}' not found")]
    NotFound(DialogId),

    #[error("Invalid dialog configuration: {0}")]
    InvalidConfig(String),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
