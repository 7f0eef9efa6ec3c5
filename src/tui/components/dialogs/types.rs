//! Core dialog types
//!
//! Descriptors, identifiers and errors shared by the sequence store,
//! the navigation control and the stack renderer.

use serde::{Deserialize, Serialize};

/// Unique identifier for a dialog in a sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
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

/// Immutable description of one dialog in the stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogDescriptor {
    pub id: DialogId,
    pub title: String,
    pub description: String,
}

impl DialogDescriptor {
    pub fn new(
        id: impl Into<DialogId>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Navigation actions a frame or key binding can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationAction {
    /// Step to the next dialog in the sequence
    Next,
    /// Step back to the previous dialog
    Previous,
    /// Dismiss the whole stack
    CloseAll,
}

/// Result type for dialog construction
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Errors raised while building a dialog sequence
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    #[error("Dialog sequence must contain at least one dialog")]
    EmptySequence,

    #[error("Dialog with ID '{0}' appears more than once")]
    DuplicateId(DialogId),
}

/// The dialogs shown when no sequence is configured
pub fn default_descriptors() -> Vec<DialogDescriptor> {
    vec![
        DialogDescriptor::new("1", "I'm first dialog", "With a fancy description"),
        DialogDescriptor::new("2", "I'm second dialog", "With a fancy description"),
        DialogDescriptor::new("3", "I'm third dialog", "With a fancy description"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_deserializes_plain_id() {
        let json = r#"{"id":"intro","title":"Welcome","description":"Hello there"}"#;
        let descriptor: DialogDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.id, DialogId::new("intro"));
        assert_eq!(descriptor.title, "Welcome");
        assert_eq!(descriptor.description, "Hello there");
    }

    #[test]
    fn test_default_descriptors() {
        let dialogs = default_descriptors();
        assert_eq!(dialogs.len(), 3);
        assert_eq!(dialogs[0].title, "I'm first dialog");
        assert_eq!(dialogs[2].id.as_str(), "3");
    }

    #[test]
    fn test_error_messages() {
        let err = DialogError::DuplicateId(DialogId::from("2"));
        assert_eq!(err.to_string(), "Dialog with ID '2' appears more than once");
    }
}
