//! Dialog sequence store
//!
//! Holds the ordered dialogs and the cursor over them. State is a plain
//! value with pure transitions; [`DialogSequenceStore`] owns one state and
//! applies transitions in response to user interaction.

use super::types::{DialogDescriptor, DialogError, DialogResult};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// A validated, fixed-length list of dialogs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSequence {
    dialogs: Arc<[DialogDescriptor]>,
}

impl DialogSequence {
    /// Build a sequence; it must be non-empty with unique ids
    pub fn new(dialogs: Vec<DialogDescriptor>) -> DialogResult<Self> {
        if dialogs.is_empty() {
            return Err(DialogError::EmptySequence);
        }

        let mut seen = HashSet::new();
        for dialog in &dialogs {
            if !seen.insert(&dialog.id) {
                return Err(DialogError::DuplicateId(dialog.id.clone()));
            }
        }

        Ok(Self {
            dialogs: dialogs.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    /// Always false for a constructed sequence
    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.dialogs.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&DialogDescriptor> {
        self.dialogs.get(index)
    }

    pub fn as_slice(&self) -> &[DialogDescriptor] {
        &self.dialogs
    }
}

/// Read-only view of where the stack is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackPhase {
    Closed,
    Open(usize),
}

/// Open flag, cursor and the sequence they range over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceState {
    is_open: bool,
    current_index: usize,
    sequence: DialogSequence,
}

impl SequenceState {
    /// A closed state at the first dialog
    pub fn new(sequence: DialogSequence) -> Self {
        Self {
            is_open: false,
            current_index: 0,
            sequence,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn sequence(&self) -> &DialogSequence {
        &self.sequence
    }

    pub fn phase(&self) -> StackPhase {
        if self.is_open {
            StackPhase::Open(self.current_index)
        } else {
            StackPhase::Closed
        }
    }

    pub fn opened(&self) -> Self {
        Self {
            is_open: true,
            current_index: 0,
            sequence: self.sequence.clone(),
        }
    }

    pub fn closed(&self) -> Self {
        Self {
            is_open: false,
            current_index: 0,
            sequence: self.sequence.clone(),
        }
    }

    /// Moves the cursor forward; a closed state stays at the first dialog
    pub fn advanced(&self) -> Self {
        if !self.is_open {
            return self.clone();
        }
        Self {
            current_index: (self.current_index + 1).min(self.sequence.last_index()),
            ..self.clone()
        }
    }

    pub fn retreated(&self) -> Self {
        if !self.is_open {
            return self.clone();
        }
        Self {
            current_index: self.current_index.saturating_sub(1),
            ..self.clone()
        }
    }

    pub fn can_advance(&self) -> bool {
        self.current_index < self.sequence.last_index()
    }

    pub fn can_retreat(&self) -> bool {
        self.current_index > 0
    }

    /// Dialogs from the first up to and including the current one
    pub fn visible(&self) -> &[DialogDescriptor] {
        if self.is_open {
            &self.sequence.as_slice()[..=self.current_index]
        } else {
            &[]
        }
    }

    /// The active dialog, if the stack is open
    pub fn current(&self) -> Option<&DialogDescriptor> {
        if self.is_open {
            self.sequence.get(self.current_index)
        } else {
            None
        }
    }
}

/// Callbacks a rendered stack invokes on user interaction
pub trait StackCallbacks {
    fn on_next(&mut self);
    fn on_previous(&mut self);
    fn on_close(&mut self);
}

/// Owner of the single [`SequenceState`] instance
#[derive(Debug, Clone)]
pub struct DialogSequenceStore {
    state: SequenceState,
}

impl DialogSequenceStore {
    pub fn new(sequence: DialogSequence) -> Self {
        Self {
            state: SequenceState::new(sequence),
        }
    }

    pub fn state(&self) -> &SequenceState {
        &self.state
    }

    pub fn phase(&self) -> StackPhase {
        self.state.phase()
    }

    pub fn open(&mut self) {
        let next = self.state.opened();
        self.apply("open", next);
    }

    pub fn close_all(&mut self) {
        let next = self.state.closed();
        self.apply("close_all", next);
    }

    pub fn advance(&mut self) {
        let next = self.state.advanced();
        self.apply("advance", next);
    }

    pub fn retreat(&mut self) {
        let next = self.state.retreated();
        self.apply("retreat", next);
    }

    pub fn can_advance(&self) -> bool {
        self.state.can_advance()
    }

    pub fn can_retreat(&self) -> bool {
        self.state.can_retreat()
    }

    fn apply(&mut self, operation: &str, next: SequenceState) {
        let from = self.state.phase();
        let to = next.phase();
        if from == to {
            trace!(operation, ?from, "Dialog stack unchanged");
        } else {
            debug!(operation, ?from, ?to, "Dialog stack transition");
        }
        self.state = next;
    }
}

impl StackCallbacks for DialogSequenceStore {
    fn on_next(&mut self) {
        self.advance();
    }

    fn on_previous(&mut self) {
        self.retreat();
    }

    fn on_close(&mut self) {
        self.close_all();
    }
}
