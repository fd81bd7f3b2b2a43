use super::Grade;
use serde::{Deserialize, Serialize};

/// Index of a note inside its [`NoteSet`](super::NoteSet).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(pub usize);

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum NoteState {
    #[default]
    Pending,
    /// Consumed by a keypress.
    Resolved { grade: Grade, at: f64 },
    /// Swept after its outer window expired.
    Missed { at: f64 },
}

impl NoteState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_done(&self) -> bool {
        !self.is_pending()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Lane index
    pub column: usize,
    /// Elapsed time (ms) at which the note should be hit
    pub ms: f64,
    #[serde(skip)]
    state: NoteState,
}

impl Note {
    pub fn new(column: usize, ms: f64) -> Self {
        Self {
            column,
            ms,
            state: NoteState::Pending,
        }
    }

    pub fn state(&self) -> NoteState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Move a pending note into a terminal state.
    ///
    /// Returns `false` and leaves the note untouched if it already left
    /// `Pending`, or if `to` is `Pending` itself.
    pub(crate) fn settle(&mut self, to: NoteState) -> bool {
        if self.state.is_done() || to.is_pending() {
            return false;
        }
        self.state = to;
        true
    }
}
