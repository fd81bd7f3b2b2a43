//! Keypress resolution
//!
//! A keypress acts on the earliest-scheduled pending note of its lane that
//! is still inside the outer window, not on the note closest in time. With
//! two notes due close together the older one is always consumed first.

use super::{Grade, NoteId, NoteSet, Timing, Tolerances};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HitResult {
    pub note: NoteId,
    pub column: usize,
    pub grade: Grade,
    pub score: f64,
    /// `elapsed - scheduled`; negative when early.
    pub offset_ms: f64,
    pub timing: Timing,
}

/// What a keypress or a tick produced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Hit(HitResult),
    /// Notes retired by the sweeper during one tick.
    Miss { count: usize },
    /// Nothing was eligible; no feedback.
    NoTarget,
}

impl Outcome {
    pub fn grade(&self) -> Option<Grade> {
        match self {
            Self::Hit(hit) => Some(hit.grade),
            _ => None,
        }
    }
}

/// Resolve a keypress on `column` at `elapsed_ms`, consuming at most one
/// note.
pub fn resolve(
    notes: &mut NoteSet,
    tolerances: &Tolerances,
    max_score_per_hit: f64,
    column: usize,
    elapsed_ms: f64,
) -> Outcome {
    let min_time = tolerances.min_eligible_time(elapsed_ms);
    let Some((id, note)) = notes.pending_in_column(column).find(|(_, n)| n.ms >= min_time) else {
        return Outcome::NoTarget;
    };

    let offset_ms = elapsed_ms - note.ms;
    let grade = tolerances.grade(offset_ms.abs());
    if !grade.is_hit() {
        // Earliest candidate is still too far ahead
        return Outcome::NoTarget;
    }
    let note_ms = note.ms;

    if !notes.mark_resolved(id, grade, elapsed_ms) {
        return Outcome::NoTarget;
    }
    log::debug!(
        "column {column}: note at {note_ms}ms resolved at {elapsed_ms}ms as {} ({offset_ms:+}ms)",
        grade.name()
    );

    Outcome::Hit(HitResult {
        note: id,
        column,
        grade,
        score: grade.score(max_score_per_hit),
        offset_ms,
        timing: Timing::from_offset(offset_ms),
    })
}
