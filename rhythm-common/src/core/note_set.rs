//! Arena of scheduled notes
//!
//! Notes are kept in one flat list ordered by scheduled time (stable, so
//! notes sharing a time keep their input order). Nothing is ever removed:
//! settled notes stay in place for end-of-session statistics and are just
//! skipped by the pending queries.

use super::{Grade, Note, NoteId, NoteState};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Note>", into = "Vec<Note>")]
pub struct NoteSet {
    notes: Vec<Note>,
}

impl From<Vec<Note>> for NoteSet {
    fn from(notes: Vec<Note>) -> Self {
        Self::new(notes)
    }
}

impl From<NoteSet> for Vec<Note> {
    fn from(set: NoteSet) -> Self {
        set.notes
    }
}

impl NoteSet {
    pub fn new(mut notes: Vec<Note>) -> Self {
        notes.sort_by(|a, b| a.ms.total_cmp(&b.ms));
        Self { notes }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NoteId, &Note)> + '_ {
        self.notes.iter().enumerate().map(|(i, n)| (NoteId(i), n))
    }

    /// All pending notes, ascending by scheduled time.
    pub fn pending(&self) -> impl Iterator<Item = (NoteId, &Note)> + '_ {
        self.iter().filter(|(_, n)| n.is_pending())
    }

    /// Pending notes of one lane, ascending by scheduled time.
    pub fn pending_in_column(&self, column: usize) -> impl Iterator<Item = (NoteId, &Note)> + '_ {
        self.pending().filter(move |(_, n)| n.column == column)
    }

    pub fn pending_count(&self) -> usize {
        self.notes.iter().filter(|n| n.is_pending()).count()
    }

    /// Last scheduled time in the set.
    pub fn end_time(&self) -> Option<f64> {
        self.notes.last().map(|n| n.ms)
    }

    pub fn mark_resolved(&mut self, id: NoteId, grade: Grade, at: f64) -> bool {
        if !grade.is_hit() {
            log::warn!("refusing to resolve note {} with grade none", id.0);
            return false;
        }
        self.settle(id, NoteState::Resolved { grade, at })
    }

    pub fn mark_missed(&mut self, id: NoteId, at: f64) -> bool {
        self.settle(id, NoteState::Missed { at })
    }

    fn settle(&mut self, id: NoteId, to: NoteState) -> bool {
        let Some(note) = self.notes.get_mut(id.0) else {
            log::warn!("note {} does not exist", id.0);
            return false;
        };
        if note.settle(to) {
            true
        } else {
            log::warn!(
                "note {} (column {}, {}ms) already settled as {:?}",
                id.0,
                note.column,
                note.ms,
                note.state()
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> NoteSet {
        NoteSet::new(vec![
            Note::new(1, 5000.),
            Note::new(0, 4000.),
            Note::new(0, 4400.),
            Note::new(3, 8000.),
        ])
    }

    #[test]
    fn test_sorted_by_time() {
        let set = demo();
        let times: Vec<f64> = set.iter().map(|(_, n)| n.ms).collect();
        assert_eq!(times, vec![4000., 4400., 5000., 8000.]);
    }

    #[test]
    fn test_stable_for_equal_times() {
        let set = NoteSet::new(vec![Note::new(2, 1000.), Note::new(0, 1000.), Note::new(1, 500.)]);
        let columns: Vec<usize> = set.iter().map(|(_, n)| n.column).collect();
        assert_eq!(columns, vec![1, 2, 0]);
    }

    #[test]
    fn test_pending_in_column() {
        let mut set = demo();
        let ids: Vec<NoteId> = set.pending_in_column(0).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![NoteId(0), NoteId(1)]);

        assert!(set.mark_missed(NoteId(0), 4501.));
        let ids: Vec<NoteId> = set.pending_in_column(0).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![NoteId(1)]);
        assert_eq!(set.pending_in_column(2).count(), 0);
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut set = demo();
        assert!(set.mark_resolved(NoteId(2), Grade::Great, 5150.));
        assert!(!set.mark_missed(NoteId(2), 6000.));
        assert!(!set.mark_resolved(NoteId(2), Grade::Perfect, 5000.));
        assert_eq!(
            set.get(NoteId(2)).unwrap().state(),
            NoteState::Resolved {
                grade: Grade::Great,
                at: 5150.
            }
        );
    }

    #[test]
    fn test_settled_notes_are_kept() {
        let mut set = demo();
        assert!(set.mark_missed(NoteId(0), 4600.));
        assert!(set.mark_resolved(NoteId(1), Grade::Bad, 4000.));
        assert_eq!(set.len(), 4);
        assert_eq!(set.pending_count(), 2);
    }

    #[test]
    fn test_refuses_unknown_and_none() {
        let mut set = demo();
        assert!(!set.mark_missed(NoteId(42), 0.));
        assert!(!set.mark_resolved(NoteId(0), Grade::None, 4000.));
        assert!(set.get(NoteId(0)).unwrap().is_pending());
    }

    #[test]
    fn test_end_time() {
        assert_eq!(demo().end_time(), Some(8000.));
        assert_eq!(NoteSet::default().end_time(), None);
    }
}
