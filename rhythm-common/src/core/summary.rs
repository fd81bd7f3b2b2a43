use super::{Grade, NoteSet, NoteState, SessionState};
use serde::{Deserialize, Serialize};

/// End-of-session statistics, computed from the settled notes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub perfect: usize,
    pub great: usize,
    pub good: usize,
    pub bad: usize,
    pub miss: usize,
    pub pending: usize,
    pub total_score: f64,
    pub max_combo: u32,
    /// `total_score` over the best score obtainable from the judged notes.
    pub accuracy: f64,
}

impl SessionSummary {
    pub fn collect(notes: &NoteSet, state: &SessionState, max_score_per_hit: f64) -> Self {
        let mut summary = Self {
            total_score: state.total_score,
            max_combo: state.max_combo,
            ..Self::default()
        };
        for (_, note) in notes.iter() {
            match note.state() {
                NoteState::Pending => summary.pending += 1,
                NoteState::Missed { .. } => summary.miss += 1,
                NoteState::Resolved { grade, .. } => match grade {
                    Grade::Perfect => summary.perfect += 1,
                    Grade::Great => summary.great += 1,
                    Grade::Good => summary.good += 1,
                    Grade::Bad => summary.bad += 1,
                    Grade::None => {}
                },
            }
        }
        let best = summary.judged() as f64 * max_score_per_hit;
        summary.accuracy = if best > 0. { summary.total_score / best } else { 0. };
        summary
    }

    pub fn judged(&self) -> usize {
        self.perfect + self.great + self.good + self.bad + self.miss
    }

    /// Every note resolved with Perfect or Great.
    pub fn full_combo(&self) -> bool {
        self.pending == 0 && self.good + self.bad + self.miss == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Note, NoteId};

    #[test]
    fn test_collect_counts() {
        let mut notes = NoteSet::new(vec![
            Note::new(0, 1000.),
            Note::new(1, 2000.),
            Note::new(2, 3000.),
            Note::new(3, 4000.),
        ]);
        notes.mark_resolved(NoteId(0), Grade::Perfect, 1000.);
        notes.mark_resolved(NoteId(1), Grade::Good, 2250.);
        notes.mark_missed(NoteId(2), 3600.);
        let state = SessionState {
            total_score: 145.,
            combo: 0,
            max_combo: 1,
            last: None,
        };

        let summary = SessionSummary::collect(&notes, &state, 100.);
        assert_eq!(summary.perfect, 1);
        assert_eq!(summary.good, 1);
        assert_eq!(summary.miss, 1);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.judged(), 3);
        assert!((summary.accuracy - 145. / 300.).abs() < 0.001);
        assert!(!summary.full_combo());
    }

    #[test]
    fn test_empty_session() {
        let summary =
            SessionSummary::collect(&NoteSet::default(), &SessionState::default(), 100.);
        assert_eq!(summary.accuracy, 0.);
        assert!(summary.full_combo());
    }
}
