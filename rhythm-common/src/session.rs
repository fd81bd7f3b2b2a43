//! One play-through of a note chart
//!
//! The host drives a session from two event sources: `tick` once per frame
//! and `on_key_press` per recognized keydown. Both take the same elapsed
//! clock and both run to completion before returning, so a note is settled
//! by whichever call reaches it first and the other one sees it as gone.

use crate::core::{
    apply, resolve, sweep, NoteSet, Outcome, Projector, ScoreEvent, SessionState, SessionSummary,
    Tolerances,
};
use crate::{GameConfig, Point, Result, Store, SubscriptionId};

/// What a frame needs from the engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickResult {
    /// Notes retired this tick; zero means no miss feedback.
    pub missed: usize,
    /// Current positions of every pending note, in no particular order.
    pub positions: Vec<Point>,
}

impl TickResult {
    /// Positions as `[x0, y0, x1, y1, ...]` for direct buffer upload.
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| [p.x, p.y]).collect()
    }
}

pub struct Session {
    notes: NoteSet,
    chart: NoteSet,
    tolerances: Tolerances,
    max_score_per_hit: f64,
    columns: usize,
    projector: Projector,
    store: Store<SessionState, ScoreEvent>,
    finished: bool,
}

impl Session {
    pub fn new(config: &GameConfig) -> Result<Self> {
        config.validate()?;
        let chart = NoteSet::new(config.notes.clone());
        log::info!(
            "session created: {} notes over {} columns, outer window {}ms",
            chart.len(),
            config.columns,
            config.tolerances.bad()
        );
        Ok(Self {
            notes: chart.clone(),
            chart,
            tolerances: config.tolerances,
            max_score_per_hit: config.max_score_per_hit,
            columns: config.columns,
            projector: config.projector(),
            store: Store::new(SessionState::default(), apply),
            finished: false,
        })
    }

    /// Advance to `elapsed_ms`: sweep expired notes, then place the rest.
    pub fn tick(&mut self, elapsed_ms: f64) -> TickResult {
        let missed = sweep(&mut self.notes, &self.tolerances, elapsed_ms);
        if missed > 0 {
            self.store.dispatch(&ScoreEvent::Miss);
        }
        self.check_finished();

        let positions = self
            .projector
            .project(self.notes.pending().map(|(_, n)| n), elapsed_ms)
            .collect();
        TickResult { missed, positions }
    }

    /// Judge a keypress on `column`. Columns outside the layout never hit.
    pub fn on_key_press(&mut self, column: usize, elapsed_ms: f64) -> Outcome {
        if column >= self.columns {
            log::debug!("ignoring keypress on unknown column {column}");
            return Outcome::NoTarget;
        }
        let outcome = resolve(
            &mut self.notes,
            &self.tolerances,
            self.max_score_per_hit,
            column,
            elapsed_ms,
        );
        if let Some(event) = ScoreEvent::from_outcome(&outcome) {
            self.store.dispatch(&event);
            self.check_finished();
        }
        outcome
    }

    pub fn state(&self) -> &SessionState {
        self.store.state()
    }

    pub fn notes(&self) -> &NoteSet {
        &self.notes
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SessionState) + 'static) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// No note is pending any more.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::collect(&self.notes, self.state(), self.max_score_per_hit)
    }

    /// Start over with every note pending and a zeroed score. Subscribers
    /// stay registered.
    pub fn restart(&mut self) {
        self.notes = self.chart.clone();
        self.store.reset(SessionState::default());
        self.finished = false;
    }

    fn check_finished(&mut self) {
        if !self.finished && self.notes.pending_count() == 0 {
            self.finished = true;
            let state = self.state();
            log::info!(
                "all notes settled: score {}, max combo {}",
                state.total_score,
                state.max_combo
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Feedback, Grade, Note, NoteId, NoteState};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session(notes: Vec<Note>) -> Session {
        let config = GameConfig {
            notes,
            ..GameConfig::default()
        };
        Session::new(&config).unwrap()
    }

    #[test]
    fn test_perfect_press() {
        let mut s = session(vec![Note::new(0, 4000.)]);
        let outcome = s.on_key_press(0, 4050.);
        assert_eq!(outcome.grade(), Some(Grade::Perfect));
        assert!((s.state().total_score - 100.).abs() < 0.001);
        assert_eq!(s.state().combo, 1);
    }

    #[test]
    fn test_great_press() {
        let mut s = session(vec![Note::new(0, 4000.), Note::new(0, 9000.)]);
        s.on_key_press(0, 4000.);
        let outcome = s.on_key_press(0, 9150.);
        assert_eq!(outcome.grade(), Some(Grade::Great));
        assert!((s.state().total_score - 175.).abs() < 0.001);
        assert_eq!(s.state().combo, 2);
    }

    #[test]
    fn test_late_press_has_no_target() {
        let mut s = session(vec![Note::new(0, 4000.)]);
        assert_eq!(s.on_key_press(0, 4600.), Outcome::NoTarget);
        assert!(s.notes().get(NoteId(0)).unwrap().is_pending());
        assert_eq!(*s.state(), SessionState::default());
    }

    #[test]
    fn test_tick_misses_and_breaks_combo() {
        let mut s = session(vec![Note::new(0, 3000.), Note::new(1, 4000.)]);
        s.on_key_press(0, 3000.);
        assert_eq!(s.state().combo, 1);

        let result = s.tick(4000. + 500. + 1.);
        assert_eq!(result.missed, 1);
        assert!(result.positions.is_empty());
        assert!(matches!(
            s.notes().get(NoteId(1)).unwrap().state(),
            NoteState::Missed { .. }
        ));
        assert_eq!(s.state().combo, 0);
        assert_eq!(s.state().last, Some(Feedback::Miss));

        assert_eq!(s.tick(4501.).missed, 0);
    }

    #[test]
    fn test_earliest_note_resolved_first() {
        let mut s = session(vec![Note::new(2, 4400.), Note::new(2, 4000.)]);
        let Outcome::Hit(hit) = s.on_key_press(2, 4450.) else {
            panic!("expected a hit");
        };
        assert!((s.notes().get(hit.note).unwrap().ms - 4000.).abs() < 0.001);
        assert_eq!(s.notes().pending_count(), 1);
    }

    #[test]
    fn test_swept_note_cannot_be_resolved() {
        let mut s = session(vec![Note::new(0, 4000.)]);
        s.tick(4600.);
        assert_eq!(s.on_key_press(0, 4600.), Outcome::NoTarget);
    }

    #[test]
    fn test_resolved_note_is_not_swept() {
        let mut s = session(vec![Note::new(0, 4000.)]);
        s.on_key_press(0, 4100.);
        assert_eq!(s.tick(9000.).missed, 0);
        assert_eq!(s.state().last, Some(Feedback::Great));
    }

    #[test]
    fn test_unknown_column() {
        let mut s = session(vec![Note::new(0, 4000.)]);
        assert_eq!(s.on_key_press(4, 4000.), Outcome::NoTarget);
        assert_eq!(s.on_key_press(usize::MAX, 4000.), Outcome::NoTarget);
    }

    #[test]
    fn test_tick_positions() {
        let mut s = session(GameConfig::default().notes);
        let result = s.tick(0.);
        assert_eq!(result.missed, 0);
        assert_eq!(result.positions.len(), 8);
        assert_eq!(result.flat_positions().len(), 16);

        s.on_key_press(0, 4000.);
        assert_eq!(s.tick(4000.).positions.len(), 7);
    }

    #[test]
    fn test_subscribers_see_updates() {
        let mut s = session(vec![Note::new(0, 1000.), Note::new(1, 2000.)]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = s.subscribe(move |state| sink.borrow_mut().push(state.last));

        s.on_key_press(0, 1000.);
        s.on_key_press(0, 1000.); // nothing left in column 0
        s.tick(3000.);
        assert_eq!(
            *seen.borrow(),
            vec![Some(Feedback::Perfect), Some(Feedback::Miss)]
        );
        assert!(s.unsubscribe(id));
    }

    #[test]
    fn test_finished_and_summary() {
        let mut s = session(GameConfig::default().notes);
        for (column, ms) in [(0, 4000.), (1, 5000.), (2, 7000.), (3, 8000.)] {
            s.tick(ms);
            s.on_key_press(column, ms + 120.);
        }
        assert!(!s.is_finished());
        s.tick(20_000.);
        assert!(s.is_finished());

        let summary = s.summary();
        assert_eq!(summary.great, 4);
        assert_eq!(summary.miss, 4);
        assert_eq!(summary.max_combo, 4);
        assert!((summary.total_score - 300.).abs() < 0.001);
    }

    #[test]
    fn test_restart() {
        let mut s = session(vec![Note::new(0, 1000.)]);
        s.on_key_press(0, 1000.);
        assert!(s.is_finished());
        s.restart();
        assert!(!s.is_finished());
        assert_eq!(s.notes().pending_count(), 1);
        assert_eq!(*s.state(), SessionState::default());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = GameConfig {
            notes: vec![Note::new(7, 1000.)],
            ..GameConfig::default()
        };
        assert!(Session::new(&config).is_err());
    }
}
