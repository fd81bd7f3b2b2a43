//! Score and combo aggregation

use super::{Grade, Outcome};
use serde::{Deserialize, Serialize};

/// Last judgement shown to the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Perfect,
    Great,
    Good,
    Bad,
    Miss,
}

impl Feedback {
    pub fn name(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Great => "great",
            Self::Good => "good",
            Self::Bad => "bad",
            Self::Miss => "miss",
        }
    }
}

impl TryFrom<Grade> for Feedback {
    type Error = Grade;

    fn try_from(grade: Grade) -> Result<Self, Grade> {
        Ok(match grade {
            Grade::Perfect => Self::Perfect,
            Grade::Great => Self::Great,
            Grade::Good => Self::Good,
            Grade::Bad => Self::Bad,
            Grade::None => return Err(grade),
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub total_score: f64,
    pub combo: u32,
    pub max_combo: u32,
    pub last: Option<Feedback>,
}

/// Input to the aggregator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreEvent {
    Hit { grade: Grade, score: f64 },
    Miss,
}

impl ScoreEvent {
    /// `None` for outcomes that must not reach the aggregator.
    pub fn from_outcome(outcome: &Outcome) -> Option<Self> {
        match outcome {
            Outcome::Hit(hit) if hit.grade.is_hit() => Some(Self::Hit {
                grade: hit.grade,
                score: hit.score,
            }),
            Outcome::Miss { count } if *count > 0 => Some(Self::Miss),
            _ => None,
        }
    }
}

/// Fold one event into the session state.
pub fn apply(state: SessionState, event: &ScoreEvent) -> SessionState {
    match *event {
        ScoreEvent::Hit { grade, score } => {
            let Ok(feedback) = Feedback::try_from(grade) else {
                return state;
            };
            let combo = if grade.keeps_combo() { state.combo + 1 } else { 0 };
            SessionState {
                total_score: state.total_score + score.max(0.),
                combo,
                max_combo: state.max_combo.max(combo),
                last: Some(feedback),
            }
        }
        ScoreEvent::Miss => SessionState {
            combo: 0,
            last: Some(Feedback::Miss),
            ..state
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(grade: Grade) -> ScoreEvent {
        ScoreEvent::Hit {
            grade,
            score: grade.score(100.),
        }
    }

    #[test]
    fn test_perfect_and_great_build_combo() {
        let state = apply(SessionState::default(), &hit(Grade::Perfect));
        assert!((state.total_score - 100.).abs() < 0.001);
        assert_eq!(state.combo, 1);
        let state = apply(state, &hit(Grade::Great));
        assert!((state.total_score - 175.).abs() < 0.001);
        assert_eq!(state.combo, 2);
        assert_eq!(state.max_combo, 2);
        assert_eq!(state.last, Some(Feedback::Great));
    }

    #[test]
    fn test_good_and_bad_break_combo() {
        let mut state = SessionState::default();
        for _ in 0..3 {
            state = apply(state, &hit(Grade::Perfect));
        }
        state = apply(state, &hit(Grade::Good));
        assert_eq!(state.combo, 0);
        assert!((state.total_score - 345.).abs() < 0.001);

        state = apply(state, &hit(Grade::Perfect));
        state = apply(state, &hit(Grade::Bad));
        assert_eq!(state.combo, 0);
        assert!((state.total_score - 445.).abs() < 0.001);
        assert_eq!(state.max_combo, 3);
        assert_eq!(state.last, Some(Feedback::Bad));
    }

    #[test]
    fn test_miss_keeps_score() {
        let state = apply(SessionState::default(), &hit(Grade::Perfect));
        let state = apply(state, &ScoreEvent::Miss);
        assert_eq!(state.combo, 0);
        assert!((state.total_score - 100.).abs() < 0.001);
        assert_eq!(state.last, Some(Feedback::Miss));
    }

    #[test]
    fn test_score_never_decreases() {
        let events = [
            hit(Grade::Bad),
            ScoreEvent::Miss,
            hit(Grade::Good),
            hit(Grade::Perfect),
            ScoreEvent::Miss,
            hit(Grade::Great),
        ];
        let mut state = SessionState::default();
        for event in &events {
            let next = apply(state, event);
            assert!(next.total_score >= state.total_score);
            if next.combo > state.combo {
                assert!(matches!(next.last, Some(Feedback::Perfect | Feedback::Great)));
            }
            state = next;
        }
    }

    #[test]
    fn test_from_outcome_filters() {
        assert_eq!(ScoreEvent::from_outcome(&Outcome::NoTarget), None);
        assert_eq!(ScoreEvent::from_outcome(&Outcome::Miss { count: 0 }), None);
        assert_eq!(
            ScoreEvent::from_outcome(&Outcome::Miss { count: 2 }),
            Some(ScoreEvent::Miss)
        );
    }

    #[test]
    fn test_none_grade_is_ignored() {
        let state = apply(SessionState::default(), &hit(Grade::None));
        assert_eq!(state, SessionState::default());
    }
}
