//! Text shown next to the playfield.

use rhythm_common::core::SessionState;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HudText {
    pub score: String,
    /// Name of the last judgement, empty before the first one.
    pub hit: String,
    /// `"N combo"`, or empty while there is no streak.
    pub combo: String,
}

impl HudText {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            score: format_score(state.total_score),
            hit: state.last.map(|f| f.name().to_owned()).unwrap_or_default(),
            combo: if state.combo == 0 {
                String::new()
            } else {
                format!("{} combo", state.combo)
            },
        }
    }
}

/// Whole numbers without a fraction, everything else to two decimals.
pub fn format_score(score: f64) -> String {
    let rounded = (score * 100.).round() / 100.;
    if rounded.fract() == 0. {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhythm_common::core::Feedback;

    #[test]
    fn test_initial_hud() {
        let hud = HudText::from_state(&SessionState::default());
        assert_eq!(hud.score, "0");
        assert_eq!(hud.hit, "");
        assert_eq!(hud.combo, "");
    }

    #[test]
    fn test_combo_text() {
        let state = SessionState {
            total_score: 175.,
            combo: 2,
            max_combo: 2,
            last: Some(Feedback::Great),
        };
        let hud = HudText::from_state(&state);
        assert_eq!(hud.score, "175");
        assert_eq!(hud.hit, "great");
        assert_eq!(hud.combo, "2 combo");
    }

    #[test]
    fn test_miss_clears_combo_text() {
        let state = SessionState {
            total_score: 100.,
            combo: 0,
            max_combo: 1,
            last: Some(Feedback::Miss),
        };
        let hud = HudText::from_state(&state);
        assert_eq!(hud.hit, "miss");
        assert_eq!(hud.combo, "");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(100. * 0.45), "45");
        assert_eq!(format_score(0.75), "0.75");
        assert_eq!(format_score(12.5), "12.50");
    }
}
