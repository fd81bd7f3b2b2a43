//! Session configuration
//!
//! Loaded from JSON or YAML. Every field has a default reproducing the demo
//! song: four lanes, eight notes, notes crossing the screen in five seconds.

use crate::core::{Layout, Note, Projector, Tolerances};
use crate::{bail, KeyMap, Result, COLUMN_COUNT};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How fast notes scroll, either given directly or derived from the song.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scroll {
    Speed {
        y_distance_per_second: f64,
    },
    Song {
        /// Offset of the target row from the bottom edge
        target_y: f64,
        /// Time a note takes to cross from the top edge to the targets
        song_duration_seconds: f64,
    },
}

impl Default for Scroll {
    fn default() -> Self {
        Self::Song {
            target_y: 0.25,
            song_duration_seconds: 5.,
        }
    }
}

impl Scroll {
    pub fn y_distance_per_second(&self) -> f64 {
        match *self {
            Self::Speed {
                y_distance_per_second,
            } => y_distance_per_second,
            Self::Song {
                target_y,
                song_duration_seconds,
            } => Projector::speed_for(target_y, song_duration_seconds),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub max_score_per_hit: f64,
    pub tolerances: Tolerances,
    pub columns: usize,
    pub notes: Vec<Note>,
    pub scroll: Scroll,
    /// Overrides the layout derived from `scroll`.
    pub layout: Option<Layout>,
    pub keys: KeyMap,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_score_per_hit: 100.,
            tolerances: Tolerances::default(),
            columns: COLUMN_COUNT,
            notes: vec![
                Note::new(0, 4000.),
                Note::new(1, 5000.),
                Note::new(2, 7000.),
                Note::new(3, 8000.),
                Note::new(3, 10000.),
                Note::new(2, 11000.),
                Note::new(1, 13000.),
                Note::new(0, 14000.),
            ],
            scroll: Scroll::default(),
            layout: None,
            keys: KeyMap::default(),
        }
    }
}

impl GameConfig {
    /// Load from a file, picking YAML for `.yml`/`.yaml` and JSON otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => Self::from_yaml_str(&text),
            _ => Self::from_json_str(&text),
        };
        config.with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.max_score_per_hit.is_finite() || self.max_score_per_hit < 0. {
            bail!(
                "max_score_per_hit must be a non-negative number, got {}",
                self.max_score_per_hit
            );
        }
        if self.columns == 0 {
            bail!("at least one column is required");
        }
        for (i, note) in self.notes.iter().enumerate() {
            if note.column >= self.columns {
                bail!(
                    "note #{i} uses column {} but only {} columns exist",
                    note.column,
                    self.columns
                );
            }
            if !note.ms.is_finite() {
                bail!("note #{i} has an invalid time {}", note.ms);
            }
        }
        if let Scroll::Song {
            song_duration_seconds,
            ..
        } = self.scroll
        {
            if song_duration_seconds <= 0. {
                bail!("song_duration_seconds must be positive, got {song_duration_seconds}");
            }
        }
        let speed = self.scroll.y_distance_per_second();
        if !speed.is_finite() {
            bail!("scroll speed must be finite, got {speed}");
        }
        if let Some(max) = self.keys.max_column() {
            if max >= self.columns {
                bail!("a key is bound to column {max} but only {} columns exist", self.columns);
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> Layout {
        match (self.layout, self.scroll) {
            (Some(layout), _) => layout,
            (None, Scroll::Song { target_y, .. }) => Layout::with_target_offset(target_y),
            (None, Scroll::Speed { .. }) => Layout::default(),
        }
    }

    pub fn projector(&self) -> Projector {
        Projector::new(self.layout(), self.scroll.y_distance_per_second())
    }
}
