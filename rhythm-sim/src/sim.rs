//! Frame-stepped replay of a key log against a session.

use anyhow::{anyhow, Context, Result};
use rhythm_common::core::{Outcome, SessionSummary};
use rhythm_common::{GameConfig, KeyMap, Session};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One keydown. Either `key` (looked up in the config's key map) or an
/// explicit `column` must be given.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Press {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub column: Option<usize>,
    /// Elapsed time in milliseconds
    pub at: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub presses: Vec<Press>,
}

impl Script {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read key log {}", path.display()))?;
        let script: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => serde_yaml::from_str(&text)?,
            _ => serde_json::from_str(&text)?,
        };
        Ok(script)
    }

    /// A press on every note, exactly on time.
    pub fn autoplay(config: &GameConfig) -> Self {
        Self {
            presses: config
                .notes
                .iter()
                .map(|n| Press {
                    key: None,
                    column: Some(n.column),
                    at: n.ms,
                })
                .collect(),
        }
    }
}

/// Something that happened during the run, with its time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    pub at: f64,
    pub outcome: Outcome,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub frames: usize,
    pub events: Vec<Event>,
    pub summary: SessionSummary,
}

pub struct Simulation {
    session: Session,
    keys: KeyMap,
    frame_ms: f64,
    end_ms: f64,
}

impl Simulation {
    pub fn new(config: &GameConfig, fps: f64) -> Result<Self> {
        if !(fps.is_finite() && fps > 0.) {
            return Err(anyhow!("fps must be a positive number, got {fps}"));
        }
        let session = Session::new(config)?;
        let frame_ms = 1000. / fps;
        // Run one frame past the last note's outer window so it gets swept
        let end_ms = session.notes().end_time().unwrap_or(0.)
            + session.tolerances().bad()
            + frame_ms;
        Ok(Self {
            session,
            keys: config.keys.clone(),
            frame_ms,
            end_ms,
        })
    }

    pub fn end_ms(&self) -> f64 {
        self.end_ms
    }

    fn column(&self, press: &Press) -> Option<usize> {
        press
            .column
            .or_else(|| press.key.as_deref().and_then(|k| self.keys.column(k)))
    }

    /// Step frames from 0 to the end of the chart. Presses that fall between
    /// two frames are handled, at their own time, before the later frame.
    pub fn run(mut self, script: &Script) -> Report {
        let mut presses = script.presses.clone();
        presses.sort_by(|a, b| a.at.total_cmp(&b.at));
        let mut presses = presses.into_iter().peekable();

        let mut events = Vec::new();
        let mut frames = 0;
        let mut now = 0f64;
        loop {
            while let Some(press) = presses.next_if(|p| p.at <= now) {
                let Some(column) = self.column(&press) else {
                    log::debug!("unmapped key {:?} at {}ms", press.key, press.at);
                    continue;
                };
                let outcome = self.session.on_key_press(column, press.at);
                if let Outcome::Hit(hit) = &outcome {
                    log::info!(
                        "{:>8.1}ms  column {}  {:<7} {:+.1}ms",
                        press.at,
                        column,
                        hit.grade.name(),
                        hit.offset_ms
                    );
                    events.push(Event {
                        at: press.at,
                        outcome,
                    });
                }
            }

            let result = self.session.tick(now);
            frames += 1;
            if result.missed > 0 {
                log::info!("{:>8.1}ms  {} missed", now, result.missed);
                events.push(Event {
                    at: now,
                    outcome: Outcome::Miss {
                        count: result.missed,
                    },
                });
            }

            if now >= self.end_ms {
                break;
            }
            now = (now + self.frame_ms).min(self.end_ms);
        }

        Report {
            frames,
            events,
            summary: self.session.summary(),
        }
    }
}
