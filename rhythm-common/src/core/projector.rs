//! Screen-space placement of pending notes
//!
//! Positions are in clip space (`[-1, 1]` on both axes). A note spawns at
//! `base_y + t * speed` and scrolls down at `speed` units per second, so it
//! crosses the target row exactly at its scheduled time.

use super::{Note, Point};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// X of lane 0
    pub base_x: f64,
    pub column_spacing: f64,
    /// Y of the target row
    pub base_y: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            base_x: -0.85,
            column_spacing: 0.5,
            base_y: -0.75,
        }
    }
}

impl Layout {
    /// Layout whose target row sits `target_y` above the bottom edge.
    pub fn with_target_offset(target_y: f64) -> Self {
        Self {
            base_y: target_y - 1.,
            ..Self::default()
        }
    }

    #[inline]
    pub fn column_x(&self, column: usize) -> f64 {
        self.base_x + column as f64 * self.column_spacing
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projector {
    pub layout: Layout,
    /// Scroll speed in clip-space units per second.
    pub y_distance_per_second: f64,
}

impl Projector {
    pub fn new(layout: Layout, y_distance_per_second: f64) -> Self {
        Self {
            layout,
            y_distance_per_second,
        }
    }

    /// Scroll speed that carries a note across the visible area, from the
    /// top edge down to the target row, in `duration_secs`.
    pub fn speed_for(target_y: f64, duration_secs: f64) -> f64 {
        (crate::CLIP_HEIGHT - target_y) / duration_secs
    }

    /// Static spawn position; the renderer may subtract the scroll itself.
    pub fn spawn_position(&self, note: &Note) -> Point {
        self.position_at(note, 0.)
    }

    /// Where `note` is on screen at `elapsed_ms`.
    pub fn position_at(&self, note: &Note, elapsed_ms: f64) -> Point {
        let x = self.layout.column_x(note.column);
        let y = self.layout.base_y + (note.ms - elapsed_ms) / 1000. * self.y_distance_per_second;
        Point::new(x as f32, y as f32)
    }

    /// Current positions of every note still pending in `notes`.
    pub fn project<'a, I>(&'a self, notes: I, elapsed_ms: f64) -> impl Iterator<Item = Point> + 'a
    where
        I: IntoIterator<Item = &'a Note>,
        I::IntoIter: 'a,
    {
        notes
            .into_iter()
            .filter(|n| n.is_pending())
            .map(move |n| self.position_at(n, elapsed_ms))
    }
}
