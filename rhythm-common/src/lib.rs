//! Rhythm Lanes - Common Types & Logic
//!
//! Note timing and scoring engine shared by the browser client and the
//! headless simulator. Nothing in here touches a clock, a canvas or the DOM:
//! hosts feed elapsed milliseconds in and read grades and positions out.

pub mod config;
pub mod core;
pub mod keymap;
pub mod session;
pub mod store;

pub use anyhow::{bail, Result};
pub type Point = nalgebra::Point2<f32>;

/// Number of lanes in the default layout.
pub const COLUMN_COUNT: usize = 4;

/// Height of the clip-space viewport (`[-1, 1]`).
pub const CLIP_HEIGHT: f64 = 2.0;

pub use config::GameConfig;
pub use keymap::KeyMap;
pub use session::{Session, TickResult};
pub use store::{Store, SubscriptionId};
