pub use crate::Point;

mod judge;
pub use judge::{Grade, Timing, Tolerances};

mod note;
pub use note::{Note, NoteId, NoteState};

mod note_set;
pub use note_set::NoteSet;

mod resolver;
pub use resolver::{resolve, HitResult, Outcome};

mod sweeper;
pub use sweeper::sweep;

mod projector;
pub use projector::{Layout, Projector};

mod score;
pub use score::{apply, Feedback, ScoreEvent, SessionState};

mod summary;
pub use summary::SessionSummary;
