pub mod exercise;
pub mod result;
pub mod sink;
pub mod timer;

pub use exercise::{ExerciseSession, Feedback, Mode, Verdict};
pub use result::{FinishReason, SessionResult};
pub use sink::{BackgroundSink, Identity, NullSink, ProgressSink};
pub use timer::Countdown;
