pub mod editor;
pub mod grader;
pub mod highlight;
pub mod punctuation;
pub mod scoring;

pub use editor::EditOutcome;
pub use highlight::{Highlight, HighlightId, HighlightSet};
