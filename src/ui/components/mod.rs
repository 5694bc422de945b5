pub mod menu;
pub mod options_bar;
pub mod progress_bar;
pub mod sentence_view;
pub mod summary;
pub mod task_review;
