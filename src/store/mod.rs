pub mod json_store;
pub mod progress;
pub mod schema;

pub use json_store::JsonStore;
pub use progress::StoreSink;
