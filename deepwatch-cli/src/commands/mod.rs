//! CLI command implementations.

pub mod view;
pub mod watch;

pub use view::view_path;
pub use watch::{watch_document, WatchOptions};
