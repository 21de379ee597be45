//! WatchTower Logs - Stream store bootstrap, appends and tailing

mod bootstrap;
mod reader;
mod writer;

pub use bootstrap::{ensure_store, store_status, BootstrapReport, StreamStatus};
pub use reader::LogReader;
pub use writer::LogWriter;
