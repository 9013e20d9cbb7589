//! Interactive command session: parsing, execution, batch files and text
//! reports.

pub mod batch;
pub mod command;
pub mod config;
pub mod processor;
pub mod report;

pub use batch::{BatchReport, MAX_LOAD_DEPTH};
pub use command::{ChangeOp, Command, HELP_TEXT};
pub use config::SessionConfig;
pub use processor::{Reply, Session};
