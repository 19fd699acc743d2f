#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod parser;
pub mod scheduler;
pub mod time;

pub use error::ParseError;
pub use parser::{ParseReport, Parsed, parse, parse_csv, parse_text, parse_with_report};
pub use scheduler::{RetryEntry, RetryQueue, Scheduler};
pub use time::Clock;
