//! Resume field extraction module.

mod parser;
pub mod rules;
pub mod scoring;

pub use parser::{log_parse_result, panic_message, ParseOutcome, ResumeParser};
