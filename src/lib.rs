// Crate root library declaration and module exports.
pub mod civil;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod rewrite;
pub mod round;
pub mod runner;
pub mod storage;
pub mod transcode;

pub use error::{CivilTimeError, RuleError, TranscodeError};
pub use rewrite::{RuleSet, RuleTables};
pub use transcode::{TranscodeOptions, Transcoded, transcode};
