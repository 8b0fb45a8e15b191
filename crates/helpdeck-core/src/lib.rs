//! HelpDeck Core — shared configuration and error types.

pub mod config;
pub mod error;

pub use config::{DataPaths, HelpDeckConfig};
pub use error::{Error, Result};
