pub mod action_log;
pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod io;
pub mod ops;
pub mod parse;
pub mod paths;
pub mod policy;

pub use error::{ErrorKind, LagoonError, Result};
