//! Configuration-driven terminal menu for launching architecture-specific
//! tools out of a tool package.

pub mod arch;
pub mod config;
pub mod error;
pub mod executor;
pub mod menu;
pub mod navigator;
pub mod package;
pub mod select;
pub mod terminal;

#[cfg(test)]
mod test_support;

pub use error::{NavError, Result};
