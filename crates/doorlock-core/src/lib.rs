//! Shared building blocks for the door lock controller.
//!
//! This crate holds the pieces every other crate in the workspace agrees on:
//! the construction-time [`Error`] type, the build-time [`constants`], the
//! [`LockConfig`](config::LockConfig) that gathers them, and small value types
//! such as [`KeypadInput`], [`Credential`] and [`Deadline`].

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::{ActuatorKind, LockConfig, LockConfigBuilder};
pub use error::{Error, Result};
pub use types::*;
