//! An out-of-the-box assistant that remembers the conversation and routes
//! requests to specialized skills.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to bring the assistant into your own host apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod presets;
mod session;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`recall_core`] crate.
pub mod core {
    pub use recall_core::*;
}
