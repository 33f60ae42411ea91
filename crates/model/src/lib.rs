//! The boundary between a conversational agent and a hosted chat model.
//!
//! This crate establishes an unified protocol for the agent to talk to
//! any chat-completion endpoint, so that the agent can switch between
//! providers (or a local fake) without modifying the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to. Provider-specific
//! shapes (raw HTTP, streaming, SDK objects) never cross this boundary,
//! only reply text and optional token counts do.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;
mod turn;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
pub use turn::*;
