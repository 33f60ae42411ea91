//! Core logic of a conversational agent: transcript memory, skill routing,
//! and the exchange with the completion service.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod agent;
mod completion_client;
pub mod conversation;
mod error;
mod profile;
pub mod router;

pub use agent::{Agent, AgentBuilder, AgentStats, DEFAULT_REFUSAL_PLACEHOLDER};
pub use conversation::{ContextWindow, Conversation};
pub use error::Error;
pub use profile::InstructionProfile;
pub use router::SkillRouter;
