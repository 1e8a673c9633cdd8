//! Chatbridge core contracts and value types.
//!
//! This crate exposes the shared data structures exchanged between the
//! webhook surface and the reply pipeline: the inbound event model, the
//! domain reply messages and their Send API wire renderings, the delivery
//! plan used to pace outbound sends, the NLU result model with its reply
//! routing, the action catalog, and the traits the gateway's external
//! collaborators implement.

pub mod catalog;
pub mod channel;
pub mod event;
pub mod nlu;
pub mod plan;
pub mod render;
pub mod reply;

pub use catalog::*;
pub use channel::*;
pub use event::*;
pub use nlu::*;
pub use plan::*;
pub use reply::*;
