//! Chatbridge gateway: receives signed platform webhooks, resolves user text
//! through the NLU service, and relays formatted replies back through the
//! platform Send API.

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod email;
pub mod graph;
pub mod http;
pub mod nlu;
pub mod reqid;
pub mod router;
pub mod security;
pub mod sequencer;
pub mod telemetry;
