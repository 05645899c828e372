//! # GameWire Session Layer
//!
//! Connection phase tracking and packet dispatch for GameWire endpoints.
//!
//! ## Modules
//!
//! - [`config`] - Endpoint dispatch configuration
//! - [`connection`] - Per-connection phase state machine
//! - [`dispatch`] - Handler/event routing, real-time and batched delivery
//!
//! The transport loop (sockets, TLS, compression) lives outside this
//! crate; it hands decoded byte streams to [`Dispatcher::receive`] and
//! calls [`Dispatcher::tick`] from its game loop when running batched.

pub mod config;
pub mod connection;
pub mod dispatch;

// Re-export commonly used items
pub use config::{DispatchMode, EndpointConfig};
pub use connection::Connection;
pub use dispatch::{DispatchOutcome, Dispatcher, Handler, Listener};
