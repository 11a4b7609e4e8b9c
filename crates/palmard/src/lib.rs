//! palmard — hand-recognition check-in daemon.
//!
//! Wires the palmar-core matching pipeline to a persistent hand-record
//! store and exposes the capture/registration API over HTTP.

pub mod config;
pub mod engine;
pub mod http_interface;
