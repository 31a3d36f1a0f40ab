//! Gallery client library: domain, ports, and adapters for the gallery RPC
//! backend.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
