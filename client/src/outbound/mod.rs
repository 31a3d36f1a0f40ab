//! Outbound adapters implementing domain ports.
//!
//! - `connect`: Connect RPC client for the remote gallery services.
//! - `storage`: local storage for the persisted session.

pub mod connect;
pub mod storage;
