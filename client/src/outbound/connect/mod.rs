//! Connect protocol adapter for the gallery backend.
//!
//! Unary Connect calls are JSON POSTs to `{base}/{package.Service}/{Method}`.
//! The transport handles the wire; the client maps each procedure onto the
//! domain ports.

mod client;
mod dto;
mod transport;

pub use client::{AUTH_SERVICE, ConnectGalleryClient, IMAGE_SERVICE, USER_SERVICE};
pub use transport::{
    ConnectTransport, PROTOCOL_VERSION_HEADER, TransportError, USER_ID_HEADER,
};
