//! Inbound adapters: route pages, shared components, and the command line.

pub mod cli;
pub mod components;
pub mod pages;
