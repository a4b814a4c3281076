//! # OpenAlex Works MCP
//!
//! A Model Context Protocol (MCP) server exposing search and retrieval tools
//! for scholarly works from the OpenAlex dataset, shaped for token-constrained
//! agent consumers.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`client`]: OpenAlex REST client with retry, pagination, and the
//!   [`client::WorksBackend`] seam the tools are written against
//! - [`works`]: Shaping layer (abstract reconstruction, field selection,
//!   normalization, summaries)
//! - [`mcp`]: MCP protocol implementation and server
//! - [`config`]: Configuration management

pub mod client;
pub mod config;
pub mod mcp;
pub mod works;

// Re-export commonly used types
pub use client::{ClientError, OpenAlexClient, WorksBackend};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
