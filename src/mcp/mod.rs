//! MCP protocol implementation and server.

pub mod server;
pub mod tools;
pub mod work_tools;

pub use server::McpServer;
pub use tools::{Tool, ToolHandler, ToolRegistry};
