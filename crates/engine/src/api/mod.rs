//! Entry points: HTTP health route and the WebSocket table endpoint.

pub mod connections;
pub mod http;
pub mod websocket;

pub use connections::ConnectionManager;
