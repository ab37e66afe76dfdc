//! Network Layer
//!
//! WebSocket server and the JSON protocol it speaks. Requests are dispatched
//! to [`LedgerService`], which owns the store.

pub mod protocol;
pub mod server;
pub mod service;

pub use protocol::{ClientMessage, ErrorCode, ServerError, ServerMessage};
pub use server::{LedgerServer, LedgerServerError, ServerConfig};
pub use service::{LedgerService, SharedStore};
