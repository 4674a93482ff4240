//! HTTP surface for GifStream.
//!
//! Accepts GIF uploads, serves originals and PNG stills by key, lists
//! every stored key and pushes newly stored keys over a WebSocket.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod transport;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use server::GifStreamServer;
pub use transport::WsTransport;
