//! CardForge HTTP gateway: card API routes, media serving, static
//! front-end, and error mapping.

pub mod cards_api;
pub mod error;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, build_router, start_server};
