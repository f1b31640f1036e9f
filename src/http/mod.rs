/// HTTP boundary: browse, search and health endpoints over the catalog

pub mod handlers;
pub mod server;

pub use server::{router, serve, AppState};
