// Web Interface module root
pub mod assets;
pub mod handlers;
pub mod routes;
pub mod templates;
pub mod types;
pub mod web_server;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use routes::routes;
pub use types::{AppState, FormParams};
pub use web_server::WebServer;
