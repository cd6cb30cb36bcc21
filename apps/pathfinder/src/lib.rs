pub mod api_client;
pub mod auth;
pub mod chips;
pub mod config;
pub mod errors;
pub mod notice;
pub mod profile;
pub mod recommendation;
pub mod render;
pub mod session;
pub mod state;
pub mod suggestions;
