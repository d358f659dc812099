pub mod cache;
pub mod config;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod validate;
