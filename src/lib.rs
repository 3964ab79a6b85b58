//! A viewer for a read-only user/post/comment API with durable favorites.
//!
//! The library holds the state components (favorites store, debouncer,
//! query/location sync, post cache, API gateway); [`routes`] exposes them as
//! JSON views over HTTP.

pub mod cache;
pub mod config;
pub mod debounce;
pub mod dto;
pub mod errors;
pub mod favorites;
pub mod gateway;
pub mod models;
pub mod query;
pub mod routes;
pub mod search;
pub mod states;

pub use routes::router;
pub use states::AppState;
