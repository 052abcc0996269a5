//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod dashboard;
pub mod producers;

pub use dashboard::get_dashboard;
pub use producers::{
    create_producer, delete_producer, get_producer, list_producers, update_producer,
};
