//! Test utilities
//!
//! In-memory repository and test fixtures for unit testing.
//!
//! Service and HTTP tests run against `InMemoryProducerRepository`, which
//! enforces the same document uniqueness and cascade rules as the database.
//! `MockProducerRepository` (mockall) is used where a test must prove a call
//! never happens.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
