//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod producer_repo;
pub mod schema;
pub mod seed;


pub use producer_repo::PostgresProducerRepository;
pub use schema::ensure_schema;
pub use seed::seed_demo_data;
