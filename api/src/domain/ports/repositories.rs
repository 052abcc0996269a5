//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;

use crate::domain::entities::{Producer, ProducerId};
use crate::error::DomainError;

/// Repository for the producer aggregate.
///
/// Producers returned by the finders are fully hydrated: properties, their
/// harvests and the harvests' planted crops, each in insertion order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProducerRepository: Send + Sync {
    /// Persist a producer together with its whole property graph.
    ///
    /// Fails with `DomainError::Conflict` when the document is already taken.
    async fn create(&self, producer: &Producer) -> Result<(), DomainError>;

    /// Find a producer by ID
    async fn find_by_id(&self, id: &ProducerId) -> Result<Option<Producer>, DomainError>;

    /// Update the producer's own fields (name, document, timestamps)
    async fn update(&self, producer: &Producer) -> Result<(), DomainError>;

    /// Delete a producer, cascading to everything it owns.
    ///
    /// Fails with `DomainError::NotFound` when no such producer exists.
    async fn delete(&self, id: &ProducerId) -> Result<(), DomainError>;

    /// Every producer, oldest first
    async fn find_all(&self) -> Result<Vec<Producer>, DomainError>;
}
