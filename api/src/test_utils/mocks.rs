//! In-memory implementations of port traits
//!
//! These store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{Producer, ProducerId};
use crate::domain::ports::ProducerRepository;
use crate::error::DomainError;

// ============================================================================
// In-Memory Producer Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryProducerRepository {
    producers: Arc<RwLock<Vec<Producer>>>,
    should_fail: bool,
}

impl InMemoryProducerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every call fails with a database error
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Pre-populate with a producer for testing
    pub fn with_producer(self, producer: Producer) -> Self {
        self.producers.write().unwrap().push(producer);
        self
    }

    /// Number of stored producers
    pub fn len(&self) -> usize {
        self.producers.read().unwrap().len()
    }

    /// Number of stored properties across every producer
    pub fn property_count(&self) -> usize {
        self.producers
            .read()
            .unwrap()
            .iter()
            .map(|p| p.properties().len())
            .sum()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.should_fail {
            Err(DomainError::Database("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProducerRepository for InMemoryProducerRepository {
    async fn create(&self, producer: &Producer) -> Result<(), DomainError> {
        self.check()?;
        let mut producers = self.producers.write().unwrap();

        if producers.iter().any(|p| p.document() == producer.document()) {
            return Err(DomainError::Conflict(format!(
                "A producer with document {} already exists",
                producer.document()
            )));
        }

        producers.push(producer.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ProducerId) -> Result<Option<Producer>, DomainError> {
        self.check()?;
        let producers = self.producers.read().unwrap();
        Ok(producers.iter().find(|p| p.id() == *id).cloned())
    }

    async fn update(&self, producer: &Producer) -> Result<(), DomainError> {
        self.check()?;
        let mut producers = self.producers.write().unwrap();

        if producers
            .iter()
            .any(|p| p.id() != producer.id() && p.document() == producer.document())
        {
            return Err(DomainError::Conflict(format!(
                "A producer with document {} already exists",
                producer.document()
            )));
        }

        match producers.iter_mut().find(|p| p.id() == producer.id()) {
            Some(existing) => {
                *existing = producer.clone();
                Ok(())
            }
            None => Err(DomainError::NotFound(format!(
                "Producer {} not found",
                producer.id()
            ))),
        }
    }

    async fn delete(&self, id: &ProducerId) -> Result<(), DomainError> {
        self.check()?;
        let mut producers = self.producers.write().unwrap();

        let before = producers.len();
        producers.retain(|p| p.id() != *id);
        if producers.len() == before {
            Err(DomainError::NotFound(format!("Producer {} not found", id)))
        } else {
            Ok(())
        }
    }

    async fn find_all(&self) -> Result<Vec<Producer>, DomainError> {
        self.check()?;
        Ok(self.producers.read().unwrap().clone())
    }
}
