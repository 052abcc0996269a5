//! Producer service
//!
//! Create, update, delete and lookup of rural producers. The whole property
//! graph of a new producer is assembled and validated here before a single
//! repository call persists it.

use std::sync::Arc;

use crate::domain::entities::{
    validate_document, Harvest, HarvestId, NewProperty, PlantedCrop, PlantedCropId, Producer,
    ProducerId, Property, PropertyId,
};
use crate::domain::ports::ProducerRepository;
use crate::error::{AppError, DomainError};

/// A farm submitted alongside a new producer
#[derive(Debug, Clone)]
pub struct NewFarm {
    pub name: String,
    pub state: String,
    pub city: String,
    pub total_area: f64,
    pub arable_area: f64,
    pub vegetation_area: f64,
    /// Crop names planted this year; each becomes a crop with zero area
    pub crops: Vec<String>,
}

/// Data needed to register a producer
#[derive(Debug, Clone)]
pub struct CreateProducer {
    pub name: String,
    pub document: String,
    pub farms: Option<Vec<NewFarm>>,
}

/// Partial update of a producer's own fields
#[derive(Debug, Clone, Default)]
pub struct UpdateProducer {
    pub name: Option<String>,
    pub document: Option<String>,
}

/// Build the property for a submitted farm, with a current-year harvest when
/// crops were listed
fn build_property(producer_id: ProducerId, farm: NewFarm) -> Result<Property, DomainError> {
    let mut property = Property::new(
        PropertyId::new(),
        producer_id,
        NewProperty {
            name: farm.name,
            state: farm.state,
            city: farm.city,
            total_area: farm.total_area,
            arable_area: farm.arable_area,
            vegetation_area: farm.vegetation_area,
        },
    )?;

    if !farm.crops.is_empty() {
        let mut harvest = Harvest::for_current_year(HarvestId::new(), property.id());
        for crop in farm.crops {
            harvest.add_planted_crop(PlantedCrop::new(
                PlantedCropId::new(),
                harvest.id(),
                crop,
                0.0,
            )?);
        }
        property.add_harvest(harvest);
    }

    Ok(property)
}

/// Service for managing rural producers
pub struct ProducerService<PR>
where
    PR: ProducerRepository,
{
    producers: Arc<PR>,
}

impl<PR> ProducerService<PR>
where
    PR: ProducerRepository,
{
    pub fn new(producers: Arc<PR>) -> Self {
        Self { producers }
    }

    /// Register a producer with its farms
    ///
    /// The document is checked before anything else is built. A duplicate
    /// document comes back from the repository as `DomainError::Conflict`
    /// and is returned unchanged.
    pub async fn create(&self, input: CreateProducer) -> Result<Producer, AppError> {
        tracing::debug!(
            name = %input.name,
            farms = input.farms.as_ref().map_or(0, |f| f.len()),
            "Creating producer"
        );

        validate_document(&input.document)?;

        let id = ProducerId::new();
        let properties = input
            .farms
            .unwrap_or_default()
            .into_iter()
            .map(|farm| build_property(id, farm))
            .collect::<Result<Vec<_>, _>>()?;

        let producer = Producer::new(id, input.name, input.document, properties)?;

        self.producers.create(&producer).await.map_err(|e| {
            match &e {
                DomainError::Conflict(_) => {
                    tracing::warn!(document = %producer.document(), "Duplicate producer document")
                }
                _ => tracing::error!(error = %e, "Failed to persist producer"),
            }
            e
        })?;

        tracing::info!(producer_id = %producer.id(), "Producer created");
        Ok(producer)
    }

    /// Apply a partial update. Nothing is written when the producer is missing
    /// or a field fails validation.
    pub async fn update(&self, id: &ProducerId, input: UpdateProducer) -> Result<Producer, AppError> {
        let mut producer = self.producers.find_by_id(id).await?.ok_or_else(|| {
            tracing::warn!(producer_id = %id, "Producer not found for update");
            DomainError::NotFound(format!("Producer {} not found", id))
        })?;

        if let Some(name) = input.name {
            producer.rename(name)?;
        }
        if let Some(document) = input.document {
            producer.change_document(document)?;
        }

        self.producers.update(&producer).await.map_err(|e| {
            tracing::error!(producer_id = %id, error = %e, "Failed to update producer");
            e
        })?;

        tracing::info!(producer_id = %id, "Producer updated");
        Ok(producer)
    }

    /// Delete a producer and everything it owns
    pub async fn delete(&self, id: &ProducerId) -> Result<(), AppError> {
        self.producers.delete(id).await.map_err(|e| {
            match &e {
                DomainError::NotFound(_) => {
                    tracing::warn!(producer_id = %id, "Producer not found for delete")
                }
                _ => tracing::error!(producer_id = %id, error = %e, "Failed to delete producer"),
            }
            e
        })?;

        tracing::info!(producer_id = %id, "Producer deleted");
        Ok(())
    }

    /// Get a single producer with its farms
    pub async fn get(&self, id: &ProducerId) -> Result<Producer, AppError> {
        self.producers.find_by_id(id).await?.ok_or_else(|| {
            tracing::warn!(producer_id = %id, "Producer not found");
            AppError::Domain(DomainError::NotFound(format!("Producer {} not found", id)))
        })
    }

    /// List every producer
    pub async fn list(&self) -> Result<Vec<Producer>, AppError> {
        Ok(self.producers.find_all().await?)
    }
}
