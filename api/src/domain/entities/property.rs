//! Rural property (farm) domain entity
//!
//! A property belongs to exactly one producer and owns its harvests.
//! Arable and vegetation areas together may never exceed the total area.

use chrono::{DateTime, Utc};

use super::harvest::Harvest;
use super::ids::{ProducerId, PropertyId};
use crate::error::DomainError;

/// Rounding slack when comparing summed areas against the total
const AREA_TOLERANCE: f64 = 1e-9;

/// Reject areas that are negative, NaN or infinite
pub(super) fn validate_area(label: &str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::Validation(format!(
            "{} must be a non-negative number, got {}",
            label, value
        )));
    }
    Ok(())
}

/// Data needed to create a property
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub name: String,
    pub state: String,
    pub city: String,
    pub total_area: f64,
    pub arable_area: f64,
    pub vegetation_area: f64,
}

/// A rural property owned by a producer
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    id: PropertyId,
    producer_id: ProducerId,
    name: String,
    state: String,
    city: String,
    total_area: f64,
    arable_area: f64,
    vegetation_area: f64,
    harvests: Vec<Harvest>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Property {
    pub fn new(
        id: PropertyId,
        producer_id: ProducerId,
        fields: NewProperty,
    ) -> Result<Self, DomainError> {
        validate_area("total area", fields.total_area)?;
        validate_area("arable area", fields.arable_area)?;
        validate_area("vegetation area", fields.vegetation_area)?;

        if fields.arable_area + fields.vegetation_area > fields.total_area + AREA_TOLERANCE {
            return Err(DomainError::Validation(
                "arable area plus vegetation area must not exceed total area".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            producer_id,
            name: fields.name,
            state: fields.state,
            city: fields.city,
            total_area: fields.total_area,
            arable_area: fields.arable_area,
            vegetation_area: fields.vegetation_area,
            harvests: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Append a harvest, re-pointing its back-reference at this property
    pub fn add_harvest(&mut self, mut harvest: Harvest) {
        harvest.attach_to(self.id);
        self.harvests.push(harvest);
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn producer_id(&self) -> ProducerId {
        self.producer_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn total_area(&self) -> f64 {
        self.total_area
    }

    pub fn arable_area(&self) -> f64 {
        self.arable_area
    }

    pub fn vegetation_area(&self) -> f64 {
        self.vegetation_area
    }

    pub fn harvests(&self) -> &[Harvest] {
        &self.harvests
    }

    /// The first harvest recorded for this property, if any
    pub fn first_harvest(&self) -> Option<&Harvest> {
        self.harvests.first()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(super) fn attach_to(&mut self, producer_id: ProducerId) {
        self.producer_id = producer_id;
    }
}
