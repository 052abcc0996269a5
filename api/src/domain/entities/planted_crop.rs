//! Planted crop domain entity

use chrono::{DateTime, Utc};

use super::ids::{HarvestId, PlantedCropId};
use super::property::validate_area;
use crate::error::DomainError;

/// One crop and its planted area within a harvest
#[derive(Debug, Clone, PartialEq)]
pub struct PlantedCrop {
    id: PlantedCropId,
    harvest_id: HarvestId,
    name: String,
    area: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlantedCrop {
    pub fn new(
        id: PlantedCropId,
        harvest_id: HarvestId,
        name: impl Into<String>,
        area: f64,
    ) -> Result<Self, DomainError> {
        validate_area("crop area", area)?;
        let now = Utc::now();
        Ok(Self {
            id,
            harvest_id,
            name: name.into(),
            area,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    pub fn id(&self) -> PlantedCropId {
        self.id
    }

    pub fn harvest_id(&self) -> HarvestId {
        self.harvest_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(super) fn attach_to(&mut self, harvest_id: HarvestId) {
        self.harvest_id = harvest_id;
    }
}
