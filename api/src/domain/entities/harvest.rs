//! Harvest domain entity
//!
//! A harvest is one year's planting cycle on a property. It owns its planted
//! crops; the `property_id` field is only a back-reference.

use chrono::{DateTime, Datelike, Utc};

use super::ids::{HarvestId, PropertyId};
use super::planted_crop::PlantedCrop;
use crate::error::DomainError;

/// A single year's planting cycle on a property
#[derive(Debug, Clone, PartialEq)]
pub struct Harvest {
    id: HarvestId,
    property_id: PropertyId,
    year: i32,
    planted_crops: Vec<PlantedCrop>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Harvest {
    pub fn new(id: HarvestId, property_id: PropertyId, year: i32) -> Result<Self, DomainError> {
        if year < 0 {
            return Err(DomainError::Validation(format!(
                "harvest year must not be negative, got {}",
                year
            )));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            property_id,
            year,
            planted_crops: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Create a harvest for the current calendar year (UTC)
    pub fn for_current_year(id: HarvestId, property_id: PropertyId) -> Self {
        let now = Utc::now();
        Self {
            id,
            property_id,
            year: now.year(),
            planted_crops: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Append a crop, re-pointing its back-reference at this harvest
    pub fn add_planted_crop(&mut self, mut crop: PlantedCrop) {
        crop.attach_to(self.id);
        self.planted_crops.push(crop);
    }

    pub fn id(&self) -> HarvestId {
        self.id
    }

    pub fn property_id(&self) -> PropertyId {
        self.property_id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn planted_crops(&self) -> &[PlantedCrop] {
        &self.planted_crops
    }

    /// Crop names in planting order
    pub fn crop_names(&self) -> Vec<String> {
        self.planted_crops
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(super) fn attach_to(&mut self, property_id: PropertyId) {
        self.property_id = property_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PlantedCropId;

    #[test]
    fn harvest_rejects_negative_year() {
        let result = Harvest::new(HarvestId::new(), PropertyId::new(), -1);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn harvest_for_current_year() {
        let harvest = Harvest::for_current_year(HarvestId::new(), PropertyId::new());
        assert_eq!(harvest.year(), Utc::now().year());
        assert!(harvest.planted_crops().is_empty());
    }

    #[test]
    fn add_planted_crop_preserves_order_and_duplicates() {
        let mut harvest = Harvest::new(HarvestId::new(), PropertyId::new(), 2024).unwrap();
        for name in ["Soja", "Milho", "Soja"] {
            let crop = PlantedCrop::new(PlantedCropId::new(), HarvestId::new(), name, 0.0).unwrap();
            harvest.add_planted_crop(crop);
        }

        assert_eq!(harvest.crop_names(), vec!["Soja", "Milho", "Soja"]);
        assert!(harvest
            .planted_crops()
            .iter()
            .all(|c| c.harvest_id() == harvest.id()));
    }
}
