//! Domain entities
//!
//! Pure domain models for producers and the farms, harvests and crops they own.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod document;
pub mod harvest;
pub mod ids;
pub mod planted_crop;
pub mod producer;
pub mod property;

pub use document::{validate_document, DocumentKind};
pub use harvest::Harvest;
pub use ids::{HarvestId, PlantedCropId, ProducerId, PropertyId};
pub use planted_crop::PlantedCrop;
pub use producer::Producer;
pub use property::{NewProperty, Property};
