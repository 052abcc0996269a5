//! Demo data
//!
//! Replaces every stored producer with two sample producers, one per
//! document kind, each owning a farm with a harvest of crops with real areas.
//! Enabled with `SEED_DEMO_DATA=true`.

use sea_orm::{DatabaseConnection, EntityTrait};

use super::PostgresProducerRepository;
use crate::domain::entities::{
    Harvest, HarvestId, NewProperty, PlantedCrop, PlantedCropId, Producer, ProducerId, Property,
    PropertyId,
};
use crate::domain::ports::ProducerRepository;
use crate::entity::producers;
use crate::error::DomainError;

struct DemoFarm {
    name: &'static str,
    state: &'static str,
    city: &'static str,
    total_area: f64,
    arable_area: f64,
    vegetation_area: f64,
    year: i32,
    crops: &'static [(&'static str, f64)],
}

const DEMO_PRODUCERS: [(&str, &str, DemoFarm); 2] = [
    (
        "João Silva",
        "12345678901",
        DemoFarm {
            name: "Fazenda Primavera",
            state: "SP",
            city: "Ribeirão Preto",
            total_area: 100.0,
            arable_area: 60.0,
            vegetation_area: 30.0,
            year: 2024,
            crops: &[("Soja", 30.0), ("Milho", 30.0)],
        },
    ),
    (
        "Fazenda Bom Futuro",
        "12345678000199",
        DemoFarm {
            name: "Fazenda Horizonte",
            state: "MT",
            city: "Cuiabá",
            total_area: 200.0,
            arable_area: 120.0,
            vegetation_area: 60.0,
            year: 2024,
            crops: &[("Algodão", 50.0), ("Soja", 70.0)],
        },
    ),
];

fn build_farm(producer_id: ProducerId, farm: &DemoFarm) -> Result<Property, DomainError> {
    let mut property = Property::new(
        PropertyId::new(),
        producer_id,
        NewProperty {
            name: farm.name.to_string(),
            state: farm.state.to_string(),
            city: farm.city.to_string(),
            total_area: farm.total_area,
            arable_area: farm.arable_area,
            vegetation_area: farm.vegetation_area,
        },
    )?;

    let mut harvest = Harvest::new(HarvestId::new(), property.id(), farm.year)?;
    for &(name, area) in farm.crops {
        harvest.add_planted_crop(PlantedCrop::new(
            PlantedCropId::new(),
            harvest.id(),
            name,
            area,
        )?);
    }
    property.add_harvest(harvest);

    Ok(property)
}

/// Build the demo producers through the entity constructors
pub fn demo_producers() -> Result<Vec<Producer>, DomainError> {
    DEMO_PRODUCERS
        .iter()
        .map(|(name, document, farm)| {
            let id = ProducerId::new();
            let property = build_farm(id, farm)?;
            Producer::new(id, *name, *document, vec![property])
        })
        .collect()
}

/// Delete all producers (children cascade) and insert the demo set.
/// Returns the number of producers inserted.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<usize, DomainError> {
    let producers = demo_producers()?;

    let removed = producers::Entity::delete_many()
        .exec(db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;
    tracing::info!(removed = removed.rows_affected, "Cleared stored producers");

    let repo = PostgresProducerRepository::new(db.clone());
    for producer in &producers {
        repo.create(producer).await?;
    }

    tracing::info!(count = producers.len(), "Demo data seeded");
    Ok(producers.len())
}
