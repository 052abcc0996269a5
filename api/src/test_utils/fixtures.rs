//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use crate::app::NewFarm;
use crate::domain::entities::{
    Harvest, HarvestId, NewProperty, PlantedCrop, PlantedCropId, Producer, ProducerId, Property,
    PropertyId,
};

/// Create a producer with a short-form document and no farms
pub fn test_producer() -> Producer {
    Producer::new(ProducerId::new(), "João da Silva", "12345678901", vec![]).unwrap()
}

/// Create a producer with the given document and farms
pub fn test_producer_with_farms(document: &str, farms: Vec<FarmFixture>) -> Producer {
    let id = ProducerId::new();
    let properties = farms.into_iter().map(|f| f.build(id)).collect();
    Producer::new(id, format!("Produtor {}", document), document, properties).unwrap()
}

/// Create a farm submission for the producer service
pub fn new_farm(state: &str, total: f64, arable: f64, vegetation: f64, crops: &[&str]) -> NewFarm {
    NewFarm {
        name: format!("Fazenda {}", state),
        state: state.to_string(),
        city: String::new(),
        total_area: total,
        arable_area: arable,
        vegetation_area: vegetation,
        crops: crops.iter().map(|c| c.to_string()).collect(),
    }
}

/// Builder for a property with harvests
pub struct FarmFixture {
    state: String,
    total_area: f64,
    arable_area: f64,
    vegetation_area: f64,
    harvests: Vec<(Option<i32>, Vec<String>)>,
}

impl FarmFixture {
    pub fn new(state: &str, total: f64, arable: f64, vegetation: f64) -> Self {
        Self {
            state: state.to_string(),
            total_area: total,
            arable_area: arable,
            vegetation_area: vegetation,
            harvests: Vec::new(),
        }
    }

    /// Add a current-year harvest with the given crops
    pub fn with_crops(mut self, crops: &[&str]) -> Self {
        self.harvests
            .push((None, crops.iter().map(|c| c.to_string()).collect()));
        self
    }

    /// Add a harvest for a specific year
    pub fn with_harvest(mut self, year: i32, crops: &[&str]) -> Self {
        self.harvests
            .push((Some(year), crops.iter().map(|c| c.to_string()).collect()));
        self
    }

    pub fn build(self, producer_id: ProducerId) -> Property {
        let mut property = Property::new(
            PropertyId::new(),
            producer_id,
            NewProperty {
                name: format!("Fazenda {}", self.state),
                state: self.state,
                city: "Cidade".to_string(),
                total_area: self.total_area,
                arable_area: self.arable_area,
                vegetation_area: self.vegetation_area,
            },
        )
        .unwrap();

        for (year, crops) in self.harvests {
            let mut harvest = match year {
                Some(year) => Harvest::new(HarvestId::new(), property.id(), year).unwrap(),
                None => Harvest::for_current_year(HarvestId::new(), property.id()),
            };
            for crop in crops {
                harvest.add_planted_crop(
                    PlantedCrop::new(PlantedCropId::new(), harvest.id(), crop, 10.0).unwrap(),
                );
            }
            property.add_harvest(harvest);
        }

        property
    }
}
