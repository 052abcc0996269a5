//! Dashboard service
//!
//! Reduces the whole producer dataset into the summary shown on the
//! dashboard: farm count, hectares, farms per state, crop frequencies and
//! land use totals.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::entities::Producer;
use crate::domain::ports::ProducerRepository;
use crate::error::AppError;

/// Number of farms in a state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateCount {
    pub state: String,
    pub count: u64,
}

/// Number of times a crop was planted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropCount {
    pub crop: String,
    pub count: u64,
}

/// Land use category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LandUseType {
    Arable,
    Vegetation,
}

/// Hectares allocated to a land use category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandUse {
    #[serde(rename = "type")]
    pub kind: LandUseType,
    pub total: f64,
}

/// Aggregated statistics across every producer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_farms: u64,
    pub total_hectares: f64,
    /// One entry per distinct state, in order of first appearance
    pub by_state: Vec<StateCount>,
    /// One entry per distinct crop name, in order of first appearance
    pub by_crop: Vec<CropCount>,
    /// Always arable then vegetation
    pub land_use: Vec<LandUse>,
}

/// Frequency table that remembers first-occurrence order
#[derive(Default)]
struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl Tally {
    fn bump(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    fn into_entries(self) -> Vec<(String, u64)> {
        self.entries
    }
}

/// Single pass over the dataset.
///
/// Keys are compared exactly (case-sensitive, untrimmed). Crops are counted
/// across every harvest of every property.
pub fn compute_dashboard(producers: &[Producer]) -> DashboardSummary {
    let mut total_farms = 0u64;
    let mut total_hectares = 0.0;
    let mut arable = 0.0;
    let mut vegetation = 0.0;
    let mut states = Tally::default();
    let mut crops = Tally::default();

    for property in producers.iter().flat_map(|p| p.properties()) {
        total_farms += 1;
        total_hectares += property.total_area();
        arable += property.arable_area();
        vegetation += property.vegetation_area();
        states.bump(property.state());

        for crop in property
            .harvests()
            .iter()
            .flat_map(|h| h.planted_crops())
        {
            crops.bump(crop.name());
        }
    }

    DashboardSummary {
        total_farms,
        total_hectares,
        by_state: states
            .into_entries()
            .into_iter()
            .map(|(state, count)| StateCount { state, count })
            .collect(),
        by_crop: crops
            .into_entries()
            .into_iter()
            .map(|(crop, count)| CropCount { crop, count })
            .collect(),
        land_use: vec![
            LandUse {
                kind: LandUseType::Arable,
                total: arable,
            },
            LandUse {
                kind: LandUseType::Vegetation,
                total: vegetation,
            },
        ],
    }
}

/// Service computing dashboard statistics
pub struct DashboardService<PR>
where
    PR: ProducerRepository,
{
    producers: Arc<PR>,
}

impl<PR> DashboardService<PR>
where
    PR: ProducerRepository,
{
    pub fn new(producers: Arc<PR>) -> Self {
        Self { producers }
    }

    /// Fetch every producer and aggregate. Fetch failures propagate as-is.
    pub async fn get_dashboard(&self) -> Result<DashboardSummary, AppError> {
        tracing::info!("Computing dashboard summary");

        let producers = self.producers.find_all().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to load producers for dashboard");
            e
        })?;

        let summary = compute_dashboard(&producers);
        tracing::info!(
            total_farms = summary.total_farms,
            producers = producers.len(),
            "Dashboard summary computed"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use crate::test_utils::{test_producer_with_farms, FarmFixture, InMemoryProducerRepository};

    fn sample_dataset() -> Vec<Producer> {
        vec![
            test_producer_with_farms(
                "12345678901",
                vec![
                    FarmFixture::new("GO", 100.0, 60.0, 40.0).with_crops(&["Soja", "Milho"]),
                    FarmFixture::new("MT", 50.0, 30.0, 20.0).with_crops(&["Soja"]),
                ],
            ),
            test_producer_with_farms(
                "12345678000199",
                vec![FarmFixture::new("GO", 80.0, 50.0, 30.0).with_crops(&["Milho"])],
            ),
        ]
    }

    #[test]
    fn aggregates_sample_dataset() {
        let summary = compute_dashboard(&sample_dataset());

        assert_eq!(summary.total_farms, 3);
        assert_eq!(summary.total_hectares, 230.0);

        assert_eq!(summary.by_state.len(), 2);
        assert!(summary.by_state.contains(&StateCount {
            state: "GO".to_string(),
            count: 2
        }));
        assert!(summary.by_state.contains(&StateCount {
            state: "MT".to_string(),
            count: 1
        }));

        assert_eq!(summary.by_crop.len(), 2);
        assert!(summary.by_crop.contains(&CropCount {
            crop: "Soja".to_string(),
            count: 2
        }));
        assert!(summary.by_crop.contains(&CropCount {
            crop: "Milho".to_string(),
            count: 2
        }));

        assert_eq!(
            summary.land_use,
            vec![
                LandUse {
                    kind: LandUseType::Arable,
                    total: 140.0
                },
                LandUse {
                    kind: LandUseType::Vegetation,
                    total: 90.0
                },
            ]
        );
    }

    #[test]
    fn empty_dataset_still_reports_land_use() {
        let summary = compute_dashboard(&[]);
        assert_eq!(summary.total_farms, 0);
        assert_eq!(summary.total_hectares, 0.0);
        assert!(summary.by_state.is_empty());
        assert!(summary.by_crop.is_empty());
        assert_eq!(summary.land_use.len(), 2);
        assert!(summary.land_use.iter().all(|l| l.total == 0.0));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let producers = vec![test_producer_with_farms(
            "12345678901",
            vec![
                FarmFixture::new("go", 1.0, 0.0, 0.0).with_crops(&["soja"]),
                FarmFixture::new("GO", 1.0, 0.0, 0.0).with_crops(&["Soja"]),
            ],
        )];

        let summary = compute_dashboard(&producers);
        assert_eq!(summary.by_state.len(), 2);
        assert_eq!(summary.by_crop.len(), 2);
    }

    #[test]
    fn crops_are_counted_across_every_harvest() {
        let producers = vec![test_producer_with_farms(
            "12345678901",
            vec![FarmFixture::new("PR", 10.0, 5.0, 5.0)
                .with_crops(&["Soja"])
                .with_harvest(2023, &["Soja", "Trigo"])],
        )];

        let summary = compute_dashboard(&producers);
        assert!(summary.by_crop.contains(&CropCount {
            crop: "Soja".to_string(),
            count: 2
        }));
        assert!(summary.by_crop.contains(&CropCount {
            crop: "Trigo".to_string(),
            count: 1
        }));
    }

    #[test]
    fn farm_without_harvest_adds_no_crops() {
        let producers = vec![test_producer_with_farms(
            "12345678901",
            vec![FarmFixture::new("BA", 10.0, 5.0, 5.0)],
        )];

        let summary = compute_dashboard(&producers);
        assert_eq!(summary.total_farms, 1);
        assert!(summary.by_crop.is_empty());
    }

    #[test]
    fn summary_serializes_in_camel_case() {
        let json = serde_json::to_value(compute_dashboard(&sample_dataset())).unwrap();
        assert_eq!(json["totalFarms"], 3);
        assert_eq!(json["totalHectares"], 230.0);
        assert_eq!(json["landUse"][0]["type"], "arable");
        assert_eq!(json["landUse"][1]["type"], "vegetation");
        assert!(json["byState"].is_array());
        assert!(json["byCrop"].is_array());
    }

    #[tokio::test]
    async fn get_dashboard_reads_repository() {
        let repo = InMemoryProducerRepository::new();
        for producer in sample_dataset() {
            repo.create(&producer).await.unwrap();
        }
        let service = DashboardService::new(Arc::new(repo));

        let summary = service.get_dashboard().await.unwrap();
        assert_eq!(summary.total_farms, 3);
        assert_eq!(summary.total_hectares, 230.0);
    }

    #[tokio::test]
    async fn get_dashboard_propagates_fetch_failure() {
        let service = DashboardService::new(Arc::new(InMemoryProducerRepository::failing()));

        let result = service.get_dashboard().await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Database(_)))
        ));
    }
}
