//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and ports.

pub mod dashboard_service;
pub mod producer_service;

pub use dashboard_service::{DashboardService, DashboardSummary};
// Re-export dashboard row types for public API
#[allow(unused_imports)]
pub use dashboard_service::{compute_dashboard, CropCount, LandUse, LandUseType, StateCount};
pub use producer_service::{CreateProducer, NewFarm, ProducerService, UpdateProducer};
