//! Producer handlers
//!
//! Endpoints for registering, reading, updating and removing rural producers.
//! Request bodies are checked structurally here before any domain entity is
//! built.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::{CreateProducer, NewFarm, UpdateProducer};
use crate::domain::entities::document::{LONG_FORM_LEN, SHORT_FORM_LEN};
use crate::domain::entities::{Harvest, Producer, ProducerId, Property};
use crate::domain::ports::ProducerRepository;
use crate::error::AppError;
use crate::AppState;

/// Message for documents outside the accepted length range
pub const DOCUMENT_LENGTH_MESSAGE: &str =
    "document must be between 11 (short-form) and 14 (long-form) characters";

/// A farm submitted with a new producer
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateFarmRequest {
    pub name: String,
    /// State (region) code, e.g. "GO"
    pub state: String,
    #[serde(default)]
    pub city: Option<String>,
    /// Hectares
    pub total_area: f64,
    pub arable_area: f64,
    pub vegetation_area: f64,
    /// Crops planted this year
    pub crops: Vec<String>,
}

/// Request to register a producer
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProducerRequest {
    pub name: String,
    /// Short-form (11) or long-form (14) document
    pub document: String,
    #[serde(default)]
    pub farms: Option<Vec<CreateFarmRequest>>,
}

/// Request to update a producer. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProducerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub document: Option<String>,
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn check_document_length(document: &str) -> Result<(), AppError> {
    let len = document.chars().count();
    if !(SHORT_FORM_LEN..=LONG_FORM_LEN).contains(&len) {
        return Err(AppError::BadRequest(DOCUMENT_LENGTH_MESSAGE.to_string()));
    }
    Ok(())
}

impl TryFrom<CreateFarmRequest> for NewFarm {
    type Error = AppError;

    fn try_from(farm: CreateFarmRequest) -> Result<Self, Self::Error> {
        require_text("farm name", &farm.name)?;
        require_text("farm state", &farm.state)?;

        Ok(NewFarm {
            name: farm.name,
            state: farm.state,
            city: farm.city.unwrap_or_default(),
            total_area: farm.total_area,
            arable_area: farm.arable_area,
            vegetation_area: farm.vegetation_area,
            crops: farm.crops,
        })
    }
}

impl TryFrom<CreateProducerRequest> for CreateProducer {
    type Error = AppError;

    fn try_from(request: CreateProducerRequest) -> Result<Self, Self::Error> {
        require_text("name", &request.name)?;
        require_text("document", &request.document)?;
        check_document_length(&request.document)?;

        let farms = request
            .farms
            .map(|farms| {
                farms
                    .into_iter()
                    .map(NewFarm::try_from)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(CreateProducer {
            name: request.name,
            document: request.document,
            farms,
        })
    }
}

impl TryFrom<UpdateProducerRequest> for UpdateProducer {
    type Error = AppError;

    fn try_from(request: UpdateProducerRequest) -> Result<Self, Self::Error> {
        if let Some(name) = &request.name {
            require_text("name", name)?;
        }
        if let Some(document) = &request.document {
            check_document_length(document)?;
        }

        Ok(UpdateProducer {
            name: request.name,
            document: request.document,
        })
    }
}

/// A planted crop in a harvest
#[derive(Debug, Serialize)]
pub struct CropResponse {
    pub name: String,
    pub area: f64,
}

/// A harvest on a farm
#[derive(Debug, Serialize)]
pub struct HarvestResponse {
    pub id: String,
    pub year: i32,
    pub crops: Vec<CropResponse>,
}

/// A farm owned by a producer
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmResponse {
    pub id: String,
    pub name: String,
    pub state: String,
    pub city: String,
    pub total_area: f64,
    pub arable_area: f64,
    pub vegetation_area: f64,
    /// Crop names of the first harvest
    pub crops: Vec<String>,
    /// Every harvest, in the order recorded
    pub harvests: Vec<HarvestResponse>,
}

/// Response for a producer
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerResponse {
    pub id: String,
    pub name: String,
    pub document: String,
    pub document_kind: String,
    pub farms: Vec<FarmResponse>,
    pub created_at: String,
    pub updated_at: String,
}

/// Response for a removed producer
#[derive(Debug, Serialize)]
pub struct DeleteProducerResponse {
    pub message: String,
}

impl From<&Harvest> for HarvestResponse {
    fn from(harvest: &Harvest) -> Self {
        HarvestResponse {
            id: harvest.id().to_string(),
            year: harvest.year(),
            crops: harvest
                .planted_crops()
                .iter()
                .map(|c| CropResponse {
                    name: c.name().to_string(),
                    area: c.area(),
                })
                .collect(),
        }
    }
}

impl From<&Property> for FarmResponse {
    fn from(property: &Property) -> Self {
        FarmResponse {
            id: property.id().to_string(),
            name: property.name().to_string(),
            state: property.state().to_string(),
            city: property.city().to_string(),
            total_area: property.total_area(),
            arable_area: property.arable_area(),
            vegetation_area: property.vegetation_area(),
            crops: property
                .first_harvest()
                .map(|h| h.crop_names())
                .unwrap_or_default(),
            harvests: property.harvests().iter().map(HarvestResponse::from).collect(),
        }
    }
}

impl From<&Producer> for ProducerResponse {
    fn from(producer: &Producer) -> Self {
        ProducerResponse {
            id: producer.id().to_string(),
            name: producer.name().to_string(),
            document: producer.document().to_string(),
            document_kind: producer.document_kind().to_string(),
            farms: producer.properties().iter().map(FarmResponse::from).collect(),
            created_at: producer.created_at().to_rfc3339(),
            updated_at: producer.updated_at().to_rfc3339(),
        }
    }
}

/// Ids that are not UUIDs cannot name a stored producer
fn parse_producer_id(id: &str) -> Result<ProducerId, AppError> {
    id.parse()
        .map_err(|_| AppError::NotFound(format!("Producer {} not found", id)))
}

/// POST /producers
///
/// Register a producer together with its farms and this year's crops.
pub async fn create_producer<R: ProducerRepository + 'static>(
    State(state): State<AppState<R>>,
    payload: Result<Json<CreateProducerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProducerResponse>), AppError> {
    let Json(request) = payload?;
    let input = CreateProducer::try_from(request)?;

    let producer = state.producer_service.create(input).await?;

    Ok((StatusCode::CREATED, Json(ProducerResponse::from(&producer))))
}

/// GET /producers
///
/// List every producer.
pub async fn list_producers<R: ProducerRepository + 'static>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<ProducerResponse>>, AppError> {
    let producers = state.producer_service.list().await?;

    Ok(Json(producers.iter().map(ProducerResponse::from).collect()))
}

/// GET /producers/:id
///
/// Get a producer with its farms.
pub async fn get_producer<R: ProducerRepository + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<ProducerResponse>, AppError> {
    let id = parse_producer_id(&id)?;
    let producer = state.producer_service.get(&id).await?;

    Ok(Json(ProducerResponse::from(&producer)))
}

/// PUT /producers/:id
///
/// Update a producer's name and/or document.
pub async fn update_producer<R: ProducerRepository + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProducerRequest>, JsonRejection>,
) -> Result<Json<ProducerResponse>, AppError> {
    let id = parse_producer_id(&id)?;
    let Json(request) = payload?;
    let input = UpdateProducer::try_from(request)?;

    let producer = state.producer_service.update(&id, input).await?;

    Ok(Json(ProducerResponse::from(&producer)))
}

/// DELETE /producers/:id
///
/// Remove a producer with all of its farms, harvests and crops.
pub async fn delete_producer<R: ProducerRepository + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteProducerResponse>, AppError> {
    let id = parse_producer_id(&id)?;
    state.producer_service.delete(&id).await?;

    Ok(Json(DeleteProducerResponse {
        message: "Producer removed successfully.".to_string(),
    }))
}
