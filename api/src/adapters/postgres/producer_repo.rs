//! PostgreSQL adapter for ProducerRepository
//!
//! A producer is stored across four tables. Children reference their parent
//! with `ON DELETE CASCADE`, so deleting the producer row removes the whole
//! graph. Creation runs in a single transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    Harvest, HarvestId, NewProperty, PlantedCrop, PlantedCropId, Producer, ProducerId, Property,
    PropertyId,
};
use crate::domain::ports::ProducerRepository;
use crate::entity::{harvests, planted_crops, producers, properties};
use crate::error::DomainError;

/// PostgreSQL implementation of ProducerRepository
pub struct PostgresProducerRepository {
    db: DatabaseConnection,
}

impl PostgresProducerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load properties, harvests and crops for the given producer rows
    async fn hydrate<C: ConnectionTrait>(
        conn: &C,
        rows: Vec<producers::Model>,
    ) -> Result<Vec<Producer>, DomainError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let producer_ids: Vec<Uuid> = rows.iter().map(|p| p.id).collect();
        let property_rows = properties::Entity::find()
            .filter(properties::Column::ProducerId.is_in(producer_ids))
            .order_by_asc(properties::Column::Position)
                .order_by_asc(properties::Column::CreatedAt)
            .order_by_asc(properties::Column::Id)
            .all(conn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let property_ids: Vec<Uuid> = property_rows.iter().map(|p| p.id).collect();
        let harvest_rows = if property_ids.is_empty() {
            Vec::new()
        } else {
            harvests::Entity::find()
                .filter(harvests::Column::PropertyId.is_in(property_ids))
                .order_by_asc(harvests::Column::Position)
                .order_by_asc(harvests::Column::CreatedAt)
                .order_by_asc(harvests::Column::Id)
                .all(conn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?
        };

        let harvest_ids: Vec<Uuid> = harvest_rows.iter().map(|h| h.id).collect();
        let crop_rows = if harvest_ids.is_empty() {
            Vec::new()
        } else {
            planted_crops::Entity::find()
                .filter(planted_crops::Column::HarvestId.is_in(harvest_ids))
                .order_by_asc(planted_crops::Column::Position)
                .order_by_asc(planted_crops::Column::CreatedAt)
                .order_by_asc(planted_crops::Column::Id)
                .all(conn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?
        };

        assemble(rows, property_rows, harvest_rows, crop_rows)
    }
}

/// Group child rows by parent id, ordered by their position in the parent.
/// Rows sharing a position keep query order.
fn group_by<M>(
    rows: Vec<M>,
    key: impl Fn(&M) -> Uuid,
    position: impl Fn(&M) -> i32,
) -> HashMap<Uuid, Vec<M>> {
    let mut grouped: HashMap<Uuid, Vec<M>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row)).or_default().push(row);
    }
    for children in grouped.values_mut() {
        children.sort_by_key(|row| position(row));
    }
    grouped
}

/// Index of a child in its parent's collection, as stored
fn position(index: usize) -> Result<i32, DomainError> {
    i32::try_from(index)
        .map_err(|_| DomainError::Validation(format!("too many children: {}", index)))
}

fn corrupt(kind: &str, id: Uuid, e: DomainError) -> DomainError {
    DomainError::Database(format!("Stored {} {} is invalid: {}", kind, id, e))
}

/// Rebuild domain aggregates from rows. Every row goes back through the
/// entity constructors, so stored data that breaks an invariant is reported
/// instead of silently returned.
fn assemble(
    producer_rows: Vec<producers::Model>,
    property_rows: Vec<properties::Model>,
    harvest_rows: Vec<harvests::Model>,
    crop_rows: Vec<planted_crops::Model>,
) -> Result<Vec<Producer>, DomainError> {
    let mut crops_by_harvest = group_by(crop_rows, |c| c.harvest_id, |c| c.position);
    let mut harvests_by_property = group_by(harvest_rows, |h| h.property_id, |h| h.position);
    let mut properties_by_producer =
        group_by(property_rows, |p| p.producer_id, |p| p.position);

    producer_rows
        .into_iter()
        .map(|row| -> Result<Producer, DomainError> {
            let properties = properties_by_producer
                .remove(&row.id)
                .unwrap_or_default()
                .into_iter()
                .map(|prop_row| -> Result<Property, DomainError> {
                    let prop_id = prop_row.id;
                    let mut property = Property::new(
                        PropertyId(prop_row.id),
                        ProducerId(prop_row.producer_id),
                        NewProperty {
                            name: prop_row.name,
                            state: prop_row.state,
                            city: prop_row.city,
                            total_area: prop_row.total_area,
                            arable_area: prop_row.arable_area,
                            vegetation_area: prop_row.vegetation_area,
                        },
                    )
                    .map_err(|e| corrupt("property", prop_id, e))?
                    .with_timestamps(
                        prop_row.created_at.with_timezone(&Utc),
                        prop_row.updated_at.with_timezone(&Utc),
                    );

                    for harvest_row in harvests_by_property.remove(&prop_id).unwrap_or_default() {
                        let mut harvest = Harvest::new(
                            HarvestId(harvest_row.id),
                            PropertyId(harvest_row.property_id),
                            harvest_row.year,
                        )
                        .map_err(|e| corrupt("harvest", harvest_row.id, e))?
                        .with_timestamps(
                            harvest_row.created_at.with_timezone(&Utc),
                            harvest_row.updated_at.with_timezone(&Utc),
                        );

                        for crop_row in crops_by_harvest.remove(&harvest_row.id).unwrap_or_default()
                        {
                            let crop = PlantedCrop::new(
                                PlantedCropId(crop_row.id),
                                HarvestId(crop_row.harvest_id),
                                crop_row.name,
                                crop_row.area,
                            )
                            .map_err(|e| corrupt("planted crop", crop_row.id, e))?
                            .with_timestamps(
                                crop_row.created_at.with_timezone(&Utc),
                                crop_row.updated_at.with_timezone(&Utc),
                            );
                            harvest.add_planted_crop(crop);
                        }

                        property.add_harvest(harvest);
                    }

                    Ok(property)
                })
                .collect::<Result<Vec<_>, DomainError>>()?;

            let (id, created_at, updated_at) = (row.id, row.created_at, row.updated_at);
            let producer = Producer::new(ProducerId(id), row.name, row.document, properties)
                .map_err(|e| corrupt("producer", id, e))?;

            Ok(producer.with_timestamps(
                created_at.with_timezone(&Utc),
                updated_at.with_timezone(&Utc),
            ))
        })
        .collect()
}

/// Translate a write error, surfacing document uniqueness violations as conflicts
fn write_error(e: DbErr, document: &str) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::Conflict(format!(
            "A producer with document {} already exists",
            document
        )),
        _ => DomainError::Database(e.to_string()),
    }
}

#[async_trait]
impl ProducerRepository for PostgresProducerRepository {
    async fn create(&self, producer: &Producer) -> Result<(), DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        producers::ActiveModel {
            id: Set(producer.id().0),
            name: Set(producer.name().to_string()),
            document: Set(producer.document().to_string()),
            created_at: Set(producer.created_at().fixed_offset()),
            updated_at: Set(producer.updated_at().fixed_offset()),
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error(e, producer.document()))?;

        for (property_pos, property) in producer.properties().iter().enumerate() {
            properties::ActiveModel {
                id: Set(property.id().0),
                producer_id: Set(producer.id().0),
                name: Set(property.name().to_string()),
                state: Set(property.state().to_string()),
                city: Set(property.city().to_string()),
                total_area: Set(property.total_area()),
                arable_area: Set(property.arable_area()),
                vegetation_area: Set(property.vegetation_area()),
                position: Set(position(property_pos)?),
                created_at: Set(property.created_at().fixed_offset()),
                updated_at: Set(property.updated_at().fixed_offset()),
            }
            .insert(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

            for (harvest_pos, harvest) in property.harvests().iter().enumerate() {
                harvests::ActiveModel {
                    id: Set(harvest.id().0),
                    property_id: Set(property.id().0),
                    year: Set(harvest.year()),
                    position: Set(position(harvest_pos)?),
                    created_at: Set(harvest.created_at().fixed_offset()),
                    updated_at: Set(harvest.updated_at().fixed_offset()),
                }
                .insert(&txn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;

                for (crop_pos, crop) in harvest.planted_crops().iter().enumerate() {
                    planted_crops::ActiveModel {
                        id: Set(crop.id().0),
                        harvest_id: Set(harvest.id().0),
                        name: Set(crop.name().to_string()),
                        area: Set(crop.area()),
                        position: Set(position(crop_pos)?),
                        created_at: Set(crop.created_at().fixed_offset()),
                        updated_at: Set(crop.updated_at().fixed_offset()),
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| DomainError::Database(e.to_string()))?;
                }
            }
        }

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ProducerId) -> Result<Option<Producer>, DomainError> {
        let result = producers::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        match result {
            Some(row) => Ok(Self::hydrate(&self.db, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn update(&self, producer: &Producer) -> Result<(), DomainError> {
        producers::ActiveModel {
            id: Set(producer.id().0),
            name: Set(producer.name().to_string()),
            document: Set(producer.document().to_string()),
            updated_at: Set(producer.updated_at().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => {
                DomainError::NotFound(format!("Producer {} not found", producer.id()))
            }
            e => write_error(e, producer.document()),
        })?;

        Ok(())
    }

    async fn delete(&self, id: &ProducerId) -> Result<(), DomainError> {
        let result = producers::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            Err(DomainError::NotFound(format!("Producer {} not found", id)))
        } else {
            Ok(())
        }
    }

    async fn find_all(&self) -> Result<Vec<Producer>, DomainError> {
        let rows = producers::Entity::find()
            .order_by_asc(producers::Column::CreatedAt)
            .order_by_asc(producers::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Self::hydrate(&self.db, rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn ts() -> sea_orm::prelude::DateTimeWithTimeZone {
        DateTime::parse_from_rfc3339("2024-03-01T12:00:00+00:00").unwrap()
    }

    fn producer_row(document: &str) -> producers::Model {
        producers::Model {
            id: Uuid::new_v4(),
            name: "João".to_string(),
            document: document.to_string(),
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn property_row(producer_id: Uuid, arable: f64) -> properties::Model {
        properties::Model {
            id: Uuid::new_v4(),
            producer_id,
            name: "Fazenda Primavera".to_string(),
            state: "SP".to_string(),
            city: "Ribeirão Preto".to_string(),
            total_area: 100.0,
            arable_area: arable,
            vegetation_area: 30.0,
            position: 0,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn harvest_row(property_id: Uuid, year: i32, position: i32) -> harvests::Model {
        harvests::Model {
            id: Uuid::new_v4(),
            property_id,
            year,
            position,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn crop_row(harvest_id: Uuid, name: &str, position: i32) -> planted_crops::Model {
        planted_crops::Model {
            id: Uuid::new_v4(),
            harvest_id,
            name: name.to_string(),
            area: 30.0,
            position,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[test]
    fn assemble_nests_rows_under_their_parents() {
        let first = producer_row("12345678901");
        let second = producer_row("12345678000199");
        let prop = property_row(first.id, 60.0);
        let older = harvest_row(prop.id, 2023, 0);
        let newer = harvest_row(prop.id, 2024, 1);
        let crops = vec![
            crop_row(older.id, "Soja", 0),
            crop_row(older.id, "Milho", 1),
            crop_row(newer.id, "Algodão", 0),
        ];

        let producers = assemble(
            vec![first.clone(), second.clone()],
            vec![prop.clone()],
            vec![older, newer],
            crops,
        )
        .unwrap();

        assert_eq!(producers.len(), 2);
        assert_eq!(producers[0].id(), ProducerId(first.id));
        assert_eq!(producers[0].created_at(), ts().with_timezone(&Utc));
        assert!(producers[1].properties().is_empty());

        let property = &producers[0].properties()[0];
        assert_eq!(property.city(), "Ribeirão Preto");
        assert_eq!(property.harvests().len(), 2);
        assert_eq!(property.harvests()[0].crop_names(), vec!["Soja", "Milho"]);
        assert_eq!(property.harvests()[1].crop_names(), vec!["Algodão"]);
    }

    #[test]
    fn assemble_orders_children_by_position_when_timestamps_tie() {
        let producer = producer_row("12345678901");
        let prop = property_row(producer.id, 60.0);

        // Same timestamp everywhere and ids descending, so only the stored
        // position can recover the order the children were added in
        let mut first = harvest_row(prop.id, 2024, 0);
        let mut second = harvest_row(prop.id, 2023, 1);
        first.id = Uuid::from_u128(2);
        second.id = Uuid::from_u128(1);

        let mut soja = crop_row(first.id, "Soja", 0);
        let mut milho = crop_row(first.id, "Milho", 1);
        soja.id = Uuid::from_u128(20);
        milho.id = Uuid::from_u128(10);

        let producers = assemble(
            vec![producer],
            vec![prop],
            vec![second, first],
            vec![milho, soja],
        )
        .unwrap();

        let property = &producers[0].properties()[0];
        assert_eq!(property.first_harvest().unwrap().year(), 2024);
        assert_eq!(property.harvests()[0].crop_names(), vec!["Soja", "Milho"]);
        assert!(property.harvests()[1].planted_crops().is_empty());
    }

    #[test]
    fn assemble_orders_properties_by_position() {
        let producer = producer_row("12345678901");
        let mut north = property_row(producer.id, 60.0);
        let mut south = property_row(producer.id, 60.0);
        north.state = "GO".to_string();
        north.position = 0;
        south.state = "MT".to_string();
        south.position = 1;

        let producers = assemble(vec![producer], vec![south, north], vec![], vec![]).unwrap();

        let states: Vec<&str> = producers[0].properties().iter().map(|p| p.state()).collect();
        assert_eq!(states, vec!["GO", "MT"]);
    }

    #[test]
    fn assemble_reports_rows_breaking_invariants() {
        let producer = producer_row("12345678901");
        let prop = property_row(producer.id, 90.0);

        let result = assemble(vec![producer], vec![prop], vec![], vec![]);
        assert!(matches!(result, Err(DomainError::Database(_))));
    }

    #[test]
    fn assemble_reports_invalid_stored_document() {
        let result = assemble(vec![producer_row("123")], vec![], vec![], vec![]);
        assert!(matches!(result, Err(DomainError::Database(_))));
    }

    #[test]
    fn write_error_passes_through_generic_failures() {
        let err = write_error(DbErr::Custom("boom".to_string()), "12345678901");
        assert!(matches!(err, DomainError::Database(_)));
    }
}
