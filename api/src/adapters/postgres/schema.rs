//! Schema bootstrap
//!
//! Creates the producer tables from the SeaORM entity definitions when they
//! do not exist yet. Parents are created before children so the cascading
//! foreign keys resolve.

use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};

use crate::entity::prelude::{Harvests, PlantedCrops, Producers, Properties};

fn create_if_missing<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    stmt
}

/// Create any missing producer tables
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let statements = [
        create_if_missing(&schema, Producers),
        create_if_missing(&schema, Properties),
        create_if_missing(&schema, Harvests),
        create_if_missing(&schema, PlantedCrops),
    ];

    for stmt in &statements {
        db.execute(backend.build(stmt)).await?;
    }

    tracing::info!(tables = statements.len(), "Database schema ensured");
    Ok(())
}
