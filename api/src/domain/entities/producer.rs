//! Rural producer domain entity
//!
//! The producer is the aggregate root: it exclusively owns its properties,
//! which own their harvests, which own their planted crops. The document is
//! validated on construction and every time it changes.

use chrono::{DateTime, Utc};

use super::document::{validate_document, DocumentKind};
use super::ids::ProducerId;
use super::property::Property;
use crate::error::DomainError;

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation(
            "producer name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// A rural producer (individual or organization)
#[derive(Debug, Clone, PartialEq)]
pub struct Producer {
    id: ProducerId,
    name: String,
    document: String,
    document_kind: DocumentKind,
    properties: Vec<Property>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Producer {
    /// Build a producer, attaching `properties` in the given order
    pub fn new(
        id: ProducerId,
        name: impl Into<String>,
        document: impl Into<String>,
        properties: Vec<Property>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let document = document.into();
        let document_kind = validate_document(&document)?;
        validate_name(&name)?;

        let now = Utc::now();
        let mut producer = Self {
            id,
            name,
            document,
            document_kind,
            properties: Vec::with_capacity(properties.len()),
            created_at: now,
            updated_at: now,
        };
        for property in properties {
            producer.add_property(property);
        }
        Ok(producer)
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Replace the document, re-running classification.
    ///
    /// On failure the producer is left unchanged.
    pub fn change_document(&mut self, document: impl Into<String>) -> Result<(), DomainError> {
        let document = document.into();
        self.document_kind = validate_document(&document)?;
        self.document = document;
        self.touch();
        Ok(())
    }

    /// Replace the display name. On failure the producer is left unchanged.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    /// Append a property, re-pointing its back-reference at this producer
    pub fn add_property(&mut self, mut property: Property) {
        property.attach_to(self.id);
        self.properties.push(property);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn id(&self) -> ProducerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn document_kind(&self) -> DocumentKind {
        self.document_kind
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
