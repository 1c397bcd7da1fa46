use std::collections::HashSet;

use crate::domain::history::model::{EntityKind, TelemetryEntity};

/// Classification predicates supplied by the host's metadata catalog.
pub trait TelemetryMetadata: Send + Sync {
    fn is_aggregate_type(&self, entity: &TelemetryEntity) -> bool;
    fn is_imagery(&self, entity: &TelemetryEntity) -> bool;
    fn has_enum_value(&self, entity: &TelemetryEntity) -> bool;
}

/// Catalog answering from the entity kind plus explicitly configured keys.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadataCatalog {
    aggregate_keys: HashSet<String>,
    image_keys: HashSet<String>,
    enum_keys: HashSet<String>,
}

impl StaticMetadataCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aggregate_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aggregate_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_image_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_enum_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_keys.extend(keys.into_iter().map(Into::into));
        self
    }
}

impl TelemetryMetadata for StaticMetadataCatalog {
    fn is_aggregate_type(&self, entity: &TelemetryEntity) -> bool {
        entity.entity_kind() == Some(EntityKind::Aggregate)
            || self.aggregate_keys.contains(&entity.key)
    }

    fn is_imagery(&self, entity: &TelemetryEntity) -> bool {
        entity.entity_kind() == Some(EntityKind::Image) || self.image_keys.contains(&entity.key)
    }

    fn has_enum_value(&self, entity: &TelemetryEntity) -> bool {
        self.enum_keys.contains(&entity.key)
    }
}
