use serde::{Deserialize, Serialize};

/// Declared type of a telemetry entity, as the host knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "telemetry.parameter")]
    Parameter,
    #[serde(rename = "telemetry.aggregate")]
    Aggregate,
    #[serde(rename = "telemetry.image")]
    Image,
    #[serde(rename = "telemetry.string")]
    String,
    #[serde(rename = "telemetry.events")]
    Events,
    #[serde(rename = "telemetry.commands")]
    Commands,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Parameter,
        EntityKind::Aggregate,
        EntityKind::Image,
        EntityKind::String,
        EntityKind::Events,
        EntityKind::Commands,
    ];

    pub fn as_code(&self) -> &'static str {
        match self {
            EntityKind::Parameter => "telemetry.parameter",
            EntityKind::Aggregate => "telemetry.aggregate",
            EntityKind::Image => "telemetry.image",
            EntityKind::String => "telemetry.string",
            EntityKind::Events => "telemetry.events",
            EntityKind::Commands => "telemetry.commands",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_code() == code)
    }

    pub fn entity_class(&self) -> EntityClass {
        match self {
            EntityKind::Events => EntityClass::Event,
            EntityKind::Commands => EntityClass::Command,
            _ => EntityClass::Parameter,
        }
    }
}

/// Routing and decoding family of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityClass {
    Parameter,
    Event,
    Command,
}

impl EntityClass {
    /// Archive sub-path for non-parameter classes. Parameters are routed by
    /// qualified name instead.
    pub fn collection_path(&self) -> &'static str {
        match self {
            EntityClass::Parameter => "parameters",
            EntityClass::Event => "events",
            EntityClass::Command => "commands",
        }
    }

    /// Field of an archive page holding raw (non-sample) records.
    pub fn response_key(&self) -> &'static str {
        match self {
            EntityClass::Parameter => "parameter",
            EntityClass::Event => "event",
            EntityClass::Command => "entry",
        }
    }
}

/// Entity handed in by the host.
///
/// `kind` stays a raw string so unsupported types can be rejected through
/// `supports_request` instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryEntity {
    pub key: String,
    pub kind: String,
}

impl TelemetryEntity {
    pub fn new(key: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            key: key.into(),
            kind: kind.as_code().to_string(),
        }
    }

    pub fn entity_kind(&self) -> Option<EntityKind> {
        EntityKind::from_code(&self.kind)
    }

    pub fn entity_class(&self) -> Option<EntityClass> {
        self.entity_kind().map(|k| k.entity_class())
    }
}
