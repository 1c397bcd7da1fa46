pub mod metadata_catalog;

pub use metadata_catalog::{StaticMetadataCatalog, TelemetryMetadata};
