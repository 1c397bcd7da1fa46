pub mod canonical_point;
pub mod entity;
pub mod query_options;
pub mod request_descriptor;
pub mod wire_target;

pub use canonical_point::{AlarmRange, CanonicalPoint, LimitInfo};
pub use entity::{EntityClass, EntityKind, TelemetryEntity};
pub use query_options::{QueryOptions, SortOrder, Strategy};
pub use request_descriptor::{RequestDescriptor, SizeType};
pub use wire_target::WireTarget;
