use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::domain::history::model::{EntityClass, RequestDescriptor, SortOrder, WireTarget};
use crate::errors::HistoryError;

/// The archive's range filter drops the bound on the side of the sort order.
/// Nudging that bound by one millisecond (its time resolution) makes the
/// requested range inclusive. Specific to this archive; do not generalize.
pub const EXCLUSIVE_BOUNDARY_NUDGE_MS: i64 = 1;

const SAMPLES_SUFFIX: &str = "/samples";

/// Composes archive URLs for a single archive instance.
#[derive(Debug, Clone)]
pub struct RequestComposer {
    base: String,
}

impl RequestComposer {
    pub fn new(archive_url: &str, instance: &str) -> Self {
        let trimmed = archive_url.trim_end_matches('/');
        Self {
            base: format!("{}/api/archive/{}", trimmed, urlencoding::encode(instance)),
        }
    }

    /// Fails only when the nudged bound leaves chrono's representable range.
    pub fn build(
        &self,
        entity_key: &str,
        descriptor: &RequestDescriptor,
    ) -> Result<WireTarget, HistoryError> {
        let mut path = match descriptor.entity_class {
            EntityClass::Event | EntityClass::Command => {
                format!("/{}", descriptor.entity_class.collection_path())
            }
            EntityClass::Parameter => format!(
                "/{}{}",
                descriptor.entity_class.collection_path(),
                qualified_name(entity_key)
            ),
        };

        if descriptor.is_samples && descriptor.entity_class == EntityClass::Parameter {
            path.push_str(SAMPLES_SUFFIX);
        }

        let (start, stop) = inclusive_bounds(descriptor.start, descriptor.end, descriptor.order)
            .ok_or_else(|| {
                HistoryError::InvalidOptions(format!(
                    "range {} .. {} is outside the representable time range",
                    descriptor.start, descriptor.end
                ))
            })?;

        Ok(WireTarget {
            base: self.base.clone(),
            path,
            query: vec![
                ("start", format_wire_time(start)),
                ("stop", format_wire_time(stop)),
                (descriptor.size_type.as_str(), descriptor.size.to_string()),
                ("order", descriptor.order.as_str().to_string()),
            ],
        })
    }
}

/// Applies the exclusive-boundary correction for `order`. `None` when the
/// nudged bound overflows.
pub fn inclusive_bounds(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    order: SortOrder,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let nudge = Duration::milliseconds(EXCLUSIVE_BOUNDARY_NUDGE_MS);
    match order {
        SortOrder::Asc => Some((start, end.checked_add_signed(nudge)?)),
        SortOrder::Desc => Some((start.checked_sub_signed(nudge)?, end)),
    }
}

/// `2024-01-01T00:00:00.000Z`
pub fn format_wire_time(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parameter key (`~sat~power~voltage`) to URL path of its qualified name
/// (`/sat/power/voltage`), each segment percent-encoded.
pub fn qualified_name(key: &str) -> String {
    key.split(['~', '/'])
        .filter(|segment| !segment.is_empty())
        .fold(String::new(), |mut acc, segment| {
            acc.push('/');
            acc.push_str(&urlencoding::encode(segment));
            acc
        })
}
