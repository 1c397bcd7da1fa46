use crate::core::config::DEFAULT_MAX_PAGE_SIZE;
use crate::domain::history::model::{
    EntityClass, QueryOptions, RequestDescriptor, SizeType, SortOrder, Strategy,
};

/// Overall record budget when the caller gives no size.
pub const DEFAULT_TOTAL_REQUEST_SIZE: usize = 1_000_000;

/// Samples response collection key, shared by every entity class.
pub const SAMPLE_RESPONSE_KEY: &str = "sample";

/// Turns caller options into a [`RequestDescriptor`].
#[derive(Debug, Clone, Copy)]
pub struct QueryPlanner {
    max_page_size: usize,
}

impl Default for QueryPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAGE_SIZE)
    }
}

impl QueryPlanner {
    pub fn new(max_page_size: usize) -> Self {
        Self {
            max_page_size: max_page_size.max(1),
        }
    }

    /// Per-page size: the requested size, or the page cap when the request is
    /// absent, zero, or above the cap.
    pub fn effective_size(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(size) if size > 0 && size <= self.max_page_size => size,
            _ => self.max_page_size,
        }
    }

    pub fn standardize(
        &self,
        options: &QueryOptions,
        entity_class: EntityClass,
        is_aggregate_type: bool,
        is_imagery: bool,
        has_enum_value: bool,
    ) -> RequestDescriptor {
        let mut size_type = SizeType::Limit;
        let mut order = options.order.unwrap_or_default();
        let mut is_samples = false;
        let mut total_request_size = options
            .size
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_TOTAL_REQUEST_SIZE);
        let mut size = self.effective_size(options.size);

        match options.strategy {
            Some(Strategy::Latest) => {
                size = 1;
                total_request_size = 1;
                order = SortOrder::Desc;
            }
            Some(Strategy::MinMax)
                if entity_class == EntityClass::Parameter
                    && !is_aggregate_type
                    && !is_imagery
                    && !has_enum_value =>
            {
                is_samples = true;
                size_type = SizeType::Count;
            }
            _ => {}
        }

        let response_key_name = if is_samples {
            SAMPLE_RESPONSE_KEY
        } else {
            entity_class.response_key()
        };

        RequestDescriptor {
            entity_class,
            start: options.start,
            end: options.end,
            size_type,
            size,
            total_request_size,
            order,
            is_samples,
            response_key_name,
        }
    }
}
