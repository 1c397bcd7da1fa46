use std::sync::Arc;

use futures::Stream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::core::client::archive_client::ArchiveTransport;
use crate::core::config::ArchiveConfig;
use crate::core::metadata::TelemetryMetadata;
use crate::domain::history::model::{
    CanonicalPoint, QueryOptions, RequestDescriptor, TelemetryEntity, WireTarget,
};
use crate::errors::HistoryError;

use super::point_converter::PointConverter;
use super::query_planner::QueryPlanner;
use super::request_composer::RequestComposer;
use super::response_accumulator::ResponseAccumulator;
use super::stream_dispatcher::{StreamDispatcher, StreamSummary};

/// Historical telemetry queries against one archive instance.
///
/// Holds no per-query state; one provider serves any number of concurrent
/// requests.
pub struct HistoricalTelemetryProvider {
    planner: QueryPlanner,
    composer: RequestComposer,
    accumulator: ResponseAccumulator,
    dispatcher: StreamDispatcher,
    metadata: Arc<dyn TelemetryMetadata>,
}

/// Everything decided before the first fetch.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub descriptor: RequestDescriptor,
    pub target: WireTarget,
    pub converter: PointConverter,
}

impl HistoricalTelemetryProvider {
    pub fn new(
        archive_url: &str,
        instance: &str,
        planner: QueryPlanner,
        transport: Arc<dyn ArchiveTransport>,
        metadata: Arc<dyn TelemetryMetadata>,
    ) -> Self {
        Self {
            planner,
            composer: RequestComposer::new(archive_url, instance),
            accumulator: ResponseAccumulator::new(transport.clone()),
            dispatcher: StreamDispatcher::new(transport),
            metadata,
        }
    }

    pub fn from_config(
        config: &ArchiveConfig,
        transport: Arc<dyn ArchiveTransport>,
        metadata: Arc<dyn TelemetryMetadata>,
    ) -> Self {
        Self::new(
            &config.archive_url,
            &config.instance,
            QueryPlanner::new(config.max_page_size),
            transport,
            metadata,
        )
    }

    /// True iff the entity's kind is one this provider can query.
    pub fn supports_request(&self, entity: &TelemetryEntity) -> bool {
        entity.entity_kind().is_some()
    }

    /// Validates options and derives descriptor, wire target and converter.
    /// Fails before any network call.
    pub fn plan(
        &self,
        entity: &TelemetryEntity,
        options: &QueryOptions,
    ) -> Result<QueryPlan, HistoryError> {
        let entity_class = entity
            .entity_class()
            .ok_or_else(|| HistoryError::UnsupportedEntity(entity.kind.clone()))?;

        if options.end < options.start {
            return Err(HistoryError::InvalidOptions(format!(
                "end {} is before start {}",
                options.end, options.start
            )));
        }

        let descriptor = self.planner.standardize(
            options,
            entity_class,
            self.metadata.is_aggregate_type(entity),
            self.metadata.is_imagery(entity),
            self.metadata.has_enum_value(entity),
        );
        let target = self.composer.build(&entity.key, &descriptor)?;
        let converter = PointConverter::for_request(entity.key.clone(), &descriptor);

        debug!(
            "Planned {:?} query for {}: {}",
            descriptor.entity_class, entity.key, target
        );
        Ok(QueryPlan {
            descriptor,
            target,
            converter,
        })
    }

    /// Batch mode: resolves to the full point sequence.
    pub async fn request(
        &self,
        entity: &TelemetryEntity,
        options: &QueryOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<CanonicalPoint>, HistoryError> {
        let plan = self.plan(entity, options)?;
        let span = info_span!(
            "history_request",
            request_id = %Uuid::new_v4(),
            entity = %entity.key
        );

        async {
            let result = self
                .accumulator
                .fetch(&plan.target, &plan.descriptor, &plan.converter, cancel)
                .await;

            match &result {
                Ok(points) => info!("History request returned {} point(s)", points.len()),
                Err(HistoryError::Cancelled) => info!("History request cancelled"),
                Err(e) => warn!("History request failed: {}", e),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Streaming mode: `on_batch` receives each converted page before the
    /// next one is requested.
    pub async fn request_streaming<F>(
        &self,
        entity: &TelemetryEntity,
        options: &QueryOptions,
        on_batch: F,
        cancel: &CancellationToken,
    ) -> Result<StreamSummary, HistoryError>
    where
        F: FnMut(Vec<CanonicalPoint>) + Send,
    {
        let plan = self.plan(entity, options)?;
        let span = info_span!(
            "history_stream",
            request_id = %Uuid::new_v4(),
            entity = %entity.key
        );

        async {
            let result = self
                .dispatcher
                .stream(&plan.target, &plan.descriptor, &plan.converter, on_batch, cancel)
                .await;

            match &result {
                Ok(summary) => info!(
                    "History stream delivered {} point(s) in {} batch(es)",
                    summary.points, summary.batches
                ),
                Err(HistoryError::Cancelled) => info!("History stream cancelled"),
                Err(e) => warn!("History stream failed: {}", e),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Pull-driven streaming mode: the next page is fetched only when the
    /// consumer polls for the next batch.
    pub fn stream_batches<'a>(
        &'a self,
        plan: &'a QueryPlan,
        cancel: &'a CancellationToken,
    ) -> impl Stream<Item = Result<Vec<CanonicalPoint>, HistoryError>> + Send + 'a {
        self.dispatcher
            .batches(&plan.target, &plan.descriptor, &plan.converter, cancel)
    }
}
