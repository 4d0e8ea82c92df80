//! Sizing orchestrator
//!
//! `ClusterSizer` sequences one run: catalog listing, spot price fetch,
//! cheapest-region selection, configuration planning. Every run operates on
//! freshly fetched data scoped to itself; nothing survives between runs.
//!
//! ## Stale-run suppression
//!
//! Each run is assigned a monotonically increasing generation. A run applies
//! its result to the shared `latest` slot only while it is still the newest
//! generation, so a superseded run can never overwrite a newer run's result.
//! The superseded caller still receives its own return value.
//!
//! The observable `is_loading` flag is true from the moment the newest run
//! starts until that run settles (success or failure); a stale run settling
//! does not clear it.

use crate::catalog::CatalogSource;
use crate::error::Result;
use crate::planner::plan;
use crate::pricing::PriceSource;
use crate::region::select_cheapest_region;
use crate::types::{ResourceRequirement, SizingResult};
use crate::validation::validate_requirement;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Shared, observable state across sizing runs
#[derive(Default)]
struct RunState {
    /// Newest generation handed out.
    started: AtomicU64,
    /// Highest generation that has settled.
    settled: AtomicU64,
    latest: Mutex<Option<SizingResult>>,
}

impl RunState {
    fn begin(&self) -> u64 {
        self.started.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn settle(&self, generation: u64) {
        self.settled.fetch_max(generation, Ordering::SeqCst);
    }

    fn is_loading(&self) -> bool {
        self.settled.load(Ordering::SeqCst) < self.started.load(Ordering::SeqCst)
    }

    /// Apply a run's result iff the run is still the newest. Returns whether
    /// the result was applied.
    async fn apply(&self, generation: u64, result: SizingResult) -> bool {
        let mut latest = self.latest.lock().await;
        if generation == self.started.load(Ordering::SeqCst) {
            *latest = Some(result);
            true
        } else {
            false
        }
    }
}

/// Orchestrates sizing runs over a catalog source and a price source
pub struct ClusterSizer<C, P> {
    catalog: C,
    pricing: P,
    state: Arc<RunState>,
}

impl<C, P> ClusterSizer<C, P>
where
    C: CatalogSource,
    P: PriceSource,
{
    pub fn new(catalog: C, pricing: P) -> Self {
        Self {
            catalog,
            pricing,
            state: Arc::new(RunState::default()),
        }
    }

    /// Run one complete sizing cycle and return its result.
    ///
    /// Stages run strictly in order; a catalog or pricing failure aborts the
    /// run before any later stage executes. An empty catalog result completes
    /// the run with an empty `SizingResult` without calling the price source.
    pub async fn compute_optimal_cluster(
        &self,
        requirement: &ResourceRequirement,
    ) -> Result<SizingResult> {
        validate_requirement(requirement)?;

        let generation = self.state.begin();
        let run_id = Uuid::new_v4();
        info!(%run_id, generation, ?requirement, "Starting sizing run");

        let outcome = self.run_pipeline(requirement).await;
        self.state.settle(generation);

        match outcome {
            Ok(result) => {
                let applied = self.state.apply(generation, result.clone()).await;
                if applied {
                    info!(%run_id, "Sizing run complete");
                } else {
                    debug!(%run_id, "Sizing run superseded; result not applied");
                }
                Ok(result)
            }
            Err(e) => {
                info!(%run_id, error = %e, "Sizing run aborted");
                Err(e)
            }
        }
    }

    async fn run_pipeline(&self, requirement: &ResourceRequirement) -> Result<SizingResult> {
        let specs = self.catalog.list_instance_types(requirement).await?;
        if specs.is_empty() {
            debug!("Catalog returned no qualifying instance types");
            return Ok(SizingResult::default());
        }

        let names: Vec<String> = specs.iter().map(|s| s.instance_type.clone()).collect();
        let prices = self.pricing.get_spot_prices(&names).await?;

        let cheapest_by_type = select_cheapest_region(&prices);

        Ok(plan(&specs, &cheapest_by_type, requirement))
    }

    /// True while the newest run is still in flight.
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// The most recently applied result, if any run has completed.
    pub async fn latest_result(&self) -> Option<SizingResult> {
        self.state.latest.lock().await.clone()
    }
}
