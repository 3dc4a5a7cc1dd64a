// Rust guideline compliant 2026-10-14

//! Dashboard facade -- the read-only query surface the presentation layer uses.
//!
//! [`Dashboard`] loads tables through an injected `domain::DataSource`, runs the
//! scoring pipeline and memoizes the result per customer type and input files.
//! A cached snapshot is rebuilt when the source fingerprint changes or after
//! [`Dashboard::invalidate`]. No query returns an error: a failed load is
//! logged and served as an empty snapshot.
//!
//! Entry points: [`Dashboard::customer_summaries`], [`Dashboard::customer_history`],
//! [`Dashboard::recommendation`], [`Dashboard::list_customer_ids`].
//! Configuration via [`DashboardConfig::builder`].

mod report;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use domain::{
    Category, CustomerSummary, CustomerType, DataSource, DerivedRecord, FileStamp, RiskTier,
    SourceTables, TargetRecord,
};
use rand::{SeedableRng, rngs::StdRng};

pub use report::{CustomerReport, Diagnosis, MonthlyRow, Overview, TierCount};

// ---------------------------------------------------------------------------
// DashboardConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for a [`Dashboard`].
///
/// Construct via [`DashboardConfig::builder`].
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Seed of the display-probability generator, applied on every load.
    /// `None` seeds each load from the OS.
    pub seed: Option<u64>,
}

/// Builder for [`DashboardConfig`].
///
/// Obtain via [`DashboardConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct DashboardConfigBuilder {
    seed: Option<u64>,
}

impl DashboardConfig {
    /// Create a builder. Default: OS-seeded generator.
    #[must_use]
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder { seed: None }
    }
}

impl DashboardConfigBuilder {
    /// Fix the generator seed for reproducible output.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> DashboardConfig {
        DashboardConfig { seed: self.seed }
    }
}

// ---------------------------------------------------------------------------
// Fail-soft load
// ---------------------------------------------------------------------------

/// Load the tables of `customer_type`, or empty tables when the load fails.
///
/// The failure is logged at `warn`; callers render an empty state.
pub fn load_or_empty<S: DataSource + ?Sized>(source: &S, customer_type: CustomerType) -> SourceTables {
    match source.load(customer_type) {
        Ok(tables) => tables,
        Err(e) => {
            tracing::warn!(%customer_type, error = %e, "dashboard.load_failed: serving empty tables");
            SourceTables::empty()
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot + cache
// ---------------------------------------------------------------------------

/// Immutable result of one load: derived history and customer summaries.
#[derive(Debug)]
pub struct Snapshot {
    customer_type: CustomerType,
    history: Vec<DerivedRecord>,
    target: Option<Vec<TargetRecord>>,
    summaries: Vec<CustomerSummary>,
}

impl Snapshot {
    /// Customer type this snapshot was built for.
    #[must_use]
    pub fn customer_type(&self) -> CustomerType {
        self.customer_type
    }

    /// Derived history, in `(customer_id, period)` order.
    #[must_use]
    pub fn history(&self) -> &[DerivedRecord] {
        &self.history
    }

    /// Target snapshot as loaded, if the customer type has one.
    #[must_use]
    pub fn target(&self) -> Option<&[TargetRecord]> {
        self.target.as_deref()
    }

    /// One summary per customer.
    #[must_use]
    pub fn summaries(&self) -> &[CustomerSummary] {
        &self.summaries
    }

    /// `true` when nothing was loaded; the presentation layer shows "data unavailable".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Chronological history of `customer_id`.
    #[must_use]
    pub fn history_of(&self, customer_id: &str) -> &[DerivedRecord] {
        let start = self.history.partition_point(|r| r.customer_id() < customer_id);
        let len = self.history[start..].partition_point(|r| r.customer_id() == customer_id);
        &self.history[start..start + len]
    }

    /// Summary of `customer_id`, if one exists.
    #[must_use]
    pub fn summary_of(&self, customer_id: &str) -> Option<&CustomerSummary> {
        self.summaries.iter().find(|s| s.customer_id == customer_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    customer_type: CustomerType,
    paths: Vec<PathBuf>,
}

#[derive(Debug)]
struct CacheEntry {
    stamps: Vec<Option<FileStamp>>,
    snapshot: Rc<Snapshot>,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Query facade over a [`DataSource`].
///
/// Generic over the source for static dispatch. The customer type is an
/// explicit argument of every query; nothing is selected globally.
#[derive(Debug)]
pub struct Dashboard<S: DataSource> {
    source: S,
    /// Reseeds the generator of every snapshot build; `None` draws from the OS.
    seed: Option<u64>,
    cache: RefCell<HashMap<CacheKey, CacheEntry>>,
}

impl<S: DataSource> Dashboard<S> {
    /// Create a dashboard reading from `source`.
    #[must_use]
    pub fn new(source: S, config: &DashboardConfig) -> Self {
        Self { source, seed: config.seed, cache: RefCell::new(HashMap::new()) }
    }

    /// The underlying source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current snapshot for `customer_type`, loading it if absent or stale.
    pub fn snapshot(&self, customer_type: CustomerType) -> Rc<Snapshot> {
        let fingerprint = self.source.fingerprint(customer_type);
        let key = CacheKey { customer_type, paths: fingerprint.paths };

        if let Some(entry) = self.cache.borrow().get(&key) {
            if entry.stamps == fingerprint.stamps {
                tracing::debug!(%customer_type, "dashboard.cache_hit");
                return Rc::clone(&entry.snapshot);
            }
            tracing::info!(%customer_type, "dashboard.cache_stale: inputs changed");
        }

        let snapshot = Rc::new(self.build_snapshot(customer_type));
        self.cache.borrow_mut().insert(
            key,
            CacheEntry { stamps: fingerprint.stamps, snapshot: Rc::clone(&snapshot) },
        );
        snapshot
    }

    /// Drop every cached snapshot of `customer_type`; the next query reloads.
    pub fn invalidate(&self, customer_type: CustomerType) {
        self.cache.borrow_mut().retain(|key, _| key.customer_type != customer_type);
        tracing::debug!(%customer_type, "dashboard.invalidate");
    }

    fn build_snapshot(&self, customer_type: CustomerType) -> Snapshot {
        let tables = load_or_empty(&self.source, customer_type);
        let history = scoring::derive_all(tables.history);
        // Fresh generator per build: same seed and inputs give the same snapshot.
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let summaries =
            scoring::summarize(customer_type, &history, tables.target.as_deref(), &mut rng);
        Snapshot { customer_type, history, target: tables.target, summaries }
    }

    /// One summary per customer of `customer_type`; empty when nothing loaded.
    #[must_use]
    pub fn customer_summaries(&self, customer_type: CustomerType) -> Vec<CustomerSummary> {
        self.snapshot(customer_type).summaries().to_vec()
    }

    /// Summaries whose tier is one of `tiers` (marketing-page filter).
    #[must_use]
    pub fn summaries_in_tiers(
        &self,
        customer_type: CustomerType,
        tiers: &[RiskTier],
    ) -> Vec<CustomerSummary> {
        self.snapshot(customer_type)
            .summaries()
            .iter()
            .filter(|s| tiers.contains(&s.risk_tier))
            .cloned()
            .collect()
    }

    /// Chronological history of one customer; empty when unknown.
    #[must_use]
    pub fn customer_history(&self, customer_type: CustomerType, customer_id: &str) -> Vec<DerivedRecord> {
        self.snapshot(customer_type).history_of(customer_id).to_vec()
    }

    /// Recommendation for a tier / category pair. Never fails.
    #[must_use]
    pub fn recommendation(
        &self,
        customer_type: CustomerType,
        tier: Option<RiskTier>,
        category: Option<Category>,
    ) -> String {
        advisor::recommend(customer_type, tier, category)
    }

    /// Recommendation for a known customer, from their summary.
    #[must_use]
    pub fn recommendation_for(&self, customer_type: CustomerType, customer_id: &str) -> Option<String> {
        let snapshot = self.snapshot(customer_type);
        let summary = snapshot.summary_of(customer_id)?;
        Some(advisor::recommend(customer_type, Some(summary.risk_tier), summary.main_interest))
    }

    /// Identifiers of every summarized customer, in summary order.
    #[must_use]
    pub fn list_customer_ids(&self, customer_type: CustomerType) -> Vec<String> {
        self.snapshot(customer_type).summaries().iter().map(|s| s.customer_id.clone()).collect()
    }

    /// Individual report of one customer; `None` without history.
    #[must_use]
    pub fn customer_report(&self, customer_type: CustomerType, customer_id: &str) -> Option<CustomerReport> {
        let snapshot = self.snapshot(customer_type);
        CustomerReport::build(customer_type, snapshot.history_of(customer_id), snapshot.summary_of(customer_id))
    }

    /// Population figures computed from the loaded data.
    #[must_use]
    pub fn overview(&self, customer_type: CustomerType) -> Overview {
        Overview::build(customer_type, self.snapshot(customer_type).summaries())
    }
}
