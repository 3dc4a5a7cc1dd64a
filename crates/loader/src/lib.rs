// Rust guideline compliant 2026-10-12

//! Data loader -- the CSV adapter for the `domain::DataSource` port.
//!
//! Reads a transaction-history file and, for customer types that have one, a
//! target snapshot. Headers are normalized, the period is kept as a string and
//! history is sorted by `(customer_id, period)`.
//!
//! Entry points: [`CsvSource::new`], [`DataSource::load`],
//! [`DataSource::fingerprint`]. Configuration via [`SourceConfig::builder`].

pub mod columns;

use std::fs::File;
use std::path::{Path, PathBuf};

use columns::{
    CURRENT_SPEND, CUSTOMER_ID, HeaderIndex, PERIOD, TRAILING_3M_SPEND, TRAILING_3M_TOTAL,
    category_column,
};
use domain::{
    CATEGORY_COUNT, Category, CustomerType, DataSource, FileStamp, LoadError, SourceFingerprint,
    SourceTables, TargetRecord, TransactionRecord,
};

/// History file of the general population (also its own target).
pub const GENERAL_HISTORY_FILE: &str = "general_churn_sample_3000.csv";
/// History file of the VIP population.
pub const VIP_HISTORY_FILE: &str = "VIP_Target_History_Data.csv";
/// Target snapshot of the VIP population.
pub const VIP_TARGET_FILE: &str = "VIP_30K_Target_Churn_1000.csv";

// ---------------------------------------------------------------------------
// LoaderError
// ---------------------------------------------------------------------------

/// Errors raised while configuring a loader. Loading itself reports [`LoadError`].
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// The supplied configuration is invalid.
    #[error("invalid source configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// SourceConfig + builder
// ---------------------------------------------------------------------------

/// Files read for one customer type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    /// Transaction history.
    pub history: PathBuf,
    /// Optional target snapshot.
    pub target: Option<PathBuf>,
}

impl SourcePaths {
    /// All paths in fixed order: history first.
    #[must_use]
    pub fn all(&self) -> Vec<PathBuf> {
        std::iter::once(self.history.clone()).chain(self.target.clone()).collect()
    }
}

/// Which files back each customer type.
///
/// Construct via [`SourceConfig::builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Files for [`CustomerType::General`].
    pub general: SourcePaths,
    /// Files for [`CustomerType::Vip`].
    pub vip: SourcePaths,
}

impl SourceConfig {
    /// Create a builder resolving the default file names against `data_dir`.
    ///
    /// Defaults: general reads [`GENERAL_HISTORY_FILE`] with no separate target;
    /// VIP reads [`VIP_HISTORY_FILE`] and [`VIP_TARGET_FILE`].
    #[must_use]
    pub fn builder(data_dir: impl AsRef<Path>) -> SourceConfigBuilder {
        let dir = data_dir.as_ref();
        SourceConfigBuilder {
            general: SourcePaths { history: dir.join(GENERAL_HISTORY_FILE), target: None },
            vip: SourcePaths {
                history: dir.join(VIP_HISTORY_FILE),
                target: Some(dir.join(VIP_TARGET_FILE)),
            },
        }
    }

    /// Paths configured for `customer_type`.
    #[must_use]
    pub fn paths(&self, customer_type: CustomerType) -> &SourcePaths {
        match customer_type {
            CustomerType::General => &self.general,
            CustomerType::Vip => &self.vip,
        }
    }
}

/// Builder for [`SourceConfig`].
///
/// Obtain via [`SourceConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct SourceConfigBuilder {
    general: SourcePaths,
    vip: SourcePaths,
}

impl SourceConfigBuilder {
    fn paths_mut(&mut self, customer_type: CustomerType) -> &mut SourcePaths {
        match customer_type {
            CustomerType::General => &mut self.general,
            CustomerType::Vip => &mut self.vip,
        }
    }

    /// Override the history file of `customer_type`.
    #[must_use]
    pub fn history(mut self, customer_type: CustomerType, path: impl Into<PathBuf>) -> Self {
        self.paths_mut(customer_type).history = path.into();
        self
    }

    /// Override (or remove, with `None`) the target snapshot of `customer_type`.
    #[must_use]
    pub fn target(mut self, customer_type: CustomerType, path: Option<PathBuf>) -> Self {
        self.paths_mut(customer_type).target = path;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidConfig`] when a history path is empty.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<SourceConfig, LoaderError> {
        for (customer_type, paths) in
            [(CustomerType::General, &self.general), (CustomerType::Vip, &self.vip)]
        {
            if paths.history.as_os_str().is_empty() {
                return Err(LoaderError::InvalidConfig {
                    reason: format!("{customer_type} history path must not be empty"),
                });
            }
        }
        Ok(SourceConfig { general: self.general, vip: self.vip })
    }
}

// ---------------------------------------------------------------------------
// CsvSource
// ---------------------------------------------------------------------------

/// `DataSource` adapter reading comma-separated files from disk.
#[derive(Debug, Clone)]
pub struct CsvSource {
    config: SourceConfig,
}

impl CsvSource {
    /// Create a source reading the files named by `config`.
    #[must_use]
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    /// The configuration this source reads from.
    #[must_use]
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

impl DataSource for CsvSource {
    fn load(&self, customer_type: CustomerType) -> Result<SourceTables, LoadError> {
        let paths = self.config.paths(customer_type);
        let history = read_history(&paths.history)?;
        let target = match (customer_type, paths.target.as_deref()) {
            (_, None) => None,
            (CustomerType::Vip, Some(path)) => Some(read_target(path)?),
            // The general target is an optional override; history alone still scores.
            (CustomerType::General, Some(path)) => match read_target(path) {
                Ok(target) => Some(target),
                Err(e) => {
                    tracing::warn!(error = %e, "loader.load: general target ignored");
                    None
                }
            },
        };
        tracing::info!(
            %customer_type,
            history_rows = history.len(),
            target_rows = target.as_ref().map_or(0, Vec::len),
            "loader.load"
        );
        Ok(SourceTables { history, target })
    }

    fn fingerprint(&self, customer_type: CustomerType) -> SourceFingerprint {
        let paths = self.config.paths(customer_type).all();
        let stamps = paths.iter().map(|p| stamp(p.as_path())).collect();
        SourceFingerprint { paths, stamps }
    }
}

/// Length and modification time of `path`, or `None` when it cannot be inspected.
fn stamp(path: &Path) -> Option<FileStamp> {
    let meta = std::fs::metadata(path).ok()?;
    Some(FileStamp { len: meta.len(), modified: meta.modified().ok() })
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<(csv::Reader<File>, HeaderIndex), LoadError> {
    let file = File::open(path).map_err(|source| LoadError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    // Flexible: short rows zero-fill their missing cells instead of failing the load.
    let mut reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(file);
    let headers = reader.headers().map_err(|e| malformed(path, &e))?;
    let index = HeaderIndex::new(headers.iter());
    Ok((reader, index))
}

fn malformed(path: &Path, err: &csv::Error) -> LoadError {
    LoadError::Malformed {
        path: path.to_path_buf(),
        line: err.position().map_or(0, csv::Position::line),
        reason: err.to_string(),
    }
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}

/// Trimmed text of field `idx`; empty when the row is short.
fn text(record: &csv::StringRecord, idx: usize) -> &str {
    record.get(idx).map_or("", str::trim)
}

/// Numeric value of field `idx`. Blank, unparseable or non-finite cells count as zero.
fn number(record: &csv::StringRecord, idx: usize) -> f64 {
    let raw = text(record, idx);
    if raw.is_empty() {
        return 0.0;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            tracing::debug!(line = line_of(record), field = idx, value = raw, "loader.non_numeric");
            0.0
        }
    }
}

/// Read a history file.
///
/// Identifier, period, both credit-spend columns and all category columns are
/// required; the three-month aggregate defaults to zero.
fn read_history(path: &Path) -> Result<Vec<TransactionRecord>, LoadError> {
    let (mut reader, index) = open(path)?;
    let id_idx = index.require(&CUSTOMER_ID, path)?;
    let period_idx = index.require(&PERIOD, path)?;
    let current_idx = index.require(&CURRENT_SPEND, path)?;
    let trailing_idx = index.require(&TRAILING_3M_SPEND, path)?;
    let total_idx = index.find(&TRAILING_3M_TOTAL);
    let mut category_idx = [0usize; CATEGORY_COUNT];
    for category in Category::ALL {
        category_idx[category.index()] = index.require(&category_column(category), path)?;
    }
    if total_idx.is_none() {
        tracing::debug!(path = %path.display(), "loader.history: no aggregate column, using 0");
    }

    let mut history = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| malformed(path, &e))?;
        let customer_id = text(&record, id_idx);
        if customer_id.is_empty() {
            tracing::debug!(line = line_of(&record), "loader.history: row without customer id skipped");
            continue;
        }
        let mut category_spend = [0.0; CATEGORY_COUNT];
        for (slot, &idx) in category_spend.iter_mut().zip(&category_idx) {
            *slot = number(&record, idx);
        }
        history.push(TransactionRecord {
            customer_id: customer_id.to_owned(),
            period: text(&record, period_idx).to_owned(),
            current_spend: number(&record, current_idx),
            trailing_3m_spend: number(&record, trailing_idx),
            trailing_3m_total: total_idx.map_or(0.0, |idx| number(&record, idx)),
            category_spend,
        });
    }

    // Stable: rows sharing a key keep file order.
    history.sort_by(|a, b| {
        (a.customer_id.as_str(), a.period.as_str()).cmp(&(b.customer_id.as_str(), b.period.as_str()))
    });
    Ok(history)
}

/// Read a target snapshot. Only the identifier is required.
fn read_target(path: &Path) -> Result<Vec<TargetRecord>, LoadError> {
    let (mut reader, index) = open(path)?;
    let id_idx = index.require(&CUSTOMER_ID, path)?;
    let total_idx = index.find(&TRAILING_3M_TOTAL);
    if total_idx.is_none() {
        tracing::debug!(path = %path.display(), "loader.target: no aggregate column, using 0");
    }

    let mut target = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| malformed(path, &e))?;
        let customer_id = text(&record, id_idx);
        if customer_id.is_empty() {
            continue;
        }
        target.push(TargetRecord {
            customer_id: customer_id.to_owned(),
            trailing_3m_total: total_idx.map_or(0.0, |idx| number(&record, idx)),
        });
    }
    Ok(target)
}
