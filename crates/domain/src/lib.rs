// Rust guideline compliant 2026-10-12

//! Shared domain types for the churn-risk dashboard.
//!
//! Defines the monthly `TransactionRecord`, its `DerivedMetrics`, the
//! per-customer `CustomerSummary`, the error taxonomy of a load (`LoadError`)
//! and the hexagonal `DataSource` port. Every other crate of the workspace
//! depends on this one; it depends on nothing but `serde` and `thiserror`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::SystemTime;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Number of spending categories carried by every history row.
pub const CATEGORY_COUNT: usize = 10;

/// Spending category of a card transaction.
///
/// Declaration order is the canonical column order; argmax ties are broken by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Department stores, online malls.
    Shopping,
    /// Restaurants and cafes.
    Dining,
    /// Fuel, public transport, taxis.
    Transport,
    /// Hospitals and pharmacies.
    Medical,
    /// Utility bills, telecom, insurance.
    BillPayment,
    /// Academies and tuition.
    Education,
    /// Travel, lodging, hobbies.
    Leisure,
    /// Golf, clubs, gatherings.
    Social,
    /// Supermarkets and convenience stores.
    DailyLiving,
    /// Spend abroad and duty-free.
    Overseas,
}

impl Category {
    /// All categories in canonical column order.
    pub const ALL: [Self; CATEGORY_COUNT] = [
        Self::Shopping,
        Self::Dining,
        Self::Transport,
        Self::Medical,
        Self::BillPayment,
        Self::Education,
        Self::Leisure,
        Self::Social,
        Self::DailyLiving,
        Self::Overseas,
    ];

    /// Position of the category in [`Category::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable kebab-case label, e.g. `"bill-payment"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Shopping => "shopping",
            Self::Dining => "dining",
            Self::Transport => "transport",
            Self::Medical => "medical",
            Self::BillPayment => "bill-payment",
            Self::Education => "education",
            Self::Leisure => "leisure",
            Self::Social => "social",
            Self::DailyLiving => "daily-living",
            Self::Overseas => "overseas",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A label did not name any known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {label}")]
pub struct UnknownCategory {
    /// The label as supplied.
    pub label: String,
}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive; `_` and ` ` are accepted in place of `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|c| c.label() == normalized)
            .ok_or_else(|| UnknownCategory { label: s.to_owned() })
    }
}

// ---------------------------------------------------------------------------
// CustomerType
// ---------------------------------------------------------------------------

/// Customer population the dashboard is looking at.
///
/// Selects which sources are read, which thresholds apply and which
/// recommendation table is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    /// Regular card holders; scored by churn-check history.
    General,
    /// Pre-qualified premium card holders.
    Vip,
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General => f.write_str("general"),
            Self::Vip => f.write_str("vip"),
        }
    }
}

/// A label did not name a customer type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown customer type: {label} (expected `general` or `vip`)")]
pub struct UnknownCustomerType {
    /// The label as supplied.
    pub label: String,
}

impl FromStr for CustomerType {
    type Err = UnknownCustomerType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(Self::General),
            "vip" => Ok(Self::Vip),
            _ => Err(UnknownCustomerType { label: s.to_owned() }),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One row of transaction history: one customer, one reporting month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    /// Opaque identifier, stable across months.
    pub customer_id: String,
    /// Year-month key (`"202301"`); fixed width, so lexicographic order is chronological.
    pub period: String,
    /// Current-month credit spend. May be zero or negative (refunds).
    pub current_spend: f64,
    /// Sum of the previous three months' credit spend.
    pub trailing_3m_spend: f64,
    /// Three-month credit + check aggregate; `0.0` when the source lacks the column.
    pub trailing_3m_total: f64,
    /// Spend per category, indexed by [`Category::index`].
    pub category_spend: [f64; CATEGORY_COUNT],
}

impl TransactionRecord {
    /// Spend recorded for `category` in this month.
    #[must_use]
    pub fn spend_in(&self, category: Category) -> f64 {
        self.category_spend[category.index()]
    }
}

/// Row-level metrics computed from a single [`TransactionRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    /// `trailing_3m_spend / 3`.
    pub avg_3m_spend: f64,
    /// `1` when the month shows a churn sign, `0` otherwise.
    pub churn_flag: u8,
}

impl DerivedMetrics {
    /// `true` when `churn_flag == 1`.
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        self.churn_flag == 1
    }
}

/// A history row enriched with its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRecord {
    /// Original row (composition).
    #[serde(flatten)]
    pub record: TransactionRecord,
    /// Metrics derived from `record` alone.
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

impl DerivedRecord {
    /// Customer identifier, delegating to the wrapped record.
    #[must_use]
    pub fn customer_id(&self) -> &str {
        &self.record.customer_id
    }

    /// Period key, delegating to the wrapped record.
    #[must_use]
    pub fn period(&self) -> &str {
        &self.record.period
    }

    /// Highest-spend category of this month; the first category wins ties.
    #[must_use]
    pub fn top_category(&self) -> Category {
        let mut best = Category::Shopping;
        for category in Category::ALL {
            if self.record.spend_in(category) > self.record.spend_in(best) {
                best = category;
            }
        }
        best
    }
}

/// One row of a target snapshot: a customer pre-selected for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetRecord {
    /// Opaque identifier matching [`TransactionRecord::customer_id`].
    pub customer_id: String,
    /// Three-month credit + check aggregate; `0.0` when the source lacks the column.
    pub trailing_3m_total: f64,
}

/// The two tables a load produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTables {
    /// Full history, sorted by `(customer_id, period)`.
    pub history: Vec<TransactionRecord>,
    /// Target snapshot, when the customer type has a separate one.
    pub target: Option<Vec<TargetRecord>>,
}

impl SourceTables {
    /// Tables with no rows, returned by fail-soft loads.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// `true` when neither table holds a row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.target.as_ref().is_none_or(Vec::is_empty)
    }
}

// ---------------------------------------------------------------------------
// Risk tier, segment, summary
// ---------------------------------------------------------------------------

/// Churn-check count from which a general customer is high risk.
pub const HIGH_RISK_THRESHOLD: u32 = 5;
/// Churn-check count from which a general customer is at risk.
pub const AT_RISK_THRESHOLD: u32 = 3;

/// Severity classification of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskTier {
    /// Fewer than [`AT_RISK_THRESHOLD`] churn checks.
    Safe,
    /// Between [`AT_RISK_THRESHOLD`] and [`HIGH_RISK_THRESHOLD`] (exclusive).
    AtRisk,
    /// [`HIGH_RISK_THRESHOLD`] churn checks or more.
    HighRisk,
    /// Constant tag of VIP customers, who are pre-qualified.
    VipValid,
}

impl RiskTier {
    /// Tiers that apply to general customers, least severe first.
    pub const GENERAL: [Self; 3] = [Self::Safe, Self::AtRisk, Self::HighRisk];

    /// Classify a general customer by their total churn-check count.
    #[must_use]
    pub fn classify(total_churn_flag_count: u32) -> Self {
        if total_churn_flag_count >= HIGH_RISK_THRESHOLD {
            Self::HighRisk
        } else if total_churn_flag_count >= AT_RISK_THRESHOLD {
            Self::AtRisk
        } else {
            Self::Safe
        }
    }

    /// Ordinal severity; `classify` is monotonic in it.
    #[must_use]
    pub fn severity(self) -> u8 {
        match self {
            Self::Safe | Self::VipValid => 0,
            Self::AtRisk => 1,
            Self::HighRisk => 2,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Safe => "safe",
            Self::AtRisk => "at-risk",
            Self::HighRisk => "high-risk",
            Self::VipValid => "vip-valid",
        })
    }
}

/// A label did not name a risk tier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown risk tier: {label}")]
pub struct UnknownRiskTier {
    /// The label as supplied.
    pub label: String,
}

impl FromStr for RiskTier {
    type Err = UnknownRiskTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "safe" => Ok(Self::Safe),
            "at-risk" => Ok(Self::AtRisk),
            "high-risk" => Ok(Self::HighRisk),
            "vip-valid" => Ok(Self::VipValid),
            _ => Err(UnknownRiskTier { label: s.to_owned() }),
        }
    }
}

/// Coarse split of the population around the median total spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Segment {
    /// Total spend strictly above the median: worth a retention budget.
    Save,
    /// Total spend at or below the median.
    Warning,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Save => f.write_str("Save"),
            Self::Warning => f.write_str("Warning"),
        }
    }
}

/// Per-customer projection of the loaded history. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
    /// Opaque identifier.
    pub customer_id: String,
    /// Sum of `churn_flag` over the customer's history (always 0 for VIP).
    pub total_churn_flag_count: u32,
    /// Last known three-month aggregate spend.
    pub total_spend: f64,
    /// Last known current-month spend.
    pub last_spend: f64,
    /// Severity classification.
    pub risk_tier: RiskTier,
    /// Category with the highest cumulative spend; `None` without history.
    pub main_interest: Option<Category>,
    /// Synthetic display value in `[0.70, 0.99)`. Not a modeled probability.
    pub churn_probability: f64,
    /// Median split on `total_spend`.
    pub segment: Segment,
}

impl CustomerSummary {
    /// Bubble size for scatter plots: `|total_spend|`, never negative.
    #[must_use]
    pub fn marker_size(&self) -> f64 {
        self.total_spend.abs().max(0.0)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors a [`DataSource`] may return while producing [`SourceTables`].
///
/// Consumers recover from every variant by treating the load as empty.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file is missing or unreadable.
    #[error("source unavailable: {path}: {source}")]
    SourceUnavailable {
        /// Offending file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A column needed for row identity, ordering or scoring is absent.
    #[error("schema mismatch: {path}: missing column `{column}`")]
    SchemaMismatch {
        /// Offending file.
        path: PathBuf,
        /// Canonical name of the missing column.
        column: &'static str,
    },
    /// A row could not be parsed at all.
    #[error("malformed source: {path} line {line}: {reason}")]
    Malformed {
        /// Offending file.
        path: PathBuf,
        /// 1-based line number, header included.
        line: u64,
        /// Human-readable description.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// DataSource port
// ---------------------------------------------------------------------------

/// Size and modification time of one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    /// Length in bytes.
    pub len: u64,
    /// Last modification time, when the platform reports one.
    pub modified: Option<SystemTime>,
}

/// Identity and freshness of the inputs behind one customer type.
///
/// `paths` keys a cache; `stamps` tells whether a cached entry is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFingerprint {
    /// Input files, in a fixed order.
    pub paths: Vec<PathBuf>,
    /// One stamp per path; `None` when the file could not be inspected.
    pub stamps: Vec<Option<FileStamp>>,
}

/// Hexagonal port: where history and target tables come from.
///
/// Implementations live outside the domain (e.g. the CSV adapter in the
/// `loader` crate, or in-memory fakes in tests). Loads are synchronous and
/// side-effect free, so results may be memoized by fingerprint.
pub trait DataSource {
    /// Read and normalize the tables for `customer_type`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::SourceUnavailable`] for unreadable files,
    /// [`LoadError::SchemaMismatch`] when a required column is absent and
    /// [`LoadError::Malformed`] when a row cannot be parsed.
    fn load(&self, customer_type: CustomerType) -> Result<SourceTables, LoadError>;

    /// Current identity and freshness of the inputs for `customer_type`.
    fn fingerprint(&self, customer_type: CustomerType) -> SourceFingerprint;
}
