// Rust guideline compliant 2026-10-14

//! Report views built from a snapshot: individual customer report and
//! population overview.

use domain::{Category, CustomerSummary, CustomerType, DerivedRecord, RiskTier, Segment};
use serde::Serialize;

/// One month of an individual report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRow {
    /// Year-month key.
    pub period: String,
    /// Current-month credit spend.
    pub current_spend: f64,
    /// Trailing three-month average.
    pub avg_3m_spend: f64,
    /// Highest-spend category of the month.
    pub top_category: Category,
    /// Month carries a churn sign.
    pub at_risk: bool,
}

/// Verdict on a customer's latest month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Diagnosis {
    /// Latest spend fell below 80% of the trailing average, or to zero.
    AtRisk {
        /// Period of the flagged month.
        period: String,
    },
    /// Latest spend holds up against the trailing average.
    Stable,
}

impl Diagnosis {
    /// One-line explanation shown next to the verdict.
    #[must_use]
    pub fn rationale(&self) -> &'static str {
        match self {
            Self::AtRisk { .. } => {
                "recent spend dropped below 80% of the previous three-month average"
            }
            Self::Stable => "recent spend holds up against the previous three-month average",
        }
    }
}

/// Individual report: spend trend, diagnosis and strategy for one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerReport {
    /// Opaque identifier.
    pub customer_id: String,
    /// Chronological monthly rows.
    pub months: Vec<MonthlyRow>,
    /// Verdict on the latest month.
    pub diagnosis: Diagnosis,
    /// Summed spend per category over the whole history, canonical order.
    pub category_totals: Vec<(Category, f64)>,
    /// Category with the highest summed spend.
    pub main_category: Option<Category>,
    /// Retention action for `main_category`.
    pub solution: String,
    /// Tier-aware marketing guide, when the customer has a summary.
    pub recommendation: Option<String>,
    /// The customer's summary row, when one exists.
    pub summary: Option<CustomerSummary>,
}

impl CustomerReport {
    /// Build a report from a customer's chronological history.
    ///
    /// Returns `None` when `history` is empty.
    pub(crate) fn build(
        customer_type: CustomerType,
        history: &[DerivedRecord],
        summary: Option<&CustomerSummary>,
    ) -> Option<Self> {
        let latest = history.last()?;
        let months = history
            .iter()
            .map(|r| MonthlyRow {
                period: r.period().to_owned(),
                current_spend: r.record.current_spend,
                avg_3m_spend: r.metrics.avg_3m_spend,
                top_category: r.top_category(),
                at_risk: r.metrics.is_flagged(),
            })
            .collect();
        let diagnosis = if latest.metrics.is_flagged() {
            Diagnosis::AtRisk { period: latest.period().to_owned() }
        } else {
            Diagnosis::Stable
        };
        let totals = scoring::category_totals(history);
        let main_category = scoring::main_interest(history);
        Some(Self {
            customer_id: latest.customer_id().to_owned(),
            months,
            diagnosis,
            category_totals: Category::ALL.into_iter().map(|c| (c, totals[c.index()])).collect(),
            main_category,
            solution: advisor::category_solution(main_category).to_owned(),
            recommendation: summary
                .map(|s| advisor::recommend(customer_type, Some(s.risk_tier), s.main_interest)),
            summary: summary.cloned(),
        })
    }
}

/// Number of customers in one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierCount {
    /// The tier.
    pub tier: RiskTier,
    /// Customers classified into it.
    pub customers: usize,
}

/// Population figures for one customer type, computed from loaded data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    /// Population described.
    pub customer_type: CustomerType,
    /// Summarized customers.
    pub customers: usize,
    /// Sum of `total_spend`: revenue worth protecting.
    pub protected_spend: f64,
    /// Mean display probability; `None` for an empty population.
    pub mean_churn_probability: Option<f64>,
    /// Customers per tier applicable to the type.
    pub tiers: Vec<TierCount>,
    /// Customers in the `Save` segment.
    pub save_segment: usize,
    /// Customers in the `Warning` segment.
    pub warning_segment: usize,
}

impl Overview {
    pub(crate) fn build(customer_type: CustomerType, summaries: &[CustomerSummary]) -> Self {
        let tiers: &[RiskTier] = match customer_type {
            CustomerType::General => &RiskTier::GENERAL,
            CustomerType::Vip => &[RiskTier::VipValid],
        };
        let mean_churn_probability = (!summaries.is_empty()).then(|| {
            summaries.iter().map(|s| s.churn_probability).sum::<f64>() / as_f64(summaries.len())
        });
        let save_segment = summaries.iter().filter(|s| s.segment == Segment::Save).count();
        Self {
            customer_type,
            customers: summaries.len(),
            protected_spend: summaries.iter().map(|s| s.total_spend).sum(),
            mean_churn_probability,
            tiers: tiers
                .iter()
                .map(|&tier| TierCount {
                    tier,
                    customers: summaries.iter().filter(|s| s.risk_tier == tier).count(),
                })
                .collect(),
            save_segment,
            warning_segment: summaries.len() - save_segment,
        }
    }

    /// Share of customers in `tier`, in `[0, 1]`; `0` for an empty population.
    #[must_use]
    pub fn share(&self, tier: RiskTier) -> f64 {
        let count = self.tiers.iter().find(|t| t.tier == tier).map_or(0, |t| t.customers);
        if self.customers == 0 {
            return 0.0;
        }
        as_f64(count) / as_f64(self.customers)
    }
}

#[expect(clippy::cast_precision_loss, reason = "customer counts stay far below 2^52")]
fn as_f64(count: usize) -> f64 {
    count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{CATEGORY_COUNT, DerivedMetrics, TransactionRecord};

    fn month(period: &str, current: f64, flag: u8, category: Category) -> DerivedRecord {
        let mut category_spend = [0.0; CATEGORY_COUNT];
        category_spend[category.index()] = current.max(1.0);
        DerivedRecord {
            record: TransactionRecord {
                customer_id: "C1".to_owned(),
                period: period.to_owned(),
                current_spend: current,
                trailing_3m_spend: 300.0,
                trailing_3m_total: 0.0,
                category_spend,
            },
            metrics: DerivedMetrics { avg_3m_spend: 100.0, churn_flag: flag },
        }
    }

    fn summary(id: &str, tier: RiskTier, spend: f64, segment: Segment) -> CustomerSummary {
        CustomerSummary {
            customer_id: id.to_owned(),
            total_churn_flag_count: 0,
            total_spend: spend,
            last_spend: 0.0,
            risk_tier: tier,
            main_interest: Some(Category::Leisure),
            churn_probability: 0.8,
            segment,
        }
    }

    #[test]
    fn report_flags_latest_month() {
        let history = [
            month("202301", 200.0, 0, Category::Education),
            month("202302", 0.0, 1, Category::Education),
        ];
        let report = CustomerReport::build(CustomerType::General, &history, None).unwrap();
        assert_eq!(report.months.len(), 2);
        assert!(report.months[1].at_risk);
        assert_eq!(report.diagnosis, Diagnosis::AtRisk { period: "202302".to_owned() });
        assert_eq!(report.main_category, Some(Category::Education));
        assert_eq!(report.solution, advisor::category_solution(Some(Category::Education)));
        assert!(report.recommendation.is_none());
    }

    #[test]
    fn report_is_stable_when_latest_month_holds() {
        let history = [
            month("202301", 0.0, 1, Category::Dining),
            month("202302", 150.0, 0, Category::Overseas),
        ];
        let s = summary("C1", RiskTier::Safe, 10.0, Segment::Warning);
        let report = CustomerReport::build(CustomerType::General, &history, Some(&s)).unwrap();
        assert_eq!(report.diagnosis, Diagnosis::Stable);
        assert_eq!(report.months[1].top_category, Category::Overseas);
        assert_eq!(report.category_totals.len(), CATEGORY_COUNT);
        assert!(report.recommendation.unwrap().starts_with("[Retention]"));
    }

    #[test]
    fn empty_history_has_no_report() {
        assert!(CustomerReport::build(CustomerType::Vip, &[], None).is_none());
    }

    #[test]
    fn overview_counts_tiers_and_segments() {
        let summaries = [
            summary("A", RiskTier::Safe, 100.0, Segment::Warning),
            summary("B", RiskTier::HighRisk, 300.0, Segment::Save),
            summary("C", RiskTier::HighRisk, 200.0, Segment::Save),
            summary("D", RiskTier::AtRisk, 50.0, Segment::Warning),
        ];
        let overview = Overview::build(CustomerType::General, &summaries);
        assert_eq!(overview.customers, 4);
        assert!((overview.protected_spend - 650.0).abs() < 1e-9);
        assert!((overview.mean_churn_probability.unwrap() - 0.8).abs() < 1e-9);
        let counts: Vec<usize> = overview.tiers.iter().map(|t| t.customers).collect();
        assert_eq!(counts, [1, 1, 2]);
        assert_eq!((overview.save_segment, overview.warning_segment), (2, 2));
        assert!((overview.share(RiskTier::HighRisk) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_overview_has_no_mean() {
        let overview = Overview::build(CustomerType::Vip, &[]);
        assert_eq!(overview.customers, 0);
        assert!(overview.mean_churn_probability.is_none());
        assert!(overview.share(RiskTier::VipValid).abs() < f64::EPSILON);
        assert_eq!(overview.tiers, [TierCount { tier: RiskTier::VipValid, customers: 0 }]);
    }
}
