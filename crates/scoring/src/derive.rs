// Rust guideline compliant 2026-10-13

//! Metric deriver: row-level average spend and churn check.

use domain::{DerivedMetrics, DerivedRecord, TransactionRecord};

/// Months covered by `trailing_3m_spend`.
const TRAILING_MONTHS: f64 = 3.0;

/// Share of the trailing average below which the current month counts as a drop.
pub const CHURN_DROP_RATIO: f64 = 0.8;

/// Compute the metrics of one history row. Pure; looks at no other row.
///
/// A month is flagged when nothing (or a net refund) was spent, or when spend
/// fell below 80% of a positive trailing average. The positivity guard does not
/// change the outcome for finite values: a non-positive average can only be
/// undercut by a non-positive current spend, which the first clause flags.
#[must_use]
pub fn derive(record: &TransactionRecord) -> DerivedMetrics {
    let avg_3m_spend = record.trailing_3m_spend / TRAILING_MONTHS;
    let dropped = avg_3m_spend > 0.0 && record.current_spend < avg_3m_spend * CHURN_DROP_RATIO;
    let churn_flag = u8::from(record.current_spend <= 0.0 || dropped);
    DerivedMetrics { avg_3m_spend, churn_flag }
}

/// Derive every row of `history`, restoring `(customer_id, period)` order first.
///
/// Sources are expected to deliver sorted rows already; the stable re-sort is a
/// no-op for them and keeps grouping correct for any other source.
#[must_use]
pub fn derive_all(mut history: Vec<TransactionRecord>) -> Vec<DerivedRecord> {
    history.sort_by(|a, b| {
        (a.customer_id.as_str(), a.period.as_str()).cmp(&(b.customer_id.as_str(), b.period.as_str()))
    });
    tracing::debug!(rows = history.len(), "scoring.derive_all");
    history
        .into_iter()
        .map(|record| {
            let metrics = derive(&record);
            DerivedRecord { record, metrics }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::CATEGORY_COUNT;

    fn row(id: &str, period: &str, current_spend: f64, avg_3m_spend: f64) -> TransactionRecord {
        TransactionRecord {
            customer_id: id.to_owned(),
            period: period.to_owned(),
            current_spend,
            trailing_3m_spend: avg_3m_spend * 3.0,
            trailing_3m_total: 0.0,
            category_spend: [0.0; CATEGORY_COUNT],
        }
    }

    #[test]
    fn zero_spend_is_flagged_whatever_the_average() {
        for avg in [-50.0, 0.0, 10.0, 1_000.0] {
            assert_eq!(derive(&row("A", "202301", 0.0, avg)).churn_flag, 1, "avg={avg}");
        }
    }

    #[test]
    fn drop_below_eighty_percent_is_flagged() {
        // 100 < 200 * 0.8
        assert_eq!(derive(&row("A", "202301", 100.0, 200.0)).churn_flag, 1);
    }

    #[test]
    fn spend_above_threshold_is_not_flagged() {
        // 150 >= 100 * 0.8
        assert_eq!(derive(&row("A", "202301", 150.0, 100.0)).churn_flag, 0);
        // Exactly at the threshold is not a drop.
        assert_eq!(derive(&row("A", "202301", 80.0, 100.0)).churn_flag, 0);
    }

    #[test]
    fn negative_average_with_positive_spend_is_not_flagged() {
        assert_eq!(derive(&row("A", "202301", 10.0, -30.0)).churn_flag, 0);
        assert_eq!(derive(&row("A", "202301", -10.0, -30.0)).churn_flag, 1);
    }

    #[test]
    fn guarded_and_unguarded_rules_agree() {
        let values = [-300.0, -80.0, -1.0, 0.0, 0.5, 1.0, 79.0, 80.0, 81.0, 160.0, 400.0];
        for &current in &values {
            for &avg in &values {
                let unguarded = u8::from(current <= 0.0 || current < avg * CHURN_DROP_RATIO);
                let metrics = derive(&row("A", "202301", current, avg));
                assert_eq!(metrics.churn_flag, unguarded, "current={current} avg={avg}");
                assert!(metrics.churn_flag <= 1);
            }
        }
    }

    #[test]
    fn average_is_a_third_of_trailing_spend() {
        let mut r = row("A", "202301", 1.0, 0.0);
        r.trailing_3m_spend = 90.0;
        assert!((derive(&r).avg_3m_spend - 30.0).abs() < 1e-9);
    }

    #[test]
    fn derive_all_orders_by_customer_then_period() {
        let rows = vec![
            row("B", "202301", 1.0, 1.0),
            row("A", "202302", 1.0, 1.0),
            row("A", "202301", 0.0, 1.0),
        ];
        let derived = derive_all(rows);
        let keys: Vec<(&str, &str)> = derived.iter().map(|d| (d.customer_id(), d.period())).collect();
        assert_eq!(keys, [("A", "202301"), ("A", "202302"), ("B", "202301")]);
        assert!(derived[0].metrics.is_flagged());
    }
}
