// Rust guideline compliant 2026-10-13

//! Risk aggregator: one [`CustomerSummary`] per customer.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use domain::{
    CATEGORY_COUNT, Category, CustomerSummary, CustomerType, DerivedRecord, RiskTier, Segment,
    TargetRecord,
};
use rand::Rng;

/// Range of the synthetic display probability.
pub const CHURN_PROBABILITY_RANGE: Range<f64> = 0.70..0.99;

/// Summed spend per category over `rows`, indexed by [`Category::index`].
#[must_use]
pub fn category_totals(rows: &[DerivedRecord]) -> [f64; CATEGORY_COUNT] {
    let mut totals = [0.0; CATEGORY_COUNT];
    for row in rows {
        for (total, spend) in totals.iter_mut().zip(row.record.category_spend) {
            *total += spend;
        }
    }
    totals
}

/// Category with the highest summed spend over `rows`.
///
/// The first category in canonical order wins ties. `None` when `rows` is empty.
#[must_use]
pub fn main_interest(rows: &[DerivedRecord]) -> Option<Category> {
    if rows.is_empty() {
        return None;
    }
    let totals = category_totals(rows);
    let mut best = Category::Shopping;
    for category in Category::ALL {
        if totals[category.index()] > totals[best.index()] {
            best = category;
        }
    }
    Some(best)
}

/// Median of `values`; the mean of the two middle values for even counts.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Summary fields known before the population-wide pass.
struct Draft {
    customer_id: String,
    total_churn_flag_count: u32,
    total_spend: f64,
    last_spend: f64,
    risk_tier: RiskTier,
    main_interest: Option<Category>,
}

/// Contiguous runs of rows sharing a customer id. `history` must be sorted.
fn by_customer(history: &[DerivedRecord]) -> impl Iterator<Item = &[DerivedRecord]> {
    history.chunk_by(|a, b| a.customer_id() == b.customer_id())
}

/// First aggregate per target id; later duplicates are ignored.
fn target_totals(target: &[TargetRecord]) -> HashMap<&str, f64> {
    let mut totals = HashMap::with_capacity(target.len());
    for t in target {
        totals.entry(t.customer_id.as_str()).or_insert(t.trailing_3m_total);
    }
    totals
}

fn general_drafts(history: &[DerivedRecord], target: Option<&[TargetRecord]>) -> Vec<Draft> {
    let overrides = target.map(target_totals);
    let mut drafts = Vec::new();
    for rows in by_customer(history) {
        let Some(last) = rows.last() else { continue };
        let total_churn_flag_count: u32 = rows.iter().map(|r| u32::from(r.metrics.churn_flag)).sum();
        let total_spend = match &overrides {
            Some(totals) => totals.get(last.customer_id()).copied().unwrap_or(0.0),
            None => last.record.trailing_3m_total,
        };
        drafts.push(Draft {
            customer_id: last.customer_id().to_owned(),
            total_churn_flag_count,
            total_spend,
            last_spend: last.record.current_spend,
            risk_tier: RiskTier::classify(total_churn_flag_count),
            main_interest: main_interest(rows),
        });
    }
    drafts
}

fn vip_draft(customer_id: &str, total_spend: f64, rows: Option<&[DerivedRecord]>) -> Draft {
    Draft {
        customer_id: customer_id.to_owned(),
        total_churn_flag_count: 0,
        total_spend,
        last_spend: 0.0,
        risk_tier: RiskTier::VipValid,
        main_interest: rows.and_then(main_interest),
    }
}

fn vip_drafts(history: &[DerivedRecord], target: &[TargetRecord]) -> Vec<Draft> {
    let histories: HashMap<&str, &[DerivedRecord]> =
        by_customer(history).map(|rows| (rows[0].customer_id(), rows)).collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut drafts = Vec::with_capacity(target.len());
    for t in target {
        if !seen.insert(t.customer_id.as_str()) {
            tracing::debug!(customer_id = %t.customer_id, "scoring.vip: duplicate target row ignored");
            continue;
        }
        let rows = histories.get(t.customer_id.as_str()).copied();
        drafts.push(vip_draft(&t.customer_id, t.trailing_3m_total, rows));
    }

    // Customers with history but no target row still get a zero-filled summary.
    let mut zero_filled = 0usize;
    for rows in by_customer(history) {
        let id = rows[0].customer_id();
        if !seen.contains(id) {
            drafts.push(vip_draft(id, 0.0, Some(rows)));
            zero_filled += 1;
        }
    }
    if zero_filled > 0 {
        tracing::debug!(zero_filled, "scoring.vip: history customers missing from target");
    }
    drafts
}

/// Build one summary per customer.
///
/// - General: one summary per history customer, in id order. Churn checks are
///   summed and classified; `total_spend` and `last_spend` come from the
///   customer's latest month. An override `target` replaces `total_spend` by
///   the target aggregate (first row per id); customers absent from it get 0.
///   Target ids without history are not summarized.
/// - VIP: one summary per target row (first occurrence wins), then every
///   history customer absent from the target, zero-filled. Churn count is 0
///   and the tier is [`RiskTier::VipValid`].
///
/// The segment median is taken over the whole result. `rng` draws one display
/// probability per summary, in output order, so a seeded generator makes the
/// result reproducible.
///
/// `history` must be in `(customer_id, period)` order, as produced by
/// [`derive_all`](crate::derive::derive_all).
pub fn summarize<R: Rng>(
    customer_type: CustomerType,
    history: &[DerivedRecord],
    target: Option<&[TargetRecord]>,
    rng: &mut R,
) -> Vec<CustomerSummary> {
    let drafts = match customer_type {
        CustomerType::General => general_drafts(history, target),
        CustomerType::Vip => vip_drafts(history, target.unwrap_or_default()),
    };

    let spends: Vec<f64> = drafts.iter().map(|d| d.total_spend).collect();
    let Some(cut) = median(&spends) else {
        return Vec::new();
    };

    let summaries: Vec<CustomerSummary> = drafts
        .into_iter()
        .map(|d| CustomerSummary {
            segment: if d.total_spend > cut { Segment::Save } else { Segment::Warning },
            churn_probability: rng.random_range(CHURN_PROBABILITY_RANGE),
            customer_id: d.customer_id,
            total_churn_flag_count: d.total_churn_flag_count,
            total_spend: d.total_spend,
            last_spend: d.last_spend,
            risk_tier: d.risk_tier,
            main_interest: d.main_interest,
        })
        .collect();
    tracing::info!(%customer_type, customers = summaries.len(), median = cut, "scoring.summarize");
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive_all;
    use domain::TransactionRecord;
    use rand::{SeedableRng, rngs::StdRng};

    fn row(id: &str, period: &str, current: f64, trailing: f64, total: f64) -> TransactionRecord {
        TransactionRecord {
            customer_id: id.to_owned(),
            period: period.to_owned(),
            current_spend: current,
            trailing_3m_spend: trailing,
            trailing_3m_total: total,
            category_spend: [0.0; CATEGORY_COUNT],
        }
    }

    fn with_spend(mut r: TransactionRecord, category: Category, amount: f64) -> TransactionRecord {
        r.category_spend[category.index()] = amount;
        r
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn find<'a>(summaries: &'a [CustomerSummary], id: &str) -> &'a CustomerSummary {
        summaries.iter().find(|s| s.customer_id == id).unwrap()
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact half-integer results")]
    fn median_of_even_and_odd_sets() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0]).unwrap(), 3.0);
        assert_eq!(median(&[400.0, 100.0, 300.0, 200.0]).unwrap(), 250.0);
        assert_eq!(median(&[5.0, 1.0, 3.0]).unwrap(), 3.0);
    }

    #[test]
    fn main_interest_sums_full_history() {
        let rows = derive_all(vec![
            with_spend(row("A", "202301", 1.0, 1.0, 0.0), Category::Dining, 100.0),
            with_spend(row("A", "202302", 1.0, 1.0, 0.0), Category::Overseas, 60.0),
            with_spend(row("A", "202303", 1.0, 1.0, 0.0), Category::Overseas, 60.0),
        ]);
        assert_eq!(main_interest(&rows), Some(Category::Overseas));
        assert_eq!(main_interest(&[]), None);
    }

    #[test]
    fn main_interest_tie_goes_to_first_column() {
        let rows = derive_all(vec![
            with_spend(row("A", "202301", 1.0, 1.0, 0.0), Category::Leisure, 50.0),
            with_spend(row("A", "202302", 1.0, 1.0, 0.0), Category::Transport, 50.0),
        ]);
        assert_eq!(main_interest(&rows), Some(Category::Transport));
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "values copied from exact literals")]
    fn general_summary_counts_checks_and_takes_last_values() {
        let history = derive_all(vec![
            row("A", "202301", 0.0, 300.0, 10.0),   // flagged
            row("A", "202302", 50.0, 300.0, 20.0),  // flagged: 50 < 80
            row("A", "202303", 100.0, 300.0, 30.0), // not flagged
            row("B", "202301", 500.0, 300.0, 99.0),
        ]);
        let summaries = summarize(CustomerType::General, &history, None, &mut rng());
        assert_eq!(summaries.len(), 2);
        let a = find(&summaries, "A");
        assert_eq!(a.total_churn_flag_count, 2);
        assert_eq!(a.total_spend, 30.0);
        assert_eq!(a.last_spend, 100.0);
        assert_eq!(a.risk_tier, RiskTier::Safe);
        assert_eq!(find(&summaries, "B").total_churn_flag_count, 0);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "values copied from exact literals")]
    fn general_target_overrides_total_spend() {
        let history = derive_all(vec![
            row("A", "202301", 0.0, 300.0, 5.0),
            row("B", "202301", 100.0, 300.0, 7.0),
        ]);
        let target = vec![
            TargetRecord { customer_id: "A".to_owned(), trailing_3m_total: 999.0 },
            TargetRecord { customer_id: "A".to_owned(), trailing_3m_total: 1.0 },
            TargetRecord { customer_id: "Z".to_owned(), trailing_3m_total: 50.0 },
        ];
        let summaries = summarize(CustomerType::General, &history, Some(&target), &mut rng());
        let ids: Vec<&str> = summaries.iter().map(|s| s.customer_id.as_str()).collect();
        assert_eq!(ids, ["A", "B"]);
        let a = find(&summaries, "A");
        assert_eq!(a.total_spend, 999.0);
        assert_eq!(a.total_churn_flag_count, 1);
        assert_eq!(a.segment, Segment::Save);
        assert_eq!(find(&summaries, "B").total_spend, 0.0);
    }

    #[test]
    fn general_tiers_follow_thresholds() {
        let mut rows = Vec::new();
        for (id, flagged) in [("S", 2), ("R", 3), ("H", 5)] {
            for m in 0..6 {
                let current = if m < flagged { 0.0 } else { 10.0 };
                rows.push(row(id, &format!("2023{:02}", m + 1), current, 3.0, 1.0));
            }
        }
        let summaries = summarize(CustomerType::General, &derive_all(rows), None, &mut rng());
        assert_eq!(find(&summaries, "S").risk_tier, RiskTier::Safe);
        assert_eq!(find(&summaries, "R").risk_tier, RiskTier::AtRisk);
        assert_eq!(find(&summaries, "H").risk_tier, RiskTier::HighRisk);
    }

    #[test]
    fn segment_splits_strictly_above_median() {
        let history = derive_all(vec![
            row("A", "202301", 1.0, 1.0, 100.0),
            row("B", "202301", 1.0, 1.0, 200.0),
            row("C", "202301", 1.0, 1.0, 300.0),
            row("D", "202301", 1.0, 1.0, 400.0),
        ]);
        let summaries = summarize(CustomerType::General, &history, None, &mut rng());
        assert_eq!(find(&summaries, "A").segment, Segment::Warning);
        assert_eq!(find(&summaries, "B").segment, Segment::Warning);
        assert_eq!(find(&summaries, "C").segment, Segment::Save);
        assert_eq!(find(&summaries, "D").segment, Segment::Save);
    }

    #[test]
    fn identical_spend_is_all_warning() {
        let history = derive_all(vec![
            row("A", "202301", 1.0, 1.0, 100.0),
            row("B", "202301", 1.0, 1.0, 100.0),
        ]);
        let summaries = summarize(CustomerType::General, &history, None, &mut rng());
        assert!(summaries.iter().all(|s| s.segment == Segment::Warning));
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "values copied from exact literals")]
    fn vip_covers_target_then_zero_fills_history() {
        let history = derive_all(vec![
            with_spend(row("V1", "202301", 0.0, 0.0, 0.0), Category::Medical, 10.0),
            with_spend(row("V9", "202301", 0.0, 0.0, 0.0), Category::Social, 10.0),
        ]);
        let target = vec![
            TargetRecord { customer_id: "V2".to_owned(), trailing_3m_total: 700.0 },
            TargetRecord { customer_id: "V1".to_owned(), trailing_3m_total: 500.0 },
            TargetRecord { customer_id: "V1".to_owned(), trailing_3m_total: 1.0 },
        ];
        let summaries = summarize(CustomerType::Vip, &history, Some(&target), &mut rng());
        let ids: Vec<&str> = summaries.iter().map(|s| s.customer_id.as_str()).collect();
        assert_eq!(ids, ["V2", "V1", "V9"]);

        let v1 = find(&summaries, "V1");
        assert_eq!(v1.total_spend, 500.0);
        assert_eq!(v1.main_interest, Some(Category::Medical));
        assert_eq!(v1.total_churn_flag_count, 0);
        assert!(summaries.iter().all(|s| s.risk_tier == RiskTier::VipValid));

        assert_eq!(find(&summaries, "V2").main_interest, None);
        let v9 = find(&summaries, "V9");
        assert_eq!(v9.total_spend, 0.0);
        assert_eq!(v9.main_interest, Some(Category::Social));
    }

    #[test]
    fn every_history_customer_gets_a_summary() {
        let history = derive_all(vec![
            row("A", "202301", 1.0, 1.0, 1.0),
            row("B", "202301", 1.0, 1.0, 1.0),
            row("C", "202301", 1.0, 1.0, 1.0),
        ]);
        let narrow = vec![TargetRecord { customer_id: "B".to_owned(), trailing_3m_total: 5.0 }];
        for (customer_type, target) in
            [(CustomerType::General, None), (CustomerType::Vip, Some(narrow.as_slice()))]
        {
            let summaries = summarize(customer_type, &history, target, &mut rng());
            for id in ["A", "B", "C"] {
                assert!(summaries.iter().any(|s| s.customer_id == id), "{customer_type}: {id}");
            }
        }
    }

    #[test]
    fn probabilities_stay_in_range_and_are_seeded() {
        let rows: Vec<TransactionRecord> =
            (0..50).map(|i| row(&format!("C{i:03}"), "202301", 1.0, 1.0, f64::from(i))).collect();
        let history = derive_all(rows);
        let first = summarize(CustomerType::General, &history, None, &mut rng());
        let second = summarize(CustomerType::General, &history, None, &mut rng());
        assert_eq!(first, second);
        assert!(first.iter().all(|s| CHURN_PROBABILITY_RANGE.contains(&s.churn_probability)));
    }

    #[test]
    fn empty_history_yields_no_summaries() {
        assert!(summarize(CustomerType::General, &[], None, &mut rng()).is_empty());
        assert!(summarize(CustomerType::Vip, &[], None, &mut rng()).is_empty());
    }
}
