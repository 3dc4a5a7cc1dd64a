// Rust guideline compliant 2026-10-14

//! Plain-text rendering of dashboard views.
//!
//! Every view writes into a `String`; the `fmt::Result` of each write is
//! propagated to the caller.

use std::fmt::{self, Write as _};

use dashboard::{CustomerReport, Diagnosis, Overview};
use domain::{Category, CustomerSummary, CustomerType, DerivedRecord, Segment};

/// Shown in place of any view when nothing could be loaded.
pub const DATA_UNAVAILABLE: &str = "data unavailable: check the data directory and file names";

fn category_or_dash(category: Option<Category>) -> &'static str {
    category.map_or("-", Category::label)
}

/// Segment label as shown on the marketing page: `VIP Save` or plain `Warning`.
#[must_use]
pub fn segment_label(customer_type: CustomerType, segment: Segment) -> String {
    let prefix = match customer_type {
        CustomerType::General => "General",
        CustomerType::Vip => "VIP",
    };
    match segment {
        Segment::Save => format!("{prefix} {segment}"),
        Segment::Warning => segment.to_string(),
    }
}

/// Population figures block.
///
/// # Errors
///
/// Returns [`fmt::Error`] if writing into the buffer fails.
pub fn overview(view: &Overview) -> Result<String, fmt::Error> {
    if view.customers == 0 {
        return Ok(DATA_UNAVAILABLE.to_owned());
    }
    let mut out = String::new();
    writeln!(out, "population        {}", view.customer_type)?;
    writeln!(out, "customers         {}", view.customers)?;
    writeln!(out, "protected spend   {:.0}", view.protected_spend)?;
    if let Some(mean) = view.mean_churn_probability {
        writeln!(out, "mean churn prob.  {:.1}%", mean * 100.0)?;
    }
    for t in &view.tiers {
        writeln!(
            out,
            "  {:<12} {:>6}  ({:.1}%)",
            t.tier.to_string(),
            t.customers,
            view.share(t.tier) * 100.0
        )?;
    }
    write!(out, "segments          save {} / warning {}", view.save_segment, view.warning_segment)?;
    Ok(out)
}

/// Summary table, one customer per line.
///
/// # Errors
///
/// Returns [`fmt::Error`] if writing into the buffer fails.
pub fn summaries(customer_type: CustomerType, rows: &[CustomerSummary]) -> Result<String, fmt::Error> {
    if rows.is_empty() {
        return Ok(DATA_UNAVAILABLE.to_owned());
    }
    let mut out = format!(
        "{:<16} {:>5} {:>14} {:>12} {:<10} {:<14} {:>6} {}",
        "customer", "flags", "total spend", "last spend", "tier", "interest", "prob", "segment"
    );
    for s in rows {
        write!(
            out,
            "\n{:<16} {:>5} {:>14.0} {:>12.0} {:<10} {:<14} {:>5.1}% {}",
            s.customer_id,
            s.total_churn_flag_count,
            s.total_spend,
            s.last_spend,
            s.risk_tier.to_string(),
            category_or_dash(s.main_interest),
            s.churn_probability * 100.0,
            segment_label(customer_type, s.segment)
        )?;
    }
    Ok(out)
}

/// Monthly history table of one customer.
///
/// # Errors
///
/// Returns [`fmt::Error`] if writing into the buffer fails.
pub fn history(customer_id: &str, rows: &[DerivedRecord]) -> Result<String, fmt::Error> {
    if rows.is_empty() {
        return Ok(format!("no history for customer {customer_id}"));
    }
    let mut out = format!(
        "{:<8} {:>12} {:>12} {:>12} {:<14} {}",
        "period", "spend", "3m spend", "3m avg", "top category", "churn"
    );
    for r in rows {
        write!(
            out,
            "\n{:<8} {:>12.0} {:>12.0} {:>12.1} {:<14} {}",
            r.period(),
            r.record.current_spend,
            r.record.trailing_3m_spend,
            r.metrics.avg_3m_spend,
            r.top_category().label(),
            if r.metrics.is_flagged() { "yes" } else { "no" }
        )?;
    }
    Ok(out)
}

/// Individual report: verdict, category mix and strategy.
///
/// # Errors
///
/// Returns [`fmt::Error`] if writing into the buffer fails.
pub fn report(view: &CustomerReport) -> Result<String, fmt::Error> {
    let mut out = format!("customer {}\n", view.customer_id);
    match &view.diagnosis {
        Diagnosis::AtRisk { period } => writeln!(out, "diagnosis: AT RISK in {period}")?,
        Diagnosis::Stable => out.push_str("diagnosis: stable\n"),
    }
    writeln!(out, "  {}", view.diagnosis.rationale())?;
    if let Some(s) = &view.summary {
        writeln!(
            out,
            "tier {} | flags {} | churn prob. {:.1}%",
            s.risk_tier,
            s.total_churn_flag_count,
            s.churn_probability * 100.0
        )?;
    }
    out.push_str("category mix:\n");
    for (category, spend) in view.category_totals.iter().filter(|(_, spend)| *spend > 0.0) {
        writeln!(out, "  {:<14} {spend:>12.0}", category.label())?;
    }
    writeln!(out, "main category: {}", category_or_dash(view.main_category))?;
    write!(out, "solution: {}", view.solution)?;
    if let Some(rec) = &view.recommendation {
        write!(out, "\nrecommendation: {rec}")?;
    }
    Ok(out)
}
