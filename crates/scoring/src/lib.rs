// Rust guideline compliant 2026-10-13

//! Scoring component -- turns loaded history into per-customer risk summaries.
//!
//! Two stages: [`derive`] computes row-level metrics from a single history
//! row, [`aggregate`] groups derived rows by customer, classifies risk, finds
//! each customer's main spending category and splits the population at the
//! median total spend.
//!
//! Entry points: [`derive::derive_all`], [`aggregate::summarize`].

pub mod aggregate;
pub mod derive;

pub use aggregate::{category_totals, main_interest, median, summarize};
pub use derive::{derive, derive_all};
