// Rust guideline compliant 2026-10-13

//! Recommendation resolver -- static marketing-message tables.
//!
//! Every lookup is total: a missing tier or category resolves to a documented
//! fallback message instead of an error.
//!
//! Entry points: [`recommend`], [`general_guide`], [`vip_guide`],
//! [`category_solution`], [`parse_category`].

use domain::{Category, CustomerType, RiskTier};

/// Label used in messages when a customer has no known main category.
pub const GENERAL_SPENDING: &str = "general spending";

/// VIP benefit offered when the main category has no dedicated entry.
pub const VIP_FALLBACK_BENEFIT: &str = "top-tier concierge service and an annual-fee waiver";

/// Per-category action offered when the category is unknown.
pub const SOLUTION_FALLBACK: &str = "VIP-exclusive reward programme";

fn category_label(category: Option<Category>) -> &'static str {
    category.map_or(GENERAL_SPENDING, Category::label)
}

/// Parse a category label, treating unknown labels as "no category".
///
/// A miss is logged and resolves to the fallback messages downstream.
#[must_use]
pub fn parse_category(label: &str) -> Option<Category> {
    match label.parse() {
        Ok(category) => Some(category),
        Err(e) => {
            tracing::debug!(error = %e, "advisor.lookup_miss");
            None
        }
    }
}

/// Marketing guide for a general customer, driven by risk tier.
///
/// High-risk customers get a comprehensive recovery package; at-risk and safe
/// customers get a category benefit plus a tier-specific incentive. Any other
/// tier (or none) gets a plain proposal.
#[must_use]
pub fn general_guide(tier: Option<RiskTier>, category: Option<Category>) -> String {
    let label = category_label(category);
    let (prefix, suffix) = match tier {
        Some(RiskTier::HighRisk) => {
            return format!(
                "[Full value recovery] Card activity has dropped sharply. Propose a comprehensive \
                 care package: '{label}' merchant discounts plus interest-free instalments at all \
                 merchants."
            );
        }
        Some(RiskTier::Safe) => ("[Retention]", "a loyalty reward for continued use"),
        Some(RiskTier::AtRisk) => ("[Churn prevention]", "a personalized revisit discount coupon"),
        Some(RiskTier::VipValid) | None => ("[Info]", "a marketing proposal"),
    };
    format!("{prefix} {label} benefits and {suffix}")
}

/// Premium benefit attached to a VIP customer's main category.
fn vip_benefit(category: Option<Category>) -> &'static str {
    match category {
        Some(Category::Shopping) => "department-store VIP lounge passes and a personal shopper",
        Some(Category::Dining) => "a fine-dining voucher for two and corkage-free premium wine",
        Some(Category::Transport) => "premium airport pick-up and drop-off with boosted fuel rewards",
        Some(Category::Medical) => "priority health check-ups and private healthcare management",
        Some(Category::Leisure) => "luxury resort vouchers and waived golf green fees",
        _ => VIP_FALLBACK_BENEFIT,
    }
}

/// Marketing guide for a VIP customer, driven by main category only.
#[must_use]
pub fn vip_guide(category: Option<Category>) -> String {
    format!(
        "[VIP premium care] Propose a top-tier loyalty programme centred on '{}' with {}.",
        category_label(category),
        vip_benefit(category)
    )
}

/// Retention action for a customer's main category, used by individual reports.
#[must_use]
pub fn category_solution(category: Option<Category>) -> &'static str {
    match category {
        Some(Category::Shopping) => "Revisit thank-you coupons and interest-free instalments at online malls",
        Some(Category::Dining) => "Weekend dining time-sale vouchers and priority restaurant booking",
        Some(Category::Transport) => "Extra fuel-discount points and public-transport benefits",
        Some(Category::Medical) => "Health-care service guide and cashback at pharmacies and hospitals",
        Some(Category::BillPayment) => "First-month discount when switching utility and telecom bills to auto-pay",
        Some(Category::Education) => "Double points and extended instalments on tuition payments",
        Some(Category::Leisure) => "Lodging and travel discount vouchers for leisure activities",
        Some(Category::Social) => "Special rewards at golf and social-club merchants",
        Some(Category::DailyLiving) => "Standing discounts at supermarkets and convenience stores",
        Some(Category::Overseas) => "Waived foreign-transaction fees and a duty-free prepaid card",
        None => SOLUTION_FALLBACK,
    }
}

/// Resolve the recommendation for a customer.
///
/// VIP customers are resolved by category alone and `tier` is ignored; general
/// customers by tier and category. Total over all inputs.
#[must_use]
pub fn recommend(
    customer_type: CustomerType,
    tier: Option<RiskTier>,
    category: Option<Category>,
) -> String {
    match customer_type {
        CustomerType::General => general_guide(tier, category),
        CustomerType::Vip => vip_guide(category),
    }
}
