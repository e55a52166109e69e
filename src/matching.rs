//! Saved-search matching. Pure and deterministic: identical inputs always
//! produce identical output, in a stable order.

use mongodb::bson::oid::ObjectId;

use crate::models::{ListingSnapshot, SavedSearch, SearchFilter, Thresholds, UwMetrics};

/// One winning saved search for a listing/metrics pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch {
    pub search_id: ObjectId,
    pub user_id: ObjectId,

    /// Satisfied-criterion tokens in fixed order: dscr, coc, cf, score.
    pub matched: Vec<String>,
}

/// Evaluates every search against the listing and its valuation facts.
///
/// Inactive searches never match. A search wins iff every present filter
/// field holds and every present threshold field is satisfied; a search
/// declaring no thresholds wins on filters alone with an empty token list.
pub fn match_searches(
    listing: &ListingSnapshot,
    searches: &[SavedSearch],
    metrics: Option<&UwMetrics>,
    score: Option<f64>,
) -> Vec<SearchMatch> {
    searches
        .iter()
        .filter(|s| s.is_active)
        .filter(|s| filter_holds(&s.filter, listing))
        .filter_map(|s| {
            thresholds_met(&s.thresholds, metrics, score).map(|matched| SearchMatch {
                search_id: s.id,
                user_id: s.user_id,
                matched,
            })
        })
        .collect()
}

// Conjunction over present fields; the first failing field excludes the
// search.
fn filter_holds(filter: &SearchFilter, listing: &ListingSnapshot) -> bool {
    if let Some(city) = &filter.city {
        if *city != listing.city {
            return false;
        }
    }

    if let Some(province) = &filter.province {
        if *province != listing.province {
            return false;
        }
    }

    if let Some(property_type) = &filter.property_type {
        if *property_type != listing.property_type {
            return false;
        }
    }

    if let Some(max_price) = filter.max_price {
        if listing.price > max_price {
            return false;
        }
    }

    if let Some(min_beds) = filter.min_beds {
        if listing.beds < min_beds {
            return false;
        }
    }

    true
}

// Returns the satisfied tokens when every present threshold holds, None as
// soon as one fails. A threshold whose required input is absent cannot be
// satisfied. Comparisons use the metric values as given, no rounding.
fn thresholds_met(
    thresholds: &Thresholds,
    metrics: Option<&UwMetrics>,
    score: Option<f64>,
) -> Option<Vec<String>> {
    let mut matched = Vec::new();

    if let Some(min_dscr) = thresholds.min_dscr {
        match metrics {
            Some(m) if m.dscr >= min_dscr => matched.push(format!("dscr>={min_dscr}")),
            _ => return None,
        }
    }

    if let Some(min_coc) = thresholds.min_coc {
        match metrics {
            Some(m) if m.cash_on_cash_pct >= min_coc => matched.push(format!("coc>={min_coc}")),
            _ => return None,
        }
    }

    if thresholds.require_non_negative_cf == Some(true) {
        match metrics {
            Some(m) if m.cash_flow_annual >= 0.0 => matched.push("cf>=0".to_string()),
            _ => return None,
        }
    }

    if let Some(min_score) = thresholds.min_score {
        match score {
            Some(s) if s >= min_score => matched.push(format!("score>={min_score}")),
            _ => return None,
        }
    }

    Some(matched)
}
