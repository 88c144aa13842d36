// src/arb/filter.rs

use std::str::FromStr;

use anyhow::{anyhow, Error};
use chrono::{DateTime, Utc};

use crate::catalog::{Catalog, CategoryFilter};

use super::{compare_f64, Opportunity, Scanner, Thresholds};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Profit,
    ProfitPercentage,
    LastUpdated,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profit" => Ok(Self::Profit),
            "profitPercentage" => Ok(Self::ProfitPercentage),
            "lastUpdated" => Ok(Self::LastUpdated),
            other => Err(anyhow!("unknown sort key: {other}")),
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(anyhow!("unknown sort order: {other}")),
        }
    }
}


/// What a caller wants to see.
///
/// `min_profit` and `min_profit_pct` are not display filters: they become the
/// generation thresholds, so changing them changes which pairs exist at all.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub category: CategoryFilter,
    pub min_profit: f64,
    pub max_profit: Option<f64>,
    pub min_profit_pct: f64,
    pub source_marketplace: Option<String>,
    pub target_marketplace: Option<String>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            min_profit: 0.0,
            max_profit: None,
            min_profit_pct: 0.0,
            source_marketplace: None,
            target_marketplace: None,
            sort_by: SortKey::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl FilterCriteria {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.min_profit, self.min_profit_pct)
    }

    fn keeps(&self, opportunity: &Opportunity) -> bool {
        if let Some(source) = &self.source_marketplace {
            if &opportunity.source_marketplace != source {
                return false;
            }
        }
        if let Some(target) = &self.target_marketplace {
            if &opportunity.target_marketplace != target {
                return false;
            }
        }
        if let Some(max) = self.max_profit {
            if opportunity.profit > max {
                return false;
            }
        }
        true
    }
}


/// Regenerate, narrow and order the opportunity set for `criteria`.
///
/// Never fails: criteria that match nothing give an empty list.
pub fn filter(
    scanner: &dyn Scanner,
    catalog: &Catalog,
    criteria: &FilterCriteria,
    generated_at: DateTime<Utc>,
) -> Vec<Opportunity> {
    let mut opportunities = scanner.scan(catalog, &criteria.category, &criteria.thresholds(), generated_at);
    opportunities.retain(|o| criteria.keeps(o));

    // `sort_by` is stable: ties keep the scan's profit-descending order.
    opportunities.sort_by(|a, b| {
        let ordering = match criteria.sort_by {
            SortKey::Profit => compare_f64(a.profit, b.profit),
            SortKey::ProfitPercentage => compare_f64(a.profit_percentage, b.profit_percentage),
            SortKey::LastUpdated => a.last_updated.cmp(&b.last_updated),
        };
        match criteria.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    opportunities
}
