// src/api/query.rs

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};

use crate::arb::FilterCriteria;
use crate::catalog::CategoryFilter;


/// Decoded `?a=b&c=d` pairs. Later duplicates win; empty values count as absent.
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self(pairs)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn parse_field<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| raw.parse::<T>().map_err(|e| anyhow!("invalid {key} '{raw}': {e}")))
            .transpose()
    }

    fn parse_price(&self, key: &str) -> Result<Option<f64>> {
        match self.parse_field::<f64>(key)? {
            Some(v) if !v.is_finite() => Err(anyhow!("invalid {key}: must be a finite number")),
            other => Ok(other),
        }
    }
}


/// Build filter criteria from the `/api/arbitrage/opportunities` query string.
pub fn filter_criteria(params: &QueryParams) -> Result<FilterCriteria> {
    let defaults = FilterCriteria::default();

    Ok(FilterCriteria {
        category: params.get("category").map(CategoryFilter::from).unwrap_or_default(),
        min_profit: params.parse_price("minProfit")?.unwrap_or(defaults.min_profit),
        max_profit: params.parse_price("maxProfit")?,
        min_profit_pct: params
            .parse_price("minProfitPercentage")?
            .unwrap_or(defaults.min_profit_pct),
        source_marketplace: params.get("sourceMarketplace").map(str::to_string),
        target_marketplace: params.get("targetMarketplace").map(str::to_string),
        sort_by: params.parse_field("sortBy")?.unwrap_or(defaults.sort_by),
        sort_order: params.parse_field("sortOrder")?.unwrap_or(defaults.sort_order),
    })
}


/// `limit` for `/api/arbitrage/top`, defaulting to 10.
pub fn top_limit(params: &QueryParams) -> Result<usize> {
    Ok(params
        .parse_field::<usize>("limit")
        .context("limit must be a non-negative integer")?
        .unwrap_or(10))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::{SortKey, SortOrder};

    #[test]
    fn empty_query_gives_defaults() {
        let criteria = filter_criteria(&QueryParams::parse(None)).unwrap();
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn full_query() {
        let params = QueryParams::parse(Some(
            "category=electronics&minProfit=25&maxProfit=100.5&minProfitPercentage=12\
             &sourceMarketplace=amazon&targetMarketplace=ebay&sortBy=profitPercentage&sortOrder=asc",
        ));
        let criteria = filter_criteria(&params).unwrap();

        assert_eq!(criteria.category, CategoryFilter::Only("electronics".into()));
        assert_eq!(criteria.min_profit, 25.0);
        assert_eq!(criteria.max_profit, Some(100.5));
        assert_eq!(criteria.min_profit_pct, 12.0);
        assert_eq!(criteria.source_marketplace.as_deref(), Some("amazon"));
        assert_eq!(criteria.target_marketplace.as_deref(), Some("ebay"));
        assert_eq!(criteria.sort_by, SortKey::ProfitPercentage);
        assert_eq!(criteria.sort_order, SortOrder::Asc);
    }

    #[test]
    fn percent_decoding_and_blank_values() {
        let params = QueryParams::parse(Some("query=air%20jordan&category=&sourceMarketplace="));
        assert_eq!(params.get("query"), Some("air jordan"));

        let criteria = filter_criteria(&params).unwrap();
        assert_eq!(criteria.category, CategoryFilter::All);
        assert_eq!(criteria.source_marketplace, None);
    }

    #[test]
    fn rejects_bad_numbers_and_tokens() {
        for raw in ["minProfit=lots", "maxProfit=NaN", "minProfitPercentage=inf", "sortBy=price", "sortOrder=up"] {
            assert!(filter_criteria(&QueryParams::parse(Some(raw))).is_err(), "{raw}");
        }
    }

    #[test]
    fn limit_parsing() {
        assert_eq!(top_limit(&QueryParams::parse(None)).unwrap(), 10);
        assert_eq!(top_limit(&QueryParams::parse(Some("limit=4"))).unwrap(), 4);
        assert!(top_limit(&QueryParams::parse(Some("limit=-1"))).is_err());
    }
}
