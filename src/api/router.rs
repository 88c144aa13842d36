// src/api/router.rs

use std::borrow::Cow;
use std::str::Utf8Error;

use chrono::Utc;
use http::{HeaderMap, Method, Request, StatusCode};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::arb::{self, filter, find_opportunity, product_opportunities, Lookup, Opportunity};
use crate::catalog::Product;
use crate::tier::{gate, Tier};

use super::query::{self, QueryParams};
use super::response::{self, ApiResponse};
use super::AppState;


pub const TIER_HEADER: &str = "x-subscription-tier";


/// A search hit: the product plus its single best opportunity, if any.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit<'a> {
    #[serde(flatten)]
    pub product: &'a Product,
    pub best_opportunity: Option<Opportunity>,
}


/// Route a request to its handler. Only the request head is read; every route is a GET.
pub async fn respond<B>(state: &AppState, req: &Request<B>) -> ApiResponse {
    let tier = tier_of(req.headers());
    let path = req.uri().path().trim_end_matches('/');
    let params = QueryParams::parse(req.uri().query());
    debug!(method = %req.method(), path, ?tier, "request");

    if req.method() != Method::GET {
        return response::failure(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["health"] => response::json_response(StatusCode::OK, &json!({ "status": "ok" })),
        ["api", "arbitrage", "opportunities"] => opportunities(state, &params, tier).await,
        ["api", "arbitrage", "opportunities", id] => match decode_segment(id) {
            Ok(id) => opportunity_by_id(state, &id, tier).await,
            Err(e) => response::failure(StatusCode::BAD_REQUEST, format!("invalid id: {e}")),
        },
        ["api", "arbitrage", "search"] => search(state, &params, tier).await,
        ["api", "arbitrage", "top"] => top(state, &params, tier).await,
        ["api", "products", id] => match decode_segment(id) {
            Ok(id) => product_by_id(state, &id).await,
            Err(e) => response::failure(StatusCode::BAD_REQUEST, format!("invalid id: {e}")),
        },
        _ => response::failure(StatusCode::NOT_FOUND, "Not found"),
    }
}

/// Percent-decode one path segment, e.g. `sku%201` -> `sku 1`.
fn decode_segment(raw: &str) -> Result<Cow<'_, str>, Utf8Error> {
    percent_decode_str(raw).decode_utf8()
}

fn tier_of(headers: &HeaderMap) -> Tier {
    Tier::from_header(headers.get(TIER_HEADER).and_then(|v| v.to_str().ok()))
}


async fn opportunities(state: &AppState, params: &QueryParams, tier: Tier) -> ApiResponse {
    let criteria = match query::filter_criteria(params) {
        Ok(criteria) => criteria,
        Err(e) => {
            warn!(error = %e, "rejected opportunity query");
            return response::failure(StatusCode::BAD_REQUEST, e);
        }
    };

    let catalog = state.store.snapshot().await;
    let found = filter(state.scanner.as_ref(), &catalog, &criteria, Utc::now());
    response::list(&gate(found, tier, state.config.tiers.opportunities))
}


async fn opportunity_by_id(state: &AppState, id: &str, tier: Tier) -> ApiResponse {
    let catalog = state.store.snapshot().await;

    match find_opportunity(&catalog, id, &state.config.thresholds, Utc::now()) {
        Lookup::ProductNotFound => response::failure(StatusCode::NOT_FOUND, "Product not found"),
        Lookup::OpportunityNotFound => {
            response::failure(StatusCode::NOT_FOUND, "Arbitrage opportunity not found")
        }
        Lookup::Found { rank, .. } if tier == Tier::Free && rank >= state.config.tiers.opportunity_detail => {
            response::failure(
                StatusCode::FORBIDDEN,
                "Premium subscription required to access this opportunity",
            )
        }
        Lookup::Found { opportunity, .. } => response::item(&opportunity),
    }
}


async fn search(state: &AppState, params: &QueryParams, tier: Tier) -> ApiResponse {
    let Some(needle) = params.get("query") else {
        return response::failure(StatusCode::BAD_REQUEST, "Please provide a search query");
    };

    let catalog = state.store.snapshot().await;
    let now = Utc::now();
    let hits: Vec<SearchHit<'_>> = catalog
        .search(needle)
        .into_iter()
        .map(|product| SearchHit {
            product,
            best_opportunity: product_opportunities(&catalog, &product.id, &state.config.thresholds, now)
                .into_iter()
                .next(),
        })
        .collect();

    response::list(&gate(hits, tier, state.config.tiers.search))
}


async fn top(state: &AppState, params: &QueryParams, tier: Tier) -> ApiResponse {
    let limit = match query::top_limit(params) {
        Ok(limit) => limit,
        Err(e) => return response::failure(StatusCode::BAD_REQUEST, format!("{e:#}")),
    };

    let catalog = state.store.snapshot().await;
    let best = arb::top(state.scanner.as_ref(), &catalog, &state.config.thresholds, limit, Utc::now());
    response::list(&gate(best, tier, state.config.tiers.top))
}


async fn product_by_id(state: &AppState, id: &str) -> ApiResponse {
    let catalog = state.store.snapshot().await;
    match catalog.find_by_id(id) {
        Some(product) => response::item(product),
        None => response::failure(StatusCode::NOT_FOUND, "Product not found"),
    }
}
