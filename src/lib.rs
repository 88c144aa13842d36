// src/lib.rs
#![doc = include_str!("../README.md")]

#[doc = include_str!("../doc/catalog.md")]
pub mod catalog;

#[doc = include_str!("../doc/arb.md")]
pub mod arb;

#[doc = include_str!("../doc/api.md")]
pub mod api;

pub mod config;
pub mod mock_feed;
pub mod telemetry;
pub mod tier;
