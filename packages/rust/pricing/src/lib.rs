//! Pricing API client and per-partition call pacing.
//!
//! This crate provides:
//! - [`PricingClient`] — authenticated query-by-name price lookups
//! - [`PricingError`] — differentiated lookup failures
//! - [`RateLimiter`] — the per-partition call budget and inter-call delay

pub mod client;
pub mod limiter;

pub use client::{PricingClient, PricingError};
pub use limiter::RateLimiter;
