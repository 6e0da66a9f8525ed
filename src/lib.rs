//! A single-market order-matching engine.
//!
//! Consumes a chronologically ordered stream of buy/sell orders for multiple
//! stocks and traders, matches opposing orders under price/time priority,
//! and reports trade activity plus derived analytics: running median trade
//! prices, per-trader settlement summaries, and a per-stock hindsight
//! ("time traveler") best-trade analysis over the full quote history.

pub mod cli;
pub mod errors;
pub mod feed;
pub mod generate;
pub mod history;
pub mod market;
pub mod orderbook;
pub mod orders;
pub mod stats;
pub mod trade;
