//! Breadth Core: price tables, moving averages, the breadth calculator, and
//! the data providers that feed it.
//!
//! - Domain types (price table, breadth history and snapshot, range presets)
//! - Sliding-window SMA over nullable close series
//! - Breadth calculator (holiday pruning, forward-fill, dynamic denominator)
//! - Index universe with static constituent lists and Wikipedia scraping
//! - Yahoo Finance and synthetic price providers, parallel fetch, circuit breaker

pub mod breadth;
pub mod data;
pub mod domain;
pub mod indicators;
