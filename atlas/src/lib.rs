//! # Atlas
//!
//! Geographic aggregation and drill-down for the marathon log.
//!
//! The runner's events carry free-text location fields (province, city,
//! district) entered by hand, sometimes in long administrative form
//! ("广西壮族自治区") and sometimes short ("广西"). This crate reconciles
//! that data against the fixed country -> province -> district hierarchy
//! and drives the interactive choropleth built on top of it.
//!
//! ## Pieces
//!
//! - [`normalize`]: one shared pure normalizer used by aggregation, click
//!   handling and geometry joins alike. Never duplicated at call sites.
//! - [`region`]: the canonical province table with admin codes, plus the
//!   municipality policy switch.
//! - [`aggregate`]: per-region event counts. Zero-filled at country level
//!   so the whole map renders, observed-only below.
//! - [`geometry`]: boundary data fetched once per region code and memoized
//!   for the process lifetime. The cache is an explicit object injected
//!   into each view, never ambient state.
//! - [`drill`]: the drill-down state machine. One sum type, so a district
//!   selection without its parent province cannot be represented.
//! - [`chart`]: the chart configuration handed to the rendering surface,
//!   recomputed on every state change.
//!
//! ## Concurrency
//!
//! Everything is synchronous and pure except the geometry fetch. Overlapping
//! fetches for one code collapse through the cache check, and responses that
//! arrive after a newer level transition are discarded by generation.

pub mod aggregate;
pub mod chart;
pub mod drill;
pub mod error;
pub mod event;
pub mod geometry;
pub mod normalize;
pub mod region;

pub use error::AtlasError;
