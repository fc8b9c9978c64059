//! Hardware drivers for observatory flat-field panels.
//!
//! This crate provides drivers for the light sources used to take flat frames.
//! Each driver is feature-gated for optional compilation.
//!
//! # Features
//!
//! - `alnitak` - Alnitak Flat-Man / Flip-Flat generic serial command set
//!
//! Callers that only need to drive a panel should program against the
//! [`FlatPanel`] trait rather than a concrete driver.

pub mod flat_panel;

#[cfg(feature = "alnitak")]
pub mod alnitak;

pub use flat_panel::FlatPanel;
