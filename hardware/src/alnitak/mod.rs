//! Alnitak Astrosystems flat panel driver
//!
//! This module provides the serial command set shared by the Alnitak Flat-Man,
//! Flat-Man XL/L and Flip-Flat panels, and the Flip-Mask dust cover.

mod flatman;
mod protocol;

pub use flatman::{port_name, FlatMan, DEFAULT_TIMEOUT};
pub use protocol::{
    parse_reply, AlnitakError, AlnitakResult, Command, Product, Reply, BAUD_RATE,
};
