//! Alnitak-compatible command shim for flat-field panels.
//!
//! Observatory automation packages drive flat panels by running a small
//! command line tool with a port and a list of single-letter directives, then
//! searching its output for fixed acknowledgment strings. This crate provides
//! that tool's core:
//!
//! - [`directive`] - token parsing and usage errors
//! - [`acknowledgment`] - the exact output vocabulary callers search for
//! - [`interpreter`] - ordered dispatch of directives to a [`hardware::FlatPanel`]
//! - [`logging`] - the append-only run log
//!
//! # Example
//!
//! ```no_run
//! use aacmd::Interpreter;
//! use hardware::alnitak::FlatMan;
//!
//! let panel = FlatMan::connect("COM6")?;
//! let outcome = Interpreter::new(panel).run(&["L", "B200", "S"])?;
//! print!("{}", outcome.acknowledgment.line());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod acknowledgment;
pub mod directive;
pub mod interpreter;
pub mod logging;

pub use acknowledgment::{Acknowledgment, Fragment, VERSION};
pub use directive::{Directive, UsageError};
pub use interpreter::{Interpreter, Outcome, DEFAULT_EXIT_DELAY};
