//! Variables module for the harness
//!
//! This module holds the runtime variable store, `${name}` placeholder
//! resolution, and capturing of response values into the store.

pub mod capture;
pub mod store;
pub mod substitution;

pub use capture::{apply_captures, parse_capture_directives, CaptureDirective};
pub use store::VariableStore;
pub use substitution::{resolve_data, resolve_url, value_to_string};
