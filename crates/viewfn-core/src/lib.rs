//! Core types for view-function expansion.
//!
//! This crate provides the foundational types used across the other viewfn crates:
//! - The declaration model handed over by the host (functions, parameters, body statements)
//! - Attribute and identifier value types
//! - Error types

pub mod ast;
pub mod errors;
pub mod types;

pub use ast::*;
pub use errors::*;
pub use types::*;
