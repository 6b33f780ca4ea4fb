//! Utility functions for code generation, input validation and rendering.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_validator`] - Syntactic URL validation
//! - [`short_url`] - Full short URL rendering

pub mod code_generator;
pub mod short_url;
pub mod url_validator;
