//! Short code generation and validation utilities.
//!
//! Generation is a pure function of a random source, an alphabet and a
//! length. Uniqueness is layered on top by [`CodeGenerator::generate_unique`],
//! which retries against a caller-supplied reservation check a bounded number
//! of times.

use crate::error::RegistryError;
use rand::Rng;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// The 62 ASCII alphanumerics.
pub const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Attempts before generation gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Bounds shared by custom and generated codes.
pub const MIN_CODE_LENGTH: usize = 3;
pub const MAX_CODE_LENGTH: usize = 12;

static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{3,12}$").expect("static regex is valid"));

/// Draws `length` symbols uniformly from `alphabet`.
///
/// `alphabet` must not be empty.
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8], length: usize) -> String {
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..alphabet.len());
            alphabet[idx] as char
        })
        .collect()
}

/// Validates a caller-supplied short code.
///
/// # Rules
///
/// - Length: 3-12 characters
/// - Allowed characters: ASCII letters and digits
///
/// # Errors
///
/// Returns [`RegistryError::Validation`] if the code does not match.
pub fn validate_custom_code(code: &str) -> Result<(), RegistryError> {
    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(RegistryError::bad_request(
            "invalid custom code",
            json!({ "code": code, "pattern": "^[A-Za-z0-9]{3,12}$" }),
        ));
    }

    Ok(())
}

/// Random code allocator with a bounded collision retry.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    alphabet: &'static [u8],
    length: usize,
    max_attempts: usize,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            alphabet: ALPHANUMERIC,
            length: DEFAULT_CODE_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl CodeGenerator {
    /// Creates a generator over [`ALPHANUMERIC`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] if `length` is outside
    /// [`MIN_CODE_LENGTH`]..=[`MAX_CODE_LENGTH`] or `max_attempts` is zero.
    pub fn new(length: usize, max_attempts: usize) -> Result<Self, RegistryError> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
            return Err(RegistryError::bad_request(
                "invalid code length",
                json!({ "length": length, "min": MIN_CODE_LENGTH, "max": MAX_CODE_LENGTH }),
            ));
        }

        if max_attempts == 0 {
            return Err(RegistryError::bad_request(
                "max attempts must be at least 1",
                json!({ "max_attempts": max_attempts }),
            ));
        }

        Ok(Self {
            length,
            max_attempts,
            ..Self::default()
        })
    }

    /// Replaces the symbol set.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] if `alphabet` is empty or holds
    /// anything other than ASCII letters and digits.
    pub fn with_alphabet(mut self, alphabet: &'static [u8]) -> Result<Self, RegistryError> {
        if alphabet.is_empty() || !alphabet.iter().all(u8::is_ascii_alphanumeric) {
            return Err(RegistryError::bad_request(
                "invalid code alphabet",
                json!({ "alphabet": String::from_utf8_lossy(alphabet) }),
            ));
        }

        self.alphabet = alphabet;
        Ok(self)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Generates a code for which `is_taken` returns false.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Exhaustion`] after `max_attempts` collisions.
    pub fn generate_unique<R, F>(&self, rng: &mut R, is_taken: F) -> Result<String, RegistryError>
    where
        R: Rng + ?Sized,
        F: Fn(&str) -> bool,
    {
        for _ in 0..self.max_attempts {
            let code = generate_code(rng, self.alphabet, self.length);

            if !is_taken(&code) {
                return Ok(code);
            }
        }

        Err(RegistryError::exhausted(
            "unable to allocate code",
            json!({ "attempts": self.max_attempts, "length": self.length }),
        ))
    }
}
