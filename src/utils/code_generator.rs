//! Short code generation and alias validation.
//!
//! Random codes come from a two-tier [`CodeGenerator`]: OS entropy first, and a
//! time-seeded PRNG only when the OS source fails. Every use of the degraded
//! tier is logged and counted because it weakens both unpredictability and the
//! collision profile of the code space.

use crate::error::AppError;
use rand::{Rng, SeedableRng, rngs::StdRng};
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Length of generated short codes.
pub const CODE_LENGTH: usize = 6;

/// Symbols a generated code is drawn from.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Bytes at or above this value are discarded so `byte % 62` stays uniform.
const REJECTION_THRESHOLD: u8 = (256 - 256 % ALPHABET.len()) as u8;

const ALIAS_MIN_LEN: usize = 3;
pub const ALIAS_MAX_LEN: usize = 50;

/// Aliases that collide with routes or are kept for future use.
///
/// Compared case-insensitively.
const RESERVED_ALIASES: &[&str] = &[
    "api", "admin", "www", "app", "help", "support", "about", "health",
];

static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("alias regex is valid"));

/// Failure of a [`RandomSource`] to produce bytes.
#[derive(Debug, thiserror::Error)]
#[error("random source '{source_name}' failed: {reason}")]
pub struct RandomSourceError {
    pub source_name: &'static str,
    pub reason: String,
}

/// A provider of random bytes for code generation.
pub trait RandomSource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomSourceError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Cryptographically strong source backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomSourceError> {
        getrandom::fill(buf).map_err(|e| RandomSourceError {
            source_name: self.name(),
            reason: e.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "os"
    }
}

/// Degraded source: a PRNG seeded from the wall clock and a call counter.
///
/// Predictable to anyone who can estimate the server clock. Only used when
/// [`OsRandom`] is unavailable.
#[derive(Debug, Default)]
pub struct ClockSeededRandom {
    counter: AtomicU64,
}

impl RandomSource for ClockSeededRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomSourceError> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);

        let mut rng = StdRng::seed_from_u64(nanos ^ sequence.rotate_left(32));
        rng.fill(buf);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "clock-seeded"
    }
}

/// Two-tier short code generator.
pub struct CodeGenerator {
    primary: Box<dyn RandomSource>,
    fallback: Box<dyn RandomSource>,
}

impl CodeGenerator {
    pub fn new(primary: Box<dyn RandomSource>, fallback: Box<dyn RandomSource>) -> Self {
        Self { primary, fallback }
    }

    /// Produces a [`CODE_LENGTH`]-character code drawn uniformly from [`ALPHABET`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] only if both tiers fail.
    pub fn generate(&self) -> Result<String, AppError> {
        let mut code = String::with_capacity(CODE_LENGTH);
        // Two rejections per accepted byte is already far above the expected rate.
        let mut buf = [0u8; CODE_LENGTH * 2];

        while code.len() < CODE_LENGTH {
            self.fill(&mut buf)?;

            for &byte in buf.iter() {
                if byte >= REJECTION_THRESHOLD {
                    continue;
                }
                code.push(ALPHABET[byte as usize % ALPHABET.len()] as char);
                if code.len() == CODE_LENGTH {
                    break;
                }
            }
        }

        Ok(code)
    }

    fn fill(&self, buf: &mut [u8]) -> Result<(), AppError> {
        let primary_err = match self.primary.fill(buf) {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        warn!(
            primary = self.primary.name(),
            fallback = self.fallback.name(),
            error = %primary_err,
            "Strong random source unavailable, generating short code from degraded source"
        );
        metrics::counter!("linkchop_codegen_degraded_total").increment(1);

        self.fallback.fill(buf).map_err(|e| {
            AppError::internal(
                "No random source available for code generation",
                json!({ "primary": primary_err.to_string(), "fallback": e.to_string() }),
            )
        })
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(Box::new(OsRandom), Box::new(ClockSeededRandom::default()))
    }
}

/// Returns true if `code` has the shape of a generated code.
pub fn is_generated_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Validates a user-provided alias.
///
/// # Rules
///
/// - Length: 3-50 characters
/// - Allowed characters: ASCII letters, digits, `_` and `-`
/// - Cannot be a reserved word (case-insensitive)
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    let len = alias.chars().count();
    if !(ALIAS_MIN_LEN..=ALIAS_MAX_LEN).contains(&len) {
        return Err(AppError::bad_request(
            "Alias must be between 3 and 50 characters",
            json!({ "provided_length": len }),
        ));
    }

    if !ALIAS_REGEX.is_match(alias) {
        return Err(AppError::bad_request(
            "Alias can only contain letters, numbers, hyphens, and underscores",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
