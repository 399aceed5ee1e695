// crates/glossa-core/src/core/language.rs
// ============================================================================
// Module: Glossa Language Normalizer
// Description: Language tags, the supported-language registry, and resolution.
// Purpose: Resolve requested language tags with regional fallback.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every translation entry point takes an explicit, optional language tag.
//! [`LanguageRegistry::resolve`] turns it into a supported [`LanguageTag`]:
//! an exact registered match wins, otherwise the base subtag (`de` for
//! `de-AT`) is used when it is registered on its own. Absence of a tag means
//! the registry default, which is resolved once when the registry is built.
//!
//! ## Invariants
//! - An exact match always beats a base-subtag match.
//! - The registry default is itself a supported tag.
//! - Matching is case-sensitive; tags are compared as registered.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separators accepted between a base language subtag and its region.
pub const REGION_SEPARATORS: [char; 2] = ['-', '_'];
/// Maximum accepted length of a language tag.
pub const MAX_LANGUAGE_TAG_LENGTH: usize = 35;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Language resolution and registry errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Every variant names the offending tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageError {
    /// Requested tag and its base subtag are both unregistered.
    #[error("language `{language}` is not supported")]
    Unsupported {
        /// Offending language tag.
        language: String,
    },
    /// Tag is syntactically invalid.
    #[error("language tag `{language}` is invalid: {reason}")]
    InvalidTag {
        /// Offending language tag.
        language: String,
        /// Validation failure detail.
        reason: &'static str,
    },
    /// Tag registered more than once.
    #[error("language `{language}` is registered more than once")]
    Duplicate {
        /// Duplicated language tag.
        language: String,
    },
    /// Registry has no languages.
    #[error("language registry must not be empty")]
    EmptyRegistry,
}

// ============================================================================
// SECTION: Language Tag
// ============================================================================

/// Validated language tag such as `en`, `en-GB`, or `pt_BR`.
///
/// # Invariants
/// - Non-empty, at most [`MAX_LANGUAGE_TAG_LENGTH`] bytes.
/// - ASCII alphanumeric subtags joined by one of [`REGION_SEPARATORS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Parses and validates a language tag.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageError::InvalidTag`] when the tag is malformed.
    pub fn parse(value: &str) -> Result<Self, LanguageError> {
        let invalid = |reason| LanguageError::InvalidTag {
            language: value.to_string(),
            reason,
        };
        if value.is_empty() {
            return Err(invalid("tag must not be empty"));
        }
        if value.len() > MAX_LANGUAGE_TAG_LENGTH {
            return Err(invalid("tag exceeds length limit"));
        }
        for subtag in value.split(REGION_SEPARATORS) {
            if subtag.is_empty() {
                return Err(invalid("tag contains an empty subtag"));
            }
            if !subtag.chars().all(|ch| ch.is_ascii_alphanumeric()) {
                return Err(invalid("subtags must be ascii alphanumeric"));
            }
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the base subtag (the portion before the first region separator).
    #[must_use]
    pub fn base(&self) -> &str {
        base_subtag(&self.0)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for LanguageTag {
    type Error = LanguageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LanguageTag> for String {
    fn from(value: LanguageTag) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Returns the portion of `tag` before the first region separator.
#[must_use]
pub fn base_subtag(tag: &str) -> &str {
    tag.split(REGION_SEPARATORS).next().unwrap_or(tag)
}

/// Resolves `requested` against `supported` with regional fallback.
///
/// Exact matches return immediately; otherwise the first supported tag equal
/// to the requested base subtag is returned.
///
/// # Errors
///
/// Returns [`LanguageError::Unsupported`] when neither the tag nor its base
/// subtag is supported.
pub fn normalize_language(
    requested: &str,
    supported: &[LanguageTag],
) -> Result<LanguageTag, LanguageError> {
    let base = base_subtag(requested);
    let mut base_match = None;
    for tag in supported {
        if tag.as_str() == requested {
            return Ok(tag.clone());
        }
        if base_match.is_none() && tag.as_str() == base {
            base_match = Some(tag);
        }
    }
    base_match.cloned().ok_or_else(|| LanguageError::Unsupported {
        language: requested.to_string(),
    })
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Ordered registry of supported languages plus the process default.
///
/// # Invariants
/// - `supported` is non-empty and duplicate-free; order is preserved.
/// - `default_language` is an element of `supported`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRegistry {
    /// Supported tags in registration order.
    supported: Vec<LanguageTag>,
    /// Resolved default language.
    default_language: LanguageTag,
}

impl LanguageRegistry {
    /// Builds a registry, resolving `default_language` against `supported`.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageError`] when the registry is empty, contains
    /// duplicates, or the default does not resolve.
    pub fn new(
        supported: Vec<LanguageTag>,
        default_language: &str,
    ) -> Result<Self, LanguageError> {
        if supported.is_empty() {
            return Err(LanguageError::EmptyRegistry);
        }
        for (position, tag) in supported.iter().enumerate() {
            if supported[.. position].contains(tag) {
                return Err(LanguageError::Duplicate {
                    language: tag.to_string(),
                });
            }
        }
        let default_language = normalize_language(default_language, &supported)?;
        Ok(Self {
            supported,
            default_language,
        })
    }

    /// Builds a registry from raw tag strings.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageError`] when a tag is invalid or [`Self::new`] fails.
    pub fn from_tags<I, T>(supported: I, default_language: &str) -> Result<Self, LanguageError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let supported = supported
            .into_iter()
            .map(|tag| LanguageTag::parse(tag.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(supported, default_language)
    }

    /// Returns the supported tags in registration order.
    #[must_use]
    pub fn supported(&self) -> &[LanguageTag] {
        &self.supported
    }

    /// Returns the resolved default language.
    #[must_use]
    pub const fn default_language(&self) -> &LanguageTag {
        &self.default_language
    }

    /// Resolves an optional requested tag; `None` selects the default.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageError::Unsupported`] when the tag does not resolve.
    pub fn resolve(&self, requested: Option<&str>) -> Result<LanguageTag, LanguageError> {
        match requested {
            None => Ok(self.default_language.clone()),
            Some(requested) => normalize_language(requested, &self.supported),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
