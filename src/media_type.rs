//! # Media Type Model
//!
//! Value type for negotiated wire content types plus the compatibility and
//! specificity algebra the selection algorithms are built on.
//!
//! ## Ordering
//!
//! Sorting of media types follows the general rule: `x/y` sorts before
//! `x/*`, which sorts before `*/*`, i.e. a candidate that explicitly lists a
//! media type is consulted before a candidate that lists a wildcard. Quality
//! parameter values are also used, such that `x/y;q=1.0` sorts before
//! `x/y;q=0.7`. Remaining ties are left in declaration order, which keeps
//! selection deterministic for a fixed registration sequence.

use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Wildcard marker for a media type or subtype
pub const WILDCARD: &str = "*";

const QUALITY_PARAM: &str = "q";

/// A parsed `type/subtype[;param=value]*` media type.
///
/// Type, subtype, and parameter names are case-insensitive and normalized to
/// lowercase; parameter values keep their case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaType {
    primary: String,
    sub: String,
    parameters: BTreeMap<String, String>,
}

impl MediaType {
    /// Create a media type without parameters
    pub fn new(primary: impl Into<String>, sub: impl Into<String>) -> Self {
        Self {
            primary: primary.into().to_lowercase(),
            sub: sub.into().to_lowercase(),
            parameters: BTreeMap::new(),
        }
    }

    /// The full wildcard `*/*`
    pub fn wildcard() -> Self {
        Self::new(WILDCARD, WILDCARD)
    }

    /// Attach a parameter, returning the modified type
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into().to_lowercase(), value.into());
        self
    }

    /// Parse a `type/subtype[;param=value]*` string.
    ///
    /// A bare `*` is accepted as shorthand for `*/*`, matching permissive
    /// Accept-header handling.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ProviderError::malformed_media_type(value, "empty string"));
        }

        let mut segments = trimmed.split(';');
        let type_part = segments.next().unwrap_or_default().trim();

        let (primary, sub) = match type_part.split_once('/') {
            Some((p, s)) => (p.trim(), s.trim()),
            None if type_part == WILDCARD => (WILDCARD, WILDCARD),
            None => {
                return Err(ProviderError::malformed_media_type(
                    value,
                    "missing '/' separator",
                ))
            }
        };
        if primary.is_empty() || sub.is_empty() {
            return Err(ProviderError::malformed_media_type(
                value,
                "empty type or subtype",
            ));
        }

        let mut media_type = MediaType::new(primary, sub);
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (name, param_value) = segment.split_once('=').ok_or_else(|| {
                ProviderError::malformed_media_type(value, format!("parameter '{segment}' has no value"))
            })?;
            let param_value = param_value.trim().trim_matches('"');
            media_type = media_type.with_parameter(name.trim(), param_value);
        }
        Ok(media_type)
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn sub(&self) -> &str {
        &self.sub
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn is_wildcard_type(&self) -> bool {
        self.primary == WILDCARD
    }

    pub fn is_wildcard_subtype(&self) -> bool {
        self.sub == WILDCARD
    }

    /// Declared quality factor: the `q` parameter, default 1.0, clamped to
    /// [0, 1]. An unparseable value falls back to the default.
    pub fn quality(&self) -> f32 {
        self.parameter(QUALITY_PARAM)
            .and_then(|q| q.parse::<f32>().ok())
            .map(|q| q.clamp(0.0, 1.0))
            .unwrap_or(1.0)
    }

    /// Symmetric wildcard compatibility on type and subtype.
    pub fn is_compatible(&self, other: &MediaType) -> bool {
        let type_ok = self.is_wildcard_type()
            || other.is_wildcard_type()
            || self.primary == other.primary;
        let sub_ok = self.is_wildcard_subtype()
            || other.is_wildcard_subtype()
            || self.sub == other.sub;
        type_ok && sub_ok
    }

    /// Whether every parameter other than `q` that both sides declare has
    /// the same value on each side.
    pub fn parameters_match(&self, other: &MediaType) -> bool {
        self.parameters
            .iter()
            .filter(|(name, _)| name.as_str() != QUALITY_PARAM)
            .all(|(name, value)| match other.parameters.get(name) {
                Some(other_value) => value == other_value,
                None => true,
            })
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.primary, self.sub)?;
        for (name, value) in &self.parameters {
            write!(f, ";{name}={value}")?;
        }
        Ok(())
    }
}

/// Specificity ordering between two media types: concrete before wildcard
/// subtype before full wildcard; within equal specificity a higher quality
/// factor sorts first. Equal specificity and quality compare as equal so a
/// stable sort preserves declaration order.
pub fn compare_specificity(left: &MediaType, right: &MediaType) -> Ordering {
    match (left.is_wildcard_type(), right.is_wildcard_type()) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }
    match (left.is_wildcard_subtype(), right.is_wildcard_subtype()) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }
    right
        .quality()
        .partial_cmp(&left.quality())
        .unwrap_or(Ordering::Equal)
}

/// Stable in-place sort by [`compare_specificity`]
pub fn sort_by_specificity(types: &mut [MediaType]) {
    types.sort_by(compare_specificity);
}

/// Lexicographic ordering over two already-sorted declared sets. A candidate
/// declaring fewer types sorts first on a full prefix tie, so narrowly
/// declared candidates outrank broadly declared ones.
pub fn compare_sorted_sets(left: &[MediaType], right: &[MediaType]) -> Ordering {
    for (l, r) in left.iter().zip(right.iter()) {
        let ordering = compare_specificity(l, r);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left.len().cmp(&right.len())
}

/// Compatibility intersection between a requested set and a candidate's
/// declared set.
///
/// Each compatible pairing contributes one representative that takes the
/// concrete type/subtype from whichever side declares it and carries the
/// declared side's parameters. With `strict_parameters`, a pairing whose
/// shared non-`q` parameters disagree is dropped. Duplicates are removed;
/// order follows the requested set.
pub fn intersect(
    requested: &[MediaType],
    declared: &[MediaType],
    strict_parameters: bool,
) -> Vec<MediaType> {
    let mut matches = Vec::new();
    for wanted in requested {
        for offered in declared {
            if !wanted.is_compatible(offered) {
                continue;
            }
            if strict_parameters && !wanted.parameters_match(offered) {
                continue;
            }
            let primary = if wanted.is_wildcard_type() {
                offered.primary()
            } else {
                wanted.primary()
            };
            let sub = if wanted.is_wildcard_subtype() {
                offered.sub()
            } else {
                wanted.sub()
            };
            let mut representative = MediaType::new(primary, sub);
            representative.parameters = offered.parameters.clone();
            if !matches.contains(&representative) {
                matches.push(representative);
            }
        }
    }
    matches
}
