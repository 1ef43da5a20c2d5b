//! # Application Type Model
//!
//! Capability-tag type descriptions and the assignability rules used to
//! match candidates against requested types.
//!
//! The engine has no runtime type introspection to lean on, so components
//! declare their handled type explicitly at registration: a [`TypeTag`]
//! names an application type together with its is-a lineage, and a
//! [`HandledType`] describes what a candidate claims to operate on. The
//! declaration is computed once per registration and cached on the
//! candidate entry; it never changes afterwards.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A named application type and its declared ancestor names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeTag {
    name: String,
    lineage: Vec<String>,
}

impl TypeTag {
    /// A type with no declared ancestors
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lineage: Vec::new(),
        }
    }

    /// A type derived from the given ancestors, nearest first
    pub fn derived_from(name: impl Into<String>, ancestors: &[&str]) -> Self {
        Self {
            name: name.into(),
            lineage: ancestors.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lineage(&self) -> &[String] {
        &self.lineage
    }

    /// Standard is-a check: `self` is the same type as `ancestor` or lists
    /// it in its lineage.
    pub fn is_assignable_to(&self, ancestor: &TypeTag) -> bool {
        self.name == ancestor.name || self.lineage.iter().any(|a| *a == ancestor.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The type a candidate declares itself capable of handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandledType {
    /// Handles the named type and anything assignable to it
    Concrete(TypeTag),
    /// Generic over any type satisfying every bound
    Bounded(Vec<TypeTag>),
    /// No type information declared; matches anything of its kind
    CatchAll,
}

impl HandledType {
    /// Whether a requested type is acceptable to this declaration.
    pub fn matches(&self, requested: &TypeTag) -> bool {
        match self {
            HandledType::Concrete(declared) => requested.is_assignable_to(declared),
            HandledType::Bounded(bounds) => {
                bounds.iter().all(|bound| requested.is_assignable_to(bound))
            }
            HandledType::CatchAll => true,
        }
    }

    /// The tag used when two declarations are compared for specificity.
    fn representative(&self) -> Option<&TypeTag> {
        match self {
            HandledType::Concrete(tag) => Some(tag),
            HandledType::Bounded(bounds) => bounds.first(),
            HandledType::CatchAll => None,
        }
    }

    /// Tie-break ordering between two matching declarations: the more
    /// derived handled type sorts first, and an untyped declaration sorts
    /// after any typed one. Unrelated declarations compare as equal, which
    /// leaves them in registration order under a stable sort.
    pub fn compare_specificity(left: &HandledType, right: &HandledType) -> Ordering {
        match (left.representative(), right.representative()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(l), Some(r)) => {
                if l == r {
                    Ordering::Equal
                } else if r.is_assignable_to(l) {
                    // right is the subclass, it goes first
                    Ordering::Greater
                } else if l.is_assignable_to(r) {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            }
        }
    }
}
