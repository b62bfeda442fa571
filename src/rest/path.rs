//! Path templates and route functions.
//!
//! A path template marks each identifier position with a single `?`
//! placeholder. A [`Route`] binds a template to the admin base URL; calling
//! [`Route::path`] with identifiers fills the placeholders in order. Text
//! identifiers are percent-encoded so they stay within one path segment.
//!
//! # Example
//!
//! ```rust
//! use shopifapi::rest::{Identifier, Route};
//!
//! let route = Route::new("https://shop.myshopify.com/admin", "products/?/variants/?.json", None);
//!
//! assert_eq!(
//!     route.path(&[Identifier::from(7), Identifier::from(9)]),
//!     "https://shop.myshopify.com/admin/products/7/variants/9.json"
//! );
//!
//! // No identifiers leaves the template as-is.
//! assert_eq!(
//!     route.path(&[]),
//!     "https://shop.myshopify.com/admin/products/?/variants/?.json"
//! );
//! ```

use std::borrow::Cow;
use std::fmt;

use serde_json::{Number, Value};

/// Placeholder token for one identifier position.
pub const PLACEHOLDER: char = '?';

/// The shape of a resource path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathVariant {
    /// The collection (`products.json`).
    List,
    /// The aggregate count (`products/count.json`).
    Count,
    /// A single item (`products/?.json`).
    WithId,
}

impl PathVariant {
    /// All variants, in generation order.
    pub const ALL: [Self; 3] = [Self::List, Self::Count, Self::WithId];

    /// Returns the suffix appended to a resource segment.
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::List => ".json",
            Self::Count => "/count.json",
            Self::WithId => "/?.json",
        }
    }

    /// Returns the variant's key in the method table.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Count => "count",
            Self::WithId => "withId",
        }
    }
}

impl fmt::Display for PathVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value substituted into a placeholder.
///
/// Numbers and non-empty strings are identifiers; every other JSON value
/// is not.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// A numeric identifier.
    Number(Number),
    /// A textual identifier (e.g. an asset key or handle).
    Text(String),
}

impl Identifier {
    /// Interprets a JSON scalar as an identifier.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Returns the identifier as one URL path segment.
    #[must_use]
    pub fn path_segment(&self) -> Cow<'_, str> {
        match self {
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Text(s) => urlencoding::encode(s),
        }
    }

    /// Converts the identifier back to JSON.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! identifier_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Identifier {
                fn from(id: $t) -> Self {
                    Self::Number(Number::from(id))
                }
            }
        )*
    };
}

identifier_from_int!(i32, i64, u32, u64, usize);

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// Joins path parts with `/`, skipping empty parts.
#[must_use]
pub fn join(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

/// A route function: a base URL plus a path template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    base: String,
    template: String,
    resource_key: Option<String>,
}

impl Route {
    /// Creates a route.
    ///
    /// `resource_key` is the segment write bodies are wrapped under; read
    /// routes carry none.
    #[must_use]
    pub fn new(
        base: impl Into<String>,
        template: impl Into<String>,
        resource_key: Option<String>,
    ) -> Self {
        Self {
            base: base.into(),
            template: template.into(),
            resource_key,
        }
    }

    /// Returns the path template relative to the base.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the resource key bound to this route, if any.
    #[must_use]
    pub fn resource_key(&self) -> Option<&str> {
        self.resource_key.as_deref()
    }

    /// Returns the number of identifier positions in the template.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.template.matches(PLACEHOLDER).count()
    }

    /// Fills placeholders with `ids` in order and joins the result onto the
    /// base URL.
    ///
    /// Surplus identifiers are ignored; missing ones leave their
    /// placeholders in place.
    #[must_use]
    pub fn path(&self, ids: &[Identifier]) -> String {
        let mut ids = ids.iter();
        let mut pieces = self.template.split(PLACEHOLDER);
        let mut path = pieces.next().unwrap_or_default().to_string();
        for piece in pieces {
            match ids.next() {
                Some(id) => path.push_str(&id.path_segment()),
                None => path.push(PLACEHOLDER),
            }
            path.push_str(piece);
        }
        join(&[&self.base, &path])
    }
}
