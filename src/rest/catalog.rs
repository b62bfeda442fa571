//! Resource taxonomy of the Admin REST API.
//!
//! [`ResourceCatalog`] maps resource aliases (singular and plural spellings)
//! to REST path segments. [`SubResourceCatalog`] maps a parent alias to the
//! resources nested under one of its instances.
//!
//! Both catalogs iterate in sorted key order, so anything generated from
//! them is deterministic.

use std::collections::BTreeMap;

/// Top-level resources exposed by [`ResourceCatalog::standard`].
pub const BASE_RESOURCES: &[(&str, &str)] = &[
    ("blogs", "blogs"),
    ("checkout", "checkouts"),
    ("checkouts", "checkouts"),
    ("collects", "collections"),
    ("comment", "comments"),
    ("comments", "comments"),
    ("countries", "countries"),
    ("customCollection", "custom_collections"),
    ("customCollections", "custom_collections"),
    ("customer", "customers"),
    ("customers", "customers"),
    ("order", "orders"),
    ("orders", "orders"),
    ("page", "pages"),
    ("pages", "pages"),
    ("product", "products"),
    ("products", "products"),
    ("shop", "shop"),
    ("smartCollection", "smart_collections"),
    ("smartCollections", "smart_collections"),
    ("variant", "variants"),
    ("variants", "variants"),
];

const PRODUCT_CHILDREN: &[(&str, &str)] = &[
    ("image", "images"),
    ("images", "images"),
    ("variant", "variants"),
    ("variants", "variants"),
];

const ORDER_CHILDREN: &[(&str, &str)] = &[
    ("refund", "refunds"),
    ("refunds", "refunds"),
    ("transaction", "transactions"),
    ("transactions", "transactions"),
];

/// Nested resources exposed by [`SubResourceCatalog::standard`].
pub const SUB_RESOURCES: &[(&str, &[(&str, &str)])] = &[
    ("order", ORDER_CHILDREN),
    ("orders", ORDER_CHILDREN),
    ("product", PRODUCT_CHILDREN),
    ("products", PRODUCT_CHILDREN),
];

/// Mapping from resource alias to REST path segment.
///
/// Several aliases may share one segment.
///
/// # Example
///
/// ```rust
/// use shopifapi::rest::ResourceCatalog;
///
/// let catalog = ResourceCatalog::standard();
/// assert_eq!(catalog.segment("product"), Some("products"));
/// assert_eq!(catalog.segment("products"), Some("products"));
/// assert_eq!(catalog.segment("widgets"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceCatalog {
    resources: BTreeMap<String, String>,
}

impl ResourceCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the catalog of resources the platform serves.
    #[must_use]
    pub fn standard() -> Self {
        BASE_RESOURCES.iter().copied().collect()
    }

    /// Adds or replaces an alias.
    pub fn insert(&mut self, alias: impl Into<String>, segment: impl Into<String>) {
        self.resources.insert(alias.into(), segment.into());
    }

    /// Returns the path segment for an alias.
    #[must_use]
    pub fn segment(&self, alias: &str) -> Option<&str> {
        self.resources.get(alias).map(String::as_str)
    }

    /// Iterates `(alias, segment)` pairs in alias order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.resources
            .iter()
            .map(|(alias, segment)| (alias.as_str(), segment.as_str()))
    }

    /// Returns the number of aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if the catalog has no aliases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl<A, S> FromIterator<(A, S)> for ResourceCatalog
where
    A: Into<String>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (A, S)>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for (alias, segment) in iter {
            catalog.insert(alias, segment);
        }
        catalog
    }
}

/// Mapping from parent alias to its nested resources.
///
/// A parent missing from the catalog has no nested resources.
///
/// # Example
///
/// ```rust
/// use shopifapi::rest::SubResourceCatalog;
///
/// let catalog = SubResourceCatalog::standard();
/// let children = catalog.children("products").unwrap();
/// assert_eq!(children.get("image").map(String::as_str), Some("images"));
/// assert!(catalog.children("pages").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubResourceCatalog {
    parents: BTreeMap<String, BTreeMap<String, String>>,
}

impl SubResourceCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the nested resources the platform serves.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for (parent, children) in SUB_RESOURCES {
            for (alias, segment) in *children {
                catalog.insert(*parent, *alias, *segment);
            }
        }
        catalog
    }

    /// Adds or replaces a nested resource under a parent alias.
    pub fn insert(
        &mut self,
        parent: impl Into<String>,
        alias: impl Into<String>,
        segment: impl Into<String>,
    ) {
        self.parents
            .entry(parent.into())
            .or_default()
            .insert(alias.into(), segment.into());
    }

    /// Returns the nested resources of a parent alias, if it has any.
    #[must_use]
    pub fn children(&self, parent: &str) -> Option<&BTreeMap<String, String>> {
        self.parents.get(parent)
    }

    /// Iterates parent aliases that have nested resources.
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.parents.keys().map(String::as_str)
    }
}
