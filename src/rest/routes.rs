//! Route table generation.
//!
//! [`RouteTable::generate`] walks the resource catalogs once per verb and
//! produces a route function for every combination the API exposes:
//!
//! - `get`: every resource gets `list`, `count` and `withId`; resources with
//!   nested children also get those three shapes per child, rooted at
//!   `{parent}/?/{child}`
//! - `create`: the `list` shape
//! - `update` and `remove`: the `withId` shape
//!
//! Only write routes are bound to a resource key.

use std::collections::BTreeMap;
use std::fmt;

use crate::clients::HttpMethod;
use crate::rest::catalog::{ResourceCatalog, SubResourceCatalog};
use crate::rest::path::{join, PathVariant, Route};

/// Admin path prefix joined onto the store URL.
pub const ADMIN_PREFIX: &str = "admin";

/// The four verbs of the generated API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    /// Read (GET).
    Get,
    /// Create (POST).
    Create,
    /// Update (PUT).
    Update,
    /// Remove (DELETE).
    Remove,
}

impl Verb {
    /// All verbs, in generation order.
    pub const ALL: [Self; 4] = [Self::Get, Self::Create, Self::Update, Self::Remove];

    /// Returns the HTTP method for this verb.
    #[must_use]
    pub const fn http_method(&self) -> HttpMethod {
        match self {
            Self::Get => HttpMethod::Get,
            Self::Create => HttpMethod::Post,
            Self::Update => HttpMethod::Put,
            Self::Remove => HttpMethod::Delete,
        }
    }

    /// Returns the path shape used by write verbs, `None` for reads.
    #[must_use]
    pub const fn write_variant(&self) -> Option<PathVariant> {
        match self {
            Self::Get => None,
            Self::Create => Some(PathVariant::List),
            Self::Update | Self::Remove => Some(PathVariant::WithId),
        }
    }

    /// Returns the verb's name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three read shapes of one resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantRoutes {
    /// Collection route.
    pub list: Route,
    /// Count route.
    pub count: Route,
    /// Single-item route.
    pub with_id: Route,
}

impl VariantRoutes {
    fn new(base: &str, prefix: &str) -> Self {
        let route = |variant: PathVariant| {
            Route::new(base, format!("{prefix}{}", variant.suffix()), None)
        };
        Self {
            list: route(PathVariant::List),
            count: route(PathVariant::Count),
            with_id: route(PathVariant::WithId),
        }
    }

    /// Returns the route for a shape.
    #[must_use]
    pub const fn variant(&self, variant: PathVariant) -> &Route {
        match variant {
            PathVariant::List => &self.list,
            PathVariant::Count => &self.count,
            PathVariant::WithId => &self.with_id,
        }
    }
}

/// Read routes of one resource, plus its nested resources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadRoutes {
    /// The resource's own shapes.
    pub routes: VariantRoutes,
    /// Nested resources keyed by child alias.
    pub sub_resources: BTreeMap<String, VariantRoutes>,
}

impl ReadRoutes {
    /// Returns the routes of a nested resource.
    #[must_use]
    pub fn sub(&self, alias: &str) -> Option<&VariantRoutes> {
        self.sub_resources.get(alias)
    }
}

/// Route functions for every verb and resource alias.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTable {
    base: String,
    get: BTreeMap<String, ReadRoutes>,
    create: BTreeMap<String, Route>,
    update: BTreeMap<String, Route>,
    remove: BTreeMap<String, Route>,
}

impl RouteTable {
    /// Generates the table for a store URL.
    ///
    /// Generation is a pure function of its inputs: the same URL and
    /// catalogs always yield an equal table.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shopifapi::rest::{Identifier, ResourceCatalog, RouteTable, SubResourceCatalog, Verb};
    ///
    /// let table = RouteTable::generate(
    ///     "https://shop.myshopify.com",
    ///     &ResourceCatalog::standard(),
    ///     &SubResourceCatalog::standard(),
    /// );
    ///
    /// let variants = table.read("products").unwrap().sub("variants").unwrap();
    /// assert_eq!(
    ///     variants.with_id.path(&[Identifier::from(1), Identifier::from(2)]),
    ///     "https://shop.myshopify.com/admin/products/1/variants/2.json"
    /// );
    ///
    /// let update = table.write(Verb::Update, "order").unwrap();
    /// assert_eq!(update.resource_key(), Some("orders"));
    /// ```
    #[must_use]
    pub fn generate(
        url: &str,
        resources: &ResourceCatalog,
        sub_resources: &SubResourceCatalog,
    ) -> Self {
        let base = join(&[url, ADMIN_PREFIX]);
        let mut table = Self {
            base: base.clone(),
            get: BTreeMap::new(),
            create: BTreeMap::new(),
            update: BTreeMap::new(),
            remove: BTreeMap::new(),
        };

        for verb in Verb::ALL {
            for (alias, segment) in resources.iter() {
                match verb.write_variant() {
                    None => {
                        let children: BTreeMap<String, VariantRoutes> = sub_resources
                            .children(alias)
                            .map(|children| {
                                children
                                    .iter()
                                    .map(|(child, child_segment)| {
                                        let prefix = format!("{segment}/?/{child_segment}");
                                        (child.clone(), VariantRoutes::new(&base, &prefix))
                                    })
                                    .collect()
                            })
                            .unwrap_or_default();

                        table.get.insert(
                            alias.to_string(),
                            ReadRoutes {
                                routes: VariantRoutes::new(&base, segment),
                                sub_resources: children,
                            },
                        );
                    }
                    Some(variant) => {
                        let route = Route::new(
                            base.as_str(),
                            format!("{segment}{}", variant.suffix()),
                            Some(segment.to_string()),
                        );
                        if let Some(routes) = table.writes_mut(verb) {
                            routes.insert(alias.to_string(), route);
                        }
                    }
                }
            }
        }

        tracing::debug!(
            base = %table.base,
            resources = resources.len(),
            "generated route table"
        );

        table
    }

    /// Generates the table for the standard catalogs.
    #[must_use]
    pub fn standard(url: &str) -> Self {
        Self::generate(
            url,
            &ResourceCatalog::standard(),
            &SubResourceCatalog::standard(),
        )
    }

    /// Returns the admin base URL every route is rooted at.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns the read routes of a resource alias.
    #[must_use]
    pub fn read(&self, alias: &str) -> Option<&ReadRoutes> {
        self.get.get(alias)
    }

    /// Returns the write route of a resource alias.
    ///
    /// Always `None` for [`Verb::Get`]; use [`RouteTable::read`].
    #[must_use]
    pub fn write(&self, verb: Verb, alias: &str) -> Option<&Route> {
        self.writes(verb).and_then(|routes| routes.get(alias))
    }

    /// Iterates resource aliases with read routes.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.get.keys().map(String::as_str)
    }

    const fn writes(&self, verb: Verb) -> Option<&BTreeMap<String, Route>> {
        match verb {
            Verb::Get => None,
            Verb::Create => Some(&self.create),
            Verb::Update => Some(&self.update),
            Verb::Remove => Some(&self.remove),
        }
    }

    fn writes_mut(&mut self, verb: Verb) -> Option<&mut BTreeMap<String, Route>> {
        match verb {
            Verb::Get => None,
            Verb::Create => Some(&mut self.create),
            Verb::Update => Some(&mut self.update),
            Verb::Remove => Some(&mut self.remove),
        }
    }
}
