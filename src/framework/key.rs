//! # Request Identity
//!
//! A [`RequestKey`] addresses one cache entry: the endpoint name plus a stable
//! serialization of the arguments the request was issued with. Two calls that
//! build equal keys are the *same* request as far as the cache is concerned.

use serde::Serialize;
use std::fmt;

/// Unique identity of a query or mutation (endpoint + arguments).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey {
    endpoint: String,
    args: String,
}

impl RequestKey {
    /// Builds a key from an endpoint name and its arguments.
    ///
    /// Arguments are serialized through `serde_json::Value`, whose object maps
    /// are ordered, so field order in the argument type does not change the key.
    pub fn new<A: Serialize + ?Sized>(
        endpoint: impl Into<String>,
        args: &A,
    ) -> Result<Self, serde_json::Error> {
        let args = serde_json::to_value(args)?.to_string();
        Ok(Self {
            endpoint: endpoint.into(),
            args,
        })
    }

    /// Key for an endpoint that takes no arguments.
    pub fn unit(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            args: "null".to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn args(&self) -> &str {
        &self.args
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.endpoint, self.args)
    }
}

/// Invalidation-grouping label attached to cached queries.
///
/// Mutations declare which tags they invalidate; every entry carrying one of
/// those tags becomes stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(&'static str);

impl Tag {
    pub const SUPPLIER: Tag = Tag("Supplier");
    pub const ITEM: Tag = Tag("Item");
    pub const ORDER: Tag = Tag("Order");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
