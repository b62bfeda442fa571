//! Call normalization.
//!
//! Every route call accepts a loose argument list and reduces it to a
//! [`CanonicalCall`]: the identifiers to substitute into the path, the
//! options object, and the completion callback.
//!
//! | arguments                      | id           | options     | callback |
//! |--------------------------------|--------------|-------------|----------|
//! | `()`                           | -            | `{}`        | no-op    |
//! | `(x)`                          | -            | `x`         | no-op    |
//! | `(x, cb)`                      | -            | `x`         | `cb`     |
//! | `(id, options)`                | `id`         | `options`   | no-op    |
//! | `(id, options, cb, ..)`        | `id`         | `options`   | `cb`     |
//! | `(.., cb, ..)` options slot    | -            | `{}`        | `cb`     |
//!
//! Identifiers are then resolved by priority: the explicit `id` argument, a
//! scalar or array passed as options, and finally `options.id`, which is
//! removed from the options when used. Options that are not an object
//! collapse to `{}`.

use std::fmt;

use serde_json::{Map, Value};

use crate::clients::HttpError;
use crate::rest::path::Identifier;
use crate::rest::response::RouteResponse;

type CompletionFn = Box<dyn FnOnce(Result<RouteResponse, HttpError>) + Send + 'static>;

/// Completion for a single route call. Invoked at most once.
pub struct Callback(CompletionFn);

impl Callback {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Result<RouteResponse, HttpError>) + Send + 'static,
    {
        Self(Box::new(f))
    }

    /// A callback that discards its result.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Invokes the callback, consuming it.
    pub fn invoke(self, result: Result<RouteResponse, HttpError>) {
        (self.0)(result);
    }
}

impl Default for Callback {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(<fn>)")
    }
}

/// One positional argument of a route call.
#[derive(Debug)]
pub enum CallArg {
    /// A JSON value: an identifier, an options object, or an identifier list.
    Value(Value),
    /// A completion callback.
    Callback(Callback),
}

impl CallArg {
    /// Wraps a closure as a callback argument.
    pub fn callback<F>(f: F) -> Self
    where
        F: FnOnce(Result<RouteResponse, HttpError>) + Send + 'static,
    {
        Self::Callback(Callback::new(f))
    }

    const fn is_callback(&self) -> bool {
        matches!(self, Self::Callback(_))
    }

    fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Callback(_) => None,
        }
    }

    fn into_callback(self) -> Option<Callback> {
        match self {
            Self::Callback(callback) => Some(callback),
            Self::Value(_) => None,
        }
    }
}

impl From<Value> for CallArg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Callback> for CallArg {
    fn from(callback: Callback) -> Self {
        Self::Callback(callback)
    }
}

/// The normalized form of a route call.
#[derive(Debug, Default)]
pub struct CanonicalCall {
    /// Identifiers to substitute into the path, in order.
    pub ids: Vec<Identifier>,
    /// The options object: query parameters for reads, fields for writes.
    pub options: Map<String, Value>,
    /// The completion callback.
    pub callback: Callback,
}

/// Reduces a route call's arguments to a [`CanonicalCall`].
///
/// Total over every argument shape: arguments past the third are ignored,
/// values in the callback position are discarded, and a callback in the
/// options position is taken as the callback.
///
/// # Example
///
/// ```rust
/// use shopifapi::rest::{normalize, CallArg, Identifier};
/// use serde_json::json;
///
/// let call = normalize(vec![
///     CallArg::Value(json!({"id": 42, "fields": "id,title"})),
///     CallArg::callback(|_| {}),
/// ]);
///
/// assert_eq!(call.ids, vec![Identifier::from(42)]);
/// assert_eq!(call.options.get("fields"), Some(&json!("id,title")));
/// assert!(call.options.get("id").is_none());
/// ```
#[must_use]
pub fn normalize(args: Vec<CallArg>) -> CanonicalCall {
    let mut args = args.into_iter();
    let (id, options, callback) = match (args.next(), args.next(), args.next()) {
        (None, _, _) => (None, None, None),
        (Some(options), None, _) => (None, Some(options), None),
        (Some(first), Some(second), None) if second.is_callback() => {
            (None, Some(first), Some(second))
        }
        (Some(id), Some(options), None) => (Some(id), Some(options), None),
        (Some(id), Some(options), Some(callback)) => (Some(id), Some(options), Some(callback)),
    };

    let (options, callback) = match options {
        Some(CallArg::Callback(callback)) => (None, Some(callback)),
        other => (
            other.and_then(CallArg::into_value),
            callback.and_then(CallArg::into_callback),
        ),
    };

    let explicit = id
        .and_then(CallArg::into_value)
        .as_ref()
        .and_then(Identifier::from_value);

    let (ids, options) = resolve_ids(explicit, options);

    CanonicalCall {
        ids,
        options,
        callback: callback.unwrap_or_default(),
    }
}

fn resolve_ids(
    explicit: Option<Identifier>,
    options: Option<Value>,
) -> (Vec<Identifier>, Map<String, Value>) {
    let mut options = match options {
        Some(Value::Object(map)) => map,
        Some(Value::Array(items)) if explicit.is_none() => {
            return (identifiers(&items), Map::new());
        }
        Some(scalar) if explicit.is_none() => {
            return (
                Identifier::from_value(&scalar).into_iter().collect(),
                Map::new(),
            );
        }
        _ => Map::new(),
    };

    if let Some(id) = explicit {
        return (vec![id], options);
    }

    let ids = match options.remove("id") {
        Some(Value::Array(items)) => identifiers(&items),
        Some(value) => Identifier::from_value(&value).into_iter().collect(),
        None => Vec::new(),
    };

    (ids, options)
}

fn identifiers(items: &[Value]) -> Vec<Identifier> {
    items.iter().filter_map(Identifier::from_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn value(v: Value) -> CallArg {
        CallArg::Value(v)
    }

    fn counting_callback() -> (CallArg, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let arg = CallArg::callback(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (arg, hits)
    }

    fn fire(call: CanonicalCall) {
        call.callback.invoke(Ok(RouteResponse::new(json!({}), None)));
    }

    #[test]
    fn test_no_arguments() {
        let call = normalize(vec![]);
        assert!(call.ids.is_empty());
        assert!(call.options.is_empty());
    }

    #[test]
    fn test_numeric_options_become_identifier() {
        let (cb, hits) = counting_callback();
        let call = normalize(vec![value(json!(42)), cb]);

        assert_eq!(call.ids, vec![Identifier::from(42)]);
        assert!(call.options.is_empty());
        fire(call);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_explicit_id_with_empty_options() {
        let (cb, hits) = counting_callback();
        let call = normalize(vec![value(json!(42)), value(json!({})), cb]);

        assert_eq!(call.ids, vec![Identifier::from(42)]);
        assert!(call.options.is_empty());
        fire(call);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_options_id_is_consumed() {
        let (cb, _) = counting_callback();
        let call = normalize(vec![value(json!({"id": 42})), cb]);

        assert_eq!(call.ids, vec![Identifier::from(42)]);
        assert!(call.options.is_empty());
    }

    #[test]
    fn test_options_id_array_fills_nested_placeholders() {
        let call = normalize(vec![value(json!({"id": [7, 9], "limit": 5}))]);

        assert_eq!(call.ids, vec![Identifier::from(7), Identifier::from(9)]);
        assert_eq!(call.options, json!({"limit": 5}).as_object().unwrap().clone());
    }

    #[test]
    fn test_array_options_are_identifiers() {
        let call = normalize(vec![value(json!([7, "nine"]))]);
        assert_eq!(call.ids, vec![Identifier::from(7), Identifier::from("nine")]);
        assert!(call.options.is_empty());
    }

    #[test]
    fn test_explicit_id_wins_over_options_id() {
        let call = normalize(vec![
            value(json!(1)),
            value(json!({"id": 2, "title": "x"})),
            CallArg::callback(|_| {}),
        ]);

        assert_eq!(call.ids, vec![Identifier::from(1)]);
        assert_eq!(call.options.get("id"), Some(&json!(2)));
    }

    #[test]
    fn test_callback_in_options_position() {
        let (cb, hits) = counting_callback();
        let call = normalize(vec![cb]);

        assert!(call.ids.is_empty());
        assert!(call.options.is_empty());
        fire(call);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_in_options_position_with_explicit_id() {
        let (cb, hits) = counting_callback();
        let call = normalize(vec![value(json!(5)), cb, value(json!({"ignored": true}))]);

        assert_eq!(call.ids, vec![Identifier::from(5)]);
        assert!(call.options.is_empty());
        fire(call);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_two_values_are_id_and_options() {
        let call = normalize(vec![value(json!(3)), value(json!({"fields": "id"}))]);
        assert_eq!(call.ids, vec![Identifier::from(3)]);
        assert_eq!(call.options.get("fields"), Some(&json!("id")));
    }

    #[test]
    fn test_non_object_options_collapse() {
        let call = normalize(vec![value(json!(null)), CallArg::callback(|_| {})]);
        assert!(call.ids.is_empty());
        assert!(call.options.is_empty());

        let call = normalize(vec![value(json!(1)), value(json!(true)), CallArg::callback(|_| {})]);
        assert_eq!(call.ids, vec![Identifier::from(1)]);
        assert!(call.options.is_empty());
    }

    #[test]
    fn test_surplus_arguments_ignored() {
        let (cb, hits) = counting_callback();
        let (extra, extra_hits) = counting_callback();
        let call = normalize(vec![value(json!(1)), value(json!({})), cb, extra]);

        fire(call);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(extra_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_string_identifier() {
        let call = normalize(vec![value(json!("frontpage")), CallArg::callback(|_| {})]);
        assert_eq!(call.ids, vec![Identifier::from("frontpage")]);
    }
}
