//! Deprecated per-method accessors.
//!
//! These predate the generated endpoints and build their URLs by hand.
//! Each one resolves to the response body, unwrapped under the object key
//! when the body has one, and logs a deprecation notice the first time it
//! is called in the process.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use serde_json::{Map, Value};
use tokio::sync::oneshot;

use crate::client::Shopifapi;
use crate::clients::{HttpError, HttpMethod, HttpRequest};

/// Page size used by [`Shopifapi::get_base_obj`].
pub const PAGE_LIMIT: u64 = 250;

static NOTIFIED: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();

/// Returns `true` the first time it is called for `method`.
fn first_call(method: &'static str) -> bool {
    NOTIFIED
        .get_or_init(|| Mutex::new(HashSet::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(method)
}

/// Query arguments for the legacy accessors.
///
/// Either a preformatted query string, passed through untouched, or
/// key/value pairs that are form-encoded.
///
/// ```rust
/// use shopifapi::QueryArgs;
/// use serde_json::json;
///
/// assert_eq!(QueryArgs::from("since_id=5").encode(), "since_id=5");
///
/// let args = QueryArgs::from(json!({"title": "a b", "ids": [1, 2]}));
/// assert_eq!(args.encode(), "ids=1&ids=2&title=a%20b");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum QueryArgs {
    /// No arguments.
    #[default]
    Empty,
    /// A preformatted query string.
    Raw(String),
    /// Pairs to form-encode.
    Pairs(Vec<(String, String)>),
}

impl QueryArgs {
    /// Renders the arguments as a query string without the leading `?`.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Raw(raw) => raw.clone(),
            Self::Pairs(pairs) => pairs
                .iter()
                .map(|(key, value)| {
                    format!(
                        "{}={}",
                        urlencoding::encode(key),
                        urlencoding::encode(value)
                    )
                })
                .collect::<Vec<_>>()
                .join("&"),
        }
    }
}

impl From<()> for QueryArgs {
    fn from((): ()) -> Self {
        Self::Empty
    }
}

impl From<&str> for QueryArgs {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for QueryArgs {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<Vec<(String, String)>> for QueryArgs {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::Pairs(pairs)
    }
}

impl From<Map<String, Value>> for QueryArgs {
    fn from(map: Map<String, Value>) -> Self {
        let mut pairs = Vec::new();
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    pairs.extend(items.iter().map(|item| (key.clone(), scalar(item))));
                }
                other => pairs.push((key, scalar(&other))),
            }
        }
        Self::Pairs(pairs)
    }
}

impl From<Value> for QueryArgs {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into(),
            Value::String(raw) => Self::Raw(raw),
            _ => Self::Empty,
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn with_query(url: String, query: &str) -> String {
    if query.is_empty() {
        url
    } else {
        format!("{url}?{query}")
    }
}

/// Returns `body[key]` when the body is an object holding `key`.
fn unwrap_under(key: Option<&str>, body: Value) -> Value {
    match (key, body) {
        (Some(key), Value::Object(mut map)) if map.contains_key(key) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        (_, body) => body,
    }
}

impl Shopifapi {
    fn deprecated(&self, method: &'static str) {
        if first_call(method) {
            tracing::warn!(method, "deprecated accessor called");
            self.log.must(&[&format!(
                "{method} is deprecated. Use the generated get/create/update/remove endpoints instead."
            )]);
        }
    }

    fn admin_url(&self, path: impl fmt::Display) -> String {
        format!("{}/{path}", self.routes.base())
    }

    /// Enqueues a hand-built request; the returned future resolves to the
    /// body unwrapped under `obj`.
    fn make_request(
        &self,
        obj: Option<&str>,
        method: HttpMethod,
        url: String,
        body: Option<Value>,
    ) -> Result<impl Future<Output = Result<Value, HttpError>> + Send + 'static, HttpError> {
        let mut builder = HttpRequest::builder(method, url, self.dispatcher.auth.clone());
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let request = builder.build()?;

        let log = self.log.clone();
        let key = obj.map(str::to_string);
        log.may(&[&"[Url]", &request.url]);

        let (tx, rx) = oneshot::channel();
        self.dispatcher.submit(request, move |result| {
            let outcome = match result {
                Ok(response) => {
                    log.may(&[&"[Result]", &response.body]);
                    Ok(unwrap_under(key.as_deref(), response.body))
                }
                Err(e) => {
                    log.may(&[&"[Error]", &e]);
                    Err(e)
                }
            };
            let _ = tx.send(outcome);
        });

        let queue = Arc::clone(&self.dispatcher.queue);
        Ok(async move {
            queue.dispatch_pending();
            rx.await.unwrap_or(Err(HttpError::Dropped))
        })
    }

    /// Fetches `{obj}/{id}.json`.
    ///
    /// # Errors
    ///
    /// Returns the [`HttpError`] the request failed with.
    #[deprecated(since = "0.1.0", note = "use `get(obj)?.with_id().send(id)`")]
    pub async fn get_base_obj_by_id(
        &self,
        obj: &str,
        id: impl fmt::Display + Send,
    ) -> Result<Value, HttpError> {
        self.deprecated("get_base_obj_by_id");
        let url = self.admin_url(format_args!("{obj}/{id}.json"));
        self.make_request(None, HttpMethod::Get, url, None)?.await
    }

    /// Fetches `{obj}/{parent_id}/{subobj}.json`, unwrapped under `subobj`.
    ///
    /// # Errors
    ///
    /// Returns the [`HttpError`] the request failed with.
    #[deprecated(since = "0.1.0", note = "use `get(obj)?.sub(subobj)?.list().send(parent_id)`")]
    pub async fn get_sub_obj(
        &self,
        obj: &str,
        subobj: &str,
        parent_id: impl fmt::Display + Send,
    ) -> Result<Value, HttpError> {
        self.deprecated("get_sub_obj");
        let url = self.admin_url(format_args!("{obj}/{parent_id}/{subobj}.json"));
        self.make_request(Some(subobj), HttpMethod::Get, url, None)?
            .await
    }

    /// Sends `data` verbatim as a PUT to `{obj}/{id}.json`.
    ///
    /// # Errors
    ///
    /// Returns the [`HttpError`] the request failed with.
    #[deprecated(since = "0.1.0", note = "use `update(obj)?.send((id, fields))`")]
    pub async fn put(
        &self,
        obj: &str,
        id: impl fmt::Display + Send,
        data: Value,
    ) -> Result<Value, HttpError> {
        self.deprecated("put");
        let url = self.admin_url(format_args!("{obj}/{id}.json"));
        self.make_request(Some(obj), HttpMethod::Put, url, Some(data))?
            .await
    }

    /// Sends `data` verbatim as a POST to `{obj}.json`.
    ///
    /// # Errors
    ///
    /// Returns the [`HttpError`] the request failed with.
    #[deprecated(since = "0.1.0", note = "use `create(obj)?.send(fields)`")]
    pub async fn post(&self, obj: &str, data: Value) -> Result<Value, HttpError> {
        self.deprecated("post");
        let url = self.admin_url(format_args!("{obj}.json"));
        self.make_request(Some(obj), HttpMethod::Post, url, Some(data))?
            .await
    }

    /// Fetches `{obj}/count.json`.
    ///
    /// # Errors
    ///
    /// Returns the [`HttpError`] the request failed with.
    #[deprecated(since = "0.1.0", note = "use `get(obj)?.count().send(options)`")]
    pub async fn count(
        &self,
        obj: &str,
        args: impl Into<QueryArgs> + Send,
    ) -> Result<Value, HttpError> {
        self.deprecated("count");
        self.fetch_count(obj, &args.into()).await
    }

    async fn fetch_count(&self, obj: &str, args: &QueryArgs) -> Result<Value, HttpError> {
        let url = with_query(self.admin_url(format_args!("{obj}/count.json")), &args.encode());
        self.make_request(Some(obj), HttpMethod::Get, url, None)?
            .await
    }

    /// Fetches every item of `obj`.
    ///
    /// Counts first, then requests all pages of [`PAGE_LIMIT`] items at once
    /// and concatenates them in page order. The queue paces the page
    /// requests.
    ///
    /// # Errors
    ///
    /// Returns the first [`HttpError`] any request failed with.
    #[deprecated(since = "0.1.0", note = "use `get(obj)?.list().send(options)` per page")]
    pub async fn get_base_obj(
        &self,
        obj: &str,
        args: impl Into<QueryArgs> + Send,
    ) -> Result<Vec<Value>, HttpError> {
        self.deprecated("get_base_obj");
        let args = args.into();
        let query = args.encode();

        let count = self
            .fetch_count(obj, &args)
            .await?
            .get("count")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let pages = (count + PAGE_LIMIT - 1) / PAGE_LIMIT;

        let mut pending = Vec::new();
        for page in 1..=pages {
            let mut page_query = format!("limit={PAGE_LIMIT}&page={page}");
            if !query.is_empty() {
                page_query.push('&');
                page_query.push_str(&query);
            }
            let url = with_query(self.admin_url(format_args!("{obj}.json")), &page_query);
            pending.push(self.make_request(Some(obj), HttpMethod::Get, url, None)?);
        }

        let mut items = Vec::new();
        for page in pending {
            match page.await? {
                Value::Array(page_items) => items.extend(page_items),
                other => items.push(other),
            }
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_args_encoding() {
        assert_eq!(QueryArgs::from(()).encode(), "");
        assert_eq!(QueryArgs::from("a=1&b=2").encode(), "a=1&b=2");
        assert_eq!(
            QueryArgs::from(vec![("q".to_string(), "x&y".to_string())]).encode(),
            "q=x%26y"
        );
        assert_eq!(
            QueryArgs::from(json!({"status": "any", "skip": null})).encode(),
            "status=any"
        );
        assert_eq!(QueryArgs::from(json!(5)), QueryArgs::Empty);
    }

    #[test]
    fn test_unwrap_under_key() {
        assert_eq!(
            unwrap_under(Some("products"), json!({"products": [1]})),
            json!([1])
        );
        assert_eq!(
            unwrap_under(Some("products"), json!({"count": 3})),
            json!({"count": 3})
        );
        assert_eq!(unwrap_under(None, json!({"product": {}})), json!({"product": {}}));
    }

    #[test]
    fn test_with_query() {
        assert_eq!(with_query("u".to_string(), ""), "u");
        assert_eq!(with_query("u".to_string(), "a=1"), "u?a=1");
    }

    #[test]
    fn test_first_call_only_once() {
        assert!(first_call("test-only-method"));
        assert!(!first_call("test-only-method"));
    }
}
