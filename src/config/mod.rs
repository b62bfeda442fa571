//! Construction options for the client facade.
//!
//! # Overview
//!
//! - [`ClientConfig`]: validated construction options
//! - [`ClientConfigBuilder`]: builder for [`ClientConfig`]
//! - [`Credentials`]: basic-auth credential pair with masked debug output
//! - [`StoreUrl`]: validated store base URL
//!
//! # Example
//!
//! ```rust
//! use shopifapi::{ClientConfig, Credentials, StoreUrl};
//!
//! let config = ClientConfig::builder()
//!     .auth(Credentials::new("api-key", "password").unwrap())
//!     .url(StoreUrl::new("https://my-store.myshopify.com").unwrap())
//!     .verbose(true)
//!     .build()
//!     .unwrap();
//!
//! assert!(config.verbose());
//! ```

mod newtypes;

pub use newtypes::{Credentials, StoreUrl};

use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::log::LogFn;

/// Validated construction options for [`Shopifapi`](crate::Shopifapi).
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone)]
pub struct ClientConfig {
    auth: Credentials,
    url: StoreUrl,
    verbose: bool,
    logger: Option<LogFn>,
    with_response: bool,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the credential pair.
    #[must_use]
    pub const fn auth(&self) -> &Credentials {
        &self.auth
    }

    /// Returns the store base URL.
    #[must_use]
    pub const fn url(&self) -> &StoreUrl {
        &self.url
    }

    /// Returns whether the `may` logging channel is enabled.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Returns the custom logger, if configured.
    #[must_use]
    pub fn logger(&self) -> Option<&LogFn> {
        self.logger.as_ref()
    }

    /// Returns whether raw responses are surfaced to completions.
    #[must_use]
    pub const fn with_response(&self) -> bool {
        self.with_response
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("auth", &self.auth)
            .field("url", &self.url)
            .field("verbose", &self.verbose)
            .field("logger", &self.logger.as_ref().map(|_| "<fn>"))
            .field("with_response", &self.with_response)
            .finish()
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// Required fields are `auth` and `url`.
///
/// # Defaults
///
/// - `verbose`: `false`
/// - `logger`: `None` (lines go to `tracing`)
/// - `with_response`: `false`
#[derive(Default)]
pub struct ClientConfigBuilder {
    auth: Option<Credentials>,
    url: Option<StoreUrl>,
    verbose: bool,
    logger: Option<LogFn>,
    with_response: bool,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the credential pair (required).
    #[must_use]
    pub fn auth(mut self, auth: Credentials) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the store base URL (required).
    #[must_use]
    pub fn url(mut self, url: StoreUrl) -> Self {
        self.url = Some(url);
        self
    }

    /// Enables the `may` logging channel.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Routes log lines to a custom function instead of `tracing`.
    #[must_use]
    pub fn logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Surfaces the raw [`HttpResponse`](crate::HttpResponse) alongside
    /// parsed bodies.
    #[must_use]
    pub const fn with_response(mut self, with_response: bool) -> Self {
        self.with_response = with_response;
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `auth` or `url`
    /// was not set.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let auth = self
            .auth
            .ok_or(ConfigError::MissingRequiredField { field: "auth" })?;
        let url = self
            .url
            .ok_or(ConfigError::MissingRequiredField { field: "url" })?;

        Ok(ClientConfig {
            auth,
            url,
            verbose: self.verbose,
            logger: self.logger,
            with_response: self.with_response,
        })
    }
}
