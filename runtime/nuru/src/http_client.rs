//! `.add_http_client::<TService>()`-registered services (§4.3, §4.7.6).
//!
//! The emitted dispatcher builds exactly one [`reqwest::blocking::Client`] per
//! registration as a `static` (§5 "the emitted program owns all runtime state: static
//! `HttpClient`s live for process lifetime"), running the user's configuration
//! closure once at first use, then constructs the typed service wrapper around it.

use std::sync::OnceLock;

use reqwest::blocking::{Client, ClientBuilder};

/// A thin, cloneable wrapper around a blocking [`reqwest::blocking::Client`] so
/// `TService` constructors can take `HttpClient` by value without fighting `reqwest`'s
/// own builder lifetime.
#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn new(configure: impl FnOnce(ClientBuilder) -> ClientBuilder) -> Self {
        let builder = configure(Client::builder());
        Self {
            inner: builder
                .build()
                .expect("the registered HttpClient configuration produced an invalid client"),
        }
    }

    pub fn inner(&self) -> &Client {
        &self.inner
    }
}

/// Build-once-per-process storage for a single static `HttpClient` field, the shape
/// the emitter generates one of per `.add_http_client::<T>()` registration.
pub struct StaticHttpClient {
    cell: OnceLock<HttpClient>,
}

impl StaticHttpClient {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    pub fn get_or_init(&self, configure: impl FnOnce(ClientBuilder) -> ClientBuilder) -> &HttpClient {
        self.cell.get_or_init(|| HttpClient::new(configure))
    }
}

impl Default for StaticHttpClient {
    fn default() -> Self {
        Self::new()
    }
}
