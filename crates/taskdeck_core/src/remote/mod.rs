//! Remote post source used by the list viewer.
//!
//! # Responsibility
//! - Define the fetch capability the viewer depends on.
//! - Provide the HTTP implementation over a configured endpoint.
//!
//! # Invariants
//! - One call issues exactly one request; there is no retry.
//! - Every failure carries a message suitable for direct display.

use crate::model::remote_item::RemoteItem;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use url::Url;

/// Endpoint used when configuration does not name one.
pub const DEFAULT_POSTS_URL: &str = "https://jsonplaceholder.typicode.com/posts";

pub type FetchResult<T> = Result<T, FetchError>;

/// Failure to obtain the remote collection.
#[derive(Debug)]
pub enum FetchError {
    /// Connection, TLS or body transfer failure.
    Transport(reqwest::Error),
    /// Server answered with a non-2xx status.
    Status { status: u16, url: String },
    /// Body was not a JSON array of posts.
    Decode(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "network error: {err}"),
            Self::Status { status, url } => {
                write!(f, "request to {url} failed with status {status}")
            }
            Self::Decode(message) => write!(f, "unexpected response payload: {message}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Status { .. } => None,
            Self::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Capability returning the full remote collection.
pub trait PostSource {
    fn fetch_posts(&self) -> FetchResult<Vec<RemoteItem>>;
}

impl<P: PostSource + ?Sized> PostSource for &P {
    fn fetch_posts(&self) -> FetchResult<Vec<RemoteItem>> {
        (**self).fetch_posts()
    }
}

/// Blocking HTTP source issuing `GET` to a fixed URL.
pub struct HttpPostSource {
    client: reqwest::blocking::Client,
    url: Url,
}

impl HttpPostSource {
    pub fn new(url: Url) -> FetchResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("taskdeck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl PostSource for HttpPostSource {
    fn fetch_posts(&self) -> FetchResult<Vec<RemoteItem>> {
        let started_at = Instant::now();
        let result = self.fetch_once();
        match &result {
            Ok(items) => info!(
                "event=posts_fetch module=remote status=ok host={} items={} duration_ms={}",
                self.url.host_str().unwrap_or("-"),
                items.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=posts_fetch module=remote status=error host={} duration_ms={} error={}",
                self.url.host_str().unwrap_or("-"),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

impl HttpPostSource {
    fn fetch_once(&self) -> FetchResult<Vec<RemoteItem>> {
        let response = self.client.get(self.url.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.url.to_string(),
            });
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|err| FetchError::Decode(err.to_string()))
    }
}
