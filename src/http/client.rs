// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation
//!
//! Thin wrapper over reqwest. Navigation fetches stream the body so the
//! caller can observe download progress chunk by chunk.

use std::time::{Duration, Instant};

use bytes::BytesMut;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::Client;

use super::response::Response;
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Default timeout
    pub timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Default headers
    pub default_headers: HeaderMap,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            "accept",
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        default_headers.insert(
            "accept-language",
            HeaderValue::from_static("en-US,en;q=0.5"),
        );

        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
            default_headers,
        }
    }
}

/// HTTP client for navigation and stylesheet fetches
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .default_headers(config.default_headers.clone())
            .build()
            .map_err(Error::Http)?;

        Ok(Self { client, config })
    }

    /// Execute a plain GET request
    pub async fn get(&self, url: impl AsRef<str>) -> Result<Response> {
        self.get_with_progress(url, |_, _| {}).await
    }

    /// Execute a GET request, streaming the body.
    ///
    /// `on_progress` is invoked after each received chunk with the bytes
    /// loaded so far and the total length when the server reported one.
    pub async fn get_with_progress<F>(
        &self,
        url: impl AsRef<str>,
        mut on_progress: F,
    ) -> Result<Response>
    where
        F: FnMut(u64, Option<u64>),
    {
        let url = url::Url::parse(url.as_ref())?;
        let start = Instant::now();

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let redirected = final_url != url;
        let total = response.content_length();

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            body.extend_from_slice(&chunk);
            on_progress(body.len() as u64, total);
        }

        Ok(Response::new(
            status,
            headers,
            body.freeze(),
            final_url,
            redirected,
            start.elapsed().as_millis() as u64,
        ))
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}
