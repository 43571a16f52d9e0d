// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, Response};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use opina_app::{FeedbackId, FeedbackRecord, RemoteCollection};

/// Blocking HTTP client for the bulk feedback endpoint.
///
/// The service exposes a single URL for all four operations; the verb selects
/// the operation, and create/update/delete bodies are one-element arrays.
/// Only a 200 response counts as confirmation; every other status and every
/// transport failure is reported as an error without distinguishing further.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        Url::parse(&base_url).with_context(|| format!("invalid api.base_url {base_url:?}"))?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn confirm(&self, response: Response) -> Result<()> {
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        Ok(())
    }
}

impl RemoteCollection for Client {
    fn fetch_all(&mut self) -> Result<Vec<FeedbackRecord>> {
        log::debug!("GET {}", self.base_url);
        let response = self
            .http
            .get(&self.base_url)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let records: Vec<FeedbackRecord> = response.json().context("decode feedback list")?;
        log::debug!("fetched {} records", records.len());
        Ok(records)
    }

    fn create(&mut self, record: &FeedbackRecord) -> Result<()> {
        log::debug!("POST {} id={}", self.base_url, record.id);
        let response = self
            .http
            .post(&self.base_url)
            .json(&[record])
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        self.confirm(response)
    }

    fn update(&mut self, record: &FeedbackRecord) -> Result<()> {
        log::debug!("PATCH {} id={}", self.base_url, record.id);
        let response = self
            .http
            .patch(&self.base_url)
            .json(&[record])
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        self.confirm(response)
    }

    fn delete(&mut self, id: FeedbackId) -> Result<()> {
        log::debug!("DELETE {} id={id}", self.base_url);
        let response = self
            .http
            .delete(&self.base_url)
            .json(&[id])
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        self.confirm(response)
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("request to {base_url} timed out");
    }
    anyhow!("cannot reach {base_url} ({error})")
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body) {
        let message = parsed.error.or(parsed.message).unwrap_or_default();
        if !message.is_empty() {
            return anyhow!("server error ({}): {}", status.as_u16(), message);
        }
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
    message: Option<String>,
}
