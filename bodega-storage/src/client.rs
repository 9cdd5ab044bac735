//! The [`ObjectStore`] seam and the blocking OCI Object Storage REST client.
//!
//! Everything downstream (locator, downloader, pipeline) talks to the trait,
//! so tests swap in an in-memory store and the production binary wires in
//! [`OciClient`].

use std::io::Read;

use chrono::Utc;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use bodega_core::BucketName;

use crate::auth::RequestSigner;
use crate::error::StorageError;
use crate::profile::OciProfile;

/// Percent-encode everything except unreserved characters. Over-encoding is
/// harmless; under-encoding breaks the signature.
const URL_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// One listed object. Only the name is needed; content is fetched separately.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectSummary {
    pub name: String,
}

/// Read-only object-storage operations used by the locator and downloader.
pub trait ObjectStore {
    /// List objects whose names start with `prefix`. With a `limit`, a single
    /// page of at most `limit` entries is returned; without one, all pages
    /// are drained.
    fn list_objects(
        &self,
        prefix: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ObjectSummary>, StorageError>;

    /// Fetch the full content of a stored object by its exact name.
    fn get_object(&self, name: &str) -> Result<Vec<u8>, StorageError>;
}

#[derive(Debug, Deserialize)]
struct ListObjectsResponse {
    #[serde(default)]
    objects: Vec<ObjectSummary>,
    #[serde(rename = "nextStartWith")]
    next_start_with: Option<String>,
}

/// Blocking REST client for one bucket in one tenancy namespace.
pub struct OciClient {
    agent: ureq::Agent,
    signer: RequestSigner,
    host: String,
    namespace: String,
    bucket: BucketName,
}

impl OciClient {
    /// Build a signer from the profile and resolve the tenancy namespace.
    ///
    /// The namespace call doubles as the connectivity check: a bad key,
    /// unreachable region, or expired credentials fail here, before any row
    /// is processed.
    pub fn connect(profile: &OciProfile, bucket: BucketName) -> Result<Self, StorageError> {
        let signer = RequestSigner::from_profile(profile)?;
        let agent = ureq::AgentBuilder::new().build();
        let host = format!("objectstorage.{}.oraclecloud.com", profile.region);

        let url = format!("https://{host}/n/");
        let body = read_body(signed_get(&agent, &signer, &host, "/n/")?, &url)?;
        let namespace: String = serde_json::from_str(&body)
            .map_err(|source| StorageError::Parse { url, source })?;
        tracing::info!("connected to {host}, namespace '{namespace}'");

        Ok(Self {
            agent,
            signer,
            host,
            namespace,
            bucket,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn bucket(&self) -> &BucketName {
        &self.bucket
    }

    /// `/n/<namespace>/b/<bucket>/o`
    fn object_root(&self) -> String {
        format!(
            "/n/{}/b/{}/o",
            encode(&self.namespace),
            encode(&self.bucket.0)
        )
    }
}

impl ObjectStore for OciClient {
    fn list_objects(
        &self,
        prefix: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ObjectSummary>, StorageError> {
        let mut out = Vec::new();
        let mut start: Option<String> = None;
        loop {
            let mut target = format!("{}?prefix={}", self.object_root(), encode(prefix));
            if let Some(limit) = limit {
                target.push_str(&format!("&limit={limit}"));
            }
            if let Some(s) = &start {
                target.push_str(&format!("&start={}", encode(s)));
            }
            let url = format!("https://{}{target}", self.host);
            let resp = signed_get(&self.agent, &self.signer, &self.host, &target)?;
            let body = read_body(resp, &url)?;
            let page: ListObjectsResponse =
                serde_json::from_str(&body).map_err(|source| StorageError::Parse { url, source })?;
            out.extend(page.objects);
            match (limit, page.next_start_with) {
                // Bounded calls return a single page; the caller asked for at
                // most `limit` entries anyway.
                (None, Some(next)) => start = Some(next),
                _ => return Ok(out),
            }
        }
    }

    fn get_object(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let target = format!("{}/{}", self.object_root(), encode(name));
        let url = format!("https://{}{target}", self.host);
        let resp = signed_get(&self.agent, &self.signer, &self.host, &target)?;
        let mut bytes = Vec::new();
        resp.into_reader()
            .read_to_end(&mut bytes)
            .map_err(|source| StorageError::Decode { url, source })?;
        Ok(bytes)
    }
}

// ---------------------------------------------------------------------------
// Request plumbing
// ---------------------------------------------------------------------------

fn signed_get(
    agent: &ureq::Agent,
    signer: &RequestSigner,
    host: &str,
    target: &str,
) -> Result<ureq::Response, StorageError> {
    let url = format!("https://{host}{target}");
    let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
    let authorization = signer.authorization("get", host, target, &date)?;
    match agent
        .get(&url)
        .set("date", &date)
        .set("authorization", &authorization)
        .call()
    {
        Ok(resp) => Ok(resp),
        Err(ureq::Error::Status(status, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            Err(StorageError::Api {
                status,
                url,
                body: snippet(&body),
            })
        }
        Err(ureq::Error::Transport(t)) => Err(StorageError::Transport {
            url,
            source: Box::new(t),
        }),
    }
}

fn read_body(resp: ureq::Response, url: &str) -> Result<String, StorageError> {
    resp.into_string().map_err(|source| StorageError::Decode {
        url: url.to_string(),
        source,
    })
}

fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, URL_SAFE).to_string()
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map_or(0, |(i, c)| i + c.len_utf8());
        format!("{}...", &body[..cut])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
