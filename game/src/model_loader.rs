use std::fmt;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::{Deserialize, Serialize};

/// The subset of the hosted model's `metadata.json` this demo reads. The
/// class-label list sizes the probability panel; everything else is kept
/// for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub labels: Vec<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub tm_version: Option<String>,
}

/// The two documents a hosted model exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEndpoints {
    pub model_url: String,
    pub metadata_url: String,
}

pub fn endpoints_for(base_url: &str) -> ModelEndpoints {
    let base = base_url.trim_end_matches('/');
    ModelEndpoints {
        model_url: format!("{base}/model.json"),
        metadata_url: format!("{base}/metadata.json"),
    }
}

#[derive(Debug)]
pub enum ModelLoadError {
    InvalidUrl(String),
    Request(String),
    Status(u16),
    Malformed(String),
}

impl fmt::Display for ModelLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelLoadError::InvalidUrl(url) => write!(f, "invalid model url: {url}"),
            ModelLoadError::Request(detail) => write!(f, "metadata request failed: {detail}"),
            ModelLoadError::Status(code) => write!(f, "metadata request returned status {code}"),
            ModelLoadError::Malformed(detail) => write!(f, "metadata did not parse: {detail}"),
        }
    }
}

impl std::error::Error for ModelLoadError {}

/// Fetch and parse the hosted model's metadata document. Plain HTTP/1 only;
/// a TLS-terminating proxy or local mirror is expected in front of an
/// https-only host.
pub async fn fetch_metadata(metadata_url: &str) -> Result<ModelMetadata, ModelLoadError> {
    let uri: hyper::Uri = metadata_url
        .parse()
        .map_err(|_| ModelLoadError::InvalidUrl(metadata_url.to_string()))?;
    if uri.authority().is_none() {
        return Err(ModelLoadError::InvalidUrl(metadata_url.to_string()));
    }

    let client: Client<_, Empty<Bytes>> = Client::builder(TokioExecutor::new()).build_http();
    let response = client
        .get(uri)
        .await
        .map_err(|err| ModelLoadError::Request(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ModelLoadError::Status(status.as_u16()));
    }

    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|err| ModelLoadError::Request(err.to_string()))?
        .to_bytes();
    serde_json::from_slice(&body).map_err(|err| ModelLoadError::Malformed(err.to_string()))
}
