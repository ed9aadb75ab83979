//! Package registry lookup (Packagist).
//!
//! Each configured project maps to `{vendor}/{project}` on the registry, which
//! provides the canonical package name, its description and its repository URL.

use crate::error::{ApiError, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::future::Future;

const SERVICE: &str = "Packagist";
const DEFAULT_REGISTRY_URL: &str = "https://packagist.org";

/// Package metadata the templates and the hosting calls need
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageInfo {
    /// Full package name, `vendor/name`
    pub name: String,
    /// Package description
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Source repository URL
    #[serde(default, deserialize_with = "null_as_empty")]
    pub repository: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl PackageInfo {
    /// Repository name without owner and `.git` suffix
    pub fn repository_name(&self) -> String {
        let last = self
            .repository
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        last.trim_end_matches(".git").to_string()
    }
}

/// Source of package metadata
pub trait PackageRegistry {
    /// Look up `vendor/name`
    fn package(&self, full_name: &str) -> impl Future<Output = Result<PackageInfo>>;
}

#[derive(Deserialize)]
struct PackageEnvelope {
    package: PackageInfo,
}

/// HTTP client for packagist.org
#[derive(Debug, Clone)]
pub struct PackagistClient {
    base_url: String,
    client: Client,
}

impl PackagistClient {
    /// Create a client against packagist.org
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_REGISTRY_URL)
    }

    /// Create a client against a mirror
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }
}

impl Default for PackagistClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageRegistry for PackagistClient {
    async fn package(&self, full_name: &str) -> Result<PackageInfo> {
        let url = format!("{}/packages/{}.json", self.base_url, full_name);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(ApiError::from)?;
        match response.status() {
            status if status.is_success() => {
                let envelope: PackageEnvelope = response.json().await.map_err(ApiError::from)?;
                Ok(envelope.package)
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound {
                service: SERVICE,
                resource: full_name.to_string(),
            }
            .into()),
            status => Err(ApiError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(repository: &str) -> PackageInfo {
        PackageInfo {
            name: "acme/demo-bundle".to_string(),
            description: String::new(),
            repository: repository.to_string(),
        }
    }

    #[test]
    fn test_repository_name_from_url() {
        assert_eq!(
            package("https://github.com/acme/DemoBundle.git").repository_name(),
            "DemoBundle"
        );
        assert_eq!(package("https://github.com/acme/demo/").repository_name(), "demo");
        assert_eq!(package("").repository_name(), "");
    }

    #[test]
    fn test_envelope_decoding() {
        let json = r#"{"package":{"name":"acme/demo","description":"Demo","repository":"https://github.com/acme/demo","versions":{}}}"#;
        let envelope: PackageEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.package.name, "acme/demo");
        assert_eq!(envelope.package.description, "Demo");

        let json = r#"{"package":{"name":"acme/demo","description":null,"repository":"https://github.com/acme/demo"}}"#;
        let envelope: PackageEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.package.description, "");
    }
}
