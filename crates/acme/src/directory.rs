//! Canonical ACME service directory
//!
//! The directory is the root metadata document of an ACME server. It lists
//! the URLs of the server's operations (RFC 8555 section 7.1.1).
//!
//! Every endpoint is optional here. A directory missing `newNonce` or
//! `newOrder` still loads; the error surfaces in whichever operation needs
//! the endpoint.

use serde::{Deserialize, Deserializer, Serialize};

/// Resolved ACME service directory
///
/// Immutable once constructed: fields are only reachable through accessors.
/// Use [`DirectoryBuilder`] to construct one by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    /// URL the directory was retrieved from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    new_nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    new_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    new_order: Option<String>,
    /// Pre-authorization endpoint, most CAs omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    new_authz: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    revoke_cert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key_change: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<DirectoryMeta>,
}

/// The directory's `meta` object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryMeta {
    /// Current terms of service URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    /// CA website
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Hostnames recognized in CAA records
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub caa_identities: Vec<String>,
    /// Whether new accounts need external account binding
    #[serde(default, deserialize_with = "null_as_default")]
    pub external_account_required: bool,
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Directory {
    /// Start building a directory by hand
    pub fn builder() -> DirectoryBuilder {
        DirectoryBuilder::default()
    }

    /// URL the directory was retrieved from, if known
    pub fn resource_url(&self) -> Option<&str> {
        self.resource_url.as_deref()
    }

    /// `newNonce` URL. A `HEAD` request here yields a fresh nonce.
    pub fn new_nonce(&self) -> Option<&str> {
        self.new_nonce.as_deref()
    }

    /// `newAccount` URL
    pub fn new_account(&self) -> Option<&str> {
        self.new_account.as_deref()
    }

    /// `newOrder` URL
    pub fn new_order(&self) -> Option<&str> {
        self.new_order.as_deref()
    }

    /// `newAuthz` URL
    pub fn new_authz(&self) -> Option<&str> {
        self.new_authz.as_deref()
    }

    /// `revokeCert` URL
    pub fn revoke_cert(&self) -> Option<&str> {
        self.revoke_cert.as_deref()
    }

    /// `keyChange` URL
    pub fn key_change(&self) -> Option<&str> {
        self.key_change.as_deref()
    }

    /// Directory metadata block
    pub fn meta(&self) -> Option<&DirectoryMeta> {
        self.meta.as_ref()
    }

    /// Terms of service URL from the metadata block
    pub fn terms_of_service(&self) -> Option<&str> {
        self.meta.as_ref()?.terms_of_service.as_deref()
    }

    /// Record the URL the directory was fetched from
    pub(crate) fn with_resource_url(mut self, url: &str) -> Self {
        self.resource_url = Some(url.to_string());
        self
    }
}

/// Builder for [`Directory`]
#[derive(Debug, Default)]
pub struct DirectoryBuilder {
    inner: Directory,
}

impl DirectoryBuilder {
    pub fn resource_url(mut self, url: impl Into<String>) -> Self {
        self.inner.resource_url = Some(url.into());
        self
    }

    pub fn new_nonce(mut self, url: impl Into<String>) -> Self {
        self.inner.new_nonce = Some(url.into());
        self
    }

    pub fn new_account(mut self, url: impl Into<String>) -> Self {
        self.inner.new_account = Some(url.into());
        self
    }

    pub fn new_order(mut self, url: impl Into<String>) -> Self {
        self.inner.new_order = Some(url.into());
        self
    }

    pub fn new_authz(mut self, url: impl Into<String>) -> Self {
        self.inner.new_authz = Some(url.into());
        self
    }

    pub fn revoke_cert(mut self, url: impl Into<String>) -> Self {
        self.inner.revoke_cert = Some(url.into());
        self
    }

    pub fn key_change(mut self, url: impl Into<String>) -> Self {
        self.inner.key_change = Some(url.into());
        self
    }

    pub fn meta(mut self, meta: DirectoryMeta) -> Self {
        self.inner.meta = Some(meta);
        self
    }

    /// Finish building
    pub fn build(self) -> Directory {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETSENCRYPT_DIRECTORY: &str = r#"{
        "keyChange": "https://acme-v02.api.letsencrypt.org/acme/key-change",
        "meta": {
            "caaIdentities": ["letsencrypt.org"],
            "termsOfService": "https://letsencrypt.org/documents/LE-SA-v1.4-April-3-2024.pdf",
            "website": "https://letsencrypt.org"
        },
        "newAccount": "https://acme-v02.api.letsencrypt.org/acme/new-acct",
        "newNonce": "https://acme-v02.api.letsencrypt.org/acme/new-nonce",
        "newOrder": "https://acme-v02.api.letsencrypt.org/acme/new-order",
        "renewalInfo": "https://acme-v02.api.letsencrypt.org/draft-ietf-acme-ari-03/renewalInfo",
        "revokeCert": "https://acme-v02.api.letsencrypt.org/acme/revoke-cert",
        "kJy3C0rDxa8": "https://community.letsencrypt.org/t/adding-random-entries-to-the-directory/33417"
    }"#;

    #[test]
    fn test_parse_letsencrypt_directory() {
        let dir: Directory = serde_json::from_str(LETSENCRYPT_DIRECTORY).unwrap();

        assert_eq!(
            dir.new_nonce(),
            Some("https://acme-v02.api.letsencrypt.org/acme/new-nonce")
        );
        assert_eq!(
            dir.new_account(),
            Some("https://acme-v02.api.letsencrypt.org/acme/new-acct")
        );
        assert_eq!(
            dir.new_order(),
            Some("https://acme-v02.api.letsencrypt.org/acme/new-order")
        );
        assert_eq!(
            dir.revoke_cert(),
            Some("https://acme-v02.api.letsencrypt.org/acme/revoke-cert")
        );
        assert_eq!(
            dir.key_change(),
            Some("https://acme-v02.api.letsencrypt.org/acme/key-change")
        );
        assert_eq!(dir.new_authz(), None);
        assert_eq!(dir.resource_url(), None);

        let meta = dir.meta().unwrap();
        assert_eq!(meta.caa_identities, vec!["letsencrypt.org".to_string()]);
        assert_eq!(meta.website.as_deref(), Some("https://letsencrypt.org"));
        assert!(!meta.external_account_required);
        assert!(dir.terms_of_service().unwrap().ends_with(".pdf"));
    }

    #[test]
    fn test_missing_endpoints_are_none() {
        let dir: Directory =
            serde_json::from_str(r#"{"newOrder": "https://ca.example/order"}"#).unwrap();

        assert_eq!(dir.new_order(), Some("https://ca.example/order"));
        assert_eq!(dir.new_nonce(), None);
        assert_eq!(dir.new_account(), None);
        assert!(dir.meta().is_none());
        assert!(dir.terms_of_service().is_none());
    }

    #[test]
    fn test_explicit_null_endpoint_is_none() {
        let dir: Directory = serde_json::from_str(r#"{"newNonce": null}"#).unwrap();
        assert_eq!(dir.new_nonce(), None);
    }

    #[test]
    fn test_with_resource_url_replaces_existing() {
        let dir = Directory::builder()
            .resource_url("https://first.example/directory")
            .build()
            .with_resource_url("https://second.example/directory");
        assert_eq!(dir.resource_url(), Some("https://second.example/directory"));

        let dir = Directory::default().with_resource_url("https://ca.example/directory");
        assert_eq!(dir.resource_url(), Some("https://ca.example/directory"));
    }

    #[test]
    fn test_explicit_null_meta_fields_use_defaults() {
        let dir: Directory = serde_json::from_str(
            r#"{"meta": {"caaIdentities": null, "externalAccountRequired": null, "website": null}}"#,
        )
        .unwrap();

        let meta = dir.meta().unwrap();
        assert!(meta.caa_identities.is_empty());
        assert!(!meta.external_account_required);
        assert_eq!(meta.website, None);
    }

    #[test]
    fn test_meta_round_trips_through_snapshot_encoding() {
        let dir = Directory::builder()
            .meta(DirectoryMeta {
                terms_of_service: None,
                website: Some("https://ca.example".to_string()),
                caa_identities: vec!["ca.example".to_string()],
                external_account_required: true,
            })
            .build();

        let bytes = rmp_serde::to_vec_named(&dir).unwrap();
        let decoded: Directory = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(decoded, dir);
    }

    #[test]
    fn test_serializes_camel_case_without_nulls() {
        let dir = Directory::builder()
            .new_nonce("https://ca.example/nonce")
            .key_change("https://ca.example/key-change")
            .build();

        let json = serde_json::to_value(&dir).unwrap();
        assert_eq!(json["newNonce"], "https://ca.example/nonce");
        assert_eq!(json["keyChange"], "https://ca.example/key-change");
        assert!(json.get("newOrder").is_none());
        assert!(json.get("meta").is_none());
    }
}
