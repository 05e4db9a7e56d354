//! Published URL resolution
//!
//! Prefers `static_site_url.value` from `terraform output -json`. When that is
//! unavailable the URL is computed from the storage account and region, so
//! resolution never fails.

use serde_json::Value;

use crate::domain::{StorageAccountName, UrlSourceKind};

/// Terraform output holding the published URL
pub const SITE_URL_OUTPUT: &str = "static_site_url";

/// Suffix used for regions missing from [`ENDPOINT_SUFFIXES`]
pub const DEFAULT_ENDPOINT_SUFFIX: &str = "z13.web.core.windows.net";

/// Static website endpoint suffix per region
const ENDPOINT_SUFFIXES: &[(&str, &str)] = &[
    ("eastus", "z13.web.core.windows.net"),
    ("eastus2", "z13.web.core.windows.net"),
    ("southcentralus", "z13.web.core.windows.net"),
    ("westus2", "z13.web.core.windows.net"),
    ("westus3", "z13.web.core.windows.net"),
    ("canadacentral", "z13.web.core.windows.net"),
    ("canadaeast", "z13.web.core.windows.net"),
    ("northeurope", "z13.web.core.windows.net"),
    ("westeurope", "z13.web.core.windows.net"),
    ("uksouth", "z13.web.core.windows.net"),
    ("ukwest", "z13.web.core.windows.net"),
    ("eastasia", "z13.web.core.windows.net"),
    ("southeastasia", "z13.web.core.windows.net"),
    ("japaneast", "z13.web.core.windows.net"),
    ("japanwest", "z13.web.core.windows.net"),
    ("australiaeast", "z13.web.core.windows.net"),
    ("australiasoutheast", "z13.web.core.windows.net"),
    ("centralindia", "z13.web.core.windows.net"),
    ("southindia", "z13.web.core.windows.net"),
    ("westindia", "z13.web.core.windows.net"),
    ("brazilsouth", "z13.web.core.windows.net"),
    ("southafricanorth", "z13.web.core.windows.net"),
    ("uaenorth", "z13.web.core.windows.net"),
];

/// Why the computed URL was used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// `terraform output` failed or timed out
    OutputsUnavailable,
    /// Output was not JSON
    Unparsable,
    /// JSON has no `static_site_url.value`
    MissingKey,
    /// Value is null, empty, or not a string
    EmptyValue,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::OutputsUnavailable => "outputs_unavailable",
            FallbackReason::Unparsable => "unparsable",
            FallbackReason::MissingKey => "missing_key",
            FallbackReason::EmptyValue => "empty_value",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSource {
    Published,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    pub url: String,
    pub source: UrlSource,
}

impl ResolvedUrl {
    pub fn source_kind(&self) -> UrlSourceKind {
        match self.source {
            UrlSource::Published => UrlSourceKind::TerraformOutput,
            UrlSource::Fallback(_) => UrlSourceKind::Fallback,
        }
    }
}

/// Resolve the site URL from raw `terraform output -json` text
pub fn resolve(outputs: Option<&str>, location: &str, account: &StorageAccountName) -> ResolvedUrl {
    match published_url(outputs) {
        Ok(url) => ResolvedUrl {
            url,
            source: UrlSource::Published,
        },
        Err(reason) => ResolvedUrl {
            url: fallback_url(account, location),
            source: UrlSource::Fallback(reason),
        },
    }
}

fn published_url(outputs: Option<&str>) -> Result<String, FallbackReason> {
    let raw = outputs.ok_or(FallbackReason::OutputsUnavailable)?;
    let parsed: Value = serde_json::from_str(raw).map_err(|_| FallbackReason::Unparsable)?;

    let value = parsed
        .get(SITE_URL_OUTPUT)
        .and_then(|output| output.get("value"))
        .ok_or(FallbackReason::MissingKey)?;

    match value.as_str() {
        Some(url) if !url.trim().is_empty() => Ok(url.to_string()),
        _ => Err(FallbackReason::EmptyValue),
    }
}

/// `https://{account}.{suffix}/`
pub fn fallback_url(account: &StorageAccountName, location: &str) -> String {
    format!("https://{}.{}/", account, endpoint_suffix_for(location))
}

/// Static website endpoint suffix for a region code (case-insensitive)
pub fn endpoint_suffix_for(location: &str) -> &'static str {
    let location = location.to_ascii_lowercase();
    ENDPOINT_SUFFIXES
        .iter()
        .find(|(region, _)| *region == location)
        .map(|(_, suffix)| *suffix)
        .unwrap_or(DEFAULT_ENDPOINT_SUFFIX)
}
