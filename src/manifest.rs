//! Pinned versions from a vcpkg checkout.
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{ReqcheckError, Result};

/// The parts of a port's `vcpkg.json` that carry its version.
#[derive(Debug, Deserialize)]
struct PortManifest {
    #[serde(rename = "version-semver")]
    version_semver: Option<String>,
    version: Option<String>,
}

/// Location of a port manifest: `<vcpkg>/ports/<name>/vcpkg.json`.
pub fn port_manifest_path(vcpkg_path: &Path, name: &str) -> PathBuf {
    vcpkg_path.join("ports").join(name).join("vcpkg.json")
}

/// Version pinned by the port `name`. `version-semver` takes precedence
/// over `version`.
pub fn read_vcpkg_version(vcpkg_path: &Path, name: &str) -> Result<String> {
    let content = fs::read_to_string(port_manifest_path(vcpkg_path, name))?;
    let manifest: PortManifest = serde_json::from_str(&content)?;

    manifest
        .version_semver
        .or(manifest.version)
        .ok_or_else(|| ReqcheckError::MissingVersion(name.to_string()))
}
