//! Build Descriptor
//!
//! This is a rust implementation of the Osiris Build Descriptor Format. A
//! descriptor declares the Gradle build configuration of a single Android
//! application module: its plugins, SDK levels, signing configurations, build
//! types and packaging rules.
//!
//! This module only deals with the syntax of a descriptor. The types in here
//! mirror the TOML tables one-to-one and carry no semantic guarantees. Use
//! [`crate::resolve::resolve()`] to turn a raw descriptor into a validated
//! [`crate::resolve::BuildDescriptor`].

use serde;
use toml;

/// Descriptor Errors
///
/// Errors raised while reading a descriptor from its textual representation.
/// Semantic problems are reported by the resolver instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The descriptor file could not be read.
    #[error("cannot read build descriptor {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The descriptor is not valid TOML, or does not match the table layout.
    #[error("cannot parse build descriptor: {0}")]
    Syntax(#[from] toml::de::Error),
}

/// NDK Version Entry
///
/// The `ndk-version` key is either a version string, or a boolean. `false`
/// explicitly disables the NDK, `true` is equivalent to omitting the key.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum RawNdkVersion {
    Enabled(bool),
    Version(String),
}

/// Raw Android Table
///
/// Sub-type of `Raw` with the `android` extension options of the module. The
/// options are one-to-one mappings of their equivalents in the Android Gradle
/// plugin DSL.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawAndroid {
    pub namespace: Option<String>,
    pub application_id: Option<String>,

    pub compile_sdk: Option<u32>,
    pub min_sdk: Option<u32>,
    pub target_sdk: Option<u32>,

    pub version_code: Option<u32>,
    pub version_name: Option<String>,

    pub ndk_version: Option<RawNdkVersion>,
    /// Java language level for `compileOptions` and `kotlinOptions`.
    pub java_version: Option<u32>,
    pub multi_dex: Option<bool>,
    pub test_instrumentation_runner: Option<String>,
    #[serde(default)]
    pub abi_filters: Vec<String>,
    /// Whether instrumentation test variants are created.
    pub android_tests: Option<bool>,
}

/// Raw Flutter Table
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawFlutter {
    /// Path to the Flutter project root relative to the module.
    pub source: Option<String>,
}

/// Raw Signing Configuration
///
/// Entry of the `signing-config` table. Passwords are never stored in the
/// descriptor, only the names of the environment variables carrying them.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawSigningConfig {
    pub store_file: Option<String>,
    pub key_alias: Option<String>,
    pub store_password_env: Option<String>,
    pub key_password_env: Option<String>,
}

/// Raw Build Type
///
/// Entry of the `build-type` table. Unset options fall back to the defaults
/// of the respective build type.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawBuildType {
    pub debuggable: Option<bool>,
    pub minify: Option<bool>,
    pub shrink_resources: Option<bool>,
    pub application_id_suffix: Option<String>,
    pub signing_config: Option<String>,
}

/// Raw Packaging Table
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawPackaging {
    /// Glob patterns of resources excluded from the final artifact.
    #[serde(default)]
    pub resource_excludes: Vec<String>,
}

/// Raw Descriptor Content
///
/// This type contains the raw descriptor content as parsed by `toml` and
/// converted into rust types via `serde`.
///
/// Note that content of the type is not verified other than for syntactic
/// correctness required by the given types. Semantic correctness is verified
/// by the resolver.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Raw {
    /// Version of the descriptor format. Only version `1` is currently
    /// supported.
    pub version: u32,

    /// Gradle plugin identifiers in the order they are applied.
    #[serde(default)]
    pub plugins: Vec<String>,
    pub android: Option<RawAndroid>,
    pub flutter: Option<RawFlutter>,
    #[serde(default)]
    pub signing_config: std::collections::BTreeMap<String, RawSigningConfig>,
    #[serde(default)]
    pub build_type: std::collections::BTreeMap<String, RawBuildType>,
    pub packaging: Option<RawPackaging>,
}

impl Raw {
    /// Parse descriptor from string
    ///
    /// Parse the given string as a literal descriptor in TOML representation.
    /// Unknown keys are ignored.
    pub fn parse_str(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }

    /// Parse descriptor from file-system
    ///
    /// Read the specified file completely into memory and parse it as a
    /// descriptor.
    pub fn parse_path(path: &std::path::Path) -> Result<Self, Error> {
        tracing::debug!(path = ?path, "reading build descriptor");

        let content = std::fs::read_to_string(path).map_err(
            |v| Error::Io { path: path.to_path_buf(), source: v }
        )?;

        Self::parse_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify basic parsing of `Raw`
    //
    // Parse a minimal raw descriptor to have a base-level test for the parsing
    // capabilities. All optional tables must default to empty.
    #[test]
    fn raw_parse_minimal() {
        let r = Raw::parse_str("version = 1").unwrap();

        assert_eq!(r.version, 1);
        assert!(r.plugins.is_empty());
        assert!(r.android.is_none());
        assert!(r.build_type.is_empty());
        assert!(r.signing_config.is_empty());
    }

    // Verify unknown versions in `Raw`
    //
    // The raw parser does not care for the version value other than its
    // syntactic correctness.
    #[test]
    fn raw_parse_unknown_version() {
        Raw::parse_str("version = 12345678").unwrap();
    }

    // Verify missing versions are refused
    #[test]
    fn raw_parse_missing_version() {
        assert!(matches!(
            Raw::parse_str("plugins = []"),
            Err(Error::Syntax(_)),
        ));
    }

    // Verify the `ndk-version` forms
    //
    // The key accepts both booleans and strings, so test both and make sure
    // other types are refused.
    #[test]
    fn raw_parse_ndk_version() {
        let s = "
            version = 1
            [android]
            ndk-version = false
        ";
        let r = Raw::parse_str(s).unwrap();
        assert_eq!(r.android.unwrap().ndk_version, Some(RawNdkVersion::Enabled(false)));

        let s = "
            version = 1
            [android]
            ndk-version = \"26.1.10909125\"
        ";
        let r = Raw::parse_str(s).unwrap();
        assert_eq!(
            r.android.unwrap().ndk_version,
            Some(RawNdkVersion::Version("26.1.10909125".to_string())),
        );

        let s = "
            version = 1
            [android]
            ndk-version = true
        ";
        let r = Raw::parse_str(s).unwrap();
        assert_eq!(r.android.unwrap().ndk_version, Some(RawNdkVersion::Enabled(true)));

        let s = "
            version = 1
            [android]
            ndk-version = 26
        ";
        assert!(Raw::parse_str(s).is_err());
    }

    // Verify parsing of named tables
    //
    // Signing configs and build types are keyed by name. Verify the keys are
    // retained and kebab-case options map to their fields.
    #[test]
    fn raw_parse_named_tables() {
        let s = "
            version = 1
            plugins = [\"com.android.application\"]
            [signing-config.upload]
            store-file = \"upload.jks\"
            key-alias = \"upload\"
            [build-type.release]
            signing-config = \"upload\"
            shrink-resources = true
            minify = true
            [build-type.staging]
            application-id-suffix = \".staging\"
            [packaging]
            resource-excludes = [\"/META-INF/A\"]
        ";

        let r = Raw::parse_str(s).unwrap();

        assert_eq!(r.plugins, vec!["com.android.application"]);
        assert_eq!(r.signing_config["upload"].store_file.as_deref(), Some("upload.jks"));
        assert_eq!(r.build_type["release"].signing_config.as_deref(), Some("upload"));
        assert_eq!(r.build_type["release"].shrink_resources, Some(true));
        assert_eq!(r.build_type["staging"].application_id_suffix.as_deref(), Some(".staging"));
        assert_eq!(r.packaging.unwrap().resource_excludes, vec!["/META-INF/A"]);
    }

    // Verify negative SDK levels are refused syntactically
    #[test]
    fn raw_parse_negative_sdk() {
        let s = "
            version = 1
            [android]
            min-sdk = -1
        ";

        assert!(Raw::parse_str(s).is_err());
    }

    // Verify file-system errors carry the path
    #[test]
    fn raw_parse_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        match Raw::parse_path(&path) {
            Err(Error::Io { path: p, .. }) => assert_eq!(p, path),
            v => panic!("unexpected result: {:?}", v.map(|_| ())),
        }
    }
}
