//! Build Configuration Resolver
//!
//! The resolver takes a raw descriptor as parsed from TOML and turns it into a
//! [`BuildDescriptor`], the normalized and verified build configuration of an
//! Android application module. Defaults are filled in, identifiers and
//! strings are checked, and the cross-references between build types and
//! signing configurations are resolved.
//!
//! Resolution is a pure, single-pass transform. The first problem found is
//! reported as a [`ValidationError`] and no partial result is produced. The
//! checks run in a fixed order: descriptor version, plugins, the `android`
//! table (including SDK ordering), the `flutter` table, signing
//! configurations, build types and finally packaging rules.

use crate::descriptor;
use crate::packaging;

/// Plugin identifier of the Android application Gradle plugin.
pub const PLUGIN_ANDROID_APPLICATION: &str = "com.android.application";
/// Plugin identifier of the Flutter Gradle plugin.
pub const PLUGIN_FLUTTER: &str = "dev.flutter.flutter-gradle-plugin";
/// Plugin identifiers of the Kotlin Android Gradle plugin.
pub const PLUGINS_KOTLIN: &[&str] = &["kotlin-android", "org.jetbrains.kotlin.android"];

/// Name of the signing configuration the Android Gradle plugin always
/// provides.
pub const SIGNING_CONFIG_DEBUG: &str = "debug";

const BUILD_TYPE_DEBUG: &str = "debug";
const BUILD_TYPE_RELEASE: &str = "release";

const ABIS: &[&str] = &["armeabi-v7a", "arm64-v8a", "x86", "x86_64"];
const FLUTTER_SOURCE_DEFAULT: &str = "../..";
const JAVA_VERSION_DEFAULT: u32 = 11;
const JAVA_VERSION_MIN: u32 = 8;
const JAVA_VERSION_MAX: u32 = 21;

/// Validation Error Kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The descriptor format version is not supported.
    UnsupportedVersion,
    /// A required key is missing.
    MissingKey,
    /// A value is malformed or out of range.
    InvalidValue,
    /// The plugin list is inconsistent.
    Plugin,
    /// `min-sdk <= target-sdk <= compile-sdk` does not hold.
    SdkOrdering,
    /// A build type references an undeclared signing configuration.
    UnresolvedSigningConfig,
}

impl ErrorKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedVersion => "unsupported-version",
            ErrorKind::MissingKey => "missing-key",
            ErrorKind::InvalidValue => "invalid-value",
            ErrorKind::Plugin => "plugin",
            ErrorKind::SdkOrdering => "sdk-ordering",
            ErrorKind::UnresolvedSigningConfig => "unresolved-signing-config",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation Error
///
/// Terminal failure of [`resolve()`]. Carries the kind of the failure, the
/// descriptor key it relates to, and a human-readable message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at `{key}`: {message}")]
pub struct ValidationError {
    kind: ErrorKind,
    key: String,
    message: String,
}

impl ValidationError {
    fn new(kind: ErrorKind, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind,
            key: key.into(),
            message: message.into(),
        }
    }

    fn missing(key: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingKey, key, "required key is missing")
    }

    fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue, key, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// NDK Version
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case", tag = "mode", content = "version")]
pub enum NdkVersion {
    /// Use whatever the toolchain selects.
    Inherit,
    /// No NDK is used by the module.
    Disabled,
    /// Use exactly this NDK version.
    Pinned(String),
}

/// Signing Configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SigningConfig {
    store_file: Option<String>,
    key_alias: Option<String>,
    store_password_env: Option<String>,
    key_password_env: Option<String>,
}

impl SigningConfig {
    /// Keystore path, or `None` for the toolchain debug keystore.
    pub fn store_file(&self) -> Option<&str> {
        self.store_file.as_deref()
    }

    pub fn key_alias(&self) -> Option<&str> {
        self.key_alias.as_deref()
    }

    pub fn store_password_env(&self) -> Option<&str> {
        self.store_password_env.as_deref()
    }

    pub fn key_password_env(&self) -> Option<&str> {
        self.key_password_env.as_deref()
    }
}

/// Build Type Configuration
///
/// Configuration of a single build variant. The signing configuration is only
/// referenced by name. Use [`BuildDescriptor::signing_config_of()`] to look
/// it up.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildTypeConfig {
    debuggable: bool,
    minify_enabled: bool,
    shrink_resources: bool,
    application_id_suffix: Option<String>,
    signing_config: Option<String>,
}

impl BuildTypeConfig {
    // Defaults as applied by the Android Gradle plugin. Only `debug` is
    // debuggable and signed out of the box.
    fn defaults(name: &str) -> Self {
        let debug = name == BUILD_TYPE_DEBUG;

        Self {
            debuggable: debug,
            minify_enabled: false,
            shrink_resources: false,
            application_id_suffix: None,
            signing_config: debug.then(|| SIGNING_CONFIG_DEBUG.to_string()),
        }
    }

    pub fn debuggable(&self) -> bool {
        self.debuggable
    }

    pub fn minify_enabled(&self) -> bool {
        self.minify_enabled
    }

    pub fn shrink_resources(&self) -> bool {
        self.shrink_resources
    }

    pub fn application_id_suffix(&self) -> Option<&str> {
        self.application_id_suffix.as_deref()
    }

    /// Name of the referenced signing configuration, if any.
    pub fn signing_config_ref(&self) -> Option<&str> {
        self.signing_config.as_deref()
    }
}

/// Build Descriptor
///
/// The resolved build configuration of a module. A build descriptor can only
/// be obtained via [`resolve()`] and cannot be modified afterwards. The
/// following holds for every instance:
///
///  * `min_sdk() <= target_sdk() <= compile_sdk()`
///  * every build type either references no signing configuration, or one
///    that is present in `signing_configs()`
///  * `debug` and `release` build types are always present
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildDescriptor {
    plugins: Vec<String>,

    namespace: String,
    application_id: String,

    compile_sdk: u32,
    min_sdk: u32,
    target_sdk: u32,

    version_code: u32,
    version_name: String,

    ndk_version: NdkVersion,
    java_version: u32,
    multi_dex: bool,
    test_instrumentation_runner: Option<String>,
    abi_filters: std::collections::BTreeSet<String>,
    android_tests: bool,

    flutter_source: Option<String>,

    signing_configs: std::collections::BTreeMap<String, SigningConfig>,
    build_types: std::collections::BTreeMap<String, BuildTypeConfig>,
    packaging: std::collections::BTreeSet<packaging::PackagingRule>,
}

impl BuildDescriptor {
    /// Plugin identifiers in application order.
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    pub fn has_plugin(&self, id: &str) -> bool {
        self.plugins.iter().any(|v| v == id)
    }

    pub fn has_kotlin(&self) -> bool {
        PLUGINS_KOTLIN.iter().any(|v| self.has_plugin(v))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn compile_sdk(&self) -> u32 {
        self.compile_sdk
    }

    pub fn min_sdk(&self) -> u32 {
        self.min_sdk
    }

    pub fn target_sdk(&self) -> u32 {
        self.target_sdk
    }

    pub fn version_code(&self) -> u32 {
        self.version_code
    }

    pub fn version_name(&self) -> &str {
        &self.version_name
    }

    pub fn ndk_version(&self) -> &NdkVersion {
        &self.ndk_version
    }

    pub fn java_version(&self) -> u32 {
        self.java_version
    }

    pub fn multi_dex(&self) -> bool {
        self.multi_dex
    }

    pub fn test_instrumentation_runner(&self) -> Option<&str> {
        self.test_instrumentation_runner.as_deref()
    }

    pub fn abi_filters(&self) -> &std::collections::BTreeSet<String> {
        &self.abi_filters
    }

    pub fn android_tests(&self) -> bool {
        self.android_tests
    }

    /// Flutter project root relative to the module, if Flutter is used.
    pub fn flutter_source(&self) -> Option<&str> {
        self.flutter_source.as_deref()
    }

    pub fn signing_configs(&self) -> &std::collections::BTreeMap<String, SigningConfig> {
        &self.signing_configs
    }

    pub fn build_types(&self) -> &std::collections::BTreeMap<String, BuildTypeConfig> {
        &self.build_types
    }

    pub fn build_type(&self, name: &str) -> Option<&BuildTypeConfig> {
        self.build_types.get(name)
    }

    /// Look up the signing configuration referenced by a build type.
    pub fn signing_config_of(&self, build_type: &BuildTypeConfig) -> Option<&SigningConfig> {
        build_type.signing_config_ref()
            .and_then(|v| self.signing_configs.get(v))
    }

    /// Return the final application ID of a build type
    ///
    /// This is the application ID with the suffix of the build type appended,
    /// or `None` if no such build type exists.
    pub fn application_id_for(&self, build_type: &str) -> Option<String> {
        self.build_types.get(build_type).map(
            |v| format!("{}{}", self.application_id, v.application_id_suffix().unwrap_or(""))
        )
    }

    pub fn packaging(&self) -> &std::collections::BTreeSet<packaging::PackagingRule> {
        &self.packaging
    }
}

// Check whether a string is a valid identifier
//
// This verifies that the given string consists of only alphanumeric
// characters plus `-`, `_`. Empty identifiers are rejected.
fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(
        |v| v.is_alphanumeric() || v == '-' || v == '_'
    )
}

// Check whether a string is a valid Gradle plugin identifier
fn is_plugin_id(s: &str) -> bool {
    !s.is_empty() && s.chars().all(
        |v| v.is_ascii_alphanumeric() || v == '.' || v == '-' || v == '_'
    )
}

// Check whether a string is a valid Java package or class name
//
// At least two dot-separated segments are required, each starting with an
// ASCII letter followed by ASCII alphanumerics or underscores. This is the
// rule Android applies to application IDs.
fn is_package_name(s: &str) -> bool {
    let mut n = 0;

    for segment in s.split('.') {
        let mut chars = segment.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => {},
            _ => return false,
        }
        if !chars.all(|v| v.is_ascii_alphanumeric() || v == '_') {
            return false;
        }
        n += 1;
    }

    n >= 2
}

// Check whether a string is a valid environment variable name
fn is_env_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }
    chars.all(|v| v.is_ascii_alphanumeric() || v == '_')
}

// Check whether a string contains no quotes or escapes
//
// This verifies that a string does not contain quotes, backslashes, string
// template markers, nor any control characters. Such strings can be
// interpolated into Kotlin and Groovy string literals verbatim.
fn is_quotable(s: &str) -> bool {
    s.chars().all(
        |v| !v.is_control()
            && v != '\\'
            && v != '\''
            && v != '"'
            && v != '$'
    )
}

// Check whether a string is a dotted numeric version
fn is_dotted_version(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(
        |v| !v.is_empty() && v.chars().all(|c| c.is_ascii_digit())
    )
}

fn quotable(key: &str, value: &str) -> Result<(), ValidationError> {
    if is_quotable(value) {
        Ok(())
    } else {
        Err(ValidationError::invalid(key, "quotes, backslashes, `$` and control characters are not allowed"))
    }
}

fn resolve_plugins(plugins: &[String]) -> Result<Vec<String>, ValidationError> {
    for (i, id) in plugins.iter().enumerate() {
        if !is_plugin_id(id) {
            return Err(ValidationError::invalid(
                "plugins",
                format!("`{}` is not a valid plugin identifier", id),
            ));
        }
        if plugins[..i].contains(id) {
            return Err(ValidationError::new(
                ErrorKind::Plugin,
                "plugins",
                format!("`{}` is applied more than once", id),
            ));
        }
    }

    if !plugins.iter().any(|v| v == PLUGIN_ANDROID_APPLICATION) {
        return Err(ValidationError::new(
            ErrorKind::Plugin,
            "plugins",
            format!("`{}` must be applied", PLUGIN_ANDROID_APPLICATION),
        ));
    }

    // The Flutter plugin hooks into the Android and Kotlin plugins, so these
    // must be applied before it.
    if let Some(pos) = plugins.iter().position(|v| v == PLUGIN_FLUTTER) {
        let late = plugins[pos..].iter().find(
            |v| *v == PLUGIN_ANDROID_APPLICATION || PLUGINS_KOTLIN.contains(&v.as_str())
        );
        if let Some(v) = late {
            return Err(ValidationError::new(
                ErrorKind::Plugin,
                "plugins",
                format!("`{}` must be applied after `{}`", PLUGIN_FLUTTER, v),
            ));
        }
    }

    Ok(plugins.to_vec())
}

fn resolve_sdk_ordering(min: u32, target: u32, compile: u32) -> Result<(), ValidationError> {
    if min > target {
        return Err(ValidationError::new(
            ErrorKind::SdkOrdering,
            "android.min-sdk",
            format!("min-sdk {} exceeds target-sdk {}", min, target),
        ));
    }
    if target > compile {
        return Err(ValidationError::new(
            ErrorKind::SdkOrdering,
            "android.target-sdk",
            format!("target-sdk {} exceeds compile-sdk {}", target, compile),
        ));
    }
    Ok(())
}

fn resolve_ndk_version(
    ndk: Option<&descriptor::RawNdkVersion>,
) -> Result<NdkVersion, ValidationError> {
    match ndk {
        None | Some(descriptor::RawNdkVersion::Enabled(true)) => Ok(NdkVersion::Inherit),
        Some(descriptor::RawNdkVersion::Enabled(false)) => Ok(NdkVersion::Disabled),
        Some(descriptor::RawNdkVersion::Version(v)) => {
            if is_dotted_version(v) {
                Ok(NdkVersion::Pinned(v.clone()))
            } else {
                Err(ValidationError::invalid(
                    "android.ndk-version",
                    format!("`{}` is not a dotted numeric version", v),
                ))
            }
        },
    }
}

fn resolve_signing_configs(
    raw: &std::collections::BTreeMap<String, descriptor::RawSigningConfig>,
) -> Result<std::collections::BTreeMap<String, SigningConfig>, ValidationError> {
    let mut r = std::collections::BTreeMap::new();

    r.insert(SIGNING_CONFIG_DEBUG.to_string(), SigningConfig::default());

    for (name, v) in raw.iter() {
        let key = format!("signing-config.{}", name);

        if !is_identifier(name) {
            return Err(ValidationError::invalid(key, "not a valid signing configuration name"));
        }

        // Only the debug configuration may fall back to the toolchain
        // keystore. Everything else must name its keystore and key.
        if name != SIGNING_CONFIG_DEBUG {
            if v.store_file.is_none() {
                return Err(ValidationError::missing(format!("{}.store-file", key)));
            }
            if v.key_alias.is_none() {
                return Err(ValidationError::missing(format!("{}.key-alias", key)));
            }
        }

        if let Some(store_file) = &v.store_file {
            if store_file.is_empty() {
                return Err(ValidationError::invalid(format!("{}.store-file", key), "must not be empty"));
            }
            quotable(&format!("{}.store-file", key), store_file)?;
        }
        if let Some(key_alias) = &v.key_alias {
            if key_alias.is_empty() {
                return Err(ValidationError::invalid(format!("{}.key-alias", key), "must not be empty"));
            }
            quotable(&format!("{}.key-alias", key), key_alias)?;
        }
        for (suffix, env) in [
            ("store-password-env", &v.store_password_env),
            ("key-password-env", &v.key_password_env),
        ] {
            if let Some(env) = env {
                if !is_env_name(env) {
                    return Err(ValidationError::invalid(
                        format!("{}.{}", key, suffix),
                        format!("`{}` is not a valid environment variable name", env),
                    ));
                }
            }
        }

        r.insert(
            name.clone(),
            SigningConfig {
                store_file: v.store_file.clone(),
                key_alias: v.key_alias.clone(),
                store_password_env: v.store_password_env.clone(),
                key_password_env: v.key_password_env.clone(),
            },
        );
    }

    Ok(r)
}

fn resolve_build_types(
    raw: &std::collections::BTreeMap<String, descriptor::RawBuildType>,
    application_id: &str,
    signing_configs: &std::collections::BTreeMap<String, SigningConfig>,
) -> Result<std::collections::BTreeMap<String, BuildTypeConfig>, ValidationError> {
    let mut names: std::collections::BTreeSet<&str> = raw.keys().map(|v| v.as_str()).collect();
    names.insert(BUILD_TYPE_DEBUG);
    names.insert(BUILD_TYPE_RELEASE);

    let mut r = std::collections::BTreeMap::new();

    for name in names {
        let key = format!("build-type.{}", name);
        let mut v = BuildTypeConfig::defaults(name);

        if !is_identifier(name) {
            return Err(ValidationError::invalid(key, "not a valid build type name"));
        }

        if let Some(o) = raw.get(name) {
            v.debuggable = o.debuggable.unwrap_or(v.debuggable);
            v.minify_enabled = o.minify.unwrap_or(v.minify_enabled);
            v.shrink_resources = o.shrink_resources.unwrap_or(v.shrink_resources);
            if o.application_id_suffix.is_some() {
                v.application_id_suffix = o.application_id_suffix.clone();
            }
            if o.signing_config.is_some() {
                v.signing_config = o.signing_config.clone();
            }
        }

        if let Some(suffix) = &v.application_id_suffix {
            let combined = format!("{}{}", application_id, suffix);
            if suffix.is_empty() || !is_package_name(&combined) {
                return Err(ValidationError::invalid(
                    format!("{}.application-id-suffix", key),
                    format!("`{}` is not a valid application ID", combined),
                ));
            }
        }

        if let Some(signing) = &v.signing_config {
            if !signing_configs.contains_key(signing) {
                return Err(ValidationError::new(
                    ErrorKind::UnresolvedSigningConfig,
                    format!("{}.signing-config", key),
                    format!("signing configuration `{}` is not declared", signing),
                ));
            }
        }

        // The Android Gradle plugin refuses resource shrinking without code
        // shrinking.
        if v.shrink_resources && !v.minify_enabled {
            return Err(ValidationError::invalid(
                format!("{}.shrink-resources", key),
                "resource shrinking requires `minify`",
            ));
        }

        if name == BUILD_TYPE_RELEASE {
            if v.signing_config.is_none() {
                tracing::warn!("release build type has no signing configuration, artifacts will be unsigned");
            }
            if v.debuggable {
                tracing::warn!("release build type is debuggable");
            }
        }

        tracing::debug!(
            build_type = name,
            debuggable = v.debuggable,
            minify = v.minify_enabled,
            signing_config = ?v.signing_config,
            "resolved build type"
        );

        r.insert(name.to_string(), v);
    }

    Ok(r)
}

fn resolve_packaging(
    raw: Option<&descriptor::RawPackaging>,
) -> Result<std::collections::BTreeSet<packaging::PackagingRule>, ValidationError> {
    let mut rules = Vec::new();

    if let Some(raw) = raw {
        for pattern in raw.resource_excludes.iter() {
            quotable("packaging.resource-excludes", pattern)?;
            let expanded = packaging::PackagingRule::expand(pattern).map_err(
                |v| ValidationError::invalid("packaging.resource-excludes", v.to_string())
            )?;
            rules.extend(expanded);
        }
    }

    Ok(packaging::merge_packaging_rules(rules))
}

/// Resolve a raw descriptor
///
/// Verify the raw descriptor and produce the resolved build configuration.
/// Fails with [`ErrorKind::SdkOrdering`] if `min-sdk <= target-sdk <=
/// compile-sdk` does not hold, and with
/// [`ErrorKind::UnresolvedSigningConfig`] if a build type references a signing
/// configuration that is not declared. See [`ErrorKind`] for the other
/// failures.
pub fn resolve(raw: &descriptor::Raw) -> Result<BuildDescriptor, ValidationError> {
    // Any version other than `1` is explicitly defined to be incompatible.
    // Unknown keys within version `1` are ignored.
    if raw.version != 1 {
        return Err(ValidationError::new(
            ErrorKind::UnsupportedVersion,
            "version",
            format!("descriptor version {} is not supported", raw.version),
        ));
    }

    let plugins = resolve_plugins(&raw.plugins)?;

    let android = raw.android.as_ref().ok_or_else(|| ValidationError::missing("android"))?;

    let namespace = android.namespace.clone()
        .ok_or_else(|| ValidationError::missing("android.namespace"))?;
    if !is_package_name(&namespace) {
        return Err(ValidationError::invalid("android.namespace", "not a valid package name"));
    }

    let application_id = android.application_id.clone().unwrap_or_else(|| namespace.clone());
    if !is_package_name(&application_id) {
        return Err(ValidationError::invalid("android.application-id", "not a valid application ID"));
    }

    let compile_sdk = android.compile_sdk
        .ok_or_else(|| ValidationError::missing("android.compile-sdk"))?;
    let min_sdk = android.min_sdk
        .ok_or_else(|| ValidationError::missing("android.min-sdk"))?;
    let target_sdk = android.target_sdk.unwrap_or(min_sdk);
    if min_sdk == 0 {
        return Err(ValidationError::invalid("android.min-sdk", "API levels start at 1"));
    }
    resolve_sdk_ordering(min_sdk, target_sdk, compile_sdk)?;

    let version_code = android.version_code.unwrap_or(1);
    if version_code == 0 {
        return Err(ValidationError::invalid("android.version-code", "must be positive"));
    }
    let version_name = android.version_name.clone()
        .ok_or_else(|| ValidationError::missing("android.version-name"))?;
    if version_name.is_empty() {
        return Err(ValidationError::invalid("android.version-name", "must not be empty"));
    }
    quotable("android.version-name", &version_name)?;

    let ndk_version = resolve_ndk_version(android.ndk_version.as_ref())?;

    let java_version = android.java_version.unwrap_or(JAVA_VERSION_DEFAULT);
    if !(JAVA_VERSION_MIN..=JAVA_VERSION_MAX).contains(&java_version) {
        return Err(ValidationError::invalid(
            "android.java-version",
            format!(
                "Java {} is outside the supported range {} to {}",
                java_version,
                JAVA_VERSION_MIN,
                JAVA_VERSION_MAX,
            ),
        ));
    }

    if let Some(runner) = &android.test_instrumentation_runner {
        if !is_package_name(runner) {
            return Err(ValidationError::invalid(
                "android.test-instrumentation-runner",
                "not a fully qualified class name",
            ));
        }
    }

    let mut abi_filters = std::collections::BTreeSet::new();
    for abi in android.abi_filters.iter() {
        if !ABIS.contains(&abi.as_str()) {
            return Err(ValidationError::invalid(
                "android.abi-filters",
                format!("unknown ABI `{}`", abi),
            ));
        }
        abi_filters.insert(abi.clone());
    }
    if ndk_version == NdkVersion::Disabled && !abi_filters.is_empty() {
        tracing::warn!("ABI filters have no effect while the NDK is disabled");
    }

    tracing::debug!(
        namespace = %namespace,
        compile_sdk,
        min_sdk,
        target_sdk,
        "resolved android configuration"
    );

    // A `flutter` table without the Flutter plugin is never picked up, so
    // refuse it. With the plugin, the table is optional.
    let flutter_source = match &raw.flutter {
        Some(flutter) => {
            if !plugins.iter().any(|v| v == PLUGIN_FLUTTER) {
                return Err(ValidationError::new(
                    ErrorKind::Plugin,
                    "flutter",
                    format!("`{}` must be applied to use the flutter table", PLUGIN_FLUTTER),
                ));
            }
            let source = flutter.source.clone().unwrap_or_else(|| FLUTTER_SOURCE_DEFAULT.to_string());
            if source.is_empty() {
                return Err(ValidationError::invalid("flutter.source", "must not be empty"));
            }
            quotable("flutter.source", &source)?;
            Some(source)
        },
        None => {
            plugins.iter()
                .any(|v| v == PLUGIN_FLUTTER)
                .then(|| FLUTTER_SOURCE_DEFAULT.to_string())
        },
    };

    let signing_configs = resolve_signing_configs(&raw.signing_config)?;
    let build_types = resolve_build_types(&raw.build_type, &application_id, &signing_configs)?;
    let packaging = resolve_packaging(raw.packaging.as_ref())?;

    Ok(BuildDescriptor {
        plugins: plugins,
        namespace: namespace,
        application_id: application_id,
        compile_sdk: compile_sdk,
        min_sdk: min_sdk,
        target_sdk: target_sdk,
        version_code: version_code,
        version_name: version_name,
        ndk_version: ndk_version,
        java_version: java_version,
        multi_dex: android.multi_dex.unwrap_or(false),
        test_instrumentation_runner: android.test_instrumentation_runner.clone(),
        abi_filters: abi_filters,
        android_tests: android.android_tests.unwrap_or(true),
        flutter_source: flutter_source,
        signing_configs: signing_configs,
        build_types: build_types,
        packaging: packaging,
    })
}
