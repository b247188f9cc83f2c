//! Osiris Build Configuration Resolver
//!
//! The build configuration resolver reads the declarative build descriptor of
//! an Android application module and turns it into a normalized, verified
//! build configuration. Android application modules that wrap cross-platform
//! applications tend to carry near-identical Gradle build files, differing
//! only in identifiers, SDK levels, signing and packaging details. The
//! descriptor captures exactly these details, and the resolver guarantees
//! that they are consistent before any Gradle build is started.
//!
//! Model
//! -----
//!
//! Resolution happens in two steps. First, the descriptor is parsed from its
//! TOML representation into the raw types of the [`descriptor`] module. These
//! only guarantee syntactic correctness. Second, [`resolve::resolve()`] turns
//! the raw descriptor into a [`resolve::BuildDescriptor`]. This fills in the
//! defaults the Android Gradle plugin would apply, verifies identifiers and
//! strings, verifies `min-sdk <= target-sdk <= compile-sdk`, and resolves the
//! signing configuration referenced by each build type. Any violation is
//! reported as [`resolve::ValidationError`] and no partial result is produced.
//!
//! A resolved build descriptor is immutable. It is usually consumed by a build
//! orchestrator, either in-memory, via the Gradle project properties produced
//! by [`render::gradle_properties()`], or via a generated `build.gradle.kts`
//! (see [`op::emerge`]).
//!
//! Descriptor
//! ----------
//!
//! The descriptor is a TOML-formatted file usually called `osiris-build.toml`
//! placed next to the Android module. An example for a Flutter-based module:
//!
//! ```toml
//! version = 1
//! plugins = ["com.android.application", "kotlin-android", "dev.flutter.flutter-gradle-plugin"]
//!
//! [android]
//! namespace = "com.chatp2p.demo"
//! compile-sdk = 34
//! min-sdk = 21
//! target-sdk = 34
//! version-code = 1
//! version-name = "1.0.0"
//! ndk-version = false
//!
//! [build-type.debug]
//! application-id-suffix = ".debug"
//!
//! [build-type.release]
//! signing-config = "debug"
//!
//! [packaging]
//! resource-excludes = ["/META-INF/{AL2.0,LGPL2.1}"]
//! ```
//!
//! Packaging rules are glob patterns. Brace alternatives are expanded, and
//! rules made redundant by other rules are dropped (see
//! [`packaging::merge_packaging_rules()`]).

pub mod descriptor;
pub mod packaging;
pub mod render;
pub mod resolve;

/// Build Operations
///
/// The `op` module is a collection of all operations that modify the
/// file-system. Each operation is implemented in a submodule and can be used
/// independently.
pub mod op {
    pub mod emerge;
}

/// Load Errors
///
/// Errors of the combined parse-and-resolve helpers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Descriptor(#[from] descriptor::Error),
    #[error("invalid build descriptor: {0}")]
    Validation(#[from] resolve::ValidationError),
}

/// Load build descriptor from string
///
/// Parse the given string as a descriptor in TOML representation and resolve
/// it.
pub fn load_str(content: &str) -> Result<resolve::BuildDescriptor, Error> {
    let raw = descriptor::Raw::parse_str(content)?;

    Ok(resolve::resolve(&raw)?)
}

/// Load build descriptor from file-system
///
/// Read the descriptor at the specified path and resolve it. The file is
/// completely parsed into memory and then closed again before resolution
/// starts.
pub fn load_path(path: &std::path::Path) -> Result<resolve::BuildDescriptor, Error> {
    let raw = descriptor::Raw::parse_path(path)?;

    Ok(resolve::resolve(&raw)?)
}
