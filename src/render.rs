//! Gradle Rendering
//!
//! Turn a resolved [`BuildDescriptor`] back into the artifacts consumed by the
//! Gradle build: the Kotlin-DSL module build file `build.gradle.kts`, and the
//! `osiris.android.*` project properties for builds that read their
//! configuration via `--project-prop`.
//!
//! All strings interpolated here were verified to be quotable by the
//! resolver, so no escaping is performed. Output is deterministic, since the
//! descriptor keeps all its collections ordered.

use crate::resolve::{BuildDescriptor, NdkVersion, SIGNING_CONFIG_DEBUG};

const INDENT: &str = "    ";

// Append a line at the given nesting depth.
fn line(out: &mut String, depth: usize, text: &str) {
    if !text.is_empty() {
        for _ in 0..depth {
            out.push_str(INDENT);
        }
        out.push_str(text);
    }
    out.push('\n');
}

// Gradle names Java 8 to 10 with the legacy `1.x` scheme.
fn java_version(v: u32) -> String {
    if v <= 10 {
        format!("JavaVersion.VERSION_1_{}", v)
    } else {
        format!("JavaVersion.VERSION_{}", v)
    }
}

fn render_default_config(out: &mut String, d: &BuildDescriptor) {
    line(out, 1, "defaultConfig {");
    line(out, 2, &format!("applicationId = \"{}\"", d.application_id()));
    line(out, 2, &format!("minSdk = {}", d.min_sdk()));
    line(out, 2, &format!("targetSdk = {}", d.target_sdk()));
    line(out, 2, &format!("versionCode = {}", d.version_code()));
    line(out, 2, &format!("versionName = \"{}\"", d.version_name()));
    line(out, 2, &format!("multiDexEnabled = {}", d.multi_dex()));

    if let Some(runner) = d.test_instrumentation_runner() {
        line(out, 2, &format!("testInstrumentationRunner = \"{}\"", runner));
    }

    if !d.abi_filters().is_empty() {
        let abis: Vec<String> = d.abi_filters().iter().map(|v| format!("\"{}\"", v)).collect();

        line(out, 0, "");
        line(out, 2, "ndk {");
        line(out, 3, &format!("abiFilters += listOf({})", abis.join(", ")));
        line(out, 2, "}");
    }

    line(out, 1, "}");
}

fn render_signing_configs(out: &mut String, d: &BuildDescriptor) {
    // The implicit `debug` configuration needs no block unless it was
    // overridden with a custom keystore.
    let configs: Vec<_> = d.signing_configs().iter()
        .filter(|(name, v)| name.as_str() != SIGNING_CONFIG_DEBUG || v.store_file().is_some())
        .collect();

    if configs.is_empty() {
        return;
    }

    line(out, 0, "");
    line(out, 1, "signingConfigs {");
    for (name, v) in configs {
        if name == SIGNING_CONFIG_DEBUG {
            line(out, 2, &format!("getByName(\"{}\") {{", name));
        } else {
            line(out, 2, &format!("create(\"{}\") {{", name));
        }
        if let Some(store_file) = v.store_file() {
            line(out, 3, &format!("storeFile = file(\"{}\")", store_file));
        }
        if let Some(key_alias) = v.key_alias() {
            line(out, 3, &format!("keyAlias = \"{}\"", key_alias));
        }
        if let Some(env) = v.store_password_env() {
            line(out, 3, &format!("storePassword = System.getenv(\"{}\")", env));
        }
        if let Some(env) = v.key_password_env() {
            line(out, 3, &format!("keyPassword = System.getenv(\"{}\")", env));
        }
        line(out, 2, "}");
    }
    line(out, 1, "}");
}

fn render_build_types(out: &mut String, d: &BuildDescriptor) {
    line(out, 0, "");
    line(out, 1, "buildTypes {");
    for (name, v) in d.build_types().iter() {
        // `debug` and `release` exist by default, others must be created.
        if name == "debug" || name == "release" {
            line(out, 2, &format!("{} {{", name));
        } else {
            line(out, 2, &format!("create(\"{}\") {{", name));
        }
        line(out, 3, &format!("isDebuggable = {}", v.debuggable()));
        line(out, 3, &format!("isMinifyEnabled = {}", v.minify_enabled()));
        line(out, 3, &format!("isShrinkResources = {}", v.shrink_resources()));
        if let Some(suffix) = v.application_id_suffix() {
            line(out, 3, &format!("applicationIdSuffix = \"{}\"", suffix));
        }
        if let Some(signing) = v.signing_config_ref() {
            line(out, 3, &format!("signingConfig = signingConfigs.getByName(\"{}\")", signing));
        }
        line(out, 2, "}");
    }
    line(out, 1, "}");
}

/// Render `build.gradle.kts`
///
/// Produce the Kotlin-DSL build file of the module described by `d`.
pub fn build_gradle_kts(d: &BuildDescriptor) -> String {
    let mut out = String::new();

    line(&mut out, 0, "// Generated by osiris-buildcfg");
    line(&mut out, 0, "plugins {");
    for id in d.plugins() {
        line(&mut out, 1, &format!("id(\"{}\")", id));
    }
    line(&mut out, 0, "}");
    line(&mut out, 0, "");

    line(&mut out, 0, "android {");
    line(&mut out, 1, &format!("namespace = \"{}\"", d.namespace()));
    line(&mut out, 1, &format!("compileSdk = {}", d.compile_sdk()));
    match d.ndk_version() {
        NdkVersion::Inherit => {},
        NdkVersion::Disabled => line(&mut out, 1, "ndkVersion = null"),
        NdkVersion::Pinned(v) => line(&mut out, 1, &format!("ndkVersion = \"{}\"", v)),
    }

    let java = java_version(d.java_version());
    line(&mut out, 0, "");
    line(&mut out, 1, "compileOptions {");
    line(&mut out, 2, &format!("sourceCompatibility = {}", java));
    line(&mut out, 2, &format!("targetCompatibility = {}", java));
    line(&mut out, 1, "}");

    if d.has_kotlin() {
        line(&mut out, 0, "");
        line(&mut out, 1, "kotlinOptions {");
        line(&mut out, 2, &format!("jvmTarget = {}.toString()", java));
        line(&mut out, 1, "}");
    }

    line(&mut out, 0, "");
    render_default_config(&mut out, d);
    render_signing_configs(&mut out, d);
    render_build_types(&mut out, d);

    if !d.packaging().is_empty() {
        line(&mut out, 0, "");
        line(&mut out, 1, "packaging {");
        line(&mut out, 2, "resources {");
        for rule in d.packaging() {
            line(&mut out, 3, &format!("excludes += \"{}\"", rule));
        }
        line(&mut out, 2, "}");
        line(&mut out, 1, "}");
    }
    line(&mut out, 0, "}");

    if !d.android_tests() {
        line(&mut out, 0, "");
        line(&mut out, 0, "androidComponents {");
        line(&mut out, 1, "beforeVariants { variantBuilder ->");
        line(&mut out, 2, "variantBuilder.enableAndroidTest = false");
        line(&mut out, 1, "}");
        line(&mut out, 0, "}");
    }

    if let Some(source) = d.flutter_source() {
        line(&mut out, 0, "");
        line(&mut out, 0, "flutter {");
        line(&mut out, 1, &format!("source = \"{}\"", source));
        line(&mut out, 0, "}");
    }

    out
}

/// Render Gradle project properties
///
/// Return the `osiris.android.*` project properties describing `d`, in a
/// fixed order. Each pair is meant to be passed as `--project-prop KEY=VALUE`.
pub fn gradle_properties(d: &BuildDescriptor) -> Vec<(String, String)> {
    let mut r = vec![
        ("osiris.android.applicationId", d.application_id().to_string()),
        ("osiris.android.namespace", d.namespace().to_string()),
        ("osiris.android.compileSdk", d.compile_sdk().to_string()),
        ("osiris.android.minSdk", d.min_sdk().to_string()),
        ("osiris.android.targetSdk", d.target_sdk().to_string()),
        ("osiris.android.versionCode", d.version_code().to_string()),
        ("osiris.android.versionName", d.version_name().to_string()),
        ("osiris.android.javaVersion", d.java_version().to_string()),
    ];

    if let NdkVersion::Pinned(v) = d.ndk_version() {
        r.push(("osiris.android.ndkVersion", v.clone()));
    }

    r.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}
