//! Persistent Module Build File
//!
//! The `emerge` operation renders the resolved build descriptor of a module
//! and stores it persistently as `build.gradle.kts` in the module directory.
//! Unlike just-in-time configuration via project properties, this allows
//! committing the generated build file and inspecting it with the regular
//! Android tooling.

use crate::render;
use crate::resolve;

/// Name of the generated module build file.
pub const BUILD_FILE: &str = "build.gradle.kts";

/// Emerge Errors
///
/// This is the exhaustive list of possible errors raised by the emerge
/// operation. See each error for details.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The build file is already present and updating was not allowed by the
    /// caller.
    #[error("build file {0:?} already present")]
    Already(std::ffi::OsString),
    /// The module path exists but is not an accessible directory.
    #[error("cannot access module directory {0:?}")]
    ModuleDirectory(std::ffi::OsString),
    /// Creation of the directory at the specified path failed.
    #[error("failed to create directory {0:?}")]
    DirectoryCreation(std::ffi::OsString),
    /// Updating the file at the specified path failed with the given error.
    #[error("failed to update {0:?} ({1})")]
    FileUpdate(std::ffi::OsString, #[source] std::io::Error),
}

// Ensure directory exists
//
// Make sure the directory at the given path exists. Create the directory and
// its parent directories if necessary.
fn ensure_dir(
    path: &std::path::Path,
) -> Result<(), Error> {
    std::fs::create_dir_all(path)
        .map_err(
            |_| Error::DirectoryCreation(path.as_os_str().to_os_string())
        )
}

// Update a file if required
//
// This writes the given content to the specified file, but only if the file
// content does not already match the new content. Thus, the file timestamp is
// only modified if the content really changed.
//
// Note that this reads in the entire file content. Thus, use it only on
// trusted content.
fn update_file(
    path: &std::path::Path,
    content: &str,
) -> Result<bool, Error> {
    let file_error = |v| Error::FileUpdate(path.as_os_str().to_os_string(), v);

    let mut f = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(file_error)?;

    let mut old = String::new();
    <std::fs::File as std::io::Read>::read_to_string(&mut f, &mut old)
        .map_err(file_error)?;

    if old == content {
        return Ok(false);
    }

    <std::fs::File as std::io::Seek>::rewind(&mut f).map_err(file_error)?;
    f.set_len(0).map_err(file_error)?;
    <std::fs::File as std::io::Write>::write_all(&mut f, content.as_bytes())
        .map_err(file_error)?;

    // Sync the file now to ensure errors are caught properly.
    f.sync_all().map_err(file_error)?;

    Ok(true)
}

/// Emerge module build file
///
/// Render `build.gradle.kts` for the given descriptor and write it into the
/// module directory at `path`. The directory is created if it does not exist.
///
/// This function fails if the build file already exists, unless `update` is
/// `true`. In this case the file is rewritten, but only if its content
/// changed. Returns whether the file was modified.
pub fn emerge(
    descriptor: &resolve::BuildDescriptor,
    path: &std::path::Path,
    update: bool,
) -> Result<bool, Error> {
    let mut path_file = path.to_path_buf();

    // Check for the module path to exist and being accessible. If the path
    // points to something other than a directory, we fail with an error.
    match std::fs::metadata(path) {
        Ok(v) => {
            if !v.is_dir() {
                return Err(Error::ModuleDirectory(path.as_os_str().to_os_string()));
            }
        },
        Err(v) => {
            if v.kind() != std::io::ErrorKind::NotFound {
                return Err(Error::ModuleDirectory(path.as_os_str().to_os_string()));
            }
            ensure_dir(path)?;
        },
    };

    path_file.push(BUILD_FILE);
    if !update && path_file.exists() {
        return Err(Error::Already(path_file.into_os_string()));
    }

    let content = render::build_gradle_kts(descriptor);
    let modified = update_file(path_file.as_path(), &content)?;

    tracing::info!(path = ?path_file, modified, "emerged module build file");

    Ok(modified)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> resolve::BuildDescriptor {
        let raw = crate::descriptor::Raw::parse_str("
            version = 1
            plugins = [\"com.android.application\"]
            [android]
            namespace = \"foo.bar\"
            compile-sdk = 34
            min-sdk = 21
            version-name = \"1.0\"
        ").unwrap();

        resolve::resolve(&raw).unwrap()
    }

    // Verify emerging into a fresh directory
    //
    // Nested module directories are created on demand and the file content
    // matches the rendered build file.
    #[test]
    fn emerge_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("android").join("app");
        let d = descriptor();

        assert!(emerge(&d, &module, false).unwrap());

        let content = std::fs::read_to_string(module.join(BUILD_FILE)).unwrap();
        assert_eq!(content, render::build_gradle_kts(&d));
    }

    // Verify existing build files are retained unless updates are allowed,
    // and unchanged content is not rewritten.
    #[test]
    fn emerge_update() {
        let dir = tempfile::tempdir().unwrap();
        let d = descriptor();

        std::fs::write(dir.path().join(BUILD_FILE), "// stale\n").unwrap();

        assert!(matches!(emerge(&d, dir.path(), false), Err(Error::Already(_))));
        assert!(emerge(&d, dir.path(), true).unwrap());
        assert!(!emerge(&d, dir.path(), true).unwrap());

        let content = std::fs::read_to_string(dir.path().join(BUILD_FILE)).unwrap();
        assert!(content.starts_with("// Generated by osiris-buildcfg\n"));
    }

    // Verify non-directory module paths are refused
    #[test]
    fn emerge_not_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");

        std::fs::write(&file, "").unwrap();

        assert!(matches!(
            emerge(&descriptor(), &file, true),
            Err(Error::ModuleDirectory(_)),
        ));
    }
}
