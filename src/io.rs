use std::path::{Path, PathBuf};

use miette::{Context, IntoDiagnostic};
use tempfile::TempDir;

use crate::{
    result::{bail, Error, Result},
    types::Container,
};

/// Find the first `<n><ext>` name, counting from 1, that does not exist in `out_dir`.
///
/// Nothing is reserved on disk: two calls without creating the returned file
/// give the same path, and concurrent callers on the same directory may race.
pub fn next_available(out_dir: &Path, container: Container) -> Result<PathBuf> {
    let dot_ext = container.with_dot();
    let mut output = out_dir.to_path_buf();

    // Check filenames one by one until one does not exist
    output.push(format!("1{dot_ext}"));
    for n in 1u32.. {
        output.set_file_name(format!("{n}{dot_ext}"));
        if !output.exists() {
            return Ok(output);
        }
    }

    bail("Code is broken or you have really REALLY too much files in the output directory")
}

/// Create the directory and its parents if it does not exist yet
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| Error::Filesystem {
        path: dir.to_path_buf(),
        source,
    })
}

/// Create a scratch directory for the working copy of a download.
///
/// The directory and all its content are removed when the handle is dropped.
/// **As such, one must not simply get the directory path and drop the handle.**
pub fn scratch_dir() -> Result<TempDir> {
    Ok(tempfile::Builder::new()
        .prefix("ytcut-")
        .tempdir()
        .into_diagnostic()
        .wrap_err("Could not create the scratch directory")?)
}

/// Replace a leading `~` by the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), std::env::var_os("HOME")) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}
