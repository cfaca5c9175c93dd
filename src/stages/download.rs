use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    my_regex::get_destination_re_list,
    outside::{Desktop, Downloader},
    progress::ProgressRelay,
    result::Result,
    types::Container,
};

/// Where a download ended up on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    /// The file the downloader said it wrote
    Confirmed(PathBuf),
    /// The downloader did not say where it wrote, but the requested file exists
    Requested(PathBuf),
    /// Neither the reported nor the requested file exist
    Missing(PathBuf),
}

impl Fetched {
    pub fn path(&self) -> &Path {
        match self {
            Fetched::Confirmed(path) | Fetched::Requested(path) | Fetched::Missing(path) => path,
        }
    }
}

/// Download the video at `url` to `output`, showing the progress through the relay.
///
/// The downloader may write somewhere else than `output` (e.g. when `output` is a
/// template), in which case the file it reports is preferred.
pub fn fetch(
    downloader: &dyn Downloader,
    url: &str,
    output: &Path,
    container: Container,
    relay: &mut ProgressRelay,
    desktop: &dyn Desktop,
) -> Result<Fetched> {
    info!("Downloading {url} into {}", output.display());
    relay.reset();

    let mut reported = None;
    downloader.download(url, output, container, &mut |line: &str| {
        if let Some(path) = find_destination(line) {
            debug!("Downloader writes {path}");
            reported = Some(PathBuf::from(path));
        }

        if let Some(progress) = relay.on_line(line) {
            desktop.notify("Downloading", &format!("Downloaded {progress}"));
        }
    })?;

    let fetched = reconcile(output, reported);
    info!("Download completed: {fetched:?}");
    Ok(fetched)
}

fn find_destination(line: &str) -> Option<&str> {
    get_destination_re_list()
        .iter()
        .find_map(|re| re.captures(line))
        .and_then(|cap| cap.name("path"))
        .map(|m| m.as_str())
}

fn reconcile(requested: &Path, reported: Option<PathBuf>) -> Fetched {
    match reported {
        Some(path) if path.exists() => Fetched::Confirmed(path),
        _ if requested.exists() => Fetched::Requested(requested.to_path_buf()),
        _ => Fetched::Missing(requested.to_path_buf()),
    }
}
