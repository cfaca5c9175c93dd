use std::{ffi::OsStr, fmt::Debug, path::Path};

use super::command::{assert_success_command, stream_command};
use crate::{my_regex::PROGRESS_TAG, result::Result, types::Container};

/// Interface for downloading videos
pub trait Downloader: Sync + Debug {
    /// Download the single video at `url` into `output`.
    ///
    /// `output` may contain template fields, in which case the downloader
    /// chooses the final name. Every line the downloader prints on its standard
    /// output is handed to `on_line` while the download runs.
    fn download(
        &self,
        url: &str,
        output: &Path,
        container: Container,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<()>;
}

/// Interface for the [yt-dlp](https://github.com/yt-dlp/yt-dlp) program
#[derive(Debug)]
pub struct Ytdlp {
    program: String,
}

impl Ytdlp {
    /// Verify that the `yt-dlp` binary is reachable
    pub fn new(program: &str) -> Result<Self> {
        assert_success_command(program, |cmd| cmd.arg("--version"))
            .map_err(|err| err.wrap_err_with(|| format!("{program} not found")))?;

        Ok(Self {
            program: program.to_owned(),
        })
    }
}

impl Downloader for Ytdlp {
    fn download(
        &self,
        url: &str,
        output: &Path,
        container: Container,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<()> {
        let progress_template = format!("download:{PROGRESS_TAG} %(progress._percent_str)s");

        stream_command(
            &self.program,
            |cmd| {
                cmd.arg("--no-playlist")
                    // One progress update per line, printed with our own tag
                    .arg("--newline")
                    .args(["--progress-template", &progress_template])
                    .args(["--merge-output-format", container.with_no_dot()])
                    .args([OsStr::new("-o"), output.as_os_str()])
                    .arg("--")
                    .arg(url)
            },
            on_line,
        )
        .map_err(|err| err.wrap_err_with(|| format!("Could not download {url}")))
    }
}
