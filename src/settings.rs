use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use config::{Config, Environment, File};
use miette::{Context, IntoDiagnostic};
use serde::Deserialize;
use tracing::debug;

use crate::{
    io::expand_home,
    outside::{FFMPEG, YT_DLP},
    progress::Throttle,
    result::Result,
    types::Container,
};

/// Prefix of the environment variables overriding the configuration file
pub const ENV_PREFIX: &str = "YTCUT";

/// User preferences, read from the configuration file and the environment
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the videos are saved. A leading `~` is the home directory
    pub output_dir: PathBuf,

    /// Open the output directory once a video is saved
    pub open_output_dir: bool,

    pub container: Container,

    /// Minimum progress, in percentage points, between two progress notifications
    pub progress_step: f64,

    /// Minimum time between two progress notifications.
    /// Takes precedence over `progress_step` when set
    pub progress_interval_secs: Option<u64>,

    /// Name full downloads after the video title instead of a number
    pub title_filenames: bool,

    /// Show desktop notifications, otherwise only log them
    pub notify: bool,

    /// Downloader program
    pub downloader: String,

    /// Trimmer program
    pub trimmer: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("~/Downloads"),
            open_output_dir: false,
            container: Container::default(),
            progress_step: 5.0,
            progress_interval_secs: None,
            title_filenames: false,
            notify: true,
            downloader: YT_DLP.to_owned(),
            trimmer: FFMPEG.to_owned(),
        }
    }
}

impl Settings {
    /// Load the settings from `file`, or from the default configuration file if it exists,
    /// then from the `YTCUT_*` environment variables.
    ///
    /// Textual values like `"true"` are accepted for booleans.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(file) = file {
            debug!("Reading configuration from {}", file.display());
            builder = builder.add_source(File::from(file).required(true));
        } else if let Some(file) = default_config_file() {
            debug!("Reading configuration from {}", file.display());
            builder = builder.add_source(File::from(file).required(false));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .into_diagnostic()
            .wrap_err("Could not read the configuration")?
            .try_deserialize()
            .into_diagnostic()
            .wrap_err("Invalid configuration")?;

        Ok(settings.normalized())
    }

    fn normalized(mut self) -> Self {
        self.output_dir = expand_home(&self.output_dir);
        self
    }

    pub fn throttle(&self) -> Throttle {
        match self.progress_interval_secs {
            Some(secs) => Throttle::Interval(Duration::from_secs(secs)),
            None => Throttle::Step(self.progress_step),
        }
    }
}

/// `$XDG_CONFIG_HOME/ytcut/config.toml`, if it exists
fn default_config_file() -> Option<PathBuf> {
    xdg::BaseDirectories::with_prefix("ytcut")
        .ok()?
        .find_config_file("config.toml")
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn load_toml(content: &str) -> Settings {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        Settings::load(Some(&path)).unwrap()
    }

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.container, Container::Mp4);
        assert_eq!(settings.throttle(), Throttle::Step(5.0));
        assert!(!settings.open_output_dir);
        assert_eq!(settings.downloader, "yt-dlp");
        assert_eq!(settings.trimmer, "ffmpeg");
    }

    #[test]
    fn file_values_override_defaults() {
        let settings = load_toml(indoc! {r#"
            output_dir = "/tmp/videos"
            open_output_dir = true
            container = "mkv"
            progress_interval_secs = 5
        "#});

        assert_eq!(settings.output_dir, PathBuf::from("/tmp/videos"));
        assert!(settings.open_output_dir);
        assert_eq!(settings.container, Container::Mkv);
        assert_eq!(settings.throttle(), Throttle::Interval(Duration::from_secs(5)));
        assert!(settings.notify);
    }

    #[test]
    fn textual_booleans_are_accepted() {
        let settings = load_toml(r#"open_output_dir = "true""#);
        assert!(settings.open_output_dir);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn home_is_expanded() {
        let settings = Settings {
            output_dir: PathBuf::from("~/Videos"),
            ..Settings::default()
        }
        .normalized();
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(settings.output_dir, PathBuf::from(home).join("Videos"));
        }
    }
}
