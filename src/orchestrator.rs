use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use tracing::{debug, error, info, warn};

use crate::{
    io::{ensure_dir, next_available, scratch_dir},
    outside::{Desktop, Downloader, Trimmer},
    progress::ProgressRelay,
    result::{bail, Error, Result},
    settings::Settings,
    stages::{self, Fetched},
    types::{CanonicalTime, Request},
};

/// Output template letting the downloader name the file after the video title
const TITLE_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    ValidatingInput,
    PreparingOutput,
    Downloading,
    Cutting,
    Completed,
    Failed,
}

/// How a run ended
#[derive(Debug)]
pub enum Outcome {
    Completed {
        path: PathBuf,
        /// Set when the file could not be found after the download
        warning: Option<String>,
    },
    Failed(Error),
}

/// Run one query from validation to the final file, reporting to the user as it goes.
#[derive(Debug)]
pub struct Orchestrator<'a> {
    settings: &'a Settings,
    downloader: &'a dyn Downloader,
    trimmer: &'a dyn Trimmer,
    desktop: &'a dyn Desktop,
    states: Option<Sender<RunState>>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        settings: &'a Settings,
        downloader: &'a dyn Downloader,
        trimmer: &'a dyn Trimmer,
        desktop: &'a dyn Desktop,
    ) -> Self {
        Self {
            settings,
            downloader,
            trimmer,
            desktop,
            states: None,
        }
    }

    /// Publish every state the run goes through on this channel
    pub fn with_states(mut self, states: Sender<RunState>) -> Self {
        self.states = Some(states);
        self
    }

    pub fn desktop(&self) -> &'a dyn Desktop {
        self.desktop
    }

    /// Run the query to its end.
    ///
    /// Every failure is logged and notified here, exactly once,
    /// so the returned outcome is only informative.
    pub fn run(&self, query: &str) -> Outcome {
        self.enter(RunState::Idle);

        match self.execute(query) {
            Ok((path, warning)) => {
                self.enter(RunState::Completed);

                match &warning {
                    Some(warning) => self.desktop.notify("Done, with a warning", warning),
                    None => self
                        .desktop
                        .notify("Done", &format!("Video saved: {}", path.display())),
                }

                if self.settings.open_output_dir {
                    let dir = if path.is_dir() {
                        path.as_path()
                    } else {
                        path.parent().unwrap_or(self.settings.output_dir.as_path())
                    };
                    self.desktop.open(dir);
                }

                Outcome::Completed { path, warning }
            }
            Err(err) => {
                self.enter(RunState::Failed);

                match &err {
                    Error::Input(input) => warn!("Invalid query {query:?}: {input}"),
                    Error::Process(process) => {
                        error!("{process}");
                        error!("stderr: {}", process.stderr.trim());
                    }
                    err => error!("{err:?}"),
                }

                let (title, body) = err.notification();
                self.desktop.notify(title, &body);
                Outcome::Failed(err)
            }
        }
    }

    fn enter(&self, state: RunState) {
        debug!("Run state: {state:?}");
        if let Some(states) = &self.states {
            // Nobody listening is fine
            let _ = states.send(state);
        }
    }

    fn execute(&self, query: &str) -> Result<(PathBuf, Option<String>)> {
        self.enter(RunState::ValidatingInput);
        let request = Request::from_query(query)?;
        info!("Processing {request}");

        self.enter(RunState::PreparingOutput);
        let out_dir = &self.settings.output_dir;
        ensure_dir(out_dir)?;
        let output = next_available(out_dir, self.settings.container)?;
        debug!("Output reserved: {}", output.display());

        self.desktop
            .notify("Started", &format!("Processing {}", request.url()));

        let mut relay = ProgressRelay::new(self.settings.throttle());
        match request {
            Request::Cut { url, start, end } => self
                .download_and_cut(&url, start, end, &output, &mut relay)
                .map(|()| (output, None)),
            Request::FullDownload { url } => self.download_full(&url, out_dir, output, &mut relay),
        }
    }

    fn download_and_cut(
        &self,
        url: &str,
        start: CanonicalTime,
        end: CanonicalTime,
        output: &Path,
        relay: &mut ProgressRelay,
    ) -> Result<()> {
        // Removed with its content on every exit path
        let scratch = scratch_dir()?;
        let working_copy = scratch
            .path()
            .join(format!("source{}", self.settings.container.with_dot()));

        self.enter(RunState::Downloading);
        self.desktop
            .notify("Downloading", &format!("Downloading {url}..."));
        let fetched = stages::fetch(
            self.downloader,
            url,
            &working_copy,
            self.settings.container,
            relay,
            self.desktop,
        )?;
        if let Fetched::Missing(path) = &fetched {
            warn!("The download finished but {} was not found", path.display());
            return bail(format!(
                "The downloaded video {} was not found, nothing to cut",
                path.display()
            ));
        }
        self.desktop
            .notify("Download finished", "The video was downloaded");

        self.enter(RunState::Cutting);
        self.desktop.notify("Cutting", "Cutting the video...");
        stages::cut(self.trimmer, fetched.path(), start, end, output)?;

        let scratch_path = scratch.path().to_path_buf();
        if let Err(err) = scratch.close() {
            warn!(
                "Could not remove the scratch directory {}: {err}",
                scratch_path.display()
            );
        }

        Ok(())
    }

    fn download_full(
        &self,
        url: &str,
        out_dir: &Path,
        numbered: PathBuf,
        relay: &mut ProgressRelay,
    ) -> Result<(PathBuf, Option<String>)> {
        let requested = if self.settings.title_filenames {
            out_dir.join(TITLE_TEMPLATE)
        } else {
            numbered
        };

        self.enter(RunState::Downloading);
        self.desktop
            .notify("Downloading", &format!("Downloading {url}..."));
        let fetched = stages::fetch(
            self.downloader,
            url,
            &requested,
            self.settings.container,
            relay,
            self.desktop,
        )?;

        match fetched {
            Fetched::Confirmed(path) | Fetched::Requested(path) => Ok((path, None)),
            Fetched::Missing(path) => {
                let warning = format!(
                    "The download finished but {} was not found, look into {}",
                    path.display(),
                    out_dir.display()
                );
                warn!("{warning}");
                Ok((out_dir.to_path_buf(), Some(warning)))
            }
        }
    }
}
