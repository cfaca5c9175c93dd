use std::thread;

use crossbeam_channel::unbounded;
use tracing::{debug, error, info};

use crate::{
    orchestrator::{Orchestrator, Outcome, RunState},
    result::err_msg,
};

/// Run the query on a worker thread while this thread follows its states.
///
/// A panic of the worker is caught and turned into a failed outcome,
/// after telling the user about it.
pub fn run_in_worker(orchestrator: Orchestrator<'_>, query: &str) -> Outcome {
    let desktop = orchestrator.desktop();
    let (send, receive) = unbounded();
    let orchestrator = orchestrator.with_states(send);

    thread::scope(|scope| {
        let worker = thread::Builder::new()
            .name("worker".to_owned())
            .spawn_scoped(scope, move || orchestrator.run(query));

        let worker = match worker {
            Ok(worker) => worker,
            Err(err) => {
                let err = err_msg(format!("Could not start the worker thread: {err}"));
                let (title, body) = err.notification();
                desktop.notify(title, &body);
                return Outcome::Failed(err);
            }
        };

        // Ends once the worker dropped the orchestrator, panicking or not
        for state in receive {
            match state {
                RunState::Completed => info!("Run completed"),
                RunState::Failed => info!("Run failed"),
                state => debug!("Worker entered {state:?}"),
            }
        }

        worker.join().unwrap_or_else(|panic| {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown reason".to_owned());
            error!("Worker panicked: {reason}");

            let err = err_msg(format!("The worker stopped unexpectedly: {reason}"));
            let (title, body) = err.notification();
            desktop.notify(title, &body);
            Outcome::Failed(err)
        })
    })
}

#[cfg(test)]
mod tests {
    use std::{
        path::{Path, PathBuf},
        sync::Mutex,
    };

    use super::*;
    use crate::{
        outside::{Desktop, Downloader, Trimmer},
        result::{Error, Result},
        settings::Settings,
        types::{CanonicalTime, Container},
    };

    #[derive(Debug)]
    struct PanickingDownloader;

    impl Downloader for PanickingDownloader {
        fn download(
            &self,
            _url: &str,
            _output: &Path,
            _container: Container,
            _on_line: &mut dyn FnMut(&str),
        ) -> Result<()> {
            panic!("downloader exploded")
        }
    }

    #[derive(Debug)]
    struct TouchingDownloader;

    impl Downloader for TouchingDownloader {
        fn download(
            &self,
            _url: &str,
            output: &Path,
            _container: Container,
            _on_line: &mut dyn FnMut(&str),
        ) -> Result<()> {
            std::fs::File::create(output).unwrap();
            Ok(())
        }
    }

    #[derive(Debug)]
    struct UnusedTrimmer;

    impl Trimmer for UnusedTrimmer {
        fn trim(&self, _: &Path, _: CanonicalTime, _: CanonicalTime, _: &Path) -> Result<()> {
            unreachable!("full downloads are never trimmed")
        }
    }

    #[derive(Debug, Default)]
    struct TitlesDesktop(Mutex<Vec<String>>);

    impl Desktop for TitlesDesktop {
        fn notify(&self, title: &str, _body: &str) {
            self.0.lock().unwrap().push(title.to_owned());
        }

        fn open(&self, _dir: &Path) {}
    }

    fn settings_in(dir: &Path) -> Settings {
        Settings {
            output_dir: dir.to_path_buf(),
            ..Settings::default()
        }
    }

    #[test]
    fn outcome_comes_back_from_the_worker() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        let desktop = TitlesDesktop::default();
        let orchestrator =
            Orchestrator::new(&settings, &TouchingDownloader, &UnusedTrimmer, &desktop);

        let outcome = run_in_worker(orchestrator, "https://example.com/v full");

        let expected: PathBuf = dir.path().join("1.mp4");
        assert!(matches!(outcome, Outcome::Completed { path, .. } if path == expected));
    }

    #[test]
    fn panic_is_reported_as_critical() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        let desktop = TitlesDesktop::default();
        let orchestrator =
            Orchestrator::new(&settings, &PanickingDownloader, &UnusedTrimmer, &desktop);

        let outcome = run_in_worker(orchestrator, "https://example.com/v full");

        assert!(
            matches!(outcome, Outcome::Failed(Error::Unexpected(report)) if report.to_string().contains("downloader exploded"))
        );
        assert_eq!(desktop.0.lock().unwrap().last().unwrap(), "Critical error");
    }
}
