mod cli;
mod io;
mod launcher;
mod logging;
mod my_regex;
mod orchestrator;
mod outside;
mod progress;
mod result;
mod settings;
mod stages;
mod types;
mod worker;

use clap::Parser;
use miette::{miette, IntoDiagnostic};
use tracing::{debug, info, warn};

use crate::{
    cli::{Cli, Command},
    logging::init_logging,
    orchestrator::{Orchestrator, Outcome},
    outside::{Desktop, Ffmpeg, Freedesktop, Ytdlp},
    result::Result,
    settings::Settings,
    worker::run_in_worker,
};

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level)?;

    match &cli.command {
        Command::Query { .. } => {
            let items = launcher::items_for(&cli.command.query());
            let json = serde_json::to_string(&items).into_diagnostic()?;
            println!("{json}");
            Ok(())
        }
        Command::Run { .. } => run(&cli),
    }
}

fn run(cli: &Cli) -> miette::Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.overrides.apply(&mut settings);
    debug!("{settings:?}");

    let desktop = Freedesktop::new(settings.notify);
    let (ytdlp, ffmpeg) = match load_external_components(&settings) {
        Ok(components) => components,
        Err(err) => {
            let (title, body) = err.notification();
            desktop.notify(title, &body);
            return Err(err.into());
        }
    };

    let orchestrator = Orchestrator::new(&settings, &ytdlp, &ffmpeg, &desktop);
    match run_in_worker(orchestrator, &cli.command.query()) {
        Outcome::Completed { path, warning } => {
            match warning {
                Some(warning) => warn!("Finished with a warning: {warning}"),
                None => info!("Saved {}", path.display()),
            }
            Ok(())
        }
        // Already logged and notified
        Outcome::Failed(err) => Err(miette!("{err}")),
    }
}

/// Load the external components
fn load_external_components(settings: &Settings) -> Result<(Ytdlp, Ffmpeg)> {
    // Construct the handles concurrently as executing an external program
    // is not instantaneous. That way we can avoid adding the costs
    std::thread::scope(|scope| {
        let ytdlp_thread = scope.spawn(|| Ytdlp::new(&settings.downloader));
        let ffmpeg_thread = scope.spawn(|| Ffmpeg::new(&settings.trimmer));

        let ytdlp = ytdlp_thread
            .join()
            .map_err(|_| result::err_msg("Could not join thread"))??;
        let ffmpeg = ffmpeg_thread
            .join()
            .map_err(|_| result::err_msg("Could not join thread"))??;

        Ok((ytdlp, ffmpeg))
    })
}
