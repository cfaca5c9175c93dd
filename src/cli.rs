use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use indoc::indoc;

use crate::{settings::Settings, types::Container};

macro_rules! arg_env {
    ($v:literal) => {
        concat!("YTCUT_", $v)
    };
}

/// Download a video and cut a clip out of it, from a launcher query.
#[derive(Parser, Debug)]
#[command(version, long_about = indoc! {"
    Download a video and cut a clip out of it, from a launcher query.

    A query is either `<url> <start> <end>` to keep only a part of the video,
    or `<url> full` to keep all of it. Times are written like 1h2m3s, 90s, 10m
    or 00:01:30.

    `query` renders the launcher result items as JSON while the user types,
    `run` processes the chosen query and reports through desktop notifications.
"})]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub overrides: Overrides,

    /// Configuration file to read instead of the default one
    #[arg(long, global = true, env = arg_env!("CONFIG"))]
    pub config: Option<PathBuf>,

    /// Most verbose level of the logs to show
    #[arg(long, global = true, default_value_t = tracing::Level::INFO, env = arg_env!("LOG_LEVEL"))]
    pub log_level: tracing::Level,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Describe what a query would do, as launcher items in JSON
    Query {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// Process a query
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },
}

impl Command {
    /// The query words joined back together
    pub fn query(&self) -> String {
        match self {
            Command::Query { query } | Command::Run { query } => query.join(" "),
        }
    }
}

/// Options taking precedence over the configuration
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// The path to the output directory
    #[arg(long, global = true, env = arg_env!("OUT"))]
    pub out: Option<PathBuf>,

    /// Open the output directory once the video is saved
    #[arg(long, global = true, env = arg_env!("OPEN"))]
    pub open: bool,

    /// The container format of the saved videos
    #[arg(long, global = true, value_enum, env = arg_env!("CONTAINER"))]
    pub container: Option<Container>,
}

impl Overrides {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(out) = &self.out {
            settings.output_dir = crate::io::expand_home(out);
        }
        if self.open {
            settings.open_output_dir = true;
        }
        if let Some(container) = self.container {
            settings.container = container;
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn every_option_has_an_env_variable() {
        let cmd = Cli::command();
        let options: Vec<_> = cmd
            .get_arguments()
            .filter(|arg| arg.get_long().is_some())
            .filter(|arg| !matches!(arg.get_id().as_str(), "help" | "version"))
            .collect();
        assert_eq!(options.len(), 5);

        for arg in options {
            let long = arg.get_long().unwrap();
            let env = arg.get_env().and_then(|env| env.to_str());
            let expected = format!("YTCUT_{}", long.replace('-', "_").to_uppercase());
            assert_eq!(env, Some(expected.as_str()), "--{long}");
        }
    }

    #[test]
    fn query_words_are_joined() {
        let cli = Cli::try_parse_from(["ytcut", "run", "https://a.b/v", "1m", "2m"]).unwrap();
        assert_eq!(cli.command.query(), "https://a.b/v 1m 2m");
    }

    #[test]
    fn overrides_win() {
        let cli = Cli::try_parse_from([
            "ytcut",
            "run",
            "--out",
            "/tmp/clips",
            "--container",
            "webm",
            "--open",
            "https://a.b/v",
            "full",
        ])
        .unwrap();

        let mut settings = Settings::default();
        cli.overrides.apply(&mut settings);
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/clips"));
        assert_eq!(settings.container, Container::Webm);
        assert!(settings.open_output_dir);
        assert_eq!(cli.command.query(), "https://a.b/v full");
    }
}
