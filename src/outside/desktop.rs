use std::{
    fmt::Debug,
    path::Path,
    process::{Command, Stdio},
};

use tracing::{debug, info, warn};

use super::command::{run_command, Capture};

const NOTIFY_SEND: &str = "notify-send";
const XDG_OPEN: &str = "xdg-open";

const APP_NAME: &str = "Video Cutter";
const ICON: &str = "video-x-generic";

/// Interface to the user desktop.
///
/// Both operations are fire-and-forget: a failure is logged and never returned.
pub trait Desktop: Sync + Debug {
    /// Show a notification to the user
    fn notify(&self, title: &str, body: &str);

    /// Open a directory in the user file manager
    fn open(&self, dir: &Path);
}

/// Desktop of a freedesktop.org compliant environment,
/// using [notify-send](https://gitlab.gnome.org/GNOME/libnotify) and
/// [xdg-open](https://www.freedesktop.org/wiki/Software/xdg-utils/).
#[derive(Debug)]
pub struct Freedesktop {
    /// When disabled, notifications are only logged
    notifications: bool,
}

impl Freedesktop {
    pub fn new(notifications: bool) -> Self {
        Self { notifications }
    }
}

impl Desktop for Freedesktop {
    fn notify(&self, title: &str, body: &str) {
        info!("{title}: {body}");
        if !self.notifications {
            return;
        }

        let res = run_command(
            NOTIFY_SEND,
            |cmd| {
                cmd.args(["-a", APP_NAME, "-i", ICON])
                    .arg("--")
                    .args([title, body])
            },
            Capture::STDERR,
        );

        match res {
            Ok(output) if output.status.success() => {}
            Ok(output) => warn!(
                "Could not show notification: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Err(err) => warn!("Could not show notification: {err}"),
        }
    }

    fn open(&self, dir: &Path) {
        debug!("Opening {}", dir.display());

        // Not waited for: the file manager may outlive this process
        let res = Command::new(XDG_OPEN)
            .arg(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        if let Err(err) = res {
            warn!("Could not open {}: {err}", dir.display());
        }
    }
}
