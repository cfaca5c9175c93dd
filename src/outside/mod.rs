mod command;
mod desktop;
mod ffmpeg;
mod ytdlp;

pub use command::{FFMPEG, YT_DLP};
pub use desktop::{Desktop, Freedesktop};
pub use ffmpeg::{Ffmpeg, Trimmer};
pub use ytdlp::{Downloader, Ytdlp};

/// Write an executable `sh` script named `name` into `dir`
#[cfg(all(test, unix))]
fn fake_program(dir: &std::path::Path, name: &str, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}
