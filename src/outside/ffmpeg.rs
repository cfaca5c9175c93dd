use std::{ffi::OsStr, fmt::Debug, path::Path};

use crate::{result::Result, types::CanonicalTime};

use super::command::{assert_success_command, FFXXX_DEFAULT_ARGS};

pub trait Trimmer: Sync + Debug {
    /// Copy the streams of `input` between the `start` and `end` times
    /// into `output`, without re-encoding. `output` is overwritten if it exists.
    ///
    /// Both times are given as-is to the underlying tool.
    fn trim(
        &self,
        input: &Path,
        start: CanonicalTime,
        end: CanonicalTime,
        output: &Path,
    ) -> Result<()>;
}

/// Interface for the [ffmpeg](https://ffmpeg.org) program
#[derive(Debug)]
pub struct Ffmpeg {
    program: String,
}

impl Ffmpeg {
    /// Verify that the `ffmpeg` binary is reachable
    pub fn new(program: &str) -> Result<Self> {
        assert_success_command(program, |cmd| cmd.arg("-version"))
            .map_err(|err| err.wrap_err_with(|| format!("{program} not found")))?;

        Ok(Self {
            program: program.to_owned(),
        })
    }
}

impl Trimmer for Ffmpeg {
    fn trim(
        &self,
        input: &Path,
        start: CanonicalTime,
        end: CanonicalTime,
        output: &Path,
    ) -> Result<()> {
        assert_success_command(&self.program, |cmd| {
            cmd.args(FFXXX_DEFAULT_ARGS)
                .arg("-y")
                .args(["-ss", &start.to_string()])
                .args(["-to", &end.to_string()])
                .args([OsStr::new("-i"), input.as_os_str()])
                .args(["-c", "copy"])
                .arg(output)
        })?;

        Ok(())
    }
}
