use std::{
    io::{BufRead, BufReader, Read},
    process::{ChildStdout, Command, Output, Stdio},
    thread,
};

use bitflags::bitflags;
use miette::{Context, IntoDiagnostic};
use tracing::{debug, enabled, trace, Level};

use crate::result::{err_msg, ProcessError, Result};

pub const YT_DLP: &str = "yt-dlp";
pub const FFMPEG: &str = "ffmpeg";
pub const FFXXX_DEFAULT_ARGS: [&str; 3] = ["-hide_banner", "-loglevel", "error"];

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capture: u8 {
        const STDERR = 0b0000100;
    }
}

/// Run a command, returning its raw output handle.
///
/// `stdin` is closed. `stderr` is captured if the caller required it,
/// and both outputs are captured and logged if the log level is Debug.
///
/// The function returns an error only if the command failed to execute.
/// If the program runs but returns a non-0 status code, it will not trigger an error.
pub fn run_command<F: FnOnce(&mut Command) -> &mut Command>(
    program: &str,
    f: F,
    capture: Capture,
) -> Result<Output> {
    let is_debug = enabled!(Level::DEBUG);
    let get_io = |capture| {
        if capture {
            Stdio::piped()
        } else {
            Stdio::null()
        }
    };

    let mut cmd = Command::new(program);
    let cmd = f(&mut cmd)
        .stdin(Stdio::null())
        .stdout(get_io(is_debug))
        .stderr(get_io(is_debug || capture.contains(Capture::STDERR)));

    debug!("Executing command: {cmd:?}");
    let res = cmd
        .output()
        .into_diagnostic()
        .wrap_err_with(|| format!("Could not run {program}"))?;

    if is_debug {
        debug!("status: {}", res.status);
        debug!("stdout: {} bytes long", res.stdout.len());
        trace!("stdout: {:?}", String::from_utf8_lossy(&res.stdout));
        debug!("stderr: {} bytes long", res.stderr.len());
        trace!("stderr: {:?}", String::from_utf8_lossy(&res.stderr));
    }

    Ok(res)
}

/// Run the command and verify that it has returned a success status code.
///
/// `stderr` is always captured so that it can be reported on failure.
pub fn assert_success_command<F: FnOnce(&mut Command) -> &mut Command>(
    program: &str,
    f: F,
) -> Result<Output> {
    let res = run_command(program, f, Capture::STDERR)?;
    if res.status.success() {
        Ok(res)
    } else {
        Err(ProcessError {
            program: program.to_owned(),
            code: res.status.code(),
            stderr: String::from_utf8_lossy(&res.stderr).into_owned(),
        }
        .into())
    }
}

/// Run the command, handing every `stdout` line to `on_line` as soon as it is printed.
///
/// `stderr` is drained by a side thread, so the child can never block on a full pipe,
/// and is reported in the error if the program does not exit successfully.
/// `stdout` is read until it is closed before waiting for the process exit.
pub fn stream_command<F, L>(program: &str, f: F, mut on_line: L) -> Result<()>
where
    F: FnOnce(&mut Command) -> &mut Command,
    L: FnMut(&str),
{
    let mut cmd = Command::new(program);
    let cmd = f(&mut cmd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("Executing command: {cmd:?}");
    let mut child = cmd
        .spawn()
        .into_diagnostic()
        .wrap_err_with(|| format!("Could not run {program}"))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| err_msg("The command stdout was not captured"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| err_msg("The command stderr was not captured"))?;

    let stderr_thread = thread::Builder::new()
        .name(format!("{program}-stderr"))
        .spawn(move || {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf).map(|_| buf)
        })
        .into_diagnostic()
        .wrap_err("Could not start the stderr reader")?;

    let read_res = read_lines(stdout, program, &mut on_line);
    if read_res.is_err() {
        // Nobody reads the output anymore, do not let the child hang on it
        let _ = child.kill();
    }

    let status = child
        .wait()
        .into_diagnostic()
        .wrap_err_with(|| format!("Could not wait for {program} to exit"))?;
    let stderr = stderr_thread
        .join()
        .map_err(|_| err_msg("The stderr reader panicked"))?
        .into_diagnostic()
        .wrap_err("Could not read the command stderr")?;
    read_res?;

    let stderr = String::from_utf8_lossy(&stderr).into_owned();
    debug!("status: {status}");
    debug!("stderr: {} bytes long", stderr.len());
    trace!("stderr: {stderr:?}");

    if status.success() {
        Ok(())
    } else {
        Err(ProcessError {
            program: program.to_owned(),
            code: status.code(),
            stderr,
        }
        .into())
    }
}

/// Read the whole `stdout`, line by line.
/// Carriage returns also end a line as some programs use them to redraw their progress.
fn read_lines(stdout: ChildStdout, program: &str, on_line: &mut dyn FnMut(&str)) -> Result<()> {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .into_diagnostic()
            .wrap_err_with(|| format!("Could not read the output of {program}"))?;
        if read == 0 {
            return Ok(());
        }

        let text = String::from_utf8_lossy(&buf);
        for line in text.split(['\r', '\n']).filter(|line| !line.is_empty()) {
            trace!("{program}: {line}");
            on_line(line);
        }
    }
}
