use std::sync::OnceLock;

use regex::Regex;

// Patterns are assembled from small macros so that each piece stays readable

/// Tag printed in front of every line of the downloader progress template
macro_rules! progress_tag {
    () => {
        "YTCUT_PROGRESS"
    };
}
/// A percentage value, decimals allowed
macro_rules! percent {
    () => {
        r#"(?P<pct>[0-9]+(?:\.[0-9]+)?)%"#
    };
}
/// Whatever the downloader put as the percentage, even when not a number (e.g. "N/A")
macro_rules! raw_percent {
    () => {
        r#"(?P<pct>\S+?)%?"#
    };
}

pub const PROGRESS_TAG: &str = progress_tag!();

/// Pattern 1: a line of our own progress template
/// Example: "YTCUT_PROGRESS  42.3%"
const TAGGED_PROGRESS: &str = concat!("^", progress_tag!(), r#"\s+"#, raw_percent!(), "$");

/// Pattern 2: the default progress line of the downloader
/// Example: "[download]  42.3% of ~ 10.00MiB at  1.00MiB/s ETA 00:05"
const DEFAULT_PROGRESS: &str = concat!(r#"^\[download\]\s+"#, percent!());

/// Lines where the downloader tells which file it writes, the last one seen being the final file.
/// Examples:
/// - "[download] Destination: /home/me/Downloads/My Video.f137.mp4"
/// - "[Merger] Merging formats into "/home/me/Downloads/My Video.mp4""
/// - "[download] /home/me/Downloads/My Video.mp4 has already been downloaded"
const DESTINATION: &str = r#"^\[download\] Destination: (?P<path>.+)$"#;
const MERGER: &str = r#"^\[Merger\] Merging formats into "(?P<path>.+)"$"#;
const ALREADY_DOWNLOADED: &str = r#"^\[download\] (?P<path>.+) has already been downloaded$"#;

/// Duration components, tried in this order: hours, minutes, seconds
const HOURS: &str = r#"(?i)[0-9]+h"#;
const MINUTES: &str = r#"(?i)[0-9]+m"#;
const SECONDS: &str = r#"(?i)[0-9]+s"#;

/// Clock notation with at least one colon and optional decimals
/// Example: "1:02:03", "02:30", "00:00:10.500"
const CLOCK: &str = r#"^(?:(?P<h>[0-9]+):)?(?P<m>[0-9]+):(?P<s>[0-9]+)(?:\.[0-9]+)?$"#;

static PROGRESS_RE_LIST: OnceLock<[Regex; 2]> = OnceLock::new();
static DESTINATION_RE_LIST: OnceLock<[Regex; 3]> = OnceLock::new();
static TIME_UNIT_RE_LIST: OnceLock<[Regex; 3]> = OnceLock::new();
static CLOCK_RE: OnceLock<Regex> = OnceLock::new();

/// Progress patterns, the tagged one first
pub fn get_progress_re_list() -> &'static [Regex] {
    PROGRESS_RE_LIST.get_or_init(|| {
        [
            Regex::new(TAGGED_PROGRESS).unwrap(),
            Regex::new(DEFAULT_PROGRESS).unwrap(),
        ]
    })
}

pub fn get_destination_re_list() -> &'static [Regex] {
    DESTINATION_RE_LIST.get_or_init(|| {
        [
            Regex::new(DESTINATION).unwrap(),
            Regex::new(MERGER).unwrap(),
            Regex::new(ALREADY_DOWNLOADED).unwrap(),
        ]
    })
}

pub fn get_time_unit_re_list() -> &'static [Regex; 3] {
    TIME_UNIT_RE_LIST.get_or_init(|| {
        [
            Regex::new(HOURS).unwrap(),
            Regex::new(MINUTES).unwrap(),
            Regex::new(SECONDS).unwrap(),
        ]
    })
}

pub fn get_clock_re() -> &'static Regex {
    CLOCK_RE.get_or_init(|| Regex::new(CLOCK).unwrap())
}
