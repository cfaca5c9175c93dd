use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use crate::my_regex::get_progress_re_list;

/// Percentage at which a download is complete
const COMPLETE: f64 = 100.0;

/// When to surface a new progress value to the user
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Throttle {
    /// Once the percentage moved by at least this many points
    Step(f64),
    /// Once this much time elapsed
    Interval(Duration),
}

impl Default for Throttle {
    fn default() -> Self {
        Throttle::Step(5.0)
    }
}

/// A progress update worth showing
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Percent(f64),
    /// The downloader printed a progress marker whose value is not a number
    Raw(String),
}

impl Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Progress::Percent(pct) => write!(f, "{pct:.1}%"),
            Progress::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Decide which progress lines of a running download are shown to the user.
///
/// The first value after a reset only sets the baseline. Afterwards a value is
/// let through once the [`Throttle`] allows it, compared to the last value let through.
/// Completion always goes through and resets the relay, and so does a value that
/// cannot be parsed, shown as-is.
#[derive(Debug)]
pub struct ProgressRelay {
    throttle: Throttle,
    /// Last percentage let through (or baseline) and when
    last: Option<(f64, Instant)>,
}

impl ProgressRelay {
    pub fn new(throttle: Throttle) -> Self {
        Self {
            throttle,
            last: None,
        }
    }

    /// Forget about the previous values, to be called before a new download
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Handle one output line of the downloader
    pub fn on_line(&mut self, line: &str) -> Option<Progress> {
        let raw = Self::find_percent(line)?;

        match raw.parse::<f64>() {
            Ok(pct) if pct.is_finite() => self.on_percent(pct, Instant::now()),
            _ => {
                self.reset();
                Some(Progress::Raw(raw.to_owned()))
            }
        }
    }

    fn on_percent(&mut self, pct: f64, now: Instant) -> Option<Progress> {
        if pct >= COMPLETE {
            self.reset();
            return Some(Progress::Percent(COMPLETE));
        }

        let Some((last_pct, last_at)) = self.last else {
            self.last = Some((pct, now));
            return None;
        };

        let due = match self.throttle {
            Throttle::Step(points) => pct - last_pct >= points,
            Throttle::Interval(interval) => now.saturating_duration_since(last_at) >= interval,
        };

        if due {
            self.last = Some((pct, now));
            Some(Progress::Percent(pct))
        } else {
            None
        }
    }

    /// Extract the percentage text of a progress line, if it is one
    fn find_percent(line: &str) -> Option<&str> {
        let line = line.trim();
        get_progress_re_list()
            .iter()
            .find_map(|re| re.captures(line))
            .and_then(|cap| cap.name("pct"))
            .map(|m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(relay: &mut ProgressRelay, values: &[&str]) -> Vec<Progress> {
        values
            .iter()
            .flat_map(|v| relay.on_line(&format!("YTCUT_PROGRESS {v}")))
            .collect()
    }

    #[test]
    fn step_lets_through_big_moves_and_completion() {
        let mut relay = ProgressRelay::new(Throttle::Step(5.0));
        let shown = feed(&mut relay, &["5%", "8%", "11%", "100%"]);
        assert_eq!(shown, [Progress::Percent(11.0), Progress::Percent(100.0)]);
    }

    #[test]
    fn step_is_relative_to_last_shown_value() {
        let mut relay = ProgressRelay::new(Throttle::Step(5.0));
        let shown = feed(&mut relay, &["0%", "4.9%", "5%", "9%", "10.5%", "14%"]);
        assert_eq!(shown, [Progress::Percent(5.0), Progress::Percent(10.5)]);
    }

    #[test]
    fn completion_resets_the_baseline() {
        let mut relay = ProgressRelay::new(Throttle::Step(5.0));
        feed(&mut relay, &["50%", "100%"]);
        // Second stream of the same download, e.g. the audio track
        let shown = feed(&mut relay, &["1%", "7%"]);
        assert_eq!(shown, [Progress::Percent(7.0)]);
    }

    #[test]
    fn unparsable_values_are_shown_raw() {
        let mut relay = ProgressRelay::new(Throttle::Step(5.0));
        let shown = feed(&mut relay, &["10%", "N/A", "12%", "16%"]);
        // The raw value resets the relay, so 12% is a new baseline
        assert_eq!(shown, [Progress::Raw("N/A".to_owned())]);
    }

    #[test]
    fn default_progress_format_is_understood() {
        let mut relay = ProgressRelay::new(Throttle::Step(5.0));
        assert_eq!(relay.on_line("[download]   1.0% of 10.00MiB"), None);
        assert_eq!(
            relay.on_line("[download]  20.0% of 10.00MiB at 1.00MiB/s ETA 00:08"),
            Some(Progress::Percent(20.0))
        );
        assert_eq!(relay.on_line("[download] Destination: a.mp4"), None);
        assert_eq!(relay.on_line("[youtube] xyz: Downloading webpage"), None);
    }

    #[test]
    fn interval_waits_for_time_to_pass() {
        let mut relay = ProgressRelay::new(Throttle::Interval(Duration::from_secs(5)));
        let start = Instant::now();
        let at = |secs| start + Duration::from_secs(secs);

        assert_eq!(relay.on_percent(1.0, at(0)), None);
        assert_eq!(relay.on_percent(50.0, at(4)), None);
        assert_eq!(relay.on_percent(60.0, at(5)), Some(Progress::Percent(60.0)));
        assert_eq!(relay.on_percent(61.0, at(9)), None);
        assert_eq!(relay.on_percent(100.0, at(9)), Some(Progress::Percent(100.0)));
    }

    #[test]
    fn reset_forgets_the_baseline() {
        let mut relay = ProgressRelay::new(Throttle::Step(5.0));
        feed(&mut relay, &["10%"]);
        relay.reset();
        assert!(feed(&mut relay, &["90%"]).is_empty());
    }

    #[test]
    fn display() {
        assert_eq!(Progress::Percent(42.0).to_string(), "42.0%");
        assert_eq!(Progress::Raw("N/A".to_owned()).to_string(), "N/A");
    }
}
