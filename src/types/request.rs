use std::fmt::Display;

use crate::result::InputError;

use super::CanonicalTime;

/// URL schemes a video URL may start with
const URL_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Literal asking for the whole video instead of a clip
const FULL_KEYWORD: &str = "full";

/// A validated unit of work, decided once from the user query.
///
/// The order of `start` and `end` is not checked: the trimmer decides
/// what to do when the end comes before the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Cut {
        url: String,
        start: CanonicalTime,
        end: CanonicalTime,
    },
    FullDownload {
        url: String,
    },
}

impl Request {
    /// Validate a launcher query.
    ///
    /// Accepted forms are `<url> <start> <end>` and `<url> full`
    /// (case-insensitive), whitespace separated.
    pub fn from_query(query: &str) -> Result<Self, InputError> {
        let tokens: Vec<&str> = query.split_whitespace().collect();

        match tokens.as_slice() {
            [] => Err(InputError::NoInput),
            [url, keyword] if keyword.eq_ignore_ascii_case(FULL_KEYWORD) => {
                Ok(Request::FullDownload {
                    url: check_url(url)?,
                })
            }
            [url, start, end] => {
                let start = parse_time(start)?;
                let end = parse_time(end)?;
                Ok(Request::Cut {
                    url: check_url(url)?,
                    start,
                    end,
                })
            }
            tokens => Err(InputError::WrongTokenCount(tokens.len())),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Request::Cut { url, .. } | Request::FullDownload { url } => url,
        }
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Request::Cut { url, start, end } => write!(f, "cut {url} ({start} - {end})"),
            Request::FullDownload { url } => write!(f, "full download {url}"),
        }
    }
}

fn parse_time(token: &str) -> Result<CanonicalTime, InputError> {
    token.parse().map_err(|source| InputError::BadTime {
        token: token.to_owned(),
        source,
    })
}

fn check_url(url: &str) -> Result<String, InputError> {
    if URL_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        Ok(url.to_owned())
    } else {
        Err(InputError::BadUrl(url.to_owned()))
    }
}
