use miette::Diagnostic;
use serde::Serialize;

use crate::{
    result::{InputError, USAGE},
    types::Request,
};

const USAGE_EXAMPLE: &str = "e.g. https://youtu.be/xyz 00:01:00 00:02:00";

/// Result list shown by a script-filter launcher while the user types
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Items {
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    pub subtitle: String,
    /// Query handed back to `run` when the item is chosen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    pub valid: bool,
}

impl Item {
    fn info(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            arg: None,
            valid: false,
        }
    }
}

/// Render the items for the query typed so far
pub fn items_for(query: &str) -> Items {
    let item = match Request::from_query(query) {
        Ok(request) => action_item(&request),
        Err(InputError::NoInput) => Item::info(USAGE, USAGE_EXAMPLE),
        Err(err) => {
            let subtitle = match err.help() {
                Some(help) => format!("{err}. {help}"),
                None => err.to_string(),
            };
            Item::info(err.title(), subtitle)
        }
    };

    Items { items: vec![item] }
}

fn action_item(request: &Request) -> Item {
    let (title, subtitle, arg) = match request {
        Request::Cut { url, start, end } => (
            format!("Cut video: {url}"),
            format!("Start: {start}, End: {end}"),
            format!("{url} {start} {end}"),
        ),
        Request::FullDownload { url } => (
            format!("Download full video: {url}"),
            "The whole video will be saved".to_owned(),
            format!("{url} full"),
        ),
    };

    Item {
        title,
        subtitle,
        arg: Some(arg),
        valid: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(query: &str) -> Item {
        let mut items = items_for(query).items;
        assert_eq!(items.len(), 1);
        items.remove(0)
    }

    #[test]
    fn empty_query_shows_usage() {
        let item = single("   ");
        assert_eq!(item.title, USAGE);
        assert!(!item.valid);
        assert_eq!(item.arg, None);
    }

    #[test]
    fn errors_have_their_own_titles() {
        assert_eq!(single("https://a.b/v 1m").title, "Wrong input");
        assert_eq!(single("https://a.b/v 1m later").title, "Bad time format");
        assert_eq!(single("a.b/v 1m 2m").title, "Bad URL format");
    }

    #[test]
    fn error_subtitle_carries_the_help() {
        let item = single("https://a.b/v 1m later");
        assert!(item.subtitle.starts_with("'later' is not a valid time"));
        assert!(item.subtitle.contains("1h2m3s"));
    }

    #[test]
    fn cut_item_uses_canonical_times() {
        let item = single("https://a.b/v 90s 2m");
        assert_eq!(item.title, "Cut video: https://a.b/v");
        assert_eq!(item.subtitle, "Start: 00:01:30, End: 00:02:00");
        assert_eq!(item.arg.as_deref(), Some("https://a.b/v 00:01:30 00:02:00"));
        assert!(item.valid);
    }

    #[test]
    fn full_item() {
        let item = single("https://a.b/v FULL");
        assert_eq!(item.title, "Download full video: https://a.b/v");
        assert_eq!(item.arg.as_deref(), Some("https://a.b/v full"));
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_value(items_for("")).unwrap();
        assert_eq!(json["items"][0]["valid"], false);
        assert!(json["items"][0].get("arg").is_none());
    }
}
