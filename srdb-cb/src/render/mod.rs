//! Server-side HTML rendering
//!
//! Pages are plain HTML built from strings; every piece of catalog text
//! passes through [`escape`] on the way in.

use srdb_common::source::is_http_base;
use srdb_common::Error;

pub mod catalog;
pub mod reports;

pub use srdb_common::report::escape_html as escape;

const SITE_NAME: &str = "Tepper & Bennett Song Catalog";

/// Wrap `body` in the site chrome
pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - {site}</title>
<link rel="stylesheet" href="/static/site.css">
</head>
<body>
<header><nav><a href="/">Catalog</a> <a href="/featured">Featured</a> <a href="/reports">Reports</a></nav><h1>{site}</h1></header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        site = escape(SITE_NAME),
        body = body,
    )
}

/// Generic boxed message
pub fn message_panel(title: &str, message: &str) -> String {
    format!(
        r#"<div class="panel panel-error"><p class="panel-title">{}</p><p>{}</p></div>"#,
        escape(title),
        escape(message)
    )
}

/// The single panel shown in place of the table when the catalog failed to load
pub fn load_error_panel(error: &Error, data_base: &str) -> String {
    let hint = match error {
        Error::Fetch { .. } if is_http_base(data_base) => {
            "Please make sure the data files are published under the configured base URL and reachable over HTTP.".to_string()
        }
        Error::Fetch { .. } => format!(
            "Please make sure the data directory {} exists and contains every data file.",
            data_base
        ),
        Error::Parse { file, .. } => format!("Please check the YAML syntax of {}.", file),
        Error::EmptyCriticalData { file } => format!("{} must list at least one song play.", file),
        _ => "Please check the catalog configuration.".to_string(),
    };
    format!(
        r#"<div class="panel panel-error" id="load-error"><p class="panel-title">Error loading data</p><p>{}</p><p class="hint">{}</p></div>"#,
        escape(&error.to_string()),
        escape(&hint)
    )
}

/// Shown while the first load is still running
pub fn loading_panel() -> String {
    r#"<div class="panel" id="loading"><p>Loading catalog...</p></div>"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_escapes_title() {
        let html = page("<Songs>", "<p>body</p>");
        assert!(html.contains("<title>&lt;Songs&gt; - Tepper &amp; Bennett Song Catalog</title>"));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn test_load_error_panel_names_file() {
        let err = Error::Fetch {
            file: "song-plays.yml".to_string(),
            reason: "connection refused".to_string(),
        };
        let html = load_error_panel(&err, "http://localhost:8000/data/");
        assert!(html.contains("Failed to load song-plays.yml: connection refused"));
        assert!(html.contains("reachable over HTTP"));

        let html = load_error_panel(&err, "./data/");
        assert!(html.contains("data directory ./data/ exists"));
    }

    #[test]
    fn test_empty_song_plays_hint() {
        let err = Error::EmptyCriticalData {
            file: "song-plays.yml".to_string(),
        };
        let html = load_error_panel(&err, "./data/");
        assert!(html.contains("song-plays.yml must list at least one song play."));
    }
}
