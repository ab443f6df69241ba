//! Format-specific rendering of populated reports

use serde::Serialize;
use std::fmt::{self, Write};
use tracing::warn;

use super::records::{AllCounts, AllRecords, ReportRecords};
use super::{Report, ReportKind};
use crate::models::{CodeName, Song};
use crate::view_model::YOUTUBE_WATCH_URL;

const RULE_WIDTH: usize = 50;
const SECTION_RULE_WIDTH: usize = 20;
const NOT_AVAILABLE: &str = "N/A";

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn empty_message(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Songs => "No songs data available for this report.",
        ReportKind::SongPlays => "No song plays data available.",
        ReportKind::SongPerformers => "No song-performer data available.",
        ReportKind::SongGenres => "No song-genre data available.",
        _ => "No data available for this report.",
    }
}

/// Noun used in the text footer, e.g. `Total: 3 songs`
fn total_noun(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::SongPlays => "song plays",
        ReportKind::SongPerformers => "song-performer relationships",
        ReportKind::SongGenres => "song-genre relationships",
        other => other.slug(),
    }
}

enum Cell {
    Text(String),
    Link { href: String, label: &'static str },
}

impl Cell {
    fn or_na(value: Option<&str>) -> Cell {
        Cell::Text(value.unwrap_or(NOT_AVAILABLE).to_string())
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

fn html_table(id: &str, headings: &[&str], rows: Vec<Vec<Cell>>) -> String {
    let mut html = format!(r#"<table id="{}" class="report-table"><thead><tr>"#, escape_html(id));
    for heading in headings {
        let _ = write!(html, "<th>{}</th>", escape_html(heading));
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            match cell {
                Cell::Text(text) => {
                    let _ = write!(html, "<td>{}</td>", escape_html(&text));
                }
                Cell::Link { href, label } => {
                    let _ = write!(
                        html,
                        r#"<td><a href="{}" target="_blank" rel="noopener">{}</a></td>"#,
                        escape_html(&href),
                        label
                    );
                }
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

fn song_rows(songs: &[Song], missing_movie: &str) -> Vec<Vec<Cell>> {
    songs
        .iter()
        .map(|s| {
            vec![
                Cell::from(s.code.as_str()),
                Cell::from(s.name.as_str()),
                Cell::from(s.movie.as_deref().unwrap_or(missing_movie)),
            ]
        })
        .collect()
}

fn code_name_rows(records: &[CodeName]) -> Vec<Vec<Cell>> {
    records
        .iter()
        .map(|r| vec![Cell::from(r.code.as_str()), Cell::from(r.name.as_str())])
        .collect()
}

pub(super) fn to_html(report: &Report) -> String {
    let kind = report.kind();
    if report.is_empty() {
        return format!(r#"<p class="report-empty">{}</p>"#, empty_message(kind));
    }

    let table_id = format!("{}-report-table", kind.slug());
    match report.records() {
        ReportRecords::All(all) => all_to_html(all),
        ReportRecords::Songs(songs) => html_table(&table_id, &["Code", "Name", "Movie"], song_rows(songs, "")),
        ReportRecords::CodeNames(records) => html_table(&table_id, &["Code", "Name"], code_name_rows(records)),
        ReportRecords::SongPlays(records) => {
            let rows = records
                .iter()
                .map(|r| {
                    let performers = r
                        .performers
                        .iter()
                        .map(|p| p.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    let youtube = match &r.youtube_key {
                        Some(key) => Cell::Link {
                            href: format!("{}{}", YOUTUBE_WATCH_URL, key),
                            label: "Link",
                        },
                        None => NOT_AVAILABLE.into(),
                    };
                    vec![
                        r.song_code.as_str().into(),
                        r.song_name.as_str().into(),
                        Cell::or_na(Some(performers.as_str()).filter(|p| !p.is_empty())),
                        Cell::or_na(r.movie.as_deref()),
                        youtube,
                    ]
                })
                .collect();
            html_table(
                &table_id,
                &["Song Code", "Song Name", "Performers", "Movie", "YouTube Key"],
                rows,
            )
        }
        ReportRecords::SongPerformers(records) => {
            let rows = records
                .iter()
                .map(|r| {
                    vec![
                        r.song_code.as_str().into(),
                        r.song_name.as_str().into(),
                        r.performer_code.as_str().into(),
                        r.performer_name.as_str().into(),
                        Cell::or_na(r.movie.as_deref()),
                    ]
                })
                .collect();
            html_table(
                &table_id,
                &["Song Code", "Song Name", "Performer Code", "Performer Name", "Movie"],
                rows,
            )
        }
        ReportRecords::SongGenres(records) => {
            let rows = records
                .iter()
                .map(|r| {
                    vec![
                        r.song_code.as_str().into(),
                        r.song_name.as_str().into(),
                        r.genre.as_str().into(),
                        Cell::or_na(r.movie.as_deref()),
                    ]
                })
                .collect();
            html_table(&table_id, &["Song Code", "Song Name", "Genre", "Movie"], rows)
        }
    }
}

fn all_to_html(all: &AllRecords) -> String {
    let mut html = String::from(r#"<div class="report-sections">"#);
    if !all.songs.is_empty() {
        let _ = write!(
            html,
            "<section><h3>Songs ({})</h3>{}</section>",
            all.songs.len(),
            html_table("all-songs-table", &["Code", "Name", "Movie"], song_rows(&all.songs, NOT_AVAILABLE))
        );
    }
    for (title, records) in all.code_name_sections() {
        if records.is_empty() {
            continue;
        }
        let id = format!("all-{}-table", title.to_lowercase());
        let _ = write!(
            html,
            "<section><h3>{} ({})</h3>{}</section>",
            title,
            records.len(),
            html_table(&id, &["Code", "Name"], code_name_rows(records))
        );
    }
    html.push_str("</div>");
    html
}

fn text_heading(kind: ReportKind) -> String {
    format!("{} REPORT\n{}\n\n", kind.title().to_uppercase(), "=".repeat(RULE_WIDTH))
}

fn code_width<'a>(codes: impl Iterator<Item = &'a str>) -> usize {
    codes.map(|c| c.chars().count()).max().unwrap_or(0)
}

fn write_movie_suffix(out: &mut String, movie: Option<&str>, label: &str) {
    if let Some(movie) = movie {
        let _ = write!(out, " ({}{})", label, movie);
    }
}

pub(super) fn to_text(report: &Report) -> String {
    let kind = report.kind();
    if report.is_empty() {
        return empty_message(kind).to_string();
    }

    let mut out = text_heading(kind);
    match report.records() {
        ReportRecords::All(all) => {
            write_all_text(&mut out, all);
            return out;
        }
        ReportRecords::Songs(songs) => {
            let width = code_width(songs.iter().map(|s| s.code.as_str()));
            for song in songs {
                let _ = write!(out, "{:<width$}  {}", song.code, song.name, width = width);
                write_movie_suffix(&mut out, song.movie.as_deref(), "");
                out.push('\n');
            }
        }
        ReportRecords::CodeNames(records) => {
            let width = code_width(records.iter().map(|r| r.code.as_str()));
            for r in records {
                let _ = writeln!(out, "{:<width$}  {}", r.code, r.name, width = width);
            }
        }
        ReportRecords::SongPlays(records) => {
            for r in records {
                let _ = writeln!(out, "Song: {} - {}", r.song_code, r.song_name);
                if !r.performers.is_empty() {
                    let names: Vec<&str> = r.performers.iter().map(|p| p.name.as_str()).collect();
                    let _ = writeln!(out, "Performers: {}", names.join(", "));
                }
                if let Some(movie) = &r.movie {
                    let _ = writeln!(out, "Movie: {}", movie);
                }
                if let Some(key) = &r.youtube_key {
                    let _ = writeln!(out, "YouTube: {}{}", YOUTUBE_WATCH_URL, key);
                }
                out.push('\n');
            }
        }
        ReportRecords::SongPerformers(records) => {
            for r in records {
                let _ = write!(out, "{} by {}", r.song_name, r.performer_name);
                write_movie_suffix(&mut out, r.movie.as_deref(), "Movie: ");
                out.push('\n');
            }
        }
        ReportRecords::SongGenres(records) => {
            for r in records {
                let _ = write!(out, "{} - {}", r.song_name, r.genre);
                write_movie_suffix(&mut out, r.movie.as_deref(), "Movie: ");
                out.push('\n');
            }
        }
    }
    let _ = writeln!(out, "\nTotal: {} {}", report.records().len(), total_noun(kind));
    out
}

fn write_all_text(out: &mut String, all: &AllRecords) {
    let rule = "-".repeat(SECTION_RULE_WIDTH);
    if !all.songs.is_empty() {
        let _ = writeln!(out, "Songs ({}):\n{}", all.songs.len(), rule);
        for song in &all.songs {
            let _ = write!(out, "{}: {}", song.code, song.name);
            write_movie_suffix(out, song.movie.as_deref(), "");
            out.push('\n');
        }
        out.push('\n');
    }
    for (title, records) in all.code_name_sections() {
        if records.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{} ({}):\n{}", title, records.len(), rule);
        for r in records {
            let _ = writeln!(out, "{}: {}", r.code, r.name);
        }
        out.push('\n');
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    report_type: &'static str,
    total_count: usize,
    records: &'a ReportRecords,
}

#[derive(Serialize)]
struct AllEnvelope<'a> {
    report_type: &'static str,
    total_counts: AllCounts,
    records: &'a AllRecords,
}

/// YAML keeps each collection at the top level next to the counts
#[derive(Serialize)]
struct AllYamlEnvelope<'a> {
    report_type: &'static str,
    total_counts: AllCounts,
    #[serde(flatten)]
    records: &'a AllRecords,
}

fn serialized<E: fmt::Display>(kind: ReportKind, result: std::result::Result<String, E>) -> String {
    result.unwrap_or_else(|e| {
        warn!(report = %kind, "Failed to serialize report: {}", e);
        String::new()
    })
}

fn envelope(report: &Report) -> Envelope<'_> {
    Envelope {
        report_type: report.kind().slug(),
        total_count: report.records().len(),
        records: report.records(),
    }
}

pub(super) fn to_json(report: &Report) -> String {
    let kind = report.kind();
    let result = match report.records() {
        ReportRecords::All(all) => serde_json::to_string_pretty(&AllEnvelope {
            report_type: kind.slug(),
            total_counts: all.counts(),
            records: all,
        }),
        _ => serde_json::to_string_pretty(&envelope(report)),
    };
    serialized(kind, result)
}

pub(super) fn to_yaml(report: &Report) -> String {
    let kind = report.kind();
    let result = match report.records() {
        ReportRecords::All(all) => serde_yaml::to_string(&AllYamlEnvelope {
            report_type: kind.slug(),
            total_counts: all.counts(),
            records: all,
        }),
        _ => serde_yaml::to_string(&envelope(report)),
    };
    serialized(kind, result)
}
