//! Report index and report viewer pages

use std::fmt::Write;

use srdb_common::report::{Report, ReportFormat, ReportKind};

use super::escape;

pub fn report_href(kind: ReportKind, format: ReportFormat) -> String {
    match format {
        ReportFormat::Html => format!("/reports/{}", kind.slug()),
        other => format!("/reports/{}?format={}", kind.slug(), other),
    }
}

/// List of every available report
pub fn reports_index() -> String {
    let mut html = String::from(r#"<section class="reports"><h2>Reports</h2><ul class="report-list">"#);
    for kind in ReportKind::ALL {
        let _ = write!(
            html,
            r#"<li><a href="{}">{}</a></li>"#,
            report_href(kind, ReportFormat::Html),
            escape(kind.title())
        );
    }
    html.push_str("</ul></section>");
    html
}

fn format_switch(kind: ReportKind, current: ReportFormat) -> String {
    let mut html = String::from(r#"<p class="format-switch"><span>Format:</span> "#);
    for format in ReportFormat::ALL {
        let label = format.as_str().to_uppercase();
        if format == current {
            let _ = write!(html, r#"<strong class="active">{}</strong> "#, label);
        } else {
            let _ = write!(
                html,
                r#"<a href="{}">{}</a> <a class="raw" href="/api/reports/{}?format={}">raw</a> "#,
                escape(&report_href(kind, format)),
                label,
                kind.slug(),
                format
            );
        }
    }
    html.push_str("</p>");
    html
}

/// A populated report rendered in `format`, embedded in the page
pub fn report_view(report: &Report, format: ReportFormat) -> String {
    let kind = report.kind();
    let content = report.render(format);
    let body = match format {
        ReportFormat::Html => content,
        _ => format!("<pre><code>{}</code></pre>", escape(&content)),
    };
    format!(
        r#"<section class="report" id="report-{slug}"><h2>Report: {title}</h2>{switch}<div class="report-content">{body}</div><p><a href="/reports">All reports</a></p></section>"#,
        slug = kind.slug(),
        title = escape(kind.title()),
        switch = format_switch(kind, format),
        body = body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use srdb_common::models::CodeName;
    use srdb_common::report::ReportRecords;

    fn writers() -> Report {
        Report::new(
            ReportKind::Writers,
            ReportRecords::CodeNames(vec![CodeName {
                code: "W1".to_string(),
                name: "Sid <Tepper>".to_string(),
            }]),
        )
    }

    #[test]
    fn test_index_lists_every_report() {
        let html = reports_index();
        for kind in ReportKind::ALL {
            assert!(html.contains(&format!(r#"href="/reports/{}""#, kind.slug())));
        }
        assert!(html.contains(">Song Performers<"));
    }

    #[test]
    fn test_text_format_is_preformatted_and_escaped() {
        let html = report_view(&writers(), ReportFormat::Text);
        assert!(html.contains("<pre><code>WRITERS REPORT\n"));
        assert!(html.contains("W1  Sid &lt;Tepper&gt;"));
        assert!(html.contains(r#"<strong class="active">TEXT</strong>"#));
        assert!(html.contains(r#"<a href="/reports/writers?format=yaml">YAML</a>"#));
        assert!(html.contains(r#"<a href="/reports/writers">HTML</a>"#));
    }

    #[test]
    fn test_html_format_is_embedded() {
        let html = report_view(&writers(), ReportFormat::Html);
        assert!(html.contains(r#"<table id="writers-report-table""#));
        assert!(html.contains("<td>Sid &lt;Tepper&gt;</td>"));
    }
}
