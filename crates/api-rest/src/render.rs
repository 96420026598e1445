//! HTML rendering of the home and project pages.
//!
//! Handlers depend only on the [`Renderer`] trait; [`HtmlRenderer`] is the built-in
//! implementation producing small self-contained pages.

use contented_core::{ProjectId, ResultPath};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt::Write;

const SITE_TITLE: &str = "Data Analysis Results";

/// Bytes that cannot appear raw inside one URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Turns listings into response bodies.
pub trait Renderer: Send + Sync {
    /// Page listing the projects visible to the caller.
    fn home(&self, project_ids: &[ProjectId]) -> String;

    /// Page listing the result files of one project.
    fn project(&self, project_id: &ProjectId, result_files: &[ResultPath]) -> String;
}

/// Plain HTML pages with a table of links.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn home(&self, project_ids: &[ProjectId]) -> String {
        let mut rows = String::new();
        for id in project_ids {
            let href = escape_html(&project_href(id));
            let id = escape_html(id.as_str());
            let _ = writeln!(
                rows,
                "      <tr><td><a href=\"{href}\">{id}</a></td></tr>"
            );
        }

        page(SITE_TITLE, "project_table", &rows)
    }

    fn project(&self, project_id: &ProjectId, result_files: &[ResultPath]) -> String {
        let escaped_id = escape_html(project_id.as_str());
        let project_href = project_href(project_id);
        let mut rows = String::new();
        for file in result_files {
            let mut href = project_href.clone();
            for segment in file.segments() {
                href.push('/');
                href.extend(utf8_percent_encode(segment, PATH_SEGMENT));
            }
            let href = escape_html(&href);
            let file = escape_html(file.as_str());
            let _ = writeln!(
                rows,
                "      <tr><td><a href=\"{href}\">{file}</a></td></tr>"
            );
        }

        page(
            &format!("{SITE_TITLE}: {escaped_id}"),
            "results_table",
            &rows,
        )
    }
}

fn project_href(project_id: &ProjectId) -> String {
    format!(
        "/projects/{}",
        utf8_percent_encode(project_id.as_str(), PATH_SEGMENT)
    )
}

/// `title` must already be escaped.
fn page(title: &str, table_id: &str, rows: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         <table id=\"{table_id}\">\n\
         {rows}\
         </table>\n\
         </body>\n\
         </html>\n"
    )
}

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
