//! HTML views.
//!
//! Each page is a small view-model built by a handler and rendered into a
//! complete HTML document. Every piece of track metadata is escaped before it
//! is written out, and track titles used in links are percent-encoded as a
//! single path segment.

use std::fmt::Write;

use chrono::DateTime;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::library::Track;

/// Everything but unreserved characters is encoded in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Home page: every track in the catalog.
pub struct HomePage<'a> {
    pub tracks: &'a [Track],
    pub is_admin: bool,
}

/// Detail page for a single track.
pub struct TrackPage<'a> {
    pub track: &'a Track,
    pub is_admin: bool,
}

/// Create-track form, optionally with a message from a rejected submission.
pub struct TrackNewPage<'a> {
    pub is_admin: bool,
    pub message: Option<&'a str>,
}

impl HomePage<'_> {
    pub fn render(&self) -> String {
        let mut body = String::from("<h1>Tracks</h1>\n");

        if self.tracks.is_empty() {
            body.push_str("<p class=\"empty\">No tracks yet.</p>\n");
        } else {
            body.push_str("<ul class=\"tracks\">\n");
            for track in self.tracks {
                let _ = writeln!(
                    body,
                    "<li><a href=\"/track/{href}\"><img src=\"/trackimage/{href}\" alt=\"\" width=\"64\" height=\"64\"> {title}</a> <span class=\"date\">{date}</span></li>",
                    href = escape(&path_segment(&track.title)),
                    title = escape(&track.title),
                    date = format_release_date(track.release_date),
                );
            }
            body.push_str("</ul>\n");
        }

        layout("Tracks", self.is_admin, &body)
    }
}

impl TrackPage<'_> {
    pub fn render(&self) -> String {
        let href = escape(&path_segment(&self.track.title));
        let title = escape(&self.track.title);

        let mut body = String::new();
        let _ = write!(
            body,
            "<article class=\"track\">\n\
             <img class=\"cover\" src=\"/trackimage/{href}\" alt=\"Cover of {title}\">\n\
             <h1>{title}</h1>\n\
             <p class=\"date\">Released {date}</p>\n\
             <audio controls preload=\"none\" src=\"/tracksource/{href}\"></audio>\n\
             <p class=\"description\">{description}</p>\n\
             </article>\n",
            date = format_release_date(self.track.release_date),
            description = escape(&self.track.description),
        );

        layout(&self.track.title, self.is_admin, &body)
    }
}

impl TrackNewPage<'_> {
    pub fn render(&self) -> String {
        let mut body = String::from("<h1>New track</h1>\n");

        if let Some(message) = self.message {
            let _ = writeln!(body, "<p class=\"error\">{}</p>", escape(message));
        }

        body.push_str(
            "<form method=\"post\" action=\"/tracknew\" enctype=\"multipart/form-data\">\n\
             <label>Title <input name=\"title\" required></label>\n\
             <label>Description <textarea name=\"description\"></textarea></label>\n\
             <label>Release date <input name=\"release-date\" type=\"date\" required></label>\n\
             <label>Audio (mp3) <input name=\"audio\" type=\"file\" accept=\"audio/mpeg\"></label>\n\
             <label>Cover (png) <input name=\"cover\" type=\"file\" accept=\"image/png\"></label>\n\
             <button type=\"submit\">Add track</button>\n\
             </form>\n",
        );

        layout("New track", self.is_admin, &body)
    }
}

/// The generic page returned for every missing or rejected resource.
pub fn not_found_page() -> String {
    layout(
        "Not found",
        false,
        "<h1>Not found</h1>\n<p>There is nothing here.</p>\n<p><a href=\"/\">Back to all tracks</a></p>\n",
    )
}

fn layout(title: &str, is_admin: bool, body: &str) -> String {
    let nav = if is_admin {
        "<a href=\"/\">Home</a> <a href=\"/tracknew\">Add track</a>"
    } else {
        "<a href=\"/\">Home</a> <a href=\"/login\">Log in</a>"
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"/main.css\">\n\
         <link rel=\"icon\" href=\"/img/icon.png\">\n\
         </head>\n\
         <body>\n\
         <nav>{nav}</nav>\n\
         <main>\n{body}</main>\n\
         </body>\n\
         </html>\n",
        title = escape(title),
    )
}

/// Render epoch seconds as a UTC calendar date.
pub fn format_release_date(epoch: i64) -> String {
    DateTime::from_timestamp(epoch, 0)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Percent-encode a track title for use as one URL path segment.
pub fn path_segment(name: &str) -> String {
    utf8_percent_encode(name, PATH_SEGMENT).to_string()
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn t(title: &str) -> Track {
        Track {
            title: title.into(),
            description: "<b>bold</b> & more".into(),
            release_date: 1_700_000_000,
        }
    }

    #[test]
    fn format_release_date_is_utc_calendar_date() {
        assert_eq!(format_release_date(0), "1970-01-01");
        assert_eq!(format_release_date(1_700_000_000), "2023-11-14");
        assert_eq!(format_release_date(i64::MAX), "unknown");
    }

    #[test]
    fn path_segment_encodes_spaces_and_query_characters() {
        assert_eq!(path_segment("My Song"), "My%20Song");
        assert_eq!(path_segment("why?"), "why%3F");
        assert_eq!(path_segment("a&b"), "a%26b");
        assert_eq!(path_segment("plain-name_1.0"), "plain-name_1.0");
    }

    #[test]
    fn escape_covers_html_metacharacters() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn home_page_lists_tracks_and_toggles_admin_nav() {
        let tracks = vec![t("My Song"), t("Other")];

        let html = HomePage { tracks: &tracks, is_admin: false }.render();
        assert!(html.contains("href=\"/track/My%20Song\""));
        assert!(html.contains("Other"));
        assert!(html.contains("/login"));
        assert!(!html.contains("/tracknew"));

        let html = HomePage { tracks: &tracks, is_admin: true }.render();
        assert!(html.contains("/tracknew"));
    }

    #[test]
    fn home_page_without_tracks_says_so() {
        let html = HomePage { tracks: &[], is_admin: false }.render();
        assert!(html.contains("No tracks yet."));
        assert!(!html.contains("<li>"));
    }

    #[test]
    fn track_page_escapes_metadata() {
        let track = t("Song");
        let html = TrackPage { track: &track, is_admin: false }.render();

        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; &amp; more"));
        assert!(!html.contains("<b>bold</b>"));
        assert!(html.contains("src=\"/tracksource/Song\""));
        assert!(html.contains("Released 2023-11-14"));
    }

    #[test]
    fn track_new_page_shows_message() {
        let html = TrackNewPage { is_admin: true, message: Some("bad <title>") }.render();
        assert!(html.contains("bad &lt;title&gt;"));
        assert!(html.contains("enctype=\"multipart/form-data\""));
    }
}
