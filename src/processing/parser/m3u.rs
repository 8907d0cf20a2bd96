use url::Url;

use crate::model::playlist::PlaylistEntry;

fn has_supported_scheme(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

/// The channel title sits behind the last comma that is not part of a quoted
/// attribute value, e.g. `#EXTINF:-1 group-title="News, World",France 24`.
fn extract_title(extinf: &str) -> Option<String> {
    let mut split = None;
    let mut in_quotes = false;
    for (idx, ch) in extinf.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => split = Some(idx),
            _ => {}
        }
    }
    let title = extinf[split? + 1..].trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

fn create_entry(extinf: &str, url: &str) -> Option<PlaylistEntry> {
    if !has_supported_scheme(url) {
        return None;
    }
    let title = extract_title(extinf)?;
    Some(PlaylistEntry::new(extinf.to_string(), title, url.to_string()))
}

/// Walks raw playlist lines and visits one `PlaylistEntry` per wellformed
/// `#EXTINF`/url pair. Malformed pairs are skipped, never an error: a held
/// header is dropped when the next line is a comment, blank, or carries an
/// unsupported scheme.
pub fn consume_m3u<'a, I, F: FnMut(PlaylistEntry)>(lines: I, mut visit: F)
where
    I: Iterator<Item = &'a str>,
{
    let mut extinf: Option<&'a str> = None;
    for raw in lines {
        let line = raw.trim();
        if line.starts_with("#EXTINF") {
            extinf = Some(line);
            continue;
        }
        let header = extinf.take();
        if line.starts_with('#') || line.is_empty() {
            continue;
        }
        if let Some(header_line) = header {
            if let Some(entry) = create_entry(header_line, line) {
                visit(entry);
            }
        }
    }
}

pub fn parse_m3u<'a, I>(lines: I) -> Vec<PlaylistEntry>
where
    I: Iterator<Item = &'a str>,
{
    let mut entries = Vec::new();
    consume_m3u(lines, |entry| entries.push(entry));
    entries
}

#[cfg(test)]
mod tests {
    use super::{extract_title, parse_m3u};

    #[test]
    fn test_parse_extracts_title_and_url() {
        let content = "#EXTM3U\n#EXTINF:-1 tvg-id=\"f24\",France 24\nhttp://example.com/f24\n";
        let entries = parse_m3u(content.lines());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "France 24");
        assert_eq!(entries[0].title_key, "france 24");
        assert_eq!(entries[0].url, "http://example.com/f24");
    }

    #[test]
    fn test_title_behind_last_unquoted_comma() {
        let extinf = "#EXTINF:-1 group-title=\"News, World\",France 24";
        assert_eq!(extract_title(extinf).as_deref(), Some("France 24"));
    }

    #[test]
    fn test_rejects_unsupported_scheme() {
        let content = "#EXTINF:-1,Channel\nrtmp://example.com/stream\n#EXTINF:-1,Other\nhttps://example.com/ok\n";
        let entries = parse_m3u(content.lines());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Other");
    }

    #[test]
    fn test_skips_header_without_url_line() {
        let content = "#EXTINF:-1,Channel\n#EXTGRP:News\nhttp://example.com/stream\n";
        assert!(parse_m3u(content.lines()).is_empty());
    }

    #[test]
    fn test_skips_header_without_title() {
        let content = "#EXTINF:-1 tvg-id=\"x\"\nhttp://example.com/stream\n#EXTINF:-1,\nhttp://example.com/other\n";
        assert!(parse_m3u(content.lines()).is_empty());
    }

    #[test]
    fn test_url_without_header_is_ignored() {
        let content = "http://example.com/orphan\n#EXTINF:-1,Channel\nhttp://example.com/stream\n";
        let entries = parse_m3u(content.lines());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "http://example.com/stream");
    }
}
