use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexSet;
use log::{error, info};

use crate::create_m3u_combiner_error_result;
use crate::m3u_combiner_error::{M3uCombinerError, M3uCombinerErrorKind};
use crate::model::config::Config;
use crate::model::playlist::PlaylistEntry;
use crate::model::stats::ProcessStats;
use crate::processing::parser::m3u::parse_m3u;
use crate::processing::processor::{probe, sort};
use crate::repository::m3u_repository::{write_channel_names, write_m3u_playlist, write_pipe_playlist};
use crate::utils::request::{get_input_text_content, sanitize_sensitive_info};

pub fn is_blocked(title_key: &str, blocked_terms: &[String]) -> bool {
    blocked_terms.iter().any(|term| title_key.contains(term.as_str()))
}

pub fn filter_playlist(entries: Vec<PlaylistEntry>, blocked_terms: &[String]) -> Vec<PlaylistEntry> {
    entries.into_iter().filter(|entry| !is_blocked(&entry.title_key, blocked_terms)).collect()
}

/// Keeps the first entry per (lowercased title, url) key, in discovery order.
/// Applying it twice yields the same result as once.
pub fn dedup_playlist(entries: Vec<PlaylistEntry>) -> Vec<PlaylistEntry> {
    let mut seen: IndexSet<(String, String)> = IndexSet::with_capacity(entries.len());
    entries.into_iter().filter(|entry| seen.insert(entry.key())).collect()
}

/// The whole pipeline: fetch and parse every source, drop blocked titles,
/// optionally keep only live streams, dedup, order and write the outputs.
/// A failing source is logged and skipped, it never aborts the run.
pub async fn process_playlist(cfg: &Config, sources: &[String], priorities: &[String]) -> Result<ProcessStats, M3uCombinerError> {
    let client = match reqwest::Client::builder().timeout(Duration::from_secs(cfg.fetch_timeout_secs)).build() {
        Ok(client) => Arc::new(client),
        Err(err) => return create_m3u_combiner_error_result!(M3uCombinerErrorKind::Fetch, "cant create http client: {err}"),
    };

    let mut stats = ProcessStats { source_count: sources.len(), ..ProcessStats::default() };
    let mut candidates: Vec<PlaylistEntry> = Vec::new();
    for source in sources {
        match get_input_text_content(Arc::clone(&client), &cfg.working_dir, source).await {
            Ok(content) => {
                let entries = parse_m3u(content.lines());
                let raw = entries.len();
                let kept = filter_playlist(entries, &cfg.t_blocked_terms);
                stats.raw_count += raw;
                stats.blocked_count += raw - kept.len();
                candidates.extend(kept);
            }
            Err(err) => {
                error!("cant fetch source {}: {err}", sanitize_sensitive_info(source));
                stats.error_count += 1;
            }
        }
    }

    let candidates = if cfg.probe.enabled {
        let (live, probe_stats) = probe::probe_playlist(candidates, &cfg.probe).await;
        info!("checked {}, {} active", probe_stats.checked, probe_stats.active);
        stats.probe = Some(probe_stats);
        live
    } else {
        candidates
    };

    let ordered = sort::order_playlist(dedup_playlist(candidates), priorities, cfg.sort.match_as_ascii);
    stats.kept_count = ordered.len();

    write_m3u_playlist(cfg, &ordered)?;
    if let Some(pipe_playlist) = &cfg.output.pipe_playlist {
        write_pipe_playlist(cfg, pipe_playlist, &ordered)?;
    }
    write_channel_names(cfg, &ordered)?;
    info!("{stats}");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::{dedup_playlist, filter_playlist, is_blocked, process_playlist};
    use crate::model::config::Config;
    use crate::model::playlist::PlaylistEntry;

    fn entry(title: &str, url: &str) -> PlaylistEntry {
        PlaylistEntry::new(format!("#EXTINF:-1,{title}"), title.to_string(), url.to_string())
    }

    fn terms(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_blocked_terms_filter() {
        let entries = vec![
            entry("beIN Sports HD", "u1"),
            entry("ESPN US", "u2"),
            entry("France 24", "u3"),
        ];
        let kept = filter_playlist(entries, &terms(&["sport", "espn"]));
        let titles: Vec<&str> = kept.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["France 24"]);
    }

    #[test]
    fn test_is_blocked_matches_substrings() {
        let blocked = terms(&["sport"]);
        assert!(is_blocked("bein sports hd", &blocked));
        assert!(!is_blocked("france 24", &blocked));
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let entries = vec![
            entry("CNN US", "u1"),
            entry("BBC UK", "u2"),
            entry("CNN US", "u1"),
        ];
        let deduped = dedup_playlist(entries);
        assert_eq!(deduped.len(), 2);
        let titles: Vec<&str> = deduped.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["CNN US", "BBC UK"]);
    }

    #[test]
    fn test_dedup_keeps_same_title_with_different_urls() {
        let entries = vec![
            entry("CNN US", "u1"),
            entry("CNN US", "u2"),
        ];
        assert_eq!(dedup_playlist(entries).len(), 2);
    }

    #[tokio::test]
    async fn test_process_playlist_with_local_sources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.m3u"),
            "#EXTM3U\n\
             #EXTINF:-1,ESPN US\nhttp://example.com/espn\n\
             #EXTINF:-1,USA Today\nhttp://example.com/usa\n\
             #EXTINF:-1,Fox\nhttp://example.com/fox\n").unwrap();
        std::fs::write(dir.path().join("b.m3u"),
            "#EXTINF:-1,USA Today\nhttp://example.com/usa\n\
             #EXTINF:-1,BBC UK\nhttp://example.com/bbc\n").unwrap();
        let mut cfg = Config {
            working_dir: dir.path().to_string_lossy().to_string(),
            blocked_terms: vec![String::from("espn")],
            ..Config::default()
        };
        cfg.prepare().unwrap();

        let sources = vec![String::from("a.m3u"), String::from("missing.m3u"), String::from("b.m3u")];
        let priorities = vec![String::from("usa"), String::from("bbc")];
        let stats = process_playlist(&cfg, &sources, &priorities).await.unwrap();
        assert_eq!(stats.error_count, 1);
        assert_eq!(stats.raw_count, 5);
        assert_eq!(stats.blocked_count, 1);
        assert_eq!(stats.kept_count, 3);

        let playlist = std::fs::read_to_string(dir.path().join("cleaned.m3u")).unwrap();
        let lines: Vec<&str> = playlist.lines().collect();
        assert_eq!(lines[0], format!("#EXTM3U url-tvg=\"{}\"", cfg.epg_url));
        assert_eq!(lines[1], "#EXTINF:-1,USA Today");
        assert_eq!(lines[3], "#EXTINF:-1,BBC UK");
        assert_eq!(lines[5], "#EXTINF:-1,Fox");

        let channels = std::fs::read_to_string(dir.path().join("channels.txt")).unwrap();
        assert_eq!(channels, "BBC UK\nFox\nUSA Today\n");
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let entries = vec![
            entry("CNN US", "u1"),
            entry("BBC UK", "u2"),
            entry("CNN US", "u1"),
            entry("cnn us", "u1"),
        ];
        let once = dedup_playlist(entries);
        let twice = dedup_playlist(once.clone());
        assert_eq!(once, twice);
    }
}
