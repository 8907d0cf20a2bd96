use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use crate::create_m3u_combiner_error_result;
use crate::m3u_combiner_error::{M3uCombinerError, M3uCombinerErrorKind};
use crate::model::config::Config;
use crate::model::playlist::PlaylistEntry;
use crate::utils::file_utils;

const URL_PLACEHOLDER: &str = "{url}";

macro_rules! cant_write_result {
    ($path:expr, $err:expr) => {
        create_m3u_combiner_error_result!(M3uCombinerErrorKind::Io,
            "failed to write {}: {}", $path.to_string_lossy(), $err)
    }
}

fn output_path(cfg: &Config, filename: &str) -> PathBuf {
    file_utils::get_file_path(&cfg.working_dir, Some(PathBuf::from(filename)))
        .unwrap_or_else(|| PathBuf::from(filename))
}

fn write_playlist_document(path: &Path, epg_url: &str, ordered: &[PlaylistEntry], pipe_template: Option<&str>) -> Result<(), M3uCombinerError> {
    let file = match File::create(path) {
        Ok(file) => file,
        Err(err) => return cant_write_result!(path, err),
    };
    let mut writer = file_utils::file_writer(file);
    if let Err(err) = writeln!(writer, "#EXTM3U url-tvg=\"{epg_url}\"") {
        return cant_write_result!(path, err);
    }
    for entry in ordered {
        let written = match pipe_template {
            Some(template) => writeln!(writer, "{}\n{}", entry.extinf, template.replace(URL_PLACEHOLDER, &entry.url)),
            None => writeln!(writer, "{}", entry.to_m3u()),
        };
        if let Err(err) = written {
            return cant_write_result!(path, err);
        }
    }
    if let Err(err) = writer.flush() {
        return cant_write_result!(path, err);
    }
    Ok(())
}

/// Writes the combined playlist in the order handed in, nothing is filtered
/// or reordered here.
pub fn write_m3u_playlist(cfg: &Config, ordered: &[PlaylistEntry]) -> Result<(), M3uCombinerError> {
    let path = output_path(cfg, &cfg.output.playlist);
    write_playlist_document(&path, &cfg.epg_url, ordered, None)
}

/// Same document, but every stream url is wrapped into the configured
/// repackaging command invocation.
pub fn write_pipe_playlist(cfg: &Config, filename: &str, ordered: &[PlaylistEntry]) -> Result<(), M3uCombinerError> {
    let path = output_path(cfg, filename);
    write_playlist_document(&path, &cfg.epg_url, ordered, Some(&cfg.output.pipe_template))
}

/// Writes the distinct original-case channel names, sorted case-insensitively.
pub fn write_channel_names(cfg: &Config, ordered: &[PlaylistEntry]) -> Result<(), M3uCombinerError> {
    let path = output_path(cfg, &cfg.output.channels);
    let mut names: Vec<&str> = ordered.iter()
        .map(|entry| entry.title.as_str())
        .collect::<IndexSet<&str>>()
        .into_iter()
        .collect();
    names.sort_by_key(|name| name.to_lowercase());
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(err) => return cant_write_result!(path, err),
    };
    let mut writer = file_utils::file_writer(file);
    for name in names {
        if let Err(err) = writeln!(writer, "{name}") {
            return cant_write_result!(path, err);
        }
    }
    if let Err(err) = writer.flush() {
        return cant_write_result!(path, err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{write_channel_names, write_m3u_playlist, write_pipe_playlist};
    use crate::model::config::Config;
    use crate::model::playlist::PlaylistEntry;

    fn entry(title: &str, url: &str) -> PlaylistEntry {
        PlaylistEntry::new(format!("#EXTINF:-1,{title}"), title.to_string(), url.to_string())
    }

    fn config_in(dir: &Path) -> Config {
        let mut cfg = Config {
            working_dir: dir.to_string_lossy().to_string(),
            epg_url: String::from("http://example.com/epg.xml.gz"),
            ..Config::default()
        };
        cfg.output.pipe_playlist = Some(String::from("pipe.m3u"));
        cfg.output.pipe_template = String::from("pipe://tool -i {url} pipe:1");
        cfg.prepare().unwrap();
        cfg
    }

    #[test]
    fn test_write_m3u_playlist_keeps_order_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path());
        let ordered = vec![entry("B", "http://example.com/b"), entry("A", "http://example.com/a")];
        write_m3u_playlist(&cfg, &ordered).unwrap();
        let content = std::fs::read_to_string(dir.path().join("cleaned.m3u")).unwrap();
        assert_eq!(content,
            "#EXTM3U url-tvg=\"http://example.com/epg.xml.gz\"\n\
             #EXTINF:-1,B\nhttp://example.com/b\n\
             #EXTINF:-1,A\nhttp://example.com/a\n");
    }

    #[test]
    fn test_write_pipe_playlist_wraps_urls() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path());
        let ordered = vec![entry("A", "http://example.com/a")];
        write_pipe_playlist(&cfg, "pipe.m3u", &ordered).unwrap();
        let content = std::fs::read_to_string(dir.path().join("pipe.m3u")).unwrap();
        assert!(content.contains("pipe://tool -i http://example.com/a pipe:1"));
        assert!(!content.contains("{url}"));
    }

    #[test]
    fn test_write_channel_names_sorted_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path());
        let ordered = vec![
            entry("zdf", "u1"),
            entry("ARD", "u2"),
            entry("arte", "u3"),
            entry("ARD", "u4"),
        ];
        write_channel_names(&cfg, &ordered).unwrap();
        let content = std::fs::read_to_string(dir.path().join("channels.txt")).unwrap();
        assert_eq!(content, "ARD\narte\nzdf\n");
    }
}
