use log::warn;

use crate::create_m3u_combiner_error_result;
use crate::m3u_combiner_error::{M3uCombinerError, M3uCombinerErrorKind};
use crate::utils::default_utils::{default_as_false, default_as_ten_u64, default_as_ten_usize};
use crate::utils::file_utils::get_working_path;

const URL_PLACEHOLDER: &str = "{url}";

const DEFAULT_BLOCKED_TERMS: &[&str] = &["sport", "football", "soccer", "nba", "nfl", "espn",
    "tennis", "cricket", "boxing", "tsn", "golf", "news", "m4"];
const DEFAULT_EPG_URL: &str = "https://epgshare01.online/epgshare01/epg_ripper_ALL_SOURCES1.xml.gz";

fn default_blocked_terms() -> Vec<String> {
    DEFAULT_BLOCKED_TERMS.iter().map(ToString::to_string).collect()
}

fn default_epg_url() -> String { String::from(DEFAULT_EPG_URL) }

fn default_sources_file() -> String { String::from("links.txt") }

fn default_priority_file() -> String { String::from("order.txt") }

fn default_probe_command() -> String { String::from("ffprobe") }

fn default_probe_args() -> Vec<String> {
    ["-v", "error", "-show_entries", "format=format_name", "-of", "csv=p=0"]
        .iter().map(ToString::to_string).collect()
}

fn default_playlist_file() -> String { String::from("cleaned.m3u") }

fn default_channels_file() -> String { String::from("channels.txt") }

fn default_pipe_template() -> String {
    String::from("pipe://ffmpeg -loglevel fatal -i {url} -c copy -f mpegts pipe:1")
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortConfig {
    #[serde(default = "default_as_false")]
    pub match_as_ascii: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    #[serde(default = "default_as_false")]
    pub enabled: bool,
    #[serde(default = "default_probe_command")]
    pub command: String,
    #[serde(default = "default_probe_args")]
    pub args: Vec<String>,
    #[serde(default = "default_as_ten_u64")]
    pub timeout_secs: u64,
    #[serde(default = "default_as_ten_usize")]
    pub concurrency: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: default_probe_command(),
            args: default_probe_args(),
            timeout_secs: default_as_ten_u64(),
            concurrency: default_as_ten_usize(),
        }
    }
}

impl ProbeConfig {
    fn prepare(&mut self) -> Result<(), M3uCombinerError> {
        if self.command.trim().is_empty() {
            return create_m3u_combiner_error_result!(M3uCombinerErrorKind::Config, "probe command must not be empty");
        }
        if self.concurrency == 0 {
            warn!("probe concurrency 0 is not allowed, using {}", default_as_ten_usize());
            self.concurrency = default_as_ten_usize();
        }
        if self.timeout_secs == 0 {
            warn!("probe timeout 0 is not allowed, using {}s", default_as_ten_u64());
            self.timeout_secs = default_as_ten_u64();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_playlist_file")]
    pub playlist: String,
    #[serde(default)]
    pub pipe_playlist: Option<String>,
    #[serde(default = "default_pipe_template")]
    pub pipe_template: String,
    #[serde(default = "default_channels_file")]
    pub channels: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            playlist: default_playlist_file(),
            pipe_playlist: None,
            pipe_template: default_pipe_template(),
            channels: default_channels_file(),
        }
    }
}

impl OutputConfig {
    fn prepare(&self) -> Result<(), M3uCombinerError> {
        if self.playlist.trim().is_empty() {
            return create_m3u_combiner_error_result!(M3uCombinerErrorKind::Config, "output playlist filename must not be empty");
        }
        if self.channels.trim().is_empty() {
            return create_m3u_combiner_error_result!(M3uCombinerErrorKind::Config, "output channels filename must not be empty");
        }
        if self.pipe_playlist.is_some() && !self.pipe_template.contains(URL_PLACEHOLDER) {
            return create_m3u_combiner_error_result!(M3uCombinerErrorKind::Config,
                "pipe template must contain the {} placeholder", URL_PLACEHOLDER);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub working_dir: String,
    #[serde(default = "default_epg_url")]
    pub epg_url: String,
    #[serde(default = "default_sources_file")]
    pub sources_file: String,
    #[serde(default = "default_priority_file")]
    pub priority_file: String,
    #[serde(default = "default_blocked_terms")]
    pub blocked_terms: Vec<String>,
    #[serde(default = "default_as_ten_u64")]
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub sort: SortConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(skip)]
    pub t_blocked_terms: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            working_dir: String::new(),
            epg_url: default_epg_url(),
            sources_file: default_sources_file(),
            priority_file: default_priority_file(),
            blocked_terms: default_blocked_terms(),
            fetch_timeout_secs: default_as_ten_u64(),
            sort: SortConfig::default(),
            probe: ProbeConfig::default(),
            output: OutputConfig::default(),
            t_blocked_terms: Vec::new(),
        }
    }
}

impl Config {
    pub fn prepare(&mut self) -> Result<(), M3uCombinerError> {
        self.working_dir = get_working_path(&self.working_dir);
        if self.epg_url.trim().is_empty() {
            return create_m3u_combiner_error_result!(M3uCombinerErrorKind::Config, "epg_url must not be empty");
        }
        if self.fetch_timeout_secs == 0 {
            warn!("fetch timeout 0 is not allowed, using {}s", default_as_ten_u64());
            self.fetch_timeout_secs = default_as_ten_u64();
        }
        // matching is done against lowercased titles
        self.t_blocked_terms = self.blocked_terms.iter()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();
        self.probe.prepare()?;
        self.output.prepare()
    }
}
