use std::io::BufRead;
use std::path::{Path, PathBuf};

use log::debug;

use crate::create_m3u_combiner_error_result;
use crate::m3u_combiner_error::{M3uCombinerError, M3uCombinerErrorKind};
use crate::model::config::Config;
use crate::utils::file_utils;

pub fn read_config(config_file: &str) -> Result<Config, M3uCombinerError> {
    let path = PathBuf::from(config_file);
    if !path.exists() {
        debug!("no config file found at {config_file}, using defaults");
        let mut cfg = Config::default();
        cfg.prepare()?;
        return Ok(cfg);
    }
    match file_utils::open_file(&path) {
        Ok(file) => {
            match serde_yaml::from_reader::<_, Config>(file_utils::file_reader(file)) {
                Ok(mut result) => {
                    result.prepare()?;
                    Ok(result)
                }
                Err(e) => {
                    create_m3u_combiner_error_result!(M3uCombinerErrorKind::Config, "cant read config file: {e}")
                }
            }
        }
        Err(err) => create_m3u_combiner_error_result!(M3uCombinerErrorKind::Config, "cant open config file {config_file}: {err}")
    }
}

/// Reads a plain list file: one entry per non-empty, non-comment line.
pub fn read_list_file(path: &Path) -> Result<Vec<String>, M3uCombinerError> {
    let file = match file_utils::open_file(path) {
        Ok(file) => file,
        Err(err) => return create_m3u_combiner_error_result!(M3uCombinerErrorKind::Config,
            "cant read list file {}: {err}", path.to_string_lossy()),
    };
    let mut entries = Vec::new();
    for line in file_utils::file_reader(file).lines() {
        match line {
            Ok(value) => {
                let value = value.trim();
                if value.is_empty() || value.starts_with('#') {
                    continue;
                }
                entries.push(value.to_string());
            }
            Err(err) => return create_m3u_combiner_error_result!(M3uCombinerErrorKind::Config,
                "cant read list file {}: {err}", path.to_string_lossy()),
        }
    }
    Ok(entries)
}

/// Priority terms match against lowercased titles, so the list is lowercased on read.
pub fn read_priority_list(path: &Path) -> Result<Vec<String>, M3uCombinerError> {
    Ok(read_list_file(path)?.into_iter().map(|term| term.to_lowercase()).collect())
}
