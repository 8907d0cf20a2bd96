use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use flate2::read::GzDecoder;
use regex::Regex;
use url::Url;

use crate::debug_if_enabled;
use crate::{create_m3u_combiner_error, create_m3u_combiner_error_result};
use crate::m3u_combiner_error::{M3uCombinerError, M3uCombinerErrorKind};
use crate::utils::file_utils;

static SENSITIVE_QUERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(username|password|token)=[^&]*").unwrap());

/// Masks credentials that some providers embed in playlist urls before they hit the log.
pub fn sanitize_sensitive_info(url: &str) -> String {
    SENSITIVE_QUERY.replace_all(url, "$1=***").into_owned()
}

// Gzip files start with the bytes 0x1F 0x8B
pub const fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1F && bytes[1] == 0x8B
}

fn text_from_bytes(bytes: &[u8]) -> Result<String, std::io::Error> {
    if is_gzip(bytes) {
        let mut decoder = GzDecoder::new(bytes);
        let mut content = String::new();
        decoder.read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

async fn download_text_content(client: Arc<reqwest::Client>, url: Url) -> Result<String, M3uCombinerError> {
    match client.get(url.clone()).send().await {
        Ok(response) => {
            if response.status().is_success() {
                match response.bytes().await {
                    Ok(bytes) => text_from_bytes(&bytes).map_err(|err|
                        create_m3u_combiner_error!(M3uCombinerErrorKind::Fetch,
                            "failed to read body of {}: {err}", sanitize_sensitive_info(url.as_str()))),
                    Err(err) => create_m3u_combiner_error_result!(M3uCombinerErrorKind::Fetch,
                        "failed to read body of {}: {err}", sanitize_sensitive_info(url.as_str())),
                }
            } else {
                create_m3u_combiner_error_result!(M3uCombinerErrorKind::Fetch,
                    "request failed with status {} for {}", response.status(), sanitize_sensitive_info(url.as_str()))
            }
        }
        Err(err) => create_m3u_combiner_error_result!(M3uCombinerErrorKind::Fetch,
            "request failed for {}: {err}", sanitize_sensitive_info(url.as_str()))
    }
}

fn get_local_file_content(file_path: &Path) -> Result<String, M3uCombinerError> {
    match std::fs::read(file_path) {
        Ok(bytes) => text_from_bytes(&bytes).map_err(|err|
            create_m3u_combiner_error!(M3uCombinerErrorKind::Fetch,
                "failed to read file {}: {err}", file_path.to_string_lossy())),
        Err(err) => create_m3u_combiner_error_result!(M3uCombinerErrorKind::Fetch,
            "failed to read file {}: {err}", file_path.to_string_lossy()),
    }
}

/// Resolves one playlist source: an http(s) url is downloaded, anything else
/// is treated as a file path relative to the working dir.
pub async fn get_input_text_content(client: Arc<reqwest::Client>, working_dir: &str, url_str: &str) -> Result<String, M3uCombinerError> {
    debug_if_enabled!("getting input text content for {}", sanitize_sensitive_info(url_str));
    if let Ok(url) = url_str.parse::<Url>() {
        download_text_content(client, url).await
    } else {
        match file_utils::get_file_path(working_dir, Some(PathBuf::from(url_str))) {
            Some(filepath) if filepath.exists() => get_local_file_content(&filepath),
            _ => create_m3u_combiner_error_result!(M3uCombinerErrorKind::Fetch, "cant read input {url_str}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::{is_gzip, sanitize_sensitive_info, text_from_bytes};

    #[test]
    fn test_sanitize_sensitive_info() {
        let url = "http://example.com/get.php?username=joe&password=secret&type=m3u";
        assert_eq!(sanitize_sensitive_info(url), "http://example.com/get.php?username=***&password=***&type=m3u");
    }

    #[test]
    fn test_text_from_gzip_bytes() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"#EXTM3U\n").unwrap();
        let compressed = encoder.finish().unwrap();
        assert!(is_gzip(&compressed));
        assert_eq!(text_from_bytes(&compressed).unwrap(), "#EXTM3U\n");
    }

    #[test]
    fn test_text_from_plain_bytes() {
        assert_eq!(text_from_bytes(b"#EXTM3U\n").unwrap(), "#EXTM3U\n");
    }
}
