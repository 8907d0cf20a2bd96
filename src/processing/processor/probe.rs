use std::process::Stdio;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::debug;
use tokio::time::timeout;

use crate::model::config::ProbeConfig;
use crate::model::playlist::PlaylistEntry;
use crate::model::stats::ProbeStats;

/// Runs the configured media-inspection command against one stream url.
/// Spawn failure, non-zero exit and timeout all count as "not live".
pub async fn probe_stream(probe: &ProbeConfig, url: &str) -> bool {
    let child = tokio::process::Command::new(&probe.command)
        .args(&probe.args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn();
    let mut child = match child {
        Ok(child) => child,
        Err(err) => {
            debug!("cant spawn probe command {}: {err}", probe.command);
            return false;
        }
    };
    match timeout(Duration::from_secs(probe.timeout_secs), child.wait()).await {
        Ok(Ok(status)) => status.success(),
        Ok(Err(err)) => {
            debug!("probe failed for {url}: {err}");
            false
        }
        // timed out, the child is killed on drop
        Err(_) => false,
    }
}

/// Probes all entries with bounded concurrency and keeps the live ones.
/// Results are mapped back by index, so the input order survives no matter
/// in which order the probes complete.
pub async fn probe_playlist(entries: Vec<PlaylistEntry>, probe: &ProbeConfig) -> (Vec<PlaylistEntry>, ProbeStats) {
    let checked = entries.len();
    let results: Vec<(usize, bool)> = stream::iter(entries.iter().enumerate())
        .map(|(idx, entry)| async move { (idx, probe_stream(probe, &entry.url).await) })
        .buffer_unordered(probe.concurrency)
        .collect()
        .await;
    let mut live_flags = vec![false; checked];
    for (idx, live) in results {
        live_flags[idx] = live;
    }
    let live: Vec<PlaylistEntry> = entries.into_iter()
        .zip(live_flags)
        .filter_map(|(entry, live)| live.then_some(entry))
        .collect();
    let stats = ProbeStats { checked, active: live.len() };
    (live, stats)
}
