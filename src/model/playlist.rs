/// A single channel entry parsed from an m3u document.
///
/// `title_key` is the lowercased title and is used for matching and sorting
/// only; `title` keeps the original casing for the channel name list.
/// Entries are never mutated after creation, only regrouped and reordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub extinf: String,
    pub title: String,
    pub title_key: String,
    pub url: String,
}

impl PlaylistEntry {
    pub fn new(extinf: String, title: String, url: String) -> Self {
        let title_key = title.to_lowercase();
        Self { extinf, title, title_key, url }
    }

    /// Identity for deduplication: exact (lowercased title, url) pair.
    pub fn key(&self) -> (String, String) {
        (self.title_key.clone(), self.url.clone())
    }

    pub fn to_m3u(&self) -> String {
        format!("{}\n{}", self.extinf, self.url)
    }
}
