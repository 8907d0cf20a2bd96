use std::borrow::Cow;

use deunicode::deunicode;

use crate::model::playlist::PlaylistEntry;
use crate::processing::processor::playlist::dedup_playlist;

fn folded(value: &str, match_as_ascii: bool) -> Cow<'_, str> {
    if match_as_ascii {
        Cow::Owned(deunicode(value))
    } else {
        Cow::Borrowed(value)
    }
}

/// Orders deduplicated candidates by the priority term list.
///
/// Each term claims, in pool order, every entry whose lowercased title
/// contains it; claimed entries leave the pool so a later term can never
/// claim them again. Each claimed group is deduplicated once more before it
/// is appended. Whatever no term claimed is appended sorted by title,
/// stable, so entries sharing a title keep their discovery order.
pub fn order_playlist(candidates: Vec<PlaylistEntry>, priorities: &[String], match_as_ascii: bool) -> Vec<PlaylistEntry> {
    let mut pool = candidates;
    let mut ordered = Vec::with_capacity(pool.len());
    for term in priorities {
        let needle = folded(term, match_as_ascii);
        let (claimed, rest): (Vec<PlaylistEntry>, Vec<PlaylistEntry>) = pool.into_iter()
            .partition(|entry| folded(&entry.title_key, match_as_ascii).contains(needle.as_ref()));
        pool = rest;
        ordered.extend(dedup_playlist(claimed));
    }
    pool.sort_by(|a, b| folded(&a.title_key, match_as_ascii).cmp(&folded(&b.title_key, match_as_ascii)));
    ordered.extend(pool);
    ordered
}
