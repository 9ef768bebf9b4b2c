use std::sync::{Arc, PoisonError, RwLock};

use super::model::Track;

/// Shared, read-mostly snapshot of every known track.
///
/// Readers take an `Arc` to the current sequence and never see a partial
/// update; writers build a complete replacement under the write lock and
/// swap it in. Tracks are kept ordered by title, the same order
/// [`TrackStore::load_all`](super::TrackStore::load_all) produces.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    current: Arc<RwLock<Arc<Vec<Track>>>>,
}

impl Catalog {
    pub fn new(mut tracks: Vec<Track>) -> Self {
        tracks.sort_by(|a, b| a.title.cmp(&b.title));
        Self {
            current: Arc::new(RwLock::new(Arc::new(tracks))),
        }
    }

    /// The current snapshot. Later publishes do not affect it.
    pub fn snapshot(&self) -> Arc<Vec<Track>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Insert a track at its ordered position, replacing any existing entry
    /// with the same title.
    pub fn publish(&self, track: Track) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        let mut next: Vec<Track> = current.as_ref().clone();
        match next.binary_search_by(|t| t.title.cmp(&track.title)) {
            Ok(i) => next[i] = track,
            Err(i) => next.insert(i, track),
        }

        *current = Arc::new(next);
    }
}
