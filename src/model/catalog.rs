//! Song catalog loading and lookup

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One catalog entry. Immutable once loaded.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub video_url: String,
    pub backing_url: String,
    pub vocal_url: String,
}

/// The song catalog: ordered for display, keyed by id for lookup.
/// Read-only after load.
pub struct Catalog {
    songs: Vec<Song>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Read and parse the catalog file. A missing or malformed catalog
    /// is an unrecoverable startup failure.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        Self::from_json(&data)
            .with_context(|| format!("failed to parse catalog {}", path.display()))
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let songs: Vec<Song> = serde_json::from_str(data).context("catalog is not a JSON array of songs")?;
        Ok(Self::new(songs))
    }

    fn new(songs: Vec<Song>) -> Self {
        let mut by_id = HashMap::with_capacity(songs.len());
        for (index, song) in songs.iter().enumerate() {
            if by_id.contains_key(&song.id) {
                // First occurrence wins, matching lookup order in a list.
                tracing::warn!(id = %song.id, "Duplicate song id in catalog, keeping the first");
                continue;
            }
            by_id.insert(song.id.clone(), index);
        }
        Self { songs, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&Song> {
        self.by_id.get(id).map(|&index| &self.songs[index])
    }

    /// Case-insensitive substring match over title and artist.
    /// An empty keyword returns the whole catalog.
    pub fn search(&self, keyword: &str) -> Vec<Song> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return self.songs.clone();
        }
        self.songs
            .iter()
            .filter(|s| format!("{}{}", s.title, s.artist).to_lowercase().contains(&keyword))
            .cloned()
            .collect()
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {"id": "001", "title": "Moon River", "artist": "Audrey",
         "videoUrl": "media/001/mv.mp4", "backingUrl": "media/001/backing.mp3", "vocalUrl": "media/001/vocal.mp3"},
        {"id": "002", "title": "City Lights", "artist": "Neon Choir",
         "videoUrl": "media/002/mv.mp4", "backingUrl": "media/002/backing.mp3", "vocalUrl": "media/002/vocal.mp3"},
        {"id": "001", "title": "Moon River (remaster)", "artist": "Audrey",
         "videoUrl": "media/003/mv.mp4", "backingUrl": "media/003/backing.mp3", "vocalUrl": "media/003/vocal.mp3"}
    ]"#;

    #[test]
    fn parses_camel_case_source_fields() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.len(), 3);
        let song = catalog.get("002").unwrap();
        assert_eq!(song.backing_url, "media/002/backing.mp3");
        assert_eq!(song.vocal_url, "media/002/vocal.mp3");
    }

    #[test]
    fn duplicate_ids_resolve_to_first_occurrence() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.get("001").unwrap().title, "Moon River");
    }

    #[test]
    fn unknown_id_is_none() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert!(catalog.get("999").is_none());
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_artist() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.search("moon").len(), 2);
        assert_eq!(catalog.search("NEON").len(), 1);
        assert!(catalog.search("nothing here").is_empty());
    }

    #[test]
    fn empty_search_returns_everything() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.search("  ").len(), 3);
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        assert!(Catalog::from_json("{\"not\": \"an array\"}").is_err());
        assert!(Catalog::from_json("[{\"id\": \"x\"}]").is_err());
    }
}
