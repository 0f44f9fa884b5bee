//! Favorite move names, persisted as a JSON array

use std::collections::BTreeSet;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FavoritesError;

pub const FAVORITES_FILE: &str = "dd_move_favorites_v1.json";

/// Favorites are keyed by move name, so moves sharing a name share a star.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Favorites(BTreeSet<String>);

impl Favorites {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Flip membership; returns whether `name` is now a favorite.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.0.remove(name) {
            false
        } else {
            self.0.insert(name.to_string());
            true
        }
    }

    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn encode(&self) -> Result<String, FavoritesError> {
        Ok(serde_json::to_string(&self.0)?)
    }

    pub fn decode(json: &str) -> Result<Self, FavoritesError> {
        let names: Vec<String> = serde_json::from_str(json)?;
        Ok(Self(names.into_iter().collect()))
    }
}

impl FromIterator<String> for Favorites {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub fn default_path(base: Option<&Path>) -> PathBuf {
    let base = base
        .map(Path::to_path_buf)
        .or_else(|| dirs_next::data_local_dir().map(|dir| dir.join("dexbook")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(FAVORITES_FILE)
}

/// Read the persisted set. A missing file is an empty set.
pub async fn load(path: &Path) -> Result<Favorites, FavoritesError> {
    let json = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Favorites::default()),
        Err(source) => {
            return Err(FavoritesError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    Favorites::decode(&json)
}

static SAVE_LOCK: Mutex<()> = Mutex::new(());

/// Overwrite the persisted set wholesale.
///
/// Saves run one at a time and replace the file by renaming a fully written sibling.
pub async fn save(path: &Path, favorites: &Favorites) -> Result<(), FavoritesError> {
    let json = favorites.encode()?;
    let target = path.to_path_buf();
    let written = tokio::task::spawn_blocking(move || replace_file(&target, json.as_bytes()))
        .await
        .map_err(io::Error::other)
        .and_then(|result| result);
    written.map_err(|source| FavoritesError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn replace_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let _guard = SAVE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);
    std::fs::write(&staging, contents)?;
    std::fs::rename(&staging, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores() {
        let mut favs: Favorites = ["Tackle".to_string()].into_iter().collect();
        let before = favs.clone();
        assert!(favs.toggle("Ember"));
        assert!(favs.contains("Ember"));
        assert!(!favs.toggle("Ember"));
        assert_eq!(favs, before);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let favs: Favorites = ["Tackle", "Fireball", "Ember"]
            .into_iter()
            .map(String::from)
            .collect();
        let json = favs.encode().unwrap();
        assert_eq!(json, r#"["Ember","Fireball","Tackle"]"#);
        assert_eq!(Favorites::decode(&json).unwrap(), favs);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            Favorites::decode("{not json"),
            Err(FavoritesError::Corrupted(_))
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let favs = load(&dir.path().join("nope.json")).await.unwrap();
        assert!(favs.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FAVORITES_FILE);
        let favs: Favorites = ["Tackle", "Ember"].into_iter().map(String::from).collect();
        save(&path, &favs).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            favs.encode().unwrap()
        );
        assert_eq!(load(&path).await.unwrap(), favs);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancelled_save_never_tears_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FAVORITES_FILE);
        let long: Favorites = (0..2000).map(|n| format!("Move number {n}")).collect();
        let empty = Favorites::default();

        for _ in 0..50 {
            let first = {
                let path = path.clone();
                let long = long.clone();
                tokio::spawn(async move { save(&path, &long).await })
            };
            tokio::task::yield_now().await;
            first.abort();
            save(&path, &empty).await.unwrap();

            let reloaded = load(&path).await.unwrap();
            assert!(reloaded == empty || reloaded == long);
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let settled = load(&path).await.unwrap();
        assert!(settled == empty || settled == long);
    }

    #[test]
    fn test_default_path_uses_base() {
        let path = default_path(Some(Path::new("/tmp/dexbook")));
        assert_eq!(path, PathBuf::from("/tmp/dexbook").join(FAVORITES_FILE));
    }
}
