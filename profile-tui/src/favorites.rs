use std::path::PathBuf;

use profile_core::FavoritesSnapshot;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::{AppEvent, components::RecipeCard};

/// A favorite recipe as stored in the favorites file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
}

impl RecipeCard for Recipe {
    fn title(&self) -> &str {
        &self.name
    }

    fn caption(&self) -> Option<String> {
        match (&self.category, &self.area) {
            (Some(category), Some(area)) => Some(format!("{category} • {area}")),
            (Some(single), None) | (None, Some(single)) => Some(single.clone()),
            (None, None) => None,
        }
    }
}

/// Load the favorites file in the background.
///
/// The page starts out in the loading state; exactly one
/// [`AppEvent::FavoritesLoaded`] is sent when reading finishes. Without a
/// configured file the collection is simply empty.
pub fn spawn_favorites_load(
    path: Option<PathBuf>,
    events: UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        let snapshot = match path {
            Some(path) => load_favorites(path).await,
            None => FavoritesSnapshot::loaded(Vec::new()),
        };
        if events.send(AppEvent::FavoritesLoaded(snapshot)).is_err() {
            log::debug!("Favorites loaded after the page was closed");
        }
    });
}

async fn load_favorites(path: PathBuf) -> FavoritesSnapshot<Recipe> {
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) => {
            log::error!("Failed to read {}: {}", path.display(), e);
            return FavoritesSnapshot::failed(format!(
                "Could not read favorites: {e}"
            ));
        }
    };

    match serde_json::from_str::<Vec<Recipe>>(&content) {
        Ok(recipes) => {
            log::info!("Loaded {} favorite recipes", recipes.len());
            FavoritesSnapshot::loaded(recipes)
        }
        Err(e) => {
            log::error!("Failed to parse {}: {}", path.display(), e);
            FavoritesSnapshot::failed(format!("Invalid favorites file: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;
    use tokio::sync::mpsc::unbounded_channel;

    async fn load(path: Option<PathBuf>) -> FavoritesSnapshot<Recipe> {
        let (tx, mut rx) = unbounded_channel();
        spawn_favorites_load(path, tx);
        match rx.recv().await {
            Some(AppEvent::FavoritesLoaded(snapshot)) => snapshot,
            _ => panic!("expected favorites"),
        }
    }

    #[tokio::test]
    async fn test_no_file_means_no_favorites() {
        assert_eq!(load(None).await, FavoritesSnapshot::loaded(Vec::new()));
    }

    #[tokio::test]
    async fn test_recipes_keep_file_order() {
        let temp_dir = TempDir::new("favorites").unwrap();
        let path = temp_dir.path().join("favorites.json");
        std::fs::write(
            &path,
            r#"[{"id":"2","name":"Soto"},{"id":"1","name":"Rendang","category":"Beef","area":"Indonesian"}]"#,
        )
        .unwrap();

        let snapshot = load(Some(path)).await;
        let names: Vec<&str> =
            snapshot.favorites.iter().map(|r| r.title()).collect();
        assert_eq!(names, vec!["Soto", "Rendang"]);
        assert_eq!(
            snapshot.favorites[1].caption().as_deref(),
            Some("Beef • Indonesian")
        );
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_reported() {
        let temp_dir = TempDir::new("favorites").unwrap();
        let snapshot = load(Some(temp_dir.path().join("missing.json"))).await;
        assert!(snapshot.error.unwrap().starts_with("Could not read favorites"));

        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{").unwrap();
        let snapshot = load(Some(path)).await;
        assert!(snapshot.error.unwrap().starts_with("Invalid favorites file"));
    }
}
