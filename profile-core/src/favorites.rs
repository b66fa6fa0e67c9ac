//! Presentation gate over the externally owned favorites collection.

pub const FAVORITES_HEADING: &str = "My Favorite Recipes";
pub const FAVORITES_SUBTITLE: &str = "Recipes you have saved.";
pub const LOADING_MESSAGE: &str = "Loading favorite recipes...";
pub const FAILURE_HEADING: &str = "Something went wrong";
pub const EMPTY_MESSAGE: &str = "You have no favorite recipes yet.";
pub const EMPTY_HINT: &str = "Click the heart icon on a recipe to add it.";

/// What the favorites source currently reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesSnapshot<R> {
    pub favorites: Vec<R>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<R> FavoritesSnapshot<R> {
    pub fn loading() -> Self {
        Self {
            favorites: Vec::new(),
            loading: true,
            error: None,
        }
    }

    pub fn loaded(favorites: Vec<R>) -> Self {
        Self {
            favorites,
            loading: false,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            favorites: Vec::new(),
            loading: false,
            error: Some(error.into()),
        }
    }
}

impl<R> Default for FavoritesSnapshot<R> {
    fn default() -> Self {
        Self::loading()
    }
}

/// The one thing the favorites column shows.
#[derive(Debug, PartialEq, Eq)]
pub enum FavoritesPanel<'a, R> {
    Loading,
    Failed(&'a str),
    Empty,
    Grid(&'a [R]),
}

// manual impls: derives would require `R: Clone`
impl<R> Clone for FavoritesPanel<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FavoritesPanel<'_, R> {}

/// Loading beats error, error beats emptiness.
pub fn favorites_panel<R>(
    snapshot: &FavoritesSnapshot<R>,
) -> FavoritesPanel<'_, R> {
    if snapshot.loading {
        FavoritesPanel::Loading
    } else if let Some(error) = &snapshot.error {
        FavoritesPanel::Failed(error.as_str())
    } else if snapshot.favorites.is_empty() {
        FavoritesPanel::Empty
    } else {
        FavoritesPanel::Grid(&snapshot.favorites)
    }
}
