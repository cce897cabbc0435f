//! Provider-neutral search results.

use serde::{Deserialize, Serialize};

use super::genres::map_genre;
use crate::library::{MediaKind, NewWork};

/// Maximum description length kept when importing a hit, in characters.
pub const DESCRIPTION_LIMIT: usize = 300;

/// Description used when a provider returns none.
pub const DESCRIPTION_FALLBACK: &str = "No description available.";

/// Raw genre information as each provider reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "values", rename_all = "snake_case")]
pub enum GenreHints {
    /// Free-text categories (Google Books).
    Categories(Vec<String>),
    /// Numeric genre ids (TMDB).
    TmdbIds(Vec<u32>),
}

impl Default for GenreHints {
    fn default() -> Self {
        GenreHints::Categories(Vec::new())
    }
}

/// One normalized search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogHit {
    pub external_id: String,
    pub kind: MediaKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default)]
    pub genre_hints: GenreHints,
}

impl CatalogHit {
    /// Build the work added when a user saves this hit. Saved hits start on
    /// the wishlist.
    pub fn into_new_work(self) -> NewWork {
        let genre = map_genre(&self.genre_hints);
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| truncate_description(d, DESCRIPTION_LIMIT))
            .unwrap_or_else(|| DESCRIPTION_FALLBACK.to_string());

        NewWork {
            external_id: Some(self.external_id),
            title: self.title,
            kind: self.kind,
            genre,
            description,
            image: self.image,
            liked: false,
            wishlisted: true,
            release_date: self.release_date,
            rating: self.rating,
        }
    }
}

/// Cut `text` to at most `limit` characters, never splitting a character.
pub fn truncate_description(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
