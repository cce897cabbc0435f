//! Mapping of provider genre data onto [`Genre`].

use super::GenreHints;
use crate::library::Genre;

/// TMDB genre ids (movie and TV lists) and the genre each maps to.
const TMDB_GENRES: &[(u32, Genre)] = &[
    // Movies
    (28, Genre::Action),
    (12, Genre::Adventure),
    (35, Genre::Comedy),
    (80, Genre::Mystery),
    (99, Genre::Documentary),
    (18, Genre::Drama),
    (14, Genre::Fantasy),
    (36, Genre::History),
    (27, Genre::Horror),
    (9648, Genre::Mystery),
    (10749, Genre::Romance),
    (878, Genre::Fiction),
    (53, Genre::Mystery),
    (10752, Genre::History),
    (37, Genre::Adventure),
    // TV
    (10759, Genre::Action),
    (10763, Genre::Documentary),
    (10765, Genre::Fantasy),
    (10766, Genre::Drama),
    (10768, Genre::History),
];

/// Lowercase keywords searched in book categories, most specific first.
const CATEGORY_KEYWORDS: &[(&str, Genre)] = &[
    ("science fiction", Genre::Fiction),
    ("romance", Genre::Romance),
    ("fantasy", Genre::Fantasy),
    ("mystery", Genre::Mystery),
    ("detective", Genre::Mystery),
    ("thriller", Genre::Mystery),
    ("crime", Genre::Mystery),
    ("horror", Genre::Horror),
    ("adventure", Genre::Adventure),
    ("biography", Genre::Biography),
    ("history", Genre::History),
    ("science", Genre::Science),
    ("technology", Genre::Science),
    ("mathematics", Genre::Science),
    ("humor", Genre::Comedy),
    ("comic", Genre::Comedy),
    ("drama", Genre::Drama),
    ("action", Genre::Action),
    ("fiction", Genre::Fiction),
];

/// First recognized hint wins; nothing recognized maps to `Other`.
pub fn map_genre(hints: &GenreHints) -> Genre {
    let mapped = match hints {
        GenreHints::TmdbIds(ids) => ids.iter().find_map(|id| tmdb_genre(*id)),
        GenreHints::Categories(categories) => categories.iter().find_map(|c| category_genre(c)),
    };
    mapped.unwrap_or(Genre::Other)
}

fn tmdb_genre(id: u32) -> Option<Genre> {
    TMDB_GENRES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, genre)| *genre)
}

fn category_genre(category: &str) -> Option<Genre> {
    let lower = category.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, genre)| *genre)
}
