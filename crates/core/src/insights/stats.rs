use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::library::{Genre, MediaKind, Work};

/// Number of genres reported in [`LibraryStats::top_genres`].
pub const TOP_GENRES: usize = 5;

/// One slice of the genre breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: Genre,
    pub count: usize,
    /// Share of this genre among the top genres, rounded to whole percent.
    pub percent: u8,
}

/// Summary of a collection for the statistics page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub total: usize,
    pub books: usize,
    pub movies: usize,
    pub series: usize,
    pub liked: usize,
    pub wishlisted: usize,
    /// Liked works as a percentage of all works, 0 when empty.
    pub like_rate: u8,
    pub top_genres: Vec<GenreCount>,
}

impl LibraryStats {
    pub fn compute(works: &[Work]) -> Self {
        let count_kind = |kind: MediaKind| works.iter().filter(|w| w.kind == kind).count();
        let liked = works.iter().filter(|w| w.liked).count();

        Self {
            total: works.len(),
            books: count_kind(MediaKind::Book),
            movies: count_kind(MediaKind::Movie),
            series: count_kind(MediaKind::Series),
            liked,
            wishlisted: works.iter().filter(|w| w.wishlisted).count(),
            like_rate: percent(liked, works.len()),
            top_genres: top_genres(works),
        }
    }
}

/// Genres ordered by count descending. Ties keep first-seen order.
fn top_genres(works: &[Work]) -> Vec<GenreCount> {
    let mut order: Vec<Genre> = Vec::new();
    let mut counts: HashMap<Genre, usize> = HashMap::new();
    for work in works {
        let entry = counts.entry(work.genre).or_insert(0);
        if *entry == 0 {
            order.push(work.genre);
        }
        *entry += 1;
    }

    let mut ranked: Vec<(Genre, usize)> = order.into_iter().map(|g| (g, counts[&g])).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP_GENRES);

    let shown: usize = ranked.iter().map(|(_, c)| c).sum();
    ranked
        .into_iter()
        .map(|(genre, count)| GenreCount {
            genre,
            count,
            percent: percent(count, shown),
        })
        .collect()
}

pub(crate) fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u8
}
