use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::library::{Genre, MediaKind, User, Work};

const GENRE_WEIGHT: f64 = 0.7;
const KIND_WEIGHT: f64 = 0.3;
const FAVORITE_GENRES: usize = 3;

/// Bucketed affinity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffinityLevel {
    High,
    Good,
    Moderate,
}

impl AffinityLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            75.. => AffinityLevel::High,
            60..=74 => AffinityLevel::Good,
            _ => AffinityLevel::Moderate,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AffinityLevel::High => "High affinity",
            AffinityLevel::Good => "Good affinity",
            AffinityLevel::Moderate => "Moderate affinity",
        }
    }
}

impl fmt::Display for AffinityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Another user ranked by taste overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub user_id: String,
    pub name: String,
    pub initials: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub favorite_genres: Vec<Genre>,
    pub score: u8,
    pub level: AffinityLevel,
}

/// Works that define a user's taste: liked ones, or all if none are liked.
fn taste(works: &[Work]) -> Vec<&Work> {
    let liked: Vec<&Work> = works.iter().filter(|w| w.liked).collect();
    if liked.is_empty() {
        works.iter().collect()
    } else {
        liked
    }
}

fn jaccard<T: Eq + std::hash::Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Affinity between two collections on a 0..=100 scale.
///
/// Weighted Jaccard overlap of the genres and kinds of each side's taste.
pub fn affinity_score(mine: &[Work], theirs: &[Work]) -> u8 {
    let a = taste(mine);
    let b = taste(theirs);

    let genres = |ws: &[&Work]| ws.iter().map(|w| w.genre).collect::<HashSet<Genre>>();
    let kinds = |ws: &[&Work]| ws.iter().map(|w| w.kind).collect::<HashSet<MediaKind>>();

    let score = GENRE_WEIGHT * jaccard(&genres(&a), &genres(&b))
        + KIND_WEIGHT * jaccard(&kinds(&a), &kinds(&b));
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Most frequent genres in a user's taste, first-seen order on ties.
fn favorite_genres(works: &[Work]) -> Vec<Genre> {
    let mut counts: Vec<(Genre, usize)> = Vec::new();
    for work in taste(works) {
        match counts.iter_mut().find(|(g, _)| *g == work.genre) {
            Some((_, n)) => *n += 1,
            None => counts.push((work.genre, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(FAVORITE_GENRES)
        .map(|(g, _)| g)
        .collect()
}

/// Rank `others` by affinity with `me`, highest first.
pub fn suggest(me: &User, others: &[User]) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = others
        .iter()
        .map(|other| {
            let score = affinity_score(me.works.works(), other.works.works());
            Suggestion {
                user_id: other.id.clone(),
                name: other.name.clone(),
                initials: other.initials(),
                bio: other.bio.clone(),
                favorite_genres: favorite_genres(other.works.works()),
                score,
                level: AffinityLevel::from_score(score),
            }
        })
        .collect();
    suggestions.sort_by(|a, b| b.score.cmp(&a.score));
    suggestions
}
