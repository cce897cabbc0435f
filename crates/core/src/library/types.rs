//! Types for a user's shelf of works.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of media a work belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Book,
    Movie,
    Series,
}

impl MediaKind {
    pub const ALL: [MediaKind; 3] = [MediaKind::Book, MediaKind::Movie, MediaKind::Series];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Book => "book",
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "book" => Ok(MediaKind::Book),
            "movie" => Ok(MediaKind::Movie),
            "series" | "tv" => Ok(MediaKind::Series),
            other => Err(format!("unknown media kind: {}", other)),
        }
    }
}

/// Fixed set of genres a work can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Genre {
    Fiction,
    Romance,
    Fantasy,
    Mystery,
    Horror,
    Adventure,
    Biography,
    History,
    Science,
    Comedy,
    Drama,
    Action,
    Documentary,
    #[default]
    Other,
}

impl Genre {
    pub const ALL: [Genre; 14] = [
        Genre::Fiction,
        Genre::Romance,
        Genre::Fantasy,
        Genre::Mystery,
        Genre::Horror,
        Genre::Adventure,
        Genre::Biography,
        Genre::History,
        Genre::Science,
        Genre::Comedy,
        Genre::Drama,
        Genre::Action,
        Genre::Documentary,
        Genre::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::Romance => "Romance",
            Genre::Fantasy => "Fantasy",
            Genre::Mystery => "Mystery",
            Genre::Horror => "Horror",
            Genre::Adventure => "Adventure",
            Genre::Biography => "Biography",
            Genre::History => "History",
            Genre::Science => "Science",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Action => "Action",
            Genre::Documentary => "Documentary",
            Genre::Other => "Other",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown genre: {}", s))
    }
}

/// A cataloged book, movie or series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Work {
    /// Locally generated identifier (`work-<uuid>`).
    pub id: String,
    /// Identifier in the provider the work was imported from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub title: String,
    pub kind: MediaKind,
    #[serde(default)]
    pub genre: Genre,
    #[serde(default)]
    pub description: String,
    /// Cover/poster URL or data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub wishlisted: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl Work {
    /// Provider key used for duplicate detection, if this work came from one.
    pub fn external_key(&self) -> Option<(&str, MediaKind)> {
        self.external_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| (id, self.kind))
    }
}

/// Input for adding a work: everything except `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWork {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub title: String,
    pub kind: MediaKind,
    #[serde(default)]
    pub genre: Genre,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub wishlisted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl NewWork {
    /// A manually entered work with default flags.
    pub fn manual(title: impl Into<String>, kind: MediaKind, genre: Genre) -> Self {
        Self {
            external_id: None,
            title: title.into(),
            kind,
            genre,
            description: String::new(),
            image: None,
            liked: false,
            wishlisted: false,
            release_date: None,
            rating: None,
        }
    }

    pub(crate) fn into_work(self, id: String, created_at: DateTime<Utc>) -> Work {
        Work {
            id,
            external_id: self.external_id,
            title: self.title,
            kind: self.kind,
            genre: self.genre,
            description: self.description,
            image: self.image,
            liked: self.liked,
            wishlisted: self.wishlisted,
            created_at,
            release_date: self.release_date,
            rating: self.rating,
        }
    }
}

/// Partial update for a work. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<Genre>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wishlisted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl WorkPatch {
    pub fn is_empty(&self) -> bool {
        *self == WorkPatch::default()
    }

    pub(crate) fn apply(self, work: &mut Work) {
        if let Some(v) = self.external_id {
            work.external_id = Some(v);
        }
        if let Some(v) = self.title {
            work.title = v;
        }
        if let Some(v) = self.kind {
            work.kind = v;
        }
        if let Some(v) = self.genre {
            work.genre = v;
        }
        if let Some(v) = self.description {
            work.description = v;
        }
        if let Some(v) = self.image {
            work.image = Some(v);
        }
        if let Some(v) = self.liked {
            work.liked = v;
        }
        if let Some(v) = self.wishlisted {
            work.wishlisted = v;
        }
        if let Some(v) = self.release_date {
            work.release_date = Some(v);
        }
        if let Some(v) = self.rating {
            work.rating = Some(v);
        }
    }
}

/// Result of an add attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The work was appended to the shelf.
    Added(Work),
    /// A work with the same provider id and kind is already on the shelf.
    /// Nothing changed.
    Duplicate(Work),
}

impl AddOutcome {
    pub fn work(&self) -> &Work {
        match self {
            AddOutcome::Added(w) | AddOutcome::Duplicate(w) => w,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }
}

/// Edit refused because another work already holds the provider id and
/// kind the patch would produce.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyConflict {
    pub existing: Box<Work>,
}

/// Which subset of the shelf to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShelfView {
    #[default]
    All,
    Liked,
    Wishlist,
}

/// Filter over a user's works.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryQuery {
    /// Case-insensitive substring matched against title or description.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub kind: Option<MediaKind>,
    #[serde(default)]
    pub genre: Option<Genre>,
    #[serde(default)]
    pub view: ShelfView,
}

impl LibraryQuery {
    pub fn matches(&self, work: &Work) -> bool {
        let view_ok = match self.view {
            ShelfView::All => true,
            ShelfView::Liked => work.liked,
            ShelfView::Wishlist => work.wishlisted,
        };
        if !view_ok {
            return false;
        }
        if self.kind.is_some_and(|k| k != work.kind) {
            return false;
        }
        if self.genre.is_some_and(|g| g != work.genre) {
            return false;
        }
        match self.text.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(text) => {
                let needle = text.to_lowercase();
                work.title.to_lowercase().contains(&needle)
                    || work.description.to_lowercase().contains(&needle)
            }
        }
    }
}
