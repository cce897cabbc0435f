//! Ordered collection of works with duplicate prevention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AddOutcome, KeyConflict, LibraryQuery, MediaKind, NewWork, Work, WorkPatch};

/// A user's works in insertion order.
///
/// Pure in-memory logic. Persistence and session handling live in
/// [`crate::shelf::Shelf`], which calls into this type on a draft copy and
/// only commits after the write succeeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    works: Vec<Work>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_works(works: Vec<Work>) -> Self {
        Self { works }
    }

    pub fn works(&self) -> &[Work] {
        &self.works
    }

    pub fn len(&self) -> usize {
        self.works.len()
    }

    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Work> {
        self.works.iter().find(|w| w.id == id)
    }

    /// Find the work imported from `external_id` with the given kind.
    /// Empty ids never match.
    pub fn find_external(&self, external_id: &str, kind: MediaKind) -> Option<&Work> {
        if external_id.is_empty() {
            return None;
        }
        self.works
            .iter()
            .find(|w| w.external_key() == Some((external_id, kind)))
    }

    /// Append a work unless its `(external_id, kind)` is already present.
    pub fn add(&mut self, new: NewWork, id: String, created_at: DateTime<Utc>) -> AddOutcome {
        if let Some(existing) = new
            .external_id
            .as_deref()
            .and_then(|ext| self.find_external(ext, new.kind))
        {
            return AddOutcome::Duplicate(existing.clone());
        }

        let work = new.into_work(id, created_at);
        self.works.push(work.clone());
        AddOutcome::Added(work)
    }

    /// Apply `patch` to the work with `id`. Returns the updated work, or
    /// `Ok(None)` if the id is unknown.
    ///
    /// A patch that would give the work the `(external_id, kind)` of another
    /// work is refused and nothing changes.
    pub fn edit(&mut self, id: &str, patch: WorkPatch) -> Result<Option<&Work>, KeyConflict> {
        let Some(index) = self.works.iter().position(|w| w.id == id) else {
            return Ok(None);
        };

        let mut updated = self.works[index].clone();
        patch.apply(&mut updated);
        if let Some((external_id, kind)) = updated.external_key() {
            if let Some(existing) = self
                .find_external(external_id, kind)
                .filter(|w| w.id != id)
            {
                return Err(KeyConflict {
                    existing: Box::new(existing.clone()),
                });
            }
        }

        self.works[index] = updated;
        Ok(Some(&self.works[index]))
    }

    /// Remove and return the work with `id`.
    pub fn remove(&mut self, id: &str) -> Option<Work> {
        let index = self.works.iter().position(|w| w.id == id)?;
        Some(self.works.remove(index))
    }

    /// Flip `liked`, returning the updated work.
    pub fn toggle_liked(&mut self, id: &str) -> Option<&Work> {
        let work = self.works.iter_mut().find(|w| w.id == id)?;
        work.liked = !work.liked;
        Some(&*work)
    }

    /// Flip `wishlisted`, returning the updated work.
    pub fn toggle_wishlisted(&mut self, id: &str) -> Option<&Work> {
        let work = self.works.iter_mut().find(|w| w.id == id)?;
        work.wishlisted = !work.wishlisted;
        Some(&*work)
    }

    pub fn clear(&mut self) {
        self.works.clear();
    }

    /// Works matching `query`, in insertion order.
    pub fn filter<'a>(&'a self, query: &'a LibraryQuery) -> impl Iterator<Item = &'a Work> + 'a {
        self.works.iter().filter(move |w| query.matches(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{Genre, ShelfView};

    fn movie(external_id: &str, title: &str) -> NewWork {
        NewWork {
            external_id: Some(external_id.to_string()),
            ..NewWork::manual(title, MediaKind::Movie, Genre::Drama)
        }
    }

    fn add(library: &mut Library, new: NewWork) -> AddOutcome {
        let id = format!("work-{}", library.len() + 1);
        library.add(new, id, Utc::now())
    }

    #[test]
    fn test_duplicate_external_id_is_ignored() {
        let mut library = Library::new();

        assert!(add(&mut library, movie("42", "A")).is_added());
        let second = add(&mut library, movie("42", "B"));

        assert!(matches!(second, AddOutcome::Duplicate(ref w) if w.title == "A"));
        assert_eq!(library.len(), 1);
        assert_eq!(library.works()[0].title, "A");
    }

    #[test]
    fn test_same_external_id_different_kind_is_allowed() {
        let mut library = Library::new();
        add(&mut library, movie("42", "Movie"));

        let series = NewWork {
            external_id: Some("42".to_string()),
            ..NewWork::manual("Series", MediaKind::Series, Genre::Drama)
        };
        assert!(add(&mut library, series).is_added());
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn test_manual_entries_bypass_uniqueness() {
        let mut library = Library::new();
        let a = add(
            &mut library,
            NewWork::manual("Dune", MediaKind::Book, Genre::Fiction),
        );
        let b = add(
            &mut library,
            NewWork::manual("Dune", MediaKind::Book, Genre::Fiction),
        );

        assert!(a.is_added());
        assert!(b.is_added());
        assert_ne!(a.work().id, b.work().id);
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn test_empty_external_id_bypasses_uniqueness() {
        let mut library = Library::new();
        add(&mut library, movie("", "First"));
        add(&mut library, movie("", "Second"));
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut library = Library::new();
        for title in ["C", "A", "B"] {
            add(
                &mut library,
                NewWork::manual(title, MediaKind::Book, Genre::Other),
            );
        }
        let titles: Vec<&str> = library.works().iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_double_toggle_restores_flags() {
        let mut library = Library::new();
        let id = add(&mut library, movie("1", "A")).work().id.clone();

        assert!(library.toggle_liked(&id).unwrap().liked);
        assert!(!library.toggle_liked(&id).unwrap().liked);

        assert!(library.toggle_wishlisted(&id).unwrap().wishlisted);
        assert!(!library.toggle_wishlisted(&id).unwrap().wishlisted);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let mut library = Library::new();
        add(&mut library, movie("1", "A"));
        let before = library.clone();

        assert!(library.toggle_liked("missing").is_none());
        assert!(library.toggle_wishlisted("missing").is_none());
        assert_eq!(library, before);
    }

    #[test]
    fn test_remove_is_total() {
        let mut library = Library::new();
        let id = add(&mut library, movie("1", "A")).work().id.clone();
        add(&mut library, movie("2", "B"));

        let removed = library.remove(&id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(library.len(), 1);
        assert!(library.get(&id).is_none());

        assert!(library.remove(&id).is_none());
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_edit_unknown_id_is_noop() {
        let mut library = Library::new();
        add(&mut library, movie("1", "A"));
        let before = library.clone();

        let patch = WorkPatch {
            title: Some("X".to_string()),
            ..Default::default()
        };
        assert!(library.edit("missing", patch).unwrap().is_none());
        assert_eq!(library, before);
    }

    #[test]
    fn test_edit_replaces_given_fields() {
        let mut library = Library::new();
        let id = add(&mut library, movie("1", "A")).work().id.clone();

        let patch = WorkPatch {
            genre: Some(Genre::Comedy),
            ..Default::default()
        };
        let edited = library.edit(&id, patch).unwrap().unwrap();
        assert_eq!(edited.genre, Genre::Comedy);
        assert_eq!(edited.title, "A");
    }

    #[test]
    fn test_edit_onto_taken_key_is_refused() {
        let mut library = Library::new();
        let first = add(&mut library, movie("42", "A")).work().id.clone();
        let series = add(
            &mut library,
            NewWork {
                external_id: Some("42".to_string()),
                ..NewWork::manual("B", MediaKind::Series, Genre::Drama)
            },
        )
        .work()
        .id
        .clone();
        let other = add(&mut library, movie("7", "C")).work().id.clone();
        let before = library.clone();

        let change_kind = WorkPatch {
            kind: Some(MediaKind::Movie),
            ..Default::default()
        };
        let err = library.edit(&series, change_kind).unwrap_err();
        assert_eq!(err.existing.id, first);

        let change_id = WorkPatch {
            external_id: Some("42".to_string()),
            ..Default::default()
        };
        let err = library.edit(&other, change_id).unwrap_err();
        assert_eq!(err.existing.id, first);

        assert_eq!(library, before);
        let sharing = library
            .works()
            .iter()
            .filter(|w| w.external_key() == Some(("42", MediaKind::Movie)))
            .count();
        assert_eq!(sharing, 1);
    }

    #[test]
    fn test_edit_keeping_own_key_is_allowed() {
        let mut library = Library::new();
        let id = add(&mut library, movie("42", "A")).work().id.clone();

        let patch = WorkPatch {
            external_id: Some("42".to_string()),
            kind: Some(MediaKind::Movie),
            title: Some("A (remastered)".to_string()),
            ..Default::default()
        };
        let edited = library.edit(&id, patch).unwrap().unwrap();
        assert_eq!(edited.title, "A (remastered)");
    }

    #[test]
    fn test_edit_onto_free_key_is_allowed() {
        let mut library = Library::new();
        add(&mut library, movie("42", "A"));
        let id = add(&mut library, movie("7", "C")).work().id.clone();

        let patch = WorkPatch {
            kind: Some(MediaKind::Series),
            external_id: Some("42".to_string()),
            ..Default::default()
        };
        let edited = library.edit(&id, patch).unwrap().unwrap();
        assert_eq!(edited.external_key(), Some(("42", MediaKind::Series)));
    }

    #[test]
    fn test_filter_by_view() {
        let mut library = Library::new();
        let liked = add(&mut library, movie("1", "Liked")).work().id.clone();
        add(&mut library, movie("2", "Plain"));
        library.toggle_liked(&liked);

        let query = LibraryQuery {
            view: ShelfView::Liked,
            ..Default::default()
        };
        let titles: Vec<&str> = library.filter(&query).map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["Liked"]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut library = Library::new();
        add(&mut library, movie("1", "A"));

        let json = serde_json::to_value(&library).unwrap();
        assert!(json.is_array());

        let parsed: Library = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, library);
    }
}
