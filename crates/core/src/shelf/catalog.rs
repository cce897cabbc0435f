//! Catalog operations on the session user's works.

use tracing::{debug, error, info, warn};

use super::{Shelf, ShelfError, ShelfEvent};
use crate::accounts::AccountError;
use crate::insights::{suggest, LibraryStats, Suggestion};
use crate::library::{
    new_work_id, now, AddOutcome, LibraryQuery, MediaKind, NewWork, ProfilePatch, User, Work,
    WorkPatch,
};
use crate::metrics::{DUPLICATE_ADDS, LIBRARY_MUTATIONS, STORAGE_FAILURES};

impl Shelf {
    /// Persist `draft` and make it the session user.
    fn commit(&mut self, draft: User, operation: &'static str) -> Result<(), ShelfError> {
        match self.accounts.save_user(&draft) {
            Ok(true) => {}
            Ok(false) => {
                warn!(email = %draft.email, "Session user has no credential record");
                self.session = None;
                return Err(ShelfError::NotAuthenticated);
            }
            Err(e) => {
                STORAGE_FAILURES.inc();
                error!(operation, error = %e, "Failed to persist shelf");
                return Err(e.into());
            }
        }

        LIBRARY_MUTATIONS.with_label_values(&[operation]).inc();
        self.session = Some(draft);
        Ok(())
    }

    fn draft(&self) -> Result<User, ShelfError> {
        self.require_user().cloned()
    }

    pub fn works(&self) -> Result<&[Work], ShelfError> {
        Ok(self.require_user()?.works.works())
    }

    pub fn find_work(&self, id: &str) -> Result<Option<&Work>, ShelfError> {
        Ok(self.require_user()?.works.get(id))
    }

    pub fn filter(&self, query: &LibraryQuery) -> Result<Vec<Work>, ShelfError> {
        Ok(self
            .require_user()?
            .works
            .filter(query)
            .cloned()
            .collect())
    }

    /// Whether the session user already has this provider work.
    /// False when nobody is signed in.
    pub fn contains_external(&self, external_id: &str, kind: MediaKind) -> bool {
        self.session
            .as_ref()
            .is_some_and(|u| u.works.find_external(external_id, kind).is_some())
    }

    /// Add a work. Duplicates are reported, not stored.
    pub fn add_work(&mut self, new: NewWork) -> Result<AddOutcome, ShelfError> {
        let user = self.require_user()?;
        if let Some(existing) = new
            .external_id
            .as_deref()
            .and_then(|ext| user.works.find_external(ext, new.kind))
        {
            DUPLICATE_ADDS.inc();
            debug!(external_id = ?existing.external_id, kind = %existing.kind, "Work already on shelf");
            return Ok(AddOutcome::Duplicate(existing.clone()));
        }

        let mut draft = user.clone();
        let outcome = draft.works.add(new, new_work_id(), now());
        self.commit(draft, "add")?;

        let work = outcome.work().clone();
        info!(work_id = %work.id, title = %work.title, kind = %work.kind, "Added work");
        self.events.publish(ShelfEvent::WorkAdded { work });
        Ok(outcome)
    }

    /// Replace the given fields of a work. `None` if the id is unknown.
    pub fn edit_work(&mut self, id: &str, patch: WorkPatch) -> Result<Option<Work>, ShelfError> {
        self.update_work(id, "edit", |draft| match draft.works.edit(id, patch) {
            Ok(work) => Ok(work.cloned()),
            Err(conflict) => {
                debug!(
                    work_id = %id,
                    existing_id = %conflict.existing.id,
                    "Edit refused, provider key already on shelf"
                );
                Err(ShelfError::AlreadyInLibrary(conflict.existing))
            }
        })
    }

    pub fn toggle_liked(&mut self, id: &str) -> Result<Option<Work>, ShelfError> {
        self.update_work(id, "toggle_liked", |draft| {
            Ok(draft.works.toggle_liked(id).cloned())
        })
    }

    pub fn toggle_wishlisted(&mut self, id: &str) -> Result<Option<Work>, ShelfError> {
        self.update_work(id, "toggle_wishlisted", |draft| {
            Ok(draft.works.toggle_wishlisted(id).cloned())
        })
    }

    fn update_work(
        &mut self,
        id: &str,
        operation: &'static str,
        mutate: impl FnOnce(&mut User) -> Result<Option<Work>, ShelfError>,
    ) -> Result<Option<Work>, ShelfError> {
        let mut draft = self.draft()?;
        let Some(work) = mutate(&mut draft)? else {
            debug!(work_id = %id, operation, "Work not found");
            return Ok(None);
        };
        self.commit(draft, operation)?;

        debug!(work_id = %id, operation, "Updated work");
        self.events.publish(ShelfEvent::WorkUpdated { work: work.clone() });
        Ok(Some(work))
    }

    /// Remove a work. `None` if the id is unknown.
    pub fn remove_work(&mut self, id: &str) -> Result<Option<Work>, ShelfError> {
        let mut draft = self.draft()?;
        let Some(removed) = draft.works.remove(id) else {
            debug!(work_id = %id, "Work not found");
            return Ok(None);
        };
        self.commit(draft, "remove")?;

        info!(work_id = %id, title = %removed.title, "Removed work");
        self.events.publish(ShelfEvent::WorkRemoved {
            work_id: id.to_string(),
        });
        Ok(Some(removed))
    }

    /// Empty the session user's shelf, keeping the profile. Returns the
    /// number of works removed.
    pub fn clear_all(&mut self) -> Result<usize, ShelfError> {
        let mut draft = self.draft()?;
        let removed = draft.works.len();
        if removed == 0 {
            return Ok(0);
        }
        draft.works.clear();
        self.commit(draft, "clear")?;

        info!(removed, "Cleared shelf");
        self.events.publish(ShelfEvent::LibraryCleared { removed });
        Ok(removed)
    }

    /// Update name, bio or avatar. A blank name is rejected.
    pub fn update_profile(&mut self, patch: ProfilePatch) -> Result<User, ShelfError> {
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AccountError::Validation("name is required".to_string()).into());
        }

        let mut draft = self.draft()?;
        patch.apply(&mut draft);
        self.commit(draft.clone(), "profile")?;

        info!(email = %draft.email, "Updated profile");
        self.events.publish(ShelfEvent::ProfileUpdated {
            user_id: draft.id.clone(),
            name: draft.name.clone(),
        });
        Ok(draft)
    }

    pub fn stats(&self) -> Result<LibraryStats, ShelfError> {
        Ok(LibraryStats::compute(self.works()?))
    }

    /// Other registered users ranked by taste overlap.
    pub fn affinities(&self) -> Result<Vec<Suggestion>, ShelfError> {
        let me = self.require_user()?;
        let others = self.accounts.other_users(&me.email)?;
        Ok(suggest(me, &others))
    }
}
