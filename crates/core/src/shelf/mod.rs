//! The application session: authentication gate plus the session user's
//! catalog.
//!
//! A [`Shelf`] holds at most one authenticated [`User`]. Catalog operations
//! work on a clone of that user, persist the whole credential table, and
//! only then swap the clone in. A failed write leaves memory untouched.

mod catalog;
mod events;

pub use events::{EventBus, ShelfEvent};

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::accounts::{AccountError, AccountStore, Registration};
use crate::library::{User, Work};
use crate::storage::{KeyValueStore, StorageError};

/// Errors from shelf operations.
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("not authenticated")]
    NotAuthenticated,

    /// An edit would give a work the provider id and kind of another work.
    #[error("\"{}\" is already in library", .0.title)]
    AlreadyInLibrary(Box<Work>),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Session owner and entry point for every catalog operation.
pub struct Shelf {
    accounts: AccountStore,
    session: Option<User>,
    events: EventBus,
}

impl Shelf {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            accounts: AccountStore::new(kv),
            session: None,
            events: EventBus::default(),
        }
    }

    /// Use an existing bus, e.g. one shared with the presentation layer.
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShelfEvent> {
        self.events.subscribe()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Create an account and sign it in.
    pub fn register(&mut self, registration: &Registration) -> Result<User, ShelfError> {
        let user = self.accounts.register(registration)?;
        info!(email = %user.email, "Registered new account");
        self.start_session(user)
    }

    /// Sign in with exact email and password.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, ShelfError> {
        let user = match self.accounts.authenticate(email, password) {
            Ok(user) => user,
            Err(e) => {
                warn!(email = %email, "Login failed");
                return Err(e.into());
            }
        };
        self.start_session(user)
    }

    /// Drop the session marker and the in-memory user.
    pub fn logout(&mut self) -> Result<(), ShelfError> {
        self.accounts.clear_session()?;
        if let Some(user) = self.session.take() {
            info!(email = %user.email, "Logged out");
            self.events.publish(ShelfEvent::SessionEnded);
        }
        Ok(())
    }

    /// Load the user named by a persisted session marker, if any.
    ///
    /// A marker whose email has no credential record is removed.
    pub fn restore_session(&mut self) -> Result<Option<&User>, ShelfError> {
        let Some(marker) = self.accounts.read_session()? else {
            return Ok(None);
        };

        match self.accounts.find_by_email(&marker.email)? {
            Some(record) => {
                let user = record.to_user();
                info!(email = %user.email, works = user.works.len(), "Restored session");
                self.events.publish(ShelfEvent::SessionStarted {
                    user_id: user.id.clone(),
                    name: user.name.clone(),
                });
                self.session = Some(user);
            }
            None => {
                warn!(email = %marker.email, "Discarding session marker without account");
                self.accounts.clear_session()?;
                self.session = None;
            }
        }
        Ok(self.session.as_ref())
    }

    fn start_session(&mut self, user: User) -> Result<User, ShelfError> {
        self.accounts.write_session(&user.email)?;
        if let Some(previous) = self.session.take() {
            info!(email = %previous.email, "Session replaced");
            self.events.publish(ShelfEvent::SessionEnded);
        }
        info!(email = %user.email, "Session started");
        self.events.publish(ShelfEvent::SessionStarted {
            user_id: user.id.clone(),
            name: user.name.clone(),
        });
        self.session = Some(user.clone());
        Ok(user)
    }

    fn require_user(&self) -> Result<&User, ShelfError> {
        self.session.as_ref().ok_or(ShelfError::NotAuthenticated)
    }
}
