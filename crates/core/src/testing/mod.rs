//! Testing utilities and mock implementations.
//!
//! Provides a controllable [`MockCatalogProvider`] and fixtures so the shelf
//! and the HTTP layer can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use myshelf_core::testing::{fixtures, MockCatalogProvider};
//!
//! let provider = MockCatalogProvider::new();
//! provider.set_results(MediaKind::Book, vec![fixtures::book_hit("b1", "Dune")]).await;
//!
//! let mut shelf = fixtures::signed_in_shelf("Ana", "ana@myshelf.test");
//! ```

mod mock_catalog_provider;

pub use mock_catalog_provider::{MockCatalogProvider, RecordedCatalogQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::sync::Arc;

    use crate::accounts::Registration;
    use crate::external_catalog::{CatalogHit, GenreHints};
    use crate::library::{Genre, MediaKind, NewWork};
    use crate::shelf::Shelf;
    use crate::storage::MemoryStore;

    /// Password used by [`signed_in_shelf`].
    pub const PASSWORD: &str = "secret";

    /// Create a Google Books style hit.
    pub fn book_hit(external_id: &str, title: &str) -> CatalogHit {
        CatalogHit {
            external_id: external_id.to_string(),
            kind: MediaKind::Book,
            title: title.to_string(),
            description: Some(format!("A book called {}.", title)),
            image: Some(format!("https://books.google.com/{}.jpg", external_id)),
            release_date: Some("1965-08-01".to_string()),
            rating: Some(4.5),
            genre_hints: GenreHints::Categories(vec!["Fiction".to_string()]),
        }
    }

    /// Create a TMDB style movie hit (genre: Drama).
    pub fn movie_hit(external_id: &str, title: &str) -> CatalogHit {
        CatalogHit {
            external_id: external_id.to_string(),
            kind: MediaKind::Movie,
            title: title.to_string(),
            description: Some(format!("A movie about {}.", title.to_lowercase())),
            image: Some("https://image.tmdb.org/t/p/w500/poster.jpg".to_string()),
            release_date: Some("1999-03-30".to_string()),
            rating: Some(8.2),
            genre_hints: GenreHints::TmdbIds(vec![18]),
        }
    }

    /// Create a TMDB style series hit (genre: Mystery).
    pub fn series_hit(external_id: &str, name: &str) -> CatalogHit {
        CatalogHit {
            external_id: external_id.to_string(),
            kind: MediaKind::Series,
            title: name.to_string(),
            description: None,
            image: None,
            release_date: Some("2008-01-20".to_string()),
            rating: Some(9.5),
            genre_hints: GenreHints::TmdbIds(vec![80]),
        }
    }

    /// A manually entered work.
    pub fn manual_work(title: &str, kind: MediaKind, genre: Genre) -> NewWork {
        NewWork::manual(title, kind, genre)
    }

    /// In-memory shelf with one registered, signed-in user.
    pub fn signed_in_shelf(name: &str, email: &str) -> Shelf {
        let mut shelf = Shelf::new(Arc::new(MemoryStore::new()));
        shelf
            .register(&Registration::new(name, email, PASSWORD))
            .expect("register fixture user");
        shelf
    }
}
