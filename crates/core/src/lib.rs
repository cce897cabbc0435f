pub mod accounts;
pub mod config;
pub mod external_catalog;
pub mod insights;
pub mod library;
pub mod metrics;
pub mod notice;
pub mod search;
pub mod shelf;
pub mod storage;
pub mod testing;

pub use accounts::{AccountError, AccountStore, Registration};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    StorageBackend,
};
pub use external_catalog::{
    CatalogHit, CatalogProvider, CombinedProvider, ExternalCatalogError, GenreHints,
};
pub use insights::{AffinityLevel, LibraryStats, Suggestion};
pub use library::{
    AddOutcome, Genre, KeyConflict, Library, LibraryQuery, MediaKind, NewWork, ProfilePatch,
    ShelfView, User, Work, WorkPatch,
};
pub use notice::{Notice, NoticeLevel};
pub use search::{SearchOutcome, SearchRequest, SearchSession};
pub use shelf::{EventBus, Shelf, ShelfError, ShelfEvent};
pub use storage::{create_store, KeyValueStore, MemoryStore, SqliteStore, StorageError};
