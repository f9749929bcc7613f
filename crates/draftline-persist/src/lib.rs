pub mod builder;
pub mod error;
pub mod memory;
pub mod retention;
pub mod trait_client;

#[cfg(feature = "mongodb")]
pub mod dbs;

pub use builder::{PersistenceBuilder, StorageBackend};
pub use error::{PersistError, Result};
pub use memory::InMemoryPersistenceClient;
pub use retention::HighlightRetention;
pub use trait_client::PersistenceClient;

#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoPersistenceClient;
