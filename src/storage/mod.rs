pub mod file_storage;

use crate::model::ProfileCache;
use crate::Result;

pub use file_storage::FileStorage;

/// Durable home of the whole profile cache.
///
/// The mapping is always loaded and saved in full, there are no partial
/// writes.
pub trait ProfileStore {
    /// Load every cached profile. A store that was never written
    /// yields an empty cache.
    fn load(&mut self) -> Result<ProfileCache>;

    /// Replace the persisted cache with `profiles`
    fn save(&mut self, profiles: &ProfileCache) -> Result<()>;
}
