pub mod schema;
pub mod sqlite;

use anyhow::{anyhow, Result};
use std::sync::Mutex;

use crate::profile::Profile;
use sqlite::Store;

/// Read access to the profiles the engine ranks over.
pub trait ProfileStore: Send + Sync {
    /// All profiles in insertion order.
    fn all_profiles(&self) -> Result<Vec<Profile>>;
    fn profile(&self, user_id: &str) -> Result<Option<Profile>>;
}

impl ProfileStore for Mutex<Store> {
    fn all_profiles(&self) -> Result<Vec<Profile>> {
        self.lock()
            .map_err(|_| anyhow!("profile store lock poisoned"))?
            .all_profiles()
    }

    fn profile(&self, user_id: &str) -> Result<Option<Profile>> {
        self.lock()
            .map_err(|_| anyhow!("profile store lock poisoned"))?
            .profile(user_id)
    }
}
