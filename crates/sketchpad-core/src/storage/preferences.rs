//! Keeps persisted preferences in step with the scene.
//!
//! [`PreferencesSync`] watches the scene's change journal and writes the
//! style/theme defaults back to storage. Persistence never blocks or fails
//! interaction: errors are logged and the sync stays dirty for a retry.

use crate::scene::{Preferences, Scene, SceneChange};
use crate::storage::{Storage, StorageError, StorageResult};
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Storage key for the persisted preferences.
pub const PREFERENCES_KEY: &str = "sketchpad:preferences";

/// Minimum time between two saves.
pub const DEFAULT_SAVE_INTERVAL_MS: u64 = 250;

/// Writes preference changes to a storage backend.
pub struct PreferencesSync<S: Storage> {
    storage: Arc<S>,
    interval: Duration,
    last_save: Option<Instant>,
    dirty: bool,
}

impl<S: Storage> PreferencesSync<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_millis(DEFAULT_SAVE_INTERVAL_MS),
            last_save: None,
            dirty: false,
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Inspect drained scene changes. Returns true if preferences changed.
    pub fn observe(&mut self, changes: &[SceneChange]) -> bool {
        let changed = changes.contains(&SceneChange::PreferencesChanged);
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Whether a save is due: dirty and the interval has elapsed.
    pub fn should_save(&self) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_save {
            Some(last) => last.elapsed() >= self.interval,
            None => true,
        }
    }

    /// Save now if a save is due. Returns true if a save succeeded.
    pub async fn maybe_flush(&mut self, scene: &Scene) -> bool {
        if !self.should_save() {
            return false;
        }
        self.flush(scene).await
    }

    /// Save the scene's preferences if dirty. Returns true if a save
    /// succeeded. Failures are logged and leave the sync dirty.
    pub async fn flush(&mut self, scene: &Scene) -> bool {
        if !self.dirty {
            return false;
        }
        match self.save(&scene.preferences()).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save preferences: {e}");
                false
            }
        }
    }

    /// Force a save of `preferences`.
    pub async fn save(&mut self, preferences: &Preferences) -> StorageResult<()> {
        self.storage.save(PREFERENCES_KEY, preferences).await?;
        self.last_save = Some(Instant::now());
        self.dirty = false;
        log::debug!("Saved preferences (theme {:?})", preferences.theme);
        Ok(())
    }

    /// Load persisted preferences, falling back to defaults when nothing
    /// is stored or the stored value is unreadable.
    pub async fn load_preferences(&self) -> Preferences {
        match self.storage.load(PREFERENCES_KEY).await {
            Ok(preferences) => preferences,
            Err(StorageError::NotFound(_)) => {
                log::debug!("No stored preferences, using defaults");
                Preferences::default()
            }
            Err(e) => {
                log::warn!("Could not load preferences, using defaults: {e}");
                Preferences::default()
            }
        }
    }

    /// Load persisted preferences into `scene`.
    pub async fn restore(&mut self, scene: &mut Scene) {
        let preferences = self.load_preferences().await;
        scene.restore_preferences(preferences);
        self.dirty = false;
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Platform storage used for preferences.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformPreferencesSync = PreferencesSync<crate::storage::FileStorage>;

#[cfg(target_arch = "wasm32")]
pub type PlatformPreferencesSync = PreferencesSync<crate::storage::MemoryStorage>;

/// Create a preferences sync backed by the platform's default storage.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_preferences_sync() -> StorageResult<PlatformPreferencesSync> {
    let storage = crate::storage::FileStorage::default_location()?;
    Ok(PreferencesSync::new(Arc::new(storage)))
}

/// Create a preferences sync backed by the platform's default storage.
#[cfg(target_arch = "wasm32")]
pub fn create_preferences_sync() -> StorageResult<PlatformPreferencesSync> {
    Ok(PreferencesSync::new(Arc::new(crate::storage::MemoryStorage::new())))
}
