//! Settings store use case.
//!
//! [`SettingsStore`] owns the [`Settings`] of the application and mirrors the
//! whole snapshot to a [`KeyValueStore`] after every successful mutation.
//! It is rehydrated once at startup with [`SettingsStore::load`].

use crate::ports::key_value_store::{KeyValueStore, StorageError};
use parley_domain::{DomainError, ModelOption, Settings};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fixed key the settings snapshot is stored under.
pub const SETTINGS_KEY: &str = "settings";

/// Errors from settings operations
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Rejected(#[from] DomainError),

    #[error("Failed to persist settings: {0}")]
    Persistence(#[from] StorageError),

    #[error("Failed to serialize settings: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Display and model preferences with write-through persistence.
pub struct SettingsStore {
    settings: Settings,
    store: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    /// Defaults over the built-in catalog, without reading the store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            settings: Settings::default(),
            store,
        }
    }

    /// Rehydrate from the store over the given catalog.
    ///
    /// A missing snapshot yields defaults. An unreadable or corrupt snapshot
    /// also yields defaults, with a warning. Only an invalid catalog fails.
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        catalog: Vec<ModelOption>,
    ) -> Result<Self, SettingsError> {
        let defaults = Settings::with_catalog(catalog.clone())?;

        let settings = match Self::read_snapshot(store.as_ref()) {
            Ok(Some(snapshot)) => {
                let (settings, replaced) = Settings::restore(snapshot, catalog)?;
                if replaced {
                    warn!(
                        "Persisted model is not in the catalog, using {}",
                        settings.selected_model()
                    );
                }
                debug!("Settings rehydrated");
                settings
            }
            Ok(None) => {
                debug!("No persisted settings, using defaults");
                defaults
            }
            Err(e) => {
                warn!("Could not read persisted settings, using defaults: {}", e);
                defaults
            }
        };

        Ok(Self { settings, store })
    }

    fn read_snapshot(store: &dyn KeyValueStore) -> Result<Option<Settings>, SettingsError> {
        match store.get(SETTINGS_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn dark_mode(&self) -> bool {
        self.settings.dark_mode()
    }

    pub fn selected_model(&self) -> &str {
        self.settings.selected_model()
    }

    pub fn available_models(&self) -> &[ModelOption] {
        self.settings.available_models()
    }

    pub fn font_size(&self) -> u32 {
        self.settings.font_size()
    }

    pub fn enable_sounds(&self) -> bool {
        self.settings.enable_sounds()
    }

    /// Flip dark mode, persist, and return the new value.
    pub fn toggle_dark_mode(&mut self) -> Result<bool, SettingsError> {
        let dark = self.settings.toggle_dark_mode();
        info!("Dark mode {}", if dark { "on" } else { "off" });
        self.persist()?;
        Ok(dark)
    }

    /// Select a catalog model. Unknown ids are rejected and nothing is saved.
    pub fn set_model(&mut self, model_id: &str) -> Result<(), SettingsError> {
        if let Err(e) = self.settings.set_model(model_id) {
            warn!("Rejected model selection: {}", e);
            return Err(e.into());
        }
        info!("Selected model {}", model_id);
        self.persist()
    }

    pub fn set_font_size(&mut self, size: u32) -> Result<(), SettingsError> {
        self.settings.set_font_size(size)?;
        self.persist()
    }

    pub fn set_enable_sounds(&mut self, enabled: bool) -> Result<(), SettingsError> {
        self.settings.set_enable_sounds(enabled);
        self.persist()
    }

    /// Flip sounds, persist, and return the new value.
    pub fn toggle_sounds(&mut self) -> Result<bool, SettingsError> {
        let enabled = self.settings.toggle_sounds();
        self.persist()?;
        Ok(enabled)
    }

    /// Restore defaults (keeping the catalog) and persist.
    pub fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings.reset();
        info!("Settings reset to defaults");
        self.persist()
    }

    /// Write the whole snapshot.
    ///
    /// On failure the in-memory change is kept; the next successful
    /// mutation writes it out.
    fn persist(&self) -> Result<(), SettingsError> {
        let raw = serde_json::to_string(&self.settings)?;
        self.store.set(SETTINGS_KEY, &raw).map_err(|e| {
            warn!("Failed to persist settings: {}", e);
            SettingsError::from(e)
        })
    }
}
