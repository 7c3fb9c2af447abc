//! Settings domain entities
//!
//! [`Settings`] is the snapshot persisted between launches. Mutations go
//! through methods that enforce the invariants:
//!
//! - `selected_model` is always one of `available_models[].id`
//! - `font_size` is always positive
//! - `available_models` never changes after construction

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Model selected when nothing else is configured.
pub const DEFAULT_MODEL_ID: &str = "gpt-3.5-turbo";

pub const DEFAULT_FONT_SIZE: u32 = 14;

/// An entry of the model catalog (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelOption {
    pub id: String,
    pub name: String,
}

impl ModelOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The built-in catalog.
    pub fn default_catalog() -> Vec<ModelOption> {
        vec![
            ModelOption::new("gpt-3.5-turbo", "GPT-3.5 Turbo"),
            ModelOption::new("gpt-4", "GPT-4"),
            ModelOption::new("claude-2", "Claude 2"),
        ]
    }
}

/// Check a catalog for emptiness and duplicate ids.
pub fn validate_catalog(catalog: &[ModelOption]) -> Result<(), DomainError> {
    if catalog.is_empty() {
        return Err(DomainError::EmptyModelCatalog);
    }
    for (i, option) in catalog.iter().enumerate() {
        if catalog[..i].iter().any(|o| o.id == option.id) {
            return Err(DomainError::DuplicateModel(option.id.clone()));
        }
    }
    Ok(())
}

/// Display and model preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    dark_mode: bool,
    selected_model: String,
    available_models: Vec<ModelOption>,
    font_size: u32,
    enable_sounds: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            selected_model: DEFAULT_MODEL_ID.to_string(),
            available_models: ModelOption::default_catalog(),
            font_size: DEFAULT_FONT_SIZE,
            enable_sounds: true,
        }
    }
}

impl Settings {
    /// Defaults over a custom catalog.
    ///
    /// The default model is kept if the catalog contains it, otherwise the
    /// first catalog entry is selected.
    pub fn with_catalog(catalog: Vec<ModelOption>) -> Result<Self, DomainError> {
        validate_catalog(&catalog)?;
        let selected_model = if catalog.iter().any(|m| m.id == DEFAULT_MODEL_ID) {
            DEFAULT_MODEL_ID.to_string()
        } else {
            catalog[0].id.clone()
        };
        Ok(Self {
            selected_model,
            available_models: catalog,
            ..Self::default()
        })
    }

    /// Rebuild settings from a persisted snapshot over the given catalog.
    ///
    /// The catalog argument wins over whatever catalog the snapshot carries.
    /// Returns the settings and whether the persisted model had to be
    /// replaced because it is not in the catalog.
    pub fn restore(
        snapshot: Settings,
        catalog: Vec<ModelOption>,
    ) -> Result<(Self, bool), DomainError> {
        let mut settings = Self::with_catalog(catalog)?;
        settings.dark_mode = snapshot.dark_mode;
        settings.enable_sounds = snapshot.enable_sounds;
        if snapshot.font_size > 0 {
            settings.font_size = snapshot.font_size;
        }
        let replaced = settings.set_model(&snapshot.selected_model).is_err();
        Ok((settings, replaced))
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    pub fn available_models(&self) -> &[ModelOption] {
        &self.available_models
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn enable_sounds(&self) -> bool {
        self.enable_sounds
    }

    /// Catalog entry of the selected model.
    pub fn selected_option(&self) -> Option<&ModelOption> {
        self.find_model(&self.selected_model)
    }

    pub fn find_model(&self, id: &str) -> Option<&ModelOption> {
        self.available_models.iter().find(|m| m.id == id)
    }

    /// Flip dark mode and return the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    /// Select a model from the catalog. Unknown ids are rejected.
    pub fn set_model(&mut self, id: &str) -> Result<(), DomainError> {
        if self.find_model(id).is_none() {
            return Err(DomainError::UnknownModel(id.to_string()));
        }
        self.selected_model = id.to_string();
        Ok(())
    }

    pub fn set_font_size(&mut self, size: u32) -> Result<(), DomainError> {
        if size == 0 {
            return Err(DomainError::InvalidFontSize(size));
        }
        self.font_size = size;
        Ok(())
    }

    pub fn set_enable_sounds(&mut self, enabled: bool) {
        self.enable_sounds = enabled;
    }

    /// Flip sounds and return the new value.
    pub fn toggle_sounds(&mut self) -> bool {
        self.enable_sounds = !self.enable_sounds;
        self.enable_sounds
    }

    /// Back to defaults, keeping the catalog.
    pub fn reset(&mut self) {
        let catalog = std::mem::take(&mut self.available_models);
        // Catalog was validated when these settings were built.
        let selected_model = if catalog.iter().any(|m| m.id == DEFAULT_MODEL_ID) {
            DEFAULT_MODEL_ID.to_string()
        } else {
            catalog
                .first()
                .map(|m| m.id.clone())
                .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string())
        };
        *self = Self {
            selected_model,
            available_models: catalog,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_defaults() {
        let settings = Settings::default();
        assert!(!settings.dark_mode());
        assert_eq!(settings.selected_model(), "gpt-3.5-turbo");
        assert_eq!(settings.available_models().len(), 3);
        assert_eq!(settings.font_size(), 14);
        assert!(settings.enable_sounds());
    }

    #[test]
    fn toggle_dark_mode_twice_restores_value() {
        let mut settings = Settings::default();
        let original = settings.dark_mode();
        settings.toggle_dark_mode();
        assert_ne!(settings.dark_mode(), original);
        settings.toggle_dark_mode();
        assert_eq!(settings.dark_mode(), original);
    }

    #[test]
    fn set_model_accepts_catalog_entry() {
        let mut settings = Settings::default();
        settings.set_model("gpt-4").unwrap();
        assert_eq!(settings.selected_model(), "gpt-4");
        assert_eq!(settings.selected_option().unwrap().name, "GPT-4");
    }

    #[test]
    fn set_model_rejects_unknown_id() {
        let mut settings = Settings::default();
        let err = settings.set_model("gpt-9").unwrap_err();
        assert_eq!(err, DomainError::UnknownModel("gpt-9".to_string()));
        assert_eq!(settings.selected_model(), DEFAULT_MODEL_ID);
    }

    #[test]
    fn set_font_size_rejects_zero() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.set_font_size(0),
            Err(DomainError::InvalidFontSize(0))
        );
        assert_eq!(settings.font_size(), DEFAULT_FONT_SIZE);
        settings.set_font_size(18).unwrap();
        assert_eq!(settings.font_size(), 18);
    }

    #[test]
    fn with_catalog_falls_back_to_first_entry() {
        let settings =
            Settings::with_catalog(vec![ModelOption::new("local-llm", "Local")]).unwrap();
        assert_eq!(settings.selected_model(), "local-llm");
    }

    #[test]
    fn with_catalog_rejects_bad_catalogs() {
        assert_eq!(
            Settings::with_catalog(vec![]),
            Err(DomainError::EmptyModelCatalog)
        );
        let dup = vec![ModelOption::new("a", "A"), ModelOption::new("a", "A again")];
        assert_eq!(
            Settings::with_catalog(dup),
            Err(DomainError::DuplicateModel("a".to_string()))
        );
    }

    #[test]
    fn restore_keeps_preferences_and_replaces_unknown_model() {
        let mut snapshot = Settings::default();
        snapshot.toggle_dark_mode();
        snapshot.set_font_size(20).unwrap();
        snapshot.set_model("claude-2").unwrap();

        let catalog = vec![ModelOption::new("gpt-4", "GPT-4")];
        let (restored, replaced) = Settings::restore(snapshot, catalog).unwrap();
        assert!(replaced);
        assert!(restored.dark_mode());
        assert_eq!(restored.font_size(), 20);
        assert_eq!(restored.selected_model(), "gpt-4");
        assert_eq!(restored.available_models().len(), 1);
    }

    #[test]
    fn reset_keeps_catalog() {
        let catalog = vec![ModelOption::new("m1", "M1"), ModelOption::new("m2", "M2")];
        let mut settings = Settings::with_catalog(catalog.clone()).unwrap();
        settings.set_model("m2").unwrap();
        settings.toggle_dark_mode();

        settings.reset();
        assert_eq!(settings.available_models(), catalog.as_slice());
        assert_eq!(settings.selected_model(), "m1");
        assert!(!settings.dark_mode());
    }

    #[test]
    fn snapshot_uses_camel_case_keys() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["darkMode"], false);
        assert_eq!(json["selectedModel"], "gpt-3.5-turbo");
        assert_eq!(json["fontSize"], 14);
        assert_eq!(json["enableSounds"], true);
        assert_eq!(json["availableModels"][1]["id"], "gpt-4");
    }
}
