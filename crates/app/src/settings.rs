//! Startup configuration: which variant to run and optional JSON overrides.
//!
//! `FOAM_VARIANT` picks a built-in preset. On native builds `FOAM_SETTINGS`
//! may point at a JSON file whose `settings` and `style` sections replace the
//! preset's. Anything that fails to load is logged and the preset is used.

use bevy::prelude::*;

use rendering::style::FoamStyle;
use simulation::config::{FoamSettings, FoamVariant};

#[cfg(not(target_arch = "wasm32"))]
use file::{load_settings_file, SettingsError};

pub const VARIANT_ENV: &str = "FOAM_VARIANT";
#[cfg(not(target_arch = "wasm32"))]
pub const SETTINGS_ENV: &str = "FOAM_SETTINGS";

/// Settings and style the app starts with.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub variant: FoamVariant,
    pub settings: FoamSettings,
    pub style: FoamStyle,
}

impl LaunchConfig {
    pub fn for_variant(variant: FoamVariant) -> Self {
        Self {
            variant,
            settings: variant.settings(),
            style: FoamStyle::for_variant(variant),
        }
    }
}

/// Something worth reporting about how the launch configuration was
/// resolved. Resolution runs before logging is up, so these are collected and
/// logged once the app has its plugins.
#[derive(Debug)]
pub enum LaunchNote {
    UnknownVariant(String),
    #[cfg(not(target_arch = "wasm32"))]
    SettingsLoaded(String),
    #[cfg(not(target_arch = "wasm32"))]
    SettingsFallback { path: String, error: SettingsError },
}

impl LaunchNote {
    pub fn log(&self, variant: FoamVariant) {
        match self {
            LaunchNote::UnknownVariant(name) => warn!(
                "Unknown foam variant '{}', using '{}'",
                name,
                variant.name()
            ),
            #[cfg(not(target_arch = "wasm32"))]
            LaunchNote::SettingsLoaded(path) => info!("Loaded foam settings from {}", path),
            #[cfg(not(target_arch = "wasm32"))]
            LaunchNote::SettingsFallback { path, error } => warn!(
                "Failed to load foam settings from {}: {}. Using '{}' preset.",
                path,
                error,
                variant.name()
            ),
        }
    }
}

/// Unknown names fall back to the default variant.
pub fn parse_variant(name: Option<&str>) -> Result<FoamVariant, LaunchNote> {
    match name {
        None => Ok(FoamVariant::default()),
        Some(name) => {
            FoamVariant::from_name(name).ok_or_else(|| LaunchNote::UnknownVariant(name.to_string()))
        }
    }
}

/// Resolves the launch configuration from a variant name and, on native
/// builds, an optional settings file path.
pub fn resolve(
    variant_name: Option<&str>,
    #[cfg(not(target_arch = "wasm32"))] settings_path: Option<&str>,
) -> (LaunchConfig, Vec<LaunchNote>) {
    let mut notes = Vec::new();
    let variant = parse_variant(variant_name).unwrap_or_else(|note| {
        notes.push(note);
        FoamVariant::default()
    });
    let config = LaunchConfig::for_variant(variant);

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(path) = settings_path {
        return match load_settings_file(std::path::Path::new(path)) {
            Ok(file) => {
                notes.push(LaunchNote::SettingsLoaded(path.to_string()));
                (config.apply(file), notes)
            }
            Err(error) => {
                notes.push(LaunchNote::SettingsFallback {
                    path: path.to_string(),
                    error,
                });
                (config, notes)
            }
        };
    }

    (config, notes)
}

pub fn from_env() -> (LaunchConfig, Vec<LaunchNote>) {
    let variant = std::env::var(VARIANT_ENV).ok();
    #[cfg(not(target_arch = "wasm32"))]
    let resolved = resolve(
        variant.as_deref(),
        std::env::var(SETTINGS_ENV).ok().as_deref(),
    );
    #[cfg(target_arch = "wasm32")]
    let resolved = resolve(variant.as_deref());
    resolved
}

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fmt;
    use std::path::Path;

    use serde::{Deserialize, Serialize};

    use super::LaunchConfig;
    use rendering::style::FoamStyle;
    use simulation::config::FoamSettings;

    /// Errors that can occur while loading a settings file.
    #[derive(Debug)]
    pub enum SettingsError {
        /// The file could not be read.
        Io(std::io::Error),
        /// The file is not valid settings JSON.
        Parse(String),
    }

    impl fmt::Display for SettingsError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                SettingsError::Io(e) => write!(f, "I/O error: {e}"),
                SettingsError::Parse(msg) => write!(f, "Parse error: {msg}"),
            }
        }
    }

    impl std::error::Error for SettingsError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                SettingsError::Io(e) => Some(e),
                SettingsError::Parse(_) => None,
            }
        }
    }

    impl From<std::io::Error> for SettingsError {
        fn from(e: std::io::Error) -> Self {
            SettingsError::Io(e)
        }
    }

    /// On-disk overrides. Missing sections keep the variant's values.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct FoamSettingsFile {
        pub settings: Option<FoamSettings>,
        pub style: Option<FoamStyle>,
    }

    impl LaunchConfig {
        pub fn apply(mut self, file: FoamSettingsFile) -> Self {
            if let Some(settings) = file.settings {
                self.settings = settings;
            }
            if let Some(style) = file.style {
                self.style = style;
            }
            self
        }
    }

    pub fn parse_settings_file(json: &str) -> Result<FoamSettingsFile, SettingsError> {
        serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    pub fn load_settings_file(path: &Path) -> Result<FoamSettingsFile, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        parse_settings_file(&json)
    }
}
