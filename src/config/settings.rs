//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// BackendConfig
// ---------------------------------------------------------------------------

/// Connection settings for the subtitle backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Maximum seconds to wait for a backend response before timing out.
    ///
    /// Transcription and burning are slow server-side jobs, so this is much
    /// larger than a typical API timeout.
    pub timeout_secs: u64,
    /// Display-only quota ceiling shown next to the remaining-uses counter.
    ///
    /// The backend enforces the real quota; this value is never used to
    /// gate a request locally.
    pub daily_quota: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            timeout_secs: 600,
            daily_quota: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// UploadConfig
// ---------------------------------------------------------------------------

/// Limits applied to the selected media file before any upload happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted file size in megabytes.
    pub max_size_mb: u64,
}

impl UploadConfig {
    /// The size limit in bytes, as compared against `MediaFile::size()`.
    pub fn max_bytes(&self) -> u64 {
        self.max_size_mb * 1024 * 1024
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { max_size_mb: 200 }
    }
}

// ---------------------------------------------------------------------------
// ProgressConfig
// ---------------------------------------------------------------------------

/// Shape of the synthetic progress ramp shown while a transcription request
/// is outstanding.
///
/// The ramp is a UI affordance only — it is wall-clock driven and carries no
/// information about real backend progress.  It never reaches 100 on its
/// own; only a successful settlement forces completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Percentage shown immediately when the request is dispatched.
    pub floor_pct: u8,
    /// The ramp saturates here and stays until the request settles.
    pub ceiling_pct: u8,
    /// Percentage added per tick.
    pub step_pct: u8,
    /// Milliseconds between ticks.
    pub tick_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            floor_pct: 10,
            ceiling_pct: 90,
            step_pct: 5,
            tick_ms: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// ExportConfig
// ---------------------------------------------------------------------------

/// Where exported artifacts are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Target directory for downloads.  `None` means the platform downloads
    /// folder resolved by [`AppPaths`].
    pub download_dir: Option<PathBuf>,
}

impl ExportConfig {
    /// The effective download directory.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| AppPaths::new().download_dir)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use autosub::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Subtitle backend connection settings.
    pub backend: BackendConfig,
    /// Upload validation limits.
    pub upload: UploadConfig,
    /// Synthetic progress ramp shape.
    pub progress: ProgressConfig,
    /// Artifact export settings.
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.backend.base_url, loaded.backend.base_url);
        assert_eq!(original.backend.timeout_secs, loaded.backend.timeout_secs);
        assert_eq!(original.backend.daily_quota, loaded.backend.daily_quota);
        assert_eq!(original.upload.max_size_mb, loaded.upload.max_size_mb);
        assert_eq!(original.progress.floor_pct, loaded.progress.floor_pct);
        assert_eq!(original.progress.ceiling_pct, loaded.progress.ceiling_pct);
        assert_eq!(original.progress.step_pct, loaded.progress.step_pct);
        assert_eq!(original.progress.tick_ms, loaded.progress.tick_ms);
        assert_eq!(original.export.download_dir, loaded.export.download_dir);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.backend.base_url, default.backend.base_url);
        assert_eq!(config.upload.max_size_mb, default.upload.max_size_mb);
        assert_eq!(config.progress.tick_ms, default.progress.tick_ms);
    }

    /// Verify the default values mirror the backend's published limits.
    #[test]
    fn default_values_match_backend_contract() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.backend.daily_quota, 5);
        assert_eq!(cfg.upload.max_size_mb, 200);
        assert_eq!(cfg.upload.max_bytes(), 200 * 1024 * 1024);
        assert_eq!(cfg.progress.floor_pct, 10);
        assert_eq!(cfg.progress.ceiling_pct, 90);
        assert_eq!(cfg.progress.step_pct, 5);
        assert_eq!(cfg.progress.tick_ms, 500);
        assert!(cfg.export.download_dir.is_none());
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.backend.base_url = "http://subtitles.example.com:9000".into();
        cfg.backend.timeout_secs = 120;
        cfg.upload.max_size_mb = 50;
        cfg.progress.tick_ms = 250;
        cfg.export.download_dir = Some(PathBuf::from("/tmp/subs"));

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.backend.base_url, "http://subtitles.example.com:9000");
        assert_eq!(loaded.backend.timeout_secs, 120);
        assert_eq!(loaded.upload.max_size_mb, 50);
        assert_eq!(loaded.progress.tick_ms, 250);
        assert_eq!(loaded.export.download_dir, Some(PathBuf::from("/tmp/subs")));
    }
}
