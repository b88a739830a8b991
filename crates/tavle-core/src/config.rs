use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One named sprint window over inclusive issue-number ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintWindow {
    pub name: String,
    pub ranges: Vec<(u32, u32)>,
}

impl SprintWindow {
    pub fn contains(&self, n: u32) -> bool {
        self.ranges.iter().any(|(lo, hi)| (*lo..=*hi).contains(&n))
    }
}

/// Mapping from issue-key numbers to sprint names.
///
/// The default windows mirror the project's historical key numbering; numbers
/// outside every window belong to no sprint. First matching window wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintPlan {
    windows: Vec<SprintWindow>,
}

impl Default for SprintPlan {
    fn default() -> Self {
        Self {
            windows: vec![
                SprintWindow {
                    name: "1".to_string(),
                    ranges: vec![(1, 7)],
                },
                SprintWindow {
                    name: "2".to_string(),
                    ranges: vec![(9, 14), (21, 22)],
                },
                SprintWindow {
                    name: "3".to_string(),
                    ranges: vec![(15, 20)],
                },
            ],
        }
    }
}

impl SprintPlan {
    pub fn from_windows(windows: Vec<SprintWindow>) -> Self {
        Self { windows }
    }

    pub fn bucket_for(&self, n: u32) -> Option<&str> {
        self.windows
            .iter()
            .find(|window| window.contains(n))
            .map(|window| window.name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.windows.iter().map(|window| window.name.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub snapshot_path: Option<String>,
    #[serde(default)]
    pub layout_path: Option<String>,
    #[serde(default)]
    pub sprints: Vec<SprintWindow>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/tavle/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("tavle/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("tavle\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load the config file if present; any read or parse failure falls back
    /// to defaults.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                if let Ok(content) = std::fs::read_to_string(&config_path) {
                    match toml::from_str(&content) {
                        Ok(config) => return config,
                        Err(e) => {
                            tracing::warn!("ignoring malformed config file: {}", e);
                        }
                    }
                }
            }
        }
        Self::default()
    }

    pub fn sprint_plan(&self) -> SprintPlan {
        if self.sprints.is_empty() {
            SprintPlan::default()
        } else {
            SprintPlan::from_windows(self.sprints.clone())
        }
    }
}
