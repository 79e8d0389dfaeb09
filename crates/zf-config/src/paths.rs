// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Configuration file path discovery

use std::path::{Path, PathBuf};

/// Environment variable overriding the user configuration directory
pub const HOME_OVERRIDE_VAR: &str = "ZIPFILL_HOME";

/// Configuration file paths for each file scope
#[derive(Debug, Clone)]
pub struct Paths {
    pub system: PathBuf,
    pub user: PathBuf,
    pub project: Option<PathBuf>,
}

/// Discover configuration file paths; `project_root` adds `.zipfill/config.toml`
pub fn discover_paths(project_root: Option<&Path>) -> Paths {
    Paths {
        system: system_config_path(),
        user: user_config_path(),
        project: project_root.map(|root| root.join(".zipfill").join("config.toml")),
    }
}

fn system_config_path() -> PathBuf {
    if cfg!(target_os = "macos") {
        PathBuf::from("/Library/Application Support/zipfill/config.toml")
    } else if cfg!(target_os = "windows") {
        PathBuf::from(std::env::var("ProgramData").unwrap_or_else(|_| "C:\\ProgramData".into()))
            .join("zipfill")
            .join("config.toml")
    } else {
        PathBuf::from("/etc/zipfill/config.toml")
    }
}

fn user_config_path() -> PathBuf {
    if let Ok(home) = std::env::var(HOME_OVERRIDE_VAR) {
        return PathBuf::from(home).join("config.toml");
    }

    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("zipfill")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn home_override_wins_for_user_config() {
        std::env::set_var(HOME_OVERRIDE_VAR, "/opt/zf-home");
        let paths = discover_paths(None);
        std::env::remove_var(HOME_OVERRIDE_VAR);

        assert_eq!(paths.user, PathBuf::from("/opt/zf-home/config.toml"));
        assert!(paths.project.is_none());
    }

    #[test]
    fn project_config_lives_under_dot_directory() {
        let paths = discover_paths(Some(Path::new("/srv/intake")));
        assert_eq!(
            paths.project,
            Some(PathBuf::from("/srv/intake/.zipfill/config.toml"))
        );
    }
}
