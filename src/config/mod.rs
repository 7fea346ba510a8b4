pub mod metadata;
pub mod settings;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::{DeleteOptions, ErrorPolicy, NotifyPolicy};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub left_directory: Option<PathBuf>,
    pub right_directory: Option<PathBuf>,
    pub show_hidden: bool,
    pub delete_policy: ErrorPolicy,
    pub notify_policy: NotifyPolicy,
    pub parallel_delete: bool,
}

impl AppConfig {
    pub fn load(config_dir: Option<&Path>) -> Result<Self> {
        settings::load_config(config_dir)
    }

    pub fn delete_options(&self) -> DeleteOptions {
        DeleteOptions {
            error_policy: self.delete_policy,
            notify: self.notify_policy,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            left_directory: None,
            right_directory: None,
            show_hidden: false,
            delete_policy: ErrorPolicy::BestEffort,
            notify_policy: NotifyPolicy::EveryAttempt,
            parallel_delete: false,
        }
    }
}
