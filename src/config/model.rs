use std::path::PathBuf;

use ml_core::{DataSource, LogisticParams, DEFAULT_DATASET_URL};

pub const DEFAULT_LOG_FILE: &str = "iris-predict.log";

/// Application settings, parsed from an optional JSON file and the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub dataset_url: String,
    /// Local CSV; wins over `dataset_url` when set.
    pub dataset_path: Option<PathBuf>,
    pub logistic: LogisticParams,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            dataset_path: None,
            logistic: LogisticParams::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Where the dataset is read from.
    pub fn source(&self) -> DataSource {
        match &self.dataset_path {
            Some(path) => DataSource::Local(path.clone()),
            None => DataSource::Remote(self.dataset_url.clone()),
        }
    }

    /// Applies `IRIS_DATASET_URL` and `IRIS_LOG_FILE` on top of the current values.
    ///
    /// # Args
    /// * `lookup` - Returns the value of an environment variable, if set.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("IRIS_DATASET_URL").filter(|v| !v.trim().is_empty()) {
            self.dataset_url = url.trim().to_string();
        }
        if let Some(file) = lookup("IRIS_LOG_FILE").filter(|v| !v.trim().is_empty()) {
            self.log_file = PathBuf::from(file.trim());
        }
    }
}
