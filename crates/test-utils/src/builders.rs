#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rewatch::config::{validate_settings, OutputMode, Settings};

/// Builder for `Settings` to simplify test setup.
///
/// Defaults: target `out`, extensions `src` -> `out`, a placeholder compiler
/// command, batch mode, 10ms polling.
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        let mut settings = Settings::new(Vec::new());
        settings.target_dir = PathBuf::from("out");
        settings.compiler_cmd = Some("fake".to_string());
        settings.poll_interval = Duration::from_millis(10);
        Self { settings }
    }

    pub fn root(mut self, root: &str) -> Self {
        self.settings.roots.push(PathBuf::from(root));
        self
    }

    pub fn target(mut self, dir: impl Into<PathBuf>) -> Self {
        self.settings.target_dir = dir.into();
        self
    }

    pub fn extensions(mut self, source: &str, target: &str) -> Self {
        self.settings.source_ext = source.to_string();
        self.settings.target_ext = target.to_string();
        self
    }

    pub fn watch(mut self) -> Self {
        self.settings.watch = true;
        self
    }

    pub fn print(mut self) -> Self {
        self.settings.output_mode = OutputMode::Print;
        self
    }

    pub fn output_file(mut self, path: &str) -> Self {
        self.settings.output_file = Some(PathBuf::from(path));
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.settings.poll_interval = interval;
        self
    }

    pub fn build(self) -> Arc<Settings> {
        validate_settings(&self.settings).expect("Failed to build valid settings from builder");
        Arc::new(self.settings)
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
