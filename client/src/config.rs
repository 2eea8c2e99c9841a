use common::config::{RenderConfig, RenderSettings};
use common::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_FPS: u32 = 60;

/// Everything the viewer needs: the tick rate plus rendering parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Target frames per second
    pub fps: u32,
    pub render: RenderSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            render: RenderSettings::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ViewerConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(String),

    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid render settings: {0}")]
    Render(#[from] ConfigError),

    #[error("fps must be greater than zero")]
    ZeroFps,
}

impl ViewerConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ViewerConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ViewerConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: ViewerConfig = serde_yaml::from_str(&content)?;

        Ok(config)
    }

    /// Defaults when no file is given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ViewerConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply command line overrides on top of the file values
    pub fn with_overrides(
        mut self,
        width: Option<usize>,
        height: Option<usize>,
        fps: Option<u32>,
    ) -> Self {
        if let Some(width) = width {
            self.render.grid_width = width;
        }
        if let Some(height) = height {
            self.render.grid_height = height;
        }
        if let Some(fps) = fps {
            self.fps = fps;
        }
        self
    }

    /// Validate and build the immutable render config
    pub fn render_config(&self) -> Result<RenderConfig, ViewerConfigError> {
        if self.fps == 0 {
            return Err(ViewerConfigError::ZeroFps);
        }

        Ok(RenderConfig::from_settings(self.render.clone())?)
    }

    /// Time between ticks
    pub fn frame_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.fps.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_config() {
        let result = ViewerConfig::from_file("/nonexistent/donut.yaml");
        assert!(matches!(result, Err(ViewerConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("donut.yaml");
        std::fs::write(&path, "fps: [30").unwrap();

        let result = ViewerConfig::from_file(&path);
        assert!(matches!(result, Err(ViewerConfigError::Parse(_))));
    }

    #[test]
    fn test_load_partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("donut.yaml");
        std::fs::write(
            &path,
            r#"
fps: 30
render:
  grid_width: 40
  grid_height: 24
  wrap_angles: true
"#,
        )
        .unwrap();

        let config = ViewerConfig::from_file(&path).unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.render.grid_width, 40);
        assert!(config.render.wrap_angles);
        assert_eq!(config.render.phi_step, 0.02);
        assert_eq!(config.render.luminance_ramp, ".,-~:;=!*#$@");

        let render = config.render_config().unwrap();
        assert_eq!(render.grid_height(), 24);
    }

    #[test]
    fn test_no_path_uses_defaults() {
        let config = ViewerConfig::load_or_default(None).unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.fps, DEFAULT_FPS);
    }

    #[test]
    fn test_overrides_win() {
        let config = ViewerConfig::default().with_overrides(Some(70), None, Some(30));

        assert_eq!(config.render.grid_width, 70);
        assert_eq!(config.render.grid_height, 24);
        assert_eq!(config.fps, 30);
    }

    #[test]
    fn test_render_config_validation() {
        let config = ViewerConfig::default().with_overrides(Some(0), None, None);
        assert!(matches!(
            config.render_config(),
            Err(ViewerConfigError::Render(ConfigError::ZeroDimensions { .. }))
        ));

        let config = ViewerConfig::default().with_overrides(None, None, Some(0));
        assert!(matches!(config.render_config(), Err(ViewerConfigError::ZeroFps)));
    }

    #[test]
    fn test_bundled_config_is_valid() {
        let config: ViewerConfig =
            serde_yaml::from_str(include_str!("../../config/donut.yaml")).unwrap();

        assert_eq!(config.fps, 30);
        let render = config.render_config().unwrap();
        assert_eq!(render.grid_width(), 70);
        assert_eq!(render.grid_height(), 40);
    }

    #[test]
    fn test_frame_interval() {
        let config = ViewerConfig::default().with_overrides(None, None, Some(50));
        assert_eq!(config.frame_interval(), Duration::from_millis(20));
    }
}
