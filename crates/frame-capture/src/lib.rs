//! Frame acquisition for junction approach cameras
//!
//! Provides the frame type and the source seam the control loop reads from:
//! - Synthetic source: deterministic generated traffic for simulation runs
//! - Directory source: replays image files captured from a real approach
//!
//! Sources are owned by the control loop and released on drop; a read failure
//! is terminal for the run, never retried here.

pub mod frame;
pub mod source;

pub use frame::Frame;
pub use source::{DirectorySource, SyntheticSource};

use thiserror::Error;

/// Frame source error types
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to open source: {0}")]
    Open(String),

    #[error("Failed to decode frame: {0}")]
    Decode(String),

    #[error("Source exhausted after {0} frames")]
    Exhausted(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source kind selected via configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Deterministic generated frames
    Synthetic,
    /// Image files replayed from a directory, in name order
    Directory,
}

/// Frame source configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Source kind
    pub kind: SourceKind,
    /// Directory path (directory sources only)
    pub path: Option<String>,
    /// Native capture width
    pub width: u32,
    /// Native capture height
    pub height: u32,
    /// Simulated traffic level, 0.0 (empty road) to 1.0 (saturated)
    pub intensity: f32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Synthetic,
            path: None,
            width: 640,
            height: 480,
            intensity: 0.5,
        }
    }
}

impl SourceConfig {
    /// Synthetic source at the given traffic level
    pub fn synthetic(intensity: f32) -> Self {
        Self {
            intensity,
            ..Default::default()
        }
    }

    /// Directory-replay source
    pub fn directory(path: &str) -> Self {
        Self {
            kind: SourceKind::Directory,
            path: Some(path.to_string()),
            ..Default::default()
        }
    }
}

/// One approach's frame supplier
///
/// `read` blocks until the next frame is available. Any error is a terminal
/// acquisition failure for the whole run.
pub trait FrameSource: Send {
    fn read(&mut self) -> Result<Frame, CaptureError>;
}

/// Open a frame source from configuration
pub fn open_source(config: &SourceConfig) -> Result<Box<dyn FrameSource>, CaptureError> {
    if config.width == 0 || config.height == 0 {
        return Err(CaptureError::Open(format!(
            "source dimensions {}x{} must be non-zero",
            config.width, config.height
        )));
    }
    match config.kind {
        SourceKind::Synthetic => Ok(Box::new(SyntheticSource::new(
            config.width,
            config.height,
            config.intensity,
        ))),
        SourceKind::Directory => {
            let path = config
                .path
                .as_deref()
                .ok_or_else(|| CaptureError::Open("directory source requires a path".into()))?;
            Ok(Box::new(DirectorySource::new(path, config.width, config.height)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SourceConfig::default();
        assert_eq!(config.kind, SourceKind::Synthetic);
        assert_eq!((config.width, config.height), (640, 480));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = SourceConfig {
            width: 0,
            ..Default::default()
        };
        assert!(open_source(&config).is_err());
    }

    #[test]
    fn test_directory_requires_path() {
        let config = SourceConfig {
            kind: SourceKind::Directory,
            path: None,
            ..Default::default()
        };
        assert!(open_source(&config).is_err());
    }

    #[test]
    fn test_open_synthetic() {
        let mut source = open_source(&SourceConfig::synthetic(0.8)).unwrap();
        let frame = source.read().unwrap();
        assert_eq!((frame.width, frame.height), (640, 480));
    }
}
