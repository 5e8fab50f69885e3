//! Frame source implementations

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, trace};

use crate::frame::Frame;
use crate::CaptureError;

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Deterministic generated traffic frames
///
/// Renders bright vehicle-sized blocks over a dark road background. Block
/// count scales with the configured intensity and positions advance with the
/// sequence number, so two sources with the same configuration produce
/// identical streams. Timestamps run on a simulated 30 fps clock.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    intensity: f32,
    sequence: u32,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, intensity: f32) -> Self {
        info!(
            "synthetic source: {}x{} at intensity {:.2}",
            width, height, intensity
        );
        Self {
            width,
            height,
            intensity: intensity.clamp(0.0, 1.0),
            sequence: 0,
        }
    }

    fn render(&self) -> Vec<u8> {
        let mut data = vec![24u8; (self.width * self.height * 3) as usize];

        let block_w = (self.width / 4).max(1).min(self.width);
        let block_h = (self.height / 4).max(1).min(self.height);
        let blocks = (self.intensity * 6.0).round() as u64;

        for i in 0..blocks {
            let x_span = (self.width - block_w + 1) as u64;
            let y_span = (self.height - block_h + 1) as u64;
            let x = ((i * 97 + self.sequence as u64 * 31) % x_span) as u32;
            let y = ((i * 61 + self.sequence as u64 * 17) % y_span) as u32;
            let value = 180 + ((i * 13) % 60) as u8;

            for row in y..y + block_h {
                for col in x..x + block_w {
                    let idx = ((row * self.width + col) * 3) as usize;
                    data[idx] = value;
                    data[idx + 1] = value;
                    data[idx + 2] = value;
                }
            }
        }

        data
    }
}

impl crate::FrameSource for SyntheticSource {
    fn read(&mut self) -> Result<Frame, CaptureError> {
        let frame = Frame::new(
            self.render(),
            self.width,
            self.height,
            self.sequence as u64 * 33_000_000,
            self.sequence,
        );
        trace!("synthetic frame {}", self.sequence);
        self.sequence += 1;
        Ok(frame)
    }
}

impl Drop for SyntheticSource {
    fn drop(&mut self) {
        debug!("synthetic source released ({} frames generated)", self.sequence);
    }
}

/// Replays image files from a directory, in name order
///
/// Frames are decoded with the `image` crate and delivered at the configured
/// capture size. Running out of files is an acquisition failure, which makes
/// recorded approach footage a natural way to drive bounded simulation runs.
pub struct DirectorySource {
    path: String,
    files: Vec<PathBuf>,
    width: u32,
    height: u32,
    cursor: u32,
}

impl DirectorySource {
    pub fn new(path: &str, width: u32, height: u32) -> Result<Self, CaptureError> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(path)
            .map_err(|e| CaptureError::Open(format!("{}: {}", path, e)))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png"))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();

        info!("directory source: {} ({} frames)", path, files.len());

        Ok(Self {
            path: path.to_string(),
            files,
            width,
            height,
            cursor: 0,
        })
    }

    /// Frames remaining before the source exhausts
    pub fn remaining(&self) -> usize {
        self.files.len() - self.cursor as usize
    }
}

impl crate::FrameSource for DirectorySource {
    fn read(&mut self) -> Result<Frame, CaptureError> {
        let file = self
            .files
            .get(self.cursor as usize)
            .ok_or(CaptureError::Exhausted(self.cursor))?;

        let img = image::open(file)
            .map_err(|e| CaptureError::Decode(format!("{}: {}", file.display(), e)))?
            .to_rgb8();

        let (width, height) = img.dimensions();
        let mut frame = Frame::new(img.into_raw(), width, height, now_ns(), self.cursor);
        if (width, height) != (self.width, self.height) {
            frame = frame.resize(self.width, self.height);
        }

        trace!("frame {} from {}", self.cursor, file.display());
        self.cursor += 1;
        Ok(frame)
    }
}

impl Drop for DirectorySource {
    fn drop(&mut self) {
        debug!(
            "frame source released: {} ({} frames read)",
            self.path, self.cursor
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FrameSource;

    #[test]
    fn test_synthetic_deterministic() {
        let mut a = SyntheticSource::new(64, 48, 0.7);
        let mut b = SyntheticSource::new(64, 48, 0.7);

        for _ in 0..3 {
            let fa = a.read().unwrap();
            let fb = b.read().unwrap();
            assert_eq!(fa.data, fb.data);
            assert_eq!(fa.timestamp_ns, fb.timestamp_ns);
        }
    }

    #[test]
    fn test_synthetic_empty_road() {
        let mut source = SyntheticSource::new(32, 32, 0.0);
        let frame = source.read().unwrap();
        assert!(frame.data.iter().all(|&v| v == 24));
    }

    #[test]
    fn test_synthetic_traffic_brightens_frame() {
        let mut source = SyntheticSource::new(64, 48, 1.0);
        let frame = source.read().unwrap();
        assert!(frame.data.iter().any(|&v| v >= 180));
    }

    #[test]
    fn test_directory_missing() {
        assert!(DirectorySource::new("/nonexistent/approach-b", 640, 480).is_err());
    }

    #[test]
    fn test_directory_exhaustion() {
        let dir = std::env::temp_dir().join(format!("frame-capture-empty-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut source = DirectorySource::new(dir.to_str().unwrap(), 640, 480).unwrap();
        assert_eq!(source.remaining(), 0);
        assert!(matches!(source.read(), Err(CaptureError::Exhausted(0))));
    }
}
