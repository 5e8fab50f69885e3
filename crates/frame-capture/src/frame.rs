//! Frame type and pixel-level helpers

/// Decoded RGB frame from one approach camera
#[derive(Debug, Clone)]
pub struct Frame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl Frame {
    /// Create a frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Mean luminance of a rectangular region, 0.0 to 255.0
    ///
    /// Out-of-bounds portions of the rectangle are ignored; an empty
    /// intersection yields 0.0.
    pub fn region_luma(&self, x: u32, y: u32, w: u32, h: u32) -> f32 {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        if x >= x_end || y >= y_end {
            return 0.0;
        }

        let mut sum: u64 = 0;
        for row in y..y_end {
            for col in x..x_end {
                let idx = ((row * self.width + col) * 3) as usize;
                // Luminance formula: 0.299*R + 0.587*G + 0.114*B
                sum += (self.data[idx] as f32 * 0.299
                    + self.data[idx + 1] as f32 * 0.587
                    + self.data[idx + 2] as f32 * 0.114) as u64;
            }
        }
        sum as f32 / ((x_end - x) as u64 * (y_end - y) as u64) as f32
    }

    /// Resize to new dimensions (nearest neighbor)
    pub fn resize(&self, new_width: u32, new_height: u32) -> Frame {
        let mut resized = Vec::with_capacity((new_width * new_height * 3) as usize);

        let x_ratio = self.width as f32 / new_width as f32;
        let y_ratio = self.height as f32 / new_height as f32;

        for y in 0..new_height {
            for x in 0..new_width {
                let src_x = (x as f32 * x_ratio).floor() as u32;
                let src_y = (y as f32 * y_ratio).floor() as u32;

                if let Some(pixel) =
                    self.get_pixel(src_x.min(self.width - 1), src_y.min(self.height - 1))
                {
                    resized.extend_from_slice(&pixel);
                } else {
                    resized.extend_from_slice(&[0, 0, 0]);
                }
            }
        }

        Frame {
            data: resized,
            width: new_width,
            height: new_height,
            timestamp_ns: self.timestamp_ns,
            sequence: self.sequence,
        }
    }
}
