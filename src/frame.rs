use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::SystemTime;

/// Pixel layout of a raw frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameFormat {
    /// RGB24 format - 3 bytes per pixel
    Rgb24,
    /// Single-channel 8-bit grayscale
    Gray8,
}

impl FrameFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            FrameFormat::Rgb24 => 3,
            FrameFormat::Gray8 => 1,
        }
    }
}

/// Raw frame data with metadata, shared by reference through the pipeline
#[derive(Debug, Clone)]
pub struct FrameData {
    /// Unique frame identifier
    pub id: u64,
    /// Timestamp when the frame was captured
    pub timestamp: SystemTime,
    /// Raw frame bytes (shared ownership for efficiency)
    pub data: Arc<Vec<u8>>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel format
    pub format: FrameFormat,
}

impl FrameData {
    pub fn new(
        id: u64,
        timestamp: SystemTime,
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: FrameFormat,
    ) -> Self {
        Self {
            id,
            timestamp,
            data: Arc::new(data),
            width,
            height,
            format,
        }
    }

    pub fn expected_size(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }

    pub fn validate_size(&self) -> bool {
        self.data.len() == self.expected_size()
    }
}

/// Per-pixel frame transforms shared by the render and capture paths
pub struct FrameProcessor;

impl FrameProcessor {
    /// Convert an RGB24 frame to 8-bit grayscale using Rec. 601 luma
    /// weights. Gray8 input is passed through.
    pub fn to_grayscale(frame: &FrameData) -> Result<Vec<u8>, RenderError> {
        if !frame.validate_size() {
            return Err(RenderError::FormatConversion {
                details: format!(
                    "Invalid frame data size: expected {}, got {}",
                    frame.expected_size(),
                    frame.data.len()
                ),
            });
        }

        match frame.format {
            FrameFormat::Gray8 => Ok(frame.data.as_ref().clone()),
            FrameFormat::Rgb24 => {
                let mut gray = Vec::with_capacity((frame.width * frame.height) as usize);
                for chunk in frame.data.chunks_exact(3) {
                    let luma = 0.299 * chunk[0] as f32
                        + 0.587 * chunk[1] as f32
                        + 0.114 * chunk[2] as f32;
                    gray.push(luma.round().min(255.0) as u8);
                }
                Ok(gray)
            }
        }
    }

    /// Mirror a grayscale image horizontally, giving the familiar
    /// webcam-selfie orientation
    pub fn mirror_gray(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        if data.len() != (width * height) as usize {
            return Err(RenderError::FormatConversion {
                details: format!(
                    "Invalid Gray8 data size: expected {}, got {}",
                    width * height,
                    data.len()
                ),
            });
        }

        let mut mirrored = Vec::with_capacity(data.len());
        for y in 0..height {
            let row_start = (y * width) as usize;
            let row = &data[row_start..row_start + width as usize];
            mirrored.extend(row.iter().rev());
        }
        Ok(mirrored)
    }

    /// Scale a grayscale image to the target resolution using nearest
    /// neighbor sampling
    pub fn scale_gray(
        data: &[u8],
        src_width: u32,
        src_height: u32,
        dst_width: u32,
        dst_height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        if data.len() != (src_width * src_height) as usize {
            return Err(RenderError::FormatConversion {
                details: format!(
                    "Invalid Gray8 data size: expected {}, got {}",
                    src_width * src_height,
                    data.len()
                ),
            });
        }
        if dst_width == 0 || dst_height == 0 {
            return Err(RenderError::InvalidGridSize {
                width: dst_width,
                height: dst_height,
            });
        }

        let mut scaled = Vec::with_capacity((dst_width * dst_height) as usize);

        let x_ratio = src_width as f32 / dst_width as f32;
        let y_ratio = src_height as f32 / dst_height as f32;

        for dst_y in 0..dst_height {
            for dst_x in 0..dst_width {
                let src_x = ((dst_x as f32) * x_ratio) as u32;
                let src_y = ((dst_y as f32) * y_ratio) as u32;

                let src_x = src_x.min(src_width - 1);
                let src_y = src_y.min(src_height - 1);

                scaled.push(data[(src_y * src_width + src_x) as usize]);
            }
        }

        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_format_properties() {
        assert_eq!(FrameFormat::Rgb24.bytes_per_pixel(), 3);
        assert_eq!(FrameFormat::Gray8.bytes_per_pixel(), 1);
    }

    #[test]
    fn test_frame_size_validation() {
        let valid = FrameData::new(
            1,
            SystemTime::now(),
            vec![0u8; 640 * 480 * 3],
            640,
            480,
            FrameFormat::Rgb24,
        );
        assert!(valid.validate_size());

        let invalid = FrameData::new(
            2,
            SystemTime::now(),
            vec![0u8; 100],
            640,
            480,
            FrameFormat::Rgb24,
        );
        assert!(!invalid.validate_size());
    }

    #[test]
    fn test_grayscale_conversion() {
        // One white pixel, one black pixel
        let frame = FrameData::new(
            1,
            SystemTime::now(),
            vec![255, 255, 255, 0, 0, 0],
            2,
            1,
            FrameFormat::Rgb24,
        );
        let gray = FrameProcessor::to_grayscale(&frame).unwrap();
        assert_eq!(gray, vec![255, 0]);
    }

    #[test]
    fn test_grayscale_passthrough() {
        let frame = FrameData::new(
            1,
            SystemTime::now(),
            vec![10, 20, 30, 40],
            2,
            2,
            FrameFormat::Gray8,
        );
        assert_eq!(FrameProcessor::to_grayscale(&frame).unwrap(), vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_grayscale_rejects_bad_size() {
        let frame = FrameData::new(
            1,
            SystemTime::now(),
            vec![0u8; 5],
            2,
            1,
            FrameFormat::Rgb24,
        );
        assert!(FrameProcessor::to_grayscale(&frame).is_err());
    }

    #[test]
    fn test_mirror_gray() {
        let data = vec![1, 2, 3, 4, 5, 6];
        let mirrored = FrameProcessor::mirror_gray(&data, 3, 2).unwrap();
        assert_eq!(mirrored, vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_mirror_twice_is_identity() {
        let data: Vec<u8> = (0..12).collect();
        let once = FrameProcessor::mirror_gray(&data, 4, 3).unwrap();
        let twice = FrameProcessor::mirror_gray(&once, 4, 3).unwrap();
        assert_eq!(twice, data);
    }

    #[test]
    fn test_scale_gray_downsample() {
        // 4x4 image downsampled to 2x2 picks the top-left of each block
        let data: Vec<u8> = (0..16).collect();
        let scaled = FrameProcessor::scale_gray(&data, 4, 4, 2, 2).unwrap();
        assert_eq!(scaled, vec![0, 2, 8, 10]);
    }

    #[test]
    fn test_scale_gray_rejects_zero_target() {
        let data = vec![0u8; 16];
        assert!(FrameProcessor::scale_gray(&data, 4, 4, 0, 2).is_err());
    }
}
