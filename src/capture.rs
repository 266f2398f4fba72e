use crate::ascii::AsciiFrame;
use crate::config::CaptureConfig;
use crate::error::Result;
use chrono::Local;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Separator written between frames in a recording file
const FRAME_SEPARATOR: &str = "\n\x0c\n";

/// Writes glyph-grid artifacts (screenshots and recordings) under the
/// configured capture path, keyed by wall-clock timestamp strings.
pub struct ArtifactWriter {
    base_path: PathBuf,
    recording: Option<Recording>,
}

struct Recording {
    path: PathBuf,
    file: fs::File,
    frame_count: u64,
}

impl ArtifactWriter {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            base_path: PathBuf::from(&config.path),
            recording: None,
        }
    }

    fn timestamp() -> String {
        Local::now().format("%Y%m%d_%H%M%S_%3f").to_string()
    }

    fn ensure_base_path(&self) -> Result<()> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
            debug!("Created capture directory: {}", self.base_path.display());
        }
        Ok(())
    }

    /// Write the current glyph grid as a text screenshot; returns the
    /// written path
    pub fn save_screenshot(&self, frame: &AsciiFrame) -> Result<PathBuf> {
        self.ensure_base_path()?;

        let path = self
            .base_path
            .join(format!("ascii_capture_{}.txt", Self::timestamp()));
        fs::write(&path, frame.to_text())?;

        info!("Screenshot saved: {}", path.display());
        Ok(path)
    }

    /// Begin a new recording; any recording already in progress is
    /// finished first
    pub fn start_recording(&mut self) -> Result<PathBuf> {
        if self.recording.is_some() {
            self.stop_recording()?;
        }

        self.ensure_base_path()?;

        let path = self
            .base_path
            .join(format!("ascii_recording_{}.txt", Self::timestamp()));
        let file = fs::File::create(&path)?;

        info!("Recording started: {}", path.display());
        self.recording = Some(Recording {
            path: path.clone(),
            file,
            frame_count: 0,
        });
        Ok(path)
    }

    /// Append a frame to the active recording; a no-op when not recording
    pub fn record_frame(&mut self, frame: &AsciiFrame) -> Result<()> {
        if let Some(recording) = self.recording.as_mut() {
            if recording.frame_count > 0 {
                recording.file.write_all(FRAME_SEPARATOR.as_bytes())?;
            }
            recording.file.write_all(frame.to_text().as_bytes())?;
            recording.frame_count += 1;
        }
        Ok(())
    }

    /// Finish the active recording; returns its path and frame count
    pub fn stop_recording(&mut self) -> Result<Option<(PathBuf, u64)>> {
        match self.recording.take() {
            Some(mut recording) => {
                recording.file.flush()?;
                info!(
                    "Recording stopped: {} ({} frames)",
                    recording.path.display(),
                    recording.frame_count
                );
                Ok(Some((recording.path, recording.frame_count)))
            }
            None => Ok(None),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::{AsciiRenderer, GlyphRamp};
    use crate::params::DisplayParameters;
    use tempfile::TempDir;

    fn writer_in(dir: &TempDir) -> ArtifactWriter {
        ArtifactWriter::new(&CaptureConfig {
            path: dir.path().to_string_lossy().to_string(),
        })
    }

    fn sample_frame() -> AsciiFrame {
        let renderer = AsciiRenderer::new(GlyphRamp::default(), 3, 2).unwrap();
        renderer
            .render_gray_grid(&[0, 128, 255, 255, 128, 0], &DisplayParameters::default())
            .unwrap()
    }

    #[test]
    fn test_screenshot_written() {
        let dir = TempDir::new().unwrap();
        let writer = writer_in(&dir);

        let path = writer.save_screenshot(&sample_frame()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, sample_frame().to_text());
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("ascii_capture_"));
    }

    #[test]
    fn test_recording_lifecycle() {
        let dir = TempDir::new().unwrap();
        let mut writer = writer_in(&dir);
        assert!(!writer.is_recording());

        let path = writer.start_recording().unwrap();
        assert!(writer.is_recording());

        writer.record_frame(&sample_frame()).unwrap();
        writer.record_frame(&sample_frame()).unwrap();

        let (stopped_path, count) = writer.stop_recording().unwrap().unwrap();
        assert_eq!(stopped_path, path);
        assert_eq!(count, 2);
        assert!(!writer.is_recording());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches('\x0c').count(), 1);
    }

    #[test]
    fn test_record_frame_without_recording_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut writer = writer_in(&dir);
        writer.record_frame(&sample_frame()).unwrap();
        assert!(writer.stop_recording().unwrap().is_none());
    }

    #[test]
    fn test_capture_directory_created_on_demand() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested/captures");
        let writer = ArtifactWriter::new(&CaptureConfig {
            path: nested.to_string_lossy().to_string(),
        });
        writer.save_screenshot(&sample_frame()).unwrap();
        assert!(nested.exists());
    }
}
