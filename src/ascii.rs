use crate::error::RenderError;
use crate::frame::{FrameData, FrameProcessor};
use crate::hand::{Hand, HAND_SKELETON};
use crate::params::{DisplayParameters, CHAR_SIZE_DEFAULT, CHAR_SIZE_MAX, CHAR_SIZE_MIN};

/// Default character ramp, darkest to lightest
pub const DEFAULT_RAMP: &str = "@%#*+=-:. ";

/// Ordered fixed sequence of printable glyphs from darkest to lightest.
///
/// Immutable for a run except for an explicit polarity flip (dark mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
}

impl GlyphRamp {
    pub fn new(ramp: &str) -> Result<Self, RenderError> {
        let glyphs: Vec<char> = ramp.chars().collect();
        if glyphs.is_empty() {
            return Err(RenderError::EmptyRamp);
        }
        Ok(Self { glyphs })
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// The ramp with polarity flipped, for dark-background rendering
    pub fn reversed(&self) -> Self {
        let mut glyphs = self.glyphs.clone();
        glyphs.reverse();
        Self { glyphs }
    }

    /// Map a pixel intensity to a ramp index: floor(pixel / 256 * M),
    /// clamped to [0, M-1]. Monotonic in the pixel value.
    pub fn index_for(&self, pixel: u8) -> usize {
        let index = (pixel as usize * self.glyphs.len()) / 256;
        index.min(self.glyphs.len() - 1)
    }

    /// Map a pixel intensity to its glyph
    pub fn quantize(&self, pixel: u8) -> char {
        self.glyphs[self.index_for(pixel)]
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        // DEFAULT_RAMP is non-empty, so this cannot fail
        Self {
            glyphs: DEFAULT_RAMP.chars().collect(),
        }
    }
}

/// A rendered glyph grid, one char per sampled pixel, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiFrame {
    pub width: u32,
    pub height: u32,
    rows: Vec<String>,
}

impl AsciiFrame {
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// The whole grid as newline-joined text, the shape screenshots are
    /// written in
    pub fn to_text(&self) -> String {
        self.rows.join("\n")
    }

    /// Plot a hand skeleton onto the grid, sampling points along each
    /// bone. Keypoints slightly outside the frame are clamped to the
    /// grid edge.
    pub fn overlay_hand(&mut self, hand: &Hand, glyph: char) {
        let mut grid: Vec<Vec<char>> = self.rows.iter().map(|r| r.chars().collect()).collect();

        for (from, to) in HAND_SKELETON {
            let (col_a, row_a) = self.grid_position(hand.joint(from).x, hand.joint(from).y);
            let (col_b, row_b) = self.grid_position(hand.joint(to).x, hand.joint(to).y);

            let steps = (col_b as i64 - col_a as i64)
                .abs()
                .max((row_b as i64 - row_a as i64).abs())
                .max(1) as u32;
            for step in 0..=steps {
                let t = step as f32 / steps as f32;
                let col = (col_a as f32 + (col_b as f32 - col_a as f32) * t).round() as usize;
                let row = (row_a as f32 + (row_b as f32 - row_a as f32) * t).round() as usize;
                grid[row][col] = glyph;
            }
        }

        self.rows = grid.into_iter().map(|r| r.into_iter().collect()).collect();
    }

    fn grid_position(&self, x: f32, y: f32) -> (usize, usize) {
        let col = (x * (self.width - 1) as f32).round();
        let row = (y * (self.height - 1) as f32).round();
        (
            (col.max(0.0) as usize).min(self.width as usize - 1),
            (row.max(0.0) as usize).min(self.height as usize - 1),
        )
    }
}

/// Converts adjusted grayscale frames into glyph grids.
///
/// The configured grid resolution applies at the default character cell
/// size; the current `char_size` rescales it inversely, so smaller cells
/// give a denser grid over the same canvas. The renderer downsamples
/// with nearest neighbor, applies the brightness/contrast affine map, and
/// quantizes each pixel through the ramp.
pub struct AsciiRenderer {
    ramp: GlyphRamp,
    grid_width: u32,
    grid_height: u32,
}

impl AsciiRenderer {
    pub fn new(ramp: GlyphRamp, grid_width: u32, grid_height: u32) -> Result<Self, RenderError> {
        if grid_width == 0 || grid_height == 0 {
            return Err(RenderError::InvalidGridSize {
                width: grid_width,
                height: grid_height,
            });
        }
        Ok(Self {
            ramp,
            grid_width,
            grid_height,
        })
    }

    pub fn grid_size(&self) -> (u32, u32) {
        (self.grid_width, self.grid_height)
    }

    /// Effective grid dimensions for a character cell size
    pub fn grid_for(&self, char_size: u32) -> (u32, u32) {
        let char_size = char_size.clamp(CHAR_SIZE_MIN, CHAR_SIZE_MAX);
        (
            (self.grid_width * CHAR_SIZE_DEFAULT / char_size).max(1),
            (self.grid_height * CHAR_SIZE_DEFAULT / char_size).max(1),
        )
    }

    /// Brightness/contrast affine adjustment on a single pixel.
    ///
    /// Contrast scales the distance from mid-gray; the brightness
    /// multiplier maps to an additive offset so raising it monotonically
    /// raises output luma. Result is clamped to the byte range.
    pub fn adjust_pixel(pixel: u8, params: &DisplayParameters) -> u8 {
        let centered = (pixel as f32 - 128.0) * params.contrast + 128.0;
        let offset = (params.brightness - 1.0) * 128.0;
        (centered + offset).clamp(0.0, 255.0) as u8
    }

    /// Render a raw frame into a glyph grid: grayscale, mirror, scale to
    /// the grid sized for the current `char_size`, adjust, quantize.
    pub fn render(
        &self,
        frame: &FrameData,
        params: &DisplayParameters,
    ) -> Result<AsciiFrame, RenderError> {
        let (grid_width, grid_height) = self.grid_for(params.char_size);
        let gray = FrameProcessor::to_grayscale(frame)?;
        let mirrored = FrameProcessor::mirror_gray(&gray, frame.width, frame.height)?;
        let scaled = FrameProcessor::scale_gray(
            &mirrored,
            frame.width,
            frame.height,
            grid_width,
            grid_height,
        )?;

        self.quantize_grid(&scaled, grid_width, grid_height, params)
    }

    /// Render an already-downsampled grayscale grid at the configured
    /// base resolution
    pub fn render_gray_grid(
        &self,
        pixels: &[u8],
        params: &DisplayParameters,
    ) -> Result<AsciiFrame, RenderError> {
        self.quantize_grid(pixels, self.grid_width, self.grid_height, params)
    }

    fn quantize_grid(
        &self,
        pixels: &[u8],
        grid_width: u32,
        grid_height: u32,
        params: &DisplayParameters,
    ) -> Result<AsciiFrame, RenderError> {
        let expected = (grid_width * grid_height) as usize;
        if pixels.len() != expected {
            return Err(RenderError::FormatConversion {
                details: format!(
                    "Invalid grid data size: expected {}, got {}",
                    expected,
                    pixels.len()
                ),
            });
        }

        let ramp = if params.dark_mode {
            self.ramp.reversed()
        } else {
            self.ramp.clone()
        };

        let mut rows = Vec::with_capacity(grid_height as usize);
        for y in 0..grid_height {
            let row_start = (y * grid_width) as usize;
            let row: String = pixels[row_start..row_start + grid_width as usize]
                .iter()
                .map(|&p| ramp.quantize(Self::adjust_pixel(p, params)))
                .collect();
            rows.push(row);
        }

        Ok(AsciiFrame {
            width: grid_width,
            height: grid_height,
            rows,
        })
    }
}
