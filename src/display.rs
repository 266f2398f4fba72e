use crate::ascii::AsciiFrame;
use crate::error::Result;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use std::io::{stdout, Write};
use tracing::debug;

/// Output surface for rendered glyph grids.
///
/// The session loop pushes one grid plus a status line per frame; sinks
/// decide how to present them.
pub trait RenderSink: Send {
    fn present(&mut self, frame: &AsciiFrame, status: &str) -> Result<()>;
}

/// Draws the glyph grid to the terminal with crossterm
pub struct TerminalSink {
    frames_presented: u64,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            frames_presented: 0,
        }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for TerminalSink {
    fn present(&mut self, frame: &AsciiFrame, status: &str) -> Result<()> {
        let mut out = stdout();

        if self.frames_presented == 0 {
            queue!(out, Clear(ClearType::All))?;
        }

        for (row_index, row) in frame.rows().iter().enumerate() {
            queue!(out, MoveTo(0, row_index as u16), Print(row))?;
        }
        queue!(
            out,
            MoveTo(0, frame.height as u16 + 1),
            Clear(ClearType::CurrentLine),
            Print(status)
        )?;
        out.flush()?;

        self.frames_presented += 1;
        Ok(())
    }
}

/// Sink that records what it was asked to present, for tests
#[derive(Default)]
pub struct MemorySink {
    pub frames: Vec<AsciiFrame>,
    pub statuses: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&AsciiFrame> {
        self.frames.last()
    }
}

impl RenderSink for MemorySink {
    fn present(&mut self, frame: &AsciiFrame, status: &str) -> Result<()> {
        debug!("MemorySink presenting {}x{} frame", frame.width, frame.height);
        self.frames.push(frame.clone());
        self.statuses.push(status.to_string());
        Ok(())
    }
}
