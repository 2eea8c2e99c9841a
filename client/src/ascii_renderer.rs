use common::animator::FrameSink;
use common::ascii_frame::AsciiFrame;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};
use std::error::Error;
use std::io::{self, Write};
use tracing::debug;

use crate::driver::StatusDisplay;

/// Outputs ASCII frame data to a terminal
pub struct AsciiRenderer<W: Write> {
    out: W,
    /// what the terminal currently shows, used to reduce flickering
    prev_frame: Vec<char>,
    /// width of previous `AsciiFrame`
    prev_w: usize,
    /// height of previous `AsciiFrame`
    prev_h: usize,
    /// text drawn on the row under the frame
    status: String,
    /// terminal height, when known; the status line needs a spare row
    terminal_rows: Option<usize>,
    /// re-read the terminal height before every frame
    track_terminal: bool,
    /// whether the status row was skipped on the last draw
    status_hidden: bool,
}

impl AsciiRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        let mut renderer = Self::new(io::stdout());
        renderer.track_terminal = true;
        renderer.refresh_terminal_rows();
        renderer
    }
}

impl<W: Write> AsciiRenderer<W> {
    pub fn new(out: W) -> Self {
        AsciiRenderer {
            out,
            prev_frame: Vec::new(),
            prev_w: 0,
            prev_h: 0,
            status: String::new(),
            terminal_rows: None,
            track_terminal: false,
            status_hidden: false,
        }
    }

    /// Fix the terminal height instead of querying it
    pub fn with_terminal_rows(mut self, rows: Option<usize>) -> Self {
        self.terminal_rows = rows;
        self.track_terminal = false;
        self
    }

    fn refresh_terminal_rows(&mut self) {
        if self.track_terminal {
            self.terminal_rows = terminal::size().ok().map(|(_, rows)| rows as usize);
        }
    }

    /// The status line goes on row `frame_h`, which must exist
    fn status_fits(&mut self, frame_h: usize) -> bool {
        let fits = self.terminal_rows.is_none_or(|rows| frame_h < rows);
        if fits == self.status_hidden {
            debug!(
                "status line {} ({} grid rows, terminal rows {:?})",
                if fits { "shown" } else { "hidden" },
                frame_h,
                self.terminal_rows
            );
            self.status_hidden = !fits;
        }
        fits
    }

    fn queue_status(&mut self, row: usize) -> io::Result<()> {
        if !self.status_fits(row) {
            return Ok(());
        }

        queue!(
            self.out,
            MoveTo(0, row as u16),
            Clear(ClearType::CurrentLine),
            Print(&self.status)
        )
    }

    /// With an `AsciiFrame`, output any ASCII characters that changed from
    /// `prev_frame` to the screen, and record these changes into
    /// `prev_frame`
    pub fn render(&mut self, frame: &AsciiFrame) -> io::Result<()> {
        self.refresh_terminal_rows();

        // did frame size change?
        if frame.w != self.prev_w
            || frame.h != self.prev_h
            || self.prev_frame.len() != frame.w * frame.h
        {
            debug!("terminal surface resized to {}x{}", frame.w, frame.h);
            queue!(self.out, Clear(ClearType::All))?;

            // a blank screen already shows every space
            self.prev_frame = vec![' '; frame.w * frame.h];
            self.prev_w = frame.w;
            self.prev_h = frame.h;
        }

        for (i, (&c, prev)) in frame
            .chars()
            .iter()
            .zip(self.prev_frame.iter_mut())
            .enumerate()
        {
            if c != *prev {
                let x = (i % frame.w) as u16;
                let y = (i / frame.w) as u16;
                queue!(self.out, MoveTo(x, y), Print(c))?;
                *prev = c;
            }
        }

        self.queue_status(frame.h)?;

        self.out.flush()
    }
}

impl<W: Write> StatusDisplay for AsciiRenderer<W> {
    fn set_status(&mut self, status: String) {
        self.status = status;
    }

    fn show_status(&mut self, status: String) -> io::Result<()> {
        self.status = status;
        self.queue_status(self.prev_h)?;
        self.out.flush()
    }
}

impl<W: Write> FrameSink for AsciiRenderer<W> {
    fn present(&mut self, frame: &AsciiFrame) -> Result<(), Box<dyn Error>> {
        self.render(frame)?;
        Ok(())
    }
}
