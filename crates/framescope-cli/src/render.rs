//! Frame renderers selected by `--mode` and `--json`.

use std::io::{self, Write};

use framescope_core::{DecodedFrame, RenderError, Renderer, format_chain};
use time::OffsetDateTime;

/// Broken pipes mean the reader went away (e.g. `| head`).
fn write_error(err: io::Error) -> RenderError {
    if err.kind() == io::ErrorKind::BrokenPipe {
        RenderError::Closed
    } else {
        RenderError::Io(err)
    }
}

/// Wall-clock time of a capture timestamp, `HH:MM:SS.mmm` in UTC.
pub fn clock(ts: Option<f64>) -> String {
    let Some(ts) = ts else {
        return "-".to_string();
    };
    match OffsetDateTime::from_unix_timestamp_nanos((ts * 1_000_000_000.0) as i128) {
        Ok(dt) => format!(
            "{:02}:{:02}:{:02}.{:03}",
            dt.hour(),
            dt.minute(),
            dt.second(),
            dt.millisecond()
        ),
        Err(_) => "-".to_string(),
    }
}

/// Full breakdown of every layer, one block per frame.
pub struct StdoutRenderer<W> {
    out: W,
}

impl<W: Write> StdoutRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Renderer for StdoutRenderer<W> {
    fn add_pdu(&mut self, frame: &DecodedFrame) -> Result<(), RenderError> {
        let text = format_chain(&frame.chain);
        writeln!(
            self.out,
            "Frame {} ({} bytes) at {}",
            frame.index,
            frame.chain.frame().len(),
            clock(frame.ts)
        )
        .and_then(|()| writeln!(self.out, "{text}"))
        .and_then(|()| self.out.flush())
        .map_err(write_error)
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        self.out.flush().map_err(write_error)
    }
}

/// One table row per frame.
pub struct TerminalRenderer<W> {
    out: W,
    header_written: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }

    fn write_row(&mut self, frame: &DecodedFrame) -> io::Result<()> {
        if !self.header_written {
            writeln!(
                self.out,
                "{:>6}  {:<12}  {:<17}  {:<17}  {:<8}  {:>5}",
                "#", "Time", "Source", "Destination", "Protocol", "Size"
            )?;
            self.header_written = true;
        }
        let summary = frame.summary();
        writeln!(
            self.out,
            "{:>6}  {:<12}  {:<17}  {:<17}  {:<8}  {:>5}",
            frame.index,
            clock(frame.ts),
            summary.source,
            summary.destination,
            summary.protocol,
            summary.size
        )?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn add_pdu(&mut self, frame: &DecodedFrame) -> Result<(), RenderError> {
        self.write_row(frame).map_err(write_error)
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        self.out.flush().map_err(write_error)
    }
}

/// One JSON record per line.
pub struct JsonRenderer<W> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn add_pdu(&mut self, frame: &DecodedFrame) -> Result<(), RenderError> {
        let line = serde_json::to_string(&frame.record())?;
        writeln!(self.out, "{line}")
            .and_then(|()| self.out.flush())
            .map_err(write_error)
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        self.out.flush().map_err(write_error)
    }
}
