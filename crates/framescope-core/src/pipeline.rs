//! Capture, decode and render on two threads.
//!
//! The capture thread pulls frames from a [`FrameSource`], decodes them and
//! applies the [`ProtocolFilter`]; matching chains cross a bounded channel to
//! the renderer thread. The stop signal is checked between captures, so a
//! live source needs a read timeout for a stop to be observed while idle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;

use thiserror::Error;
use tracing::{debug, warn};

use crate::breakdown::{FrameRecord, FrameSummary};
use crate::config::CaptureConfig;
use crate::decode::decode_frame;
use crate::filter::ProtocolFilter;
use crate::pdu::PduChain;
use crate::source::{Frame, FrameSource, SourceError};

/// A frame that passed decoding and filtering.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    /// Position in the capture, starting at 1. Dropped frames keep their
    /// number, so gaps show what was skipped.
    pub index: u64,
    pub ts: Option<f64>,
    pub chain: PduChain<Vec<u8>>,
}

impl DecodedFrame {
    pub fn summary(&self) -> FrameSummary {
        FrameSummary::from_chain(&self.chain)
    }

    pub fn record(&self) -> FrameRecord {
        FrameRecord::new(self.index, self.ts, &self.chain)
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The output went away; nothing further can be rendered.
    #[error("renderer output closed")]
    Closed,
}

/// Consumer of decoded frames, driven from the renderer thread.
pub trait Renderer {
    fn add_pdu(&mut self, frame: &DecodedFrame) -> Result<(), RenderError>;

    /// Called once after the last frame.
    fn finish(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn add_pdu(&mut self, frame: &DecodedFrame) -> Result<(), RenderError> {
        (**self).add_pdu(frame)
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        (**self).finish()
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("capture failed: {0}")]
    Source(#[from] SourceError),
    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
}

/// Cooperative stop flag shared with signal handlers or other threads.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counters for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub captured: u64,
    pub decoded: u64,
    pub truncated: u64,
    pub filtered_out: u64,
    /// Frames handed to the renderer thread.
    pub delivered: u64,
    pub rendered: u64,
    pub render_errors: u64,
}

#[derive(Debug, Default)]
struct RenderTally {
    rendered: u64,
    errors: u64,
}

/// Run the pipeline until the source is exhausted, `config.max_frames` frames
/// were delivered, the renderer output closes or `stop` is raised.
///
/// # Errors
/// Returns [`PipelineError::Source`] when the source fails with anything but
/// a timeout, and [`PipelineError::ThreadPanicked`] if a worker panics.
pub fn run_pipeline<S, R>(
    source: &mut S,
    renderer: &mut R,
    filter: &ProtocolFilter,
    config: &CaptureConfig,
    stop: &StopSignal,
) -> Result<PipelineStats, PipelineError>
where
    S: FrameSource + Send + ?Sized,
    R: Renderer + Send + ?Sized,
{
    let (tx, rx) = mpsc::sync_channel(config.channel_capacity.max(1));

    thread::scope(|scope| -> Result<PipelineStats, PipelineError> {
        let render_handle = scope.spawn(move || render_loop(renderer, rx));
        let capture_handle = scope.spawn(move || capture_loop(source, tx, filter, config, stop));

        let captured = capture_handle
            .join()
            .map_err(|_| PipelineError::ThreadPanicked("capture"))?;
        let tally = render_handle
            .join()
            .map_err(|_| PipelineError::ThreadPanicked("renderer"))?;

        let mut stats = captured?;
        stats.rendered = tally.rendered;
        stats.render_errors = tally.errors;
        debug!(?stats, "pipeline finished");
        Ok(stats)
    })
}

fn capture_loop<S: FrameSource + ?Sized>(
    source: &mut S,
    tx: SyncSender<DecodedFrame>,
    filter: &ProtocolFilter,
    config: &CaptureConfig,
    stop: &StopSignal,
) -> Result<PipelineStats, SourceError> {
    let mut stats = PipelineStats::default();

    while !stop.is_stopped() {
        if config.max_frames.is_some_and(|max| stats.delivered >= max) {
            debug!(delivered = stats.delivered, "frame limit reached");
            break;
        }
        let Frame { ts, data } = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                debug!("source exhausted");
                break;
            }
            Err(err) if err.is_timeout() => continue,
            Err(err) => return Err(err),
        };
        stats.captured += 1;
        let index = stats.captured;

        let chain = match decode_frame(data) {
            Ok(chain) => chain,
            Err(err) => {
                stats.truncated += 1;
                warn!(frame = index, error = %err, "dropping undecodable frame");
                continue;
            }
        };
        stats.decoded += 1;

        if !filter.matches(&chain) {
            stats.filtered_out += 1;
            continue;
        }
        if tx.send(DecodedFrame { index, ts, chain }).is_err() {
            debug!("renderer gone, ending capture");
            break;
        }
        stats.delivered += 1;
    }

    Ok(stats)
}

fn render_loop<R: Renderer + ?Sized>(renderer: &mut R, rx: Receiver<DecodedFrame>) -> RenderTally {
    let mut tally = RenderTally::default();

    for frame in rx {
        match renderer.add_pdu(&frame) {
            Ok(()) => tally.rendered += 1,
            Err(RenderError::Closed) => {
                warn!(frame = frame.index, "renderer output closed");
                tally.errors += 1;
                return tally;
            }
            Err(err) => {
                tally.errors += 1;
                warn!(frame = frame.index, error = %err, "failed to render frame");
            }
        }
    }
    if let Err(err) = renderer.finish() {
        tally.errors += 1;
        warn!(error = %err, "failed to finish rendering");
    }
    tally
}
