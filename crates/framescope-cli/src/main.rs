use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use framescope_core::{
    CaptureConfig, FrameSource, InterfaceSource, PcapFileSource, PipelineError, PipelineStats,
    Protocol, ProtocolFilter, Renderer, SourceError, StopSignal, list_interfaces, run_pipeline,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod render;

use render::{JsonRenderer, StdoutRenderer, TerminalRenderer};

#[derive(Parser, Debug)]
#[command(name = "framescope")]
#[command(version)]
#[command(
    about = "Capture Ethernet frames and decode their ARP, IPv4 and ICMP layers.",
    long_about = None,
    after_help = "Examples:\n  framescope --interface eth0\n  framescope --interface eth0 --mode terminal --protocols arp,icmp\n  framescope --read capture.pcap --json"
)]
struct Cli {
    /// Network interface to capture on
    #[arg(
        short = 'i',
        long,
        value_name = "NAME",
        conflicts_with = "read",
        required_unless_present_any = ["read", "list_interfaces"]
    )]
    interface: Option<String>,

    /// Replay frames from a .pcap or .pcapng file
    #[arg(short = 'r', long, value_name = "FILE")]
    read: Option<PathBuf>,

    /// Output layout
    #[arg(long, value_enum, default_value_t = Mode::Stdout)]
    mode: Mode,

    /// Only show frames containing one of these protocols (comma-separated)
    #[arg(short = 'p', long, value_name = "LIST")]
    protocols: Option<String>,

    /// Print one JSON record per frame
    #[arg(long, conflicts_with = "mode")]
    json: bool,

    /// Stop after this many frames were shown
    #[arg(short = 'c', long, value_name = "N")]
    count: Option<u64>,

    /// Reopen the interface up to N times after a capture failure
    #[arg(long, value_name = "N", default_value_t = 0)]
    restarts: u32,

    /// Read timeout of the live channel in milliseconds (0 blocks)
    #[arg(long, value_name = "MS", default_value_t = 250)]
    read_timeout_ms: u64,

    /// List capture interfaces and exit
    #[arg(long)]
    list_interfaces: bool,

    /// Suppress the end-of-capture summary
    #[arg(short = 'q', long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Full breakdown of every layer
    Stdout,
    /// One table row per frame
    Terminal,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if cli.list_interfaces {
        for name in list_interfaces() {
            println!("{name}");
        }
        return Ok(());
    }

    let filter = parse_filter(cli.protocols.as_deref())?;
    let config = CaptureConfig {
        read_timeout: (cli.read_timeout_ms > 0).then(|| Duration::from_millis(cli.read_timeout_ms)),
        max_frames: cli.count,
        ..CaptureConfig::default()
    };
    let mut renderer = make_renderer(cli.mode, cli.json);
    let stop = StopSignal::new();

    let stats = match (&cli.read, &cli.interface) {
        (Some(path), _) => replay(path, &mut renderer, &filter, &config, &stop)?,
        (None, Some(name)) => {
            capture_live(name, cli.restarts, &mut renderer, &filter, &config, &stop)?
        }
        (None, None) => {
            return Err(CliError::new(
                "no frame source given",
                Some("use --interface NAME or --read FILE".to_string()),
            ));
        }
    };

    info!(?stats, "capture finished");
    if !cli.quiet {
        eprintln!(
            "{} frames captured, {} shown, {} filtered out, {} truncated",
            stats.captured, stats.rendered, stats.filtered_out, stats.truncated
        );
    }
    Ok(())
}

fn parse_filter(list: Option<&str>) -> Result<ProtocolFilter, CliError> {
    let Some(list) = list else {
        return Ok(ProtocolFilter::all());
    };
    ProtocolFilter::parse(list).map_err(|err| {
        let known = Protocol::NAMED
            .iter()
            .map(|protocol| protocol.short_name())
            .collect::<Vec<_>>()
            .join(", ");
        CliError::new(err.to_string(), Some(format!("known protocols: {known}")))
    })
}

fn make_renderer(mode: Mode, json: bool) -> Box<dyn Renderer + Send> {
    let out = std::io::stdout();
    if json {
        return Box::new(JsonRenderer::new(out));
    }
    match mode {
        Mode::Stdout => Box::new(StdoutRenderer::new(out)),
        Mode::Terminal => Box::new(TerminalRenderer::new(out)),
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn replay<R: Renderer + Send + ?Sized>(
    path: &Path,
    renderer: &mut R,
    filter: &ProtocolFilter,
    config: &CaptureConfig,
    stop: &StopSignal,
) -> Result<PipelineStats, CliError> {
    validate_input_file(path)?;
    let mut source = PcapFileSource::open(path)
        .with_context(|| format!("failed to open capture file: {}", path.display()))?;
    let stats = pipeline(&mut source, renderer, filter, config, stop)?;
    if source.skipped() > 0 {
        warn!(skipped = source.skipped(), "frames with a non-Ethernet link type were skipped");
    }
    Ok(stats)
}

fn capture_live<R: Renderer + Send + ?Sized>(
    name: &str,
    restarts: u32,
    renderer: &mut R,
    filter: &ProtocolFilter,
    config: &CaptureConfig,
    stop: &StopSignal,
) -> Result<PipelineStats, CliError> {
    let mut attempt = 0;
    loop {
        let mut source = InterfaceSource::open(name, config).map_err(open_error)?;
        match run_pipeline(&mut source, renderer, filter, config, stop) {
            Err(PipelineError::Source(err)) if attempt < restarts => {
                attempt += 1;
                warn!(interface = name, attempt, error = %err, "capture failed, reopening interface");
            }
            result => return result.map_err(pipeline_error),
        }
    }
}

fn pipeline<S, R>(
    source: &mut S,
    renderer: &mut R,
    filter: &ProtocolFilter,
    config: &CaptureConfig,
    stop: &StopSignal,
) -> Result<PipelineStats, CliError>
where
    S: FrameSource + Send + ?Sized,
    R: Renderer + Send + ?Sized,
{
    run_pipeline(source, renderer, filter, config, stop).map_err(pipeline_error)
}

fn pipeline_error(err: PipelineError) -> CliError {
    CliError::new(err.to_string(), None)
}

fn open_error(err: SourceError) -> CliError {
    let hint = match &err {
        SourceError::InterfaceNotFound { .. } => {
            "run with --list-interfaces to see the available interfaces"
        }
        SourceError::Io(_) => "live capture usually needs root or the CAP_NET_RAW capability",
        _ => "try another interface or replay a capture with --read",
    };
    CliError::new(err.to_string(), Some(hint.to_string()))
}
