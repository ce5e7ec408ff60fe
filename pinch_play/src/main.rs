//! pinch_play — play MIDI notes by pinching fingertips against the thumb.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use pinch_midi::ScalePreset;
use pinch_play::app::Session;
use pinch_play::port::{list_ports, open_output, PortChoice, PortSelection};
use pinch_play::settings::Settings;
use pinch_play::sink::{LogSink, MessageSink, RecordingSink};
use pinch_play::source::{EstimatorProcess, JsonLinesSource, LandmarkSource};

#[derive(Parser, Debug)]
#[command(name = "pinch_play", version, about = "Pinch-gesture MIDI controller")]
struct Cli {
    /// MIDI output port: index or name substring (prompts if omitted)
    port: Option<String>,

    /// Create a virtual output port instead of connecting to one
    #[arg(long = "virtual")]
    virtual_port: bool,

    /// Note preset: pentatonic, ryukyu, major, minor
    #[arg(long)]
    preset: Option<ScalePreset>,

    /// MIDI channel 0–15
    #[arg(long)]
    channel: Option<u8>,

    /// TOML settings file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Read landmark frames from a JSON-lines file ("-" for stdin)
    #[arg(long, conflicts_with = "estimator")]
    input: Option<PathBuf>,

    /// Pose-estimator command and its arguments; must come last
    #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "CMD")]
    estimator: Option<Vec<String>>,

    /// Wait for the estimator to print READY before starting
    #[arg(long, requires = "estimator")]
    wait_ready: bool,

    /// Log messages instead of opening a MIDI port
    #[arg(long)]
    dry_run: bool,

    /// Also write the performance to a Standard MIDI File
    #[arg(long, value_name = "FILE.mid")]
    record: Option<PathBuf>,

    /// List MIDI output ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Debug logging
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    /// Command-line flags win over the settings file.
    fn apply(&self, settings: &mut Settings) {
        if let Some(port) = &self.port {
            settings.midi.port = Some(port.clone());
        }
        if self.virtual_port {
            settings.midi.virtual_port = true;
        }
        if let Some(preset) = self.preset {
            settings.notes.preset = preset;
            settings.notes.left = None;
            settings.notes.right = None;
        }
        if let Some(channel) = self.channel {
            settings.midi.channel = channel;
        }
    }

    fn reads_stdin(&self) -> bool {
        self.estimator.is_none()
            && self.input.as_ref().map_or(true, |p| p.as_os_str() == "-")
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "pinch_play=debug,pinch_gesture=debug"
    } else {
        "pinch_play=info,pinch_gesture=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .init();

    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Settings::default(),
    };
    cli.apply(&mut settings);
    settings.validate()?;

    if cli.list_ports {
        for (i, name) in list_ports(&settings.midi.client_name)?.iter().enumerate() {
            println!("{i}: {name}");
        }
        return Ok(());
    }

    info!("pinch_play v{} starting", env!("CARGO_PKG_VERSION"));
    let channel = settings.midi.channel;

    // ── Output ────────────────────────────────────────────────────────────
    let sink: Box<dyn MessageSink> = if cli.dry_run {
        info!(channel, "dry run, messages are logged only");
        Box::new(LogSink::new(channel))
    } else {
        let choice = if settings.midi.virtual_port {
            let name = settings.midi.port.clone()
                .unwrap_or_else(|| settings.midi.client_name.clone());
            PortChoice::Virtual(name)
        } else {
            match &settings.midi.port {
                Some(port) => PortChoice::parse(port),
                None if cli.reads_stdin() => {
                    bail!("landmarks are read from stdin; name a port, or use --virtual or --dry-run")
                }
                None => PortChoice::Prompt,
            }
        };
        match open_output(&choice, &settings.midi.client_name, channel)? {
            PortSelection::Connected(s) => Box::new(s),
            PortSelection::Cancelled    => return Ok(()),
        }
    };

    // ── Input ─────────────────────────────────────────────────────────────
    let source: Box<dyn LandmarkSource> = match (&cli.estimator, &cli.input) {
        (Some(cmd), _) => Box::new(EstimatorProcess::spawn(cmd, cli.wait_ready)?),
        (None, Some(path)) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            info!(path = %path.display(), "reading landmark frames");
            Box::new(JsonLinesSource::new(BufReader::new(file)))
        }
        _ => {
            info!("reading landmark frames from stdin");
            Box::new(JsonLinesSource::new(io::stdin().lock()))
        }
    };

    // ── Run ───────────────────────────────────────────────────────────────
    // The engine is built only now, once output and input are both open.
    match &cli.record {
        Some(path) => {
            let recorder = RecordingSink::new(sink, channel);
            let mut session = Session::from_settings(&settings, source, recorder)?;
            let result = session.run();
            session.into_sink().finish(path)
                .with_context(|| format!("writing {}", path.display()))?;
            result?;
        }
        None => {
            Session::from_settings(&settings, source, sink)?.run()?;
        }
    }
    Ok(())
}
