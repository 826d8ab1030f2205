// src/main.rs
//
// Command-line player: loads a dataset, runs a playback session against a
// simulated clock and logs the resulting timeline. Set RUST_LOG=debug to see
// every scheduled callback.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use log::info;

use sonify::loader;
use sonify::state::{ChartKind, PlaybackState};
use sonify::{AudioCommand, ColorArray, PlaybackSession, RecordingAudio, SonifyConfig};

/// sonify - play a chart's values as pitches
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file (label,value) or JSON file ({labels, values} or {x, y, z})
    data: PathBuf,
    /// Graph type: bar, line, scatter or heatmap
    #[arg(short, long, default_value = "bar")]
    kind: String,
    /// First index to play (defaults to 0)
    #[arg(short, long)]
    start: Option<String>,
    /// Last index to play, inclusive (defaults to the last point)
    #[arg(short, long)]
    end: Option<String>,
    /// Playback speed multiplier
    #[arg(long)]
    speed: Option<f64>,
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Simulated clock step in seconds
    #[arg(long, default_value_t = 0.05)]
    step: f64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if !(args.step.is_finite() && args.step > 0.0) {
        bail!("clock step must be positive, got {}", args.step);
    }

    let config = match &args.config {
        Some(path) => SonifyConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SonifyConfig::default(),
    };

    let kind: ChartKind = args.kind.parse()?;
    let dataset = loader::load_dataset_file(&args.data, config.max_upload_bytes)
        .with_context(|| format!("loading {}", args.data.display()))?;
    let name = args
        .data
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let chart = loader::build_chart(kind, dataset)?.with_name(name);
    info!(
        "{}: {} chart with {} points ({:?} mode)",
        chart.name.as_deref().unwrap_or("untitled"),
        chart.kind,
        chart.dataset.flat_len(),
        chart.mode()
    );

    // --------------------------------
    // Session
    // --------------------------------

    let (default_start, default_end) = chart.default_range().unwrap_or((0, 0));
    let start = args.start.unwrap_or_else(|| default_start.to_string());
    let end = args.end.unwrap_or_else(|| default_end.to_string());
    let speed = args.speed.unwrap_or(config.default_speed);

    let target = ColorArray::filled(chart.dataset.flat_len(), config.base_color(chart.kind));
    let mut session = PlaybackSession::new(config, RecordingAudio::new(), target);
    session.start_audio()?;
    session.play_input(&chart, &start, &end, speed)?;

    // --------------------------------
    // Simulated clock
    // --------------------------------

    let note = session.scheduler().tempo().note_duration();
    let expected = chart.dataset.flat_len() as f64 * note;
    let max_steps = ((expected / args.step).ceil() as usize + 2) * 2;

    let mut steps = 0;
    while session.state() != PlaybackState::Finished || session.highlight().is_active() {
        if steps >= max_steps {
            bail!("playback did not finish after {steps} clock steps");
        }
        session.tick(args.step);
        steps += 1;

        for command in session.audio_mut().drain() {
            log_command(&command);
        }
    }

    let readback = session.readback();
    info!(
        "finished after {:.3}s at {}",
        steps as f64 * args.step,
        readback.speed_label
    );
    Ok(())
}

fn log_command(command: &AudioCommand) {
    match command {
        AudioCommand::Tone {
            frequency,
            duration,
            at,
        } => info!("{at:>7.3}s  tone   {frequency:>8.2} Hz for {duration:.3}s"),
        AudioCommand::StartOscillator { frequency, at } => {
            info!("{at:>7.3}s  start  {frequency:>8.2} Hz")
        }
        AudioCommand::SetFrequency { frequency, at } => {
            info!("{at:>7.3}s  set    {frequency:>8.2} Hz")
        }
        AudioCommand::RampFrequency { frequency, by } => {
            info!("{by:>7.3}s  ramp   {frequency:>8.2} Hz")
        }
        AudioCommand::Pause { at } => info!("{at:>7.3}s  pause"),
        AudioCommand::Resume { at } => info!("{at:>7.3}s  resume"),
        AudioCommand::StopAll { at } => info!("{at:>7.3}s  stop"),
    }
}
