//! WebAssembly bindings via wasm-bindgen for browser integration.
//!
//! This module is only compiled when the `web` feature is enabled.
//!
//! # Usage
//!
//! Build with wasm-pack:
//! ```bash
//! wasm-pack build --target web --features web
//! ```
//!
//! # JavaScript Example
//!
//! ```javascript
//! import init, { sonify_init, SonifyPlayer } from './sonify.js';
//!
//! await init();
//! sonify_init();
//!
//! const player = SonifyPlayer.from_csv(csvText, "bar");
//! startButton.onclick = () => player.start_audio();
//! playButton.onclick = () => player.play_input(startField.value, endField.value, speed);
//!
//! // Drive time from requestAnimationFrame and forward the results
//! player.tick(dt);
//! for (const cmd of JSON.parse(player.drain_audio_commands())) playTone(cmd);
//! chart.data.datasets[0].backgroundColor = JSON.parse(player.colors());
//! chart.update();
//! ```

use wasm_bindgen::prelude::*;

use crate::audio::RecordingAudio;
use crate::config::SonifyConfig;
use crate::highlight::ColorArray;
use crate::loader;
use crate::session::PlaybackSession;
use crate::state::{Chart, ChartKind};

// ═══════════════════════════════════════════════════════════════════════════
// Initialization
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the wasm module. Call this once before using any other functions.
/// Sets up panic hooks and console logging.
#[wasm_bindgen]
pub fn sonify_init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
}

// ═══════════════════════════════════════════════════════════════════════════
// Player
// ═══════════════════════════════════════════════════════════════════════════

/// A chart with its playback session.
///
/// Audio commands are queued instead of played; the page drains them and
/// feeds its own audio graph. Element colors likewise live here and are
/// copied onto the chart after every tick.
#[wasm_bindgen]
pub struct SonifyPlayer {
    chart: Chart,
    session: PlaybackSession<RecordingAudio, ColorArray>,
}

#[wasm_bindgen]
impl SonifyPlayer {
    /// Create a player from manual or heatmap JSON data.
    pub fn from_json(json: &str, kind: &str) -> Result<SonifyPlayer, JsError> {
        let dataset = loader::parse_dataset_json(json)?;
        Self::build(kind, dataset, SonifyConfig::default())
    }

    /// Create a player from uploaded CSV text.
    pub fn from_csv(text: &str, kind: &str) -> Result<SonifyPlayer, JsError> {
        let series = loader::parse_csv(text)?;
        Self::build(kind, series.into(), SonifyConfig::default())
    }

    /// Create a player with a JSON configuration.
    pub fn from_json_with_config(
        json: &str,
        kind: &str,
        config_json: &str,
    ) -> Result<SonifyPlayer, JsError> {
        let config = SonifyConfig::from_json(config_json)?;
        let dataset = loader::parse_dataset_json(json)?;
        Self::build(kind, dataset, config)
    }

    /// Check an upload before reading it.
    pub fn validate_upload(file_name: &str, size: f64) -> Result<(), JsError> {
        let limit = SonifyConfig::default().max_upload_bytes;
        let size = loader::checked_upload_size(size)?;
        loader::validate_upload(file_name, size, limit)?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Controls
    // ─────────────────────────────────────────────────────────────────────────

    /// Start audio output. Call from a click handler.
    pub fn start_audio(&mut self) -> Result<(), JsError> {
        self.session.start_audio()?;
        Ok(())
    }

    /// Play or resume with numeric indices.
    pub fn play(&mut self, start: i32, end: i32, speed: f64) -> Result<(), JsError> {
        self.session
            .play(&self.chart, i64::from(start), i64::from(end), speed)?;
        Ok(())
    }

    /// Play or resume with the raw text of the index fields.
    pub fn play_input(&mut self, start: &str, end: &str, speed: f64) -> Result<(), JsError> {
        self.session.play_input(&self.chart, start, end, speed)?;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.session.pause();
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Speed slider input.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), JsError> {
        self.session.set_speed(speed)?;
        Ok(())
    }

    /// Advance time by `seconds`. Returns `true` when the run finished.
    pub fn tick(&mut self, seconds: f64) -> bool {
        self.session.tick(seconds).finished
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Readback
    // ─────────────────────────────────────────────────────────────────────────

    /// Current playback state: "idle", "playing", "paused" or "finished".
    pub fn state(&self) -> String {
        self.session.state().as_str().to_string()
    }

    /// Session readback as JSON.
    pub fn readback(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.session.readback())?)
    }

    /// Audio commands queued since the last call, as a JSON array.
    pub fn drain_audio_commands(&mut self) -> Result<String, JsError> {
        let commands = self.session.audio_mut().drain();
        Ok(serde_json::to_string(&commands)?)
    }

    /// Current element colors as a JSON array.
    pub fn colors(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(self.session.target().colors())?)
    }

    pub fn point_count(&self) -> Result<u32, JsError> {
        u32::try_from(self.chart.dataset.flat_len())
            .map_err(|_| JsError::new("too many points for a JavaScript index"))
    }

    /// Label shown next to the speed slider, e.g. "1.5x".
    pub fn speed_label(&self) -> String {
        crate::tempo::speed_label(self.session.speed())
    }
}

impl SonifyPlayer {
    fn build(
        kind: &str,
        dataset: crate::state::Dataset,
        config: SonifyConfig,
    ) -> Result<SonifyPlayer, JsError> {
        let kind: ChartKind = kind.parse()?;
        let chart = loader::build_chart(kind, dataset)?;
        let target = ColorArray::filled(chart.dataset.flat_len(), config.base_color(kind));
        let session = PlaybackSession::new(config, RecordingAudio::new(), target);
        Ok(SonifyPlayer { chart, session })
    }
}
