// tests/playback_scenarios.rs
//
// End-to-end runs through the public API: chart in, audio commands and
// element colors out.

use sonify::audio::RecordingAudio;
use sonify::config::DEFAULT_HIGHLIGHT_COLOR;
use sonify::event::AudioCommand;
use sonify::state::{ChartKind, Dataset, Heatmap, PlaybackState, Series};
use sonify::{Chart, ColorArray, FrequencyBand, PlaybackSession, SonifyConfig, extract, loader};

const BASE: &str = "base";

fn series_chart(kind: ChartKind, values: &[f64]) -> Chart {
    let labels = (0..values.len()).map(|i| format!("p{i}")).collect();
    let series = Series::new(labels, values.to_vec()).unwrap();
    Chart::new(kind, Dataset::from(series)).unwrap()
}

fn heatmap_chart() -> Chart {
    let heatmap = Heatmap::new(
        vec!["a".into(), "b".into(), "c".into()],
        vec!["r0".into(), "r1".into()],
        vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
    )
    .unwrap();
    Chart::new(ChartKind::Heatmap, Dataset::from(heatmap)).unwrap()
}

fn session(len: usize) -> PlaybackSession<RecordingAudio, ColorArray> {
    PlaybackSession::new(
        SonifyConfig::default(),
        RecordingAudio::started(),
        ColorArray::filled(len, BASE),
    )
}

fn assert_freqs(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
    }
}

#[test]
fn test_linear_mapping_over_full_range() {
    let chart = series_chart(ChartKind::Bar, &[1.0, 2.0, 3.0, 4.0, 5.0]);
    let events = extract(&chart.dataset, 0, 4, FrequencyBand::STANDARD).unwrap();
    assert_freqs(&events.frequencies(), &[200.0, 350.0, 500.0, 650.0, 800.0]);

    let mut session = session(5);
    session.play(&chart, 0, 4, 1.0).unwrap();
    for _ in 0..5 {
        session.tick(0.5);
    }
    assert_eq!(session.state(), PlaybackState::Finished);
    assert_freqs(
        &session.audio().tone_frequencies(),
        &[200.0, 350.0, 500.0, 650.0, 800.0],
    );
}

#[test]
fn test_flat_data_plays_midpoint() {
    let chart = series_chart(ChartKind::Bar, &[5.0, 5.0, 5.0]);
    for (start, end) in [(0, 2), (1, 1), (0, 1)] {
        let events = extract(&chart.dataset, start, end, FrequencyBand::STANDARD).unwrap();
        assert!(events.frequencies().iter().all(|f| *f == 500.0));
    }
}

#[test]
fn test_heatmap_window_uses_local_bounds() {
    let chart = heatmap_chart();
    let events = extract(&chart.dataset, 1, 4, FrequencyBand::STANDARD).unwrap();
    assert_eq!(events.source_indices(), vec![1, 2, 3, 4]);
    assert_freqs(&events.frequencies(), &[200.0, 400.0, 600.0, 800.0]);

    let mut session = session(6);
    session.play(&chart, 1, 4, 1.0).unwrap();
    assert_eq!(session.target().indices_with(DEFAULT_HIGHLIGHT_COLOR), vec![1]);
    session.tick(0.5);
    assert_eq!(session.target().indices_with(DEFAULT_HIGHLIGHT_COLOR), vec![2]);
}

#[test]
fn test_pause_resume_continues_at_cursor() {
    let chart = series_chart(ChartKind::Bar, &[1.0, 2.0, 3.0, 4.0, 5.0]);
    let mut session = session(5);

    session.play(&chart, 0, 4, 1.0).unwrap();
    session.tick(0.5);
    assert_eq!(session.target().indices_with(DEFAULT_HIGHLIGHT_COLOR), vec![1]);

    session.pause();
    assert_eq!(session.state(), PlaybackState::Paused);
    let cursor = session.readback().cursor;

    // nothing moves while paused
    session.tick(3.0);
    assert_eq!(session.readback().cursor, cursor);
    assert_eq!(session.audio().tone_frequencies().len(), 2);

    session.play(&chart, 0, 4, 1.0).unwrap();
    assert_eq!(session.state(), PlaybackState::Playing);
    let colors = session.target().colors();
    assert_eq!(colors[1], BASE);
    assert_eq!(colors[2], DEFAULT_HIGHLIGHT_COLOR);

    session.tick(0.5);
    assert_eq!(session.audio().tone_frequencies().len(), 3);
}

#[test]
fn test_reset_while_playing_silences_everything() {
    let chart = series_chart(ChartKind::Bar, &[1.0, 2.0, 3.0, 4.0, 5.0]);
    let mut session = session(5);

    session.play(&chart, 0, 4, 1.0).unwrap();
    session.tick(0.5);
    session.reset();

    assert_eq!(session.state(), PlaybackState::Idle);
    assert_eq!(session.scheduler().transport().pending_count(), 0);
    assert!(session.target().colors().iter().all(|c| c == BASE));
    assert!(matches!(
        session.audio().commands().last(),
        Some(AudioCommand::StopAll { .. })
    ));

    let commands = session.audio().commands().len();
    let redraws = session.target().redraw_count();
    session.tick(10.0);
    assert_eq!(session.audio().commands().len(), commands);
    assert_eq!(session.target().redraw_count(), redraws);

    // a second reset changes nothing
    assert!(session.reset().is_noop());
    assert_eq!(session.target().redraw_count(), redraws);
}

#[test]
fn test_speed_change_applies_to_remaining_events() {
    let chart = series_chart(ChartKind::Bar, &[1.0, 2.0, 3.0, 4.0]);
    let mut session = session(4);

    session.play(&chart, 0, 3, 1.0).unwrap();
    session.tick(0.5);
    session.set_speed(2.0).unwrap();

    // remaining beats now last 0.25s each
    session.tick(0.25);
    session.tick(0.25);
    assert_eq!(session.audio().tone_frequencies().len(), 4);
    session.tick(0.25);
    assert_eq!(session.state(), PlaybackState::Finished);
}

#[test]
fn test_line_chart_glides_between_points() {
    let chart = series_chart(ChartKind::Line, &[1.0, 3.0, 2.0]);
    let mut session = session(3);

    session.play(&chart, 0, 2, 1.0).unwrap();
    for _ in 0..3 {
        session.tick(0.5);
    }
    assert_eq!(session.state(), PlaybackState::Finished);

    let commands = session.audio().commands();
    assert!(matches!(
        commands.first(),
        Some(AudioCommand::StartOscillator { frequency, .. }) if *frequency == 200.0
    ));
    let ramps: Vec<f64> = commands
        .iter()
        .filter_map(|c| match c {
            AudioCommand::RampFrequency { frequency, .. } => Some(*frequency),
            _ => None,
        })
        .collect();
    assert_freqs(&ramps, &[800.0, 500.0]);
    assert!(matches!(commands.last(), Some(AudioCommand::StopAll { .. })));
}

#[test]
fn test_csv_upload_to_finished_run() {
    let series = loader::parse_csv("Day,Steps\nMon,10\nTue,20\nWed,30\n").unwrap();
    let chart = loader::build_chart(ChartKind::Scatter, series.into()).unwrap();
    let (start, end) = chart.default_range().unwrap();

    let mut session = session(3);
    session
        .play_input(&chart, &start.to_string(), &end.to_string(), 1.0)
        .unwrap();
    for _ in 0..6 {
        session.tick(0.5);
    }
    assert_eq!(session.state(), PlaybackState::Finished);
    assert!(!session.highlight().is_active());
    assert!(session.target().colors().iter().all(|c| c == BASE));
}

#[test]
fn test_line_chart_pause_silences_oscillator() {
    let chart = series_chart(ChartKind::Line, &[1.0, 2.0, 3.0]);
    let mut session = session(3);

    session.play(&chart, 0, 2, 1.0).unwrap();
    session.tick(0.25);
    session.pause();
    assert!(session.audio().is_paused());
    assert_eq!(
        session.audio().commands().last(),
        Some(&AudioCommand::Pause { at: 0.25 })
    );

    let recorded = session.audio().commands().len();
    session.tick(10.0);
    assert_eq!(session.audio().commands().len(), recorded);

    session.play(&chart, 0, 2, 1.0).unwrap();
    assert!(!session.audio().is_paused());
    assert!(session.audio().commands()[recorded..].contains(&AudioCommand::Resume { at: 0.25 }));

    session.tick(0.25);
    session.tick(1.0);
    assert_eq!(session.state(), PlaybackState::Finished);
    assert_eq!(
        session.audio().commands().last(),
        Some(&AudioCommand::StopAll { at: 1.5 })
    );
}

#[test]
fn test_heatmap_pause_resume_runs_to_end() {
    let chart = heatmap_chart();
    let mut session = session(6);

    session.play(&chart, 0, 5, 1.0).unwrap();
    session.tick(0.5);
    session.pause();
    session.tick(10.0);
    assert_eq!(session.audio().tone_frequencies().len(), 2);
    assert_eq!(
        session.audio().commands().last(),
        Some(&AudioCommand::Pause { at: 0.5 })
    );

    session.play(&chart, 0, 5, 1.0).unwrap();
    assert_eq!(session.target().indices_with(DEFAULT_HIGHLIGHT_COLOR), vec![2]);

    session.tick(5.0);
    assert_eq!(session.state(), PlaybackState::Finished);
    assert_eq!(session.audio().tone_frequencies().len(), 6);
    // six beats of transport time, the pause not counted
    assert_eq!(
        session.audio().commands().last(),
        Some(&AudioCommand::StopAll { at: 3.0 })
    );
    assert!(session.target().colors().iter().all(|c| c == BASE));
}

#[test]
fn test_coarse_tick_stops_at_terminal_time() {
    let chart = series_chart(ChartKind::Bar, &[1.0, 2.0, 3.0]);
    let mut session = session(3);

    session.play(&chart, 0, 2, 1.0).unwrap();
    session.tick(5.0);
    assert_eq!(session.state(), PlaybackState::Finished);
    assert_eq!(
        session.audio().commands().last(),
        Some(&AudioCommand::StopAll { at: 1.5 })
    );
}
