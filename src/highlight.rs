// src/highlight.rs
//
// Highlight synchronizer.
//
// Walks a cursor over the sonified index range on its own repeating task,
// painting the current chart element with the highlight color and putting
// the previous one back. The task interval is the note duration of the
// shared tempo, so the highlight and the audio advance at the same cadence
// without being locked to each other.

use log::{debug, trace};

use crate::tempo::SharedTempo;
use crate::timer::RepeatingTask;

// ═══════════════════════════════════════════════════════════════════════════
// Highlight capability
// ═══════════════════════════════════════════════════════════════════════════

/// Injected per-element color access of the rendered chart.
pub trait HighlightTarget {
    /// Number of chart elements (flattened for heatmaps).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn color(&self, index: usize) -> Option<&str>;

    fn set_color(&mut self, index: usize, color: &str);

    /// Ask the renderer to repaint.
    fn redraw(&mut self);
}

/// Plain color array, one CSS color per chart element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorArray {
    colors: Vec<String>,
    redraws: usize,
}

impl ColorArray {
    /// Every element painted with the same base color.
    pub fn filled(len: usize, color: &str) -> Self {
        Self {
            colors: vec![color.to_string(); len],
            redraws: 0,
        }
    }

    pub fn from_colors(colors: Vec<String>) -> Self {
        Self { colors, redraws: 0 }
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// How many times a repaint was requested.
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    /// Indices currently painted with `color`.
    pub fn indices_with(&self, color: &str) -> Vec<usize> {
        self.colors
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str() == color)
            .map(|(i, _)| i)
            .collect()
    }
}

impl HighlightTarget for ColorArray {
    fn len(&self) -> usize {
        self.colors.len()
    }

    fn color(&self, index: usize) -> Option<&str> {
        self.colors.get(index).map(String::as_str)
    }

    fn set_color(&mut self, index: usize, color: &str) {
        if let Some(slot) = self.colors.get_mut(index) {
            color.clone_into(slot);
        }
    }

    fn redraw(&mut self) {
        self.redraws += 1;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Synchronizer
// ═══════════════════════════════════════════════════════════════════════════

/// Colors of `[start, end]` as they were before the run touched them.
#[derive(Debug, Clone)]
struct Captured {
    start: usize,
    colors: Vec<String>,
}

impl Captured {
    fn original(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(self.start)
            .and_then(|offset| self.colors.get(offset))
            .map(String::as_str)
    }
}

/// Moves the visual cursor in step with playback.
pub struct HighlightSynchronizer<H: HighlightTarget> {
    target: H,

    tempo: SharedTempo,

    highlight_color: String,

    task: RepeatingTask,

    /// Active window, inclusive
    range: Option<(usize, usize)>,

    /// Next element to highlight
    cursor: usize,

    captured: Option<Captured>,

    paused: bool,

    /// The terminal step ran; nothing is highlighted any more
    done: bool,
}

impl<H: HighlightTarget> HighlightSynchronizer<H> {
    pub fn new(target: H, tempo: SharedTempo, highlight_color: impl Into<String>) -> Self {
        Self {
            target,
            tempo,
            highlight_color: highlight_color.into(),
            task: RepeatingTask::new(),
            range: None,
            cursor: 0,
            captured: None,
            paused: false,
            done: false,
        }
    }

    /// Start highlighting `[start, end]` and paint the first element.
    ///
    /// Colors are captured once per run; a run that is already captured
    /// keeps its capture because the array has been painted since.
    pub fn begin(&mut self, start: usize, end: usize) {
        let end = end.min(self.target.len().saturating_sub(1));
        if self.target.is_empty() || start > end {
            debug!("nothing to highlight in [{start}, {end}]");
            return;
        }

        if self.captured.is_none() {
            let colors = (start..=end)
                .map(|i| self.target.color(i).unwrap_or_default().to_string())
                .collect();
            self.captured = Some(Captured { start, colors });
        }

        self.range = Some((start, end));
        if self.cursor < start {
            self.cursor = start;
        }
        self.paused = false;
        self.done = false;
        self.task.reset();

        self.advance_one();
    }

    /// One highlight step.
    pub fn advance_one(&mut self) {
        let Some((start, end)) = self.range else {
            return;
        };
        if self.paused || self.done {
            return;
        }

        if self.cursor > end {
            self.put_back(end);
            self.target.redraw();
            self.task.cancel();
            self.done = true;
            debug!("highlight finished at index {end}");
            return;
        }

        if self.cursor > start {
            self.put_back(self.cursor - 1);
        }
        let color = self.highlight_color.clone();
        self.target.set_color(self.cursor, &color);
        self.target.redraw();
        trace!("highlight index {}", self.cursor);

        self.cursor += 1;
        self.task.arm(self.tempo.note_duration());
    }

    /// Cancel the pending step. Cursor and colors stay as they are.
    pub fn pause(&mut self) {
        self.task.cancel();
        self.paused = true;
    }

    /// Put back the element left highlighted by [`pause`](Self::pause) and
    /// continue from the cursor.
    pub fn resume(&mut self) {
        let Some((start, _)) = self.range else {
            return;
        };
        if !self.paused {
            return;
        }
        self.paused = false;

        if self.done {
            return;
        }
        if self.cursor > start {
            self.put_back(self.cursor - 1);
            self.target.redraw();
        }
        self.advance_one();
    }

    /// Put every captured color back and forget the run.
    pub fn restore(&mut self) {
        self.task.cancel();
        if let Some(captured) = self.captured.take() {
            for (offset, color) in captured.colors.iter().enumerate() {
                self.target.set_color(captured.start + offset, color);
            }
            self.target.redraw();
        }
        self.range = None;
        self.cursor = 0;
        self.paused = false;
        self.done = false;
    }

    /// Advance host time and run every step that falls due.
    pub fn tick(&mut self, seconds: f64) -> usize {
        self.task.advance(seconds);
        let mut steps = 0;
        while self.task.poll() {
            self.advance_one();
            steps += 1;
        }
        steps
    }

    fn put_back(&mut self, index: usize) {
        let original = self
            .captured
            .as_ref()
            .and_then(|c| c.original(index))
            .map(str::to_string);
        if let Some(color) = original {
            self.target.set_color(index, &color);
        }
    }

    // -------------------------------
    // MARK: Accessors
    // -------------------------------

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn range(&self) -> Option<(usize, usize)> {
        self.range
    }

    pub fn is_active(&self) -> bool {
        self.range.is_some() && !self.done
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn has_pending_step(&self) -> bool {
        self.task.is_armed()
    }

    pub fn highlight_color(&self) -> &str {
        &self.highlight_color
    }

    pub fn target(&self) -> &H {
        &self.target
    }

    /// Swap in a new chart, e.g. after the data was replaced.
    pub fn replace_target(&mut self, target: H) -> H {
        self.restore();
        std::mem::replace(&mut self.target, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tempo::Tempo;

    const BASE: &str = "base";
    const HI: &str = "hi";

    fn sync(len: usize) -> HighlightSynchronizer<ColorArray> {
        HighlightSynchronizer::new(
            ColorArray::filled(len, BASE),
            SharedTempo::new(Tempo::default()),
            HI,
        )
    }

    fn highlighted(s: &HighlightSynchronizer<ColorArray>) -> Vec<usize> {
        s.target().indices_with(HI)
    }

    #[test]
    fn test_walks_range_at_note_duration() {
        let mut s = sync(6);
        s.begin(1, 3);
        assert_eq!(highlighted(&s), vec![1]);
        assert_eq!(s.cursor(), 2);

        assert_eq!(s.tick(0.4), 0);
        assert_eq!(s.tick(0.1), 1);
        assert_eq!(highlighted(&s), vec![2]);

        s.tick(0.5);
        assert_eq!(highlighted(&s), vec![3]);

        // terminal step puts the last element back
        s.tick(0.5);
        assert!(highlighted(&s).is_empty());
        assert!(!s.is_active());
        assert!(!s.has_pending_step());
        assert_eq!(s.target().colors(), ColorArray::filled(6, BASE).colors());
    }

    #[test]
    fn test_pause_and_resume_keep_cursor() {
        let mut s = sync(5);
        s.begin(0, 4);
        s.tick(0.5);
        assert_eq!(highlighted(&s), vec![1]);

        s.pause();
        s.pause();
        let cursor = s.cursor();
        assert_eq!(s.tick(3.0), 0);
        assert_eq!(s.cursor(), cursor);
        assert_eq!(highlighted(&s), vec![1], "one element stays lit while paused");

        s.resume();
        assert_eq!(highlighted(&s), vec![cursor]);
        assert_eq!(s.target().color(1), Some(BASE));
        assert_eq!(s.cursor(), cursor + 1);
    }

    #[test]
    fn test_restore_puts_back_every_color() {
        let colors = vec!["a".to_string(), "b".into(), "c".into(), "d".into()];
        let mut s = HighlightSynchronizer::new(
            ColorArray::from_colors(colors.clone()),
            SharedTempo::new(Tempo::default()),
            HI,
        );
        s.begin(1, 2);
        s.tick(0.5);
        s.restore();
        assert_eq!(s.target().colors(), colors.as_slice());
        assert!(!s.has_pending_step());

        // nothing left to restore the second time
        let redraws = s.target().redraw_count();
        s.restore();
        assert_eq!(s.target().redraw_count(), redraws);
        assert_eq!(s.tick(2.0), 0);
    }

    #[test]
    fn test_capture_happens_once_per_run() {
        let mut s = sync(3);
        s.begin(0, 2);
        // a second begin on the painted array must not capture the highlight
        s.begin(0, 2);
        s.restore();
        assert!(highlighted(&s).is_empty());
    }

    #[test]
    fn test_cursor_follows_shared_tempo() {
        let tempo = SharedTempo::new(Tempo::default());
        let mut s = HighlightSynchronizer::new(ColorArray::filled(4, BASE), tempo.clone(), HI);
        s.begin(0, 3);
        tempo.set_speed(2.0);
        // the step armed at begin still uses 0.5 s
        assert_eq!(s.tick(0.5), 1);
        // the next one uses 0.25 s
        assert_eq!(s.tick(0.25), 1);
        assert_eq!(highlighted(&s), vec![2]);
    }

    #[test]
    fn test_range_clamped_to_target() {
        let mut s = sync(2);
        s.begin(0, 10);
        assert_eq!(s.range(), Some((0, 1)));

        let mut empty = sync(0);
        empty.begin(0, 0);
        assert_eq!(empty.range(), None);
    }
}
