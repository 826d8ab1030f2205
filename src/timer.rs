// src/timer.rs

/// Tolerance when comparing due times.
const TIME_EPSILON: f64 = 1e-9;

/// A cancellable, self-rearming task on the host clock.
///
/// The owner arms the task with a delay, the host advances it, and each
/// [`RepeatingTask::poll`] that returns `true` consumes one expiry. Re-arming
/// right after an expiry measures the delay from the expiry time, not from
/// the end of the host step, so long steps do not accumulate lag.
///
/// Cancelling is always safe, including on a task that is not armed.
#[derive(Debug, Clone, Default)]
pub struct RepeatingTask {
    /// Host time seen by this task
    now: f64,

    /// When the task next expires
    due: Option<f64>,

    /// Time the delay of the next `arm` is measured from
    anchor: f64,
}

impl RepeatingTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire once, `delay` seconds from the anchor.
    pub fn arm(&mut self, delay: f64) {
        self.due = Some(self.anchor + delay.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.due = None;
        self.anchor = self.now;
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// Time of the next expiry, if armed.
    pub fn due(&self) -> Option<f64> {
        self.due
    }

    /// Move host time forward.
    pub fn advance(&mut self, seconds: f64) {
        self.now += seconds;
        if self.due.is_none() {
            self.anchor = self.now;
        }
    }

    /// Consume one expiry if it is due.
    pub fn poll(&mut self) -> bool {
        match self.due {
            Some(due) if due <= self.now + TIME_EPSILON => {
                self.due = None;
                self.anchor = due;
                true
            }
            _ => false,
        }
    }

    /// Forget the host time, e.g. at the start of a new run.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_after_delay() {
        let mut task = RepeatingTask::new();
        task.arm(0.5);
        task.advance(0.4);
        assert!(!task.poll());
        task.advance(0.1);
        assert!(task.poll());
        assert!(!task.poll());
        assert!(!task.is_armed());
    }

    #[test]
    fn test_rearm_measures_from_expiry() {
        let mut task = RepeatingTask::new();
        task.arm(0.5);
        task.advance(1.2);

        let mut expiries = 0;
        while task.poll() {
            expiries += 1;
            task.arm(0.5);
        }
        // 0.5 and 1.0 fall inside 1.2 s
        assert_eq!(expiries, 2);
        assert_eq!(task.due(), Some(1.5));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut task = RepeatingTask::new();
        task.cancel();
        task.arm(0.5);
        task.cancel();
        task.cancel();
        task.advance(1.0);
        assert!(!task.poll());
    }

    #[test]
    fn test_arm_after_cancel_measures_from_now() {
        let mut task = RepeatingTask::new();
        task.arm(0.5);
        task.advance(0.3);
        task.cancel();
        task.advance(10.0);
        task.arm(0.5);
        let due = task.due().unwrap();
        assert!((due - 10.8).abs() < 1e-9);
    }
}
