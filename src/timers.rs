use std::time::{Duration, Instant};

pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(300);
pub const TOAST_LIFETIME: Duration = Duration::from_millis(3000);

/// Collapses bursts of edits into one recompute after a quiet period.
///
/// Scheduling replaces any pending deadline, so a superseded edit never fires
/// on its own.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.deadline = Some(deadline);
        deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending recompute, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// True exactly once per burst, when the deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(FILTER_DEBOUNCE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: Level,
    pub message: String,
    pub expires_at: Instant,
}

/// Transient messages that dismiss themselves after `TOAST_LIFETIME`.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    toasts: Vec<Toast>,
}

impl Notifications {
    pub fn push(&mut self, level: Level, message: impl Into<String>, now: Instant) {
        self.toasts.push(Toast {
            level,
            message: message.into(),
            expires_at: now + TOAST_LIFETIME,
        });
    }

    /// Drop expired toasts and return how many are left.
    pub fn prune(&mut self, now: Instant) -> usize {
        self.toasts.retain(|t| t.expires_at > now);
        self.toasts.len()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    /// Hand over every pending toast, e.g. to print them before exiting.
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_fires_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.schedule(start);
        assert!(!debouncer.fire(start + Duration::from_millis(299)));
        assert!(debouncer.fire(start + Duration::from_millis(300)));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_new_edit_resets_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(200));
        assert!(!debouncer.fire(start + Duration::from_millis(350)));
        assert_eq!(
            debouncer.remaining(start + Duration::from_millis(350)),
            Some(Duration::from_millis(150))
        );
        assert!(debouncer.fire(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_idle_debouncer_never_fires() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        assert!(!debouncer.fire(Instant::now()));
        assert_eq!(debouncer.remaining(Instant::now()), None);
    }

    #[test]
    fn test_toasts_expire() {
        let start = Instant::now();
        let mut notes = Notifications::default();
        notes.push(Level::Info, "Saved", start);
        notes.push(Level::Error, "Disk full", start + Duration::from_millis(1000));
        assert_eq!(notes.prune(start + Duration::from_millis(2999)), 2);
        assert_eq!(notes.prune(start + Duration::from_millis(3000)), 1);
        assert_eq!(notes.latest().unwrap().message, "Disk full");
        assert_eq!(notes.prune(start + Duration::from_millis(4000)), 0);
    }

    #[test]
    fn test_drain_empties_queue() {
        let now = Instant::now();
        let mut notes = Notifications::default();
        notes.push(Level::Info, "one", now);
        assert_eq!(notes.drain().len(), 1);
        assert!(notes.latest().is_none());
    }
}
