//! Playback controller: the timer state machine that reveals trace steps one
//! at a time.
//!
//! The controller is poll-driven and owns no thread or timer of its own: it
//! records the next deadline as plain data and the caller supplies the clock
//! (`Instant::now()` in the CLI driver, synthetic instants in tests). At most
//! one deadline is ever pending; pause and reset cancel it by clearing it, so
//! tearing the controller down can never fire a callback against stale state.

use std::time::{Duration, Instant};

use crate::core::trace::{Trace, TraceStep};
use crate::error::{VlabError, VlabResult};

/// Default delay between steps at normal speed.
pub const BASE_INTERVAL: Duration = Duration::from_millis(1500);

/// The enumerated speed presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Speed {
    Half,
    #[default]
    Normal,
    Double,
}

impl Speed {
    pub fn factor(&self) -> f64 {
        match self {
            Speed::Half => 0.5,
            Speed::Normal => 1.0,
            Speed::Double => 2.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Speed::Half => "0.5x",
            Speed::Normal => "1x",
            Speed::Double => "2x",
        }
    }
}

impl std::str::FromStr for Speed {
    type Err = VlabError;

    fn from_str(s: &str) -> VlabResult<Self> {
        match s.trim() {
            "0.5" => Ok(Speed::Half),
            "1" => Ok(Speed::Normal),
            "2" => Ok(Speed::Double),
            other => Err(VlabError::InvalidArgument(format!(
                "speed must be 0.5, 1 or 2 (got \"{}\")",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

/// What a poll produced: one revealed step, or the completion signal. The
/// completion signal fires exactly once per run, after the final step.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Step { index: usize, step: TraceStep },
    Completed,
}

#[derive(Debug)]
pub struct PlaybackController {
    trace: Option<Trace>,
    status: PlaybackStatus,
    current_index: usize,
    speed: Speed,
    base_interval: Duration,
    deadline: Option<Instant>,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(BASE_INTERVAL)
    }
}

impl PlaybackController {
    pub fn new(base_interval: Duration) -> Self {
        Self {
            trace: None,
            status: PlaybackStatus::Idle,
            current_index: 0,
            speed: Speed::Normal,
            base_interval,
            deadline: None,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// The instant the next tick is due, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn interval(&self) -> Duration {
        self.base_interval.div_f64(self.speed.factor())
    }

    /// Load a trace and begin playback: state moves to Running and the first
    /// tick is scheduled one interval from `now`.
    pub fn start(&mut self, trace: Trace, now: Instant) {
        self.trace = Some(trace);
        self.status = PlaybackStatus::Running;
        self.current_index = 0;
        self.deadline = Some(now + self.interval());
    }

    /// Replay the already-loaded trace from the beginning. Returns false if
    /// no trace has been loaded yet.
    pub fn replay(&mut self, now: Instant) -> bool {
        if self.trace.is_none() {
            return false;
        }
        self.status = PlaybackStatus::Running;
        self.current_index = 0;
        self.deadline = Some(now + self.interval());
        true
    }

    /// Cancel the pending tick without losing the position. No effect unless
    /// Running.
    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Running {
            self.status = PlaybackStatus::Paused;
            self.deadline = None;
        }
    }

    /// Reschedule from the current index at the current speed. No effect
    /// unless Paused.
    pub fn resume(&mut self, now: Instant) {
        if self.status == PlaybackStatus::Paused {
            self.status = PlaybackStatus::Running;
            self.deadline = Some(now + self.interval());
        }
    }

    /// Return to Idle from any state, cancelling any pending tick. The
    /// loaded trace is kept so `replay` can run it again.
    pub fn reset(&mut self) {
        self.status = PlaybackStatus::Idle;
        self.current_index = 0;
        self.deadline = None;
    }

    /// Takes effect when the next tick is scheduled; a pending tick keeps
    /// its original deadline.
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    /// Advance the machine if the pending deadline has passed. Returns the
    /// revealed step, the one-shot completion signal, or None when nothing
    /// is due.
    pub fn poll(&mut self, now: Instant) -> Option<PlaybackEvent> {
        if self.status != PlaybackStatus::Running {
            return None;
        }
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }

        let trace = self.trace.as_ref()?;
        if self.current_index >= trace.len() {
            self.status = PlaybackStatus::Completed;
            self.deadline = None;
            return Some(PlaybackEvent::Completed);
        }

        let index = self.current_index;
        let step = trace.get(index)?.clone();
        self.current_index += 1;

        if self.current_index < trace.len() {
            self.deadline = Some(now + self.interval());
        } else {
            // The completion check runs on the next poll without delay,
            // mirroring the original's immediate wrap-up pass.
            self.deadline = Some(now);
        }

        Some(PlaybackEvent::Step { index, step })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::FormulaArgs;
    use crate::core::trace::generate_trace;
    use crate::data::{SimulationMode, Workbook};

    fn sample_trace() -> Trace {
        let args = FormulaArgs::VLookup {
            lookup_value: "K02".to_string(),
            col_index: 3,
            exact: false,
        };
        let book = Workbook::for_kind(args.kind(), SimulationMode::Simple);
        generate_trace(&args, &book).0
    }

    fn drain(ctrl: &mut PlaybackController, mut now: Instant) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        while let Some(deadline) = ctrl.next_deadline() {
            now = now.max(deadline);
            if let Some(event) = ctrl.poll(now) {
                events.push(event);
            } else {
                break;
            }
        }
        events
    }

    #[test]
    fn runs_every_step_in_order_then_completes() {
        let trace = sample_trace();
        let expected = trace.len();
        let t0 = Instant::now();
        let mut ctrl = PlaybackController::new(BASE_INTERVAL);
        ctrl.start(trace, t0);

        let events = drain(&mut ctrl, t0);
        assert_eq!(events.len(), expected + 1);
        for (i, event) in events.iter().take(expected).enumerate() {
            match event {
                PlaybackEvent::Step { index, .. } => assert_eq!(*index, i),
                PlaybackEvent::Completed => panic!("completed too early"),
            }
        }
        assert_eq!(events.last(), Some(&PlaybackEvent::Completed));
        assert_eq!(ctrl.status(), PlaybackStatus::Completed);
    }

    #[test]
    fn nothing_fires_before_the_deadline() {
        let t0 = Instant::now();
        let mut ctrl = PlaybackController::new(BASE_INTERVAL);
        ctrl.start(sample_trace(), t0);

        assert_eq!(ctrl.poll(t0), None);
        assert_eq!(ctrl.poll(t0 + Duration::from_millis(1499)), None);
        assert!(ctrl.poll(t0 + Duration::from_millis(1500)).is_some());
    }

    #[test]
    fn speed_changes_only_inter_step_delay_not_content() {
        let t0 = Instant::now();

        let mut slow = PlaybackController::new(BASE_INTERVAL);
        slow.set_speed(Speed::Half);
        slow.start(sample_trace(), t0);
        let slow_events = drain(&mut slow, t0);

        let mut fast = PlaybackController::new(BASE_INTERVAL);
        fast.set_speed(Speed::Double);
        fast.start(sample_trace(), t0);
        let fast_events = drain(&mut fast, t0);

        assert_eq!(slow_events, fast_events);
    }

    #[test]
    fn set_speed_does_not_reschedule_pending_tick() {
        let t0 = Instant::now();
        let mut ctrl = PlaybackController::new(BASE_INTERVAL);
        ctrl.start(sample_trace(), t0);
        let original_deadline = ctrl.next_deadline().unwrap();

        ctrl.set_speed(Speed::Double);
        assert_eq!(ctrl.next_deadline(), Some(original_deadline));

        // The next reschedule uses the new speed.
        ctrl.poll(original_deadline);
        assert_eq!(
            ctrl.next_deadline(),
            Some(original_deadline + Duration::from_millis(750))
        );
    }

    #[test]
    fn pause_cancels_timer_and_resume_continues_at_same_index() {
        let t0 = Instant::now();
        let mut ctrl = PlaybackController::new(BASE_INTERVAL);
        ctrl.start(sample_trace(), t0);

        let first = ctrl.poll(t0 + BASE_INTERVAL);
        assert!(matches!(first, Some(PlaybackEvent::Step { index: 0, .. })));

        ctrl.pause();
        assert_eq!(ctrl.status(), PlaybackStatus::Paused);
        assert_eq!(ctrl.next_deadline(), None);
        assert_eq!(ctrl.current_index(), 1);

        // A long pause neither skips nor repeats.
        let resumed_at = t0 + Duration::from_secs(60);
        ctrl.resume(resumed_at);
        let next = ctrl.poll(resumed_at + BASE_INTERVAL);
        assert!(matches!(next, Some(PlaybackEvent::Step { index: 1, .. })));
    }

    #[test]
    fn pause_is_a_no_op_unless_running() {
        let mut ctrl = PlaybackController::new(BASE_INTERVAL);
        ctrl.pause();
        assert_eq!(ctrl.status(), PlaybackStatus::Idle);
    }

    #[test]
    fn reset_returns_to_idle_from_any_state_and_replay_reproduces() {
        let t0 = Instant::now();
        let mut ctrl = PlaybackController::new(BASE_INTERVAL);
        ctrl.start(sample_trace(), t0);
        let first_run = drain(&mut ctrl, t0);
        assert_eq!(ctrl.status(), PlaybackStatus::Completed);

        ctrl.reset();
        assert_eq!(ctrl.status(), PlaybackStatus::Idle);
        assert_eq!(ctrl.current_index(), 0);
        assert_eq!(ctrl.next_deadline(), None);

        assert!(ctrl.replay(t0));
        let second_run = drain(&mut ctrl, t0);
        assert_eq!(first_run, second_run);
    }

    #[test]
    fn reset_mid_run_cancels_pending_tick() {
        let t0 = Instant::now();
        let mut ctrl = PlaybackController::new(BASE_INTERVAL);
        ctrl.start(sample_trace(), t0);
        ctrl.poll(t0 + BASE_INTERVAL);

        ctrl.reset();
        assert_eq!(ctrl.next_deadline(), None);
        assert_eq!(ctrl.poll(t0 + Duration::from_secs(600)), None);
    }

    #[test]
    fn replay_without_a_trace_is_refused() {
        let mut ctrl = PlaybackController::new(BASE_INTERVAL);
        assert!(!ctrl.replay(Instant::now()));
        assert_eq!(ctrl.status(), PlaybackStatus::Idle);
    }

    #[test]
    fn speed_parses_only_the_preset_values() {
        assert_eq!("0.5".parse::<Speed>().unwrap(), Speed::Half);
        assert_eq!("1".parse::<Speed>().unwrap(), Speed::Normal);
        assert_eq!("2".parse::<Speed>().unwrap(), Speed::Double);
        assert!("3".parse::<Speed>().is_err());
    }
}
