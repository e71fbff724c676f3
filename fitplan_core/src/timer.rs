//! Rest timer between sets.
//!
//! `RestTimer` is a pure countdown state machine. Ticks carry the
//! ticket of the run that scheduled them, so ticks belonging to a
//! cancelled or replaced run are ignored. `TimerDriver` pairs the timer
//! with a `TickSource` and guarantees at most one live tick source.

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

pub const DEFAULT_REST_SECONDS: u32 = 60;

static MINUTES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:min|m\b)").expect("valid minutes regex"));
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid number regex"));

/// Parse free-text rest like "90s", "2 min" or "1m" into seconds.
///
/// Falls back to `DEFAULT_REST_SECONDS` when nothing numeric is found.
pub fn parse_rest_seconds(text: &str) -> u32 {
    parse_rest_seconds_or(text, DEFAULT_REST_SECONDS)
}

pub fn parse_rest_seconds_or(text: &str, fallback: u32) -> u32 {
    if let Some(caps) = MINUTES_RE.captures(text) {
        if let Some(secs) = caps[1].parse::<u32>().ok().and_then(|m| m.checked_mul(60)) {
            return secs;
        }
    }
    NUMBER_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(fallback)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running {
        remaining: u32,
        total: u32,
        label: String,
    },
    Expired {
        label: String,
    },
}

/// Identifies one run of the timer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerTicket(u64);

#[derive(Debug)]
pub struct RestTimer {
    state: TimerState,
    generation: u64,
    fallback_seconds: u32,
}

impl Default for RestTimer {
    fn default() -> Self {
        Self::new(DEFAULT_REST_SECONDS)
    }
}

impl RestTimer {
    pub fn new(fallback_seconds: u32) -> Self {
        Self {
            state: TimerState::Idle,
            generation: 0,
            fallback_seconds,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// Start a run from a rest spec, discarding any current run
    pub fn start(&mut self, rest_spec: &str, label: impl Into<String>) -> TimerTicket {
        let seconds = parse_rest_seconds_or(rest_spec, self.fallback_seconds);
        self.start_seconds(seconds, label)
    }

    pub fn start_seconds(&mut self, seconds: u32, label: impl Into<String>) -> TimerTicket {
        self.generation += 1;
        let label = label.into();
        tracing::debug!("Rest timer started: {}s for '{}'", seconds, label);
        self.state = if seconds == 0 {
            TimerState::Expired { label }
        } else {
            TimerState::Running {
                remaining: seconds,
                total: seconds,
                label,
            }
        };
        TimerTicket(self.generation)
    }

    /// Apply one tick. Returns false when the tick is stale or the timer
    /// is not running.
    pub fn tick(&mut self, ticket: TimerTicket) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        let TimerState::Running { remaining, label, .. } = &mut self.state else {
            return false;
        };

        *remaining -= 1;
        if *remaining == 0 {
            let label = std::mem::take(label);
            tracing::debug!("Rest timer expired for '{}'", label);
            self.state = TimerState::Expired { label };
        }
        true
    }

    /// Force `Idle`; outstanding tickets become stale
    pub fn stop(&mut self) {
        self.generation += 1;
        self.state = TimerState::Idle;
    }
}

/// Periodic delivery of a ticket to a channel
pub trait TickSource {
    /// Begin delivering `ticket` on `sink` once per period
    fn begin(&mut self, ticket: TimerTicket, sink: Sender<TimerTicket>);

    /// Stop delivering; must be safe to call when idle
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

/// Tick source backed by a sleeping background thread
pub struct ThreadTicker {
    period: Duration,
    active: Option<(Arc<AtomicBool>, JoinHandle<()>)>,
}

impl ThreadTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            active: None,
        }
    }
}

impl TickSource for ThreadTicker {
    fn begin(&mut self, ticket: TimerTicket, sink: Sender<TimerTicket>) {
        self.cancel();

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let period = self.period;
        let handle = std::thread::spawn(move || loop {
            std::thread::sleep(period);
            if flag.load(Ordering::Acquire) || sink.send(ticket).is_err() {
                break;
            }
        });
        self.active = Some((cancelled, handle));
    }

    fn cancel(&mut self) {
        if let Some((cancelled, _handle)) = self.active.take() {
            // The thread exits on its next wake-up without sending
            cancelled.store(true, Ordering::Release);
        }
    }

    fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|(cancelled, handle)| !cancelled.load(Ordering::Acquire) && !handle.is_finished())
    }
}

impl Drop for ThreadTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Owns the timer and its single tick source
pub struct TimerDriver<T: TickSource = ThreadTicker> {
    timer: RestTimer,
    source: T,
    sender: Sender<TimerTicket>,
    receiver: Receiver<TimerTicket>,
}

impl TimerDriver<ThreadTicker> {
    pub fn with_period(period: Duration, fallback_seconds: u32) -> Self {
        Self::new(RestTimer::new(fallback_seconds), ThreadTicker::new(period))
    }
}

impl<T: TickSource> TimerDriver<T> {
    pub fn new(timer: RestTimer, source: T) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            timer,
            source,
            sender,
            receiver,
        }
    }

    pub fn state(&self) -> &TimerState {
        self.timer.state()
    }

    pub fn source(&self) -> &T {
        &self.source
    }

    /// Cancel the current run (and its tick source) and start a new one
    pub fn start(&mut self, rest_spec: &str, label: impl Into<String>) -> &TimerState {
        self.source.cancel();
        let ticket = self.timer.start(rest_spec, label);
        if self.timer.is_running() {
            self.source.begin(ticket, self.sender.clone());
        }
        self.timer.state()
    }

    /// Apply every tick already delivered, without blocking
    pub fn pump(&mut self) -> &TimerState {
        while let Ok(ticket) = self.receiver.try_recv() {
            self.apply(ticket);
        }
        self.timer.state()
    }

    /// Block for the next tick (up to `timeout`) and apply it.
    ///
    /// Returns false on timeout or when the tick was stale.
    pub fn wait_tick(&mut self, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Ok(ticket) => self.apply(ticket),
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                self.source.cancel();
                false
            }
        }
    }

    pub fn stop(&mut self) {
        self.source.cancel();
        self.timer.stop();
    }

    fn apply(&mut self, ticket: TimerTicket) -> bool {
        let applied = self.timer.tick(ticket);
        if applied && !self.timer.is_running() {
            self.source.cancel();
        }
        applied
    }
}

impl<T: TickSource> Drop for TimerDriver<T> {
    fn drop(&mut self) {
        self.source.cancel();
    }
}
