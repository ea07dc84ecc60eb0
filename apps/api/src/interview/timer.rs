//! Question Timer: one countdown task per question.
//!
//! The task ticks once per second and reports through an unbounded channel.
//! Dropping the [`QuestionTimer`] aborts the task; signals already queued are
//! recognised as stale by their [`TimerTag`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use uuid::Uuid;

/// Identifies the question a timer was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTag {
    pub epoch: Uuid,
    pub question_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignalKind {
    Tick { remaining: u32 },
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSignal {
    pub tag: TimerTag,
    pub kind: TimerSignalKind,
}

pub struct QuestionTimer {
    tag: TimerTag,
    handle: JoinHandle<()>,
}

impl QuestionTimer {
    pub fn start(
        tag: TimerTag,
        time_limit_seconds: u32,
        signals: mpsc::UnboundedSender<TimerSignal>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut remaining = time_limit_seconds;
            while remaining > 0 {
                ticker.tick().await;
                remaining -= 1;
                let kind = if remaining == 0 {
                    TimerSignalKind::Expired
                } else {
                    TimerSignalKind::Tick { remaining }
                };
                if signals.send(TimerSignal { tag, kind }).is_err() {
                    return;
                }
            }

            if time_limit_seconds == 0 {
                let _ = signals.send(TimerSignal {
                    tag,
                    kind: TimerSignalKind::Expired,
                });
            }
        });

        Self { tag, handle }
    }

    pub fn tag(&self) -> TimerTag {
        self.tag
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
