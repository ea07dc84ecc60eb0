//! Fullscreen Integrity Monitor.
//!
//! While a session is in progress and the host reports that fullscreen was
//! lost, answer input is blocked and a re-entry prompt is shown. The question
//! timer is never paused.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;

use crate::interview::session::SessionStatus;

#[derive(Debug, Default, Clone, Copy)]
pub struct IntegrityMonitor {
    fullscreen: bool,
}

impl IntegrityMonitor {
    /// Records the host's fullscreen flag. Returns whether it changed.
    pub fn observe(&mut self, fullscreen: bool) -> bool {
        let changed = self.fullscreen != fullscreen;
        self.fullscreen = fullscreen;
        changed
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Paused-for-display only applies to an in-progress session.
    pub fn is_paused(&self, status: SessionStatus) -> bool {
        status == SessionStatus::InProgress && !self.fullscreen
    }
}

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("no display host is attached")]
    HostDetached,
}

/// What the station wants the browser host to do with the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayDirective {
    Idle,
    EnterFullscreen,
    ExitFullscreen,
}

/// The environment that owns the viewport.
pub trait DisplayHost: Send + Sync {
    /// Best-effort; failure only means the monitor will show its prompt.
    fn request_fullscreen(&self) -> Result<(), DisplayError>;

    fn release_fullscreen(&self);
}

/// Publishes directives on a watch channel that the browser host polls.
pub struct DirectiveDisplay {
    directives: watch::Sender<DisplayDirective>,
}

impl DirectiveDisplay {
    pub fn new() -> (Self, watch::Receiver<DisplayDirective>) {
        let (directives, rx) = watch::channel(DisplayDirective::Idle);
        (Self { directives }, rx)
    }
}

impl DisplayHost for DirectiveDisplay {
    fn request_fullscreen(&self) -> Result<(), DisplayError> {
        self.directives
            .send(DisplayDirective::EnterFullscreen)
            .map_err(|_| DisplayError::HostDetached)
    }

    fn release_fullscreen(&self) {
        self.directives.send_replace(DisplayDirective::ExitFullscreen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_only_while_in_progress_without_fullscreen() {
        let mut monitor = IntegrityMonitor::default();
        assert!(monitor.is_paused(SessionStatus::InProgress));
        for status in [
            SessionStatus::NotStarted,
            SessionStatus::Gathering,
            SessionStatus::Ready,
            SessionStatus::Evaluating,
            SessionStatus::Completed,
        ] {
            assert!(!monitor.is_paused(status), "{status:?}");
        }

        assert!(monitor.observe(true));
        assert!(!monitor.is_paused(SessionStatus::InProgress));
        assert!(!monitor.observe(true));
    }

    #[test]
    fn test_directive_display_publishes_requests() {
        let (display, rx) = DirectiveDisplay::new();
        assert_eq!(*rx.borrow(), DisplayDirective::Idle);

        display.request_fullscreen().unwrap();
        assert_eq!(*rx.borrow(), DisplayDirective::EnterFullscreen);

        display.release_fullscreen();
        assert_eq!(*rx.borrow(), DisplayDirective::ExitFullscreen);
    }

    #[test]
    fn test_request_fails_once_host_is_gone() {
        let (display, rx) = DirectiveDisplay::new();
        drop(rx);
        assert!(matches!(
            display.request_fullscreen(),
            Err(DisplayError::HostDetached)
        ));
    }
}
