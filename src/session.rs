//! Page sessions: the server-side lifetime of one rendered page.
//!
//! Rendering a page mounts a session. The page then attaches to it through
//! its event stream. The session is unmounted when the last attachment
//! drops, when the browser posts an explicit unmount, or when the reaper
//! finds it was never attached. Everything a session owns (clock and pulse
//! timers, injected global styles) is released by `Drop`, so every exit path
//! cleans up the same way.
//!
//! ```text
//! mounted(pending) --attach--> attached --last detach / unmount--> unmounted
//!        \------------------- reaper timeout --------------------/
//! ```

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tokio::{sync::watch, time::Instant};
use uuid::Uuid;

use crate::{
    views::map::{POPUP_CSS, POPUP_STYLE_ID},
    Config, ScopedTimer, StyleGuard, StyleRegistry,
};

// ---

pub type SessionId = Uuid;

/// Which page a session belongs to; decides what the session owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Dashboard,
    Map,
}

impl PageKind {
    /// Dashboard sessions run the clock and highlight timers.
    fn runs_clock(self) -> bool {
        matches!(self, PageKind::Dashboard)
    }

    /// Global styles injected for the lifetime of the session.
    fn styles(self) -> &'static [(&'static str, &'static str)] {
        // ---
        match self {
            PageKind::Dashboard => &[],
            PageKind::Map => &[(POPUP_STYLE_ID, POPUP_CSS)],
        }
    }
}

/// One frame pushed to an attached page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockFrame {
    pub now: DateTime<Utc>,
    /// Local wall-clock time, `HH:MM:SS`.
    pub clock: String,
    /// True for the short window after each pulse.
    pub highlight: bool,
}

impl ClockFrame {
    fn at(now: DateTime<Utc>, highlight: bool) -> Self {
        // ---
        Self {
            now,
            clock: now.with_timezone(&Local).format("%H:%M:%S").to_string(),
            highlight,
        }
    }
}

/// Timer settings shared by every session.
#[derive(Debug, Clone, Copy)]
pub struct SessionTiming {
    pub clock_tick: Duration,
    pub pulse_interval: Duration,
    pub pulse_duration: Duration,
    pub attach_timeout: Duration,
}

impl From<&Config> for SessionTiming {
    fn from(cfg: &Config) -> Self {
        // ---
        Self {
            clock_tick: cfg.clock_tick,
            pulse_interval: cfg.pulse_interval,
            pulse_duration: cfg.pulse_duration,
            attach_timeout: cfg.session_attach_timeout,
        }
    }
}

/// Resources owned by one mounted page.
struct PageSession {
    kind: PageKind,
    mounted_at: Instant,
    attachments: usize,
    frames: Arc<watch::Sender<ClockFrame>>,
    _timers: Vec<ScopedTimer>,
    _styles: Vec<StyleGuard>,
}

/// All live page sessions.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionId, PageSession>>>,
    styles: StyleRegistry,
    timing: SessionTiming,
}

impl SessionRegistry {
    pub fn new(styles: StyleRegistry, timing: SessionTiming) -> Self {
        // ---
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            styles,
            timing,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, PageSession>> {
        // ---
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Mount a session for `kind`, starting its timers and styles.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(&self, kind: PageKind) -> SessionId {
        // ---
        let id = Uuid::new_v4();
        let (tx, _rx) = watch::channel(ClockFrame::at(Utc::now(), false));
        let frames = Arc::new(tx);

        let mut timers = Vec::new();
        if kind.runs_clock() {
            timers.push(clock_timer(frames.clone(), self.timing.clock_tick));
            timers.push(pulse_timer(
                frames.clone(),
                self.timing.pulse_interval,
                self.timing.pulse_duration,
            ));
        }

        let styles = kind
            .styles()
            .iter()
            .map(|&(style_id, css)| self.styles.acquire(style_id, css))
            .collect();

        let session = PageSession {
            kind,
            mounted_at: Instant::now(),
            attachments: 0,
            frames,
            _timers: timers,
            _styles: styles,
        };
        self.lock().insert(id, session);

        tracing::debug!(session = %id, ?kind, "session mounted");
        id
    }

    /// Attach a page's event stream. `None` if the session is gone.
    pub fn attach(&self, id: SessionId) -> Option<Attachment> {
        // ---
        let mut sessions = self.lock();
        let session = sessions.get_mut(&id)?;
        session.attachments += 1;
        let frames = session.frames.subscribe();

        tracing::debug!(
            session = %id,
            kind = ?session.kind,
            attachments = session.attachments,
            "session attached"
        );

        Some(Attachment {
            frames,
            guard: AttachGuard {
                registry: self.clone(),
                id,
            },
        })
    }

    fn detach(&self, id: SessionId) {
        // ---
        let last = {
            let mut sessions = self.lock();
            match sessions.get_mut(&id) {
                Some(session) => {
                    session.attachments = session.attachments.saturating_sub(1);
                    session.attachments == 0
                }
                None => false,
            }
        };
        if last {
            self.unmount(id);
        }
    }

    /// Unmount a session, cancelling its timers and releasing its styles.
    /// Returns false if no such session was live.
    pub fn unmount(&self, id: SessionId) -> bool {
        // ---
        // Drop the session outside the map lock.
        let removed = self.lock().remove(&id);
        match removed {
            Some(session) => {
                tracing::debug!(session = %id, kind = ?session.kind, "session unmounted");
                drop(session);
                true
            }
            None => false,
        }
    }

    /// Unmount every live session.
    pub fn unmount_all(&self) -> usize {
        // ---
        let drained: Vec<_> = self.lock().drain().collect();
        let count = drained.len();
        drop(drained);
        if count > 0 {
            tracing::info!("Unmounted {} page sessions", count);
        }
        count
    }

    /// Unmount sessions that were never attached within the timeout.
    pub fn reap_unattached(&self) -> usize {
        // ---
        let timeout = self.timing.attach_timeout;
        let stale: Vec<PageSession> = {
            let mut sessions = self.lock();
            let ids: Vec<SessionId> = sessions
                .iter()
                .filter(|(_, s)| s.attachments == 0 && s.mounted_at.elapsed() >= timeout)
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| sessions.remove(id)).collect()
        };

        if !stale.is_empty() {
            tracing::debug!("Reaped {} unattached sessions", stale.len());
        }
        stale.len()
    }

    /// Periodically reap unattached sessions while the timer lives.
    pub fn spawn_reaper(&self) -> ScopedTimer {
        // ---
        let registry = self.clone();
        let period = (self.timing.attach_timeout / 2).max(Duration::from_secs(1));
        ScopedTimer::every("session-reaper", period, move || {
            let registry = registry.clone();
            async move {
                registry.reap_unattached();
            }
        })
    }

    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.lock().contains_key(&id)
    }
}

/// A live attachment: frame updates plus the guard that detaches on drop.
pub struct Attachment {
    pub frames: watch::Receiver<ClockFrame>,
    pub guard: AttachGuard,
}

/// Detaches from its session when dropped; the last detach unmounts it.
pub struct AttachGuard {
    registry: SessionRegistry,
    id: SessionId,
}

impl Drop for AttachGuard {
    fn drop(&mut self) {
        self.registry.detach(self.id);
    }
}

fn clock_timer(frames: Arc<watch::Sender<ClockFrame>>, period: Duration) -> ScopedTimer {
    // ---
    ScopedTimer::every("clock", period, move || {
        let frames = frames.clone();
        async move {
            frames.send_modify(|f| *f = ClockFrame::at(Utc::now(), f.highlight));
        }
    })
}

fn pulse_timer(
    frames: Arc<watch::Sender<ClockFrame>>,
    period: Duration,
    duration: Duration,
) -> ScopedTimer {
    // ---
    ScopedTimer::every("pulse", period, move || {
        let frames = frames.clone();
        async move {
            frames.send_modify(|f| f.highlight = true);
            tokio::time::sleep(duration).await;
            frames.send_modify(|f| f.highlight = false);
        }
    })
}
