// File: crates/logview-core/src/scheduler.rs
// Summary: Per-chart render coalescing: latest-token-wins requests, resize debounce, readiness gating.
// Notes:
// - Host-loop agnostic: callers pass `now` in and call `poll` once per frame.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::types::ContainerSize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderReason {
    Data,
    Config,
    Resize,
    Viewport,
    DepthPin,
}

/// Identifies one render request. Only the most recent token is ever executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderToken {
    pub seq: u64,
    pub reason: RenderReason,
}

/// Work the owning chart must perform this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameAction {
    /// First construction into a container that just became non-empty.
    Build { size: ContainerSize, token: RenderToken },
    /// Full option rebuild; `resize` is set when the container size changed.
    Rebuild { token: RenderToken, resize: Option<ContainerSize> },
}

#[derive(Debug)]
pub struct RenderScheduler {
    debounce: Duration,
    size: ContainerSize,
    pending_size: Option<(ContainerSize, Instant)>,
    pending: Option<RenderToken>,
    next_seq: u64,
    built: bool,
    awaiting_size: bool,
    // terminal; nothing runs after the owner is disposed
    closed: bool,
}

impl RenderScheduler {
    pub fn new(initial: ContainerSize, debounce: Duration) -> Self {
        Self {
            debounce,
            size: initial,
            pending_size: None,
            pending: None,
            next_seq: 0,
            built: false,
            awaiting_size: !initial.is_renderable(),
            closed: false,
        }
    }

    pub fn size(&self) -> ContainerSize { self.size }
    pub fn is_built(&self) -> bool { self.built }
    pub fn is_closed(&self) -> bool { self.closed }
    /// True while construction or rendering waits for a non-empty container.
    pub fn is_pending(&self) -> bool { self.awaiting_size }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    /// Queue a render, replacing whatever was queued before.
    pub fn request(&mut self, reason: RenderReason) -> RenderToken {
        self.next_seq += 1;
        let token = RenderToken { seq: self.next_seq, reason };
        if let Some(old) = self.pending.replace(token) {
            trace!(superseded = old.seq, by = token.seq, "render request coalesced");
        }
        token
    }

    /// Report a new container size from the host's resize observer.
    pub fn container_resized(&mut self, size: ContainerSize, now: Instant) {
        if !size.is_renderable() {
            trace!(?size, "container collapsed, re-arming pending build");
            self.awaiting_size = true;
            self.pending_size = None;
            return;
        }
        self.awaiting_size = false;
        if !self.built {
            // The deferred first build uses the first usable size directly.
            self.size = size;
            return;
        }
        self.pending_size = Some((size, now + self.debounce));
    }

    /// Decide what, if anything, runs this frame.
    pub fn poll(&mut self, now: Instant) -> Option<FrameAction> {
        if self.closed || self.awaiting_size {
            return None;
        }
        if !self.built {
            if !self.size.is_renderable() {
                return None;
            }
            self.built = true;
            let token = self.pending.take().unwrap_or_else(|| {
                self.next_seq += 1;
                RenderToken { seq: self.next_seq, reason: RenderReason::Data }
            });
            return Some(FrameAction::Build { size: self.size, token });
        }
        if let Some((size, deadline)) = self.pending_size {
            if now >= deadline {
                self.pending_size = None;
                self.size = size;
                let token = self.request(RenderReason::Resize);
                self.pending = None;
                return Some(FrameAction::Rebuild { token, resize: Some(size) });
            }
        }
        self.pending.take().map(|token| FrameAction::Rebuild { token, resize: None })
    }

    /// Forget the built state; the next usable size triggers a fresh build.
    pub fn reset(&mut self) {
        self.built = false;
        self.pending = None;
        self.pending_size = None;
    }

    /// Stop scheduling for good. Later requests and resizes are ignored.
    pub fn close(&mut self) {
        self.reset();
        self.closed = true;
    }
}
