//! §3 Target — a single browser-attached session (typically one page).

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::ids::{FrameId, TargetId};
use crate::state::{Frame, Signal};

struct TargetState {
    frames: HashMap<FrameId, Arc<Frame>>,
    top_frame: Option<FrameId>,
    closed: bool,
}

/// Target's read/write lock guards the frame map and the current-frame
/// pointer (§5). Destroyed on detach, transport close, or cancellation.
pub struct Target {
    pub target_id: TargetId,
    state: RwLock<TargetState>,
    /// One-shot "loaded" signal: rearmed before a user-issued navigation
    /// fires, closed by `loadEventFired` (§4.4).
    pub loaded: Signal,
}

impl Target {
    pub fn new(target_id: TargetId) -> Self {
        Self {
            target_id,
            state: RwLock::new(TargetState {
                frames: HashMap::new(),
                top_frame: None,
                closed: false,
            }),
            loaded: Signal::new(),
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.state.read().await.closed
    }

    pub async fn close(&self) {
        self.state.write().await.closed = true;
    }

    pub async fn top_frame(&self) -> Option<Arc<Frame>> {
        let state = self.state.read().await;
        let id = state.top_frame.as_ref()?;
        state.frames.get(id).cloned()
    }

    pub async fn frame(&self, id: &FrameId) -> Option<Arc<Frame>> {
        self.state.read().await.frames.get(id).cloned()
    }

    pub async fn frames(&self) -> Vec<Arc<Frame>> {
        self.state.read().await.frames.values().cloned().collect()
    }

    /// Inserts or replaces the Frame by id; if it matches the current
    /// top frame (or none is set yet and this frame has no parent),
    /// updates the top pointer too (§4.4 `frameNavigated`).
    pub async fn upsert_frame(&self, frame: Frame) -> Arc<Frame> {
        let is_top_candidate = frame.parent_frame_id.is_none();
        let id = frame.id.clone();
        let frame = Arc::new(frame);
        let mut state = self.state.write().await;
        state.frames.insert(id.clone(), Arc::clone(&frame));
        if is_top_candidate {
            state.top_frame = Some(id);
        }
        frame
    }

    pub async fn remove_frame(&self, id: &FrameId) -> Option<Arc<Frame>> {
        let mut state = self.state.write().await;
        let removed = state.frames.remove(id);
        if state.top_frame.as_ref() == Some(id) {
            state.top_frame = None;
        }
        removed
    }
}
