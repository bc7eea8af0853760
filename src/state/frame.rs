//! §3 Frame — a named browsing context inside a Target.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::ids::{FrameId, NodeId};
use crate::state::{Node, Signal};

#[derive(Debug, Default, Clone, Copy)]
pub struct LifecycleFlags {
    pub attached: bool,
    pub loading: bool,
    pub navigation_scheduled: bool,
}

struct FrameState {
    flags: LifecycleFlags,
    root: Option<NodeId>,
    nodes: HashMap<NodeId, Arc<Node>>,
}

/// A Frame's read/write lock guards its lifecycle flags, root, and node
/// map in one unit (§5). Individual `Node`s still carry their own lock
/// for attribute/children mutation without taking the Frame lock.
pub struct Frame {
    pub id: FrameId,
    pub parent_frame_id: Option<FrameId>,
    state: RwLock<FrameState>,
}

impl Frame {
    pub fn new(id: FrameId, parent_frame_id: Option<FrameId>) -> Self {
        Self {
            id,
            parent_frame_id,
            state: RwLock::new(FrameState {
                flags: LifecycleFlags::default(),
                root: None,
                nodes: HashMap::new(),
            }),
        }
    }

    pub async fn flags(&self) -> LifecycleFlags {
        self.state.read().await.flags
    }

    pub async fn set_flags(&self, f: impl FnOnce(&mut LifecycleFlags)) {
        let mut state = self.state.write().await;
        f(&mut state.flags);
    }

    pub async fn root(&self) -> Option<NodeId> {
        self.state.read().await.root
    }

    pub async fn node(&self, id: NodeId) -> Option<Arc<Node>> {
        self.state.read().await.nodes.get(&id).cloned()
    }

    pub async fn node_count(&self) -> usize {
        self.state.read().await.nodes.len()
    }

    /// Inserts a node into the map (does not link it into the tree; the
    /// caller links parent/children separately so partially-applied
    /// deltas never leave an orphan reachable from `Root`).
    pub async fn insert_node(&self, node: Node) -> Arc<Node> {
        let node = Arc::new(node);
        let mut state = self.state.write().await;
        state.nodes.insert(node.id, Arc::clone(&node));
        node
    }

    /// Merges a prebuilt subtree (as produced by the replica's wire-node
    /// builder) into the node map without touching `root` or any other
    /// existing entry (§4.4 `setChildNodes`/`childNodeInserted`/shadow
    /// and pseudo-element deltas).
    pub async fn insert_node_tree(&self, nodes: HashMap<NodeId, Arc<Node>>) {
        self.state.write().await.nodes.extend(nodes);
    }

    pub async fn remove_node(&self, id: NodeId) -> Option<Arc<Node>> {
        let removed = self.state.write().await.nodes.remove(&id);
        if let Some(ref node) = removed {
            node.invalidated.close();
        }
        removed
    }

    /// Removes `id` and every descendant reachable through its children,
    /// invalidating each one. Used when a subtree is torn down by
    /// `childNodeRemoved`/`setChildNodes` replacement.
    pub async fn remove_subtree(&self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.node(next).await {
                stack.extend(node.children().await);
            }
            self.remove_node(next).await;
        }
    }

    /// Replaces the entire node map with a freshly fetched document and
    /// invalidates the previous root exactly once (§4.4 documentUpdated,
    /// §8 invariant).
    pub async fn replace_root(&self, new_root: NodeId, nodes: HashMap<NodeId, Arc<Node>>) {
        let mut state = self.state.write().await;
        if let Some(old_root) = state.root {
            if let Some(old) = state.nodes.get(&old_root) {
                old.invalidated.close();
            }
        }
        state.nodes = nodes;
        state.root = Some(new_root);
    }
}
