//! §4.4 State Replica — applies inbound CDP events to the `Target` tree,
//! and the `WaitFrame`/`WaitNode` polling helpers the Action Engine (and
//! this module's own out-of-order delta handling) use to wait for ids
//! the Replica hasn't caught up with yet.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace};

use crate::cdp::dom;
use crate::cdp::page;
use crate::dispatcher::Dispatcher;
use crate::error::{CdpError, Result};
use crate::ids::{FrameId, NodeId};
use crate::state::{Frame, LifecycleFlags, Node, Target};

/// Builds a `Node` subtree from its wire representation, registering
/// every node (not just the root) into `out`. Plain recursion is safe
/// here: the tree depth is bounded by the real DOM, and none of these
/// nodes are shared until the caller merges `out` into a `Frame`.
fn build_node(wire: &dom::Node, parent: Option<NodeId>, out: &mut HashMap<NodeId, Arc<Node>>) -> NodeId {
    let id = wire.node_id;
    let text = if wire.node_type == 3 {
        Some(wire.node_value.clone())
    } else {
        None
    };
    let children = wire
        .children
        .iter()
        .map(|child| build_node(child, Some(id), out))
        .collect();
    let node = Node::from_wire(
        id,
        wire.node_type,
        wire.local_name.clone(),
        parent,
        wire.attributes.clone(),
        text,
        children,
    );
    out.insert(id, Arc::new(node));
    id
}

/// Looks up a node by id across every frame the target currently knows
/// about; DOM mutation events don't carry a frame id of their own.
async fn locate(target: &Target, id: NodeId) -> Option<(Arc<Frame>, Arc<Node>)> {
    for frame in target.frames().await {
        if let Some(node) = frame.node(id).await {
            return Some((frame, node));
        }
    }
    None
}

async fn apply_set_child_nodes(frame: Arc<Frame>, parent: Arc<Node>, e: dom::EventSetChildNodes) {
    let mut nodes = HashMap::new();
    let child_ids: Vec<NodeId> = e
        .nodes
        .iter()
        .map(|wire| build_node(wire, Some(e.parent_id), &mut nodes))
        .collect();
    frame.insert_node_tree(nodes).await;
    parent.set_children(child_ids).await;
}

async fn apply_child_node_inserted(frame: Arc<Frame>, parent: Arc<Node>, e: dom::EventChildNodeInserted) {
    let mut nodes = HashMap::new();
    let new_id = build_node(&e.node, Some(e.parent_node_id), &mut nodes);
    frame.insert_node_tree(nodes).await;
    let siblings = parent.children().await;
    let index = if e.previous_node_id.0 == 0 {
        Some(0)
    } else {
        siblings.iter().position(|id| *id == e.previous_node_id).map(|pos| pos + 1)
    };
    parent.add_child(new_id, index).await;
}

async fn apply_child_node_removed(frame: Arc<Frame>, parent: Arc<Node>, e: dom::EventChildNodeRemoved) {
    frame.remove_subtree(e.node_id).await;
    parent.remove_child(e.node_id).await;
}

async fn apply_attribute_modified(_frame: Arc<Frame>, node: Arc<Node>, e: dom::EventAttributeModified) {
    node.set_attribute(e.name, e.value).await;
}

async fn apply_attribute_removed(_frame: Arc<Frame>, node: Arc<Node>, e: dom::EventAttributeRemoved) {
    node.remove_attribute(&e.name).await;
}

async fn apply_character_data_modified(
    _frame: Arc<Frame>,
    node: Arc<Node>,
    e: dom::EventCharacterDataModified,
) {
    node.set_text(e.character_data).await;
}

async fn apply_shadow_root_pushed(frame: Arc<Frame>, host: Arc<Node>, e: dom::EventShadowRootPushed) {
    let mut nodes = HashMap::new();
    let root_id = build_node(&e.root, Some(e.host_id), &mut nodes);
    frame.insert_node_tree(nodes).await;
    host.add_child(root_id, None).await;
}

async fn apply_shadow_root_popped(frame: Arc<Frame>, host: Arc<Node>, e: dom::EventShadowRootPopped) {
    frame.remove_subtree(e.root_id).await;
    host.remove_child(e.root_id).await;
}

async fn apply_pseudo_element_added(frame: Arc<Frame>, parent: Arc<Node>, e: dom::EventPseudoElementAdded) {
    let mut nodes = HashMap::new();
    let id = build_node(&e.pseudo_element, Some(e.parent_id), &mut nodes);
    frame.insert_node_tree(nodes).await;
    parent.add_child(id, None).await;
}

async fn apply_pseudo_element_removed(
    frame: Arc<Frame>,
    parent: Arc<Node>,
    e: dom::EventPseudoElementRemoved,
) {
    frame.remove_subtree(e.pseudo_element_id).await;
    parent.remove_child(e.pseudo_element_id).await;
}

/// Applies a delta whose parent is already known, or defers it to a
/// background retry via `wait_node` when it isn't (§4.4: "each delta
/// waits on the parent node's existence via `WaitNode` before
/// applying"). `apply_event` itself must never block on `WaitNode`: it
/// runs on the Dispatcher's single-consumer event loop, and the event
/// that would satisfy the wait is queued behind this very call.
async fn apply_or_defer<E, F, Fut>(dispatcher: &Dispatcher, parent_id: NodeId, event: E, apply: F)
where
    E: Send + 'static,
    F: FnOnce(Arc<Frame>, Arc<Node>, E) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    if let Some((frame, parent)) = locate(&dispatcher.target, parent_id).await {
        apply(frame, parent, event).await;
        return;
    }
    trace!(?parent_id, "parent node not yet seen, deferring delta");
    let dispatcher = dispatcher.clone();
    tokio::spawn(async move {
        match wait_node(&dispatcher, parent_id).await {
            Ok((frame, parent)) => apply(frame, parent, event).await,
            Err(err) => debug!(?parent_id, %err, "parent node never arrived, dropping delta"),
        }
    });
}

/// Applies a frame-flag update if `frame_id` is already known, or defers
/// it to a background retry via `wait_frame` when it isn't — the same
/// out-of-order problem `apply_or_defer` handles for nodes, but for
/// frames whose `frameAttached`/`frameNavigated` hasn't arrived yet.
async fn set_flags_or_defer(
    dispatcher: &Dispatcher,
    frame_id: FrameId,
    set: impl FnOnce(&mut LifecycleFlags) + Send + 'static,
) {
    if let Some(frame) = dispatcher.target.frame(&frame_id).await {
        frame.set_flags(set).await;
        return;
    }
    trace!(%frame_id, "frame not yet seen, deferring flag update");
    let dispatcher = dispatcher.clone();
    tokio::spawn(async move {
        match wait_frame(&dispatcher, &frame_id).await {
            Ok(frame) => frame.set_flags(set).await,
            Err(err) => debug!(%frame_id, %err, "frame never arrived, dropping flag update"),
        }
    });
}

/// Applies one inbound event to `target`, mutating the state replica and,
/// for `documentUpdated`, issuing a `DOM.getDocument` re-fetch through
/// `dispatcher`.
pub async fn apply_event(
    dispatcher: &Dispatcher,
    event: &crate::codec::EventMessage,
) -> Result<()> {
    let target = &dispatcher.target;
    match event.method.as_ref() {
        "Page.frameNavigated" => {
            let e: page::EventFrameNavigated = serde_json::from_value(event.params.clone())?;
            target
                .upsert_frame(Frame::new(e.frame.id, e.frame.parent_id))
                .await;
        }
        "Page.frameAttached" => {
            let e: page::EventFrameAttached = serde_json::from_value(event.params.clone())?;
            if target.frame(&e.frame_id).await.is_none() {
                target
                    .upsert_frame(Frame::new(e.frame_id.clone(), Some(e.parent_frame_id)))
                    .await;
            }
            if let Some(frame) = target.frame(&e.frame_id).await {
                frame.set_flags(|f| f.attached = true).await;
            }
        }
        "Page.frameDetached" => {
            let e: page::EventFrameDetached = serde_json::from_value(event.params.clone())?;
            target.remove_frame(&e.frame_id).await;
        }
        "Page.frameStartedLoading" => {
            let e: page::EventFrameStartedLoading = serde_json::from_value(event.params.clone())?;
            set_flags_or_defer(dispatcher, e.frame_id, |f| f.loading = true).await;
        }
        "Page.frameStoppedLoading" => {
            let e: page::EventFrameStoppedLoading = serde_json::from_value(event.params.clone())?;
            set_flags_or_defer(dispatcher, e.frame_id, |f| f.loading = false).await;
        }
        "Page.frameScheduledNavigation" => {
            let e: page::EventFrameScheduledNavigation = serde_json::from_value(event.params.clone())?;
            set_flags_or_defer(dispatcher, e.frame_id, |f| f.navigation_scheduled = true).await;
        }
        "Page.frameClearedScheduledNavigation" => {
            let e: page::EventFrameClearedScheduledNavigation =
                serde_json::from_value(event.params.clone())?;
            set_flags_or_defer(dispatcher, e.frame_id, |f| f.navigation_scheduled = false).await;
        }
        "Page.navigatedWithinDocument" | "Page.lifecycleEvent" => {
            // Best-effort per the Open Question decision: only
            // frameNavigated/loadEventFired/documentUpdated are
            // contractually handled.
            trace!(method = %event.method, "best-effort lifecycle event, ignored");
        }
        "Page.loadEventFired" => {
            target.loaded.close();
        }
        "DOM.documentUpdated" => {
            let result = dispatcher
                .execute(None, dom::GetDocumentParams::full_subtree())
                .await?;
            let frame = target.top_frame().await.ok_or(CdpError::InvalidTarget)?;
            let mut nodes = HashMap::new();
            let root_id = build_node(&result.root, None, &mut nodes);
            frame.replace_root(root_id, nodes).await;
        }
        "DOM.setChildNodes" => {
            let e: dom::EventSetChildNodes = serde_json::from_value(event.params.clone())?;
            let parent_id = e.parent_id;
            apply_or_defer(dispatcher, parent_id, e, apply_set_child_nodes).await;
        }
        "DOM.childNodeInserted" => {
            let e: dom::EventChildNodeInserted = serde_json::from_value(event.params.clone())?;
            let parent_id = e.parent_node_id;
            apply_or_defer(dispatcher, parent_id, e, apply_child_node_inserted).await;
        }
        "DOM.childNodeRemoved" => {
            let e: dom::EventChildNodeRemoved = serde_json::from_value(event.params.clone())?;
            let parent_id = e.parent_node_id;
            apply_or_defer(dispatcher, parent_id, e, apply_child_node_removed).await;
        }
        "DOM.attributeModified" => {
            let e: dom::EventAttributeModified = serde_json::from_value(event.params.clone())?;
            let node_id = e.node_id;
            apply_or_defer(dispatcher, node_id, e, apply_attribute_modified).await;
        }
        "DOM.attributeRemoved" => {
            let e: dom::EventAttributeRemoved = serde_json::from_value(event.params.clone())?;
            let node_id = e.node_id;
            apply_or_defer(dispatcher, node_id, e, apply_attribute_removed).await;
        }
        "DOM.characterDataModified" => {
            let e: dom::EventCharacterDataModified = serde_json::from_value(event.params.clone())?;
            let node_id = e.node_id;
            apply_or_defer(dispatcher, node_id, e, apply_character_data_modified).await;
        }
        "DOM.shadowRootPushed" => {
            let e: dom::EventShadowRootPushed = serde_json::from_value(event.params.clone())?;
            let host_id = e.host_id;
            apply_or_defer(dispatcher, host_id, e, apply_shadow_root_pushed).await;
        }
        "DOM.shadowRootPopped" => {
            let e: dom::EventShadowRootPopped = serde_json::from_value(event.params.clone())?;
            let host_id = e.host_id;
            apply_or_defer(dispatcher, host_id, e, apply_shadow_root_popped).await;
        }
        "DOM.pseudoElementAdded" => {
            let e: dom::EventPseudoElementAdded = serde_json::from_value(event.params.clone())?;
            let parent_id = e.parent_id;
            apply_or_defer(dispatcher, parent_id, e, apply_pseudo_element_added).await;
        }
        "DOM.pseudoElementRemoved" => {
            let e: dom::EventPseudoElementRemoved = serde_json::from_value(event.params.clone())?;
            let parent_id = e.parent_id;
            apply_or_defer(dispatcher, parent_id, e, apply_pseudo_element_removed).await;
        }
        "DOM.childNodeCountUpdated" | "DOM.distributedNodesUpdated" | "DOM.inlineStyleInvalidated" => {
            // Advisory-only deltas with no structural change the replica
            // needs to apply on its own (§4.4 Non-goals).
            trace!(method = %event.method, "advisory DOM event, ignored");
        }
        _ => {
            trace!(method = %event.method, "unhandled event, ignored");
        }
    }
    Ok(())
}

/// Polls until `frame_id` appears in the target's frame map or
/// `config.wait_node_deadline` elapses (§4.4 `WaitFrame`).
pub async fn wait_frame(dispatcher: &Dispatcher, frame_id: &FrameId) -> Result<Arc<Frame>> {
    let deadline = Instant::now() + dispatcher.config.wait_node_deadline;
    loop {
        if let Some(frame) = dispatcher.target.frame(frame_id).await {
            return Ok(frame);
        }
        if Instant::now() >= deadline {
            return Err(CdpError::Timeout("WaitFrame", dispatcher.config.wait_node_deadline));
        }
        tokio::time::sleep(dispatcher.config.selector_quantum).await;
    }
}

/// Polls until `node_id` appears in some frame of the target's tree or
/// `config.wait_node_deadline` elapses (§4.4 `WaitNode`). Searches every
/// frame rather than a single one: a delta referencing an unseen node
/// doesn't know which frame the node will end up in any more than
/// `locate` does.
pub async fn wait_node(dispatcher: &Dispatcher, node_id: NodeId) -> Result<(Arc<Frame>, Arc<Node>)> {
    let deadline = Instant::now() + dispatcher.config.wait_node_deadline;
    loop {
        if let Some(found) = locate(&dispatcher.target, node_id).await {
            return Ok(found);
        }
        if Instant::now() >= deadline {
            return Err(CdpError::Timeout("WaitNode", dispatcher.config.wait_node_deadline));
        }
        tokio::time::sleep(dispatcher.config.selector_quantum).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TargetId;

    fn event(method: &'static str, params: serde_json::Value) -> crate::codec::EventMessage {
        crate::codec::EventMessage {
            method: std::borrow::Cow::Borrowed(method),
            session_id: None,
            params,
        }
    }

    #[tokio::test]
    async fn frame_navigated_inserts_top_frame() {
        let target = Target::new(TargetId("t1".into()));
        let frame_wire = serde_json::json!({
            "id": "f1",
            "parentId": null,
            "loaderId": null,
            "name": null,
            "url": "https://example.com",
            "urlFragment": null,
        });
        let e: page::EventFrameNavigated =
            serde_json::from_value(serde_json::json!({ "frame": frame_wire })).unwrap();
        target
            .upsert_frame(Frame::new(e.frame.id, e.frame.parent_id))
            .await;
        let top = target.top_frame().await;
        assert!(top.is_some());
        assert_eq!(top.unwrap().id.0, "f1");
        let _ = event("noop", serde_json::json!({}));
    }

    #[tokio::test]
    async fn load_event_fired_closes_loaded_signal() {
        let target = Target::new(TargetId("t1".into()));
        assert!(!target.loaded.is_closed());
        target.loaded.close();
        assert!(target.loaded.is_closed());
    }

    #[tokio::test]
    async fn locate_finds_node_across_frames() {
        let target = Target::new(TargetId("t1".into()));
        let frame = target
            .upsert_frame(Frame::new(FrameId("f1".into()), None))
            .await;
        let node = Node::new(NodeId(7), 1, "div");
        frame.insert_node(node).await;
        let found = locate(&target, NodeId(7)).await;
        assert!(found.is_some());
        assert_eq!(found.unwrap().1.id, NodeId(7));
        assert!(locate(&target, NodeId(99)).await.is_none());
    }
}
