//! §3 Node — a DOM element mirror within a Frame.

use tokio::sync::RwLock;

use crate::ids::NodeId;
use crate::state::{Frame, Signal};

#[derive(Debug, Clone)]
struct NodeInner {
    node_type: i64,
    local_name: String,
    /// Ordered (name, value) pairs; order is preserved because event
    /// deltas (`attributeModified`) are order-sensitive.
    attributes: Vec<(String, String)>,
    /// Resolved via the Frame's node map; never an owning pointer
    /// (§9 "cyclic references ... stable integer ids").
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    text: Option<String>,
    xpath_cache: Option<String>,
}

/// A DOM node mirror. Per-node read/write lock guards attributes and
/// children (§5 Locking discipline); the invalidation signal closes when
/// the node is removed or its frame's root is replaced (§3).
#[derive(Debug)]
pub struct Node {
    pub id: NodeId,
    pub invalidated: Signal,
    inner: RwLock<NodeInner>,
}

impl Node {
    pub fn new(id: NodeId, node_type: i64, local_name: impl Into<String>) -> Self {
        Self {
            id,
            invalidated: Signal::new(),
            inner: RwLock::new(NodeInner {
                node_type,
                local_name: local_name.into(),
                attributes: Vec::new(),
                parent: None,
                children: Vec::new(),
                text: None,
                xpath_cache: None,
            }),
        }
    }

    /// Builds a fully-populated node straight from a replica-decoded wire
    /// value (§4.4), attributes and children already resolved, without a
    /// round trip through the individual async setters.
    pub fn from_wire(
        id: NodeId,
        node_type: i64,
        local_name: impl Into<String>,
        parent: Option<NodeId>,
        attributes_flat: Vec<String>,
        text: Option<String>,
        children: Vec<NodeId>,
    ) -> Self {
        let node = Self::new(id, node_type, local_name);
        // safe: freshly constructed, no concurrent access yet
        let mut inner = node.inner.try_write().unwrap();
        inner.parent = parent;
        inner.attributes = attributes_flat
            .chunks(2)
            .filter(|c| c.len() == 2)
            .map(|c| (c[0].clone(), c[1].clone()))
            .collect();
        inner.text = text;
        inner.children = children;
        drop(inner);
        node
    }

    pub async fn node_type(&self) -> i64 {
        self.inner.read().await.node_type
    }

    pub async fn local_name(&self) -> String {
        self.inner.read().await.local_name.clone()
    }

    pub async fn parent(&self) -> Option<NodeId> {
        self.inner.read().await.parent
    }

    pub async fn children(&self) -> Vec<NodeId> {
        self.inner.read().await.children.clone()
    }

    pub async fn attributes(&self) -> Vec<(String, String)> {
        self.inner.read().await.attributes.clone()
    }

    pub async fn attribute(&self, name: &str) -> Option<String> {
        self.inner
            .read()
            .await
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    pub async fn has_attribute(&self, name: &str) -> bool {
        self.inner.read().await.attributes.iter().any(|(k, _)| k == name)
    }

    pub async fn text(&self) -> Option<String> {
        self.inner.read().await.text.clone()
    }

    pub async fn set_text(&self, text: String) {
        self.inner.write().await.text = Some(text);
    }

    /// Preserves order: replaces the value if `name` is already present,
    /// otherwise appends.
    pub async fn set_attribute(&self, name: String, value: String) {
        let mut inner = self.inner.write().await;
        if let Some(entry) = inner.attributes.iter_mut().find(|(k, _)| *k == name) {
            entry.1 = value;
        } else {
            inner.attributes.push((name, value));
        }
    }

    pub async fn remove_attribute(&self, name: &str) {
        let mut inner = self.inner.write().await;
        inner.attributes.retain(|(k, _)| k != name);
    }

    pub async fn add_child(&self, child: NodeId, at_index: Option<usize>) {
        let mut inner = self.inner.write().await;
        match at_index {
            Some(idx) if idx <= inner.children.len() => inner.children.insert(idx, child),
            _ => inner.children.push(child),
        }
    }

    pub async fn remove_child(&self, child: NodeId) {
        self.inner.write().await.children.retain(|c| *c != child);
    }

    pub async fn set_children(&self, children: Vec<NodeId>) {
        self.inner.write().await.children = children;
    }

    pub async fn cached_xpath(&self) -> Option<String> {
        self.inner.read().await.xpath_cache.clone()
    }

    pub async fn cache_xpath(&self, xpath: String) {
        self.inner.write().await.xpath_cache = Some(xpath);
    }

    /// Computes this node's full XPath by walking parent pointers through
    /// `frame`, each segment qualified by position among same-tag siblings
    /// (§3 "full XPath cache"). Cached after the first computation; the
    /// cache can go stale across a sibling reorder since nothing currently
    /// invalidates a child's cache when its parent's child list changes,
    /// but it's only ever read for diagnostics, not selector resolution.
    pub async fn xpath(&self, frame: &Frame) -> String {
        if let Some(cached) = self.cached_xpath().await {
            return cached;
        }

        let mut segments = Vec::new();
        let mut id = self.id;
        let mut name = self.local_name().await;
        let mut parent_id = self.parent().await;

        loop {
            let parent = match parent_id {
                Some(pid) => frame.node(pid).await,
                None => None,
            };
            let index = match &parent {
                Some(parent) => sibling_index(frame, parent, id, &name).await,
                None => 1,
            };
            segments.push(format!("{name}[{index}]"));

            match parent {
                Some(parent) => {
                    id = parent.id;
                    name = parent.local_name().await;
                    parent_id = parent.parent().await;
                }
                None => break,
            }
        }

        segments.reverse();
        let xpath = format!("/{}", segments.join("/"));
        self.cache_xpath(xpath.clone()).await;
        xpath
    }
}

/// 1-based position of `id` among `parent`'s children sharing `local_name`.
async fn sibling_index(frame: &Frame, parent: &Node, id: NodeId, local_name: &str) -> usize {
    let mut count = 0;
    for sibling_id in parent.children().await {
        if sibling_id == id {
            return count + 1;
        }
        if let Some(sibling) = frame.node(sibling_id).await {
            if sibling.local_name().await == local_name {
                count += 1;
            }
        }
    }
    1
}
