use serde::{Deserialize, Serialize};

use crate::cdp::{impl_command, impl_method, NoResult};
use crate::ids::NodeId;

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnableParams {}
impl_command!(EnableParams, "DOM.enable", NoResult);

/// The wire shape of a DOM node as returned by `getDocument` /
/// `setChildNodes` / `childNodeInserted`. Attributes arrive as a flat
/// `[name, value, name, value, ...]` array (real CDP wire shape).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub node_id: NodeId,
    pub parent_id: Option<NodeId>,
    pub node_type: i64,
    pub node_name: String,
    pub local_name: String,
    #[serde(default)]
    pub node_value: String,
    #[serde(default)]
    pub child_node_count: i64,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDocumentParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pierce: Option<bool>,
}

impl GetDocumentParams {
    pub fn full_subtree() -> Self {
        Self { depth: Some(-1), pierce: Some(true) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetDocumentResult {
    pub root: Node,
}
impl_command!(GetDocumentParams, "DOM.getDocument", GetDocumentResult);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySelectorParams {
    pub node_id: NodeId,
    pub selector: String,
}

impl QuerySelectorParams {
    pub fn new(node_id: NodeId, selector: impl Into<String>) -> Self {
        Self { node_id, selector: selector.into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySelectorResult {
    pub node_id: NodeId,
}
impl_command!(QuerySelectorParams, "DOM.querySelector", QuerySelectorResult);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySelectorAllParams {
    pub node_id: NodeId,
    pub selector: String,
}

impl QuerySelectorAllParams {
    pub fn new(node_id: NodeId, selector: impl Into<String>) -> Self {
        Self { node_id, selector: selector.into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySelectorAllResult {
    pub node_ids: Vec<NodeId>,
}
impl_command!(
    QuerySelectorAllParams,
    "DOM.querySelectorAll",
    QuerySelectorAllResult
);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformSearchParams {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_user_agent_shadow_dom: Option<bool>,
}

impl PerformSearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), include_user_agent_shadow_dom: Some(true) }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformSearchResult {
    pub search_id: String,
    pub result_count: i64,
}
impl_command!(PerformSearchParams, "DOM.performSearch", PerformSearchResult);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSearchResultsParams {
    pub search_id: String,
    pub from_index: i64,
    pub to_index: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSearchResultsResult {
    pub node_ids: Vec<NodeId>,
}
impl_command!(
    GetSearchResultsParams,
    "DOM.getSearchResults",
    GetSearchResultsResult
);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscardSearchResultsParams {
    pub search_id: String,
}
impl_command!(
    DiscardSearchResultsParams,
    "DOM.discardSearchResults",
    NoResult
);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestChildNodesParams {
    pub node_id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pierce: Option<bool>,
}

impl RequestChildNodesParams {
    pub fn new(node_id: NodeId) -> Self {
        Self { node_id, depth: Some(1), pierce: Some(true) }
    }
}
impl_command!(RequestChildNodesParams, "DOM.requestChildNodes", NoResult);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestNodeParams {
    pub object_id: String,
}

impl RequestNodeParams {
    pub fn new(object_id: impl Into<String>) -> Self {
        Self { object_id: object_id.into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestNodeResult {
    pub node_id: NodeId,
}
impl_command!(RequestNodeParams, "DOM.requestNode", RequestNodeResult);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBoxModelParams {
    pub node_id: NodeId,
}

impl GetBoxModelParams {
    pub fn new(node_id: NodeId) -> Self {
        Self { node_id }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetBoxModelResult {
    pub model: BoxModel,
}
impl_command!(GetBoxModelParams, "DOM.getBoxModel", GetBoxModelResult);

/// The four content/padding/border/margin quads CDP returns; flattened
/// `[x1,y1,x2,y2,x3,y3,x4,y4]` arrays, width/height in CSS pixels.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxModel {
    pub content: Vec<f64>,
    pub padding: Vec<f64>,
    pub border: Vec<f64>,
    pub margin: Vec<f64>,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollIntoViewIfNeededParams {
    pub node_id: NodeId,
}

impl ScrollIntoViewIfNeededParams {
    pub fn new(node_id: NodeId) -> Self {
        Self { node_id }
    }
}
impl_command!(
    ScrollIntoViewIfNeededParams,
    "DOM.scrollIntoViewIfNeeded",
    NoResult
);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusParams {
    pub node_id: NodeId,
}

impl FocusParams {
    pub fn new(node_id: NodeId) -> Self {
        Self { node_id }
    }
}
impl_command!(FocusParams, "DOM.focus", NoResult);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveNodeParams {
    pub node_id: NodeId,
}

impl ResolveNodeParams {
    pub fn new(node_id: NodeId) -> Self {
        Self { node_id }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveNodeResult {
    pub object: crate::cdp::runtime::RemoteObject,
}
impl_command!(ResolveNodeParams, "DOM.resolveNode", ResolveNodeResult);

/// `documentUpdated` — the whole document was invalidated (§4.4).
#[derive(Debug, Clone, Deserialize)]
pub struct EventDocumentUpdated {}
impl_method!(EventDocumentUpdated, "DOM.documentUpdated");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSetChildNodes {
    pub parent_id: NodeId,
    pub nodes: Vec<Node>,
}
impl_method!(EventSetChildNodes, "DOM.setChildNodes");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttributeModified {
    pub node_id: NodeId,
    pub name: String,
    pub value: String,
}
impl_method!(EventAttributeModified, "DOM.attributeModified");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttributeRemoved {
    pub node_id: NodeId,
    pub name: String,
}
impl_method!(EventAttributeRemoved, "DOM.attributeRemoved");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCharacterDataModified {
    pub node_id: NodeId,
    pub character_data: String,
}
impl_method!(EventCharacterDataModified, "DOM.characterDataModified");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventChildNodeCountUpdated {
    pub node_id: NodeId,
    pub child_node_count: i64,
}
impl_method!(EventChildNodeCountUpdated, "DOM.childNodeCountUpdated");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventChildNodeInserted {
    pub parent_node_id: NodeId,
    pub previous_node_id: NodeId,
    pub node: Node,
}
impl_method!(EventChildNodeInserted, "DOM.childNodeInserted");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventChildNodeRemoved {
    pub parent_node_id: NodeId,
    pub node_id: NodeId,
}
impl_method!(EventChildNodeRemoved, "DOM.childNodeRemoved");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventShadowRootPushed {
    pub host_id: NodeId,
    pub root: Node,
}
impl_method!(EventShadowRootPushed, "DOM.shadowRootPushed");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventShadowRootPopped {
    pub host_id: NodeId,
    pub root_id: NodeId,
}
impl_method!(EventShadowRootPopped, "DOM.shadowRootPopped");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPseudoElementAdded {
    pub parent_id: NodeId,
    pub pseudo_element: Node,
}
impl_method!(EventPseudoElementAdded, "DOM.pseudoElementAdded");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPseudoElementRemoved {
    pub parent_id: NodeId,
    pub pseudo_element_id: NodeId,
}
impl_method!(EventPseudoElementRemoved, "DOM.pseudoElementRemoved");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDistributedNodesUpdated {
    pub insertion_point_id: NodeId,
    #[serde(default)]
    pub distributed_nodes: Vec<Node>,
}
impl_method!(
    EventDistributedNodesUpdated,
    "DOM.distributedNodesUpdated"
);

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInlineStyleInvalidated {
    #[serde(default)]
    pub node_ids: Vec<NodeId>,
}
impl_method!(EventInlineStyleInvalidated, "DOM.inlineStyleInvalidated");
