//! Keys and type names of the JSON wire format.

pub const TYPE: &str = "type";
pub const NODE: &str = "node";

// Change records
pub const CHANGE_TYPE_ATTACH: &str = "attach";
pub const CHANGE_TYPE_DETACH: &str = "detach";
pub const CHANGE_TYPE_NOOP: &str = "empty";
pub const CHANGE_TYPE_PUT: &str = "put";
pub const CHANGE_TYPE_REMOVE: &str = "remove";
pub const CHANGE_TYPE_SPLICE: &str = "splice";
pub const CHANGE_TYPE_CLEAR: &str = "clear";

pub const CHANGE_FEATURE: &str = "feat";
pub const CHANGE_FEATURE_TYPE: &str = "featType";
pub const CHANGE_MAP_KEY: &str = "key";
pub const CHANGE_PUT_VALUE: &str = "value";
pub const CHANGE_PUT_NODE_VALUE: &str = "nodeValue";
pub const CHANGE_SPLICE_INDEX: &str = "index";
pub const CHANGE_SPLICE_REMOVE: &str = "remove";
pub const CHANGE_SPLICE_ADD: &str = "add";
pub const CHANGE_SPLICE_ADD_NODES: &str = "addNodes";

// RPC records
pub const RPC_TYPE_EVENT: &str = "event";
pub const RPC_TYPE_MAP_SYNC: &str = "mSync";
pub const RPC_TYPE_NAVIGATION: &str = "navigation";
pub const RPC_TYPE_ATTACH_EXISTING_ELEMENT: &str = "attachExistingElement";
pub const RPC_TYPE_ATTACH_EXISTING_ELEMENT_BY_ID: &str = "attachExistingElementById";
pub const RPC_TYPE_PUBLISHED_EVENT_HANDLER: &str = "publishedEventHandler";

pub const RPC_EVENT_TYPE: &str = "event";
pub const RPC_EVENT_DATA: &str = "data";

pub const RPC_FEATURE: &str = "feature";
pub const RPC_PROPERTY: &str = "property";
pub const RPC_PROPERTY_VALUE: &str = "value";

pub const RPC_NAVIGATION_LOCATION: &str = "location";
pub const RPC_NAVIGATION_STATE: &str = "state";
pub const RPC_NAVIGATION_ROUTER_LINK: &str = "link";

pub const RPC_ATTACH_REQUESTED_ID: &str = "attachReqId";
pub const RPC_ATTACH_ASSIGNED_ID: &str = "attachAssignedId";
pub const RPC_ATTACH_TAG_NAME: &str = "attachTagName";
pub const RPC_ATTACH_INDEX: &str = "attachIndex";
pub const RPC_ATTACH_ID: &str = "attachId";

pub const RPC_PUBLISHED_METHOD_NAME: &str = "templateEventMethodName";
pub const RPC_PUBLISHED_METHOD_ARGS: &str = "templateEventMethodArgs";
pub const RPC_PUBLISHED_PROMISE: &str = "promise";

/// Key marking a property-sync value as a reference to a node
pub const NODE_REFERENCE_ID: &str = "nodeId";

/// Wire value for "no node" / "no index" in attach responses
pub const NONE_FOUND: i64 = -1;
