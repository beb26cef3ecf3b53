//! JSON codec for client RPC records.

use serde_json::{json, Map, Value};

use crate::{
    protocol::{
        constants::*,
        error::DecodeError,
        json_reader::{record_type, RecordReader},
        rpc::{AttachResponse, NavigationTrigger, RpcCommand, RpcInvocation},
    },
    tree::NodeId,
};

// ── Serialization ─────────────────────────────────────────────────────────

pub fn to_json(invocation: &RpcInvocation) -> Value {
    let mut m = Map::new();
    m.insert(TYPE.into(), json!(invocation.type_name()));
    m.insert(NODE.into(), json!(invocation.node.to_u32()));

    match &invocation.command {
        RpcCommand::Event { event_type, data } => {
            m.insert(RPC_EVENT_TYPE.into(), json!(event_type));
            if let Some(data) = data {
                m.insert(RPC_EVENT_DATA.into(), Value::Object(data.clone()));
            }
        }
        RpcCommand::MapSync {
            feature,
            property,
            value,
        } => {
            m.insert(RPC_FEATURE.into(), json!(feature));
            m.insert(RPC_PROPERTY.into(), json!(property));
            m.insert(RPC_PROPERTY_VALUE.into(), value.clone());
        }
        RpcCommand::Navigation {
            location,
            state,
            trigger,
        } => {
            m.insert(RPC_NAVIGATION_LOCATION.into(), json!(location));
            if let Some(state) = state {
                m.insert(RPC_NAVIGATION_STATE.into(), state.clone());
            }
            if *trigger == NavigationTrigger::Link {
                m.insert(RPC_NAVIGATION_ROUTER_LINK.into(), json!(true));
            }
        }
        RpcCommand::AttachExistingElement(response) => {
            write_attach_response(&mut m, response);
        }
        RpcCommand::AttachExistingElementById(response) => {
            write_attach_response(&mut m, response);
            if let Some(id) = &response.id {
                m.insert(RPC_ATTACH_ID.into(), json!(id));
            }
        }
        RpcCommand::PublishedEventHandler {
            method,
            args,
            promise,
        } => {
            m.insert(RPC_PUBLISHED_METHOD_NAME.into(), json!(method));
            m.insert(RPC_PUBLISHED_METHOD_ARGS.into(), Value::Array(args.clone()));
            if let Some(promise) = promise {
                m.insert(RPC_PUBLISHED_PROMISE.into(), json!(promise));
            }
        }
    }

    Value::Object(m)
}

fn write_attach_response(m: &mut Map<String, Value>, response: &AttachResponse) {
    m.insert(RPC_ATTACH_REQUESTED_ID.into(), json!(response.requested.to_u32()));
    m.insert(
        RPC_ATTACH_ASSIGNED_ID.into(),
        response
            .assigned
            .map_or(json!(NONE_FOUND), |id| json!(id.to_u32())),
    );
    m.insert(RPC_ATTACH_TAG_NAME.into(), json!(response.tag));
    m.insert(
        RPC_ATTACH_INDEX.into(),
        response.index.map_or(json!(NONE_FOUND), |index| json!(index)),
    );
}

pub fn encode_batch(invocations: &[RpcInvocation]) -> Value {
    Value::Array(invocations.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

pub fn from_json(json: &Value) -> Result<RpcInvocation, DecodeError> {
    let (type_name, object) = record_type("rpc", json)?;
    let reader = RecordReader::new(type_name, object);
    let node = reader.node_id(NODE)?;

    let command = match type_name {
        RPC_TYPE_EVENT => {
            let data = match reader.opt_value(RPC_EVENT_DATA) {
                None | Some(Value::Null) => None,
                Some(Value::Object(data)) => Some(data.clone()),
                Some(_) => return Err(reader.invalid(RPC_EVENT_DATA, "an object")),
            };
            RpcCommand::Event {
                event_type: reader.string(RPC_EVENT_TYPE)?,
                data,
            }
        }
        RPC_TYPE_MAP_SYNC => RpcCommand::MapSync {
            feature: reader.feature_id(RPC_FEATURE)?,
            property: reader.string(RPC_PROPERTY)?,
            value: reader.value(RPC_PROPERTY_VALUE)?.clone(),
        },
        RPC_TYPE_NAVIGATION => RpcCommand::Navigation {
            location: reader.string(RPC_NAVIGATION_LOCATION)?,
            state: reader
                .opt_value(RPC_NAVIGATION_STATE)
                .filter(|state| !state.is_null())
                .cloned(),
            trigger: if reader.bool_or_default(RPC_NAVIGATION_ROUTER_LINK)? {
                NavigationTrigger::Link
            } else {
                NavigationTrigger::History
            },
        },
        RPC_TYPE_ATTACH_EXISTING_ELEMENT => {
            RpcCommand::AttachExistingElement(read_attach_response(&reader, None)?)
        }
        RPC_TYPE_ATTACH_EXISTING_ELEMENT_BY_ID => {
            let id = reader.string(RPC_ATTACH_ID)?;
            RpcCommand::AttachExistingElementById(read_attach_response(&reader, Some(id))?)
        }
        RPC_TYPE_PUBLISHED_EVENT_HANDLER => {
            let args = match reader.opt_value(RPC_PUBLISHED_METHOD_ARGS) {
                None | Some(Value::Null) => Vec::new(),
                Some(_) => reader.array(RPC_PUBLISHED_METHOD_ARGS)?.clone(),
            };
            let promise = if reader.has(RPC_PUBLISHED_PROMISE) {
                let promise = reader.integer(RPC_PUBLISHED_PROMISE)?;
                Some(
                    u32::try_from(promise)
                        .map_err(|_| reader.invalid(RPC_PUBLISHED_PROMISE, "a promise id"))?,
                )
            } else {
                None
            };
            RpcCommand::PublishedEventHandler {
                method: reader.string(RPC_PUBLISHED_METHOD_NAME)?,
                args,
                promise,
            }
        }
        other => {
            return Err(DecodeError::UnknownType {
                what: "rpc",
                type_name: other.to_string(),
            })
        }
    };

    Ok(RpcInvocation {
        node,
        command,
        keys: object.keys().cloned().collect(),
    })
}

fn read_attach_response(
    reader: &RecordReader<'_>,
    id: Option<String>,
) -> Result<AttachResponse, DecodeError> {
    let requested = reader.node_id(RPC_ATTACH_REQUESTED_ID)?;
    let assigned = match reader.integer(RPC_ATTACH_ASSIGNED_ID)? {
        NONE_FOUND => None,
        _ => Some(reader.node_id(RPC_ATTACH_ASSIGNED_ID)?),
    };
    let index = if reader.has(RPC_ATTACH_INDEX) {
        match reader.integer(RPC_ATTACH_INDEX)? {
            NONE_FOUND => None,
            _ => Some(reader.usize(RPC_ATTACH_INDEX)?),
        }
    } else {
        None
    };
    Ok(AttachResponse {
        requested,
        assigned,
        tag: reader.string(RPC_ATTACH_TAG_NAME)?,
        index,
        id,
    })
}

pub fn decode_batch(json: &Value) -> Result<Vec<RpcInvocation>, DecodeError> {
    json.as_array()
        .ok_or(DecodeError::NotAnArray { what: "rpc batch" })?
        .iter()
        .map(from_json)
        .collect()
}

/// Reads a `{ "nodeId": n }` reference out of a synced property value
pub fn node_reference(value: &Value) -> Option<NodeId> {
    let object = value.as_object()?;
    let id = object.get(NODE_REFERENCE_ID)?.as_f64()?;
    if id.fract() != 0.0 || id < 0.0 || id > f64::from(u32::MAX) {
        return None;
    }
    Some(NodeId::new(id as u32))
}
