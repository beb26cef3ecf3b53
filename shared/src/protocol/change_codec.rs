//! JSON codec for change records.
//!
//! A change batch is a JSON array of records; each record is an object
//! holding at least `type` and `node`.

use serde_json::{json, Map, Value};

use crate::{
    protocol::{
        change::{ChangeRecord, SpliceAdd},
        constants::*,
        error::DecodeError,
        json_reader::{record_type, RecordReader},
    },
    tree::{FeatureKind, NodeId, PropertyValue},
};

// ── Serialization ─────────────────────────────────────────────────────────

pub fn to_json(change: &ChangeRecord) -> Value {
    let mut m = Map::new();
    m.insert(TYPE.into(), json!(change.change_type().as_str()));
    m.insert(NODE.into(), json!(change.node().to_u32()));

    match change {
        ChangeRecord::Attach { .. } | ChangeRecord::Detach { .. } => {}
        ChangeRecord::Noop { feature, kind, .. } => {
            m.insert(CHANGE_FEATURE.into(), json!(feature));
            m.insert(CHANGE_FEATURE_TYPE.into(), json!(*kind == FeatureKind::List));
        }
        ChangeRecord::Put {
            feature, key, value, ..
        } => {
            m.insert(CHANGE_FEATURE.into(), json!(feature));
            m.insert(CHANGE_MAP_KEY.into(), json!(key));
            match value {
                PropertyValue::Json(value) => {
                    m.insert(CHANGE_PUT_VALUE.into(), value.clone());
                }
                PropertyValue::Node(node) => {
                    m.insert(CHANGE_PUT_NODE_VALUE.into(), json!(node.to_u32()));
                }
            }
        }
        ChangeRecord::Remove { feature, key, .. } => {
            m.insert(CHANGE_FEATURE.into(), json!(feature));
            m.insert(CHANGE_MAP_KEY.into(), json!(key));
        }
        ChangeRecord::Splice {
            feature,
            index,
            remove,
            add,
            ..
        } => {
            m.insert(CHANGE_FEATURE.into(), json!(feature));
            m.insert(CHANGE_SPLICE_INDEX.into(), json!(index));
            if *remove > 0 {
                m.insert(CHANGE_SPLICE_REMOVE.into(), json!(remove));
            }
            match add {
                SpliceAdd::None => {}
                SpliceAdd::Values(values) => {
                    m.insert(CHANGE_SPLICE_ADD.into(), Value::Array(values.clone()));
                }
                SpliceAdd::Nodes(nodes) => {
                    let ids: Vec<u32> = nodes.iter().map(NodeId::to_u32).collect();
                    m.insert(CHANGE_SPLICE_ADD_NODES.into(), json!(ids));
                }
            }
        }
        ChangeRecord::Clear { feature, .. } => {
            m.insert(CHANGE_FEATURE.into(), json!(feature));
        }
    }

    Value::Object(m)
}

pub fn encode_batch(changes: &[ChangeRecord]) -> Value {
    Value::Array(changes.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

pub fn from_json(json: &Value) -> Result<ChangeRecord, DecodeError> {
    let (type_name, object) = record_type("change", json)?;
    let reader = RecordReader::new(type_name, object);
    let node = reader.node_id(NODE)?;

    match type_name {
        CHANGE_TYPE_ATTACH => Ok(ChangeRecord::Attach { node }),
        CHANGE_TYPE_DETACH => Ok(ChangeRecord::Detach { node }),
        CHANGE_TYPE_NOOP => {
            let kind = if reader.bool_or_default(CHANGE_FEATURE_TYPE)? {
                FeatureKind::List
            } else {
                FeatureKind::Map
            };
            Ok(ChangeRecord::Noop {
                node,
                feature: reader.feature_id(CHANGE_FEATURE)?,
                kind,
            })
        }
        CHANGE_TYPE_PUT => {
            let feature = reader.feature_id(CHANGE_FEATURE)?;
            let key = reader.string(CHANGE_MAP_KEY)?;
            let value = match (reader.has(CHANGE_PUT_VALUE), reader.has(CHANGE_PUT_NODE_VALUE)) {
                (true, true) => return Err(reader.conflict(CHANGE_PUT_VALUE, CHANGE_PUT_NODE_VALUE)),
                (true, false) => PropertyValue::Json(reader.value(CHANGE_PUT_VALUE)?.clone()),
                (false, true) => PropertyValue::Node(reader.node_id(CHANGE_PUT_NODE_VALUE)?),
                (false, false) => {
                    return Err(DecodeError::MissingField {
                        record: type_name.to_string(),
                        field: CHANGE_PUT_VALUE,
                    })
                }
            };
            Ok(ChangeRecord::Put {
                node,
                feature,
                key,
                value,
            })
        }
        CHANGE_TYPE_REMOVE => Ok(ChangeRecord::Remove {
            node,
            feature: reader.feature_id(CHANGE_FEATURE)?,
            key: reader.string(CHANGE_MAP_KEY)?,
        }),
        CHANGE_TYPE_SPLICE => {
            let feature = reader.feature_id(CHANGE_FEATURE)?;
            let index = reader.usize(CHANGE_SPLICE_INDEX)?;
            let remove = if reader.has(CHANGE_SPLICE_REMOVE) {
                reader.usize(CHANGE_SPLICE_REMOVE)?
            } else {
                0
            };
            let add = match (reader.has(CHANGE_SPLICE_ADD), reader.has(CHANGE_SPLICE_ADD_NODES)) {
                (true, true) => return Err(reader.conflict(CHANGE_SPLICE_ADD, CHANGE_SPLICE_ADD_NODES)),
                (true, false) => SpliceAdd::Values(reader.array(CHANGE_SPLICE_ADD)?.clone()),
                (false, true) => {
                    let ids = reader.array(CHANGE_SPLICE_ADD_NODES)?;
                    let nodes = ids
                        .iter()
                        .map(|id| {
                            id.as_u64()
                                .and_then(|id| u32::try_from(id).ok())
                                .map(NodeId::new)
                                .ok_or_else(|| reader.invalid(CHANGE_SPLICE_ADD_NODES, "an array of node ids"))
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    SpliceAdd::Nodes(nodes)
                }
                (false, false) => SpliceAdd::None,
            };
            Ok(ChangeRecord::Splice {
                node,
                feature,
                index,
                remove,
                add,
            })
        }
        CHANGE_TYPE_CLEAR => Ok(ChangeRecord::Clear {
            node,
            feature: reader.feature_id(CHANGE_FEATURE)?,
        }),
        other => Err(DecodeError::UnknownType {
            what: "change",
            type_name: other.to_string(),
        }),
    }
}

pub fn decode_batch(json: &Value) -> Result<Vec<ChangeRecord>, DecodeError> {
    json.as_array()
        .ok_or(DecodeError::NotAnArray {
            what: "change batch",
        })?
        .iter()
        .map(from_json)
        .collect()
}
