use proptest::prelude::*;
use serde_json::{json, Value};

use treesync_shared::NodeId;
use treesync_test::{ChangeBatchBuilder, TestClient};

const LIST: u8 = 9;

/// One splice, with index and removal count scaled into the list's bounds
#[derive(Clone, Debug)]
struct SpliceOp {
    index: u16,
    remove: u16,
    insert: Vec<i32>,
}

fn splice_op() -> impl Strategy<Value = SpliceOp> {
    (any::<u16>(), any::<u16>(), prop::collection::vec(any::<i32>(), 0..4))
        .prop_map(|(index, remove, insert)| SpliceOp { index, remove, insert })
}

proptest! {
    #[test]
    fn splice_batches_match_vec_model(ops in prop::collection::vec(splice_op(), 1..20)) {
        let mut client = TestClient::new();
        let mut model: Vec<Value> = Vec::new();

        for op in ops {
            let index = usize::from(op.index) % (model.len() + 1);
            let remove = usize::from(op.remove) % (model.len() - index + 1);
            let insert: Vec<Value> = op.insert.iter().map(|value| json!(value)).collect();

            model.splice(index..index + remove, insert.clone());
            let batch = if insert.is_empty() {
                ChangeBatchBuilder::new().splice_remove(1, LIST, index, remove)
            } else {
                ChangeBatchBuilder::new().splice_values(1, LIST, index, remove, insert)
            };
            let touched = client.receive(&batch.to_json());
            prop_assert!(touched.contains(&NodeId::ROOT));
        }

        let mirrored: Vec<Value> = client
            .tree()
            .root()
            .list(LIST)
            .map(|list| list.iter().filter_map(|item| item.as_value().cloned()).collect())
            .unwrap_or_default();
        prop_assert_eq!(mirrored, model);
    }
}
