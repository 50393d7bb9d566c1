//! Property tests for span re-basing.

#![allow(missing_docs)]

use playground_compiler::{ParsedAst, Span};
use proptest::prelude::*;
use serde_json::{Value, json};

/// A module whose statements are laid out back to back after `base`.
fn module_tree(base: i64, lengths: &[i64]) -> Value {
    let mut cursor = base;
    let body: Vec<Value> = lengths
        .iter()
        .map(|len| {
            let span = json!({ "start": cursor, "end": cursor + len, "ctxt": 0 });
            cursor += len;
            json!({ "type": "ExpressionStatement", "span": span })
        })
        .collect();
    json!({
        "type": "Module",
        "span": { "start": base, "end": cursor, "ctxt": 0 },
        "body": body,
        "interpreter": null
    })
}

fn spans(tree: &Value) -> Vec<Span> {
    tree["body"]
        .as_array()
        .into_iter()
        .flatten()
        .map(|node| serde_json::from_value(node["span"].clone()).unwrap())
        .collect()
}

proptest! {
    #[test]
    fn root_starts_at_zero(base in 0i64..1_000_000, lengths in prop::collection::vec(0i64..200, 0..20)) {
        let mut ast = ParsedAst::new(module_tree(base, &lengths));
        ast.rebase();

        let total: i64 = lengths.iter().sum();
        prop_assert_eq!(ast.root_span(), Some(Span { start: 0, end: total }));
    }

    #[test]
    fn distances_are_preserved(base in 0i64..1_000_000, lengths in prop::collection::vec(0i64..200, 1..20)) {
        let original = module_tree(base, &lengths);
        let rebased = ParsedAst::new(original.clone()).rebased();

        for (before, after) in spans(&original).iter().zip(spans(&rebased.tree)) {
            prop_assert_eq!(before.len(), after.len());
            prop_assert_eq!(before.start - base, after.start);
        }
    }

    #[test]
    fn rebasing_twice_is_stable(base in 0i64..1_000_000, lengths in prop::collection::vec(0i64..200, 0..20)) {
        let once = ParsedAst::new(module_tree(base, &lengths)).rebased();
        let twice = once.rebased();
        prop_assert_eq!(once, twice);
    }
}
