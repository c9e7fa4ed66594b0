//! Property-based tests for store round trips.
//!
//! Any value accepted by a write reads back unchanged, both through the writing
//! instance (possibly from cache) and through a fresh instance over the same
//! store (always decoded).

mod common;

use common::{bind_fresh, resolve};
use parambind::{Declaration, TypeDesc, Value};
use proptest::prelude::*;
use std::path::PathBuf;

fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 _,\\[\\]\"'-]{0,40}").unwrap()
}

fn declaration() -> Declaration {
    Declaration::new()
        .attr("i", TypeDesc::Int)
        .attr("f", TypeDesc::Float)
        .attr("b", TypeDesc::Bool)
        .attr("s", TypeDesc::Str)
        .attr("p", TypeDesc::Path)
        .attr("ints", TypeDesc::list(TypeDesc::Int))
        .attr("words", TypeDesc::list(TypeDesc::Str))
}

proptest! {
    #[test]
    fn scalars_round_trip(
        i in any::<i64>(),
        f in -1.0e12f64..1.0e12,
        b in any::<bool>(),
        s in text_strategy(),
        p in "[a-z]{1,8}(/[a-z]{1,8}){0,3}",
    ) {
        let schema = resolve(declaration());
        let (store, params) = bind_fresh(&schema);

        params.set("i", i).unwrap();
        params.set("f", f).unwrap();
        params.set("b", b).unwrap();
        params.set("s", s.clone()).unwrap();
        params.set("p", PathBuf::from(&p)).unwrap();

        let fresh = schema.bind(store, "");
        for instance in [&params, &fresh] {
            prop_assert_eq!(instance.get("i").unwrap(), Value::Int(i));
            prop_assert_eq!(instance.get("f").unwrap(), Value::Float(f));
            prop_assert_eq!(instance.get("b").unwrap(), Value::Bool(b));
            prop_assert_eq!(instance.get("s").unwrap(), Value::Str(s.clone()));
            prop_assert_eq!(instance.get("p").unwrap(), Value::Path(PathBuf::from(&p)));
        }
    }

    #[test]
    fn lists_round_trip(
        ints in prop::collection::vec(any::<i64>(), 0..20),
        words in prop::collection::vec(text_strategy(), 0..10),
    ) {
        let schema = resolve(declaration());
        let (store, params) = bind_fresh(&schema);

        params.set("ints", ints.clone()).unwrap();
        params.list("words").unwrap().extend(words.clone()).unwrap();

        let fresh = schema.bind(store, "");
        prop_assert_eq!(fresh.get("ints").unwrap(), Value::from(ints.clone()));
        prop_assert_eq!(fresh.get("words").unwrap(), Value::from(words.clone()));
        prop_assert_eq!(params.list("ints").unwrap().len().unwrap(), ints.len());
    }

    #[test]
    fn proxy_appends_match_vec_pushes(
        items in prop::collection::vec(-1000i64..1000, 0..30),
    ) {
        let schema = resolve(declaration());
        let (_, params) = bind_fresh(&schema);
        let list = params.list("ints").unwrap();

        let mut expected = Vec::new();
        for item in &items {
            list.append(*item).unwrap();
            expected.push(Value::Int(*item));
        }
        list.reverse().unwrap();
        expected.reverse();
        prop_assert_eq!(list.to_vec().unwrap(), expected);
    }
}
