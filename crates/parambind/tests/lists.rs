mod common;

use common::{bind_fresh, event_counter, resolve};
use parambind::validators::Choice;
use parambind::{Declaration, ParamError, ParameterStore, TypeDesc, Value};
use pretty_assertions::assert_eq;

fn ints(values: &[i64]) -> Value {
    Value::List(values.iter().copied().map(Value::Int).collect())
}

#[test]
fn test_list_int() {
    let schema = resolve(Declaration::new().attr("p", TypeDesc::list(TypeDesc::Int)));
    let (store, params) = bind_fresh(&schema);
    assert!(params.is_cached("p").unwrap());

    let p = params.list("p").unwrap();
    assert_eq!(p.len().unwrap(), 0);

    p.append(4).unwrap();
    p.append(1).unwrap();
    p.append(7).unwrap();
    assert_eq!(params.get("p").unwrap(), ints(&[4, 1, 7]));

    assert!(matches!(p.append("hi"), Err(ParamError::InvalidValue(_))));
    assert_eq!(params.get("p").unwrap(), ints(&[4, 1, 7]));

    p.reverse().unwrap();
    assert_eq!(params.get("p").unwrap(), ints(&[7, 1, 4]));

    p.sort().unwrap();
    assert_eq!(params.get("p").unwrap(), ints(&[1, 4, 7]));

    assert_eq!(p.pop(1).unwrap(), Value::Int(4));
    assert_eq!(params.get("p").unwrap(), ints(&[1, 7]));

    p.remove(&Value::Int(7)).unwrap();
    assert_eq!(params.get("p").unwrap(), ints(&[1]));

    assert!(matches!(p.remove(&Value::Int(44)), Err(ParamError::NotFound(_))));
    assert_eq!(params.get("p").unwrap(), ints(&[1]));

    p.concat_in_place(vec![3, 4, 5]).unwrap();
    assert_eq!(params.get("p").unwrap(), ints(&[1, 3, 4, 5]));

    p.repeat_in_place(2).unwrap();
    assert_eq!(params.get("p").unwrap(), ints(&[1, 3, 4, 5, 1, 3, 4, 5]));

    p.delete(2).unwrap();
    assert_eq!(params.get("p").unwrap(), ints(&[1, 3, 5, 1, 3, 4, 5]));

    p.insert(4, 66).unwrap();
    assert_eq!(params.get("p").unwrap(), ints(&[1, 3, 5, 1, 66, 3, 4, 5]));

    p.clear().unwrap();
    assert_eq!(params.get("p").unwrap(), ints(&[]));

    p.extend(vec![2, 3, 4]).unwrap();
    assert_eq!(params.get("p").unwrap(), ints(&[2, 3, 4]));

    p.set(0, 7).unwrap();
    assert_eq!(params.get("p").unwrap(), ints(&[7, 3, 4]));
    assert_eq!(p.get(0).unwrap(), Value::Int(7));
    assert_eq!(p.get(1).unwrap(), Value::Int(3));
    assert_eq!(p.get(2).unwrap(), Value::Int(4));

    assert!(matches!(&p + vec![4], Err(ParamError::Unsupported(_))));
    assert!(matches!(vec![Value::Int(4)] + &p, Err(ParamError::Unsupported(_))));
    assert!(matches!(&p * 2, Err(ParamError::Unsupported(_))));
    assert!(matches!(2usize * &p, Err(ParamError::Unsupported(_))));

    p.concat_in_place(vec![4, 5, 6]).unwrap();
    assert_eq!(params.get("p").unwrap(), ints(&[7, 3, 4, 4, 5, 6]));

    // Whole-value assignment; the existing proxy keeps tracking the attribute.
    params.set("p", vec![5, 1, 2]).unwrap();
    assert_eq!(p.to_vec().unwrap(), vec![Value::Int(5), Value::Int(1), Value::Int(2)]);

    let second = schema.bind(store.clone(), "");
    assert_eq!(second.get("p").unwrap(), ints(&[5, 1, 2]));

    let mut detached = p.to_vec().unwrap();
    detached.push(Value::Int(1));
    assert_eq!(detached.len(), 4);
    assert_eq!(params.get("p").unwrap(), ints(&[5, 1, 2]));
    assert_eq!(store.get_entry("p"), Some(r#"["5","1","2"]"#.to_string()));
}

#[test]
fn test_list_of_annotated() {
    let choices = TypeDesc::list(TypeDesc::Str.annotated(Choice::new(["yes", "no", "maybe"])));
    let schema = resolve(Declaration::new().attr("choices", choices));
    let (_, params) = bind_fresh(&schema);
    assert!(params.is_cached("choices").unwrap());

    let list = params.list("choices").unwrap();
    list.append("yes").unwrap();
    assert_eq!(params.get("choices").unwrap(), Value::from(vec!["yes"]));

    assert!(matches!(list.append("invalid"), Err(ParamError::InvalidValue(_))));
    assert_eq!(params.get("choices").unwrap(), Value::from(vec!["yes"]));

    assert!(list.concat_in_place(vec!["no", "invalid"]).is_err());
    assert_eq!(params.get("choices").unwrap(), Value::from(vec!["yes"]));

    list.extend(vec!["maybe", "no"]).unwrap();
    assert_eq!(params.get("choices").unwrap(), Value::from(vec!["yes", "maybe", "no"]));
}

#[test]
fn test_batch_rejection_is_atomic() {
    let choices = TypeDesc::list(TypeDesc::Str.annotated(Choice::new(["a", "b", "c"])));
    let schema = resolve(Declaration::new().attr("letters", choices));
    let (store, params) = bind_fresh(&schema);
    let list = params.list("letters").unwrap();
    list.append("c").unwrap();
    let calls = event_counter(&params);
    let before = store.get_entry("letters");

    assert!(matches!(list.extend(vec!["a", "z"]), Err(ParamError::InvalidValue(_))));
    assert_eq!(store.get_entry("letters"), before);
    assert_eq!(list.to_vec().unwrap(), vec![Value::from("c")]);
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_list_of_lists() {
    let schema = resolve(Declaration::new().attr("p", TypeDesc::list(TypeDesc::list(TypeDesc::Int))));
    let (store, params) = bind_fresh(&schema);
    assert!(params.is_cached("p").unwrap());

    let pl = params.list("p").unwrap();
    pl.append(Value::List(Vec::new())).unwrap();
    pl.set(0, vec![1, 2, 3]).unwrap();
    pl.append(vec![4, 5, 6]).unwrap();
    pl.sublist(1).unwrap().append(7).unwrap();
    pl.sublist(1).unwrap().set(2, 0).unwrap();
    assert_eq!(
        params.get("p").unwrap(),
        Value::List(vec![ints(&[1, 2, 3]), ints(&[4, 5, 0, 7])])
    );

    pl.delete(0).unwrap();
    assert_eq!(params.get("p").unwrap(), Value::List(vec![ints(&[4, 5, 0, 7])]));

    pl.insert(0, vec![6, 7]).unwrap();
    assert_eq!(
        params.get("p").unwrap(),
        Value::List(vec![ints(&[6, 7]), ints(&[4, 5, 0, 7])])
    );

    pl.pop(0).unwrap();
    let second = schema.bind(store, "");
    assert_eq!(second.get("p").unwrap(), Value::List(vec![ints(&[4, 5, 0, 7])]));

    assert!(matches!(pl.append(vec!["x"]), Err(ParamError::InvalidValue(_))));
    assert!(matches!(pl.sublist(0).unwrap().append(1.5), Err(ParamError::InvalidValue(_))));
}

#[test]
fn test_deeply_nested_lists() {
    let ty = TypeDesc::list(TypeDesc::list(TypeDesc::list(TypeDesc::Str)));
    let schema = resolve(Declaration::new().attr("cube", ty));
    let (_, params) = bind_fresh(&schema);
    let cube = params.list("cube").unwrap();

    cube.append(Value::List(vec![Value::List(Vec::new())])).unwrap();
    let innermost = cube.sublist(0).unwrap().sublist(0).unwrap();
    innermost.extend(vec!["a", "b"]).unwrap();
    assert_eq!(innermost.path(), &[0, 0]);

    assert_eq!(
        params.get("cube").unwrap(),
        Value::List(vec![Value::List(vec![Value::from(vec!["a", "b"])])])
    );
}

#[test]
fn test_collection_round_trip_detaches() {
    let schema = resolve(Declaration::new().attr("p", TypeDesc::list(TypeDesc::Float)));
    let (_, params) = bind_fresh(&schema);
    let p = params.list("p").unwrap();
    p.extend(vec![0.5, 1.5, 2.5]).unwrap();

    let mut copy = p.to_vec().unwrap();
    assert_eq!(copy, vec![Value::Float(0.5), Value::Float(1.5), Value::Float(2.5)]);

    copy.clear();
    assert_eq!(p.len().unwrap(), 3);
    p.clear().unwrap();
    assert_eq!(copy.len(), 0);
    assert!(params.get("p").unwrap().as_list().is_some_and(|items| items.is_empty()));
}
