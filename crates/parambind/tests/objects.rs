mod common;

use common::{bind_fresh, resolve_with, scene};
use parambind::{Declaration, ParamError, ParameterStore, SerializerRegistry, TypeDesc, Value};
use pretty_assertions::assert_eq;

fn node_declaration() -> Declaration {
    Declaration::new()
        .attr("inputs", TypeDesc::list(TypeDesc::object("ModelNode")))
        .attr("output", TypeDesc::object("ModelNode"))
        .attr("any_node", TypeDesc::object("Node"))
}

#[test]
fn test_node_list_and_output() {
    let host = scene();
    let registry = SerializerRegistry::new().with_host(host.clone());
    let schema = resolve_with(node_declaration(), &registry);
    let (store, params) = bind_fresh(&schema);

    assert_eq!(params.get("output").unwrap(), Value::None);
    assert_eq!(params.list("inputs").unwrap().len().unwrap(), 0);

    let first = host.add_object("ModelNode");
    let second = host.add_object("ModelNode");
    let inputs = params.list("inputs").unwrap();
    inputs.append(first.clone()).unwrap();
    inputs.append(second.clone()).unwrap();
    params.set("output", first.clone()).unwrap();

    assert_eq!(
        params.get("inputs").unwrap(),
        Value::List(vec![Value::Object(first.clone()), Value::Object(second)])
    );
    assert_eq!(params.get("output").unwrap(), Value::Object(first.clone()));
    assert_eq!(store.get_entry("output"), Some(first.id().to_string()));

    let rebound = schema.bind(store, "");
    assert_eq!(rebound.get("output").unwrap(), Value::Object(first));
    assert_eq!(rebound.list("inputs").unwrap().len().unwrap(), 2);
}

#[test]
fn test_incompatible_kind_is_rejected() {
    let host = scene();
    let registry = SerializerRegistry::new().with_host(host.clone());
    let schema = resolve_with(node_declaration(), &registry);
    let (store, params) = bind_fresh(&schema);
    let volume = host.add_object("VolumeNode");

    assert!(matches!(
        params.set("output", volume.clone()),
        Err(ParamError::InvalidValue(_))
    ));
    assert!(matches!(
        params.list("inputs").unwrap().append(volume),
        Err(ParamError::InvalidValue(_))
    ));
    assert!(matches!(params.set("output", 3), Err(ParamError::InvalidValue(_))));
    assert!(!store.has_entry("output"));
}

#[test]
fn test_none_round_trips() {
    let host = scene();
    let registry = SerializerRegistry::new().with_host(host.clone());
    let schema = resolve_with(node_declaration(), &registry);
    let (_, params) = bind_fresh(&schema);

    let model = host.add_object("ModelNode");
    params.set("output", model).unwrap();
    params.set("output", Value::None).unwrap();
    assert_eq!(params.get("output").unwrap(), Value::None);
}

#[test]
fn test_base_kind_accepts_subkinds() {
    let host = scene();
    let registry = SerializerRegistry::new().with_host(host.clone());
    let schema = resolve_with(node_declaration(), &registry);
    let (_, params) = bind_fresh(&schema);

    let model = host.add_object("ModelNode");
    let volume = host.add_object("VolumeNode");
    params.set("any_node", model.clone()).unwrap();
    assert_eq!(params.get("any_node").unwrap(), Value::Object(model));
    params.set("any_node", volume.clone()).unwrap();
    assert_eq!(params.get("any_node").unwrap(), Value::Object(volume));
    assert!(matches!(params.set("any_node", 1), Err(ParamError::InvalidValue(_))));
}

#[test]
fn test_removed_object_reads_as_none() {
    let host = scene();
    let registry = SerializerRegistry::new().with_host(host.clone());
    let schema = resolve_with(node_declaration(), &registry);
    let (_, params) = bind_fresh(&schema);

    let model = host.add_object("ModelNode");
    params.set("output", model.clone()).unwrap();
    assert!(host.remove_object(&model));
    assert_eq!(params.get("output").unwrap(), Value::None);
}

#[test]
fn test_object_references_are_never_cached() {
    let host = scene();
    let registry = SerializerRegistry::new().with_host(host);
    let schema = resolve_with(node_declaration(), &registry);
    let (_, params) = bind_fresh(&schema);

    assert!(!params.is_cached("output").unwrap());
    assert!(!params.is_cached("any_node").unwrap());
    assert!(!params.is_cached("inputs").unwrap());
}

#[test]
fn test_object_type_without_host_fails_to_resolve() {
    let declaration = Declaration::new().attr("output", TypeDesc::object("ModelNode"));
    let result = parambind::Schema::resolve(
        &declaration,
        &SerializerRegistry::new(),
        parambind::BindConfig::default(),
    );
    assert!(matches!(result, Err(ParamError::Bind(_))));
}
