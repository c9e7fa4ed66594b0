#![allow(dead_code)]

use parambind::{
    BindConfig, BoundInstance, Declaration, MemoryHost, MemoryStore, Schema, SerializerRegistry,
};
use std::cell::Cell;
use std::rc::Rc;

pub fn resolve(declaration: Declaration) -> Schema {
    resolve_with(declaration, &SerializerRegistry::new())
}

pub fn resolve_with(declaration: Declaration, registry: &SerializerRegistry) -> Schema {
    Schema::resolve(&declaration, registry, BindConfig::default()).unwrap()
}

/// Bind `schema` to a fresh store with no prefix.
pub fn bind_fresh(schema: &Schema) -> (Rc<MemoryStore>, BoundInstance) {
    let store = Rc::new(MemoryStore::new());
    let instance = schema.bind(store.clone(), "");
    (store, instance)
}

pub fn event_counter(instance: &BoundInstance) -> Rc<Cell<usize>> {
    let calls = Rc::new(Cell::new(0));
    let seen = calls.clone();
    instance.subscribe(move |_| seen.set(seen.get() + 1));
    calls
}

/// Host with a small node hierarchy: `Node` <- `ModelNode`, `Node` <- `VolumeNode`.
pub fn scene() -> Rc<MemoryHost> {
    let host = Rc::new(MemoryHost::new());
    host.register_kind("Node", None);
    host.register_kind("ModelNode", Some("Node"));
    host.register_kind("VolumeNode", Some("Node"));
    host
}
