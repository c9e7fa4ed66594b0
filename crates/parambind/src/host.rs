//! # Host Object Model
//!
//! Object-reference attributes point at objects owned by an external host model
//! (a scene graph, a document tree). The store never holds the object itself,
//! only an opaque handle that the host resolves back on every read.
//!
//! - [`HostModel`]: the collaborator interface (handle lookup, kind checks)
//! - [`ObjectRef`]: a cheap, identity-compared reference to a live host object
//! - [`MemoryHost`]: in-memory host with a single-inheritance kind hierarchy,
//!   used by tests and by callers that have no host of their own

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// An object owned by the host model.
pub trait HostObject: fmt::Debug {
    /// Stable identifier, unique within the host.
    fn id(&self) -> &str;

    /// Concrete kind name (e.g. `"ModelNode"`).
    fn kind(&self) -> &str;
}

/// Shared reference to a host object. Equality is identity.
#[derive(Clone)]
pub struct ObjectRef(Rc<dyn HostObject>);

impl ObjectRef {
    pub fn new(object: Rc<dyn HostObject>) -> Self {
        ObjectRef(object)
    }

    pub fn id(&self) -> &str {
        self.0.id()
    }

    pub fn kind(&self) -> &str {
        self.0.kind()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({}#{})", self.kind(), self.id())
    }
}

/// Interface to the external host model.
pub trait HostModel {
    /// Resolve a stored handle to a live object, or `None` if it no longer exists.
    fn resolve_handle(&self, handle: &str) -> Option<ObjectRef>;

    /// Handle under which `object` can be resolved later.
    /// `None` if the object is not owned by this host.
    fn handle_for(&self, object: &ObjectRef) -> Option<String>;

    /// Whether `object` can be used where `kind` is declared.
    fn is_kind_compatible(&self, object: &ObjectRef, kind: &str) -> bool;
}

#[derive(Debug)]
struct MemoryObject {
    id: String,
    kind: String,
}

impl HostObject for MemoryObject {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        &self.kind
    }
}

/// In-memory host model.
///
/// Kinds form a single-inheritance tree registered with [`MemoryHost::register_kind`];
/// an object is compatible with its own kind and every ancestor.
#[derive(Default)]
pub struct MemoryHost {
    parents: RefCell<HashMap<String, Option<String>>>,
    objects: RefCell<HashMap<String, ObjectRef>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `kind`, optionally deriving from `parent`.
    pub fn register_kind(&self, kind: &str, parent: Option<&str>) {
        self.parents
            .borrow_mut()
            .insert(kind.to_string(), parent.map(str::to_string));
    }

    /// Create an object of `kind` and return a reference to it.
    pub fn add_object(&self, kind: &str) -> ObjectRef {
        let id = Uuid::new_v4().to_string();
        let object = ObjectRef::new(Rc::new(MemoryObject {
            id: id.clone(),
            kind: kind.to_string(),
        }));
        self.objects.borrow_mut().insert(id, object.clone());
        object
    }

    /// Drop an object from the host. Stored handles to it stop resolving.
    pub fn remove_object(&self, object: &ObjectRef) -> bool {
        self.objects.borrow_mut().remove(object.id()).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.borrow().is_empty()
    }

    /// Whether `kind` is `ancestor` or derives from it.
    pub fn is_a(&self, kind: &str, ancestor: &str) -> bool {
        let parents = self.parents.borrow();
        let mut current = Some(kind.to_string());
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = parents.get(&k).cloned().flatten();
        }
        false
    }
}

impl HostModel for MemoryHost {
    fn resolve_handle(&self, handle: &str) -> Option<ObjectRef> {
        self.objects.borrow().get(handle).cloned()
    }

    fn handle_for(&self, object: &ObjectRef) -> Option<String> {
        let objects = self.objects.borrow();
        match objects.get(object.id()) {
            Some(owned) if owned == object => Some(object.id().to_string()),
            _ => None,
        }
    }

    fn is_kind_compatible(&self, object: &ObjectRef, kind: &str) -> bool {
        self.is_a(object.kind(), kind)
    }
}
