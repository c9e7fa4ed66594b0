//! # Parambind Architecture
//!
//! Parambind binds **typed, validated attributes** to an untyped, string-valued
//! parameter store. Client code declares attributes once; the resulting bound
//! instance reads and writes them through the store with validation, defaults,
//! optional caching, and change notifications.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Binder (binder/, proxy.rs)                                 │
//! │  - Schema: declaration resolved once, fail-fast             │
//! │  - BoundInstance: (store, prefix) view, cache, events       │
//! │  - ListProxy: live view over list attributes                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Registry (registry.rs)                                     │
//! │  - Declared type → serializer, recursively                  │
//! │  - Open for user types: register, never modify              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Serializers + Validators (serializers/, validators.rs)     │
//! │  - Encode/decode one type against the store                 │
//! │  - Reject bad values before the store is touched            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Collaborators (store/, host.rs)                            │
//! │  - ParameterStore: flat string KV with observers            │
//! │  - HostModel: owner of referenced objects                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use parambind::{
//!     BindConfig, Declaration, MemoryStore, Schema, SerializerRegistry, TypeDesc, Value,
//! };
//! use std::rc::Rc;
//!
//! let declaration = Declaration::new()
//!     .attr("x", TypeDesc::Int)
//!     .attr("y", TypeDesc::list(TypeDesc::Int));
//! let schema = Schema::resolve(&declaration, &SerializerRegistry::new(), BindConfig::default())?;
//!
//! let store = Rc::new(MemoryStore::new());
//! let params = schema.bind(store.clone(), "");
//! assert_eq!(params.get("x")?, Value::Int(0));
//!
//! params.set("x", 7)?;
//! let y = params.list("y")?;
//! y.append(1)?;
//! y.append(2)?;
//! assert_eq!(params.get("y")?, Value::from(vec![1, 2]));
//! # Ok::<(), parambind::ParamError>(())
//! ```
//!
//! ## Threading
//!
//! Everything is single-threaded and synchronous: shared state is `Rc` and
//! `RefCell`, store observers fire inline with the write that caused them.
//!
//! ## Module Overview
//!
//! - [`binder`]: Schema resolution and bound instances
//! - [`proxy`]: Observable list proxy
//! - [`registry`]: Serializer registry
//! - [`serializers`]: Serializer traits and built-ins
//! - [`validators`]: Validator trait and built-ins
//! - [`attributes`]: Declarations
//! - [`types`]: Declared type descriptors
//! - [`value`]: Runtime values
//! - [`store`]: Parameter store contract and in-memory store
//! - [`host`]: Host object model contract and in-memory host
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod attributes;
pub mod binder;
pub mod config;
pub mod error;
pub mod host;
pub mod proxy;
pub mod registry;
pub mod serializers;
pub mod store;
pub mod types;
pub mod validators;
pub mod value;

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct ReadmeDoctests;

pub use attributes::{AttributeSpec, Declaration};
pub use binder::{BoundInstance, ChangeEvent, ResolvedAttribute, Schema, SubscriptionToken};
pub use config::BindConfig;
pub use error::{ParamError, Result};
pub use host::{HostModel, HostObject, MemoryHost, ObjectRef};
pub use proxy::ListProxy;
pub use registry::SerializerRegistry;
pub use serializers::{Serializer, SerializerFactory, SerializerRef};
pub use store::{MemoryStore, ObserverToken, ParameterStore, StoreEvent, StoreEventKind};
pub use types::{CustomType, TypeDesc, TypeKey};
pub use value::{Opaque, Value, ValueKind};
