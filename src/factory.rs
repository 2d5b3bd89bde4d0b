//! Process-wide method and space registries.
//!
//! Indices and spaces are constructed by name so that experiment
//! drivers can be configured with strings. Both registries are keyed by
//! `(distance value type, name)`: the same name may be registered
//! separately for `i32`, `f32`, and `f64` runs.
//!
//! Built-in families and spaces are registered exactly once, lazily,
//! before the first lookup; [`register_method`] and [`register_space`]
//! are the extension points for additional families.
//!
//! The factory is stateless with respect to index reuse: skipping a
//! rebuild when two parameter bags differ only in query-time keys is a
//! caller-side policy built from
//! [`Params::equals_ignore_in_list`](crate::Params::equals_ignore_in_list),
//! [`Index::query_time_param_names`](crate::Index::query_time_param_names),
//! and
//! [`Index::set_query_time_params`](crate::Index::set_query_time_params).

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Once, OnceLock, RwLock};

use tracing::debug;

use crate::brute_force;
use crate::error::{IndexError, Result};
use crate::index::{BoxedIndex, IndexConstructor};
use crate::list_clusters;
use crate::multi_index;
use crate::object::Object;
use crate::params::Params;
use crate::space::{DenseSpaceF32, DenseSpaceF64, DistanceValue, LevenshteinSpace, Space};

/// Constructor signature registered with the space factory.
pub type SpaceConstructor<D> = fn(&Params) -> Result<Box<dyn Space<D>>>;

type Registry = RwLock<HashMap<(TypeId, String), Box<dyn Any + Send + Sync>>>;

fn method_registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Default::default)
}

fn space_registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Default::default)
}

/// Register an index family under `name` for distance type `D`.
pub fn register_method<D: DistanceValue>(name: &str, ctor: IndexConstructor<D>) -> Result<()> {
    let mut map = method_registry().write().expect("method registry poisoned");
    let key = (TypeId::of::<D>(), name.to_string());
    if map.contains_key(&key) {
        return Err(IndexError::DuplicateRegistration(name.to_string()));
    }
    map.insert(key, Box::new(ctor));
    Ok(())
}

/// Register a distance space under `name` for distance type `D`.
pub fn register_space<D: DistanceValue>(name: &str, ctor: SpaceConstructor<D>) -> Result<()> {
    let mut map = space_registry().write().expect("space registry poisoned");
    let key = (TypeId::of::<D>(), name.to_string());
    if map.contains_key(&key) {
        return Err(IndexError::DuplicateRegistration(name.to_string()));
    }
    map.insert(key, Box::new(ctor));
    Ok(())
}

/// Build a named index over `space` and `data`.
pub fn create_method<'a, D: DistanceValue>(
    print_progress: bool,
    name: &str,
    space: &'a dyn Space<D>,
    data: &'a [Object],
    params: &Params,
) -> Result<BoxedIndex<'a, D>> {
    ensure_builtins();

    let ctor: IndexConstructor<D> = {
        let map = method_registry().read().expect("method registry poisoned");
        let entry = map
            .get(&(TypeId::of::<D>(), name.to_string()))
            .ok_or_else(|| IndexError::UnknownMethod(name.to_string()))?;
        *entry
            .downcast_ref::<IndexConstructor<D>>()
            .expect("constructor registered under a mismatched distance type")
    };

    debug!(method = name, objects = data.len(), params = %params, "creating index");
    ctor(print_progress, space, data, params)
}

/// Construct a named distance space.
pub fn create_space<D: DistanceValue>(name: &str, params: &Params) -> Result<Box<dyn Space<D>>> {
    ensure_builtins();

    let ctor: SpaceConstructor<D> = {
        let map = space_registry().read().expect("space registry poisoned");
        let entry = map
            .get(&(TypeId::of::<D>(), name.to_string()))
            .ok_or_else(|| IndexError::UnknownSpace(name.to_string()))?;
        *entry
            .downcast_ref::<SpaceConstructor<D>>()
            .expect("constructor registered under a mismatched distance type")
    };

    ctor(params)
}

fn ensure_builtins() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        register_builtin_methods::<i32>();
        register_builtin_methods::<f32>();
        register_builtin_methods::<f64>();

        register_space::<f32>("l1", |_| Ok(Box::new(DenseSpaceF32::l1())))
            .expect("builtin space registered twice");
        register_space::<f32>("l2", |_| Ok(Box::new(DenseSpaceF32::l2())))
            .expect("builtin space registered twice");
        register_space::<f64>("l1", |_| Ok(Box::new(DenseSpaceF64::l1())))
            .expect("builtin space registered twice");
        register_space::<f64>("l2", |_| Ok(Box::new(DenseSpaceF64::l2())))
            .expect("builtin space registered twice");
        register_space::<i32>("leven", |_| Ok(Box::new(LevenshteinSpace)))
            .expect("builtin space registered twice");
    });
}

fn register_builtin_methods<D: DistanceValue>() {
    register_method::<D>("list_clusters", list_clusters::boxed_constructor::<D>)
        .expect("builtin method registered twice");
    register_method::<D>("multi_index", multi_index::boxed_constructor::<D>)
        .expect("builtin method registered twice");
    register_method::<D>("seq_search", brute_force::boxed_constructor::<D>)
        .expect("builtin method registered twice");
}
