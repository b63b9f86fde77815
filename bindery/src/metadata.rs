//! Process-wide side table of class injection metadata.
//!
//! Rust has no runtime decorators, so "attaching metadata to a class" means
//! recording it here, keyed by the class's [`TypeKey`]. The container consults
//! this table when it instantiates a class binding.
//!
//! The operations mirror the classic decorator set: mark a class injectable,
//! record the identifier for a parameter, and add a named or tagged qualifier
//! to a parameter.

use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock};

use crate::identifier::{ServiceId, TagValue, TypeKey};

static METADATA: LazyLock<RwLock<HashMap<TypeKey, ClassMetadata>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// What to inject into one constructor parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMetadata {
    pub service: Option<ServiceId>,
    pub named: Option<String>,
    pub tagged: Option<(String, TagValue)>,
}

/// Injection metadata recorded for one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetadata {
    pub name: &'static str,
    pub injectable: bool,
    pub parameters: Vec<ParameterMetadata>,
}

impl ClassMetadata {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            injectable: false,
            parameters: Vec::new(),
        }
    }
}

fn update<R>(class: TypeKey, f: impl FnOnce(&mut ClassMetadata) -> R) -> R {
    let mut table = METADATA.write().unwrap_or_else(PoisonError::into_inner);
    let entry = table
        .entry(class)
        .or_insert_with(|| ClassMetadata::new(class.name()));
    f(entry)
}

fn update_parameter(class: TypeKey, index: usize, f: impl FnOnce(&mut ParameterMetadata)) {
    update(class, |metadata| {
        if metadata.parameters.len() <= index {
            metadata
                .parameters
                .resize_with(index + 1, ParameterMetadata::default);
        }
        f(&mut metadata.parameters[index]);
    });
}

/// Marks `class` injectable. Marking twice is a no-op.
pub fn mark_injectable(class: TypeKey) {
    update(class, |metadata| metadata.injectable = true);
}

/// Marks `class` injectable and replaces parameters `0..parameters.len()`
/// under a single write lock. Later parameters are kept.
pub fn record(class: TypeKey, parameters: Vec<ParameterMetadata>) {
    update(class, |metadata| {
        metadata.injectable = true;
        if metadata.parameters.len() < parameters.len() {
            metadata
                .parameters
                .resize_with(parameters.len(), ParameterMetadata::default);
        }
        for (slot, parameter) in metadata.parameters.iter_mut().zip(parameters) {
            *slot = parameter;
        }
    });
}

/// Forgets everything recorded for parameter `index`.
pub fn clear(class: TypeKey, index: usize) {
    update_parameter(class, index, |parameter| *parameter = ParameterMetadata::default());
}

/// Records the identifier to resolve for parameter `index`.
pub fn inject(class: TypeKey, index: usize, service: ServiceId) {
    update_parameter(class, index, |parameter| parameter.service = Some(service));
}

/// Adds a named qualifier to parameter `index`.
pub fn named(class: TypeKey, index: usize, name: impl Into<String>) {
    let name = name.into();
    update_parameter(class, index, |parameter| parameter.named = Some(name));
}

/// Adds a tagged qualifier to parameter `index`.
pub fn tagged(class: TypeKey, index: usize, key: impl Into<String>, value: impl Into<TagValue>) {
    let tag = (key.into(), value.into());
    update_parameter(class, index, |parameter| parameter.tagged = Some(tag));
}

/// Snapshot of the metadata recorded for `class`.
pub fn lookup(class: TypeKey) -> Option<ClassMetadata> {
    METADATA
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&class)
        .cloned()
}
