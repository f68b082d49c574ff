//! Import table, the host side of Wasm import linkage.
//!
//! A guest module declares imports as `(namespace, name)` pairs. The table
//! maps each namespace to its bindings, and each binding to a `HostFunc`.
//! Tables are assembled once through `ImportTableBuilder` and are immutable
//! afterwards: there is no API to add, replace or remove a binding on a
//! built table.
//!
//! Both levels are `BTreeMap`s, so listing a table is deterministic.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::func::{HostFunc, IntoHostFunc};
use crate::value::Value;
use crate::{ConstructionError, WasmResult, WasmTrap};

/// The bindings of one import namespace.
#[derive(Debug, Default)]
pub struct Namespace {
    bindings: BTreeMap<String, HostFunc>,
}

impl Namespace {
    /// Look up a binding by name.
    pub fn get(&self, name: &str) -> Option<&HostFunc> {
        self.bindings.get(name)
    }

    /// Look up a binding, also returning the table's own copy of its name.
    pub fn get_key_value(&self, name: &str) -> Option<(&str, &HostFunc)> {
        self.bindings
            .get_key_value(name)
            .map(|(key, func)| (key.as_str(), func))
    }

    /// Binding names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HostFunc)> {
        self.bindings.iter().map(|(name, func)| (name.as_str(), func))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Immutable mapping from namespace → binding name → host function.
#[derive(Debug, Default)]
pub struct ImportTable {
    namespaces: BTreeMap<String, Namespace>,
}

impl ImportTable {
    pub fn builder() -> ImportTableBuilder {
        ImportTableBuilder::default()
    }

    /// Look up a namespace.
    pub fn namespace(&self, namespace: &str) -> Option<&Namespace> {
        self.namespaces.get(namespace)
    }

    /// Look up a namespace, also returning the table's own copy of its name.
    pub fn namespace_entry(&self, namespace: &str) -> Option<(&str, &Namespace)> {
        self.namespaces
            .get_key_value(namespace)
            .map(|(key, bindings)| (key.as_str(), bindings))
    }

    /// Look up a binding.
    pub fn get(&self, namespace: &str, name: &str) -> Option<&HostFunc> {
        self.namespaces.get(namespace)?.get(name)
    }

    /// Look up and call a binding.
    ///
    /// - `UnknownImport` if the pair is not in the table
    /// - otherwise whatever `HostFunc::call` returns
    pub fn call(&self, namespace: &str, name: &str, args: &[Value]) -> WasmResult<Option<Value>> {
        self.get(namespace, name)
            .ok_or(WasmTrap::UnknownImport)?
            .call(args)
    }

    /// Namespace names in sorted order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    /// Every `(namespace, name)` pair, sorted by namespace then name.
    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.namespaces
            .iter()
            .flat_map(|(ns, bindings)| bindings.names().map(move |name| (ns.as_str(), name)))
    }

    /// Every binding with its namespace and name, in `keys()` order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &HostFunc)> {
        self.namespaces.iter().flat_map(|(ns, bindings)| {
            bindings
                .iter()
                .map(move |(name, func)| (ns.as_str(), name, func))
        })
    }

    /// Total number of bindings across all namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.values().map(Namespace::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collects bindings for an `ImportTable`.
///
/// Registration never fails on its own; problems are recorded and reported
/// by `build()`, so a table definition reads as a flat list of `func` calls.
#[derive(Default)]
pub struct ImportTableBuilder {
    entries: Vec<(String, String, HostFunc)>,
}

impl ImportTableBuilder {
    /// Register a typed Rust callable as `namespace.name`.
    pub fn func<Params, Results>(
        mut self,
        namespace: &str,
        name: &str,
        func: impl IntoHostFunc<Params, Results>,
    ) -> Self {
        self.entries.push((
            namespace.to_string(),
            name.to_string(),
            func.into_host_func(),
        ));
        self
    }

    /// Register an already constructed `HostFunc` as `namespace.name`.
    pub fn host_func(mut self, namespace: &str, name: &str, func: HostFunc) -> Self {
        self.entries
            .push((namespace.to_string(), name.to_string(), func));
        self
    }

    /// Freeze the collected bindings into an immutable table.
    ///
    /// # Errors
    /// - `EmptyName` if any namespace or binding name is empty
    /// - `DuplicateBinding` for the first pair registered twice
    pub fn build(self) -> Result<ImportTable, ConstructionError> {
        let mut namespaces: BTreeMap<String, Namespace> = BTreeMap::new();
        for (namespace, name, func) in self.entries {
            if namespace.is_empty() || name.is_empty() {
                return Err(ConstructionError::EmptyName);
            }
            let bindings = &mut namespaces.entry(namespace.clone()).or_default().bindings;
            if bindings.contains_key(&name) {
                return Err(ConstructionError::DuplicateBinding { namespace, name });
            }
            bindings.insert(name, func);
        }
        Ok(ImportTable { namespaces })
    }
}
