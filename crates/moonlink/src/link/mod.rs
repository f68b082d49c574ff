//! Host linkage: matching a module's imports against an `ImportTable`.
//!
//! A loader hands the table to the engine at instantiation time; any pair
//! the module imports but the table lacks, or any signature disagreement,
//! fails instantiation. `diagnose` finds the same failures up front and
//! reports all of them, `link` stops at the first one and otherwise returns
//! the host functions in function import order.

use moonlink_runtime::{FuncType, HostFunc, ImportTable, Value, WasmResult, WasmTrap};
use thiserror::Error;

use crate::parser::{ImportKind, ParsedModule};

/// Linkage options.
#[derive(Debug, Clone, Default)]
pub struct LinkOptions {
    /// Treat table bindings the module never imports as errors instead of
    /// logging a warning.
    pub deny_unused: bool,
}

/// A single linkage failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("unknown import namespace `{namespace}` (needed for `{namespace}.{name}`)")]
    MissingNamespace { namespace: String, name: String },

    #[error("namespace `{namespace}` has no binding `{name}`")]
    MissingBinding { namespace: String, name: String },

    #[error("`{namespace}.{name}` is imported as {expected} but the host provides {found}")]
    SignatureMismatch {
        namespace: String,
        name: String,
        /// Signature declared by the guest module.
        expected: FuncType,
        /// Signature of the host binding.
        found: FuncType,
    },

    #[error("`{namespace}.{name}` uses a signature no host function can have ({reason})")]
    UnsupportedType {
        namespace: String,
        name: String,
        reason: String,
    },

    #[error("`{namespace}.{name}` is a {kind} import; only functions are provided")]
    UnsupportedImportKind {
        namespace: String,
        name: String,
        kind: &'static str,
    },

    #[error("`{namespace}.{name}` refers to type index {type_idx}, which does not exist")]
    InvalidTypeIndex {
        namespace: String,
        name: String,
        type_idx: u32,
    },

    #[error("binding `{namespace}.{name}` is never imported by the module")]
    UnusedBinding { namespace: String, name: String },
}

/// Host functions resolved for a module, indexed like its function imports.
#[derive(Debug)]
pub struct ResolvedImports<'t> {
    funcs: Vec<ResolvedFunc<'t>>,
}

/// One resolved function import.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedFunc<'t> {
    pub namespace: &'t str,
    pub name: &'t str,
    pub func: &'t HostFunc,
}

impl<'t> ResolvedImports<'t> {
    /// The host function for function import `index`.
    pub fn get(&self, index: u32) -> Option<&ResolvedFunc<'t>> {
        self.funcs.get(index as usize)
    }

    /// Call function import `index`, as a guest `call` to that index would.
    pub fn call(&self, index: u32, args: &[Value]) -> WasmResult<Option<Value>> {
        self.get(index)
            .ok_or(WasmTrap::ImportIndexOutOfBounds)?
            .func
            .call(args)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedFunc<'t>> {
        self.funcs.iter()
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}

/// Check one import against the table and return its binding.
fn resolve_import<'t>(
    table: &'t ImportTable,
    module: &ParsedModule,
    namespace: &str,
    name: &str,
    kind: ImportKind,
) -> Result<ResolvedFunc<'t>, LinkError> {
    let type_idx = match kind {
        ImportKind::Function(type_idx) => type_idx,
        other => {
            return Err(LinkError::UnsupportedImportKind {
                namespace: namespace.to_string(),
                name: name.to_string(),
                kind: other.describe(),
            })
        }
    };

    let declared = module
        .declared_type(type_idx)
        .ok_or_else(|| LinkError::InvalidTypeIndex {
            namespace: namespace.to_string(),
            name: name.to_string(),
            type_idx,
        })?;
    let expected = declared
        .to_func_type()
        .map_err(|reason| LinkError::UnsupportedType {
            namespace: namespace.to_string(),
            name: name.to_string(),
            reason,
        })?;

    let (ns_key, bindings) = table
        .namespace_entry(namespace)
        .ok_or_else(|| LinkError::MissingNamespace {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })?;
    let (name_key, func) = bindings
        .get_key_value(name)
        .ok_or_else(|| LinkError::MissingBinding {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })?;

    if func.ty() != &expected {
        return Err(LinkError::SignatureMismatch {
            namespace: namespace.to_string(),
            name: name.to_string(),
            expected,
            found: func.ty().clone(),
        });
    }

    Ok(ResolvedFunc {
        namespace: ns_key,
        name: name_key,
        func,
    })
}

/// Table bindings that no import of `module` refers to.
fn unused_bindings<'t>(
    table: &'t ImportTable,
    module: &ParsedModule,
) -> impl Iterator<Item = (&'t str, &'t str)> + 't {
    let imported: Vec<(String, String)> = module
        .imports
        .iter()
        .map(|imp| (imp.module_name.clone(), imp.name.clone()))
        .collect();
    table.keys().filter(move |(ns, name)| {
        !imported
            .iter()
            .any(|(imp_ns, imp_name)| imp_ns == ns && imp_name == name)
    })
}

/// Collect every linkage problem, in import section order, followed by
/// unused bindings when `deny_unused` is set.
pub fn diagnose(table: &ImportTable, module: &ParsedModule, options: &LinkOptions) -> Vec<LinkError> {
    let mut errors: Vec<LinkError> = module
        .imports
        .iter()
        .filter_map(|imp| {
            resolve_import(table, module, &imp.module_name, &imp.name, imp.kind).err()
        })
        .collect();

    for (namespace, name) in unused_bindings(table, module) {
        if options.deny_unused {
            errors.push(LinkError::UnusedBinding {
                namespace: namespace.to_string(),
                name: name.to_string(),
            });
        } else {
            log::warn!("binding `{namespace}.{name}` is never imported by the module");
        }
    }

    errors
}

/// Resolve every function import of `module` against `table`.
///
/// # Errors
/// Returns the first `LinkError` in the order `diagnose` reports them.
pub fn link<'t>(
    table: &'t ImportTable,
    module: &ParsedModule,
    options: &LinkOptions,
) -> Result<ResolvedImports<'t>, LinkError> {
    if let Some(err) = diagnose(table, module, options).into_iter().next() {
        return Err(err);
    }

    let mut funcs = Vec::with_capacity(module.num_imported_functions as usize);
    for (func_idx, imp, _) in module.func_imports() {
        let resolved = resolve_import(table, module, &imp.module_name, &imp.name, imp.kind)?;
        log::debug!(
            "import {func_idx}: `{}.{}` resolved to {}",
            resolved.namespace,
            resolved.name,
            resolved.func.ty()
        );
        funcs.push(resolved);
    }

    Ok(ResolvedImports { funcs })
}
