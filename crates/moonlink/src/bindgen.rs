//! Host trait generation from WebAssembly imports.
//!
//! Generates one Rust trait per import namespace of a module, with one
//! method per function import. A host that implements the traits provides
//! exactly what the module links against, so a missing or mistyped binding
//! becomes a compile error on the host side.

use std::collections::HashMap;

use anyhow::{Context, Result};
use heck::{ToSnakeCase, ToUpperCamelCase};

use crate::parser::{ImportInfo, ParsedModule};

/// Convert a namespace to a Rust trait name.
///
/// Examples:
/// - "math" → "MathImports"
/// - "Runtime" → "RuntimeImports"
/// - "wasi_snapshot_preview1" → "WasiSnapshotPreview1Imports"
pub fn namespace_to_trait_name(namespace: &str) -> String {
    format!("{}Imports", namespace.to_upper_camel_case())
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type", "unsafe",
    "use", "where", "while", "yield",
];

/// Convert an import name to a method name that is a valid Rust identifier.
pub fn import_name_to_method_name(name: &str) -> String {
    let snake = name.to_snake_case();
    if snake.is_empty() || snake.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{snake}")
    } else if matches!(snake.as_str(), "self" | "super" | "crate") {
        // Not allowed as raw identifiers.
        format!("{snake}_")
    } else if RUST_KEYWORDS.contains(&snake.as_str()) {
        format!("r#{snake}")
    } else {
        snake
    }
}

/// Namespaces with function imports, in first-import order.
fn namespaces_in_order(module: &ParsedModule) -> Vec<&str> {
    let mut namespaces: Vec<&str> = Vec::new();
    for (_, imp, _) in module.func_imports() {
        if !namespaces.contains(&imp.module_name.as_str()) {
            namespaces.push(&imp.module_name);
        }
    }
    namespaces
}

/// Generate host trait definitions from a module's function imports.
///
/// Returns an empty string if there are no function imports.
///
/// # Errors
/// Fails if an import refers to a missing type or has a signature no host
/// function can have.
pub fn generate_host_traits(module: &ParsedModule) -> Result<String> {
    let mut grouped: HashMap<&str, Vec<(&ImportInfo, u32)>> = HashMap::new();
    for (_, imp, type_idx) in module.func_imports() {
        grouped
            .entry(imp.module_name.as_str())
            .or_default()
            .push((imp, type_idx));
    }

    let mut code = String::new();
    let mut trait_names: HashMap<String, &str> = HashMap::new();
    for namespace in namespaces_in_order(module) {
        let trait_name = namespace_to_trait_name(namespace);
        if let Some(other) = trait_names.insert(trait_name.clone(), namespace) {
            anyhow::bail!("namespaces `{other}` and `{namespace}` both map to trait `{trait_name}`");
        }
        code.push_str(&format!("/// Host functions imported from `{namespace}`.\n"));
        code.push_str(&format!("pub trait {trait_name} {{\n"));

        for (imp, type_idx) in grouped.get(namespace).into_iter().flatten() {
            let ty = module
                .declared_type(*type_idx)
                .with_context(|| format!("`{namespace}.{}`: no type {type_idx}", imp.name))?
                .to_func_type()
                .map_err(|reason| anyhow::anyhow!("`{namespace}.{}`: {reason}", imp.name))?;

            let mut params = vec!["&mut self".to_string()];
            for (i, param) in ty.params().iter().enumerate() {
                params.push(format!("arg{i}: {param}"));
            }
            let return_ty = match ty.result() {
                Some(result) => format!("WasmResult<{result}>"),
                None => "WasmResult<()>".to_string(),
            };

            code.push_str(&format!(
                "    fn {}({}) -> {};\n",
                import_name_to_method_name(&imp.name),
                params.join(", "),
                return_ty
            ));
        }

        code.push_str("}\n\n");
    }

    Ok(code)
}

/// Build trait bounds string from imports (e.g., "MathImports + RuntimeImports").
pub fn build_trait_bounds(module: &ParsedModule) -> Option<String> {
    let namespaces = namespaces_in_order(module);
    if namespaces.is_empty() {
        return None;
    }
    let trait_names: Vec<String> = namespaces
        .iter()
        .map(|namespace| namespace_to_trait_name(namespace))
        .collect();
    Some(trait_names.join(" + "))
}
