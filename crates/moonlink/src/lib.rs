//! moonlink: host import tables for MoonBit WebAssembly modules.
//!
//! A MoonBit module compiled to Wasm declares the host functions it needs as
//! `(namespace, name)` imports. This crate provides:
//! - the course import tables (`tables::lec13`, `tables::ffi`)
//! - a parser for the linkage-relevant sections of a `.wasm` binary
//! - a linkage checker that matches a module's imports against a table
//!   before it is handed to a loader
//! - host trait generation from a module's imports

pub mod bindgen;
pub mod link;
pub mod parser;
pub mod tables;

// Re-export key types for convenience
pub use anyhow::{Context, Result};
pub use link::{diagnose, link, LinkError, LinkOptions, ResolvedImports};
pub use moonlink_runtime::{
    ConstructionError, FuncType, HostFunc, ImportTable, ValType, Value, WasmResult, WasmTrap,
};
pub use parser::{parse_wasm, ParsedModule};
pub use tables::{TableKind, TableOptions};

/// Parse a WebAssembly binary and collect every linkage problem against
/// the given table.
///
/// This is the main entry point for checking a module before instantiation.
///
/// # Example
/// ```no_run
/// use moonlink::{check, LinkOptions, TableKind, TableOptions};
///
/// let wasm_bytes = std::fs::read("target/wasm/release/build/main/main.wasm").unwrap();
/// let table = TableKind::Ffi.build(&TableOptions::default()).unwrap();
/// let problems = check(&wasm_bytes, &table, &LinkOptions::default()).unwrap();
/// for problem in &problems {
///     eprintln!("{problem}");
/// }
/// ```
pub fn check(wasm_bytes: &[u8], table: &ImportTable, options: &LinkOptions) -> Result<Vec<LinkError>> {
    let module = parse_wasm(wasm_bytes).context("failed to parse WebAssembly module")?;
    Ok(diagnose(table, &module, options))
}

/// Generate host trait source for a WebAssembly binary's imports.
pub fn generate_bindings(wasm_bytes: &[u8]) -> Result<String> {
    let module = parse_wasm(wasm_bytes).context("failed to parse WebAssembly module")?;
    bindgen::generate_host_traits(&module).context("failed to generate host traits")
}
