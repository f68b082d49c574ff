//! `moonlink-runtime`: runtime types for host import tables.
//!
//! This crate is `#![no_std]` (it needs `alloc` for the name maps). It provides:
//! - `ValType` / `Value` / `FuncType` for the numeric Wasm MVP signatures
//! - `HostFunc`, a type-erased host callable carrying its signature
//! - `ImportTable`, the immutable namespace → binding → `HostFunc` mapping
//! - `WasmTrap` / `WasmResult<T>` for host call failures

#![no_std]

extern crate alloc;

use alloc::string::String;
use core::fmt;

mod value;
pub use value::{FuncType, ValType, Value, WasmRet, WasmTy};

mod func;
pub use func::{HostFunc, IntoHostFunc};

mod table;
pub use table::{ImportTable, ImportTableBuilder, Namespace};

/// Host call errors. Calls never panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WasmTrap {
    /// The caller passed a different number of arguments than the binding declares.
    ArityMismatch { expected: usize, found: usize },
    /// Argument `index` has the wrong value type.
    TypeMismatch {
        index: usize,
        expected: ValType,
        found: ValType,
    },
    /// No binding with the requested namespace/name exists in the table.
    UnknownImport,
    /// A resolved import index is outside the resolved import list.
    ImportIndexOutOfBounds,
}

impl fmt::Display for WasmTrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WasmTrap::ArityMismatch { expected, found } => {
                write!(f, "expected {expected} argument(s), found {found}")
            }
            WasmTrap::TypeMismatch {
                index,
                expected,
                found,
            } => write!(f, "argument {index}: expected {expected}, found {found}"),
            WasmTrap::UnknownImport => write!(f, "unknown import"),
            WasmTrap::ImportIndexOutOfBounds => write!(f, "import index out of bounds"),
        }
    }
}

/// Result type for host calls, `Result<T, WasmTrap>`.
pub type WasmResult<T> = Result<T, WasmTrap>;

/// Errors that occur while building an `ImportTable`.
///
/// These are mistakes in the table definition, not runtime traps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// The same `(namespace, name)` pair was registered twice.
    DuplicateBinding { namespace: String, name: String },
    /// A namespace or binding name was empty.
    EmptyName,
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionError::DuplicateBinding { namespace, name } => {
                write!(f, "duplicate binding `{namespace}.{name}`")
            }
            ConstructionError::EmptyName => write!(f, "namespace and binding names must not be empty"),
        }
    }
}

impl core::error::Error for WasmTrap {}
impl core::error::Error for ConstructionError {}
