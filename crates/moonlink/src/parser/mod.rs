//! WebAssembly module parser.
//!
//! This module wraps the `wasmparser` crate to extract the parts of a `.wasm`
//! binary that matter for host linkage: the type section and imports.
//! Everything else is skipped.

use anyhow::{Context, Result};
use moonlink_runtime::{FuncType, ValType};
use wasmparser::{CompositeInnerType, Parser, Payload, TypeRef};

/// One entry of the module's type section.
///
/// Kept separate from `moonlink_runtime::FuncType` because a guest may
/// declare types no host binding can have (vector or reference types,
/// multiple results, GC structs and arrays); those only become an error if
/// an import actually uses them. Every entry occupies one type index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    Func {
        params: Vec<wasmparser::ValType>,
        results: Vec<wasmparser::ValType>,
    },
    /// A GC proposal type (`struct`, `array`, ...).
    NonFunc(&'static str),
}

impl DeclaredType {
    /// Convert to a host signature, or describe why that is impossible.
    pub fn to_func_type(&self) -> std::result::Result<FuncType, String> {
        let (params, results) = match self {
            DeclaredType::Func { params, results } => (params, results),
            DeclaredType::NonFunc(kind) => return Err(format!("type is a {kind}, not a function")),
        };
        let params = params
            .iter()
            .map(|ty| val_type_from_wasmparser(*ty))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let result = match results.as_slice() {
            [] => None,
            [ty] => Some(val_type_from_wasmparser(*ty)?),
            more => return Err(format!("{} results", more.len())),
        };
        Ok(FuncType::new(&params, result))
    }
}

/// Convert a wasmparser value type to a host number type.
pub fn val_type_from_wasmparser(ty: wasmparser::ValType) -> std::result::Result<ValType, String> {
    match ty {
        wasmparser::ValType::I32 => Ok(ValType::I32),
        wasmparser::ValType::I64 => Ok(ValType::I64),
        wasmparser::ValType::F32 => Ok(ValType::F32),
        wasmparser::ValType::F64 => Ok(ValType::F64),
        other => Err(other.to_string()),
    }
}

/// An import from the Wasm module.
#[derive(Debug, Clone)]
pub struct ImportInfo {
    /// The import namespace (e.g., "Math").
    pub module_name: String,
    /// The import field name (e.g., "get_pi").
    pub name: String,
    /// What kind of item is imported.
    pub kind: ImportKind,
}

/// Kind of import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// Imported function (index into the type section).
    Function(u32),
    /// Imported global.
    Global,
    /// Imported memory.
    Memory,
    /// Imported table.
    Table,
    /// Imported exception tag.
    Tag,
}

impl ImportKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ImportKind::Function(_) => "function",
            ImportKind::Global => "global",
            ImportKind::Memory => "memory",
            ImportKind::Table => "table",
            ImportKind::Tag => "tag",
        }
    }
}

/// Parsed WebAssembly module (linkage-relevant parts only).
#[derive(Debug, Clone)]
pub struct ParsedModule {
    /// Type section, one entry per type index
    pub types: Vec<DeclaredType>,

    /// Imports, in import section order
    pub imports: Vec<ImportInfo>,

    /// Number of imported functions (these occupy indices 0..N-1 in the
    /// function index space, before local functions).
    pub num_imported_functions: u32,
}

impl ParsedModule {
    /// Function imports only, paired with their index in the function index space.
    pub fn func_imports(&self) -> impl Iterator<Item = (u32, &ImportInfo, u32)> {
        self.imports
            .iter()
            .filter_map(|imp| match imp.kind {
                ImportKind::Function(type_idx) => Some((imp, type_idx)),
                _ => None,
            })
            .enumerate()
            .map(|(func_idx, (imp, type_idx))| (func_idx as u32, imp, type_idx))
    }

    /// Look up a type section entry by type index.
    pub fn declared_type(&self, type_idx: u32) -> Option<&DeclaredType> {
        self.types.get(type_idx as usize)
    }
}

/// Parse a WebAssembly binary into its linkage-relevant parts.
pub fn parse_wasm(wasm_bytes: &[u8]) -> Result<ParsedModule> {
    let parser = Parser::new(0);

    let mut types = Vec::new();
    let mut imports = Vec::new();
    let mut num_imported_functions: u32 = 0;

    for payload in parser.parse_all(wasm_bytes) {
        let payload = payload.context("parsing wasm payload")?;

        match payload {
            Payload::TypeSection(reader) => {
                for rec_group in reader {
                    let rec_group = rec_group.context("reading rec group")?;
                    for sub_type in rec_group.types() {
                        let declared = match &sub_type.composite_type.inner {
                            CompositeInnerType::Func(func_ty) => DeclaredType::Func {
                                params: func_ty.params().to_vec(),
                                results: func_ty.results().to_vec(),
                            },
                            CompositeInnerType::Struct(_) => DeclaredType::NonFunc("struct"),
                            CompositeInnerType::Array(_) => DeclaredType::NonFunc("array"),
                            // Stack-switching continuation types.
                            _ => DeclaredType::NonFunc("cont"),
                        };
                        types.push(declared);
                    }
                }
            }

            Payload::ImportSection(reader) => {
                for import in reader {
                    let import = import.context("reading import")?;
                    let kind = match import.ty {
                        TypeRef::Func(type_idx) => {
                            num_imported_functions += 1;
                            ImportKind::Function(type_idx)
                        }
                        TypeRef::Global(_) => ImportKind::Global,
                        TypeRef::Memory(_) => ImportKind::Memory,
                        TypeRef::Table(_) => ImportKind::Table,
                        TypeRef::Tag(_) => ImportKind::Tag,
                    };
                    imports.push(ImportInfo {
                        module_name: import.module.to_string(),
                        name: import.name.to_string(),
                        kind,
                    });
                }
            }

            _ => {}
        }
    }

    log::debug!(
        "parsed module: {} types, {} imports ({} functions)",
        types.len(),
        imports.len(),
        num_imported_functions
    );

    Ok(ParsedModule {
        types,
        imports,
        num_imported_functions,
    })
}
