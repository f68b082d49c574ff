//! Linkage of the compiled guest fixtures against the course tables.
//!
//! These tests verify that:
//! 1. Each guest resolves every import against its own table, with no
//!    binding left unused
//! 2. Resolved imports dispatch to the host functions in import order
//! 3. A guest never links against the other course's table
//! 4. Generated host traits cover every namespace the guest imports

use anyhow::Result;
use moonlink::{
    check, diagnose, generate_bindings, link, parse_wasm, LinkError, LinkOptions, TableKind, Value,
    WasmTrap,
};
use moonlink_tests::{ffi, lec13, seeded_table, tag_import};

const STRICT: LinkOptions = LinkOptions { deny_unused: true };

#[test]
fn lec13_guest_is_complete() -> Result<()> {
    let table = seeded_table(TableKind::Lec13);
    assert_eq!(check(lec13::WASM, &table, &STRICT)?, vec![]);
    Ok(())
}

#[test]
fn ffi_guest_is_complete() -> Result<()> {
    let table = seeded_table(TableKind::Ffi);
    assert_eq!(check(ffi::WASM, &table, &STRICT)?, vec![]);
    Ok(())
}

#[test]
fn guests_only_import_functions() -> Result<()> {
    for wasm in [lec13::WASM, ffi::WASM] {
        let module = parse_wasm(wasm)?;
        assert_eq!(module.func_imports().count(), module.imports.len());
        assert_eq!(module.num_imported_functions as usize, module.imports.len());
    }
    Ok(())
}

#[test]
fn lec13_resolved_calls() -> Result<()> {
    let table = seeded_table(TableKind::Lec13);
    let module = parse_wasm(lec13::WASM)?;
    let resolved = link(&table, &module, &STRICT)?;
    assert_eq!(resolved.len(), 2);

    assert_eq!(resolved.call(0, &[Value::F64(0.0)]), Ok(Some(Value::F64(1.0))));
    assert_eq!(resolved.call(1, &[Value::F64(1.0)]), Ok(Some(Value::F64(0.0))));
    assert_eq!(resolved.call(2, &[]), Err(WasmTrap::ImportIndexOutOfBounds));
    Ok(())
}

#[test]
fn ffi_resolved_calls() -> Result<()> {
    let table = seeded_table(TableKind::Ffi);
    let module = parse_wasm(ffi::WASM)?;
    let resolved = link(&table, &module, &STRICT)?;

    let names: Vec<String> = resolved
        .iter()
        .map(|r| format!("{}.{}", r.namespace, r.name))
        .collect();
    assert_eq!(
        names,
        ["universe.answer", "Math.get_pi", "Math.random", "Runtime.add"]
    );

    assert_eq!(resolved.call(0, &[]), Ok(Some(Value::I32(42))));
    match resolved.call(2, &[]) {
        Ok(Some(Value::F64(v))) => assert!((0.0..1.0).contains(&v)),
        other => panic!("Math.random returned {other:?}"),
    }
    assert_eq!(
        resolved.call(3, &[Value::I32(40), Value::I32(2)]),
        Ok(Some(Value::I32(42)))
    );
    assert_eq!(
        resolved.call(3, &[Value::F64(40.0), Value::I32(2)]),
        Err(WasmTrap::TypeMismatch {
            index: 0,
            expected: moonlink::ValType::I32,
            found: moonlink::ValType::F64,
        })
    );
    Ok(())
}

#[test]
fn cross_linking_reports_every_import() -> Result<()> {
    let lec13_table = seeded_table(TableKind::Lec13);
    let ffi_table = seeded_table(TableKind::Ffi);

    let problems = diagnose(&ffi_table, &parse_wasm(lec13::WASM)?, &LinkOptions::default());
    assert_eq!(problems.len(), 2);

    let problems = diagnose(&lec13_table, &parse_wasm(ffi::WASM)?, &LinkOptions::default());
    let missing: Vec<&str> = problems
        .iter()
        .map(|p| match p {
            LinkError::MissingNamespace { namespace, .. } => namespace.as_str(),
            other => panic!("unexpected problem {other}"),
        })
        .collect();
    assert_eq!(missing, ["universe", "Math", "Math", "Runtime"]);

    assert!(link(&lec13_table, &parse_wasm(ffi::WASM)?, &LinkOptions::default()).is_err());
    Ok(())
}

#[test]
fn tag_import_is_reported_as_tag() -> Result<()> {
    let table = seeded_table(TableKind::Ffi);
    let module = parse_wasm(tag_import::WASM)?;
    assert_eq!(module.num_imported_functions, 1);

    let problems = diagnose(&table, &module, &LinkOptions::default());
    assert_eq!(
        problems,
        vec![LinkError::UnsupportedImportKind {
            namespace: "env".to_string(),
            name: "t".to_string(),
            kind: "tag",
        }]
    );
    assert_eq!(
        problems[0].to_string(),
        "`env.t` is a tag import; only functions are provided"
    );
    assert!(link(&table, &module, &LinkOptions::default()).is_err());
    Ok(())
}

#[test]
fn bindings_cover_guest_namespaces() -> Result<()> {
    let lec13_code = generate_bindings(lec13::WASM)?;
    assert!(lec13_code.contains("pub trait MathImports {"));
    assert!(lec13_code.contains("    fn exp(&mut self, arg0: f64) -> WasmResult<f64>;"));
    assert!(lec13_code.contains("    fn log(&mut self, arg0: f64) -> WasmResult<f64>;"));

    let ffi_code = generate_bindings(ffi::WASM)?;
    assert!(ffi_code.contains("pub trait UniverseImports {"));
    assert!(ffi_code.contains("    fn answer(&mut self) -> WasmResult<i32>;"));
    assert!(ffi_code.contains("    fn get_pi(&mut self) -> WasmResult<f64>;"));
    assert!(ffi_code.contains("pub trait RuntimeImports {"));
    Ok(())
}
