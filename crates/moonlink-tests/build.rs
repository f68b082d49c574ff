//! Compiles the WAT guest modules in `data/wat/` to Wasm binaries in
//! `OUT_DIR` and emits a `mod.rs` exposing each one as a byte constant.

use anyhow::{Context, Result};
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let out_dir = PathBuf::from(env::var("OUT_DIR").context("OUT_DIR not set")?);
    let wat_dir = Path::new("data/wat");
    println!("cargo:rerun-if-changed={}", wat_dir.display());

    let mut entries: Vec<PathBuf> = fs::read_dir(wat_dir)
        .with_context(|| format!("failed to read {}", wat_dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    entries.retain(|path| path.extension().is_some_and(|ext| ext == "wat"));
    entries.sort();

    let mut mod_rs = String::new();
    for path in entries {
        println!("cargo:rerun-if-changed={}", path.display());
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("bad file name {}", path.display()))?
            .to_string();

        let wasm = wat::parse_file(&path)
            .with_context(|| format!("failed to assemble {}", path.display()))?;
        fs::write(out_dir.join(format!("{stem}.wasm")), wasm)
            .with_context(|| format!("failed to write {stem}.wasm"))?;

        writeln!(mod_rs, "pub mod {stem} {{")?;
        writeln!(mod_rs, "    /// Wasm binary assembled from `data/wat/{stem}.wat`.")?;
        writeln!(
            mod_rs,
            "    pub const WASM: &[u8] = include_bytes!(concat!(env!(\"OUT_DIR\"), \"/{stem}.wasm\"));"
        )?;
        writeln!(mod_rs, "}}")?;
    }

    fs::write(out_dir.join("mod.rs"), mod_rs).context("failed to write mod.rs")?;
    Ok(())
}
