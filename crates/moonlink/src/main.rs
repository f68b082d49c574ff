use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use moonlink::{
    check, generate_bindings, ImportTable, LinkOptions, TableKind, TableOptions, ValType, Value,
};
use std::fs;
use std::path::PathBuf;

/// moonlink: host import tables for MoonBit WebAssembly modules.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a module's imports against an import table
    Check {
        /// Input WebAssembly binary (.wasm)
        input: PathBuf,

        /// Import table to link against
        #[arg(long, short)]
        table: TableKind,

        /// Treat table bindings the module never imports as errors
        #[arg(long)]
        deny_unused: bool,
    },

    /// List the bindings of an import table
    List {
        /// Import table to list
        #[arg(long, short)]
        table: TableKind,
    },

    /// Call a single binding of an import table
    Call {
        /// Import table to call into
        #[arg(long, short)]
        table: TableKind,

        /// Seed for `Math.random` (default: OS entropy)
        #[arg(long)]
        seed: Option<u64>,

        /// Import namespace (e.g. `Runtime`)
        namespace: String,

        /// Binding name (e.g. `add`)
        name: String,

        /// Arguments, parsed according to the binding's parameter types
        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,
    },

    /// Generate Rust host traits for a module's imports
    Bindgen {
        /// Input WebAssembly binary (.wasm)
        input: PathBuf,

        /// Output Rust source file
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn build_table(kind: TableKind, options: &TableOptions) -> Result<ImportTable> {
    kind.build(options)
        .with_context(|| format!("failed to build `{kind}` import table"))
}

/// Parse one command-line argument as a value of type `ty`.
fn parse_value(raw: &str, ty: ValType) -> Result<Value> {
    let value = match ty {
        ValType::I32 => Value::I32(raw.parse().with_context(|| format!("`{raw}` is not an i32"))?),
        ValType::I64 => Value::I64(raw.parse().with_context(|| format!("`{raw}` is not an i64"))?),
        ValType::F32 => Value::F32(raw.parse().with_context(|| format!("`{raw}` is not an f32"))?),
        ValType::F64 => Value::F64(raw.parse().with_context(|| format!("`{raw}` is not an f64"))?),
    };
    Ok(value)
}

fn run_check(input: PathBuf, table: TableKind, deny_unused: bool) -> Result<()> {
    eprintln!("moonlink: checking {}", input.display());

    let wasm_bytes =
        fs::read(&input).with_context(|| format!("failed to read {}", input.display()))?;
    let table = build_table(table, &TableOptions::default())?;
    let options = LinkOptions { deny_unused };

    let problems = check(&wasm_bytes, &table, &options).context("check failed")?;
    for problem in &problems {
        eprintln!("error: {problem}");
    }
    if !problems.is_empty() {
        bail!("{} linkage error(s)", problems.len());
    }

    eprintln!("moonlink: all imports resolved");
    Ok(())
}

fn run_list(table: TableKind) -> Result<()> {
    let table = build_table(table, &TableOptions::default())?;
    for (namespace, name, func) in table.iter() {
        println!("{namespace}.{name}: {}", func.ty());
    }
    Ok(())
}

fn run_call(
    table: TableKind,
    seed: Option<u64>,
    namespace: &str,
    name: &str,
    raw_args: &[String],
) -> Result<()> {
    let options = TableOptions { random_seed: seed };
    let table = build_table(table, &options)?;
    let func = table
        .get(namespace, name)
        .with_context(|| format!("no binding `{namespace}.{name}` in this table"))?;

    let params = func.ty().params();
    if params.len() != raw_args.len() {
        bail!(
            "`{namespace}.{name}` takes {} argument(s) ({}), got {}",
            params.len(),
            func.ty(),
            raw_args.len()
        );
    }
    let args = raw_args
        .iter()
        .zip(params)
        .map(|(raw, ty)| parse_value(raw, *ty))
        .collect::<Result<Vec<_>>>()?;

    let result = func
        .call(&args)
        .map_err(|trap| anyhow::anyhow!("`{namespace}.{name}` trapped: {trap}"))?;
    match result {
        Some(value) => println!("{value}"),
        None => println!("()"),
    }
    Ok(())
}

fn run_bindgen(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    eprintln!("moonlink: generating host traits for {}", input.display());

    let wasm_bytes =
        fs::read(&input).with_context(|| format!("failed to read {}", input.display()))?;
    let rust_code = generate_bindings(&wasm_bytes).context("binding generation failed")?;

    if let Some(output_path) = output {
        fs::write(&output_path, &rust_code)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        eprintln!("moonlink: wrote {}", output_path.display());
    } else {
        print!("{}", rust_code);
    }
    Ok(())
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Check {
            input,
            table,
            deny_unused,
        } => run_check(input, table, deny_unused),
        Command::List { table } => run_list(table),
        Command::Call {
            table,
            seed,
            namespace,
            name,
            args,
        } => run_call(table, seed, &namespace, &name, &args),
        Command::Bindgen { input, output } => run_bindgen(input, output),
    }
}
