//! The course import tables.
//!
//! Each table belongs to one MoonBit compilation unit and has exactly the
//! bindings that unit imports:
//!
//! | table   | namespace  | binding  | signature           |
//! |---------|------------|----------|---------------------|
//! | `lec13` | `math`     | `exp`    | `(f64) -> f64`      |
//! | `lec13` | `math`     | `log`    | `(f64) -> f64`      |
//! | `ffi`   | `universe` | `answer` | `() -> i32`         |
//! | `ffi`   | `Math`     | `get_pi` | `() -> f64`         |
//! | `ffi`   | `Math`     | `random` | `() -> f64`         |
//! | `ffi`   | `Runtime`  | `add`    | `(i32, i32) -> i32` |

use std::fmt;
use std::str::FromStr;

use moonlink_runtime::{ConstructionError, ImportTable};

pub mod ffi;
pub mod lec13;
mod random;

pub use random::RandomSource;

/// Options for building a table.
#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    /// Seed for `Math.random`. `None` draws from OS entropy.
    pub random_seed: Option<u64>,
}

/// Which course table to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TableKind {
    /// Lecture 13: `math.exp` / `math.log`.
    Lec13,
    /// FFI example: `universe`, `Math` and `Runtime`.
    Ffi,
}

impl TableKind {
    pub const ALL: [TableKind; 2] = [TableKind::Lec13, TableKind::Ffi];

    pub fn name(&self) -> &'static str {
        match self {
            TableKind::Lec13 => "lec13",
            TableKind::Ffi => "ffi",
        }
    }

    /// Build a fresh instance of this table.
    pub fn build(&self, options: &TableOptions) -> Result<ImportTable, ConstructionError> {
        let table = match self {
            TableKind::Lec13 => lec13::import_table()?,
            TableKind::Ffi => ffi::import_table(options)?,
        };
        log::info!(
            "built `{}` import table: {} namespaces, {} bindings",
            self.name(),
            table.namespaces().count(),
            table.len()
        );
        Ok(table)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TableKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        TableKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown table `{s}` (expected `lec13` or `ffi`)"))
    }
}
