// Include guest modules assembled by build.rs (in OUT_DIR)
include!(concat!(env!("OUT_DIR"), "/mod.rs"));

use moonlink::{ImportTable, TableKind, TableOptions};

/// Seed used wherever a test needs `Math.random` to be reproducible.
pub const TEST_SEED: u64 = 0x6d6f_6f6e;

/// Build a course table with the reproducible test seed.
pub fn seeded_table(kind: TableKind) -> ImportTable {
    match kind.build(&TableOptions {
        random_seed: Some(TEST_SEED),
    }) {
        Ok(table) => table,
        Err(err) => panic!("course table `{kind}` failed to build: {err}"),
    }
}
