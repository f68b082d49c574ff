//! FFI example table: a constant, π, a random source and an adder.

use std::f64::consts::PI;

use moonlink_runtime::{ConstructionError, ImportTable};

use super::{RandomSource, TableOptions};

pub const UNIVERSE: &str = "universe";
pub const MATH: &str = "Math";
pub const RUNTIME: &str = "Runtime";

/// The answer `universe.answer` returns.
pub const ANSWER: i32 = 42;

pub fn import_table(options: &TableOptions) -> Result<ImportTable, ConstructionError> {
    let random = RandomSource::new(options.random_seed);
    ImportTable::builder()
        .func(UNIVERSE, "answer", || ANSWER)
        .func(MATH, "get_pi", || PI)
        .func(MATH, "random", move || random.next_f64())
        // MoonBit `Int` is 32-bit; the guest sees the sum truncated to i32.
        .func(RUNTIME, "add", |a: i32, b: i32| a.wrapping_add(b))
        .build()
}
