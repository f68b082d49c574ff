//! Lecture 13 table: natural exponential and logarithm under `math`.

use moonlink_runtime::{ConstructionError, ImportTable};

pub const MATH: &str = "math";

pub fn import_table() -> Result<ImportTable, ConstructionError> {
    ImportTable::builder()
        .func(MATH, "exp", f64::exp)
        .func(MATH, "log", f64::ln)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use moonlink_runtime::{FuncType, ValType, Value};

    fn call(table: &ImportTable, name: &str, x: f64) -> f64 {
        match table.call(MATH, name, &[Value::F64(x)]) {
            Ok(Some(Value::F64(v))) => v,
            other => panic!("math.{name}({x}) returned {other:?}"),
        }
    }

    #[test]
    fn exp_of_zero_is_one() {
        let table = import_table().unwrap();
        assert_eq!(call(&table, "exp", 0.0), 1.0);
    }

    #[test]
    fn log_of_one_is_zero() {
        let table = import_table().unwrap();
        assert_eq!(call(&table, "log", 1.0), 0.0);
    }

    #[test]
    fn log_inverts_exp() {
        let table = import_table().unwrap();
        for x in [-20.0, -1.5, -0.1, 0.0, 0.3, 1.0, 2.5, 10.0, 300.0] {
            let round_trip = call(&table, "log", call(&table, "exp", x));
            assert!(
                (round_trip - x).abs() <= 1e-12 * x.abs().max(1.0),
                "log(exp({x})) = {round_trip}"
            );
        }
    }

    #[test]
    fn edge_values_follow_ieee() {
        let table = import_table().unwrap();
        assert_eq!(call(&table, "log", 0.0), f64::NEG_INFINITY);
        assert!(call(&table, "log", -1.0).is_nan());
        assert_eq!(call(&table, "exp", f64::NEG_INFINITY), 0.0);
        assert_eq!(call(&table, "exp", 1000.0), f64::INFINITY);
    }

    #[test]
    fn exact_key_set() {
        let table = import_table().unwrap();
        let keys: Vec<_> = table.keys().collect();
        assert_eq!(keys, vec![("math", "exp"), ("math", "log")]);
        let unary = FuncType::new(&[ValType::F64], Some(ValType::F64));
        assert!(table.iter().all(|(_, _, func)| func.ty() == &unary));
    }
}
