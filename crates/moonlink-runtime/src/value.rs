//! Numeric value types and function signatures.
//!
//! Host bindings only exchange the four Wasm MVP number types. A signature
//! has at most one result, which is all the MoonBit FFI lowers to.

use alloc::vec::Vec;
use core::fmt;

/// WebAssembly number types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValType {
    I32,
    I64,
    F32,
    F64,
}

impl fmt::Display for ValType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValType::I32 => write!(f, "i32"),
            ValType::I64 => write!(f, "i64"),
            ValType::F32 => write!(f, "f32"),
            ValType::F64 => write!(f, "f64"),
        }
    }
}

/// A single Wasm value passed across the host boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl Value {
    /// The value type of this value.
    pub fn ty(&self) -> ValType {
        match self {
            Value::I32(_) => ValType::I32,
            Value::I64(_) => ValType::I64,
            Value::F32(_) => ValType::F32,
            Value::F64(_) => ValType::F64,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
        }
    }
}

/// Signature of a host function: parameter types and an optional result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FuncType {
    params: Vec<ValType>,
    result: Option<ValType>,
}

impl FuncType {
    pub fn new(params: &[ValType], result: Option<ValType>) -> Self {
        Self {
            params: params.to_vec(),
            result,
        }
    }

    pub fn params(&self) -> &[ValType] {
        &self.params
    }

    pub fn result(&self) -> Option<ValType> {
        self.result
    }
}

/// Formats as `(f64, f64) -> f64`, or `() -> ()` for a nullary procedure.
impl fmt::Display for FuncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, ty) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ty}")?;
        }
        match self.result {
            Some(ty) => write!(f, ") -> {ty}"),
            None => write!(f, ") -> ()"),
        }
    }
}

/// A Rust primitive that maps 1:1 onto a Wasm number type.
pub trait WasmTy: Copy + Send + Sync + 'static {
    const TYPE: ValType;

    /// Extract `Self` from a value of the matching type.
    fn from_value(value: Value) -> Option<Self>;

    fn into_value(self) -> Value;
}

/// Return types a host function may have: a number, or nothing.
pub trait WasmRet: Send + 'static {
    const TYPE: Option<ValType>;

    fn into_ret(self) -> Option<Value>;
}

macro_rules! impl_wasm_ty {
    ($t:ty, $variant:ident) => {
        impl WasmTy for $t {
            const TYPE: ValType = ValType::$variant;

            #[inline]
            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }

            #[inline]
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }

        impl WasmRet for $t {
            const TYPE: Option<ValType> = Some(ValType::$variant);

            #[inline]
            fn into_ret(self) -> Option<Value> {
                Some(Value::$variant(self))
            }
        }

        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_wasm_ty!(i32, I32);
impl_wasm_ty!(i64, I64);
impl_wasm_ty!(f32, F32);
impl_wasm_ty!(f64, F64);

impl WasmRet for () {
    const TYPE: Option<ValType> = None;

    #[inline]
    fn into_ret(self) -> Option<Value> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn value_reports_its_type() {
        assert_eq!(Value::I32(1).ty(), ValType::I32);
        assert_eq!(Value::I64(1).ty(), ValType::I64);
        assert_eq!(Value::F32(1.0).ty(), ValType::F32);
        assert_eq!(Value::F64(1.0).ty(), ValType::F64);
    }

    #[test]
    fn from_value_rejects_other_types() {
        assert_eq!(<i32 as WasmTy>::from_value(Value::I32(7)), Some(7));
        assert_eq!(<i32 as WasmTy>::from_value(Value::I64(7)), None);
        assert_eq!(<f64 as WasmTy>::from_value(Value::F32(1.5)), None);
    }

    #[test]
    fn func_type_display() {
        let binary = FuncType::new(&[ValType::I32, ValType::I32], Some(ValType::I32));
        assert_eq!(binary.to_string(), "(i32, i32) -> i32");

        let nullary = FuncType::new(&[], Some(ValType::F64));
        assert_eq!(nullary.to_string(), "() -> f64");

        let procedure = FuncType::new(&[ValType::F32], None);
        assert_eq!(procedure.to_string(), "(f32) -> ()");
    }

    #[test]
    fn func_type_equality_is_structural() {
        let a = FuncType::new(&[ValType::F64], Some(ValType::F64));
        let b = FuncType::new(&[ValType::F64], Some(ValType::F64));
        let c = FuncType::new(&[ValType::F64], Some(ValType::F32));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn unit_has_no_result() {
        assert_eq!(<() as WasmRet>::TYPE, None);
        assert_eq!(().into_ret(), None);
        assert_eq!(<f32 as WasmRet>::TYPE, Some(ValType::F32));
    }
}
