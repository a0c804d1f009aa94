//! Operator overloads.
//!
//! Operators panic with the error's message on failure; use
//! [`ITensor::contract`], [`ITensor::product`], [`ITensor::try_add_assign`]
//! and [`ITensor::try_sub_assign`] to handle errors instead.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::TensorError;
use crate::index::IndexVal;

use super::ITensor;

fn ok_or_panic<T>(op: &str, r: Result<T, TensorError>) -> T {
    match r {
        Ok(v) => v,
        Err(err) => panic!("ITensor {op} failed: {err}"),
    }
}

// Contracting product ---------------------------------------------------

impl Mul<&ITensor> for &ITensor {
    type Output = ITensor;

    fn mul(self, rhs: &ITensor) -> ITensor {
        ok_or_panic("*", self.contract(rhs))
    }
}

impl MulAssign<&ITensor> for ITensor {
    fn mul_assign(&mut self, rhs: &ITensor) {
        *self = &*self * rhs;
    }
}

// Non-contracting product -----------------------------------------------

impl Div<&ITensor> for &ITensor {
    type Output = ITensor;

    fn div(self, rhs: &ITensor) -> ITensor {
        ok_or_panic("/", self.product(rhs))
    }
}

impl DivAssign<&ITensor> for ITensor {
    fn div_assign(&mut self, rhs: &ITensor) {
        *self = &*self / rhs;
    }
}

// Addition and subtraction ------------------------------------------------

impl AddAssign<&ITensor> for ITensor {
    fn add_assign(&mut self, rhs: &ITensor) {
        ok_or_panic("+=", self.try_add_assign(rhs));
    }
}

impl SubAssign<&ITensor> for ITensor {
    fn sub_assign(&mut self, rhs: &ITensor) {
        ok_or_panic("-=", self.try_sub_assign(rhs));
    }
}

impl Add<&ITensor> for &ITensor {
    type Output = ITensor;

    fn add(self, rhs: &ITensor) -> ITensor {
        let mut res = self.clone();
        res += rhs;
        res
    }
}

impl Sub<&ITensor> for &ITensor {
    type Output = ITensor;

    fn sub(self, rhs: &ITensor) -> ITensor {
        let mut res = self.clone();
        res -= rhs;
        res
    }
}

/// Owned and mixed forms of a binary operator, forwarding to `&a op &b`.
macro_rules! forward_binop {
    ($Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident) => {
        impl $Op<ITensor> for ITensor {
            type Output = ITensor;

            fn $op(self, rhs: ITensor) -> ITensor {
                (&self).$op(&rhs)
            }
        }

        impl $Op<&ITensor> for ITensor {
            type Output = ITensor;

            fn $op(self, rhs: &ITensor) -> ITensor {
                (&self).$op(rhs)
            }
        }

        impl $Op<ITensor> for &ITensor {
            type Output = ITensor;

            fn $op(self, rhs: ITensor) -> ITensor {
                self.$op(&rhs)
            }
        }

        impl $OpAssign<ITensor> for ITensor {
            fn $op_assign(&mut self, rhs: ITensor) {
                self.$op_assign(&rhs);
            }
        }
    };
}

forward_binop!(Mul, mul, MulAssign, mul_assign);
forward_binop!(Div, div, DivAssign, div_assign);
forward_binop!(Add, add, AddAssign, add_assign);
forward_binop!(Sub, sub, SubAssign, sub_assign);

impl Neg for ITensor {
    type Output = ITensor;

    fn neg(mut self) -> ITensor {
        self.negate();
        self
    }
}

impl Neg for &ITensor {
    type Output = ITensor;

    fn neg(self) -> ITensor {
        -self.clone()
    }
}

// Scalars ---------------------------------------------------------------

impl MulAssign<f64> for ITensor {
    fn mul_assign(&mut self, fac: f64) {
        self.scale_by(fac);
    }
}

impl Mul<f64> for ITensor {
    type Output = ITensor;

    fn mul(mut self, fac: f64) -> ITensor {
        self *= fac;
        self
    }
}

impl Mul<f64> for &ITensor {
    type Output = ITensor;

    fn mul(self, fac: f64) -> ITensor {
        self.clone() * fac
    }
}

impl Mul<ITensor> for f64 {
    type Output = ITensor;

    fn mul(self, t: ITensor) -> ITensor {
        t * self
    }
}

impl Mul<&ITensor> for f64 {
    type Output = ITensor;

    fn mul(self, t: &ITensor) -> ITensor {
        t * self
    }
}

// Index values ------------------------------------------------------------

impl Mul<&IndexVal> for &ITensor {
    type Output = ITensor;

    fn mul(self, iv: &IndexVal) -> ITensor {
        ok_or_panic("* IndexVal", self.contract_index_val(iv))
    }
}

impl MulAssign<&IndexVal> for ITensor {
    fn mul_assign(&mut self, iv: &IndexVal) {
        *self = &*self * iv;
    }
}
