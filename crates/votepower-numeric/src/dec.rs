use core::cmp::Ordering;
use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use core::str::FromStr;

use num_bigint::{BigInt, Sign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::DecError;

/// Number of fractional decimal places
pub const PRECISION: usize = 18;

/// 10^PRECISION
const PRECISION_MULTIPLIER: u64 = 1_000_000_000_000_000_000;

/// 10^PRECISION / 2, the banker's rounding midpoint
const HALF_PRECISION_MULTIPLIER: u64 = 500_000_000_000_000_000;

fn precision_multiplier() -> BigInt {
    BigInt::from(PRECISION_MULTIPLIER)
}

/// Fixed-point decimal with 18 fractional digits
///
/// Equality is exact value comparison.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(BigInt);

impl Dec {
    pub fn zero() -> Self {
        Dec(BigInt::from(0u8))
    }

    pub fn one() -> Self {
        Dec(precision_multiplier())
    }

    /// Integer value `i` as a decimal
    pub fn new(i: i64) -> Self {
        Dec(BigInt::from(i) * precision_multiplier())
    }

    pub fn is_zero(&self) -> bool {
        self.0.sign() == Sign::NoSign
    }

    pub fn is_negative(&self) -> bool {
        self.0.sign() == Sign::Minus
    }

    pub fn is_positive(&self) -> bool {
        self.0.sign() == Sign::Plus
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() {
            -self
        } else {
            self.clone()
        }
    }

    /// Division returning `None` for a zero divisor
    pub fn checked_div(&self, rhs: &Dec) -> Option<Dec> {
        if rhs.is_zero() {
            return None;
        }
        // scale twice: once for the result, once for the rounding step
        let scaled = &self.0 * precision_multiplier() * precision_multiplier();
        Some(Dec(chop_precision_and_round(scaled / &rhs.0)))
    }

    fn mul_dec(&self, rhs: &Dec) -> Dec {
        Dec(chop_precision_and_round(&self.0 * &rhs.0))
    }

    fn div_dec(&self, rhs: &Dec) -> Dec {
        match self.checked_div(rhs) {
            Some(quo) => quo,
            None => panic!("decimal division by zero"),
        }
    }
}

/// Drop PRECISION digits from `d`, rounding half to even.
fn chop_precision_and_round(d: BigInt) -> BigInt {
    if d.sign() == Sign::Minus {
        return -chop_precision_and_round(-d);
    }

    let precision = precision_multiplier();
    let quo = &d / &precision;
    let rem = &d % &precision;

    if rem.sign() == Sign::NoSign {
        return quo;
    }

    match rem.cmp(&BigInt::from(HALF_PRECISION_MULTIPLIER)) {
        Ordering::Less => quo,
        Ordering::Greater => quo + BigInt::from(1u8),
        Ordering::Equal => {
            let is_even = (&quo % BigInt::from(2u8)).sign() == Sign::NoSign;
            if is_even {
                quo
            } else {
                quo + BigInt::from(1u8)
            }
        }
    }
}

impl Default for Dec {
    fn default() -> Self {
        Dec::zero()
    }
}

impl From<i64> for Dec {
    fn from(i: i64) -> Self {
        Dec::new(i)
    }
}

impl From<u64> for Dec {
    fn from(i: u64) -> Self {
        Dec(BigInt::from(i) * precision_multiplier())
    }
}

impl From<usize> for Dec {
    fn from(i: usize) -> Self {
        Dec(BigInt::from(i) * precision_multiplier())
    }
}

impl FromStr for Dec {
    type Err = DecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if body.is_empty() {
            return Err(DecError::Empty);
        }

        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac_part)) => {
                if int_part.is_empty() || frac_part.is_empty() {
                    return Err(DecError::InvalidCharacter(s.to_string()));
                }
                (int_part, frac_part)
            }
            None => (body, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(DecError::InvalidCharacter(s.to_string()));
        }
        if frac_part.len() > PRECISION {
            return Err(DecError::TooMuchPrecision {
                got: frac_part.len(),
                max: PRECISION,
            });
        }

        let mut digits = String::with_capacity(int_part.len() + PRECISION);
        digits.push_str(int_part);
        digits.push_str(frac_part);
        digits.extend(core::iter::repeat('0').take(PRECISION - frac_part.len()));

        let magnitude: BigInt = digits
            .parse()
            .map_err(|_| DecError::InvalidCharacter(s.to_string()))?;
        Ok(Dec(if negative { -magnitude } else { magnitude }))
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.magnitude().to_string();
        let sign = if self.is_negative() { "-" } else { "" };

        if digits.len() <= PRECISION {
            write!(f, "{}0.{:0>width$}", sign, digits, width = PRECISION)
        } else {
            let (int_part, frac_part) = digits.split_at(digits.len() - PRECISION);
            write!(f, "{}{}.{}", sign, int_part, frac_part)
        }
    }
}

impl fmt::Debug for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dec({})", self)
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, |$a:ident, $b:ident| $body:expr) => {
        impl $trait<&Dec> for &Dec {
            type Output = Dec;
            fn $method(self, rhs: &Dec) -> Dec {
                let ($a, $b) = (self, rhs);
                $body
            }
        }

        impl $trait<Dec> for Dec {
            type Output = Dec;
            fn $method(self, rhs: Dec) -> Dec {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&Dec> for Dec {
            type Output = Dec;
            fn $method(self, rhs: &Dec) -> Dec {
                (&self).$method(rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, |a, b| Dec(&a.0 + &b.0));
impl_binary_op!(Sub, sub, |a, b| Dec(&a.0 - &b.0));
impl_binary_op!(Mul, mul, |a, b| a.mul_dec(b));
impl_binary_op!(Div, div, |a, b| a.div_dec(b));

impl Neg for Dec {
    type Output = Dec;
    fn neg(self) -> Dec {
        Dec(-self.0)
    }
}

impl Neg for &Dec {
    type Output = Dec;
    fn neg(self) -> Dec {
        Dec(-&self.0)
    }
}

impl AddAssign<&Dec> for Dec {
    fn add_assign(&mut self, rhs: &Dec) {
        self.0 += &rhs.0;
    }
}

impl AddAssign<Dec> for Dec {
    fn add_assign(&mut self, rhs: Dec) {
        self.0 += rhs.0;
    }
}

impl SubAssign<&Dec> for Dec {
    fn sub_assign(&mut self, rhs: &Dec) {
        self.0 -= &rhs.0;
    }
}

impl Sum for Dec {
    fn sum<I: Iterator<Item = Dec>>(iter: I) -> Dec {
        iter.fold(Dec::zero(), |acc, d| acc + d)
    }
}

impl<'a> Sum<&'a Dec> for Dec {
    fn sum<I: Iterator<Item = &'a Dec>>(iter: I) -> Dec {
        iter.fold(Dec::zero(), |acc, d| acc + d)
    }
}
