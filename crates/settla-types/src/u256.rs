use crate::error::TypesError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// 256-bit unsigned integer for balances, values and gas prices.
///
/// Stored as 4 x u64 in little-endian limb order.
///
/// No `Add`/`Sub`/`Mul` operator impls. Arithmetic goes through the
/// `checked_*` methods, which return `None` on overflow.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256([u64; 4]);

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..4).rev() {
            match self.0[i].cmp(&other.0[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl U256 {
    pub const ZERO: Self = Self([0, 0, 0, 0]);
    pub const ONE: Self = Self([1, 0, 0, 0]);
    pub const MAX: Self = Self([u64::MAX, u64::MAX, u64::MAX, u64::MAX]);

    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        Self(limbs)
    }

    pub const fn as_limbs(&self) -> &[u64; 4] {
        &self.0
    }

    pub const fn from_u64(val: u64) -> Self {
        Self([val, 0, 0, 0])
    }

    pub const fn from_u128(val: u128) -> Self {
        Self([val as u64, (val >> 64) as u64, 0, 0])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&l| l == 0)
    }

    /// Checked addition
    pub fn checked_add(&self, rhs: &Self) -> Option<Self> {
        let mut result = [0u64; 4];
        let mut carry = false;

        for (i, limb) in result.iter_mut().enumerate() {
            let (sum, o1) = self.0[i].overflowing_add(rhs.0[i]);
            let (sum, o2) = sum.overflowing_add(carry as u64);
            *limb = sum;
            carry = o1 || o2;
        }

        (!carry).then_some(Self(result))
    }

    /// Checked subtraction
    pub fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        if self < rhs {
            return None;
        }

        let mut result = [0u64; 4];
        let mut borrow = false;

        for (i, limb) in result.iter_mut().enumerate() {
            let (diff, u1) = self.0[i].overflowing_sub(rhs.0[i]);
            let (diff, u2) = diff.overflowing_sub(borrow as u64);
            *limb = diff;
            borrow = u1 || u2;
        }

        Some(Self(result))
    }

    /// Checked multiplication.
    ///
    /// Computes the full 512-bit schoolbook product and fails if any of the
    /// upper four limbs is non-zero.
    pub fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        let mut wide = [0u64; 8];

        for i in 0..4 {
            let mut carry = 0u128;
            for j in 0..4 {
                let cur = wide[i + j] as u128
                    + (self.0[i] as u128) * (rhs.0[j] as u128)
                    + carry;
                wide[i + j] = cur as u64;
                carry = cur >> 64;
            }
            wide[i + 4] = carry as u64;
        }

        if wide[4..].iter().any(|&l| l != 0) {
            return None;
        }
        Some(Self([wide[0], wide[1], wide[2], wide[3]]))
    }

    /// Divide by a small divisor, returning quotient and remainder.
    /// Returns `None` for a zero divisor.
    pub fn checked_div_rem_u64(&self, divisor: u64) -> Option<(Self, u64)> {
        if divisor == 0 {
            return None;
        }

        let mut quotient = [0u64; 4];
        let mut rem = 0u128;
        for i in (0..4).rev() {
            let cur = (rem << 64) | self.0[i] as u128;
            quotient[i] = (cur / divisor as u128) as u64;
            rem = cur % divisor as u128;
        }

        Some((Self(quotient), rem as u64))
    }

    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            let mut limb = [0u8; 8];
            limb.copy_from_slice(chunk);
            limbs[3 - i] = u64::from_be_bytes(limb);
        }
        Self(limbs)
    }

    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for i in 0..4 {
            bytes[i * 8..(i + 1) * 8].copy_from_slice(&self.0[i].to_le_bytes());
        }
        bytes
    }

    /// Parse from a decimal string. Rejects empty input, signs and
    /// non-digit characters.
    pub fn from_decimal_str(s: &str) -> Result<Self, TypesError> {
        if s.is_empty() {
            return Err(TypesError::InvalidU256String(s.to_string()));
        }

        let ten = Self::from_u64(10);
        let mut result = Self::ZERO;

        for c in s.chars() {
            let digit = c
                .to_digit(10)
                .ok_or_else(|| TypesError::InvalidU256String(s.to_string()))?;
            result = result
                .checked_mul(&ten)
                .and_then(|r| r.checked_add(&Self::from_u64(digit as u64)))
                .ok_or(TypesError::U256Overflow)?;
        }

        Ok(result)
    }
}

impl From<u64> for U256 {
    fn from(val: u64) -> Self {
        Self::from_u64(val)
    }
}

impl From<u128> for U256 {
    fn from(val: u128) -> Self {
        Self::from_u128(val)
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.pad("0");
        }

        let mut digits = Vec::with_capacity(78);
        let mut n = *self;
        while !n.is_zero() {
            let (q, r) = n.checked_div_rem_u64(10).ok_or(fmt::Error)?;
            digits.push(b'0' + r as u8);
            n = q;
        }
        digits.reverse();

        let s = String::from_utf8(digits).map_err(|_| fmt::Error)?;
        f.pad(&s)
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({})", self)
    }
}

impl FromStr for U256 {
    type Err = TypesError;

    /// Decimal, or big-endian hex with a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(hex_part) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let hex_part = if hex_part.len() % 2 == 1 {
                format!("0{}", hex_part)
            } else {
                hex_part.to_string()
            };
            let bytes = hex::decode(&hex_part)?;
            if bytes.len() > 32 {
                return Err(TypesError::U256Overflow);
            }
            let mut padded = [0u8; 32];
            padded[32 - bytes.len()..].copy_from_slice(&bytes);
            Ok(Self::from_be_bytes(padded))
        } else {
            Self::from_decimal_str(s)
        }
    }
}
