//! Wad - 18-decimal fixed-point amount backed by a 256-bit integer
//!
//! Every monetary quantity the vault contracts expose (collateral, supply,
//! peg, caps) is a `uint256` with 18 implied fractional digits. `Wad` keeps
//! that representation end to end so previews never pass through `f64`.
//!
//! Serialized as a decimal string of the raw integer (`"1500000000000000000"`),
//! matching how the frontend passes bigint values around.

use std::fmt;
use std::str::FromStr;

use ethereum_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MathError;

/// Number of implied fractional digits
pub const WAD_DECIMALS: u32 = 18;

/// 1.0 in wad units (10^18)
pub const WAD: U256 = U256([1_000_000_000_000_000_000, 0, 0, 0]);

/// Fixed-point amount with 18 implied decimals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wad(U256);

impl Wad {
    pub const ZERO: Wad = Wad(U256([0, 0, 0, 0]));
    pub const ONE: Wad = Wad(WAD);

    /// Wrap a raw scaled integer
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Whole units, e.g. `from_units(150)` is 150.0
    pub fn from_units(units: u64) -> Self {
        Self(U256::from(units) * WAD)
    }

    /// Raw scaled integer
    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Wad) -> Option<Wad> {
        self.0.checked_add(other.0).map(Wad)
    }

    /// Subtraction floored at zero
    pub fn saturating_sub(self, other: Wad) -> Wad {
        Wad(self.0.saturating_sub(other.0))
    }

    /// Parse a human-readable decimal amount ("1.5" -> 1.5e18)
    pub fn from_units_str(input: &str) -> Result<Self, MathError> {
        let invalid = |reason: &str| MathError::InvalidAmount {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let value = Decimal::from_str(input.trim()).map_err(|e| invalid(&e.to_string()))?;
        if value < Decimal::ZERO {
            return Err(invalid("amount must be non-negative"));
        }
        let value = value.normalize();
        let scale = value.scale();
        if scale > WAD_DECIMALS {
            return Err(invalid("more than 18 fractional digits"));
        }

        // Non-negative after the check above, so the mantissa fits in u128
        let mantissa = U256::from(value.mantissa().unsigned_abs());
        let factor = U256::exp10((WAD_DECIMALS - scale) as usize);
        mantissa
            .checked_mul(factor)
            .map(Wad)
            .ok_or_else(|| invalid("amount exceeds 256 bits"))
    }

    /// Format as a human-readable decimal ("1.5"), trailing zeros trimmed
    pub fn to_units_string(&self) -> String {
        let whole = self.0 / WAD;
        let frac = self.0 % WAD;
        if frac.is_zero() {
            return whole.to_string();
        }
        let frac = format!("{:0>18}", frac.to_string());
        format!("{}.{}", whole, frac.trim_end_matches('0'))
    }
}

impl From<U256> for Wad {
    fn from(raw: U256) -> Self {
        Self(raw)
    }
}

impl From<Wad> for U256 {
    fn from(wad: Wad) -> Self {
        wad.0
    }
}

impl fmt::Display for Wad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Wad {
    type Err = MathError;

    /// Parses the raw decimal integer (wei-style), not human units
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_dec_str(s.trim())
            .map(Wad)
            .map_err(|e| MathError::InvalidAmount {
                input: s.to_string(),
                reason: format!("{:?}", e),
            })
    }
}

impl Serialize for Wad {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WadRepr {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for Wad {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WadRepr::deserialize(deserializer)? {
            WadRepr::Text(s) => s.parse().map_err(serde::de::Error::custom),
            WadRepr::Number(n) => Ok(Wad(U256::from(n))),
        }
    }
}
