//! Physical unit tags for exchanged fields.
//!
//! Every field layout carries a [`Unit`]: a compact SI dimension vector over
//! mass, length, time and temperature. The coupling layer never converts
//! units; the tag exists so that mismatched producers and consumers are
//! visible in diagnostics rather than silently exchanging wrong quantities.

use std::fmt;
use std::ops::{Div, Mul};

/// SI dimension vector (kg, m, s, K exponents).
///
/// Composable with `*` and `/`:
///
/// ```
/// use surface_coupling::field::Unit;
///
/// let momentum_flux = Unit::PASCAL;
/// assert_eq!(Unit::KG / Unit::M / Unit::S / Unit::S / Unit::M, momentum_flux);
/// assert_eq!(format!("{momentum_flux}"), "kg m^-1 s^-2");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Unit {
    kg: i8,
    m: i8,
    s: i8,
    k: i8,
}

impl Unit {
    /// Build a unit from raw SI exponents.
    pub const fn new(kg: i8, m: i8, s: i8, k: i8) -> Self {
        Self { kg, m, s, k }
    }

    /// Dimensionless quantity (mixing ratios, albedos, ...).
    pub const NONDIM: Self = Self::new(0, 0, 0, 0);

    /// Kilogram.
    pub const KG: Self = Self::new(1, 0, 0, 0);

    /// Meter (heights, depths).
    pub const M: Self = Self::new(0, 1, 0, 0);

    /// Second.
    pub const S: Self = Self::new(0, 0, 1, 0);

    /// Kelvin (temperatures).
    pub const KELVIN: Self = Self::new(0, 0, 0, 1);

    /// Meter per second (winds).
    pub const M_PER_S: Self = Self::new(0, 1, -1, 0);

    /// Pascal (pressures, momentum fluxes).
    pub const PASCAL: Self = Self::new(1, -1, -2, 0);

    /// Kilogram per cubic meter (densities).
    pub const KG_PER_M3: Self = Self::new(1, -3, 0, 0);

    /// Kilogram per square meter per second (precipitation mass fluxes).
    pub const KG_PER_M2_PER_S: Self = Self::new(1, -2, -1, 0);

    /// Watt per square meter (radiative and turbulent energy fluxes).
    pub const W_PER_M2: Self = Self::new(1, 0, -3, 0);

    /// Whether this is the dimensionless unit.
    #[inline]
    pub const fn is_nondim(self) -> bool {
        self.kg == 0 && self.m == 0 && self.s == 0 && self.k == 0
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::NONDIM
    }
}

impl Mul for Unit {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.kg + rhs.kg,
            self.m + rhs.m,
            self.s + rhs.s,
            self.k + rhs.k,
        )
    }
}

impl Div for Unit {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::new(
            self.kg - rhs.kg,
            self.m - rhs.m,
            self.s - rhs.s,
            self.k - rhs.k,
        )
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nondim() {
            return write!(f, "1");
        }
        let mut first = true;
        for (symbol, exp) in [("kg", self.kg), ("m", self.m), ("s", self.s), ("K", self.k)] {
            if exp == 0 {
                continue;
            }
            if !first {
                write!(f, " ")?;
            }
            first = false;
            if exp == 1 {
                write!(f, "{symbol}")?;
            } else {
                write!(f, "{symbol}^{exp}")?;
            }
        }
        Ok(())
    }
}
