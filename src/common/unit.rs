//! Unit conversion utilities.
//!
//! WordprocessingML stores every length as an integer count of a field-specific
//! subunit: border widths in eighths of a point, spacing and indentation in
//! twentieths of a point (twips), font sizes in half-points. [`Length`] carries
//! the subunit in its type so a value can never be written to a field that
//! expects a different ratio.

use crate::ooxml::error::{OoxmlError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

pub const POINTS_PER_INCH: f64 = 72.0;
pub const POINTS_PER_CM: f64 = 72.0 / 2.54;
pub const TWIPS_PER_POINT: u32 = 20;
pub const EIGHTHS_PER_POINT: u32 = 8;
pub const HALF_POINTS_PER_POINT: u32 = 2;

/// A WordprocessingML measurement subunit.
pub trait Unit {
    /// Number of subunits in one point.
    const PER_POINT: u32;
    /// Short suffix used by `Display`.
    const SUFFIX: &'static str;
}

/// Eighths of a point (`ST_EighthPointMeasure`), used for border widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EighthPoint {}

/// Twentieths of a point (`ST_TwipsMeasure`), used for spacing and indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Twip {}

/// Half-points (`ST_HpsMeasure`), used for font sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HalfPoint {}

impl Unit for EighthPoint {
    const PER_POINT: u32 = EIGHTHS_PER_POINT;
    const SUFFIX: &'static str = "/8pt";
}

impl Unit for Twip {
    const PER_POINT: u32 = TWIPS_PER_POINT;
    const SUFFIX: &'static str = "tw";
}

impl Unit for HalfPoint {
    const PER_POINT: u32 = HALF_POINTS_PER_POINT;
    const SUFFIX: &'static str = "hp";
}

/// Border width measure. `Uom::from_points(1.5)?.size() == 12`.
pub type Uom = Length<EighthPoint>;
/// Spacing and indentation measure.
pub type Twips = Length<Twip>;
/// Font size measure.
pub type HalfPoints = Length<HalfPoint>;

/// Signed twips (`ST_SignedTwipsMeasure`), used for left and right
/// indentation where a negative value pulls the paragraph into the margin.
///
/// ```rust
/// use longan::common::unit::SignedTwips;
///
/// let outdent = SignedTwips::from_points(-18.0).unwrap();
/// assert_eq!(outdent.size(), -360);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignedTwips(i32);

impl SignedTwips {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn from_subunits(subunits: i32) -> Self {
        Self(subunits)
    }

    /// Create a signed length from points, rounding half away from zero.
    pub fn from_points(points: f64) -> Result<Self> {
        if !points.is_finite() {
            return Err(OoxmlError::InvalidMeasurement(format!(
                "{points}pt is not a finite length"
            )));
        }
        let scaled = (points * TWIPS_PER_POINT as f64).round();
        if scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
            return Err(OoxmlError::InvalidMeasurement(format!(
                "{points}pt exceeds the representable range"
            )));
        }
        Ok(Self(scaled as i32))
    }

    #[inline]
    pub fn from_inches(inches: f64) -> Result<Self> {
        Self::from_points(inches * POINTS_PER_INCH)
    }

    #[inline]
    pub const fn size(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn to_points(self) -> f64 {
        self.0 as f64 / TWIPS_PER_POINT as f64
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl From<Twips> for SignedTwips {
    /// Saturates at `i32::MAX`.
    fn from(twips: Twips) -> Self {
        Self(i32::try_from(twips.size()).unwrap_or(i32::MAX))
    }
}

impl fmt::Debug for SignedTwips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}tw", self.0)
    }
}

impl fmt::Display for SignedTwips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}pt", self.to_points())
    }
}

/// Non-negative length stored canonically as an integer number of `U` subunits.
///
/// # Examples
///
/// ```rust
/// use longan::common::unit::{Twips, Uom};
///
/// let width = Uom::from_points(1.5).unwrap();
/// assert_eq!(width.size(), 12);
/// assert_eq!(width.to_points(), 1.5);
///
/// let indent = Twips::from_inches(0.5).unwrap();
/// assert_eq!(indent.size(), 720);
/// ```
pub struct Length<U: Unit> {
    subunits: u32,
    unit: PhantomData<U>,
}

impl<U: Unit> Length<U> {
    /// The zero length.
    pub const ZERO: Self = Self::from_subunits(0);

    /// Create a length from a raw subunit count.
    #[inline]
    pub const fn from_subunits(subunits: u32) -> Self {
        Self {
            subunits,
            unit: PhantomData,
        }
    }

    /// Create a length from points, rounding half away from zero to the
    /// nearest subunit.
    ///
    /// Fails with [`OoxmlError::InvalidMeasurement`] for negative, non-finite
    /// or out-of-range input.
    pub fn from_points(points: f64) -> Result<Self> {
        if !points.is_finite() || points < 0.0 {
            return Err(OoxmlError::InvalidMeasurement(format!(
                "{points}pt is not a non-negative finite length"
            )));
        }
        let scaled = (points * U::PER_POINT as f64).round();
        if scaled > u32::MAX as f64 {
            return Err(OoxmlError::InvalidMeasurement(format!(
                "{points}pt exceeds the representable range"
            )));
        }
        Ok(Self::from_subunits(scaled as u32))
    }

    /// Create a length from inches.
    #[inline]
    pub fn from_inches(inches: f64) -> Result<Self> {
        Self::from_points(inches * POINTS_PER_INCH)
    }

    /// Create a length from centimeters.
    #[inline]
    pub fn from_cm(cm: f64) -> Result<Self> {
        Self::from_points(cm * POINTS_PER_CM)
    }

    /// Size in subunits, the value written to XML.
    #[inline]
    pub const fn size(self) -> u32 {
        self.subunits
    }

    /// Length in points.
    #[inline]
    pub fn to_points(self) -> f64 {
        self.subunits as f64 / U::PER_POINT as f64
    }

    /// Length in inches.
    #[inline]
    pub fn to_inches(self) -> f64 {
        self.to_points() / POINTS_PER_INCH
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.subunits == 0
    }
}

// Manual impls: derives would put bounds on the uninhabited marker type.
impl<U: Unit> Clone for Length<U> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<U: Unit> Copy for Length<U> {}

impl<U: Unit> PartialEq for Length<U> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.subunits == other.subunits
    }
}

impl<U: Unit> Eq for Length<U> {}

impl<U: Unit> PartialOrd for Length<U> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<U: Unit> Ord for Length<U> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.subunits.cmp(&other.subunits)
    }
}

impl<U: Unit> Hash for Length<U> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.subunits.hash(state);
    }
}

impl<U: Unit> Default for Length<U> {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl<U: Unit> fmt::Debug for Length<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.subunits, U::SUFFIX)
    }
}

impl<U: Unit> fmt::Display for Length<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}pt", self.to_points())
    }
}
