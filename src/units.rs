//! Length units used throughout the crate.
//!
//! PDF user space is measured in points ([`Pt`], 1/72 of an inch). Page geometry and
//! image fitting are done in millimetres ([`Mm`]) so that the fixed A4 layout can be
//! expressed exactly, and converted to points only when the document is written.

use derive_more::{Add, AddAssign, Deref, DerefMut, Display, From, Into, Sub, SubAssign, Sum};
use std::ops::{Div, Mul};

const POINTS_PER_INCH: f32 = 72.0;
const MM_PER_INCH: f32 = 25.4;

/// A length in PDF points
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Deref,
    DerefMut,
    From,
    Into,
    Sum,
    Display,
)]
#[display("{_0}pt")]
pub struct Pt(pub f32);

/// A length in millimetres
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Deref,
    DerefMut,
    From,
    Into,
    Sum,
    Display,
)]
#[display("{_0}mm")]
pub struct Mm(pub f32);

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Self {
        Pt(mm.0 * POINTS_PER_INCH / MM_PER_INCH)
    }
}

macro_rules! scalar_ops {
    ($unit:ident) => {
        impl Mul<f32> for $unit {
            type Output = $unit;

            fn mul(self, rhs: f32) -> $unit {
                $unit(self.0 * rhs)
            }
        }

        impl Div<f32> for $unit {
            type Output = $unit;

            fn div(self, rhs: f32) -> $unit {
                $unit(self.0 / rhs)
            }
        }

        /// Dividing two lengths of the same unit gives a plain ratio
        impl Div<$unit> for $unit {
            type Output = f32;

            fn div(self, rhs: $unit) -> f32 {
                self.0 / rhs.0
            }
        }
    };
}

scalar_ops!(Pt);
scalar_ops!(Mm);
