//! The page geometry every generated document uses.
//!
//! Documents are always A4 portrait with an equal margin on all four sides. Sizes are
//! kept in millimetres so the usable area (190 × 277 mm) is exact.

use crate::units::*;

/// Page dimensions as (width, height) in millimetres.
pub type PageSize = (Mm, Mm);

/// ISO A4, portrait
pub const A4: PageSize = (Mm(210.0), Mm(297.0));

/// Margin applied to every side of every page
pub const DEFAULT_MARGIN: Mm = Mm(10.0);

/// Converts a page size to PDF points, for writing media boxes.
pub fn to_points(size: PageSize) -> (Pt, Pt) {
    (size.0.into(), size.1.into())
}
