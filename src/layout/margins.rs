use crate::pagesize::PageSize;
use crate::units::Mm;

/// Margins are the blank border left on every side of a page. Images are fitted
/// within the area they enclose, and the same area is written as the `ArtBox` of each
/// [`Page`](crate::Page) in the generated PDF
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Margins {
    pub top: Mm,
    pub right: Mm,
    pub bottom: Mm,
    pub left: Mm,
}

impl Margins {
    /// Create margins where all values are equal
    pub fn all<D: Into<Mm>>(value: D) -> Margins {
        let value: Mm = value.into();
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// The (width, height) left for content on a page of the given size
    pub fn usable_area(&self, page_size: PageSize) -> (Mm, Mm) {
        (
            page_size.0 - self.left - self.right,
            page_size.1 - self.top - self.bottom,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize::{A4, DEFAULT_MARGIN};

    #[test]
    fn a4_with_default_margin_leaves_190_by_277() {
        let margins = Margins::all(DEFAULT_MARGIN);
        assert_eq!(margins.usable_area(A4), (Mm(190.0), Mm(277.0)));
    }

    #[test]
    fn uneven_margins() {
        let margins = Margins {
            top: Mm(5.0),
            right: Mm(10.0),
            bottom: Mm(15.0),
            left: Mm(20.0),
        };
        assert_eq!(margins.usable_area(A4), (Mm(180.0), Mm(277.0)));
        assert_eq!(Margins::default().usable_area(A4), A4);
    }
}
