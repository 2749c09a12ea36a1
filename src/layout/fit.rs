use super::Margins;
use crate::image::Dimensions;
use crate::pagesize::{self, PageSize};
use crate::rect::Rect;
use crate::units::*;

/// Where an image goes on its page, measured in millimetres from the page's top-left
/// corner (the way a user reads the page, not PDF user space).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    pub x: Mm,
    pub y: Mm,
    pub width: Mm,
    pub height: Mm,
}

impl Placement {
    /// Converts to a rectangle in PDF user space, whose origin is the bottom-left corner
    pub fn to_rect(&self, page_size: PageSize) -> Rect {
        let (_, page_height) = pagesize::to_points(page_size);
        let x1: Pt = self.x.into();
        let x2: Pt = (self.x + self.width).into();
        let top: Pt = self.y.into();
        let bottom: Pt = (self.y + self.height).into();
        Rect {
            x1,
            y1: page_height - bottom,
            x2,
            y2: page_height - top,
        }
    }
}

/// Scales `natural` to fill the usable width of the page, unless that would make it
/// taller than the usable height, in which case it fills the usable height instead.
/// Aspect ratio is always preserved and neither bound is ever exceeded.
///
/// Returns [None] if the image has a zero side and so no aspect ratio.
pub fn fit_image(natural: Dimensions, page_size: PageSize, margins: &Margins) -> Option<Placement> {
    let aspect_ratio = natural.aspect_ratio()?;
    let (usable_width, usable_height) = margins.usable_area(page_size);

    let mut width = usable_width;
    let mut height = width / aspect_ratio;

    if height > usable_height {
        height = usable_height;
        width = height * aspect_ratio;
    }

    Some(Placement {
        x: margins.left,
        y: margins.top,
        width,
        height,
    })
}
