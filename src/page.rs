use crate::image::Image;
use crate::layout::Margins;
use crate::pagesize::{self, PageSize};
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::transform::Transform;
use crate::units::*;
use id_arena::Id;
use pdf_writer::{Content, Finish, Name, Pdf, Ref};

/// An image placed on a page
#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    /// The image to draw, as returned by [Document::add_image](crate::Document::add_image)
    pub image_id: Id<Image>,
    /// Where the image is drawn, in PDF user space
    pub position: Rect,
}

/// A single page of the document, holding the images drawn on it
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// The images drawn on the page, in painting order
    pub contents: Vec<ImageLayout>,
}

impl Page {
    /// Create an empty page of the given size, with its content box inset by `margins`
    pub fn new(size: PageSize, margins: &Margins) -> Page {
        let (width, height) = pagesize::to_points(size);
        Page {
            media_box: Rect {
                x1: Pt(0.0),
                y1: Pt(0.0),
                x2: width,
                y2: height,
            },
            content_box: Rect {
                x1: margins.left.into(),
                y1: margins.bottom.into(),
                x2: width - Pt::from(margins.right),
                y2: height - Pt::from(margins.top),
            },
            contents: Vec::default(),
        }
    }

    /// Draw an image on top of everything already on the page
    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(image);
    }

    /// Renders the page's content stream
    fn render(&self) -> Vec<u8> {
        let mut content = Content::new();
        for image in self.contents.iter() {
            content.save_state();
            Transform::place(&image.position).write_to_content(&mut content);
            content.x_object(Name(image_name(image.image_id).as_bytes()));
            content.restore_state();
        }
        content.finish()
    }

    /// Writes the page object and its content stream. `id` and `parent` are generated
    /// up front by the document, since the page tree has to list its kids.
    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        id: Ref,
        parent: Ref,
        page_index: usize,
        writer: &mut Pdf,
    ) {
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.art_box(self.content_box.into());
        page.parent(parent);

        let mut resources = page.resources();
        let mut resource_xobjects = resources.x_objects();
        for image in self.contents.iter() {
            if let Some(image_ref) = refs.get(RefType::Image(image.image_id.index())) {
                resource_xobjects.pair(Name(image_name(image.image_id).as_bytes()), image_ref);
            }
        }
        resource_xobjects.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        let rendered = self.render();
        writer.stream(content_id, rendered.as_slice());
    }
}

fn image_name(id: Id<Image>) -> String {
    format!("I{}", id.index())
}
