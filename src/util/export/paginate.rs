use image::RgbImage;
use image::imageops::crop_imm;
use log::debug;
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument,
    PdfDocumentReference, Px,
};

use super::{A4_HEIGHT, A4_WIDTH, MM_PER_INCH};
use crate::{BillpressError, Messages};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PageSize {
    pub(crate) width: Mm,
    pub(crate) height: Mm,
}

pub(crate) const A4: PageSize = PageSize {
    width: A4_WIDTH,
    height: A4_HEIGHT,
};

/// One page's viewport onto the tall image, in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PageSlice {
    pub(crate) index: usize,
    // how far the image top sits above the page top
    pub(crate) offset: f32,
    pub(crate) visible: f32,
}

pub(crate) struct PaginatedDocument {
    pub(crate) doc: PdfDocumentReference,
    pub(crate) pages: usize,
}

pub(crate) fn plan_pages(image_height: f32, page_height: f32) -> Vec<PageSlice> {
    let mut pages = vec![];
    if !(page_height > 0.0) || !image_height.is_finite() {
        return pages;
    }
    let mut height_left = image_height;
    let mut offset = 0.0;
    loop {
        pages.push(PageSlice {
            index: pages.len(),
            offset,
            visible: height_left.clamp(0.0, page_height),
        });
        height_left -= page_height;
        offset += page_height;
        if height_left <= 0.0 {
            break;
        }
    }
    pages
}

/// Height of the bitmap in mm when scaled to `page_width`.
pub(crate) fn proportional_height(bitmap: &RgbImage, page_width: Mm) -> f32 {
    let (width, height) = bitmap.dimensions();
    height as f32 * page_width.0 / width as f32
}

/// Bitmap rows `start..end` shown by one page.
pub(crate) fn slice_rows(slice: &PageSlice, px_per_mm: f32, height_px: u32) -> (u32, u32) {
    let to_row = |mm: f32| ((mm * px_per_mm).round() as u32).min(height_px);
    (to_row(slice.offset), to_row(slice.offset + slice.visible))
}

/// The part of the bitmap one page shows, `None` if it rounds to no rows.
pub(crate) fn page_bitmap(
    bitmap: &RgbImage,
    slice: &PageSlice,
    px_per_mm: f32,
) -> Option<RgbImage> {
    let (width, height) = bitmap.dimensions();
    let (start, end) = slice_rows(slice, px_per_mm, height);
    if end <= start {
        return None;
    }
    Some(crop_imm(bitmap, 0, start, width, end - start).to_image())
}

/// Splits the bitmap into page-high strips, one per page, each placed at the
/// top of its page.
pub(crate) fn paginate(
    bitmap: &RgbImage,
    page: PageSize,
    title: &str,
) -> Result<PaginatedDocument, BillpressError> {
    let (width_px, height_px) = bitmap.dimensions();
    if width_px == 0 || height_px == 0 {
        return Err(BillpressError::ExportFailed(format!(
            "{}: empty bitmap",
            Messages::PDFNotCreated
        )));
    }
    let image_height = proportional_height(bitmap, page.width);
    let dpi = width_px as f32 / (page.width.0 / MM_PER_INCH);
    let px_per_mm = width_px as f32 / page.width.0;
    let slices = plan_pages(image_height, page.height.0);
    if slices.is_empty() {
        return Err(BillpressError::ExportFailed(format!(
            "{}: invalid page size {:?}",
            Messages::PDFNotCreated,
            page
        )));
    }

    let (doc, first_page, first_layer) = PdfDocument::new(title, page.width, page.height, "invoice");
    for slice in &slices {
        let layer = if slice.index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(
                page.width,
                page.height,
                format!("page {}", slice.index + 1),
            );
            doc.get_page(page_index).get_layer(layer_index)
        };
        debug!(
            "{title}: page {} shows {:.1}mm from {:.1}mm",
            slice.index + 1,
            slice.visible,
            slice.offset
        );
        let Some(strip) = page_bitmap(bitmap, slice, px_per_mm) else {
            continue;
        };
        // pdf origin is bottom left
        let bottom = page.height.0 - strip.height() as f32 / px_per_mm;
        page_image(strip).add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(0.0)),
                translate_y: Some(Mm(bottom)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    Ok(PaginatedDocument {
        doc,
        pages: slices.len(),
    })
}

fn page_image(bitmap: RgbImage) -> Image {
    let (width, height) = bitmap.dimensions();
    Image::from(ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: bitmap.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    })
}
