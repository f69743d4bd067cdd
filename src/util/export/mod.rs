use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{error, info};
use printpdf::Mm;

use crate::data::InvoiceData;
use crate::data::currency::check_totals;
use crate::util::files::{build_invoice_file_name, save_pdf};
use crate::{BillpressError, Messages};
use invoice::build_markup;
use paginate::{A4, PageSize, PaginatedDocument, paginate};
use raster::Rasterizer;
use surface::RenderHost;

pub(crate) mod invoice;
pub(crate) mod paginate;
pub(crate) mod raster;
pub(crate) mod surface;

pub(crate) const MM_PER_INCH: f32 = 25.4;
pub(crate) const CSS_PX_PER_INCH: f32 = 96.0;
pub(crate) const A4_WIDTH: Mm = Mm(210.0);
pub(crate) const A4_HEIGHT: Mm = Mm(297.0);
pub(crate) const DEFAULT_SCALE: u32 = 2;
pub(crate) const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenderStage {
    Idle,
    Building,
    Mounted,
    Rasterizing,
    Paginating,
    Saved,
    Failed,
}

#[derive(Debug, Clone)]
pub(crate) struct RenderedInvoice {
    pub(crate) path: PathBuf,
    pub(crate) pages: usize,
}

/// Runs invoice data through markup, surface, rasterizer and paginator.
pub(crate) struct InvoiceRenderer<R> {
    host: RenderHost,
    rasterizer: R,
    scale: u32,
    page: PageSize,
    strict_totals: bool,
}

impl<R: Rasterizer> InvoiceRenderer<R> {
    pub(crate) fn new(host: RenderHost, rasterizer: R) -> Self {
        Self {
            host,
            rasterizer,
            scale: DEFAULT_SCALE,
            page: A4,
            strict_totals: false,
        }
    }

    pub(crate) fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.max(1);
        self
    }

    pub(crate) fn with_strict_totals(mut self, strict_totals: bool) -> Self {
        self.strict_totals = strict_totals;
        self
    }

    /// Renders the invoice and saves it as `Invoice_<no>.pdf` in `output_folder`.
    pub(crate) fn render(
        &self,
        data: &InvoiceData,
        output_folder: &Path,
    ) -> Result<RenderedInvoice, BillpressError> {
        let file_name = build_invoice_file_name(data.invoice_no(), "pdf");
        let mut stage = RenderStage::Idle;
        let result = self
            .render_document(data, &file_name, &mut stage)
            .and_then(|PaginatedDocument { doc, pages }| {
                let path = save_pdf(doc, output_folder, &file_name)?;
                Ok(RenderedInvoice { path, pages })
            });

        match result {
            Ok(rendered) => {
                advance(&mut stage, RenderStage::Saved, &file_name);
                info!(
                    "{}: {:?}, {} page(s)",
                    Messages::PDFCreated.msg(),
                    rendered.path,
                    rendered.pages
                );
                Ok(rendered)
            }
            Err(e) => {
                error!("{file_name}: failed while {stage:?}, {e}");
                advance(&mut stage, RenderStage::Failed, &file_name);
                Err(e)
            }
        }
    }

    /// Same pipeline, but returns the PDF bytes instead of writing a file.
    pub(crate) fn render_to_bytes(&self, data: &InvoiceData) -> Result<Vec<u8>, BillpressError> {
        let file_name = build_invoice_file_name(data.invoice_no(), "pdf");
        let mut stage = RenderStage::Idle;
        let PaginatedDocument { doc, .. } = self.render_document(data, &file_name, &mut stage)?;
        let mut writer = BufWriter::new(Vec::new());
        doc.save(&mut writer)
            .map_err(|e| BillpressError::ExportFailed(format!("{}: {e}", Messages::PDFNotCreated)))?;
        writer
            .into_inner()
            .map_err(|e| BillpressError::ExportFailed(format!("{}: {e}", Messages::PDFNotCreated)))
    }

    fn render_document(
        &self,
        data: &InvoiceData,
        file_name: &str,
        stage: &mut RenderStage,
    ) -> Result<PaginatedDocument, BillpressError> {
        if self.strict_totals {
            check_totals(data.totals())?;
        }

        advance(stage, RenderStage::Building, file_name);
        let markup = build_markup(data);

        let bitmap = self
            .host
            .with_offscreen_surface(&markup, self.page.width.0, |surface| {
                advance(stage, RenderStage::Mounted, file_name);
                advance(stage, RenderStage::Rasterizing, file_name);
                let bitmap = self.rasterizer.rasterize(surface, self.scale).map_err(|e| {
                    error!("surface {}: {e}", surface.id());
                    e
                })?;
                Ok(bitmap)
            })?;

        advance(stage, RenderStage::Paginating, file_name);
        paginate(&bitmap, self.page, file_name)
    }
}

fn advance(stage: &mut RenderStage, next: RenderStage, file_name: &str) {
    log::debug!("{file_name}: {stage:?} -> {next:?}");
    *stage = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AdHocInvoice, InvoiceHeader, InvoiceTotals, LineItem};
    use crate::util::export::surface::RenderSurface;
    use image::RgbImage;
    use std::fs::read_to_string;
    use std::sync::Mutex;

    struct FakeRasterizer {
        width: u32,
        height: u32,
        seen: Mutex<Option<String>>,
    }

    impl FakeRasterizer {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                seen: Mutex::new(None),
            }
        }
    }

    impl Rasterizer for FakeRasterizer {
        fn rasterize(&self, surface: &RenderSurface, _scale: u32) -> Result<RgbImage, BillpressError> {
            let document = read_to_string(surface.document_path()).unwrap();
            *self.seen.lock().unwrap() = Some(document);
            Ok(RgbImage::new(self.width, self.height))
        }
    }

    struct FailingRasterizer;

    impl Rasterizer for FailingRasterizer {
        fn rasterize(&self, _surface: &RenderSurface, _scale: u32) -> Result<RgbImage, BillpressError> {
            Err(BillpressError::RasterizeFailed(String::from("capture crashed")))
        }
    }

    fn invoice(invoice_no: &str, total: &str) -> InvoiceData {
        InvoiceData::AdHoc(AdHocInvoice {
            header: InvoiceHeader {
                invoice_no: String::from(invoice_no),
                ..Default::default()
            },
            items: vec![LineItem {
                amount: String::from("1000"),
                ..Default::default()
            }],
            totals: InvoiceTotals {
                subtotal: String::from("1000"),
                discount: None,
                tax: None,
                total: String::from(total),
            },
        })
    }

    #[test]
    fn renders_named_pdf() {
        let mount = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let renderer = InvoiceRenderer::new(
            RenderHost::new(mount.path()),
            FakeRasterizer::new(210, 297),
        );

        let rendered = renderer.render(&invoice("INV-001", "1000"), output.path()).unwrap();
        assert_eq!(rendered.path, output.path().join("Invoice_INV-001.pdf"));
        assert!(rendered.path.exists());
        assert_eq!(rendered.pages, 1);

        let seen = renderer.rasterizer.seen.lock().unwrap().clone().unwrap();
        assert!(seen.contains("1 000.00</td>"));
    }

    #[test]
    fn missing_invoice_number_uses_fallback_name() {
        let mount = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let renderer = InvoiceRenderer::new(
            RenderHost::new(mount.path()),
            FakeRasterizer::new(210, 297),
        );

        let rendered = renderer.render(&invoice("", "1000"), output.path()).unwrap();
        assert_eq!(rendered.path, output.path().join("Invoice_INVOICE.pdf"));
    }

    #[test]
    fn tall_bitmaps_span_pages() {
        let mount = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let renderer = InvoiceRenderer::new(
            RenderHost::new(mount.path()),
            FakeRasterizer::new(420, 1485),
        );

        let rendered = renderer.render(&invoice("INV-002", "1000"), output.path()).unwrap();
        assert_eq!(rendered.pages, 3);
    }

    #[test]
    fn surfaces_are_released() {
        let mount = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let host = RenderHost::new(mount.path());

        let ok = InvoiceRenderer::new(host.clone(), FakeRasterizer::new(210, 297));
        ok.render(&invoice("INV-003", "1000"), output.path()).unwrap();
        assert!(host.mounted_surfaces().unwrap().is_empty());

        let failing = InvoiceRenderer::new(host.clone(), FailingRasterizer);
        let result = failing.render(&invoice("INV-004", "1000"), output.path());
        assert!(matches!(result, Err(BillpressError::RasterizeFailed(_))));
        assert!(host.mounted_surfaces().unwrap().is_empty());
        // no partial pdf
        assert!(!output.path().join("Invoice_INV-004.pdf").exists());
    }

    #[test]
    fn strict_totals() {
        let mount = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let renderer = InvoiceRenderer::new(
            RenderHost::new(mount.path()),
            FakeRasterizer::new(210, 297),
        );

        // permissive by default
        assert!(renderer.render(&invoice("INV-005", "900"), output.path()).is_ok());

        let renderer = renderer.with_strict_totals(true);
        *renderer.rasterizer.seen.lock().unwrap() = None;
        let result = renderer.render(&invoice("INV-006", "900"), output.path());
        assert!(matches!(result, Err(BillpressError::InvalidTotals(_))));
        assert!(renderer.rasterizer.seen.lock().unwrap().is_none());
        assert!(!output.path().join("Invoice_INV-006.pdf").exists());
    }

    #[test]
    fn bytes_are_a_pdf() {
        let mount = tempfile::tempdir().unwrap();
        let renderer = InvoiceRenderer::new(
            RenderHost::new(mount.path()),
            FakeRasterizer::new(210, 297),
        )
        .with_scale(1);

        let bytes = renderer.render_to_bytes(&invoice("INV-007", "1000")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn concurrent_renders_use_their_own_surfaces() {
        let mount = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let renderer = InvoiceRenderer::new(
            RenderHost::new(mount.path()),
            FakeRasterizer::new(210, 297),
        );

        let numbers = ["INV-010", "INV-011", "INV-012", "INV-013"];
        std::thread::scope(|scope| {
            for number in numbers {
                let renderer = &renderer;
                let output = output.path();
                scope.spawn(move || renderer.render(&invoice(number, "1000"), output).unwrap());
            }
        });
        for number in numbers {
            assert!(output.path().join(format!("Invoice_{number}.pdf")).exists());
        }
        assert!(RenderHost::new(mount.path()).mounted_surfaces().unwrap().is_empty());
    }
}
