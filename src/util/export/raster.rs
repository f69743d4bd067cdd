use std::process::Command;
use std::time::Duration;

use image::{DynamicImage, Rgb, RgbImage, Rgba};
use log::debug;

use super::surface::{READY_STATUS, RenderSurface};
use crate::{BillpressError, Messages};

pub(crate) const DEFAULT_RASTERIZER_COMMAND: &str = "wkhtmltoimage";

/// Captures the rendered pixels of a surface.
pub(crate) trait Rasterizer: Send + Sync {
    /// Returns an opaque bitmap at `scale` device pixels per CSS pixel.
    fn rasterize(&self, surface: &RenderSurface, scale: u32) -> Result<RgbImage, BillpressError>;
}

/// How long the capture program lets a loaded document settle before it
/// takes the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Settle {
    /// Extra time after the page loaded, for late fonts and images.
    pub(crate) delay: Duration,
    /// Hold the capture until the document reports `READY_STATUS`.
    pub(crate) wait_for_load: bool,
}

impl Settle {
    fn args(&self) -> Vec<String> {
        let mut args = vec![
            String::from("--javascript-delay"),
            self.delay.as_millis().to_string(),
        ];
        if self.wait_for_load {
            args.push(String::from("--window-status"));
            args.push(String::from(READY_STATUS));
        }
        args
    }
}

/// Drives an external html-to-image program, `wkhtmltoimage` compatible.
#[derive(Debug, Clone)]
pub(crate) struct CommandRasterizer {
    program: String,
    extra_args: Vec<String>,
    settle: Settle,
}

impl CommandRasterizer {
    pub(crate) fn new(program: impl Into<String>, extra_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            extra_args,
            settle: Settle::default(),
        }
    }

    pub(crate) fn with_settle(mut self, settle: Settle) -> Self {
        self.settle = settle;
        self
    }

    pub(crate) fn command(&self, surface: &RenderSurface, scale: u32) -> Command {
        let scale = scale.max(1);
        let mut cmd = Command::new(&self.program);
        cmd.arg("--quiet")
            .arg("--format")
            .arg("png")
            .arg("--enable-local-file-access")
            .arg("--width")
            .arg(surface.width_px(scale).to_string())
            .arg("--zoom")
            .arg(scale.to_string())
            .args(self.settle.args())
            .args(&self.extra_args)
            .arg(surface.document_path())
            .arg(surface.capture_path());
        cmd
    }
}

impl Rasterizer for CommandRasterizer {
    fn rasterize(&self, surface: &RenderSurface, scale: u32) -> Result<RgbImage, BillpressError> {
        let mut cmd = self.command(surface, scale);
        debug!("surface {}: running {:?}", surface.id(), cmd);

        let output = cmd.output().map_err(|e| {
            BillpressError::RasterizeFailed(format!(
                "{}: could not run {}, {}",
                Messages::RasterizationFailed,
                self.program,
                e
            ))
        })?;
        if !output.status.success() {
            return Err(BillpressError::RasterizeFailed(format!(
                "{}: {} exited with {}, {}",
                Messages::RasterizationFailed,
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let capture = image::open(surface.capture_path()).map_err(|e| {
            BillpressError::RasterizeFailed(format!(
                "{}: could not read capture, {}",
                Messages::RasterizationFailed,
                e
            ))
        })?;
        Ok(flatten_onto_white(capture))
    }
}

/// Composites any transparency onto a white background.
pub(crate) fn flatten_onto_white(image: DynamicImage) -> RgbImage {
    if let DynamicImage::ImageRgb8(rgb) = image {
        return rgb;
    }
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgb = RgbImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0;
        let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        rgb.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::export::surface::RenderHost;
    use image::RgbaImage;

    #[test]
    fn transparent_pixels_become_white() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, Rgba([10, 20, 30, 255]));
        let rgb = flatten_onto_white(DynamicImage::ImageRgba8(rgba));
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn half_transparent_pixels_are_blended() {
        let mut rgba = RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 128]));
        let rgb = flatten_onto_white(DynamicImage::ImageRgba8(rgba));
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([127, 127, 127]));
    }

    #[test]
    fn command_line() {
        let mount = tempfile::tempdir().unwrap();
        let host = RenderHost::new(mount.path());
        let rasterizer =
            CommandRasterizer::new("capture-tool", vec![String::from("--disable-javascript")]);
        host.with_offscreen_surface("", 210.0, |surface| {
            let cmd = rasterizer.command(surface, 2);
            assert_eq!(cmd.get_program(), "capture-tool");
            let args: Vec<String> = cmd
                .get_args()
                .map(|a| a.to_string_lossy().into_owned())
                .collect();
            assert_eq!(&args[..11], &[
                "--quiet",
                "--format",
                "png",
                "--enable-local-file-access",
                "--width",
                "1588",
                "--zoom",
                "2",
                "--javascript-delay",
                "0",
                "--disable-javascript",
            ]);
            assert_eq!(args[11], surface.document_path().to_string_lossy());
            assert_eq!(args[12], surface.capture_path().to_string_lossy());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn settle_is_handed_to_the_capture() {
        let mount = tempfile::tempdir().unwrap();
        let host = RenderHost::new(mount.path());
        let rasterizer = CommandRasterizer::new("capture-tool", vec![]).with_settle(Settle {
            delay: Duration::from_millis(750),
            wait_for_load: true,
        });
        host.with_offscreen_surface("", 210.0, |surface| {
            let args: Vec<String> = rasterizer
                .command(surface, 1)
                .get_args()
                .map(|a| a.to_string_lossy().into_owned())
                .collect();
            let delay = args.iter().position(|a| a == "--javascript-delay").unwrap();
            assert_eq!(args[delay + 1], "750");
            let status = args.iter().position(|a| a == "--window-status").unwrap();
            assert_eq!(args[status + 1], READY_STATUS);
            // options precede the input and output paths
            assert!(status + 1 < args.len() - 2);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn missing_program_fails_and_releases_surface() {
        let mount = tempfile::tempdir().unwrap();
        let host = RenderHost::new(mount.path());
        let rasterizer = CommandRasterizer::new("billpress-no-such-capture-program", vec![]);
        let result = host.with_offscreen_surface("", 210.0, |surface| {
            rasterizer.rasterize(surface, 2)
        });
        assert!(matches!(result, Err(BillpressError::RasterizeFailed(_))));
        assert!(host.mounted_surfaces().unwrap().is_empty());
    }
}
