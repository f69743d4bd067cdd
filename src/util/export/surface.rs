use std::fs::{create_dir, create_dir_all, read_dir, remove_dir_all, write};
#[cfg(test)]
use std::path::Path;
use std::path::PathBuf;

use log::{debug, error};
use uuid::Uuid;

use super::{CSS_PX_PER_INCH, MM_PER_INCH};
use crate::{BillpressError, Messages};

const SURFACE_PREFIX: &str = "surface-";
const DOCUMENT_FILE: &str = "invoice.html";
const CAPTURE_FILE: &str = "capture.png";
/// `window.status` of a surface document once its fonts and images loaded.
pub(crate) const READY_STATUS: &str = "billpress-ready";

/// Holds the mount point under which per-call render surfaces are attached.
#[derive(Debug, Clone)]
pub(crate) struct RenderHost {
    mount: PathBuf,
}

/// A private, detached rendering surface: one directory holding the complete
/// document the rasterizer captures. Removed when detached or dropped.
#[derive(Debug)]
pub(crate) struct RenderSurface {
    id: Uuid,
    dir: PathBuf,
    width_mm: f32,
    attached: bool,
}

impl RenderHost {
    pub(crate) fn new(mount: impl Into<PathBuf>) -> Self {
        Self {
            mount: mount.into(),
        }
    }

    /// Surfaces currently attached below the mount point.
    pub(crate) fn mounted_surfaces(&self) -> Result<Vec<PathBuf>, BillpressError> {
        if !self.mount.exists() {
            return Ok(vec![]);
        }
        let entries = read_dir(&self.mount)
            .map_err(|e| BillpressError::FileAccessError(format!("{:?}: {}", self.mount, e)))?;
        let mut surfaces = vec![];
        for entry in entries {
            let entry =
                entry.map_err(|e| BillpressError::FileAccessError(format!("{:?}: {}", self.mount, e)))?;
            if entry.file_name().to_string_lossy().starts_with(SURFACE_PREFIX) {
                surfaces.push(entry.path());
            }
        }
        Ok(surfaces)
    }

    /// Attaches a surface holding `markup`, hands it to `f` and detaches it
    /// again, whether `f` succeeded or not.
    pub(crate) fn with_offscreen_surface<T, F>(
        &self,
        markup: &str,
        width_mm: f32,
        f: F,
    ) -> Result<T, BillpressError>
    where
        F: FnOnce(&RenderSurface) -> Result<T, BillpressError>,
    {
        let surface = self.attach(markup, width_mm)?;
        let result = f(&surface);
        surface.detach();
        result
    }

    fn attach(&self, markup: &str, width_mm: f32) -> Result<RenderSurface, BillpressError> {
        let surface_error = |e: std::io::Error| {
            BillpressError::SurfaceError(format!(
                "{}: {:?}, {}",
                Messages::CouldNotCreateSurface.msg(),
                self.mount,
                e
            ))
        };
        create_dir_all(&self.mount).map_err(surface_error)?;

        let id = Uuid::now_v7();
        let dir = self.mount.join(format!("{SURFACE_PREFIX}{id}"));
        create_dir(&dir).map_err(surface_error)?;
        // from here on the guard owns the directory
        let surface = RenderSurface {
            id,
            dir,
            width_mm,
            attached: true,
        };
        write(surface.document_path(), surface_document(markup, width_mm)).map_err(surface_error)?;
        debug!("surface {id} attached at {:?}", surface.dir);
        Ok(surface)
    }
}

impl RenderSurface {
    pub(crate) fn id(&self) -> Uuid {
        self.id
    }

    #[cfg(test)]
    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn document_path(&self) -> PathBuf {
        self.dir.join(DOCUMENT_FILE)
    }

    /// Where a rasterizer may put its capture; removed together with the surface.
    pub(crate) fn capture_path(&self) -> PathBuf {
        self.dir.join(CAPTURE_FILE)
    }

    #[cfg(test)]
    pub(crate) fn width_mm(&self) -> f32 {
        self.width_mm
    }

    /// Surface width in device pixels at the given oversampling factor.
    pub(crate) fn width_px(&self, scale: u32) -> u32 {
        let css_px = (self.width_mm / MM_PER_INCH * CSS_PX_PER_INCH).round() as u32;
        css_px * scale.max(1)
    }

    fn detach(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        if let Err(e) = remove_dir_all(&self.dir) {
            error!(
                "{}: {:?}, {}",
                Messages::CouldNotRemoveSurface.msg(),
                self.dir,
                e
            );
        } else {
            debug!("surface {} detached", self.id);
        }
    }
}

impl Drop for RenderSurface {
    fn drop(&mut self) {
        self.remove();
    }
}

fn surface_document(markup: &str, width_mm: f32) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script>window.addEventListener("load", function () {{ window.status = "{ready}"; }});</script>
</head>
<body style="margin: 0; padding: 0; background-color: #ffffff;">
<div id="invoice-surface" style="width: {width_mm}mm; margin: 0; padding: 0; box-sizing: border-box; font-family: Arial, sans-serif; background-color: #ffffff;">
{markup}
</div>
</body>
</html>
"#,
        title = Messages::Title.msg(),
        ready = READY_STATUS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::read_to_string;

    #[test]
    fn surface_is_removed_after_success() {
        let mount = tempfile::tempdir().unwrap();
        let host = RenderHost::new(mount.path());
        let seen = host
            .with_offscreen_surface("<p>hello</p>", 210.0, |surface| {
                assert!(surface.dir().exists());
                assert_eq!(host.mounted_surfaces().unwrap().len(), 1);
                Ok(read_to_string(surface.document_path()).unwrap())
            })
            .unwrap();
        assert!(seen.contains("<p>hello</p>"));
        assert!(seen.contains("width: 210mm"));
        assert!(host.mounted_surfaces().unwrap().is_empty());
    }

    #[test]
    fn surface_is_removed_after_failure() {
        let mount = tempfile::tempdir().unwrap();
        let host = RenderHost::new(mount.path());
        let result: Result<(), BillpressError> =
            host.with_offscreen_surface("<p>x</p>", 210.0, |_| {
                Err(BillpressError::RasterizeFailed(String::from("boom")))
            });
        assert!(matches!(result, Err(BillpressError::RasterizeFailed(_))));
        assert!(host.mounted_surfaces().unwrap().is_empty());
    }

    #[test]
    fn document_reports_readiness_after_load() {
        let mount = tempfile::tempdir().unwrap();
        let host = RenderHost::new(mount.path());
        let document = host
            .with_offscreen_surface("<p>x</p>", 210.0, |surface| {
                Ok(read_to_string(surface.document_path()).unwrap())
            })
            .unwrap();
        assert!(document.contains(r#"addEventListener("load""#));
        assert!(document.contains(&format!(r#"window.status = "{READY_STATUS}""#)));
    }

    #[test]
    fn attach_failure_leaves_nothing_mounted() {
        let mount = tempfile::tempdir().unwrap();
        // a file where the mount directory should be
        let blocked = mount.path().join("surfaces");
        std::fs::write(&blocked, "").unwrap();
        let host = RenderHost::new(&blocked);
        let mut called = false;
        let result = host.with_offscreen_surface("", 210.0, |_| {
            called = true;
            Ok(())
        });
        assert!(matches!(result, Err(BillpressError::SurfaceError(_))));
        assert!(!called);
    }

    #[test]
    fn nested_surfaces_are_separate() {
        let mount = tempfile::tempdir().unwrap();
        let host = RenderHost::new(mount.path());
        host.with_offscreen_surface("a", 210.0, |outer| {
            host.with_offscreen_surface("b", 210.0, |inner| {
                assert_ne!(outer.id(), inner.id());
                assert_eq!(host.mounted_surfaces().unwrap().len(), 2);
                Ok(())
            })
        })
        .unwrap();
        assert!(host.mounted_surfaces().unwrap().is_empty());
    }

    #[test]
    fn mount_is_created_lazily() {
        let mount = tempfile::tempdir().unwrap();
        let host = RenderHost::new(mount.path().join("surfaces"));
        assert!(host.mounted_surfaces().unwrap().is_empty());
        host.with_offscreen_surface("", 210.0, |_| Ok(()))
            .unwrap();
        assert!(mount.path().join("surfaces").exists());
    }

    #[test]
    fn a4_width_in_pixels() {
        let mount = tempfile::tempdir().unwrap();
        let host = RenderHost::new(mount.path());
        host.with_offscreen_surface("", 210.0, |surface| {
            assert_eq!(surface.width_mm(), 210.0);
            assert_eq!(surface.width_px(1), 794);
            assert_eq!(surface.width_px(2), 1588);
            Ok(())
        })
        .unwrap();
    }
}
