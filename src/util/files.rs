use crate::BillpressError;
use crate::messages::Messages;
use log::{error, info};
use printpdf::PdfDocumentReference;
use std::fs::create_dir_all;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const FILE_PREFIX: &str = "Invoice";
const FALLBACK_INVOICE_NO: &str = "INVOICE";

// `Invoice_<no>.<ext>`, path separators in the number would escape the folder
pub(crate) fn build_invoice_file_name(invoice_no: &str, extension: &str) -> String {
    let invoice_no = invoice_no.trim();
    let invoice_no = if invoice_no.is_empty() {
        FALLBACK_INVOICE_NO.to_owned()
    } else {
        invoice_no.replace(['/', '\\'], "-")
    };
    format!("{FILE_PREFIX}_{invoice_no}.{extension}")
}

fn file_access_error(path: &Path, e: impl std::fmt::Display) -> BillpressError {
    BillpressError::FileAccessError(format!("{:?}, {}", path, e))
}

// the pdf is written next to its destination and only renamed once complete
pub(crate) fn save_pdf(
    doc: PdfDocumentReference,
    folder: &Path,
    file_name: &str,
) -> Result<PathBuf, BillpressError> {
    create_dir_all(folder).map_err(|e| file_access_error(folder, e))?;
    let tmp = NamedTempFile::new_in(folder).map_err(|e| file_access_error(folder, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        doc.save(&mut writer).map_err(|e| {
            BillpressError::ExportFailed(format!("{}: {}", Messages::PDFNotCreated.msg(), e))
        })?;
        writer.flush().map_err(|e| file_access_error(tmp.path(), e))?;
    }

    let target = folder.join(file_name);
    tmp.persist(&target)
        .map_err(|e| file_access_error(&target, e.error))?;
    Ok(target)
}

pub(crate) fn save_markup(
    markup: &str,
    folder: &Path,
    file_name: &str,
) -> Result<PathBuf, BillpressError> {
    create_dir_all(folder).map_err(|e| file_access_error(folder, e))?;
    let target = folder.join(file_name);
    std::fs::write(&target, markup).map_err(|e| file_access_error(&target, e))?;
    info!("{}: {:?}", Messages::MarkupCreated.msg(), target);
    Ok(target)
}

// logs errors
pub(crate) fn open_file(path: &Path, command: Option<&str>) {
    let result = match command.map(str::trim) {
        Some(cmd) if !cmd.is_empty() => open::with(path, cmd),
        _ => open::that(path),
    };
    if let Err(e) = result {
        error!("{}: {:?}, {}", Messages::CouldNotOpenFile.msg(), path, e);
    }
}
