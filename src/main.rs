use anyhow::{Result, anyhow};
use clap::Parser;
use config::Config;
use data::InvoiceData;
use log::{error, info};
use messages::Messages;
use std::io::Write;
use std::path::{Path, PathBuf};
use util::export::invoice::build_markup;
use util::export::raster::CommandRasterizer;
use util::export::surface::RenderHost;
use util::export::{InvoiceRenderer, RenderedInvoice};
use util::files::{build_invoice_file_name, open_file, save_markup};

mod config;
mod data;
mod messages;
mod util;

const SURFACE_MOUNT: &str = "billpress-surfaces";

/// Renders invoice data files (.toml or .json) into A4 PDF invoices.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Invoice data files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output folder, overrides `output_folder` from the config
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Open each PDF after it was saved
    #[arg(long)]
    open: bool,

    /// Only write the invoice markup as html
    #[arg(long, conflicts_with = "stdout")]
    markup_only: bool,

    /// Write the PDF of a single invoice to stdout
    #[arg(long)]
    stdout: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = config::load_config()?;

    let output_folder = args
        .output
        .clone()
        .or_else(|| config.output_folder.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    if args.markup_only {
        return write_markups(&args.files, &output_folder);
    }

    let renderer = create_renderer(&config);

    if args.stdout {
        let [file] = args.files.as_slice() else {
            return Err(anyhow!("--stdout renders exactly one file"));
        };
        let data = data::load_invoice_data(file)?;
        let bytes = renderer.render_to_bytes(&data)?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&bytes)?;
        stdout.flush()?;
        return Ok(());
    }

    info!("Starting {}...", Messages::Title);
    let open_after_save = args.open || config.open_after_save;
    let failed = std::thread::scope(|scope| {
        let handles: Vec<_> = args
            .files
            .iter()
            .map(|file| {
                let renderer = &renderer;
                let output_folder = output_folder.as_path();
                scope.spawn(move || render_file(renderer, file, output_folder))
            })
            .collect();

        handles
            .into_iter()
            .zip(&args.files)
            .map(|(handle, file)| match handle.join() {
                Ok(Ok(rendered)) => {
                    if open_after_save {
                        open_file(&rendered.path, config.file_open_command.as_deref());
                    }
                    false
                }
                Ok(Err(e)) => {
                    error!("{:?}: {}", file, e);
                    true
                }
                Err(_) => {
                    error!("{:?}: render thread panicked", file);
                    true
                }
            })
            .filter(|failed| *failed)
            .count()
    });

    if failed > 0 {
        return Err(anyhow!(
            "{} of {} invoice(s) could not be rendered",
            failed,
            args.files.len()
        ));
    }
    Ok(())
}

fn create_renderer(config: &Config) -> InvoiceRenderer<CommandRasterizer> {
    let host = RenderHost::new(std::env::temp_dir().join(SURFACE_MOUNT));
    InvoiceRenderer::new(host, config.rasterizer())
        .with_scale(config.scale)
        .with_strict_totals(config.strict_totals)
}

fn render_file(
    renderer: &InvoiceRenderer<CommandRasterizer>,
    file: &Path,
    output_folder: &Path,
) -> Result<RenderedInvoice, BillpressError> {
    let data = data::load_invoice_data(file)?;
    renderer.render(&data, output_folder)
}

fn write_markups(files: &[PathBuf], output_folder: &Path) -> Result<()> {
    for file in files {
        let data: InvoiceData = data::load_invoice_data(file)?;
        let file_name = build_invoice_file_name(data.invoice_no(), "html");
        save_markup(&build_markup(&data), output_folder, &file_name)?;
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
enum BillpressError {
    #[error("{0}")]
    SurfaceError(String),
    #[error("{0}")]
    RasterizeFailed(String),
    #[error("{0}")]
    ExportFailed(String),
    #[error("{0}")]
    FileAccessError(String),
    #[error("{0}")]
    InvalidTotals(String),
    #[error("{0}")]
    InputError(String),
}
