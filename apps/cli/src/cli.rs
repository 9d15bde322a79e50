//! Command-line front for the resume workflow: read a PDF, send it for
//! processing, write back the parsed JSON and the reformatted PDF.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::Parser;
use tracing::{info, warn};

use crate::config::Config;
use crate::extraction::{ExtractionClient, ResumeExtractor};
use crate::models::record;
use crate::viewer::renderer::PdfEngine;
use crate::workflow::coordinator::FileUpload;
use crate::workflow::WorkflowShell;

/// Send a PDF resume to the extraction service and write back the parsed
/// JSON record plus the reformatted PDF.
#[derive(Debug, Parser)]
#[command(name = "vitae", about, version)]
pub struct Cli {
    /// Path to the resume PDF to process
    #[arg(value_name = "FILE", required_unless_present = "check")]
    pub input: Option<PathBuf>,

    /// Where to write the extracted JSON record
    #[arg(long, value_name = "PATH", default_value = "parsed_resume.json")]
    pub json_out: PathBuf,

    /// Where to write the reformatted PDF
    #[arg(long, value_name = "PATH", default_value = "output.pdf")]
    pub pdf_out: PathBuf,

    /// Probe the resume service and exit
    #[arg(long)]
    pub check: bool,
}

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let extractor = Arc::new(ExtractionClient::new(
        &config.service_url,
        config.api_key.clone(),
    ));
    let mut shell = WorkflowShell::new(Arc::new(PdfEngine::new()), extractor.clone());

    if cli.check {
        shell.check_service().await.with_context(|| {
            format!("connectivity check failed for {}", extractor.base_url())
        })?;
        info!("resume service reachable at {}", extractor.base_url());
        return Ok(());
    }

    let Some(input) = cli.input.as_deref() else {
        anyhow::bail!("missing input file");
    };
    let upload = read_upload(input)?;
    preflight(&mut shell, &upload).await;

    let result = shell.process_remote(&upload).await.with_context(|| {
        format!("is the resume service running at {}?", extractor.base_url())
    })?;

    let mut parsed = result.record.clone();
    record::normalize_record(&mut parsed);
    info!("extracted {}", record::summarize(&parsed));

    let json = serde_json::to_string_pretty(&parsed)?;
    std::fs::write(&cli.json_out, json)
        .with_context(|| format!("failed to write {}", cli.json_out.display()))?;
    info!("wrote {}", cli.json_out.display());

    let document = extractor
        .fetch_document(&result.document_url)
        .await
        .with_context(|| {
            format!("failed to fetch generated PDF from {}", result.document_url)
        })?;
    std::fs::write(&cli.pdf_out, &document)
        .with_context(|| format!("failed to write {}", cli.pdf_out.display()))?;
    info!("wrote {}", cli.pdf_out.display());

    Ok(())
}

/// Reads the input file into an upload, with the media type implied by the
/// path extension.
fn read_upload(path: &Path) -> Result<FileUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume.pdf".to_string());
    let media_type = path
        .extension()
        .filter(|ext| ext.eq_ignore_ascii_case("pdf"))
        .map(|_| "application/pdf".to_string());
    Ok(FileUpload::new(file_name, media_type, Bytes::from(bytes)))
}

/// Opens the input locally before uploading so page-count problems surface
/// early. Local-view failures are logged and never block processing.
async fn preflight(shell: &mut WorkflowShell, upload: &FileUpload) {
    match shell.open_local(upload).await {
        Ok(Some(summary)) => info!("{}: {} page(s)", upload.file_name, summary.page_count),
        Ok(None) => {}
        Err(e) => warn!("local preflight failed ({e}), continuing with upload"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn read_upload_marks_pdf_paths_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.7 fake").unwrap();

        let upload = read_upload(file.path()).unwrap();
        assert!(upload.is_pdf());
        assert_eq!(upload.media_type.as_deref(), Some("application/pdf"));
        assert_eq!(upload.bytes.as_ref(), b"%PDF-1.7 fake");
    }

    #[test]
    fn read_upload_leaves_other_extensions_untyped() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"notes").unwrap();

        let upload = read_upload(file.path()).unwrap();
        assert!(upload.media_type.is_none());
        assert!(!upload.is_pdf());
    }

    #[test]
    fn read_upload_reports_missing_files() {
        let err = read_upload(Path::new("definitely-missing.pdf")).unwrap_err();
        assert!(err.to_string().contains("definitely-missing.pdf"));
    }
}
