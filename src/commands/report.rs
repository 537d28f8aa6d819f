use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ReportArgs;
use crate::report::pdf::render_pdf;
use crate::report::{PageGeometry, ReportRequest, compose_report};
use crate::util::{read_text_file, write_bytes};

pub fn run(args: ReportArgs) -> Result<()> {
    let request = build_request(&args)?;
    let document = compose_report(&request, &PageGeometry::default());
    let bytes = render_pdf(&document)?;

    write_bytes(&args.output, &bytes)?;
    info!(
        path = %args.output.display(),
        pages = document.page_count(),
        bytes = bytes.len(),
        "wrote cable report"
    );

    Ok(())
}

/// Starts from the optional JSON request and lets explicit flags override it.
fn build_request(args: &ReportArgs) -> Result<ReportRequest> {
    let mut request = match &args.request {
        Some(path) => {
            let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_slice::<ReportRequest>(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => ReportRequest::default(),
    };

    if let Some(title) = &args.title {
        request.title = title.clone();
    }
    if let Some(path) = &args.conductor_text_file {
        request.conductor_text = read_text_file(path)?;
    }
    if let Some(path) = &args.sheath_text_file {
        request.sheath_text = read_text_file(path)?;
    }

    Ok(request)
}
