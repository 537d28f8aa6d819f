use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::BatchArgs;
use crate::commands::ocr::{OcrSettings, collect_tool_versions, extract_document_text};
use crate::extraction::CableParameterExtractor;
use crate::model::{ExtractionEntry, ExtractionManifest};
use crate::util::{now_utc_string, sha256_file, utc_compact_string, write_json_pretty};

pub fn run(args: BatchArgs) -> Result<()> {
    let settings = OcrSettings::from(&args.ocr);
    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        args.input_dir.join(format!(
            "extraction_manifest_{}.json",
            utc_compact_string(Utc::now())
        ))
    });

    info!(input_dir = %args.input_dir.display(), "starting batch extraction");

    let pdf_paths = discover_pdfs(&args.input_dir)?;
    if pdf_paths.is_empty() {
        bail!("no PDFs found in {}", args.input_dir.display());
    }

    let extractor = CableParameterExtractor::new()?;
    let mut documents = Vec::with_capacity(pdf_paths.len());
    for path in &pdf_paths {
        documents.push(extract_entry(&extractor, path, &settings)?);
    }

    let manifest = ExtractionManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: args.input_dir.display().to_string(),
        document_count: documents.len(),
        tool_versions: collect_tool_versions(&settings),
        documents,
    };

    write_json_pretty(&manifest_path, &manifest)?;
    info!(
        path = %manifest_path.display(),
        document_count = manifest.document_count,
        "wrote extraction manifest"
    );

    Ok(())
}

fn extract_entry(
    extractor: &CableParameterExtractor,
    path: &Path,
    settings: &OcrSettings,
) -> Result<ExtractionEntry> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))?;
    let sha256 = sha256_file(path)?;

    let entry = match extract_document_text(path, settings) {
        Ok(document) => ExtractionEntry {
            filename,
            sha256,
            page_count: document.pages.len(),
            ocr_page_count: document.ocr_page_count,
            record: Some(extractor.extract(&document.joined())),
            warnings: document.warnings,
        },
        Err(error) => {
            warn!(path = %path.display(), error = %error, "document text extraction failed");
            ExtractionEntry {
                filename,
                sha256,
                page_count: 0,
                ocr_page_count: 0,
                warnings: vec![format!("{error:#}")],
                record: None,
            }
        }
    };

    Ok(entry)
}

fn discover_pdfs(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read directory: {}", input_dir.display()))?;

    let mut pdfs = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read entry in {}", input_dir.display()))?
            .path();
        let is_pdf = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("pdf"));
        if path.is_file() && is_pdf {
            pdfs.push(path);
        }
    }

    pdfs.sort();
    Ok(pdfs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_pdfs_filters_and_sorts() {
        let root = std::env::temp_dir().join(format!("cablespec_batch_{}", std::process::id()));
        fs::create_dir_all(&root).expect("create fixture dir");
        for name in ["b.PDF", "a.pdf", "notes.txt"] {
            fs::write(root.join(name), b"%PDF-1.4").expect("write fixture");
        }

        let found = discover_pdfs(&root).expect("discover pdfs");
        let _ = fs::remove_dir_all(&root);

        let names = found
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
            .collect::<Vec<&str>>();
        assert_eq!(names, vec!["a.pdf", "b.PDF"]);
    }
}
