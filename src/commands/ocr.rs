use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::{OcrArgs, OcrMode};
use crate::model::ToolVersions;

const PDFTOPPM_VERSION_ARGS: [&str; 1] = ["-v"];
const PDFTOTEXT_VERSION_ARGS: [&str; 1] = ["-v"];
const TESSERACT_VERSION_ARGS: [&str; 1] = ["--version"];

/// External text-recognition tooling, passed explicitly to every call.
#[derive(Debug, Clone)]
pub struct OcrSettings {
    pub mode: OcrMode,
    pub lang: String,
    pub dpi: u32,
    pub min_text_chars: usize,
    pub pdftotext_cmd: String,
    pub pdftoppm_cmd: String,
    pub tesseract_cmd: String,
}

impl From<&OcrArgs> for OcrSettings {
    fn from(args: &OcrArgs) -> Self {
        Self {
            mode: args.ocr_mode,
            lang: args.ocr_lang.clone(),
            dpi: args.ocr_dpi,
            min_text_chars: args.ocr_min_text_chars,
            pdftotext_cmd: args.pdftotext_cmd.clone(),
            pdftoppm_cmd: args.pdftoppm_cmd.clone(),
            tesseract_cmd: args.tesseract_cmd.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct DocumentText {
    pub pages: Vec<String>,
    pub ocr_page_count: usize,
    pub warnings: Vec<String>,
}

impl DocumentText {
    pub fn joined(&self) -> String {
        self.pages.join("\n")
    }
}

pub fn extract_document_text(pdf_path: &Path, settings: &OcrSettings) -> Result<DocumentText> {
    let mut document = DocumentText {
        pages: extract_pages_with_pdftotext(pdf_path, &settings.pdftotext_cmd)?,
        ..DocumentText::default()
    };

    let candidate_pages =
        collect_ocr_candidates(&document.pages, settings.mode, settings.min_text_chars);
    if candidate_pages.is_empty() {
        return Ok(document);
    }

    if !command_available(&settings.pdftoppm_cmd, &PDFTOPPM_VERSION_ARGS)
        || !command_available(&settings.tesseract_cmd, &TESSERACT_VERSION_ARGS)
    {
        let message = format!(
            "OCR mode '{}' requested for {} pages but {}/{} are unavailable",
            settings.mode.as_str(),
            candidate_pages.len(),
            settings.pdftoppm_cmd,
            settings.tesseract_cmd
        );
        if matches!(settings.mode, OcrMode::Force) {
            bail!(message);
        }
        warn!(pdf = %pdf_path.display(), "{message}");
        document.warnings.push(message);
        return Ok(document);
    }

    for page_number in candidate_pages {
        let page_index = page_number.saturating_sub(1);
        match extract_page_with_ocr(pdf_path, page_number, settings) {
            Ok(ocr_text) => {
                if non_whitespace_char_count(&ocr_text) == 0 && matches!(settings.mode, OcrMode::Auto)
                {
                    document.warnings.push(format!(
                        "OCR text was empty for {} page {} in auto mode",
                        pdf_path.display(),
                        page_number
                    ));
                    continue;
                }
                if let Some(page) = document.pages.get_mut(page_index) {
                    *page = ocr_text;
                }
                document.ocr_page_count += 1;
            }
            Err(error) => {
                if matches!(settings.mode, OcrMode::Force) {
                    return Err(error).with_context(|| {
                        format!(
                            "failed OCR extraction for {} page {}",
                            pdf_path.display(),
                            page_number
                        )
                    });
                }
                warn!(pdf = %pdf_path.display(), page = page_number, error = %error, "OCR fallback failed");
                document.warnings.push(format!(
                    "OCR fallback failed for {} page {}: {}",
                    pdf_path.display(),
                    page_number,
                    error
                ));
            }
        }
    }

    info!(
        pdf = %pdf_path.display(),
        pages = document.pages.len(),
        ocr_pages = document.ocr_page_count,
        "document text ready"
    );
    Ok(document)
}

pub fn collect_ocr_candidates(
    pages: &[String],
    ocr_mode: OcrMode,
    min_text_chars: usize,
) -> Vec<usize> {
    match ocr_mode {
        OcrMode::Off => Vec::new(),
        OcrMode::Force => (1..=pages.len()).collect(),
        OcrMode::Auto => pages
            .iter()
            .enumerate()
            .filter(|(_, page)| non_whitespace_char_count(page) < min_text_chars)
            .map(|(index, _)| index + 1)
            .collect(),
    }
}

fn non_whitespace_char_count(text: &str) -> usize {
    text.chars()
        .filter(|character| !character.is_whitespace())
        .count()
}

fn extract_pages_with_pdftotext(pdf_path: &Path, program: &str) -> Result<Vec<String>> {
    let mut command = Command::new(program);
    command.arg("-enc").arg("UTF-8").arg(pdf_path).arg("-");
    let stdout = run_tool(command, program, &pdf_path.display().to_string())?;

    Ok(split_pages(&stdout))
}

/// Splits pdftotext output on form feeds, dropping trailing blank pages.
pub fn split_pages(raw: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while pages.last().is_some_and(|page| page.trim().is_empty()) {
        pages.pop();
    }

    pages
}

fn extract_page_with_ocr(pdf_path: &Path, page_number: usize, settings: &OcrSettings) -> Result<String> {
    let subject = format!("{} page {}", pdf_path.display(), page_number);
    let output_root = page_image_root(pdf_path, page_number);
    let png_path = output_root.with_extension("png");

    let mut render = Command::new(&settings.pdftoppm_cmd);
    render
        .arg("-r")
        .arg(settings.dpi.to_string())
        .arg("-f")
        .arg(page_number.to_string())
        .arg("-l")
        .arg(page_number.to_string())
        .arg("-singlefile")
        .arg("-png")
        .arg(pdf_path)
        .arg(&output_root);
    run_tool(render, &settings.pdftoppm_cmd, &subject)?;

    if !png_path.exists() {
        bail!(
            "{} did not produce a page image for {}",
            settings.pdftoppm_cmd,
            subject
        );
    }

    let mut recognize = Command::new(&settings.tesseract_cmd);
    recognize
        .arg(&png_path)
        .arg("stdout")
        .arg("-l")
        .arg(&settings.lang);
    let recognized = run_tool(recognize, &settings.tesseract_cmd, &subject);
    let _ = fs::remove_file(&png_path);

    Ok(normalize_ocr_output(&recognized?))
}

/// Temp-dir path prefix for one rendered page; pdftoppm appends `.png`.
fn page_image_root(pdf_path: &Path, page_number: usize) -> PathBuf {
    let safe_stem = pdf_path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("pdf")
        .chars()
        .map(|character| {
            if character.is_ascii_alphanumeric() {
                character
            } else {
                '_'
            }
        })
        .collect::<String>();
    let stamp = Utc::now().format("%Y%m%dT%H%M%S%f");

    std::env::temp_dir().join(format!(
        "cablespec_ocr_{safe_stem}_{}_{page_number}_{stamp}",
        std::process::id()
    ))
}

/// Runs an external tool and returns its stdout, failing on spawn errors or
/// a non-zero exit status.
fn run_tool(mut command: Command, program: &str, subject: &str) -> Result<String> {
    let output = command
        .output()
        .with_context(|| format!("failed to execute {program} for {subject}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "{program} exited with {} for {subject}: {}",
            output.status,
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn normalize_ocr_output(raw: &str) -> String {
    raw.replace('\u{0000}', "").trim().to_string()
}

/// A tool counts as available only when its version probe exits successfully.
fn command_available(program: &str, version_args: &[&str]) -> bool {
    Command::new(program)
        .args(version_args)
        .output()
        .is_ok_and(|output| output.status.success())
}

pub fn collect_tool_versions(settings: &OcrSettings) -> ToolVersions {
    ToolVersions {
        pdftotext: tool_version(&settings.pdftotext_cmd, &PDFTOTEXT_VERSION_ARGS),
        pdftoppm: tool_version(&settings.pdftoppm_cmd, &PDFTOPPM_VERSION_ARGS),
        tesseract: tool_version(&settings.tesseract_cmd, &TESSERACT_VERSION_ARGS),
    }
}

/// First non-empty line of a version banner; poppler tools print it on stderr.
fn tool_version(program: &str, version_args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(version_args).output().ok()?;

    [output.stdout, output.stderr]
        .iter()
        .map(|stream| String::from_utf8_lossy(stream).into_owned())
        .find_map(|banner| {
            banner
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(ToOwned::to_owned)
        })
}
