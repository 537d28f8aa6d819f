use serde::Serialize;

use crate::extraction::CableParameterRecord;

#[derive(Debug, Clone, Serialize)]
pub struct ToolVersions {
    pub pdftotext: Option<String>,
    pub pdftoppm: Option<String>,
    pub tesseract: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionEntry {
    pub filename: String,
    pub sha256: String,
    pub page_count: usize,
    pub ocr_page_count: usize,
    pub warnings: Vec<String>,
    pub record: Option<CableParameterRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub document_count: usize,
    pub tool_versions: ToolVersions,
    pub documents: Vec<ExtractionEntry>,
}
