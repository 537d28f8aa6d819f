use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "cablespec",
    version,
    about = "Cable datasheet parameter extraction and short-circuit report tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Batch(BatchArgs),
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["pdf", "text_file"])))]
pub struct ExtractArgs {
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    #[arg(long)]
    pub text_file: Option<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub ocr: OcrArgs,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[arg(long)]
    pub input_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[command(flatten)]
    pub ocr: OcrArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[arg(long)]
    pub request: Option<PathBuf>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub conductor_text_file: Option<PathBuf>,

    #[arg(long)]
    pub sheath_text_file: Option<PathBuf>,

    #[arg(long, default_value = "Cable_Report.pdf")]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct OcrArgs {
    #[arg(long, value_enum, default_value_t = OcrMode::Auto)]
    pub ocr_mode: OcrMode,

    #[arg(long, default_value = "eng")]
    pub ocr_lang: String,

    #[arg(long, default_value_t = 300)]
    pub ocr_dpi: u32,

    #[arg(long, default_value_t = 40)]
    pub ocr_min_text_chars: usize,

    #[arg(long, default_value = "pdftotext")]
    pub pdftotext_cmd: String,

    #[arg(long, default_value = "pdftoppm")]
    pub pdftoppm_cmd: String,

    #[arg(long, default_value = "tesseract")]
    pub tesseract_cmd: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OcrMode {
    Off,
    Auto,
    Force,
}

impl OcrMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Auto => "auto",
            Self::Force => "force",
        }
    }
}
