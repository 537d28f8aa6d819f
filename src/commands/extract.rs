use anyhow::{Result, bail};
use tracing::info;

use crate::cli::ExtractArgs;
use crate::commands::ocr::{OcrSettings, extract_document_text};
use crate::extraction::CableParameterExtractor;
use crate::util::{print_json_pretty, read_text_file, write_json_pretty};

pub fn run(args: ExtractArgs) -> Result<()> {
    let text = match (&args.pdf, &args.text_file) {
        (Some(pdf_path), _) => {
            let settings = OcrSettings::from(&args.ocr);
            info!(pdf = %pdf_path.display(), ocr_mode = settings.mode.as_str(), "extracting document text");
            let document = extract_document_text(pdf_path, &settings)?;
            document.joined()
        }
        (None, Some(text_path)) => {
            info!(path = %text_path.display(), "reading recognized text");
            read_text_file(text_path)?
        }
        (None, None) => bail!("either --pdf or --text-file is required"),
    };

    let extractor = CableParameterExtractor::new()?;
    let record = extractor.extract(&text);
    info!(
        voltage_kv = ?record.voltage_kv,
        conductor = ?record.conductor_material,
        scc_ka = ?record.scc_ka,
        time_sec = ?record.time_sec,
        "extraction complete"
    );

    match &args.output {
        Some(path) => {
            write_json_pretty(path, &record)?;
            info!(path = %path.display(), "wrote cable parameters");
        }
        None => print_json_pretty(&record)?,
    }

    Ok(())
}
