use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use super::{Alignment, FontFace, PositionedLine, ReportDocument};

const REGULAR_FONT_KEY: &str = "F1";
const BOLD_FONT_KEY: &str = "F2";
// Helvetica averages roughly half an em per glyph.
const APPROX_GLYPH_WIDTH_EM: f64 = 0.5;

pub fn render_pdf(document: &ReportDocument) -> Result<Vec<u8>> {
    let geometry = &document.geometry;
    let mut pdf = Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let regular_font_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_font_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT_KEY => regular_font_id,
            BOLD_FONT_KEY => bold_font_id,
        },
    });

    let mut kids = Vec::with_capacity(document.pages.len());
    for (index, page) in document.pages.iter().enumerate() {
        let content = Content {
            operations: page.lines.iter().flat_map(text_operations).collect::<Vec<Operation>>(),
        };
        let encoded = content
            .encode()
            .with_context(|| format!("failed to encode content stream for page {}", index + 1))?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = i64::try_from(kids.len()).context("report page count overflow")?;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(i64::from(geometry.width)),
                Object::Integer(i64::from(geometry.height)),
            ],
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.compress();

    let mut buffer = Vec::new();
    pdf.save_to(&mut buffer)
        .context("failed to serialize report PDF")?;
    Ok(buffer)
}

fn text_operations(line: &PositionedLine) -> Vec<Operation> {
    let font_key = match line.font {
        FontFace::Regular => REGULAR_FONT_KEY,
        FontFace::Bold => BOLD_FONT_KEY,
    };
    let text = winansi_safe(&line.text);
    let x = match line.alignment {
        Alignment::Left => line.x,
        Alignment::Center => {
            let width = text.chars().count() as f64 * f64::from(line.size) * APPROX_GLYPH_WIDTH_EM;
            line.x - (width / 2.0).round() as i32
        }
    };

    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(font_key.as_bytes().to_vec()), Object::Integer(i64::from(line.size))],
        ),
        Operation::new(
            "Td",
            vec![Object::Integer(i64::from(x)), Object::Integer(i64::from(line.y))],
        ),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

fn winansi_safe(text: &str) -> String {
    text.chars()
        .map(|character| {
            if character.is_ascii() && !character.is_ascii_control() {
                character
            } else {
                '?'
            }
        })
        .collect()
}
