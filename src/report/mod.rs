pub mod pdf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_REPORT_TITLE: &str = "Cable Short-Circuit Calculation Report";

/// Caller-supplied report content, accepted in the same camelCase shape the
/// web client posts (`title`, `conductorText`, `sheathText`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportRequest {
    pub title: String,
    pub conductor_text: String,
    pub sheath_text: String,
}

/// Fixed A4 page geometry in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub width: i32,
    pub height: i32,
    pub title_center_x: i32,
    pub title_y: i32,
    pub title_size: i32,
    pub body_x: i32,
    pub first_body_y: i32,
    pub continuation_body_y: i32,
    pub bottom_margin: i32,
    pub body_size: i32,
    pub line_height: i32,
    pub wrap_columns: usize,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: 595,
            height: 842,
            title_center_x: 300,
            title_y: 800,
            title_size: 14,
            body_x: 50,
            first_body_y: 760,
            continuation_body_y: 800,
            bottom_margin: 50,
            body_size: 10,
            line_height: 14,
            wrap_columns: 95,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedLine {
    pub x: i32,
    pub y: i32,
    pub font: FontFace,
    pub size: i32,
    pub alignment: Alignment,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportPage {
    pub lines: Vec<PositionedLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<ReportPage>,
}

impl ReportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

pub fn resolve_title(title: &str) -> &str {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        DEFAULT_REPORT_TITLE
    } else {
        trimmed
    }
}

/// Lays the title and the two text blocks out top to bottom, starting a new
/// page whenever the next baseline would drop below the bottom margin.
pub fn compose_report(request: &ReportRequest, geometry: &PageGeometry) -> ReportDocument {
    let mut pages = vec![ReportPage {
        lines: vec![PositionedLine {
            x: geometry.title_center_x,
            y: geometry.title_y,
            font: FontFace::Bold,
            size: geometry.title_size,
            alignment: Alignment::Center,
            text: resolve_title(&request.title).to_string(),
        }],
    }];

    let mut cursor_y = geometry.first_body_y;
    let mut emitted_block = false;

    for block in [&request.conductor_text, &request.sheath_text] {
        if block.trim().is_empty() {
            continue;
        }
        if emitted_block {
            cursor_y -= geometry.line_height;
        }
        emitted_block = true;

        for line in block.trim_matches(['\r', '\n']).lines() {
            for segment in wrap_line(line.trim_end(), geometry.wrap_columns) {
                if cursor_y < geometry.bottom_margin {
                    pages.push(ReportPage::default());
                    cursor_y = geometry.continuation_body_y;
                }
                if !segment.is_empty() {
                    if let Some(page) = pages.last_mut() {
                        page.lines.push(PositionedLine {
                            x: geometry.body_x,
                            y: cursor_y,
                            font: FontFace::Regular,
                            size: geometry.body_size,
                            alignment: Alignment::Left,
                            text: segment,
                        });
                    }
                }
                cursor_y -= geometry.line_height;
            }
        }
    }

    ReportDocument {
        geometry: *geometry,
        pages,
    }
}

/// Soft-wraps at word boundaries; words longer than `columns` are split.
/// A blank line yields one empty segment so vertical spacing is kept.
pub fn wrap_line(line: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut segments = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let mut word = word.chars().collect::<Vec<char>>();

        while word.len() > columns {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(columns);
            segments.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if !current.is_empty() && current_len + 1 + word.len() > columns {
            segments.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || segments.is_empty() {
        segments.push(current);
    }
    segments
}
