use std::io::Cursor;

use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run, RunFonts, Style, StyleType};
use tracing::debug;

use crate::error::ExportError;
use crate::styles::DocumentStyles;

/// Generate a DOCX document from rendered Markdown-ish report output.
///
/// Understood subset:
/// - `#`, `##`, `###` headings
/// - `- item` bullets and `1. item` numbered items
/// - `> text` alert callouts, bold and in the alert colour
/// - `**bold**` inline runs
/// - `---` or `***` page break
pub fn generate_docx(rendered: &str, styles: &DocumentStyles) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new()
        .add_style(heading_style("Heading1", "heading 1", styles.heading1_size))
        .add_style(heading_style("Heading2", "heading 2", styles.heading2_size))
        .add_style(heading_style("Heading3", "heading 3", styles.heading3_size));

    let mut paragraphs = 0usize;
    for line in rendered.lines() {
        docx = docx.add_paragraph(line_paragraph(line.trim(), styles));
        paragraphs += 1;
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    debug!(paragraphs, "docx generated");
    Ok(buf.into_inner())
}

fn line_paragraph(trimmed: &str, styles: &DocumentStyles) -> Paragraph {
    if trimmed.is_empty() {
        return Paragraph::new();
    }

    if let Some(text) = trimmed.strip_prefix("### ") {
        heading_paragraph(text, "Heading3", styles)
    } else if let Some(text) = trimmed.strip_prefix("## ") {
        heading_paragraph(text, "Heading2", styles)
    } else if let Some(text) = trimmed.strip_prefix("# ") {
        heading_paragraph(text, "Heading1", styles)
    } else if let Some(text) = trimmed.strip_prefix("- ") {
        list_paragraph("\u{2022} ", text, styles)
    } else if let Some((marker, text)) = numbered_item(trimmed) {
        list_paragraph(&format!("{marker} "), text, styles)
    } else if let Some(text) = trimmed.strip_prefix("> ") {
        alert_paragraph(text, styles)
    } else if trimmed == "---" || trimmed == "***" {
        Paragraph::new().add_run(Run::new().add_break(BreakType::Page))
    } else {
        body_paragraph(trimmed, styles)
    }
}

/// `12. text` → (`12.`, `text`).
fn numbered_item(line: &str) -> Option<(&str, &str)> {
    let dot = line.find(". ")?;
    let digits = &line[..dot];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((&line[..=dot], &line[dot + 2..]))
}

fn heading_style(style_id: &str, name: &str, size_pt: usize) -> Style {
    Style::new(style_id, StyleType::Paragraph)
        .name(name)
        .size(size_pt * 2) // half-points
        .bold()
}

fn heading_paragraph(text: &str, style_id: &str, styles: &DocumentStyles) -> Paragraph {
    Paragraph::new().style(style_id).add_run(
        Run::new()
            .add_text(text)
            .fonts(RunFonts::new().ascii(&styles.heading_font)),
    )
}

fn list_paragraph(marker: &str, text: &str, styles: &DocumentStyles) -> Paragraph {
    let mut para = Paragraph::new()
        .align(AlignmentType::Left)
        .add_run(body_run(marker, styles));
    for run in parse_inline(text, styles) {
        para = para.add_run(run);
    }
    para
}

fn alert_paragraph(text: &str, styles: &DocumentStyles) -> Paragraph {
    let plain = text.replace("**", "");
    Paragraph::new().align(AlignmentType::Left).add_run(
        body_run(&plain, styles)
            .bold()
            .color(&styles.alert_color),
    )
}

fn body_paragraph(text: &str, styles: &DocumentStyles) -> Paragraph {
    let mut para = Paragraph::new().align(AlignmentType::Left);
    for run in parse_inline(text, styles) {
        para = para.add_run(run);
    }
    para
}

fn body_run(text: &str, styles: &DocumentStyles) -> Run {
    Run::new()
        .add_text(text)
        .size(styles.body_size * 2)
        .fonts(RunFonts::new().ascii(&styles.body_font))
}

/// Split `**bold**` segments into runs. An unclosed marker is kept as text.
fn parse_inline(text: &str, styles: &DocumentStyles) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut remaining = text;

    while let Some(start) = remaining.find("**") {
        let before = &remaining[..start];
        let after_start = &remaining[start + 2..];
        let Some(end) = after_start.find("**") else {
            break;
        };
        if !before.is_empty() {
            runs.push(body_run(before, styles));
        }
        runs.push(body_run(&after_start[..end], styles).bold());
        remaining = &after_start[end + 2..];
    }

    if !remaining.is_empty() {
        runs.push(body_run(remaining, styles));
    }
    runs
}
