//! Plain-text PDF output for generated books
//!
//! Produces US Letter pages set in Helvetica: a centered title on the first
//! page, then the body word-wrapped and paginated. Characters outside
//! Latin-1 are replaced, since the standard fonts cannot show them.

use crate::error::GenerationError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 72;
const TITLE_SIZE: i64 = 20;
const BODY_SIZE: i64 = 12;
const LEADING: i64 = 16;
/// Characters per body line at 12pt Helvetica within the margins
const WRAP_COLUMNS: usize = 80;

fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}

/// Wrap text to `width` columns, keeping paragraph breaks
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

fn text_block(x: i64, y: i64, size: i64, lines: &[String]) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), Object::Integer(size)]),
        Operation::new("TL", vec![Object::Integer(LEADING)]),
        Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]),
    ];
    for line in lines {
        ops.push(Operation::new("Tj", vec![Object::string_literal(latin1(line))]));
        ops.push(Operation::new("T*", vec![]));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    operations: Vec<Operation>,
) -> Result<ObjectId, GenerationError> {
    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| GenerationError::Render(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

/// Render a titled text document to PDF bytes
pub fn render_text_pdf(title: &str, body: &str) -> Result<Vec<u8>, GenerationError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let lines = wrap_lines(body, WRAP_COLUMNS);
    let lines_per_page = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;
    // The title takes three body lines on the first page
    let first_page_lines = lines_per_page.saturating_sub(3);

    let title_width = title.chars().count() as i64 * TITLE_SIZE / 2;
    let title_x = ((PAGE_WIDTH - title_width) / 2).max(MARGIN);
    let top = PAGE_HEIGHT - MARGIN;

    let mut page_ids = Vec::new();
    let (first, rest) = lines.split_at(first_page_lines.min(lines.len()));

    let mut ops = text_block(title_x, top, TITLE_SIZE, &[title.to_string()]);
    ops.extend(text_block(MARGIN, top - 3 * LEADING, BODY_SIZE, first));
    page_ids.push(add_page(&mut doc, pages_id, ops)?);

    for chunk in rest.chunks(lines_per_page) {
        let ops = text_block(MARGIN, top, BODY_SIZE, chunk);
        page_ids.push(add_page(&mut doc, pages_id, ops)?);
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => page_ids.len() as i64,
        "Kids" => page_ids.into_iter().map(Object::from).collect::<Vec<Object>>(),
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| GenerationError::Render(e.to_string()))?;
    Ok(out)
}
