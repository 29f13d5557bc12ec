//! Text-only PDF documents on A4 pages with the built-in Helvetica faces.
//!
//! Content is laid out into [`Page`]s first and encoded with `lopdf` afterwards, so pagination can
//! be inspected without parsing PDF bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use thiserror::Error;

pub(crate) const PAGE_WIDTH: f32 = 595.0;
pub(crate) const PAGE_HEIGHT: f32 = 842.0;
pub(crate) const MARGIN_X: f32 = 50.0;
pub(crate) const MARGIN_TOP: f32 = 50.0;
pub(crate) const MARGIN_BOTTOM: f32 = 50.0;

const LINE_SPACING: f32 = 1.4;
const CONTINUATION_SIZE: f32 = 11.0;

#[derive(Debug, Error)]
pub(crate) enum PdfError {
    #[error("failed to encode page content: {0}")]
    Content(String),
    #[error("failed to write PDF: {0}")]
    Write(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FontStyle {
    Regular,
    Bold,
}

impl FontStyle {
    fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlacedLine {
    pub(crate) text: String,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) size: f32,
    pub(crate) style: FontStyle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Page {
    pub(crate) lines: Vec<PlacedLine>,
}

impl Page {
    pub(crate) fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct DocumentLayout {
    title: String,
    continuation_header: String,
    pages: Vec<Page>,
    cursor_y: f32,
}

impl DocumentLayout {
    /// `continuation_header` is printed at the top of every page after the first.
    pub(crate) fn new(title: impl Into<String>, continuation_header: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            continuation_header: continuation_header.into(),
            pages: vec![Page::default()],
            cursor_y: PAGE_HEIGHT - MARGIN_TOP,
        }
    }

    pub(crate) fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub(crate) fn heading(&mut self, text: &str, size: f32) {
        self.write_wrapped(text, size, FontStyle::Bold, 0.0);
    }

    pub(crate) fn paragraph(&mut self, text: &str, size: f32) {
        self.write_wrapped(text, size, FontStyle::Regular, 0.0);
    }

    pub(crate) fn indented(&mut self, text: &str, size: f32, indent: f32) {
        self.write_wrapped(text, size, FontStyle::Regular, indent);
    }

    pub(crate) fn spacer(&mut self, height: f32) {
        self.cursor_y -= height;
    }

    fn write_wrapped(&mut self, text: &str, size: f32, style: FontStyle, indent: f32) {
        let max_width = PAGE_WIDTH - 2.0 * MARGIN_X - indent;
        for line in word_wrap(text, max_width, size) {
            self.place_line(line, size, style, MARGIN_X + indent);
        }
    }

    fn place_line(&mut self, text: String, size: f32, style: FontStyle, x: f32) {
        let line_height = size * LINE_SPACING;
        if self.cursor_y - line_height < MARGIN_BOTTOM {
            self.start_continuation_page();
        }

        let y = self.cursor_y - size;
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(PlacedLine { text, x, y, size, style });
        }
        self.cursor_y -= line_height;
    }

    fn start_continuation_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor_y = PAGE_HEIGHT - MARGIN_TOP;
        let header = self.continuation_header.clone();
        for line in word_wrap(&header, PAGE_WIDTH - 2.0 * MARGIN_X, CONTINUATION_SIZE) {
            let y = self.cursor_y - CONTINUATION_SIZE;
            if let Some(page) = self.pages.last_mut() {
                page.lines.push(PlacedLine {
                    text: line,
                    x: MARGIN_X,
                    y,
                    size: CONTINUATION_SIZE,
                    style: FontStyle::Bold,
                });
            }
            self.cursor_y -= CONTINUATION_SIZE * LINE_SPACING;
        }
        self.cursor_y -= 10.0;
    }

    /// Encodes the laid out pages into a PDF file.
    pub(crate) fn render(&self) -> Result<Vec<u8>, PdfError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font_dictionary("Helvetica"));
        let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FontStyle::Regular.resource_name() => regular_id,
                FontStyle::Bold.resource_name() => bold_id,
            },
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let page_id = add_page(&mut doc, pages_id, resources_id, page)?;
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
            }),
        );

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(encode_win_ansi(&self.title), StringFormat::Literal),
            "Producer" => Object::string_literal("Examly"),
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut output = Vec::new();
        doc.save_to(&mut output).map_err(|err| PdfError::Write(err.to_string()))?;
        Ok(output)
    }
}

fn font_dictionary(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page: &Page,
) -> Result<ObjectId, PdfError> {
    let mut operations = Vec::with_capacity(page.lines.len() * 5);
    for line in &page.lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![line.style.resource_name().into(), Object::Real(line.size.into())],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(line.x.into()), Object::Real(line.y.into())],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&line.text), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    let content = Content { operations }
        .encode()
        .map_err(|err| PdfError::Content(err.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH as i64),
            Object::Integer(PAGE_HEIGHT as i64),
        ],
    }))
}

/// Single-byte text for the standard fonts; anything outside printable Latin-1 becomes `?`.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch as u32 {
            code @ (0x20..=0x7e | 0xa0..=0xff) => code as u8,
            _ => b'?',
        })
        .collect()
}

// Helvetica advance widths for 0x20..=0x7e, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, 1015, 667, 667, 722, 722, 667,
    611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667,
    667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500,
    222, 833, 556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

fn char_width(ch: char, size: f32) -> f32 {
    let units = match ch as u32 {
        code @ 0x20..=0x7e => HELVETICA_WIDTHS[(code - 0x20) as usize],
        _ => 556,
    };
    // Bold faces run slightly wider; measure against the wider face.
    f32::from(units) * 1.05 * size / 1000.0
}

pub(crate) fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(|ch| char_width(ch, size)).sum()
}

/// Greedy word wrap. Words wider than a line are split at character boundaries.
/// Always returns at least one line.
pub(crate) fn word_wrap(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let space_width = char_width(' ', size);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_width = text_width(word, size);

        if word_width > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut chunk_width = 0.0_f32;
            for ch in word.chars() {
                let width = char_width(ch, size);
                if chunk_width + width > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    chunk_width = 0.0;
                }
                current.push(ch);
                chunk_width += width;
            }
            current_width = chunk_width;
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space_width + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space_width + word_width;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
