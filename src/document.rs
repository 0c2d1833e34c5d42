//! Document composition
//!
//! Lays the profile out as a fixed single-column page and serializes it as PDF.

use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use thiserror::Error;

use crate::layout::{LayoutSettings, TextStyle};
use crate::profile::{Field, ProfileInput};
use crate::text::{encode_win_ansi, wrap, Font};
use crate::thumbnail::Thumbnail;

pub const TITLE: &str = "Portfolio";
const IMAGE_RESOURCE: &str = "Im1";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{0}")]
    Pdf(#[from] lopdf::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Document-level metadata written to the info dictionary.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub author: String,
    pub producer: String,
    pub created_at: DateTime<Utc>,
}

/// Output of [`render`]: the PDF bytes and how many pages they hold.
#[derive(Debug)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Collects content operations page by page, moving a cursor down the column.
struct PageWriter<'a> {
    settings: &'a LayoutSettings,
    pages: Vec<Vec<Operation>>,
    cursor_y: f32,
}

impl<'a> PageWriter<'a> {
    fn new(settings: &'a LayoutSettings) -> Self {
        let mut writer = Self {
            settings,
            pages: vec![],
            cursor_y: 0.0,
        };
        writer.new_page();
        writer
    }

    fn top(&self) -> f32 {
        self.settings.page_size.dimensions().1 - self.settings.margin_pt
    }

    fn new_page(&mut self) {
        self.pages.push(vec![]);
        self.cursor_y = self.top();
    }

    /// Make room for `height` points, starting a new page when the current
    /// one is full. A block taller than a whole page is placed anyway.
    fn reserve(&mut self, height: f32) {
        let at_top = (self.cursor_y - self.top()).abs() < f32::EPSILON;
        if self.cursor_y - height < self.settings.margin_pt && !at_top {
            self.new_page();
        }
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        // new() always pushes a first page
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn line(&mut self, encoded: Vec<u8>, font: Font, style: TextStyle, centered: bool) {
        self.reserve(style.leading);
        self.cursor_y -= style.leading;

        let x = if centered {
            let page_width = self.settings.page_size.dimensions().0;
            (page_width - font.measure(&encoded, style.size)) / 2.0
        } else {
            self.settings.margin_pt
        };
        // Baseline sits a little above the bottom of the line box
        let baseline = self.cursor_y + (style.leading - style.size) / 2.0 + style.size * 0.2;

        self.ops().extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(font.resource_name().into()), real(style.size)]),
            Operation::new("Td", vec![real(x), real(baseline)]),
            Operation::new("Tj", vec![Object::String(encoded, StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn paragraph(&mut self, text: &str, font: Font, style: TextStyle) {
        let width = self.settings.column_width();
        for source_line in text.lines() {
            for line in wrap(&encode_win_ansi(source_line), font, style.size, width) {
                self.line(line, font, style, false);
            }
        }
        self.cursor_y -= style.space_after;
    }

    fn labeled(&mut self, field: Field, value: &str) {
        let style = self.settings.label;
        let text = format!("{}: {}", field.label(), value);
        self.paragraph(&text, Font::Helvetica, style);
    }

    fn image(&mut self, thumbnail: &Thumbnail) {
        let side = self.settings.thumbnail_display_pt;
        self.reserve(side);

        // Fit the picture into the square display box, centered on the page
        let scale = side / thumbnail.width.max(thumbnail.height) as f32;
        let w = thumbnail.width as f32 * scale;
        let h = thumbnail.height as f32 * scale;
        let page_width = self.settings.page_size.dimensions().0;
        let x = (page_width - w) / 2.0;
        let y = self.cursor_y - side + (side - h) / 2.0;
        self.cursor_y -= side;

        self.ops().extend([
            Operation::new("q", vec![]),
            Operation::new("cm", vec![real(w), real(0.0), real(0.0), real(h), real(x), real(y)]),
            Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.into())]),
            Operation::new("Q", vec![]),
        ]);
    }
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

/// Lay out the page content: title, labeled fields, skills, thumbnail.
fn compose(
    profile: &ProfileInput,
    thumbnail: Option<&Thumbnail>,
    settings: &LayoutSettings,
) -> Vec<Vec<Operation>> {
    let mut writer = PageWriter::new(settings);

    writer.line(encode_win_ansi(TITLE), Font::HelveticaBold, settings.title, true);
    writer.cursor_y -= settings.title.space_after;

    for field in [Field::Name, Field::PhoneNumber, Field::Email, Field::Qualification] {
        writer.labeled(field, profile.get(field));
    }

    writer.paragraph("Skills:", Font::Helvetica, settings.label);
    writer.paragraph(&profile.skills, Font::Helvetica, settings.skills);

    if let Some(thumbnail) = thumbnail {
        writer.image(thumbnail);
    }

    writer.pages
}

/// Render the portfolio as a complete PDF held in memory.
pub fn render(
    profile: &ProfileInput,
    thumbnail: Option<&Thumbnail>,
    settings: &LayoutSettings,
    info: &DocumentInfo,
) -> Result<RenderedDocument, DocumentError> {
    let pages = compose(profile, thumbnail, settings);
    let (page_width, page_height) = settings.page_size.dimensions();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for font in [Font::Helvetica, Font::HelveticaBold] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }

    let mut resources = dictionary! {
        "Font" => fonts,
    };
    if let Some(thumbnail) = thumbnail {
        let image_id = add_jpeg(&mut doc, thumbnail);
        resources.set("XObject", dictionary! { IMAGE_RESOURCE => image_id });
    }
    let resources_id = doc.add_object(resources);

    let page_count = pages.len();
    let mut kids: Vec<Object> = Vec::with_capacity(page_count);
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), real(page_width), real(page_height)],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = add_info(&mut doc, info);
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;

    Ok(RenderedDocument { bytes, page_count })
}

fn add_jpeg(doc: &mut Document, thumbnail: &Thumbnail) -> ObjectId {
    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => thumbnail.width as i64,
            "Height" => thumbnail.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        thumbnail.jpeg.clone(),
    )
    // Already DCT-encoded; recompressing would break the filter chain
    .with_compression(false);
    doc.add_object(stream)
}

fn add_info(doc: &mut Document, info: &DocumentInfo) -> ObjectId {
    let date = info.created_at.format("D:%Y%m%d%H%M%SZ").to_string();
    doc.add_object(dictionary! {
        "Title" => Object::string_literal(TITLE),
        "Author" => Object::String(encode_win_ansi(&info.author), StringFormat::Literal),
        "Producer" => Object::string_literal(info.producer.as_str()),
        "CreationDate" => Object::string_literal(date),
    })
}
