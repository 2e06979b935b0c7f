use std::collections::BTreeSet;
use std::io::{self, Write};

use super::fonts::{self, Font};
use super::graphics::{format_coord, Color, Rect};
use super::images::{ImageData, ImageFormat};
use super::objects::{ObjId, PdfObject};
use super::table::{FitResult, Row, Table, TableCursor};
use super::writer::{content_stream, escape_pdf_bytes, PdfWriter};

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const FIRST_FONT_OBJ_NUM: u32 = 3;
const FIRST_DYNAMIC_OBJ_NUM: u32 = FIRST_FONT_OBJ_NUM + Font::ALL.len() as u32;

/// Font, size and fill color for a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size: f64,
    pub color: Color,
}

impl TextStyle {
    pub fn new(font: Font, size: f64, color: Color) -> Self {
        TextStyle { font, size, color }
    }
}

/// Handle to an image XObject already written to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub usize);

struct PageBuilder {
    content: Vec<u8>,
    images: BTreeSet<ImageId>,
}

impl PageBuilder {
    fn new() -> Self {
        PageBuilder {
            content: Vec::new(),
            images: BTreeSet::new(),
        }
    }
}

/// Streaming PDF page builder.
///
/// Generic over `Write` so output can go to a file or a `Vec<u8>`. A page is
/// always open: the first one starts in [`PdfCanvas::new`], later ones with
/// [`PdfCanvas::new_page`], which flushes the previous page to the writer.
/// Coordinates use PDF's bottom-left origin.
pub struct PdfCanvas<W: Write> {
    writer: PdfWriter<W>,
    width: f64,
    height: f64,
    compress: bool,
    info: Vec<(String, String)>,
    page_obj_ids: Vec<ObjId>,
    page: PageBuilder,
    image_obj_ids: Vec<ObjId>,
    next_obj_num: u32,
}

impl<W: Write> PdfCanvas<W> {
    /// Write the header and the shared font objects, then open page one.
    pub fn new(writer: W, width: f64, height: f64, compress: bool) -> io::Result<Self> {
        let mut pdf_writer = PdfWriter::new(writer);
        pdf_writer.write_header()?;

        for (i, font) in Font::ALL.iter().enumerate() {
            let obj = PdfObject::dict(vec![
                ("Type", PdfObject::name("Font")),
                ("Subtype", PdfObject::name("Type1")),
                ("BaseFont", PdfObject::name(font.base_name())),
                ("Encoding", PdfObject::name("WinAnsiEncoding")),
            ]);
            pdf_writer.write_object(ObjId(FIRST_FONT_OBJ_NUM + i as u32, 0), &obj)?;
        }

        Ok(PdfCanvas {
            writer: pdf_writer,
            width,
            height,
            compress,
            info: Vec::new(),
            page_obj_ids: Vec::new(),
            page: PageBuilder::new(),
            image_obj_ids: Vec::new(),
            next_obj_num: FIRST_DYNAMIC_OBJ_NUM,
        })
    }

    /// Set a document info entry (e.g. "Creator", "Title").
    pub fn set_info(&mut self, key: &str, value: &str) -> &mut Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    pub fn page_width(&self) -> f64 {
        self.width
    }

    pub fn page_height(&self) -> f64 {
        self.height
    }

    /// Pages so far, including the open one.
    pub fn page_count(&self) -> usize {
        self.page_obj_ids.len() + 1
    }

    fn alloc(&mut self) -> ObjId {
        let id = ObjId(self.next_obj_num, 0);
        self.next_obj_num += 1;
        id
    }

    fn push(&mut self, ops: &[u8]) {
        self.page.content.extend_from_slice(ops);
    }

    /// Close the open page and start a new one.
    pub fn new_page(&mut self) -> io::Result<()> {
        self.flush_page()
    }

    fn flush_page(&mut self) -> io::Result<()> {
        let page = std::mem::replace(&mut self.page, PageBuilder::new());
        let content_id = self.alloc();
        let page_id = self.alloc();

        let stream = content_stream(vec![], page.content, self.compress)?;
        self.writer.write_object(content_id, &stream)?;

        let fonts: Vec<(&str, PdfObject)> = Font::ALL
            .iter()
            .enumerate()
            .map(|(i, f)| {
                (
                    f.resource_name(),
                    PdfObject::Reference(ObjId(FIRST_FONT_OBJ_NUM + i as u32, 0)),
                )
            })
            .collect();
        let mut resources = vec![("Font", PdfObject::dict(fonts))];
        if !page.images.is_empty() {
            let names: Vec<String> = page.images.iter().map(|id| image_name(*id)).collect();
            let entries: Vec<(&str, PdfObject)> = page
                .images
                .iter()
                .zip(&names)
                .map(|(id, name)| (name.as_str(), PdfObject::Reference(self.image_obj_ids[id.0])))
                .collect();
            resources.push(("XObject", PdfObject::dict(entries)));
        }

        let page_dict = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PdfObject::Reference(PAGES_OBJ)),
            (
                "MediaBox",
                PdfObject::array(vec![
                    PdfObject::Integer(0),
                    PdfObject::Integer(0),
                    PdfObject::Real(self.width),
                    PdfObject::Real(self.height),
                ]),
            ),
            ("Contents", PdfObject::Reference(content_id)),
            ("Resources", PdfObject::dict(resources)),
        ]);
        self.writer.write_object(page_id, &page_dict)?;
        self.page_obj_ids.push(page_id);
        Ok(())
    }

    /// Fill a rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) -> &mut Self {
        let ops = format!(
            "{}{} {} {} {} re\nf\n",
            color.fill_op(),
            format_coord(rect.x),
            format_coord(rect.bottom()),
            format_coord(rect.width),
            format_coord(rect.height)
        );
        self.push(ops.as_bytes());
        self
    }

    /// Stroke a straight line.
    pub fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f64) -> &mut Self {
        let ops = format!(
            "q\n{}{} w\n{} {} m\n{} {} l\nS\nQ\n",
            color.stroke_op(),
            format_coord(width),
            format_coord(from.0),
            format_coord(from.1),
            format_coord(to.0),
            format_coord(to.1)
        );
        self.push(ops.as_bytes());
        self
    }

    /// Draw one line of text with its baseline at `y`.
    pub fn text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> &mut Self {
        let ops = text_ops(text, x, y, style);
        self.push(&ops);
        self
    }

    /// Draw one line of text ending at `right`.
    pub fn text_right(&mut self, text: &str, right: f64, y: f64, style: &TextStyle) -> &mut Self {
        let w = fonts::measure(text, style.font, style.size);
        self.text(text, right - w, y, style)
    }

    /// Draw one line of text centered on `center`.
    pub fn text_centered(&mut self, text: &str, center: f64, y: f64, style: &TextStyle) -> &mut Self {
        let w = fonts::measure(text, style.font, style.size);
        self.text(text, center - w / 2.0, y, style)
    }

    /// Write an image XObject (plus its soft mask) and return its handle.
    /// The image can then be drawn on any page.
    pub fn add_image(&mut self, image: &ImageData) -> io::Result<ImageId> {
        let smask_id = match &image.smask_data {
            Some(alpha) => {
                let id = self.alloc();
                let obj = content_stream(
                    vec![
                        ("Type", PdfObject::name("XObject")),
                        ("Subtype", PdfObject::name("Image")),
                        ("Width", PdfObject::Integer(image.width as i64)),
                        ("Height", PdfObject::Integer(image.height as i64)),
                        ("ColorSpace", PdfObject::name("DeviceGray")),
                        ("BitsPerComponent", PdfObject::Integer(8)),
                    ],
                    alpha.clone(),
                    true,
                )?;
                self.writer.write_object(id, &obj)?;
                Some(id)
            }
            None => None,
        };

        let id = self.alloc();
        let mut dict = vec![
            ("Type", PdfObject::name("XObject")),
            ("Subtype", PdfObject::name("Image")),
            ("Width", PdfObject::Integer(image.width as i64)),
            ("Height", PdfObject::Integer(image.height as i64)),
            ("ColorSpace", PdfObject::name(image.color_space.pdf_name())),
            ("BitsPerComponent", PdfObject::Integer(8)),
        ];
        if let Some(mask) = smask_id {
            dict.push(("SMask", PdfObject::Reference(mask)));
        }
        let obj = match image.format {
            ImageFormat::Jpeg => {
                dict.push(("Filter", PdfObject::name("DCTDecode")));
                PdfObject::stream(dict, image.data.clone())
            }
            ImageFormat::Png => content_stream(dict, image.data.clone(), true)?,
        };
        self.writer.write_object(id, &obj)?;

        self.image_obj_ids.push(id);
        Ok(ImageId(self.image_obj_ids.len() - 1))
    }

    /// Draw a previously added image with its lower-left corner at `(x, y)`.
    pub fn draw_image(&mut self, image: ImageId, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        if image.0 >= self.image_obj_ids.len() {
            return self;
        }
        self.page.images.insert(image);
        let ops = format!(
            "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
            format_coord(width),
            format_coord(height),
            format_coord(x),
            format_coord(y),
            image_name(image)
        );
        self.push(ops.as_bytes());
        self
    }

    /// Place `row` under the cursor if it fits. The cursor advances only
    /// when the result is [`FitResult::Stop`].
    pub fn fit_row(&mut self, table: &Table, row: &Row, cursor: &mut TableCursor) -> FitResult {
        let (ops, result) = table.generate_row_ops(row, cursor);
        self.push(&ops);
        result
    }

    /// Place `row` under the cursor even if it overflows the cursor's area.
    pub fn place_row(&mut self, table: &Table, row: &Row, cursor: &mut TableCursor) {
        let ops = table.force_row_ops(row, cursor);
        self.push(&ops);
    }

    /// Finish the document: flush the open page, then write the info
    /// dictionary, page tree, catalog, xref table and trailer.
    pub fn finish(mut self) -> io::Result<W> {
        self.flush_page()?;

        let info_id = if self.info.is_empty() {
            None
        } else {
            let id = self.alloc();
            let entries: Vec<(&str, PdfObject)> = self
                .info
                .iter()
                .map(|(k, v)| (k.as_str(), PdfObject::text(v)))
                .collect();
            self.writer.write_object(id, &PdfObject::dict(entries))?;
            Some(id)
        };

        let kids: Vec<PdfObject> = self.page_obj_ids.iter().map(|id| PdfObject::Reference(*id)).collect();
        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::Array(kids)),
            ("Count", PdfObject::Integer(self.page_obj_ids.len() as i64)),
        ]);
        self.writer.write_object(PAGES_OBJ, &pages)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        self.writer.write_object(CATALOG_OBJ, &catalog)?;

        self.writer.write_xref_and_trailer(CATALOG_OBJ, info_id)?;
        Ok(self.writer.into_inner())
    }
}

fn image_name(id: ImageId) -> String {
    format!("Im{}", id.0 + 1)
}

/// Content ops for a single line of WinAnsi-encoded text.
pub(crate) fn text_ops(text: &str, x: f64, y: f64, style: &TextStyle) -> Vec<u8> {
    let mut ops = Vec::with_capacity(text.len() + 64);
    ops.extend_from_slice(
        format!(
            "BT\n{}/{} {} Tf\n{} {} Td\n(",
            style.color.fill_op(),
            style.font.resource_name(),
            format_coord(style.size),
            format_coord(x),
            format_coord(y)
        )
        .as_bytes(),
    );
    ops.extend_from_slice(&escape_pdf_bytes(&fonts::encode_win_ansi(text)));
    ops.extend_from_slice(b") Tj\nET\n");
    ops
}

#[cfg(test)]
mod tests {
    use super::super::images::ColorSpace;
    use super::*;

    fn canvas() -> PdfCanvas<Vec<u8>> {
        PdfCanvas::new(Vec::new(), 200.0, 300.0, false).unwrap()
    }

    #[test]
    fn empty_document_has_one_page() {
        let out = canvas().finish().unwrap();
        let s = String::from_utf8_lossy(&out);
        assert!(s.starts_with("%PDF-1.7"));
        assert!(s.contains("/Type /Pages"));
        assert!(s.contains("/Count 1"));
        assert!(s.contains("/BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding"));
    }

    #[test]
    fn new_page_counts() {
        let mut c = canvas();
        assert_eq!(c.page_count(), 1);
        c.new_page().unwrap();
        c.new_page().unwrap();
        assert_eq!(c.page_count(), 3);
        let s = String::from_utf8_lossy(&c.finish().unwrap()).into_owned();
        assert!(s.contains("/Count 3"));
    }

    #[test]
    fn text_is_win_ansi_encoded() {
        let mut c = canvas();
        let style = TextStyle::new(Font::Helvetica, 10.0, Color::gray(0.0));
        c.text("12 € (net)", 10.0, 20.0, &style);
        let out = c.finish().unwrap();
        let needle = b"(12 \x80 \\(net\\)) Tj";
        assert!(out.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn info_is_written() {
        let mut c = canvas();
        c.set_info("Title", "Facture N° 7");
        let s = String::from_utf8_lossy(&c.finish().unwrap()).into_owned();
        assert!(s.contains("/Title <FEFF"));
        assert!(s.contains("/Info"));
    }

    #[test]
    fn images_are_page_resources() {
        let mut c = canvas();
        let img = ImageData {
            width: 1,
            height: 1,
            format: ImageFormat::Png,
            color_space: ColorSpace::DeviceRGB,
            data: vec![255, 0, 0],
            smask_data: Some(vec![128]),
        };
        let id = c.add_image(&img).unwrap();
        c.draw_image(id, 0.0, 0.0, 10.0, 10.0);
        let s = String::from_utf8_lossy(&c.finish().unwrap()).into_owned();
        assert!(s.contains("/XObject << /Im1"));
        assert!(s.contains("/SMask"));
        assert!(s.contains("/Im1 Do"));
    }
}
