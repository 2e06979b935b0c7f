use std::collections::HashMap;
use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::objects::{ObjId, PdfObject};

/// Low-level PDF binary writer. Serializes PDF objects to any
/// `Write` target while tracking byte offsets for the xref table.
pub struct PdfWriter<W: Write> {
    writer: W,
    offset: usize,
    xref_entries: Vec<(u32, usize)>,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W) -> Self {
        PdfWriter {
            writer,
            offset: 0,
            xref_entries: Vec::new(),
        }
    }

    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.offset += data.len();
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Write the PDF 1.7 header and binary comment.
    pub fn write_header(&mut self) -> io::Result<()> {
        self.write_str("%PDF-1.7\n")?;
        // 4 bytes >= 128 mark the file as binary.
        self.write_bytes(b"%\xe2\xe3\xcf\xd3\n")
    }

    /// Write an indirect object, recording its byte offset for xref.
    pub fn write_object(&mut self, id: ObjId, obj: &PdfObject) -> io::Result<()> {
        self.xref_entries.push((id.0, self.offset));
        self.write_str(&format!("{} {} obj\n", id.0, id.1))?;
        self.write_pdf_object(obj)?;
        self.write_str("\nendobj\n")
    }

    fn write_entries(&mut self, entries: &[(String, PdfObject)]) -> io::Result<()> {
        for (key, val) in entries {
            self.write_str(" /")?;
            self.write_str(key)?;
            self.write_str(" ")?;
            self.write_pdf_object(val)?;
        }
        Ok(())
    }

    fn write_pdf_object(&mut self, obj: &PdfObject) -> io::Result<()> {
        match obj {
            PdfObject::Integer(n) => self.write_str(&n.to_string()),
            PdfObject::Real(f) => self.write_str(&format_real(*f)),
            PdfObject::Name(name) => {
                self.write_str("/")?;
                self.write_str(name)
            }
            PdfObject::Text(s) => self.write_str(&encode_text_string(s)),
            PdfObject::Array(items) => {
                self.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.write_str(" ")?;
                    }
                    self.write_pdf_object(item)?;
                }
                self.write_str("]")
            }
            PdfObject::Dictionary(entries) => {
                self.write_str("<<")?;
                self.write_entries(entries)?;
                self.write_str(" >>")
            }
            PdfObject::Stream { dict, data } => {
                self.write_str("<<")?;
                self.write_entries(dict)?;
                self.write_str(&format!(" /Length {} >>\nstream\n", data.len()))?;
                self.write_bytes(data)?;
                self.write_str("\nendstream")
            }
            PdfObject::Reference(id) => self.write_str(&format!("{} {} R", id.0, id.1)),
        }
    }

    /// Write xref table, trailer, startxref, and %%EOF.
    pub fn write_xref_and_trailer(&mut self, root_id: ObjId, info_id: Option<ObjId>) -> io::Result<()> {
        let xref_offset = self.offset;

        let offsets: HashMap<u32, usize> = self.xref_entries.iter().copied().collect();
        let size = offsets.keys().max().copied().unwrap_or(0) + 1;

        self.write_str(&format!("xref\n0 {}\n", size))?;
        // Each entry is exactly 20 bytes.
        self.write_bytes(b"0000000000 65535 f\r\n")?;
        for obj_num in 1..size {
            match offsets.get(&obj_num) {
                Some(off) => self.write_str(&format!("{:010} 00000 n\r\n", off))?,
                None => self.write_bytes(b"0000000000 00000 f\r\n")?,
            }
        }

        self.write_str(&format!(
            "trailer\n<< /Size {} /Root {} {} R",
            size, root_id.0, root_id.1
        ))?;
        if let Some(info) = info_id {
            self.write_str(&format!(" /Info {} {} R", info.0, info.1))?;
        }
        self.write_str(" >>\n")?;
        self.write_str(&format!("startxref\n{}\n%%EOF\n", xref_offset))
    }

    /// Return the inner writer, consuming this PdfWriter.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Zlib-compress stream data for `/FlateDecode`.
pub fn deflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Build a stream object, compressing `data` when asked.
pub fn content_stream(mut dict: Vec<(&str, PdfObject)>, data: Vec<u8>, compress: bool) -> io::Result<PdfObject> {
    if compress {
        dict.push(("Filter", PdfObject::name("FlateDecode")));
        Ok(PdfObject::stream(dict, deflate(&data)?))
    } else {
        Ok(PdfObject::stream(dict, data))
    }
}

/// Escape special characters in a PDF literal string.
pub fn escape_pdf_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '(' => result.push_str("\\("),
            ')' => result.push_str("\\)"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape raw bytes (already font-encoded) for a literal string.
pub fn escape_pdf_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    for &b in bytes {
        match b {
            b'\\' | b'(' | b')' => {
                out.push(b'\\');
                out.push(b);
            }
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\n' => out.extend_from_slice(b"\\n"),
            _ => out.push(b),
        }
    }
    out
}

fn encode_text_string(s: &str) -> String {
    if s.chars().all(|c| (' '..='~').contains(&c)) {
        return format!("({})", escape_pdf_string(s));
    }
    let mut hex = String::from("<FEFF");
    for unit in s.encode_utf16() {
        hex.push_str(&format!("{:04X}", unit));
    }
    hex.push('>');
    hex
}

/// Format a float for PDF output: no trailing zeros,
/// no scientific notation.
fn format_real(f: f64) -> String {
    if f == f.floor() && f.abs() < 1e15 {
        format!("{:.1}", f)
    } else {
        let s = format!("{:.6}", f);
        let s = s.trim_end_matches('0');
        let s = s.trim_end_matches('.');
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(obj: PdfObject) -> String {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_object(ObjId(1, 0), &obj).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn header_is_binary_marked() {
        let mut buf = Vec::new();
        PdfWriter::new(&mut buf).write_header().unwrap();
        assert!(buf.starts_with(b"%PDF-1.7\n%"));
        assert!(buf[10..14].iter().all(|&b| b >= 128));
    }

    #[test]
    fn dictionary_and_array() {
        let out = written(PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::array(vec![PdfObject::Reference(ObjId(3, 0))])),
            ("Count", PdfObject::Integer(1)),
        ]));
        assert!(out.contains("<< /Type /Pages /Kids [3 0 R] /Count 1 >>"));
    }

    #[test]
    fn stream_length_matches_data() {
        let out = written(PdfObject::stream(vec![], b"BT ET".to_vec()));
        assert!(out.contains("/Length 5 >>\nstream\nBT ET\nendstream"));
    }

    #[test]
    fn text_strings() {
        assert!(written(PdfObject::text("a(b)")).contains("(a\\(b\\))"));
        assert!(written(PdfObject::text("é")).contains("<FEFF00E9>"));
    }

    #[test]
    fn compressed_stream_has_filter() {
        let obj = content_stream(vec![], b"0 0 m".repeat(50), true).unwrap();
        match obj {
            PdfObject::Stream { dict, data } => {
                assert_eq!(dict[0].0, "Filter");
                assert!(data.len() < 250);
            }
            _ => panic!("expected Stream"),
        }
    }

    #[test]
    fn xref_entries_are_20_bytes() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_header().unwrap();
        w.write_object(ObjId(1, 0), &PdfObject::name("Catalog")).unwrap();
        w.write_xref_and_trailer(ObjId(1, 0), None).unwrap();

        let marker = b"xref\n0 2\n";
        let pos = buf.windows(marker.len()).position(|w| w == marker).unwrap();
        let entries = &buf[pos + marker.len()..];
        assert_eq!(&entries[18..20], b"\r\n");
        assert_eq!(&entries[38..40], b"\r\n");
        let tail = String::from_utf8_lossy(&buf);
        assert!(tail.contains("/Size 2 /Root 1 0 R"));
        assert!(tail.ends_with("%%EOF\n"));
    }

    #[test]
    fn byte_escaping() {
        assert_eq!(escape_pdf_bytes(b"a(b)\\"), b"a\\(b\\)\\\\".to_vec());
        assert_eq!(escape_pdf_bytes(&[0x80, b'x']), vec![0x80, b'x']);
    }

    #[test]
    fn real_formatting() {
        assert_eq!(format_real(595.0), "595.0");
        assert_eq!(format_real(841.89), "841.89");
    }
}
