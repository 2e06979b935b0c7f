//! Logo decoding: `data:` URIs, JPEG pass-through and PNG pixels.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::ImageError;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// PDF color space for image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceRGB,
    DeviceGray,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceGray => "DeviceGray",
        }
    }
}

/// Parsed image data ready for embedding into a PDF.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub color_space: ColorSpace,
    /// Raw pixel data (RGB/Gray) or raw JPEG bytes.
    pub data: Vec<u8>,
    /// Separate alpha channel (grayscale), if present.
    pub smask_data: Option<Vec<u8>>,
}

/// Extract the payload of a base64 `data:` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ImageError> {
    let rest = uri.trim().strip_prefix("data:").ok_or(ImageError::NotDataUri)?;
    let (meta, payload) = rest.split_once(',').ok_or(ImageError::NotDataUri)?;
    if !meta.ends_with(";base64") {
        return Err(ImageError::NotDataUri);
    }
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| ImageError::Base64(e.to_string()))
}

/// Build a `data:` URI from raw image bytes.
pub fn encode_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Detect image format from magic bytes.
pub fn detect_format(data: &[u8]) -> Result<ImageFormat, ImageError> {
    if data.starts_with(&[0xFF, 0xD8]) {
        Ok(ImageFormat::Jpeg)
    } else if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        Ok(ImageFormat::Png)
    } else {
        Err(ImageError::UnsupportedFormat)
    }
}

/// Load and parse image data from raw bytes.
pub fn load_image(data: Vec<u8>) -> Result<ImageData, ImageError> {
    match detect_format(&data)? {
        ImageFormat::Jpeg => parse_jpeg(data),
        ImageFormat::Png => parse_png(&data),
    }
}

/// Decode a logo given as a `data:` URI.
pub fn load_data_uri(uri: &str) -> Result<ImageData, ImageError> {
    load_image(decode_data_uri(uri)?)
}

/// JPEG data is embedded as-is (DCTDecode); only the SOF header is read.
fn parse_jpeg(data: Vec<u8>) -> Result<ImageData, ImageError> {
    let (width, height, components) = jpeg_dimensions(&data)?;
    let color_space = match components {
        1 => ColorSpace::DeviceGray,
        3 => ColorSpace::DeviceRGB,
        n => {
            return Err(ImageError::Jpeg(format!(
                "unsupported component count {} (expected 1 or 3)",
                n
            )))
        }
    };
    if width == 0 || height == 0 {
        return Err(ImageError::Jpeg("zero-sized image".to_string()));
    }

    Ok(ImageData {
        width,
        height,
        format: ImageFormat::Jpeg,
        color_space,
        data,
        smask_data: None,
    })
}

/// Scan for an SOF0-SOF3 marker and read width, height and components.
fn jpeg_dimensions(data: &[u8]) -> Result<(u32, u32, u8), ImageError> {
    let len = data.len();
    let mut i = 0;
    while i + 1 < len {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        if (0xC0..=0xC3).contains(&marker) {
            if i + 9 >= len {
                return Err(ImageError::Jpeg("SOF marker truncated".to_string()));
            }
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Ok((width, height, data[i + 9]));
        }
        if marker == 0xFF || marker == 0x00 {
            i += 1;
            continue;
        }
        // Standalone markers carry no length.
        if marker == 0xD8 || marker == 0xD9 || (0xD0..=0xD7).contains(&marker) {
            i += 2;
            continue;
        }
        if i + 3 >= len {
            break;
        }
        let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + seg_len;
    }
    Err(ImageError::Jpeg("no SOF marker found".to_string()))
}

/// Decode to 8-bit pixels; palettes are expanded and alpha split into a mask.
fn parse_png(data: &[u8]) -> Result<ImageData, ImageError> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageError::Png(e.to_string()))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageError::Png(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let (width, height) = (info.width, info.height);
    let split = |channels: usize| {
        let mut color = Vec::with_capacity(buf.len());
        let mut alpha = Vec::with_capacity(buf.len() / channels);
        for px in buf.chunks_exact(channels) {
            color.extend_from_slice(&px[..channels - 1]);
            alpha.push(px[channels - 1]);
        }
        (color, Some(alpha))
    };

    let (color_space, pixels, smask_data) = match info.color_type {
        png::ColorType::Rgb => (ColorSpace::DeviceRGB, buf.clone(), None),
        png::ColorType::Grayscale => (ColorSpace::DeviceGray, buf.clone(), None),
        png::ColorType::Rgba => {
            let (rgb, alpha) = split(4);
            (ColorSpace::DeviceRGB, rgb, alpha)
        }
        png::ColorType::GrayscaleAlpha => {
            let (gray, alpha) = split(2);
            (ColorSpace::DeviceGray, gray, alpha)
        }
        other => {
            return Err(ImageError::Png(format!("unsupported color type {:?}", other)));
        }
    };

    Ok(ImageData {
        width,
        height,
        format: ImageFormat::Png,
        color_space,
        data: pixels,
        smask_data,
    })
}

/// Largest `(width, height)` with the image's aspect ratio that fits in
/// `max_w` x `max_h`.
pub fn fit_within(img_w: u32, img_h: u32, max_w: f64, max_h: f64) -> (f64, f64) {
    if img_w == 0 || img_h == 0 {
        return (0.0, 0.0);
    }
    let (iw, ih) = (img_w as f64, img_h as f64);
    let scale = (max_w / iw).min(max_h / ih);
    (iw * scale, ih * scale)
}
