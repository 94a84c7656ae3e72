//! Image decoding, clipboard and file naming helpers shared by both screens.

use arboard::{Clipboard, ImageData};
use chrono::{DateTime, Local};
use client_core::display::DOWNLOAD_FILE_NAME;

pub struct DecodedImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied([self.width, self.height], &self.rgba)
    }
}

/// Decodes any supported image and shrinks it to fit `max_side` on both axes.
pub fn decode_for_texture(bytes: &[u8], max_side: u32) -> Result<DecodedImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = if dynamic.width() > max_side || dynamic.height() > max_side {
        dynamic.thumbnail(max_side, max_side)
    } else {
        dynamic
    }
    .to_rgba8();
    Ok(DecodedImage {
        width: resized.width() as usize,
        height: resized.height() as usize,
        rgba: resized.into_raw(),
    })
}

pub fn write_clipboard_image(image: &DecodedImage) -> Result<(), String> {
    let mut clipboard = Clipboard::new().map_err(|err| err.to_string())?;
    clipboard
        .set_image(ImageData {
            width: image.width,
            height: image.height,
            bytes: std::borrow::Cow::Borrowed(&image.rgba),
        })
        .map_err(|err| err.to_string())
}

/// `webinar-poster-20240221-2000.png` style name offered in the save dialog.
pub fn suggested_poster_file_name(now: DateTime<Local>) -> String {
    let stem = DOWNLOAD_FILE_NAME
        .strip_suffix(".png")
        .unwrap_or(DOWNLOAD_FILE_NAME);
    format!("{stem}-{}.png", now.format("%Y%m%d-%H%M"))
}

pub fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        return format!("{bytes} B");
    }
    if bytes < MB {
        return format_scaled_unit(bytes, KB, "KB");
    }
    format_scaled_unit(bytes, MB, "MB")
}

fn format_scaled_unit(bytes: u64, unit_size: u64, unit_label: &str) -> String {
    let value = bytes as f64 / unit_size as f64;
    let value_text = format!("{value:.1}");
    let compact_value = value_text.strip_suffix(".0").unwrap_or(&value_text);
    format!("{compact_value} {unit_label}")
}

#[cfg(test)]
mod tests {
    use super::*;

    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use chrono::TimeZone;

    const PIXEL_PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

    #[test]
    fn formats_photo_sizes_readably() {
        assert_eq!(human_readable_bytes(0), "0 B");
        assert_eq!(human_readable_bytes(1023), "1023 B");
        assert_eq!(human_readable_bytes(1024), "1 KB");
        assert_eq!(human_readable_bytes(1536), "1.5 KB");
        assert_eq!(human_readable_bytes(5 * 1024 * 1024), "5 MB");
    }

    #[test]
    fn decodes_png_into_rgba() {
        let png = STANDARD.decode(PIXEL_PNG_B64).expect("base64");
        let decoded = decode_for_texture(&png, 512).expect("decode");
        assert_eq!((decoded.width, decoded.height), (1, 1));
        assert_eq!(decoded.rgba.len(), 4);
        assert_eq!(decoded.to_color_image().size, [1, 1]);
    }

    #[test]
    fn rejects_non_image_bytes() {
        assert!(decode_for_texture(b"definitely not an image", 512).is_err());
    }

    #[test]
    fn suggested_name_is_timestamped_png() {
        let at = Local
            .with_ymd_and_hms(2024, 2, 21, 20, 0, 0)
            .single()
            .expect("local time");
        assert_eq!(
            suggested_poster_file_name(at),
            "webinar-poster-20240221-2000.png"
        );
    }
}
