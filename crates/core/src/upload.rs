//! Upload content sniffing and stored-file naming.

use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};

use image::ImageFormat;

/// Number of leading bytes inspected to decide a file's content type.
pub const SNIFF_LEN: usize = 512;

/// Image types accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => ".jpg",
            ImageKind::Png => ".png",
        }
    }
}

/// Detect JPEG or PNG content from the first [`SNIFF_LEN`] bytes.
///
/// Any other format (including other image formats) yields `None`.
pub fn sniff_image(data: &[u8]) -> Option<ImageKind> {
    let head = &data[..data.len().min(SNIFF_LEN)];
    match image::guess_format(head) {
        Ok(ImageFormat::Jpeg) => Some(ImageKind::Jpeg),
        Ok(ImageFormat::Png) => Some(ImageKind::Png),
        _ => None,
    }
}

/// Extension of the client-supplied filename, including the leading dot.
///
/// Only the final path component is considered and only alphanumeric
/// extensions are kept, so a crafted filename cannot influence the
/// directory a file lands in.
pub fn original_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{ext}"))
}

/// Produces stored filenames from a strictly increasing nanosecond clock.
///
/// Two files named within the same nanosecond (or after the wall clock
/// steps backwards) still receive distinct, ordered stamps.
#[derive(Debug, Default)]
pub struct UploadNamer {
    last: AtomicI64,
}

impl UploadNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next stamp: the current Unix time in nanoseconds, bumped past the
    /// previously issued stamp if necessary.
    pub fn next_stamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }

    /// Stored filename for an upload: `<stamp><ext>`.
    ///
    /// The client's extension is kept when usable; otherwise the sniffed
    /// type's canonical extension is used.
    pub fn file_name(&self, original: &str, kind: ImageKind) -> String {
        let ext = original_extension(original).unwrap_or_else(|| kind.extension().to_string());
        format!("{}{ext}", self.next_stamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn sniffs_png() {
        assert_eq!(sniff_image(PNG_HEADER), Some(ImageKind::Png));
    }

    #[test]
    fn sniffs_jpeg() {
        assert_eq!(sniff_image(JPEG_HEADER), Some(ImageKind::Jpeg));
    }

    #[test]
    fn rejects_text_and_empty() {
        assert_eq!(sniff_image(b"hello, this is not an image"), None);
        assert_eq!(sniff_image(b""), None);
    }

    #[test]
    fn rejects_other_image_formats() {
        assert_eq!(sniff_image(b"GIF89a\x01\x00\x01\x00"), None);
    }

    #[test]
    fn only_first_bytes_matter() {
        let mut data = PNG_HEADER.to_vec();
        data.extend(std::iter::repeat(b'x').take(10_000));
        assert_eq!(sniff_image(&data), Some(ImageKind::Png));
    }

    #[test]
    fn extension_keeps_dot() {
        assert_eq!(original_extension("photo.png").as_deref(), Some(".png"));
        assert_eq!(
            original_extension("archive.tar.JPG").as_deref(),
            Some(".JPG")
        );
    }

    #[test]
    fn extension_ignores_directories_and_junk() {
        assert_eq!(original_extension("noext"), None);
        assert_eq!(original_extension("../../etc/passwd"), None);
        assert_eq!(original_extension("a.p/ng"), None);
        assert_eq!(original_extension("evil.p%g"), None);
    }

    #[test]
    fn stamps_strictly_increase() {
        let namer = UploadNamer::new();
        let mut prev = namer.next_stamp();
        for _ in 0..1_000 {
            let next = namer.next_stamp();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn file_name_falls_back_to_sniffed_extension() {
        let namer = UploadNamer::new();
        let name = namer.file_name("photo", ImageKind::Png);
        assert!(name.ends_with(".png"));
        let name = namer.file_name("photo.jpeg", ImageKind::Jpeg);
        assert!(name.ends_with(".jpeg"));
    }

    #[test]
    fn file_names_are_distinct() {
        let namer = UploadNamer::new();
        let a = namer.file_name("a.png", ImageKind::Png);
        let b = namer.file_name("a.png", ImageKind::Png);
        assert_ne!(a, b);
    }
}
