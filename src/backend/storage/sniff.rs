/**
 * Content Type Detection
 *
 * Uploaded files are typed by their leading bytes, not by the extension or
 * the client's `Content-Type`. Anything unrecognised is `text/plain` when
 * it decodes as UTF-8 and `application/octet-stream` otherwise.
 */

pub const PDF: &str = "application/pdf";
pub const PNG: &str = "image/png";
pub const JPEG: &str = "image/jpeg";
pub const MSWORD: &str = "application/msword";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const ZIP: &str = "application/zip";
pub const TEXT: &str = "text/plain";
pub const BINARY: &str = "application/octet-stream";

const PDF_MAGIC: &[u8] = b"%PDF";
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const OLE2_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const ZIP_MAGIC: &[u8] = &[b'P', b'K', 0x03, 0x04];

/// Detect the MIME type of `bytes`
pub fn detect_content_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(PDF_MAGIC) {
        PDF
    } else if bytes.starts_with(PNG_MAGIC) {
        PNG
    } else if bytes.starts_with(JPEG_MAGIC) {
        JPEG
    } else if bytes.starts_with(OLE2_MAGIC) {
        MSWORD
    } else if bytes.starts_with(ZIP_MAGIC) {
        // A .docx is a zip whose entries live under word/
        if contains(bytes, b"word/") {
            DOCX
        } else {
            ZIP
        }
    } else if std::str::from_utf8(bytes).is_ok() {
        TEXT
    } else {
        BINARY
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
