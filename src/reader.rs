use std::io::ErrorKind;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::debug;

use crate::error::{Result, SalesError};

/// Tried in order until one decodes without error. Windows-1252 covers Latin-1.
pub const ENCODINGS: &[&Encoding] = &[UTF_8, WINDOWS_1252];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read a sales file, skipping the header line and blank lines.
/// Every returned line is trimmed.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SalesError::NotFound(path.to_path_buf()),
        _ => SalesError::Io(e),
    })?;

    let (content, encoding) =
        decode_with(&bytes, ENCODINGS).ok_or_else(|| SalesError::Decode(path.to_path_buf()))?;
    debug!(path = %path.display(), encoding = encoding.name(), "decoded input");

    Ok(data_lines(&content))
}

/// First encoding in `encodings` that decodes `bytes` cleanly.
pub fn decode_with(bytes: &[u8], encodings: &[&'static Encoding]) -> Option<(String, &'static Encoding)> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    encodings.iter().find_map(|enc| {
        enc.decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| (text.into_owned(), *enc))
    })
}

fn data_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
