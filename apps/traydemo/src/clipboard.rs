//! System clipboard access backed by `arboard`.
//!
//! The clipboard handle lives on the thread that owns the tray loop. Menu
//! handlers run there, and on X11 the selection is only served while a
//! handle is alive.

use std::cell::RefCell;
use std::path::PathBuf;

use arboard::Clipboard;
use image::RgbaImage;
use traydemo_tray::{ClipboardContent, HostError, Image, encode_png};

thread_local! {
    static CLIPBOARD: RefCell<Option<Clipboard>> = const { RefCell::new(None) };
}

fn with_clipboard<T>(
    f: impl FnOnce(&mut Clipboard) -> Result<T, arboard::Error>,
) -> Result<T, HostError> {
    CLIPBOARD.with(|cell| {
        let mut slot = cell.borrow_mut();
        let mut clipboard = match slot.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new().map_err(clipboard_error)?,
        };
        let result = f(&mut clipboard);
        *slot = Some(clipboard);
        result.map_err(clipboard_error)
    })
}

fn clipboard_error(e: arboard::Error) -> HostError {
    HostError::Clipboard(e.to_string())
}

/// Treats "nothing of this kind on the clipboard" as empty.
fn optional<T>(result: Result<T, arboard::Error>) -> Result<Option<T>, arboard::Error> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(arboard::Error::ContentNotAvailable) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Reads text, image and file references from the clipboard.
pub fn read() -> Result<ClipboardContent, HostError> {
    with_clipboard(|clipboard| {
        let text = optional(clipboard.get_text())?.unwrap_or_default();
        let image = match optional(clipboard.get_image())? {
            Some(data) => rgba_to_image(data.width, data.height, data.bytes.into_owned()),
            None => Image::default(),
        };
        let files = file_list(&text);
        Ok(ClipboardContent { text, image, files })
    })
}

pub fn write_text(text: &str) -> Result<(), HostError> {
    with_clipboard(|clipboard| clipboard.set_text(text))
}

/// Converts a raw RGBA clipboard image to PNG. Malformed rasters are dropped.
fn rgba_to_image(width: usize, height: usize, bytes: Vec<u8>) -> Image {
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        tracing::warn!(width, height, "clipboard image dimensions out of range");
        return Image::default();
    };
    let Some(raster) = RgbaImage::from_raw(w, h, bytes) else {
        tracing::warn!(width, height, "clipboard image buffer does not match its size");
        return Image::default();
    };
    match encode_png(&raster) {
        Ok(png) => Image::png(png),
        Err(e) => {
            tracing::warn!("failed to encode clipboard image: {e}");
            Image::default()
        }
    }
}

/// Extracts local paths from `file://` URIs, one per line.
///
/// File managers put copied files on the clipboard as a URI list.
fn file_list(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with("file://"))
        .filter_map(|line| url::Url::parse(line).ok())
        .filter_map(|url| url.to_file_path().ok())
        .collect()
}
