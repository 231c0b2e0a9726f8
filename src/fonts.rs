//! Loading fonts from disk for the command line tools

use crate::bdf::convert;
use crate::codec::Font;
use anyhow::{bail, Context};
use log::info;
use pixfont_shared::types::Result;
use std::fs;
use std::path::Path;

/// File formats a font can be loaded from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFormat {
    /// Binary `.pxf` container
    Container,
    /// BDF text font, converted on load
    Bdf,
}

impl FontFormat {
    /// Detects the format from the file extension (case insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pxf" => Some(FontFormat::Container),
            "bdf" => Some(FontFormat::Bdf),
            _ => None,
        }
    }
}

/// Code range and gap handling used when a BDF font has to be converted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    pub first_code: u16,
    pub last_code: u16,
    pub fill_missing: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            first_code: 0x20,
            last_code: 0x7E,
            fill_missing: true,
        }
    }
}

/// Loads a `.pxf` or `.bdf` font. BDF fonts are converted with the given options.
pub fn load_font(path: &Path, options: ConvertOptions) -> Result<Font<'static>> {
    let Some(format) = FontFormat::from_path(path) else {
        bail!("unknown font format for {}, expected .pxf or .bdf", path.display());
    };

    let font = match format {
        FontFormat::Container => {
            let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            Font::decode(&data)
                .with_context(|| format!("decoding {}", path.display()))?
                .into_owned()
        }
        FontFormat::Bdf => {
            let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            convert(&source, options.first_code, options.last_code, options.fill_missing)
                .with_context(|| format!("converting {}", path.display()))?
        }
    };

    info!(
        "loaded {} ({} glyphs, 0x{:02X}..=0x{:02X})",
        path.display(),
        font.len(),
        font.first_code(),
        font.last_code()
    );

    Ok(font)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_format() {
        assert_eq!(FontFormat::from_path(&PathBuf::from("a/b.pxf")), Some(FontFormat::Container));
        assert_eq!(FontFormat::from_path(&PathBuf::from("helvR12.BDF")), Some(FontFormat::Bdf));
        assert_eq!(FontFormat::from_path(&PathBuf::from("font.h")), None);
        assert_eq!(FontFormat::from_path(&PathBuf::from("font")), None);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        assert!(load_font(Path::new("font.ttf"), ConvertOptions::default()).is_err());
    }
}
