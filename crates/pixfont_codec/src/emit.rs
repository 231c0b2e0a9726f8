//! Writes fonts out as source code: an Adafruit GFX compatible C header, or a Rust module that
//! embeds the font as static data.

use crate::errors::FontError;
use crate::font::Font;
use std::fmt::Write;

const BYTES_PER_LINE: usize = 16;

impl From<std::fmt::Error> for FontError {
    fn from(err: std::fmt::Error) -> Self {
        FontError::Emit(err.to_string())
    }
}

/// Turns a file stem like `ter-u12n.bdf` into something usable as an identifier
#[must_use]
pub fn sanitize_identifier(name: &str) -> String {
    let ident: String = name
        .chars()
        .map(|c| if c == '-' || c == '.' { '_' } else { c })
        .collect();

    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{ident}")
    } else {
        ident
    }
}

fn printable(code: u32) -> char {
    match char::from_u32(code) {
        Some(c) if (0x20..0x7F).contains(&code) => c,
        _ => '?',
    }
}

/// Hex bytes, 16 per line, separated by newlines (no trailing newline)
fn byte_lines(bytes: &[u8]) -> String {
    bytes
        .chunks(BYTES_PER_LINE)
        .map(|chunk| {
            let hex: Vec<String> = chunk.iter().map(|b| format!("0x{b:02X}")).collect();
            format!("    {}", hex.join(", "))
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Emits the font as an Adafruit GFX font header. GFX glyph records hold a 16 bit bitmap
/// offset, so fonts with a larger blob cannot be written in this format.
pub fn emit_gfx_header(font: &Font<'_>, var_name: &str, display_name: &str) -> Result<String, FontError> {
    let var_name = sanitize_identifier(var_name);

    if let Some(glyph) = font
        .glyphs()
        .iter()
        .find(|g| g.bitmap_offset > u32::from(u16::MAX))
    {
        return Err(FontError::Emit(format!(
            "bitmap offset {} does not fit a GFX glyph record",
            glyph.bitmap_offset
        )));
    }

    let mut out = String::new();
    writeln!(out, "// Font: {display_name}")?;
    writeln!(out, "// Converted from BDF to Adafruit GFX format")?;
    writeln!(out)?;
    writeln!(out, "#pragma once")?;
    writeln!(out)?;
    writeln!(out, "#include <Adafruit_GFX.h>")?;
    writeln!(out)?;

    writeln!(out, "const uint8_t {var_name}Bitmaps[] PROGMEM = {{")?;
    writeln!(out, "{}}};", byte_lines(font.bitmap()))?;
    writeln!(out)?;

    let records: Vec<(String, u32)> = font
        .glyphs()
        .iter()
        .zip(u32::from(font.first_code())..)
        .enumerate()
        .map(|(idx, (g, code))| {
            let comma = if idx + 1 < font.len() { "," } else { "" };
            let record = format!(
                "    {{{}, {}, {}, {}, {}, {}}}{comma}",
                g.bitmap_offset, g.width, g.height, g.x_advance, g.x_offset, g.y_offset
            );
            (record, code)
        })
        .collect();
    let column = records.iter().map(|(r, _)| r.len()).max().unwrap_or(0);

    writeln!(out, "const GFXglyph {var_name}Glyphs[] PROGMEM = {{")?;
    for (record, code) in &records {
        writeln!(out, "{record:<column$} // 0x{code:02X} '{}'", printable(*code))?;
    }
    writeln!(out, "}};")?;
    writeln!(out)?;

    writeln!(out, "const GFXfont {var_name} PROGMEM = {{")?;
    writeln!(out, "    (uint8_t*){var_name}Bitmaps,")?;
    writeln!(out, "    (GFXglyph*){var_name}Glyphs,")?;
    writeln!(
        out,
        "    0x{:02X}, 0x{:02X}, {}}};",
        font.first_code(),
        font.last_code(),
        font.line_height()
    )?;
    writeln!(out)?;

    let total = font.bitmap().len() + font.len() * 7 + 7;
    writeln!(out, "// Approx. {total} bytes")?;

    Ok(out)
}

/// Emits the font as a Rust module with static tables and a ready to use `Font<'static>`
pub fn emit_rust_module(font: &Font<'_>, var_name: &str) -> Result<String, FontError> {
    let name = sanitize_identifier(var_name).to_uppercase();

    let mut out = String::new();
    writeln!(out, "// Font: {var_name}")?;
    writeln!(out, "// Generated by bdf2font, do not edit")?;
    writeln!(out)?;
    writeln!(out, "use pixfont_codec::{{Font, Glyph}};")?;
    writeln!(out)?;

    writeln!(
        out,
        "pub static {name}_BITMAP: [u8; {}] = [",
        font.bitmap().len()
    )?;
    if !font.bitmap().is_empty() {
        writeln!(out, "{}", byte_lines(font.bitmap()))?;
    }
    writeln!(out, "];")?;
    writeln!(out)?;

    writeln!(out, "pub static {name}_GLYPHS: [Glyph; {}] = [", font.len())?;
    for (g, code) in font.glyphs().iter().zip(u32::from(font.first_code())..) {
        writeln!(
            out,
            "    Glyph::new({}, {}, {}, {}, {}, {}), // 0x{code:02X} '{}'",
            g.bitmap_offset,
            g.width,
            g.height,
            g.x_advance,
            g.x_offset,
            g.y_offset,
            printable(code)
        )?;
    }
    writeln!(out, "];")?;
    writeln!(out)?;

    writeln!(
        out,
        "pub static {name}: Font<'static> = Font::from_static(0x{:02X}, 0x{:02X}, {}, &{name}_GLYPHS, &{name}_BITMAP);",
        font.first_code(),
        font.last_code(),
        font.line_height()
    )?;

    Ok(out)
}
