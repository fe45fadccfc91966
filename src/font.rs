//! Block font resources.
//!
//! A block font describes each glyph as a grid of rows; every non-space
//! character marks a filled cell. The text extruder turns filled cells into
//! a closed solid, so any font that loads here produces sample-able text.
//!
//! # File format
//!
//! ```json
//! {
//!   "familyName": "Block",
//!   "cellWidth": 0.5,
//!   "cellHeight": 1.0,
//!   "glyphs": { "1": ["  ##  ", " ###  ", "  ##  "] }
//! }
//! ```
//!
//! `cellWidth`/`cellHeight` are relative proportions of one cell; the
//! extruder scales the font so a glyph is exactly the requested size tall.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ResourceError;

/// JSON source of the font compiled into the binary.
const BUILTIN_FONT: &str = include_str!("../fonts/block.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FontFile {
    family_name: String,
    cell_width: f32,
    cell_height: f32,
    glyphs: BTreeMap<String, Vec<String>>,
}

/// A single glyph bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    width: usize,
    cells: Vec<bool>,
}

impl Glyph {
    /// Width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.cells.len() / self.width
        }
    }

    /// Whether the cell at `(col, row)` is filled. Row 0 is the top row.
    pub fn is_filled(&self, col: usize, row: usize) -> bool {
        col < self.width && self.cells.get(row * self.width + col).copied().unwrap_or(false)
    }
}

/// Where to load the font from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontSource {
    /// The block digit font bundled with the crate.
    #[default]
    Builtin,
    /// A font JSON file on disk.
    Path(PathBuf),
}

impl FontSource {
    /// Load the font this source points at.
    pub fn load(&self) -> Result<FontResource, ResourceError> {
        match self {
            FontSource::Builtin => FontResource::builtin(),
            FontSource::Path(path) => FontResource::load(path),
        }
    }
}

/// A loaded block font.
#[derive(Debug, Clone)]
pub struct FontResource {
    family_name: String,
    cell_width: f32,
    cell_height: f32,
    rows: usize,
    glyphs: HashMap<char, Glyph>,
}

impl FontResource {
    /// The built-in digit font.
    pub fn builtin() -> Result<Self, ResourceError> {
        Self::from_json(BUILTIN_FONT)
    }

    /// Read and parse a font file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Self::from_json(&source)?;
        log::info!(
            "Loaded font '{}' ({} glyphs) from {}",
            font.family_name,
            font.glyphs.len(),
            path.display()
        );
        Ok(font)
    }

    /// Parse a font from JSON text.
    pub fn from_json(source: &str) -> Result<Self, ResourceError> {
        let file: FontFile = serde_json::from_str(source)?;
        Self::from_file(file)
    }

    fn from_file(file: FontFile) -> Result<Self, ResourceError> {
        let cell_ok = |v: f32| v.is_finite() && v > 0.0;
        let mut rows = None;
        let mut glyphs = HashMap::with_capacity(file.glyphs.len());

        for (key, lines) in file.glyphs {
            let mut chars = key.chars();
            let glyph_char = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(ResourceError::InvalidGlyph {
                        glyph: key.chars().next().unwrap_or('\0'),
                        reason: format!("glyph key {:?} must be exactly one character", key),
                    })
                }
            };
            let invalid = |reason: String| ResourceError::InvalidGlyph {
                glyph: glyph_char,
                reason,
            };

            if !cell_ok(file.cell_width) || !cell_ok(file.cell_height) {
                return Err(invalid("cell dimensions must be positive".into()));
            }
            if lines.is_empty() {
                return Err(invalid("glyph has no rows".into()));
            }
            match rows {
                None => rows = Some(lines.len()),
                Some(expected) if expected != lines.len() => {
                    return Err(invalid(format!(
                        "glyph has {} rows, font has {}",
                        lines.len(),
                        expected
                    )))
                }
                Some(_) => {}
            }

            let width = lines[0].chars().count();
            if width == 0 {
                return Err(invalid("glyph has zero width".into()));
            }
            let mut cells = Vec::with_capacity(width * lines.len());
            for (row, line) in lines.iter().enumerate() {
                if line.chars().count() != width {
                    return Err(invalid(format!("row {} is not {} cells wide", row, width)));
                }
                cells.extend(line.chars().map(|c| !c.is_whitespace()));
            }
            glyphs.insert(glyph_char, Glyph { width, cells });
        }

        let rows = rows.ok_or_else(|| ResourceError::InvalidGlyph {
            glyph: '\0',
            reason: "font defines no glyphs".into(),
        })?;

        Ok(Self {
            family_name: file.family_name,
            cell_width: file.cell_width,
            cell_height: file.cell_height,
            rows,
            glyphs,
        })
    }

    /// Font family name.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Glyph height in cells (shared by every glyph).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Width-to-height ratio of one cell.
    pub fn cell_aspect(&self) -> f32 {
        self.cell_width / self.cell_height
    }

    /// Look up a glyph.
    pub fn glyph(&self, c: char) -> Result<&Glyph, ResourceError> {
        self.glyphs.get(&c).ok_or(ResourceError::MissingGlyph(c))
    }

    /// Whether the font defines `c`.
    pub fn has_glyph(&self, c: char) -> bool {
        self.glyphs.contains_key(&c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_font_has_digits() {
        let font = FontResource::builtin().unwrap();
        assert_eq!(font.rows(), 7);
        assert!((font.cell_aspect() - 0.5).abs() < 1e-6);
        for c in '0'..='9' {
            let glyph = font.glyph(c).unwrap();
            assert_eq!(glyph.width(), 6);
            assert_eq!(glyph.height(), 7);
        }
    }

    #[test]
    fn test_glyph_cells() {
        let font = FontResource::builtin().unwrap();
        let one = font.glyph('1').unwrap();
        assert!(!one.is_filled(0, 0));
        assert!(one.is_filled(2, 0));
        assert!(one.is_filled(1, 6));
        assert!(!one.is_filled(99, 0));
    }

    #[test]
    fn test_missing_glyph() {
        let font = FontResource::builtin().unwrap();
        assert!(matches!(font.glyph('Z'), Err(ResourceError::MissingGlyph('Z'))));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let json = r###"{"familyName":"Bad","cellWidth":1,"cellHeight":1,
            "glyphs":{"x":["##","#"]}}"###;
        assert!(matches!(
            FontResource::from_json(json),
            Err(ResourceError::InvalidGlyph { glyph: 'x', .. })
        ));
    }

    #[test]
    fn test_mismatched_heights_rejected() {
        let json = r###"{"familyName":"Bad","cellWidth":1,"cellHeight":1,
            "glyphs":{"a":["#","#"],"b":["#"]}}"###;
        assert!(FontResource::from_json(json).is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            FontResource::from_json("{ not json"),
            Err(ResourceError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = FontSource::Path(PathBuf::from("/nonexistent/yearfall-font.json"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ResourceError::Io { .. }));
    }
}
