//! Extruded text solids.
//!
//! The animation only needs one thing from its text provider: a closed
//! triangle mesh for a string, centered on the origin, with a bounding box.
//! [`OutlineProvider`] is that seam; [`FontResource`] implements it by
//! extruding the occupancy grid of its block glyphs.

use glam::Vec3;

use crate::error::ResourceError;
use crate::font::FontResource;
use crate::mesh::{MeshBuilder, TriMesh};

/// Face subdivisions for smooth text.
const SMOOTH_SEGMENTS: u32 = 4;
/// Face subdivisions for plain text.
const FLAT_SEGMENTS: u32 = 1;
/// Empty columns inserted between neighbouring glyphs.
const GLYPH_SPACING: usize = 1;

/// How to size and tessellate extruded text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Glyph height in world units.
    pub size: f32,
    /// Extrusion depth along Z.
    pub depth: f32,
    /// Subdivide faces for nicer per-vertex lighting. Does not change the solid.
    pub smooth: bool,
}

impl TextStyle {
    /// Create a style with the given height and depth, no smoothing.
    pub fn new(size: f32, depth: f32) -> Self {
        Self {
            size,
            depth,
            smooth: false,
        }
    }

    /// Set face smoothing.
    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    fn segments(&self) -> u32 {
        if self.smooth {
            SMOOTH_SEGMENTS
        } else {
            FLAT_SEGMENTS
        }
    }
}

/// Produces closed, centered solids for text.
pub trait OutlineProvider {
    /// Build the solid for `text`.
    fn solid_text(&self, text: &str, style: &TextStyle) -> Result<TriMesh, ResourceError>;
}

impl OutlineProvider for FontResource {
    fn solid_text(&self, text: &str, style: &TextStyle) -> Result<TriMesh, ResourceError> {
        let grid = TextGrid::layout(self, text)?;

        let cell_h = style.size / self.rows() as f32;
        let cell_w = cell_h * self.cell_aspect();
        let z0 = -style.depth * 0.5;
        let z1 = style.depth * 0.5;
        let segments = style.segments();

        let mut builder = MeshBuilder::default();
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                if !grid.filled(col as isize, row as isize) {
                    continue;
                }
                let x0 = col as f32 * cell_w;
                let x1 = x0 + cell_w;
                let y1 = (grid.rows - row) as f32 * cell_h;
                let y0 = y1 - cell_h;
                let p = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
                let (c, r) = (col as isize, row as isize);

                builder.quad(p(x0, y0, z1), p(x1, y0, z1), p(x1, y1, z1), p(x0, y1, z1), segments);
                builder.quad(p(x1, y0, z0), p(x0, y0, z0), p(x0, y1, z0), p(x1, y1, z0), segments);

                if !grid.filled(c + 1, r) {
                    builder.quad(p(x1, y0, z1), p(x1, y0, z0), p(x1, y1, z0), p(x1, y1, z1), segments);
                }
                if !grid.filled(c - 1, r) {
                    builder.quad(p(x0, y0, z0), p(x0, y0, z1), p(x0, y1, z1), p(x0, y1, z0), segments);
                }
                // Row indices grow downwards.
                if !grid.filled(c, r - 1) {
                    builder.quad(p(x0, y1, z1), p(x1, y1, z1), p(x1, y1, z0), p(x0, y1, z0), segments);
                }
                if !grid.filled(c, r + 1) {
                    builder.quad(p(x0, y0, z0), p(x1, y0, z0), p(x1, y0, z1), p(x0, y0, z1), segments);
                }
            }
        }

        let mut mesh = builder.build();
        if mesh.is_empty() {
            return Err(ResourceError::EmptyMesh(text.to_string()));
        }
        mesh.center();
        log::debug!(
            "Extruded {:?}: {} triangles, bounds {:?}",
            text,
            mesh.triangle_count(),
            mesh.bounding_box()
        );
        Ok(mesh)
    }
}

/// Occupancy grid of a whole string laid out left to right.
struct TextGrid {
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl TextGrid {
    fn layout(font: &FontResource, text: &str) -> Result<Self, ResourceError> {
        if text.is_empty() {
            return Err(ResourceError::EmptyText);
        }
        let glyphs = text
            .chars()
            .map(|c| font.glyph(c))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = font.rows();
        let cols = glyphs.iter().map(|g| g.width()).sum::<usize>()
            + GLYPH_SPACING * (glyphs.len() - 1);
        let mut cells = vec![false; cols * rows];

        let mut origin = 0;
        for glyph in glyphs {
            for row in 0..rows {
                for col in 0..glyph.width() {
                    if glyph.is_filled(col, row) {
                        cells[row * cols + origin + col] = true;
                    }
                }
            }
            origin += glyph.width() + GLYPH_SPACING;
        }

        Ok(Self { cols, rows, cells })
    }

    fn filled(&self, col: isize, row: isize) -> bool {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return false;
        }
        self.cells[row as usize * self.cols + col as usize]
    }
}
