//! # Procedural Geometry Generation
//!
//! This module builds the meshes the viewer displays, so no model files are
//! needed at runtime.
//!
//! ## Supported Shapes
//!
//! - **Cylinder**: capped unit-radius cylinder with separate cap fans
//! - **Axes**: three coloured line segments along +X, +Y and +Z
//!
//! ## Usage
//!
//! ```rust
//! use cylinder_viewer::gfx::geometry::{generate_axes, generate_cylinder};
//!
//! // 20 segments, 3 units tall
//! let cylinder = generate_cylinder(20, 3.0);
//! assert_eq!(cylinder.vertex_count(), 86);
//!
//! let axes = generate_axes(4.0);
//! assert_eq!(axes.line_indices.len(), 6);
//! ```

pub mod axes;
pub mod cylinder;

pub use axes::{generate_axes, AXIS_X_COLOR, AXIS_Y_COLOR, AXIS_Z_COLOR};
pub use cylinder::{
    generate_cylinder, generate_cylinder_with, validate_cylinder_params, CylinderAttributes,
    BARREL_COLOR, CAP_COLOR, CAP_TEX_COORD, MAX_SEGMENTS,
};

use std::collections::HashSet;

use crate::error::GeometryError;
use crate::gfx::scene::vertex::Vertex3D;

/// Colour given to vertices when the geometry carries no colour buffer
pub const DEFAULT_VERTEX_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z), one per vertex
    pub normals: Vec<[f32; 3]>,
    /// Optional RGBA colour per vertex
    pub colors: Option<Vec<[f32; 4]>>,
    /// Optional texture coordinates (u, v) per vertex
    pub tex_coords: Option<Vec<[f32; 2]>>,
    /// Triangle indices (counter-clockwise winding seen from outside)
    pub indices: Vec<u32>,
    /// Line-list indices drawn in addition to, or instead of, triangles
    pub line_indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            colors: None,
            tex_coords: None,
            indices: Vec::new(),
            line_indices: Vec::new(),
        }
    }

    /// Create an empty geometry with room for `vertex_count` vertices and
    /// `index_count` triangle indices
    pub fn with_capacity(
        vertex_count: usize,
        index_count: usize,
        colors: bool,
        tex_coords: bool,
    ) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            colors: colors.then(|| Vec::with_capacity(vertex_count)),
            tex_coords: tex_coords.then(|| Vec::with_capacity(vertex_count)),
            indices: Vec::with_capacity(index_count),
            line_indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over the triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Checks the buffer invariants every renderable geometry must hold
    ///
    /// Attribute buffers must be parallel to `vertices`, triangle indices must
    /// come in complete triples, and no index (triangle or line) may point
    /// past the last vertex.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let expected = self.vertices.len();

        check_len("normal", expected, self.normals.len())?;
        if let Some(colors) = &self.colors {
            check_len("color", expected, colors.len())?;
        }
        if let Some(tex_coords) = &self.tex_coords {
            check_len("texture coordinate", expected, tex_coords.len())?;
        }

        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::IncompleteTriangle(self.indices.len()));
        }

        for (position, &index) in self.indices.iter().chain(&self.line_indices).enumerate() {
            if index as usize >= expected {
                return Err(GeometryError::IndexOutOfRange {
                    position,
                    index,
                    vertex_count: expected,
                });
            }
        }

        Ok(())
    }

    /// Builds a line-list index buffer holding every undirected triangle edge once
    ///
    /// Edges keep the order in which they are first met while walking the
    /// triangles, so the result is deterministic. Duplicate-position vertices
    /// are distinct indices and therefore produce distinct edges.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::with_capacity(self.indices.len());
        let mut lines = Vec::with_capacity(self.indices.len() * 2);

        for [a, b, c] in self.triangles() {
            for (start, end) in [(a, b), (b, c), (c, a)] {
                let key = (start.min(end), start.max(end));
                if seen.insert(key) {
                    lines.push(start);
                    lines.push(end);
                }
            }
        }

        lines
    }

    /// Convert to the interleaved vertex format used by the renderer
    ///
    /// Missing colours fall back to opaque white and missing texture
    /// coordinates to `(0, 0)`.
    pub fn to_scene_format(&self) -> (Vec<Vertex3D>, Vec<u32>) {
        let vertices = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex3D {
                position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                color: self
                    .colors
                    .as_ref()
                    .and_then(|colors| colors.get(i).copied())
                    .unwrap_or(DEFAULT_VERTEX_COLOR),
                tex_coords: self
                    .tex_coords
                    .as_ref()
                    .and_then(|uvs| uvs.get(i).copied())
                    .unwrap_or([0.0, 0.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}

fn check_len(attribute: &'static str, expected: usize, actual: usize) -> Result<(), GeometryError> {
    if expected == actual {
        Ok(())
    } else {
        Err(GeometryError::AttributeLength {
            attribute,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> GeometryData {
        let mut data = GeometryData::new();
        data.vertices = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
        data.normals = vec![[0.0, 0.0, 1.0]; 4];
        data.indices = vec![0, 1, 2, 2, 3, 0];
        data
    }

    #[test]
    fn test_quad_is_valid() {
        let data = quad();
        assert_eq!(data.validate(), Ok(()));
        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.triangle_count(), 2);
    }

    #[test]
    fn test_validate_rejects_short_normals() {
        let mut data = quad();
        data.normals.pop();
        assert_eq!(
            data.validate(),
            Err(GeometryError::AttributeLength {
                attribute: "normal",
                expected: 4,
                actual: 3,
            })
        );
    }

    #[test]
    fn test_validate_rejects_mismatched_colors() {
        let mut data = quad();
        data.colors = Some(vec![DEFAULT_VERTEX_COLOR; 5]);
        assert!(matches!(
            data.validate(),
            Err(GeometryError::AttributeLength { attribute: "color", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_partial_triangle() {
        let mut data = quad();
        data.indices.push(1);
        assert_eq!(data.validate(), Err(GeometryError::IncompleteTriangle(7)));
    }

    #[test]
    fn test_validate_rejects_out_of_range_index() {
        let mut data = quad();
        data.indices[4] = 4;
        assert_eq!(
            data.validate(),
            Err(GeometryError::IndexOutOfRange {
                position: 4,
                index: 4,
                vertex_count: 4,
            })
        );
    }

    #[test]
    fn test_validate_checks_line_indices() {
        let mut data = quad();
        data.line_indices = vec![0, 9];
        assert!(matches!(
            data.validate(),
            Err(GeometryError::IndexOutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn test_wireframe_shares_diagonal() {
        let lines = quad().wireframe_indices();
        // 4 outer edges plus the shared diagonal
        assert_eq!(lines.len(), 10);
        assert_eq!(&lines[..6], &[0, 1, 1, 2, 2, 0]);
    }

    #[test]
    fn test_scene_format_defaults() {
        let (vertices, indices) = quad().to_scene_format();
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices, vec![0, 1, 2, 2, 3, 0]);
        assert_eq!(vertices[2].position, [1.0, 1.0, 0.0]);
        assert_eq!(vertices[2].color, DEFAULT_VERTEX_COLOR);
        assert_eq!(vertices[2].tex_coords, [0.0, 0.0]);
    }
}
