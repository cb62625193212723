//! # Cylinder Generation
//!
//! Builds a capped cylinder of radius 1 centred on the origin with its axis
//! along Y. The barrel and each cap own separate vertices: the barrel ring is
//! closed with a duplicate vertex at `2π` so the seam gets its own texture
//! column, and every cap repeats the ring with a flat normal so caps shade
//! independently of the barrel. These duplicates must never be welded.
//!
//! Vertex layout for `n` segments:
//!
//! | range                       | contents                              |
//! |-----------------------------|---------------------------------------|
//! | `0 .. 2(n+1)`               | barrel ring, interleaved top/bottom   |
//! | `2(n+1)`                    | bottom cap centre                     |
//! | `2(n+1)+1 ..= 2(n+1)+n+1`   | bottom cap ring                       |
//! | `2(n+1)+n+2`                | top cap centre                        |
//! | `2(n+1)+n+3 ..= 4n+5`       | top cap ring                          |

use std::f32::consts::TAU;

use super::GeometryData;
use crate::error::GeometryError;

/// Colour of every barrel vertex
pub const BARREL_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Colour of every cap vertex, a mid-gray that sets the caps apart
pub const CAP_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

/// Caps are not meaningfully textured; all cap vertices share this coordinate
pub const CAP_TEX_COORD: [f32; 2] = [0.0, 1.0];

/// Largest segment count whose `4n + 6` vertices are all addressable by `u32` indices
pub const MAX_SEGMENTS: u32 = (u32::MAX - 6) / 4;

const DOWN: [f32; 3] = [0.0, -1.0, 0.0];
const UP: [f32; 3] = [0.0, 1.0, 0.0];

/// Selects which optional vertex attributes the generator emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CylinderAttributes {
    pub colors: bool,
    pub tex_coords: bool,
}

impl CylinderAttributes {
    /// Positions, normals and indices only
    pub const BASIC: Self = Self {
        colors: false,
        tex_coords: false,
    };

    /// Positions, normals, colours, texture coordinates and indices
    pub const ALL: Self = Self {
        colors: true,
        tex_coords: true,
    };
}

impl Default for CylinderAttributes {
    fn default() -> Self {
        Self::ALL
    }
}

/// Checks the preconditions of [`generate_cylinder`]
///
/// The generator does not validate its input; callers that take the segment
/// count or height from outside should run this first.
pub fn validate_cylinder_params(num_segments: u32, height: f32) -> Result<(), GeometryError> {
    if num_segments < 3 {
        return Err(GeometryError::TooFewSegments(num_segments));
    }
    if num_segments > MAX_SEGMENTS {
        return Err(GeometryError::TooManySegments {
            segments: num_segments,
            max: MAX_SEGMENTS,
        });
    }
    if !height.is_finite() || height <= 0.0 {
        return Err(GeometryError::InvalidHeight(height));
    }
    Ok(())
}

/// Generate a capped cylinder with colours and texture coordinates
///
/// # Arguments
/// * `num_segments` - Number of quads around the barrel, at least 3
/// * `height` - Total height along Y, must be positive
///
/// Returns `2(n+1) + 2(n+2)` vertices and `4n` triangles.
pub fn generate_cylinder(num_segments: u32, height: f32) -> GeometryData {
    generate_cylinder_with(num_segments, height, CylinderAttributes::ALL)
}

/// Generate a capped cylinder emitting only the requested optional attributes
pub fn generate_cylinder_with(
    num_segments: u32,
    height: f32,
    attributes: CylinderAttributes,
) -> GeometryData {
    debug_assert!(
        validate_cylinder_params(num_segments, height).is_ok(),
        "invalid cylinder parameters: {num_segments} segments, height {height}"
    );

    let segs = num_segments as usize;
    let ring_len = segs + 1;
    let vertex_count = 2 * ring_len + 2 * (ring_len + 1);
    let mut data = GeometryData::with_capacity(
        vertex_count,
        4 * segs * 3,
        attributes.colors,
        attributes.tex_coords,
    );

    let half_height = height / 2.0;
    let angle_step = TAU / num_segments as f32;

    // Barrel ring, closed by a duplicate at i == n
    for i in 0..=num_segments {
        let angle = i as f32 * angle_step;
        let (sin_a, cos_a) = angle.sin_cos();
        let u = 1.0 - i as f32 / num_segments as f32;

        data.vertices.push([cos_a, half_height, sin_a]);
        data.vertices.push([cos_a, -half_height, sin_a]);

        data.normals.push([cos_a, 0.0, sin_a]);
        data.normals.push([cos_a, 0.0, sin_a]);

        if let Some(colors) = data.colors.as_mut() {
            colors.push(BARREL_COLOR);
            colors.push(BARREL_COLOR);
        }
        if let Some(tex_coords) = data.tex_coords.as_mut() {
            tex_coords.push([u, 0.0]);
            tex_coords.push([u, 1.0]);
        }
    }

    for i in 0..num_segments {
        let top = i * 2;
        let bottom = top + 1;

        data.indices.extend_from_slice(&[top, top + 2, bottom]);
        data.indices.extend_from_slice(&[bottom, top + 2, bottom + 2]);
    }

    // Bottom cap: odd barrel slots hold the bottom ring
    let bottom_center = push_cap(&mut data, -half_height, DOWN, 1, ring_len);
    for i in 0..num_segments {
        data.indices.extend_from_slice(&[
            bottom_center,
            bottom_center + i + 1,
            bottom_center + i + 2,
        ]);
    }

    // Top cap: reversed fan so it faces +Y
    let top_center = push_cap(&mut data, half_height, UP, 0, ring_len);
    for i in 0..num_segments {
        data.indices.extend_from_slice(&[top_center, top_center + i + 2, top_center + i + 1]);
    }

    data
}

/// Appends a cap centre followed by a copy of one barrel ring and returns the
/// index of the centre vertex.
///
/// `ring_offset` is 0 for the top ring and 1 for the bottom ring, matching the
/// interleaved barrel layout.
fn push_cap(
    data: &mut GeometryData,
    y: f32,
    normal: [f32; 3],
    ring_offset: usize,
    ring_len: usize,
) -> u32 {
    let center = data.vertices.len() as u32;

    data.vertices.push([0.0, y, 0.0]);
    data.normals.push(normal);

    for i in 0..ring_len {
        let position = data.vertices[2 * i + ring_offset];
        data.vertices.push(position);
        data.normals.push(normal);
    }

    let cap_vertices = ring_len + 1;
    if let Some(colors) = data.colors.as_mut() {
        colors.extend(std::iter::repeat(CAP_COLOR).take(cap_vertices));
    }
    if let Some(tex_coords) = data.tex_coords.as_mut() {
        tex_coords.extend(std::iter::repeat(CAP_TEX_COORD).take(cap_vertices));
    }

    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const EPSILON: f32 = 1e-5;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    fn expected_vertex_count(n: u32) -> usize {
        (2 * (n + 1) + 2 * (n + 2)) as usize
    }

    #[test]
    fn test_reference_cylinder_counts() {
        let cylinder = generate_cylinder(20, 3.0);
        assert_eq!(cylinder.vertex_count(), 86);
        assert_eq!(cylinder.normals.len(), 86);
        assert_eq!(cylinder.triangle_count(), 80);
        assert_eq!(cylinder.validate(), Ok(()));
    }

    #[test]
    fn test_counts_hold_for_random_parameters() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let n = rng.random_range(3..200);
            let h = rng.random_range(0.01..50.0);
            let cylinder = generate_cylinder(n, h);

            assert_eq!(cylinder.vertex_count(), expected_vertex_count(n));
            assert_eq!(cylinder.triangle_count(), 4 * n as usize);
            assert_eq!(cylinder.indices.len() % 3, 0);
            assert!(cylinder
                .indices
                .iter()
                .all(|&i| (i as usize) < cylinder.vertex_count()));
            assert_eq!(cylinder.validate(), Ok(()));
        }
    }

    #[test]
    fn test_barrel_normals_are_radial_units() {
        let n = 12;
        let cylinder = generate_cylinder(n, 2.0);
        let barrel_len = 2 * (n as usize + 1);

        for normal in &cylinder.normals[..barrel_len] {
            assert_eq!(normal[1], 0.0);
            assert!((dot(*normal, *normal).sqrt() - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_cap_normals_are_exact() {
        let n = 7;
        let cylinder = generate_cylinder(n, 1.5);
        let barrel_len = 2 * (n as usize + 1);
        let cap_len = n as usize + 2;

        let (bottom, top) = cylinder.normals[barrel_len..].split_at(cap_len);
        assert!(bottom.iter().all(|&normal| normal == DOWN));
        assert!(top.iter().all(|&normal| normal == UP));
    }

    #[test]
    fn test_every_triangle_faces_outward() {
        for n in [3, 4, 5, 8, 20, 64] {
            let cylinder = generate_cylinder(n, 3.0);
            for [a, b, c] in cylinder.triangles() {
                let p0 = cylinder.vertices[a as usize];
                let p1 = cylinder.vertices[b as usize];
                let p2 = cylinder.vertices[c as usize];
                let face = cross(sub(p1, p0), sub(p2, p0));

                for index in [a, b, c] {
                    let normal = cylinder.normals[index as usize];
                    assert!(
                        dot(face, normal) > 0.0,
                        "triangle ({a}, {b}, {c}) winds inward for n = {n}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_barrel_pairs_share_angle() {
        let cylinder = generate_cylinder(10, 4.0);
        for pair in cylinder.vertices[..22].chunks_exact(2) {
            let (top, bottom) = (pair[0], pair[1]);
            assert_eq!(top[0], bottom[0]);
            assert_eq!(top[2], bottom[2]);
            assert_eq!(top[1], 2.0);
            assert_eq!(bottom[1], -2.0);
        }
    }

    #[test]
    fn test_seam_vertex_is_distinct_duplicate() {
        let n = 16;
        let cylinder = generate_cylinder(n, 1.0);
        let first = cylinder.vertices[0];
        let seam = cylinder.vertices[2 * n as usize];

        for axis in 0..3 {
            assert!((first[axis] - seam[axis]).abs() < EPSILON);
        }

        let uvs = cylinder.tex_coords.as_ref().unwrap();
        assert_eq!(uvs[0], [1.0, 0.0]);
        assert_eq!(uvs[1], [1.0, 1.0]);
        assert_eq!(uvs[2 * n as usize], [0.0, 0.0]);
        assert_eq!(uvs[2 * n as usize + 1], [0.0, 1.0]);
    }

    #[test]
    fn test_cap_rings_copy_barrel_positions() {
        let n = 9;
        let cylinder = generate_cylinder(n, 2.5);
        let ring_len = n as usize + 1;
        let bottom_center = 2 * ring_len;
        let top_center = bottom_center + ring_len + 1;

        assert_eq!(cylinder.vertices[bottom_center], [0.0, -1.25, 0.0]);
        assert_eq!(cylinder.vertices[top_center], [0.0, 1.25, 0.0]);

        for i in 0..ring_len {
            assert_eq!(cylinder.vertices[bottom_center + 1 + i], cylinder.vertices[2 * i + 1]);
            assert_eq!(cylinder.vertices[top_center + 1 + i], cylinder.vertices[2 * i]);
        }
    }

    #[test]
    fn test_cap_fans_use_their_own_centers() {
        let n = 5;
        let cylinder = generate_cylinder(n, 1.0);
        let bottom_center = 2 * (n + 1);
        let top_center = bottom_center + n + 2;
        let caps = &cylinder.indices[(2 * n * 3) as usize..];

        let (bottom, top) = caps.split_at((n * 3) as usize);
        for (i, tri) in bottom.chunks_exact(3).enumerate() {
            let i = i as u32;
            assert_eq!(tri, &[bottom_center, bottom_center + i + 1, bottom_center + i + 2]);
        }
        for (i, tri) in top.chunks_exact(3).enumerate() {
            let i = i as u32;
            assert_eq!(tri, &[top_center, top_center + i + 2, top_center + i + 1]);
        }
    }

    #[test]
    fn test_colors_and_cap_tex_coords() {
        let n = 6;
        let cylinder = generate_cylinder(n, 1.0);
        let barrel_len = 2 * (n as usize + 1);

        let colors = cylinder.colors.as_ref().unwrap();
        assert!(colors[..barrel_len].iter().all(|&c| c == BARREL_COLOR));
        assert!(colors[barrel_len..].iter().all(|&c| c == CAP_COLOR));

        let uvs = cylinder.tex_coords.as_ref().unwrap();
        assert!(uvs[barrel_len..].iter().all(|&uv| uv == CAP_TEX_COORD));
    }

    #[test]
    fn test_basic_attributes_skip_optional_buffers() {
        let basic = generate_cylinder_with(20, 3.0, CylinderAttributes::BASIC);
        let full = generate_cylinder(20, 3.0);

        assert!(basic.colors.is_none());
        assert!(basic.tex_coords.is_none());
        assert_eq!(basic.vertices, full.vertices);
        assert_eq!(basic.normals, full.normals);
        assert_eq!(basic.indices, full.indices);
    }

    #[test]
    fn test_generation_is_bit_identical() {
        let a = generate_cylinder(33, 2.75);
        let b = generate_cylinder(33, 2.75);

        let bits = |v: &[[f32; 3]]| v.iter().flatten().map(|f| f.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.vertices), bits(&b.vertices));
        assert_eq!(bits(&a.normals), bits(&b.normals));
        assert_eq!(a, b);
    }

    #[test]
    fn test_wireframe_edge_count() {
        for n in [3u32, 20] {
            let lines = generate_cylinder(n, 3.0).wireframe_indices();
            assert_eq!(lines.len() / 2, (8 * n + 3) as usize);
        }
    }

    #[test]
    fn test_parameter_validation() {
        assert_eq!(validate_cylinder_params(20, 3.0), Ok(()));
        assert_eq!(validate_cylinder_params(3, 0.001), Ok(()));
        assert_eq!(
            validate_cylinder_params(2, 3.0),
            Err(GeometryError::TooFewSegments(2))
        );
        assert_eq!(
            validate_cylinder_params(0, 3.0),
            Err(GeometryError::TooFewSegments(0))
        );
        assert_eq!(
            validate_cylinder_params(8, 0.0),
            Err(GeometryError::InvalidHeight(0.0))
        );
        assert!(validate_cylinder_params(8, f32::NAN).is_err());
        assert!(validate_cylinder_params(8, -1.0).is_err());
    }

    #[test]
    fn test_segment_count_must_fit_u32_indices() {
        assert_eq!(validate_cylinder_params(MAX_SEGMENTS, 1.0), Ok(()));
        assert_eq!(
            validate_cylinder_params(MAX_SEGMENTS + 1, 1.0),
            Err(GeometryError::TooManySegments {
                segments: MAX_SEGMENTS + 1,
                max: MAX_SEGMENTS,
            })
        );
        // The last vertex index 4n + 5 still fits
        assert!((MAX_SEGMENTS as u64) * 4 + 5 <= u32::MAX as u64);
    }
}
