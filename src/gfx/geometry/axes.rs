//! Coordinate axes display
//!
//! Line-only geometry marking the +X, +Y and +Z directions from the origin.

use super::GeometryData;

pub const AXIS_X_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
pub const AXIS_Y_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
pub const AXIS_Z_COLOR: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// Generate three coloured axis lines of the given length
///
/// Each axis gets its own pair of vertices so the colour does not bleed
/// between axes at the origin. The geometry has no triangles.
pub fn generate_axes(length: f32) -> GeometryData {
    let mut data = GeometryData::with_capacity(6, 0, true, false);

    let axes = [
        ([length, 0.0, 0.0], AXIS_X_COLOR),
        ([0.0, length, 0.0], AXIS_Y_COLOR),
        ([0.0, 0.0, length], AXIS_Z_COLOR),
    ];

    for (tip, color) in axes {
        let start = data.vertices.len() as u32;

        data.vertices.push([0.0, 0.0, 0.0]);
        data.vertices.push(tip);

        // Lines are unlit; the normal only has to be well formed
        let normal = normalized(tip);
        data.normals.push(normal);
        data.normals.push(normal);

        if let Some(colors) = data.colors.as_mut() {
            colors.push(color);
            colors.push(color);
        }

        data.line_indices.push(start);
        data.line_indices.push(start + 1);
    }

    data
}

fn normalized(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        [0.0, 1.0, 0.0]
    }
}
