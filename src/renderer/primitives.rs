//! Stateless geometry builders for map lines, fills and obstacle markers.
//!
//! Every builder takes render-space points (already offset by the
//! coordinate transform) and returns a [`Drawable`] that owns its mesh and
//! material. Line widths are in pixels; `z_offset` is a layer index.

use super::draw::Drawable;
use super::material::Material;
use super::vertex::Vertex;
use crate::asset::{Mesh, Topology};
use crate::scene::Transform;
use glam::{Vec2, Vec3};

/// Height of one render layer in meters.
pub const Z_OFFSET_FACTOR: f32 = 0.01;

fn layered(z_offset: f32) -> Transform {
    Transform::from_translation(Vec3::new(0.0, 0.0, z_offset * Z_OFFSET_FACTOR))
}

fn to_array(points: &[Vec3]) -> Vec<[f32; 3]> {
    points.iter().map(|p| p.to_array()).collect()
}

/// Solid polyline through `points`.
pub fn segments_from_points(points: &[Vec3], color: u32, line_width: f32, z_offset: f32) -> Drawable {
    Drawable::new(
        "segments",
        Mesh::line_strip(&to_array(points)),
        Material::line(color, line_width),
    )
    .with_transform(layered(z_offset))
}

/// Polyline split into `dash_size` pieces separated by `gap_size`, measured
/// along the path so dashes continue across corners.
pub fn dashed_line_from_points(
    points: &[Vec3],
    color: u32,
    line_width: f32,
    dash_size: f32,
    gap_size: f32,
    z_offset: f32,
) -> Drawable {
    let period = dash_size + gap_size;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    if dash_size > 0.0 && period > 0.0 {
        let mut travelled = 0.0_f32;
        for pair in points.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let length = start.distance(end);
            if length <= f32::EPSILON {
                continue;
            }

            let mut local = 0.0_f32;
            while local < length {
                let phase = (travelled + local) % period;
                if phase < dash_size {
                    let run = (dash_size - phase).min(length - local);
                    let a = start.lerp(end, local / length);
                    let b = start.lerp(end, (local + run) / length);
                    let base = vertices.len() as u32;
                    vertices.push(Vertex::at(a.to_array()));
                    vertices.push(Vertex::at(b.to_array()));
                    indices.extend([base, base + 1]);
                    local += run;
                } else {
                    local += period - phase;
                }
            }
            travelled += length;
        }
    }

    Drawable::new(
        "dashed",
        Mesh::new(vertices, indices, Topology::LineList),
        Material::line(color, line_width),
    )
    .with_transform(layered(z_offset))
}

/// Filled polygon, fan-triangulated from the first point. A closing point
/// equal to the first one is ignored.
pub fn shape_from_points(points: &[Vec3], material: Material, z_offset: f32) -> Drawable {
    let mut outline = points;
    if outline.len() > 1 && outline[0].abs_diff_eq(outline[outline.len() - 1], 1e-6) {
        outline = &outline[..outline.len() - 1];
    }

    let vertices: Vec<Vertex> = outline.iter().map(|p| Vertex::at(p.to_array())).collect();
    let indices: Vec<u32> = (1..outline.len().saturating_sub(1) as u32)
        .flat_map(|i| [0, i, i + 1])
        .collect();

    Drawable::new(
        "shape",
        Mesh::new(vertices, indices, Topology::TriangleList),
        material.double_sided(),
    )
    .with_transform(layered(z_offset))
}

/// Copy of `points` shifted `delta` meters to the right of the direction of
/// travel, in the ground plane.
pub fn offset_perpendicular(points: &[Vec3], delta: f32) -> Vec<Vec3> {
    let direction_at = |i: usize| -> Vec2 {
        let prev = points[i.saturating_sub(1)].truncate();
        let next = points[(i + 1).min(points.len() - 1)].truncate();
        (next - prev).normalize_or_zero()
    };

    (0..points.len())
        .map(|i| {
            let dir = direction_at(i);
            let right = Vec2::new(dir.y, -dir.x);
            points[i] + (right * delta).extend(0.0)
        })
        .collect()
}

/// Wireframe box centered on the origin.
pub fn box_outline(dimension: Vec3, color: u32, line_width: f32) -> Drawable {
    let h = dimension * 0.5;
    let corners: Vec<Vertex> = (0..8)
        .map(|i| {
            let x = if i & 1 == 0 { -h.x } else { h.x };
            let y = if i & 2 == 0 { -h.y } else { h.y };
            let z = if i & 4 == 0 { -h.z } else { h.z };
            Vertex::at([x, y, z])
        })
        .collect();
    let indices = vec![
        0, 1, 1, 3, 3, 2, 2, 0, // bottom
        4, 5, 5, 7, 7, 6, 6, 4, // top
        0, 4, 1, 5, 2, 6, 3, 7, // pillars
    ];

    Drawable::new(
        "box",
        Mesh::new(corners, indices, Topology::LineList),
        Material::line(color, line_width),
    )
}

/// Arrow along +Y starting at the origin, with a two-stroke head.
pub fn arrow(length: f32, line_width: f32, head_length: f32, head_width: f32, color: u32) -> Drawable {
    let tip = [0.0, length, 0.0];
    let back = length - head_length;
    let vertices = vec![
        Vertex::at([0.0, 0.0, 0.0]),
        Vertex::at(tip),
        Vertex::at([-head_width * 0.5, back, 0.0]),
        Vertex::at([head_width * 0.5, back, 0.0]),
    ];
    let indices = vec![0, 1, 1, 2, 1, 3];

    Drawable::new(
        "arrow",
        Mesh::new(vertices, indices, Topology::LineList),
        Material::line(color, line_width),
    )
}

/// Unit-wide, unit-tall rectangle outline standing on the X axis. Scaled per
/// edge to draw one side of an extruded obstacle footprint.
pub fn extrusion_face(color: u32, line_width: f32) -> Drawable {
    let corners = [
        [-0.5, 0.0, 0.0],
        [0.5, 0.0, 0.0],
        [0.5, 0.0, 1.0],
        [-0.5, 0.0, 1.0],
        [-0.5, 0.0, 0.0],
    ];
    Drawable::new(
        "extrusion_face",
        Mesh::line_strip(&corners),
        Material::line(color, line_width),
    )
}

/// Stand-in traffic light housing in model units (millimeters), used until
/// the textured model is available.
pub fn signal_housing() -> Drawable {
    let mut housing = box_outline(Vec3::new(300.0, 900.0, 300.0), 0x333333, 1.0);
    housing.name = "traffic_light".into();
    housing
}
