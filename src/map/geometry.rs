// map/geometry.rs - per-kind drawables for map elements
use super::elements::{BoundaryType, Crosswalk, Curve, ElementKind, Lane, MapElement, PointENU, Signal};
use super::overlaps::{place_signal, SignalContext};
use crate::coordinates::CoordinateTransform;
use crate::renderer::primitives::{
    dashed_line_from_points, offset_perpendicular, segments_from_points, shape_from_points,
    signal_housing,
};
use crate::renderer::{Drawable, Material};
use crate::scene::Transform;
use glam::{DVec3, Vec3};
use std::f32::consts::FRAC_PI_2;
use thiserror::Error;

// ============================================================================
// Palette
// ============================================================================

pub const YELLOW: u32 = 0xDAA520;
pub const WHITE: u32 = 0xCCCCCC;
pub const CORAL: u32 = 0xFF7F50;
pub const GREEN: u32 = 0x006400;
pub const PURE_WHITE: u32 = 0xFFFFFF;
pub const DEFAULT_GRAY: u32 = 0xC0C0C0;

/// Lateral spacing between the two strokes of a double yellow boundary.
pub const DOUBLE_LINE_OFFSET: f32 = 0.3;
pub const CROSSWALK_OPACITY: f32 = 0.15;
pub const SIGNAL_MODEL_SCALE: f32 = 0.006;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("curve has no segments")]
    EmptyCurve,
    #[error("segment has no points")]
    MissingPoints,
    #[error("expected a {expected} element, got {found}")]
    KindMismatch {
        expected: ElementKind,
        found: ElementKind,
    },
    #[error("point ({x:.3}, {y:.3}) cannot be transformed; coordinate offset not set")]
    Untransformable { x: f64, y: f64 },
}

/// Everything a builder needs beyond the element itself.
pub struct BuildContext<'a> {
    pub coordinates: &'a dyn CoordinateTransform,
    pub signals: &'a SignalContext,
}

impl<'a> BuildContext<'a> {
    pub fn new(coordinates: &'a dyn CoordinateTransform, signals: &'a SignalContext) -> Self {
        Self {
            coordinates,
            signals,
        }
    }

    fn to_render(&self, point: &PointENU) -> Result<Vec3, GeometryError> {
        self.coordinates
            .apply_offset(DVec3::new(point.x, point.y, point.z), false)
            .map(|p| p.as_vec3())
            .ok_or(GeometryError::Untransformable {
                x: point.x,
                y: point.y,
            })
    }

    fn to_render_all(&self, points: &[PointENU]) -> Result<Vec<Vec3>, GeometryError> {
        points.iter().map(|p| self.to_render(p)).collect()
    }

    /// Render-space point list of every segment of `curve`.
    fn curve_points(&self, curve: &Curve) -> Result<Vec<Vec<Vec3>>, GeometryError> {
        if curve.segment.is_empty() {
            return Err(GeometryError::EmptyCurve);
        }
        curve
            .segment
            .iter()
            .map(|segment| {
                let line = segment
                    .line_segment
                    .as_ref()
                    .ok_or(GeometryError::MissingPoints)?;
                if line.point.is_empty() {
                    return Err(GeometryError::MissingPoints);
                }
                self.to_render_all(&line.point)
            })
            .collect()
    }
}

pub type BuildFn = fn(&MapElement, &BuildContext) -> Result<Vec<Drawable>, GeometryError>;

/// Builder for kinds that render; None for kinds kept only as data.
pub fn builder_for(kind: ElementKind) -> Option<BuildFn> {
    match kind {
        ElementKind::Lane => Some(lane_element as BuildFn),
        ElementKind::Crosswalk => Some(crosswalk_element as BuildFn),
        ElementKind::Signal => Some(signal_element as BuildFn),
        ElementKind::Junction
        | ElementKind::StopSign
        | ElementKind::Yield
        | ElementKind::Overlap => None,
    }
}

fn lane_element(element: &MapElement, ctx: &BuildContext) -> Result<Vec<Drawable>, GeometryError> {
    let MapElement::Lane(lane) = element else {
        return Err(GeometryError::KindMismatch {
            expected: ElementKind::Lane,
            found: element.kind(),
        });
    };
    build_lane(lane, ctx)
}

fn crosswalk_element(
    element: &MapElement,
    ctx: &BuildContext,
) -> Result<Vec<Drawable>, GeometryError> {
    let MapElement::Crosswalk(crosswalk) = element else {
        return Err(GeometryError::KindMismatch {
            expected: ElementKind::Crosswalk,
            found: element.kind(),
        });
    };
    build_crosswalk(crosswalk, ctx)
}

fn signal_element(element: &MapElement, ctx: &BuildContext) -> Result<Vec<Drawable>, GeometryError> {
    let MapElement::Signal(signal) = element else {
        return Err(GeometryError::KindMismatch {
            expected: ElementKind::Signal,
            found: element.kind(),
        });
    };
    build_signal(signal, ctx)
}

// ============================================================================
// Lanes
// ============================================================================

/// Drawable for one boundary segment painted in `style`.
pub fn boundary_line(style: BoundaryType, points: &[Vec3]) -> Drawable {
    match style {
        BoundaryType::DottedYellow => dashed_line_from_points(points, YELLOW, 4.0, 3.0, 3.0, 1.0),
        BoundaryType::DottedWhite => dashed_line_from_points(points, WHITE, 4.0, 3.0, 3.0, 1.0),
        BoundaryType::SolidYellow => segments_from_points(points, YELLOW, 3.0, 1.0),
        BoundaryType::SolidWhite => segments_from_points(points, WHITE, 3.0, 1.0),
        BoundaryType::DoubleYellow => {
            let mut left = segments_from_points(points, YELLOW, 2.0, 1.0);
            let shifted = offset_perpendicular(points, DOUBLE_LINE_OFFSET);
            // child transforms are parent-relative; the layer is already applied
            let right = segments_from_points(&shifted, YELLOW, 3.0, 0.0);
            left.add(right);
            left
        }
        BoundaryType::Curb => segments_from_points(points, CORAL, 3.0, 1.0),
        BoundaryType::Unknown => segments_from_points(points, DEFAULT_GRAY, 3.0, 1.0),
    }
}

pub fn build_lane(lane: &Lane, ctx: &BuildContext) -> Result<Vec<Drawable>, GeometryError> {
    let central = lane
        .central_curve
        .as_ref()
        .ok_or(GeometryError::MissingField("centralCurve"))?;
    let right = lane
        .right_boundary
        .as_ref()
        .ok_or(GeometryError::MissingField("rightBoundary"))?;
    let left = lane
        .left_boundary
        .as_ref()
        .ok_or(GeometryError::MissingField("leftBoundary"))?;

    let mut drawables: Vec<Drawable> = ctx
        .curve_points(central)?
        .iter()
        .map(|points| segments_from_points(points, GREEN, 1.0, 1.0))
        .collect();

    for boundary in [right, left] {
        let curve = boundary
            .curve
            .as_ref()
            .ok_or(GeometryError::MissingField("curve"))?;
        let style = boundary.style();
        drawables.extend(
            ctx.curve_points(curve)?
                .iter()
                .map(|points| boundary_line(style, points)),
        );
    }

    Ok(drawables)
}

// ============================================================================
// Crosswalks
// ============================================================================

pub fn build_crosswalk(
    crosswalk: &Crosswalk,
    ctx: &BuildContext,
) -> Result<Vec<Drawable>, GeometryError> {
    let polygon = crosswalk
        .polygon
        .as_ref()
        .ok_or(GeometryError::MissingField("polygon"))?;
    let mut border = ctx.to_render_all(&polygon.point)?;
    let first = *border.first().ok_or(GeometryError::MissingPoints)?;
    border.push(first);

    let fill = Material::from_hex(PURE_WHITE).with_opacity(CROSSWALK_OPACITY);
    Ok(vec![
        shape_from_points(&border, fill, 3.0),
        segments_from_points(&border, PURE_WHITE, 2.0, 0.0),
    ])
}

// ============================================================================
// Signals
// ============================================================================

fn stop_lines(curves: &[Curve], ctx: &BuildContext) -> Result<Vec<Drawable>, GeometryError> {
    let mut drawables = Vec::new();
    for curve in curves {
        for points in ctx.curve_points(curve)? {
            drawables.push(segments_from_points(&points, PURE_WHITE, 5.0, 3.0));
        }
    }
    Ok(drawables)
}

/// Light model plus stop lines. The model is left out, with a warning, when
/// its position or heading cannot be resolved.
pub fn build_signal(signal: &Signal, ctx: &BuildContext) -> Result<Vec<Drawable>, GeometryError> {
    let mut drawables = Vec::new();

    match place_signal(signal, ctx.signals).resolved() {
        Some((position, heading)) => {
            let anchor = ctx
                .coordinates
                .apply_offset(position.extend(0.0), false)
                .ok_or(GeometryError::Untransformable {
                    x: position.x,
                    y: position.y,
                })?;
            let mut transform = Transform::from_translation(Vec3::new(
                anchor.x as f32,
                anchor.y as f32,
                0.0,
            ));
            transform.set_euler(FRAC_PI_2, heading as f32, 0.0);
            transform.scale = Vec3::splat(SIGNAL_MODEL_SCALE);
            drawables.push(signal_housing().with_transform(transform));
        }
        None => log::warn!(
            "Signal {}: unable to determine light position or heading; skipping model",
            signal.id.id
        ),
    }

    drawables.extend(stop_lines(&signal.stop_line, ctx)?);
    Ok(drawables)
}
