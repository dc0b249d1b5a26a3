// obstacles/renderer.rs - per-tick obstacle markers on pooled nodes
use super::obstacle::{Obstacle, DEFAULT_COLOR};
use super::pool::PrimitivePool;
use crate::coordinates::CoordinateTransform;
use crate::map::elements::PointENU;
use crate::renderer::primitives::{arrow, box_outline, extrusion_face};
use crate::scene::{NodeId, Scene};
use crate::settings::ObstacleSettings;
use glam::{DVec2, DVec3, Quat, Vec3};
use std::f64::consts::FRAC_PI_2;

/// Slots used by the last tick, per pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveCounts {
    pub arrows: usize,
    pub boxes: usize,
    pub faces: usize,
}

/// Draws tracked obstacles as heading arrows plus either a bounding box or
/// one extruded face per footprint edge.
#[derive(Debug)]
pub struct ObstacleRenderer {
    arrows: PrimitivePool,
    boxes: PrimitivePool,
    faces: PrimitivePool,
    default_height: f64,
}

impl ObstacleRenderer {
    pub fn new(settings: &ObstacleSettings) -> Self {
        let shape = settings.arrow;
        let mut arrow = arrow(
            shape.length,
            settings.line_thickness,
            shape.head_length,
            shape.head_width,
            DEFAULT_COLOR,
        );
        arrow.transform.set_yaw(-std::f32::consts::FRAC_PI_2);

        Self {
            arrows: PrimitivePool::new(arrow),
            boxes: PrimitivePool::new(box_outline(Vec3::ONE, DEFAULT_COLOR, settings.line_thickness)),
            faces: PrimitivePool::new(extrusion_face(DEFAULT_COLOR, settings.line_thickness)),
            default_height: settings.default_height,
        }
    }

    pub fn arrows(&self) -> &PrimitivePool {
        &self.arrows
    }

    pub fn boxes(&self) -> &PrimitivePool {
        &self.boxes
    }

    pub fn faces(&self) -> &PrimitivePool {
        &self.faces
    }

    /// Refresh the markers for this tick's obstacles. Pools grow as needed;
    /// slots left over from busier ticks are hidden, never destroyed.
    pub fn update_tick(
        &mut self,
        obstacles: &[Obstacle],
        enabled: bool,
        coordinates: &dyn CoordinateTransform,
        scene: &mut Scene,
    ) -> ActiveCounts {
        if !enabled {
            self.arrows.hide_all(scene);
            self.boxes.hide_all(scene);
            self.faces.hide_all(scene);
            return ActiveCounts::default();
        }

        let mut used = ActiveCounts::default();
        for obstacle in obstacles {
            let Some((x, y)) = obstacle.position() else {
                continue;
            };
            let height = obstacle.height.unwrap_or(self.default_height);
            let Some(position) = coordinates.apply_offset(DVec3::new(x, y, height / 2.0), false)
            else {
                log::trace!("Skipping obstacle {:?}: no coordinate offset yet", obstacle.id);
                continue;
            };
            let position = position.as_vec3();
            let color = obstacle.color();
            let heading = obstacle.heading.unwrap_or(0.0);

            let arrow = self.arrows.get_or_create(used.arrows, scene);
            used.arrows += 1;
            let arrow_scale = if !obstacle.polygon_point.is_empty() {
                let mean_edge = self.place_faces(
                    &obstacle.polygon_point,
                    height,
                    color,
                    coordinates,
                    used.faces,
                    scene,
                );
                used.faces += obstacle.polygon_point.len();
                Vec3::splat(mean_edge)
            } else if let Some((length, width, height)) = obstacle.dimensions() {
                let node = self.boxes.get_or_create(used.boxes, scene);
                used.boxes += 1;
                paint(scene, node, color, true);
                scene.update_transform(node, |t| {
                    t.translation = position;
                    t.scale = Vec3::new(length as f32, width as f32, height as f32);
                    t.set_yaw(heading as f32);
                });
                Vec3::new(width as f32, length as f32, height as f32)
            } else {
                Vec3::ONE
            };

            paint(scene, arrow, color, obstacle.shows_arrow());
            scene.update_transform(arrow, |t| {
                t.translation = position;
                t.rotation = Quat::from_rotation_z(-(FRAC_PI_2 - heading) as f32);
                t.scale = arrow_scale;
            });
        }

        self.arrows.hide_from(used.arrows, scene);
        self.boxes.hide_from(used.boxes, scene);
        self.faces.hide_from(used.faces, scene);
        used
    }

    /// Position one face per polygon edge, starting at slot `first`.
    /// Returns the mean edge length.
    fn place_faces(
        &mut self,
        points: &[PointENU],
        height: f64,
        color: u32,
        coordinates: &dyn CoordinateTransform,
        first: usize,
        scene: &mut Scene,
    ) -> f32 {
        let mut perimeter = 0.0;
        for (i, point) in points.iter().enumerate() {
            let next = &points[(i + 1) % points.len()];
            let node = self.faces.get_or_create(first + i, scene);

            let (a, b) = (DVec2::new(point.x, point.y), DVec2::new(next.x, next.y));
            let midpoint = ((a + b) / 2.0).extend(0.0);
            let Some(center) = coordinates.apply_offset(midpoint, false) else {
                scene.set_visible(node, false);
                continue;
            };

            let edge = DVec3::new(point.x, point.y, point.z).distance(DVec3::new(next.x, next.y, next.z));
            perimeter += edge;
            let direction = b - a;

            paint(scene, node, color, true);
            scene.update_transform(node, |t| {
                t.translation = Vec3::new(center.x as f32, center.y as f32, 0.0);
                t.scale = Vec3::new(edge as f32, 1.0, height as f32);
                t.set_yaw(direction.y.atan2(direction.x) as f32);
            });
        }
        (perimeter / points.len() as f64) as f32
    }

    /// Dispose every pooled node.
    pub fn dispose(&mut self, scene: &mut Scene) {
        self.arrows.dispose(scene);
        self.boxes.dispose(scene);
        self.faces.dispose(scene);
    }
}

fn paint(scene: &mut Scene, node: NodeId, color: u32, visible: bool) {
    if let Some(material) = scene.material_mut(node) {
        material.set_color_hex(color);
    }
    scene.set_visible(node, visible);
}
