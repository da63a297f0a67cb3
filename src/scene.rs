//! Scene state shared by input handling and rendering.
//!
//! Owns the three trackballs that move things around: one tilts the central
//! box, one swings the ring of boxes around it, and one turns the camera.

use std::f32::consts::{PI, TAU};
use std::time::Instant;

use nalgebra::{Matrix4, Point2, Rotation3, UnitQuaternion, Vector3, Vector4};

use crate::camera::{self, Camera};
use crate::geometry::Color;
use crate::trackball::{TrackBall, TrackMode};

/// Idle spin of the central box, radians per second.
const OBJECT_SPIN: f32 = 50.0 * PI / 180.0;
/// Idle spin of the box ring, radians per second.
const ORBIT_SPIN: f32 = 5.0 * PI / 180.0;
/// Camera drags turn a little slower than box drags.
const CAMERA_SENSITIVITY: f32 = 0.75;

pub(crate) const MIN_BOXES: u8 = 1;
pub(crate) const MAX_BOXES: u8 = 12;
pub(crate) const DEFAULT_BOXES: u8 = 6;

const RING_RADIUS: f32 = 2.0;
const RING_BOX_SCALE: Vector3<f32> = Vector3::new(0.3, 0.6, 0.6);

/// Which trackball a drag is steering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragTarget {
    /// Tilts the central box.
    Object,
    /// Swings the ring of boxes.
    Orbit,
    /// Turns the whole view.
    Camera,
}

impl DragTarget {
    const ALL: [DragTarget; 3] = [DragTarget::Object, DragTarget::Orbit, DragTarget::Camera];
}

/// One box to draw.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Instance {
    pub(crate) model: Matrix4<f32>,
    pub(crate) color: Vector4<f32>,
}

#[derive(Debug, Clone)]
pub(crate) struct Scene {
    object: TrackBall,
    orbit: TrackBall,
    camera: TrackBall,
    distance_exponent: f32,
    box_count: u8,
    spinning: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub(crate) fn new() -> Self {
        Self {
            object: TrackBall::new(OBJECT_SPIN, Vector3::y(), TrackMode::Sphere),
            orbit: TrackBall::new(ORBIT_SPIN, Vector3::z(), TrackMode::Sphere),
            camera: TrackBall::new(0.0, Vector3::y(), TrackMode::Plane)
                .with_sensitivity(CAMERA_SENSITIVITY),
            distance_exponent: camera::DEFAULT_DISTANCE_EXPONENT,
            box_count: DEFAULT_BOXES,
            spinning: true,
        }
    }

    fn trackball_mut(&mut self, target: DragTarget) -> &mut TrackBall {
        match target {
            DragTarget::Object => &mut self.object,
            DragTarget::Orbit => &mut self.orbit,
            DragTarget::Camera => &mut self.camera,
        }
    }

    /// Frame a drag on `target` is measured against.
    ///
    /// Object and ring drags follow the camera so they match what is on
    /// screen; the camera itself is dragged in its own frame.
    fn reference_for(&self, target: DragTarget) -> UnitQuaternion<f32> {
        match target {
            DragTarget::Object | DragTarget::Orbit => self.camera.rotation(),
            DragTarget::Camera => UnitQuaternion::identity(),
        }
    }

    pub(crate) fn press(&mut self, target: DragTarget, point: Point2<f32>) {
        log::debug!("drag {target:?} started at {point}");
        let reference = self.reference_for(target);
        self.trackball_mut(target).push(point, &reference);
    }

    /// Moves every active drag to `point`.
    pub(crate) fn drag(&mut self, point: Point2<f32>) {
        for target in DragTarget::ALL {
            let reference = self.reference_for(target);
            self.trackball_mut(target).move_to(point, &reference);
        }
    }

    pub(crate) fn release(&mut self, target: DragTarget, point: Point2<f32>) {
        let reference = self.reference_for(target);
        let trackball = self.trackball_mut(target);
        if trackball.is_pressed() {
            trackball.release(point, &reference);
            log::debug!("drag {target:?} ended at {point}");
        }
    }

    pub(crate) fn is_dragging(&self) -> bool {
        self.object.is_pressed() || self.orbit.is_pressed() || self.camera.is_pressed()
    }

    /// Zooms by `steps` wheel notches; positive moves the camera away.
    pub(crate) fn zoom(&mut self, steps: f32) {
        self.distance_exponent =
            camera::clamp_distance_exponent(self.distance_exponent + steps * camera::ZOOM_STEP);
    }

    /// Lets idle spin catch up to `now`.
    pub(crate) fn advance(&mut self, now: Instant) {
        self.object.advance(now);
        self.orbit.advance(now);
        self.camera.advance(now);
    }

    pub(crate) fn set_box_count(&mut self, count: u8) {
        let count = count.clamp(MIN_BOXES, MAX_BOXES);
        if count != self.box_count {
            log::debug!("box count {} -> {count}", self.box_count);
            self.box_count = count;
        }
    }

    pub(crate) fn set_spinning(&mut self, spinning: bool) {
        if spinning == self.spinning {
            return;
        }
        self.spinning = spinning;
        for target in DragTarget::ALL {
            let trackball = self.trackball_mut(target);
            if spinning {
                trackball.resume();
            } else {
                trackball.pause();
            }
        }
    }

    /// Puts every trackball and the zoom back to where they started.
    pub(crate) fn reset(&mut self) {
        log::info!("resetting view");
        self.object.reset();
        self.orbit.reset();
        self.camera.reset();
        self.distance_exponent = camera::DEFAULT_DISTANCE_EXPONENT;
    }

    pub(crate) fn camera(&self) -> Camera {
        Camera {
            rotation: self.camera.rotation(),
            distance: camera::distance_for_exponent(self.distance_exponent),
        }
    }

    /// The central box followed by the ring boxes.
    pub(crate) fn instances(&self) -> Vec<Instance> {
        let mut instances = Vec::with_capacity(usize::from(self.box_count) + 1);
        instances.push(Instance {
            model: self.object.rotation().to_homogeneous(),
            color: Color::CENTER.into(),
        });

        let orbit = self.orbit.rotation().to_homogeneous();
        let count = usize::from(self.box_count);
        for index in 0..count {
            let angle = TAU * index as f32 / count as f32;
            let model = orbit
                * Rotation3::from_axis_angle(&Vector3::z_axis(), angle).to_homogeneous()
                * Matrix4::new_translation(&Vector3::new(RING_RADIUS, 0.0, 0.0))
                * Matrix4::new_nonuniform_scaling(&RING_BOX_SCALE);
            instances.push(Instance {
                model,
                color: Color::ring(index).into(),
            });
        }

        instances
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use nalgebra::Point3;

    use super::*;

    fn ring_centers(scene: &Scene) -> Vec<Point3<f32>> {
        scene.instances()[1..]
            .iter()
            .map(|instance| instance.model.transform_point(&Point3::origin()))
            .collect()
    }

    #[test]
    fn ring_boxes_sit_evenly_on_a_circle() {
        let mut scene = Scene::new();
        scene.set_box_count(4);
        let centers = ring_centers(&scene);
        assert_eq!(centers.len(), 4);

        let expected = [
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(-2.0, 0.0, 0.0),
            Point3::new(0.0, -2.0, 0.0),
        ];
        for (center, expected) in centers.iter().zip(expected.iter()) {
            assert!((center - expected).norm() < 1.0e-5);
        }
    }

    #[test]
    fn box_count_is_clamped() {
        let mut scene = Scene::new();
        scene.set_box_count(0);
        assert_eq!(scene.instances().len(), usize::from(MIN_BOXES) + 1);
        scene.set_box_count(200);
        assert_eq!(scene.instances().len(), usize::from(MAX_BOXES) + 1);
    }

    #[test]
    fn buttons_steer_their_own_trackball() {
        let mut scene = Scene::new();
        scene.press(DragTarget::Orbit, Point2::new(0.0, 0.0));
        scene.drag(Point2::new(0.5, 0.0));
        scene.release(DragTarget::Orbit, Point2::new(0.5, 0.0));

        assert_ne!(scene.orbit.rotation(), UnitQuaternion::identity());
        assert_eq!(scene.object.rotation(), UnitQuaternion::identity());
        assert_eq!(scene.camera.rotation(), UnitQuaternion::identity());
        assert!(!scene.is_dragging());
    }

    #[test]
    fn camera_drag_is_horizontal_turn() {
        let mut scene = Scene::new();
        scene.press(DragTarget::Camera, Point2::new(0.0, 0.0));
        scene.drag(Point2::new(0.0, 0.8));
        assert!(scene.is_dragging());
        assert_eq!(scene.camera().rotation, UnitQuaternion::identity());

        scene.drag(Point2::new(0.4, 0.8));
        let expected =
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.4 * CAMERA_SENSITIVITY);
        assert!(scene.camera().rotation.angle_to(&expected) < 1.0e-2);
    }

    #[test]
    fn object_drag_follows_the_camera() {
        let mut scene = Scene::new();
        scene.press(DragTarget::Camera, Point2::new(0.0, 0.0));
        scene.release(
            DragTarget::Camera,
            Point2::new(PI / 2.0 / CAMERA_SENSITIVITY, 0.0),
        );

        // A horizontal drag should still spin the box about the screen's
        // vertical, which is world +Y for a camera turned about Y.
        scene.press(DragTarget::Object, Point2::new(0.0, 0.0));
        scene.release(DragTarget::Object, Point2::new(1.0, 0.0));
        let turned = scene.object.rotation();
        let axis = turned.axis().expect("drag rotates the box");
        assert!((axis.into_inner() - Vector3::y()).norm() < 1.0e-4);

        // In eye space the drag moved the visible front of the box to the right.
        let in_eye = scene.camera().rotation * turned * scene.camera().rotation.inverse();
        assert!((in_eye * Vector3::z() - Vector3::x()).norm() < 1.0e-4);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut scene = Scene::new();
        let start = scene.camera().distance;
        scene.zoom(1.0);
        assert!(scene.camera().distance > start);
        scene.zoom(-1000.0);
        let nearest = scene.camera().distance;
        scene.zoom(-1.0);
        assert_eq!(scene.camera().distance, nearest);
    }

    #[test]
    fn pausing_freezes_idle_spin() {
        let mut scene = Scene::new();
        let start = Instant::now();
        scene.advance(start);
        scene.set_spinning(false);
        scene.advance(start + Duration::from_secs(1));
        assert_eq!(scene.object.rotation(), UnitQuaternion::identity());

        scene.set_spinning(true);
        scene.advance(start + Duration::from_secs(2));
        scene.advance(start + Duration::from_secs(3));
        assert!((scene.object.rotation().angle() - OBJECT_SPIN).abs() < 1.0e-4);
    }

    #[test]
    fn reset_restores_start_pose() {
        let mut scene = Scene::new();
        let start = Instant::now();
        scene.advance(start);
        scene.advance(start + Duration::from_millis(500));
        scene.zoom(3.0);
        scene.reset();

        assert_eq!(scene.object.rotation(), UnitQuaternion::identity());
        assert_eq!(scene.orbit.rotation(), UnitQuaternion::identity());
        assert_eq!(
            scene.camera().distance,
            camera::distance_for_exponent(camera::DEFAULT_DISTANCE_EXPONENT)
        );
    }
}
