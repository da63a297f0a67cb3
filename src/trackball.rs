//! Virtual trackball for mouse-driven rotation.
//!
//! Pointer positions arrive in normalized view coordinates (`[-1, 1]` on both
//! axes, y pointing up). A drag is turned into an incremental rotation that is
//! composed onto the accumulated orientation; between drags the trackball can
//! keep spinning at a constant angular velocity about a fixed axis.

use std::time::Instant;

use nalgebra::{Point2, Unit, UnitQuaternion, Vector2, Vector3};

/// Below this length a cross product or projected axis is treated as zero.
const EPSILON: f32 = 1.0e-6;

/// How pointer positions are turned into rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrackMode {
    /// Positions are lifted onto a unit hemisphere facing the viewer and the
    /// drag rotates the shortest way between the two lifted points.
    Sphere,
    /// Positions stay on the view plane and the drag turns about the
    /// trackball's fixed axis.
    Plane,
}

impl TrackMode {
    /// Projects a view-space pointer position for this mode.
    fn project(self, point: Point2<f32>) -> Vector3<f32> {
        match self {
            TrackMode::Sphere => project_to_sphere(point),
            TrackMode::Plane => Vector3::new(point.x, point.y, 0.0),
        }
    }

    /// Rotation taking `from` to `to`, both produced by [`TrackMode::project`].
    ///
    /// Returns `None` when the drag is too small to define a rotation.
    fn delta(
        self,
        axis: &Unit<Vector3<f32>>,
        from: &Vector3<f32>,
        to: &Vector3<f32>,
        sensitivity: f32,
    ) -> Option<UnitQuaternion<f32>> {
        match self {
            TrackMode::Sphere => {
                let cross = from.cross(to);
                let rotation_axis = Unit::try_new(cross, EPSILON)?;
                let angle = cross.norm().atan2(from.dot(to)) * sensitivity;
                Some(UnitQuaternion::from_axis_angle(&rotation_axis, angle))
            }
            TrackMode::Plane => {
                // Dragging across the on-screen image of the axis turns about it.
                let across = Unit::try_new(Vector2::new(axis.y, -axis.x), EPSILON)?;
                let displacement = Vector2::new(to.x - from.x, to.y - from.y);
                let angle = displacement.dot(&across) * sensitivity;
                if angle.abs() < EPSILON {
                    return None;
                }
                Some(UnitQuaternion::from_axis_angle(axis, angle))
            }
        }
    }
}

/// Lifts a point onto the unit hemisphere `z >= 0`.
///
/// Points on or outside the unit circle are pulled onto its rim.
fn project_to_sphere(point: Point2<f32>) -> Vector3<f32> {
    let sqr_radius = point.coords.norm_squared();
    if sqr_radius < 1.0 {
        Vector3::new(point.x, point.y, (1.0 - sqr_radius).sqrt())
    } else {
        Vector3::new(point.x, point.y, 0.0) / sqr_radius.sqrt()
    }
}

/// Orientation driven by pointer drags and constant idle spin.
#[derive(Debug, Clone)]
pub(crate) struct TrackBall {
    rotation: UnitQuaternion<f32>,
    /// Idle spin axis, also the turning axis in [`TrackMode::Plane`].
    axis: Unit<Vector3<f32>>,
    /// Idle spin speed in radians per second.
    angular_velocity: f32,
    sensitivity: f32,
    mode: TrackMode,
    pressed: bool,
    paused: bool,
    last_position: Vector3<f32>,
    last_time: Option<Instant>,
}

impl TrackBall {
    /// Creates a trackball spinning at `angular_velocity` radians per second
    /// about `axis`.
    ///
    /// A zero `axis` falls back to +Y. A negative velocity spins the other
    /// way round the same axis.
    pub(crate) fn new(angular_velocity: f32, axis: Vector3<f32>, mode: TrackMode) -> Self {
        let axis = Unit::try_new(axis, EPSILON).unwrap_or_else(Vector3::y_axis);
        let (axis, angular_velocity) = if angular_velocity < 0.0 {
            (-axis, -angular_velocity)
        } else {
            (axis, angular_velocity)
        };

        Self {
            rotation: UnitQuaternion::identity(),
            axis,
            angular_velocity,
            sensitivity: 1.0,
            mode,
            pressed: false,
            paused: false,
            last_position: Vector3::zeros(),
            last_time: None,
        }
    }

    /// Scales every drag angle by `sensitivity`.
    pub(crate) fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Current orientation.
    pub(crate) fn rotation(&self) -> UnitQuaternion<f32> {
        self.rotation
    }

    pub(crate) fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Starts a drag at `point`.
    ///
    /// `_reference` is accepted so press, move and release share one calling
    /// convention; only moves produce rotation.
    pub(crate) fn push(&mut self, point: Point2<f32>, _reference: &UnitQuaternion<f32>) {
        self.last_position = self.mode.project(point);
        self.pressed = true;
    }

    /// Continues a drag to `point`.
    ///
    /// The rotation between the previous and the new pointer sample is
    /// expressed relative to `reference` (typically the camera orientation),
    /// so dragging always follows what is on screen. Does nothing when no drag
    /// is active.
    pub(crate) fn move_to(&mut self, point: Point2<f32>, reference: &UnitQuaternion<f32>) {
        if !self.pressed {
            return;
        }

        let position = self.mode.project(point);
        if let Some(delta) =
            self.mode
                .delta(&self.axis, &self.last_position, &position, self.sensitivity)
        {
            let local = reference.inverse() * delta * reference;
            self.rotation = local * self.rotation;
            self.rotation.renormalize();
        }
        self.last_position = position;
    }

    /// Ends a drag at `point`, applying the final movement first.
    pub(crate) fn release(&mut self, point: Point2<f32>, reference: &UnitQuaternion<f32>) {
        self.move_to(point, reference);
        self.pressed = false;
    }

    /// Integrates idle spin up to `now`.
    ///
    /// The first call only records the time. While a drag is active or the
    /// trackball is paused the clock keeps ticking but the orientation holds.
    pub(crate) fn advance(&mut self, now: Instant) {
        let Some(last_time) = self.last_time.replace(now) else {
            return;
        };
        if self.pressed || self.paused {
            return;
        }

        let elapsed = now.saturating_duration_since(last_time).as_secs_f32();
        let angle = self.angular_velocity * elapsed;
        if angle > 0.0 {
            self.rotation = UnitQuaternion::from_axis_angle(&self.axis, angle) * self.rotation;
            self.rotation.renormalize();
        }
    }

    /// Stops idle spin, keeping the current orientation.
    pub(crate) fn pause(&mut self) {
        self.paused = true;
    }

    /// Restarts idle spin from the next [`TrackBall::advance`].
    pub(crate) fn resume(&mut self) {
        self.paused = false;
        self.last_time = None;
    }

    /// Returns to the identity orientation and drops any active drag.
    pub(crate) fn reset(&mut self) {
        self.rotation = UnitQuaternion::identity();
        self.pressed = false;
        self.last_time = None;
    }
}
