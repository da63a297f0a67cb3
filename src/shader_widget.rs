//! Shader widget hosting the boxes scene.
//!
//! The widget owns the [`Scene`] as its state: mouse events drive the
//! trackballs, every redraw lets idle spin catch up, and `draw` hands a
//! snapshot of the scene to the GPU side.

use iced::widget::shader::{self, wgpu};
use iced::{Point, Rectangle, Size, event, mouse, window};
use nalgebra::Point2;

use crate::Message;
use crate::camera::{Camera, Projection};
use crate::renderer::Renderer;
use crate::scene::{DragTarget, Instance, Scene};

/// Everything the GPU needs for one frame.
#[derive(Debug, Clone)]
pub(crate) struct BoxesPrimitive {
    camera: Camera,
    projection: Projection,
    instances: Vec<Instance>,
}

impl shader::Primitive for BoxesPrimitive {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        storage: &mut shader::Storage,
        bounds: &Rectangle,
        viewport: &shader::Viewport,
    ) {
        let target_size = viewport.physical_size();
        if target_size.width == 0 || target_size.height == 0 {
            return;
        }
        let area = physical_area(*bounds, viewport.scale_factor() as f32, target_size);

        if !storage.has::<Renderer>() {
            let renderer = pollster::block_on(Renderer::new(device, format, area, target_size));
            storage.store(renderer);
        }
        let Some(renderer) = storage.get_mut::<Renderer>() else {
            return;
        };
        renderer.resize(device, area, target_size);
        renderer.update_camera(queue, &self.camera, &self.projection);
        renderer.update_instances(queue, &self.instances);
    }

    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        storage: &shader::Storage,
        target: &wgpu::TextureView,
        clip_bounds: &Rectangle<u32>,
    ) {
        if let Some(renderer) = storage.get::<Renderer>() {
            renderer.render(encoder, target, clip_bounds);
        }
    }
}

/// Widget bounds in physical pixels, kept inside the render target.
fn physical_area(bounds: Rectangle, scale_factor: f32, target_size: Size<u32>) -> Rectangle {
    let area = bounds * scale_factor;
    let x = area.x.clamp(0.0, target_size.width as f32);
    let y = area.y.clamp(0.0, target_size.height as f32);
    Rectangle {
        x,
        y,
        width: area.width.min(target_size.width as f32 - x).max(1.0),
        height: area.height.min(target_size.height as f32 - y).max(1.0),
    }
}

/// Maps a window position to view coordinates: `[-1, 1]` across the widget,
/// y pointing up.
pub(crate) fn view_position(position: Point, bounds: Rectangle) -> Point2<f32> {
    Point2::new(
        2.0 * (position.x - bounds.x) / bounds.width - 1.0,
        1.0 - 2.0 * (position.y - bounds.y) / bounds.height,
    )
}

fn drag_target(button: mouse::Button) -> Option<DragTarget> {
    match button {
        mouse::Button::Left => Some(DragTarget::Object),
        mouse::Button::Right => Some(DragTarget::Orbit),
        mouse::Button::Middle => Some(DragTarget::Camera),
        _ => None,
    }
}

/// State kept by the widget between frames.
pub(crate) struct BoxesState {
    scene: Scene,
    projection: Projection,
    last_position: Point2<f32>,
    reset_generation: u64,
}

impl Default for BoxesState {
    fn default() -> Self {
        Self {
            scene: Scene::new(),
            projection: Projection::default(),
            last_position: Point2::origin(),
            reset_generation: 0,
        }
    }
}

/// The shader program drawing the boxes.
///
/// Carries the options chosen in the side panel; they are pushed into the
/// widget state on every update.
pub(crate) struct BoxesProgram {
    box_count: u8,
    idle_spin: bool,
    reset_generation: u64,
}

impl BoxesProgram {
    pub(crate) fn new(box_count: u8, idle_spin: bool, reset_generation: u64) -> Self {
        Self {
            box_count,
            idle_spin,
            reset_generation,
        }
    }

    fn apply_options(&self, state: &mut BoxesState) {
        state.scene.set_box_count(self.box_count);
        state.scene.set_spinning(self.idle_spin);
        if state.reset_generation != self.reset_generation {
            state.reset_generation = self.reset_generation;
            state.scene.reset();
        }
    }
}

impl shader::Program<Message> for BoxesProgram {
    type State = BoxesState;
    type Primitive = BoxesPrimitive;

    fn update(
        &self,
        state: &mut Self::State,
        event: shader::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
        shell: &mut iced::advanced::Shell<'_, Message>,
    ) -> (event::Status, Option<Message>) {
        self.apply_options(state);

        if bounds.width > 0.0 && bounds.height > 0.0 {
            state.projection.aspect = bounds.width / bounds.height;
        }

        let status = match event {
            shader::Event::Mouse(mouse_event) => {
                self.handle_mouse_event(state, mouse_event, bounds, cursor)
            }
            shader::Event::RedrawRequested(now) => {
                state.scene.advance(now);
                shell.request_redraw(window::RedrawRequest::NextFrame);
                event::Status::Ignored
            }
            _ => event::Status::Ignored,
        };

        (status, None)
    }

    fn draw(
        &self,
        state: &Self::State,
        _cursor: mouse::Cursor,
        _bounds: Rectangle,
    ) -> Self::Primitive {
        BoxesPrimitive {
            camera: state.scene.camera(),
            projection: state.projection,
            instances: state.scene.instances(),
        }
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.scene.is_dragging() {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}

impl BoxesProgram {
    /// Routes mouse events to the scene's trackballs.
    ///
    /// Left drags tilt the central box, right drags swing the ring, middle
    /// drags turn the camera and the wheel zooms.
    fn handle_mouse_event(
        &self,
        state: &mut BoxesState,
        mouse_event: mouse::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> event::Status {
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return event::Status::Ignored;
        }

        match mouse_event {
            mouse::Event::CursorMoved { position } => {
                // Keep following a drag even once the cursor leaves the widget.
                state.last_position = view_position(position, bounds);
                if state.scene.is_dragging() {
                    state.scene.drag(state.last_position);
                    return event::Status::Captured;
                }
            }
            mouse::Event::ButtonPressed(button) => {
                if let (Some(target), Some(position)) =
                    (drag_target(button), cursor.position_over(bounds))
                {
                    state.last_position = view_position(position, bounds);
                    state.scene.press(target, state.last_position);
                    return event::Status::Captured;
                }
            }
            mouse::Event::ButtonReleased(button) => {
                if let Some(target) = drag_target(button) {
                    if let Some(position) = cursor.position() {
                        state.last_position = view_position(position, bounds);
                    }
                    let was_dragging = state.scene.is_dragging();
                    state.scene.release(target, state.last_position);
                    if was_dragging {
                        return event::Status::Captured;
                    }
                }
            }
            mouse::Event::WheelScrolled { delta } => {
                if cursor.is_over(bounds) {
                    let steps = match delta {
                        mouse::ScrollDelta::Lines { y, .. } => y,
                        mouse::ScrollDelta::Pixels { y, .. } => y * 0.01,
                    };
                    state.scene.zoom(steps);
                    return event::Status::Captured;
                }
            }
            mouse::Event::CursorEntered | mouse::Event::CursorLeft => {}
        }

        event::Status::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_unit_square() {
        let bounds = Rectangle::new(Point::new(100.0, 50.0), Size::new(400.0, 200.0));
        assert_eq!(view_position(Point::new(100.0, 50.0), bounds), Point2::new(-1.0, 1.0));
        assert_eq!(view_position(Point::new(500.0, 250.0), bounds), Point2::new(1.0, -1.0));
        assert_eq!(view_position(Point::new(300.0, 150.0), bounds), Point2::new(0.0, 0.0));
    }

    #[test]
    fn physical_area_stays_inside_target() {
        let bounds = Rectangle::new(Point::new(10.0, 10.0), Size::new(600.0, 400.0));
        let area = physical_area(bounds, 2.0, Size::new(1000, 700));
        assert_eq!(area.x, 20.0);
        assert_eq!(area.y, 20.0);
        assert_eq!(area.width, 980.0);
        assert_eq!(area.height, 680.0);
    }

    #[test]
    fn buttons_pick_trackballs() {
        assert_eq!(drag_target(mouse::Button::Left), Some(DragTarget::Object));
        assert_eq!(drag_target(mouse::Button::Right), Some(DragTarget::Orbit));
        assert_eq!(drag_target(mouse::Button::Middle), Some(DragTarget::Camera));
        assert_eq!(drag_target(mouse::Button::Back), None);
    }
}
