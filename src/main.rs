//! Boxes: a ring of shaded cubes steered with mouse trackballs.
//!
//! Left drag tilts the central box, right drag swings the ring around it,
//! middle drag turns the camera and the wheel zooms. Uses iced for UI and
//! wgpu for GPU rendering.

use iced::widget::{Column, Row, Shader, Slider, button, checkbox, text};
use iced::{Element, Length, Settings, Task};

mod camera;
mod geometry;
mod renderer;
mod scene;
mod shader_widget;
mod trackball;

use scene::{DEFAULT_BOXES, MAX_BOXES, MIN_BOXES};
use shader_widget::BoxesProgram;

/// Main application state - handles UI controls only
#[derive(Debug)]
pub(crate) struct BoxesApp {
    box_count: u8,
    idle_spin: bool,
    /// Bumped on every reset request so the viewport can notice it.
    reset_generation: u64,
}

/// Messages that the application can receive
#[derive(Debug, Clone)]
pub(crate) enum Message {
    BoxCount(u8),
    IdleSpin(bool),
    ResetView,
}

impl BoxesApp {
    pub(crate) fn new() -> Self {
        Self {
            box_count: DEFAULT_BOXES,
            idle_spin: true,
            reset_generation: 0,
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        "Boxes"
    }

    pub(crate) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::BoxCount(count) => {
                self.box_count = count;
            }
            Message::IdleSpin(enabled) => {
                log::info!("idle spin {}", if enabled { "on" } else { "off" });
                self.idle_spin = enabled;
            }
            Message::ResetView => {
                self.reset_generation = self.reset_generation.wrapping_add(1);
            }
        }

        Task::none()
    }

    pub(crate) fn view(&self) -> Element<Message> {
        let controls = Column::new()
            .spacing(20)
            .push(
                Column::new()
                    .spacing(5)
                    .push(text(format!("Boxes: {}", self.box_count)))
                    .push(
                        Slider::new(MIN_BOXES..=MAX_BOXES, self.box_count, Message::BoxCount)
                            .width(250),
                    ),
            )
            .push(checkbox("Idle spin", self.idle_spin).on_toggle(Message::IdleSpin))
            .push(button(text("Reset view")).on_press(Message::ResetView))
            .push(text(
                "Left drag: tilt box\nRight drag: swing ring\nMiddle drag: turn camera\nWheel: zoom",
            ));

        let viewport = Shader::new(BoxesProgram::new(
            self.box_count,
            self.idle_spin,
            self.reset_generation,
        ))
        .width(Length::Fill)
        .height(Length::Fill);

        Row::new()
            .spacing(10)
            .padding(10)
            .push(
                iced::widget::container(controls)
                    .width(Length::Shrink)
                    .height(Length::Fill),
            )
            .push(viewport)
            .into()
    }
}

fn main() -> iced::Result {
    env_logger::builder().format_timestamp(None).init();

    let app = BoxesApp::new();
    iced::application(app.title(), BoxesApp::update, BoxesApp::view)
        .settings(Settings {
            antialiasing: true,
            ..Settings::default()
        })
        .run_with(move || (app, Task::none()))
}
