//! GPU rendering for the boxes viewport.
//!
//! Draws a gradient background and then every box as an instance of one cube
//! mesh, all confined to the widget's bounds inside iced's render target.

use iced::widget::shader::wgpu::{self, CommandEncoder, Device, Queue, TextureFormat, TextureView};
use iced::{Rectangle, Size};
use wgpu::util::DeviceExt;

use crate::camera::{Camera, CameraUniform, Projection};
use crate::geometry::{Vertex, cube_vertices};
use crate::scene::{Instance, MAX_BOXES};

/// Central box plus a full ring.
const MAX_INSTANCES: usize = MAX_BOXES as usize + 1;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// GPU-side layout of one [`Instance`].
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct InstanceRaw {
    /// 4x4 model transformation matrix
    model: [[f32; 4]; 4],
    /// RGBA color values
    color: [f32; 4],
}

impl From<&Instance> for InstanceRaw {
    fn from(instance: &Instance) -> Self {
        Self {
            model: instance.model.into(),
            color: instance.color.into(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Renderer {
    /// Physical-pixel area of the target to draw into.
    viewport: Rectangle<f32>,
    box_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    num_vertices: u32,
    instance_buffer: wgpu::Buffer,
    num_instances: u32,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    background_pipeline: wgpu::RenderPipeline,
}

fn create_depth_texture(device: &Device, size: Size<u32>) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

impl Renderer {
    /// Creates every GPU resource the viewport needs.
    ///
    /// # Arguments
    /// * `viewport` - Area of the target to draw into, in physical pixels
    /// * `target_size` - Size of the whole render target, in physical pixels
    pub(crate) async fn new(
        device: &Device,
        format: TextureFormat,
        viewport: Rectangle<f32>,
        target_size: Size<u32>,
    ) -> Self {
        log::info!(
            "creating box renderer for {}x{} target ({format:?})",
            target_size.width,
            target_size.height
        );

        let camera_uniform = CameraUniform::new();
        let (depth_texture, depth_view) = create_depth_texture(device, target_size);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("Camera Bind Group Layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("Camera Bind Group"),
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Box Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let box_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Box Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let box_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Box Pipeline"),
            layout: Some(&box_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let vertices = cube_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (MAX_INSTANCES * std::mem::size_of::<InstanceRaw>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let background_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Background Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("background.wgsl").into()),
        });

        let background_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Background Pipeline Layout"),
                bind_group_layouts: &[],
                push_constant_ranges: &[],
            });

        let background_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Background Pipeline"),
            layout: Some(&background_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &background_shader,
                entry_point: "vs_main",
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &background_shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        Self {
            viewport,
            box_pipeline,
            vertex_buffer,
            num_vertices: vertices.len() as u32,
            instance_buffer,
            num_instances: 0,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            depth_texture,
            depth_view,
            background_pipeline,
        }
    }

    /// Follows the widget to a new area and the target to a new size.
    pub(crate) fn resize(&mut self, device: &Device, viewport: Rectangle<f32>, target_size: Size<u32>) {
        self.viewport = viewport;

        let current = self.depth_texture.size();
        if target_size.width > 0
            && target_size.height > 0
            && (current.width != target_size.width || current.height != target_size.height)
        {
            log::debug!(
                "resizing depth buffer to {}x{}",
                target_size.width,
                target_size.height
            );
            (self.depth_texture, self.depth_view) = create_depth_texture(device, target_size);
        }
    }

    pub(crate) fn update_camera(&mut self, queue: &Queue, camera: &Camera, projection: &Projection) {
        self.camera_uniform.update_view_proj(camera, projection);
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
    }

    /// Uploads the boxes to draw this frame. Extra instances beyond the
    /// buffer's capacity are dropped.
    pub(crate) fn update_instances(&mut self, queue: &Queue, instances: &[Instance]) {
        let raw: Vec<InstanceRaw> = instances
            .iter()
            .take(MAX_INSTANCES)
            .map(InstanceRaw::from)
            .collect();
        self.num_instances = raw.len() as u32;
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&raw));
    }

    /// Records the background and box passes.
    ///
    /// # Arguments
    /// * `clip_bounds` - Visible part of the widget, in physical pixels
    pub(crate) fn render(
        &self,
        encoder: &mut CommandEncoder,
        target: &TextureView,
        clip_bounds: &Rectangle<u32>,
    ) {
        if clip_bounds.width == 0 || clip_bounds.height == 0 {
            return;
        }

        {
            let mut background_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Background Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // the rest of the target belongs to the UI
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.restrict_to_viewport(&mut background_pass, clip_bounds);
            background_pass.set_pipeline(&self.background_pipeline);
            background_pass.draw(0..3, 0..1);
        }

        {
            let mut box_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Box Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.restrict_to_viewport(&mut box_pass, clip_bounds);
            box_pass.set_pipeline(&self.box_pipeline);
            box_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            box_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            box_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            box_pass.draw(0..self.num_vertices, 0..self.num_instances);
        }
    }

    fn restrict_to_viewport(&self, pass: &mut wgpu::RenderPass<'_>, clip_bounds: &Rectangle<u32>) {
        pass.set_viewport(
            self.viewport.x,
            self.viewport.y,
            self.viewport.width,
            self.viewport.height,
            0.0,
            1.0,
        );
        pass.set_scissor_rect(
            clip_bounds.x,
            clip_bounds.y,
            clip_bounds.width,
            clip_bounds.height,
        );
    }
}
