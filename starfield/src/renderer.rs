//! Rendering system for the starfield

use std::path::Path;

use common::{
    create_dynamic_vertex_buffer, create_static_vertex_buffer, create_uniform_buffer, CameraUniform,
    EyeCamera, GraphicsContext,
};
use starfield::trail::{TrailBuffer, LINE_STRIDE, POINT_STRIDE};

const STAR_ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
];

/// Popup quad vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OverlayVertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
}

impl OverlayVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x2,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

// Banner floating 4 units ahead of the starting view, relative to the eye
const OVERLAY_VERTICES: &[OverlayVertex] = &[
    OverlayVertex { position: [-0.7, -0.07, -4.0], texcoord: [0.0, 1.0] },
    OverlayVertex { position: [-0.7, 0.07, -4.0], texcoord: [0.0, 0.0] },
    OverlayVertex { position: [0.7, -0.07, -4.0], texcoord: [1.0, 1.0] },
    OverlayVertex { position: [0.7, 0.07, -4.0], texcoord: [1.0, 0.0] },
];

const POPUP_IMAGE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/popup.png");
const POPUP_WIDTH: u32 = 512;
const POPUP_HEIGHT: u32 = 52;

const ADDITIVE_BLENDING: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

pub struct Renderer {
    trail_pipeline: wgpu::RenderPipeline,
    star_pipeline: wgpu::RenderPipeline,
    overlay_pipeline: wgpu::RenderPipeline,
    star_buffer: wgpu::Buffer,
    overlay_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    popup_bind_group: wgpu::BindGroup,
    num_stars: u32,
}

impl Renderer {
    pub fn new(ctx: &GraphicsContext, camera: &EyeCamera, num_stars: usize) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Starfield Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/starfield.wgsl").into()),
        });

        let camera_buffer = create_uniform_buffer(device, &CameraUniform::from_eye_camera(camera));

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
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
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let popup_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Popup Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let popup_view = Self::create_popup_texture(ctx);
        let popup_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Popup Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let popup_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Popup Bind Group"),
            layout: &popup_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&popup_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&popup_sampler),
                },
            ],
        });

        let star_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Star Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let overlay_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Overlay Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &popup_bind_group_layout],
            push_constant_ranges: &[],
        });

        // Lines read every 6-float sample, so each star's two slots form a segment
        let trail_pipeline = Self::create_star_pipeline(
            ctx,
            &star_layout,
            &shader,
            "Trail Pipeline",
            "vs_trail",
            LINE_STRIDE,
            wgpu::PrimitiveTopology::LineList,
        );

        // Points step a whole star at a time, starting at the fresh slot
        let star_pipeline = Self::create_star_pipeline(
            ctx,
            &star_layout,
            &shader,
            "Star Pipeline",
            "vs_star",
            POINT_STRIDE,
            wgpu::PrimitiveTopology::PointList,
        );

        let overlay_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Overlay Pipeline"),
            layout: Some(&overlay_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_overlay",
                buffers: &[OverlayVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_overlay",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let star_buffer = create_dynamic_vertex_buffer(
            device,
            "Star Buffer",
            (num_stars * starfield::constants::FLOATS_PER_STAR * std::mem::size_of::<f32>()) as u64,
        );
        let overlay_buffer = create_static_vertex_buffer(device, "Overlay Buffer", OVERLAY_VERTICES);

        Self {
            trail_pipeline,
            star_pipeline,
            overlay_pipeline,
            star_buffer,
            overlay_buffer,
            camera_buffer,
            camera_bind_group,
            popup_bind_group,
            num_stars: num_stars as u32,
        }
    }

    fn create_star_pipeline(
        ctx: &GraphicsContext,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        label: &str,
        entry_point: &str,
        stride: u64,
        topology: wgpu::PrimitiveTopology,
    ) -> wgpu::RenderPipeline {
        ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point,
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: stride,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &STAR_ATTRIBS,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_star",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(ADDITIVE_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        })
    }

    fn create_popup_texture(ctx: &GraphicsContext) -> wgpu::TextureView {
        let (width, height, pixels) = match image::open(Path::new(POPUP_IMAGE)) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (w, h) = rgba.dimensions();
                (w, h, rgba.into_raw())
            }
            Err(err) => {
                log::warn!("popup image {} unavailable ({}), using generated banner", POPUP_IMAGE, err);
                (POPUP_WIDTH, POPUP_HEIGHT, banner_pixels(POPUP_WIDTH, POPUP_HEIGHT))
            }
        };

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Popup Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &EyeCamera) {
        let uniform = CameraUniform::from_eye_camera(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Copy the packed trail buffer to the GPU
    pub fn upload_trail(&self, queue: &wgpu::Queue, trail: &TrailBuffer) {
        queue.write_buffer(&self.star_buffer, 0, bytemuck::cast_slice(trail.as_slice()));
    }

    /// Popup, then trail lines, then star points. Reads the trail only.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        trail: &TrailBuffer,
        show_trails: bool,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Starfield Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.overlay_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.popup_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.overlay_buffer.slice(..));
        render_pass.draw(0..OVERLAY_VERTICES.len() as u32, 0..1);

        if self.num_stars == 0 {
            return;
        }

        if show_trails {
            render_pass.set_pipeline(&self.trail_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.star_buffer.slice(..));
            render_pass.draw(0..trail.line_vertex_count(), 0..1);
        }

        render_pass.set_pipeline(&self.star_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.star_buffer.slice(trail.point_offset()..));
        render_pass.draw(0..self.num_stars, 0..1);
    }
}

/// Soft-edged translucent banner used when no popup image is shipped
fn banner_pixels(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let u = (x as f32 + 0.5) / width as f32 * 2.0 - 1.0;
            let v = (y as f32 + 0.5) / height as f32 * 2.0 - 1.0;
            let edge = (1.0 - u.abs().powi(8)) * (1.0 - v.abs().powi(4));
            let glow = edge.clamp(0.0, 1.0);
            pixels.extend_from_slice(&[
                (40.0 + 60.0 * glow) as u8,
                (60.0 + 90.0 * glow) as u8,
                (120.0 + 135.0 * glow) as u8,
                (170.0 * glow) as u8,
            ]);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_is_rgba_sized() {
        let pixels = banner_pixels(16, 4);
        assert_eq!(pixels.len(), 16 * 4 * 4);
    }

    #[test]
    fn banner_fades_at_the_edges() {
        let (w, h) = (64, 16);
        let pixels = banner_pixels(w, h);
        let alpha = |x: u32, y: u32| pixels[((y * w + x) * 4 + 3) as usize];

        assert!(alpha(w / 2, h / 2) > alpha(0, h / 2));
        assert!(alpha(w / 2, h / 2) > alpha(w / 2, 0));
    }

    #[test]
    fn overlay_quad_is_a_strip() {
        assert_eq!(OVERLAY_VERTICES.len(), 4);
        assert!(OVERLAY_VERTICES.iter().all(|v| v.position[2] == -4.0));
    }
}
