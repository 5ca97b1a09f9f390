//! GPU resource wrappers
//!
//! Buffers are allocated once with a fixed capacity and updated by
//! sub-range for the rest of the process lifetime; creation is wrapped in
//! validation error scopes so faults surface as [`RenderError`] values.
//! Release is RAII on drop, on every exit path.

use crate::batch::Vertex;
use crate::RenderError;

/// Fixed-capacity, CPU-writable GPU buffer.
pub struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
}

impl DynamicBuffer {
    fn new(
        device: &wgpu::Device,
        label: &str,
        capacity: u64,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, capacity }
    }

    pub fn vertex(device: &wgpu::Device, label: &str, capacity: u64) -> Self {
        Self::new(device, label, capacity, wgpu::BufferUsages::VERTEX)
    }

    pub fn index(device: &wgpu::Device, label: &str, capacity: u64) -> Self {
        Self::new(device, label, capacity, wgpu::BufferUsages::INDEX)
    }

    pub fn uniform(device: &wgpu::Device, label: &str, capacity: u64) -> Self {
        Self::new(device, label, capacity, wgpu::BufferUsages::UNIFORM)
    }

    /// Sub-range update. The write is enqueued only after the range check
    /// passes; an out-of-range request is an error, never undefined
    /// behavior at the API boundary.
    pub fn write(&self, queue: &wgpu::Queue, offset: u64, data: &[u8]) -> Result<(), RenderError> {
        check_range(offset, data.len() as u64, self.capacity)?;
        queue.write_buffer(&self.buffer, offset, data);
        Ok(())
    }

    pub fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

/// Invariant for every sub-range update: `offset + len <= capacity`.
pub fn check_range(offset: u64, len: u64, capacity: u64) -> Result<(), RenderError> {
    match offset.checked_add(len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(RenderError::BufferOverflow {
            offset,
            len,
            capacity,
        }),
    }
}

/// Compile the scene's WGSL module (vertex + fragment entry points) under a
/// validation error scope, so a compile failure comes back as a typed error
/// carrying the driver message.
pub fn create_shader(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(RenderError::Shader(err.to_string()));
    }
    Ok(module)
}

/// One pipeline per primitive topology, sharing the shader module, the
/// camera bind group layout, and the single two-attribute vertex layout.
pub struct PipelineSet {
    pub triangles: wgpu::RenderPipeline,
    pub lines: wgpu::RenderPipeline,
    pub line_strip: wgpu::RenderPipeline,
    pub camera_layout: wgpu::BindGroupLayout,
}

impl PipelineSet {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        shader: &wgpu::ShaderModule,
    ) -> Result<Self, RenderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_layout],
            push_constant_ranges: &[],
        });

        let build = |label: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
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
                cache: None,
            })
        };

        let triangles = build("Disk Pipeline", wgpu::PrimitiveTopology::TriangleList);
        let lines = build("Arm Pipeline", wgpu::PrimitiveTopology::LineList);
        let line_strip = build("Trail Pipeline", wgpu::PrimitiveTopology::LineStrip);

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ResourceCreation(err.to_string()));
        }

        Ok(Self {
            triangles,
            lines,
            line_strip,
            camera_layout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check_accepts_exact_fit() {
        assert!(check_range(0, 64, 64).is_ok());
        assert!(check_range(60, 4, 64).is_ok());
        assert!(check_range(64, 0, 64).is_ok());
    }

    #[test]
    fn range_check_rejects_overflow() {
        assert!(matches!(
            check_range(0, 65, 64),
            Err(RenderError::BufferOverflow { .. })
        ));
        assert!(matches!(
            check_range(61, 4, 64),
            Err(RenderError::BufferOverflow { .. })
        ));
        // offset + len wrapping around u64 must not pass
        assert!(check_range(u64::MAX, 2, u64::MAX).is_err());
    }
}
