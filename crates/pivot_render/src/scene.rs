//! Scene renderer
//!
//! Owns the pipelines, the fixed-capacity geometry buffers and the
//! transient batch, and turns pendulum geometry into draw calls. Buffers
//! are allocated once here and only ever updated by sub-range afterwards.
//!
//! All of a frame's `write_buffer` calls land before the frame's single
//! submit, so two uploads to the same range would alias and only the last
//! would be visible to every draw. Each primitive therefore uploads at the
//! frame's write cursor inside the same fixed buffers; the cursor resets
//! in [`SceneRenderer::begin_pass`] and running it past capacity is a
//! [`RenderError::BufferOverflow`].

use crate::batch::{
    GeometryBatch, TrailBuffer, Vertex, MAX_BATCH_INDICES, MAX_BATCH_VERTICES, MAX_TRAIL_VERTICES,
};
use crate::camera::CameraUniform;
use crate::resources::{create_shader, DynamicBuffer, PipelineSet};
use crate::RenderError;
use glam::Vec2;

const SHADER_SOURCE: &str = include_str!("../shaders/pendulum.wgsl");

enum ShapeTopology {
    Triangles,
    Lines,
}

pub struct SceneRenderer {
    pipelines: PipelineSet,
    camera_buffer: DynamicBuffer,
    camera_bind_group: wgpu::BindGroup,
    shape_vertices: DynamicBuffer,
    shape_indices: DynamicBuffer,
    trail_vertices: DynamicBuffer,
    batch: GeometryBatch,
    trail: TrailBuffer,
    vertex_cursor: u64,
    index_cursor: u64,
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<Self, RenderError> {
        let shader = create_shader(device, "Pendulum Shader", SHADER_SOURCE)?;
        let pipelines = PipelineSet::new(device, format, &shader)?;

        let camera_buffer = DynamicBuffer::uniform(
            device,
            "Camera Buffer",
            std::mem::size_of::<CameraUniform>() as u64,
        );
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &pipelines.camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.raw().as_entire_binding(),
            }],
        });

        let shape_vertices = DynamicBuffer::vertex(
            device,
            "Shape Vertex Buffer",
            MAX_BATCH_VERTICES as u64 * Vertex::SIZE,
        );
        let shape_indices = DynamicBuffer::index(
            device,
            "Shape Index Buffer",
            MAX_BATCH_INDICES as u64 * std::mem::size_of::<u32>() as u64,
        );
        let trail_vertices = DynamicBuffer::vertex(
            device,
            "Trail Vertex Buffer",
            MAX_TRAIL_VERTICES as u64 * Vertex::SIZE,
        );

        Ok(Self {
            pipelines,
            camera_buffer,
            camera_bind_group,
            shape_vertices,
            shape_indices,
            trail_vertices,
            batch: GeometryBatch::new(),
            trail: TrailBuffer::new(),
            vertex_cursor: 0,
            index_cursor: 0,
        })
    }

    pub fn trail_mut(&mut self) -> &mut TrailBuffer {
        &mut self.trail
    }

    /// Upload this frame's camera matrix.
    pub fn upload_camera(
        &self,
        queue: &wgpu::Queue,
        uniform: CameraUniform,
    ) -> Result<(), RenderError> {
        self.camera_buffer.write(queue, 0, bytemuck::bytes_of(&uniform))
    }

    /// Begin the frame's scene pass: clear to the background color, bind
    /// the camera, reset the geometry write cursor. The returned pass must
    /// be dropped before the encoder is finished.
    pub fn begin_pass(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        clear: wgpu::Color,
    ) -> wgpu::RenderPass<'static> {
        self.vertex_cursor = 0;
        self.index_cursor = 0;

        let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        let mut pass = pass.forget_lifetime();
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass
    }

    /// Filled disk at `center`.
    pub fn draw_polygon(
        &mut self,
        queue: &wgpu::Queue,
        pass: &mut wgpu::RenderPass<'static>,
        center: Vec2,
        color: [f32; 3],
        radius: f32,
        sides: u32,
    ) -> Result<(), RenderError> {
        self.batch.build_polygon(center, color, radius, sides);
        self.submit_batch(queue, pass, ShapeTopology::Triangles)
    }

    /// Line segment from `p1` to `p2`.
    pub fn draw_line_segment(
        &mut self,
        queue: &wgpu::Queue,
        pass: &mut wgpu::RenderPass<'static>,
        p1: Vec2,
        p2: Vec2,
        color: [f32; 3],
    ) -> Result<(), RenderError> {
        self.batch.build_line_segment(p1, p2, color);
        self.submit_batch(queue, pass, ShapeTopology::Lines)
    }

    /// Append a trail point and draw the whole retained strip.
    pub fn draw_trail(
        &mut self,
        queue: &wgpu::Queue,
        pass: &mut wgpu::RenderPass<'static>,
        point: Vec2,
        color: [f32; 3],
    ) -> Result<(), RenderError> {
        self.trail.push(point, color);

        let (front, back) = self.trail.as_slices();
        let front_bytes: &[u8] = bytemuck::cast_slice(front);
        self.trail_vertices.write(queue, 0, front_bytes)?;
        if !back.is_empty() {
            self.trail_vertices
                .write(queue, front_bytes.len() as u64, bytemuck::cast_slice(back))?;
        }

        pass.set_pipeline(&self.pipelines.line_strip);
        pass.set_vertex_buffer(0, self.trail_vertices.raw().slice(..));
        pass.draw(0..self.trail.len() as u32, 0..1);
        Ok(())
    }

    /// Upload the staged batch at the frame cursor and encode its draw.
    fn submit_batch(
        &mut self,
        queue: &wgpu::Queue,
        pass: &mut wgpu::RenderPass<'static>,
        topology: ShapeTopology,
    ) -> Result<(), RenderError> {
        // draw must consume exactly what this upload writes
        debug_assert!({
            let count = self.batch.vertices.len() as u32;
            self.batch.indices.iter().all(|&i| i < count)
        });

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&self.batch.vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(&self.batch.indices);

        let vertex_start = self.vertex_cursor;
        let index_start = self.index_cursor;
        self.shape_vertices.write(queue, vertex_start, vertex_bytes)?;
        self.shape_indices.write(queue, index_start, index_bytes)?;
        self.vertex_cursor += vertex_bytes.len() as u64;
        self.index_cursor += index_bytes.len() as u64;

        let pipeline = match topology {
            ShapeTopology::Triangles => &self.pipelines.triangles,
            ShapeTopology::Lines => &self.pipelines.lines,
        };
        pass.set_pipeline(pipeline);
        pass.set_vertex_buffer(
            0,
            self.shape_vertices.raw().slice(vertex_start..self.vertex_cursor),
        );
        pass.set_index_buffer(
            self.shape_indices.raw().slice(index_start..self.index_cursor),
            wgpu::IndexFormat::Uint32,
        );
        pass.draw_indexed(0..self.batch.indices.len() as u32, 0, 0..1);
        Ok(())
    }
}
