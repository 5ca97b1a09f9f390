//! Transient geometry batching
//!
//! CPU-side vertex/index staging for the three primitive kinds the scene
//! draws: filled regular polygons, line segments, and the trail strip.
//! Build operations rewrite the batch from scratch; upload and draw happen
//! in [`crate::scene`].

use glam::Vec2;
use std::collections::VecDeque;
use std::f32::consts::TAU;

/// Shape batch capacity, in vertices. Matches the GPU buffer allocation.
pub const MAX_BATCH_VERTICES: usize = 256;
/// Shape batch capacity, in indices.
pub const MAX_BATCH_INDICES: usize = MAX_BATCH_VERTICES * 8;
/// Retained trail capacity, in points.
pub const MAX_TRAIL_VERTICES: usize = u16::MAX as usize;

/// GPU wire format: position then color, 20-byte stride.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl Vertex {
    pub const SIZE: u64 = std::mem::size_of::<Vertex>() as u64;

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Ordered vertex/index staging for one primitive at a time.
///
/// Every build operation clears both sequences first; the batch never
/// accumulates more than one primitive.
pub struct GeometryBatch {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl GeometryBatch {
    pub fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(MAX_BATCH_VERTICES),
            indices: Vec::with_capacity(MAX_BATCH_INDICES),
        }
    }

    /// Filled regular polygon as a closed triangle fan: one center vertex,
    /// `sides` perimeter vertices (vertex `i` at angle `i·2π/sides`), and
    /// `sides` triangles `(0, i+1, i+2)` with the final index bent back to
    /// the first perimeter vertex to close the disk.
    ///
    /// `sides == 0` degenerates to a single center vertex and no indices.
    pub fn build_polygon(&mut self, center: Vec2, color: [f32; 3], radius: f32, sides: u32) {
        debug_assert!(sides as usize + 1 <= MAX_BATCH_VERTICES);

        self.vertices.clear();
        self.indices.clear();

        self.vertices.push(Vertex {
            position: center.to_array(),
            color,
        });

        let angle = TAU / sides as f32;
        for i in 0..sides {
            let dir = Vec2::new((i as f32 * angle).cos(), (i as f32 * angle).sin());
            let pos = center + radius * dir;
            self.vertices.push(Vertex {
                position: pos.to_array(),
                color,
            });
            self.indices.extend_from_slice(&[0, i + 1, i + 2]);
        }

        // connect the last triangle back to the first vertex on the circle
        if sides > 0 {
            let first_perimeter = self.indices[1];
            let last = self.indices.len() - 1;
            self.indices[last] = first_perimeter;
        }
    }

    /// Line segment between two world-space points, two vertices in
    /// argument order.
    ///
    /// Emits exactly two indices; an index count larger than the written
    /// vertex range would read stale buffer contents and is a validation
    /// error under wgpu.
    pub fn build_line_segment(&mut self, p1: Vec2, p2: Vec2, color: [f32; 3]) {
        self.vertices.clear();
        self.indices.clear();

        self.vertices.push(Vertex {
            position: p1.to_array(),
            color,
        });
        self.vertices.push(Vertex {
            position: p2.to_array(),
            color,
        });
        self.indices.extend_from_slice(&[0, 1]);
    }
}

impl Default for GeometryBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Capacity-bounded FIFO of trail points, drawn as a connected line strip.
///
/// Appending at capacity evicts the oldest point first.
pub struct TrailBuffer {
    points: VecDeque<Vertex>,
    capacity: usize,
}

impl TrailBuffer {
    pub fn new() -> Self {
        Self::with_capacity(MAX_TRAIL_VERTICES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: Vec2, color: [f32; 3]) {
        if self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(Vertex {
            position: point.to_array(),
            color,
        });
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Retained points in append order, as the two contiguous runs of the
    /// backing ring.
    pub fn as_slices(&self) -> (&[Vertex], &[Vertex]) {
        self.points.as_slices()
    }
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

    #[test]
    fn vertex_is_twenty_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
        assert_eq!(Vertex::SIZE, 20);
    }

    #[test]
    fn polygon_fan_counts_and_closure() {
        let mut batch = GeometryBatch::new();
        for sides in [3u32, 5, 32] {
            batch.build_polygon(Vec2::ZERO, WHITE, 1.0, sides);
            assert_eq!(batch.vertices.len(), sides as usize + 1);
            assert_eq!(batch.indices.len(), sides as usize * 3);
            // the fan closes: final index equals the first perimeter index
            assert_eq!(*batch.indices.last().unwrap(), batch.indices[1]);
        }
    }

    #[test]
    fn polygon_perimeter_lies_on_radius() {
        let mut batch = GeometryBatch::new();
        let center = Vec2::new(2.0, -1.0);
        batch.build_polygon(center, WHITE, 3.0, 8);
        for v in &batch.vertices[1..] {
            let d = (Vec2::from_array(v.position) - center).length();
            assert!((d - 3.0).abs() < 1e-4);
        }
        // first perimeter vertex sits at angle 0
        assert!((batch.vertices[1].position[0] - (center.x + 3.0)).abs() < 1e-5);
        assert!((batch.vertices[1].position[1] - center.y).abs() < 1e-5);
    }

    #[test]
    fn polygon_indices_reference_written_vertices() {
        let mut batch = GeometryBatch::new();
        batch.build_polygon(Vec2::ZERO, WHITE, 1.0, 32);
        let count = batch.vertices.len() as u32;
        assert!(batch.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn degenerate_polygon_emits_center_only() {
        let mut batch = GeometryBatch::new();
        batch.build_polygon(Vec2::ZERO, WHITE, 1.0, 0);
        assert_eq!(batch.vertices.len(), 1);
        assert!(batch.indices.is_empty());
    }

    #[test]
    fn line_segment_vertices_in_order() {
        let mut batch = GeometryBatch::new();
        batch.build_line_segment(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), WHITE);
        assert_eq!(batch.vertices.len(), 2);
        assert_eq!(batch.vertices[0].position, [0.0, 0.0]);
        assert_eq!(batch.vertices[1].position, [1.0, 1.0]);
        assert_eq!(batch.indices, vec![0, 1]);
    }

    #[test]
    fn build_operations_reset_previous_contents() {
        let mut batch = GeometryBatch::new();
        batch.build_polygon(Vec2::ZERO, WHITE, 1.0, 32);
        batch.build_line_segment(Vec2::ZERO, Vec2::ONE, WHITE);
        assert_eq!(batch.vertices.len(), 2);
        assert_eq!(batch.indices.len(), 2);
    }

    #[test]
    fn trail_evicts_oldest_beyond_capacity() {
        let mut trail = TrailBuffer::with_capacity(4);
        for i in 0..6 {
            trail.push(Vec2::new(i as f32, 0.0), WHITE);
        }
        assert_eq!(trail.len(), 4);
        let (front, back) = trail.as_slices();
        let xs: Vec<f32> = front
            .iter()
            .chain(back.iter())
            .map(|v| v.position[0])
            .collect();
        // two over-capacity appends dropped points 0 and 1, order preserved
        assert_eq!(xs, vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn trail_never_exceeds_capacity() {
        let mut trail = TrailBuffer::with_capacity(16);
        for i in 0..1000 {
            trail.push(Vec2::new(i as f32, i as f32), WHITE);
            assert!(trail.len() <= 16);
        }
    }

    #[test]
    fn trail_clear_empties() {
        let mut trail = TrailBuffer::new();
        trail.push(Vec2::ONE, WHITE);
        trail.push(Vec2::ZERO, WHITE);
        trail.clear();
        assert!(trail.is_empty());
    }
}
