//! Lyon tessellation backend.
//!
//! Turns every surface call into triangles in a flat `f32` buffer (triangle
//! list, `MeshVertex::FLOATS` per vertex) for a GPU host to upload. Clipped
//! image draws become the outline's fill with UVs into the source image;
//! plain fills and strokes carry `NO_TEXTURE` UVs. Dash patterns and shadows
//! are not supported and are ignored.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};
use crate::api::config::Viewport;
use crate::assets::catalog::ImageSize;
use crate::core::rect::Rect;
use crate::systems::outline::OutlinePath;
use super::traits::{Color, DrawSurface, StrokeStyle};

const TOLERANCE: f32 = 0.25;

/// UV marker for vertices that must not sample the image.
pub const NO_TEXTURE: f32 = -1.0;

/// Per-vertex data: position, image UV, color multiplier.
/// 8 floats = 32 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl MeshVertex {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn is_textured(&self) -> bool {
        self.u != NO_TEXTURE
    }
}

/// Maps a local path point to a surface position and, optionally, image UVs.
#[derive(Clone, Copy)]
struct VertexCtor {
    offset: Vec2,
    color: Color,
    texture: Option<TextureMap>,
}

#[derive(Clone, Copy)]
struct TextureMap {
    src: Rect,
    dst: Rect,
    image: ImageSize,
}

impl VertexCtor {
    fn vertex(&self, local: Vec2) -> MeshVertex {
        let (u, v) = match self.texture {
            Some(map) => {
                let t = (local - map.dst.min()) / map.dst.size();
                let texel = map.src.min() + t * map.src.size();
                (texel.x / map.image.width, texel.y / map.image.height)
            }
            None => (NO_TEXTURE, NO_TEXTURE),
        };
        let pos = local + self.offset;
        MeshVertex {
            x: pos.x,
            y: pos.y,
            u,
            v,
            r: self.color.r,
            g: self.color.g,
            b: self.color.b,
            a: self.color.a,
        }
    }
}

impl FillVertexConstructor<MeshVertex> for VertexCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> MeshVertex {
        let p = vertex.position();
        self.vertex(Vec2::new(p.x, p.y))
    }
}

impl StrokeVertexConstructor<MeshVertex> for VertexCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> MeshVertex {
        let p = vertex.position();
        self.vertex(Vec2::new(p.x, p.y))
    }
}

/// Tessellating `DrawSurface`.
pub struct MeshSurface {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<MeshVertex, u32>,
    buffer: Vec<f32>,
    image: Option<ImageSize>,
}

impl MeshSurface {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(4096 * MeshVertex::FLOATS),
            image: None,
        }
    }

    /// Set (or forget) the decoded source image that UVs refer to.
    pub fn set_image(&mut self, image: Option<ImageSize>) {
        self.image = image.filter(|size| !size.is_empty());
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / MeshVertex::FLOATS
    }

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        bytemuck::cast_slice(&self.buffer)
    }

    /// Flush indexed geometry to the flat buffer as a triangle list.
    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer.extend_from_slice(bytemuck::cast_slice(std::slice::from_ref(v)));
        }
        self.discard_geometry();
    }

    fn discard_geometry(&mut self) {
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    fn fill(&mut self, path: &OutlinePath, ctor: VertexCtor) {
        let result = self.fill_tess.tessellate_path(
            path.path(),
            &FillOptions::tolerance(TOLERANCE),
            &mut BuffersBuilder::new(&mut self.geometry, ctor),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(err) => {
                log::warn!("fill tessellation failed: {:?}", err);
                self.discard_geometry();
            }
        }
    }
}

impl Default for MeshSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSurface for MeshSurface {
    fn image_ready(&self) -> bool {
        self.image.is_some()
    }

    fn clear(&mut self, _viewport: Viewport) {
        self.buffer.clear();
    }

    fn draw_clipped_image(&mut self, path: &OutlinePath, offset: Vec2, src: Rect, dst: Rect) {
        let Some(image) = self.image else {
            return;
        };
        self.fill(
            path,
            VertexCtor {
                offset,
                color: Color::WHITE,
                texture: Some(TextureMap { src, dst, image }),
            },
        );
    }

    fn stroke_path(&mut self, path: &OutlinePath, offset: Vec2, style: &StrokeStyle) {
        let ctor = VertexCtor {
            offset,
            color: style.color,
            texture: None,
        };
        let result = self.stroke_tess.tessellate_path(
            path.path(),
            &StrokeOptions::tolerance(TOLERANCE).with_line_width(style.width),
            &mut BuffersBuilder::new(&mut self.geometry, ctor),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(err) => {
                log::warn!("stroke tessellation failed: {:?}", err);
                self.discard_geometry();
            }
        }
    }

    fn fill_path(&mut self, path: &OutlinePath, offset: Vec2, color: Color) {
        self.fill(path, VertexCtor { offset, color, texture: None });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn mesh_vertex_is_32_bytes() {
        assert_eq!(size_of::<MeshVertex>(), 32);
        assert_eq!(MeshVertex::STRIDE_BYTES, 32);
    }

    #[test]
    fn fill_rect_is_two_triangles() {
        let mut mesh = MeshSurface::new();
        let outline = OutlinePath::rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        mesh.fill_path(&outline, Vec2::new(100.0, 50.0), Color::WHITE);

        assert_eq!(mesh.vertex_count(), 6);
        for v in mesh.vertices() {
            assert!(!v.is_textured());
            assert!(v.x >= 100.0 && v.x <= 110.0);
            assert!(v.y >= 50.0 && v.y <= 60.0);
        }
    }

    #[test]
    fn clipped_image_maps_uvs() {
        let mut mesh = MeshSurface::new();
        mesh.set_image(Some(ImageSize::new(200.0, 100.0)));
        let outline = OutlinePath::rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        // Local (0,0)-(10,10) samples image pixels (100,50)-(200,100).
        let dst = Rect::new(0.0, 0.0, 10.0, 10.0);
        let src = Rect::new(100.0, 50.0, 100.0, 50.0);
        mesh.draw_clipped_image(&outline, Vec2::ZERO, src, dst);

        assert!(mesh.vertex_count() > 0);
        for v in mesh.vertices() {
            assert!(v.is_textured());
            assert!(v.u >= 0.5 - 1e-5 && v.u <= 1.0 + 1e-5);
            assert!(v.v >= 0.5 - 1e-5 && v.v <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn image_draw_without_image_is_skipped() {
        let mut mesh = MeshSurface::new();
        let outline = OutlinePath::rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        mesh.draw_clipped_image(&outline, Vec2::ZERO, r, r);
        assert_eq!(mesh.vertex_count(), 0);
        assert!(!mesh.image_ready());
    }
}
