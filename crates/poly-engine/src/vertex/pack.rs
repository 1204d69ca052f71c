use super::{ColorFormat, Vertex, VertexFlags};

/// Writes `vertex` into `out` using the layout described by `flags`.
///
/// `out` must be exactly `flags.stride()` bytes. Floats and extra blocks are
/// written in native byte order, matching what GPU vertex fetch expects on
/// the host.
pub fn pack_vertex(flags: VertexFlags, vertex: &Vertex, out: &mut [u8]) {
    debug_assert_eq!(out.len(), flags.stride() as usize, "vertex slot does not match stride");

    let mut w = Writer { out, at: 0 };

    if flags.is_3d() {
        w.put(bytemuck::cast_slice(&vertex.pos.to_array()));
    } else {
        w.put(bytemuck::cast_slice(&[vertex.pos.x, vertex.pos.y]));
    }

    if flags.has_normals() {
        if flags.is_3d() {
            w.put(bytemuck::cast_slice(&vertex.norm.to_array()));
        } else {
            w.put(bytemuck::cast_slice(&[vertex.norm.x, vertex.norm.y]));
        }
    }

    if flags.has_texture() {
        w.put(bytemuck::cast_slice(&[vertex.uv.x, vertex.uv.y]));
    }

    let c = vertex.color;
    match flags.color_format() {
        ColorFormat::None | ColorFormat::Reserved(_) => {}
        ColorFormat::Rgba2 => {
            let [r, g, b, a] = c.quantize(2);
            w.put(&[((r << 6) | (g << 4) | (b << 2) | a) as u8]);
        }
        ColorFormat::Rgba4 => {
            let [r, g, b, a] = c.quantize(4);
            w.put(bytemuck::bytes_of(&((r << 12) | (g << 8) | (b << 4) | a)));
        }
        ColorFormat::Rgb8 => {
            let [r, g, b, _] = c.quantize(8);
            w.put(&[r as u8, g as u8, b as u8]);
        }
        ColorFormat::Rgba8 => {
            let [r, g, b, a] = c.quantize(8);
            w.put(&[r as u8, g as u8, b as u8, a as u8]);
        }
        ColorFormat::Rgb16 => {
            let [r, g, b, _] = c.quantize(16);
            w.put(bytemuck::cast_slice(&[r, g, b]));
        }
        ColorFormat::Rgba16 => {
            w.put(bytemuck::cast_slice(&c.quantize(16)));
        }
        ColorFormat::RgbF32 => {
            w.put(bytemuck::cast_slice(&[c.r, c.g, c.b]));
        }
        ColorFormat::RgbaF32 => {
            w.put(bytemuck::cast_slice(&c.to_array()));
        }
    }

    let blocks = flags.extra_blocks() as usize;
    w.put(bytemuck::cast_slice(&vertex.extra[..blocks]));
}

struct Writer<'a> {
    out: &'a mut [u8],
    at: usize,
}

impl Writer<'_> {
    #[inline]
    fn put(&mut self, bytes: &[u8]) {
        let end = self.at + bytes.len();
        self.out[self.at..end].copy_from_slice(bytes);
        self.at = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{ColorRgba, Vec2, Vec3};

    fn sample() -> Vertex {
        Vertex {
            pos: Vec3::new(1.0, 2.0, 3.0),
            norm: Vec3::new(0.0, 0.0, -1.0),
            uv: Vec2::new(0.25, 0.75),
            color: ColorRgba::new(1.0, 0.0, 1.0, 1.0),
            extra: [10, 20, 30, 40, 50, 60, 70, 80],
        }
    }

    fn pack(flags: VertexFlags) -> Vec<u8> {
        let mut out = vec![0u8; flags.stride() as usize];
        pack_vertex(flags, &sample(), &mut out);
        out
    }

    fn f32_at(bytes: &[u8], offset: u32) -> f32 {
        let o = offset as usize;
        f32::from_ne_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]])
    }

    #[test]
    fn position_2d_drops_z() {
        let out = pack(VertexFlags::POS_2D);
        assert_eq!(out.len(), 8);
        assert_eq!(f32_at(&out, 0), 1.0);
        assert_eq!(f32_at(&out, 4), 2.0);
    }

    #[test]
    fn attributes_land_at_codec_offsets() {
        let flags = VertexFlags::POS_3D | VertexFlags::NORMS | VertexFlags::HAS_TEX | VertexFlags::COL_FA;
        let out = pack(flags);
        assert_eq!(f32_at(&out, flags.position_offset() + 8), 3.0);
        assert_eq!(f32_at(&out, flags.normal_offset() + 8), -1.0);
        assert_eq!(f32_at(&out, flags.uv_offset()), 0.25);
        assert_eq!(f32_at(&out, flags.uv_offset() + 4), 0.75);
        assert_eq!(f32_at(&out, flags.color_offset() + 8), 1.0);
    }

    #[test]
    fn rgba8_color_is_quantized() {
        let flags = VertexFlags::COL_32;
        let out = pack(flags);
        let o = flags.color_offset() as usize;
        assert_eq!(&out[o..o + 4], &[255, 0, 255, 255]);
    }

    #[test]
    fn rgba2_color_packs_into_one_byte() {
        let flags = VertexFlags::COL_8;
        let out = pack(flags);
        assert_eq!(out.len(), 9);
        assert_eq!(out[8], 0b11_00_11_11);
    }

    #[test]
    fn extra_blocks_are_truncated() {
        let flags = VertexFlags::EX_96;
        let out = pack(flags);
        let o = flags.extra_offset() as usize;
        // Output bytes are not necessarily u32-aligned; compare as bytes.
        let expected: &[u8] = bytemuck::cast_slice(&[10u32, 20, 30]);
        assert_eq!(&out[o..], expected);
    }

    #[test]
    fn every_color_format_fills_its_slot() {
        for code in 0u16..16 {
            let flags = VertexFlags(code << 3) | VertexFlags::EX_256;
            let out = pack(flags);
            assert_eq!(out.len(), flags.stride() as usize);
        }
    }
}
