use crate::graphics::BackendError;
use crate::vertex::{ColorFormat, DrawMode, IndexWidth, VertexFlags};

/// Shader location of each attribute.
pub const POSITION_LOCATION: u32 = 0;
pub const NORMAL_LOCATION: u32 = 1;
pub const UV_LOCATION: u32 = 2;
pub const COLOR_LOCATION: u32 = 3;
/// Extra blocks use this location and the next one.
pub const EXTRA_LOCATION: u32 = 4;

fn unsupported(flags: VertexFlags, reason: &'static str) -> BackendError {
    BackendError::UnsupportedLayout { flags, reason }
}

fn float_vector(components: u32) -> wgpu::VertexFormat {
    match components {
        2 => wgpu::VertexFormat::Float32x2,
        _ => wgpu::VertexFormat::Float32x3,
    }
}

fn uint_vector(components: u32) -> wgpu::VertexFormat {
    match components {
        1 => wgpu::VertexFormat::Uint32,
        2 => wgpu::VertexFormat::Uint32x2,
        3 => wgpu::VertexFormat::Uint32x3,
        _ => wgpu::VertexFormat::Uint32x4,
    }
}

/// Maps a vertex layout to wgpu vertex attributes.
///
/// Positions and normals are `Float32x2`/`Float32x3`, UVs `Float32x2`. Color
/// formats wgpu can fetch directly are supported: 8-bit RGBA as `Unorm8x4`,
/// 16-bit RGBA as `Unorm16x4`, and the two float formats. Extra blocks are
/// exposed as up to two `Uint32` vectors (blocks 0–3, then 4–7).
pub fn vertex_attributes(flags: VertexFlags) -> Result<Vec<wgpu::VertexAttribute>, BackendError> {
    if flags.stride() % 4 != 0 {
        return Err(unsupported(flags, "stride is not a multiple of 4 bytes"));
    }

    let color = match flags.color_format() {
        ColorFormat::None => None,
        ColorFormat::Rgba8 => Some(wgpu::VertexFormat::Unorm8x4),
        ColorFormat::Rgba16 => Some(wgpu::VertexFormat::Unorm16x4),
        ColorFormat::RgbF32 => Some(wgpu::VertexFormat::Float32x3),
        ColorFormat::RgbaF32 => Some(wgpu::VertexFormat::Float32x4),
        ColorFormat::Rgba2 | ColorFormat::Rgba4 | ColorFormat::Rgb8 | ColorFormat::Rgb16 => {
            return Err(unsupported(flags, "color format has no matching vertex format"));
        }
        ColorFormat::Reserved(_) => return Err(unsupported(flags, "reserved color code")),
    };

    let components = if flags.is_3d() { 3 } else { 2 };
    let mut attrs = vec![wgpu::VertexAttribute {
        format: float_vector(components),
        offset: flags.position_offset() as u64,
        shader_location: POSITION_LOCATION,
    }];

    if flags.has_normals() {
        attrs.push(wgpu::VertexAttribute {
            format: float_vector(components),
            offset: flags.normal_offset() as u64,
            shader_location: NORMAL_LOCATION,
        });
    }

    if flags.has_texture() {
        attrs.push(wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: flags.uv_offset() as u64,
            shader_location: UV_LOCATION,
        });
    }

    if let Some(format) = color {
        attrs.push(wgpu::VertexAttribute {
            format,
            offset: flags.color_offset() as u64,
            shader_location: COLOR_LOCATION,
        });
    }

    let blocks = flags.extra_blocks();
    let mut block = 0;
    let mut location = EXTRA_LOCATION;
    while block < blocks {
        let chunk = (blocks - block).min(4);
        attrs.push(wgpu::VertexAttribute {
            format: uint_vector(chunk),
            offset: (flags.extra_offset() + block * 4) as u64,
            shader_location: location,
        });
        block += chunk;
        location += 1;
    }

    Ok(attrs)
}

pub fn topology(flags: VertexFlags) -> Result<wgpu::PrimitiveTopology, BackendError> {
    match flags.draw_mode() {
        DrawMode::Triangles => Ok(wgpu::PrimitiveTopology::TriangleList),
        DrawMode::Lines => Ok(wgpu::PrimitiveTopology::LineList),
        DrawMode::Points => Ok(wgpu::PrimitiveTopology::PointList),
        DrawMode::Reserved => Err(unsupported(flags, "reserved draw mode")),
    }
}

pub fn index_format(flags: VertexFlags) -> wgpu::IndexFormat {
    match flags.index_width() {
        IndexWidth::U16 => wgpu::IndexFormat::Uint16,
        IndexWidth::U32 => wgpu::IndexFormat::Uint32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locations(attrs: &[wgpu::VertexAttribute]) -> Vec<u32> {
        attrs.iter().map(|a| a.shader_location).collect()
    }

    // ── attributes ────────────────────────────────────────────────────────

    #[test]
    fn default_batch_layout() {
        let attrs = vertex_attributes(VertexFlags::COL_FA).unwrap();
        assert_eq!(locations(&attrs), vec![0, 3]);
        assert_eq!(attrs[0].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(attrs[1].format, wgpu::VertexFormat::Float32x4);
        assert_eq!(attrs[1].offset, 8);
    }

    #[test]
    fn offsets_follow_the_codec() {
        let flags = VertexFlags::POS_3D | VertexFlags::NORMS | VertexFlags::HAS_TEX | VertexFlags::COL_32;
        let attrs = vertex_attributes(flags).unwrap();
        assert_eq!(locations(&attrs), vec![0, 1, 2, 3]);
        let offsets: Vec<u64> = attrs.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24, 32]);
        assert_eq!(attrs[3].format, wgpu::VertexFormat::Unorm8x4);
    }

    #[test]
    fn extra_blocks_split_into_two_vectors() {
        let attrs = vertex_attributes(VertexFlags::EX_192).unwrap();
        assert_eq!(locations(&attrs), vec![0, 4, 5]);
        assert_eq!(attrs[1].format, wgpu::VertexFormat::Uint32x4);
        assert_eq!(attrs[2].format, wgpu::VertexFormat::Uint32x2);
        assert_eq!(attrs[2].offset, 8 + 16);
    }

    #[test]
    fn unfetchable_colors_are_rejected() {
        for flags in [VertexFlags::COL_8, VertexFlags::COL_16, VertexFlags::COL_24, VertexFlags::COL_48] {
            assert!(matches!(
                vertex_attributes(flags | VertexFlags::EX_32),
                Err(BackendError::UnsupportedLayout { .. })
            ));
        }
        assert!(vertex_attributes(VertexFlags(9 << 3)).is_err());
    }

    #[test]
    fn unaligned_stride_is_rejected() {
        // 8 + 3 bytes of Rgb8 color.
        let err = vertex_attributes(VertexFlags::COL_24).unwrap_err();
        assert_eq!(
            err,
            BackendError::UnsupportedLayout { flags: VertexFlags::COL_24, reason: "stride is not a multiple of 4 bytes" }
        );
    }

    // ── topology ──────────────────────────────────────────────────────────

    #[test]
    fn draw_mode_selects_topology() {
        assert_eq!(topology(VertexFlags::TRIS).unwrap(), wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(topology(VertexFlags::LINES).unwrap(), wgpu::PrimitiveTopology::LineList);
        assert_eq!(topology(VertexFlags::POINTS).unwrap(), wgpu::PrimitiveTopology::PointList);
        assert!(topology(VertexFlags::DRAW_MASK).is_err());
    }

    #[test]
    fn index_width_selects_format() {
        assert_eq!(index_format(VertexFlags::IDX_16), wgpu::IndexFormat::Uint16);
        assert_eq!(index_format(VertexFlags::IDX_32), wgpu::IndexFormat::Uint32);
    }
}
