use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::fmt;

/// Packed description of a batch's vertex layout, index width and draw state.
///
/// The zero value is: 2D positions, 16-bit indexes, triangle lists, no
/// texture, no color, no extra blocks, no camera, no normals.
///
/// Attribute bytes are laid out in the fixed order
/// Position -> Normal -> UV -> Color -> Extra, each offset being the sum of
/// the sizes before it.
///
/// Reserved field values (color codes 9..=15, draw mode 3, camera mode 3 and
/// bit 15) decode consistently but carry no meaning: reserved colors occupy
/// zero bytes and reserved modes decode to their `Reserved` variants.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct VertexFlags(pub u16);

impl VertexFlags {
    pub const POS_2D: Self = Self(0);
    pub const POS_3D: Self = Self(1);
    pub const POS_MASK: Self = Self(1);

    pub const IDX_16: Self = Self(0);
    pub const IDX_32: Self = Self(2);
    pub const IDX_MASK: Self = Self(2);

    pub const NO_TEX: Self = Self(0);
    pub const HAS_TEX: Self = Self(4);
    pub const TEX_MASK: Self = Self(4);

    pub const NO_COL: Self = Self(0);
    /// 2-bit RGBA channels.
    pub const COL_8: Self = Self(1 << 3);
    /// 4-bit RGBA channels.
    pub const COL_16: Self = Self(2 << 3);
    /// 8-bit RGB channels.
    pub const COL_24: Self = Self(3 << 3);
    /// 8-bit RGBA channels.
    pub const COL_32: Self = Self(4 << 3);
    /// 16-bit RGB channels.
    pub const COL_48: Self = Self(5 << 3);
    /// 16-bit RGBA channels.
    pub const COL_64: Self = Self(6 << 3);
    /// f32 RGB channels.
    pub const COL_F: Self = Self(7 << 3);
    /// f32 RGBA channels.
    pub const COL_FA: Self = Self(8 << 3);
    pub const COL_MASK: Self = Self(15 << 3);

    pub const NO_EX: Self = Self(0);
    pub const EX_32: Self = Self(1 << 7);
    pub const EX_64: Self = Self(2 << 7);
    pub const EX_96: Self = Self(3 << 7);
    pub const EX_128: Self = Self(4 << 7);
    pub const EX_160: Self = Self(5 << 7);
    pub const EX_192: Self = Self(6 << 7);
    /// Eight blocks; the field has no seven-block code.
    pub const EX_256: Self = Self(7 << 7);
    pub const EX_MASK: Self = Self(7 << 7);

    pub const TRIS: Self = Self(0);
    pub const LINES: Self = Self(1 << 10);
    pub const POINTS: Self = Self(2 << 10);
    pub const DRAW_MASK: Self = Self(3 << 10);

    pub const NO_CAM: Self = Self(0);
    pub const CAM_2D: Self = Self(1 << 12);
    pub const CAM_3D: Self = Self(2 << 12);
    pub const CAM_MASK: Self = Self(3 << 12);

    pub const NO_NORMS: Self = Self(0);
    pub const NORMS: Self = Self(1 << 14);
    pub const NORMS_MASK: Self = Self(1 << 14);

    /// Bits that change the vertex/index byte layout.
    pub const VERTEX_ATTRIBUTE_MASK: Self = Self(
        Self::POS_MASK.0
            | Self::IDX_MASK.0
            | Self::TEX_MASK.0
            | Self::COL_MASK.0
            | Self::EX_MASK.0
            | Self::NORMS_MASK.0,
    );

    /// Bits that select draw mode and projection uniforms.
    pub const UNIFORM_ATTRIBUTE_MASK: Self = Self(Self::DRAW_MASK.0 | Self::CAM_MASK.0);

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    const fn field(self, mask: Self) -> u16 {
        self.0 & mask.0
    }

    /// Same vertex/index layout; batches may share a renderer's vertex input.
    #[inline]
    pub const fn same_attributes(self, other: Self) -> bool {
        self.field(Self::VERTEX_ATTRIBUTE_MASK) == other.field(Self::VERTEX_ATTRIBUTE_MASK)
    }

    /// Same draw mode and camera; batches may share a renderer's uniforms.
    #[inline]
    pub const fn same_uniforms(self, other: Self) -> bool {
        self.field(Self::UNIFORM_ATTRIBUTE_MASK) == other.field(Self::UNIFORM_ATTRIBUTE_MASK)
    }

    // ── decoded fields ────────────────────────────────────────────────────

    #[inline]
    pub const fn is_3d(self) -> bool {
        self.field(Self::POS_MASK) == Self::POS_3D.0
    }

    #[inline]
    pub const fn has_texture(self) -> bool {
        self.field(Self::TEX_MASK) == Self::HAS_TEX.0
    }

    #[inline]
    pub const fn has_normals(self) -> bool {
        self.field(Self::NORMS_MASK) == Self::NORMS.0
    }

    #[inline]
    pub const fn index_width(self) -> IndexWidth {
        if self.field(Self::IDX_MASK) == Self::IDX_32.0 { IndexWidth::U32 } else { IndexWidth::U16 }
    }

    pub const fn color_format(self) -> ColorFormat {
        match self.field(Self::COL_MASK) >> 3 {
            0 => ColorFormat::None,
            1 => ColorFormat::Rgba2,
            2 => ColorFormat::Rgba4,
            3 => ColorFormat::Rgb8,
            4 => ColorFormat::Rgba8,
            5 => ColorFormat::Rgb16,
            6 => ColorFormat::Rgba16,
            7 => ColorFormat::RgbF32,
            8 => ColorFormat::RgbaF32,
            code => ColorFormat::Reserved(code as u8),
        }
    }

    /// Number of 32-bit extra data blocks (0..=6 or 8).
    #[inline]
    pub const fn extra_blocks(self) -> u32 {
        match self.field(Self::EX_MASK) >> 7 {
            7 => 8,
            n => n as u32,
        }
    }

    pub const fn draw_mode(self) -> DrawMode {
        match self.field(Self::DRAW_MASK) >> 10 {
            0 => DrawMode::Triangles,
            1 => DrawMode::Lines,
            2 => DrawMode::Points,
            _ => DrawMode::Reserved,
        }
    }

    pub const fn camera(self) -> CameraMode {
        match self.field(Self::CAM_MASK) >> 12 {
            0 => CameraMode::None,
            1 => CameraMode::Ortho2D,
            2 => CameraMode::Perspective3D,
            _ => CameraMode::Reserved,
        }
    }

    // ── sizes and offsets (bytes) ─────────────────────────────────────────

    #[inline]
    pub const fn position_offset(self) -> u32 {
        0
    }

    #[inline]
    pub const fn position_size(self) -> u32 {
        if self.is_3d() { 12 } else { 8 }
    }

    #[inline]
    pub const fn normal_offset(self) -> u32 {
        self.position_offset() + self.position_size()
    }

    #[inline]
    pub const fn normal_size(self) -> u32 {
        if self.has_normals() { self.position_size() } else { 0 }
    }

    #[inline]
    pub const fn uv_offset(self) -> u32 {
        self.normal_offset() + self.normal_size()
    }

    #[inline]
    pub const fn uv_size(self) -> u32 {
        if self.has_texture() { 8 } else { 0 }
    }

    #[inline]
    pub const fn color_offset(self) -> u32 {
        self.uv_offset() + self.uv_size()
    }

    #[inline]
    pub const fn color_size(self) -> u32 {
        self.color_format().size()
    }

    #[inline]
    pub const fn extra_offset(self) -> u32 {
        self.color_offset() + self.color_size()
    }

    #[inline]
    pub const fn extra_size(self) -> u32 {
        self.extra_blocks() * 4
    }

    /// Bytes per vertex.
    #[inline]
    pub const fn stride(self) -> u32 {
        self.position_size() + self.normal_size() + self.uv_size() + self.color_size() + self.extra_size()
    }

    /// Bytes per index.
    #[inline]
    pub const fn index_size(self) -> u32 {
        match self.index_width() {
            IndexWidth::U16 => 2,
            IndexWidth::U32 => 4,
        }
    }
}

impl BitOr for VertexFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for VertexFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for VertexFlags {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for VertexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexFlags")
            .field("bits", &format_args!("{:#06x}", self.0))
            .field("3d", &self.is_3d())
            .field("index", &self.index_width())
            .field("texture", &self.has_texture())
            .field("color", &self.color_format())
            .field("extra_blocks", &self.extra_blocks())
            .field("draw", &self.draw_mode())
            .field("camera", &self.camera())
            .field("normals", &self.has_normals())
            .finish()
    }
}

/// Width of one index in a batch's index buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IndexWidth {
    U16,
    U32,
}

impl IndexWidth {
    /// Largest vertex count addressable by this width.
    #[inline]
    pub const fn max_vertices(self) -> u32 {
        match self {
            IndexWidth::U16 => u16::MAX as u32 + 1,
            IndexWidth::U32 => u32::MAX,
        }
    }
}

/// Per-vertex color encoding.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColorFormat {
    None,
    Rgba2,
    Rgba4,
    Rgb8,
    Rgba8,
    Rgb16,
    Rgba16,
    RgbF32,
    RgbaF32,
    /// Unassigned code (9..=15). Occupies no bytes.
    Reserved(u8),
}

impl ColorFormat {
    #[inline]
    pub const fn size(self) -> u32 {
        match self {
            ColorFormat::None | ColorFormat::Reserved(_) => 0,
            ColorFormat::Rgba2 => 1,
            ColorFormat::Rgba4 => 2,
            ColorFormat::Rgb8 => 3,
            ColorFormat::Rgba8 => 4,
            ColorFormat::Rgb16 => 6,
            ColorFormat::Rgba16 => 8,
            ColorFormat::RgbF32 => 12,
            ColorFormat::RgbaF32 => 16,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawMode {
    Triangles,
    Lines,
    Points,
    Reserved,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CameraMode {
    /// Positions are drawn as-is in surface space.
    None,
    Ortho2D,
    Perspective3D,
    Reserved,
}
