// renderer/material.rs (line/fill version)

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MaterialFlags: u32 {
        const ALPHA_BLEND = 1 << 0;
        const DOUBLE_SIDED = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub base_color: [u8; 4],
    pub flags: MaterialFlags,
    /// Screen-space width in pixels; only meaningful for line meshes.
    pub line_width: f32,
}

impl Material {
    pub fn new(color: [u8; 4]) -> Self {
        Self {
            base_color: color,
            flags: MaterialFlags::empty(),
            line_width: 1.0,
        }
    }

    /// Opaque material from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self::new(hex_to_rgba(hex, 255))
    }

    pub fn line(hex: u32, width: f32) -> Self {
        Self::from_hex(hex).with_line_width(width)
    }

    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    /// Marks the material as blended with the given opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.base_color[3] = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.flags |= MaterialFlags::ALPHA_BLEND;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.flags |= MaterialFlags::DOUBLE_SIDED;
        self
    }

    pub fn set_color_hex(&mut self, hex: u32) {
        let alpha = self.base_color[3];
        self.base_color = hex_to_rgba(hex, alpha);
    }

    pub fn color_hex(&self) -> u32 {
        let [r, g, b, _] = self.base_color;
        (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new([r, g, b, 255])
    }

    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub fn opacity(&self) -> f32 {
        self.base_color[3] as f32 / 255.0
    }

    /// Blended materials are drawn after opaque ones.
    pub fn is_translucent(&self) -> bool {
        self.flags.contains(MaterialFlags::ALPHA_BLEND)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::white()
    }
}

fn hex_to_rgba(hex: u32, alpha: u8) -> [u8; 4] {
    [
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
        alpha,
    ]
}
