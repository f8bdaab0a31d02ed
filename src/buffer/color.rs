//! Rgba: Straight-alpha color and source-over blending.

/// RGBA color with straight (non-premultiplied) alpha.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgba {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
    /// Alpha channel (0 = transparent, 255 = opaque)
    pub a: u8,
}

impl Rgba {
    /// Create a new color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque color from a 24-bit hex value (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Whether the color is fully opaque.
    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Composite `self` over `dst` (Porter-Duff source-over).
    #[must_use]
    pub fn over(self, dst: Self) -> Self {
        let sa = u32::from(self.a);
        if sa == 255 {
            return self;
        }
        if sa == 0 {
            return dst;
        }
        let da = u32::from(dst.a);
        let inv = 255 - sa;
        let out_a = sa + (da * inv + 127) / 255;
        if out_a == 0 {
            return Self::TRANSPARENT;
        }
        let channel = |s: u8, d: u8| -> u8 {
            let num = u32::from(s) * sa * 255 + u32::from(d) * da * inv;
            (num / (255 * out_a)).min(255) as u8
        };
        Self::new(
            channel(self.r, dst.r),
            channel(self.g, dst.g),
            channel(self.b, dst.b),
            out_a.min(255) as u8,
        )
    }
}

impl std::fmt::Debug for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl From<(u8, u8, u8)> for Rgba {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Rgba {
    #[inline]
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Self::new(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_over_replaces() {
        let src = Rgba::rgb(10, 20, 30);
        assert_eq!(src.over(Rgba::WHITE), src);
        assert_eq!(src.over(Rgba::TRANSPARENT), src);
    }

    #[test]
    fn test_transparent_over_keeps_dst() {
        let dst = Rgba::new(1, 2, 3, 200);
        assert_eq!(Rgba::TRANSPARENT.over(dst), dst);
    }

    #[test]
    fn test_half_alpha_over_opaque() {
        let src = Rgba::new(255, 0, 0, 128);
        let dst = Rgba::rgb(0, 0, 255);
        let out = src.over(dst);
        assert_eq!(out.a, 255);
        assert_eq!(out.r, 128);
        assert_eq!(out.g, 0);
        assert_eq!(out.b, 127);
    }

    #[test]
    fn test_from_u32() {
        assert_eq!(Rgba::from_u32(0xFF5500), Rgba::rgb(0xFF, 0x55, 0x00));
    }
}
