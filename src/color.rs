//! Ray colour masks and float colours for rendering.
//!
//! Light in the engine carries a 3-bit colour mask. Filters combine with `&`,
//! the editor toggles channels with `^`, and renderers expand a mask to a
//! float triple with [`RayColor::to_rgb`].

use bitflags::bitflags;

bitflags! {
    /// Colour carried by a light sector, and the filter attached to mirrors
    /// and filter walls.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RayColor: u8 {
        const RED     = 0b0001;
        const GREEN   = 0b0010;
        const BLUE    = 0b0100;
        /// Marks a filter rather than a colour. A filter carrying this bit can
        /// never compare equal to a ray's colour.
        const INVERSE = 0b1000;

        const WHITE = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits();
    }
}

impl RayColor {
    pub const BLACK: RayColor = RayColor::empty();

    /// Filter that lets every colour through unchanged.
    pub const PASS_ALL: RayColor = RayColor::WHITE.union(RayColor::INVERSE);

    /// Colour channels only, with the inverse marker stripped.
    #[inline]
    pub fn channels(self) -> RayColor {
        self & RayColor::WHITE
    }

    #[inline]
    pub fn is_black(self) -> bool {
        self.channels().is_empty()
    }

    /// Channels as 0.0 / 1.0 floats.
    pub fn to_rgb(self) -> (f32, f32, f32) {
        let channel = |flag: RayColor| if self.contains(flag) { 1.0 } else { 0.0 };
        (channel(RayColor::RED), channel(RayColor::GREEN), channel(RayColor::BLUE))
    }

    pub fn name(self) -> &'static str {
        match self.channels().bits() {
            0b000 => "Black",
            0b001 => "Red",
            0b010 => "Green",
            0b011 => "Yellow",
            0b100 => "Blue",
            0b101 => "Magenta",
            0b110 => "Cyan",
            _ => "White",
        }
    }
}

impl Default for RayColor {
    fn default() -> Self {
        RayColor::WHITE
    }
}

/// RGBA color with floating point components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RGBA {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl RGBA {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        RGBA { r, g, b, a }
    }

    pub fn black() -> Self {
        RGBA { r: 0.0, g: 0.0, b: 0.0, a: 1.0 }
    }

    /// A ray colour scaled by `intensity`.
    pub fn from_ray(color: RayColor, intensity: f32) -> Self {
        let (r, g, b) = color.to_rgb();
        RGBA::new(r * intensity, g * intensity, b * intensity, 1.0)
    }

    /// Additive blend, keeping this colour's alpha.
    pub fn add(&mut self, other: RGBA) {
        self.r += other.r;
        self.g += other.g;
        self.b += other.b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_and_toggle() {
        let yellow = RayColor::RED | RayColor::GREEN;

        assert_eq!(RayColor::WHITE & yellow, yellow);
        assert_eq!(yellow & RayColor::BLUE, RayColor::BLACK);
        assert_eq!(yellow ^ RayColor::GREEN, RayColor::RED);
        assert_eq!(RayColor::BLACK ^ RayColor::BLUE, RayColor::BLUE);
        assert!((yellow & RayColor::BLUE).is_black());
    }

    #[test]
    fn test_pass_all_filter() {
        for color in [RayColor::RED, RayColor::GREEN | RayColor::BLUE, RayColor::WHITE] {
            assert_eq!(color & RayColor::PASS_ALL, color);
            assert_ne!(color, RayColor::PASS_ALL);
        }
        assert_eq!(RayColor::PASS_ALL.channels(), RayColor::WHITE);
    }

    #[test]
    fn test_complement() {
        assert_eq!(!RayColor::RED & RayColor::WHITE, RayColor::GREEN | RayColor::BLUE);
        assert!((!RayColor::WHITE).contains(RayColor::INVERSE));
    }

    #[test]
    fn test_rgb_and_names() {
        assert_eq!(RayColor::WHITE.to_rgb(), (1.0, 1.0, 1.0));
        assert_eq!((RayColor::RED | RayColor::BLUE).to_rgb(), (1.0, 0.0, 1.0));
        assert_eq!(RayColor::BLACK.to_rgb(), (0.0, 0.0, 0.0));
        assert_eq!((RayColor::GREEN | RayColor::BLUE).name(), "Cyan");
        assert_eq!(RayColor::PASS_ALL.name(), "White");
    }

    #[test]
    fn test_rgba_basics() {
        let color = RGBA::new(0.5, 0.75, 0.25, 0.9);
        assert_eq!((color.r, color.g, color.b, color.a), (0.5, 0.75, 0.25, 0.9));

        let mut sum = RGBA::black();
        sum.add(RGBA::from_ray(RayColor::RED, 0.5));
        sum.add(RGBA::from_ray(RayColor::RED | RayColor::BLUE, 0.25));
        assert_eq!((sum.r, sum.g, sum.b, sum.a), (0.75, 0.0, 0.25, 1.0));
    }
}
