//! Drawing seam between the engine and whatever displays it, plus a CPU
//! rasterizer used by the minifb viewer and for PPM snapshots.
//!
//! The engine and obstacles only ever call [`RenderTarget::submit`] with flat
//! vertex lists in world space (pixels, y down).

use std::fs::File;
use std::io::{self, BufWriter, Write};

use glam::DVec2;
use rayon::prelude::*;

use crate::color::{RGBA, RayColor};

/// Distance scale of the light falloff `1 / (d^2 / FALLOFF_SCALE + 1)`.
pub const FALLOFF_SCALE: f64 = 8192.0;

/// What a submitted vertex list is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Triangle list lit by a sector of the given colour cast from `origin`.
    Light { color: RayColor, origin: DVec2 },
    /// Line list outlining a sector.
    SectorOutline,
    /// Line list outlining an obstacle.
    ObstacleOutline,
}

pub trait RenderTarget {
    fn submit(&mut self, primitive: Primitive, verts: &[DVec2]);
}

/// Light intensity at squared distance `dist2` from a sector origin.
#[inline]
pub fn falloff(dist2: f64) -> f64 {
    1.0 / (dist2 / FALLOFF_SCALE + 1.0)
}

/// Convert a float value (0.0-1.0) to a byte (0-255)
#[inline]
pub fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Software render target. Light triangles blend additively, outlines
/// overwrite.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<RGBA>,
    pub outline_color: RGBA,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            pixels: vec![RGBA::black(); width * height],
            outline_color: RGBA::new(1.0, 0.0, 0.0, 1.0),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.pixels.fill(RGBA::black());
    }

    pub fn pixel(&self, x: usize, y: usize) -> RGBA {
        self.pixels[y * self.width + x]
    }

    /// Additively fill a triangle with `color`, attenuated by distance from
    /// `origin`. Pixels are sampled at their centres.
    pub fn fill_light(&mut self, tri: [DVec2; 3], color: RayColor, origin: DVec2) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let [a, b, c] = tri;
        let area = edge(a, b, c);
        if area == 0.0 || !area.is_finite() {
            return;
        }

        let min = a.min(b).min(c);
        let max = a.max(b).max(c);

        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (max.y.ceil().max(0.0) as usize).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let (r, g, bl) = color.to_rgb();
        let width = self.width;

        self.pixels[y0 * width..y1 * width]
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, pixels)| {
                let y = (y0 + row) as f64 + 0.5;
                for (x, pixel) in pixels.iter_mut().enumerate().take(x1).skip(x0) {
                    let p = DVec2::new(x as f64 + 0.5, y);

                    let w0 = edge(b, c, p) / area;
                    let w1 = edge(c, a, p) / area;
                    let w2 = edge(a, b, p) / area;
                    if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                        continue;
                    }

                    let mag = falloff((p - origin).length_squared()) as f32;
                    pixel.add(RGBA::new(r * mag, g * mag, bl * mag, 1.0));
                }
            });
    }

    pub fn draw_line(&mut self, start: DVec2, end: DVec2, color: RGBA) {
        let diff = end - start;
        let steps = diff.x.abs().max(diff.y.abs()).ceil();
        if !steps.is_finite() {
            return;
        }
        let steps = steps as usize;

        for i in 0..=steps {
            let t = if steps == 0 { 0.0 } else { i as f64 / steps as f64 };
            let p = start + diff * t;
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.width && y < self.height {
                self.pixels[y * self.width + x] = color;
            }
        }
    }

    /// Pack into 0x00RRGGBB for minifb.
    pub fn write_to_buffer(&self, buffer: &mut [u32]) {
        for (out, pixel) in buffer.iter_mut().zip(&self.pixels) {
            let r = to_byte(pixel.r) as u32;
            let g = to_byte(pixel.g) as u32;
            let b = to_byte(pixel.b) as u32;
            *out = (r << 16) | (g << 8) | b;
        }
    }

    /// Save as a plain-text PPM image
    pub fn save_ppm(&self, filename: &str) -> io::Result<()> {
        let mut file = BufWriter::new(File::create(filename)?);
        writeln!(file, "P3")?;
        writeln!(file, "{} {}", self.width, self.height)?;
        writeln!(file, "255")?;

        for row in self.pixels.chunks(self.width.max(1)) {
            for pixel in row {
                write!(file, "{} {} {} ", to_byte(pixel.r), to_byte(pixel.g), to_byte(pixel.b))?;
            }
            writeln!(file)?;
        }

        file.flush()
    }
}

impl RenderTarget for Canvas {
    fn submit(&mut self, primitive: Primitive, verts: &[DVec2]) {
        match primitive {
            Primitive::Light { color, origin } => {
                for tri in verts.chunks_exact(3) {
                    self.fill_light([tri[0], tri[1], tri[2]], color, origin);
                }
            }
            Primitive::SectorOutline | Primitive::ObstacleOutline => {
                let color = self.outline_color;
                for seg in verts.chunks_exact(2) {
                    self.draw_line(seg[0], seg[1], color);
                }
            }
        }
    }
}

/// Twice the signed area of (a, b, p).
#[inline]
fn edge(a: DVec2, b: DVec2, p: DVec2) -> f64 {
    (b - a).perp_dot(p - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falloff() {
        assert_eq!(falloff(0.0), 1.0);
        assert_eq!(falloff(8192.0), 0.5);
        assert!(falloff(1e9) < 1e-4);
    }

    #[test]
    fn test_fill_light_covers_inside_only() {
        let mut canvas = Canvas::new(20, 20);
        let tri = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0), DVec2::new(0.0, 10.0)];
        canvas.fill_light(tri, RayColor::RED, DVec2::ZERO);

        let inside = canvas.pixel(1, 1);
        assert!(inside.r > 0.99);
        assert_eq!((inside.g, inside.b), (0.0, 0.0));
        assert_eq!(canvas.pixel(15, 15), RGBA::black());
        assert_eq!(canvas.pixel(9, 9), RGBA::black());
    }

    #[test]
    fn test_winding_does_not_matter() {
        let mut cw = Canvas::new(8, 8);
        let mut ccw = Canvas::new(8, 8);
        let (a, b, c) = (DVec2::new(0.0, 0.0), DVec2::new(8.0, 0.0), DVec2::new(0.0, 8.0));
        cw.fill_light([a, b, c], RayColor::WHITE, a);
        ccw.fill_light([a, c, b], RayColor::WHITE, a);
        assert_eq!(cw.pixels, ccw.pixels);
    }

    #[test]
    fn test_light_accumulates() {
        let mut canvas = Canvas::new(4, 4);
        let tri = [DVec2::new(-10.0, -10.0), DVec2::new(30.0, -10.0), DVec2::new(-10.0, 30.0)];
        canvas.fill_light(tri, RayColor::RED, DVec2::new(0.5, 0.5));
        canvas.fill_light(tri, RayColor::BLUE, DVec2::new(0.5, 0.5));

        let p = canvas.pixel(0, 0);
        assert_eq!((p.r, p.g, p.b), (1.0, 0.0, 1.0));
    }

    #[test]
    fn test_outlines_and_buffer() {
        let mut canvas = Canvas::new(10, 10);
        canvas.submit(
            Primitive::ObstacleOutline,
            &[DVec2::new(0.0, 5.0), DVec2::new(9.0, 5.0)],
        );
        for x in 0..10 {
            assert_eq!(canvas.pixel(x, 5), canvas.outline_color);
        }
        assert_eq!(canvas.pixel(0, 4), RGBA::black());

        let mut buffer = vec![0u32; 100];
        canvas.write_to_buffer(&mut buffer);
        assert_eq!(buffer[50], 0x00FF_0000);
        assert_eq!(buffer[0], 0);

        // Off-canvas segments are ignored
        canvas.draw_line(DVec2::new(-20.0, -20.0), DVec2::new(-5.0, -5.0), RGBA::black());
    }

    #[test]
    fn test_save_ppm() {
        let mut canvas = Canvas::new(3, 2);
        canvas.draw_line(DVec2::new(0.0, 0.0), DVec2::new(0.0, 0.0), RGBA::new(1.0, 1.0, 1.0, 1.0));

        let path = std::env::temp_dir().join("torchlight_render_test.ppm");
        let path = path.to_string_lossy().into_owned();
        canvas.save_ppm(&path).expect("write ppm");

        let text = std::fs::read_to_string(&path).expect("read ppm");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("P3"));
        assert_eq!(lines.next(), Some("3 2"));
        assert_eq!(lines.next(), Some("255"));
        assert!(lines.next().is_some_and(|row| row.starts_with("255 255 255 0 0 0")));

        let _ = std::fs::remove_file(&path);
    }
}
