use image::{RgbaImage, imageops::FilterType};
use kurbo::{Affine, Point};

use crate::{
    animation::particles::Particle,
    compose::background::BackgroundTransform,
    foundation::{core::Canvas, error::StickerResult, math::blend_over},
};

/// Character sprite placement as fractions of the canvas.
const CHARACTER_SCALE: f64 = 0.95;
const CHARACTER_X: f64 = -0.03;
const CHARACTER_Y: f64 = 0.05;

/// Look of the overlay layers.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Straight-alpha colour of a spray droplet.
    pub particle_rgba: [u8; 4],
    /// Droplet radius at particle scale 1.0.
    pub droplet_radius_px: f64,
    /// Logo width as a fraction of the canvas width.
    pub logo_width_frac: f64,
    /// Gap between the logo and the canvas edges, as a fraction of the canvas width.
    pub logo_margin_frac: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            particle_rgba: [220, 238, 255, 230],
            droplet_radius_px: 32.0,
            logo_width_frac: 0.2,
            logo_margin_frac: 0.02,
        }
    }
}

/// Everything drawn into one frame, back to front.
#[derive(Clone, Copy, Debug)]
pub struct Layers<'a> {
    pub background: Option<(&'a RgbaImage, BackgroundTransform)>,
    pub particles: &'a [Particle],
    pub character: &'a RgbaImage,
    pub logo: Option<&'a RgbaImage>,
}

#[derive(Clone, Debug)]
pub struct Compositor {
    canvas: Canvas,
    style: OverlayStyle,
}

impl Compositor {
    pub fn new(canvas: Canvas) -> StickerResult<Self> {
        canvas.validate()?;
        Ok(Self {
            canvas,
            style: OverlayStyle::default(),
        })
    }

    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Canvas-space rectangle `(x, y, w, h)` the character frame is scaled into.
    pub fn character_rect(&self) -> (i64, i64, u32, u32) {
        let (cw, ch) = (self.canvas.width_f64(), self.canvas.height_f64());
        (
            (cw * CHARACTER_X).round() as i64,
            (ch * CHARACTER_Y).round() as i64,
            ((cw * CHARACTER_SCALE).round() as u32).max(1),
            ((ch * CHARACTER_SCALE).round() as u32).max(1),
        )
    }

    /// Canvas-space rectangle of a logo of `logo_size`, anchored bottom-right.
    pub fn logo_rect(&self, logo_size: (u32, u32)) -> (i64, i64, u32, u32) {
        let cw = self.canvas.width_f64();
        let w = (cw * self.style.logo_width_frac).round().max(1.0);
        let aspect = f64::from(logo_size.1) / f64::from(logo_size.0.max(1));
        let h = (w * aspect).round().max(1.0);
        let margin = (cw * self.style.logo_margin_frac).round();
        (
            i64::from(self.canvas.width) - w as i64 - margin as i64,
            i64::from(self.canvas.height) - h as i64 - margin as i64,
            w as u32,
            h as u32,
        )
    }

    pub fn compose(&self, layers: &Layers<'_>) -> RgbaImage {
        let mut out = RgbaImage::new(self.canvas.width, self.canvas.height);

        if let Some((bg, transform)) = layers.background {
            let affine = transform.to_affine(self.canvas, bg.dimensions());
            draw_background(&mut out, bg, affine);
        }
        for p in layers.particles {
            self.draw_droplet(&mut out, p);
        }

        let (x, y, w, h) = self.character_rect();
        draw_scaled(&mut out, layers.character, x, y, w, h);

        if let Some(logo) = layers.logo {
            let (x, y, w, h) = self.logo_rect(logo.dimensions());
            draw_scaled(&mut out, logo, x, y, w, h);
        }
        out
    }

    fn draw_droplet(&self, out: &mut RgbaImage, p: &Particle) {
        let r = self.style.droplet_radius_px * p.scale;
        if r <= 0.0 || p.alpha <= 0.0 {
            return;
        }
        let (w, h) = (i64::from(out.width()), i64::from(out.height()));
        let x0 = ((p.position.x - r).floor() as i64).max(0);
        let y0 = ((p.position.y - r).floor() as i64).max(0);
        let x1 = ((p.position.x + r).ceil() as i64).min(w - 1);
        let y1 = ((p.position.y + r).ceil() as i64).min(h - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Point::new(x as f64 + 0.5, y as f64 + 0.5).distance(p.position);
                if d >= r {
                    continue;
                }
                let falloff = 1.0 - d / r;
                let px = out.get_pixel_mut(x as u32, y as u32);
                blend_over(&mut px.0, self.style.particle_rgba, (p.alpha * falloff) as f32);
            }
        }
    }
}

/// Inverse-mapped nearest-neighbour fill of the whole canvas.
fn draw_background(out: &mut RgbaImage, bg: &RgbaImage, affine: Affine) {
    if affine.determinant().abs() < f64::EPSILON {
        return;
    }
    let inv = affine.inverse();
    let (bw, bh) = (f64::from(bg.width()), f64::from(bg.height()));
    for (x, y, px) in out.enumerate_pixels_mut() {
        let p = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        if p.x < 0.0 || p.y < 0.0 || p.x >= bw || p.y >= bh {
            continue;
        }
        *px = *bg.get_pixel(p.x as u32, p.y as u32);
    }
}

/// Resize `src` to `w`×`h` and blend it at `(x, y)`, clipping to the canvas.
fn draw_scaled(out: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64, w: u32, h: u32) {
    let resized;
    let src = if src.dimensions() == (w, h) {
        src
    } else {
        resized = image::imageops::resize(src, w, h, FilterType::Triangle);
        &resized
    };

    let (ow, oh) = (i64::from(out.width()), i64::from(out.height()));
    for (sx, sy, spx) in src.enumerate_pixels() {
        if spx[3] == 0 {
            continue;
        }
        let (dx, dy) = (x + i64::from(sx), y + i64::from(sy));
        if dx < 0 || dy < 0 || dx >= ow || dy >= oh {
            continue;
        }
        blend_over(&mut out.get_pixel_mut(dx as u32, dy as u32).0, spx.0, 1.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
