use std::path::Path;

use glam::DVec2;
use image::{Rgb, RgbImage};
use polka_dots::prelude::*;
use tracing::info;

/// Installs a formatting subscriber honouring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Maps a geographic window onto a square-pixel image.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub bounds: GeoBox,
    pub background: [u8; 3],
    pub outline: [u8; 3],
    pub dot_radius: i32,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), bounds: GeoBox) -> Self {
        Self {
            image_size,
            bounds,
            background: [250, 250, 250],
            outline: [150, 150, 150],
            dot_radius: 3,
        }
    }

    /// Grows `bounds` by `fraction` of its size on every side.
    pub fn with_margin(mut self, fraction: f64) -> Self {
        let bl = self.bounds.bottom_left.to_dvec2();
        let tr = self.bounds.top_right.to_dvec2();
        let pad = (tr - bl) * fraction;
        self.bounds = GeoBox::new((bl - pad).into(), (tr + pad).into());
        self
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_dot_radius(mut self, dot_radius: i32) -> Self {
        self.dot_radius = dot_radius;
        self
    }

    fn to_pixel(&self, p: GeoPoint) -> DVec2 {
        let bl = self.bounds.bottom_left.to_dvec2();
        let size = (self.bounds.top_right.to_dvec2() - bl).max(DVec2::splat(1e-12));
        let (w, h) = self.image_size;
        let t = (p.to_dvec2() - bl) / size;
        DVec2::new(t.x * f64::from(w - 1), (1.0 - t.y) * f64::from(h - 1))
    }
}

/// Draws source outlines and generated dots of `store` into a PNG.
pub fn render_store_to_png(
    store: &MemoryStore,
    rc: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = rc.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(rc.background));

    let mut dots = 0usize;
    for entity in store.entities() {
        match &entity.location {
            Location::Point(p) => {
                let color = entity
                    .visual_attributes
                    .and_then(|v| v.fill_color)
                    .unwrap_or(Color::BLACK);
                draw_disc(&mut img, rc.to_pixel(*p), rc.dot_radius, color.rgb());
                dots += 1;
            }
            Location::Area(area) => draw_polyline(&mut img, rc, &area.approximate_ring(), true),
            other => {
                if let Shape::Path(points) = other.shape() {
                    draw_polyline(&mut img, rc, &points, false);
                }
            }
        }
    }

    img.save(path.as_ref())?;
    info!("Rendered {dots} dots to {}.", path.as_ref().display());
    Ok(())
}

fn draw_polyline(img: &mut RgbImage, rc: &RenderConfig, points: &[GeoPoint], closed: bool) {
    let mut segments: Vec<(GeoPoint, GeoPoint)> =
        points.windows(2).map(|w| (w[0], w[1])).collect();
    if closed && points.len() > 2 {
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            segments.push((*last, *first));
        }
    }
    for (a, b) in segments {
        let (pa, pb) = (rc.to_pixel(a), rc.to_pixel(b));
        let steps = pa.distance(pb).ceil().max(1.0) as usize;
        for i in 0..=steps {
            put(img, pa.lerp(pb, i as f64 / steps as f64), rc.outline);
        }
    }
}

fn draw_disc(img: &mut RgbImage, center: DVec2, radius: i32, color: [u8; 3]) {
    let r2 = f64::from(radius * radius);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let offset = DVec2::new(f64::from(dx), f64::from(dy));
            if offset.length_squared() <= r2 {
                put(img, center + offset, color);
            }
        }
    }
}

fn put(img: &mut RgbImage, p: DVec2, color: [u8; 3]) {
    let (x, y) = (p.x.round(), p.y.round());
    if x >= 0.0 && y >= 0.0 && x < f64::from(img.width()) && y < f64::from(img.height()) {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}
