use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Pixel, Rgba, RgbaImage};
use qrcode::QrCode;
use qrcode::render::svg;

use crate::errors::{QrError, Result};
use crate::models::qr_record::{DEFAULT_COLOR_DARK, DEFAULT_COLOR_LIGHT, QrStyle};
use crate::utils::color::{parse_color, to_hex};

/// Smallest edge, in pixels, a composited logo is drawn at.
const MIN_LOGO_PX: u32 = 24;

fn channels(color: &str, fallback: &str) -> [u8; 3] {
    parse_color(color)
        .or_else(|| parse_color(fallback))
        .unwrap_or([0, 0, 0])
}

/// Render `data` as an SVG document of at least `style.size` pixels.
pub fn render_svg(data: &str, style: &QrStyle) -> Result<String> {
    let code = QrCode::new(data.as_bytes())?;
    let dark = to_hex(channels(&style.color_dark, DEFAULT_COLOR_DARK));
    let light = to_hex(channels(&style.color_light, DEFAULT_COLOR_LIGHT));

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(style.size, style.size)
        .dark_color(svg::Color(&dark))
        .light_color(svg::Color(&light))
        .quiet_zone(true)
        .build())
}

/// Render `data` as a `style.size` square PNG, compositing the logo if one is set.
pub fn render_png(data: &str, style: &QrStyle) -> Result<Vec<u8>> {
    let code = QrCode::new(data.as_bytes())?;
    let [dr, dg, db] = channels(&style.color_dark, DEFAULT_COLOR_DARK);
    let [lr, lg, lb] = channels(&style.color_light, DEFAULT_COLOR_LIGHT);

    let mut canvas: RgbaImage = code
        .render::<Rgba<u8>>()
        .dark_color(Rgba([dr, dg, db, 255]))
        .light_color(Rgba([lr, lg, lb, 255]))
        .quiet_zone(true)
        .min_dimensions(style.size, style.size)
        .build();

    if canvas.width() != style.size || canvas.height() != style.size {
        canvas = imageops::resize(&canvas, style.size, style.size, FilterType::Nearest);
    }

    if !style.logo_data_url.is_empty() {
        let logo = decode_logo(&style.logo_data_url)?;
        overlay_logo(&mut canvas, &logo, style.logo_size_percent, style.logo_radius);
    }

    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(canvas).write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Split a `data:image/...;base64,` URL into its decoded bytes.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let (header, payload) = data_url
        .split_once(',')
        .ok_or_else(|| QrError::ValidationFailed("Logo must be a data URL".to_string()))?;

    if !header.starts_with("data:image/") || !header.ends_with(";base64") {
        return Err(QrError::ValidationFailed(
            "Logo must be a base64 encoded image data URL".to_string(),
        ));
    }

    STANDARD
        .decode(payload.trim())
        .map_err(|e| QrError::ValidationFailed(format!("Logo is not valid base64: {}", e)))
}

fn decode_logo(data_url: &str) -> Result<RgbaImage> {
    let bytes = decode_data_url(data_url)?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

/// Draw `logo` centered on `canvas`, clipped to a rounded square.
pub fn overlay_logo(canvas: &mut RgbaImage, logo: &RgbaImage, size_percent: u32, radius: u32) {
    let size = canvas.width().min(canvas.height());
    let logo_px = (size * size_percent / 100).max(MIN_LOGO_PX).min(size);
    let radius = radius.min(logo_px / 2);
    let offset = (size - logo_px) / 2;

    let scaled = imageops::resize(logo, logo_px, logo_px, FilterType::Lanczos3);
    for (x, y, px) in scaled.enumerate_pixels() {
        if inside_rounded_square(x, y, logo_px, radius) {
            canvas.get_pixel_mut(offset + x, offset + y).blend(px);
        }
    }
}

fn inside_rounded_square(x: u32, y: u32, side: u32, radius: u32) -> bool {
    if radius == 0 {
        return true;
    }
    let (r, side) = (radius as f32, side as f32);
    let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
    let cx = px.clamp(r, side - r);
    let cy = py.clamp(r, side - r);
    let (dx, dy) = (px - cx, py - cy);
    dx * dx + dy * dy <= r * r
}
