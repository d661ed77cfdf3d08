//! Raster output: PNG diagrams and animated GIF route playback.
//!
//! SVG strings from the pipeline are rasterized with `usvg`/`resvg` into
//! `tiny_skia` pixmaps, then encoded. Everything here is pure Rust; no
//! browser engine or system ImageMagick is involved.

use crate::pipeline::{self, PipelineError, Rendered, VisualizeOptions};
use convoy_core::{NetworkRecord, SolutionRecord};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("invalid background color for GIF rendering")]
    GifBackground,
    #[error("GIF rendering requires an opaque background color (e.g. white)")]
    GifOpaqueBackgroundRequired,
    #[error("failed to encode GIF")]
    GifEncode,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    pub background: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
        }
    }
}

/// Animation playback settings. The rate applies to every frame; GIF
/// delays are stored in 10ms units, which caps the effective rate at 100.
#[derive(Debug, Clone, Copy)]
pub struct AnimationOptions {
    pub fps: u32,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self { fps: 2 }
    }
}

/// Renders the static overview diagram and encodes it as PNG.
pub fn render_diagram_png(
    network: Option<&NetworkRecord>,
    solution: &SolutionRecord,
    options: &VisualizeOptions,
    raster: &RasterOptions,
) -> Result<Rendered<Vec<u8>>> {
    let svg = match pipeline::render_diagram(network, solution, options)? {
        Rendered::Artifact(svg) => svg,
        Rendered::SkippedNodeLimit { unique_nodes } => {
            return Ok(Rendered::SkippedNodeLimit { unique_nodes });
        }
    };
    Ok(Rendered::Artifact(svg_to_png(&svg, raster)?))
}

/// Renders every animation frame and composes them into a looping GIF.
pub fn render_animation_gif(
    network: Option<&NetworkRecord>,
    solution: &SolutionRecord,
    options: &VisualizeOptions,
    raster: &RasterOptions,
    animation: &AnimationOptions,
) -> Result<Rendered<Vec<u8>>> {
    let frames = match pipeline::render_animation(network, solution, options)? {
        Rendered::Artifact(frames) => frames,
        Rendered::SkippedNodeLimit { unique_nodes } => {
            return Ok(Rendered::SkippedNodeLimit { unique_nodes });
        }
    };
    Ok(Rendered::Artifact(compose_gif(&frames, raster, animation)?))
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options.scale, options.background.as_deref())?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

/// Rasterizes frame SVGs at identical dimensions and encodes an endlessly
/// looping GIF with a fixed per-frame delay.
pub fn compose_gif(
    frames: &[String],
    options: &RasterOptions,
    animation: &AnimationOptions,
) -> Result<Vec<u8>> {
    let bg = options.background.as_deref().unwrap_or("white");
    let Some(color) = parse_tiny_skia_color(bg) else {
        return Err(RasterError::GifBackground);
    };
    if color.alpha() != 1.0 {
        return Err(RasterError::GifOpaqueBackgroundRequired);
    }

    let delay = image::Delay::from_numer_denom_ms(1000 / animation.fps.max(1), 1);
    let mut bytes = Vec::new();
    {
        let mut encoder = image::codecs::gif::GifEncoder::new(&mut bytes);
        encoder
            .set_repeat(image::codecs::gif::Repeat::Infinite)
            .map_err(|_| RasterError::GifEncode)?;
        for svg in frames {
            let pixmap = svg_to_pixmap(svg, options.scale, Some(bg))?;
            let (w, h) = (pixmap.width(), pixmap.height());
            // The opaque background keeps every pixel's alpha at 255, so the
            // premultiplied tiny-skia buffer is plain RGBA already.
            let Some(image) = image::RgbaImage::from_raw(w, h, pixmap.take()) else {
                return Err(RasterError::GifEncode);
            };
            encoder
                .encode_frame(image::Frame::from_parts(image, 0, 0, delay))
                .map_err(|_| RasterError::GifEncode)?;
        }
    }
    Ok(bytes)
}

#[derive(Debug, Clone, Copy)]
struct ParsedViewBox {
    width: f32,
    height: f32,
}

fn parse_svg_viewbox(svg: &str) -> Option<ParsedViewBox> {
    // Cheap, non-validating parse for root viewBox: `viewBox="minX minY w h"`.
    // This is sufficient for our own SVG output.
    let i = svg.find("viewBox=\"")?;
    let rest = &svg[i + "viewBox=\"".len()..];
    let end = rest.find('"')?;
    let raw = &rest[..end];
    let mut it = raw.split_whitespace();
    let _min_x = it.next()?.parse::<f32>().ok()?;
    let _min_y = it.next()?.parse::<f32>().ok()?;
    let width = it.next()?.parse::<f32>().ok()?;
    let height = it.next()?.parse::<f32>().ok()?;
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Some(ParsedViewBox { width, height })
    } else {
        None
    }
}

fn svg_to_pixmap(svg: &str, scale: f32, background: Option<&str>) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    // Keep output stable-ish across environments while still using system fonts.
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    let (width, height) = if let Some(vb) = parse_svg_viewbox(svg) {
        (vb.width, vb.height)
    } else {
        let size = tree.size();
        (size.width(), size.height())
    };

    let width_px = (width * scale).ceil().max(1.0) as u32;
    let height_px = (height * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;

    if let Some(bg) = background {
        if let Some(color) = parse_tiny_skia_color(bg) {
            pixmap.fill(color);
        }
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

fn parse_tiny_skia_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(tiny_skia::Color::from_rgba8(255, 255, 255, 255)),
        "black" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 255)),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    fn hex2(b: &[u8]) -> Option<u8> {
        let hi = (*b.first()? as char).to_digit(16)? as u8;
        let lo = (*b.get(1)? as char).to_digit(16)? as u8;
        Some((hi << 4) | lo)
    }
    fn hex1(c: u8) -> Option<u8> {
        let v = (c as char).to_digit(16)? as u8;
        Some((v << 4) | v)
    }

    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => Some(tiny_skia::Color::from_rgba8(
            hex1(bytes[0])?,
            hex1(bytes[1])?,
            hex1(bytes[2])?,
            255,
        )),
        4 => Some(tiny_skia::Color::from_rgba8(
            hex1(bytes[0])?,
            hex1(bytes[1])?,
            hex1(bytes[2])?,
            hex1(bytes[3])?,
        )),
        6 => Some(tiny_skia::Color::from_rgba8(
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            255,
        )),
        8 => Some(tiny_skia::Color::from_rgba8(
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            hex2(&bytes[6..8])?,
        )),
        _ => None,
    }
}
