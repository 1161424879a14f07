//! Map view export: renders the territory around a point to an RGBA image
//! for inspection outside the engine.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use glam::IVec2;

use crate::generator::Generator;
use crate::seed::derive_name_seed;

/// Errors that can occur while exporting a map view.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// Failed to create or write the output file.
    #[error("failed to write map view: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding failed.
    #[error("failed to encode map view: {0}")]
    Encode(#[from] png::EncodingError),
}

/// A rendered map view, stored as row-major RGBA pixels.
#[derive(Clone, Debug)]
pub struct MapImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data in row-major RGBA format. Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

impl MapImage {
    /// Creates a black (all-zero) image with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    /// Sets a single pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) {
        let idx = ((y * self.width + x) * 4) as usize;
        self.pixels[idx] = r;
        self.pixels[idx + 1] = g;
        self.pixels[idx + 2] = b;
        self.pixels[idx + 3] = a;
    }

    /// Gets a pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let idx = ((y * self.width + x) * 4) as usize;
        (
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        )
    }

    /// Renders the territory around `center`, one column per pixel times
    /// `scale`.
    ///
    /// Each pixel takes its hue from the column's actual sub-biome and its
    /// brightness from the blended ground height; submerged columns shift
    /// toward blue so coastlines read at a glance.
    pub fn render(generator: &Generator, center: IVec2, width: u32, height: u32, scale: u32) -> Self {
        let mut image = Self::new(width, height);
        let scale = scale.max(1) as i32;
        let max_height = f64::from(generator.settings().max_height);
        let sea = generator.settings().sea_level;
        let half = IVec2::new(width as i32 / 2, height as i32 / 2);

        for py in 0..height {
            for px in 0..width {
                let column =
                    center + (IVec2::new(px as i32, py as i32) - half) * scale;
                let sample = generator.map().sample(column);
                let ground = generator.ground_info(column, &sample).height;

                let name = generator.map().catalog().get(sample.actual).name();
                let (r, g, b) = sub_biome_color(name);
                let shade = 0.5 + 0.5 * (f64::from(ground) / max_height).clamp(0.0, 1.0);
                let (mut r, mut g, mut b) = (
                    (f64::from(r) * shade) as u8,
                    (f64::from(g) * shade) as u8,
                    (f64::from(b) * shade) as u8,
                );
                if ground < sea {
                    let depth = (f64::from(sea - ground) / 64.0).clamp(0.0, 1.0);
                    r = (f64::from(r) * (1.0 - depth * 0.7)) as u8;
                    g = (f64::from(g) * (1.0 - depth * 0.5)) as u8;
                    b = b.max((120.0 + depth * 100.0) as u8);
                }
                image.set_pixel(px, py, r, g, b, 255);
            }
        }
        image
    }

    /// Writes the image as an RGBA PNG file.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Io`] or [`ViewError::Encode`].
    pub fn save(&self, path: &Path) -> Result<(), ViewError> {
        let file = File::create(path)?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        Ok(())
    }
}

/// A stable color for a sub-biome, derived from its name.
///
/// Definitions are data-driven, so colors are hashed rather than matched
/// by name; the same name always renders the same hue.
fn sub_biome_color(name: &str) -> (u8, u8, u8) {
    let hash = derive_name_seed(0, name);
    let r = 64 + (hash & 0x7f) as u8;
    let g = 64 + ((hash >> 8) & 0x7f) as u8;
    let b = 64 + ((hash >> 16) & 0x7f) as u8;
    (r, g, b)
}
