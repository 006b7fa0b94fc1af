//! Alpha mask synthesis.
//!
//! The mask starts fully transparent, gets an opaque rectangle inset by the
//! border width, and is then blurred with a separable Gaussian
//! (sigma = border / 2). Weights are Q16 fixed point and always sum to
//! exactly 65536, so a window that only sees opaque pixels stays at 255 and
//! the result is bit-for-bit reproducible.

use std::path::Path;

use image::{GrayImage, Luma};

use crate::error::{CoreError, CoreResult};

const Q16_ONE: i64 = 1 << 16;

/// Single-channel mask whose values become the alpha of every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMask {
    image: GrayImage,
}

impl AlphaMask {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Alpha value at `(x, y)`. Panics if out of bounds, like `GrayImage`.
    pub fn value(&self, x: u32, y: u32) -> u8 {
        self.image.get_pixel(x, y).0[0]
    }

    /// Row-major alpha values, one byte per pixel.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    /// Writes the mask as a grayscale PNG.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| CoreError::Image {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Rejects border widths that leave no opaque interior.
pub fn validate_border(width: u32, height: u32, border: u32) -> CoreResult<()> {
    let too_wide = u64::from(border) * 2 >= u64::from(width);
    let too_tall = u64::from(border) * 2 >= u64::from(height);
    if border == 0 || too_wide || too_tall {
        return Err(CoreError::InvalidBorder {
            border,
            width,
            height,
        });
    }
    Ok(())
}

/// Builds the feathered alpha mask for a `width` x `height` frame.
pub fn build_mask(width: u32, height: u32, border: u32) -> CoreResult<AlphaMask> {
    validate_border(width, height, border)?;

    let mut canvas = GrayImage::new(width, height);
    for y in border..height - border {
        for x in border..width - border {
            canvas.put_pixel(x, y, Luma([255]));
        }
    }

    let sigma = border as f64 / 2.0;
    let radius = (sigma * 3.0).ceil() as u32;
    let kernel = gaussian_kernel_q16(radius, sigma);

    let (w, h) = (width as usize, height as usize);
    let mut tmp = vec![0u8; w * h];
    let mut out = vec![0u8; w * h];
    horizontal_pass(canvas.as_raw(), &mut tmp, w, h, &kernel);
    vertical_pass(&tmp, &mut out, w, h, &kernel);

    let image = GrayImage::from_raw(width, height, out).ok_or_else(|| {
        CoreError::Config(format!("mask buffer does not match {width}x{height}"))
    })?;

    log::debug!(
        "Built {}x{} alpha mask (border {}px, sigma {:.1}, kernel radius {})",
        width,
        height,
        border,
        sigma,
        radius
    );
    Ok(AlphaMask { image })
}

fn gaussian_kernel_q16(radius: u32, sigma: f64) -> Vec<i64> {
    if radius == 0 || sigma <= 0.0 {
        return vec![Q16_ONE];
    }

    let r = radius as i64;
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<i64> = weights_f
        .iter()
        .map(|wf| (((wf / sum) * Q16_ONE as f64).round() as i64).clamp(0, Q16_ONE))
        .collect();

    // Rounding drift goes to the centre tap so the kernel stays symmetric.
    let delta = Q16_ONE - weights.iter().sum::<i64>();
    let mid = weights.len() / 2;
    weights[mid] = (weights[mid] + delta).clamp(0, Q16_ONE);
    weights
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: usize, height: usize, k: &[i64]) {
    let radius = (k.len() / 2) as i64;
    let max_x = width as i64 - 1;
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        for x in 0..width {
            let acc: i64 = k
                .iter()
                .enumerate()
                .map(|(ki, &kw)| {
                    let sx = (x as i64 + ki as i64 - radius).clamp(0, max_x) as usize;
                    kw * i64::from(row[sx])
                })
                .sum();
            dst[y * width + x] = q16_to_u8(acc);
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: usize, height: usize, k: &[i64]) {
    let radius = (k.len() / 2) as i64;
    let max_y = height as i64 - 1;
    for y in 0..height {
        for x in 0..width {
            let acc: i64 = k
                .iter()
                .enumerate()
                .map(|(ki, &kw)| {
                    let sy = (y as i64 + ki as i64 - radius).clamp(0, max_y) as usize;
                    kw * i64::from(src[sy * width + x])
                })
                .sum();
            dst[y * width + x] = q16_to_u8(acc);
        }
    }
}

fn q16_to_u8(acc: i64) -> u8 {
    ((acc + Q16_ONE / 2) >> 16).clamp(0, 255) as u8
}
