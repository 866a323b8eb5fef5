use crate::foundation::core::{BoxI, Rgba8Premul};
use crate::foundation::error::{PaintError, PaintResult};
use crate::foundation::math::mul_div255_u8;

/// A raster image as premultiplied RGBA8 pixels.
///
/// Used both as a paint target and, shared behind `Arc`, as an immutable blit/pattern source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    /// Create a fully transparent image.
    pub fn new(width: u32, height: u32) -> PaintResult<Self> {
        let len = byte_len(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| PaintError::out_of_memory("image pixels"))?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap tightly packed premultiplied RGBA8 bytes.
    pub fn from_premul_bytes(width: u32, height: u32, data: Vec<u8>) -> PaintResult<Self> {
        if data.len() != byte_len(width, height)? {
            return Err(PaintError::invalid_argument(
                "image byte length does not match width * height * 4",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert a straight-alpha `image::RgbaImage`.
    pub fn from_rgba_image(img: &::image::RgbaImage) -> PaintResult<Self> {
        let (width, height) = img.dimensions();
        let mut data = img.as_raw().clone();
        for px in data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            px[0] = mul_div255_u8(u16::from(px[0]), a);
            px[1] = mul_div255_u8(u16::from(px[1]), a);
            px[2] = mul_div255_u8(u16::from(px[2]), a);
        }
        Self::from_premul_bytes(width, height, data)
    }

    /// Convert to a straight-alpha `image::RgbaImage`.
    pub fn to_rgba_image(&self) -> PaintResult<::image::RgbaImage> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u32::from(px[3]);
            if a == 0 {
                px[0] = 0;
                px[1] = 0;
                px[2] = 0;
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        ::image::RgbaImage::from_raw(self.width, self.height, out)
            .ok_or_else(|| PaintError::execution("rgba buffer size mismatch"))
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bounds as an integer box anchored at the origin.
    pub fn bounds(&self) -> BoxI {
        BoxI::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Premultiplied RGBA8 bytes, tightly packed, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Read one pixel. Out-of-range coordinates read as transparent.
    pub fn pixel(&self, x: i32, y: i32) -> Rgba8Premul {
        let Some(i) = self.index(x, y) else {
            return Rgba8Premul::TRANSPARENT;
        };
        Rgba8Premul {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        }
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Rgba8Premul) {
        let c = color.to_array();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&c);
        }
    }

    pub(crate) fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + (x as usize)) * 4)
    }

    pub(crate) fn px(&self, x: i32, y: i32) -> [u8; 4] {
        match self.index(x, y) {
            Some(i) => [
                self.data[i],
                self.data[i + 1],
                self.data[i + 2],
                self.data[i + 3],
            ],
            None => [0; 4],
        }
    }
}

fn byte_len(width: u32, height: u32) -> PaintResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(|| PaintError::invalid_argument("image dimensions overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/image.rs"]
mod tests;
