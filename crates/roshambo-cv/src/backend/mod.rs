//! Tensors exchanged with the inference backend

pub mod onnx;

pub use crate::traits::InferenceBackend;
pub use onnx::OnnxBackend;

use image::{Rgb, RgbImage, RgbaImage};

/// 8-bit image batch of one in NHWC layout
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    pub data: Vec<u8>,
    pub height: u32,
    pub width: u32,
    pub channels: u32,
}

impl ImageTensor {
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.as_raw().clone(),
            height,
            width,
            channels: 3,
        }
    }

    pub fn from_rgba(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.as_raw().clone(),
            height,
            width,
            channels: 4,
        }
    }

    /// `[1, height, width, channels]`
    pub fn dims(&self) -> [usize; 4] {
        [1, self.height as usize, self.width as usize, self.channels as usize]
    }

    /// Colour planes as `[1, 3, height, width]` floats in `[0, 1]`; alpha is dropped
    pub fn to_planar(&self) -> Tensor {
        let stride = self.channels as usize;
        let plane = self.width as usize * self.height as usize;
        let mut data = vec![0.0f32; plane * 3];

        for (i, px) in self.data.chunks_exact(stride).enumerate() {
            for c in 0..3 {
                data[c * plane + i] = f32::from(px[c]) / 255.0;
            }
        }

        Tensor::new(vec![1, 3, self.height as usize, self.width as usize], data)
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        let stride = self.channels as usize;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let at = (y as usize * self.width as usize + x as usize) * stride;
            Rgb([self.data[at], self.data[at + 1], self.data[at + 2]])
        })
    }
}

/// A decoded candidate image and how it was obtained
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: ImageTensor,
    /// Decoded by the OpenCV fallback rather than the primary decoder
    pub fallback: bool,
}

impl DecodedImage {
    /// Preprocessing input in the layout matching how the image was decoded:
    /// planar floats normally, packed RGBA bytes from the fallback decoder
    pub fn prep_input(&self) -> PrepInput {
        if self.fallback {
            PrepInput::Packed(self.pixels.clone())
        } else {
            PrepInput::Planar(self.pixels.to_planar())
        }
    }
}

/// Image handed to the preprocessing network
#[derive(Debug, Clone, PartialEq)]
pub enum PrepInput {
    /// `[1, 3, H, W]` f32 in `[0, 1]`
    Planar(Tensor),
    /// `[1, H, W, C]` u8 exactly as decoded
    Packed(ImageTensor),
}

/// Dense f32 tensor with an explicit shape
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl Tensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Self {
        Self { shape, data }
    }

    pub fn zeros(shape: &[usize]) -> Self {
        let len = shape.iter().product();
        Self::new(shape.to_vec(), vec![0.0; len])
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_planar_layout_drops_alpha() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([255, 0, 51, 255]));
        rgba.put_pixel(1, 0, Rgba([0, 102, 255, 0]));

        let tensor = ImageTensor::from_rgba(&rgba);
        assert_eq!(tensor.dims(), [1, 1, 2, 4]);

        let planar = tensor.to_planar();
        assert_eq!(planar.shape, vec![1, 3, 1, 2]);
        // R plane, G plane, B plane
        let expected = [1.0, 0.0, 0.0, 0.4, 0.2, 1.0];
        for (got, want) in planar.data.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "{} != {}", got, want);
        }
        assert_eq!(tensor.to_rgb_image().get_pixel(1, 0), &Rgb([0, 102, 255]));
    }

    #[test]
    fn test_prep_input_follows_decoder() {
        let pixels = ImageTensor::from_rgb(&RgbImage::new(4, 2));

        let primary = DecodedImage {
            pixels: pixels.clone(),
            fallback: false,
        };
        match primary.prep_input() {
            PrepInput::Planar(t) => assert_eq!(t.shape, vec![1, 3, 2, 4]),
            other => panic!("expected planar input, got {:?}", other),
        }

        let fallback = DecodedImage {
            pixels: pixels.clone(),
            fallback: true,
        };
        assert_eq!(fallback.prep_input(), PrepInput::Packed(pixels));
    }

    #[test]
    fn test_zeros() {
        let tensor = Tensor::zeros(&[1, 3, 4, 4]);
        assert_eq!(tensor.len(), 48);
        assert!(tensor.data.iter().all(|&v| v == 0.0));
    }
}
