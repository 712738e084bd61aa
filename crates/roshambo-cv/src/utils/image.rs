//! Image processing utilities using opencv-match conversions

use crate::backend::{DecodedImage, ImageTensor};
use crate::bbox::Region;
use crate::detection::PipelineError;
use crate::Result;
use anyhow::Context;
use image::{imageops, DynamicImage, ImageFormat, RgbaImage};
use opencv::{
    core::{Mat, Vector},
    imgcodecs::{self, IMREAD_COLOR},
    imgproc,
    prelude::*,
};
use opencv_match::prelude::*;
use std::io::Cursor;

/// Image utility functions leveraging opencv-match conversions
pub struct ImageUtils;

impl ImageUtils {
    /// Convert image::RgbImage to OpenCV Mat using opencv-match
    pub fn rgb_to_mat(rgb_image: &image::RgbImage) -> Result<Mat> {
        rgb_image.try_into_cv()
            .context("Failed to convert RGB image to OpenCV Mat")
    }

    /// Convert OpenCV Mat to image::RgbImage using opencv-match
    pub fn mat_to_rgb(mat: &Mat) -> Result<image::RgbImage> {
        mat.try_into_cv()
            .context("Failed to convert OpenCV Mat to RGB image")
    }

    /// Convert OpenCV Mat to image::RgbaImage using opencv-match
    pub fn mat_to_rgba(mat: &Mat) -> Result<image::RgbaImage> {
        mat.try_into_cv()
            .context("Failed to convert OpenCV Mat to RGBA image")
    }

    /// Convert a BGR camera frame to RGBA
    pub fn bgr_to_rgba(frame: &Mat) -> Result<RgbaImage> {
        let mut rgba = Mat::default();
        imgproc::cvt_color(frame, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)
            .context("Failed to convert frame to RGBA")?;
        Self::mat_to_rgba(&rgba)
    }

    /// Convert an RGB image to a BGR Mat for HighGUI
    pub fn rgb_to_bgr_mat(rgb_image: &image::RgbImage) -> Result<Mat> {
        let rgb = Self::rgb_to_mat(rgb_image)?;
        let mut bgr = Mat::default();
        imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0)
            .context("Failed to convert image to BGR")?;
        Ok(bgr)
    }

    /// Horizontal flip, so snapshots match the mirrored preview
    pub fn mirror(image: &RgbaImage) -> RgbaImage {
        imageops::flip_horizontal(image)
    }

    /// Drop the alpha channel
    pub fn rgba_to_rgb(rgba_image: &RgbaImage) -> image::RgbImage {
        DynamicImage::ImageRgba8(rgba_image.clone()).to_rgb8()
    }

    /// Encode a snapshot as JPEG, the handle passed to the detection pipeline
    pub fn encode_jpeg(image: &RgbaImage) -> Result<Vec<u8>> {
        let rgb = DynamicImage::ImageRgb8(Self::rgba_to_rgb(image));
        let mut bytes = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .context("Failed to encode snapshot as JPEG")?;
        Ok(bytes)
    }

    /// Decode an encoded image into an NHWC tensor.
    ///
    /// The `image` crate is tried first and yields RGB. If it can't read the
    /// bytes, OpenCV decodes them and the raw RGBA buffer becomes the tensor.
    pub fn decode_tensor(bytes: &[u8]) -> std::result::Result<DecodedImage, PipelineError> {
        match image::load_from_memory(bytes) {
            Ok(decoded) => Ok(DecodedImage {
                pixels: ImageTensor::from_rgb(&decoded.to_rgb8()),
                fallback: false,
            }),
            Err(e) => {
                log::debug!("image decode failed ({}), falling back to OpenCV", e);
                let pixels = Self::decode_tensor_opencv(bytes)
                    .map_err(|fallback| PipelineError::Decode(format!("{}; fallback: {:#}", e, fallback)))?;
                Ok(DecodedImage { pixels, fallback: true })
            }
        }
    }

    fn decode_tensor_opencv(bytes: &[u8]) -> Result<ImageTensor> {
        let buffer = Vector::<u8>::from_slice(bytes);
        let bgr = imgcodecs::imdecode(&buffer, IMREAD_COLOR).context("imdecode failed")?;
        if bgr.empty() {
            anyhow::bail!("imdecode produced an empty image");
        }

        let mut rgba = Mat::default();
        imgproc::cvt_color(&bgr, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)?;

        Ok(ImageTensor {
            data: rgba.data_bytes()?.to_vec(),
            height: rgba.rows() as u32,
            width: rgba.cols() as u32,
            channels: 4,
        })
    }

    /// Cut `region` out of `image`, clipped to its bounds.
    ///
    /// Falls back to the whole image when the region lies entirely outside.
    pub fn crop(image: &RgbaImage, region: &Region) -> RgbaImage {
        let (width, height) = image.dimensions();
        match region.clamp_to(width, height) {
            Some((x, y, w, h)) => imageops::crop_imm(image, x, y, w, h).to_image(),
            None => image.clone(),
        }
    }
}
