//! OpenCV DNN backend for the preprocessing and detector ONNX graphs

use super::{PrepInput, Tensor};
use crate::detection::config::{DetectionConfig, ModelInputShape};
use crate::traits::InferenceBackend;
use crate::Result;
use anyhow::{bail, Context};
use opencv::{
    core::{DataType, Mat, Scalar, CV_32F},
    dnn::{self, Net},
    prelude::*,
};
use std::path::Path;

const PREP_IMAGES: &str = "images";
const PREP_PADDING: &str = "padding";
const PREP_SCALES: &str = "scales";
const PREP_OUTPUT: &str = "letterbox";
const NET_INPUT: &str = "images";
const NET_OUTPUT: &str = "output0";

/// Runs both networks through `cv::dnn` on the CPU
pub struct OnnxBackend {
    prep: Net,
    net: Net,
    input_shape: ModelInputShape,
}

impl OnnxBackend {
    /// Load both networks named by the config
    pub fn load(config: &DetectionConfig) -> Result<Self> {
        let net = Self::read_net(&config.model_path)?;
        let prep = Self::read_net(&config.preprocess_model_path)?;

        Ok(Self {
            prep,
            net,
            input_shape: config.input_shape,
        })
    }

    fn read_net(path: &Path) -> Result<Net> {
        let path_str = path.to_string_lossy();
        log::info!("Loading network {}", path_str);

        let net = dnn::read_net_from_onnx(&path_str)
            .with_context(|| format!("Failed to load ONNX model: {}", path_str))?;

        if net.empty()? {
            bail!("ONNX model has no layers: {}", path_str);
        }

        Ok(net)
    }

    /// Push one all-zeros batch through the detector so the first real frame
    /// doesn't pay for lazy initialisation
    pub fn warm_up(&mut self) -> Result<()> {
        log::info!("Warming up detector");
        let zeros = Tensor::zeros(&self.input_shape.dims());
        self.detect(&zeros).context("Detector warm-up failed")?;
        Ok(())
    }
}

impl InferenceBackend for OnnxBackend {
    fn preprocess(&mut self, input: &PrepInput, padding: [i64; 4], scales: [f32; 2]) -> Result<Tensor> {
        let images = match input {
            PrepInput::Planar(tensor) => blob_from_slice(&tensor.data, &to_i32_dims(&tensor.shape)?)?,
            PrepInput::Packed(pixels) => blob_from_slice(&pixels.data, &to_i32_dims(&pixels.dims())?)?,
        };

        // cv::dnn has no 64-bit integer blobs; int64 graph inputs are read as int32
        let padding = padding
            .iter()
            .map(|&p| i32::try_from(p).context("Padding out of range"))
            .collect::<Result<Vec<i32>>>()?;
        let padding = blob_from_slice(&padding, &[4])?;
        let scales = blob_from_slice(&scales, &[2])?;

        self.prep.set_input(&images, PREP_IMAGES, 1.0, Scalar::default())?;
        self.prep.set_input(&padding, PREP_PADDING, 1.0, Scalar::default())?;
        self.prep.set_input(&scales, PREP_SCALES, 1.0, Scalar::default())?;

        let output = self
            .prep
            .forward_single(PREP_OUTPUT)
            .context("Preprocessing network failed")?;

        tensor_from_mat(&output)
    }

    fn detect(&mut self, input: &Tensor) -> Result<Tensor> {
        let dims = to_i32_dims(&input.shape)?;
        let blob = blob_from_slice(&input.data, &dims)?;

        self.net.set_input(&blob, NET_INPUT, 1.0, Scalar::default())?;
        let output = self
            .net
            .forward_single(NET_OUTPUT)
            .context("Detector network failed")?;

        tensor_from_mat(&output)
    }
}

fn to_i32_dims(dims: &[usize]) -> Result<Vec<i32>> {
    dims.iter()
        .map(|&d| i32::try_from(d).context("Tensor dimension out of range"))
        .collect()
}

/// Copy a flat slice into an owned n-dimensional single-channel Mat
fn blob_from_slice<T: DataType>(data: &[T], dims: &[i32]) -> Result<Mat> {
    let flat = Mat::from_slice(data)?;
    let shaped = flat.reshape_nd(1, dims)?;
    Ok(shaped.try_clone()?)
}

fn tensor_from_mat(mat: &Mat) -> Result<Tensor> {
    let shape = mat.mat_size().iter().map(|&d| d as usize).collect::<Vec<_>>();

    // convert_to always yields a fresh continuous buffer
    let mut values = Mat::default();
    mat.convert_to(&mut values, CV_32F, 1.0, 0.0)?;
    let data = values.data_typed::<f32>()?.to_vec();

    Ok(Tensor::new(shape, data))
}
