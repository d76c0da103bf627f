use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gesture::{ClassPrediction, ClassifierAdapter, ProbabilityDisplay};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    /// Model or webcam setup failed; fatal to the inference subsystem.
    Init(String),
    /// A single classification cycle failed; the frame is skipped.
    Frame(String),
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceError::Init(detail) => write!(f, "inference setup failed: {detail}"),
            InferenceError::Frame(detail) => write!(f, "classification failed: {detail}"),
        }
    }
}

impl std::error::Error for InferenceError {}

/// One captured webcam frame, RGBA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebcamConfig {
    pub width: u32,
    pub height: u32,
    pub flip: bool,
}

impl Default for WebcamConfig {
    fn default() -> Self {
        Self {
            width: 250,
            height: 250,
            flip: true,
        }
    }
}

/// The classification contract this crate consumes. `predict` must return
/// one prediction per known class, in an order that is stable across calls.
pub trait ImageModel {
    fn total_classes(&self) -> usize;
    fn predict(&mut self, frame: &Frame) -> Result<Vec<ClassPrediction>, InferenceError>;
}

/// The webcam contract: `setup` requests the device, `play` starts capture,
/// `update` refreshes and returns the current frame.
pub trait FrameSource {
    fn setup(&mut self) -> Result<(), InferenceError>;
    fn play(&mut self) -> Result<(), InferenceError>;
    fn update(&mut self) -> Result<&Frame, InferenceError>;
}

/// Connects a model and a webcam for a session. `reset` reconnects through
/// the same provider, which is how a full session rebuild discards the old
/// webcam handle.
pub trait ClassifierProvider {
    fn connect(
        &self,
        webcam: &WebcamConfig,
    ) -> Result<(Box<dyn ImageModel>, Box<dyn FrameSource>), InferenceError>;
}

/// Per-frame inference driver. Setup failures abort construction; a failed
/// classification cycle is logged and skipped so the loop keeps running.
pub struct InferenceLoop<D: ProbabilityDisplay> {
    webcam: Box<dyn FrameSource>,
    model: Box<dyn ImageModel>,
    adapter: ClassifierAdapter<D>,
    skipped_frames: u64,
}

impl<D: ProbabilityDisplay> InferenceLoop<D> {
    pub fn start(
        mut webcam: Box<dyn FrameSource>,
        model: Box<dyn ImageModel>,
        adapter: ClassifierAdapter<D>,
    ) -> Result<Self, InferenceError> {
        webcam.setup()?;
        webcam.play()?;
        Ok(Self {
            webcam,
            model,
            adapter,
            skipped_frames: 0,
        })
    }

    pub fn adapter(&self) -> &ClassifierAdapter<D> {
        &self.adapter
    }

    pub fn display(&self) -> &D {
        self.adapter.display()
    }

    pub fn total_classes(&self) -> usize {
        self.model.total_classes()
    }

    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    pub fn tick(&mut self) {
        let model = &mut self.model;
        let readings = self.webcam.update().and_then(|frame| model.predict(frame));
        match readings {
            Ok(readings) => self.adapter.on_frame(&readings),
            Err(err) => {
                self.skipped_frames += 1;
                eprintln!("inference frame skipped: {err}");
            }
        }
    }
}
