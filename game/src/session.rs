use std::time::Duration;

use engine::SceneRunner;
use engine::arcade::{ArcadeConfig, ArcadeStage, WorldBounds};
use serde::{Deserialize, Serialize};

use crate::classifier::{ClassifierProvider, InferenceError, InferenceLoop, WebcamConfig};
use crate::gesture::{ClassifierAdapter, GestureCell, ProbabilityPanel};
use crate::platformer::{PlatformerScene, WorldConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    pub world: WorldConfig,
    pub webcam: WebcamConfig,
    pub class_labels: Vec<String>,
}

/// The whole demo: the inference loop and the game loop, ticked in that
/// order by one cooperative frame scheduler and joined only by the shared
/// gesture cell.
pub struct DemoSession<P: ClassifierProvider> {
    config: DemoConfig,
    provider: P,
    gesture: GestureCell,
    inference: InferenceLoop<ProbabilityPanel>,
    runner: SceneRunner<PlatformerScene, ArcadeStage>,
}

impl<P: ClassifierProvider> std::fmt::Debug for DemoSession<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoSession")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<P: ClassifierProvider> DemoSession<P> {
    pub fn start(config: DemoConfig, provider: P) -> Result<Self, InferenceError> {
        let (gesture, inference, runner) = build(&config, &provider)?;
        Ok(Self {
            config,
            provider,
            gesture,
            inference,
            runner,
        })
    }

    /// One cooperative frame: inference first, then the game loop. The game
    /// loop therefore sees the gesture as of this frame's reading, and the
    /// gesture goes stale rather than lost whenever inference skips a frame.
    pub fn tick(&mut self, dt: Duration) {
        self.inference.tick();
        self.runner.tick(dt);
    }

    /// Full reload: all in-memory state (score, gesture cell, webcam
    /// handle) is discarded and rebuilt from configuration.
    pub fn reset(&mut self) -> Result<(), InferenceError> {
        let (gesture, inference, runner) = build(&self.config, &self.provider)?;
        self.gesture = gesture;
        self.inference = inference;
        self.runner = runner;
        Ok(())
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn current_gesture(&self) -> Option<String> {
        self.gesture.current()
    }

    pub fn score(&self) -> u32 {
        self.runner.scene().score()
    }

    pub fn probability_panel(&self) -> &ProbabilityPanel {
        self.inference.display()
    }

    pub fn skipped_frames(&self) -> u64 {
        self.inference.skipped_frames()
    }

    pub fn scene(&self) -> &PlatformerScene {
        self.runner.scene()
    }

    pub fn stage(&self) -> &ArcadeStage {
        self.runner.stage()
    }

    pub fn stage_mut(&mut self) -> &mut ArcadeStage {
        self.runner.stage_mut()
    }
}

fn build<P: ClassifierProvider>(
    config: &DemoConfig,
    provider: &P,
) -> Result<
    (
        GestureCell,
        InferenceLoop<ProbabilityPanel>,
        SceneRunner<PlatformerScene, ArcadeStage>,
    ),
    InferenceError,
> {
    let (model, webcam) = provider.connect(&config.webcam)?;

    let gesture = GestureCell::new();
    let adapter = ClassifierAdapter::new(
        gesture.clone(),
        ProbabilityPanel::for_labels(&config.class_labels),
    );
    let inference = InferenceLoop::start(webcam, model, adapter)?;

    let stage = ArcadeStage::new(ArcadeConfig {
        world: WorldBounds {
            width: config.world.width,
            height: config.world.height,
        },
        gravity_y: config.world.gravity_y,
    });
    let scene = PlatformerScene::new(config.world.clone(), gesture.clone());
    let runner = SceneRunner::new(scene, stage);

    Ok((gesture, inference, runner))
}
