pub mod arcade;
pub mod stage;

use std::time::Duration;

use crate::stage::{OverlapEvent, Stage};

/// Scene lifecycle, invoked by the runner: `preload` then `create` once,
/// `update` every frame before the physics step, and `on_overlap` for each
/// overlap pair the step reports.
pub trait Scene {
    fn preload(&mut self, stage: &mut dyn Stage);
    fn create(&mut self, stage: &mut dyn Stage);
    fn update(&mut self, stage: &mut dyn Stage);

    fn on_overlap(&mut self, _stage: &mut dyn Stage, _event: OverlapEvent) {}
}

/// Drives one scene against one stage, frame by frame. Within a frame the
/// scene's `update` always sees the physics state as of the end of the
/// previous frame.
pub struct SceneRunner<S: Scene, T: Stage> {
    scene: S,
    stage: T,
    frame: u64,
}

impl<S: Scene, T: Stage> SceneRunner<S, T> {
    pub fn new(mut scene: S, mut stage: T) -> Self {
        scene.preload(&mut stage);
        scene.create(&mut stage);
        Self {
            scene,
            stage,
            frame: 0,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn stage(&self) -> &T {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut T {
        &mut self.stage
    }

    pub fn tick(&mut self, dt: Duration) -> u64 {
        self.scene.update(&mut self.stage);
        for event in self.stage.step(dt) {
            self.scene.on_overlap(&mut self.stage, event);
        }
        self.frame += 1;
        self.frame
    }
}
