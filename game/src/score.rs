use serde::{Deserialize, Serialize};

/// Points awarded per collected star.
pub const STAR_VALUE: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    score: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn display(&self) -> String {
        format!("score: {}", self.score)
    }
}
