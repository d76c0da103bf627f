use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Minimum class probability before a reading drives gameplay.
pub const CONFIDENCE_THRESHOLD: f32 = 0.99;

/// One class's output for one webcam frame. A full reading is one
/// `ClassPrediction` per known class, in the model's stable class order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassPrediction {
    pub class_name: String,
    pub probability: f32,
}

impl ClassPrediction {
    pub fn new(class_name: impl Into<String>, probability: f32) -> Self {
        Self {
            class_name: class_name.into(),
            probability,
        }
    }
}

/// Single-slot cell shared between the inference loop (sole writer) and the
/// game loop (sole reader). Last writer wins; a low-confidence frame never
/// clears the previous value. Both loops run on the same cooperative frame
/// scheduler, so the cell needs no locking, only interior mutability.
#[derive(Debug, Clone, Default)]
pub struct GestureCell {
    slot: Rc<RefCell<Option<String>>>,
}

impl GestureCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, label: &str) {
        *self.slot.borrow_mut() = Some(label.to_string());
    }

    pub fn current(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    pub fn clear(&self) {
        *self.slot.borrow_mut() = None;
    }
}

/// Where per-class probabilities are rendered. The served page draws real
/// progress bars; tests and headless runs use [`ProbabilityPanel`].
pub trait ProbabilityDisplay {
    fn set_class_probability(&mut self, index: usize, label: &str, probability: f32);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelEntry {
    pub label: String,
    pub percent: u32,
    pub text: String,
}

/// Headless stand-in for the on-page probability bars: one entry per class,
/// each holding the bar width in percent and its caption text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityPanel {
    entries: Vec<PanelEntry>,
}

impl ProbabilityPanel {
    pub fn for_labels(labels: &[String]) -> Self {
        Self {
            entries: labels
                .iter()
                .map(|label| PanelEntry {
                    label: label.clone(),
                    percent: 0,
                    text: "0%".to_string(),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[PanelEntry] {
        &self.entries
    }
}

impl ProbabilityDisplay for ProbabilityPanel {
    fn set_class_probability(&mut self, index: usize, label: &str, probability: f32) {
        while self.entries.len() <= index {
            self.entries.push(PanelEntry::default());
        }
        let percent = (probability.clamp(0.0, 1.0) * 100.0).round() as u32;
        let entry = &mut self.entries[index];
        entry.label = label.to_string();
        entry.percent = percent;
        entry.text = format!("{percent}%");
    }
}

/// Bridges raw per-frame classification output into the shared gesture cell
/// and the probability display.
pub struct ClassifierAdapter<D: ProbabilityDisplay> {
    cell: GestureCell,
    display: D,
}

impl<D: ProbabilityDisplay> ClassifierAdapter<D> {
    pub fn new(cell: GestureCell, display: D) -> Self {
        Self { cell, display }
    }

    pub fn cell(&self) -> &GestureCell {
        &self.cell
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Every reading updates its display entry; only threshold-crossing
    /// readings touch the cell. When several classes cross the threshold in
    /// one frame, the last one in class order wins.
    pub fn on_frame(&mut self, readings: &[ClassPrediction]) {
        for (index, reading) in readings.iter().enumerate() {
            self.display
                .set_class_probability(index, &reading.class_name, reading.probability);
            if reading.probability > CONFIDENCE_THRESHOLD {
                self.cell.publish(&reading.class_name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(pairs: &[(&str, f32)]) -> Vec<ClassPrediction> {
        pairs
            .iter()
            .map(|&(label, probability)| ClassPrediction::new(label, probability))
            .collect()
    }

    fn adapter() -> ClassifierAdapter<ProbabilityPanel> {
        let labels: Vec<String> = ["LEFT", "RIGHT", "STOP", "UP"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        ClassifierAdapter::new(GestureCell::new(), ProbabilityPanel::for_labels(&labels))
    }

    #[test]
    fn single_confident_class_becomes_the_current_gesture() {
        let mut adapter = adapter();
        adapter.on_frame(&reading(&[
            ("LEFT", 0.2),
            ("RIGHT", 0.995),
            ("STOP", 0.1),
            ("UP", 0.05),
        ]));
        assert_eq!(adapter.cell().current().as_deref(), Some("RIGHT"));
    }

    #[test]
    fn low_confidence_frame_keeps_the_previous_gesture() {
        let mut adapter = adapter();
        adapter.on_frame(&reading(&[("LEFT", 1.0)]));
        adapter.on_frame(&reading(&[
            ("LEFT", 0.4),
            ("RIGHT", 0.4),
            ("STOP", 0.1),
            ("UP", 0.1),
        ]));
        assert_eq!(adapter.cell().current().as_deref(), Some("LEFT"));
    }

    #[test]
    fn probability_exactly_at_threshold_does_not_publish() {
        let mut adapter = adapter();
        adapter.on_frame(&reading(&[("LEFT", CONFIDENCE_THRESHOLD)]));
        assert_eq!(adapter.cell().current(), None);
    }

    #[test]
    fn last_class_in_order_wins_when_several_cross_the_threshold() {
        let mut adapter = adapter();
        adapter.on_frame(&reading(&[("LEFT", 0.995), ("RIGHT", 0.999)]));
        assert_eq!(adapter.cell().current().as_deref(), Some("RIGHT"));

        adapter.on_frame(&reading(&[("LEFT", 0.999), ("RIGHT", 0.995)]));
        assert_eq!(adapter.cell().current().as_deref(), Some("RIGHT"));
    }

    #[test]
    fn display_tracks_every_class_each_frame() {
        let mut adapter = adapter();
        adapter.on_frame(&reading(&[
            ("LEFT", 0.25),
            ("RIGHT", 0.5),
            ("STOP", 0.125),
            ("UP", 0.125),
        ]));

        let entries = adapter.display().entries();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].percent, 25);
        assert_eq!(entries[1].percent, 50);
        assert_eq!(entries[1].text, "50%");
        assert_eq!(entries[2].label, "STOP");
    }

    #[test]
    fn clear_empties_the_cell() {
        let cell = GestureCell::new();
        cell.publish("LEFT");
        cell.clear();
        assert_eq!(cell.current(), None);
    }

    #[test]
    fn unrecognized_label_still_overwrites_the_cell() {
        let mut adapter = adapter();
        adapter.on_frame(&reading(&[("LEFT", 1.0)]));
        adapter.on_frame(&reading(&[("WAVE", 0.999)]));
        assert_eq!(adapter.cell().current().as_deref(), Some("WAVE"));
    }
}
