use std::collections::BTreeSet;

use crate::{
    config::{MAX_WEIGHT, MIN_WEIGHT, PRESET_WEIGHTS},
    error::ValidationError,
};

/// Weights chosen for instancing.
///
/// Always sorted, free of duplicates and within `100..=900`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WeightSelection {
    weights: BTreeSet<u16>,
}

impl WeightSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every preset weight from 100 to 900.
    pub fn presets() -> Self {
        Self { weights: PRESET_WEIGHTS.into_iter().collect() }
    }

    /// Add a weight.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::WeightOutOfRange`] outside `100..=900`
    /// - [`ValidationError::DuplicateWeight`] if the weight is already selected
    pub fn add(&mut self, weight: u16) -> Result<(), ValidationError> {
        check_range(u32::from(weight))?;
        if !self.weights.insert(weight) {
            return Err(ValidationError::DuplicateWeight(weight));
        }
        Ok(())
    }

    /// Add a weight typed by the user.
    ///
    /// Only ASCII digits are accepted; signs, decimals and blanks are rejected.
    pub fn add_text(&mut self, text: &str) -> Result<u16, ValidationError> {
        let text = text.trim();
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidWeight(text.to_owned()));
        }
        let value: u32 = text.parse().unwrap_or(u32::MAX);
        let weight = check_range(value)?;
        self.add(weight)?;
        Ok(weight)
    }

    /// Add every preset, skipping ones already selected.
    pub fn add_presets(&mut self) {
        self.weights.extend(PRESET_WEIGHTS);
    }

    pub fn remove(&mut self, weight: u16) -> bool {
        self.weights.remove(&weight)
    }

    pub fn clear(&mut self) {
        self.weights.clear();
    }

    pub fn contains(&self, weight: u16) -> bool {
        self.weights.contains(&weight)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weights in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.weights.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<u16> {
        self.iter().collect()
    }
}

fn check_range(value: u32) -> Result<u16, ValidationError> {
    if (u32::from(MIN_WEIGHT)..=u32::from(MAX_WEIGHT)).contains(&value) {
        Ok(value as u16)
    } else {
        Err(ValidationError::WeightOutOfRange(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_sorted() {
        let mut selection = WeightSelection::new();
        for weight in [700, 100, 450] {
            selection.add(weight).unwrap();
        }
        assert_eq!(selection.to_vec(), vec![100, 450, 700]);
    }

    #[test]
    fn duplicate_is_rejected() {
        let mut selection = WeightSelection::new();
        selection.add(400).unwrap();
        assert_eq!(selection.add(400), Err(ValidationError::DuplicateWeight(400)));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut selection = WeightSelection::new();
        assert!(selection.add(100).is_ok());
        assert!(selection.add(900).is_ok());
        assert_eq!(selection.add(99), Err(ValidationError::WeightOutOfRange(99)));
        assert_eq!(selection.add(901), Err(ValidationError::WeightOutOfRange(901)));
    }

    #[test]
    fn text_must_be_digits() {
        let mut selection = WeightSelection::new();
        for bad in ["", "abc", "-400", "400.5", "4 00", "+300"] {
            assert!(
                matches!(selection.add_text(bad), Err(ValidationError::InvalidWeight(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(selection.is_empty());
    }

    #[test]
    fn text_is_range_checked() {
        let mut selection = WeightSelection::new();
        assert_eq!(selection.add_text("50"), Err(ValidationError::WeightOutOfRange(50)));
        assert_eq!(selection.add_text("1000"), Err(ValidationError::WeightOutOfRange(1000)));
        assert_eq!(
            selection.add_text("99999999999"),
            Err(ValidationError::WeightOutOfRange(u32::MAX))
        );
        assert_eq!(selection.add_text(" 350 "), Ok(350));
        assert_eq!(selection.add_text("350"), Err(ValidationError::DuplicateWeight(350)));
    }

    #[test]
    fn presets_merge_with_custom_weights() {
        let mut selection = WeightSelection::new();
        selection.add(450).unwrap();
        selection.add(400).unwrap();
        selection.add_presets();
        assert_eq!(selection.len(), 10);
        assert!(selection.contains(450));
        assert_eq!(WeightSelection::presets().to_vec(), PRESET_WEIGHTS.to_vec());
    }

    #[test]
    fn remove_and_clear() {
        let mut selection = WeightSelection::presets();
        assert!(selection.remove(500));
        assert!(!selection.remove(500));
        selection.clear();
        assert!(selection.is_empty());
    }
}
