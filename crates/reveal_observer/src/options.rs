//! Observer configuration

use reveal_core::ElementId;
use smallvec::SmallVec;

use crate::error::{ObserverError, Result};
use crate::margin::RootMargin;

/// Rect that targets are tested against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ObserverRoot {
    /// The document's own viewport
    #[default]
    Viewport,
    /// A scrolling container element (its bounds act as the root)
    Element(ElementId),
}

/// Options for a visibility observer
#[derive(Clone, Debug, PartialEq)]
pub struct ObserverOptions {
    pub root: ObserverRoot,
    pub root_margin: RootMargin,
    thresholds: SmallVec<[f32; 4]>,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ObserverOptions {
    /// Viewport root, no margin, single threshold of 0
    pub fn new() -> Self {
        let mut thresholds = SmallVec::new();
        thresholds.push(0.0);
        Self {
            root: ObserverRoot::Viewport,
            root_margin: RootMargin::ZERO,
            thresholds,
        }
    }

    pub fn with_root(mut self, root: ObserverRoot) -> Self {
        self.root = root;
        self
    }

    pub fn with_root_margin(mut self, margin: RootMargin) -> Self {
        self.root_margin = margin;
        self
    }

    /// Use a single ratio threshold
    pub fn with_threshold(self, threshold: f32) -> Result<Self> {
        self.with_thresholds([threshold])
    }

    /// Use a single threshold, clamped into `[0, 1]` (NaN becomes 0)
    pub fn with_threshold_clamped(mut self, threshold: f32) -> Self {
        let threshold = if threshold.is_nan() {
            0.0
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self.thresholds.clear();
        self.thresholds.push(threshold);
        self
    }

    /// Use a list of ratio thresholds
    ///
    /// Values are sorted and de-duplicated. An empty list means `[0.0]`.
    pub fn with_thresholds<I>(mut self, thresholds: I) -> Result<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values: SmallVec<[f32; 4]> = SmallVec::new();
        for t in thresholds {
            if !(0.0..=1.0).contains(&t) {
                return Err(ObserverError::InvalidThreshold(t));
            }
            values.push(t);
        }

        values.sort_by(f32::total_cmp);
        values.dedup();
        if values.is_empty() {
            values.push(0.0);
        }

        self.thresholds = values;
        Ok(self)
    }

    /// Sorted thresholds, never empty
    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }

    /// Smallest ratio at which a target counts as intersecting
    pub fn min_threshold(&self) -> f32 {
        self.thresholds.first().copied().unwrap_or(0.0)
    }

    /// Number of thresholds reached by `ratio`
    pub fn crossed_thresholds(&self, ratio: f32) -> usize {
        self.thresholds.iter().take_while(|&&t| ratio >= t).count()
    }
}
