//! Heading classification.
//!
//! A discipline heading is recognized from two signals: a layout metric of
//! the block (font size or left margin) matching a reference value, and the
//! block's last line being a number (the credits field).

use super::source::RawBlock;

/// Decides whether a raw block starts a new discipline record.
pub trait HeadingClassifier {
    fn is_heading(&self, block: &RawBlock) -> bool;
}

impl<F> HeadingClassifier for F
where
    F: Fn(&RawBlock) -> bool,
{
    fn is_heading(&self, block: &RawBlock) -> bool {
        self(block)
    }
}

/// Built-in heading heuristics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadingRule {
    /// Block's dominant font size equals `size` (within `tolerance`).
    FontSize { size: f32, tolerance: f32 },
    /// Block's left edge equals `x` (within `tolerance`).
    LeftMargin { x: f32, tolerance: f32 },
}

impl Default for HeadingRule {
    fn default() -> Self {
        HeadingRule::LeftMargin {
            x: 59.809,
            tolerance: 0.01,
        }
    }
}

impl HeadingClassifier for HeadingRule {
    fn is_heading(&self, block: &RawBlock) -> bool {
        let metric_matches = match *self {
            HeadingRule::FontSize { size, tolerance } => (block.font_size - size).abs() <= tolerance,
            HeadingRule::LeftMargin { x, tolerance } => (block.x - x).abs() <= tolerance,
        };
        metric_matches && ends_with_number(&block.text)
    }
}

/// Check whether the last line of `text` parses as a number.
pub fn ends_with_number(text: &str) -> bool {
    text.trim()
        .lines()
        .last()
        .map(|line| line.trim().parse::<f64>().is_ok())
        .unwrap_or(false)
}
