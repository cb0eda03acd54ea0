//! Vertical text bar chart

use shared::{CHART_HEADROOM, CHART_HEIGHT};
use std::fmt;

const BAR_WIDTH: usize = 5;
const BAR_GLYPH: &str = "█";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    pub label: String,
    pub value: u64,
}

impl Bar {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BarChart {
    title: String,
    y_label: String,
    bars: Vec<Bar>,
    y_limit: u64,
}

impl BarChart {
    /// `rounds` sets the y limit, with headroom for the value labels
    pub fn new(
        title: impl Into<String>,
        y_label: impl Into<String>,
        bars: Vec<Bar>,
        rounds: u64,
    ) -> Self {
        let headroom = (rounds as f64 * CHART_HEADROOM).ceil() as u64;
        Self {
            title: title.into(),
            y_label: y_label.into(),
            bars,
            y_limit: rounds + headroom,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn y_limit(&self) -> u64 {
        self.y_limit
    }

    /// Rows of glyphs drawn for `value`
    pub fn bar_height(&self, value: u64) -> usize {
        if self.y_limit == 0 || value == 0 {
            return 0;
        }
        let scaled = (value as f64 / self.y_limit as f64 * CHART_HEIGHT as f64).round() as usize;
        scaled.clamp(1, CHART_HEIGHT)
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .bars
            .iter()
            .map(|bar| {
                bar.label
                    .chars()
                    .count()
                    .max(bar.value.to_string().len())
                    .max(BAR_WIDTH)
                    + 2
            })
            .collect();
        let heights: Vec<usize> = self.bars.iter().map(|bar| self.bar_height(bar.value)).collect();

        let mut lines = vec![
            self.title.clone(),
            format!("{} (0 to {})", self.y_label, self.y_limit),
        ];

        for row in (1..=CHART_HEIGHT + 1).rev() {
            let mut line = String::from("  │");
            for ((bar, width), height) in self.bars.iter().zip(&widths).zip(&heights) {
                let cell = if row <= *height {
                    BAR_GLYPH.repeat(BAR_WIDTH)
                } else if row == height + 1 {
                    bar.value.to_string()
                } else {
                    String::new()
                };
                line.push_str(&format!("{:^width$}", cell, width = *width));
            }
            lines.push(line.trim_end().to_string());
        }

        let total_width: usize = widths.iter().sum();
        lines.push(format!("  └{}", "─".repeat(total_width)));

        let mut labels = String::from("   ");
        for (bar, width) in self.bars.iter().zip(&widths) {
            labels.push_str(&format!("{:^width$}", bar.label, width = *width));
        }
        lines.push(labels.trim_end().to_string());

        lines.join("\n")
    }
}

impl fmt::Display for BarChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
