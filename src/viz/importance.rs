use std::path::Path;

use image::{Rgb, RgbImage};

use super::color::{viridis, Rgb8};
use crate::error::{Error, Result};

pub const DEFAULT_IMPORTANCE_TITLE: &str = "Feature Importance";

/// One horizontal bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub feature: String,
    pub importance: f64,
    /// Vertical position of the bar centre (`rank + 0.5`).
    pub position: f64,
    pub color: Rgb8,
}

/// Horizontal bar chart of feature importances, least important first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceChart {
    pub title: String,
    pub bars: Vec<Bar>,
}

/// Sort features by importance (ascending) and lay them out as bars.
pub fn render_importance(
    importances: &[f64],
    feature_names: &[String],
    title: &str,
) -> Result<ImportanceChart> {
    if importances.len() != feature_names.len() {
        return Err(Error::length_mismatch(
            "feature importances",
            feature_names.len(),
            importances.len(),
        ));
    }

    let mut order: Vec<usize> = (0..importances.len()).collect();
    order.sort_by(|&a, &b| importances[a].total_cmp(&importances[b]));

    let max_abs = importances
        .iter()
        .map(|v| v.abs())
        .filter(|v| !v.is_nan())
        .fold(0.0, f64::max);

    let bars = order
        .into_iter()
        .enumerate()
        .map(|(rank, i)| Bar {
            feature: feature_names[i].clone(),
            importance: importances[i],
            position: rank as f64 + 0.5,
            color: viridis(importances[i].abs() / max_abs),
        })
        .collect();

    Ok(ImportanceChart {
        title: title.to_string(),
        bars,
    })
}

impl ImportanceChart {
    /// Features from most to least important.
    pub fn ranking(&self) -> Vec<&str> {
        self.bars.iter().rev().map(|b| b.feature.as_str()).collect()
    }

    /// Rasterize the bars (by absolute length) onto a white image.
    pub fn to_image(&self, width: u32, height: u32) -> RgbImage {
        let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        if self.bars.is_empty() {
            return img;
        }
        let max_abs = self
            .bars
            .iter()
            .map(|b| b.importance.abs())
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);
        if max_abs == 0.0 {
            return img;
        }

        let slot = height as f64 / self.bars.len() as f64;
        let thickness = (slot * 0.8).max(1.0);
        for b in &self.bars {
            if !b.importance.is_finite() {
                continue;
            }
            let len = ((b.importance.abs() / max_abs) * width as f64).round() as u32;
            // Least important bar at the bottom.
            let centre = height as f64 - b.position * slot;
            let top = (centre - thickness / 2.0).max(0.0) as u32;
            let bottom = ((centre + thickness / 2.0) as u32).min(height);
            for y in top..bottom {
                for x in 0..len.min(width) {
                    img.put_pixel(x, y, Rgb([b.color.red, b.color.green, b.color.blue]));
                }
            }
        }
        img
    }

    pub fn save_png(&self, path: &Path, width: u32, height: u32) -> Result<()> {
        self.to_image(width, height).save(path)?;
        log::info!("Saved chart '{}' to {}", self.title, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bars_are_sorted_ascending_at_half_positions() {
        let chart = render_importance(
            &[0.3, 0.1, 0.6],
            &names(&["ERa", "Altitude", "NDVI"]),
            DEFAULT_IMPORTANCE_TITLE,
        )
        .unwrap();
        let order: Vec<&str> = chart.bars.iter().map(|b| b.feature.as_str()).collect();
        assert_eq!(order, vec!["Altitude", "ERa", "NDVI"]);
        let pos: Vec<f64> = chart.bars.iter().map(|b| b.position).collect();
        assert_eq!(pos, vec![0.5, 1.5, 2.5]);
        assert_eq!(chart.ranking(), vec!["NDVI", "ERa", "Altitude"]);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = render_importance(&[0.5], &names(&["a", "b"]), "t").unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn longest_bar_spans_the_width() {
        let chart = render_importance(&[1.0, 0.5], &names(&["a", "b"]), "t").unwrap();
        let img = chart.to_image(40, 20);
        // "a" is the top bar and fills the row; "b" stops halfway.
        assert_ne!(img.get_pixel(39, 5), &Rgb([255, 255, 255]));
        assert_eq!(img.get_pixel(39, 15), &Rgb([255, 255, 255]));
        assert_ne!(img.get_pixel(10, 15), &Rgb([255, 255, 255]));
    }
}
