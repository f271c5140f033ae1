use std::path::Path;

use image::{Rgb, RgbImage};

use super::color::{viridis, Rgb8};
use crate::data::model::{DatasetRecord, Table};
use crate::error::{Error, Result};

/// Zoom level a web map of a single field usually opens at.
pub const DEFAULT_ZOOM: u8 = 12;

const MARKER_RADIUS: i64 = 6;
const MARGIN: f64 = 20.0;

// ---------------------------------------------------------------------------
// SoilMap – a rendered-but-not-drawn map of one soil property
// ---------------------------------------------------------------------------

/// One sample on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub color: Rgb8,
    /// Popup text, e.g. `SOC_target: 1.23`.
    pub label: String,
}

/// Handle to a soil-property map: markers coloured on the viridis ramp
/// by `value / max(value)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilMap {
    pub title: String,
    /// `[mean y, mean x]` (latitude/longitude order for geographic CRSs).
    pub center: [f64; 2],
    pub zoom: u8,
    pub x_column: String,
    pub y_column: String,
    pub markers: Vec<Marker>,
}

/// Build a map of `values` at the given `coordinates`.
///
/// The x/y columns are the first ones prefixed `x_` and `y_`; without
/// them, the first two columns are used.
pub fn render_map(coordinates: &Table, values: &[f64], title: &str) -> Result<SoilMap> {
    build_map(coordinates, values, title, title)
}

/// Map one column of a dataset at its coordinates.
///
/// `title` defaults to the column name.
pub fn plot_soil_map(data: &DatasetRecord, target: &str, title: Option<&str>) -> Result<SoilMap> {
    let coords = data
        .coordinates
        .as_ref()
        .ok_or_else(|| Error::MalformedCoordinates("dataset has no coordinates".into()))?;
    let values = data
        .dataset
        .column(target)
        .ok_or_else(|| Error::InvalidTargets {
            invalid: vec![target.to_string()],
            valid: data.dataset.target_columns(),
        })?;
    build_map(coords, &values, title.unwrap_or(target), target)
}

fn build_map(coordinates: &Table, values: &[f64], title: &str, value_name: &str) -> Result<SoilMap> {
    if coordinates.n_rows() != values.len() {
        return Err(Error::length_mismatch(
            "map values",
            coordinates.n_rows(),
            values.len(),
        ));
    }
    let (x_column, y_column) = coordinate_columns(coordinates)?;
    let xs = coordinates.column(&x_column).unwrap_or_default();
    let ys = coordinates.column(&y_column).unwrap_or_default();

    let max = values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, f64::max);

    let markers: Vec<Marker> = xs
        .iter()
        .zip(&ys)
        .zip(values)
        .map(|((&x, &y), &value)| Marker {
            x,
            y,
            value,
            color: viridis(value / max),
            label: format!("{value_name}: {value:.2}"),
        })
        .collect();

    Ok(SoilMap {
        title: title.to_string(),
        center: [nan_mean(&ys), nan_mean(&xs)],
        zoom: DEFAULT_ZOOM,
        x_column,
        y_column,
        markers,
    })
}

fn coordinate_columns(coordinates: &Table) -> Result<(String, String)> {
    let cols = coordinates.columns();
    let x = cols.iter().find(|c| c.starts_with("x_"));
    let y = cols.iter().find(|c| c.starts_with("y_"));
    match (x, y) {
        (Some(x), Some(y)) => Ok((x.clone(), y.clone())),
        _ if cols.len() >= 2 => Ok((cols[0].clone(), cols[1].clone())),
        _ => Err(Error::MalformedCoordinates(format!(
            "need an x_/y_ column pair or at least two columns, got {cols:?}"
        ))),
    }
}

fn nan_mean(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    finite.iter().sum::<f64>() / finite.len() as f64
}

impl SoilMap {
    /// `(min_x, max_x, min_y, max_y)` over markers with finite positions.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let finite = self
            .markers
            .iter()
            .filter(|m| m.x.is_finite() && m.y.is_finite());
        finite.fold(None, |acc, m| {
            Some(match acc {
                None => (m.x, m.x, m.y, m.y),
                Some((x0, x1, y0, y1)) => (x0.min(m.x), x1.max(m.x), y0.min(m.y), y1.max(m.y)),
            })
        })
    }

    /// Rasterize the markers onto a white `width` × `height` image.
    pub fn to_image(&self, width: u32, height: u32) -> RgbImage {
        let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        let Some((x0, x1, y0, y1)) = self.bounds() else {
            return img;
        };

        let span_x = (x1 - x0).max(f64::EPSILON);
        let span_y = (y1 - y0).max(f64::EPSILON);
        let usable_w = (width as f64 - 2.0 * MARGIN).max(1.0);
        let usable_h = (height as f64 - 2.0 * MARGIN).max(1.0);
        // Same scale on both axes so the field keeps its shape.
        let scale = (usable_w / span_x).min(usable_h / span_y);

        for m in &self.markers {
            if !(m.x.is_finite() && m.y.is_finite()) {
                continue;
            }
            let px = MARGIN + (m.x - x0) * scale;
            let py = height as f64 - MARGIN - (m.y - y0) * scale;
            fill_circle(&mut img, px.round() as i64, py.round() as i64, m.color);
        }
        img
    }

    /// Write the map as a PNG file.
    pub fn save_png(&self, path: &Path, width: u32, height: u32) -> Result<()> {
        self.to_image(width, height).save(path)?;
        log::info!("Saved map '{}' to {}", self.title, path.display());
        Ok(())
    }
}

fn fill_circle(img: &mut RgbImage, cx: i64, cy: i64, color: Rgb8) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    for dy in -MARKER_RADIUS..=MARKER_RADIUS {
        for dx in -MARKER_RADIUS..=MARKER_RADIUS {
            if dx * dx + dy * dy > MARKER_RADIUS * MARKER_RADIUS {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x < 0 || y < 0 || x >= w || y >= h {
                continue;
            }
            img.put_pixel(x as u32, y as u32, Rgb([color.red, color.green, color.blue]));
        }
    }
}
