//! Chart series and chart snapshots
//!
//! Maps a report onto the gender and status series and renders a series as
//! a PNG bar chart with plotters.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};
use serde::{Serialize, Serializer};

use super::error::{ReportError, ReportResult};
use crate::models::ReportStatistics;

// ============================================================================
// Series Colors (RGB 0-255)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColor(pub u8, pub u8, pub u8);

impl SeriesColor {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for SeriesColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

pub const COLOR_BLUE: SeriesColor = SeriesColor(59, 130, 246);
pub const COLOR_PINK: SeriesColor = SeriesColor(236, 72, 153);
pub const COLOR_PURPLE: SeriesColor = SeriesColor(139, 92, 246);
pub const COLOR_AMBER: SeriesColor = SeriesColor(245, 158, 11);
pub const COLOR_GREEN: SeriesColor = SeriesColor(16, 185, 129);
pub const COLOR_RED: SeriesColor = SeriesColor(239, 68, 68);

/// Snapshot base size in pixels, multiplied by `CHART_SCALE`
pub const CHART_BASE_WIDTH: u32 = 400;
pub const CHART_BASE_HEIGHT: u32 = 300;
pub const CHART_SCALE: u32 = 2;

// ============================================================================
// Series Mapping
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: &'static str,
    pub value: u64,
    pub color: SeriesColor,
}

fn point(label: &'static str, value: u64, color: SeriesColor) -> ChartPoint {
    ChartPoint { label, value, color }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub gender_series: Vec<ChartPoint>,
    pub status_series: Vec<ChartPoint>,
}

/// Gender and status series for a report; empty when nothing is loaded yet
pub fn chart_data(stats: Option<&ReportStatistics>) -> ChartData {
    let Some(stats) = stats else {
        return ChartData::default();
    };

    ChartData {
        gender_series: vec![
            point("Male", stats.gender_wise.male, COLOR_BLUE),
            point("Female", stats.gender_wise.female, COLOR_PINK),
            point("Other", stats.gender_wise.other, COLOR_PURPLE),
        ],
        status_series: vec![
            point("Pending", stats.status_wise.pending, COLOR_AMBER),
            point("Confirmed", stats.status_wise.confirmed, COLOR_BLUE),
            point("Completed", stats.status_wise.completed, COLOR_GREEN),
            point("Cancelled", stats.status_wise.cancelled, COLOR_RED),
        ],
    }
}

// ============================================================================
// Chart Rendering (plotters)
// ============================================================================

/// A rendered chart image
#[derive(Debug, Clone)]
pub struct ChartSnapshot {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

fn chart_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Chart(e.to_string())
}

/// Render `series` as a bar chart at `CHART_SCALE` times the base size
pub fn render_chart(title: &str, series: &[ChartPoint]) -> ReportResult<ChartSnapshot> {
    render_chart_png(
        title,
        series,
        CHART_BASE_WIDTH * CHART_SCALE,
        CHART_BASE_HEIGHT * CHART_SCALE,
    )
}

/// Render `series` as a PNG bar chart of the given pixel size.
///
/// Empty or all-zero series produce empty axes.
pub fn render_chart_png(
    title: &str,
    series: &[ChartPoint],
    width: u32,
    height: u32,
) -> ReportResult<ChartSnapshot> {
    use plotters::prelude::*;

    let scale = (width / CHART_BASE_WIDTH).max(1);
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let bars = series.len().max(1) as u32;
        let peak = series.iter().map(|p| p.value).max().unwrap_or(0).max(1);
        let y_max = peak + (peak / 10).max(1);

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 18 * scale))
            .margin(10 * scale)
            .x_label_area_size(30 * scale)
            .y_label_area_size(40 * scale)
            .build_cartesian_2d((0u32..bars).into_segmented(), 0u64..y_max)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bars as usize)
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) => series
                    .get(*i as usize)
                    .map(|p| p.label.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .y_desc("Appointments")
            .label_style(("sans-serif", 12 * scale))
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(series.iter().enumerate().map(|(i, p)| {
                let color = RGBColor(p.color.0, p.color.1, p.color.2);
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i as u32), 0),
                        (SegmentValue::Exact(i as u32 + 1), p.value),
                    ],
                    color.filled(),
                );
                bar.set_margin(0, 0, 6 * scale, 6 * scale);
                bar
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ReportError::Chart("Failed to create image from buffer".to_string()))?;

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(ChartSnapshot { png, width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenderWise, ReportPeriod, StatusWise};
    use chrono::NaiveDate;

    fn stats() -> ReportStatistics {
        let period = ReportPeriod::weekly(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        ReportStatistics {
            total_appointments: 10,
            gender_wise: GenderWise { male: 4, female: 5, other: 1 },
            status_wise: StatusWise { pending: 1, confirmed: 2, completed: 6, cancelled: 1 },
            ..ReportStatistics::empty(&period)
        }
    }

    #[test]
    fn test_chart_data_passes_values_through() {
        let data = chart_data(Some(&stats()));

        let gender: Vec<(&str, u64)> = data.gender_series.iter().map(|p| (p.label, p.value)).collect();
        assert_eq!(gender, vec![("Male", 4), ("Female", 5), ("Other", 1)]);

        let status: Vec<(&str, u64)> = data.status_series.iter().map(|p| (p.label, p.value)).collect();
        assert_eq!(status, vec![("Pending", 1), ("Confirmed", 2), ("Completed", 6), ("Cancelled", 1)]);
    }

    #[test]
    fn test_chart_colors_are_fixed_per_category() {
        let data = chart_data(Some(&stats()));
        assert_eq!(data.gender_series[0].color, COLOR_BLUE);
        assert_eq!(data.gender_series[1].color, COLOR_PINK);
        assert_eq!(data.gender_series[2].color, COLOR_PURPLE);
        assert_eq!(data.status_series[0].color, COLOR_AMBER);
        assert_eq!(data.status_series[1].color, COLOR_BLUE);
        assert_eq!(data.status_series[2].color, COLOR_GREEN);
        assert_eq!(data.status_series[3].color, COLOR_RED);
    }

    #[test]
    fn test_missing_report_gives_empty_series() {
        let data = chart_data(None);
        assert!(data.gender_series.is_empty());
        assert!(data.status_series.is_empty());
    }

    fn decoded_size(snapshot: &ChartSnapshot) -> (u32, u32) {
        let img = image::load_from_memory_with_format(&snapshot.png, ImageFormat::Png).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn test_render_chart_snapshot_size() {
        let data = chart_data(Some(&stats()));
        let snapshot = render_chart("Status", &data.status_series).unwrap();
        let expected = (CHART_BASE_WIDTH * CHART_SCALE, CHART_BASE_HEIGHT * CHART_SCALE);
        assert_eq!((snapshot.width, snapshot.height), expected);
        assert_eq!(decoded_size(&snapshot), expected);
    }

    #[test]
    fn test_render_all_zero_series() {
        let period = ReportPeriod::weekly(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        let data = chart_data(Some(&ReportStatistics::empty(&period)));
        assert!(data.gender_series.iter().all(|p| p.value == 0));

        let snapshot = render_chart("Gender", &data.gender_series).unwrap();
        assert_eq!(
            decoded_size(&snapshot),
            (CHART_BASE_WIDTH * CHART_SCALE, CHART_BASE_HEIGHT * CHART_SCALE)
        );
    }

    #[test]
    fn test_render_empty_series() {
        let snapshot = render_chart("Gender", &[]).unwrap();
        assert_eq!(
            decoded_size(&snapshot),
            (CHART_BASE_WIDTH * CHART_SCALE, CHART_BASE_HEIGHT * CHART_SCALE)
        );
    }

    #[test]
    fn test_color_serializes_as_hex() {
        let json = serde_json::to_value(COLOR_RED).unwrap();
        assert_eq!(json, "#ef4444");
    }
}
