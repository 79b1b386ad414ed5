//! PDF export
//!
//! Composes an A4 report page: header bar, period label, stat tiles, the
//! gender and status chart snapshots side by side, an optional appointment
//! table and a centered footer. Bands are placed top-down with a
//! `LayoutCursor`. The document is built in memory and only written once it
//! is complete.

use std::path::Path;

use chrono::NaiveDateTime;
use printpdf::path::PaintMode;
use printpdf::*;

use super::charts::{chart_data, render_chart, ChartSnapshot};
use super::error::{ReportError, ReportResult};
use super::layout::{
    centered_x, column_width, column_x, fit_image, pt_to_mm, LayoutCursor, A4_HEIGHT_MM,
    A4_WIDTH_MM,
};
use super::{write_export, ExportedFile};
use crate::models::{ReportKind, ReportPeriod, ReportStatistics};

pub const PDF_MIME_TYPE: &str = "application/pdf";

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_HEADER: (u8, u8, u8) = (37, 99, 235);
const COLOR_WHITE: (u8, u8, u8) = (255, 255, 255);
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (107, 114, 128);
const COLOR_LIGHT_GRAY: (u8, u8, u8) = (229, 231, 235);
const COLOR_TILE_TOTAL: (u8, u8, u8) = (59, 130, 246);
const COLOR_TILE_COMPLETED: (u8, u8, u8) = (16, 185, 129);
const COLOR_TILE_CANCELLED: (u8, u8, u8) = (239, 68, 68);
const COLOR_TILE_PENDING: (u8, u8, u8) = (245, 158, 11);

// ============================================================================
// Layout Constants (mm)
// ============================================================================

const MARGIN: f32 = 15.0;
const CONTENT_WIDTH: f32 = A4_WIDTH_MM - 2.0 * MARGIN;
const HEADER_HEIGHT: f32 = 28.0;
const SECTION_GAP: f32 = 8.0;
const PERIOD_BAND: f32 = 14.0;
const TILE_HEIGHT: f32 = 22.0;
const TILE_GAP: f32 = 5.0;
const CHART_GAP: f32 = 10.0;
const CHART_TITLE_BAND: f32 = 7.0;
const CHART_MAX_HEIGHT: f32 = 70.0;
const TABLE_ROW_HEIGHT: f32 = 5.0;
const TABLE_FONT_SIZE: f32 = 7.5;
const FOOTER_BAND: f32 = 8.0;
const BOTTOM_MARGIN: f32 = 15.0;
const CONTINUATION_TOP: f32 = 20.0;

const TABLE_COLUMNS: [(&str, f32); 6] = [
    ("Date", 22.0),
    ("Patient", 38.0),
    ("Gender", 18.0),
    ("Status", 22.0),
    ("Type", 34.0),
    ("Diagnosis", 46.0),
];

/// `appointment-report-{kind}-{start}-{end}.pdf` for the requested period
pub fn pdf_file_name(period: &ReportPeriod) -> String {
    format!(
        "appointment-report-{}-{}-{}.pdf",
        period.kind.as_str(),
        period.start_iso(),
        period.end_iso()
    )
}

// ============================================================================
// PDF Drawing Helpers
// ============================================================================

fn rgb_to_printpdf(color: (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

fn pdf_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Pdf(e.to_string())
}

/// Cut `text` so it fits `width` mm at `font_size`
fn fit_text(text: &str, width: f32, font_size: f32) -> String {
    let max_chars = (width / pt_to_mm(font_size * 0.5)).floor() as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

struct PdfCanvas {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    layer: PdfLayerReference,
    cursor: LayoutCursor,
    pages: usize,
}

impl PdfCanvas {
    fn new(title: &str) -> ReportResult<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            font,
            font_bold,
            layer,
            cursor: LayoutCursor::a4(BOTTOM_MARGIN).with_top_margin(CONTINUATION_TOP),
            pages: 1,
        })
    }

    fn text(&self, text: &str, x: f32, y: f32, size: f32, color: (u8, u8, u8), bold: bool) {
        let font = if bold { &self.font_bold } else { &self.font };
        self.layer.set_fill_color(rgb_to_printpdf(color));
        self.layer.use_text(text, size, Mm(x), Mm(y), font);
    }

    /// Filled rectangle with its lower-left corner at `(x, y)`
    fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32, color: (u8, u8, u8)) {
        self.layer.set_fill_color(rgb_to_printpdf(color));
        let rect = Rect::new(Mm(x), Mm(y), Mm(x + width), Mm(y + height)).with_mode(PaintMode::Fill);
        self.layer.add_rect(rect);
    }

    fn image(&self, snapshot: &ChartSnapshot, x: f32, y: f32, dpi: f32) -> ReportResult<()> {
        let dynamic_image = printpdf::image_crate::load_from_memory(&snapshot.png).map_err(pdf_err)?;
        let pdf_image = Image::from_dynamic_image(&dynamic_image);

        let transform = ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            dpi: Some(dpi),
            ..Default::default()
        };
        pdf_image.add_to_layer(self.layer.clone(), transform);
        Ok(())
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(A4_WIDTH_MM),
            Mm(A4_HEIGHT_MM),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor.new_page();
    }

    fn finish(self) -> ReportResult<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_err)
    }
}

// ============================================================================
// Page Sections
// ============================================================================

fn draw_header(canvas: &mut PdfCanvas, title: &str) {
    let bottom = canvas.cursor.band_bottom(HEADER_HEIGHT);
    canvas.fill_rect(0.0, bottom, A4_WIDTH_MM, HEADER_HEIGHT, COLOR_HEADER);
    canvas.text(title, MARGIN, bottom + 14.0, 20.0, COLOR_WHITE, true);
    canvas.text("MediNexus Clinic Management", MARGIN, bottom + 6.0, 10.0, COLOR_WHITE, false);
    canvas.cursor.advance(HEADER_HEIGHT + SECTION_GAP);
}

fn draw_period(canvas: &mut PdfCanvas, kind: ReportKind, stats: &ReportStatistics, generated_at: NaiveDateTime) {
    let label = format!(
        "{} Report: {} to {}",
        kind.display_name(),
        stats.start_date,
        stats.end_date
    );
    let y = canvas.cursor.y();
    canvas.text(&label, MARGIN, y - 5.0, 13.0, COLOR_BLACK, true);
    canvas.text(
        &format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M")),
        MARGIN,
        y - 11.0,
        9.0,
        COLOR_GRAY,
        false,
    );
    canvas.cursor.advance(PERIOD_BAND + SECTION_GAP / 2.0);
}

fn draw_tiles(canvas: &mut PdfCanvas, stats: &ReportStatistics) {
    let tiles = [
        ("Total Appointments", stats.total_appointments, COLOR_TILE_TOTAL),
        ("Completed", stats.completed_appointments, COLOR_TILE_COMPLETED),
        ("Cancelled", stats.cancelled_appointments, COLOR_TILE_CANCELLED),
        ("Pending", stats.status_wise.pending, COLOR_TILE_PENDING),
    ];

    let width = column_width(CONTENT_WIDTH, tiles.len(), TILE_GAP);
    let bottom = canvas.cursor.band_bottom(TILE_HEIGHT);

    for (index, (label, value, color)) in tiles.iter().enumerate() {
        let x = column_x(MARGIN, index, width, TILE_GAP);
        canvas.fill_rect(x, bottom, width, TILE_HEIGHT, *color);
        canvas.text(label, x + 3.0, bottom + TILE_HEIGHT - 6.0, 9.0, COLOR_WHITE, false);
        canvas.text(&value.to_string(), x + 3.0, bottom + 4.0, 18.0, COLOR_WHITE, true);
    }

    canvas.cursor.advance(TILE_HEIGHT + SECTION_GAP);
}

fn draw_charts(canvas: &mut PdfCanvas, charts: [(&str, &ChartSnapshot); 2]) -> ReportResult<()> {
    let width = column_width(CONTENT_WIDTH, charts.len(), CHART_GAP);

    let title_y = canvas.cursor.y() - 5.0;
    for (index, (title, _)) in charts.iter().enumerate() {
        let x = column_x(MARGIN, index, width, CHART_GAP);
        canvas.text(title, x, title_y, 11.0, COLOR_BLACK, true);
    }
    canvas.cursor.advance(CHART_TITLE_BAND);

    let mut band_height: f32 = 0.0;
    for (index, (_, snapshot)) in charts.iter().enumerate() {
        let fitted = fit_image(snapshot.width, snapshot.height, width, CHART_MAX_HEIGHT);
        let x = column_x(MARGIN, index, width, CHART_GAP);
        canvas.image(snapshot, x, canvas.cursor.band_bottom(fitted.height), fitted.dpi)?;
        band_height = band_height.max(fitted.height);
    }

    canvas.cursor.advance(band_height + SECTION_GAP);
    Ok(())
}

fn draw_table_header(canvas: &mut PdfCanvas) {
    let bottom = canvas.cursor.band_bottom(TABLE_ROW_HEIGHT);
    canvas.fill_rect(MARGIN, bottom, CONTENT_WIDTH, TABLE_ROW_HEIGHT, COLOR_LIGHT_GRAY);

    let mut x = MARGIN + 1.0;
    for (header, width) in TABLE_COLUMNS {
        canvas.text(header, x, bottom + 1.5, TABLE_FONT_SIZE, COLOR_BLACK, true);
        x += width;
    }
    canvas.cursor.advance(TABLE_ROW_HEIGHT);
}

fn draw_detail_table(canvas: &mut PdfCanvas, stats: &ReportStatistics) {
    let y = canvas.cursor.y();
    canvas.text("Appointment Details", MARGIN, y - 5.0, 12.0, COLOR_BLACK, true);
    canvas.cursor.advance(CHART_TITLE_BAND);

    if stats.detailed_data.is_empty() {
        let y = canvas.cursor.y();
        canvas.text("No appointments in this period.", MARGIN, y - 4.0, 9.0, COLOR_GRAY, false);
        canvas.cursor.advance(TABLE_ROW_HEIGHT + SECTION_GAP);
        return;
    }

    draw_table_header(canvas);

    for record in &stats.detailed_data {
        if !canvas.cursor.fits(TABLE_ROW_HEIGHT + FOOTER_BAND) {
            canvas.new_page();
            draw_table_header(canvas);
        }

        let cells = [
            record.date.as_str(),
            record.patient_name.as_str(),
            record.gender.as_str(),
            record.status.as_str(),
            record.appointment_type.as_str(),
            record.diagnosis.as_deref().unwrap_or("-"),
        ];

        let bottom = canvas.cursor.band_bottom(TABLE_ROW_HEIGHT);
        let mut x = MARGIN + 1.0;
        for (cell, (_, width)) in cells.iter().zip(TABLE_COLUMNS) {
            let text = fit_text(cell, width - 2.0, TABLE_FONT_SIZE);
            canvas.text(&text, x, bottom + 1.5, TABLE_FONT_SIZE, COLOR_BLACK, false);
            x += width;
        }
        canvas.cursor.advance(TABLE_ROW_HEIGHT);
    }

    canvas.cursor.advance(SECTION_GAP);
}

fn draw_footer(canvas: &mut PdfCanvas, generated_at: NaiveDateTime) {
    let footer = format!(
        "MediNexus appointment analytics - generated {}",
        generated_at.format("%Y-%m-%d %H:%M")
    );
    let size = 8.0;
    let y = canvas.cursor.y() - 5.0;
    canvas.text(&footer, centered_x(&footer, size, A4_WIDTH_MM), y, size, COLOR_GRAY, false);
    canvas.cursor.advance(FOOTER_BAND);
}

// ============================================================================
// Report Composition
// ============================================================================

/// Lay out the report around already rendered chart snapshots
pub(crate) fn compose_pdf(
    kind: ReportKind,
    stats: &ReportStatistics,
    gender_chart: &ChartSnapshot,
    status_chart: &ChartSnapshot,
    include_details: bool,
    generated_at: NaiveDateTime,
) -> ReportResult<Vec<u8>> {
    let title = format!("{} Appointment Report", kind.display_name());
    let mut canvas = PdfCanvas::new(&title)?;

    draw_header(&mut canvas, &title);
    draw_period(&mut canvas, kind, stats, generated_at);
    draw_tiles(&mut canvas, stats);
    draw_charts(
        &mut canvas,
        [("Gender Distribution", gender_chart), ("Status Distribution", status_chart)],
    )?;

    if include_details {
        draw_detail_table(&mut canvas, stats);
    }

    if !canvas.cursor.fits(FOOTER_BAND) {
        canvas.new_page();
    }
    draw_footer(&mut canvas, generated_at);

    tracing::debug!("Composed {} page PDF for {} to {}", canvas.pages, stats.start_date, stats.end_date);
    canvas.finish()
}

/// Render both charts, then compose the document
pub fn render_pdf(
    kind: ReportKind,
    stats: &ReportStatistics,
    include_details: bool,
    generated_at: NaiveDateTime,
) -> ReportResult<Vec<u8>> {
    let series = chart_data(Some(stats));
    let gender_chart = render_chart("Gender", &series.gender_series)?;
    let status_chart = render_chart("Status", &series.status_series)?;

    compose_pdf(kind, stats, &gender_chart, &status_chart, include_details, generated_at)
}

/// Render the report fetched for `period` and write it into `dir`.
/// Nothing is written if rendering fails.
pub fn export_pdf(
    dir: &Path,
    period: &ReportPeriod,
    stats: &ReportStatistics,
    include_details: bool,
) -> ReportResult<ExportedFile> {
    let generated_at = chrono::Local::now().naive_local();
    let bytes = render_pdf(period.kind, stats, include_details, generated_at)?;
    write_export(dir, &pdf_file_name(period), PDF_MIME_TYPE, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{normalize, AppointmentRecord, GenderWise, StatusWise};
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn snapshot(width: u32, height: u32) -> ChartSnapshot {
        let img = ::image::RgbImage::from_pixel(width, height, ::image::Rgb([200, 200, 255]));
        let mut png = Vec::new();
        ::image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut png), ::image::ImageFormat::Png)
            .unwrap();
        ChartSnapshot { png, width, height }
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    fn week() -> ReportPeriod {
        ReportPeriod::weekly(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
    }

    fn stats_with_rows(rows: usize) -> ReportStatistics {
        let period = week();
        ReportStatistics {
            total_appointments: rows as u64,
            detailed_data: (0..rows)
                .map(|i| AppointmentRecord {
                    date: "2024-03-05".to_string(),
                    patient_name: format!("Patient {}", i),
                    ..Default::default()
                })
                .collect(),
            ..ReportStatistics::empty(&period)
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(pdf_file_name(&week()), "appointment-report-weekly-2024-03-04-2024-03-10.pdf");
        assert_eq!(
            pdf_file_name(&ReportPeriod::monthly(2023, 12).unwrap()),
            "appointment-report-monthly-2023-12-01-2023-12-31.pdf"
        );
    }

    #[test]
    fn test_render_pdf_with_charts() {
        let stats = ReportStatistics {
            total_appointments: 10,
            gender_wise: GenderWise { male: 4, female: 5, other: 1 },
            status_wise: StatusWise { pending: 1, confirmed: 2, completed: 6, cancelled: 1 },
            ..stats_with_rows(3)
        };
        let bytes = render_pdf(ReportKind::Weekly, &stats, true, generated_at()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_pdf_for_empty_report() {
        let bytes = render_pdf(ReportKind::Monthly, &stats_with_rows(0), false, generated_at()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_export_writes_under_period_name() {
        let dir = tempfile::tempdir().unwrap();
        let raw = serde_json::from_value(serde_json::json!({
            "totalAppointments": 2,
            "startDate": "../../escaped",
            "endDate": "2024-03-10T23:59:59.999Z"
        }))
        .unwrap();
        let stats = normalize(raw, &week());

        let exported = export_pdf(dir.path(), &week(), &stats, false).unwrap();
        assert_eq!(exported.file_name, "appointment-report-weekly-2024-03-04-2024-03-10.pdf");
        assert_eq!(exported.path.parent(), Some(dir.path()));
        let written = std::fs::read(&exported.path).unwrap();
        assert_eq!(written.len(), exported.bytes);
        assert!(written.starts_with(b"%PDF"));
    }

    #[test]
    fn test_export_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the export directory should be
        let blocked = dir.path().join("exports");
        std::fs::write(&blocked, "x").unwrap();

        let result = export_pdf(&blocked, &week(), &stats_with_rows(2), true);
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&blocked).unwrap(), "x");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_compose_summary_pdf() {
        let bytes = compose_pdf(
            ReportKind::Weekly,
            &stats_with_rows(0),
            &snapshot(80, 60),
            &snapshot(80, 60),
            false,
            generated_at(),
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_compose_long_detail_table() {
        let bytes = compose_pdf(
            ReportKind::Monthly,
            &stats_with_rows(120),
            &snapshot(80, 60),
            &snapshot(60, 80),
            true,
            generated_at(),
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_fit_text_truncates_long_cells() {
        assert_eq!(fit_text("short", 30.0, 7.5), "short");
        let cut = fit_text(&"x".repeat(200), 20.0, 7.5);
        assert!(cut.ends_with("..."));
        assert!(cut.chars().count() < 200);
    }
}
