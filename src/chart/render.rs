use std::io::Cursor;
use std::path::Path;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::FontTransform;

use super::error::RenderError;
use crate::readings::{Reading, ReadingSet};

const CHART_WIDTH_PX: u32 = 1000;
const CHART_HEIGHT_PX: u32 = 560;
const TICK_FORMAT: &str = "%Y-%m-%d %H:%M";

struct ChartStyle;

impl ChartStyle {
    const MARGIN: i32 = 16;
    const FONT_FAMILY: &'static str = "sans-serif";
    const CAPTION_FONT_SIZE: i32 = 26;
    const TICK_FONT_SIZE: i32 = 13;
    const LEGEND_FONT_SIZE: i32 = 15;
    const X_LABEL_AREA_SIZE: u32 = 130;
    const Y_LABEL_AREA_SIZE: u32 = 56;
    const X_LABEL_COUNT: usize = 10;
    const Y_LABEL_COUNT: usize = 8;
    const LINE_WIDTH: u32 = 2;
    const POINT_RADIUS: i32 = 3;
    const LEGEND_SWATCH_PX: i32 = 20;
    const LEGEND_ALPHA: f64 = 0.85;
    const Y_PADDING_RATIO: f64 = 0.05;
    const SINGLE_POINT_PADDING_SECS: f64 = 60.0;
    const BACKGROUND: RGBColor = WHITE;
    const TEMPERATURE_LINE: RGBColor = RGBColor(255, 140, 0);
    const HUMIDITY_LINE: RGBColor = BLUE;
}

struct Series {
    label: &'static str,
    color: RGBColor,
    value: fn(&Reading) -> f64,
}

const SERIES: [Series; 2] = [
    Series {
        label: "Temperature (°C)",
        color: ChartStyle::TEMPERATURE_LINE,
        value: temperature,
    },
    Series {
        label: "Humidity (%)",
        color: ChartStyle::HUMIDITY_LINE,
        value: humidity,
    },
];

fn temperature(reading: &Reading) -> f64 {
    reading.temperature
}

fn humidity(reading: &Reading) -> f64 {
    reading.humidity
}

/// Renders and writes the chart, replacing any file already at `path`.
/// Returns the number of bytes written.
pub(super) fn write_chart(set: &ReadingSet, path: &Path) -> Result<usize, RenderError> {
    let png_bytes = render_chart_png(set)?;
    std::fs::write(path, &png_bytes).map_err(|source| RenderError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(png_bytes.len())
}

pub(super) fn render_chart_png(set: &ReadingSet) -> Result<Vec<u8>, RenderError> {
    let width = CHART_WIDTH_PX;
    let height = CHART_HEIGHT_PX;
    let timezone = set.timezone();
    let mut rgb_buffer = vec![255u8; width as usize * height as usize * 3];

    {
        let drawing_area =
            BitMapBackend::with_buffer(&mut rgb_buffer, (width, height)).into_drawing_area();
        drawing_area
            .fill(&ChartStyle::BACKGROUND)
            .map_err(|error| RenderError::from_drawing("background fill", error))?;

        let (first, last) = set.time_span();
        let mut x_start = epoch_seconds(first);
        let mut x_end = epoch_seconds(last);
        if x_start == x_end {
            x_start -= ChartStyle::SINGLE_POINT_PADDING_SECS;
            x_end += ChartStyle::SINGLE_POINT_PADDING_SECS;
        }

        let (low, high) = set.value_bounds();
        let padding = ((high - low) * ChartStyle::Y_PADDING_RATIO).max(1.0);
        let (y_min, y_max) = (low - padding, high + padding);

        let mut chart = ChartBuilder::on(&drawing_area)
            .margin(ChartStyle::MARGIN)
            .caption(
                "Temperature and Humidity Report",
                (ChartStyle::FONT_FAMILY, ChartStyle::CAPTION_FONT_SIZE),
            )
            .x_label_area_size(ChartStyle::X_LABEL_AREA_SIZE)
            .y_label_area_size(ChartStyle::Y_LABEL_AREA_SIZE)
            .build_cartesian_2d(x_start..x_end, y_min..y_max)
            .map_err(|error| RenderError::from_drawing("chart build", error))?;

        let tick_formatter = |seconds: &f64| format_tick(*seconds, timezone);
        chart
            .configure_mesh()
            .x_labels(ChartStyle::X_LABEL_COUNT)
            .y_labels(ChartStyle::Y_LABEL_COUNT)
            .x_label_formatter(&tick_formatter)
            .x_label_style(
                (ChartStyle::FONT_FAMILY, ChartStyle::TICK_FONT_SIZE)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_desc(format!("Date/Time ({})", timezone.name()))
            .y_desc("Value")
            .draw()
            .map_err(|error| RenderError::from_drawing("mesh draw", error))?;

        for series in &SERIES {
            let color = series.color;
            let points: Vec<(f64, f64)> = set
                .readings()
                .iter()
                .map(|reading| (epoch_seconds(reading.timestamp_utc), (series.value)(reading)))
                .collect();

            chart
                .draw_series(LineSeries::new(
                    points.iter().copied(),
                    color.stroke_width(ChartStyle::LINE_WIDTH),
                ))
                .map_err(|error| RenderError::from_drawing("series draw", error))?
                .label(series.label)
                .legend(move |(x, y)| {
                    PathElement::new(
                        vec![(x, y), (x + ChartStyle::LEGEND_SWATCH_PX, y)],
                        color.stroke_width(ChartStyle::LINE_WIDTH),
                    )
                });

            chart
                .draw_series(
                    points
                        .iter()
                        .map(|point| Circle::new(*point, ChartStyle::POINT_RADIUS, color.filled())),
                )
                .map_err(|error| RenderError::from_drawing("marker draw", error))?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font((ChartStyle::FONT_FAMILY, ChartStyle::LEGEND_FONT_SIZE))
            .background_style(WHITE.mix(ChartStyle::LEGEND_ALPHA))
            .border_style(BLACK)
            .draw()
            .map_err(|error| RenderError::from_drawing("legend draw", error))?;

        drawing_area
            .present()
            .map_err(|error| RenderError::from_drawing("present", error))?;
    }

    let rgb_image = RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| RenderError::PngEncoding("image buffer conversion failed".to_string()))?;
    let mut output = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb_image)
        .write_to(&mut output, ImageFormat::Png)
        .map_err(|error| RenderError::PngEncoding(error.to_string()))?;

    Ok(output.into_inner())
}

fn epoch_seconds(timestamp: DateTime<Utc>) -> f64 {
    timestamp.timestamp_millis() as f64 / 1000.0
}

fn format_tick(seconds: f64, timezone: Tz) -> String {
    let millis = (seconds * 1000.0).round() as i64;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|timestamp| timestamp.with_timezone(&timezone).format(TICK_FORMAT).to_string())
        .unwrap_or_default()
}
