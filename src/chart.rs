// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Bar chart rendering for daily commit histograms.
//!
//! Rendering sits behind [`ChartRenderer`] so callers can swap the image
//! backend. [`SvgBarChart`] builds a self-contained SVG document with one bar
//! per bucket and rotated date labels on every `label_step`-th tick.

use std::{borrow::Cow, fmt::Write as _};

use crate::{error::Error, models::DailyCommitHistogram};

/// Media type of the documents produced by [`SvgBarChart`].
pub const SVG_MEDIA_TYPE: &str = "image/svg+xml";

/// Input handed to a [`ChartRenderer`].
#[derive(Debug, Clone, Copy,)]
pub struct ChartRequest<'a,>
{
    pub title:      &'a str,
    pub x_label:    &'a str,
    pub y_label:    &'a str,
    pub histogram:  &'a DailyCommitHistogram,
    /// Every `label_step`-th bar gets a date label, starting at the first.
    pub label_step: usize,
}

/// Encoded image returned by a [`ChartRenderer`].
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct RenderedChart
{
    pub media_type: String,
    pub data:       Vec<u8,>,
}

/// Turns a histogram into an image.
pub trait ChartRenderer
{
    /// Renders `request` into an encoded image.
    ///
    /// # Errors
    ///
    /// Implementations report encoding failures as [`Error`].
    fn render(&self, request: &ChartRequest<'_,>,) -> Result<RenderedChart, Error,>;
}

/// SVG bar chart with fixed canvas dimensions.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct SvgBarChart
{
    pub width:     u32,
    pub height:    u32,
    pub bar_color: String,
}

impl Default for SvgBarChart
{
    fn default() -> Self
    {
        Self {
            width:     1200,
            height:    600,
            bar_color: "#0366d6".to_owned(),
        }
    }
}

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 120.0;
const Y_TICKS: u64 = 5;
const FONT: &str = "'Segoe UI', 'Helvetica Neue', sans-serif";

impl ChartRenderer for SvgBarChart
{
    fn render(&self, request: &ChartRequest<'_,>,) -> Result<RenderedChart, Error,>
    {
        if request.label_step == 0 {
            return Err(Error::invalid_argument("label step must be positive",),);
        }

        Ok(RenderedChart {
            media_type: SVG_MEDIA_TYPE.to_owned(),
            data:       self.build_svg(request,).into_bytes(),
        },)
    }
}

impl SvgBarChart
{
    fn build_svg(&self, request: &ChartRequest<'_,>,) -> String
    {
        let width = f64::from(self.width,);
        let height = f64::from(self.height,);
        let plot_width = (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0,);
        let plot_height = (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0,);
        let baseline = MARGIN_TOP + plot_height;

        let buckets = &request.histogram.buckets;
        let peak = buckets.iter().map(|bucket| bucket.count,).max().unwrap_or(0,);
        let y_max = nice_ceiling(peak,);
        let slot = plot_width / buckets.len().max(1,) as f64;
        let bar_width = slot * 0.8;

        let mut buffer = String::with_capacity(512 + buckets.len() * 160,);
        let _ = writeln!(
            buffer,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" role=\"img\" aria-label=\"{title}\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            title = escape_xml(request.title),
            w = self.width,
            h = self.height,
        );
        let _ = writeln!(buffer, "  <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>");
        let _ = writeln!(
            buffer,
            "  <text x=\"{:.1}\" y=\"32\" text-anchor=\"middle\" font-family=\"{FONT}\" font-size=\"20\" fill=\"#24292f\">{}</text>",
            width / 2.0,
            escape_xml(request.title),
        );

        for tick in 0..=Y_TICKS {
            let value = y_max * tick / Y_TICKS;
            let y = baseline - plot_height * tick as f64 / Y_TICKS as f64;
            let _ = writeln!(
                buffer,
                "  <line x1=\"{MARGIN_LEFT:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#d0d7de\" stroke-width=\"1\"/>",
                MARGIN_LEFT + plot_width,
            );
            let _ = writeln!(
                buffer,
                "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-family=\"{FONT}\" font-size=\"12\" fill=\"#57606a\">{value}</text>",
                MARGIN_LEFT - 8.0,
                y + 4.0,
            );
        }

        for (index, bucket,) in buckets.iter().enumerate() {
            let x = MARGIN_LEFT + slot * index as f64 + (slot - bar_width) / 2.0;
            let bar_height = if y_max == 0 { 0.0 } else { plot_height * bucket.count as f64 / y_max as f64 };
            let _ = writeln!(
                buffer,
                "  <rect x=\"{x:.1}\" y=\"{:.1}\" width=\"{bar_width:.1}\" height=\"{bar_height:.1}\" fill=\"{}\"><title>{}: {}</title></rect>",
                baseline - bar_height,
                escape_xml(&self.bar_color),
                bucket.date,
                bucket.count,
            );

            if index % request.label_step == 0 {
                let label_x = x + bar_width / 2.0;
                let label_y = baseline + 16.0;
                let _ = writeln!(
                    buffer,
                    "  <text x=\"{label_x:.1}\" y=\"{label_y:.1}\" text-anchor=\"end\" transform=\"rotate(-45 {label_x:.1} {label_y:.1})\" font-family=\"{FONT}\" font-size=\"11\" fill=\"#57606a\">{}</text>",
                    bucket.date.format("%Y-%m-%d"),
                );
            }
        }

        let _ = writeln!(
            buffer,
            "  <line x1=\"{MARGIN_LEFT:.1}\" y1=\"{baseline:.1}\" x2=\"{:.1}\" y2=\"{baseline:.1}\" stroke=\"#24292f\" stroke-width=\"1\"/>",
            MARGIN_LEFT + plot_width,
        );
        let _ = writeln!(
            buffer,
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-family=\"{FONT}\" font-size=\"14\" fill=\"#24292f\">{}</text>",
            MARGIN_LEFT + plot_width / 2.0,
            height - 16.0,
            escape_xml(request.x_label),
        );
        let _ = writeln!(
            buffer,
            "  <text x=\"20\" y=\"{y:.1}\" text-anchor=\"middle\" transform=\"rotate(-90 20 {y:.1})\" font-family=\"{FONT}\" font-size=\"14\" fill=\"#24292f\">{}</text>",
            escape_xml(request.y_label),
            y = MARGIN_TOP + plot_height / 2.0,
        );
        buffer.push_str("</svg>\n",);
        buffer
    }
}

/// Smallest multiple of [`Y_TICKS`] not below `peak`, at least `Y_TICKS`.
fn nice_ceiling(peak: u64,) -> u64
{
    peak.max(1,).div_ceil(Y_TICKS,) * Y_TICKS
}

fn escape_xml(value: &str,) -> Cow<'_, str,>
{
    if value.chars().any(|character| matches!(character, '&' | '<' | '>' | '\"' | '\''),) {
        let mut escaped = String::with_capacity(value.len(),);
        for character in value.chars() {
            match character {
                '&' => escaped.push_str("&amp;",),
                '<' => escaped.push_str("&lt;",),
                '>' => escaped.push_str("&gt;",),
                '\"' => escaped.push_str("&quot;",),
                '\'' => escaped.push_str("&apos;",),
                other => escaped.push(other,),
            }
        }
        Cow::Owned(escaped,)
    } else {
        Cow::Borrowed(value,)
    }
}
