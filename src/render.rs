//! Presentation of simulation results.
//!
//! Simulators return plain data; each result type turns itself into one or
//! more [`Figure`]s, and a [`ChartSurface`] draws them. Two surfaces ship
//! with the crate:
//!
//! - [`TextChart`]: horizontal bars in a terminal.
//! - [`JsonChart`]: one JSON document per figure, for external plotting.

use std::io::Write;

use serde::Serialize;

use crate::error::RenderError;

/// A labelled series of `(x, y)` points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    /// Largest y value, or 0 for an empty series.
    fn max_y(&self) -> f64 {
        self.points
            .iter()
            .map(|&(_, y)| y)
            .filter(|y| y.is_finite())
            .fold(0.0, f64::max)
    }
}

/// An empirical bar series, optionally overlaid with a theoretical curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub empirical: Series,
    pub theoretical: Option<Series>,
}

impl Figure {
    pub fn new(title: impl Into<String>, empirical: Series) -> Self {
        Self {
            title: title.into(),
            empirical,
            theoretical: None,
        }
    }

    pub fn with_theoretical(mut self, theoretical: Series) -> Self {
        self.theoretical = Some(theoretical);
        self
    }
}

/// Anything that can display a [`Figure`].
pub trait ChartSurface {
    fn draw(&mut self, figure: &Figure) -> Result<(), RenderError>;

    /// Draws every figure in order, stopping at the first failure.
    fn draw_all(&mut self, figures: &[Figure]) -> Result<(), RenderError> {
        for figure in figures {
            self.draw(figure)?;
        }
        Ok(())
    }
}

// ============================================================================
// Text chart
// ============================================================================

/// Renders figures as horizontal text bars.
///
/// Each row shows the x value, a bar proportional to the empirical y value,
/// the y value itself and, when the theoretical series lines up with the
/// empirical one point for point, the theoretical value. A theoretical
/// series on a different grid is printed as its own block.
///
/// # Examples
/// ```
/// use u_montecarlo::render::{ChartSurface, Figure, Series, TextChart};
///
/// let figure = Figure::new("demo", Series::new("counts", vec![(0.0, 1.0), (1.0, 2.0)]));
/// let mut chart = TextChart::new(Vec::new(), 4);
/// chart.draw(&figure).unwrap();
/// let text = String::from_utf8(chart.into_inner()).unwrap();
/// assert!(text.contains("####"));
/// ```
pub struct TextChart<W: Write> {
    out: W,
    width: usize,
    max_rows: usize,
}

impl<W: Write> TextChart<W> {
    /// Creates a chart whose longest bar is `width` characters.
    pub fn new(out: W, width: usize) -> Self {
        Self {
            out,
            width: width.max(1),
            max_rows: 120,
        }
    }

    /// Caps the number of printed rows; longer series are thinned to every
    /// k-th point.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bar(&self, y: f64, scale: f64) -> String {
        let len = if scale > 0.0 && y.is_finite() && y > 0.0 {
            ((y / scale) * self.width as f64).round() as usize
        } else {
            0
        };
        "#".repeat(len.min(self.width))
    }

    fn stride(&self, len: usize) -> usize {
        len.div_ceil(self.max_rows).max(1)
    }

    fn write_series(&mut self, series: &Series, overlay: Option<&Series>) -> Result<(), RenderError> {
        let scale = series.max_y().max(overlay.map_or(0.0, Series::max_y));
        let stride = self.stride(series.points.len());
        match overlay {
            Some(o) => writeln!(self.out, "  [{}] vs [{}]", series.label, o.label)?,
            None => writeln!(self.out, "  [{}]", series.label)?,
        }
        if stride > 1 {
            writeln!(self.out, "  (every {stride}th point shown)")?;
        }
        for (i, &(x, y)) in series.points.iter().enumerate().step_by(stride) {
            let bar = self.bar(y, scale);
            let width = self.width;
            write!(self.out, "{:>10} | {bar:<width$} {}", format_value(x), format_value(y))?;
            if let Some(&(_, t)) = overlay.and_then(|o| o.points.get(i)) {
                write!(self.out, "  ({})", format_value(t))?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }
}

impl<W: Write> ChartSurface for TextChart<W> {
    fn draw(&mut self, figure: &Figure) -> Result<(), RenderError> {
        writeln!(self.out, "{}", figure.title)?;
        let aligned = figure.theoretical.as_ref().filter(|t| {
            t.points.len() == figure.empirical.points.len()
                && t.points
                    .iter()
                    .zip(&figure.empirical.points)
                    .all(|(a, b)| a.0 == b.0)
        });
        self.write_series(&figure.empirical, aligned)?;
        if let (Some(theoretical), None) = (&figure.theoretical, aligned) {
            self.write_series(theoretical, None)?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Integers print without a fractional part; everything else with four
/// significant decimals.
fn format_value(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else if v.is_finite() && v.abs() >= 1e-3 {
        format!("{v:.4}")
    } else {
        format!("{v:.3e}")
    }
}

// ============================================================================
// JSON chart
// ============================================================================

/// Writes each figure as one line of JSON.
pub struct JsonChart<W: Write> {
    out: W,
}

impl<W: Write> JsonChart<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartSurface for JsonChart<W> {
    fn draw(&mut self, figure: &Figure) -> Result<(), RenderError> {
        serde_json::to_writer(&mut self.out, figure)?;
        writeln!(self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_figure() -> Figure {
        Figure::new(
            "Galton board",
            Series::new("balls", vec![(0.0, 1.0), (1.0, 2.0), (2.0, 1.0)]),
        )
        .with_theoretical(Series::new(
            "binomial",
            vec![(0.0, 1.0), (1.0, 2.0), (2.0, 1.0)],
        ))
    }

    fn render_text(figure: &Figure, width: usize) -> String {
        let mut chart = TextChart::new(Vec::new(), width);
        chart.draw(figure).unwrap();
        String::from_utf8(chart.into_inner()).unwrap()
    }

    #[test]
    fn test_text_chart_scales_bars() {
        let text = render_text(&sample_figure(), 10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Galton board");
        assert!(lines[1].contains("[balls] vs [binomial]"));
        assert!(lines[2].contains("| #####      1  (1)"));
        assert!(lines[3].contains("##########"));
        assert!(lines[3].ends_with("2  (2)"));
    }

    #[test]
    fn test_text_chart_separate_theoretical_grid() {
        let figure = Figure::new("zipf", Series::new("observed", vec![(1.0, 0.5), (3.0, 0.5)]))
            .with_theoretical(Series::new("model", vec![(1.0, 0.6), (2.0, 0.3), (3.0, 0.1)]));
        let text = render_text(&figure, 10);
        assert!(text.contains("[observed]"));
        assert!(text.contains("[model]"));
        assert!(!text.contains(" vs "));
    }

    #[test]
    fn test_text_chart_thins_long_series() {
        let points: Vec<(f64, f64)> = (0..1000).map(|i| (i as f64, 1.0)).collect();
        let figure = Figure::new("long", Series::new("flat", points));
        let mut chart = TextChart::new(Vec::new(), 5).with_max_rows(100);
        chart.draw(&figure).unwrap();
        let text = String::from_utf8(chart.into_inner()).unwrap();
        assert!(text.contains("every 10th point shown"));
        assert_eq!(text.lines().filter(|l| l.contains(" | ")).count(), 100);
    }

    #[test]
    fn test_text_chart_empty_series() {
        let figure = Figure::new("empty", Series::new("nothing", Vec::new()));
        let text = render_text(&figure, 10);
        assert!(text.starts_with("empty\n"));
    }

    #[test]
    fn test_json_chart_one_line_per_figure() {
        let mut chart = JsonChart::new(Vec::new());
        chart.draw_all(&[sample_figure(), sample_figure()]).unwrap();
        let text = String::from_utf8(chart.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["title"], "Galton board");
        assert_eq!(value["empirical"]["points"][1][1], 2.0);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(0.25), "0.2500");
        assert_eq!(format_value(1.5e-5), "1.500e-5");
    }
}
