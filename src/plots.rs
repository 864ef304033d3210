use std::ops::Range;
use std::path::{Path, PathBuf};

use ndarray::Array;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::full_palette;
use tracing::warn;

use crate::dataset::Dataset;
use crate::features::evaluate;
use crate::regression::{GradientDescentObserver, GradientDescentStep};

const COLORS: [RGBColor; 5] = [
    full_palette::BLUE,
    full_palette::RED,
    full_palette::GREEN,
    full_palette::CYAN,
    full_palette::BLACK,
];

const CURVE_POINTS: usize = 50;

pub fn plot_log_scale_data<DB>(
    data: &[f64],
    label: &str,
    drawing_area: &DrawingArea<DB, Shift>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let mut drawing_area = ChartBuilder::on(drawing_area);

    let MinMax { min, max } =
        find_max_min(data.iter().copied().filter(|&v| v > 0.)).unwrap_or(MinMax {
            min: 1e-12,
            max: 1.,
        });
    let (min, max) = if min < max {
        (min, max)
    } else {
        (min / 10., max * 10.)
    };

    let mut chart_context = drawing_area
        .caption(label, ("Arial", 20))
        .set_all_label_area_size(70)
        .margin(50)
        .build_cartesian_2d(0..data.len().max(1), (min..max).log_scale())?;

    chart_context
        .configure_mesh()
        .x_labels(10)
        .x_desc("Iteration")
        .y_labels(10)
        .y_desc(label)
        .y_label_formatter(&|y: &f64| format!("{:.1e}", y))
        .draw()?;

    let errors = LineSeries::new(
        data.iter()
            .enumerate()
            .filter(|(_, e)| **e > 0.)
            .map(|(i, &e)| (i, e)),
        BLUE.filled(),
    );

    chart_context.draw_series(errors)?;

    Ok(())
}

/// Scatter of `data` with `curve` drawn over it.
pub fn plot_scatter_with_curve<'a, DB>(
    data: impl Iterator<Item = (f64, f64)> + Clone,
    curve: &[(f64, f64)],
    caption: impl AsRef<str>,
    drawing_area: &'a DrawingArea<DB, Shift>,
) -> Result<
    ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    Box<dyn std::error::Error>,
>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let all_points = data.clone().chain(curve.iter().copied());
    let x_range = padded(find_max_min(all_points.clone().map(|(x, _)| x)));
    let y_range = padded(find_max_min(all_points.map(|(_, y)| y)));

    let mut drawing_area = ChartBuilder::on(drawing_area);

    let mut chart_context = drawing_area
        .caption(caption, ("Arial", 20))
        .set_all_label_area_size(70)
        .margin(50)
        .build_cartesian_2d(x_range, y_range)?;

    chart_context
        .configure_mesh()
        .x_labels(10)
        .x_desc("x")
        .y_labels(10)
        .y_desc("y")
        .draw()?;

    chart_context.draw_series(data.map(|(x, y)| Circle::new((x, y), 3, BLUE.filled())))?;
    chart_context.draw_series(LineSeries::new(curve.iter().copied(), RED.stroke_width(2)))?;

    Ok(chart_context)
}

/// Line chart with one labelled series per entry and a legend.
pub fn plot_series<DB>(
    series: &[(&str, Vec<(f64, f64)>)],
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    drawing_area: &DrawingArea<DB, Shift>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let points = series.iter().flat_map(|(_, points)| points.iter().copied());
    let x_range = padded(find_max_min(points.clone().map(|(x, _)| x)));
    let y_range = padded(find_max_min(points.map(|(_, y)| y)));

    let mut chart_builder = ChartBuilder::on(drawing_area);

    let mut chart_context = chart_builder
        .caption(caption, ("Arial", 20))
        .set_all_label_area_size(70)
        .margin(50)
        .build_cartesian_2d(x_range, y_range)?;

    chart_context
        .configure_mesh()
        .x_labels(10)
        .x_desc(x_desc)
        .y_labels(10)
        .y_desc(y_desc)
        .draw()?;

    for (i, (label, points)) in series.iter().enumerate() {
        let color = COLORS[i % COLORS.len()];

        chart_context
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart_context
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE)
        .draw()?;

    Ok(())
}

pub fn save_series_svg(
    path: impl AsRef<Path>,
    series: &[(&str, Vec<(f64, f64)>)],
    caption: &str,
    x_desc: &str,
    y_desc: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let drawing_area = SVGBackend::new(path.as_ref(), (1024, 768)).into_drawing_area();

    plot_series(series, caption, x_desc, y_desc, &drawing_area)?;

    drawing_area.present()?;

    Ok(())
}

/// Records gradient descent progress and renders the data, the current
/// regression curve and the cost per iteration.
pub struct GradientDescentTrace {
    data: Vec<(f64, f64)>,
    x_range: (f64, f64),
    costs: Vec<f64>,
    coefficients: Vec<f64>,
    frames: Option<(PathBuf, usize)>,
}

impl GradientDescentTrace {
    pub fn new(dataset: &Dataset) -> Self {
        let MinMax { min, max } =
            find_max_min(dataset.x().iter().copied()).unwrap_or(MinMax { min: 0., max: 1. });

        Self {
            data: dataset.points().collect(),
            x_range: (min, max),
            costs: Vec::new(),
            coefficients: Vec::new(),
            frames: None,
        }
    }

    /// Writes a frame into `dir` every `every` iterations.
    pub fn with_frames(mut self, dir: impl Into<PathBuf>, every: usize) -> Self {
        self.frames = Some((dir.into(), every.max(1)));
        self
    }

    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn curve(&self) -> Vec<(f64, f64)> {
        if self.coefficients.is_empty() {
            return Vec::new();
        }

        Array::linspace(self.x_range.0, self.x_range.1, CURVE_POINTS)
            .into_iter()
            .map(|x| (x, evaluate(&self.coefficients, x)))
            .collect()
    }

    pub fn draw<DB>(
        &self,
        drawing_area: &DrawingArea<DB, Shift>,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        DB: DrawingBackend,
        <DB as DrawingBackend>::ErrorType: 'static,
    {
        if let [fit_area, cost_area, ..] = drawing_area.split_evenly((1, 2)).as_slice() {
            let caption = format!(
                "iteration: {}, cost: {:.4}",
                self.costs.len(),
                self.costs.last().copied().unwrap_or(f64::NAN)
            );
            plot_scatter_with_curve(
                self.data.iter().copied(),
                &self.curve(),
                caption,
                fit_area,
            )?;
            plot_log_scale_data(&self.costs, "J(theta)", cost_area)?;
        }

        Ok(())
    }

    pub fn save_svg(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let drawing_area = SVGBackend::new(path.as_ref(), (1600, 700)).into_drawing_area();

        self.draw(&drawing_area)?;

        drawing_area.present()?;

        Ok(())
    }
}

impl GradientDescentObserver for GradientDescentTrace {
    fn on_iteration(&mut self, step: &GradientDescentStep<'_>) {
        self.costs.push(step.cost);
        self.coefficients = step.coefficients.iter().copied().collect();

        if let Some((dir, every)) = &self.frames {
            if step.iteration % every == 0 {
                let path = dir.join(format!("iteration_{:05}.svg", step.iteration + 1));
                if let Err(e) = self.save_svg(&path) {
                    warn!(path = %path.display(), "failed to render frame: {e}");
                }
            }
        }
    }
}

fn padded(min_max: Option<MinMax<f64>>) -> Range<f64> {
    match min_max {
        Some(MinMax { min, max }) if min < max => {
            let margin = (max - min) * 0.05;
            min - margin..max + margin
        }
        Some(MinMax { min, .. }) => min - 1.0..min + 1.0,
        None => 0.0..1.0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMax<T> {
    pub min: T,
    pub max: T,
}

pub fn find_max_min<T: std::cmp::PartialOrd + Copy>(
    mut data: impl Iterator<Item = T>,
) -> Option<MinMax<T>> {
    let init = data.next()?;
    let mut min_max = MinMax {
        min: init,
        max: init,
    };

    for x in data {
        min_max = MinMax {
            min: if x < min_max.min { x } else { min_max.min },
            max: if x > min_max.max { x } else { min_max.max },
        };
    }

    Some(min_max)
}
