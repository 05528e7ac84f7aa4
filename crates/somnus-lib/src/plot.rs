use crate::detect::LikelihoodPoint;
use crate::signal::SignalSeries;
use serde::{Deserialize, Serialize};

/// One rendered sample of a visualization curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    pub width: f32,
    pub dash: Option<[f32; 2]>,
    pub color: Color,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Color(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<ChartPoint>,
    pub style: Style,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Series {
    Line(LineSeries),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub x: Axis,
    pub y: Axis,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<Option<String>>) -> Self {
        Self {
            title: title.into(),
            x: Axis { label: None },
            y: Axis { label: None },
            series: Vec::new(),
        }
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }
}

/// Bucket-decimate to at most `max_points`; inputs at or under the cap pass
/// through unchanged.
pub fn decimate_points<T: Copy>(points: &[T], max_points: usize) -> Vec<T> {
    if max_points == 0 || points.len() <= max_points {
        return points.to_vec();
    }
    let bucket_size = points.len() as f64 / max_points as f64;
    let mut result = Vec::with_capacity(max_points);
    for i in 0..max_points {
        let start = (i as f64 * bucket_size).floor() as usize;
        if start >= points.len() {
            break;
        }
        result.push(points[start]);
    }
    result
}

/// Down-sample the raw signal to a bounded (time, value) curve. Time stamps
/// come from each sample's index in the full sequence, so decimation never
/// compresses the time axis.
pub fn signal_points(series: &SignalSeries, max_points: usize) -> Vec<ChartPoint> {
    let dt = 1.0 / series.fs.max(1.0);
    let points: Vec<ChartPoint> = series
        .data
        .iter()
        .enumerate()
        .map(|(i, value)| ChartPoint {
            time: i as f64 * dt,
            value: *value,
        })
        .collect();
    decimate_points(&points, max_points)
}

pub fn figure_from_signal(
    title: &str,
    series: &SignalSeries,
    max_points: usize,
    color: u32,
) -> Figure {
    let mut fig = Figure::new(Some(title.into()));
    fig.x.label = Some("time (s)".into());
    fig.add_series(Series::Line(LineSeries {
        name: title.into(),
        points: signal_points(series, max_points),
        style: Style {
            width: 1.4,
            dash: None,
            color: Color(color),
        },
    }));
    fig
}

/// The per-window likelihood curve is already bounded by window count; no
/// further resampling is needed.
pub fn figure_from_likelihood(points: &[LikelihoodPoint], color: u32) -> Figure {
    let mut fig = Figure::new(Some("Apnea likelihood".into()));
    fig.x.label = Some("time (s)".into());
    fig.y.label = Some("probability".into());
    fig.add_series(Series::Line(LineSeries {
        name: "likelihood".into(),
        points: points
            .iter()
            .map(|point| ChartPoint {
                time: point.time,
                value: point.probability,
            })
            .collect(),
        style: Style {
            width: 2.0,
            dash: None,
            color: Color(color),
        },
    }));
    fig
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_inputs_pass_through_unchanged() {
        let points: Vec<ChartPoint> = (0..100)
            .map(|i| ChartPoint {
                time: i as f64,
                value: 0.0,
            })
            .collect();
        let reduced = decimate_points(&points, 5000);
        assert_eq!(reduced.len(), 100);
    }

    #[test]
    fn long_inputs_respect_the_cap() {
        let points: Vec<ChartPoint> = (0..12_000)
            .map(|i| ChartPoint {
                time: i as f64,
                value: 0.0,
            })
            .collect();
        let reduced = decimate_points(&points, 5000);
        assert_eq!(reduced.len(), 5000);
    }

    #[test]
    fn counts_just_over_the_cap_stay_bounded() {
        let points = vec![0.0f64; 5001];
        assert_eq!(decimate_points(&points, 5000).len(), 5000);
    }

    #[test]
    fn signal_points_keep_true_time_stamps() {
        let series = SignalSeries {
            fs: 250.0,
            data: (0..20_000).map(|i| i as f64).collect(),
        };
        let reduced = signal_points(&series, 5000);
        assert_eq!(reduced.len(), 5000);
        assert_eq!(reduced[0].time, 0.0);
        // The last kept sample keeps its original sequence offset.
        let last = reduced.last().unwrap();
        assert!((last.time - last.value / 250.0).abs() < 1e-12);
        assert!(last.time > 79.0);
    }

    #[test]
    fn likelihood_figure_carries_one_point_per_window() {
        let curve: Vec<LikelihoodPoint> = (0..4)
            .map(|i| LikelihoodPoint {
                time: i as f64,
                probability: 0.25 * i as f64,
            })
            .collect();
        let fig = figure_from_likelihood(&curve, 0xFF0077);
        let Series::Line(line) = &fig.series[0];
        assert_eq!(line.points.len(), 4);
        assert_eq!(line.points[3].value, 0.75);
    }
}
