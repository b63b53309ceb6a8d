//! Shapes of a single violin in data coordinates.
//!
//! Violins sit at x positions `1..=n`. The body is the density mirrored around
//! the position and scaled so its widest point spans `widths`. Marker lines
//! (means, medians, quantiles, extrema) span half of that. Everything is clipped
//! to the panel's y range, since the chart does not clip for us.

use common::stats::ViolinStats;
use itertools::Itertools;

use crate::style::ViolinStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Mean,
    Median,
    Quantile,
    Extremum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub y: f64,
    pub x0: f64,
    pub x1: f64,
}

/// Half widths of the body at each density coordinate
pub fn half_widths(density: &[f64], widths: f64) -> Vec<f64> {
    let max = density.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        return vec![0.0; density.len()];
    }
    density.iter().map(|d| 0.5 * widths * d / max).collect()
}

fn interpolate(profile: &[(f64, f64)], y: f64) -> f64 {
    profile
        .iter()
        .tuple_windows()
        .find(|((y0, _), (y1, _))| *y0 <= y && y <= *y1)
        .map(|((y0, w0), (y1, w1))| {
            if y1 == y0 {
                *w0
            } else {
                w0 + (w1 - w0) * (y - y0) / (y1 - y0)
            }
        })
        .unwrap_or(0.0)
}

/// Restricts an ascending `(y, half_width)` profile to `[lo, hi]`, adding
/// interpolated points where the range cuts through it
pub fn clip_profile(profile: &[(f64, f64)], lo: f64, hi: f64) -> Vec<(f64, f64)> {
    let (Some(first), Some(last)) = (profile.first(), profile.last()) else {
        return Vec::new();
    };
    let (first, last) = (first.0, last.0);
    if hi < first || lo > last {
        return Vec::new();
    }

    let mut clipped = Vec::with_capacity(profile.len() + 2);
    if first <= lo {
        clipped.push((lo, interpolate(profile, lo)));
    }
    clipped.extend(profile.iter().copied().filter(|(y, _)| lo < *y && *y < hi));
    if hi <= last {
        clipped.push((hi, interpolate(profile, hi)));
    }
    clipped
}

/// Outline of the violin body at `position`, right side going up then left side going down
pub fn body_polygon(
    position: f64,
    stats: &ViolinStats,
    widths: f64,
    y_range: (f64, f64),
) -> Vec<(f64, f64)> {
    let profile = stats
        .coords
        .iter()
        .copied()
        .zip(half_widths(&stats.density, widths))
        .collect::<Vec<_>>();
    let clipped = clip_profile(&profile, y_range.0, y_range.1);

    clipped
        .iter()
        .map(|(y, w)| (position + w, *y))
        .chain(clipped.iter().rev().map(|(y, w)| (position - w, *y)))
        .collect()
}

pub fn markers(
    position: f64,
    stats: &ViolinStats,
    style: &ViolinStyle,
    y_range: (f64, f64),
) -> Vec<Marker> {
    let half = 0.25 * style.widths;
    let mut lines = Vec::new();
    if style.show_means {
        lines.push((MarkerKind::Mean, stats.mean));
    }
    if style.show_medians {
        lines.push((MarkerKind::Median, stats.median));
    }
    lines.extend(stats.quantiles.iter().map(|q| (MarkerKind::Quantile, *q)));
    if style.show_extrema {
        lines.push((MarkerKind::Extremum, stats.min));
        lines.push((MarkerKind::Extremum, stats.max));
    }

    lines
        .into_iter()
        .filter(|(_, y)| y_range.0 <= *y && *y <= y_range.1)
        .map(|(kind, y)| Marker {
            kind,
            y,
            x0: position - half,
            x1: position + half,
        })
        .collect()
}

/// Vertical bar between the extrema, clipped to the y range
pub fn extrema_bar(position: f64, stats: &ViolinStats, y_range: (f64, f64)) -> Option<[(f64, f64); 2]> {
    let lo = stats.min.max(y_range.0);
    let hi = stats.max.min(y_range.1);
    (lo < hi).then_some([(position, lo), (position, hi)])
}

/// Samples that fall outside the y range and are therefore not visible
pub fn count_outside(samples: &[f64], y_range: (f64, f64)) -> usize {
    samples
        .iter()
        .filter(|x| **x < y_range.0 || **x > y_range.1)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> ViolinStats {
        ViolinStats {
            coords: vec![50.0, 60.0, 70.0],
            density: vec![0.1, 0.4, 0.2],
            mean: 61.0,
            median: 60.0,
            quantiles: vec![52.0, 68.0],
            min: 50.0,
            max: 70.0,
        }
    }

    fn approx_points(a: &[(f64, f64)], b: &[(f64, f64)]) -> bool {
        a.len() == b.len()
            && a.iter()
                .zip(b)
                .all(|(p, q)| (p.0 - q.0).abs() < 1e-9 && (p.1 - q.1).abs() < 1e-9)
    }

    #[test]
    fn widest_point_spans_widths() {
        let hw = half_widths(&[0.1, 0.4, 0.2], 0.7);
        assert!(approx_points(
            &hw.iter().map(|w| (*w, 0.0)).collect::<Vec<_>>(),
            &[(0.0875, 0.0), (0.35, 0.0), (0.175, 0.0)]
        ));
        assert_eq!(half_widths(&[0.0, 0.0], 0.7), vec![0.0, 0.0]);
    }

    #[test]
    fn profile_inside_range_is_untouched() {
        let profile = [(50.0, 0.1), (60.0, 0.3), (70.0, 0.2)];
        assert_eq!(clip_profile(&profile, 40.0, 80.0), profile.to_vec());
    }

    #[test]
    fn profile_is_cut_at_both_limits() {
        let profile = [(50.0, 0.1), (60.0, 0.3), (70.0, 0.2)];
        let clipped = clip_profile(&profile, 55.0, 65.0);
        assert!(approx_points(
            &clipped,
            &[(55.0, 0.2), (60.0, 0.3), (65.0, 0.25)]
        ));
    }

    #[test]
    fn profile_outside_range_vanishes() {
        let profile = [(50.0, 0.1), (60.0, 0.3)];
        assert!(clip_profile(&profile, 61.0, 70.0).is_empty());
        assert!(clip_profile(&profile, 30.0, 49.0).is_empty());
        assert!(clip_profile(&[], 30.0, 49.0).is_empty());
    }

    #[test]
    fn body_is_mirrored_around_position() {
        let polygon = body_polygon(2.0, &stats(), 0.7, (40.0, 80.0));
        assert!(approx_points(
            &polygon,
            &[
                (2.0875, 50.0),
                (2.35, 60.0),
                (2.175, 70.0),
                (1.825, 70.0),
                (1.65, 60.0),
                (1.9125, 50.0),
            ]
        ));
    }

    #[test]
    fn body_is_clipped_to_axis_limit() {
        let polygon = body_polygon(1.0, &stats(), 0.7, (40.0, 65.0));
        let top = polygon.iter().map(|p| p.1).fold(f64::MIN, f64::max);
        assert_eq!(top, 65.0);
        assert_eq!(polygon.len(), 6);
    }

    #[test]
    fn markers_follow_style_and_range() {
        let style = ViolinStyle::default();
        let lines = markers(3.0, &stats(), &style, (55.0, 65.0));
        let kinds = lines.iter().map(|m| (m.kind, m.y)).collect::<Vec<_>>();
        // quantiles at 52 and 68 fall outside the range
        assert_eq!(
            kinds,
            vec![(MarkerKind::Mean, 61.0), (MarkerKind::Median, 60.0)]
        );
        assert!((lines[0].x0 - 2.825).abs() < 1e-9);
        assert!((lines[0].x1 - 3.175).abs() < 1e-9);

        let style = ViolinStyle {
            show_means: false,
            show_medians: false,
            show_extrema: true,
            quantiles: Vec::new(),
            ..ViolinStyle::default()
        };
        let stats = ViolinStats {
            quantiles: Vec::new(),
            ..stats()
        };
        let kinds = markers(1.0, &stats, &style, (40.0, 80.0))
            .into_iter()
            .map(|m| (m.kind, m.y))
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![(MarkerKind::Extremum, 50.0), (MarkerKind::Extremum, 70.0)]
        );
    }

    #[test]
    fn extrema_bar_is_clipped() {
        assert_eq!(
            extrema_bar(1.0, &stats(), (55.0, 80.0)),
            Some([(1.0, 55.0), (1.0, 70.0)])
        );
        assert_eq!(extrema_bar(1.0, &stats(), (75.0, 80.0)), None);
    }

    #[test]
    fn counts_hidden_samples() {
        assert_eq!(count_outside(&[49.0, 50.0, 60.0, 65.0, 66.0], (50.0, 65.0)), 2);
    }
}
