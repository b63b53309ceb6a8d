use std::path::Path;

use common::{data::PanelData, stats::ViolinStats};
use eyre::{Result, eyre};
use plotters::{coord::Shift, prelude::*};

use crate::{
    geometry::{body_polygon, extrema_bar, markers},
    style::{ViolinStyle, pt_to_px},
};

/// Draws one row of violin panels into an SVG file
pub fn render_figure(
    filepath: &Path,
    size: (u32, u32),
    title: &str,
    panels: &[(PanelData, Vec<ViolinStats>)],
    style: &ViolinStyle,
) -> Result<()> {
    if panels.is_empty() {
        return Err(eyre!("Nothing to draw in {}", filepath.display()));
    }

    let root = SVGBackend::new(filepath, size).into_drawing_area();
    root.fill(&WHITE.mix(style.background_alpha))?;
    let body = root.titled(
        title,
        ("sans-serif", pt_to_px(style.suptitle_size))
            .into_font()
            .style(FontStyle::Bold),
    )?;

    let areas = body.split_evenly((1, panels.len()));
    for (area, (panel, stats)) in areas.iter().zip(panels) {
        draw_panel(area, panel, stats, style)?;
    }

    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    panel: &PanelData,
    stats: &[ViolinStats],
    style: &ViolinStyle,
) -> Result<()> {
    let (lo, hi) = panel.y_range;
    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", pt_to_px(style.title_size)))
        .margin(10)
        .x_label_area_size(10)
        .y_label_area_size(60)
        .build_cartesian_2d(0.5..(stats.len() as f64 + 0.5), lo..hi)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|y| format!("{y:.0}"))
        .y_desc(&style.y_label)
        .draw()?;

    let body_color = style.body_rgb();
    let line_color = style.line_rgb();

    for (i, violin) in stats.iter().enumerate() {
        let position = (i + 1) as f64;

        let outline = body_polygon(position, violin, style.widths, panel.y_range);
        if outline.len() >= 3 {
            let mut closed = outline.clone();
            closed.push(outline[0]);
            chart.draw_series(std::iter::once(Polygon::new(
                outline,
                body_color.mix(style.body_alpha).filled(),
            )))?;
            chart.draw_series(std::iter::once(PathElement::new(
                closed,
                body_color.stroke_width(1),
            )))?;
        }

        let lines = markers(position, violin, style, panel.y_range);
        chart.draw_series(
            lines
                .iter()
                .map(|m| PathElement::new(vec![(m.x0, m.y), (m.x1, m.y)], line_color.stroke_width(1))),
        )?;

        if style.show_extrema
            && let Some(bar) = extrema_bar(position, violin, panel.y_range)
        {
            chart.draw_series(std::iter::once(PathElement::new(
                bar.to_vec(),
                line_color.stroke_width(1),
            )))?;
        }
    }
    Ok(())
}
