use eframe::egui::{Color32, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, Points,
};

use insight_dash::color::{ColorMap, generate_palette};
use insight_dash::data::aggregate::{Distribution, GroupTotal, MonthlyTotal, ScatterPoint, quantile};

/// Placeholder shown instead of a chart with zero rows.
pub fn empty_chart(ui: &mut Ui, height: f32) {
    ui.allocate_ui(eframe::egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.weak("No data for the current filters");
        });
    });
}

/// Axis formatter that shows category labels at integer positions only.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let i = mark.value.round();
        if (mark.value - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        labels.get(i as usize).cloned().unwrap_or_default()
    }
}

fn base_plot(id: &str, height: f32) -> Plot {
    Plot::new(id)
        .height(height)
        .allow_scroll(false)
        .allow_drag(true)
        .allow_zoom(true)
        .allow_boxed_zoom(true)
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Vertical bars, one per group, each in its own colour.
pub fn category_bars(ui: &mut Ui, id: &str, groups: &[GroupTotal], x_label: &str, y_label: &str) {
    if groups.is_empty() {
        empty_chart(ui, 300.0);
        return;
    }
    let colors = ColorMap::new(groups.iter().map(|g| g.key.as_str()));
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.total)
                .name(&g.key)
                .width(0.7)
                .fill(colors.color_for(&g.key))
        })
        .collect();
    let labels = groups.iter().map(|g| g.key.clone()).collect();

    base_plot(id, 320.0)
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(y_label));
        });
}

/// Horizontal bars, highest first at the top.
pub fn ranking_bars(ui: &mut Ui, id: &str, ranking: &[GroupTotal], value_label: &str) {
    if ranking.is_empty() {
        empty_chart(ui, 300.0);
        return;
    }
    let n = ranking.len();
    let bars: Vec<Bar> = ranking
        .iter()
        .enumerate()
        .map(|(i, g)| Bar::new((n - 1 - i) as f64, g.total).name(&g.key).width(0.7))
        .collect();
    let labels = ranking.iter().rev().map(|g| g.key.clone()).collect();

    base_plot(id, (n as f32 * 22.0).clamp(200.0, 600.0))
        .x_axis_label(value_label)
        .y_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .horizontal()
                    .color(Color32::from_rgb(99, 110, 250))
                    .name(value_label),
            );
        });
}

/// Sales per month as bars with a trend line through their tops.
pub fn monthly_bars(ui: &mut Ui, months: &[MonthlyTotal]) {
    if months.is_empty() {
        empty_chart(ui, 300.0);
        return;
    }
    let bars: Vec<Bar> = months
        .iter()
        .enumerate()
        .map(|(i, m)| Bar::new(i as f64, m.total).name(&m.label).width(0.8))
        .collect();
    let trend: PlotPoints = months
        .iter()
        .enumerate()
        .map(|(i, m)| [i as f64, m.total])
        .collect();
    let labels = months.iter().map(|m| m.label.clone()).collect();

    base_plot("monthly_sales", 360.0)
        .x_axis_label("Month")
        .y_axis_label("Amount")
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(Color32::from_rgb(99, 110, 250))
                    .name("Sales"),
            );
            plot_ui.line(Line::new(trend).color(Color32::LIGHT_RED).width(1.5).name("Trend"));
        });
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

/// One box per group with Tukey whiskers; outliers drawn as points.
pub fn distribution_boxes(ui: &mut Ui, id: &str, groups: &[Distribution], x_label: &str, y_label: &str) {
    if groups.is_empty() {
        empty_chart(ui, 300.0);
        return;
    }
    let palette = generate_palette(groups.len());
    let boxes: Vec<BoxElem> = groups
        .iter()
        .zip(&palette)
        .enumerate()
        .map(|(i, (g, &color))| {
            let s = g.spread;
            BoxElem::new(
                i as f64,
                BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
            )
            .name(&g.key)
            .box_width(0.5)
            .fill(color.gamma_multiply(0.4))
            .stroke(eframe::egui::Stroke::new(1.5, color))
        })
        .collect();
    let outliers: PlotPoints = groups
        .iter()
        .enumerate()
        .flat_map(|(i, g)| g.outliers.iter().map(move |&v| [i as f64, v]))
        .collect();
    let labels = groups.iter().map(|g| g.key.clone()).collect();

    base_plot(id, 360.0)
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes).name(y_label));
            plot_ui.points(Points::new(outliers).radius(2.0).color(Color32::GRAY).name("Outliers"));
        });
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

const SIZE_CLASSES: usize = 5;

/// Marker radius class for a sales value, from the quintiles of all sales.
pub fn size_class(sales: f64, cutoffs: &[f64]) -> usize {
    cutoffs.iter().take_while(|&&c| sales > c).count()
}

/// Quantity against profit, marker size growing with sales.
pub fn quantity_profit_scatter(ui: &mut Ui, points: &[ScatterPoint]) {
    if points.is_empty() {
        empty_chart(ui, 300.0);
        return;
    }
    let mut sales: Vec<f64> = points.iter().map(|p| p.sales).collect();
    sales.sort_by(f64::total_cmp);
    let cutoffs: Vec<f64> = (1..SIZE_CLASSES)
        .filter_map(|k| quantile(&sales, k as f64 / SIZE_CLASSES as f64))
        .collect();

    let mut classes: Vec<Vec<[f64; 2]>> = vec![Vec::new(); SIZE_CLASSES];
    for p in points {
        classes[size_class(p.sales, &cutoffs)].push([p.quantity as f64, p.profit]);
    }

    base_plot("quantity_profit", 420.0)
        .legend(Legend::default())
        .x_axis_label("Quantity")
        .y_axis_label("Profit")
        .show(ui, |plot_ui| {
            for (class, pts) in classes.into_iter().enumerate() {
                if pts.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(pts)
                        .radius(2.0 + 1.5 * class as f32)
                        .color(Color32::from_rgba_unmultiplied(99, 110, 250, 140))
                        .name(format!("Sales quintile {}", class + 1)),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_classes_follow_cutoffs() {
        let cutoffs = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(size_class(5.0, &cutoffs), 0);
        assert_eq!(size_class(10.0, &cutoffs), 0);
        assert_eq!(size_class(25.0, &cutoffs), 2);
        assert_eq!(size_class(1000.0, &cutoffs), 4);
        assert_eq!(size_class(3.0, &[]), 0);
    }
}
