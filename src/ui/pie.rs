use std::f32::consts::TAU;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, Vec2};

use insight_dash::color::ColorMap;
use insight_dash::data::aggregate::GroupTotal;

use super::charts::empty_chart;

/// Longest arc drawn as one polygon; keeps every piece convex.
const MAX_WEDGE: f32 = TAU / 8.0;

/// A slice of the pie: label, share of the whole and angular extent.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub fraction: f64,
    pub start_angle: f32,
    pub end_angle: f32,
}

/// Lay out slices clockwise from 12 o'clock. Non-positive values get no slice.
pub fn layout_slices(groups: &[GroupTotal]) -> Vec<Slice> {
    let total: f64 = groups.iter().map(|g| g.total.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut angle = -TAU / 4.0;
    groups
        .iter()
        .filter(|g| g.total > 0.0)
        .map(|g| {
            let fraction = g.total / total;
            let start = angle;
            angle += fraction as f32 * TAU;
            Slice {
                label: g.key.clone(),
                value: g.total,
                fraction,
                start_angle: start,
                end_angle: angle,
            }
        })
        .collect()
}

fn wedge(center: Pos2, radius: f32, from: f32, to: f32) -> Vec<Pos2> {
    let steps = (((to - from) / 0.05).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for k in 0..=steps {
        let a = from + (to - from) * k as f32 / steps as f32;
        points.push(center + radius * Vec2::angled(a));
    }
    points
}

/// Pie chart with a legend listing each slice's share.
pub fn pie_chart(ui: &mut Ui, groups: &[GroupTotal]) {
    let slices = layout_slices(groups);
    if slices.is_empty() {
        empty_chart(ui, 260.0);
        return;
    }
    let colors = ColorMap::new(slices.iter().map(|s| s.label.as_str()));

    ui.horizontal(|ui: &mut Ui| {
        let size = ui.available_width().min(320.0).max(160.0);
        let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::hover());
        let center = response.rect.center();
        let radius = size * 0.45;

        for slice in &slices {
            let color = colors.color_for(&slice.label);
            let mut from = slice.start_angle;
            while from < slice.end_angle {
                let to = (from + MAX_WEDGE).min(slice.end_angle);
                painter.add(Shape::convex_polygon(
                    wedge(center, radius, from, to),
                    color,
                    Stroke::NONE,
                ));
                from = to;
            }
            // Slice borders.
            for a in [slice.start_angle, slice.end_angle] {
                painter.line_segment(
                    [center, center + radius * Vec2::angled(a)],
                    Stroke::new(1.0, Color32::WHITE),
                );
            }
            if slice.fraction >= 0.04 {
                let mid = (slice.start_angle + slice.end_angle) / 2.0;
                painter.text(
                    center + radius * 0.65 * Vec2::angled(mid),
                    Align2::CENTER_CENTER,
                    format!("{:.1}%", slice.fraction * 100.0),
                    FontId::proportional(12.0),
                    Color32::WHITE,
                );
            }
        }

        if let Some(pos) = response.hover_pos() {
            let offset = pos - center;
            if offset.length() <= radius {
                let mut angle = offset.angle();
                if angle < -TAU / 4.0 {
                    angle += TAU;
                }
                if let Some(slice) = slices
                    .iter()
                    .find(|s| s.start_angle <= angle && angle < s.end_angle)
                {
                    response.on_hover_text(format!(
                        "{}: {:.2} ({:.1}%)",
                        slice.label,
                        slice.value,
                        slice.fraction * 100.0
                    ));
                }
            }
        }

        egui::ScrollArea::vertical()
            .max_height(size)
            .show(ui, |ui: &mut Ui| {
                for slice in &slices {
                    ui.horizontal(|ui: &mut Ui| {
                        let (rect, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                        ui.painter().rect_filled(rect, 2.0, colors.color_for(&slice.label));
                        ui.label(format!("{}  {:.1}%", slice.label, slice.fraction * 100.0));
                    });
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(key: &str, total: f64) -> GroupTotal {
        GroupTotal {
            key: key.into(),
            total,
        }
    }

    #[test]
    fn slices_cover_the_circle() {
        let slices = layout_slices(&[group("Consumer", 50.0), group("Corporate", 30.0), group("Home Office", 20.0)]);
        assert_eq!(slices.len(), 3);
        assert!((slices[0].fraction - 0.5).abs() < 1e-12);
        let span = slices.last().unwrap().end_angle - slices[0].start_angle;
        assert!((span - TAU).abs() < 1e-4);
        for w in slices.windows(2) {
            assert_eq!(w[0].end_angle, w[1].start_angle);
        }
    }

    #[test]
    fn non_positive_totals_are_skipped() {
        assert!(layout_slices(&[]).is_empty());
        assert!(layout_slices(&[group("a", 0.0), group("b", -3.0)]).is_empty());
        assert_eq!(layout_slices(&[group("a", 2.0), group("b", -3.0)]).len(), 1);
    }
}
