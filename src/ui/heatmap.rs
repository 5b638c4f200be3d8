use eframe::egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2, pos2, vec2};

use insight_dash::color::{contrasting_text, viridis};
use insight_dash::data::aggregate::LiftPivot;

use super::charts::empty_chart;

const CELL: Vec2 = vec2(64.0, 28.0);
const COLORBAR_WIDTH: f32 = 16.0;

/// Position of `v` inside `[lo, hi]`; the midpoint when the range is degenerate.
pub fn normalize(v: f64, lo: f64, hi: f64) -> f64 {
    let range = hi - lo;
    if range.abs() < f64::EPSILON {
        0.5
    } else {
        (v - lo) / range
    }
}

/// Annotated lift heatmap: antecedents down, consequents across.
pub fn lift_heatmap(ui: &mut Ui, pivot: &LiftPivot) {
    let Some((lo, hi)) = pivot.value_range() else {
        empty_chart(ui, 200.0);
        return;
    };

    let font = FontId::proportional(11.0);
    let text_color = ui.visuals().text_color();
    let row_label_w = label_width(ui, &pivot.rows, &font);
    let col_label_h = label_width(ui, &pivot.columns, &font).min(160.0);

    let grid = vec2(CELL.x * pivot.columns.len() as f32, CELL.y * pivot.rows.len() as f32);
    let desired = vec2(
        row_label_w + grid.x + 3.0 * COLORBAR_WIDTH + 48.0,
        grid.y + col_label_h + 8.0,
    );

    horizontal_scroll(ui, |ui: &mut Ui| {
        let (response, painter) = ui.allocate_painter(desired, Sense::hover());
        let origin = response.rect.min + vec2(row_label_w, 0.0);

        for (r, row) in pivot.rows.iter().enumerate() {
            painter.text(
                pos2(origin.x - 6.0, origin.y + (r as f32 + 0.5) * CELL.y),
                Align2::RIGHT_CENTER,
                row,
                font.clone(),
                text_color,
            );
            for c in 0..pivot.columns.len() {
                let rect = Rect::from_min_size(
                    origin + vec2(c as f32 * CELL.x, r as f32 * CELL.y),
                    CELL,
                );
                match pivot.get(r, c) {
                    Some(lift) => {
                        let fill = viridis(normalize(lift, lo, hi));
                        painter.rect_filled(rect.shrink(0.5), 0.0, fill);
                        painter.text(
                            rect.center(),
                            Align2::CENTER_CENTER,
                            format!("{lift:.2}"),
                            font.clone(),
                            contrasting_text(fill),
                        );
                    }
                    None => {
                        painter.rect_stroke(
                            rect.shrink(0.5),
                            0.0,
                            Stroke::new(0.5, Color32::from_gray(90)),
                            eframe::egui::StrokeKind::Inside,
                        );
                    }
                }
            }
        }

        // Column labels, written downwards under the grid.
        for (c, column) in pivot.columns.iter().enumerate() {
            let anchor = pos2(origin.x + (c as f32 + 0.5) * CELL.x, origin.y + grid.y + 4.0);
            let galley = painter.layout_no_wrap(column.clone(), font.clone(), text_color);
            painter.add(
                eframe::egui::epaint::TextShape::new(
                    anchor + vec2(galley.size().y / 2.0, 0.0),
                    galley,
                    text_color,
                )
                .with_angle(std::f32::consts::FRAC_PI_2),
            );
        }

        colorbar(&painter, pos2(origin.x + grid.x + COLORBAR_WIDTH, origin.y), grid.y.max(CELL.y), lo, hi, &font, text_color);

        if let Some(pos) = response.hover_pos() {
            let rel = pos - origin;
            if rel.x >= 0.0 && rel.y >= 0.0 {
                let (c, r) = ((rel.x / CELL.x) as usize, (rel.y / CELL.y) as usize);
                if let (Some(row), Some(column), Some(lift)) =
                    (pivot.rows.get(r), pivot.columns.get(c), pivot.get(r, c))
                {
                    response.on_hover_text(format!("{row} → {column}\nlift {lift:.3}"));
                }
            }
        }
    });
}

fn horizontal_scroll(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui)) {
    eframe::egui::ScrollArea::horizontal()
        .id_salt("lift_heatmap")
        .show(ui, add_contents);
}

fn label_width(ui: &Ui, labels: &[String], font: &FontId) -> f32 {
    labels
        .iter()
        .map(|l| {
            ui.painter()
                .layout_no_wrap(l.clone(), font.clone(), Color32::WHITE)
                .size()
                .x
        })
        .fold(0.0, f32::max)
        + 12.0
}

fn colorbar(
    painter: &eframe::egui::Painter,
    top_left: Pos2,
    height: f32,
    lo: f64,
    hi: f64,
    font: &FontId,
    text_color: Color32,
) {
    const STEPS: usize = 32;
    let step_h = height / STEPS as f32;
    for k in 0..STEPS {
        // Top of the bar is the highest lift.
        let t = 1.0 - (k as f64 + 0.5) / STEPS as f64;
        let rect = Rect::from_min_size(
            top_left + vec2(0.0, k as f32 * step_h),
            vec2(COLORBAR_WIDTH, step_h + 0.5),
        );
        painter.rect_filled(rect, 0.0, viridis(t));
    }
    for (value, y) in [(hi, top_left.y), (lo, top_left.y + height)] {
        painter.text(
            pos2(top_left.x + COLORBAR_WIDTH + 4.0, y),
            Align2::LEFT_CENTER,
            format!("{value:.2}"),
            font.clone(),
            text_color,
        );
    }
}
