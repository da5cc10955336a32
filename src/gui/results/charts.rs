use eframe::egui::{
    self,
    Align2,
    Color32,
    FontId,
    Pos2,
    Rect,
    Sense,
    Stroke,
};

use crate::{
    core::SentimentLabel,
    gui::theme::Theme,
    report::LabelCounts,
};

const CHART_HEIGHT: f32 = 200.0;
const AXIS_MARGIN: f32 = 24.0;
const GROUP_GAP: f32 = 0.3;
const LABEL_FONT_SIZE: f32 = 12.0;

struct Bar {
    value: usize,
    color: Color32,
    tooltip: String,
}

/// Draws groups of vertical bars sharing one scale, with the group name under each group.
fn bar_chart(ui: &mut egui::Ui, groups: &[(String, Vec<Bar>)]) {
    let width = ui.available_width().max(200.0);
    let (rect, response) = ui.allocate_exact_size(egui::vec2(width, CHART_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);
    let text_color = ui.visuals().text_color();
    let axis_color = ui.visuals().weak_text_color();

    let plot = Rect::from_min_max(
        Pos2::new(rect.left() + AXIS_MARGIN, rect.top() + AXIS_MARGIN),
        Pos2::new(rect.right() - 4.0, rect.bottom() - AXIS_MARGIN),
    );
    painter.line_segment([plot.left_bottom(), plot.right_bottom()], Stroke::new(1.0, axis_color));
    painter.line_segment([plot.left_bottom(), plot.left_top()], Stroke::new(1.0, axis_color));

    let max_value = groups.iter().flat_map(|(_, bars)| bars.iter().map(|b| b.value)).max();
    let Some(max_value) = max_value.filter(|v| *v > 0) else {
        painter.text(
            plot.center(),
            Align2::CENTER_CENTER,
            "No data",
            FontId::proportional(LABEL_FONT_SIZE),
            axis_color,
        );
        return;
    };

    painter.text(
        Pos2::new(plot.left() - 4.0, plot.top()),
        Align2::RIGHT_CENTER,
        max_value.to_string(),
        FontId::proportional(LABEL_FONT_SIZE),
        axis_color,
    );

    let group_width = plot.width() / groups.len().max(1) as f32;
    let mut hovered: Option<&str> = None;

    for (group_index, (name, bars)) in groups.iter().enumerate() {
        let group_left = plot.left() + group_index as f32 * group_width;
        let inner_left = group_left + group_width * GROUP_GAP / 2.0;
        let bar_width = group_width * (1.0 - GROUP_GAP) / bars.len().max(1) as f32;

        for (bar_index, bar) in bars.iter().enumerate() {
            let height = plot.height() * bar.value as f32 / max_value as f32;
            let left = inner_left + bar_index as f32 * bar_width;
            let bar_rect = Rect::from_min_max(
                Pos2::new(left + 1.0, plot.bottom() - height),
                Pos2::new(left + bar_width - 1.0, plot.bottom()),
            );
            painter.rect_filled(bar_rect, 2.0, bar.color);

            if bar.value > 0 {
                painter.text(
                    bar_rect.center_top() - egui::vec2(0.0, 2.0),
                    Align2::CENTER_BOTTOM,
                    bar.value.to_string(),
                    FontId::proportional(LABEL_FONT_SIZE),
                    text_color,
                );
            }

            if response.hover_pos().is_some_and(|pos| bar_rect.expand(2.0).contains(pos)) {
                hovered = Some(bar.tooltip.as_str());
            }
        }

        painter.text(
            Pos2::new(group_left + group_width / 2.0, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            name,
            FontId::proportional(LABEL_FONT_SIZE),
            text_color,
        );
    }

    if let Some(tooltip) = hovered {
        response.on_hover_text(tooltip.to_string());
    }
}

/// Count of each label across all results.
pub fn distribution_chart(ui: &mut egui::Ui, theme: &Theme, counts: &LabelCounts) {
    let ctx = ui.ctx().clone();
    let groups: Vec<(String, Vec<Bar>)> = counts
        .iter()
        .map(|(label, value)| {
            let bar = Bar {
                value,
                color: theme.sentiment_color(&ctx, label),
                tooltip: format!("{}: {}", label, value),
            };
            (format!("{} {}", label.icon(), label), vec![bar])
        })
        .collect();

    bar_chart(ui, &groups);
}

/// Label counts grouped by label, one bar per source.
pub fn comparison_chart(ui: &mut egui::Ui, theme: &Theme, by_source: &[(String, LabelCounts)]) {
    let ctx = ui.ctx().clone();

    let groups: Vec<(String, Vec<Bar>)> = SentimentLabel::ALL
        .iter()
        .map(|label| {
            let bars = by_source
                .iter()
                .enumerate()
                .map(|(index, (source, counts))| Bar {
                    value: counts.get(*label),
                    color: theme.series_color(&ctx, index),
                    tooltip: format!("{} – {}: {}", source, label, counts.get(*label)),
                })
                .collect();
            (label.to_string(), bars)
        })
        .collect();

    bar_chart(ui, &groups);

    ui.horizontal_wrapped(|ui| {
        for (index, (source, _)) in by_source.iter().enumerate() {
            ui.label(egui::RichText::new("■").color(theme.series_color(&ctx, index)));
            ui.label(source.as_str());
            ui.add_space(8.0);
        }
    });
}
