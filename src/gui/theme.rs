use eframe::egui::{
    self,
    epaint::Shadow,
    style::{
        Selection,
        WidgetVisuals,
        Widgets,
    },
    Color32,
    RichText,
    Stroke,
    Visuals,
};

use crate::core::SentimentLabel;

#[derive(Clone)]
pub struct Theme {
    dark: ThemeDetails,
    light: ThemeDetails,
}

impl Default for Theme {
    fn default() -> Self {
        Self::nord()
    }
}

impl Theme {
    pub fn nord() -> Self {
        Theme { dark: ThemeDetails::nord(), light: ThemeDetails::nord_light() }
    }

    fn details(&self, ctx: &egui::Context) -> &ThemeDetails {
        if ctx.style().visuals.dark_mode {
            &self.dark
        } else {
            &self.light
        }
    }

    pub fn heading(&self, ctx: &egui::Context, content: &str) -> RichText {
        RichText::new(content).color(self.details(ctx).purple).strong()
    }

    pub fn muted(&self, ctx: &egui::Context, content: &str) -> RichText {
        RichText::new(content).color(self.details(ctx).comment)
    }

    pub fn red(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).red
    }

    pub fn orange(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).orange
    }

    pub fn cyan(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).cyan
    }

    pub fn sentiment_color(&self, ctx: &egui::Context, label: SentimentLabel) -> Color32 {
        self.details(ctx).sentiment_color(label)
    }

    /// Distinct colors for chart series, cycling through the accents and then lighter tints.
    pub fn series_color(&self, ctx: &egui::Context, index: usize) -> Color32 {
        let d = self.details(ctx);
        let accents = [d.cyan, d.purple, d.orange, d.green, d.yellow, d.red];
        let base = accents[index % accents.len()];
        let round = (index / accents.len()) as f32;
        blend_colors(base, d.foreground, (round * 0.3).min(0.8))
    }

    /// Icon and name of a label, tinted with its color.
    pub fn sentiment_text(&self, ctx: &egui::Context, label: SentimentLabel) -> RichText {
        RichText::new(format!("{} {}", label.icon(), label))
            .color(self.sentiment_color(ctx, label))
            .strong()
    }
}

#[derive(Clone)]
pub struct ThemeDetails {
    background: Color32,
    foreground: Color32,
    selection: Color32,
    comment: Color32,
    red: Color32,
    orange: Color32,
    yellow: Color32,
    green: Color32,
    purple: Color32,
    cyan: Color32,
    background_darker: Color32,
    background_dark: Color32,
    background_light: Color32,
    background_lighter: Color32,
}

impl ThemeDetails {
    //Palette from https://www.nordtheme.com/docs/colors-and-palettes
    fn nord() -> Self {
        Self {
            background: Color32::from_rgb(46, 52, 64),
            foreground: Color32::from_rgb(236, 239, 244),
            selection: Color32::from_rgb(67, 76, 94),
            comment: Color32::from_rgb(129, 140, 160),
            red: Color32::from_rgb(191, 97, 106),
            orange: Color32::from_rgb(208, 135, 112),
            yellow: Color32::from_rgb(235, 203, 139),
            green: Color32::from_rgb(163, 190, 140),
            purple: Color32::from_rgb(180, 142, 173),
            cyan: Color32::from_rgb(136, 192, 208),
            background_darker: Color32::from_rgb(36, 41, 51),
            background_dark: Color32::from_rgb(41, 46, 57),
            background_light: Color32::from_rgb(59, 66, 82),
            background_lighter: Color32::from_rgb(76, 86, 106),
        }
    }

    fn nord_light() -> Self {
        Self {
            background: Color32::from_rgb(236, 239, 244),
            foreground: Color32::from_rgb(46, 52, 64),
            selection: Color32::from_rgb(216, 222, 233),
            comment: Color32::from_rgb(97, 110, 136),
            red: Color32::from_rgb(176, 74, 84),
            orange: Color32::from_rgb(196, 114, 88),
            yellow: Color32::from_rgb(196, 150, 60),
            green: Color32::from_rgb(104, 146, 86),
            purple: Color32::from_rgb(142, 100, 138),
            cyan: Color32::from_rgb(70, 130, 160),
            background_darker: Color32::from_rgb(216, 222, 233),
            background_dark: Color32::from_rgb(229, 233, 240),
            background_light: Color32::from_rgb(242, 244, 248),
            background_lighter: Color32::from_rgb(255, 255, 255),
        }
    }

    fn sentiment_color(&self, label: SentimentLabel) -> Color32 {
        match label {
            SentimentLabel::Positive => self.green,
            SentimentLabel::Neutral => self.yellow,
            SentimentLabel::Negative => self.red,
        }
    }
}

pub fn set_theme(ctx: &egui::Context, theme: &Theme) {
    set_theme_variant(ctx, &theme.dark, true);
    set_theme_variant(ctx, &theme.light, false);
}

pub fn apply_dark_mode(ctx: &egui::Context, dark_mode: bool) {
    ctx.set_theme(if dark_mode { egui::Theme::Dark } else { egui::Theme::Light });
}

pub fn blend_colors(color_a: Color32, color_b: Color32, t: f32) -> Color32 {
    let blend_channel = |a: u8, b: u8| ((1.0 - t) * (a as f32) + t * (b as f32)).round() as u8;
    Color32::from_rgba_unmultiplied(
        blend_channel(color_a.r(), color_b.r()),
        blend_channel(color_a.g(), color_b.g()),
        blend_channel(color_a.b(), color_b.b()),
        blend_channel(color_a.a(), color_b.a()),
    )
}

fn widget(
    base: WidgetVisuals,
    bg_fill: Color32,
    weak_bg_fill: Color32,
    stroke: Color32,
    text: Color32,
) -> WidgetVisuals {
    WidgetVisuals {
        bg_fill,
        weak_bg_fill,
        bg_stroke: Stroke { color: stroke, ..base.bg_stroke },
        fg_stroke: Stroke { color: text, ..base.fg_stroke },
        ..base
    }
}

fn set_theme_variant(ctx: &egui::Context, theme: &ThemeDetails, is_dark: bool) {
    let (default, variant) = match is_dark {
        true => (Visuals::dark(), egui::Theme::Dark),
        false => (Visuals::light(), egui::Theme::Light),
    };
    let w = &default.widgets;

    ctx.set_visuals_of(
        variant,
        Visuals {
            dark_mode: is_dark,
            widgets: Widgets {
                noninteractive: widget(
                    w.noninteractive,
                    theme.background,
                    theme.background_lighter,
                    theme.background_dark,
                    theme.foreground,
                ),
                inactive: widget(
                    w.inactive,
                    theme.background_light,
                    theme.background_lighter,
                    theme.background_dark,
                    theme.foreground,
                ),
                hovered: widget(
                    w.hovered,
                    theme.selection,
                    theme.background_lighter,
                    theme.cyan,
                    theme.foreground,
                ),
                active: widget(
                    w.active,
                    theme.selection,
                    theme.background_light,
                    theme.cyan,
                    theme.foreground,
                ),
                open: widget(
                    w.open,
                    theme.background_dark,
                    theme.background_lighter,
                    theme.purple,
                    theme.foreground,
                ),
            },
            selection: Selection {
                bg_fill: theme.selection,
                stroke: Stroke { color: theme.foreground, ..default.selection.stroke },
            },
            hyperlink_color: theme.cyan,
            faint_bg_color: if is_dark { theme.background_darker } else { theme.background_light },
            extreme_bg_color: theme.background_darker,
            code_bg_color: theme.background_dark,
            error_fg_color: theme.red,
            warn_fg_color: theme.orange,
            window_shadow: Shadow { color: theme.background_darker, ..default.window_shadow },
            window_fill: theme.background,
            window_stroke: Stroke { color: theme.background_light, ..default.window_stroke },
            panel_fill: theme.background_dark,
            popup_shadow: Shadow { color: theme.background_dark, ..default.popup_shadow },
            collapsing_header_frame: true,
            ..default.clone()
        },
    );

    ctx.all_styles_mut(|style| {
        style.interaction.tooltip_delay = 0.0;
        style.interaction.show_tooltips_only_when_still = false;
    });
}
