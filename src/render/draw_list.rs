use bevy::prelude::*;

use super::{Dash, Font, RectStyle, Renderer, TextAlign};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Rect {
        rect: Rect,
        color: Color,
        style: RectStyle,
        corner_radius: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    },
    Polygon {
        points: Vec<Vec2>,
        color: Color,
    },
    DottedPolyline {
        points: Vec<Vec2>,
        color: Color,
        dash: Dash,
    },
    Text {
        text: String,
        font: Font,
        color: Color,
        bounds: Rect,
        align: TextAlign,
    },
}

/// One frame of draw calls, recorded in order for a presenter to replay.
#[derive(Resource, Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
    surface: Vec2,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            commands: Vec::new(),
            surface: Vec2::new(width, height),
        }
    }

    pub fn begin_frame(&mut self) {
        self.commands.clear();
    }

    /// Every text string recorded this frame.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Renderer for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color, style: RectStyle, corner_radius: f32) {
        self.commands.push(DrawCommand::Rect {
            rect,
            color,
            style,
            corner_radius,
        });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line { from, to, color, width });
    }

    fn draw_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn draw_dotted_polyline(&mut self, points: &[Vec2], color: Color, dash: Dash) {
        self.commands.push(DrawCommand::DottedPolyline {
            points: points.to_vec(),
            color,
            dash,
        });
    }

    fn draw_text(&mut self, text: &str, font: Font, color: Color, bounds: Rect, align: TextAlign) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            font,
            color,
            bounds,
            align,
        });
    }

    fn resize(&mut self, width: f32, height: f32) -> Vec2 {
        self.surface = Vec2::new(width.max(1.0), height.max(1.0));
        self.surface
    }

    fn size(&self) -> Vec2 {
        self.surface
    }
}
