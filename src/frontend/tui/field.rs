//! Pitch drawing.
//!
//! The canvas bounds come from the field transform, so zoom and fit move the
//! pitch exactly as they move the point a click is converted to.

use crate::config::FieldTransform;
use ratatui::{
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::canvas::{Canvas, Circle, Context, Line, Rectangle},
    Frame,
};

const PITCH_HALF_LENGTH: f64 = 52.5;
const PITCH_HALF_WIDTH: f64 = 34.0;
const CENTER_CIRCLE_R: f64 = 9.15;
const PENALTY_AREA_LENGTH: f64 = 16.5;
const PENALTY_AREA_HALF_WIDTH: f64 = 20.16;
const GOAL_AREA_LENGTH: f64 = 5.5;
const GOAL_AREA_HALF_WIDTH: f64 = 9.16;
const GOAL_DEPTH: f64 = 2.44;
const GOAL_HALF_WIDTH: f64 = 7.01;

const LINE_COLOR: Color = Color::White;
const FIELD_COLOR: Color = Color::Rgb(31, 120, 31);

/// Canvas bounds for `area`: x in meters, y in meters flipped so +y points down the screen
pub fn bounds(transform: &FieldTransform, area: Rect) -> ([f64; 2], [f64; 2]) {
    let left = transform.field_x(area.x as i32);
    let right = transform.field_x((area.x + area.width) as i32);
    let top = transform.field_y(area.y as i32);
    let bottom = transform.field_y((area.y + area.height) as i32);
    ([left, right], [-bottom, -top])
}

pub fn render(frame: &mut Frame, area: Rect, transform: &FieldTransform) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let (x_bounds, y_bounds) = bounds(transform, area);
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .background_color(FIELD_COLOR)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(draw_pitch);

    frame.render_widget(canvas, area);
}

fn line(ctx: &mut Context, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.draw(&Line {
        x1,
        y1,
        x2,
        y2,
        color: LINE_COLOR,
    });
}

fn rect(ctx: &mut Context, x: f64, y: f64, width: f64, height: f64) {
    ctx.draw(&Rectangle {
        x,
        y,
        width,
        height,
        color: LINE_COLOR,
    });
}

fn draw_pitch(ctx: &mut Context) {
    rect(
        ctx,
        -PITCH_HALF_LENGTH,
        -PITCH_HALF_WIDTH,
        PITCH_HALF_LENGTH * 2.0,
        PITCH_HALF_WIDTH * 2.0,
    );
    line(ctx, 0.0, -PITCH_HALF_WIDTH, 0.0, PITCH_HALF_WIDTH);
    ctx.draw(&Circle {
        x: 0.0,
        y: 0.0,
        radius: CENTER_CIRCLE_R,
        color: LINE_COLOR,
    });

    for sign in [-1.0, 1.0] {
        let goal_line = sign * PITCH_HALF_LENGTH;

        // Penalty area
        let inner = goal_line - sign * PENALTY_AREA_LENGTH;
        rect(
            ctx,
            goal_line.min(inner),
            -PENALTY_AREA_HALF_WIDTH,
            PENALTY_AREA_LENGTH,
            PENALTY_AREA_HALF_WIDTH * 2.0,
        );

        // Goal area
        let inner = goal_line - sign * GOAL_AREA_LENGTH;
        rect(
            ctx,
            goal_line.min(inner),
            -GOAL_AREA_HALF_WIDTH,
            GOAL_AREA_LENGTH,
            GOAL_AREA_HALF_WIDTH * 2.0,
        );

        // Goal
        let back = goal_line + sign * GOAL_DEPTH;
        rect(
            ctx,
            goal_line.min(back),
            -GOAL_HALF_WIDTH,
            GOAL_DEPTH,
            GOAL_HALF_WIDTH * 2.0,
        );
    }
}
