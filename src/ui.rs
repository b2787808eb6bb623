//! Terminal rendering of the hop monitor.
//!
//! Paints the prompt line, the scene, the status line and the result
//! region. Scene coordinates are surface units; one terminal cell covers
//! [`CELL_WIDTH`] x [`CELL_HEIGHT`] of them.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::Frame;

use crate::input::TaskInput;
use crate::monitor::HopMonitor;
use crate::surface::{
    Rgb, Scene, Shape, BACKGROUND, CAPTION_OFFSET, CONNECTION, GLYPH_WIDTH, NODE_RADIUS, TEXT,
};

pub const PROMPT: &str = "your inquiry: ";
pub const CELL_WIDTH: f64 = GLYPH_WIDTH;
pub const CELL_HEIGHT: f64 = 14.0;
const RESULT_LINES: u16 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameAreas {
    pub input: Rect,
    pub canvas: Rect,
    pub status: Rect,
    pub result: Rect,
}

pub fn split(area: Rect) -> FrameAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(RESULT_LINES),
        ])
        .split(area);
    FrameAreas {
        input: chunks[0],
        canvas: chunks[1],
        status: chunks[2],
        result: chunks[3],
    }
}

/// Width of `area` in surface units.
pub fn canvas_width(area: Rect) -> f64 {
    f64::from(area.width) * CELL_WIDTH
}

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn base_style() -> Style {
    Style::default().fg(color(TEXT)).bg(color(BACKGROUND))
}

pub fn render(frame: &mut Frame<'_>, monitor: &HopMonitor) {
    let full = frame.area();
    let areas = split(full);

    frame.render_widget(Block::default().style(base_style()), full);
    render_input(frame, areas.input, monitor.input());
    render_scene(
        frame,
        areas.canvas,
        monitor.scene(),
        monitor.controller().surface_width(),
    );
    frame.render_widget(
        Paragraph::new(monitor.scene().status()).style(base_style()),
        areas.status,
    );
    frame.render_widget(
        Paragraph::new(monitor.scene().result())
            .style(base_style())
            .wrap(Wrap { trim: false }),
        areas.result,
    );
}

fn render_input(frame: &mut Frame<'_>, area: Rect, input: &TaskInput) {
    let text_style = if input.is_enabled() {
        base_style()
    } else {
        base_style().add_modifier(Modifier::DIM)
    };
    let line = Line::from(vec![
        Span::styled(PROMPT, base_style()),
        Span::styled(input.text().to_string(), text_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    if input.is_enabled() {
        let typed = (PROMPT.chars().count() + input.text().chars().count()) as u16;
        let x = area.x.saturating_add(typed).min(area.right().saturating_sub(1));
        frame.set_cursor_position((x, area.y));
    }
}

fn render_scene(frame: &mut Frame<'_>, area: Rect, scene: &Scene, surface_width: f64) {
    let viewport_height = f64::from(area.height) * CELL_HEIGHT;
    let top = scene.viewport_top(viewport_height);
    // Scene y grows downwards, canvas y upwards.
    let flip = move |y: f64| viewport_height - (y - top);

    let canvas = Canvas::default()
        .background_color(color(BACKGROUND))
        .marker(Marker::Braille)
        .x_bounds([0.0, surface_width])
        .y_bounds([0.0, viewport_height])
        .paint(move |ctx| {
            for (from, to) in scene.connections() {
                ctx.draw(&CanvasLine {
                    x1: from.x,
                    y1: flip(from.y),
                    x2: to.x,
                    y2: flip(to.y),
                    color: color(CONNECTION),
                });
            }
            ctx.layer();
            for shape in scene.shapes() {
                if let Shape::Node { at, caption, .. } = shape {
                    ctx.draw(&Circle {
                        x: at.x,
                        y: flip(at.y),
                        radius: NODE_RADIUS,
                        color: color(shape.color()),
                    });
                    let half = caption.chars().count() as f64 * GLYPH_WIDTH / 2.0;
                    ctx.print(
                        at.x - half,
                        flip(at.y + CAPTION_OFFSET),
                        Span::styled(caption.clone(), Style::default().fg(color(TEXT))),
                    );
                }
            }
        });
    frame.render_widget(canvas, area);
}
