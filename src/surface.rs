//! Drawing surface.
//!
//! The controller draws through [`Surface`]; [`Scene`] keeps what was drawn
//! as a display list that the terminal UI paints from.

use hopwatch_tree_layout::Position;

use crate::labels::node_caption;

/// 24-bit color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BACKGROUND: Rgb = Rgb(0x00, 0x00, 0x00);
pub const TEXT: Rgb = Rgb(0x00, 0xff, 0x00);
pub const ACTIVE_NODE: Rgb = Rgb(0x00, 0xff, 0x00);
pub const INACTIVE_NODE: Rgb = Rgb(0x00, 0x44, 0x00);
pub const CONNECTION: Rgb = Rgb(0x00, 0x33, 0x00);

pub const NODE_RADIUS: f64 = 6.0;
/// Distance from a node's center to the top of its caption.
pub const CAPTION_OFFSET: f64 = 15.0;
pub const CAPTION_HEIGHT: f64 = 12.0;
/// Approximate advance of one caption glyph.
pub const GLYPH_WIDTH: f64 = 7.0;

pub trait Surface {
    /// Remove every shape.
    fn clear(&mut self);
    fn draw_connection(&mut self, from: Position, to: Position);
    fn draw_node(&mut self, at: Position, label: &str, active: bool);
    /// Make the scrollable region bound everything drawn so far.
    fn fit_scroll_region(&mut self);
    /// Scroll so the bottom of the scrollable region is visible.
    fn scroll_to_end(&mut self);
    fn set_status(&mut self, text: &str);
    fn set_result(&mut self, text: &str);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Connection {
        from: Position,
        to: Position,
    },
    Node {
        at: Position,
        caption: String,
        active: bool,
    },
}

impl Shape {
    pub fn bounds(&self) -> Bounds {
        match self {
            Shape::Connection { from, to } => Bounds {
                min_x: from.x.min(to.x),
                min_y: from.y.min(to.y),
                max_x: from.x.max(to.x),
                max_y: from.y.max(to.y),
            },
            Shape::Node { at, caption, .. } => {
                let half_caption = caption.chars().count() as f64 * GLYPH_WIDTH / 2.0;
                let half_width = half_caption.max(NODE_RADIUS);
                Bounds {
                    min_x: at.x - half_width,
                    min_y: at.y - NODE_RADIUS,
                    max_x: at.x + half_width,
                    max_y: at.y + CAPTION_OFFSET + CAPTION_HEIGHT,
                }
            }
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Shape::Connection { .. } => CONNECTION,
            Shape::Node { active: true, .. } => ACTIVE_NODE,
            Shape::Node { active: false, .. } => INACTIVE_NODE,
        }
    }
}

/// Retained drawing surface.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    shapes: Vec<Shape>,
    scroll_region: Option<Bounds>,
    scroll_fraction: f64,
    status: String,
    result: String,
    clears: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn connections(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Connection { from, to } => Some((*from, *to)),
            _ => None,
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = (Position, &str, bool)> + '_ {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Node {
                at,
                caption,
                active,
            } => Some((*at, caption.as_str(), *active)),
            _ => None,
        })
    }

    pub fn scroll_region(&self) -> Option<Bounds> {
        self.scroll_region
    }

    /// 0.0 shows the top of the scroll region, 1.0 the bottom.
    pub fn scroll_fraction(&self) -> f64 {
        self.scroll_fraction
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    /// How many times the scene was wiped.
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    /// Top edge of a viewport `viewport_height` tall at the current scroll
    /// position.
    pub fn viewport_top(&self, viewport_height: f64) -> f64 {
        let Some(region) = self.scroll_region else {
            return 0.0;
        };
        let overflow = region.height() - viewport_height;
        if overflow <= 0.0 {
            region.min_y
        } else {
            region.min_y + overflow * self.scroll_fraction.clamp(0.0, 1.0)
        }
    }
}

impl Surface for Scene {
    fn clear(&mut self) {
        self.shapes.clear();
        self.clears += 1;
    }

    fn draw_connection(&mut self, from: Position, to: Position) {
        self.shapes.push(Shape::Connection { from, to });
    }

    fn draw_node(&mut self, at: Position, label: &str, active: bool) {
        self.shapes.push(Shape::Node {
            at,
            caption: node_caption(label),
            active,
        });
    }

    fn fit_scroll_region(&mut self) {
        self.scroll_region = self
            .shapes
            .iter()
            .map(Shape::bounds)
            .reduce(Bounds::union);
    }

    fn scroll_to_end(&mut self) {
        self.scroll_fraction = 1.0;
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn set_result(&mut self, text: &str) {
        self.result = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_region_bounds_nodes_and_captions() {
        let mut scene = Scene::new();
        scene.draw_node(Position::new(100.0, 30.0), "Query: x", true);
        scene.draw_node(Position::new(100.0, 80.0), "Complete", false);
        scene.fit_scroll_region();

        let region = scene.scroll_region().unwrap();
        assert_eq!(region.min_y, 30.0 - NODE_RADIUS);
        assert_eq!(region.max_y, 80.0 + CAPTION_OFFSET + CAPTION_HEIGHT);
        assert_eq!(region.min_x, 100.0 - 4.0 * GLYPH_WIDTH);
    }

    #[test]
    fn empty_scene_has_no_scroll_region() {
        let mut scene = Scene::new();
        scene.fit_scroll_region();
        assert_eq!(scene.scroll_region(), None);
        assert_eq!(scene.viewport_top(100.0), 0.0);
    }

    #[test]
    fn viewport_follows_scroll_fraction() {
        let mut scene = Scene::new();
        scene.draw_connection(Position::new(0.0, 0.0), Position::new(0.0, 500.0));
        scene.fit_scroll_region();

        assert_eq!(scene.viewport_top(200.0), 0.0);
        scene.scroll_to_end();
        assert_eq!(scene.viewport_top(200.0), 300.0);
        assert_eq!(scene.viewport_top(800.0), 0.0);
    }

    #[test]
    fn clear_drops_shapes_but_keeps_text() {
        let mut scene = Scene::new();
        scene.draw_node(Position::new(1.0, 1.0), "a", true);
        scene.set_status("Number of hops: 1");
        scene.clear();

        assert!(scene.shapes().is_empty());
        assert_eq!(scene.status(), "Number of hops: 1");
        assert_eq!(scene.clear_count(), 1);
    }

    #[test]
    fn node_colors_follow_activity() {
        let active = Shape::Node {
            at: Position::default(),
            caption: String::new(),
            active: true,
        };
        assert_eq!(active.color(), ACTIVE_NODE);
        let line = Shape::Connection {
            from: Position::default(),
            to: Position::default(),
        };
        assert_eq!(line.color(), CONNECTION);
    }
}
