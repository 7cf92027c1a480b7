//! HUD and menu widgets.
//!
//! Every widget rebuilds its surface only when its content changes; the
//! renderer just reads the cached image each frame.

use std::rc::Rc;
use std::time::Duration;

use crate::core::{GameObject, RenderData, Renderable, Surface};
use crate::theme;
use crate::types::{CellStyle, Point};

/// How long a popup notification stays on screen by default.
pub const POPUP_TTL: Duration = Duration::from_millis(1500);

fn text_image(text: &str, style: CellStyle) -> Rc<Surface> {
    Rc::new(Surface::styled(&[text], style))
}

/// Single line of static text.
pub struct TextWidget {
    pos: Point,
    text: String,
    style: Option<CellStyle>,
    image: Rc<Surface>,
}

impl TextWidget {
    pub fn new(pos: Point, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            image: text_image(&text, theme::gui("normal")),
            pos,
            text,
            style: None,
        }
    }

    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.set_style(style);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.refresh();
        }
    }

    pub fn set_style(&mut self, style: CellStyle) {
        self.style = Some(style);
        self.refresh();
    }

    fn refresh(&mut self) {
        let style = self.style.unwrap_or_else(|| theme::gui("normal"));
        self.image = text_image(&self.text, style);
    }
}

impl Renderable for TextWidget {
    fn get_render_data(&self) -> RenderData {
        RenderData::single(self.pos, Rc::clone(&self.image))
    }
}

impl GameObject for TextWidget {}

/// Menu entry framed by selection markers while selected.
///
/// An unselected item keeps the markers' width as blank padding so the
/// text does not jump when the selection moves.
pub struct MenuItemWidget {
    pos: Point,
    text: String,
    left: String,
    right: String,
    style: Option<CellStyle>,
    selected: bool,
    image: Rc<Surface>,
}

impl MenuItemWidget {
    pub fn new(pos: Point, text: impl Into<String>) -> Self {
        let mut item = Self {
            pos,
            text: text.into(),
            left: "* ".to_string(),
            right: " *".to_string(),
            style: None,
            selected: false,
            image: Rc::default(),
        };
        item.refresh();
        item
    }

    pub fn with_template(mut self, left: &str, right: &str) -> Self {
        self.left = left.to_string();
        self.right = right.to_string();
        self.refresh();
        self
    }

    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = Some(style);
        self.refresh();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn select(&mut self) {
        self.selected = true;
        self.refresh();
    }

    pub fn deselect(&mut self) {
        self.selected = false;
        self.refresh();
    }

    pub fn toggle_select(&mut self) {
        self.selected = !self.selected;
        self.refresh();
    }

    /// Cells of the current line, blank padding unstyled.
    fn line(&self) -> Vec<(char, Option<CellStyle>)> {
        let style = Some(self.style.unwrap_or_else(|| theme::gui("yellow")));
        let pad = |marker: &str| -> Vec<(char, Option<CellStyle>)> {
            if self.selected {
                marker.chars().map(|c| (c, style)).collect()
            } else {
                marker.chars().map(|_| (' ', None)).collect()
            }
        };

        let mut cells = pad(&self.left);
        cells.extend(self.text.chars().map(|c| (c, style)));
        cells.extend(pad(&self.right));
        cells
    }

    fn refresh(&mut self) {
        self.image = Rc::new(Surface::from_line(self.line()));
    }
}

impl Renderable for MenuItemWidget {
    fn get_render_data(&self) -> RenderData {
        RenderData::single(self.pos, Rc::clone(&self.image))
    }
}

impl GameObject for MenuItemWidget {}

/// Vertical list of menu items, each bound to an action.
///
/// Drawn as one surface with a row per item; at most one item is selected.
pub struct MenuItemContainer<A> {
    pos: Point,
    template: (String, String),
    items: Vec<(MenuItemWidget, A)>,
    selected: Option<usize>,
    image: Rc<Surface>,
}

impl<A: Copy> MenuItemContainer<A> {
    pub fn new(pos: Point) -> Self {
        Self {
            pos,
            template: ("* ".to_string(), " *".to_string()),
            items: Vec::new(),
            selected: None,
            image: Rc::default(),
        }
    }

    /// Markers for items added after this call.
    pub fn with_template(mut self, left: &str, right: &str) -> Self {
        self.template = (left.to_string(), right.to_string());
        self
    }

    pub fn with_item(mut self, text: &str, action: A) -> Self {
        let row = Point::new(0, self.items.len() as i32);
        let item = MenuItemWidget::new(self.pos + row, text)
            .with_template(&self.template.0, &self.template.1);
        self.items.push((item, action));
        self.refresh();
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &MenuItemWidget> {
        self.items.iter().map(|(item, _)| item)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Select item `idx`, deselecting the previous one.
    ///
    /// Out-of-range indices are ignored and return false.
    pub fn select(&mut self, idx: usize) -> bool {
        if idx >= self.items.len() {
            return false;
        }
        if let Some(prev) = self.selected {
            self.items[prev].0.deselect();
        }
        self.items[idx].0.select();
        self.selected = Some(idx);
        self.refresh();
        true
    }

    pub fn next(&mut self) {
        let n = self.items.len();
        if n > 0 {
            self.select(self.selected.map_or(0, |i| (i + 1) % n));
        }
    }

    pub fn prev(&mut self) {
        let n = self.items.len();
        if n > 0 {
            self.select(self.selected.map_or(n - 1, |i| (i + n - 1) % n));
        }
    }

    /// Action bound to the selected item.
    pub fn action(&self) -> Option<A> {
        self.selected.map(|i| self.items[i].1)
    }

    fn refresh(&mut self) {
        let (glyphs, styles): (Vec<Vec<char>>, Vec<Vec<Option<CellStyle>>>) = self
            .items
            .iter()
            .map(|(item, _)| -> (Vec<char>, Vec<Option<CellStyle>>) {
                item.line().into_iter().unzip()
            })
            .unzip();
        self.image = Rc::new(Surface::new(glyphs, styles));
    }
}

impl<A> Renderable for MenuItemContainer<A> {
    fn get_render_data(&self) -> RenderData {
        RenderData::single(self.pos, Rc::clone(&self.image))
    }
}

impl<A: Copy> GameObject for MenuItemContainer<A> {}

/// HUD line pulled from a data source every tick.
pub struct WeaponWidget {
    pos: Point,
    source: Box<dyn Fn() -> String>,
    data: String,
    image: Rc<Surface>,
}

impl WeaponWidget {
    pub fn new(pos: Point, source: impl Fn() -> String + 'static) -> Self {
        let data = source();
        Self {
            image: text_image(&data, theme::gui("yellow")),
            pos,
            source: Box::new(source),
            data,
        }
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// Re-read the source; the image is rebuilt only on change.
    pub fn refresh(&mut self) {
        let data = (self.source)();
        if data != self.data {
            self.image = text_image(&data, theme::gui("yellow"));
            self.data = data;
        }
    }
}

impl Renderable for WeaponWidget {
    fn get_render_data(&self) -> RenderData {
        RenderData::single(self.pos, Rc::clone(&self.image))
    }
}

impl GameObject for WeaponWidget {
    fn update(&mut self, _dt: Duration) {
        self.refresh();
    }
}

/// Horizontal progress bar: `prefix left ████---- right postfix`.
pub struct Bar {
    pos: Point,
    prefix: String,
    postfix: String,
    left: String,
    right: String,
    marker: char,
    base_marker_style: Option<CellStyle>,
    marker_style: Option<CellStyle>,
    empty: char,
    empty_style: Option<CellStyle>,
    count: usize,
    maxval: f32,
    general_style: Option<CellStyle>,
    /// `(threshold, style)`: the first entry with `value <= threshold` styles
    /// the marker.
    stylemap: Vec<(f32, CellStyle)>,
    callback: Option<Box<dyn Fn() -> f32>>,
    value: f32,
    current_count: usize,
    image: Rc<Surface>,
}

impl Bar {
    pub fn new(pos: Point) -> Self {
        let mut bar = Self {
            pos,
            prefix: String::new(),
            postfix: String::new(),
            left: "[".to_string(),
            right: "]".to_string(),
            marker: '█',
            base_marker_style: None,
            marker_style: None,
            empty: '-',
            empty_style: None,
            count: 10,
            maxval: 100.0,
            general_style: None,
            stylemap: Vec::new(),
            callback: None,
            value: 100.0,
            current_count: 10,
            image: Rc::default(),
        };
        bar.rebuild();
        bar
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self.rebuilt()
    }

    pub fn with_postfix(mut self, postfix: &str) -> Self {
        self.postfix = postfix.to_string();
        self.rebuilt()
    }

    pub fn with_edges(mut self, left: &str, right: &str) -> Self {
        self.left = left.to_string();
        self.right = right.to_string();
        self.rebuilt()
    }

    pub fn with_marker(mut self, marker: char, style: Option<CellStyle>) -> Self {
        self.marker = marker;
        self.base_marker_style = style;
        self.marker_style = style;
        self.rebuilt()
    }

    pub fn with_empty(mut self, empty: char, style: Option<CellStyle>) -> Self {
        self.empty = empty;
        self.empty_style = style;
        self.rebuilt()
    }

    /// Number of marker cells of a full bar.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self.set_value(self.value);
        self
    }

    pub fn with_maxval(mut self, maxval: f32) -> Self {
        self.maxval = maxval;
        self.set_value(maxval);
        self
    }

    pub fn with_general_style(mut self, style: CellStyle) -> Self {
        self.general_style = Some(style);
        self.rebuilt()
    }

    pub fn with_stylemap(mut self, stylemap: Vec<(f32, CellStyle)>) -> Self {
        self.stylemap = stylemap;
        self.set_value(self.value);
        self
    }

    /// Source polled on every update.
    pub fn with_callback(mut self, callback: impl Fn() -> f32 + 'static) -> Self {
        self.set_value(callback());
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Marker cells currently filled.
    pub fn current_count(&self) -> usize {
        self.current_count
    }

    pub fn marker_style(&self) -> Option<CellStyle> {
        self.marker_style
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value;
        self.marker_style = self
            .stylemap
            .iter()
            .find(|(threshold, _)| value <= *threshold)
            .map(|&(_, style)| style)
            .or(self.base_marker_style);

        let ratio = if self.maxval > 0.0 { value / self.maxval } else { 0.0 };
        let filled = (ratio * self.count as f32).round();
        self.current_count = if filled.is_finite() {
            filled.clamp(0.0, self.count as f32) as usize
        } else {
            0
        };
        self.rebuild();
    }

    fn rebuilt(mut self) -> Self {
        self.rebuild();
        self
    }

    fn rebuild(&mut self) {
        let general = self.general_style;
        let mut cells: Vec<(char, Option<CellStyle>)> = Vec::new();
        cells.extend(self.prefix.chars().map(|c| (c, general)));
        cells.extend(self.left.chars().map(|c| (c, general)));
        cells.extend((0..self.current_count).map(|_| (self.marker, self.marker_style)));
        cells.extend((self.current_count..self.count).map(|_| (self.empty, self.empty_style)));
        cells.extend(self.right.chars().map(|c| (c, general)));
        cells.extend(self.postfix.chars().map(|c| (c, general)));
        self.image = Rc::new(Surface::from_line(cells));
    }
}

impl Renderable for Bar {
    fn get_render_data(&self) -> RenderData {
        RenderData::single(self.pos, Rc::clone(&self.image))
    }
}

impl GameObject for Bar {
    fn update(&mut self, _dt: Duration) {
        if let Some(value) = self.callback.as_ref().map(|cb| cb()) {
            self.set_value(value);
        }
    }
}

/// Text that disappears after a while.
pub struct PopUpNotificationWidget {
    pos: Point,
    text: String,
    ttl: Duration,
    elapsed: Duration,
    image: Rc<Surface>,
}

impl PopUpNotificationWidget {
    pub fn new(pos: Point, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            image: text_image(&text, theme::gui("yellow")),
            pos,
            text,
            ttl: POPUP_TTL,
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Renderable for PopUpNotificationWidget {
    fn get_render_data(&self) -> RenderData {
        RenderData::single(self.pos, Rc::clone(&self.image))
    }
}

impl GameObject for PopUpNotificationWidget {
    fn update(&mut self, dt: Duration) {
        self.elapsed += dt;
    }

    fn expired(&self) -> bool {
        self.elapsed >= self.ttl
    }
}
