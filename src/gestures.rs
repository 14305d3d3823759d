//! A transparent wrapper around the thumbnail grid that turns raw pointer
//! events into grid gestures: click (with the modifiers held at the time),
//! right click, drag start, drag over and drop.
//!
//! All positions are relative to the wrapped content's top-left corner. Put
//! inside a scrollable, that makes them content coordinates with the scroll
//! offset already applied, ready for [`photo_sorter::grid::GridLayout`].

use iced::advanced::layout;
use iced::advanced::overlay;
use iced::advanced::renderer;
use iced::advanced::widget::tree::Tag;
use iced::advanced::widget::{Operation, Tree};
use iced::advanced::{Clipboard, Layout, Shell, Widget};
use iced::keyboard::Modifiers;
use iced::{keyboard, mouse, Element, Event, Length, Point, Rectangle, Size, Vector};

const DRAG_THRESHOLD: f32 = 8.0;

#[derive(Debug, Default)]
struct State {
    /// Left button went down inside the grid and is still held.
    pressed: bool,
    press_pos: Option<Point>,
    /// Modifiers as of the press, so a click keeps its ctrl/shift meaning.
    press_modifiers: Modifiers,
    /// True once the cursor moved beyond DRAG_THRESHOLD from press_pos.
    dragging: bool,
    modifiers: Modifiers,
}

impl State {
    fn reset(&mut self) {
        self.pressed = false;
        self.press_pos = None;
        self.dragging = false;
    }
}

type PointHandler<'a, Message> = Box<dyn Fn(Point) -> Option<Message> + 'a>;

pub struct GridGestures<'a, Message, Theme = iced::Theme, Renderer = iced::Renderer> {
    content: Element<'a, Message, Theme, Renderer>,
    on_click: Box<dyn Fn(Point, Modifiers) -> Option<Message> + 'a>,
    on_right_click: Option<PointHandler<'a, Message>>,
    /// Called once per drag with the position the drag started from.
    on_drag_start: Option<PointHandler<'a, Message>>,
    on_drag_over: Option<PointHandler<'a, Message>>,
    /// Called when a drag ends over the grid.
    on_drop: Option<PointHandler<'a, Message>>,
}

impl<'a, Message, Theme, Renderer> GridGestures<'a, Message, Theme, Renderer> {
    pub fn new(
        content: impl Into<Element<'a, Message, Theme, Renderer>>,
        on_click: impl Fn(Point, Modifiers) -> Option<Message> + 'a,
    ) -> Self {
        Self {
            content: content.into(),
            on_click: Box::new(on_click),
            on_right_click: None,
            on_drag_start: None,
            on_drag_over: None,
            on_drop: None,
        }
    }

    pub fn on_right_click(mut self, f: impl Fn(Point) -> Option<Message> + 'a) -> Self {
        self.on_right_click = Some(Box::new(f));
        self
    }

    pub fn on_drag_start(mut self, f: impl Fn(Point) -> Option<Message> + 'a) -> Self {
        self.on_drag_start = Some(Box::new(f));
        self
    }

    pub fn on_drag_over(mut self, f: impl Fn(Point) -> Option<Message> + 'a) -> Self {
        self.on_drag_over = Some(Box::new(f));
        self
    }

    pub fn on_drop(mut self, f: impl Fn(Point) -> Option<Message> + 'a) -> Self {
        self.on_drop = Some(Box::new(f));
        self
    }
}

impl<Message, Theme, Renderer> Widget<Message, Theme, Renderer>
    for GridGestures<'_, Message, Theme, Renderer>
where
    Renderer: iced::advanced::Renderer,
{
    fn tag(&self) -> Tag {
        Tag::of::<State>()
    }

    fn state(&self) -> iced::advanced::widget::tree::State {
        iced::advanced::widget::tree::State::new(State::default())
    }

    fn size(&self) -> Size<Length> {
        self.content.as_widget().size()
    }

    fn children(&self) -> Vec<Tree> {
        vec![Tree::new(&self.content)]
    }

    fn diff(&self, tree: &mut Tree) {
        tree.diff_children(std::slice::from_ref(&self.content));
    }

    fn layout(
        &mut self,
        tree: &mut Tree,
        renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        self.content
            .as_widget_mut()
            .layout(&mut tree.children[0], renderer, limits)
    }

    fn operate(
        &mut self,
        tree: &mut Tree,
        layout: Layout<'_>,
        renderer: &Renderer,
        operation: &mut dyn Operation,
    ) {
        self.content
            .as_widget_mut()
            .operate(&mut tree.children[0], layout, renderer, operation);
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        renderer: &Renderer,
        clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, Message>,
        viewport: &Rectangle,
    ) {
        self.content.as_widget_mut().update(
            &mut tree.children[0],
            event,
            layout,
            cursor,
            renderer,
            clipboard,
            shell,
            viewport,
        );

        let state = tree.state.downcast_mut::<State>();
        let bounds = layout.bounds();

        if shell.is_event_captured() {
            if matches!(
                event,
                Event::Mouse(mouse::Event::ButtonPressed(..) | mouse::Event::ButtonReleased(..))
            ) {
                state.reset();
            }
            return;
        }

        match event {
            Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                state.modifiers = *modifiers;
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_in(bounds) {
                    state.pressed = true;
                    state.press_pos = Some(pos);
                    state.press_modifiers = state.modifiers;
                    state.dragging = false;
                }
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if !state.pressed {
                    return;
                }
                let (Some(press), Some(pos)) = (state.press_pos, cursor.position_in(bounds))
                else {
                    return;
                };
                if !state.dragging && press.distance(pos) > DRAG_THRESHOLD {
                    state.dragging = true;
                    if let Some(message) = self.on_drag_start.as_ref().and_then(|f| f(press)) {
                        shell.publish(message);
                    }
                }
                if state.dragging {
                    if let Some(message) = self.on_drag_over.as_ref().and_then(|f| f(pos)) {
                        shell.publish(message);
                    }
                }
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.pressed {
                    if state.dragging {
                        // Released outside the grid: another drop target handles it.
                        if let Some(pos) = cursor.position_in(bounds) {
                            if let Some(message) = self.on_drop.as_ref().and_then(|f| f(pos)) {
                                shell.publish(message);
                            }
                        }
                    } else if let Some(press) = state.press_pos {
                        if let Some(message) = (self.on_click)(press, state.press_modifiers) {
                            shell.publish(message);
                        }
                    }
                }
                state.reset();
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Right)) => {
                if let Some(pos) = cursor.position_in(bounds) {
                    if let Some(message) = self.on_right_click.as_ref().and_then(|f| f(pos)) {
                        shell.publish(message);
                    }
                }
            }
            _ => {}
        }
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        theme: &Theme,
        style: &renderer::Style,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        viewport: &Rectangle,
    ) {
        self.content.as_widget().draw(
            &tree.children[0],
            renderer,
            theme,
            style,
            layout,
            cursor,
            viewport,
        );
    }

    fn mouse_interaction(
        &self,
        tree: &Tree,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        viewport: &Rectangle,
        renderer: &Renderer,
    ) -> mouse::Interaction {
        let state = tree.state.downcast_ref::<State>();
        if state.dragging {
            return mouse::Interaction::Grabbing;
        }
        self.content
            .as_widget()
            .mouse_interaction(&tree.children[0], layout, cursor, viewport, renderer)
    }

    fn overlay<'b>(
        &'b mut self,
        tree: &'b mut Tree,
        layout: Layout<'b>,
        renderer: &Renderer,
        viewport: &Rectangle,
        translation: Vector,
    ) -> Option<overlay::Element<'b, Message, Theme, Renderer>> {
        self.content.as_widget_mut().overlay(
            &mut tree.children[0],
            layout,
            renderer,
            viewport,
            translation,
        )
    }
}

impl<'a, Message, Theme, Renderer> From<GridGestures<'a, Message, Theme, Renderer>>
    for Element<'a, Message, Theme, Renderer>
where
    Message: 'a,
    Theme: 'a,
    Renderer: iced::advanced::Renderer + 'a,
{
    fn from(gestures: GridGestures<'a, Message, Theme, Renderer>) -> Self {
        Element::new(gestures)
    }
}
