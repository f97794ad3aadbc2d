//! Context menu actions: the host supplies them per right-click, the resolver
//! filters and runs them.

use egui::{Pos2, Ui};

use crate::model::ItemKey;

/// What was right-clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuContext<T> {
    /// Selection at the time the menu opened.
    pub selection: Vec<ItemKey>,
    pub row: Option<usize>,
    pub time: Option<T>,
}

/// Whether the menu closes after an action ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuClose {
    #[default]
    Auto,
    KeepOpen,
}

pub enum ActionLabel<T> {
    Static(String),
    Computed(Box<dyn Fn(&MenuContext<T>) -> String>),
}

type Predicate<T> = Box<dyn Fn(&MenuContext<T>) -> bool>;
type Handler<T> = Box<dyn FnMut(&MenuContext<T>) -> MenuClose>;
type Renderer<T> = Box<dyn Fn(&mut Ui, &MenuContext<T>)>;

/// One entry of the context menu.
pub struct MenuAction<T> {
    label: ActionLabel<T>,
    icon: Option<&'static str>,
    visible: Option<Predicate<T>>,
    render: Option<Renderer<T>>,
    handler: Option<Handler<T>>,
}

impl<T> MenuAction<T> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: ActionLabel::Static(label.into()),
            icon: None,
            visible: None,
            render: None,
            handler: None,
        }
    }

    /// A label computed from the menu context.
    pub fn computed(label: impl Fn(&MenuContext<T>) -> String + 'static) -> Self {
        Self {
            label: ActionLabel::Computed(Box::new(label)),
            ..Self::new("")
        }
    }

    pub fn icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn visible_when(mut self, predicate: impl Fn(&MenuContext<T>) -> bool + 'static) -> Self {
        self.visible = Some(Box::new(predicate));
        self
    }

    /// Draw the entry yourself. Custom-rendered entries are not clickable
    /// through the menu.
    pub fn custom_render(mut self, render: impl Fn(&mut Ui, &MenuContext<T>) + 'static) -> Self {
        self.render = Some(Box::new(render));
        self
    }

    pub fn on_click(mut self, handler: impl FnMut(&MenuContext<T>) -> MenuClose + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn label(&self, context: &MenuContext<T>) -> String {
        let text = match &self.label {
            ActionLabel::Static(text) => text.clone(),
            ActionLabel::Computed(f) => f(context),
        };
        match self.icon {
            Some(icon) => format!("{icon}  {text}"),
            None => text,
        }
    }

    pub fn is_visible(&self, context: &MenuContext<T>) -> bool {
        self.visible.as_ref().map_or(true, |p| p(context))
    }

    pub fn is_custom(&self) -> bool {
        self.render.is_some()
    }

    pub fn render_custom(&self, ui: &mut Ui, context: &MenuContext<T>) {
        if let Some(render) = &self.render {
            render(ui, context);
        }
    }
}

/// Host hook returning the action list for a context.
pub trait ContextMenuProvider<T> {
    fn actions(&self, context: &MenuContext<T>) -> Vec<MenuAction<T>>;
}

impl<T, F> ContextMenuProvider<T> for F
where
    F: Fn(&MenuContext<T>) -> Vec<MenuAction<T>>,
{
    fn actions(&self, context: &MenuContext<T>) -> Vec<MenuAction<T>> {
        self(context)
    }
}

struct OpenMenu<T> {
    anchor: Pos2,
    context: MenuContext<T>,
    actions: Vec<MenuAction<T>>,
}

/// The open context menu, if any.
pub struct ContextMenu<T> {
    open: Option<OpenMenu<T>>,
}

impl<T> Default for ContextMenu<T> {
    fn default() -> Self {
        Self { open: None }
    }
}

impl<T> ContextMenu<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask `provider` for actions, keep the visible ones in host order and
    /// anchor the menu at `anchor`. Returns the number of visible actions.
    pub fn open(
        &mut self,
        anchor: Pos2,
        context: MenuContext<T>,
        provider: &dyn ContextMenuProvider<T>,
    ) -> usize {
        let actions: Vec<_> = provider
            .actions(&context)
            .into_iter()
            .filter(|a| a.is_visible(&context))
            .collect();
        let count = actions.len();
        self.open = Some(OpenMenu {
            anchor,
            context,
            actions,
        });
        count
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn anchor(&self) -> Option<Pos2> {
        self.open.as_ref().map(|m| m.anchor)
    }

    pub fn context(&self) -> Option<&MenuContext<T>> {
        self.open.as_ref().map(|m| &m.context)
    }

    pub fn actions(&self) -> &[MenuAction<T>] {
        self.open.as_ref().map_or(&[], |m| m.actions.as_slice())
    }

    /// Labels of the visible actions, in order.
    pub fn labels(&self) -> Vec<String> {
        match &self.open {
            Some(menu) => menu.actions.iter().map(|a| a.label(&menu.context)).collect(),
            None => Vec::new(),
        }
    }

    /// Run the handler of the visible action at `index`.
    ///
    /// Returns true when the action ran. The menu closes afterwards unless
    /// the handler asked to keep it open.
    pub fn activate(&mut self, index: usize) -> bool {
        let Some(menu) = self.open.as_mut() else {
            return false;
        };
        let Some(action) = menu.actions.get_mut(index) else {
            return false;
        };
        if action.is_custom() {
            return false;
        }
        let close = match action.handler.as_mut() {
            Some(handler) => handler(&menu.context),
            None => MenuClose::Auto,
        };
        if close == MenuClose::Auto {
            self.close();
        }
        true
    }

    /// Detach the menu and forget its context.
    pub fn close(&mut self) {
        self.open = None;
    }
}
