//! The toolkit context.
//!
//! A [`Gui`] owns everything that would otherwise be process-wide state: the
//! widget tree, the input snapshot, the style name index, the flag name table,
//! the loaded skins and the rendering backend. Every operation goes through it,
//! and every message is delivered synchronously: when [`Gui::dispatch`]
//! returns, all side effects of the message (including messages it sent on to
//! other widgets) are complete.
//!
//! # Example
//!
//! ```
//! use plume::{Gui, GuiConfig};
//! use plume_core::{CRect, MessageKind, NullBackend, Transform};
//!
//! let mut gui = Gui::new(NullBackend::new(), GuiConfig::default());
//! let checkbox = gui.create(None, "Checkbox", "agree", Transform::with_area(CRect::from_abs(10.0, 10.0, 30.0, 30.0)))?;
//!
//! assert_eq!(gui.state(checkbox), Some(0));
//! gui.send(checkbox, MessageKind::Action);
//! assert_eq!(gui.state(checkbox), Some(1));
//! # Ok::<(), plume::GuiError>(())
//! ```

mod draw;
mod input;
mod skin;

use std::collections::HashMap;

use plume_core::logging::targets;
use plume_core::{
    AbsRect, Backend, Dispatcher, ElementTreeDebug, InputState, InsertAt, Message, MessageKind, NodeId,
    Reply, ResolvedTransform, Transform, Tree,
};
use plume_style::{FlagTable, SkinLibrary, Style, StyleIndex};

use crate::config::GuiConfig;
use crate::error::{GuiError, GuiResult};
use crate::widget::{self, Origin, Widget, WidgetClass};

/// Style names registered in every context, in bit order.
pub const CONTROL_STYLES: [&str; 3] = ["neutral", "hover", "active"];

/// Handle returned by [`Gui::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(NodeId, &Message)>;

/// The toolkit context: widget tree, input state, styles and backend.
pub struct Gui<B: Backend> {
    pub(crate) tree: Tree<Widget>,
    pub(crate) backend: B,
    pub(crate) input: InputState,
    pub(crate) names: StyleIndex,
    pub(crate) flags: FlagTable,
    pub(crate) skins: SkinLibrary,
    pub(crate) config: GuiConfig,
    pub(crate) hovered: Option<NodeId>,
    pub(crate) focused: Option<NodeId>,
    pub(crate) captured: Option<NodeId>,
    roots: Vec<NodeId>,
    listeners: HashMap<(NodeId, MessageKind), Vec<(ListenerId, Listener)>>,
    next_listener: u64,
}

impl<B: Backend> std::fmt::Debug for Gui<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gui")
            .field("widgets", &self.tree.len())
            .field("roots", &self.roots)
            .field("input", &self.input)
            .field("hovered", &self.hovered)
            .field("focused", &self.focused)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<B: Backend> Gui<B> {
    /// Create a context drawing through `backend`.
    pub fn new(backend: B, config: GuiConfig) -> Self {
        let mut names = StyleIndex::new();
        names.add_group(&CONTROL_STYLES);
        Self {
            tree: Tree::new(),
            backend,
            input: InputState::new(),
            names,
            flags: FlagTable::standard(),
            skins: SkinLibrary::new(),
            config,
            hovered: None,
            focused: None,
            captured: None,
            roots: Vec::new(),
            listeners: HashMap::new(),
            next_listener: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn style_names(&self) -> &StyleIndex {
        &self.names
    }

    pub fn style_names_mut(&mut self) -> &mut StyleIndex {
        &mut self.names
    }

    pub fn flag_table(&self) -> &FlagTable {
        &self.flags
    }

    /// Top-level widgets, back to front.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.tree.contains(id)
    }

    pub fn widget(&self, id: NodeId) -> Option<&Widget> {
        self.tree.get(id)
    }

    pub(crate) fn widget_mut(&mut self, id: NodeId) -> Option<&mut Widget> {
        self.tree.get_mut(id)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.tree.name(id).ok()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.parent(id).ok().flatten()
    }

    /// A snapshot of a widget's children, back to front.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.children(id).map(<[NodeId]>::to_vec).unwrap_or_default()
    }

    /// Find a direct child by name.
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.tree.find_child_by_name(id, name).ok().flatten()
    }

    /// Find a descendant by a `/`-separated path of names.
    pub fn find(&self, id: NodeId, path: &str) -> Option<NodeId> {
        path.split('/')
            .filter(|p| !p.is_empty())
            .try_fold(id, |node, name| self.child(node, name))
    }

    // =========================================================================
    // Construction and destruction
    // =========================================================================

    /// Create a widget of the named class with its default flags.
    ///
    /// `at` of `None` creates a top-level widget. The new widget receives
    /// `Construct` before this returns.
    pub fn create(
        &mut self,
        at: Option<InsertAt>,
        class: &str,
        name: &str,
        transform: Transform,
    ) -> GuiResult<NodeId> {
        let flags = self.flags.default_flags(class);
        self.create_with_flags(at, class, name, transform, flags)
    }

    /// Create a widget with explicit flags.
    pub fn create_with_flags(
        &mut self,
        at: Option<InsertAt>,
        class: &str,
        name: &str,
        transform: Transform,
        flags: u32,
    ) -> GuiResult<NodeId> {
        let class = WidgetClass::from_name(class)
            .ok_or_else(|| GuiError::invalid(format!("unknown widget class '{class}'")))?;
        let id = self.spawn(at, class, name, Widget::new(class, transform, flags))?;
        if at.is_none() {
            if let Some(skin) = self.config.default_skin.clone() {
                if self.skins.get(&skin).is_some() {
                    self.set_skin(id, &skin);
                }
            }
        }
        Ok(id)
    }

    /// Create a child owned by its parent's constructor or skin.
    pub(crate) fn create_owned(
        &mut self,
        parent: NodeId,
        class: WidgetClass,
        name: &str,
        transform: Transform,
        flags: u32,
        origin: Origin,
    ) -> GuiResult<NodeId> {
        let mut widget = Widget::new(class, transform, flags);
        widget.element.origin = origin;
        self.spawn(Some(InsertAt::Last(parent)), class, name, widget)
    }

    fn spawn(&mut self, at: Option<InsertAt>, class: WidgetClass, name: &str, widget: Widget) -> GuiResult<NodeId> {
        let id = match at {
            Some(at) => self.tree.insert_at(name, widget, at)?,
            None => {
                let id = self.tree.insert(name, widget);
                self.roots.push(id);
                id
            }
        };
        tracing::trace!(target: targets::DISPATCH, id = id.as_raw(), class = class.name(), name, "constructing");
        self.dispatch(id, &Message::new(MessageKind::Construct));
        if !self.tree.contains(id) {
            return Err(GuiError::AllocationFailure {
                class: class.name().to_string(),
            });
        }
        Ok(id)
    }

    /// Destroy a widget and its subtree.
    ///
    /// `Destroy` is delivered children first, then the nodes are removed.
    pub fn destroy(&mut self, id: NodeId) -> GuiResult<()> {
        let order = self.tree.post_order(id)?;
        for &node in &order {
            self.dispatch(node, &Message::new(MessageKind::Destroy));
        }
        // A Destroy handler may already have removed part of the subtree.
        if !self.tree.contains(id) {
            return Ok(());
        }
        let removed = self.tree.remove(id)?;
        for (node, _) in &removed {
            self.forget(*node);
        }
        tracing::trace!(target: targets::TREE, id = id.as_raw(), count = removed.len(), "destroyed subtree");
        Ok(())
    }

    fn forget(&mut self, id: NodeId) {
        self.roots.retain(|&r| r != id);
        self.listeners.retain(|(node, _), _| *node != id);
        for slot in [&mut self.hovered, &mut self.focused, &mut self.captured] {
            if *slot == Some(id) {
                *slot = None;
            }
        }
    }

    // =========================================================================
    // Tree shape
    // =========================================================================

    /// Move a widget to a new position, which may be under a new parent.
    pub fn attach(&mut self, id: NodeId, at: InsertAt) -> GuiResult<()> {
        self.tree.attach(id, at)?;
        self.roots.retain(|&r| r != id);
        Ok(())
    }

    /// Make a widget top-level, in front of the other top-level widgets.
    pub fn attach_root(&mut self, id: NodeId) -> GuiResult<()> {
        self.tree.detach(id)?;
        self.roots.retain(|&r| r != id);
        self.roots.push(id);
        Ok(())
    }

    /// Take a widget out of the tree without destroying it.
    ///
    /// A detached widget is neither drawn nor hit-tested until attached again.
    pub fn detach(&mut self, id: NodeId) -> GuiResult<()> {
        self.tree.detach(id)?;
        self.roots.retain(|&r| r != id);
        Ok(())
    }

    /// Move a widget in front of its siblings.
    pub fn raise(&mut self, id: NodeId) -> GuiResult<()> {
        if self.roots.contains(&id) {
            self.roots.retain(|&r| r != id);
            self.roots.push(id);
            return Ok(());
        }
        Ok(self.tree.raise(id)?)
    }

    /// Move a widget behind its siblings.
    pub fn lower(&mut self, id: NodeId) -> GuiResult<()> {
        if self.roots.contains(&id) {
            self.roots.retain(|&r| r != id);
            self.roots.insert(0, id);
            return Ok(());
        }
        Ok(self.tree.lower(id)?)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Deliver a message to a widget.
    ///
    /// Listeners registered for the message kind run after the widget handled
    /// it. Messages to removed widgets are unhandled.
    pub fn dispatch(&mut self, id: NodeId, message: &Message) -> Reply {
        if !self.tree.contains(id) {
            return Reply::Unhandled;
        }
        tracing::trace!(target: targets::DISPATCH, id = id.as_raw(), kind = ?message.kind, subtype = message.subtype, "dispatch");
        let reply = widget::handle(self, id, message);
        if reply.is_handled() {
            self.notify(id, message);
        }
        reply
    }

    /// Deliver a message with no payload.
    pub fn send(&mut self, id: NodeId, kind: MessageKind) -> Reply {
        self.dispatch(id, &Message::new(kind))
    }

    /// Replay a style into a widget. Returns the number of handled entries.
    pub fn apply(&mut self, id: NodeId, style: &Style) -> usize {
        style.apply(&mut NodeDispatcher { gui: self, id })
    }

    /// Call `callback` whenever `id` handles a message of `kind`.
    pub fn add_listener(
        &mut self,
        id: NodeId,
        kind: MessageKind,
        callback: impl FnMut(NodeId, &Message) + 'static,
    ) -> ListenerId {
        self.next_listener += 1;
        let listener = ListenerId(self.next_listener);
        self.listeners
            .entry((id, kind))
            .or_default()
            .push((listener, Box::new(callback)));
        listener
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn remove_listener(&mut self, listener: ListenerId) -> bool {
        let mut found = false;
        for list in self.listeners.values_mut() {
            let before = list.len();
            list.retain(|(l, _)| *l != listener);
            found |= list.len() != before;
        }
        self.listeners.retain(|_, list| !list.is_empty());
        found
    }

    fn notify(&mut self, id: NodeId, message: &Message) {
        if let Some(list) = self.listeners.get_mut(&(id, message.kind)) {
            for (_, callback) in list.iter_mut() {
                callback(id, message);
            }
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// The rectangle a widget's area is resolved against: its parent's
    /// content rectangle, or the root rectangle for top-level widgets.
    pub fn container(&self, id: NodeId) -> AbsRect {
        match self.parent(id) {
            Some(parent) => self.content_rect(parent).unwrap_or_else(|| self.config.root_rect()),
            None => self.config.root_rect(),
        }
    }

    /// A widget's transform resolved to pixel space.
    pub fn resolve(&self, id: NodeId) -> Option<ResolvedTransform> {
        let widget = self.tree.get(id)?;
        Some(widget.element.transform.resolve(&self.container(id)))
    }

    /// The rectangle a widget's children are resolved against: its resolved
    /// area shrunk by its padding.
    pub fn content_rect(&self, id: NodeId) -> Option<AbsRect> {
        let padding = self.tree.get(id)?.element.padding;
        Some(self.resolve(id)?.rect.inset(&padding))
    }

    // =========================================================================
    // Convenience wrappers over common messages
    // =========================================================================

    /// `GetState` as an integer.
    pub fn state(&mut self, id: NodeId) -> Option<i64> {
        self.send(id, MessageKind::GetState).as_int()
    }

    /// `GetValue` as an integer.
    pub fn value(&mut self, id: NodeId) -> Option<i64> {
        self.send(id, MessageKind::GetValue).as_int()
    }

    /// `GetText` as an owned string.
    pub fn text(&mut self, id: NodeId) -> Option<String> {
        self.send(id, MessageKind::GetText).as_text().map(str::to_string)
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) -> Reply {
        self.dispatch(id, &Message::text(MessageKind::SetText, text))
    }

    /// `GetFlags` as bits.
    pub fn flags(&mut self, id: NodeId) -> Option<u32> {
        self.send(id, MessageKind::GetFlags).as_int().map(|f| f as u32)
    }

    pub fn set_flag(&mut self, id: NodeId, flag: u32, set: bool) -> Reply {
        self.dispatch(id, &Message::set_flag(flag, set))
    }

    /// Render a subtree as an indented listing, for debugging.
    pub fn debug_tree(&self, id: NodeId) -> String {
        ElementTreeDebug::new()
            .format_subtree(&self.tree, id, |w| w.class_name().to_string())
            .unwrap_or_default()
    }
}

/// Routes style replay into one widget.
struct NodeDispatcher<'a, B: Backend> {
    gui: &'a mut Gui<B>,
    id: NodeId,
}

impl<B: Backend> Dispatcher for NodeDispatcher<'_, B> {
    fn dispatch(&mut self, message: &Message) -> Reply {
        self.gui.dispatch(self.id, message)
    }
}
