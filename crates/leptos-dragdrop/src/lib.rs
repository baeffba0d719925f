//! Leptos DragDrop Utilities
//!
//! Pointer drag-and-drop for Leptos using mouse events.
//! Uses a movement threshold to distinguish click from drag, and resolves the
//! drop candidate by geometry over every element carrying `data-dnd-id`.
//! `data-dnd-kind="container"` marks containers, anything else is an item.

pub mod collision;

use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

pub use collision::{resolve_collision, Droppable, DroppableKind, Rect};

pub const DND_ID_ATTR: &str = "data-dnd-id";
pub const DND_KIND_ATTR: &str = "data-dnd-kind";

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: f64 = 5.0;

/// Mousedown recorded but threshold not crossed yet
#[derive(Clone, Debug, PartialEq)]
struct PendingDrag {
    id: String,
    start_x: f64,
    start_y: f64,
    rect: Rect,
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    /// Handle of the element being dragged
    pub dragging: RwSignal<Option<String>>,
    /// Current drop candidate
    pub over: RwSignal<Option<String>>,
    /// Pointer offset since the drag started, for the drag ghost transform
    pub offset: RwSignal<(f64, f64)>,
    /// True for a moment after a drag so the trailing click can be ignored
    pub drag_just_ended: RwSignal<bool>,
    pending: RwSignal<Option<PendingDrag>>,
}

pub fn create_dnd_signals() -> DndSignals {
    DndSignals {
        dragging: RwSignal::new(None),
        over: RwSignal::new(None),
        offset: RwSignal::new((0.0, 0.0)),
        drag_just_ended: RwSignal::new(false),
        pending: RwSignal::new(None),
    }
}

/// Board callbacks driven by the global listeners
#[derive(Clone)]
pub struct DndHandlers {
    /// Return false to refuse the drag
    pub on_start: Rc<dyn Fn(&str) -> bool>,
    /// Whether a droppable may receive the dragged handle
    pub accepts: Rc<dyn Fn(&str, &str) -> bool>,
    pub on_over: Rc<dyn Fn(Option<&str>)>,
    /// Dragged handle and last drop candidate
    pub on_drop: Rc<dyn Fn(&str, Option<&str>)>,
    pub on_cancel: Rc<dyn Fn()>,
}

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging.set(None);
    dnd.over.set(None);
    dnd.pending.set(None);
    dnd.offset.set((0.0, 0.0));
    dnd.drag_just_ended.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended;
        let cb = Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for draggable elements
/// Records pending drag with start position and element rect
pub fn make_on_mousedown(dnd: DndSignals, handle: String) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Ignore if target is input or button
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
        }
        let rect = ev
            .current_target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(|el| dom_rect(&el.get_bounding_client_rect()))
            .unwrap_or_default();
        dnd.pending.set(Some(PendingDrag {
            id: handle.clone(),
            start_x: ev.client_x() as f64,
            start_y: ev.client_y() as f64,
            rect,
        }));
    }
}

fn dom_rect(rect: &web_sys::DomRect) -> Rect {
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

/// Snapshot every droppable currently in the document
pub fn collect_droppables() -> Vec<Droppable> {
    let Some(doc) = web_sys::window().and_then(|win| win.document()) else {
        return Vec::new();
    };
    let Ok(nodes) = doc.query_selector_all(&format!("[{}]", DND_ID_ATTR)) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .filter_map(|el| {
            let id = el.get_attribute(DND_ID_ATTR)?;
            let kind = el
                .get_attribute(DND_KIND_ATTR)
                .map(|raw| DroppableKind::from_attr(&raw))
                .unwrap_or(DroppableKind::Item);
            Some(Droppable {
                id,
                kind,
                rect: dom_rect(&el.get_bounding_client_rect()),
            })
        })
        .collect()
}

fn on_document(event: &str, callback: &js_sys::Function) {
    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback(event, callback);
    }
}

/// Bind document-level mousemove, mouseup and Escape handling
pub fn bind_global_handlers(dnd: DndSignals, handlers: DndHandlers) {
    let move_handlers = handlers.clone();
    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let Some(pending) = dnd.pending.get_untracked() else {
            return;
        };
        let (x, y) = (ev.client_x() as f64, ev.client_y() as f64);
        let (dx, dy) = (x - pending.start_x, y - pending.start_y);

        if dnd.dragging.get_untracked().is_none() {
            // Start dragging if moved beyond threshold
            if dx.abs() <= DRAG_THRESHOLD_PX && dy.abs() <= DRAG_THRESHOLD_PX {
                return;
            }
            if !(move_handlers.on_start)(&pending.id) {
                dnd.pending.set(None);
                return;
            }
            dnd.dragging.set(Some(pending.id.clone()));
        }

        dnd.offset.set((dx, dy));
        let active = pending.rect.translate(dx, dy);
        let droppables: Vec<Droppable> = collect_droppables()
            .into_iter()
            .filter(|d| (move_handlers.accepts)(&pending.id, &d.id))
            .collect();
        let over = resolve_collision((x, y), &active, &pending.id, &droppables);
        if over != dnd.over.get_untracked() {
            (move_handlers.on_over)(over.as_deref());
            dnd.over.set(over);
        }
    });
    on_document("mousemove", on_mousemove.as_ref().unchecked_ref());
    on_mousemove.forget();

    let up_handlers = handlers.clone();
    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragging = dnd.dragging.get_untracked();
        let over = dnd.over.get_untracked();
        // Not dragging means a plain click, which fires naturally
        if let Some(dragged) = dragging {
            end_drag(&dnd);
            (up_handlers.on_drop)(&dragged, over.as_deref());
        } else {
            dnd.pending.set(None);
        }
    });
    on_document("mouseup", on_mouseup.as_ref().unchecked_ref());
    on_mouseup.forget();

    let on_keydown = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" && dnd.dragging.get_untracked().is_some() {
            end_drag(&dnd);
            (handlers.on_cancel)();
        }
    });
    on_document("keydown", on_keydown.as_ref().unchecked_ref());
    on_keydown.forget();
}
