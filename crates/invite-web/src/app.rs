//! Wires the controller to the live page: timers, listeners, preloading.

use std::cell::{OnceCell, RefCell};
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use invite_core::{
    AssetManifest, Clock, Controller, InviteConfig, Key, Point, ScreenId, Task, Viewport,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, KeyboardEvent, TouchEvent, TouchList, Window};

use crate::audio::WebAudio;
use crate::dom::{BACK_BUTTON_ID, BOOK_ID, DomView, NEXT_BUTTON_ID, PREV_BUTTON_ID, require};
use crate::error::{WebError, WebResult};
use crate::preload::Preloader;
use crate::style;
use crate::turn::TurnJsFactory;

type Shared = Rc<RefCell<Controller<DomView>>>;

/// Events kept in memory for the lifetime of the page.
const MAX_EVENTS: usize = 200;

thread_local! {
    static MOUNTED: RefCell<Option<Mounted>> = const { RefCell::new(None) };
}

/// Wall-clock milliseconds since mount.
#[derive(Debug, Clone, Copy)]
struct PageClock {
    origin: f64,
}

impl PageClock {
    fn new() -> Self {
        Self {
            origin: js_sys::Date::now(),
        }
    }
}

impl Clock for PageClock {
    fn now_ms(&self) -> u64 {
        (js_sys::Date::now() - self.origin).max(0.0) as u64
    }
}

/// Everything that must outlive `mount`.
struct Mounted {
    _controller: Shared,
    _listeners: Vec<EventListener>,
    _preloader: Preloader,
}

fn viewport(window: &Window) -> Viewport {
    let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or_default()
    };
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// Run `f` on the controller, then hand its new timers to the browser.
/// Input arriving while the controller is busy is dropped.
fn dispatch<R: Default>(shared: &Shared, f: impl FnOnce(&mut Controller<DomView>) -> R) -> R {
    let out = match shared.try_borrow_mut() {
        Ok(mut controller) => f(&mut controller),
        Err(_) => {
            tracing::debug!("controller busy, input dropped");
            R::default()
        }
    };
    arm(shared);
    out
}

/// Move scheduled tasks into browser timeouts. Timeouts are never
/// cancelled, so they are forgotten.
fn arm(shared: &Shared) {
    let scheduled = match shared.try_borrow_mut() {
        Ok(mut controller) => controller.take_scheduled(),
        Err(_) => return,
    };
    for task in scheduled {
        let delay = u32::try_from(task.delay_ms).unwrap_or(u32::MAX);
        defer(Rc::downgrade(shared), delay, task.task);
    }
}

fn defer(weak: Weak<RefCell<Controller<DomView>>>, delay_ms: u32, task: Task) {
    Timeout::new(delay_ms, move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let ran = match shared.try_borrow_mut() {
            Ok(mut controller) => {
                controller.run_task(task);
                true
            }
            Err(_) => false,
        };
        if ran {
            arm(&shared);
        } else {
            defer(Rc::downgrade(&shared), 0, task);
        }
    })
    .forget();
}

fn first_point(touches: TouchList) -> Option<Point> {
    let touch = touches.get(0)?;
    Some(Point::new(
        f64::from(touch.client_x()),
        f64::from(touch.client_y()),
    ))
}

fn on_click(target: &EventTarget, shared: &Shared, f: fn(&mut Controller<DomView>)) -> EventListener {
    let shared = Rc::clone(shared);
    EventListener::new(target, "click", move |_| dispatch(&shared, f))
}

/// Bind the invitation to the current document and start it.
pub fn mount() -> WebResult<()> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::NoDocument)?;

    style::inject(&document)?;
    let view = DomView::bind(&document)?;
    let config = InviteConfig::default();
    let manifest = AssetManifest::for_pages(config.total_pages);

    // The turn library may call back while the controller is mid-call, so
    // its callbacks only queue a pump for later.
    let slot: Rc<OnceCell<Weak<RefCell<Controller<DomView>>>>> = Rc::new(OnceCell::new());
    let wake: Rc<dyn Fn()> = {
        let slot = Rc::clone(&slot);
        Rc::new(move || {
            if let Some(weak) = slot.get() {
                defer(weak.clone(), 0, Task::PumpTurnEvents);
            }
        })
    };

    let mut controller = Controller::new(config, view, PageClock::new())
        .with_turner_factory(TurnJsFactory::new(document.clone(), wake))
        .with_max_events(MAX_EVENTS);
    match WebAudio::new() {
        Ok(audio) => controller = controller.with_audio(audio),
        Err(e) => tracing::warn!(error = %e, "audio unavailable, playing silently"),
    }
    let shared: Shared = Rc::new(RefCell::new(controller));
    // Only ever set here.
    let _ = slot.set(Rc::downgrade(&shared));

    let listeners = listen(&window, &document, &shared)?;
    let preloader = Preloader::start(&manifest)?;

    dispatch(&shared, |c| c.start(viewport(&window)));
    tracing::info!(screen = %shared.borrow().screen(), "invitation mounted");

    MOUNTED.with(|mounted| {
        *mounted.borrow_mut() = Some(Mounted {
            _controller: shared,
            _listeners: listeners,
            _preloader: preloader,
        });
    });
    Ok(())
}

fn listen(window: &Window, document: &Document, shared: &Shared) -> WebResult<Vec<EventListener>> {
    let mut listeners = vec![
        on_click(
            require(document, ScreenId::Invitation.element_id())?.as_ref(),
            shared,
            Controller::go_to_flipbook,
        ),
        on_click(require(document, PREV_BUTTON_ID)?.as_ref(), shared, Controller::previous_page),
        on_click(require(document, NEXT_BUTTON_ID)?.as_ref(), shared, Controller::next_page),
    ];
    if let Some(back) = document.get_element_by_id(BACK_BUTTON_ID) {
        listeners.push(on_click(&back, shared, Controller::go_back_to_invitation));
    }

    let book = require(document, BOOK_ID)?;
    listeners.push({
        let shared = Rc::clone(shared);
        EventListener::new(&book, "touchstart", move |event| {
            let Some(at) = event
                .dyn_ref::<TouchEvent>()
                .and_then(|e| first_point(e.touches()))
            else {
                return;
            };
            dispatch(&shared, |c| c.touch_start(at));
        })
    });
    listeners.push({
        let shared = Rc::clone(shared);
        EventListener::new(&book, "touchend", move |event| {
            let Some(at) = event
                .dyn_ref::<TouchEvent>()
                .and_then(|e| first_point(e.changed_touches()))
            else {
                return;
            };
            dispatch(&shared, |c| c.touch_end(at));
        })
    });

    listeners.push({
        let shared = Rc::clone(shared);
        let win = window.clone();
        EventListener::new(window, "resize", move |_| {
            let vp = viewport(&win);
            dispatch(&shared, |c| c.resize(vp));
        })
    });

    let active = EventListenerOptions::enable_prevent_default();
    listeners.push({
        let shared = Rc::clone(shared);
        EventListener::new_with_options(document, "keydown", active, move |event: &Event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|e| Key::from_dom(&e.key()))
            else {
                return;
            };
            if dispatch(&shared, |c| c.key_down(key)) {
                event.prevent_default();
            }
        })
    });
    listeners.push({
        let shared = Rc::clone(shared);
        EventListener::new_with_options(document, "contextmenu", active, move |event: &Event| {
            if dispatch(&shared, |c| c.blocks_context_menu()) {
                event.prevent_default();
            }
        })
    });
    listeners.push({
        let shared = Rc::clone(shared);
        EventListener::new_with_options(document, "touchend", active, move |event: &Event| {
            if dispatch(&shared, |c| c.document_touch_end()) {
                event.prevent_default();
            }
        })
    });

    tracing::debug!(count = listeners.len(), "listeners attached");
    Ok(listeners)
}
