//! Library-backed viewer over the jQuery turn.js plugin.

use std::cell::RefCell;
use std::rc::Rc;

use invite_core::{PageTurner, TurnEvent, TurnOptions, TurnerFactory, TurnerKind, View, Viewport};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Document;

use crate::dom::BOOK_ID;
use crate::error::describe;

type Callback = Closure<dyn FnMut(JsValue, JsValue, JsValue)>;

/// A scalar option handed to turn.js.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionValue {
    /// A number.
    Number(f64),
    /// A boolean.
    Flag(bool),
}

impl From<OptionValue> for JsValue {
    fn from(value: OptionValue) -> Self {
        match value {
            OptionValue::Number(n) => JsValue::from_f64(n),
            OptionValue::Flag(b) => JsValue::from_bool(b),
        }
    }
}

/// The turn.js option bag, minus the `when` callbacks.
pub fn option_pairs(
    viewport: Viewport,
    options: &TurnOptions,
    start_page: u32,
) -> Vec<(&'static str, OptionValue)> {
    vec![
        ("width", OptionValue::Number(viewport.width)),
        ("height", OptionValue::Number(viewport.height)),
        ("autoCenter", OptionValue::Flag(options.auto_center)),
        ("acceleration", OptionValue::Flag(options.acceleration)),
        ("gradients", OptionValue::Flag(options.gradients)),
        ("elevation", OptionValue::Number(f64::from(options.elevation))),
        ("duration", OptionValue::Number(f64::from(options.duration_ms))),
        ("page", OptionValue::Number(f64::from(start_page))),
    ]
}

/// The global jQuery function, if it carries the `turn` plugin.
fn jquery_with_turn() -> Option<Function> {
    let jquery = Reflect::get(&js_sys::global(), &JsValue::from_str("$"))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    let plugins = Reflect::get(&jquery, &JsValue::from_str("fn")).ok()?;
    let turn = Reflect::get(&plugins, &JsValue::from_str("turn")).ok()?;
    turn.is_function().then_some(jquery)
}

/// Builds [`TurnJs`] viewers on the `#flipbook` element.
///
/// `wake` runs after every library callback so the host can schedule a
/// pump of the buffered events.
pub struct TurnJsFactory {
    document: Document,
    wake: Rc<dyn Fn()>,
}

impl TurnJsFactory {
    /// Factory for `document`; `wake` is called after each callback.
    pub fn new(document: Document, wake: Rc<dyn Fn()>) -> Self {
        Self { document, wake }
    }
}

impl TurnerFactory for TurnJsFactory {
    fn create(
        &mut self,
        viewport: Viewport,
        options: &TurnOptions,
        _total_pages: u32,
        start_page: u32,
    ) -> Option<Box<dyn PageTurner>> {
        let jquery = jquery_with_turn()?;
        let book = self.document.get_element_by_id(BOOK_ID)?;
        match TurnJs::init(&jquery, &book, viewport, options, start_page, Rc::clone(&self.wake)) {
            Ok(turner) => Some(Box::new(turner)),
            Err(e) => {
                tracing::warn!(error = %describe(&e), "turn library failed to initialize");
                None
            }
        }
    }
}

/// A live turn.js book.
pub struct TurnJs {
    book: JsValue,
    turn: Function,
    inbox: Rc<RefCell<Vec<TurnEvent>>>,
    _callbacks: Vec<Callback>,
}

impl TurnJs {
    fn init(
        jquery: &Function,
        element: &web_sys::Element,
        viewport: Viewport,
        options: &TurnOptions,
        start_page: u32,
        wake: Rc<dyn Fn()>,
    ) -> Result<Self, JsValue> {
        let book = jquery.call1(&JsValue::NULL, element)?;
        let turn = Reflect::get(&book, &JsValue::from_str("turn"))?.dyn_into::<Function>()?;

        let bag = Object::new();
        for (key, value) in option_pairs(viewport, options, start_page) {
            Reflect::set(&bag, &JsValue::from_str(key), &value.into())?;
        }

        let inbox = Rc::new(RefCell::new(Vec::new()));
        let when = Object::new();
        let mut callbacks = Vec::new();
        let hooks: [(&str, fn(u32) -> TurnEvent); 3] = [
            ("start", TurnEvent::Start),
            ("turning", TurnEvent::Turning),
            ("turned", TurnEvent::Turned),
        ];
        for (name, make) in hooks {
            let inbox = Rc::clone(&inbox);
            let wake = Rc::clone(&wake);
            let callback = Callback::new(move |_event: JsValue, page: JsValue, _view: JsValue| {
                let Some(page) = page.as_f64() else {
                    return;
                };
                inbox.borrow_mut().push(make(page as u32));
                wake();
            });
            Reflect::set(&when, &JsValue::from_str(name), callback.as_ref())?;
            callbacks.push(callback);
        }
        Reflect::set(&bag, &JsValue::from_str("when"), &when)?;

        turn.call1(&book, &bag)?;
        tracing::info!(%viewport, start_page, "turn library initialized");

        Ok(Self {
            book,
            turn,
            inbox,
            _callbacks: callbacks,
        })
    }

    fn command(&self, args: &[JsValue]) {
        let array = args.iter().collect::<Array>();
        if let Err(e) = self.turn.apply(&self.book, &array) {
            tracing::warn!(error = %describe(&e), "turn command failed");
        }
    }
}

impl PageTurner for TurnJs {
    fn kind(&self) -> TurnerKind {
        TurnerKind::Library
    }

    fn advance(&mut self, _view: &mut dyn View) {
        self.command(&[JsValue::from_str("next")]);
    }

    fn retreat(&mut self, _view: &mut dyn View) {
        self.command(&[JsValue::from_str("previous")]);
    }

    fn seek(&mut self, page: u32, _view: &mut dyn View) {
        self.command(&[JsValue::from_str("page"), JsValue::from_f64(f64::from(page))]);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.command(&[
            JsValue::from_str("size"),
            JsValue::from_f64(viewport.width),
            JsValue::from_f64(viewport.height),
        ]);
    }

    fn destroy(&mut self) {
        self.command(&[JsValue::from_str("destroy")]);
        self.inbox.borrow_mut().clear();
    }

    fn drain_events(&mut self) -> Vec<TurnEvent> {
        std::mem::take(&mut *self.inbox.borrow_mut())
    }
}
