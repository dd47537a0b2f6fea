//! Browser adapters: `localStorage`, the DOM and `setTimeout`.
//!
//! Only compiled for wasm32. Event listeners are held as `Closure`s by the
//! mounted banner and dropped on unmount, which also releases the gate.

use crate::config::GateConfig;
use crate::error::{ConsentError, Result};
use crate::gate::{ConsentGate, GateState};
use crate::markup::{BannerMarkup, Control};
use crate::store::ConsentStore;
use crate::surface::{BannerSurface, ControlHandler, Timer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, Storage, Window};

/// Gate wired to the real page.
pub type BrowserGate = ConsentGate<LocalStorageStore, DomSurface, WindowTimer>;

fn js_reason(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}

fn dom_err(value: JsValue) -> ConsentError {
    ConsentError::Dom(js_reason(&value))
}

fn to_js(err: ConsentError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Log a bootstrap failure. Storage failures are expected in private modes
/// and sandboxed frames; the banner simply comes back on the next load.
fn report(err: &ConsentError) {
    if err.is_storage() {
        tracing::warn!(error = %err, "consent store unusable; banner will reappear on next load");
    } else {
        tracing::error!(error = %err, "consent gate failed to initialize");
    }
}

// =============================================================================
// STORE
// =============================================================================

/// `window.localStorage`.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn from_window(window: &Window) -> Result<Self> {
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(ConsentError::StorageUnavailable(
                "localStorage is not available".to_string(),
            )),
            Err(e) => Err(ConsentError::StorageUnavailable(js_reason(&e))),
        }
    }
}

impl ConsentStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| ConsentError::StorageRead {
                key: key.to_string(),
                reason: js_reason(&e),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| ConsentError::StorageWrite {
                key: key.to_string(),
                reason: js_reason(&e),
            })
    }
}

// =============================================================================
// SURFACE
// =============================================================================

struct Mounted {
    style: Element,
    overlay: HtmlElement,
    markup: BannerMarkup,
    listeners: Vec<(Element, Closure<dyn FnMut(Event)>)>,
}

/// Banner drawn into `document`: style block in `<head>`, overlay in `<body>`.
pub struct DomSurface {
    document: Document,
    mounted: RefCell<Option<Mounted>>,
}

impl DomSurface {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            mounted: RefCell::new(None),
        }
    }

    fn create(&self, tag: &str) -> Result<Element> {
        self.document.create_element(tag).map_err(dom_err)
    }
}

impl BannerSurface for DomSurface {
    fn mount(&self, markup: &BannerMarkup) -> Result<()> {
        let head = self
            .document
            .head()
            .ok_or_else(|| ConsentError::Dom("document has no <head>".to_string()))?;
        let body = self
            .document
            .body()
            .ok_or_else(|| ConsentError::Dom("document has no <body>".to_string()))?;

        let style = self.create("style")?;
        style.set_text_content(Some(&markup.css));

        let modal = self.create("div")?;
        modal.set_id(&markup.modal_id);
        modal.set_inner_html(&markup.modal_html);

        let overlay = self
            .create("div")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| ConsentError::Dom("overlay is not an HTMLElement".to_string()))?;
        overlay.set_id(&markup.overlay_id);
        overlay.append_child(&modal).map_err(dom_err)?;

        head.append_child(&style).map_err(dom_err)?;
        if let Err(e) = body.append_child(&overlay) {
            style.remove();
            return Err(dom_err(e));
        }

        *self.mounted.borrow_mut() = Some(Mounted {
            style,
            overlay,
            markup: markup.clone(),
            listeners: Vec::new(),
        });
        tracing::debug!(overlay = %markup.overlay_id, "consent banner mounted");
        Ok(())
    }

    fn on_control(&self, control: Control, handler: ControlHandler) -> Result<()> {
        let mut mounted = self.mounted.borrow_mut();
        let mounted = mounted
            .as_mut()
            .ok_or_else(|| ConsentError::Dom("banner is not mounted".to_string()))?;

        let id = mounted
            .markup
            .control_id(control)
            .ok_or_else(|| ConsentError::Dom(format!("no element id for {} control", control)))?;
        let button = self
            .document
            .get_element_by_id(id)
            .ok_or_else(|| ConsentError::Dom(format!("control #{} not found", id)))?;

        let callback = Closure::<dyn FnMut(Event)>::new(move |_event: Event| handler(control));
        button
            .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())
            .map_err(dom_err)?;
        mounted.listeners.push((button, callback));
        Ok(())
    }

    fn begin_fade_out(&self, duration_ms: u32) {
        if let Some(mounted) = self.mounted.borrow().as_ref() {
            let style = mounted.overlay.style();
            let transition = format!("opacity {}ms", duration_ms);
            if style.set_property("transition", &transition).is_err()
                || style.set_property("opacity", "0").is_err()
            {
                tracing::warn!("could not start consent banner fade-out");
            }
        }
    }

    fn unmount(&self) {
        // Take first: dropping the listeners may drop the last gate handle.
        let mounted = self.mounted.borrow_mut().take();
        let Some(mounted) = mounted else {
            return;
        };

        for (button, callback) in &mounted.listeners {
            let _ = button
                .remove_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
        }
        mounted.overlay.remove();
        mounted.style.remove();
        tracing::debug!("consent banner unmounted");
    }
}

// =============================================================================
// TIMER
// =============================================================================

/// `window.setTimeout`.
pub struct WindowTimer {
    window: Window,
}

impl WindowTimer {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Timer for WindowTimer {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let callback = Closure::once_into_js(move || task());
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            tracing::error!(reason = %js_reason(&e), "setTimeout failed; banner will not be removed");
        }
    }
}

// =============================================================================
// ENTRY POINT
// =============================================================================

/// Build the gate for this page and run `initialize()`.
pub fn bootstrap(window: Window, document: Document, config: GateConfig) -> Result<GateState> {
    let store = LocalStorageStore::from_window(&window)?;
    let surface = Rc::new(DomSurface::new(document));
    let timer = WindowTimer::new(window);
    let gate: Rc<BrowserGate> = ConsentGate::new(config, store, surface, timer)?;
    gate.initialize()
}

/// `initConsentGate(config?)`
///
/// `config` is an optional partial [`GateConfig`] object. Runs immediately
/// when the document is parsed, otherwise on `DOMContentLoaded`.
#[wasm_bindgen(js_name = initConsentGate)]
pub fn init_consent_gate(config: JsValue) -> std::result::Result<(), JsValue> {
    let config: GateConfig = if config.is_undefined() || config.is_null() {
        GateConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };
    config.validate().map_err(to_js)?;

    let window =
        web_sys::window().ok_or_else(|| to_js(ConsentError::Dom("no window".to_string())))?;
    let document = window
        .document()
        .ok_or_else(|| to_js(ConsentError::Dom("no document".to_string())))?;

    if document.ready_state() != "loading" {
        return bootstrap(window, document, config).map(|_| ()).map_err(|e| {
            report(&e);
            to_js(e)
        });
    }

    let target = document.clone();
    let deferred = Closure::once_into_js(move || {
        if let Err(e) = bootstrap(window, document, config) {
            report(&e);
        }
    });
    target
        .add_event_listener_with_callback("DOMContentLoaded", deferred.unchecked_ref())
        .map_err(|e| to_js(dom_err(e)))?;
    Ok(())
}
