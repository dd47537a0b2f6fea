//! Fakes shared by the integration tests.

#![allow(dead_code)]

use consent_gate::{
    BannerMarkup, BannerSurface, ConsentError, ConsentGate, ConsentStore, Control,
    ControlHandler, GateConfig, MemoryStore, Result, Timer,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

pub type TestGate<S = MemoryStore> = ConsentGate<S, FakeSurface, ManualTimer>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Gate over `store` with a fresh surface and timer.
pub fn harness<S: ConsentStore + 'static>(
    store: S,
) -> (Rc<TestGate<S>>, Rc<FakeSurface>, ManualTimer) {
    init_tracing();
    let surface = Rc::new(FakeSurface::default());
    let timer = ManualTimer::default();
    let gate = ConsentGate::new(
        GateConfig::default(),
        store,
        Rc::clone(&surface),
        timer.clone(),
    )
    .expect("default config is valid");
    (gate, surface, timer)
}

// =============================================================================
// SURFACE
// =============================================================================

/// In-memory document: counts injected nodes and records handlers.
#[derive(Default)]
pub struct FakeSurface {
    overlays: Cell<usize>,
    styles: Cell<usize>,
    fade_out_ms: Cell<Option<u32>>,
    unmounts: Cell<usize>,
    markup: RefCell<Option<BannerMarkup>>,
    handlers: RefCell<HashMap<Control, Rc<dyn Fn(Control)>>>,
}

impl FakeSurface {
    pub fn overlay_count(&self) -> usize {
        self.overlays.get()
    }

    pub fn style_count(&self) -> usize {
        self.styles.get()
    }

    pub fn fade_out_ms(&self) -> Option<u32> {
        self.fade_out_ms.get()
    }

    pub fn unmount_count(&self) -> usize {
        self.unmounts.get()
    }

    pub fn markup(&self) -> Option<BannerMarkup> {
        self.markup.borrow().clone()
    }

    pub fn has_handler(&self, control: Control) -> bool {
        self.handlers.borrow().contains_key(&control)
    }

    /// Activate a control the way a user click would.
    pub fn click(&self, control: Control) {
        let handler = self.handlers.borrow().get(&control).cloned();
        if let Some(handler) = handler {
            handler(control);
        }
    }
}

impl BannerSurface for FakeSurface {
    fn mount(&self, markup: &BannerMarkup) -> Result<()> {
        self.overlays.set(self.overlays.get() + 1);
        self.styles.set(self.styles.get() + 1);
        *self.markup.borrow_mut() = Some(markup.clone());
        Ok(())
    }

    fn on_control(&self, control: Control, handler: ControlHandler) -> Result<()> {
        if self.overlays.get() == 0 {
            return Err(ConsentError::Dom("banner is not mounted".to_string()));
        }
        self.handlers.borrow_mut().insert(control, Rc::from(handler));
        Ok(())
    }

    fn begin_fade_out(&self, duration_ms: u32) {
        self.fade_out_ms.set(Some(duration_ms));
    }

    fn unmount(&self) {
        self.unmounts.set(self.unmounts.get() + 1);
        self.overlays.set(0);
        self.styles.set(0);
        let handlers = std::mem::take(&mut *self.handlers.borrow_mut());
        drop(handlers);
    }
}

// =============================================================================
// TIMER
// =============================================================================

#[derive(Default)]
struct Clock {
    now_ms: u32,
    pending: Vec<(u32, Box<dyn FnOnce()>)>,
}

/// Timer driven by hand: tasks run when `advance` passes their deadline.
#[derive(Clone, Default)]
pub struct ManualTimer {
    clock: Rc<RefCell<Clock>>,
}

impl ManualTimer {
    pub fn pending(&self) -> usize {
        self.clock.borrow().pending.len()
    }

    pub fn advance(&self, ms: u32) {
        let due = {
            let mut clock = self.clock.borrow_mut();
            clock.now_ms += ms;
            let now = clock.now_ms;
            let (due, waiting): (Vec<_>, Vec<_>) =
                clock.pending.drain(..).partition(|(at, _)| *at <= now);
            clock.pending = waiting;
            due
        };
        for (_, task) in due {
            task();
        }
    }
}

impl Timer for ManualTimer {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let mut clock = self.clock.borrow_mut();
        let at = clock.now_ms + delay_ms;
        clock.pending.push((at, task));
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Store that can be told to throw, like a disabled or full `localStorage`.
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_reads: Rc<Cell<bool>>,
    pub fail_writes: Rc<Cell<bool>>,
    pub writes: Rc<Cell<usize>>,
}

impl ConsentStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.get() {
            return Err(ConsentError::StorageRead {
                key: key.to_string(),
                reason: "SecurityError".to_string(),
            });
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.get() {
            return Err(ConsentError::StorageWrite {
                key: key.to_string(),
                reason: "QuotaExceededError".to_string(),
            });
        }
        self.writes.set(self.writes.get() + 1);
        self.inner.set(key, value)
    }
}
