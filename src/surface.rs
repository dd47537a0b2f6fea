//! Seams between the gate and the page.
//!
//! [`BannerSurface`] is both the node factory (mount/fade/unmount) and the
//! UI event source (control handler registration). [`Timer`] is the page's
//! one-shot timeout primitive. The browser implementations live in `web`;
//! tests drive fakes.

use crate::error::Result;
use crate::markup::{BannerMarkup, Control};

/// Handler invoked when a control is activated.
pub type ControlHandler = Box<dyn Fn(Control)>;

/// Where the banner is drawn and where its control events come from.
pub trait BannerSurface {
    /// Inject the style block and the overlay (containing the modal).
    fn mount(&self, markup: &BannerMarkup) -> Result<()>;

    /// Register `handler` for activations of `control`.
    ///
    /// Only valid after [`mount`](Self::mount). Handlers are dropped on
    /// [`unmount`](Self::unmount).
    fn on_control(&self, control: Control, handler: ControlHandler) -> Result<()>;

    /// Start the overlay's exit transition.
    fn begin_fade_out(&self, duration_ms: u32);

    /// Remove the overlay and style block. Removing twice is a no-op.
    fn unmount(&self);
}

/// One-shot, fire-and-forget timeout.
pub trait Timer {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
}
