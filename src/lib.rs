//! Consent Gate - cookie consent banner for the browser
//!
//! Shows a consent banner on first visit, persists the visitor's choice in
//! the origin's key-value store, and stays silent on later loads.
//!
//! The decision logic ([`ConsentGate`]) only sees three seams: a
//! [`ConsentStore`], a [`BannerSurface`] and a [`Timer`]. On wasm32 the
//! `web` module binds them to `localStorage`, the DOM and `setTimeout`, and
//! exports `initConsentGate` to JS.

pub mod config;
pub mod error;
pub mod gate;
pub mod markup;
pub mod store;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ControlIds, GateConfig, Timing};
pub use error::{ConsentError, Result};
pub use gate::{ConsentGate, Decision, GateState};
pub use markup::{BannerMarkup, Control};
pub use store::{ConsentStore, MemoryStore};
pub use surface::{BannerSurface, ControlHandler, Timer};

/// Store key of the consent record.
pub const DEFAULT_STORAGE_KEY: &str = "sukar_green_energy_cookie_consent";

/// Persisted value meaning the consent flow is complete.
pub const DEFAULT_GRANTED_VALUE: &str = "true";

/// Overlay entrance fade (ms).
pub const DEFAULT_FADE_IN_MS: u32 = 300;

/// Modal entrance scale (ms), started after [`DEFAULT_SCALE_IN_DELAY_MS`].
pub const DEFAULT_SCALE_IN_MS: u32 = 300;
pub const DEFAULT_SCALE_IN_DELAY_MS: u32 = 100;

/// Overlay exit fade (ms).
pub const DEFAULT_FADE_OUT_MS: u32 = 300;

/// Delay between the decision and node removal (ms). Never shorter than the
/// exit fade.
pub const DEFAULT_REMOVAL_DELAY_MS: u32 = 300;

pub const DEFAULT_Z_INDEX: u32 = 2000;
pub const DEFAULT_MAX_WIDTH_PX: u32 = 550;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    tracing::debug!("consent-gate wasm loaded");
}
