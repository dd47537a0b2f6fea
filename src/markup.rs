//! Banner markup: the overlay/modal fragment and its style block.
//!
//! Rendering is pure string building so it can be checked natively; the
//! browser surface only injects the result.

use crate::config::GateConfig;
use html_escape::encode_double_quoted_attribute;
use std::fmt;

const BANNER_TEXT: &str = "By clicking Accept you are agreeing to the use of all cookies which will \
allow us to provide you with the most relevant experience when visiting or re-visiting this \
website. This means that your personal preferences will be remembered when you use this \
website. You can change your consent or choose specific settings by clicking \"Cookie \
Settings\". By clicking \"Reject All\" we will not use any non-essential cookies. Essential \
cookies will still be used for the website to function properly. Please see our";

/// One of the three banner controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Settings,
    Reject,
    Accept,
}

impl Control {
    /// Render order, left to right.
    pub const ALL: [Control; 3] = [Control::Settings, Control::Reject, Control::Accept];

    pub fn label(self) -> &'static str {
        match self {
            Control::Settings => "Cookie Settings",
            Control::Reject => "Reject All",
            Control::Accept => "Accept",
        }
    }

    /// Element id of this control under `config`.
    pub fn element_id(self, config: &GateConfig) -> &str {
        match self {
            Control::Settings => &config.control_ids.settings,
            Control::Reject => &config.control_ids.reject,
            Control::Accept => &config.control_ids.accept,
        }
    }

    /// Whether activating this control completes the consent flow.
    pub fn completes_consent(self) -> bool {
        matches!(self, Control::Accept | Control::Reject)
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Settings => write!(f, "settings"),
            Control::Reject => write!(f, "reject"),
            Control::Accept => write!(f, "accept"),
        }
    }
}

/// Rendered banner, ready to inject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerMarkup {
    pub overlay_id: String,
    pub modal_id: String,
    /// Inner HTML of the modal element.
    pub modal_html: String,
    /// Contents of the `<style>` block.
    pub css: String,
    /// Element id of each control, in render order.
    pub controls: Vec<(Control, String)>,
}

impl BannerMarkup {
    pub fn render(config: &GateConfig) -> Self {
        Self {
            overlay_id: config.overlay_id.clone(),
            modal_id: config.modal_id.clone(),
            modal_html: render_modal_html(config),
            css: render_css(config),
            controls: Control::ALL
                .iter()
                .map(|c| (*c, c.element_id(config).to_string()))
                .collect(),
        }
    }

    /// Element id of `control` in this markup.
    pub fn control_id(&self, control: Control) -> Option<&str> {
        self.controls
            .iter()
            .find(|(c, _)| *c == control)
            .map(|(_, id)| id.as_str())
    }
}

fn render_modal_html(config: &GateConfig) -> String {
    let buttons: String = Control::ALL
        .iter()
        .map(|c| {
            format!(
                r#"<button type="button" id="{}">{}</button>"#,
                encode_double_quoted_attribute(c.element_id(config)),
                c.label()
            )
        })
        .collect();

    format!(
        concat!(
            r#"<div class="cookie-consent-content">"#,
            r#"<p class="cookie-consent-text">{text} "#,
            r#"<a href="{cookie}">cookie policy</a> and "#,
            r#"<a href="{privacy}">privacy policy</a> "#,
            "for more information about how we process your personal data.</p>",
            r#"<div class="cookie-consent-actions">{buttons}</div>"#,
            "</div>"
        ),
        text = BANNER_TEXT,
        cookie = encode_double_quoted_attribute(&config.cookie_policy_href),
        privacy = encode_double_quoted_attribute(&config.privacy_policy_href),
        buttons = buttons,
    )
}

fn render_css(config: &GateConfig) -> String {
    let t = &config.timing;
    let ids = &config.control_ids;

    format!(
        r#"#{overlay} {{
    position: fixed;
    top: 0;
    left: 0;
    right: 0;
    bottom: 0;
    background-color: rgba(10, 25, 49, 0.6);
    z-index: {z};
    display: flex;
    align-items: center;
    justify-content: center;
    opacity: 0;
    animation: fadeIn {fade_in}ms ease-out forwards;
}}
#{modal} {{
    background-color: #FFFFFF;
    color: #333333;
    padding: 25px 30px;
    box-shadow: 0 5px 20px rgba(0, 0, 0, 0.2);
    font-family: 'Lora', 'Georgia', serif;
    border-radius: 8px;
    width: 90%;
    max-width: {max_width}px;
    opacity: 0;
    transform: scale(0.95);
    animation: scaleIn {scale_in}ms {scale_delay}ms ease-out forwards;
}}
@keyframes fadeIn {{
    to {{ opacity: 1; }}
}}
@keyframes scaleIn {{
    to {{ opacity: 1; transform: scale(1); }}
}}
.cookie-consent-content {{
    display: flex;
    flex-direction: column;
    gap: 20px;
}}
.cookie-consent-text {{
    margin: 0;
    font-size: 14px;
    line-height: 1.6;
    text-align: left;
}}
.cookie-consent-text a {{
    color: #2E7D32;
    text-decoration: underline;
    transition: color 0.3s;
}}
.cookie-consent-text a:hover {{
    color: #84CC16;
}}
.cookie-consent-actions {{
    display: flex;
    align-items: center;
    justify-content: center;
    gap: 12px;
    flex-wrap: wrap;
}}
.cookie-consent-actions button {{
    padding: 10px 20px;
    border: none;
    border-radius: 6px;
    font-size: 14px;
    font-weight: 700;
    cursor: pointer;
    transition: background-color 0.3s, color 0.3s;
    font-family: 'Lora', 'Georgia', serif;
}}
#{accept} {{
    background-color: #2E7D32;
    color: #FFFFFF;
    border: 1px solid #2E7D32;
}}
#{accept}:hover {{
    background-color: #1b5e20;
    border-color: #1b5e20;
}}
#{settings},
#{reject} {{
    background-color: transparent;
    color: #333333;
    border: 1px solid #cccccc;
}}
#{settings}:hover,
#{reject}:hover {{
    background-color: #f0f0f0;
}}
"#,
        overlay = config.overlay_id,
        modal = config.modal_id,
        accept = ids.accept,
        reject = ids.reject,
        settings = ids.settings,
        z = config.z_index,
        fade_in = t.fade_in_ms,
        scale_in = t.scale_in_ms,
        scale_delay = t.scale_in_delay_ms,
        max_width = config.max_width_px,
    )
}
