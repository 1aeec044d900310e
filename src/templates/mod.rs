//! HTML templates and styling for the dashboard.
//!
//! This module contains all CSS styles, JavaScript code, and HTML
//! generation functions for the web interface.
//!
//! ## Module Structure
//!
//! - `styles` - CSS constants and theme definitions
//! - `components` - Shared HTML components (nav bar, base template)
//! - `network_js` - D3 renderer for the method network, paper panel and trends

mod components;
mod network_js;
mod styles;

pub use components::{base_html, html_escape, nav_bar};
pub use network_js::{network_css, render_network_js, NetworkRendererConfig};
pub use styles::STYLE;
