//! Shared HTML components for the dashboard.
//!
//! Contains the navigation bar, HTML escaping and the base HTML template.

use super::styles::STYLE;

// ============================================================================
// Escaping
// ============================================================================

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ============================================================================
// Navigation Bar
// ============================================================================

/// `stats` is a short summary shown on the right, e.g. paper and method counts.
pub fn nav_bar(stats: &str) -> String {
    format!(
        r#"<nav class="nav-bar">
            <a class="brand" href="/">Method Network</a>
            <a href="/api/state">State</a>
            <a href="/api/trends">Trends</a>
            <span class="spacer"></span>
            <span class="stats">{}</span>
        </nav>"#,
        html_escape(stats)
    )
}

// ============================================================================
// Base HTML Template
// ============================================================================

pub fn base_html(title: &str, content: &str, stats: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    {nav}
    <div class="container">
        {content}
    </div>
</body>
</html>"#,
        title = html_escape(title),
        nav = nav_bar(stats),
    )
}
