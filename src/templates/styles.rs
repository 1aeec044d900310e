//! CSS styles for the dashboard.
//!
//! Contains the main STYLE constant shared by every page.

// ============================================================================
// CSS Styles
// ============================================================================

pub const STYLE: &str = r#"
/* Solarized Light Theme */
:root {
    --base03: #002b36;
    --base02: #073642;
    --base01: #586e75;
    --base00: #657b83;
    --base0: #839496;
    --base1: #93a1a1;
    --base2: #eee8d5;
    --base3: #fdf6e3;

    --yellow: #b58900;
    --orange: #cb4b16;
    --red: #dc322f;
    --magenta: #d33682;
    --violet: #6c71c4;
    --blue: #268bd2;
    --cyan: #2aa198;
    --green: #859900;

    --bg: var(--base3);
    --fg: var(--base00);
    --muted: var(--base1);
    --border: var(--base2);
    --link: var(--blue);
    --link-hover: var(--cyan);
    --accent: var(--base2);
    --highlight: #f7f2e2;
}

* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    color: var(--fg);
    background: var(--bg);
}

.container {
    max-width: 1400px;
    margin: 0 auto;
    padding: 1rem;
}

a { color: var(--link); text-decoration: none; }
a:hover { color: var(--link-hover); text-decoration: underline; }

h1, h2, h3 { font-weight: 600; margin-top: 1em; margin-bottom: 0.5em; }
h1 { font-size: 1.5rem; }
h2 { font-size: 1.1rem; }

.nav-bar {
    position: sticky;
    top: 0;
    background: var(--bg);
    border-bottom: 1px solid var(--border);
    padding: 0.5rem 1rem;
    display: flex;
    gap: 1rem;
    align-items: center;
    flex-wrap: wrap;
    z-index: 100;
}

.nav-bar a { font-size: 0.9rem; }
.nav-bar .brand { font-weight: 600; color: var(--base01); }
.nav-bar .spacer { flex: 1; }
.nav-bar .stats { font-size: 0.8rem; color: var(--muted); }

.btn {
    padding: 0.4rem 0.9rem;
    border: 1px solid var(--base1);
    border-radius: 4px;
    background: var(--blue);
    color: var(--base3);
    cursor: pointer;
    font-size: 0.85rem;
    font-family: inherit;
    text-decoration: none;
    display: inline-block;
}

.btn:hover { background: var(--cyan); border-color: var(--cyan); }
.btn.secondary { background: var(--base2); color: var(--base00); border-color: var(--base1); }
.btn.secondary:hover { background: var(--base3); }

input[type="text"], input[type="number"] {
    padding: 0.35rem 0.6rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: var(--bg);
    color: var(--fg);
    font-size: 0.85rem;
    font-family: inherit;
}
input[type="number"] { width: 4.5rem; }

.message {
    padding: 0.75rem 1rem;
    border-radius: 4px;
    margin: 1rem 0;
}
.message.error { background: #fdf2f2; color: var(--red); border: 1px solid var(--red); }
.message.info { background: var(--highlight); color: var(--base01); border: 1px solid var(--border); }

/* Dashboard layout */
.dashboard {
    display: grid;
    grid-template-columns: 280px 1fr 340px;
    gap: 1rem;
    align-items: start;
}

.panel {
    border: 1px solid var(--border);
    border-radius: 4px;
    padding: 0.75rem;
    background: var(--bg);
}
.panel h2 { margin-top: 0; }

.control-group { margin-bottom: 1rem; }
.control-group label { display: block; font-size: 0.8rem; color: var(--base01); margin-bottom: 0.25rem; }
.control-row { display: flex; gap: 0.5rem; align-items: center; flex-wrap: wrap; }

.category-list { list-style: none; font-size: 0.85rem; }
.category-list li { display: flex; align-items: center; gap: 0.4rem; }
.category-swatch { width: 10px; height: 10px; border-radius: 50%; display: inline-block; }

.chips { display: flex; flex-wrap: wrap; gap: 0.3rem; margin-top: 0.4rem; }
.chip {
    font-size: 0.75rem;
    padding: 0.1rem 0.5rem;
    border-radius: 10px;
    background: var(--accent);
    cursor: pointer;
}
.chip:hover { background: var(--base1); color: var(--base3); }

.search-wrap { position: relative; }
.search-results {
    position: absolute;
    top: 100%; left: 0; right: 0;
    background: var(--bg);
    border: 1px solid var(--border);
    border-radius: 0 0 4px 4px;
    list-style: none;
    max-height: 300px;
    overflow-y: auto;
    z-index: 50;
}
.search-results li { padding: 0.3rem 0.6rem; font-size: 0.85rem; cursor: pointer; }
.search-results li:hover { background: var(--highlight); }
.search-results .cat { font-size: 0.7rem; color: var(--muted); margin-left: 0.4rem; }

.paper-list { list-style: none; }
.paper-item { padding: 0.5rem 0; border-bottom: 1px solid var(--border); font-size: 0.85rem; }
.paper-item:last-child { border-bottom: none; }
.paper-item .title { font-weight: 600; }
.paper-item .meta { font-size: 0.75rem; color: var(--muted); }

.muted { color: var(--muted); font-size: 0.85rem; }
"#;
