//! D3.js rendering engine for the method network.
//!
//! Generates the `<style>` and `<script>` blocks for the dashboard. The
//! script never computes layout or highlight itself: it draws the node and
//! edge list returned by `/api/network` and `/api/event` and posts one
//! selection event per click.

pub struct NetworkRendererConfig {
    /// CSS selector for the SVG container (e.g. "#network-container").
    pub container_selector: String,
    pub papers_selector: String,
    pub trends_selector: String,
    /// Default for the top-N input.
    pub top_n: usize,
    /// First dashboard payload, embedded directly in the page.
    pub payload_json: String,
}

/// Returns the `<style>` block with `.mn-` prefixed classes.
pub fn network_css() -> String {
    r#"
        .mn-container {
            position: relative;
            border: 1px solid var(--border);
            border-radius: 4px;
            background: var(--accent);
            height: calc(100vh - 160px);
            min-height: 480px;
        }
        .mn-container svg { width: 100%; height: 100%; }

        .mn-link { stroke: var(--base01); cursor: pointer; }
        .mn-link.highlighted { stroke: var(--red); }

        .mn-node circle { cursor: pointer; stroke: var(--bg); stroke-width: 1.5px; }
        .mn-node.focus circle { stroke: var(--base02); stroke-width: 3px; }
        .mn-node.neighbor circle { stroke: var(--base01); stroke-width: 2px; }
        .mn-node.dimmed { opacity: 0.2; }
        .mn-node text {
            font-size: 10px;
            fill: var(--fg);
            pointer-events: none;
            dominant-baseline: middle;
        }

        .mn-tooltip {
            position: absolute;
            background: var(--bg);
            border: 1px solid var(--border);
            border-radius: 6px;
            padding: 0.5rem 0.75rem;
            font-size: 0.8rem;
            pointer-events: none;
            z-index: 1001;
            box-shadow: 0 4px 16px rgba(0,0,0,0.15);
            max-width: 320px;
        }
        .mn-tooltip .title { font-weight: 600; }
        .mn-tooltip .meta { color: var(--muted); font-size: 0.75rem; }

        .mn-legend {
            position: absolute;
            bottom: 8px;
            left: 8px;
            background: var(--bg);
            border: 1px solid var(--border);
            border-radius: 4px;
            padding: 0.35rem 0.6rem;
            font-size: 0.72rem;
            display: flex;
            flex-wrap: wrap;
            gap: 0.35rem 0.7rem;
            max-width: 600px;
        }
        .mn-legend-item { display: flex; align-items: center; gap: 0.25rem; white-space: nowrap; }
        .mn-legend-dot { width: 9px; height: 9px; border-radius: 50%; display: inline-block; }

        .mn-placeholder {
            position: absolute; inset: 0;
            display: flex; align-items: center; justify-content: center;
            color: var(--muted); font-size: 1rem;
        }

        .mn-trends { height: 220px; }
        .mn-trends svg { width: 100%; height: 100%; }
        .mn-trends .axis text { font-size: 9px; fill: var(--muted); }
        .mn-trends .line { fill: none; stroke-width: 1.5px; }
    "#
    .to_string()
}

/// Returns the `<script src="d3">` tag + `<script>` IIFE for the network.
pub fn render_network_js(config: &NetworkRendererConfig) -> String {
    let container_sel = &config.container_selector;
    let papers_sel = &config.papers_selector;
    let trends_sel = &config.trends_selector;
    let top_n = config.top_n;

    let payload_json = &config.payload_json;

    format!(
        r##"<script src="https://d3js.org/d3.v7.min.js"></script>
        <script>
        (async function() {{
            const _mnContainer = document.querySelector('{container_sel}');
            const _mnPapers = document.querySelector('{papers_sel}');
            const _mnTrends = document.querySelector('{trends_sel}');
            if (!_mnContainer) return;

            const defaultTopN = {top_n};
            let _mnData = {payload_json};

            function esc(s) {{
                return String(s).replace(/[&<>"']/g, c => ({{
                    '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
                }})[c]);
            }}

            // --- Server round trips ---
            async function postEvent(event) {{
                const resp = await fetch('/api/event', {{
                    method: 'POST',
                    headers: {{ 'Content-Type': 'application/json' }},
                    body: JSON.stringify(event)
                }});
                if (!resp.ok) return;
                _mnData = await resp.json();
                renderAll();
            }}

            function checkedCategories() {{
                return Array.from(document.querySelectorAll('input[name="category"]:checked'))
                    .map(el => el.value);
            }}

            async function refreshView() {{
                const params = new URLSearchParams();
                params.set('categories', checkedCategories().join(','));
                params.set('min_cooc', document.getElementById('mn-min-cooc').value);
                params.set('max_edges', document.getElementById('mn-max-edges').value);
                const resp = await fetch('/api/network?' + params.toString());
                if (!resp.ok) return;
                _mnData = await resp.json();
                renderAll();
            }}

            // --- Network ---
            const tooltip = d3.select(_mnContainer).append('div')
                .attr('class', 'mn-tooltip')
                .style('display', 'none');

            function renderNetwork() {{
                const view = _mnData.network;
                d3.select(_mnContainer).selectAll('svg, .mn-legend, .mn-placeholder').remove();

                if (view.placeholder) {{
                    d3.select(_mnContainer).append('div')
                        .attr('class', 'mn-placeholder')
                        .text(view.placeholder);
                    return;
                }}

                const rect = _mnContainer.getBoundingClientRect();
                const width = rect.width || 800;
                const height = rect.height || 600;
                const radius = Math.min(width, height) / 2 - 90;
                const cx = width / 2, cy = height / 2;

                const svg = d3.select(_mnContainer).append('svg');
                const g = svg.append('g');
                svg.call(d3.zoom().scaleExtent([0.3, 4]).on('zoom', e => g.attr('transform', e.transform)));

                const pos = {{}};
                view.nodes.forEach(n => {{ pos[n.method] = [cx + radius * n.x, cy + radius * n.y]; }});
                const maxTotal = d3.max(view.nodes, n => n.total) || 1;

                g.append('g').selectAll('line')
                    .data(view.edges)
                    .join('line')
                    .attr('class', d => 'mn-link' + (d.highlighted ? ' highlighted' : ''))
                    .attr('x1', d => pos[d.method_a][0]).attr('y1', d => pos[d.method_a][1])
                    .attr('x2', d => pos[d.method_b][0]).attr('y2', d => pos[d.method_b][1])
                    .attr('stroke-width', d => d.highlighted ? 2 + 6 * d.norm_weight : 1 + 5 * d.norm_weight)
                    .attr('stroke-opacity', d => d.highlighted ? 0.9 : 0.15 + 0.5 * d.norm_weight)
                    .on('mouseover', (event, d) => {{
                        tooltip.style('display', 'block')
                            .html('<div class="title">' + esc(d.method_a) + ' ↔ ' + esc(d.method_b) + '</div>'
                                + '<div class="meta">' + d.weight + ' shared papers</div>')
                            .style('left', (event.offsetX + 14) + 'px')
                            .style('top', (event.offsetY - 10) + 'px');
                    }})
                    .on('mouseout', () => tooltip.style('display', 'none'))
                    .on('click', (event, d) => postEvent({{ type: 'edge_click', pair: [d.method_a, d.method_b] }}));

                const node = g.append('g').selectAll('g')
                    .data(view.nodes)
                    .join('g')
                    .attr('class', d => 'mn-node ' + d.highlight)
                    .attr('transform', d => 'translate(' + pos[d.method][0] + ',' + pos[d.method][1] + ')')
                    .on('mouseover', (event, d) => {{
                        tooltip.style('display', 'block')
                            .html('<div class="title">' + esc(d.display_name) + '</div>'
                                + '<div class="meta">' + esc(d.category) + ' · ' + d.total + ' papers</div>')
                            .style('left', (event.offsetX + 14) + 'px')
                            .style('top', (event.offsetY - 10) + 'px');
                    }})
                    .on('mouseout', () => tooltip.style('display', 'none'))
                    .on('click', (event, d) => postEvent({{ type: 'node_click', method: d.method }}));

                node.append('circle')
                    .attr('r', d => 5 + 15 * Math.sqrt(d.total / maxTotal))
                    .attr('fill', d => d.color);

                node.append('text')
                    .text(d => d.label)
                    .attr('x', d => (d.x >= 0 ? 1 : -1) * (8 + 15 * Math.sqrt(d.total / maxTotal)))
                    .attr('text-anchor', d => d.x >= 0 ? 'start' : 'end');

                const legend = d3.select(_mnContainer).append('div').attr('class', 'mn-legend');
                view.legend.forEach(entry => {{
                    legend.append('span').attr('class', 'mn-legend-item')
                        .html('<span class="mn-legend-dot" style="background:' + entry.color + '"></span>'
                            + esc(entry.category) + ' (' + entry.count + ')');
                }});
            }}

            // --- Selection chips ---
            function renderSelection() {{
                const chips = document.getElementById('mn-selected');
                if (!chips) return;
                chips.innerHTML = '';
                _mnData.state.selected_methods.forEach(m => {{
                    const chip = document.createElement('span');
                    chip.className = 'chip';
                    chip.title = 'Remove';
                    chip.textContent = m + ' ×';
                    chip.onclick = () => postEvent({{ type: 'search_pick', method: m }});
                    chips.appendChild(chip);
                }});
            }}

            // --- Papers for the highlighted edge ---
            function renderPapers() {{
                if (!_mnPapers) return;
                const edge = _mnData.state.highlighted_edge;
                if (!edge) {{
                    _mnPapers.innerHTML = '<p class="muted">Click an edge to see the papers behind it.</p>';
                    return;
                }}
                let html = '<h3>' + esc(edge[0]) + ' ↔ ' + esc(edge[1]) + '</h3>';
                if (_mnData.papers.length === 0) {{
                    html += '<p class="muted">No papers found for this method pair.</p>';
                }} else {{
                    html += '<ul class="paper-list">';
                    _mnData.papers.forEach(p => {{
                        const href = p.doi.startsWith('10.') ? 'https://doi.org/' + p.doi : '#';
                        html += '<li class="paper-item"><div class="title"><a href="' + esc(href) + '" target="_blank" rel="noopener">'
                            + esc(p.title) + '</a></div><div class="meta">' + esc(p.authors) + ' · ' + p.year
                            + ' · ' + p.citation_count + ' citations</div>'
                            + (p.methods.length ? '<div class="meta">Methods: ' + p.methods.map(esc).join(', ') + '</div>' : '')
                            + '</li>';
                    }});
                    html += '</ul>';
                }}
                _mnPapers.innerHTML = html;
            }}

            // --- Trends ---
            async function renderTrends() {{
                if (!_mnTrends) return;
                const resp = await fetch('/api/trends');
                if (!resp.ok) return;
                const points = await resp.json();
                _mnTrends.innerHTML = '';
                if (points.length === 0) return;

                const rect = _mnTrends.getBoundingClientRect();
                const w = rect.width || 320, h = rect.height || 220;
                const m = {{ top: 10, right: 10, bottom: 20, left: 30 }};
                const byCategory = d3.rollups(points, v => d3.sum(v, p => p.points), p => p.category, p => p.year);
                const x = d3.scaleLinear().domain(d3.extent(points, p => p.year)).range([m.left, w - m.right]);
                const yMax = d3.max(byCategory, ([, years]) => d3.max(years, ([, v]) => v)) || 1;
                const y = d3.scaleLinear().domain([0, yMax]).nice().range([h - m.bottom, m.top]);
                const colorOf = {{}};
                _mnData.network.legend.forEach(e => {{ colorOf[e.category] = e.color; }});

                const svg = d3.select(_mnTrends).append('svg');
                svg.append('g').attr('class', 'axis').attr('transform', 'translate(0,' + (h - m.bottom) + ')')
                    .call(d3.axisBottom(x).ticks(5).tickFormat(d3.format('d')));
                svg.append('g').attr('class', 'axis').attr('transform', 'translate(' + m.left + ',0)')
                    .call(d3.axisLeft(y).ticks(4));
                byCategory.forEach(([category, years]) => {{
                    years.sort((a, b) => a[0] - b[0]);
                    svg.append('path').attr('class', 'line')
                        .attr('stroke', colorOf[category] || 'gray')
                        .attr('d', d3.line().x(d => x(d[0])).y(d => y(d[1]))(years));
                }});
            }}

            function renderAll() {{
                renderNetwork();
                renderSelection();
                renderPapers();
                renderTrends();
            }}

            // --- Controls ---
            const searchInput = document.getElementById('mn-search');
            const searchResults = document.getElementById('mn-search-results');
            let searchTimer = null;
            if (searchInput && searchResults) {{
                searchInput.addEventListener('input', () => {{
                    clearTimeout(searchTimer);
                    searchTimer = setTimeout(async () => {{
                        const q = searchInput.value.trim();
                        searchResults.innerHTML = '';
                        if (q.length < 2) return;
                        const resp = await fetch('/api/search?q=' + encodeURIComponent(q));
                        if (!resp.ok) return;
                        const hits = await resp.json();
                        hits.forEach(hit => {{
                            const li = document.createElement('li');
                            li.innerHTML = esc(hit.display_name) + '<span class="cat">' + esc(hit.category) + '</span>';
                            li.onclick = () => {{
                                searchResults.innerHTML = '';
                                searchInput.value = '';
                                postEvent({{ type: 'search_pick', method: hit.method }});
                            }};
                            searchResults.appendChild(li);
                        }});
                    }}, 200);
                }});
            }}

            const topN = document.getElementById('mn-top-n');
            if (topN) topN.value = defaultTopN;
            document.getElementById('mn-apply-top')?.addEventListener('click', () => {{
                const n = parseInt(topN.value, 10) || defaultTopN;
                postEvent({{ type: 'top_n_apply', n: n, categories: checkedCategories() }});
            }});
            document.getElementById('mn-clear')?.addEventListener('click', () => postEvent({{ type: 'clear' }}));
            document.getElementById('mn-reset')?.addEventListener('click', () => postEvent({{ type: 'reset' }}));
            document.querySelectorAll('input[name="category"], #mn-min-cooc, #mn-max-edges')
                .forEach(el => el.addEventListener('change', refreshView));

            let resizeTimer = null;
            window.addEventListener('resize', () => {{
                clearTimeout(resizeTimer);
                resizeTimer = setTimeout(renderNetwork, 150);
            }});

            renderAll();
        }})();
        </script>"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_payload_is_embedded() {
        let js = render_network_js(&NetworkRendererConfig {
            container_selector: "#net".into(),
            papers_selector: "#papers".into(),
            trends_selector: "#trends".into(),
            top_n: 15,
            payload_json: r#"{"network":{}}"#.into(),
        });
        assert!(js.contains(r#"let _mnData = {"network":{}};"#));
        assert!(js.contains("document.querySelector('#net')"));
        assert!(js.contains("const defaultTopN = 15;"));
        assert!(js.contains("d3.v7.min.js"));
        assert!(js.contains("p.methods.map(esc).join(', ')"));
    }
}
