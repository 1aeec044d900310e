//! HTTP route handlers for the dashboard.
//!
//! Every handler resolves the caller's session from the cookie jar, calls
//! into the analysis core with plain values and returns HTML or JSON. The
//! session cookie is refreshed on every response.

use crate::models::{NetworkView, PaperSummary};
use crate::network::{build_view, ViewParams, NO_DATA_MESSAGE};
use crate::papers::{papers_for_pair, summarize, DEFAULT_PAPERS_PER_PAIR};
use crate::search::{search_methods, SearchHit, DEFAULT_SEARCH_LIMIT};
use crate::selection::{transition, SelectionEvent, SelectionState};
use crate::session::{session_cookie, session_token, Session};
use crate::templates::{base_html, html_escape, network_css, render_network_js, NetworkRendererConfig};
use crate::trends::{filter_trends, TrendPoint};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// ============================================================================
// Router
// ============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/network", get(network_api))
        .route("/api/event", post(event_api))
        .route("/api/search", get(search_api))
        .route("/api/papers", get(papers_api))
        .route("/api/trends", get(trends_api))
        .route("/api/state", get(state_api))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Payloads
// ============================================================================

/// Everything the browser needs to redraw after an interaction.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub state: SelectionState,
    pub view: ViewParams,
    pub network: NetworkView,
    /// Papers behind the highlighted edge, if any.
    pub papers: Vec<PaperSummary>,
}

fn dashboard(state: &AppState, session: &Session) -> DashboardResponse {
    let Some(model) = state.model.as_ref() else {
        return DashboardResponse {
            state: session.selection.clone(),
            view: session.view.clone(),
            network: NetworkView::placeholder(NO_DATA_MESSAGE),
            papers: Vec::new(),
        };
    };

    let network = build_view(&model.cooccurrence, &model.catalog, &session.selection, &session.view);
    let papers = match session.selection.highlighted_edge {
        Some(ref pair) => papers_for_pair(
            &model.incidence,
            &model.papers,
            pair.first(),
            pair.second(),
            DEFAULT_PAPERS_PER_PAIR,
        )
        .into_iter()
        .map(|paper| summarize(&model.incidence, paper))
        .collect(),
        None => Vec::new(),
    };

    DashboardResponse {
        state: session.selection.clone(),
        view: session.view.clone(),
        network,
        papers,
    }
}

fn with_session_cookie(token: &str, body: impl IntoResponse) -> Response {
    let mut headers = HeaderMap::new();
    if let Ok(value) = session_cookie(token).parse() {
        headers.insert(SET_COOKIE, value);
    }
    (headers, body).into_response()
}

fn open_session(state: &AppState, jar: &CookieJar) -> (String, Session) {
    let token = session_token(jar);
    state.sessions.get_or_create(token.as_deref(), &state.default_view())
}

// ============================================================================
// Dashboard Page
// ============================================================================

pub async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (token, session) = open_session(&state, &jar);
    let payload = dashboard(&state, &session);
    // `</` would close the inline script early.
    let payload_json = serde_json::to_string(&payload)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");

    let catalog = state.catalog();
    let stats = match state.model {
        Some(ref model) => format!(
            "{} papers · {} methods",
            model.incidence.paper_count(),
            model.cooccurrence.len()
        ),
        None => "no data".to_string(),
    };

    let category_items: String = catalog
        .categories()
        .iter()
        .map(|cat| {
            format!(
                r#"<li><label><input type="checkbox" name="category" value="{value}"{checked}>
                    <span class="category-swatch" style="background:{color}"></span> {name}</label></li>"#,
                value = html_escape(cat),
                checked = if session.view.categories.contains(cat) { " checked" } else { "" },
                color = catalog.color(cat),
                name = html_escape(cat),
            )
        })
        .collect();

    let script = render_network_js(&NetworkRendererConfig {
        container_selector: "#network-container".into(),
        papers_selector: "#paper-panel".into(),
        trends_selector: "#trend-chart".into(),
        top_n: state.config.top_n,
        payload_json,
    });

    let html = format!(
        r##"
        <style>{network_styles}</style>
        <div class="dashboard">
            <aside class="panel">
                <h2>Methods</h2>
                <div class="control-group search-wrap">
                    <label for="mn-search">Search methods</label>
                    <input type="text" id="mn-search" placeholder="Type at least 2 characters" autocomplete="off">
                    <ul class="search-results" id="mn-search-results"></ul>
                    <div class="chips" id="mn-selected"></div>
                </div>
                <div class="control-group">
                    <label for="mn-top-n">Top methods in checked categories</label>
                    <div class="control-row">
                        <input type="number" id="mn-top-n" min="1">
                        <button class="btn" id="mn-apply-top">Apply</button>
                        <button class="btn secondary" id="mn-clear">Clear</button>
                    </div>
                </div>
                <div class="control-group">
                    <label>Edges</label>
                    <div class="control-row">
                        <span class="muted">min papers</span>
                        <input type="number" id="mn-min-cooc" min="0" value="{min_cooc}">
                        <span class="muted">per node</span>
                        <input type="number" id="mn-max-edges" min="0" value="{max_edges}">
                    </div>
                </div>
                <div class="control-group">
                    <button class="btn secondary" id="mn-reset">Reset highlight</button>
                </div>
                <h2>Categories</h2>
                <ul class="category-list">{category_items}</ul>
            </aside>

            <div class="mn-container" id="network-container"></div>

            <aside class="panel">
                <h2>Papers</h2>
                <div id="paper-panel"></div>
                <h2>Trends</h2>
                <div class="mn-trends" id="trend-chart"></div>
            </aside>
        </div>
        {script}
        "##,
        network_styles = network_css(),
        min_cooc = session.view.min_cooc,
        max_edges = session.view.max_edges,
        category_items = category_items,
        script = script,
    );

    with_session_cookie(&token, Html(base_html("Method Network", &html, &stats)))
}

// ============================================================================
// JSON API
// ============================================================================

/// View overrides. Values are parsed leniently: blanks and junk keep the
/// session's current setting.
#[derive(Debug, Default, Deserialize)]
pub struct NetworkQuery {
    /// Comma-separated; an empty value hides every category.
    pub categories: Option<String>,
    pub min_cooc: Option<String>,
    pub max_edges: Option<String>,
}

impl NetworkQuery {
    fn apply(&self, view: &mut ViewParams, known: &[String]) {
        if let Some(ref cats) = self.categories {
            view.categories = cats
                .split(',')
                .map(str::trim)
                .filter(|c| known.iter().any(|k| k == c))
                .map(str::to_string)
                .collect::<BTreeSet<_>>();
        }
        if let Some(v) = self.min_cooc.as_deref().and_then(|s| s.trim().parse().ok()) {
            view.min_cooc = v;
        }
        if let Some(v) = self.max_edges.as_deref().and_then(|s| s.trim().parse().ok()) {
            view.max_edges = v;
        }
    }
}

pub async fn network_api(
    Query(params): Query<NetworkQuery>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let token = session_token(&jar);
    let known = state.catalog().categories();
    let (token, session) = state
        .sessions
        .with_session(token.as_deref(), &state.default_view(), |s| params.apply(&mut s.view, known));
    with_session_cookie(&token, Json(dashboard(&state, &session)))
}

pub async fn event_api(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(event): Json<SelectionEvent>,
) -> Response {
    tracing::debug!(?event, "selection event");
    let token = session_token(&jar);
    let catalog = state.catalog();
    let (token, session) = state
        .sessions
        .with_session(token.as_deref(), &state.default_view(), |s| {
            s.selection = transition(std::mem::take(&mut s.selection), &event, catalog);
        });
    with_session_cookie(&token, Json(dashboard(&state, &session)))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

pub async fn search_api(
    Query(query): Query<SearchQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<SearchHit>> {
    let q = query.q.as_deref().unwrap_or("");
    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    Json(search_methods(state.catalog(), q, limit))
}

#[derive(Debug, Deserialize)]
pub struct PapersQuery {
    pub a: Option<String>,
    pub b: Option<String>,
    pub top: Option<usize>,
}

pub async fn papers_api(
    Query(query): Query<PapersQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<PaperSummary>> {
    let (Some(model), Some(a), Some(b)) = (state.model.as_ref(), query.a.as_deref(), query.b.as_deref()) else {
        return Json(Vec::new());
    };
    let top = query.top.unwrap_or(DEFAULT_PAPERS_PER_PAIR);
    let found = papers_for_pair(&model.incidence, &model.papers, a, b, top);
    Json(found.into_iter().map(|paper| summarize(&model.incidence, paper)).collect())
}

pub async fn trends_api(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (token, session) = open_session(&state, &jar);
    let points: Vec<TrendPoint> = filter_trends(
        &state.trends,
        &session.view.categories,
        &session.selection.selected_methods,
    )
    .into_iter()
    .cloned()
    .collect();
    with_session_cookie(&token, Json(points))
}

pub async fn state_api(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (token, session) = open_session(&state, &jar);
    with_session_cookie(&token, Json(session.selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::dataset::Overlays;
    use crate::incidence::tests::scenario_papers;
    use crate::tests::scenario_config;
    use crate::CorpusModel;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn scenario_app() -> Router {
        let config = scenario_config();
        let model = CorpusModel::build(scenario_papers(), &Overlays::default(), &config).unwrap();
        router(Arc::new(AppState::new(config, model)))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let cookie = resp
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let body = resp.into_body().collect().await.unwrap().to_bytes().to_vec();
        (status, cookie, body)
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(c) = cookie {
            builder = builder.header("cookie", c);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_event(event: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/event")
            .header("content-type", "application/json");
        if let Some(c) = cookie {
            builder = builder.header("cookie", c);
        }
        builder.body(Body::from(event.to_string())).unwrap()
    }

    fn json(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_index_sets_session_cookie() {
        let app = scenario_app();
        let (status, cookie, body) = send(&app, get("/", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(cookie.unwrap().starts_with("methodnet_session="));
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("network-container"));
        assert!(html.contains(r#"value="Unknown" checked"#));
    }

    #[tokio::test]
    async fn test_network_defaults_and_overrides() {
        let app = scenario_app();
        let (status, cookie, body) = send(&app, get("/api/network", None)).await;
        assert_eq!(status, StatusCode::OK);
        let payload = json(&body);
        assert_eq!(payload["network"]["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(payload["network"]["edges"].as_array().unwrap().len(), 3);

        let cookie = cookie.unwrap();
        let (_, _, body) = send(&app, get("/api/network?min_cooc=2&max_edges=", Some(&cookie))).await;
        let payload = json(&body);
        assert_eq!(payload["view"]["min_cooc"], 2);
        assert_eq!(payload["view"]["max_edges"], 5);
        assert_eq!(payload["network"]["edges"].as_array().unwrap().len(), 2);

        let (_, _, body) = send(&app, get("/api/network?categories=", Some(&cookie))).await;
        let payload = json(&body);
        assert!(payload["network"]["placeholder"].is_string());
    }

    #[tokio::test]
    async fn test_events_persist_per_session() {
        let app = scenario_app();
        let (status, cookie, body) =
            send(&app, post_event(r#"{"type":"node_click","method":"a"}"#, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["state"]["highlighted_method"], "a");
        let cookie = cookie.unwrap();

        let (_, _, body) = send(&app, get("/api/state", Some(&cookie))).await;
        assert_eq!(json(&body)["highlighted_method"], "a");

        // A different browser starts from scratch.
        let (_, _, body) = send(&app, get("/api/state", None)).await;
        assert!(json(&body)["highlighted_method"].is_null());
    }

    #[tokio::test]
    async fn test_edge_click_surfaces_papers() {
        let app = scenario_app();
        let (_, _, body) = send(&app, post_event(r#"{"type":"edge_click","pair":["b","a"]}"#, None)).await;
        let payload = json(&body);
        assert_eq!(payload["state"]["highlighted_edge"], serde_json::json!(["a", "b"]));
        assert!(payload["state"]["highlighted_method"].is_null());
        let ids: Vec<&str> = payload["papers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["paper_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["P2", "P1"]);

        let lit: Vec<&Value> = payload["network"]["edges"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|e| e["highlighted"] == true)
            .collect();
        assert_eq!(lit.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_event_is_ignored_and_bad_json_rejected() {
        let app = scenario_app();
        let (status, _, body) = send(&app, post_event(r#"{"type":"wiggle"}"#, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["state"]["selected_methods"], serde_json::json!([]));

        let (status, _, _) = send(&app, post_event("not json", None)).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_papers_and_search_endpoints() {
        let app = scenario_app();
        let (_, _, body) = send(&app, get("/api/papers?a=a&b=b&top=1", None)).await;
        let papers = json(&body);
        assert_eq!(papers.as_array().unwrap().len(), 1);
        assert_eq!(papers[0]["paper_id"], "P2");
        assert_eq!(papers[0]["methods"], serde_json::json!(["a", "b", "c"]));

        let (_, _, body) = send(&app, get("/api/papers?a=a", None)).await;
        assert_eq!(json(&body), serde_json::json!([]));

        let (status, _, body) = send(&app, get("/api/search?q=a", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_trends_follow_selection() {
        let app = scenario_app();
        let (_, cookie, body) = send(&app, get("/api/trends", None)).await;
        assert_eq!(json(&body).as_array().unwrap().len(), 3 * 11);

        let cookie = cookie.unwrap();
        send(&app, post_event(r#"{"type":"search_pick","method":"c"}"#, Some(&cookie))).await;
        let (_, _, body) = send(&app, get("/api/trends", Some(&cookie))).await;
        let points = json(&body);
        assert_eq!(points.as_array().unwrap().len(), 11);
        assert!(points.as_array().unwrap().iter().all(|p| p["method"] == "c"));
    }

    #[tokio::test]
    async fn test_no_data_placeholder() {
        let app = router(Arc::new(AppState::new(AppConfig::default(), None)));
        let (status, _, body) = send(&app, get("/api/network", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["network"]["placeholder"], NO_DATA_MESSAGE);

        let (status, _, _) = send(&app, get("/", None)).await;
        assert_eq!(status, StatusCode::OK);
    }
}
