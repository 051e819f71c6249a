// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Navigation controller
//!
//! Owns the live document and performs soft navigations: fetch, fragment
//! extraction, head merge behind the stylesheet gate, body splice, load
//! notification, history update. One controller per page context.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};
use url::Url;

use crate::dom::{parse_html_with_url, Document};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};

use super::config::NavConfig;
use super::fragment::{extract_fragments, strip_reserved_markers};
use super::gate::NavPhase;
use super::history::History;
use super::merge::{
    begin_head_merge, finish_head_merge, merge_body, replace_head_now, update_title,
};
use super::progress::{ProgressBar, DONE_DELAY_MS, RESET_DELAY_MS};

/// Completion record delivered to `on_load` callbacks
#[derive(Debug, Clone)]
pub struct LoadEvent {
    /// Final URL after redirects
    pub url: String,
    /// HTTP status of the navigation fetch
    pub status: u16,
    /// Document title after the merge
    pub title: String,
    /// Selectors whose content was replaced, in order
    pub replaced: Vec<String>,
    /// Selectors skipped with a warning
    pub skipped: Vec<String>,
}

type LoadCallback = Box<dyn FnOnce(&LoadEvent) + Send>;

/// How a completed navigation touches the history stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    Replace,
    /// Back/forward traversal: the cursor already moved
    None,
}

/// Soft-navigation controller over a live document
pub struct NavController {
    config: NavConfig,
    client: HttpClient,
    document: Document,
    link_ids: Arc<RwLock<Vec<String>>>,
    url: Arc<RwLock<Option<Url>>>,
    history: Arc<RwLock<History>>,
    on_load: Arc<Mutex<Vec<LoadCallback>>>,
    phase: Arc<RwLock<NavPhase>>,
    progress: ProgressBar,
    // serializes navigations on this controller
    nav_lock: tokio::sync::Mutex<()>,
}

impl NavController {
    /// Create a controller over an already-parsed live document
    pub fn with_document(document: Document, base_url: &str, config: NavConfig) -> Result<Self> {
        let base = Url::parse(base_url)?;
        let client = build_client(&config)?;
        Self::from_parts(document, base, config, client)
    }

    /// Fetch `url`, parse it as the initial live document and create a
    /// controller over it
    pub async fn open(url: &str, config: NavConfig) -> Result<Self> {
        let client = build_client(&config)?;
        let response = client.get(url).await?;
        if !response.is_success() {
            return Err(Error::navigation_failed(
                response.url_str(),
                Some(response.status_code()),
                format!("server returned {}", response.status),
            ));
        }
        let document =
            parse_html_with_url(&response.text_lossy(), Some(response.url.clone()))?;
        Self::from_parts(document, response.url.clone(), config, client)
    }

    fn from_parts(
        document: Document,
        base: Url,
        config: NavConfig,
        client: HttpClient,
    ) -> Result<Self> {
        let progress = ProgressBar::ensure(
            &document,
            &config.progress_bar_query,
            config.show_progress_bar,
        )?;
        document.set_url(base.clone());

        let mut history = History::new();
        history.push(base.as_str());

        let link_ids = config.link_ids.clone();

        Ok(Self {
            config,
            client,
            document,
            link_ids: Arc::new(RwLock::new(link_ids)),
            url: Arc::new(RwLock::new(Some(base))),
            history: Arc::new(RwLock::new(history)),
            on_load: Arc::new(Mutex::new(Vec::new())),
            phase: Arc::new(RwLock::new(NavPhase::Waiting)),
            progress,
            nav_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Append a selector to the replacement list. Duplicates are allowed.
    pub fn add_link_id(&self, selector: impl Into<String>) {
        self.link_ids.write().push(selector.into());
    }

    /// The replacement selectors in insertion order
    pub fn link_ids(&self) -> Vec<String> {
        self.link_ids.read().clone()
    }

    /// Register a one-shot callback for the next completed navigation
    pub fn on_load<F>(&self, handler: F)
    where
        F: FnOnce(&LoadEvent) + Send + 'static,
    {
        self.on_load.lock().push(Box::new(handler));
    }

    /// The live document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Current URL
    pub fn url(&self) -> Option<String> {
        self.url.read().as_ref().map(|u| u.to_string())
    }

    /// Current document title
    pub fn title(&self) -> String {
        self.document.title()
    }

    /// Phase of the most recent navigation
    pub fn phase(&self) -> NavPhase {
        *self.phase.read()
    }

    /// History entries in order
    pub fn history_entries(&self) -> Vec<String> {
        self.history.read().entries().to_vec()
    }

    /// Activate an anchor: resolve its href and navigate.
    ///
    /// Returns `Ok(None)` when the anchor targets a new browsing context and
    /// such anchors are configured to pass through.
    pub async fn click(&self, selector: &str) -> Result<Option<u16>> {
        let element = self
            .document
            .query_selector(selector)
            .ok_or_else(|| Error::dom(format!("no element matches '{}'", selector)))?;

        if element.tag_name() != "a" {
            return Err(Error::dom(format!(
                "click target '{}' is not an anchor",
                selector
            )));
        }
        let href = element
            .href()
            .ok_or_else(|| Error::dom(format!("anchor '{}' has no href", selector)))?;

        if self.config.ignore_target_blank && element.target().as_deref() == Some("_blank") {
            debug!(selector, href, "anchor opens a new browsing context, not intercepted");
            return Ok(None);
        }

        info!(href, "navigation occurred");
        let status = self.load_page(&href, true).await?;
        Ok(Some(status))
    }

    /// Perform a soft navigation to `url`.
    ///
    /// Pushes a history entry when `update_history` is true, replaces the
    /// current one otherwise. Returns the HTTP status code.
    pub async fn load_page(&self, url: &str, update_history: bool) -> Result<u16> {
        let mode = if update_history {
            HistoryMode::Push
        } else {
            HistoryMode::Replace
        };
        self.navigate(url, mode).await
    }

    /// Move back in history and reload that state without pushing.
    ///
    /// The cursor only moves once the reload has succeeded; a failed fetch
    /// leaves the history where it was.
    pub async fn go_back(&self) -> Result<Option<u16>> {
        let target = self.history.read().peek_back().map(String::from);
        match target {
            Some(url) => {
                let status = self.navigate(&url, HistoryMode::None).await?;
                self.history.write().back();
                Ok(Some(status))
            }
            None => Ok(None),
        }
    }

    /// Move forward in history and reload that state without pushing.
    /// Like [`go_back`](Self::go_back), the cursor only moves on success.
    pub async fn go_forward(&self) -> Result<Option<u16>> {
        let target = self.history.read().peek_forward().map(String::from);
        match target {
            Some(url) => {
                let status = self.navigate(&url, HistoryMode::None).await?;
                self.history.write().forward();
                Ok(Some(status))
            }
            None => Ok(None),
        }
    }

    async fn navigate(&self, url: &str, mode: HistoryMode) -> Result<u16> {
        let _guard = self.nav_lock.lock().await;
        let target = self.resolve(url)?;
        match self.perform_navigation(&target, mode).await {
            Ok(status) => Ok(status),
            Err(e) => {
                // a failed navigation settles the indicator immediately
                self.progress.set_done();
                self.progress.collapse();
                Err(e)
            }
        }
    }

    async fn perform_navigation(&self, target: &Url, mode: HistoryMode) -> Result<u16> {
        self.set_phase(NavPhase::Waiting);
        self.progress.set_waiting();

        self.set_phase(NavPhase::Fetching);
        let bar = self.progress.clone();
        let response = self
            .client
            .get_with_progress(target.as_str(), move |loaded, total| {
                bar.on_download_progress(loaded, total)
            })
            .await?;

        let status = response.status_code();
        if !response.is_success() {
            return Err(Error::navigation_failed(
                response.url_str(),
                Some(status),
                format!("server returned {}", response.status),
            ));
        }

        let html = response.text_lossy();
        let fragments = extract_fragments(&html, response.url_str())?;
        strip_reserved_markers(&fragments.head, &self.document);
        strip_reserved_markers(&fragments.body, &self.document);

        self.progress.overshoot();

        if self.config.replace_head {
            if self.config.wait_for_css {
                let mut merge = begin_head_merge(&self.document, &fragments.head)?;
                self.set_phase(NavPhase::HeadMerged);
                if !merge.gate.is_open() {
                    self.set_phase(NavPhase::CssPending);
                    debug!(pending = merge.gate.pending(), "waiting for stylesheets");
                    let fetches = merge
                        .stylesheet_hrefs
                        .iter()
                        .map(|href| self.fetch_stylesheet(&response.url, href));
                    for _ in futures::future::join_all(fetches).await {
                        merge.gate.notify_loaded();
                    }
                }
                finish_head_merge(&self.document);
            } else {
                replace_head_now(&self.document, &fragments.head)?;
                self.set_phase(NavPhase::HeadMerged);
            }
        } else {
            update_title(&self.document, &fragments, response.url_str());
            self.set_phase(NavPhase::HeadMerged);
        }

        let selectors = self.link_ids.read().clone();
        let outcome = merge_body(&self.document, &fragments.body, &selectors);
        self.set_phase(NavPhase::BodyMerged);

        let final_url = response.url.clone();
        self.document.set_url(final_url.clone());
        *self.url.write() = Some(final_url.clone());

        let event = LoadEvent {
            url: final_url.to_string(),
            status,
            title: self.document.title(),
            replaced: outcome.replaced,
            skipped: outcome.skipped,
        };
        let callbacks: Vec<LoadCallback> = std::mem::take(&mut *self.on_load.lock());
        for callback in callbacks {
            callback(&event);
        }
        self.set_phase(NavPhase::Complete);

        // settle the indicator without blocking the navigation's return
        let bar = self.progress.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(DONE_DELAY_MS)).await;
            bar.set_done();
            tokio::time::sleep(Duration::from_millis(RESET_DELAY_MS - DONE_DELAY_MS)).await;
            bar.collapse();
        });

        {
            let mut history = self.history.write();
            match mode {
                HistoryMode::Push => history.push(final_url.as_str()),
                HistoryMode::Replace => history.replace(final_url.as_str()),
                HistoryMode::None => {}
            }
        }

        info!(url = %final_url, status, "page loaded");
        Ok(status)
    }

    async fn fetch_stylesheet(&self, base: &Url, href: &str) {
        // failure still counts as a load completion, like onerror would
        match base.join(href) {
            Ok(css_url) => {
                if let Err(e) = self.client.get(css_url.as_str()).await {
                    warn!(href, error = %e, "stylesheet failed to load");
                }
            }
            Err(e) => warn!(href, error = %e, "invalid stylesheet href"),
        }
    }

    fn resolve(&self, url: &str) -> Result<Url> {
        match self.url.read().as_ref() {
            Some(current) => Ok(current.join(url)?),
            None => Ok(Url::parse(url)?),
        }
    }

    fn set_phase(&self, phase: NavPhase) {
        *self.phase.write() = phase;
    }
}

fn build_client(config: &NavConfig) -> Result<HttpClient> {
    let mut http_config = HttpClientConfig {
        timeout: config.timeout,
        ..Default::default()
    };
    if let Some(ua) = &config.user_agent {
        http_config.user_agent = ua.clone();
    }
    HttpClient::with_config(http_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;
    use crate::nav::progress::{STATUS_DONE, STATUS_WAITING};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const START_PAGE: &str = "<html><head><title>Start</title></head>\
        <body><a id=\"go\" href=\"/next\">next</a>\
        <a id=\"ext\" href=\"/ext\" target=\"_blank\">ext</a>\
        <div id=\"a\">old-a</div></body></html>";

    const NEXT_PAGE: &str = "<html><head><title>Next</title></head>\
        <body><div id=\"a\">new-a</div><div id=\"b\">new-b</div></body></html>";

    async fn server_with_next() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/next"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(NEXT_PAGE)
                    .insert_header("content-type", "text/html"),
            )
            .mount(&server)
            .await;
        server
    }

    fn controller(base: &str, config: NavConfig) -> NavController {
        let doc = parse_html(START_PAGE).unwrap();
        NavController::with_document(doc, base, config).unwrap()
    }

    #[tokio::test]
    async fn test_construction_creates_exactly_one_indicator() {
        for show in [true, false] {
            let ctrl = controller(
                "https://example.com/",
                NavConfig::new().show_progress_bar(show),
            );
            let bars = ctrl.document().query_selector_all("#link-progress-bar");
            assert_eq!(bars.len(), 1);
            assert_eq!(
                bars[0].get_attribute("status").as_deref(),
                Some(STATUS_WAITING)
            );
        }
    }

    #[tokio::test]
    async fn test_load_page_replaces_selectors_and_pushes_history() {
        let server = server_with_next().await;
        let ctrl = controller(&server.uri(), NavConfig::new().link_id("#a"));

        let status = ctrl
            .load_page(&format!("{}/next", server.uri()), true)
            .await
            .unwrap();

        assert_eq!(status, 200);
        assert_eq!(
            ctrl.document().query_selector("#a").unwrap().text_content(),
            "new-a"
        );
        assert_eq!(ctrl.title(), "Next");
        assert_eq!(ctrl.phase(), NavPhase::Complete);
        let entries = ctrl.history_entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[1].ends_with("/next"));
    }

    #[tokio::test]
    async fn test_load_page_without_history_replaces_entry() {
        let server = server_with_next().await;
        let ctrl = controller(&server.uri(), NavConfig::new());

        ctrl.load_page(&format!("{}/next", server.uri()), false)
            .await
            .unwrap();

        let entries = ctrl.history_entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with("/next"));
    }

    #[tokio::test]
    async fn test_relative_url_resolution_via_click() {
        let server = server_with_next().await;
        let ctrl = controller(&format!("{}/start", server.uri()), NavConfig::new());

        let status = ctrl.click("#go").await.unwrap();
        assert_eq!(status, Some(200));
        assert!(ctrl.url().unwrap().ends_with("/next"));
    }

    #[tokio::test]
    async fn test_click_ignores_target_blank() {
        let ctrl = controller("https://example.com/", NavConfig::new());
        let result = ctrl.click("#ext").await.unwrap();
        assert_eq!(result, None);
        assert_eq!(ctrl.url().unwrap(), "https://example.com/");
    }

    #[tokio::test]
    async fn test_click_rejects_non_anchor() {
        let ctrl = controller("https://example.com/", NavConfig::new());
        assert!(matches!(ctrl.click("#a").await, Err(Error::Dom(_))));
    }

    #[tokio::test]
    async fn test_missing_selector_is_skipped_with_warning() {
        let server = server_with_next().await;
        // live document has #a but not #missing; fetched page has #b but the
        // live document does not
        let ctrl = controller(
            &server.uri(),
            NavConfig::new().link_id("#a").link_id("#b"),
        );

        let received = Arc::new(Mutex::new(None));
        let sink = received.clone();
        ctrl.on_load(move |event: &LoadEvent| {
            *sink.lock() = Some(event.clone());
        });

        ctrl.load_page(&format!("{}/next", server.uri()), true)
            .await
            .unwrap();

        let event = received.lock().clone().unwrap();
        assert_eq!(event.replaced, vec!["#a"]);
        assert_eq!(event.skipped, vec!["#b"]);
        assert_eq!(event.title, "Next");
    }

    #[tokio::test]
    async fn test_on_load_fires_once() {
        let server = server_with_next().await;
        let ctrl = controller(&server.uri(), NavConfig::new());

        let count = Arc::new(Mutex::new(0u32));
        let sink = count.clone();
        ctrl.on_load(move |_| *sink.lock() += 1);

        let next = format!("{}/next", server.uri());
        ctrl.load_page(&next, true).await.unwrap();
        ctrl.load_page(&next, true).await.unwrap();

        assert_eq!(*count.lock(), 1);
    }

    #[tokio::test]
    async fn test_replace_head_false_updates_title_only() {
        let server = server_with_next().await;
        let ctrl = controller(&server.uri(), NavConfig::new().replace_head(false));

        ctrl.load_page(&format!("{}/next", server.uri()), true)
            .await
            .unwrap();

        assert_eq!(ctrl.title(), "Next");
        // stylesheets from the fetched head were not imported
        assert!(ctrl
            .document()
            .query_selector("link[rel=stylesheet]")
            .is_none());
    }

    #[tokio::test]
    async fn test_non_2xx_is_a_typed_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        let ctrl = controller(&server.uri(), NavConfig::new());
        let err = ctrl
            .load_page(&format!("{}/gone", server.uri()), true)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NavigationFailed { .. }));
        assert_eq!(err.status_code(), Some(404));
        // history untouched on failure
        assert_eq!(ctrl.history_entries().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_body_fragment_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<head><title>t</title></head>no body tag"),
            )
            .mount(&server)
            .await;

        let ctrl = controller(&server.uri(), NavConfig::new());
        let err = ctrl
            .load_page(&format!("{}/broken", server.uri()), true)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingFragment { fragment: "body", .. }
        ));
    }

    #[tokio::test]
    async fn test_wait_for_css_fetches_new_stylesheets() {
        let server = MockServer::start().await;
        let page = "<html><head><title>Styled</title>\
            <link rel=\"stylesheet\" href=\"/css/one.css\">\
            <link rel=\"stylesheet\" href=\"/css/two.css\"></head>\
            <body><div id=\"a\">styled-a</div></body></html>";
        Mock::given(method("GET"))
            .and(path("/styled"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/css/one.css"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a{}"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/css/two.css"))
            .respond_with(ResponseTemplate::new(200).set_body_string("b{}"))
            .expect(1)
            .mount(&server)
            .await;

        let ctrl = controller(&server.uri(), NavConfig::new().link_id("#a"));
        ctrl.load_page(&format!("{}/styled", server.uri()), true)
            .await
            .unwrap();

        assert_eq!(
            ctrl.document().query_selector("#a").unwrap().text_content(),
            "styled-a"
        );
        assert!(ctrl
            .document()
            .query_selector("link[href=\"/css/one.css\"]")
            .is_some());
        server.verify().await;
    }

    #[tokio::test]
    async fn test_go_back_reloads_previous_entry() {
        let server = server_with_next().await;
        let start = "<html><head><title>Start</title></head>\
            <body><div id=\"a\">old-a</div></body></html>";
        Mock::given(method("GET"))
            .and(path("/start"))
            .respond_with(ResponseTemplate::new(200).set_body_string(start))
            .mount(&server)
            .await;

        let ctrl = controller(&format!("{}/start", server.uri()), NavConfig::new());
        ctrl.load_page(&format!("{}/next", server.uri()), true)
            .await
            .unwrap();
        assert_eq!(ctrl.title(), "Next");

        let status = ctrl.go_back().await.unwrap();
        assert_eq!(status, Some(200));
        assert_eq!(ctrl.title(), "Start");
        assert_eq!(ctrl.history_entries().len(), 2);
        assert!(ctrl.url().unwrap().ends_with("/start"));

        let status = ctrl.go_forward().await.unwrap();
        assert_eq!(status, Some(200));
        assert_eq!(ctrl.title(), "Next");
    }

    #[tokio::test]
    async fn test_go_back_keeps_cursor_on_failed_reload() {
        let server = server_with_next().await;
        Mock::given(method("GET"))
            .and(path("/start"))
            .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
            .mount(&server)
            .await;

        let ctrl = controller(&format!("{}/start", server.uri()), NavConfig::new());
        ctrl.load_page(&format!("{}/next", server.uri()), true)
            .await
            .unwrap();

        let err = ctrl.go_back().await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        // cursor still at the newest entry: nothing ahead of it
        assert_eq!(ctrl.go_forward().await.unwrap(), None);
        assert!(ctrl.url().unwrap().ends_with("/next"));
        assert_eq!(ctrl.title(), "Next");
    }

    #[tokio::test]
    async fn test_failed_navigation_settles_indicator() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        let ctrl = controller(&server.uri(), NavConfig::new());
        ctrl.load_page(&format!("{}/gone", server.uri()), true)
            .await
            .unwrap_err();

        let bar = ctrl
            .document()
            .query_selector("#link-progress-bar")
            .unwrap();
        assert_eq!(bar.get_attribute("status").as_deref(), Some(STATUS_DONE));
        assert_eq!(bar.get_attribute("style").as_deref(), Some("width: 0%"));
    }

    #[tokio::test]
    async fn test_add_link_id_round_trip() {
        let ctrl = controller("https://example.com/", NavConfig::new());
        ctrl.add_link_id("#x");
        ctrl.add_link_id("#y");
        ctrl.add_link_id("#x");
        assert_eq!(ctrl.link_ids(), vec!["#x", "#y", "#x"]);
    }
}
