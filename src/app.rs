//! Application bootstrap: finds the mount point, builds the component tree
//! (error boundary, then store provider, then router) and attaches it.

use tracing::{debug, info};

use crate::components::counter::Counter;
use crate::components::error_boundary::ErrorBoundary;
use crate::components::provider::StoreProvider;
use crate::components::router::{Navigator, Router};
use crate::components::{Component, RenderContext, RenderScheduler};
use crate::dom::{Document, DomError, Element, Event};
use crate::error::BootstrapError;
use crate::events::KEYDOWN;
use crate::hooks::EventListenerHook;
use crate::settings::AppSettings;
use crate::state::{AppStore, CounterIntent};

type Tree = ErrorBoundary<StoreProvider<Router<Box<dyn Component>>>>;

pub struct App {
    document: Document,
    settings: AppSettings,
    store: AppStore,
    scheduler: RenderScheduler,
    navigator: Navigator,
    tree: Tree,
    shortcuts: EventListenerHook,
    renders: u64,
}

impl App {
    /// Mount the counter page.
    pub fn mount(
        document: Document,
        settings: AppSettings,
        store: AppStore,
    ) -> Result<Self, BootstrapError> {
        Self::mount_with(document, settings, store, Box::new(Counter))
    }

    /// Mount with `home` as the page the router shows at `/`.
    pub fn mount_with(
        document: Document,
        settings: AppSettings,
        store: AppStore,
        home: Box<dyn Component>,
    ) -> Result<Self, BootstrapError> {
        if !document.has_mount_point(&settings.mount_id) {
            return Err(BootstrapError::MissingMountPoint(settings.mount_id));
        }

        let scheduler = RenderScheduler::default();
        let router = Router::new(scheduler.clone(), home);
        let navigator = router.navigator();
        let tree = ErrorBoundary::new(StoreProvider::new(store.clone(), &scheduler, router));

        let mut app = Self {
            document,
            settings,
            store,
            scheduler,
            navigator,
            tree,
            shortcuts: EventListenerHook::new(),
            renders: 0,
        };
        app.render()?;
        info!(mount = %app.settings.mount_id, "mounted application");
        Ok(app)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }

    pub fn request_render(&self) {
        self.scheduler.request();
    }

    /// Re-render if anything asked for it since the last flush. Returns
    /// whether a render happened.
    pub fn flush(&mut self) -> Result<bool, DomError> {
        if !self.scheduler.take() {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    /// Detach listeners and remove the tree from the document.
    pub fn unmount(mut self) {
        self.shortcuts.unmount();
        self.document.clear(&self.settings.mount_id);
        info!(mount = %self.settings.mount_id, "unmounted application");
    }

    fn render(&mut self) -> Result<(), DomError> {
        let cx = RenderContext::new(self.scheduler.clone());
        let content = self.tree.render_contained(&cx);
        self.install_shortcuts();

        let shell = Element::new("div")
            .attr("class", "app")
            .child(Element::new("header").child(Element::new("h1").text(self.settings.title.clone())))
            .child(content);
        self.document.commit(&self.settings.mount_id, shell.into())?;

        self.renders += 1;
        debug!(renders = self.renders, contained = self.tree.has_failed(), "committed render");
        Ok(())
    }

    /// Runs on every render with a fresh closure; the hook keeps a single
    /// window listener alive across renders.
    fn install_shortcuts(&mut self) {
        if !self.settings.shortcuts {
            self.shortcuts.unmount();
            return;
        }
        let store = self.store.clone();
        self.shortcuts.use_event_listener(&self.document, KEYDOWN, move |event: &Event| {
            if let Some(intent) = shortcut_intent(event.key.as_deref()) {
                store.dispatch(intent);
            }
        });
    }
}

fn shortcut_intent(key: Option<&str>) -> Option<CounterIntent> {
    match key? {
        "+" | "=" => Some(CounterIntent::Increment),
        "-" => Some(CounterIntent::Decrement),
        "0" => Some(CounterIntent::Reset),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::components::ids;
    use crate::dom::Node;
    use crate::error::RenderError;
    use crate::state::select_count;

    fn mounted() -> App {
        let document = Document::new().with_mount_point(ids::ROOT);
        App::mount(document, AppSettings::default(), AppStore::default()).unwrap()
    }

    fn count_text(app: &App) -> String {
        app.document().text_content(ids::COUNT).unwrap_or_default()
    }

    struct Broken;

    impl Component for Broken {
        fn render(&self, _cx: &RenderContext) -> Result<Node, RenderError> {
            panic!("broken page");
        }
    }

    #[test]
    fn missing_mount_point_fails_fast() {
        let document = Document::new().with_mount_point("elsewhere");
        let err = App::mount(document, AppSettings::default(), AppStore::default())
            .err()
            .expect("mount must fail");
        assert!(matches!(err, BootstrapError::MissingMountPoint(ref id) if id == "root"));
        assert_eq!(err.to_string(), "mount point `#root` not found in host document");
    }

    #[test]
    fn renders_once_on_mount() {
        let app = mounted();
        assert_eq!(app.renders(), 1);
        assert_eq!(count_text(&app), "Counter: 0");
        assert!(app.document().markup().contains("<h1>Counter</h1>"));
    }

    #[test]
    fn clicks_update_the_view_after_flush() {
        let mut app = mounted();
        let doc = app.document().clone();

        doc.click(ids::INCREMENT).unwrap();
        doc.click(ids::INCREMENT).unwrap();
        doc.click(ids::DECREMENT).unwrap();
        // Nothing is re-rendered until the host flushes.
        assert_eq!(count_text(&app), "Counter: 0");

        assert!(app.flush().unwrap());
        assert_eq!(count_text(&app), "Counter: 1");
        assert_eq!(app.renders(), 2);

        doc.click(ids::RESET).unwrap();
        app.flush().unwrap();
        assert_eq!(count_text(&app), "Counter: 0");
    }

    #[test]
    fn flush_without_changes_does_nothing() {
        let mut app = mounted();
        assert!(!app.flush().unwrap());
        app.store().dispatch(CounterIntent::Reset);
        assert!(!app.flush().unwrap());
        assert_eq!(app.renders(), 1);
    }

    #[test]
    fn renders_with_store_count() {
        let document = Document::new().with_mount_point(ids::ROOT);
        let store = AppStore::default();
        for _ in 0..5 {
            store.dispatch(CounterIntent::Increment);
        }
        let app = App::mount(document, AppSettings::default(), store).unwrap();
        assert!(count_text(&app).contains('5'));
    }

    #[test]
    fn keyboard_shortcuts_use_one_window_listener() {
        let mut app = mounted();
        let doc = app.document().clone();

        for key in ["+", "=", "-", "+"] {
            doc.key(key);
            app.flush().unwrap();
        }
        assert_eq!(app.store().select(select_count), 2);
        assert_eq!(doc.window().listener_count(KEYDOWN), 1);
        assert_eq!(app.renders(), 5);

        doc.key("0");
        doc.key("x");
        assert_eq!(app.store().select(select_count), 0);
    }

    #[test]
    fn shortcuts_can_be_disabled() {
        let document = Document::new().with_mount_point(ids::ROOT);
        let settings = AppSettings {
            shortcuts: false,
            ..AppSettings::default()
        };
        let app = App::mount(document.clone(), settings, AppStore::default()).unwrap();
        assert_eq!(document.key("+"), 0);
        assert_eq!(app.store().select(select_count), 0);
    }

    #[test]
    fn unmount_detaches_everything() {
        let app = mounted();
        let doc = app.document().clone();
        app.unmount();

        assert_eq!(doc.window().listener_count(KEYDOWN), 0);
        assert!(doc.get_element_by_id(ids::COUNT).is_none());
        assert!(doc.has_mount_point(ids::ROOT));
    }

    #[test]
    fn dropping_the_app_releases_the_window_listener() {
        let doc = {
            let app = mounted();
            app.document().clone()
        };
        assert_eq!(doc.window().listener_count(KEYDOWN), 0);
    }

    #[test]
    fn broken_page_is_contained_and_the_rest_stays_interactive() {
        let document = Document::new()
            .with_mount_point(ids::ROOT)
            .with_mount_point("sidebar");

        let mut broken = App::mount_with(
            document.clone(),
            AppSettings::default(),
            AppStore::default(),
            Box::new(Broken),
        )
        .unwrap();
        let fallback = document.text_content(ids::FALLBACK).expect("fallback shown");
        assert!(fallback.contains("Something went wrong."));
        assert!(fallback.contains("broken page"));
        // The shell outside the boundary still rendered.
        assert!(document.markup().contains("<h1>Counter</h1>"));

        let sidebar_settings = AppSettings {
            mount_id: "sidebar".into(),
            shortcuts: false,
            ..AppSettings::default()
        };
        let mut sidebar = App::mount(document.clone(), sidebar_settings, AppStore::default()).unwrap();
        document.click(ids::INCREMENT).unwrap();
        sidebar.flush().unwrap();
        assert_eq!(document.text_content(ids::COUNT).as_deref(), Some("Counter: 1"));

        // Window shortcuts of the broken app still reach its store.
        document.key("+");
        assert_eq!(broken.store().select(select_count), 1);
        assert!(broken.flush().unwrap());
        assert!(document.get_element_by_id(ids::FALLBACK).is_some());
    }

    #[test]
    fn navigation_swaps_pages() {
        let mut app = mounted();
        app.navigator().navigate("/settings");
        app.flush().unwrap();
        assert!(app.document().get_element_by_id(ids::NOT_FOUND).is_some());
        assert!(app.document().get_element_by_id(ids::COUNT).is_none());

        app.navigator().navigate("/");
        app.flush().unwrap();
        assert_eq!(count_text(&app), "Counter: 0");
    }

    #[test]
    fn request_render_forces_a_flush() {
        let mut app = mounted();
        app.request_render();
        assert!(app.flush().unwrap());
        assert_eq!(app.renders(), 2);
    }
}
