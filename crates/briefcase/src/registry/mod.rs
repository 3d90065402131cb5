//! Document registry
//!
//! Holds the last-fetched sent/received lists and their rendered view.
//! Every refresh replaces both wholesale; there is no incremental merge.

mod view;

pub use view::{Badge, BadgeTone, DashboardView, DocumentCard, ListKind, ListView, NO_DOCUMENTS, NO_EXPIRATION};

use log::{debug, warn};
use std::sync::{Arc, Mutex, RwLock};

use crate::api::DocumentApi;
use crate::error::ApiError;
use crate::models::{Document, DocumentId, DocumentLists};

/// Receives each freshly rendered view
pub trait Renderer: Send + Sync {
    fn render(&self, view: &DashboardView);
}

/// Cached document lists for one session
///
/// Overlapping refreshes are allowed to race; whichever response resolves
/// last is what the registry holds and what the renderer drew last.
pub struct DocumentRegistry {
    api: Arc<dyn DocumentApi>,
    snapshot: RwLock<Option<Snapshot>>,
    renderer: Option<Arc<dyn Renderer>>,
    /// Held across store-then-render so draws happen in store order
    publish: Mutex<()>,
}

/// Lists and their view, always replaced together
#[derive(Clone)]
struct Snapshot {
    lists: DocumentLists,
    view: DashboardView,
}

impl DocumentRegistry {
    pub fn new(api: Arc<dyn DocumentApi>) -> Self {
        Self {
            api,
            snapshot: RwLock::new(None),
            renderer: None,
            publish: Mutex::new(()),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Re-fetch and re-render both lists
    ///
    /// A failed fetch is logged and leaves the previous lists and view in
    /// place. Returns whether the refresh succeeded.
    pub fn refresh(&self) -> bool {
        match self.try_refresh() {
            Ok(()) => true,
            Err(e) => {
                warn!("Error loading documents: {}", e);
                false
            }
        }
    }

    /// Like [`refresh`](Self::refresh) but reports the failure
    pub fn try_refresh(&self) -> Result<(), ApiError> {
        let lists = self.api.documents()?;
        debug!(
            "Loaded {} sent and {} received documents",
            lists.sent.len(),
            lists.received.len()
        );
        let view = DashboardView::render(&lists);

        let _publishing = self.publish.lock().unwrap_or_else(|e| e.into_inner());
        *self.snapshot.write().unwrap_or_else(|e| e.into_inner()) = Some(Snapshot {
            lists,
            view: view.clone(),
        });

        if let Some(renderer) = &self.renderer {
            renderer.render(&view);
        }
        Ok(())
    }

    /// Last fetched lists, if any fetch has succeeded yet
    pub fn lists(&self) -> Option<DocumentLists> {
        self.read(|snapshot| snapshot.lists.clone())
    }

    /// Last rendered view
    pub fn view(&self) -> Option<DashboardView> {
        self.read(|snapshot| snapshot.view.clone())
    }

    /// Look a document up in the cached lists
    pub fn find(&self, id: &DocumentId) -> Option<Document> {
        self.read(|snapshot| snapshot.lists.find(id).cloned()).flatten()
    }

    fn read<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> Option<T> {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::UploadRequest;
    use crate::models::{Recipient, UploadReceipt, User};
    use chrono::Utc;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    /// Pops one scripted `documents()` response per call
    struct ListsApi {
        responses: Mutex<Vec<Result<DocumentLists, ApiError>>>,
    }

    impl ListsApi {
        fn new(mut responses: Vec<Result<DocumentLists, ApiError>>) -> Self {
            responses.reverse();
            Self { responses: Mutex::new(responses) }
        }
    }

    impl DocumentApi for ListsApi {
        fn login(&self, _: &str, _: &str) -> Result<User, ApiError> {
            unimplemented!()
        }
        fn me(&self) -> Result<User, ApiError> {
            unimplemented!()
        }
        fn users(&self) -> Result<Vec<Recipient>, ApiError> {
            unimplemented!()
        }
        fn upload(&self, _: &UploadRequest) -> Result<UploadReceipt, ApiError> {
            unimplemented!()
        }
        fn documents(&self) -> Result<DocumentLists, ApiError> {
            self.responses.lock().unwrap().pop().expect("unexpected refresh")
        }
        fn download(&self, _: &DocumentId) -> Result<Vec<u8>, ApiError> {
            unimplemented!()
        }
        fn logout(&self) -> Result<(), ApiError> {
            unimplemented!()
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        renders: Mutex<Vec<DashboardView>>,
    }

    impl Renderer for CountingRenderer {
        fn render(&self, view: &DashboardView) {
            self.renders.lock().unwrap().push(view.clone());
        }
    }

    fn doc(id: &str) -> Document {
        Document {
            id: DocumentId::new(id),
            filename: format!("{id}.txt"),
            sender_id: None,
            sender_username: "alice".into(),
            recipient_id: None,
            recipient_username: "bob".into(),
            view_count: 0,
            view_limit: None,
            expires_at: None,
            created_at: Utc::now(),
            is_expired: false,
            is_limit_reached: false,
        }
    }

    #[test]
    fn test_refresh_replaces_wholesale() {
        let api = Arc::new(ListsApi::new(vec![
            Ok(DocumentLists { sent: vec![doc("a"), doc("b")], received: vec![] }),
            Ok(DocumentLists { sent: vec![doc("b")], received: vec![doc("c")] }),
        ]));
        let registry = DocumentRegistry::new(api);

        assert!(registry.refresh());
        assert!(registry.find(&DocumentId::new("a")).is_some());

        assert!(registry.refresh());
        assert!(registry.find(&DocumentId::new("a")).is_none());
        let lists = registry.lists().unwrap();
        assert_eq!(lists.sent.len(), 1);
        assert_eq!(lists.received[0].id.as_str(), "c");
    }

    #[test]
    fn test_failed_refresh_keeps_previous_view() {
        let api = Arc::new(ListsApi::new(vec![
            Ok(DocumentLists { sent: vec![doc("a")], received: vec![] }),
            Err(ApiError::Network("connection reset".into())),
        ]));
        let renderer = Arc::new(CountingRenderer::default());
        let registry = DocumentRegistry::new(api).with_renderer(renderer.clone());

        assert!(registry.refresh());
        let before = registry.view().unwrap();

        assert!(!registry.refresh());
        assert_eq!(registry.view().unwrap(), before);
        assert_eq!(registry.lists().unwrap().sent.len(), 1);
        assert_eq!(renderer.renders.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_first_refresh_leaves_nothing() {
        let api = Arc::new(ListsApi::new(vec![Err(ApiError::Rejected { status: 500, detail: None })]));
        let registry = DocumentRegistry::new(api);

        assert!(registry.try_refresh().is_err());
        assert!(registry.lists().is_none());
        assert!(registry.view().is_none());
    }

    #[test]
    fn test_empty_lists_render_placeholders() {
        let api = Arc::new(ListsApi::new(vec![Ok(DocumentLists::default())]));
        let renderer = Arc::new(CountingRenderer::default());
        let registry = DocumentRegistry::new(api).with_renderer(renderer.clone());

        registry.refresh();

        let renders = renderer.renders.lock().unwrap();
        assert_eq!(renders[0].sent, ListView::Empty { placeholder: NO_DOCUMENTS });
        assert_eq!(renders[0].received, ListView::Empty { placeholder: NO_DOCUMENTS });
    }

    /// Records the first sent filename of each view; the first draw stalls
    struct StallingRenderer {
        first_draw: Mutex<Option<mpsc::Sender<()>>>,
        drawn: Mutex<Vec<String>>,
    }

    impl Renderer for StallingRenderer {
        fn render(&self, view: &DashboardView) {
            let first = self.first_draw.lock().unwrap().take();
            if let Some(started) = first {
                started.send(()).unwrap();
                thread::sleep(Duration::from_millis(200));
            }
            let name = view.sent.cards()[0].filename.clone();
            self.drawn.lock().unwrap().push(name);
        }
    }

    #[test]
    fn test_overlapping_refreshes_draw_in_store_order() {
        let api = Arc::new(ListsApi::new(vec![
            Ok(DocumentLists { sent: vec![doc("older")], received: vec![] }),
            Ok(DocumentLists { sent: vec![doc("newer")], received: vec![] }),
        ]));
        let (started_tx, started_rx) = mpsc::channel();
        let renderer = Arc::new(StallingRenderer {
            first_draw: Mutex::new(Some(started_tx)),
            drawn: Mutex::new(Vec::new()),
        });
        let registry = Arc::new(DocumentRegistry::new(api).with_renderer(renderer.clone()));

        let first = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.refresh())
        };
        // The older response is stored and mid-draw before the newer one lands
        started_rx.recv().unwrap();
        assert!(registry.refresh());
        assert!(first.join().unwrap());

        let cached = registry.lists().unwrap().sent[0].filename.clone();
        let drawn = renderer.drawn.lock().unwrap();
        assert_eq!(cached, "newer.txt");
        assert_eq!(drawn.last().map(String::as_str), Some("newer.txt"));
        assert_eq!(drawn.len(), 2);
    }
}
