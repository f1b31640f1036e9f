/// Async driver for the suggestion state machine
///
/// One task owns the `SuggestionState` and applies events in arrival order.
/// Timers and preview fetches run as spawned tasks that post their outcome
/// back to the same task, so the state is never touched concurrently.

use crate::config::SearchConfig;
use crate::suggest::{
    Effect, Key, Phase, SuggestionEvent, SuggestionSource, SuggestionState, SuggestionView,
    TimerKind,
};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// UI-facing handle to a running controller
pub struct SuggestionHandle {
    events: mpsc::UnboundedSender<SuggestionEvent>,
    view: watch::Receiver<SuggestionView>,
    searches: mpsc::UnboundedReceiver<String>,
    task: JoinHandle<()>,
}

impl SuggestionHandle {
    // Send fails only once the controller task is gone
    fn send(&self, event: SuggestionEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn input(&self, text: impl Into<String>) -> bool {
        self.send(SuggestionEvent::Input(text.into()))
    }

    pub fn key(&self, key: Key) -> bool {
        self.send(SuggestionEvent::Key(key))
    }

    pub fn click(&self, index: usize) -> bool {
        self.send(SuggestionEvent::Click(index))
    }

    pub fn focus(&self) -> bool {
        self.send(SuggestionEvent::Focus)
    }

    pub fn blur(&self) -> bool {
        self.send(SuggestionEvent::Blur)
    }

    pub fn submit(&self) -> bool {
        self.send(SuggestionEvent::Submit)
    }

    pub fn clear(&self) -> bool {
        self.send(SuggestionEvent::Clear)
    }

    /// Latest snapshot
    pub fn view(&self) -> SuggestionView {
        self.view.borrow().clone()
    }

    /// Receiver that can await view changes
    pub fn subscribe(&self) -> watch::Receiver<SuggestionView> {
        self.view.clone()
    }

    /// Replace the field text with `text` and wait until its preview settles
    ///
    /// Settled means the view shows `text` with nothing pending or in flight:
    /// suggestions on screen, or an empty, failed or skipped preview. Returns
    /// `None` once the controller has stopped.
    pub async fn settle(&self, text: &str) -> Option<SuggestionView> {
        let mut rx = self.view.clone();
        let same_text = rx.borrow_and_update().input == text;

        if !self.input(text) {
            return None;
        }
        // The current view may already look settled for this text; wait for
        // the new keystroke to land first. Blank text leaves the view as is.
        if same_text && !text.trim().is_empty() {
            rx.changed().await.ok()?;
        }

        let settled = |v: &SuggestionView| {
            v.input == text && !matches!(v.phase, Phase::Pending | Phase::Awaiting)
        };
        let view = rx.wait_for(settled).await.ok()?;
        Some(view.clone())
    }

    /// Next committed search (suggestion chosen or form submitted)
    pub async fn next_search(&mut self) -> Option<String> {
        self.searches.recv().await
    }

    /// Stop the controller and wait for its task to finish
    pub async fn shutdown(self) {
        drop(self.events);
        if let Err(e) = self.task.await {
            warn!(error = %e, "suggestion controller task failed");
        }
    }
}

/// Start a controller for one input field
pub fn spawn_controller<S>(source: Arc<S>, config: &SearchConfig) -> SuggestionHandle
where
    S: SuggestionSource + ?Sized + 'static,
{
    let state = SuggestionState::from_config(config);
    let (ui_tx, ui_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(state.view());
    let (search_tx, search_rx) = mpsc::unbounded_channel();

    let driver = Driver {
        state,
        source,
        view_tx,
        search_tx,
    };
    let task = tokio::spawn(driver.run(ui_rx));

    SuggestionHandle {
        events: ui_tx,
        view: view_rx,
        searches: search_rx,
        task,
    }
}

struct Driver<S: ?Sized> {
    state: SuggestionState,
    source: Arc<S>,
    view_tx: watch::Sender<SuggestionView>,
    search_tx: mpsc::UnboundedSender<String>,
}

impl<S> Driver<S>
where
    S: SuggestionSource + ?Sized + 'static,
{
    async fn run(mut self, mut ui_rx: mpsc::UnboundedReceiver<SuggestionEvent>) {
        // Timers and fetches report back here; this sender keeps the channel open
        let (internal_tx, mut internal_rx) = mpsc::unbounded_channel();

        loop {
            let event = tokio::select! {
                event = ui_rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
                Some(event) = internal_rx.recv() => event,
            };

            for effect in self.state.handle(event) {
                self.execute(effect, &internal_tx);
            }

            let view = self.state.view();
            self.view_tx.send_if_modified(|current| {
                if *current == view {
                    false
                } else {
                    *current = view;
                    true
                }
            });
        }

        debug!("suggestion controller stopped");
    }

    fn execute(&self, effect: Effect, internal_tx: &mpsc::UnboundedSender<SuggestionEvent>) {
        match effect {
            Effect::StartTimer { token, delay, kind } => {
                let tx = internal_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let event = match kind {
                        TimerKind::Debounce => SuggestionEvent::DebounceElapsed(token),
                        TimerKind::BlurGrace => SuggestionEvent::BlurGraceElapsed(token),
                    };
                    let _ = tx.send(event);
                });
            }
            Effect::FetchSuggestions(ticket) => {
                let tx = internal_tx.clone();
                let source = Arc::clone(&self.source);
                tokio::spawn(async move {
                    let outcome = source.suggest(ticket.query()).await;
                    if let Err(e) = &outcome {
                        warn!(query = %ticket.query(), error = %e, "suggestion preview failed");
                    }
                    let _ = tx.send(SuggestionEvent::Resolved { ticket, outcome });
                });
            }
            Effect::Search(text) => {
                debug!(query = %text, "committing search");
                let _ = self.search_tx.send(text);
            }
        }
    }
}
