/// Suggestion dropdown state machine
///
/// Every change goes through `SuggestionState::handle`, which applies one
/// event and returns the effects the caller must run (start a timer, fetch
/// a preview, run a full search). Nothing here touches the clock or the
/// network, so the whole machine is testable without a UI.

use crate::config::{
    SearchConfig, DEFAULT_BLUR_GRACE_MS, DEFAULT_DEBOUNCE_MS, DEFAULT_SUGGESTION_LIMIT,
};
use crate::core::Query;
use crate::error::Result;
use crate::suggest::{DebounceTimer, TimerToken};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing pending and nothing shown
    Idle,
    /// Debounce timer running
    Pending,
    /// Preview request in flight
    Awaiting,
    /// Suggestions on screen
    Showing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Debounce,
    BlurGrace,
}

/// A preview request as issued: its id and the query text at issue time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    id: u64,
    query: String,
}

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug)]
pub enum SuggestionEvent {
    /// Field text changed
    Input(String),
    Key(Key),
    /// Pointer selection of the suggestion at this index
    Click(usize),
    Focus,
    Blur,
    /// Form submitted with the current text
    Submit,
    /// Explicit clear button
    Clear,
    DebounceElapsed(TimerToken),
    BlurGraceElapsed(TimerToken),
    Resolved {
        ticket: RequestTicket,
        outcome: Result<Vec<String>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartTimer {
        token: TimerToken,
        delay: Duration,
        kind: TimerKind,
    },
    FetchSuggestions(RequestTicket),
    /// Run a full, non-preview search for this text
    Search(String),
}

/// Read-only snapshot for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionView {
    pub input: String,
    pub suggestions: Vec<String>,
    pub highlighted: Option<usize>,
    pub visible: bool,
    pub phase: Phase,
}

#[derive(Debug, Clone)]
pub struct SuggestionState {
    input: String,
    suggestions: Vec<String>,
    highlighted: Option<usize>,
    visible: bool,
    phase: Phase,
    limit: usize,
    debounce: DebounceTimer,
    blur_grace: DebounceTimer,
    in_flight: Option<u64>,
    next_request: u64,
}

impl Default for SuggestionState {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            Duration::from_millis(DEFAULT_BLUR_GRACE_MS),
            DEFAULT_SUGGESTION_LIMIT,
        )
    }
}

/// Apply one event to `state`, returning the next state and its effects
pub fn transition(
    mut state: SuggestionState,
    event: SuggestionEvent,
) -> (SuggestionState, Vec<Effect>) {
    let effects = state.handle(event);
    (state, effects)
}

impl SuggestionState {
    /// `limit` is capped at `DEFAULT_SUGGESTION_LIMIT`
    pub fn new(debounce: Duration, blur_grace: Duration, limit: usize) -> Self {
        Self {
            input: String::new(),
            suggestions: Vec::new(),
            highlighted: None,
            visible: false,
            phase: Phase::Idle,
            limit: limit.min(DEFAULT_SUGGESTION_LIMIT),
            debounce: DebounceTimer::new(debounce),
            blur_grace: DebounceTimer::new(blur_grace),
            in_flight: None,
            next_request: 0,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.debounce(), config.blur_grace(), config.suggestion_limit)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted_label(&self) -> Option<&str> {
        self.highlighted
            .and_then(|i| self.suggestions.get(i))
            .map(String::as_str)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn view(&self) -> SuggestionView {
        SuggestionView {
            input: self.input.clone(),
            suggestions: self.suggestions.clone(),
            highlighted: self.highlighted,
            visible: self.visible,
            phase: self.phase,
        }
    }

    /// Apply one event
    pub fn handle(&mut self, event: SuggestionEvent) -> Vec<Effect> {
        match event {
            SuggestionEvent::Input(text) => self.on_input(text),
            SuggestionEvent::Key(key) => self.on_key(key),
            SuggestionEvent::Click(index) => {
                if self.visible && index < self.suggestions.len() {
                    self.commit(index)
                } else {
                    Vec::new()
                }
            }
            SuggestionEvent::Focus => {
                self.blur_grace.cancel();
                Vec::new()
            }
            SuggestionEvent::Blur => {
                let token = self.blur_grace.schedule();
                vec![Effect::StartTimer {
                    token,
                    delay: self.blur_grace.delay(),
                    kind: TimerKind::BlurGrace,
                }]
            }
            SuggestionEvent::BlurGraceElapsed(token) => {
                if self.blur_grace.fire(token) {
                    self.reset();
                }
                Vec::new()
            }
            SuggestionEvent::Submit => {
                self.reset();
                let text = self.input.trim();
                if text.is_empty() {
                    Vec::new()
                } else {
                    vec![Effect::Search(text.to_string())]
                }
            }
            SuggestionEvent::Clear => {
                self.input.clear();
                self.blur_grace.cancel();
                self.reset();
                Vec::new()
            }
            SuggestionEvent::DebounceElapsed(token) => self.on_debounce(token),
            SuggestionEvent::Resolved { ticket, outcome } => {
                self.on_resolved(ticket, outcome);
                Vec::new()
            }
        }
    }

    fn on_input(&mut self, text: String) -> Vec<Effect> {
        self.input = text;
        self.highlighted = None;

        if self.input.trim().is_empty() {
            self.reset();
            return Vec::new();
        }

        // Current list stays on screen until fresh results replace it
        let token = self.debounce.schedule();
        self.phase = Phase::Pending;
        vec![Effect::StartTimer {
            token,
            delay: self.debounce.delay(),
            kind: TimerKind::Debounce,
        }]
    }

    fn on_debounce(&mut self, token: TimerToken) -> Vec<Effect> {
        if !self.debounce.fire(token) {
            return Vec::new();
        }

        match Query::parse(&self.input) {
            Ok(query) => {
                self.next_request += 1;
                self.in_flight = Some(self.next_request);
                self.phase = Phase::Awaiting;
                vec![Effect::FetchSuggestions(RequestTicket {
                    id: self.next_request,
                    query: query.as_str().to_string(),
                })]
            }
            Err(_) => {
                // Previews never surface validation errors
                self.reset();
                Vec::new()
            }
        }
    }

    fn on_resolved(&mut self, ticket: RequestTicket, outcome: Result<Vec<String>>) {
        if self.in_flight != Some(ticket.id) || ticket.query != self.input.trim() {
            debug!(request = ticket.id, query = %ticket.query, "discarding stale suggestions");
            return;
        }
        self.in_flight = None;
        self.highlighted = None;

        match outcome {
            Ok(mut labels) => {
                labels.truncate(self.limit);
                self.visible = !labels.is_empty();
                self.suggestions = labels;
                self.phase = if self.visible { Phase::Showing } else { Phase::Idle };
            }
            Err(_) => {
                self.suggestions.clear();
                self.visible = false;
                self.phase = Phase::Idle;
            }
        }
    }

    fn on_key(&mut self, key: Key) -> Vec<Effect> {
        let showing = self.phase == Phase::Showing && !self.suggestions.is_empty();
        let len = self.suggestions.len();

        match key {
            Key::ArrowDown if showing => {
                self.highlighted = Some(match self.highlighted {
                    Some(i) => (i + 1) % len,
                    None => 0,
                });
                Vec::new()
            }
            Key::ArrowUp if showing => {
                self.highlighted = Some(match self.highlighted {
                    Some(0) | None => len - 1,
                    Some(i) => i - 1,
                });
                Vec::new()
            }
            Key::Enter if showing => match self.highlighted {
                Some(i) => self.commit(i),
                None => {
                    self.reset();
                    Vec::new()
                }
            },
            Key::Escape => {
                self.reset();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn commit(&mut self, index: usize) -> Vec<Effect> {
        let label = self.suggestions[index].clone();
        self.input = label.clone();
        self.reset();
        vec![Effect::Search(label)]
    }

    // Hide the list and forget anything pending; the input text survives
    fn reset(&mut self) {
        self.debounce.cancel();
        self.in_flight = None;
        self.suggestions.clear();
        self.visible = false;
        self.highlighted = None;
        self.phase = Phase::Idle;
    }
}
