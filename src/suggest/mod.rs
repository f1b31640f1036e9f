/// Suggestion module
///
/// Live autocomplete for the search field: debounced previews, keyboard
/// navigation and stale-response suppression.

pub mod controller;
pub mod debounce;
pub mod remote;
pub mod source;
pub mod state;

pub use controller::{spawn_controller, SuggestionHandle};
pub use debounce::{DebounceTimer, TimerToken};
pub use remote::RemoteSource;
pub use source::SuggestionSource;
pub use state::{
    transition, Effect, Key, Phase, RequestTicket, SuggestionEvent, SuggestionState,
    SuggestionView, TimerKind,
};
