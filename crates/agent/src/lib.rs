//! # Moodmix Agent
//!
//! Conversational mood-to-music agent speaking the chat session protocol.
//!
//! - **Protocol**: chat messages, acknowledgements and the envelope carrying them
//! - **Suggestion**: the fixed mood catalogue and the [`MoodSuggester`] seam
//! - **Session**: advisory per-sender session lifecycle
//! - **Transport**: the outbound delivery seam
//!
//! ```
//! use moodmix_agent::MoodCatalog;
//!
//! let catalog = MoodCatalog::default();
//! assert_eq!(
//!     catalog.suggestion_for(" Sad "),
//!     "For your sad mood, I recommend: Soft Piano Melody"
//! );
//! ```

pub mod agent;
pub mod errors;
pub mod protocol;
pub mod session;
pub mod suggestion;
pub mod transport;

pub use agent::{MoodAgent, DEFAULT_AGENT_NAME, DEFAULT_GREETING};
pub use errors::{AgentError, AgentResult, SuggestionError, TransportError};
pub use protocol::{AgentMessage, ChatAcknowledgement, ChatMessage, ContentItem};
pub use session::{SessionRegistry, SessionState};
pub use suggestion::{normalize_mood, MoodCatalog, MoodSuggester, UNKNOWN_MOOD_GUIDANCE};
pub use transport::{BufferedTransport, Outbound, Transport};
