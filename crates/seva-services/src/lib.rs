//! Seva Services Library
//!
//! Clients for the external collaborators: the document verification
//! service and the chat assistant backend.

pub mod assistant;
pub mod verifier;

pub use assistant::{AssistantService, ChatMessage};
pub use verifier::DocumentVerifierService;
