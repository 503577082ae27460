// Industry insights: generation, validation, persistence and scheduled refresh.
// All completion calls go through the `CompletionClient` injected into `InsightService`.

pub mod extractor;
pub mod handlers;
pub mod prompts;
pub mod scheduler;
pub mod schema;
pub mod service;
pub mod store;
