//! Quote drafts for the wizard: the immutable draft, its reducer, the
//! in-memory session store and the HTTP routes.

pub mod draft;
pub mod routes;
pub mod store;

pub use draft::{apply, DraftAction, DraftContext, DraftError, QuoteDraft, QuoteStatus};
pub use routes::router;
pub use store::QuoteStore;
