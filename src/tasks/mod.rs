//! Background tasks started alongside the HTTP server.

mod draft_cleanup;

pub use draft_cleanup::DraftCleanupTask;
