//! Document binary resource lifecycle.
//!
//! Acquisition is split-phase: `begin_acquire` records interest and hands
//! back a tag, the driver awaits the fetch, and `complete_acquire` either
//! installs the result or discards it when interest has moved on. The
//! manager guarantees at most one live display handle at any instant and
//! releases it unconditionally on teardown, even with a fetch pending.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ChatError;
use crate::resolver::DocumentKey;

/// URI-like reference handed to display collaborators. Dropping the handle
/// releases it; the registry count is how tests observe liveness.
#[derive(Debug)]
pub struct DisplayHandle {
    uri: String,
    bytes: Arc<[u8]>,
    registry: Arc<AtomicUsize>,
}

impl DisplayHandle {
    fn register(
        uri: String,
        bytes: Arc<[u8]>,
        registry: Arc<AtomicUsize>,
    ) -> Self {
        registry.fetch_add(1, Ordering::AcqRel);
        Self {
            uri,
            bytes,
            registry,
        }
    }

    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        self.registry.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Fetched document bytes plus the derived display handle.
#[derive(Debug)]
pub struct DocumentResource {
    document_key: DocumentKey,
    display: DisplayHandle,
}

impl DocumentResource {
    #[must_use]
    pub fn document_key(&self) -> &DocumentKey {
        &self.document_key
    }

    #[must_use]
    pub fn display(&self) -> &DisplayHandle {
        &self.display
    }
}

/// Tag identifying one acquisition attempt. Stale tags are rejected at
/// completion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireTag {
    serial: u64,
}

/// What `complete_acquire` did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletedAcquire {
    /// The resource was installed; any previous handle was released first.
    Installed,
    /// Interest had moved to a newer acquisition; the result was dropped.
    Discarded,
    /// The fetch failed; the failure is recorded, the pane stays empty.
    Failed,
}

#[derive(Debug, Default)]
pub struct ResourceLifecycleManager {
    current: Option<DocumentResource>,
    pending_key: Option<DocumentKey>,
    interest: u64,
    next_serial: u64,
    registry: Arc<AtomicUsize>,
    last_error: Option<ChatError>,
}

impl ResourceLifecycleManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record interest in a document key. Any earlier in-flight acquisition
    /// is abandoned: its completion will be discarded, not installed.
    pub fn begin_acquire(&mut self, document_key: &DocumentKey) -> AcquireTag {
        self.next_serial += 1;
        self.interest = self.next_serial;
        self.pending_key = Some(document_key.clone());
        AcquireTag {
            serial: self.next_serial,
        }
    }

    /// Apply a fetch result for a previously issued tag.
    pub fn complete_acquire(
        &mut self,
        tag: AcquireTag,
        result: Result<Vec<u8>, ChatError>,
    ) -> CompletedAcquire {
        if tag.serial != self.interest {
            debug!(serial = tag.serial, "discarding stale document fetch result");
            return CompletedAcquire::Discarded;
        }

        let Some(document_key) = self.pending_key.take() else {
            debug!(serial = tag.serial, "no pending key for fetch result; discarding");
            return CompletedAcquire::Discarded;
        };

        match result {
            Ok(bytes) => {
                // Release before replacement keeps the ≤1 live handle
                // invariant observable at every instant.
                self.release_current();

                let bytes: Arc<[u8]> = bytes.into();
                let uri = format!("mem://document/{document_key}/{}", tag.serial);
                let display = DisplayHandle::register(uri, bytes, Arc::clone(&self.registry));
                self.current = Some(DocumentResource {
                    document_key,
                    display,
                });
                self.last_error = None;
                CompletedAcquire::Installed
            }
            Err(error) => {
                warn!(document_key = %document_key, %error, "document fetch failed; pane degrades to empty");
                // The handle on display belongs to the previous key; with
                // the replacement fetch failed, empty-but-usable wins over
                // stale content.
                self.release_current();
                self.last_error = Some(error);
                CompletedAcquire::Failed
            }
        }
    }

    /// Drop the live display handle, if any.
    pub fn release_current(&mut self) {
        self.current = None;
    }

    /// Unconditional release plus abandonment of any pending acquisition.
    /// Late completions after teardown are discarded.
    pub fn teardown(&mut self) {
        self.next_serial += 1;
        self.interest = self.next_serial;
        self.pending_key = None;
        self.release_current();
    }

    #[must_use]
    pub fn current(&self) -> Option<&DocumentResource> {
        self.current.as_ref()
    }

    /// Most recent acquisition failure, kept for display.
    #[must_use]
    pub fn last_error(&self) -> Option<&ChatError> {
        self.last_error.as_ref()
    }

    /// Number of live display handles. Always 0 or 1.
    #[must_use]
    pub fn live_handles(&self) -> usize {
        self.registry.load(Ordering::Acquire)
    }
}
