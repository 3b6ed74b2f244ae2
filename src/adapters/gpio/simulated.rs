//! In-process event source with no hardware behind it.
//!
//! Used on development machines and in tests: transitions are injected
//! with [`SimulatedSource::trigger`] and reach the sink exactly as a
//! hardware edge would.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::watch;

use crate::domain::button::Level;
use crate::domain::foundation::ButtonId;
use crate::ports::{EventSource, SourceError, TransitionSink};

/// Event source driven from code.
#[derive(Default)]
pub struct SimulatedSource {
    sink: Arc<RwLock<Option<Arc<dyn TransitionSink>>>>,
}

impl SimulatedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report one transition. Returns false when the source is not running.
    pub fn trigger(&self, button: ButtonId, level: Level) -> bool {
        let sink = self.sink.read().clone();
        match sink {
            Some(sink) => {
                sink.on_transition(button, level);
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.sink.read().is_some()
    }
}

#[async_trait]
impl EventSource for SimulatedSource {
    async fn start(
        &self,
        sink: Arc<dyn TransitionSink>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), SourceError> {
        *self.sink.write() = Some(sink);

        let slot = Arc::clone(&self.sink);
        tokio::spawn(async move {
            // A dropped sender leaves the source running.
            if shutdown.wait_for(|stop| *stop).await.is_ok() {
                slot.write().take();
            }
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
