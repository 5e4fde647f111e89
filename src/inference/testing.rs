//! Test doubles for the inference layer.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Mutex, Once};

use async_trait::async_trait;

use crate::inference::{ChatBackend, ProviderError, ProviderErrorKind};

/// Backend with a fixed reply per model that records every call.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    replies: HashMap<String, Result<String, ProviderError>>,
    pub(crate) calls: Mutex<Vec<(String, String, u32)>>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn answer(mut self, model: &str, text: &str) -> Self {
        self.replies.insert(model.to_string(), Ok(text.to_string()));
        self
    }

    pub(crate) fn fail(mut self, model: &str, kind: ProviderErrorKind) -> Self {
        self.replies
            .insert(model.to_string(), Err(ProviderError::new(kind, format!("{model} down"))));
        self
    }

    pub(crate) fn called_models(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(m, _, _)| m.clone()).collect()
    }

    pub(crate) fn last_prompt(&self) -> Option<String> {
        self.calls.lock().unwrap().last().map(|(_, p, _)| p.clone())
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn chat_completion(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), prompt.to_string(), max_tokens));
        self.replies
            .get(model)
            .cloned()
            .unwrap_or_else(|| Err(ProviderError::new(ProviderErrorKind::NotFound, model)))
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String, String)>> = const { RefCell::new(Vec::new()) };
}

/// Global logger that keeps records per thread, so parallel tests on
/// current-thread runtimes only see their own output.
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.with(|c| {
            c.borrow_mut().push((
                record.level(),
                record.target().to_string(),
                record.args().to_string(),
            ))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Install the capturing logger and clear this thread's records.
pub(crate) fn start_log_capture() {
    INSTALL.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
    });
    CAPTURED.with(|c| c.borrow_mut().clear());
}

/// Records logged on this thread since `start_log_capture`.
pub(crate) fn captured_logs() -> Vec<(log::Level, String, String)> {
    CAPTURED.with(|c| c.borrow().clone())
}
