//! In-memory providers, sleepers and observers for driving `RetryingFetcher`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use placeguide_core::control::Aborted;
use placeguide_core::notify::Observer;
use placeguide_core::retry::{ProviderError, Sleeper};
use placeguide_core::search::SearchProvider;

/// One scripted provider reply.
pub enum Reply {
    Links(Vec<&'static str>),
    RateLimited,
    Fail(&'static str),
}

/// Provider that plays back a script; the last reply repeats.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Reply>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(reply: Reply) -> Self {
        Self::new(vec![reply])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn play(reply: &Reply) -> Result<Vec<String>, ProviderError> {
    match reply {
        Reply::Links(links) => Ok(links.iter().map(|s| s.to_string()).collect()),
        Reply::RateLimited => Err(ProviderError::Message(
            "HTTP Error 429: Too Many Requests".to_string(),
        )),
        Reply::Fail(msg) => Err(ProviderError::Message(msg.to_string())),
    }
}

impl SearchProvider for ScriptedProvider {
    fn search(
        &self,
        _query: &str,
        _result_cap: usize,
        _pause: Duration,
    ) -> Result<Vec<String>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(reply) = next {
            *last = Some(reply);
        }
        play(last.as_ref().expect("script is empty"))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Sleeper that records delays instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, delay: Duration) -> Result<(), Aborted> {
        self.delays.lock().unwrap().push(delay);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    Warn(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingObserver {
    notes: Mutex<Vec<Note>>,
}

impl RecordingObserver {
    pub fn notes(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notes()
            .into_iter()
            .filter_map(|n| match n {
                Note::Error(m) => Some(m),
                Note::Warn(_) => None,
            })
            .collect()
    }
}

impl Observer for RecordingObserver {
    fn warn(&self, message: &str) {
        self.notes.lock().unwrap().push(Note::Warn(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notes.lock().unwrap().push(Note::Error(message.to_string()));
    }
}

pub fn secs(values: &[u64]) -> Vec<Duration> {
    values.iter().map(|s| Duration::from_secs(*s)).collect()
}
