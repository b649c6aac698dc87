#![allow(dead_code)]

pub mod http;

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lib_tft::core::{
    BoardEmbed, BoardSource, BulletinSource, MessageLocation, MessagePlatform, MessageRef, PlatformError, SourceError,
};
use tokio_util::sync::CancellationToken;

/// A platform call as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Edit(MessageRef, String),
    Delete(MessageRef),
    Send(u64),
}

#[derive(Default)]
struct State {
    channels: HashSet<u64>,
    missing: HashSet<u64>,
    forbidden: HashSet<u64>,
    failing: HashSet<u64>,
    calls: Vec<Call>,
    next_message_id: u64,
}

/// Recording platform. Channels resolve only once `add_channel` was called;
/// message ids can be marked gone, forbidden or failing.
pub struct MockPlatform {
    state: Mutex<State>,
}

impl MockPlatform {
    pub fn new(next_message_id: u64) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                next_message_id,
                ..Default::default()
            }),
        })
    }

    pub fn add_channel(&self, channel_id: u64) {
        self.state.lock().unwrap().channels.insert(channel_id);
    }

    pub fn mark_missing(&self, message_id: u64) {
        self.state.lock().unwrap().missing.insert(message_id);
    }

    pub fn mark_forbidden(&self, message_id: u64) {
        self.state.lock().unwrap().forbidden.insert(message_id);
    }

    pub fn mark_failing(&self, message_id: u64) {
        self.state.lock().unwrap().failing.insert(message_id);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn edits(&self) -> Vec<MessageRef> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Edit(target, _) => Some(target),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<MessageRef> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete(target) => Some(target),
                _ => None,
            })
            .collect()
    }

    fn outcome(state: &State, message_id: u64) -> Result<(), PlatformError> {
        if state.missing.contains(&message_id) {
            Err(PlatformError::NotFound)
        } else if state.forbidden.contains(&message_id) {
            Err(PlatformError::Forbidden)
        } else if state.failing.contains(&message_id) {
            Err(PlatformError::Other("HTTP 500".into()))
        } else {
            Ok(())
        }
    }
}

impl MessagePlatform for MockPlatform {
    fn resolve(&self, _guild_id: u64, location: MessageLocation) -> Option<MessageRef> {
        let state = self.state.lock().unwrap();
        state.channels.contains(&location.channel_id).then(|| MessageRef::from(location))
    }

    async fn edit(&self, target: MessageRef, payload: &BoardEmbed) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Edit(target, payload.title.clone()));
        Self::outcome(&state, target.message_id)
    }

    async fn delete(&self, target: MessageRef) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete(target));
        Self::outcome(&state, target.message_id)
    }

    async fn send(&self, channel_id: u64, _payload: &BoardEmbed) -> Result<MessageLocation, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Send(channel_id));
        if !state.channels.contains(&channel_id) {
            return Err(PlatformError::NotFound);
        }
        let message_id = state.next_message_id;
        state.next_message_id += 1;
        Ok(MessageLocation::new(channel_id, message_id))
    }
}

/// What the mock source answers on the next builds.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Board,
    Empty,
    Nothing,
}

/// Board source counting its builds. Titles are "board #N".
pub struct MockSource {
    builds: Arc<AtomicUsize>,
    script: Arc<Mutex<Script>>,
}

impl MockSource {
    pub fn new(script: Script) -> (Self, Arc<AtomicUsize>, Arc<Mutex<Script>>) {
        let builds = Arc::new(AtomicUsize::new(0));
        let script = Arc::new(Mutex::new(script));
        let source = Self {
            builds: Arc::clone(&builds),
            script: Arc::clone(&script),
        };
        (source, builds, script)
    }
}

impl BoardSource for MockSource {
    async fn build(&self, cancel: &CancellationToken) -> Result<Option<BoardEmbed>, SourceError> {
        if cancel.is_cancelled() {
            return Err(SourceError::Cancelled);
        }
        let n = self.builds.fetch_add(1, Ordering::SeqCst) + 1;
        let script = *self.script.lock().unwrap();
        match script {
            Script::Board => Ok(Some(BoardEmbed::new(format!("board #{}", n), "table"))),
            Script::Empty => Err(SourceError::EmptyBoard),
            Script::Nothing => Ok(None),
        }
    }
}

/// Bulletin source answering the pages set through its handle.
/// `None` makes the next builds fail.
pub struct MockPages {
    pages: Arc<Mutex<Option<Vec<String>>>>,
}

impl MockPages {
    pub fn new(titles: &[&str]) -> (Self, Arc<Mutex<Option<Vec<String>>>>) {
        let pages = Arc::new(Mutex::new(Some(titles.iter().map(|t| t.to_string()).collect())));
        (
            Self {
                pages: Arc::clone(&pages),
            },
            pages,
        )
    }
}

impl BulletinSource for MockPages {
    async fn build(&self, cancel: &CancellationToken) -> Result<Vec<BoardEmbed>, SourceError> {
        if cancel.is_cancelled() {
            return Err(SourceError::Cancelled);
        }
        let pages = self.pages.lock().unwrap().clone();
        match pages {
            Some(titles) => Ok(titles.into_iter().map(|t| BoardEmbed::new(t, "articles")).collect()),
            None => Err(SourceError::Failed("help center unreachable".into())),
        }
    }
}
