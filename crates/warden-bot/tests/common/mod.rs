#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use teloxide::types::{ChatId, InlineKeyboardMarkup, MessageId, UserId};
use warden_bot::{ChatApi, MessageRef, PermissionPreset, PlatformError, Settings, Warden};
use warden_db::Database;

pub const OWNER: UserId = UserId(1);

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Approve(ChatId, UserId),
    Restrict(ChatId, UserId, PermissionPreset),
    Send(ChatId, String),
    Edit(MessageRef, String),
    Delete(MessageRef),
    Copy(ChatId, MessageRef),
    Answer(String, Option<String>),
}

/// Records every outbound call and fails the ones it was told to.
#[derive(Default)]
pub struct MockApi {
    calls: Mutex<Vec<Call>>,
    approve_errors: Mutex<VecDeque<PlatformError>>,
    restrict_errors: Mutex<VecDeque<PlatformError>>,
    send_errors: Mutex<VecDeque<PlatformError>>,
    copy_errors: Mutex<HashMap<i64, VecDeque<PlatformError>>>,
    next_id: AtomicI32,
}

impl MockApi {
    pub fn fail_approve(&self, err: PlatformError) {
        self.approve_errors.lock().unwrap().push_back(err);
    }

    pub fn fail_restrict(&self, err: PlatformError) {
        self.restrict_errors.lock().unwrap().push_back(err);
    }

    pub fn fail_send(&self, err: PlatformError) {
        self.send_errors.lock().unwrap().push_back(err);
    }

    pub fn fail_copy(&self, chat: i64, err: PlatformError) {
        self.copy_errors
            .lock()
            .unwrap()
            .entry(chat)
            .or_default()
            .push_back(err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn restricts(&self) -> Vec<(ChatId, UserId, PermissionPreset)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Restrict(chat, user, preset) => Some((chat, user, preset)),
                _ => None,
            })
            .collect()
    }

    /// Texts sent to `chat`, in order.
    pub fn sent_to(&self, chat: ChatId) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send(to, text) if to == chat => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_error(queue: &Mutex<VecDeque<PlatformError>>) -> Result<(), PlatformError> {
        match queue.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChatApi for MockApi {
    async fn approve_join_request(&self, chat_id: ChatId, user_id: UserId) -> Result<(), PlatformError> {
        self.record(Call::Approve(chat_id, user_id));
        Self::next_error(&self.approve_errors)
    }

    async fn restrict_member(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        preset: PermissionPreset,
    ) -> Result<(), PlatformError> {
        self.record(Call::Restrict(chat_id, user_id, preset));
        Self::next_error(&self.restrict_errors)
    }

    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        _keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageRef, PlatformError> {
        self.record(Call::Send(chat_id, text.to_string()));
        Self::next_error(&self.send_errors)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(MessageRef::new(chat_id, MessageId(id)))
    }

    async fn edit_message(
        &self,
        message: MessageRef,
        text: &str,
        _keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), PlatformError> {
        self.record(Call::Edit(message, text.to_string()));
        Ok(())
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), PlatformError> {
        self.record(Call::Delete(message));
        Ok(())
    }

    async fn copy_message(&self, to: ChatId, source: MessageRef) -> Result<(), PlatformError> {
        self.record(Call::Copy(to, source));
        let err = self
            .copy_errors
            .lock()
            .unwrap()
            .get_mut(&to.0)
            .and_then(VecDeque::pop_front);
        match err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), PlatformError> {
        self.record(Call::Answer(callback_id.to_string(), text.map(str::to_string)));
        Ok(())
    }
}

pub fn warden() -> Warden<MockApi> {
    let mut settings = Settings::new(OWNER, "warden_bot");
    settings.broadcast_delay = Duration::ZERO;
    Warden::new(
        MockApi::default(),
        Database::open_in_memory().unwrap(),
        settings,
    )
}

pub fn short_wait() -> PlatformError {
    PlatformError::RateLimited(Duration::from_millis(1))
}
