use std::collections::HashMap;
use std::time::Instant;

use crate::core::AppConfig;
use crate::llm::BoxedGenerator;

/// Chat history for one session, alternating user input and the
/// generated response.
#[derive(Debug)]
pub struct ChatSession {
    pub history: Vec<String>,
    last_seen: Instant,
}

pub struct AppState {
    // Sessions idle longer than `config.session_ttl` are dropped on the
    // next write, and the map never holds more than `config.max_sessions`
    pub chats: HashMap<String, ChatSession>,
    pub generator: BoxedGenerator,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(generator: BoxedGenerator, config: AppConfig) -> Self {
        Self {
            chats: HashMap::new(),
            generator,
            config,
        }
    }

    /// Start the session over with an empty history.
    pub fn reset_chats(&mut self, session_id: &str) {
        self.reset_chats_at(session_id, Instant::now());
    }

    pub fn last_chat(&self, session_id: &str) -> Option<&str> {
        self.last_chat_at(session_id, Instant::now())
    }

    /// Record one turn of the conversation, creating the session if
    /// it doesn't exist yet.
    pub fn append_turn(&mut self, session_id: &str, user_text: &str, bot_text: &str) {
        self.append_turn_at(session_id, user_text, bot_text, Instant::now());
    }

    /// Drop every session that has been idle for longer than the
    /// configured TTL.
    pub fn evict_expired(&mut self, now: Instant) {
        let ttl = self.config.session_ttl;
        let before = self.chats.len();
        self.chats
            .retain(|_, session| now.saturating_duration_since(session.last_seen) < ttl);
        let evicted = before - self.chats.len();
        if evicted > 0 {
            tracing::debug!("Evicted {} expired chat sessions", evicted);
        }
    }

    fn is_live(&self, session: &ChatSession, now: Instant) -> bool {
        now.saturating_duration_since(session.last_seen) < self.config.session_ttl
    }

    fn reset_chats_at(&mut self, session_id: &str, now: Instant) {
        self.session_mut(session_id, now).history.clear();
    }

    fn last_chat_at(&self, session_id: &str, now: Instant) -> Option<&str> {
        self.chats
            .get(session_id)
            .filter(|session| self.is_live(session, now))
            .and_then(|session| session.history.last())
            .map(String::as_str)
    }

    fn append_turn_at(
        &mut self,
        session_id: &str,
        user_text: &str,
        bot_text: &str,
        now: Instant,
    ) {
        let history = &mut self.session_mut(session_id, now).history;
        history.push(user_text.to_string());
        history.push(bot_text.to_string());
    }

    // Looks up the session, creating it when missing and making room
    // by dropping the least recently seen one when at capacity.
    fn session_mut(&mut self, session_id: &str, now: Instant) -> &mut ChatSession {
        self.evict_expired(now);

        let at_capacity = self.chats.len() >= self.config.max_sessions.max(1);
        if at_capacity && !self.chats.contains_key(session_id) {
            let oldest = self
                .chats
                .iter()
                .min_by_key(|(_, session)| session.last_seen)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                self.chats.remove(&oldest);
            }
        }

        let session = self
            .chats
            .entry(session_id.to_string())
            .or_insert_with(|| ChatSession {
                history: Vec::new(),
                last_seen: now,
            });
        session.last_seen = now;
        session
    }
}
