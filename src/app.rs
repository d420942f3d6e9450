use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::conversation::Conversation;
use crate::forms::{record_value, FormKind, IntakeForm};
use crate::responder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionAction {
    ScheduleAppointment,
    Services,
    Resources,
}

impl SuggestionAction {
    pub fn all() -> [SuggestionAction; 3] {
        [
            SuggestionAction::ScheduleAppointment,
            SuggestionAction::Services,
            SuggestionAction::Resources,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            SuggestionAction::ScheduleAppointment => "Schedule Appointment",
            SuggestionAction::Services => "What services do you offer?",
            SuggestionAction::Resources => "Mental Health Resources",
        }
    }

    pub fn key_hint(self) -> &'static str {
        match self {
            SuggestionAction::ScheduleAppointment => "F2",
            SuggestionAction::Services => "F3",
            SuggestionAction::Resources => "F4",
        }
    }
}

/// One-shot deferred reply, keyed to the user message that triggered it so a
/// completion can be traced back (and discarded) after a reset or teardown.
pub struct PendingReply {
    pub for_message: u64,
    pub handle: tokio::task::JoinHandle<String>,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Conversation state
    pub conversation: Conversation,
    pub pending_reply: Option<PendingReply>,

    // Chat input state
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Transcript scroll state
    pub chat_scroll: u16,
    pub chat_height: u16, // inner chat area size, updated during render
    pub chat_width: u16,

    // Modal form state (one at a time)
    pub active_form: Option<IntakeForm>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Chat area for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,

    pub config: Config,
    rng: StdRng,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            conversation: Conversation::new(),
            pending_reply: None,
            input: String::new(),
            cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            active_form: None,
            animation_frame: 0,
            chat_area: None,
            config,
            rng,
        }
    }

    /// Submit whatever is in the input box, trimmed. Empty input and
    /// submissions while a reply is already pending are ignored.
    pub fn send_current_input(&mut self) {
        if self.pending_reply.is_some() {
            return;
        }
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return;
        }
        self.input.clear();
        self.cursor = 0;
        self.send_message(text);
    }

    /// Append a user message and schedule the deferred assistant reply.
    pub fn send_message(&mut self, text: String) {
        if self.pending_reply.is_some() {
            return;
        }
        let Some(id) = self.conversation.append_user(&text) else {
            return;
        };

        let (min_ms, max_ms) = self.config.delay_bounds();
        let delay = Duration::from_millis(self.rng.gen_range(min_ms..=max_ms));
        let mut reply_rng = StdRng::seed_from_u64(self.rng.gen());
        debug!(message_id = id, delay_ms = delay.as_millis() as u64, "scheduling reply");

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            responder::select_reply(&text, &mut reply_rng)
        });
        self.pending_reply = Some(PendingReply {
            for_message: id,
            handle,
        });

        self.scroll_chat_to_bottom();
    }

    /// Collect the deferred reply once its delay has elapsed. Called from the
    /// event loop on every tick; a no-op while the task is still sleeping.
    pub async fn poll_reply(&mut self) {
        let finished = self
            .pending_reply
            .as_ref()
            .is_some_and(|p| p.handle.is_finished());
        if !finished {
            return;
        }

        if let Some(pending) = self.pending_reply.take() {
            match pending.handle.await {
                Ok(reply) => {
                    info!(for_message = pending.for_message, "reply ready");
                    self.conversation.append_assistant(&reply);
                }
                Err(err) => {
                    warn!(for_message = pending.for_message, %err, "reply task failed");
                    self.conversation.abort_composing();
                }
            }
            self.scroll_chat_to_bottom();
        }
    }

    /// Drop a not-yet-fired reply so it can never mutate state after the
    /// session is torn down.
    pub fn abort_pending_reply(&mut self) {
        if let Some(pending) = self.pending_reply.take() {
            debug!(for_message = pending.for_message, "discarding pending reply");
            pending.handle.abort();
            self.conversation.abort_composing();
        }
    }

    pub fn apply_suggestion(&mut self, action: SuggestionAction) {
        match action {
            SuggestionAction::ScheduleAppointment => {
                self.active_form = Some(IntakeForm::appointment());
            }
            SuggestionAction::Services => {
                self.send_message("What services do you offer?".to_string());
            }
            SuggestionAction::Resources => {
                self.active_form = Some(IntakeForm::questionnaire());
            }
        }
    }

    /// Validate and submit the open form: emit the record, append the
    /// confirmation message, close the form. Keeps the form open (with the
    /// offending field focused) when a required field is missing.
    pub fn submit_active_form(&mut self) {
        let Some(form) = self.active_form.as_mut() else {
            return;
        };
        if !form.validate() {
            return;
        }
        let Some(form) = self.active_form.take() else {
            return;
        };

        let record = form.record();
        info!(form = form.kind.name(), record = ?record, "form submitted");

        let confirmation = match form.kind {
            FormKind::Appointment => format!(
                "Thank you {}! Your appointment request for {} at {} has been received. Our team will contact you within 24 hours to confirm your appointment. If you need immediate assistance, please call our emergency line.",
                record_value(&record, "firstName"),
                record_value(&record, "appointmentDate"),
                record_value(&record, "appointmentTime"),
            ),
            FormKind::Questionnaire => format!(
                "Thank you for completing your health questionnaire, {}. This information will help our clinical team provide you with the most appropriate care. Based on your responses, we recommend scheduling a consultation with one of our mental health professionals. Would you like me to help you schedule an appointment?",
                record_value(&record, "firstName"),
            ),
        };
        self.conversation.append_assistant(&confirmation);
        self.scroll_chat_to_bottom();
    }

    pub fn cancel_form(&mut self) {
        self.active_form = None;
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.conversation.is_composing() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Transcript scrolling. Line counts use the same char-count wrap estimate
    // the render path produces, so the bottom stays pinned as messages land.
    pub fn transcript_line_count(&self) -> u16 {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            60
        };

        let mut total: u16 = 0;
        for message in self.conversation.messages() {
            total += 1; // author/timestamp line
            for line in message.text.lines() {
                let char_count = line.chars().count();
                if char_count == 0 {
                    total += 1;
                } else {
                    total += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total += 1; // blank line after message
        }
        if self.conversation.is_composing() {
            total += 2; // author line + animated "Typing..."
        }
        total
    }

    pub fn scroll_chat_to_bottom(&mut self) {
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.chat_scroll = self
            .transcript_line_count()
            .saturating_sub(visible_height);
    }

    pub fn chat_scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn chat_scroll_down(&mut self) {
        let max_scroll = self
            .transcript_line_count()
            .saturating_sub(self.chat_height.max(1));
        if self.chat_scroll < max_scroll {
            self.chat_scroll = self.chat_scroll.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Author;

    fn test_app() -> App {
        let mut config = Config::new();
        // Replies land immediately so scenario tests don't wait.
        config.reply_delay_min_ms = 0;
        config.reply_delay_max_ms = 0;
        App::new(config, Some(7))
    }

    async fn wait_for_reply(app: &mut App) {
        for _ in 0..200 {
            app.poll_reply().await;
            if !app.conversation.is_composing() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("reply never arrived");
    }

    #[tokio::test]
    async fn test_anxiety_scenario() {
        let mut app = test_app();
        app.input = "I feel anxious about work".to_string();
        app.send_current_input();

        assert!(app.conversation.is_composing());
        assert!(app.input.is_empty());
        assert_eq!(app.conversation.messages().len(), 2);

        wait_for_reply(&mut app).await;

        let messages = app.conversation.messages();
        assert_eq!(messages.len(), 3); // welcome + user + assistant
        assert_eq!(messages[2].author, Author::Assistant);
        assert_eq!(messages[2].text, responder::ANXIETY_REPLY);
        assert!(!app.conversation.is_composing());
    }

    #[tokio::test]
    async fn test_submission_ignored_while_reply_pending() {
        let mut config = Config::new();
        config.reply_delay_min_ms = 60_000;
        config.reply_delay_max_ms = 60_000;
        let mut app = App::new(config, Some(7));

        app.send_message("first".to_string());
        assert_eq!(app.conversation.messages().len(), 2);

        app.input = "second".to_string();
        app.send_current_input();
        // Ignored: log unchanged and the draft is kept.
        assert_eq!(app.conversation.messages().len(), 2);
        assert_eq!(app.input, "second");

        app.abort_pending_reply();
    }

    #[tokio::test]
    async fn test_abort_pending_reply_guards_late_writes() {
        let mut config = Config::new();
        config.reply_delay_min_ms = 60_000;
        config.reply_delay_max_ms = 60_000;
        let mut app = App::new(config, Some(7));

        app.send_message("hello".to_string());
        app.abort_pending_reply();

        assert!(!app.conversation.is_composing());
        assert!(app.pending_reply.is_none());
        app.poll_reply().await; // no-op
        assert_eq!(app.conversation.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_services_suggestion_sends_canned_message() {
        let mut app = test_app();
        app.apply_suggestion(SuggestionAction::Services);

        let messages = app.conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].author, Author::User);
        assert_eq!(messages[1].text, "What services do you offer?");
        assert!(app.conversation.is_composing());

        wait_for_reply(&mut app).await;
        assert_eq!(
            app.conversation.messages()[2].text,
            responder::SERVICES_REPLY
        );
    }

    #[test]
    fn test_form_suggestions_open_modals() {
        let mut app = test_app();

        app.apply_suggestion(SuggestionAction::ScheduleAppointment);
        assert!(app
            .active_form
            .as_ref()
            .is_some_and(|f| f.kind == FormKind::Appointment));

        app.cancel_form();
        assert!(app.active_form.is_none());

        app.apply_suggestion(SuggestionAction::Resources);
        assert!(app
            .active_form
            .as_ref()
            .is_some_and(|f| f.kind == FormKind::Questionnaire));
    }

    #[test]
    fn test_appointment_submit_appends_confirmation() {
        let mut app = test_app();
        app.apply_suggestion(SuggestionAction::ScheduleAppointment);

        let form = app.active_form.as_mut().expect("form open");
        for (key, value) in [
            ("firstName", "Jane"),
            ("lastName", "Doe"),
            ("email", "jane@example.com"),
            ("phone", "555-0100"),
            ("appointmentDate", "2024-06-01"),
            ("appointmentTime", "09:00"),
        ] {
            let field = form
                .fields
                .iter_mut()
                .find(|f| f.key == key)
                .expect("field");
            field.value = value.to_string();
        }

        app.submit_active_form();

        assert!(app.active_form.is_none());
        let last = app.conversation.messages().last().expect("message");
        assert_eq!(last.author, Author::Assistant);
        assert!(last.text.contains("Jane"));
        assert!(last.text.contains("2024-06-01"));
        assert!(last.text.contains("09:00"));
    }

    #[test]
    fn test_incomplete_form_blocks_submit() {
        let mut app = test_app();
        app.apply_suggestion(SuggestionAction::ScheduleAppointment);
        let log_len = app.conversation.messages().len();

        app.submit_active_form();

        // Form stays open with an error; nothing was emitted.
        assert!(app
            .active_form
            .as_ref()
            .is_some_and(|f| f.error.is_some()));
        assert_eq!(app.conversation.messages().len(), log_len);
    }

    #[test]
    fn test_whitespace_input_never_reaches_responder() {
        let mut app = test_app();
        app.input = "   ".to_string();
        app.send_current_input();

        assert_eq!(app.conversation.messages().len(), 1);
        assert!(!app.conversation.is_composing());
        assert!(app.pending_reply.is_none());
    }
}
