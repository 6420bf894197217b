use std::path::Path;
use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{SimCommand, SimEvent};
use crate::config::AppConfig;
use crate::store::{Action, Store};

use super::attachment::{self, AttachmentError};
use super::components::{
    auth_screen::{self, AuthActions},
    chat_area::{self, ChatAreaActions},
    dashboard::{self, DashboardActions},
    input_bar::{self, InputActions, Outgoing},
    sidebar::{self, SidebarActions},
    toasts,
};
use super::state::{Countdown, UiState};
use super::theme::{ThemeEffect, apply_theme};

pub struct ChatApp {
    store: Store,
    ui_state: UiState,
    config: AppConfig,
    command_sender: mpsc::Sender<SimCommand>,
    event_receiver: mpsc::Receiver<SimEvent>,
}

impl ChatApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        mut store: Store,
        config: AppConfig,
        command_sender: mpsc::Sender<SimCommand>,
        event_receiver: mpsc::Receiver<SimEvent>,
    ) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        apply_theme(&cc.egui_ctx, store.state().is_dark_mode());
        store.subscribe(Box::new(ThemeEffect::new(cc.egui_ctx.clone())));

        Self::with_store(store, config, command_sender, event_receiver)
    }

    /// Everything except the egui-bound setup.
    fn with_store(
        store: Store,
        config: AppConfig,
        command_sender: mpsc::Sender<SimCommand>,
        event_receiver: mpsc::Receiver<SimEvent>,
    ) -> Self {
        Self {
            store,
            ui_state: UiState::new(&config),
            config,
            command_sender,
            event_receiver,
        }
    }

    /// `false` khi simulator không nhận lệnh (kênh đầy hoặc đã đóng).
    fn send_command(&mut self, command: SimCommand) -> bool {
        match self.command_sender.try_send(command) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Failed to send command to simulator: {err}");
                self.ui_state.toasts.error("Something went wrong, please try again");
                false
            }
        }
    }

    fn handle_sim_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            match event {
                SimEvent::OtpSent { phone, resend } => {
                    log::debug!("OTP delivered to {phone}");
                    let text = if resend {
                        "OTP resent successfully!"
                    } else {
                        "OTP sent successfully!"
                    };
                    self.ui_state.toasts.success(text);
                }
                SimEvent::OtpVerified { attempt, user } => {
                    // Kết quả của lần xác minh cũ (đã quay lại / đã thử số khác) thì bỏ qua.
                    if !self.ui_state.auth.is_pending(attempt) {
                        log::debug!("Ignoring stale OTP verification #{attempt}");
                        continue;
                    }
                    self.store.dispatch(Action::SetUser(Some(user)));
                    self.ui_state.auth.reset();
                    self.ui_state.toasts.success("Welcome to Gemini Chat!");
                }
                SimEvent::OtpRejected { attempt } => {
                    if !self.ui_state.auth.is_pending(attempt) {
                        log::debug!("Ignoring stale OTP rejection #{attempt}");
                        continue;
                    }
                    self.ui_state.auth.verifying = false;
                    self.ui_state
                        .toasts
                        .error("Invalid OTP. Try 123456 for demo.");
                }
                SimEvent::ReplyReady {
                    chatroom_id,
                    content,
                } => self.deliver_reply(chatroom_id, content),
                SimEvent::OlderMessagesReady { chatroom_id } => {
                    self.ui_state.chat.loading_older.remove(&chatroom_id);
                    self.store.dispatch(Action::LoadMoreMessages { chatroom_id });
                }
                SimEvent::CountriesLoaded(countries) => {
                    self.store.dispatch(Action::SetCountries(countries));
                }
                SimEvent::CountriesFailed(reason) => {
                    log::warn!("Country directory unavailable: {reason}");
                    self.ui_state.toasts.error("Failed to load countries");
                }
            }
        }
    }

    /// Replies only land in the room that asked, and only while it still exists.
    fn deliver_reply(&mut self, chatroom_id: String, content: String) {
        if self.store.state().chatroom(&chatroom_id).is_none() {
            log::debug!("Dropping reply for vanished chatroom {chatroom_id}");
            return;
        }
        self.store.dispatch(Action::SetTyping {
            chatroom_id: chatroom_id.clone(),
            typing: false,
        });
        self.store.dispatch(Action::AddMessage {
            chatroom_id,
            content,
            is_user: false,
            image: None,
        });
    }

    fn surface_store_failures(&mut self) {
        for failure in self.store.take_failures() {
            self.ui_state
                .toasts
                .error(format!("Could not save changes ({failure})"));
        }
    }

    fn auth_view(&mut self, ctx: &egui::Context, now: Instant) {
        if self.store.state().countries().is_empty() && !self.ui_state.auth.countries_requested {
            self.ui_state.auth.countries_requested = true;
            self.send_command(SimCommand::FetchCountries);
        }

        let actions: AuthActions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                auth_screen::render(ui, self.store.state(), &mut self.ui_state.auth, now)
            })
            .inner;

        if actions.toggle_theme {
            self.store.dispatch(Action::ToggleDarkMode);
        }
        if let Some(submission) = actions.submit_phone {
            let sent = self.send_command(SimCommand::SendOtp {
                phone: submission.phone.clone(),
                country_code: submission.country_code.clone(),
                resend: false,
            });
            if sent {
                let countdown =
                    Countdown::start(now, Duration::from_secs(self.config.otp_resend_secs));
                self.ui_state.auth.enter_otp_step(submission, countdown);
            }
        }
        if let Some(code) = actions.submit_otp {
            self.verify_otp(code);
        }
        if actions.resend && self.ui_state.auth.can_resend(now) {
            if let Some(submitted) = self.ui_state.auth.submitted.clone() {
                let sent = self.send_command(SimCommand::SendOtp {
                    phone: submitted.phone,
                    country_code: submitted.country_code,
                    resend: true,
                });
                if sent {
                    self.ui_state.auth.resend = Some(Countdown::start(
                        now,
                        Duration::from_secs(self.config.otp_resend_secs),
                    ));
                }
            }
        }
        if actions.back {
            self.ui_state.auth.back_to_phone();
        }
    }

    fn verify_otp(&mut self, code: String) {
        let Some(submitted) = self.ui_state.auth.submitted.clone() else {
            return;
        };
        let attempt = self.ui_state.auth.begin_verify();
        let sent = self.send_command(SimCommand::VerifyOtp {
            attempt,
            phone: submitted.phone,
            country_code: submitted.country_code,
            code,
        });
        if !sent {
            self.ui_state.auth.verifying = false;
        }
    }

    fn dashboard_view(&mut self, ctx: &egui::Context, now: Instant) {
        if let Some(query) = self.ui_state.dashboard.search.poll(now) {
            self.store.dispatch(Action::SetSearchQuery(query));
        }

        let actions: DashboardActions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                dashboard::render(ui, self.store.state(), &mut self.ui_state.dashboard, now)
            })
            .inner;

        if actions.toggle_theme {
            self.store.dispatch(Action::ToggleDarkMode);
        }
        if let Some(title) = actions.create_title {
            self.store.dispatch(Action::AddChatroom { title });
            self.ui_state.toasts.success("Chatroom created successfully!");
        }
        if let Some((id, title)) = actions.delete {
            self.store.dispatch(Action::DeleteChatroom { id });
            self.ui_state
                .toasts
                .success(format!("\"{title}\" deleted successfully!"));
        }
        if let Some(id) = actions.open {
            self.store.dispatch(Action::SetCurrentChatroom(Some(id)));
        }
        if actions.logout {
            self.logout();
        }
    }

    fn chat_view(&mut self, ctx: &egui::Context, room_id: String) {
        let mut sidebar_actions = SidebarActions::default();
        if self.ui_state.chat.sidebar_open {
            sidebar_actions = egui::SidePanel::left("chat_sidebar")
                .resizable(true)
                .default_width(220.0)
                .show(ctx, |ui| sidebar::render(ui, self.store.state()))
                .inner;
        }

        let (area_actions, input_actions) = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let state = self.store.state();
                let Some(room) = state.chatroom(&room_id) else {
                    return (ChatAreaActions::default(), InputActions::default());
                };

                ui.horizontal(|ui| {
                    if !self.ui_state.chat.sidebar_open && ui.button("☰").clicked() {
                        self.ui_state.chat.sidebar_open = true;
                    }
                    ui.heading(&room.title);
                    if let Some(page) = state.page_of(&room_id) {
                        ui.label(
                            egui::RichText::new(format!("{} messages · page {page}", room.messages.len()))
                                .weak()
                                .small(),
                        );
                    }
                });
                ui.separator();

                let input = egui::TopBottomPanel::bottom("input_bar")
                    .show_inside(ui, |ui| input_bar::render(ui, &mut self.ui_state.chat))
                    .inner;
                let area = chat_area::render(
                    ui,
                    room,
                    state.is_typing(&room_id),
                    self.ui_state.chat.loading_older.contains(&room_id),
                    &mut self.ui_state.chat.images,
                );
                (area, input)
            })
            .inner;

        if sidebar_actions.collapse {
            self.ui_state.chat.sidebar_open = false;
        }
        if sidebar_actions.toggle_theme {
            self.store.dispatch(Action::ToggleDarkMode);
        }
        if sidebar_actions.new_chat {
            self.store.dispatch(Action::SetCurrentChatroom(None));
        }
        if let Some(id) = sidebar_actions.select {
            self.ui_state.chat.clear_draft();
            self.store.dispatch(Action::SetCurrentChatroom(Some(id)));
        }

        if area_actions.load_older {
            self.request_older(room_id.clone());
        }
        if let Some(text) = area_actions.copy {
            ctx.copy_text(text);
            self.ui_state.toasts.success("Message copied to clipboard!");
        }

        if let Some(path) = input_actions.attach_path {
            self.attach_image(&path);
        }
        if let Some(outgoing) = input_actions.send {
            self.send_message(room_id, outgoing);
        }
    }

    /// The spinner only shows while a request is actually in flight.
    fn request_older(&mut self, room_id: String) {
        if self.ui_state.chat.loading_older.contains(&room_id) {
            return;
        }
        let sent = self.send_command(SimCommand::LoadOlder {
            chatroom_id: room_id.clone(),
        });
        if sent {
            self.ui_state.chat.loading_older.insert(room_id);
        }
    }

    /// Commit the user's message, then ask for a reply. Typing is only raised
    /// when a reply is actually on its way.
    fn send_message(&mut self, room_id: String, outgoing: Outgoing) {
        self.store.dispatch(Action::AddMessage {
            chatroom_id: room_id.clone(),
            content: outgoing.content.clone(),
            is_user: true,
            image: outgoing.image,
        });
        let sent = self.send_command(SimCommand::RequestReply {
            chatroom_id: room_id.clone(),
            prompt: outgoing.content,
        });
        if sent {
            self.store.dispatch(Action::SetTyping {
                chatroom_id: room_id,
                typing: true,
            });
            self.ui_state.toasts.success("Message sent!");
        }
    }

    fn attach_image(&mut self, path: &str) {
        match attachment::load_image(Path::new(path), self.config.max_image_bytes) {
            Ok(image) => {
                self.ui_state.chat.attachment = Some(image);
            }
            Err(err) => {
                if matches!(err, AttachmentError::TooLarge { .. }) {
                    self.ui_state.chat.attachment_path.clear();
                }
                log::warn!("Rejected attachment {path}: {err}");
                self.ui_state.toasts.error(err.to_string());
            }
        }
    }

    fn logout(&mut self) {
        self.store.dispatch(Action::Logout);
        self.ui_state.chat.clear_draft();
        self.ui_state.chat.loading_older.clear();
        self.ui_state.dashboard.search.clear();
        self.store.dispatch(Action::SetSearchQuery(String::new()));
        self.ui_state.toasts.success("Logged out successfully!");
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.handle_sim_events();

        let state = self.store.state();
        if !state.is_authenticated() {
            self.auth_view(ctx, now);
        } else if let Some(room_id) = state.current_chatroom().map(|room| room.id.clone()) {
            self.chat_view(ctx, room_id);
        } else {
            self.dashboard_view(ctx, now);
        }

        self.surface_store_failures();
        self.ui_state.toasts.prune(now);
        toasts::render(ctx, &self.ui_state.toasts);

        // Countdown, debounce và toast cần vẽ lại định kỳ.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::User;
    use crate::store::ChatState;
    use crate::store::seed::SEED_BATCH;
    use crate::ui::state::{AuthStep, PhoneSubmission};

    struct Harness {
        app: ChatApp,
        commands: mpsc::Receiver<SimCommand>,
        events: mpsc::Sender<SimEvent>,
    }

    fn harness() -> Harness {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, event_rx) = mpsc::channel(8);
        let app = ChatApp::with_store(
            Store::new(ChatState::new()),
            AppConfig::default(),
            cmd_tx,
            event_rx,
        );
        Harness {
            app,
            commands: cmd_rx,
            events: event_tx,
        }
    }

    fn deliver(events: &mpsc::Sender<SimEvent>, app: &mut ChatApp, event: SimEvent) {
        events.try_send(event).unwrap();
        app.handle_sim_events();
    }

    fn user(country_code: &str, phone: &str) -> User {
        User {
            id: format!("u-{phone}"),
            phone: phone.to_string(),
            country_code: country_code.to_string(),
            is_authenticated: true,
        }
    }

    fn submit_phone(app: &mut ChatApp, country_code: &str, phone: &str) {
        app.ui_state.auth.enter_otp_step(
            PhoneSubmission {
                phone: phone.to_string(),
                country_code: country_code.to_string(),
            },
            Countdown::start(Instant::now(), Duration::from_secs(30)),
        );
    }

    fn sent_attempt(commands: &mut mpsc::Receiver<SimCommand>) -> u64 {
        match commands.try_recv().unwrap() {
            SimCommand::VerifyOtp { attempt, .. } => attempt,
            other => panic!("unexpected command {other:?}"),
        }
    }

    fn add_room(app: &mut ChatApp, title: &str) -> String {
        app.store.dispatch(Action::AddChatroom {
            title: title.to_string(),
        });
        app.store.state().chatrooms()[0].id.clone()
    }

    fn toast_texts(app: &ChatApp) -> Vec<String> {
        app.ui_state.toasts.iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn verification_for_an_earlier_number_is_ignored() {
        let Harness {
            mut app,
            mut commands,
            events,
        } = harness();

        submit_phone(&mut app, "+1", "5550001");
        app.verify_otp("123456".to_string());
        let first = sent_attempt(&mut commands);

        app.ui_state.auth.back_to_phone();
        submit_phone(&mut app, "+44", "7770002");
        app.verify_otp("123456".to_string());
        let second = sent_attempt(&mut commands);

        deliver(
            &events,
            &mut app,
            SimEvent::OtpVerified {
                attempt: first,
                user: user("+1", "5550001"),
            },
        );
        assert!(!app.store.state().is_authenticated());
        assert!(app.ui_state.auth.verifying);

        deliver(&events, &mut app, SimEvent::OtpRejected { attempt: first });
        assert!(app.ui_state.auth.verifying);
        assert!(toast_texts(&app).is_empty());

        deliver(
            &events,
            &mut app,
            SimEvent::OtpVerified {
                attempt: second,
                user: user("+44", "7770002"),
            },
        );
        let signed_in = app.store.state().user().unwrap();
        assert_eq!(signed_in.country_code, "+44");
        assert_eq!(signed_in.phone, "7770002");
    }

    #[test]
    fn rejected_code_stays_on_otp_step() {
        let Harness {
            mut app,
            mut commands,
            events,
        } = harness();

        submit_phone(&mut app, "+1", "5550001");
        app.verify_otp("000000".to_string());
        let attempt = sent_attempt(&mut commands);
        deliver(&events, &mut app, SimEvent::OtpRejected { attempt });

        assert!(!app.store.state().is_authenticated());
        assert!(!app.ui_state.auth.verifying);
        assert_eq!(app.ui_state.auth.step, AuthStep::Otp);
        assert_eq!(toast_texts(&app), vec!["Invalid OTP. Try 123456 for demo."]);
    }

    #[test]
    fn verification_that_cannot_be_sent_does_not_spin() {
        let Harness {
            mut app, commands, ..
        } = harness();
        drop(commands);

        submit_phone(&mut app, "+1", "5550001");
        app.verify_otp("123456".to_string());
        assert!(!app.ui_state.auth.verifying);
    }

    #[test]
    fn resend_has_its_own_toast() {
        let Harness {
            mut app, events, ..
        } = harness();

        deliver(
            &events,
            &mut app,
            SimEvent::OtpSent {
                phone: "5550001".to_string(),
                resend: false,
            },
        );
        deliver(
            &events,
            &mut app,
            SimEvent::OtpSent {
                phone: "5550001".to_string(),
                resend: true,
            },
        );
        assert_eq!(
            toast_texts(&app),
            vec!["OTP sent successfully!", "OTP resent successfully!"]
        );
    }

    #[test]
    fn reply_clears_typing_and_lands_in_its_room() {
        let Harness {
            mut app,
            mut commands,
            events,
        } = harness();
        let room = add_room(&mut app, "Trip Planning");

        app.send_message(
            room.clone(),
            Outgoing {
                content: "hello".to_string(),
                image: None,
            },
        );
        assert!(app.store.state().is_typing(&room));
        assert!(matches!(
            commands.try_recv(),
            Ok(SimCommand::RequestReply { chatroom_id, .. }) if chatroom_id == room
        ));

        deliver(
            &events,
            &mut app,
            SimEvent::ReplyReady {
                chatroom_id: room.clone(),
                content: "Hi there".to_string(),
            },
        );
        let state = app.store.state();
        assert!(!state.is_typing(&room));
        let messages = &state.chatroom(&room).unwrap().messages;
        assert_eq!(messages.len(), SEED_BATCH + 2);
        let last = messages.last().unwrap();
        assert!(!last.is_user);
        assert_eq!(last.content, "Hi there");
    }

    #[test]
    fn reply_for_a_deleted_room_is_dropped() {
        let Harness {
            mut app, events, ..
        } = harness();
        let gone = add_room(&mut app, "Gone");
        let kept = add_room(&mut app, "Kept");
        app.store.dispatch(Action::SetTyping {
            chatroom_id: gone.clone(),
            typing: true,
        });
        app.store.dispatch(Action::DeleteChatroom { id: gone.clone() });

        deliver(
            &events,
            &mut app,
            SimEvent::ReplyReady {
                chatroom_id: gone.clone(),
                content: "late".to_string(),
            },
        );

        let state = app.store.state();
        assert_eq!(state.chatrooms().len(), 1);
        assert!(state.chatroom(&gone).is_none());
        assert!(!state.is_typing(&gone));
        assert_eq!(state.chatroom(&kept).unwrap().messages.len(), SEED_BATCH);
    }

    #[test]
    fn unsent_reply_request_leaves_no_typing_indicator() {
        let Harness {
            mut app, commands, ..
        } = harness();
        drop(commands);
        let room = add_room(&mut app, "Offline");

        app.send_message(
            room.clone(),
            Outgoing {
                content: "anyone there?".to_string(),
                image: None,
            },
        );

        let state = app.store.state();
        assert!(!state.is_typing(&room));
        assert_eq!(state.chatroom(&room).unwrap().messages.len(), SEED_BATCH + 1);
        assert_eq!(
            toast_texts(&app),
            vec!["Something went wrong, please try again"]
        );
    }

    #[test]
    fn unsent_older_request_leaves_no_spinner() {
        let Harness {
            mut app, commands, ..
        } = harness();
        drop(commands);
        let room = add_room(&mut app, "Offline");

        app.request_older(room);
        assert!(app.ui_state.chat.loading_older.is_empty());
    }

    #[test]
    fn older_messages_are_requested_once_until_they_arrive() {
        let Harness {
            mut app,
            mut commands,
            events,
        } = harness();
        let room = add_room(&mut app, "History");

        app.request_older(room.clone());
        app.request_older(room.clone());
        assert!(matches!(commands.try_recv(), Ok(SimCommand::LoadOlder { .. })));
        assert!(commands.try_recv().is_err());
        assert!(app.ui_state.chat.loading_older.contains(&room));

        deliver(
            &events,
            &mut app,
            SimEvent::OlderMessagesReady {
                chatroom_id: room.clone(),
            },
        );
        assert!(app.ui_state.chat.loading_older.is_empty());
        let state = app.store.state();
        assert_eq!(state.chatroom(&room).unwrap().messages.len(), SEED_BATCH * 2);
        assert_eq!(state.page_of(&room), Some(2));
    }

    #[test]
    fn logout_resets_search_and_pending_loads() {
        let Harness { mut app, .. } = harness();
        app.store
            .dispatch(Action::SetUser(Some(user("+1", "5550001"))));
        let room = add_room(&mut app, "Trip Planning");
        app.ui_state.dashboard.search.input = "trip".to_string();
        app.store.dispatch(Action::SetSearchQuery("trip".to_string()));
        app.ui_state.chat.loading_older.insert(room);

        app.logout();

        let state = app.store.state();
        assert!(!state.is_authenticated());
        assert!(state.chatrooms().is_empty());
        assert_eq!(state.search_query(), "");
        assert!(app.ui_state.dashboard.search.input.is_empty());
        assert!(app.ui_state.chat.loading_older.is_empty());
    }
}
