use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::sleep;

use crate::common::{SimCommand, SimEvent};
use crate::config::AppConfig;

use super::countries::fetch_countries;
use super::{otp, replies};

/// Background task standing in for a backend: every command resolves after a
/// timer and comes back to the UI as a [`SimEvent`].
pub struct Simulator {
    event_sender: mpsc::Sender<SimEvent>,
    command_receiver: mpsc::Receiver<SimCommand>,
    config: AppConfig,
}

impl Simulator {
    pub fn new(
        event_sender: mpsc::Sender<SimEvent>,
        command_receiver: mpsc::Receiver<SimCommand>,
        config: AppConfig,
    ) -> Self {
        Self {
            event_sender,
            command_receiver,
            config,
        }
    }

    pub async fn run(mut self) {
        let mut pending = JoinSet::new();
        log::info!("Simulator event loop started");

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    if let Some(command) = command {
                        self.handle_command(command, &mut pending);
                    } else {
                        break;
                    }
                }
                Some(joined) = pending.join_next(), if !pending.is_empty() => {
                    if let Err(err) = joined {
                        log::warn!("Simulated task ended abnormally: {err}");
                    }
                }
            }
        }

        // UI đã đóng: huỷ các timer còn treo.
        pending.shutdown().await;
        log::info!("Simulator stopped");
    }

    fn handle_command(&self, command: SimCommand, pending: &mut JoinSet<()>) {
        let sender = self.event_sender.clone();
        match command {
            SimCommand::SendOtp {
                phone,
                country_code,
                resend,
            } => {
                let delay = Duration::from_millis(self.config.otp_send_delay_ms);
                log::info!("Pretending to send OTP to {country_code} {phone} (resend: {resend})");
                pending.spawn(async move {
                    sleep(delay).await;
                    emit(&sender, SimEvent::OtpSent { phone, resend }).await;
                });
            }
            SimCommand::VerifyOtp {
                attempt,
                phone,
                country_code,
                code,
            } => {
                let delay = Duration::from_millis(self.config.otp_verify_delay_ms);
                pending.spawn(async move {
                    sleep(delay).await;
                    let event = match otp::verify(&phone, &country_code, &code) {
                        Some(user) => {
                            log::info!("OTP accepted for {country_code} {phone} (attempt {attempt})");
                            SimEvent::OtpVerified { attempt, user }
                        }
                        None => {
                            log::warn!("OTP rejected for {country_code} {phone} (attempt {attempt})");
                            SimEvent::OtpRejected { attempt }
                        }
                    };
                    emit(&sender, event).await;
                });
            }
            SimCommand::RequestReply {
                chatroom_id,
                prompt,
            } => {
                let (min, max) = self.config.reply_delay_range();
                let mut rng = rand::thread_rng();
                let delay = rng.gen_range(min..=max);
                let content = replies::compose_reply(&prompt, &mut rng);
                log::debug!("Reply for {chatroom_id} scheduled in {delay:?}");
                pending.spawn(async move {
                    sleep(delay).await;
                    emit(
                        &sender,
                        SimEvent::ReplyReady {
                            chatroom_id,
                            content,
                        },
                    )
                    .await;
                });
            }
            SimCommand::LoadOlder { chatroom_id } => {
                let delay = Duration::from_millis(self.config.load_more_delay_ms);
                pending.spawn(async move {
                    sleep(delay).await;
                    emit(&sender, SimEvent::OlderMessagesReady { chatroom_id }).await;
                });
            }
            SimCommand::FetchCountries => {
                let url = self.config.countries_url.clone();
                pending.spawn(async move {
                    let event = match fetch_countries(&url).await {
                        Ok(countries) => {
                            log::info!("Loaded {} countries", countries.len());
                            SimEvent::CountriesLoaded(countries)
                        }
                        Err(err) => {
                            log::error!("Country directory fetch failed: {err}");
                            SimEvent::CountriesFailed(err.to_string())
                        }
                    };
                    emit(&sender, event).await;
                });
            }
        }
    }
}

async fn emit(sender: &mpsc::Sender<SimEvent>, event: SimEvent) {
    if let Err(err) = sender.send(event).await {
        log::warn!("Failed to deliver simulated event to UI: {err}");
    }
}
