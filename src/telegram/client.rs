use serde_json::json;
use std::time::{Duration, Instant};

const BOT_API_BASE: &str = "https://api.telegram.org";
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin client for the Telegram Bot API `sendMessage` method. All sends are
/// bounded by a 30-second timeout; failures are reported to the caller with
/// elapsed-time diagnostics already logged.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(bot_token: String) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self { http, bot_token })
    }

    /// Sends an HTML-formatted message to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        let url = format!("{}/bot{}/sendMessage", BOT_API_BASE, self.bot_token);
        let started = Instant::now();

        let response = self
            .http
            .post(&url)
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "HTML",
            }))
            .send()
            .await;

        let elapsed = started.elapsed();

        match response {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!(chat_id, ?elapsed, "Telegram message sent");
                Ok(())
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                tracing::error!(chat_id, %status, ?elapsed, %body, "Telegram API rejected sendMessage");
                anyhow::bail!("Telegram API returned {}", status)
            }
            Err(e) => {
                tracing::error!(chat_id, ?elapsed, error = %e, "Telegram sendMessage transport failure");
                Err(e.into())
            }
        }
    }
}
