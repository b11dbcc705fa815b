use axum::{extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::{i18n::Locale, state::AppState};

const MIN_TOKEN_LENGTH: usize = 20;
const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

#[derive(Debug, Deserialize)]
pub struct TelegramUpdate {
    #[allow(dead_code)]
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    pub from: Option<TelegramSender>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSender {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Splits a `/start` parameter of the form `{locale}_{token}`. Tokens
/// shorter than 20 characters or unknown locales are treated as garbage and
/// routed to the manual flow.
pub fn parse_start_param(param: &str) -> Option<(Locale, &str)> {
    let (locale, token) = param.split_once('_')?;
    let locale = Locale::parse(locale)?;
    if token.len() < MIN_TOKEN_LENGTH {
        return None;
    }
    Some((locale, token))
}

/// Static health/identity response for webhook configuration checks
#[utoipa::path(
    get,
    path = "/api/telegram/webhook",
    responses(
        (status = 200, description = "Webhook identity")
    ),
    tag = "telegram"
)]
pub async fn webhook_info() -> Json<serde_json::Value> {
    Json(json!({
        "ok": true,
        "service": "trudify-telegram-webhook",
    }))
}

/// Receives bot platform updates
#[utoipa::path(
    post,
    path = "/api/telegram/webhook",
    responses(
        (status = 200, description = "Update accepted"),
        (status = 401, description = "Secret token mismatch")
    ),
    tag = "telegram"
)]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<TelegramUpdate>,
) -> impl IntoResponse {
    if let Some(expected) = &state.config.telegram_webhook_secret {
        let supplied = headers.get(SECRET_HEADER).and_then(|h| h.to_str().ok());
        if supplied != Some(expected.as_str()) {
            tracing::warn!("Telegram webhook called with a bad secret token");
            return (StatusCode::UNAUTHORIZED, Json(json!({ "ok": false })));
        }
    }

    // Telegram retries on non-200; processing is fire-and-forget relative to
    // the HTTP response so a slow or failing flow never triggers a retry
    // storm.
    tokio::spawn(async move {
        if let Err(e) = process_update(state, update).await {
            tracing::error!(error = %e, "Telegram update processing failed");
        }
    });

    (StatusCode::OK, Json(json!({ "ok": true })))
}

async fn process_update(state: AppState, update: TelegramUpdate) -> anyhow::Result<()> {
    let Some(message) = update.message else {
        return Ok(());
    };
    let Some(text) = message.text.as_deref() else {
        return Ok(());
    };

    if let Some(param) = text.strip_prefix("/start") {
        let param = param.trim();
        handle_start(state, message.chat.id, message.from.as_ref(), param).await?;
    }

    Ok(())
}

async fn handle_start(
    state: AppState,
    chat_id: i64,
    sender: Option<&TelegramSender>,
    param: &str,
) -> anyhow::Result<()> {
    match parse_start_param(param) {
        Some((locale, token)) => auto_connect(state, chat_id, sender, locale, token).await,
        None => manual_flow(state, chat_id, Locale::Bg).await,
    }
}

/// Links the chat to the token's user. Any dead token falls back to the
/// manual flow; a chat that already belongs to a different account gets a
/// terminal reply instead.
async fn auto_connect(
    state: AppState,
    chat_id: i64,
    sender: Option<&TelegramSender>,
    locale: Locale,
    token: &str,
) -> anyhow::Result<()> {
    let Some(connection) = state.telegram_token_repository.find(token).await? else {
        tracing::info!(chat_id, "Unknown connection token, falling back to manual flow");
        return manual_flow(state, chat_id, locale).await;
    };

    if connection.is_expired(chrono::Utc::now()) || connection.used {
        tracing::info!(chat_id, "Dead connection token, falling back to manual flow");
        return manual_flow(state, chat_id, locale).await;
    }

    if let Some(existing) = state.user_repository.find_by_telegram_chat_id(chat_id).await? {
        if existing.id != connection.user_id {
            state
                .telegram_client
                .send_message(chat_id, already_connected_message(locale))
                .await?;
            return Ok(());
        }
    }

    // Race guard: the conditional UPDATE decides who actually gets the token.
    let Some(user_id) = state.telegram_token_repository.consume(token).await? else {
        return manual_flow(state, chat_id, locale).await;
    };

    state
        .user_repository
        .link_telegram(
            user_id,
            chat_id,
            sender.and_then(|s| s.username.as_deref()),
            sender.and_then(|s| s.first_name.as_deref()),
            sender.and_then(|s| s.last_name.as_deref()),
        )
        .await?;

    tracing::info!(chat_id, %user_id, "Telegram account linked");

    state
        .telegram_client
        .send_message(chat_id, connected_message(locale))
        .await?;

    Ok(())
}

/// Greets the user, then sends the chat id in its own monospace message so
/// mobile clients offer one-tap copy for pasting into the web profile.
async fn manual_flow(state: AppState, chat_id: i64, locale: Locale) -> anyhow::Result<()> {
    state
        .telegram_client
        .send_message(chat_id, greeting_message(locale))
        .await?;

    state
        .telegram_client
        .send_message(chat_id, &format!("<code>{}</code>", chat_id))
        .await?;

    Ok(())
}

fn greeting_message(locale: Locale) -> &'static str {
    match locale {
        Locale::Bg => "Здравейте! За да свържете Telegram с профила си в Trudify, копирайте номера от следващото съобщение и го поставете в настройките на профила си.",
        Locale::En => "Hello! To connect Telegram to your Trudify account, copy the number from the next message and paste it into your profile settings.",
        Locale::Ru => "Здравствуйте! Чтобы связать Telegram с профилем Trudify, скопируйте номер из следующего сообщения и вставьте его в настройки профиля.",
        Locale::Uk => "Вітаємо! Щоб з'єднати Telegram із профілем Trudify, скопіюйте номер із наступного повідомлення та вставте його в налаштування профілю.",
    }
}

fn connected_message(locale: Locale) -> &'static str {
    match locale {
        Locale::Bg => "✅ Telegram е свързан с профила ви в Trudify. Ще получавате известия тук.",
        Locale::En => "✅ Telegram is now connected to your Trudify account. You will receive notifications here.",
        Locale::Ru => "✅ Telegram привязан к вашему профилю Trudify. Уведомления будут приходить сюда.",
        Locale::Uk => "✅ Telegram під'єднано до вашого профілю Trudify. Сповіщення надходитимуть сюди.",
    }
}

fn already_connected_message(locale: Locale) -> &'static str {
    match locale {
        Locale::Bg => "Този Telegram акаунт вече е свързан с друг профил в Trudify.",
        Locale::En => "This Telegram account is already connected to a different Trudify profile.",
        Locale::Ru => "Этот аккаунт Telegram уже привязан к другому профилю Trudify.",
        Locale::Uk => "Цей акаунт Telegram уже під'єднано до іншого профілю Trudify.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_param_valid() {
        let token = "a".repeat(32);
        let param = format!("en_{}", token);
        let (locale, parsed) = parse_start_param(&param).unwrap();
        assert_eq!(locale, Locale::En);
        assert_eq!(parsed, token);
    }

    #[test]
    fn test_parse_start_param_short_token() {
        assert!(parse_start_param("bg_tooshort").is_none());
    }

    #[test]
    fn test_parse_start_param_unknown_locale() {
        let param = format!("de_{}", "a".repeat(32));
        assert!(parse_start_param(&param).is_none());
    }

    #[test]
    fn test_parse_start_param_no_separator() {
        assert!(parse_start_param("").is_none());
        assert!(parse_start_param("justsomething").is_none());
    }

    #[test]
    fn test_parse_start_param_token_may_contain_underscores() {
        let token = format!("abc_{}", "d".repeat(20));
        let param = format!("uk_{}", token);
        let (locale, parsed) = parse_start_param(&param).unwrap();
        assert_eq!(locale, Locale::Uk);
        assert_eq!(parsed, token);
    }
}
