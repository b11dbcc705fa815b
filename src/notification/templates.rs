use super::notification_models::{NotificationType, TemplateData};
use crate::i18n::Locale;

/// Rendered notification content for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub title: String,
    pub message: String,
}

fn task_title(data: &TemplateData) -> &str {
    data.task_title.as_deref().unwrap_or("")
}

fn counterpart(data: &TemplateData) -> &str {
    data.counterpart_name.as_deref().unwrap_or("")
}

fn reason(data: &TemplateData) -> &str {
    data.reason.as_deref().unwrap_or("")
}

/// Localized templates for the fixed allowlist of event types. Types outside
/// the allowlist return `None` and require caller-supplied text.
pub fn render(
    notification_type: NotificationType,
    locale: Locale,
    data: &TemplateData,
) -> Option<RenderedTemplate> {
    let (title, message) = match (notification_type, locale) {
        (NotificationType::Welcome, Locale::Bg) => (
            "Добре дошли в Trudify".to_string(),
            "Профилът ви е готов. Публикувайте задача или кандидатствайте за работа.".to_string(),
        ),
        (NotificationType::Welcome, Locale::En) => (
            "Welcome to Trudify".to_string(),
            "Your account is ready. Post a task or apply for work.".to_string(),
        ),
        (NotificationType::Welcome, Locale::Ru) => (
            "Добро пожаловать в Trudify".to_string(),
            "Ваш профиль готов. Опубликуйте задачу или откликнитесь на работу.".to_string(),
        ),
        (NotificationType::Welcome, Locale::Uk) => (
            "Ласкаво просимо до Trudify".to_string(),
            "Ваш профіль готовий. Опублікуйте завдання або подайте заявку на роботу.".to_string(),
        ),

        (NotificationType::ApplicationAccepted, Locale::Bg) => (
            "Кандидатурата ви е приета".to_string(),
            format!("{} прие кандидатурата ви за „{}“.", counterpart(data), task_title(data)),
        ),
        (NotificationType::ApplicationAccepted, Locale::En) => (
            "Your application was accepted".to_string(),
            format!("{} accepted your application for \"{}\".", counterpart(data), task_title(data)),
        ),
        (NotificationType::ApplicationAccepted, Locale::Ru) => (
            "Ваша заявка принята".to_string(),
            format!("{} принял(а) вашу заявку на «{}».", counterpart(data), task_title(data)),
        ),
        (NotificationType::ApplicationAccepted, Locale::Uk) => (
            "Вашу заявку прийнято".to_string(),
            format!("{} прийняв(ла) вашу заявку на «{}».", counterpart(data), task_title(data)),
        ),

        (NotificationType::TaskCompleted, Locale::Bg) => (
            "Задачата е завършена".to_string(),
            format!("{} потвърди завършването на „{}“. Благодарим ви!", counterpart(data), task_title(data)),
        ),
        (NotificationType::TaskCompleted, Locale::En) => (
            "Task completed".to_string(),
            format!("{} confirmed completion of \"{}\". Thank you!", counterpart(data), task_title(data)),
        ),
        (NotificationType::TaskCompleted, Locale::Ru) => (
            "Задача завершена".to_string(),
            format!("{} подтвердил(а) завершение «{}». Спасибо!", counterpart(data), task_title(data)),
        ),
        (NotificationType::TaskCompleted, Locale::Uk) => (
            "Завдання завершено".to_string(),
            format!("{} підтвердив(ла) завершення «{}». Дякуємо!", counterpart(data), task_title(data)),
        ),

        (NotificationType::CompletionRejected, Locale::Bg) => (
            "Завършването не е потвърдено".to_string(),
            format!(
                "{} върна „{}“ за доработка. Причина: {}",
                counterpart(data), task_title(data), reason(data)
            ),
        ),
        (NotificationType::CompletionRejected, Locale::En) => (
            "Completion not confirmed".to_string(),
            format!(
                "{} sent \"{}\" back for more work. Reason: {}",
                counterpart(data), task_title(data), reason(data)
            ),
        ),
        (NotificationType::CompletionRejected, Locale::Ru) => (
            "Завершение не подтверждено".to_string(),
            format!(
                "{} вернул(а) «{}» на доработку. Причина: {}",
                counterpart(data), task_title(data), reason(data)
            ),
        ),
        (NotificationType::CompletionRejected, Locale::Uk) => (
            "Завершення не підтверджено".to_string(),
            format!(
                "{} повернув(ла) «{}» на доопрацювання. Причина: {}",
                counterpart(data), task_title(data), reason(data)
            ),
        ),

        (NotificationType::ProfessionalWithdrew, Locale::Bg) => (
            "Изпълнителят се отказа".to_string(),
            format!(
                "{} се отказа от „{}“. Задачата е отворена отново за кандидатури. Причина: {}",
                counterpart(data), task_title(data), reason(data)
            ),
        ),
        (NotificationType::ProfessionalWithdrew, Locale::En) => (
            "Professional withdrew".to_string(),
            format!(
                "{} withdrew from \"{}\". The task is open for applications again. Reason: {}",
                counterpart(data), task_title(data), reason(data)
            ),
        ),
        (NotificationType::ProfessionalWithdrew, Locale::Ru) => (
            "Исполнитель отказался".to_string(),
            format!(
                "{} отказался(лась) от «{}». Задача снова открыта для заявок. Причина: {}",
                counterpart(data), task_title(data), reason(data)
            ),
        ),
        (NotificationType::ProfessionalWithdrew, Locale::Uk) => (
            "Виконавець відмовився".to_string(),
            format!(
                "{} відмовився(лась) від «{}». Завдання знову відкрите для заявок. Причина: {}",
                counterpart(data), task_title(data), reason(data)
            ),
        ),

        (NotificationType::NewApplication, _)
        | (NotificationType::ApplicationRejected, _)
        | (NotificationType::PaymentConfirmed, _)
        | (NotificationType::DeadlineReminder, _) => return None,
    };

    Some(RenderedTemplate { title, message })
}

/// Chat-formatted variant sent to Telegram. Title is bolded; Telegram's
/// `sendMessage` is called with `parse_mode=HTML`.
pub fn render_telegram(
    notification_type: NotificationType,
    locale: Locale,
    data: &TemplateData,
) -> Option<String> {
    render(notification_type, locale, data)
        .map(|t| format!("<b>{}</b>\n\n{}", t.title, t.message))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_LOCALES: [Locale; 4] = [Locale::Bg, Locale::En, Locale::Ru, Locale::Uk];

    const TEMPLATED: [NotificationType; 5] = [
        NotificationType::Welcome,
        NotificationType::ApplicationAccepted,
        NotificationType::TaskCompleted,
        NotificationType::CompletionRejected,
        NotificationType::ProfessionalWithdrew,
    ];

    fn sample_data() -> TemplateData {
        TemplateData {
            task_title: Some("Монтаж на климатик".to_string()),
            counterpart_name: Some("Ivan".to_string()),
            reason: Some("schedule conflict".to_string()),
        }
    }

    #[test]
    fn test_allowlist_renders_in_every_locale() {
        for notification_type in TEMPLATED {
            for locale in ALL_LOCALES {
                let rendered = render(notification_type, locale, &sample_data())
                    .unwrap_or_else(|| panic!("{notification_type} missing for {locale}"));
                assert!(!rendered.title.is_empty());
                assert!(!rendered.message.is_empty());
            }
        }
    }

    #[test]
    fn test_non_templated_types_return_none() {
        for notification_type in [
            NotificationType::NewApplication,
            NotificationType::ApplicationRejected,
            NotificationType::PaymentConfirmed,
            NotificationType::DeadlineReminder,
        ] {
            assert!(render(notification_type, Locale::En, &sample_data()).is_none());
        }
    }

    #[test]
    fn test_template_interpolates_data() {
        let rendered = render(
            NotificationType::TaskCompleted,
            Locale::En,
            &sample_data(),
        )
        .unwrap();
        assert!(rendered.message.contains("Ivan"));
        assert!(rendered.message.contains("Монтаж на климатик"));
    }

    #[test]
    fn test_telegram_variant_is_html_formatted() {
        let message =
            render_telegram(NotificationType::Welcome, Locale::En, &TemplateData::default())
                .unwrap();
        assert!(message.starts_with("<b>"));
        assert!(message.contains("</b>\n\n"));
    }
}
