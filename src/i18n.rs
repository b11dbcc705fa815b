use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Supported interface locales. `bg` is the site default and the fallback
/// whenever a stored or supplied locale cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Bg,
    En,
    Ru,
    Uk,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Bg => "bg",
            Locale::En => "en",
            Locale::Ru => "ru",
            Locale::Uk => "uk",
        }
    }

    pub fn parse(s: &str) -> Option<Locale> {
        match s {
            "bg" => Some(Locale::Bg),
            "en" => Some(Locale::En),
            "ru" => Some(Locale::Ru),
            "uk" => Some(Locale::Uk),
            _ => None,
        }
    }

    /// Resolve a possibly-missing locale string, falling back to the default.
    pub fn parse_or_default(s: Option<&str>) -> Locale {
        s.and_then(Locale::parse).unwrap_or_default()
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Human-readable "time ago" used on public professional profiles.
/// Anything older than 30 days falls back to an absolute date.
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>, locale: Locale) -> String {
    let elapsed = now.signed_duration_since(then);
    let seconds = elapsed.num_seconds().max(0);

    if seconds < 60 {
        return match locale {
            Locale::Bg => "току-що".to_string(),
            Locale::En => "just now".to_string(),
            Locale::Ru => "только что".to_string(),
            Locale::Uk => "щойно".to_string(),
        };
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return match locale {
            Locale::Bg => format!("преди {} мин", minutes),
            Locale::En => format!("{} min ago", minutes),
            Locale::Ru => format!("{} мин назад", minutes),
            Locale::Uk => format!("{} хв тому", minutes),
        };
    }

    let hours = minutes / 60;
    if hours < 24 {
        return match locale {
            Locale::Bg => format!("преди {} ч", hours),
            Locale::En => format!("{} h ago", hours),
            Locale::Ru => format!("{} ч назад", hours),
            Locale::Uk => format!("{} год тому", hours),
        };
    }

    let days = hours / 24;
    if days <= 30 {
        return match locale {
            Locale::Bg => format!("преди {} дни", days),
            Locale::En => format!("{} days ago", days),
            Locale::Ru => format!("{} дн. назад", days),
            Locale::Uk => format!("{} дн. тому", days),
        };
    }

    then.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_locale_parse() {
        assert_eq!(Locale::parse("bg"), Some(Locale::Bg));
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        assert_eq!(Locale::parse("ru"), Some(Locale::Ru));
        assert_eq!(Locale::parse("uk"), Some(Locale::Uk));
        assert_eq!(Locale::parse("de"), None);
    }

    #[test]
    fn test_locale_fallback() {
        assert_eq!(Locale::parse_or_default(None), Locale::Bg);
        assert_eq!(Locale::parse_or_default(Some("xx")), Locale::Bg);
        assert_eq!(Locale::parse_or_default(Some("uk")), Locale::Uk);
    }

    #[test]
    fn test_relative_just_now() {
        let now = Utc::now();
        assert_eq!(format_relative(now, now, Locale::En), "just now");
        assert_eq!(
            format_relative(now - Duration::seconds(59), now, Locale::Bg),
            "току-що"
        );
    }

    #[test]
    fn test_relative_units() {
        let now = Utc::now();
        assert_eq!(
            format_relative(now - Duration::minutes(5), now, Locale::En),
            "5 min ago"
        );
        assert_eq!(
            format_relative(now - Duration::hours(3), now, Locale::Ru),
            "3 ч назад"
        );
        assert_eq!(
            format_relative(now - Duration::days(2), now, Locale::Uk),
            "2 дн. тому"
        );
    }

    #[test]
    fn test_relative_old_dates_are_absolute() {
        let now = Utc::now();
        let then = now - Duration::days(45);
        let formatted = format_relative(then, now, Locale::En);
        assert_eq!(formatted, then.format("%d.%m.%Y").to_string());
    }
}
