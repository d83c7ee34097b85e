//! User-facing message text.
//!
//! Domain errors carry a [`MessageId`]; this module turns an identifier into
//! text for the caller's [`Locale`]. The locale is negotiated from the
//! `Accept-Language` header, falling back to the configured default.

use std::fmt;
use std::str::FromStr;
use todolist_core::MessageId;

/// Languages with a message table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// English
    #[default]
    En,
    /// Korean
    Ko,
}

impl Locale {
    /// Primary language subtag, e.g. `en`
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ko => "ko",
        }
    }

    /// Match a language tag such as `ko`, `ko-KR` or `en_US` by its primary
    /// subtag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next()?;
        if primary.eq_ignore_ascii_case("en") {
            Some(Self::En)
        } else if primary.eq_ignore_ascii_case("ko") {
            Some(Self::Ko)
        } else {
            None
        }
    }

    /// First supported language in an `Accept-Language` value.
    ///
    /// Ranges weighted `q=0` are refused and skipped. Other weights are
    /// ignored; list order decides.
    #[must_use]
    pub fn negotiate(accept_language: &str) -> Option<Self> {
        accept_language
            .split(',')
            .filter_map(|range| {
                let mut parts = range.split(';');
                let tag = parts.next()?;
                let refused = parts.any(|param| {
                    param
                        .trim()
                        .strip_prefix("q=")
                        .and_then(|q| q.trim().parse::<f32>().ok())
                        .is_some_and(|q| q <= 0.0)
                });
                (!refused).then_some(tag)
            })
            .find_map(Self::from_tag)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A language tag with no message table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale '{0}', expected 'en' or 'ko'")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| UnknownLocale(s.to_string()))
    }
}

/// Source of localized message text.
pub trait MessageCatalog: Send + Sync {
    /// Text for `id` in `locale`
    fn message(&self, id: MessageId, locale: Locale) -> String;
}

/// Built-in English and Korean tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl StaticCatalog {
    const fn english(id: MessageId) -> &'static str {
        match id {
            MessageId::InvalidGroup => "Group ID must be between 1 and 9",
            MessageId::InvalidStatus => "Status must be 'completed' or 'pending'",
            MessageId::InvalidSortField => {
                "Invalid sort_by field. Must be one of: id, title, created_at, completed, completed_at, group"
            }
            MessageId::InvalidSortOrder => "Order must be 'asc' or 'desc'",
            MessageId::TitleRequired => "Title is required",
            MessageId::InvalidBody => "Invalid request",
            MessageId::TodoNotFound => "To-Do item not found",
            MessageId::TodoDeleted => "To-Do item deleted",
            MessageId::IdsExhausted => "No more To-Do ids are available",
            MessageId::IndexNotFound => "index.html not found",
            MessageId::InternalError => "An internal error occurred",
        }
    }

    const fn korean(id: MessageId) -> &'static str {
        match id {
            MessageId::InvalidGroup => "그룹 ID는 1에서 9 사이여야 합니다",
            MessageId::InvalidStatus => "상태는 'completed' 또는 'pending'이어야 합니다",
            MessageId::InvalidSortField => {
                "잘못된 sort_by 필드입니다. 다음 중 하나여야 합니다: id, title, created_at, completed, completed_at, group"
            }
            MessageId::InvalidSortOrder => "정렬 순서는 'asc' 또는 'desc'여야 합니다",
            MessageId::TitleRequired => "제목은 필수입니다",
            MessageId::InvalidBody => "잘못된 요청입니다",
            MessageId::TodoNotFound => "할 일 항목을 찾을 수 없습니다",
            MessageId::TodoDeleted => "할 일 항목이 삭제되었습니다",
            MessageId::IdsExhausted => "더 이상 사용할 수 있는 할 일 ID가 없습니다",
            MessageId::IndexNotFound => "index.html을 찾을 수 없습니다",
            MessageId::InternalError => "내부 서버 오류가 발생했습니다",
        }
    }
}

impl MessageCatalog for StaticCatalog {
    fn message(&self, id: MessageId, locale: Locale) -> String {
        match locale {
            Locale::En => Self::english(id),
            Locale::Ko => Self::korean(id),
        }
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negotiates_first_supported_language() {
        assert_eq!(Locale::negotiate("ko-KR,ko;q=0.9,en;q=0.8"), Some(Locale::Ko));
        assert_eq!(Locale::negotiate("fr-FR, en-US;q=0.5"), Some(Locale::En));
        assert_eq!(Locale::negotiate("de, fr"), None);
        assert_eq!(Locale::negotiate(""), None);
    }

    #[test]
    fn skips_languages_weighted_zero() {
        assert_eq!(Locale::negotiate("ko;q=0, en"), Some(Locale::En));
        assert_eq!(Locale::negotiate("ko-KR; q=0.0, en;q=0.1"), Some(Locale::En));
        assert_eq!(Locale::negotiate("en;q=0"), None);
        assert_eq!(Locale::negotiate("ko;q=0.5, en"), Some(Locale::Ko));
    }

    #[test]
    fn parses_configured_default() {
        assert_eq!("KO".parse::<Locale>(), Ok(Locale::Ko));
        assert_eq!("en_GB".parse::<Locale>(), Ok(Locale::En));
        assert_eq!(
            "ja".parse::<Locale>(),
            Err(UnknownLocale("ja".to_string()))
        );
    }

    #[test]
    fn every_message_has_text_in_every_locale() {
        let catalog = StaticCatalog;
        for id in MessageId::ALL {
            for locale in [Locale::En, Locale::Ko] {
                assert!(!catalog.message(id, locale).is_empty(), "{id} in {locale}");
            }
        }
        assert_eq!(
            catalog.message(MessageId::TodoDeleted, Locale::En),
            "To-Do item deleted"
        );
    }
}
