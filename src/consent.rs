//! Cookie-consent notice.
//!
//! The site shows a one-time notice explaining which cookies it stores and
//! then records that the notice was shown in a cookie of its own.

use std::borrow::Cow;

use chrono::{DateTime, TimeDelta, Utc};

pub const NOTICE_COOKIE: &str = "cookies_notice";
pub const NOTICE_DAYS: i64 = 365;
pub const NOTICE_TEXT: &str = "Diese Webseite verwendet Cookies für Ihre Sprachauswahl, Login Daten und Cookie-Einstellungen.\nMit der Benutzung der Website erklären Sie sich einverstanden mit der Speicherung der Cookies in Ihrem Browser.";

/// Value of cookie `name` in a `Cookie` header, or `""` if absent.
///
/// The whole header is percent-decoded first, then split on `;`.
pub fn get_cookie(header: &str, name: &str) -> String {
    let decoded = urlencoding::decode_binary(header.as_bytes());
    let decoded = String::from_utf8_lossy(&decoded);
    let wanted = format!("{name}=");
    decoded
        .split(';')
        .map(|entry| entry.trim_start_matches(' '))
        .find_map(|entry| entry.strip_prefix(wanted.as_str()))
        .map(ToOwned::to_owned)
        .unwrap_or_default()
}

/// A `Set-Cookie` value expiring `days` after `now`.
///
/// An expiry outside the representable date range clamps to its limit.
pub fn set_cookie(name: &str, value: &str, days: i64, now: DateTime<Utc>) -> String {
    let expires = TimeDelta::try_days(days)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(if days < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });
    format!(
        "{name}={value};expires={};path=/;SameSite=Strict",
        expires.format("%a, %d %b %Y %H:%M:%S GMT")
    )
}

/// What to show and store when the notice is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub set_cookie: String,
}

/// Settings for the consent notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentNotice {
    cookie: String,
    days: i64,
    message: Cow<'static, str>,
}

impl ConsentNotice {
    pub fn new() -> Self {
        Self {
            cookie: NOTICE_COOKIE.to_string(),
            days: NOTICE_DAYS,
            message: Cow::Borrowed(NOTICE_TEXT),
        }
    }

    pub fn with_cookie(mut self, name: impl Into<String>) -> Self {
        self.cookie = name.into();
        self
    }

    pub const fn with_days(mut self, days: i64) -> Self {
        self.days = days;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Cow::Owned(message.into());
        self
    }

    /// The notice to show, or `None` if the visitor has already seen it.
    pub fn check(&self, cookie_header: &str, now: DateTime<Utc>) -> Option<Notice> {
        if !get_cookie(cookie_header, &self.cookie).is_empty() {
            return None;
        }
        tracing::debug!(cookie = %self.cookie, "consent notice due");
        Some(Notice {
            message: self.message.to_string(),
            set_cookie: set_cookie(&self.cookie, "1", self.days, now),
        })
    }
}

impl Default for ConsentNotice {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_get_cookie_finds_value() {
        let header = "lang=de; cookies_notice=1; auth-cookie=abc";
        assert_eq!(get_cookie(header, "cookies_notice"), "1");
        assert_eq!(get_cookie(header, "lang"), "de");
    }

    #[test]
    fn test_get_cookie_missing_is_empty() {
        assert_eq!(get_cookie("lang=de", "cookies_notice"), "");
        assert_eq!(get_cookie("", "lang"), "");
    }

    #[test]
    fn test_get_cookie_requires_exact_name_prefix() {
        assert_eq!(get_cookie("xlang=fr; lang=de", "lang"), "de");
    }

    #[test]
    fn test_get_cookie_decodes_header() {
        assert_eq!(get_cookie("name=J%C3%B6rg%20K", "name"), "Jörg K");
    }

    #[test]
    fn test_set_cookie_format() {
        let cookie = set_cookie("cookies_notice", "1", 365, epoch());
        assert_eq!(
            cookie,
            "cookies_notice=1;expires=Fri, 01 Jan 1971 00:00:00 GMT;path=/;SameSite=Strict"
        );
    }

    #[test]
    fn test_set_cookie_huge_lifetime_clamps() {
        let cookie = set_cookie("c", "1", 200_000_000_000_000, epoch());
        assert!(cookie.starts_with("c=1;expires="));
        assert!(cookie.ends_with(";path=/;SameSite=Strict"));
        assert_eq!(cookie, set_cookie("c", "1", i64::MAX, epoch()));
        assert_ne!(cookie, set_cookie("c", "1", i64::MIN, epoch()));
    }

    #[test]
    fn test_notice_with_unbounded_days_does_not_panic() {
        let notice = ConsentNotice::new().with_days(i64::MAX).check("", epoch());
        assert!(notice.is_some());
    }

    #[test]
    fn test_notice_only_when_cookie_absent() {
        let consent = ConsentNotice::new();
        let notice = consent.check("lang=de", epoch()).unwrap();
        assert_eq!(notice.message, NOTICE_TEXT);
        assert!(notice.set_cookie.starts_with("cookies_notice=1;"));
        assert!(consent.check("cookies_notice=1", epoch()).is_none());
    }

    #[test]
    fn test_notice_settings() {
        let consent = ConsentNotice::new()
            .with_cookie("seen")
            .with_days(1)
            .with_message("We use cookies.");
        let notice = consent.check("", epoch()).unwrap();
        assert_eq!(notice.message, "We use cookies.");
        assert_eq!(
            notice.set_cookie,
            "seen=1;expires=Fri, 02 Jan 1970 00:00:00 GMT;path=/;SameSite=Strict"
        );
    }
}
