//! Преобразования времени публикации между сервером, формой и экраном.
//!
//! Все функции чистые: результат зависит только от входа и [`TimeSettings`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{PostClientError, PostClientResult};

/// Строка, которая показывается вместо времени, если его не удалось разобрать.
pub const INVALID_DATE: &str = "Invalid Date";

/// Формат, в котором время уходит на сервер: локальное время без зоны.
pub const WIRE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Формат значения поля редактирования (`datetime-local`).
pub const EDIT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const EDIT_FORMAT_WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";
const WIRE_FORMAT_WITH_SECONDS: &str = "%Y-%m-%d %H:%M:%S";
const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Локаль для отображения времени пользователю.
pub enum DisplayLocale {
    /// `14/11/2023 19:13`
    #[default]
    PtBr,
    /// `11/14/2023 @ 07:13 PM`
    EnUs,
}

impl DisplayLocale {
    fn pattern(self) -> &'static str {
        match self {
            Self::PtBr => "%d/%m/%Y %H:%M",
            Self::EnUs => "%m/%d/%Y @ %I:%M %p",
        }
    }
}

impl FromStr for DisplayLocale {
    type Err = PostClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Self::PtBr),
            "en-us" | "en" => Ok(Self::EnUs),
            other => Err(PostClientError::Validation(format!(
                "unsupported locale: {other}"
            ))),
        }
    }
}

impl fmt::Display for DisplayLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PtBr => f.write_str("pt-BR"),
            Self::EnUs => f.write_str("en-US"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Часовой пояс и локаль, в которых клиент показывает и редактирует время.
pub struct TimeSettings {
    /// Часовой пояс "стенных часов" пользователя.
    pub timezone: Tz,
    /// Локаль отображения.
    pub locale: DisplayLocale,
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            timezone: Tz::America__Sao_Paulo,
            locale: DisplayLocale::PtBr,
        }
    }
}

impl TimeSettings {
    /// Создаёт настройки с заданными часовым поясом и локалью.
    pub fn new(timezone: Tz, locale: DisplayLocale) -> Self {
        Self { timezone, locale }
    }

    /// Человекочитаемая строка для момента времени в миллисекундах.
    ///
    /// Для миллисекунд вне диапазона `chrono` возвращает [`INVALID_DATE`].
    pub fn format_for_display(&self, epoch_millis: i64) -> String {
        match DateTime::<Utc>::from_timestamp_millis(epoch_millis) {
            Some(utc) => utc
                .with_timezone(&self.timezone)
                .format(self.locale.pattern())
                .to_string(),
            None => INVALID_DATE.to_string(),
        }
    }

    /// Как [`Self::format_for_display`], но принимает отсутствие момента.
    pub fn format_optional(&self, epoch_millis: Option<i64>) -> String {
        epoch_millis
            .map(|millis| self.format_for_display(millis))
            .unwrap_or_else(|| INVALID_DATE.to_string())
    }

    /// Значение для поля редактирования: `YYYY-MM-DDTHH:MM` по местному времени.
    pub fn format_for_edit(&self, epoch_millis: i64) -> PostClientResult<String> {
        let utc = DateTime::<Utc>::from_timestamp_millis(epoch_millis).ok_or_else(|| {
            PostClientError::InvalidTimestamp(format!("{epoch_millis} is out of range"))
        })?;
        Ok(utc
            .with_timezone(&self.timezone)
            .format(EDIT_FORMAT)
            .to_string())
    }

    /// Местное время без зоны в миллисекунды по настроенному поясу.
    ///
    /// При переводе часов назад берётся более раннее из двух значений,
    /// несуществующее время (переход вперёд) даёт `None`.
    pub fn local_to_millis(&self, local: &NaiveDateTime) -> Option<i64> {
        self.timezone
            .from_local_datetime(local)
            .earliest()
            .map(|dt| dt.timestamp_millis())
    }
}

/// Разбирает значение поля редактирования (`YYYY-MM-DDTHH:MM[:SS]`).
pub fn parse_edit_input(value: &str) -> PostClientResult<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PostClientError::Validation(
            "scheduled time is required".to_string(),
        ));
    }

    NaiveDateTime::parse_from_str(value, EDIT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, EDIT_FORMAT_WITH_SECONDS))
        .map_err(|_| {
            PostClientError::Validation(format!(
                "scheduled time must look like YYYY-MM-DDTHH:MM, got {value:?}"
            ))
        })
}

/// Переводит значение поля редактирования в формат, который уходит на сервер.
///
/// Секунды отбрасываются: сервер хранит время с точностью до минуты.
pub fn edit_input_to_wire(value: &str) -> PostClientResult<String> {
    let local = parse_edit_input(value)?;
    Ok(local.format(WIRE_FORMAT).to_string())
}

/// Разбирает строку формата [`WIRE_FORMAT`] (секунды допускаются).
pub fn parse_wire_local(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, WIRE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, WIRE_FORMAT_WITH_SECONDS))
        .ok()
}

/// Разбирает дату фильтра (`YYYY-MM-DD`). Пустая строка — `Ok(None)`.
pub fn parse_query_date(field: &str, value: &str) -> PostClientResult<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, QUERY_DATE_FORMAT)
        .map(Some)
        .map_err(|_| {
            PostClientError::Validation(format!("{field} must look like YYYY-MM-DD, got {value:?}"))
        })
}

pub(crate) fn format_query_date(date: NaiveDate) -> String {
    date.format(QUERY_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_MILLIS: i64 = 1_700_000_000_000;

    #[test]
    fn display_uses_sao_paulo_by_default() {
        let settings = TimeSettings::default();
        assert_eq!(settings.format_for_display(SAMPLE_MILLIS), "14/11/2023 19:13");
    }

    #[test]
    fn display_in_en_us() {
        let settings = TimeSettings::new(Tz::America__Sao_Paulo, DisplayLocale::EnUs);
        assert_eq!(
            settings.format_for_display(SAMPLE_MILLIS),
            "11/14/2023 @ 07:13 PM"
        );
    }

    #[test]
    fn display_is_deterministic() {
        let settings = TimeSettings::default();
        let first = settings.format_for_display(SAMPLE_MILLIS);
        let second = settings.format_for_display(SAMPLE_MILLIS);
        assert_eq!(first, second);
    }

    #[test]
    fn display_of_missing_time_is_invalid_date() {
        let settings = TimeSettings::default();
        assert_eq!(settings.format_optional(None), INVALID_DATE);
        assert_eq!(settings.format_for_display(i64::MAX), INVALID_DATE);
    }

    #[test]
    fn edit_value_is_zero_padded_local_time() {
        let settings = TimeSettings::default();
        // 2024-03-05T04:07:00Z -> 01:07 в Сан-Паулу
        let millis = 1_709_611_620_000;
        assert_eq!(settings.format_for_edit(millis).expect("in range"), "2024-03-05T01:07");
    }

    #[test]
    fn edit_value_round_trips_through_wire_format() {
        let settings = TimeSettings::default();
        let minute_precise = SAMPLE_MILLIS - SAMPLE_MILLIS % 60_000;

        let edit = settings.format_for_edit(minute_precise).expect("in range");
        let wire = edit_input_to_wire(&edit).expect("valid edit value");
        assert_eq!(wire, "2023-11-14 19:13");

        let local = parse_wire_local(&wire).expect("wire value parses back");
        assert_eq!(settings.local_to_millis(&local), Some(minute_precise));
    }

    #[test]
    fn edit_input_accepts_seconds_and_drops_them() {
        assert_eq!(
            edit_input_to_wire("2024-01-01T10:00:42").expect("valid"),
            "2024-01-01 10:00"
        );
    }

    #[test]
    fn edit_input_rejects_empty_and_garbage() {
        assert!(parse_edit_input("  ").expect_err("empty").is_validation());
        assert!(parse_edit_input("01/01/2024 10:00").expect_err("garbage").is_validation());
    }

    #[test]
    fn query_date_parsing() {
        assert_eq!(parse_query_date("start_date", "").expect("empty is ok"), None);
        let date = parse_query_date("start_date", "2024-01-31")
            .expect("valid")
            .expect("present");
        assert_eq!(format_query_date(date), "2024-01-31");
        assert!(parse_query_date("end_date", "2024-13-01").is_err());
    }

    #[test]
    fn locale_parsing() {
        assert_eq!("pt-BR".parse::<DisplayLocale>().expect("pt"), DisplayLocale::PtBr);
        assert_eq!("en_US".parse::<DisplayLocale>().expect("en"), DisplayLocale::EnUs);
        assert!("fr-FR".parse::<DisplayLocale>().is_err());
        assert_eq!(DisplayLocale::EnUs.to_string(), "en-US");
    }
}
