//! Формы, в которых сервер присылает идентификатор и время поста.
//!
//! Бэкенд в разных версиях отдавал `_id` и `scheduled_time` по-разному
//! (строка, число, extended JSON). Здесь они читаются все, а отправляется
//! только один формат, см. [`crate::datetime::WIRE_FORMAT`].

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use crate::datetime::{TimeSettings, parse_wire_local};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
/// Идентификатор поста: строка или `{ "$oid": "..." }`.
pub enum WireId {
    /// Обычная строка.
    Plain(String),
    /// Extended JSON ObjectId.
    ObjectId {
        /// Шестнадцатеричное значение ObjectId.
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl WireId {
    /// Идентификатор в виде обычной строки.
    pub fn into_plain(self) -> String {
        match self {
            Self::Plain(id) | Self::ObjectId { oid: id } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
/// Значение `scheduled_time` в любой из известных форм.
///
/// Последний вариант принимает всё остальное, поэтому десериализация
/// никогда не падает: один битый пост не мешает показать остальные.
pub enum WireTimestamp {
    /// Миллисекунды числом.
    Millis(i64),
    /// Миллисекунды числом с дробной частью.
    FloatMillis(f64),
    /// Строка: миллисекунды, ISO-8601 или `YYYY-MM-DD HH:MM[:SS]`.
    Text(String),
    /// `{ "$date": ... }`.
    Extended {
        /// Содержимое обёртки.
        #[serde(rename = "$date")]
        date: ExtendedDate,
    },
    /// Нераспознанная форма.
    Unrecognized(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
/// Содержимое обёртки `$date`.
pub enum ExtendedDate {
    /// `{ "$numberLong": "<millis>" }`.
    NumberLong {
        /// Миллисекунды строкой.
        #[serde(rename = "$numberLong")]
        number_long: String,
    },
    /// Миллисекунды числом.
    Millis(i64),
    /// Миллисекунды числом с дробной частью.
    FloatMillis(f64),
    /// Строка с миллисекундами или ISO-8601 (relaxed extended JSON).
    Text(String),
}

impl WireTimestamp {
    /// Приводит значение к миллисекундам Unix-времени.
    ///
    /// Строки без указания зоны читаются в поясе из `settings`.
    /// `None` означает, что значение не удалось распознать.
    pub fn to_millis(&self, settings: &TimeSettings) -> Option<i64> {
        match self {
            Self::Millis(millis) => Some(*millis),
            Self::FloatMillis(millis) => float_millis(*millis),
            Self::Text(text) => text_to_millis(text, settings),
            Self::Extended { date } => match date {
                ExtendedDate::NumberLong { number_long } => number_long.trim().parse().ok(),
                ExtendedDate::Millis(millis) => Some(*millis),
                ExtendedDate::FloatMillis(millis) => float_millis(*millis),
                ExtendedDate::Text(text) => text_to_millis(text, settings),
            },
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<i64> for WireTimestamp {
    fn from(millis: i64) -> Self {
        Self::Millis(millis)
    }
}

impl From<&str> for WireTimestamp {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for WireTimestamp {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

fn float_millis(millis: f64) -> Option<i64> {
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    Some(millis.trunc() as i64)
}

fn text_to_millis(text: &str, settings: &TimeSettings) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(millis) = text.parse::<i64>() {
        return Some(millis);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }

    // ISO без зоны и собственный формат клиента читаются как местное время.
    let naive = chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| parse_wire_local(text));
    if let Some(naive) = naive {
        return settings.local_to_millis(&naive);
    }

    // Дата без времени — полночь UTC.
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}
