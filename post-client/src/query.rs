use chrono::NaiveDate;
use serde::Serialize;

use crate::datetime::{format_query_date, parse_query_date};
use crate::error::{PostClientError, PostClientResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Проверенный диапазон дат для выборки постов.
///
/// Включительность границ определяет сервер, клиент результат не фильтрует.
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Debug, Serialize)]
pub(crate) struct DateRangeQuery {
    pub(crate) start_date: String,
    pub(crate) end_date: String,
}

impl DateRange {
    /// Строит диапазон из значений полей формы.
    ///
    /// При `single_day` конечная дата игнорируется и берётся равной начальной.
    /// Пустые и некорректные даты, а также конец раньше начала дают
    /// [`PostClientError::Validation`].
    pub fn from_form(start_date: &str, end_date: &str, single_day: bool) -> PostClientResult<Self> {
        let start = parse_query_date("start_date", start_date)?
            .ok_or_else(|| PostClientError::Validation("start date is required".to_string()))?;

        if single_day {
            return Ok(Self { start, end: start });
        }

        let end = parse_query_date("end_date", end_date)?
            .ok_or_else(|| PostClientError::Validation("end date is required".to_string()))?;
        Self::new(start, end)
    }

    /// Диапазон из двух дат.
    pub fn new(start: NaiveDate, end: NaiveDate) -> PostClientResult<Self> {
        if end < start {
            return Err(PostClientError::Validation(format!(
                "end date {end} is before start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Диапазон из одного дня.
    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Начальная дата.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Конечная дата.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub(crate) fn to_query(self) -> DateRangeQuery {
        DateRangeQuery {
            start_date: format_query_date(self.start),
            end_date: format_query_date(self.end),
        }
    }
}
