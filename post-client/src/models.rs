use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::datetime::TimeSettings;
use crate::wire::{WireId, WireTimestamp};

/// Статус, с которым создаётся новый пост.
pub const DEFAULT_STATUS: &str = "pending";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Публичная модель поста после нормализации ответа сервера.
pub struct Post {
    /// Идентификатор поста (всегда обычная строка).
    pub id: String,
    /// Заголовок поста.
    pub title: String,
    /// Содержимое поста.
    pub content: String,
    /// Время публикации в миллисекундах Unix-времени.
    ///
    /// `None`, если сервер прислал значение, которое не удалось разобрать.
    pub scheduled_time: Option<i64>,
    /// Статус в том виде, в каком его прислал сервер.
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PostDto {
    #[serde(rename = "_id")]
    pub(crate) id: WireId,
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) content: String,
    #[serde(default)]
    pub(crate) scheduled_time: Option<WireTimestamp>,
    #[serde(default)]
    pub(crate) status: String,
}

impl Post {
    pub(crate) fn from_dto(dto: PostDto, settings: &TimeSettings) -> Self {
        Self {
            id: dto.id.into_plain(),
            title: dto.title,
            content: dto.content,
            scheduled_time: dto
                .scheduled_time
                .and_then(|ts| ts.to_millis(settings)),
            status: dto.status,
        }
    }
}

#[derive(Debug, Clone, Validate)]
/// Поля формы поста, которые проверяются до отправки на сервер.
pub(crate) struct PostDraft {
    #[validate(length(min = 1))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) content: String,
}

impl PostDraft {
    pub(crate) fn new(title: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
        }
    }
}
