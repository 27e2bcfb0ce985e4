//! Клиентская библиотека для сервиса отложенной публикации постов.
//!
//! [`PostClient`] инкапсулирует всё взаимодействие с REST API
//! (`/schedule`, `/posts`, `/posts/{id}`) и приведение времени публикации
//! между форматом сервера, полем редактирования и строкой для показа.
//!
//! На сервер время всегда уходит одной строкой `YYYY-MM-DD HH:MM`
//! (местное время, см. [`datetime::WIRE_FORMAT`]); читаются все формы,
//! которые сервер когда-либо отдавал, см. [`wire::WireTimestamp`].
//!
//! Модуль [`forms`] содержит состояние форм: планирование, выборка по датам
//! с удалением и редактирование.
#![warn(missing_docs)]

pub mod datetime;
mod error;
pub mod forms;
mod http_client;
mod models;
mod query;
pub mod view;
pub mod wire;

use std::time::Duration;

use tracing::{debug, info};
use validator::Validate;

pub use datetime::{DisplayLocale, INVALID_DATE, TimeSettings};
pub use error::{PostClientError, PostClientResult};
pub use models::{DEFAULT_STATUS, Post};
pub use query::DateRange;

use http_client::{HttpClient, PostRequestDto};
use models::PostDraft;
use wire::WireTimestamp;

/// Базовый URL сервера по умолчанию.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
/// Настройки [`PostClient`].
pub struct ClientConfig {
    /// Базовый URL сервера, например `http://localhost:8080`.
    pub base_url: String,
    /// Часовой пояс и локаль пользователя.
    pub time: TimeSettings,
    /// Таймаут установки соединения.
    pub connect_timeout: Duration,
    /// Таймаут всего запроса.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            time: TimeSettings::default(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl ClientConfig {
    /// Настройки по умолчанию с другим базовым URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
/// Клиент REST API запланированных постов.
pub struct PostClient {
    http: HttpClient,
    time: TimeSettings,
}

impl PostClient {
    /// Создаёт клиент по настройкам.
    pub fn new(config: ClientConfig) -> PostClientResult<Self> {
        let http = HttpClient::new(
            config.base_url,
            config.connect_timeout,
            config.request_timeout,
        )?;
        Ok(Self {
            http,
            time: config.time,
        })
    }

    /// Настройки времени, с которыми работает клиент.
    pub fn time_settings(&self) -> &TimeSettings {
        &self.time
    }

    /// Планирует новый пост со статусом [`DEFAULT_STATUS`].
    ///
    /// `local_date_time` — значение поля `datetime-local` (`YYYY-MM-DDTHH:MM`).
    /// Пустые поля и некорректное время отклоняются до обращения к серверу.
    pub async fn schedule(
        &self,
        title: &str,
        content: &str,
        local_date_time: &str,
    ) -> PostClientResult<()> {
        let scheduled_time = Self::prepare(title, content, local_date_time)?;
        let payload = PostRequestDto {
            title,
            content,
            scheduled_time: &scheduled_time,
            status: DEFAULT_STATUS,
        };

        self.http.create_post(&payload).await?;
        info!(%scheduled_time, "post scheduled");
        Ok(())
    }

    /// Возвращает посты, запланированные на диапазон дат.
    ///
    /// При `single_day` конечная дата берётся равной начальной. Недостающие
    /// даты дают [`PostClientError::Validation`] без обращения к серверу.
    pub async fn query_range(
        &self,
        start_date: &str,
        end_date: &str,
        single_day: bool,
    ) -> PostClientResult<Vec<Post>> {
        let range = DateRange::from_form(start_date, end_date, single_day)?;
        self.query(range).await
    }

    /// Возвращает посты для уже проверенного диапазона.
    pub async fn query(&self, range: DateRange) -> PostClientResult<Vec<Post>> {
        let dtos = self.http.list_posts(&range.to_query()).await?;
        debug!(count = dtos.len(), "posts received");
        Ok(dtos
            .into_iter()
            .map(|dto| Post::from_dto(dto, &self.time))
            .collect())
    }

    /// Строка для показа момента времени пользователю.
    pub fn format_for_display(&self, epoch_millis: i64) -> String {
        self.time.format_for_display(epoch_millis)
    }

    /// Время поста для показа; [`INVALID_DATE`], если его не удалось разобрать.
    pub fn display_time(&self, post: &Post) -> String {
        self.time.format_optional(post.scheduled_time)
    }

    /// Значение для поля редактирования (`YYYY-MM-DDTHH:MM`).
    ///
    /// Принимает миллисекунды или строку в любой форме, которую понимает
    /// [`WireTimestamp`].
    pub fn format_for_edit(&self, value: impl Into<WireTimestamp>) -> PostClientResult<String> {
        let value = value.into();
        let millis = value.to_millis(&self.time).ok_or_else(|| {
            PostClientError::InvalidTimestamp(format!("unrecognized timestamp: {value:?}"))
        })?;
        self.time.format_for_edit(millis)
    }

    /// Обновляет пост. `status` отправляется без изменений.
    pub async fn update(
        &self,
        id: &str,
        title: &str,
        content: &str,
        local_date_time: &str,
        status: &str,
    ) -> PostClientResult<()> {
        if id.trim().is_empty() {
            return Err(PostClientError::Validation("post id is required".to_string()));
        }
        let scheduled_time = Self::prepare(title, content, local_date_time)?;
        let payload = PostRequestDto {
            title,
            content,
            scheduled_time: &scheduled_time,
            status,
        };

        self.http.update_post(id, &payload).await?;
        info!(%id, %scheduled_time, "post updated");
        Ok(())
    }

    /// Удаляет пост.
    pub async fn remove(&self, id: &str) -> PostClientResult<()> {
        if id.trim().is_empty() {
            return Err(PostClientError::Validation("post id is required".to_string()));
        }
        self.http.delete_post(id).await?;
        info!(%id, "post deleted");
        Ok(())
    }

    fn prepare(title: &str, content: &str, local_date_time: &str) -> PostClientResult<String> {
        PostDraft::new(title, content).validate()?;
        datetime::edit_input_to_wire(local_date_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PostClient {
        PostClient::new(ClientConfig::default()).expect("client builds")
    }

    #[tokio::test]
    async fn schedule_rejects_empty_fields_locally() {
        let err = client()
            .schedule("", "content", "2024-01-01T10:00")
            .await
            .expect_err("empty title");
        assert!(err.is_validation());
        assert!(err.to_string().contains("title"));
    }

    #[tokio::test]
    async fn update_rejects_missing_time_locally() {
        let err = client()
            .update("abc", "t", "c", "", "pending")
            .await
            .expect_err("empty time");
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn remove_rejects_blank_id() {
        let err = client().remove(" ").await.expect_err("blank id");
        assert!(err.is_validation());
    }

    #[test]
    fn format_for_edit_accepts_millis_and_iso() {
        let client = client();
        assert_eq!(
            client.format_for_edit(1_700_000_000_000_i64).expect("millis"),
            "2023-11-14T19:13"
        );
        assert_eq!(
            client.format_for_edit("2023-11-14T22:13:20Z").expect("iso"),
            "2023-11-14T19:13"
        );
    }

    #[test]
    fn format_for_edit_rejects_garbage() {
        let err = client().format_for_edit("soon").expect_err("garbage");
        assert!(matches!(err, PostClientError::InvalidTimestamp(_)));
    }

    #[test]
    fn display_time_of_broken_post() {
        let post = Post {
            id: "1".to_string(),
            title: "t".to_string(),
            content: String::new(),
            scheduled_time: None,
            status: DEFAULT_STATUS.to_string(),
        };
        assert_eq!(client().display_time(&post), INVALID_DATE);
    }
}
