use reqwest::{Client, Method, Url};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{PostClientError, PostClientResult};
use crate::models::PostDto;
use crate::query::DateRangeQuery;

#[derive(Debug, Serialize)]
pub(crate) struct PostRequestDto<'a> {
    pub(crate) title: &'a str,
    pub(crate) content: &'a str,
    pub(crate) scheduled_time: &'a str,
    pub(crate) status: &'a str,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API планировщика постов.
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера и таймаутами.
    pub(crate) fn new(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> PostClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn url(&self, path: &str) -> PostClientResult<Url> {
        Url::parse(&self.endpoint(path)).map_err(|err| {
            PostClientError::Validation(format!("invalid server url {:?}: {err}", self.base_url))
        })
    }

    /// `/posts/{id}` с экранированием идентификатора как сегмента пути.
    fn post_url(&self, id: &str) -> PostClientResult<Url> {
        let mut url = self.url("/posts")?;
        url.path_segments_mut()
            .map_err(|_| {
                PostClientError::Validation(format!("invalid server url {:?}", self.base_url))
            })?
            .push(id);
        Ok(url)
    }

    async fn decode_error(response: reqwest::Response) -> PostClientError {
        let status = response.status();
        let message = response.text().await.ok();
        warn!(%status, body = ?message, "posts api returned an error");
        PostClientError::from_http_status(status, message)
    }

    /// Отправляет запрос и проверяет статус. Тело успешного ответа не читается.
    async fn send(&self, request: reqwest::RequestBuilder) -> PostClientResult<reqwest::Response> {
        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "posts api request failed");
            PostClientError::from_reqwest(err)
        })?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    /// универсальный helper для запросов с json-payload и непрочитанным ответом
    async fn send_json<TReq>(&self, method: Method, url: Url, body: &TReq) -> PostClientResult<()>
    where
        TReq: Serialize,
    {
        debug!(%method, %url, "sending posts api request");
        self.send(self.client.request(method, url).json(body)).await?;
        Ok(())
    }

    /// Создаёт запланированный пост.
    pub(crate) async fn create_post(&self, payload: &PostRequestDto<'_>) -> PostClientResult<()> {
        let url = self.url("/schedule")?;
        self.send_json(Method::POST, url, payload).await
    }

    /// Возвращает посты, запланированные на диапазон дат.
    pub(crate) async fn list_posts(&self, query: &DateRangeQuery) -> PostClientResult<Vec<PostDto>> {
        let url = self.url("/posts")?;
        debug!(%url, start_date = %query.start_date, end_date = %query.end_date, "querying posts");

        let response = self
            .send(self.client.request(Method::GET, url).query(query))
            .await?;

        let body = response.text().await.map_err(PostClientError::from_reqwest)?;
        serde_json::from_str::<Vec<PostDto>>(&body).map_err(|err| {
            warn!(error = %err, "posts api returned an unexpected body");
            PostClientError::Decode(err.to_string())
        })
    }

    /// Обновляет пост по идентификатору.
    pub(crate) async fn update_post(
        &self,
        id: &str,
        payload: &PostRequestDto<'_>,
    ) -> PostClientResult<()> {
        let url = self.post_url(id)?;
        self.send_json(Method::PUT, url, payload).await
    }

    /// Удаляет пост по идентификатору.
    pub(crate) async fn delete_post(&self, id: &str) -> PostClientResult<()> {
        let url = self.post_url(id)?;
        debug!(%url, "deleting post");
        self.send(self.client.request(Method::DELETE, url)).await?;
        Ok(())
    }
}
