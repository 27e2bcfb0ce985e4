//! Состояние форм: планирование поста, выборка по датам и редактирование.
//!
//! Каждая форма владеет своими полями. Ошибки возвращаются вызывающему коду,
//! а как их показать (строкой, диалогом, в stderr) решает он сам.

use tracing::{debug, warn};

use crate::error::PostClientResult;
use crate::models::Post;
use crate::query::DateRange;
use crate::view::ViewGeneration;
use crate::{PostClient, PostClientError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Форма планирования нового поста.
pub struct ScheduleForm {
    /// Заголовок.
    pub title: String,
    /// Текст поста.
    pub content: String,
    /// Время публикации в формате поля `datetime-local`.
    pub scheduled_time: String,
}

impl ScheduleForm {
    /// Дописывает эмодзи в конец текста.
    pub fn append_emoji(&mut self, emoji: &str) {
        self.content.push_str(emoji);
    }

    /// Сбрасывает все поля.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Отправляет форму. Поля очищаются только при успехе.
    pub async fn submit(&mut self, client: &PostClient) -> PostClientResult<()> {
        client
            .schedule(&self.title, &self.content, &self.scheduled_time)
            .await?;
        self.clear();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Поля фильтра по датам.
pub struct QueryForm {
    /// Начальная дата (`YYYY-MM-DD`).
    pub start_date: String,
    end_date: String,
    single_day: bool,
}

impl QueryForm {
    /// Форма с заполненными датами.
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>, single_day: bool) -> Self {
        let mut form = Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            single_day: false,
        };
        form.set_single_day(single_day);
        form
    }

    /// Включает или выключает режим одного дня.
    ///
    /// При включении конечная дата очищается и становится недоступной.
    pub fn set_single_day(&mut self, single_day: bool) {
        self.single_day = single_day;
        if single_day {
            self.end_date.clear();
        }
    }

    /// Режим одного дня.
    pub fn single_day(&self) -> bool {
        self.single_day
    }

    /// Устанавливает конечную дату. В режиме одного дня игнорируется.
    pub fn set_end_date(&mut self, end_date: impl Into<String>) {
        if self.end_date_enabled() {
            self.end_date = end_date.into();
        }
    }

    /// Конечная дата в том виде, в каком её ввёл пользователь.
    pub fn end_date(&self) -> &str {
        &self.end_date
    }

    /// Доступно ли поле конечной даты.
    pub fn end_date_enabled(&self) -> bool {
        !self.single_day
    }

    /// Проверяет поля и строит диапазон.
    pub fn range(&self) -> PostClientResult<DateRange> {
        DateRange::from_form(&self.start_date, &self.end_date, self.single_day)
    }
}

#[derive(Debug)]
/// Итог [`PostListView::delete`] после того, как сервер подтвердил удаление.
pub struct DeleteOutcome {
    /// Результат повторной выборки, как у [`PostListView::search`].
    ///
    /// Ошибка здесь значит, что пост уже удалён, но список не обновился.
    pub requery: PostClientResult<bool>,
}

#[derive(Debug, Clone, Default)]
/// Экран выборки постов: фильтр, показанный список и поколение экрана.
pub struct PostListView {
    /// Фильтр по датам.
    pub form: QueryForm,
    posts: Vec<Post>,
    generation: ViewGeneration,
}

impl PostListView {
    /// Экран с заданным фильтром и пустым списком.
    pub fn new(form: QueryForm) -> Self {
        Self {
            form,
            posts: Vec::new(),
            generation: ViewGeneration::new(),
        }
    }

    /// Показанные посты.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Счётчик поколений экрана; его клоном можно закрыть экран из другой задачи.
    pub fn generation(&self) -> ViewGeneration {
        self.generation.clone()
    }

    /// Закрывает экран: ответы на уже отправленные запросы будут отброшены.
    pub fn leave(&self) {
        self.generation.invalidate();
    }

    /// Выполняет выборку по текущему фильтру.
    ///
    /// Возвращает `Ok(false)`, если экран закрыли, пока шёл запрос: тогда
    /// список не меняется. При ошибке список тоже остаётся прежним.
    pub async fn search(&mut self, client: &PostClient) -> PostClientResult<bool> {
        let range = self.form.range()?;
        let ticket = self.generation.ticket();

        let posts = client.query(range).await?;
        match ticket.accept(posts) {
            Some(posts) => {
                self.posts = posts;
                Ok(true)
            }
            None => {
                debug!("query view was left, dropping stale response");
                Ok(false)
            }
        }
    }

    /// Удаляет пост и заново выполняет выборку.
    ///
    /// Пост не убирается из списка заранее: при ошибке удаления список
    /// остаётся без изменений, а ошибка возвращается вызывающему коду.
    /// Ошибка повторной выборки после успешного удаления приходит в
    /// [`DeleteOutcome::requery`], а не в `Err`.
    pub async fn delete(&mut self, client: &PostClient, id: &str) -> PostClientResult<DeleteOutcome> {
        if let Err(err) = client.remove(id).await {
            warn!(%id, error = %err, "failed to delete post");
            return Err(err);
        }

        let requery = self.search(client).await;
        if let Err(err) = &requery {
            warn!(%id, error = %err, "post deleted, but the list was not refreshed");
        }
        Ok(DeleteOutcome { requery })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Форма редактирования загруженного поста.
pub struct EditForm {
    id: String,
    status: String,
    /// Заголовок.
    pub title: String,
    /// Текст поста.
    pub content: String,
    /// Время публикации в формате поля `datetime-local`.
    pub scheduled_time: String,
}

impl EditForm {
    /// Заполняет форму из поста, полученного выборкой.
    ///
    /// Пост без распознанного времени редактировать нельзя: вернётся
    /// [`PostClientError::InvalidTimestamp`].
    pub fn from_post(client: &PostClient, post: &Post) -> PostClientResult<Self> {
        let millis = post.scheduled_time.ok_or_else(|| {
            PostClientError::InvalidTimestamp(format!("post {} has no valid scheduled time", post.id))
        })?;

        Ok(Self {
            id: post.id.clone(),
            status: post.status.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            scheduled_time: client.format_for_edit(millis)?,
        })
    }

    /// Идентификатор редактируемого поста.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Статус, который будет отправлен обратно без изменений.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Отправляет изменения.
    pub async fn submit(&self, client: &PostClient) -> PostClientResult<()> {
        client
            .update(
                &self.id,
                &self.title,
                &self.content,
                &self.scheduled_time,
                &self.status,
            )
            .await
    }
}
