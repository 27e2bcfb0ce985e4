use std::process;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use post_client::forms::{EditForm, PostListView, QueryForm, ScheduleForm};
use post_client::{Post, PostClient, PostClientError};
use tracing::debug;

mod logging;
mod settings;

use logging::init_logging;
use settings::{Overrides, Settings};

#[derive(Debug, Parser)]
#[command(name = "post-cli", version, about = "CLI клиент планировщика постов")]
struct Cli {
    /// Адрес сервера (по умолчанию POSTS_API_URL или http://localhost:8080).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Часовой пояс, например America/Sao_Paulo (по умолчанию POSTS_TIMEZONE).
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Локаль вывода времени: pt-BR или en-US (по умолчанию POSTS_LOCALE).
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Запланировать пост.
    Schedule {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Местное время публикации, YYYY-MM-DDTHH:MM.
        #[arg(long)]
        at: String,
        /// Эмодзи, которые дописываются в конец текста.
        #[arg(long)]
        emoji: Vec<String>,
    },
    /// Посты, запланированные на диапазон дат.
    Query {
        /// Начальная дата, YYYY-MM-DD.
        #[arg(long)]
        start: String,
        /// Конечная дата, YYYY-MM-DD (обязательна без --single-day).
        #[arg(long)]
        end: Option<String>,
        /// Только один день: конечная дата равна начальной.
        #[arg(long)]
        single_day: bool,
    },
    /// Обновление поста.
    ///
    /// Пост ищется среди запланированных на день `--on`; не указанные поля
    /// берутся из него, статус отправляется без изменений.
    Update {
        #[arg(long)]
        id: String,
        /// День, на который пост сейчас запланирован, YYYY-MM-DD.
        #[arg(long)]
        on: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Новое местное время публикации, YYYY-MM-DDTHH:MM.
        #[arg(long)]
        at: Option<String>,
    },
    /// Удаление поста.
    ///
    /// С `--start` после удаления заново выводится список за диапазон.
    Delete {
        #[arg(long)]
        id: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        single_day: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = Settings::from_env()?.apply(Overrides {
        server: cli.server,
        timezone: cli.timezone,
        locale: cli.locale,
    })?;
    init_logging(&settings.log_level)?;
    debug!(server = %settings.api_url, timezone = %settings.timezone, "settings loaded");

    let client = PostClient::new(settings.client_config()).context("не удалось создать HTTP клиент")?;

    match cli.command {
        Command::Schedule {
            title,
            content,
            at,
            emoji,
        } => {
            let mut form = ScheduleForm {
                title,
                content,
                scheduled_time: at,
            };
            for emoji in &emoji {
                form.append_emoji(emoji);
            }
            let when = form.scheduled_time.clone();
            form.submit(&client).await.map_err(map_client_error)?;
            println!("Пост запланирован на {}", when.replace('T', " "));
        }
        Command::Query {
            start,
            end,
            single_day,
        } => {
            let mut view = PostListView::new(QueryForm::new(
                start,
                end.unwrap_or_default(),
                single_day,
            ));
            view.search(&client).await.map_err(map_client_error)?;
            print_list(&client, view.posts());
        }
        Command::Update {
            id,
            on,
            title,
            content,
            at,
        } => {
            let mut view = PostListView::new(QueryForm::new(on.clone(), "", true));
            view.search(&client).await.map_err(map_client_error)?;
            let post = view
                .posts()
                .iter()
                .find(|post| post.id == id)
                .ok_or_else(|| anyhow!("пост {id} не найден среди запланированных на {on}"))?;

            let mut form = EditForm::from_post(&client, post).map_err(map_client_error)?;
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(content) = content {
                form.content = content;
            }
            if let Some(at) = at {
                form.scheduled_time = at;
            }

            form.submit(&client).await.map_err(map_client_error)?;
            println!("Пост обновлён: id={}", form.id());
        }
        Command::Delete {
            id,
            start,
            end,
            single_day,
        } => match start {
            Some(start) => {
                let mut view = PostListView::new(QueryForm::new(
                    start,
                    end.unwrap_or_default(),
                    single_day,
                ));
                // Неверный диапазон отклоняется до удаления.
                view.form.range().map_err(map_client_error)?;
                let outcome = view.delete(&client, &id).await.map_err(map_client_error)?;
                println!("Пост удалён: id={id}");
                outcome.requery.map_err(|err| {
                    anyhow!("список не обновился: {}", map_client_error(err))
                })?;
                print_list(&client, view.posts());
            }
            None => {
                client.remove(&id).await.map_err(map_client_error)?;
                println!("Пост удалён: id={id}");
            }
        },
    }

    Ok(())
}

fn map_client_error(err: PostClientError) -> anyhow::Error {
    let message = match err {
        PostClientError::Validation(message) => format!("некорректные данные: {message}"),
        PostClientError::Server { status, message } => {
            format!("сервер ответил {status}: {message}")
        }
        PostClientError::Http(err) => format!("ошибка HTTP: {err}"),
        PostClientError::Decode(message) => format!("не удалось разобрать ответ сервера: {message}"),
        PostClientError::InvalidTimestamp(message) => {
            format!("некорректное время публикации: {message}")
        }
    };
    anyhow!(message)
}

fn format_post_line(client: &PostClient, post: &Post) -> String {
    format!(
        "- [{}] {} @ {} ({})",
        post.id,
        post.title,
        client.display_time(post),
        post.status
    )
}

fn print_list(client: &PostClient, posts: &[Post]) {
    if posts.is_empty() {
        println!("Постов за выбранный период нет");
        return;
    }

    println!("Постов: {}", posts.len());
    for post in posts {
        println!("{}", format_post_line(client, post));
    }
}
