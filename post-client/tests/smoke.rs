use std::time::{SystemTime, UNIX_EPOCH};

use post_client::forms::{EditForm, PostListView, QueryForm};
use post_client::{ClientConfig, PostClient};

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock must be after unix epoch")
        .as_nanos();
    format!("{nanos}")
}

#[tokio::test]
#[ignore = "requires running posts backend and database"]
async fn http_smoke_flow() {
    let base_url =
        std::env::var("POSTS_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    let client = PostClient::new(ClientConfig::with_base_url(base_url)).expect("client builds");

    let title = format!("smoke {}", unique_suffix());
    client
        .schedule(&title, "smoke content", "2031-05-17T09:30")
        .await
        .expect("schedule must succeed");

    let mut view = PostListView::new(QueryForm::new("2031-05-17", "", true));
    view.search(&client).await.expect("query must succeed");
    let created = view
        .posts()
        .iter()
        .find(|post| post.title == title)
        .cloned()
        .expect("scheduled post must be listed");
    assert_eq!(client.display_time(&created), "17/05/2031 09:30");
    assert_eq!(created.status, "pending");

    let mut form = EditForm::from_post(&client, &created).expect("post is editable");
    assert_eq!(form.scheduled_time, "2031-05-17T09:30");
    form.title = format!("{title} updated");
    form.submit(&client).await.expect("update must succeed");

    view.delete(&client, &created.id)
        .await
        .expect("delete must succeed");
    assert!(view.posts().iter().all(|post| post.id != created.id));
}
