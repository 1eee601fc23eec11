//! Runs against a real database only when `DATABASE_URL` is set.

use taskboard::routes::tasks::model::NewTask;
use taskboard::store::{PgStore, Store};
use uuid::Uuid;

async fn connect() -> Option<PgStore> {
    let url = std::env::var("DATABASE_URL").ok()?;
    Some(PgStore::connect(&url).await.expect("connect to DATABASE_URL"))
}

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: String::new(),
        completed: false,
        category: "to-do".to_string(),
    }
}

#[tokio::test]
async fn create_tasks_rolls_back_when_a_row_fails() {
    let Some(store) = connect().await else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };

    let user = store
        .create_user(&format!("rollback-{}", Uuid::new_v4()), "hash")
        .await
        .expect("create user");

    // Postgres rejects NUL bytes in text, failing the second insert.
    let result = store
        .create_tasks(user.id, vec![new_task("fine"), new_task("bad\0title")])
        .await;
    assert!(result.is_err());

    let tasks = store.list_tasks(user.id).await.expect("list tasks");
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn create_tasks_keeps_submission_order() {
    let Some(store) = connect().await else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };

    let user = store
        .create_user(&format!("order-{}", Uuid::new_v4()), "hash")
        .await
        .expect("create user");

    store
        .create_tasks(user.id, vec![new_task("first"), new_task("second"), new_task("third")])
        .await
        .expect("create tasks");

    let titles: Vec<String> = store
        .list_tasks(user.id)
        .await
        .expect("list tasks")
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}
