use passforge::db::{NewPassword, Page, PasswordStore};

#[tokio::test]
async fn records_survive_reopening_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite:{}", dir.path().join("history.db").display());

    let first = PasswordStore::connect(&url, 1).await.expect("open");
    let a = first.insert(NewPassword::new("alpha")).await.expect("insert");
    let b = first.insert(NewPassword::new("beta")).await.expect("insert");
    assert!(b > a);
    first.pool().close().await;

    let reopened = PasswordStore::connect(&url, 1).await.expect("reopen");
    let rows = reopened.list_all(Page::default()).await.expect("list");
    let values: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
    assert_eq!(values, ["beta", "alpha"]);

    let c = reopened.insert(NewPassword::new("gamma")).await.expect("insert");
    assert!(c > b);
}

#[tokio::test]
async fn inserting_n_lists_exactly_n() {
    let store = PasswordStore::connect("sqlite::memory:", 4)
        .await
        .expect("open");
    for n in 0..25 {
        store
            .insert(NewPassword::new(format!("v{n}")))
            .await
            .expect("insert");
    }
    let rows = store.list_all(Page::default()).await.expect("list");
    assert_eq!(rows.len(), 25);
    assert!(rows.windows(2).all(|w| w[0].id > w[1].id));
    assert!(rows.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn unreachable_database_is_storage_unavailable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!(
        "sqlite:{}",
        dir.path().join("missing-dir").join("x.db").display()
    );
    let err = match PasswordStore::connect(&url, 1).await {
        Ok(_) => panic!("opening under a missing directory should fail"),
        Err(e) => e,
    };
    assert!(matches!(
        err,
        passforge::PassforgeError::StorageUnavailable(_)
    ));
    assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
}
