//! Behaviour every backend must share. Each function runs against a fresh,
//! empty store.

#![allow(dead_code)]

use shortlink_storage::{Alias, ErrorKind, Operation, Storage, Target, UrlEntry};
use std::collections::HashSet;
use std::sync::Arc;

pub fn alias(value: &str) -> Alias {
    Alias::new(value).unwrap()
}

pub fn target(value: &str) -> Target {
    Target::new(value).unwrap()
}

pub async fn save_then_get_round_trips(storage: &dyn Storage) {
    let id = storage
        .save(&target("https://example.com"), &alias("abc123"))
        .await
        .unwrap();

    assert!(id.get() > 0);
    let got = storage.get(&alias("abc123")).await.unwrap();
    assert_eq!(got.as_str(), "https://example.com");
}

pub async fn save_rejects_taken_alias(storage: &dyn Storage) {
    storage
        .save(&target("https://one.example"), &alias("taken"))
        .await
        .unwrap();

    for other in ["https://two.example", "https://one.example"] {
        let err = storage
            .save(&target(other), &alias("taken"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(err.operation(), Operation::Save);
        assert_eq!(err.alias(), Some("taken"));
    }

    // The losing saves must not have touched the original record.
    let got = storage.get(&alias("taken")).await.unwrap();
    assert_eq!(got.as_str(), "https://one.example");
    assert_eq!(storage.list().await.unwrap().len(), 1);
}

pub async fn missing_alias_is_not_found(storage: &dyn Storage) {
    let missing = alias("missing");

    let err = storage.get(&missing).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.operation(), Operation::Get);

    let err = storage.delete(&missing).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.operation(), Operation::Delete);

    let err = storage
        .update(&missing, &target("https://example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.operation(), Operation::Update);

    assert!(storage.list().await.unwrap().is_empty());
}

pub async fn update_leaves_other_records_alone(storage: &dyn Storage) {
    storage
        .save(&target("https://a.example"), &alias("first"))
        .await
        .unwrap();
    storage
        .save(&target("https://b.example"), &alias("second"))
        .await
        .unwrap();

    storage
        .update(&alias("first"), &target("https://new.example"))
        .await
        .unwrap();

    assert_eq!(
        storage.get(&alias("first")).await.unwrap().as_str(),
        "https://new.example"
    );
    assert_eq!(
        storage.get(&alias("second")).await.unwrap().as_str(),
        "https://b.example"
    );
}

pub async fn update_to_same_target_succeeds(storage: &dyn Storage) {
    storage
        .save(&target("https://a.example"), &alias("same"))
        .await
        .unwrap();

    storage
        .update(&alias("same"), &target("https://a.example"))
        .await
        .unwrap();

    assert_eq!(
        storage.get(&alias("same")).await.unwrap().as_str(),
        "https://a.example"
    );
}

pub async fn delete_removes_record(storage: &dyn Storage) {
    storage
        .save(&target("https://example.com"), &alias("to-delete"))
        .await
        .unwrap();

    storage.delete(&alias("to-delete")).await.unwrap();

    assert!(storage
        .get(&alias("to-delete"))
        .await
        .unwrap_err()
        .is_not_found());
    assert!(storage
        .delete(&alias("to-delete"))
        .await
        .unwrap_err()
        .is_not_found());
}

pub async fn deleted_alias_can_be_saved_again(storage: &dyn Storage) {
    let first = storage
        .save(&target("https://old.example"), &alias("reuse"))
        .await
        .unwrap();
    storage.delete(&alias("reuse")).await.unwrap();

    let second = storage
        .save(&target("https://new.example"), &alias("reuse"))
        .await
        .unwrap();

    assert!(second > first, "ids must not be reused");
    assert_eq!(
        storage.get(&alias("reuse")).await.unwrap().as_str(),
        "https://new.example"
    );
}

pub async fn ids_increase(storage: &dyn Storage) {
    let mut previous = None;

    for i in 0..5 {
        let id = storage
            .save(
                &target(&format!("https://example{i}.com")),
                &alias(&format!("code-{i}")),
            )
            .await
            .unwrap();

        if let Some(previous) = previous {
            assert!(id > previous);
        }
        previous = Some(id);
    }
}

pub async fn list_returns_every_record(storage: &dyn Storage) {
    assert!(storage.list().await.unwrap().is_empty());

    storage.save(&target("x"), &alias("A")).await.unwrap();
    storage.save(&target("y"), &alias("B")).await.unwrap();

    let listed: HashSet<UrlEntry> = storage.list().await.unwrap().into_iter().collect();
    let expected: HashSet<UrlEntry> = [
        UrlEntry::new(alias("A"), target("x")),
        UrlEntry::new(alias("B"), target("y")),
    ]
    .into_iter()
    .collect();

    assert_eq!(listed, expected);
}

pub async fn list_follows_creation_order(storage: &dyn Storage) {
    for name in ["zeta", "alpha", "mid"] {
        storage
            .save(&target(&format!("https://{name}.example")), &alias(name))
            .await
            .unwrap();
    }

    let aliases: Vec<String> = storage
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.alias.to_string())
        .collect();

    assert_eq!(aliases, ["zeta", "alpha", "mid"]);
}

pub async fn youtube_scenario(storage: &dyn Storage) {
    let yt = alias("youtube");

    let id = storage
        .save(&target("https://www.youtube.com/"), &yt)
        .await
        .unwrap();
    assert!(id.get() > 0);

    let err = storage
        .save(&target("https://www.youtube.com/"), &yt)
        .await
        .unwrap_err();
    assert!(err.is_already_exists());

    assert_eq!(
        storage.get(&yt).await.unwrap().as_str(),
        "https://www.youtube.com/"
    );

    storage
        .update(&yt, &target("https://youtu.be/"))
        .await
        .unwrap();
    assert_eq!(storage.get(&yt).await.unwrap().as_str(), "https://youtu.be/");

    storage.delete(&yt).await.unwrap();
    assert!(storage.get(&yt).await.unwrap_err().is_not_found());
}

pub async fn concurrent_saves_admit_one_winner(storage: Arc<dyn Storage>) {
    let mut handles = Vec::new();

    for i in 0..8 {
        let storage = Arc::clone(&storage);
        handles.push(tokio::spawn(async move {
            storage
                .save(&target(&format!("https://racer{i}.example")), &alias("race"))
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(err) => assert_eq!(err.kind(), ErrorKind::AlreadyExists),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(storage.list().await.unwrap().len(), 1);
}
