use people_crud::{
    InMemoryRepository,
    error::RepositoryError,
    models::Person,
    repository::Repository,
};
use uuid::Uuid;

fn person(name: &str) -> Person {
    Person {
        id: Uuid::new_v4(),
        name: name.to_string(),
        ..Person::default()
    }
}

#[tokio::test]
async fn test_insert_then_find() {
    let repo = InMemoryRepository::new();
    let ann = person("Ann");

    let inserted = repo.insert_person(ann.clone()).await.unwrap();

    assert_eq!(inserted, ann);
    assert_eq!(repo.find_person(ann.id).await.unwrap(), Some(ann.clone()));
    assert!(repo.person_exists(ann.id).await.unwrap());
}

#[tokio::test]
async fn test_insert_duplicate_id() {
    let repo = InMemoryRepository::new();
    let ann = person("Ann");
    repo.insert_person(ann.clone()).await.unwrap();

    let result = repo.insert_person(ann.clone()).await;

    assert!(matches!(result, Err(RepositoryError::Duplicate(id)) if id == ann.id));
}

#[tokio::test]
async fn test_list_keeps_insertion_order() {
    let repo = InMemoryRepository::new();
    let people = vec![person("Cy"), person("Ann"), person("Bo")];
    for p in &people {
        repo.insert_person(p.clone()).await.unwrap();
    }

    assert_eq!(repo.list_people().await.unwrap(), people);
}

#[tokio::test]
async fn test_update_replaces_whole_record() {
    let ann = Person {
        email: Some("ann@example.com".to_string()),
        ..person("Ann")
    };
    let repo = InMemoryRepository::with_people(vec![ann.clone()]);

    let replacement = Person {
        id: ann.id,
        name: "Annie".to_string(),
        ..Person::default()
    };
    repo.update_person(&replacement).await.unwrap();

    let stored = repo.find_person(ann.id).await.unwrap().unwrap();
    assert_eq!(stored, replacement);
    assert_eq!(stored.email, None);
}

#[tokio::test]
async fn test_update_missing_is_concurrency_failure() {
    let repo = InMemoryRepository::new();
    let ghost = person("Ghost");

    let result = repo.update_person(&ghost).await;

    assert!(matches!(result, Err(RepositoryError::Concurrency(id)) if id == ghost.id));
}

#[tokio::test]
async fn test_delete_reports_whether_removed() {
    let ann = person("Ann");
    let repo = InMemoryRepository::with_people(vec![ann.clone()]);

    assert!(repo.delete_person(ann.id).await.unwrap());
    assert!(!repo.delete_person(ann.id).await.unwrap());
    assert!(!repo.person_exists(ann.id).await.unwrap());
}

#[tokio::test]
async fn test_unavailable_store_fails_everything() {
    let repo = InMemoryRepository::unavailable();
    let ann = person("Ann");

    assert!(repo.list_people().await.unwrap_err().is_unavailable());
    assert!(repo.find_person(ann.id).await.unwrap_err().is_unavailable());
    assert!(repo.person_exists(ann.id).await.unwrap_err().is_unavailable());
    assert!(repo.insert_person(ann.clone()).await.unwrap_err().is_unavailable());
    assert!(repo.update_person(&ann).await.unwrap_err().is_unavailable());
    assert!(repo.delete_person(ann.id).await.unwrap_err().is_unavailable());
}
