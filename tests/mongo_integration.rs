//! MongoDB 통합 테스트
//!
//! 실제 MongoDB 인스턴스가 필요한 테스트입니다. `TEST_MONGODB_URI`
//! 환경 변수가 설정된 경우에만 실행되고, 없으면 조용히 통과합니다.
//!
//! ```bash
//! TEST_MONGODB_URI="mongodb://localhost:27017" cargo test --test mongo_integration
//! ```
//!
//! 트랜잭션 테스트는 replica set 배포가 필요하며, standalone
//! 인스턴스에서는 스스로 스킵합니다.

use std::sync::Arc;

use uuid::Uuid;

use item_service_backend::adapters::uow::MongoUnitOfWork;
use item_service_backend::config::Settings;
use item_service_backend::db::Database;
use item_service_backend::domain::entities::item::{ItemEntity, ItemStatus};
use item_service_backend::domain::ports::item::ItemRepository;
use item_service_backend::errors::AppError;
use item_service_backend::services::item_service::ItemService;

/// 테스트 전용 데이터베이스에 연결합니다. URI 미설정 시 None.
async fn test_database() -> Option<Arc<Database>> {
    let uri = std::env::var("TEST_MONGODB_URI").ok()?;

    let settings = Settings {
        environment: "test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        mongodb_uri: uri,
        database_name: format!("item_service_test_{}", Uuid::new_v4().simple()),
        sqs_queue_url: None,
        aws_region: "ap-northeast-2".to_string(),
        sqs_wait_time_seconds: 0,
        worker_max_concurrency: 1,
    };

    let database = Database::connect(&settings)
        .await
        .expect("테스트 MongoDB 연결 실패");
    Some(Arc::new(database))
}

async fn drop_test_database(database: &Database) {
    database
        .get_database()
        .drop()
        .await
        .expect("테스트 데이터베이스 삭제 실패");
}

#[tokio::test]
async fn test_create_then_get_roundtrip() {
    let Some(database) = test_database().await else {
        return;
    };

    let service = ItemService::new(database.clone());
    let item_id = service
        .create_item("Widget".to_string(), Some("test widget".to_string()), None, None)
        .await
        .unwrap();

    let item = service.get_item(&item_id).await.unwrap();
    assert_eq!(item.name, "Widget");
    assert_eq!(item.status, ItemStatus::Active);
    assert_eq!(item.id.as_deref(), Some(item_id.as_str()));

    // 같은 식별자 재조회는 같은 아이템을 돌려준다
    let again = service.get_item(&item_id).await.unwrap();
    assert_eq!(item, again);

    drop_test_database(&database).await;
}

#[tokio::test]
async fn test_get_unknown_and_invalid_ids() {
    let Some(database) = test_database().await else {
        return;
    };

    let service = ItemService::new(database.clone());

    // 형식은 올바르지만 존재하지 않는 ObjectId
    let missing = service.get_item("65f000000000000000000000").await;
    assert!(matches!(missing, Err(AppError::ItemNotFound(_))));

    // ObjectId 형식이 아닌 식별자도 404로 취급된다
    let invalid = service.get_item("not-an-object-id").await;
    assert!(matches!(invalid, Err(AppError::ItemNotFound(_))));

    drop_test_database(&database).await;
}

#[tokio::test]
async fn test_process_item_archives_and_records_timestamp() {
    let Some(database) = test_database().await else {
        return;
    };

    let service = ItemService::new(database.clone());
    let item_id = service
        .create_item("Processable".to_string(), None, None, None)
        .await
        .unwrap();

    let processed = service.process_item(&item_id).await.unwrap();
    assert_eq!(processed.status, ItemStatus::Archived);
    assert!(
        processed
            .metadata
            .as_ref()
            .is_some_and(|m| m.contains_key("processed_at"))
    );

    drop_test_database(&database).await;
}

#[tokio::test]
async fn test_uow_commit_makes_writes_visible() {
    let Some(database) = test_database().await else {
        return;
    };

    let mut uow = match MongoUnitOfWork::begin(&database).await {
        Ok(uow) => uow,
        // standalone 배포는 트랜잭션을 지원하지 않는다
        Err(AppError::UnsupportedTransaction(_)) => return,
        Err(e) => panic!("트랜잭션 시작 실패: {}", e),
    };

    let entity = ItemEntity::create("Committed".to_string(), None, None, None).unwrap();
    let item_id = {
        let mut repo = uow.item_repo();
        repo.create(&entity).await.unwrap()
    };
    uow.commit().await.unwrap();

    let service = ItemService::new(database.clone());
    let item = service.get_item(&item_id).await.unwrap();
    assert_eq!(item.name, "Committed");

    drop_test_database(&database).await;
}

#[tokio::test]
async fn test_uow_rollback_discards_writes() {
    let Some(database) = test_database().await else {
        return;
    };

    let mut uow = match MongoUnitOfWork::begin(&database).await {
        Ok(uow) => uow,
        Err(AppError::UnsupportedTransaction(_)) => return,
        Err(e) => panic!("트랜잭션 시작 실패: {}", e),
    };

    let entity = ItemEntity::create("RolledBack".to_string(), None, None, None).unwrap();
    let item_id = {
        let mut repo = uow.item_repo();
        repo.create(&entity).await.unwrap()
    };
    uow.rollback().await.unwrap();

    let service = ItemService::new(database.clone());
    let result = service.get_item(&item_id).await;
    assert!(matches!(result, Err(AppError::ItemNotFound(_))));

    drop_test_database(&database).await;
}

#[tokio::test]
async fn test_uow_dropped_without_commit_discards_writes() {
    let Some(database) = test_database().await else {
        return;
    };

    let item_id = {
        let mut uow = match MongoUnitOfWork::begin(&database).await {
            Ok(uow) => uow,
            Err(AppError::UnsupportedTransaction(_)) => return,
            Err(e) => panic!("트랜잭션 시작 실패: {}", e),
        };

        let entity = ItemEntity::create("Abandoned".to_string(), None, None, None).unwrap();
        let mut repo = uow.item_repo();
        repo.create(&entity).await.unwrap()
        // 커밋 없이 스코프를 벗어나면 드라이버가 트랜잭션을 중단한다
    };

    let service = ItemService::new(database.clone());
    let result = service.get_item(&item_id).await;
    assert!(matches!(result, Err(AppError::ItemNotFound(_))));

    drop_test_database(&database).await;
}

#[tokio::test]
async fn test_import_items_is_atomic() {
    let Some(database) = test_database().await else {
        return;
    };

    // 트랜잭션 미지원 배포에서는 스킵
    match MongoUnitOfWork::begin(&database).await {
        Ok(uow) => drop(uow),
        Err(AppError::UnsupportedTransaction(_)) => return,
        Err(e) => panic!("트랜잭션 시작 실패: {}", e),
    }

    let service = ItemService::new(database.clone());

    let specs = vec![
        item_service_backend::services::item_service::NewItem {
            name: "Bulk A".to_string(),
            description: None,
            status: None,
            metadata: None,
        },
        item_service_backend::services::item_service::NewItem {
            name: "Bulk B".to_string(),
            description: None,
            status: None,
            metadata: None,
        },
    ];

    let item_ids = service.import_items(specs).await.unwrap();
    assert_eq!(item_ids.len(), 2);
    for id in &item_ids {
        service.get_item(id).await.unwrap();
    }

    drop_test_database(&database).await;
}
