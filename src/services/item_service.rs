//! # 아이템 관리 서비스 구현
//!
//! 아이템 유스케이스를 오케스트레이션하는 애플리케이션 계층입니다.
//! 도메인 엔티티와 포트를 사용하며, HTTP 핸들러 / 워커 태스크 /
//! CLI 잡 세 엔트리포인트가 모두 이 서비스를 통해 진입합니다.
//!
//! ## 트랜잭션 경계 규칙
//!
//! - 단건 읽기/쓰기(`create_item`, `get_item`, `process_item`,
//!   `delete_item`)는 리포지토리를 직접 호출합니다
//! - 두 개 이상의 쓰기가 원자적이어야 하는 경우(`import_items`)에만
//!   `MongoUnitOfWork`를 사용합니다
//!
//! 단일 쓰기 경로가 나중에 두 개의 쓰기로 확장될 때 UoW 도입을
//! 누락하면 원자성이 깨집니다. 쓰기를 추가하는 변경은 반드시 이
//! 규칙을 다시 확인해야 합니다.

use std::sync::Arc;

use chrono::Utc;
use log::info;
use serde_json::{Map, Value};

use crate::adapters::repositories::item::MongoItemRepository;
use crate::adapters::uow::MongoUnitOfWork;
use crate::db::Database;
use crate::domain::entities::item::{ItemEntity, ItemStatus};
use crate::domain::ports::item::{ItemPatch, ItemRepository};
use crate::errors::{AppError, AppResult};

/// 일괄 생성 입력 명세
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<ItemStatus>,
    pub metadata: Option<Map<String, Value>>,
}

/// 아이템 관리 비즈니스 로직 서비스
pub struct ItemService {
    db: Arc<Database>,
}

impl ItemService {
    /// 새 아이템 서비스를 생성합니다.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// 세션 없는 리포지토리 핸들을 생성합니다.
    fn repo(&self) -> MongoItemRepository<'static> {
        MongoItemRepository::new(&self.db)
    }

    /// 새 아이템을 생성합니다.
    ///
    /// 단일 쓰기이므로 트랜잭션 없이 리포지토리를 직접 호출합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 엔티티 검증 실패
    /// * `AppError::RepositoryError` - 저장 실패
    pub async fn create_item(
        &self,
        name: String,
        description: Option<String>,
        status: Option<ItemStatus>,
        metadata: Option<Map<String, Value>>,
    ) -> AppResult<String> {
        let entity = ItemEntity::create(name, description, status, metadata)?;

        let item_id = self.repo().create(&entity).await?;
        info!("아이템 생성 완료: {}", item_id);

        Ok(item_id)
    }

    /// 식별자로 아이템을 조회합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ItemNotFound` - 해당 식별자의 아이템이 없음
    pub async fn get_item(&self, item_id: &str) -> AppResult<ItemEntity> {
        self.repo()
            .get_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::ItemNotFound(format!("Item {} not found", item_id)))
    }

    /// 아이템을 처리(아카이브 전환)합니다.
    ///
    /// 읽기 한 번과 쓰기 한 번이므로 트랜잭션 없이 수행합니다.
    /// 처리 시각을 메타데이터에 기록하고 상태를 `archived`로 바꿉니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ItemNotFound` - 해당 식별자의 아이템이 없음
    pub async fn process_item(&self, item_id: &str) -> AppResult<ItemEntity> {
        let item = self.get_item(item_id).await?;

        let mut metadata = item.metadata.clone().unwrap_or_default();
        metadata.insert(
            "processed_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );

        let patch = ItemPatch {
            status: Some(ItemStatus::Archived),
            metadata: Some(metadata),
            ..Default::default()
        };

        let updated = self.repo().update(item_id, patch).await?;
        if !updated {
            // 조회와 업데이트 사이에 삭제된 경우
            return Err(AppError::ItemNotFound(format!(
                "Item {} not found",
                item_id
            )));
        }

        info!("아이템 처리 완료: {} ({})", item.name, item_id);
        self.get_item(item_id).await
    }

    /// 여러 아이템을 원자적으로 생성합니다.
    ///
    /// 두 개 이상의 쓰기가 하나의 단위여야 하므로 Unit of Work를
    /// 사용합니다. 하나라도 실패하면 전체가 롤백됩니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 입력 중 검증 실패가 있는 경우
    /// * `AppError::UnsupportedTransaction` - 배포가 트랜잭션 미지원
    /// * `AppError::TransactionError` - 커밋 실패
    pub async fn import_items(&self, specs: Vec<NewItem>) -> AppResult<Vec<String>> {
        if specs.is_empty() {
            return Ok(Vec::new());
        }

        // 트랜잭션 시작 전에 전체 입력을 먼저 검증한다
        let entities = specs
            .into_iter()
            .map(|spec| {
                ItemEntity::create(spec.name, spec.description, spec.status, spec.metadata)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut uow = MongoUnitOfWork::begin(&self.db).await?;
        let mut item_ids = Vec::with_capacity(entities.len());
        {
            let mut repo = uow.item_repo();
            for entity in &entities {
                item_ids.push(repo.create(entity).await?);
            }
        }
        uow.commit().await?;

        info!("아이템 {}건 일괄 생성 완료", item_ids.len());
        Ok(item_ids)
    }

    /// 아이템을 삭제합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ItemNotFound` - 해당 식별자의 아이템이 없음
    pub async fn delete_item(&self, item_id: &str) -> AppResult<()> {
        let deleted = self.repo().delete(item_id).await?;
        if !deleted {
            return Err(AppError::ItemNotFound(format!(
                "Item {} not found",
                item_id
            )));
        }

        info!("아이템 삭제 완료: {}", item_id);
        Ok(())
    }
}
