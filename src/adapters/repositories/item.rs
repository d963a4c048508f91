//! # 아이템 리포지토리 구현 (MongoDB Adapter)
//!
//! `ItemRepository` 포트의 MongoDB 구현체입니다.
//! 도메인 엔티티와 저장 문서(`ItemDocument`) 간 변환을 담당하며,
//! 하나의 논리적 컬렉션(`items`)에 대한 순수 I/O만 수행합니다.
//!
//! ## 세션 바인딩
//!
//! 동일한 구조체가 두 모드로 동작합니다:
//!
//! - `MongoItemRepository::new(db)` - 세션 없이 단건 읽기/쓰기
//! - `MongoUnitOfWork::item_repo()` - 트랜잭션 세션에 바인딩된 핸들
//!
//! 세션 바인딩 모드에서는 모든 연산이 해당 세션의 트랜잭션에 참여합니다.
//!
//! ## 문서 매핑 규칙
//!
//! - `_id`(ObjectId) ↔ 엔티티의 hex 문자열 식별자
//! - 저장된 문서의 알 수 없는 필드는 읽기 시 조용히 무시됩니다
//! - 형식이 잘못된 식별자는 에러가 아니라 "없음"으로 취급합니다

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::warn;
use mongodb::bson::{self, Document, doc, oid::ObjectId};
use mongodb::{ClientSession, Collection};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::db::Database;
use crate::domain::entities::item::{ItemEntity, ItemStatus};
use crate::domain::ports::item::{ItemPatch, ItemRepository};
use crate::errors::AppError;

/// 아이템 컬렉션 이름
pub(crate) const ITEMS_COLLECTION: &str = "items";

/// 아이템 저장 문서 (어댑터 전용)
///
/// MongoDB에 저장되는 문서 형태입니다. serde의 기본 동작으로
/// 알 수 없는 필드는 역직렬화 시 버려집니다.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ItemDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub status: ItemStatus,
    pub created_at: bson::DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Document>,
}

impl ItemDocument {
    /// 도메인 엔티티를 저장 문서로 변환합니다.
    pub(crate) fn from_entity(entity: &ItemEntity) -> Result<Self, AppError> {
        let metadata = entity
            .metadata
            .as_ref()
            .map(bson::to_document)
            .transpose()
            .map_err(|e| AppError::RepositoryError(e.to_string()))?;

        Ok(Self {
            id: None,
            name: entity.name.clone(),
            description: entity.description.clone(),
            status: entity.status,
            created_at: bson::DateTime::from_millis(entity.created_at.timestamp_millis()),
            updated_at: entity
                .updated_at
                .map(|dt| bson::DateTime::from_millis(dt.timestamp_millis())),
            metadata,
        })
    }

    /// 저장 문서를 도메인 엔티티로 변환합니다.
    pub(crate) fn into_entity(self) -> Result<ItemEntity, AppError> {
        let metadata = self
            .metadata
            .map(bson::from_document::<Map<String, Value>>)
            .transpose()
            .map_err(|e| AppError::RepositoryError(e.to_string()))?;

        Ok(ItemEntity {
            id: self.id.map(|oid| oid.to_hex()),
            name: self.name,
            description: self.description,
            status: self.status,
            created_at: to_chrono(self.created_at),
            updated_at: self.updated_at.map(to_chrono),
            metadata,
        })
    }
}

fn to_chrono(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// 아이템 데이터 액세스 리포지토리
///
/// `session`이 `Some`이면 모든 연산이 해당 세션(트랜잭션)을 통해
/// 수행됩니다. Unit of Work가 이 모드로 핸들을 생성합니다.
pub struct MongoItemRepository<'a> {
    collection: Collection<ItemDocument>,
    session: Option<&'a mut ClientSession>,
}

impl MongoItemRepository<'static> {
    /// 세션 없이 동작하는 리포지토리를 생성합니다.
    ///
    /// 단건 읽기/쓰기는 트랜잭션이 필요 없으므로 이 경로를 사용합니다.
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_database().collection(ITEMS_COLLECTION),
            session: None,
        }
    }
}

impl<'a> MongoItemRepository<'a> {
    /// 트랜잭션 세션에 바인딩된 리포지토리를 생성합니다.
    pub(crate) fn bound(
        collection: Collection<ItemDocument>,
        session: &'a mut ClientSession,
    ) -> Self {
        Self {
            collection,
            session: Some(session),
        }
    }
}

#[async_trait]
impl ItemRepository for MongoItemRepository<'_> {
    async fn create(&mut self, entity: &ItemEntity) -> Result<String, AppError> {
        let document = ItemDocument::from_entity(entity)?;

        let result = match self.session.as_deref_mut() {
            Some(session) => self.collection.insert_one(&document).session(session).await,
            None => self.collection.insert_one(&document).await,
        }
        .map_err(|e| AppError::RepositoryError(e.to_string()))?;

        result
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .ok_or_else(|| {
                AppError::RepositoryError("insert did not return an ObjectId".to_string())
            })
    }

    async fn get_by_id(&mut self, item_id: &str) -> Result<Option<ItemEntity>, AppError> {
        let oid = match ObjectId::parse_str(item_id) {
            Ok(oid) => oid,
            Err(e) => {
                // 형식이 잘못된 식별자는 "없음"으로 취급
                warn!("잘못된 item_id 형식 '{}': {}", item_id, e);
                return Ok(None);
            }
        };

        let document = match self.session.as_deref_mut() {
            Some(session) => {
                self.collection
                    .find_one(doc! { "_id": oid })
                    .session(session)
                    .await
            }
            None => self.collection.find_one(doc! { "_id": oid }).await,
        }
        .map_err(|e| AppError::RepositoryError(e.to_string()))?;

        document.map(ItemDocument::into_entity).transpose()
    }

    async fn update(&mut self, item_id: &str, patch: ItemPatch) -> Result<bool, AppError> {
        let oid = match ObjectId::parse_str(item_id) {
            Ok(oid) => oid,
            Err(_) => return Ok(false),
        };

        if patch.is_empty() {
            return Ok(false);
        }

        let mut set_doc = doc! { "updated_at": bson::DateTime::now() };
        if let Some(name) = patch.name {
            set_doc.insert("name", name);
        }
        if let Some(description) = patch.description {
            set_doc.insert("description", description);
        }
        if let Some(status) = patch.status {
            set_doc.insert("status", status.to_string());
        }
        if let Some(metadata) = patch.metadata {
            let metadata = bson::to_document(&metadata)
                .map_err(|e| AppError::RepositoryError(e.to_string()))?;
            set_doc.insert("metadata", metadata);
        }

        let update = doc! { "$set": set_doc };
        let result = match self.session.as_deref_mut() {
            Some(session) => {
                self.collection
                    .update_one(doc! { "_id": oid }, update)
                    .session(session)
                    .await
            }
            None => {
                self.collection
                    .update_one(doc! { "_id": oid }, update)
                    .await
            }
        }
        .map_err(|e| AppError::RepositoryError(e.to_string()))?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&mut self, item_id: &str) -> Result<bool, AppError> {
        let oid = match ObjectId::parse_str(item_id) {
            Ok(oid) => oid,
            Err(_) => return Ok(false),
        };

        let result = match self.session.as_deref_mut() {
            Some(session) => {
                self.collection
                    .delete_one(doc! { "_id": oid })
                    .session(session)
                    .await
            }
            None => self.collection.delete_one(doc! { "_id": oid }).await,
        }
        .map_err(|e| AppError::RepositoryError(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_document_fields_are_dropped() {
        // 저장된 문서에 엔티티가 모르는 필드가 있어도 읽기는 성공해야 한다
        let raw = doc! {
            "_id": ObjectId::new(),
            "name": "Widget",
            "description": "",
            "status": "active",
            "created_at": bson::DateTime::now(),
            "legacy_field": "should be ignored",
            "another_unknown": 42,
        };

        let document: ItemDocument = bson::from_document(raw).unwrap();
        let entity = document.into_entity().unwrap();

        assert_eq!(entity.name, "Widget");
        assert_eq!(entity.status, ItemStatus::Active);
    }

    #[test]
    fn test_entity_document_round_trip() {
        let mut metadata = Map::new();
        metadata.insert("source".to_string(), Value::String("api".to_string()));

        let entity = ItemEntity::create(
            "Widget".to_string(),
            Some("desc".to_string()),
            Some(ItemStatus::Draft),
            Some(metadata),
        )
        .unwrap();

        let document = ItemDocument::from_entity(&entity).unwrap();
        let restored = document.into_entity().unwrap();

        assert_eq!(restored.name, entity.name);
        assert_eq!(restored.status, ItemStatus::Draft);
        assert_eq!(
            restored.metadata.as_ref().and_then(|m| m.get("source")),
            Some(&Value::String("api".to_string()))
        );
        // 밀리초 정밀도로 보존
        assert_eq!(
            restored.created_at.timestamp_millis(),
            entity.created_at.timestamp_millis()
        );
    }

    #[test]
    fn test_empty_patch_is_detected() {
        assert!(ItemPatch::default().is_empty());
        assert!(
            !ItemPatch {
                status: Some(ItemStatus::Archived),
                ..Default::default()
            }
            .is_empty()
        );
    }
}
