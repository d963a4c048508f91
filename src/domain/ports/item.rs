//! Item Repository Interface (Port)
//!
//! 아이템 엔티티 영속화 계약입니다. 모든 연산은 하나의 논리적
//! 컬렉션에 대한 순수 I/O이며 비즈니스 검증을 포함하지 않습니다.
//! 검증은 엔티티/서비스 계층의 책임입니다.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::entities::item::{ItemEntity, ItemStatus};
use crate::errors::AppError;

/// 부분 업데이트 명세
///
/// `Some`인 필드만 저장 문서에 반영됩니다.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ItemStatus>,
    pub metadata: Option<Map<String, Value>>,
}

impl ItemPatch {
    /// 반영할 필드가 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.metadata.is_none()
    }
}

/// 아이템 저장소 포트
///
/// `&mut self`는 세션 바인딩 구현(트랜잭션 내 저장소)이 세션에 대한
/// 배타적 접근을 요구하기 때문입니다.
#[async_trait]
pub trait ItemRepository {
    /// 새 아이템을 저장하고 부여된 식별자를 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::RepositoryError` - 전송/저장 실패
    async fn create(&mut self, entity: &ItemEntity) -> Result<String, AppError>;

    /// 식별자로 아이템을 조회합니다.
    ///
    /// 일치하는 문서가 없으면 에러가 아니라 `Ok(None)`을 반환합니다.
    /// 형식이 잘못된 식별자도 "없음"으로 취급합니다.
    async fn get_by_id(&mut self, item_id: &str) -> Result<Option<ItemEntity>, AppError>;

    /// 아이템을 부분 업데이트합니다.
    ///
    /// 일치하는 문서가 있었으면 `true`를 반환합니다.
    async fn update(&mut self, item_id: &str, patch: ItemPatch) -> Result<bool, AppError>;

    /// 아이템을 삭제합니다.
    ///
    /// 삭제된 문서가 있었으면 `true`를 반환합니다.
    async fn delete(&mut self, item_id: &str) -> Result<bool, AppError>;
}
