//! Item Entity Implementation
//!
//! 아이템 도메인 엔티티의 핵심 구현체입니다.
//! 엔티티 패턴의 샘플로, 모든 계층(포트 → 어댑터 → 서비스 →
//! 라우트/태스크/잡)을 관통하는 유일한 도메인 객체입니다.
//!
//! ## 설계 원칙
//!
//! - **불변성**: 필드 변경 대신 새 인스턴스를 생성합니다
//! - **식별자 기반 동등성**: `==`는 오직 `id`만 비교합니다
//! - **식별자 생명주기**: `id`는 최초 영속화 이전에만 `None`이며,
//!   저장 이후에는 존재하고 변경되지 않습니다

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// 아이템 상태
///
/// 저장소에는 소문자 문자열(`draft`/`active`/`archived`)로 직렬화됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Draft,
    Active,
    Archived,
}

impl Default for ItemStatus {
    /// 신규 아이템의 기본 초기 상태
    fn default() -> Self {
        ItemStatus::Active
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ItemStatus::Draft => "draft",
            ItemStatus::Active => "active",
            ItemStatus::Archived => "archived",
        };
        write!(f, "{}", label)
    }
}

/// 아이템 도메인 엔티티
///
/// 식별자 기반 동등성을 갖는 불변 값 객체입니다.
/// 영속화 이전에는 `id`가 `None`이며, 저장소가 식별자를 부여합니다.
#[derive(Debug, Clone)]
pub struct ItemEntity {
    /// 저장소가 부여한 식별자 (ObjectId hex). 최초 영속화 이전에만 None
    pub id: Option<String>,
    /// 아이템 이름
    pub name: String,
    /// 아이템 설명
    pub description: String,
    /// 아이템 상태
    pub status: ItemStatus,
    /// 생성 시간 (UTC)
    pub created_at: DateTime<Utc>,
    /// 마지막 수정 시간
    pub updated_at: Option<DateTime<Utc>>,
    /// 자유 형식 메타데이터
    pub metadata: Option<Map<String, Value>>,
}

impl ItemEntity {
    /// 새 아이템 엔티티를 생성하는 팩토리 메서드
    ///
    /// 비즈니스 규칙 검증(이름 비어있지 않음)을 수행하며,
    /// 식별자 없이 생성됩니다. 식별자는 영속화 시점에 부여됩니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 이름이 비어있는 경우
    pub fn create(
        name: String,
        description: Option<String>,
        status: Option<ItemStatus>,
        metadata: Option<Map<String, Value>>,
    ) -> Result<Self, AppError> {
        if name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Field 'name' must be a non-empty string".to_string(),
            ));
        }

        Ok(Self {
            id: None,
            name,
            description: description.unwrap_or_default(),
            status: status.unwrap_or_default(),
            created_at: Utc::now(),
            updated_at: None,
            metadata,
        })
    }

    /// 식별자가 부여된 새 인스턴스를 반환합니다.
    ///
    /// 엔티티는 불변이므로 in-place 변경 대신 새 값을 만듭니다.
    pub fn with_id(self, id: String) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }
}

impl PartialEq for ItemEntity {
    /// 식별자 기반 동등성
    ///
    /// 두 엔티티는 식별자가 모두 존재하고 같을 때에만 같습니다.
    /// 식별자가 없는(미영속) 엔티티는 어떤 엔티티와도 같지 않습니다.
    fn eq(&self, other: &Self) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl std::hash::Hash for ItemEntity {
    /// 식별자만 해시합니다.
    ///
    /// 동등성과 같은 기준을 사용하므로 `a == b`이면 해시도 같습니다.
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
