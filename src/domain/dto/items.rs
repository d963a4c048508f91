//! 아이템 API 요청/응답 DTO
//!
//! HTTP 전송 계층과 도메인 엔티티 사이의 변환을 담당합니다.
//! 요청 검증은 `validator` derive로 수행합니다.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::domain::entities::item::{ItemEntity, ItemStatus};

/// 아이템 생성 요청
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    /// 아이템 이름 (필수)
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    /// 아이템 설명 (선택)
    pub description: Option<String>,
    /// 초기 상태 (선택, 기본값 `active`)
    pub status: Option<ItemStatus>,
    /// 자유 형식 메타데이터 (선택)
    pub metadata: Option<Map<String, Value>>,
}

/// 아이템 생성 응답
#[derive(Debug, Serialize)]
pub struct CreateItemResponse {
    /// 부여된 아이템 식별자
    pub id: String,
}

/// 아이템 조회 응답
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: ItemStatus,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl From<ItemEntity> for ItemResponse {
    fn from(entity: ItemEntity) -> Self {
        Self {
            id: entity.id.unwrap_or_default(),
            name: entity.name,
            description: entity.description,
            status: entity.status,
            created_at: entity.created_at.to_rfc3339(),
            updated_at: entity.updated_at.map(|dt| dt.to_rfc3339()),
            metadata: entity.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_fails_validation() {
        let request = CreateItemRequest {
            name: "".to_string(),
            description: None,
            status: None,
            metadata: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_valid_request_passes() {
        let request = CreateItemRequest {
            name: "Widget".to_string(),
            description: Some("A sample item".to_string()),
            status: None,
            metadata: None,
        };

        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_accepts_initial_status() {
        let request: CreateItemRequest =
            serde_json::from_str(r#"{"name": "Widget", "status": "draft"}"#).unwrap();

        assert_eq!(request.status, Some(ItemStatus::Draft));

        // status 생략 시 서비스 계층 기본값(active)에 맡긴다
        let request: CreateItemRequest = serde_json::from_str(r#"{"name": "Widget"}"#).unwrap();
        assert_eq!(request.status, None);
    }
}
