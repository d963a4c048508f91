//! # Item HTTP Handlers
//!
//! 아이템 관련 HTTP 엔드포인트를 처리하는 핸들러 함수들입니다.
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `POST` | `/api/v1/items` | 새 아이템 생성 | 201 Created |
//! | `GET` | `/api/v1/items/{id}` | 아이템 조회 | 200 OK |
//!
//! 에러는 `AppError`의 `ResponseError` 구현을 통해 상태 코드와
//! JSON 응답으로 자동 변환됩니다 (예: 존재하지 않는 아이템 → 404).

use actix_web::{HttpResponse, get, post, web};
use validator::Validate;

use crate::domain::dto::items::{CreateItemRequest, CreateItemResponse, ItemResponse};
use crate::errors::AppError;
use crate::services::item_service::ItemService;

/// 아이템 생성 핸들러
///
/// 요청 본문을 검증한 후 서비스 계층에 위임합니다.
#[post("")]
pub async fn create_item(
    service: web::Data<ItemService>,
    payload: web::Json<CreateItemRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let request = payload.into_inner();
    let id = service
        .create_item(
            request.name,
            request.description,
            request.status,
            request.metadata,
        )
        .await?;

    Ok(HttpResponse::Created().json(CreateItemResponse { id }))
}

/// 아이템 조회 핸들러
#[get("/{item_id}")]
pub async fn get_item(
    service: web::Data<ItemService>,
    item_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let item = service.get_item(&item_id).await?;

    Ok(HttpResponse::Ok().json(ItemResponse::from(item)))
}
