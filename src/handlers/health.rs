//! Health Check Handler

use actix_web::{HttpResponse, get};
use serde_json::json;

/// 서비스 헬스체크 엔드포인트
///
/// 로드밸런서/오케스트레이터의 생존 확인용입니다.
#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "item_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
