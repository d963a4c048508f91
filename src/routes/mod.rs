//! API 라우트 설정 모듈
//!
//! RESTful API 엔드포인트들을 기능별로 그룹화하여 제공합니다.
//! 헬스체크와 아이템 CRUD 라우트를 포함합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::{App, web};
//!
//! let app = App::new().configure(configure_all_routes);
//! ```

use actix_web::web;

use crate::handlers;

/// 모든 라우트를 설정합니다.
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoint
    cfg.service(handlers::health::health_check);

    // Feature-specific routes
    configure_item_routes(cfg);
}

/// 아이템 관련 라우트를 설정합니다.
///
/// - `POST /api/v1/items` - 아이템 생성
/// - `GET /api/v1/items/{id}` - 아이템 조회
fn configure_item_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/items")
            .service(handlers::items::create_item)
            .service(handlers::items::get_item),
    );
}
