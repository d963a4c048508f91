//! 아이템 관리 서비스 백엔드
//!
//! DDD와 헥사고날 아키텍처 기반의 아이템 관리 서비스입니다.
//! HTTP API, SQS 워커, CLI 잡 세 가지 엔트리포인트가 동일한
//! 서비스 계층과 도메인을 공유합니다.
//!
//! # Features
//!
//! - **아이템 관리**: 생성, 조회, 처리(아카이브), 삭제, 일괄 생성
//! - **Unit of Work**: MongoDB 세션/트랜잭션 기반 원자적 다중 쓰기
//! - **SQS 워커**: FIFO 그룹 순서 보장 + 동시성 상한 컨슈머
//! - **CLI 잡**: 명령행 일회성 관리 작업 실행기
//! - **MongoDB**: 아이템 데이터 영구 저장
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐ ┌──────────┐ ┌──────────┐
//! │HTTP Route│ │SQS Worker│ │ CLI Job  │ ← 엔트리포인트
//! └──────────┘ └──────────┘ └──────────┘
//!        │          │          │
//!        └──────────┼──────────┘
//!                   ▼
//!          ┌─────────────────┐
//!          │    Services     │ ← 비즈니스 로직, 트랜잭션 경계
//!          └─────────────────┘
//!                   │
//!                   ▼
//!          ┌─────────────────┐
//!          │  Domain Ports   │ ← 리포지토리/큐 추상화
//!          └─────────────────┘
//!                   │
//!                   ▼
//!          ┌─────────────────┐
//!          │    Adapters     │ ← MongoDB, SQS 구현체
//!          └─────────────────┘
//!                   │
//!                   ▼
//!          ┌─────────────────┐
//!          │  MongoDB + SQS  │ ← 인프라
//!          └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use item_service_backend::db::Database;
//! use item_service_backend::services::item_service::ItemService;
//!
//! let database = Arc::new(Database::connect(&settings).await?);
//! let service = ItemService::new(database);
//!
//! let item_id = service.create_item("Widget".to_string(), None, None, None).await?;
//! let item = service.get_item(&item_id).await?;
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod worker;
