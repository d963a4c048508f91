//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 백엔드 서비스를 위한 통합 에러 처리 시스템입니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다.
//!
//! ## 에러 분류 체계
//!
//! | 분류 | 변형 | 재시도 정책 |
//! |------|------|-------------|
//! | Domain | `ValidationError`, `ItemNotFound` | 자동 재시도 없음, 호출자에게 전달 |
//! | Infrastructure | `RepositoryError`, `TransactionError`, `QueueError` | 호출자 재량으로 재시도 가능 |
//! | Dispatch | `UnknownTask`, `UnknownJob`, `DuplicateTask`, `DuplicateJob` | 재시도 불가 |
//! | Poison | `MalformedPayload`, `UnknownTask` | 메시지 ack 후 로그 기록 |
//!
//! 각 변형은 상태 코드(`status_code`)와 에러 타입 태그(`error_type`)를
//! 데이터로 가지며, 전송 계층 응답으로의 변환은 이 모듈의 단일 변환
//! 지점(`error_response`)에서만 수행됩니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn get_item(item_id: &str) -> Result<ItemEntity, AppError> {
//!     let item = repo.get_by_id(item_id).await?;
//!     item.ok_or_else(|| AppError::ItemNotFound(format!("Item {} not found", item_id)))
//! }
//! ```

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 백엔드 서비스에서 발생할 수 있는 모든 종류의 에러를 포괄하는 열거형입니다.
/// HTTP 엔트리포인트에서는 자동으로 HTTP 응답으로 변환되고,
/// 워커/CLI 엔트리포인트에서는 ack 여부와 종료 코드를 결정합니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 입력값 검증 에러 (400 Bad Request) - 도메인 에러
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 아이템 찾을 수 없음 (404 Not Found) - 도메인 에러
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// 메시지/잡 페이로드 형식 오류 (400 Bad Request) - poison 메시지
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// 등록되지 않은 태스크 이름으로 디스패치 시도
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    /// 동일한 태스크 이름 중복 등록
    #[error("Task already registered: {0}")]
    DuplicateTask(String),

    /// 등록되지 않은 잡 이름으로 디스패치 시도
    #[error("Unknown job: {0}")]
    UnknownJob(String),

    /// 동일한 잡 이름 중복 등록
    #[error("Job already registered: {0}")]
    DuplicateJob(String),

    /// 저장소/전송 계층 에러 (500 Internal Server Error)
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 트랜잭션 커밋/롤백 실패 (500 Internal Server Error)
    #[error("Transaction error: {0}")]
    TransactionError(String),

    /// 백엔드 스토어가 멀티 도큐먼트 트랜잭션을 지원하지 않음
    #[error("Transactions are not supported by this deployment: {0}")]
    UnsupportedTransaction(String),

    /// 큐 전송/수신 에러 (502 Bad Gateway)
    #[error("Queue error: {0}")]
    QueueError(String),

    /// 설정 로드 실패
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 에러 타입 태그를 반환합니다.
    ///
    /// API 응답의 `error` 필드로 사용되는 안정적인 문자열 태그입니다.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "Validation Error",
            AppError::ItemNotFound(_) => "Not Found",
            AppError::MalformedPayload(_) => "Malformed Payload",
            AppError::UnknownTask(_) => "Unknown Task",
            AppError::DuplicateTask(_) => "Duplicate Task",
            AppError::UnknownJob(_) => "Unknown Job",
            AppError::DuplicateJob(_) => "Duplicate Job",
            AppError::RepositoryError(_) => "Repository Error",
            AppError::TransactionError(_) => "Transaction Error",
            AppError::UnsupportedTransaction(_) => "Unsupported Transaction",
            AppError::QueueError(_) => "Queue Error",
            AppError::ConfigError(_) => "Configuration Error",
            AppError::InternalError(_) => "Internal Server Error",
        }
    }

    /// HTTP 상태 코드 매핑
    ///
    /// 태그에서 전송 계층 응답으로의 단일 중앙 변환 함수입니다.
    pub fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError(_) | AppError::MalformedPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::ItemNotFound(_) => StatusCode::NOT_FOUND,
            AppError::QueueError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// poison 메시지 여부를 판정합니다.
    ///
    /// poison으로 분류된 실패는 재전달해도 절대 성공할 수 없으므로
    /// 워커 컨슈머가 메시지를 ack(삭제)하고 로그로만 남깁니다.
    /// 그 외의 실패는 ack하지 않고 큐 재전달에 맡깁니다.
    pub fn is_poison(&self) -> bool {
        matches!(
            self,
            AppError::MalformedPayload(_) | AppError::UnknownTask(_)
        )
    }
}

impl actix_web::ResponseError for AppError {
    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 각 에러 타입을 적절한 HTTP 상태 코드와 JSON 응답으로 변환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "error": self.error_type(),
                "message": self.to_string(),
            }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;
