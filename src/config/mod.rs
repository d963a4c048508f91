//! # Configuration Module
//!
//! 백엔드 서비스의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리하며,
//! API, 워커, CLI 세 엔트리포인트가 모두 동일한 `Settings`를 공유합니다.
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 실행 환경
//! export ENVIRONMENT="development"      # development, production
//!
//! # 서버 설정
//! export HOST="127.0.0.1"
//! export PORT="8080"
//!
//! # MongoDB 설정
//! export MONGODB_URI="mongodb://localhost:27017"
//! export DATABASE_NAME="item_service_dev"
//!
//! # AWS SQS 설정 (워커 엔트리포인트 필수)
//! export SQS_QUEUE_URL="https://sqs.ap-northeast-2.amazonaws.com/123456789/items.fifo"
//! export AWS_REGION="ap-northeast-2"
//! export SQS_WAIT_TIME_SECONDS="20"
//! export WORKER_MAX_CONCURRENCY="4"
//! ```
//!
//! AWS 자격 증명(`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`)은
//! AWS SDK의 기본 credential chain이 직접 읽습니다.

use std::env;

use log::error;

use crate::errors::AppError;

/// 애플리케이션 설정
///
/// 모든 설정값은 환경 변수에서 읽어오며, 개발 환경에서 안전한
/// 기본값을 제공합니다. 워커 구동에 필수인 `SQS_QUEUE_URL`만
/// `Option`으로 두고 워커 시작 시점에 검증합니다.
#[derive(Debug, Clone)]
pub struct Settings {
    /// 실행 환경 (development / production)
    pub environment: String,
    /// HTTP 서버 바인드 호스트
    pub host: String,
    /// HTTP 서버 바인드 포트
    pub port: u16,
    /// MongoDB 연결 URI
    pub mongodb_uri: String,
    /// 사용할 데이터베이스 이름
    pub database_name: String,
    /// SQS FIFO 큐 URL (워커 필수)
    pub sqs_queue_url: Option<String>,
    /// AWS 리전
    pub aws_region: String,
    /// SQS long polling 대기 시간 (0-20초)
    pub sqs_wait_time_seconds: i32,
    /// 워커의 동시 핸들러 실행 상한
    pub worker_max_concurrency: usize,
}

impl Settings {
    /// 환경 변수에서 설정을 로드합니다.
    ///
    /// 파싱에 실패한 숫자 설정은 에러 로그를 남기고 기본값으로
    /// 대체합니다. 필수값 검증은 각 엔트리포인트에서 수행합니다.
    pub fn from_env() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_env("PORT", 8080),
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "item_service_dev".to_string()),
            sqs_queue_url: env::var("SQS_QUEUE_URL").ok(),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "ap-northeast-2".to_string()),
            sqs_wait_time_seconds: parse_env("SQS_WAIT_TIME_SECONDS", 20),
            worker_max_concurrency: parse_env("WORKER_MAX_CONCURRENCY", 4),
        }
    }

    /// 워커 구동에 필수인 큐 URL을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigError` - `SQS_QUEUE_URL`이 설정되지 않은 경우
    pub fn require_queue_url(&self) -> Result<&str, AppError> {
        self.sqs_queue_url.as_deref().ok_or_else(|| {
            AppError::ConfigError("SQS_QUEUE_URL environment variable is required".to_string())
        })
    }
}

/// 숫자형 환경 변수를 파싱합니다. 실패 시 기본값을 사용합니다.
fn parse_env<T: std::str::FromStr + std::fmt::Display + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse::<T>().unwrap_or_else(|_| {
            error!("{} 파싱 실패: '{}'. 기본값 {} 사용", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
