//! Message Queue Interface (Port)
//!
//! 큐 컨슈머가 의존하는 추상 인터페이스입니다.
//! 프로덕션 구현은 SQS 어댑터이며, 테스트에서는 인메모리
//! 페이크로 대체하여 순서 보장/ack 동작을 검증합니다.

use async_trait::async_trait;

use crate::errors::AppError;

/// 전송 계층에서 수신한 큐 메시지
///
/// body는 아직 디코딩되지 않은 원문입니다. 엔벨로프 해석은
/// 컨슈머의 책임입니다.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    /// 큐가 부여한 메시지 식별자
    pub message_id: String,
    /// ack(삭제)에 사용하는 수신 핸들
    pub receipt_handle: String,
    /// FIFO 그룹 키. 같은 키의 메시지는 수신 순서대로 처리되어야 한다
    pub group_id: Option<String>,
    /// 메시지 본문 원문
    pub body: String,
}

/// 메시지 큐 포트
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// 큐에서 메시지를 수신합니다 (long polling).
    ///
    /// 같은 FIFO 그룹에 속한 메시지는 반환 순서가 곧 도착 순서입니다.
    ///
    /// # Errors
    ///
    /// * `AppError::QueueError` - 전송 실패
    async fn receive(
        &self,
        max_messages: i32,
        wait_time_seconds: i32,
    ) -> Result<Vec<QueueMessage>, AppError>;

    /// 처리 완료한 메시지를 큐에서 삭제(ack)합니다.
    async fn delete(&self, receipt_handle: &str) -> Result<(), AppError>;

    /// FIFO 큐로 메시지를 전송합니다.
    ///
    /// 부여된 메시지 식별자를 반환합니다.
    async fn send(&self, body: &str, group_id: &str) -> Result<String, AppError>;
}
