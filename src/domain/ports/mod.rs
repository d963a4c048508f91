//! 포트 (추상 인터페이스)
//!
//! 도메인이 의존하는 추상 인터페이스입니다.
//! 구체 기술(MongoDB, SQS)에 대한 구현은 어댑터 계층에 있습니다.

pub mod item;
pub mod message_queue;
