//! 어댑터 계층
//!
//! 도메인 포트를 구체 기술로 구현합니다.
//! MongoDB 저장소/트랜잭션과 AWS SQS 큐 어댑터를 포함합니다.

pub mod repositories;
pub mod sqs;
pub mod uow;
