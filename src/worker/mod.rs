//! 워커 엔트리포인트
//!
//! SQS 큐 메시지를 수신하여 등록된 태스크 핸들러로 디스패치하는
//! 비동기 워커입니다. 레지스트리는 프로세스 시작 시 한 번 구성되고
//! 이후 읽기 전용입니다.

pub mod consumer;
pub mod registry;
pub mod tasks;
