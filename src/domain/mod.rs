//! 도메인 계층
//!
//! 인프라에 의존하지 않는 순수 도메인 모델입니다.
//! 엔티티, 포트(추상 인터페이스), 전송용 DTO를 포함합니다.
//! 어댑터 계층이 포트를 구현하고, 서비스 계층이 포트에 의존합니다.

pub mod dto;
pub mod entities;
pub mod ports;
