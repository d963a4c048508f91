//! # Task Handlers
//!
//! 큐로 들어오는 태스크의 핸들러 구현과 레지스트리 구성입니다.
//!
//! | 태스크 이름 | 필수 페이로드 | 설명 |
//! |-------------|---------------|------|
//! | `process_item` | `item_id` | 아이템을 처리(아카이브)합니다 |
//! | `create_item` | `name` | 새 아이템을 생성합니다 |
//!
//! 페이로드의 필수 필드가 없거나 타입이 다르면 `MalformedPayload`로
//! 분류되어 컨슈머가 poison 메시지로 ack합니다.

use std::sync::Arc;

use log::info;
use serde_json::Value;

use crate::errors::AppError;
use crate::services::item_service::ItemService;
use crate::worker::registry::{TaskPayload, TaskRegistry};

/// 모든 태스크 핸들러를 등록한 레지스트리를 구성합니다.
///
/// 새 태스크는 반드시 이 함수에서 등록해야 워커에서 인식됩니다.
pub fn register_all_tasks(service: Arc<ItemService>) -> Result<TaskRegistry, AppError> {
    let mut registry = TaskRegistry::new();

    {
        let service = service.clone();
        registry.register("process_item", move |payload| {
            let service = service.clone();
            async move {
                let item_id = required_str(&payload, "item_id")?;
                let item = service.process_item(&item_id).await?;
                info!("process_item 태스크 완료: {} ({})", item.name, item_id);
                Ok(())
            }
        })?;
    }

    {
        let service = service.clone();
        registry.register("create_item", move |payload| {
            let service = service.clone();
            async move {
                let name = required_str(&payload, "name")?;
                let description = payload
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let metadata = payload
                    .get("metadata")
                    .and_then(Value::as_object)
                    .cloned();

                let item_id = service.create_item(name, description, None, metadata).await?;
                info!("create_item 태스크 완료: {}", item_id);
                Ok(())
            }
        })?;
    }

    info!("✅ 태스크 레지스트리 구성 완료: {:?}", registry.task_names());
    Ok(registry)
}

/// 페이로드에서 필수 문자열 필드를 추출합니다.
fn required_str(payload: &TaskPayload, key: &str) -> Result<String, AppError> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::MalformedPayload(format!("missing required string field '{}'", key))
        })
}
