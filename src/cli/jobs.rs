//! # Job Handlers
//!
//! `job <name>` 서브커맨드로 실행되는 일회성 관리 잡들입니다.
//!
//! | 잡 이름 | 인자 | 설명 |
//! |---------|------|------|
//! | `process_item` | `--item-id <id>` | 아이템을 처리(아카이브)합니다 |
//! | `seed_items` | `--count <n>` (기본 3) | 샘플 아이템을 일괄 생성합니다 |
//! | `delete_item` | `--item-id <id>` | 아이템을 삭제합니다 |
//!
//! 잡은 워커 태스크와 동일한 서비스 계층을 사용하므로 비즈니스
//! 규칙이 엔트리포인트별로 갈라지지 않습니다.

use std::sync::Arc;

use log::info;
use serde_json::Value;

use crate::cli::registry::{JobArgs, JobRegistry};
use crate::errors::AppError;
use crate::services::item_service::{ItemService, NewItem};

/// 모든 잡 핸들러를 등록한 레지스트리를 구성합니다.
///
/// 새 잡은 반드시 이 함수에서 등록해야 `job list`에 나타납니다.
pub fn register_all_jobs(service: Arc<ItemService>) -> Result<JobRegistry, AppError> {
    let mut registry = JobRegistry::new();

    {
        let service = service.clone();
        registry.register("process_item", move |args| {
            let service = service.clone();
            async move {
                let item_id = required_arg(&args, "item_id")?;
                let item = service.process_item(&item_id).await?;
                println!("Processed item {} ({:?})", item_id, item.status);
                Ok(())
            }
        })?;
    }

    {
        let service = service.clone();
        registry.register("seed_items", move |args| {
            let service = service.clone();
            async move {
                let count = args
                    .get("count")
                    .and_then(Value::as_str)
                    .map(str::parse::<usize>)
                    .transpose()
                    .map_err(|e| {
                        AppError::ValidationError(format!("--count must be a number: {}", e))
                    })?
                    .unwrap_or(3);

                let specs = (1..=count)
                    .map(|n| NewItem {
                        name: format!("Sample item {}", n),
                        description: Some("seeded by the seed_items job".to_string()),
                        status: None,
                        metadata: None,
                    })
                    .collect();

                let item_ids = service.import_items(specs).await?;
                info!("seed_items 잡 완료: {}건", item_ids.len());
                for id in &item_ids {
                    println!("Created item {}", id);
                }
                Ok(())
            }
        })?;
    }

    {
        let service = service.clone();
        registry.register("delete_item", move |args| {
            let service = service.clone();
            async move {
                let item_id = required_arg(&args, "item_id")?;
                service.delete_item(&item_id).await?;
                println!("Deleted item {}", item_id);
                Ok(())
            }
        })?;
    }

    Ok(registry)
}

/// 인자 맵에서 필수 문자열 인자를 추출합니다.
///
/// 에러 메시지는 사용자가 입력한 플래그 형태(`--item-id`)로
/// 표기합니다.
fn required_arg(args: &JobArgs, key: &str) -> Result<String, AppError> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::ValidationError(format!("--{} is required", key.replace('_', "-")))
        })
}
