//! # Task Registry
//!
//! 태스크 이름과 비동기 핸들러의 매핑을 관리하는 레지스트리입니다.
//! 큐 컨슈머와 비즈니스 로직 사이의 유일한 통합 지점입니다.
//!
//! ## 생명주기
//!
//! 등록은 프로세스 시작 단계(`register_all_tasks`)에서 결정적으로
//! 한 번 수행되며, 이후 `Arc`로 감싸 공유되는 순간부터 불변입니다.
//! 디스패치 호출은 레지스트리 상태를 변경하지 않습니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let mut registry = TaskRegistry::new();
//! registry.register("process_item", move |payload| async move {
//!     // ...
//!     Ok(())
//! })?;
//! let registry = Arc::new(registry);
//!
//! registry.dispatch("process_item", payload).await?;
//! ```

use std::collections::HashMap;

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::errors::AppError;

/// 태스크 핸들러에 전달되는 페이로드
///
/// 전송 계층(큐 본문)에서 디코딩된 자유 형식 JSON 값입니다.
/// 필드 해석은 각 핸들러의 책임입니다.
pub type TaskPayload = Value;

type BoxedTaskHandler = Box<dyn Fn(TaskPayload) -> BoxFuture<'static, Result<(), AppError>> + Send + Sync>;

/// 태스크 이름 → 핸들러 레지스트리
pub struct TaskRegistry {
    handlers: HashMap<String, BoxedTaskHandler>,
}

impl TaskRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// 태스크 핸들러를 등록합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::DuplicateTask` - 동일한 이름이 이미 등록된 경우
    pub fn register<F, Fut>(&mut self, task_name: &str, handler: F) -> Result<(), AppError>
    where
        F: Fn(TaskPayload) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        if self.handlers.contains_key(task_name) {
            return Err(AppError::DuplicateTask(task_name.to_string()));
        }

        self.handlers.insert(
            task_name.to_string(),
            Box::new(move |payload| Box::pin(handler(payload))),
        );
        Ok(())
    }

    /// 이름으로 핸들러를 찾아 호출하고 완료를 기다립니다.
    ///
    /// # Errors
    ///
    /// * `AppError::UnknownTask` - 등록되지 않은 이름. 어떤 핸들러도
    ///   호출되지 않습니다
    /// * 그 외 - 핸들러가 반환한 에러 그대로
    pub async fn dispatch(&self, task_name: &str, payload: TaskPayload) -> Result<(), AppError> {
        let handler = self.handlers.get(task_name).ok_or_else(|| {
            AppError::UnknownTask(format!(
                "{}. Registered tasks: {:?}",
                task_name,
                self.task_names()
            ))
        })?;

        handler(payload).await
    }

    /// 등록된 모든 태스크 이름을 정렬하여 반환합니다.
    pub fn task_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// 등록된 핸들러 개수를 반환합니다.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// 레지스트리가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}
