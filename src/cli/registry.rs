//! # Job Registry
//!
//! CLI 잡 이름과 비동기 핸들러의 매핑을 관리하는 레지스트리입니다.
//! 태스크 레지스트리와 같은 구조이지만 입력이 큐 페이로드가 아니라
//! 명령행에서 파싱된 인자 맵이라는 점이 다릅니다.

use std::collections::HashMap;

use futures_util::future::BoxFuture;
use serde_json::{Map, Value};

use crate::errors::AppError;

/// 잡 핸들러에 전달되는 인자 맵
///
/// `--item-id abc` 형태의 명령행 플래그가 `{"item_id": "abc"}`로
/// 변환된 값입니다.
pub type JobArgs = Map<String, Value>;

type BoxedJobHandler = Box<dyn Fn(JobArgs) -> BoxFuture<'static, Result<(), AppError>> + Send + Sync>;

/// 잡 이름 → 핸들러 레지스트리
pub struct JobRegistry {
    handlers: HashMap<String, BoxedJobHandler>,
}

impl JobRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// 잡 핸들러를 등록합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::DuplicateJob` - 동일한 이름이 이미 등록된 경우
    pub fn register<F, Fut>(&mut self, job_name: &str, handler: F) -> Result<(), AppError>
    where
        F: Fn(JobArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        if self.handlers.contains_key(job_name) {
            return Err(AppError::DuplicateJob(job_name.to_string()));
        }

        self.handlers.insert(
            job_name.to_string(),
            Box::new(move |args| Box::pin(handler(args))),
        );
        Ok(())
    }

    /// 이름으로 잡을 찾아 실행하고 완료를 기다립니다.
    ///
    /// # Errors
    ///
    /// * `AppError::UnknownJob` - 등록되지 않은 이름
    /// * 그 외 - 핸들러가 반환한 에러 그대로
    pub async fn run(&self, job_name: &str, args: JobArgs) -> Result<(), AppError> {
        let handler = self
            .handlers
            .get(job_name)
            .ok_or_else(|| AppError::UnknownJob(job_name.to_string()))?;

        handler(args).await
    }

    /// 등록된 모든 잡 이름을 정렬하여 반환합니다.
    pub fn job_names(&self) -> Vec<String> {
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

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}
