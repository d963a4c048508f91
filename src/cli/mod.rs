//! # CLI Job Runner
//!
//! 일회성 관리 잡의 인자 파싱과 실행을 담당하는 모듈입니다.
//!
//! - `job <name> [--flag value ...]` - 등록된 잡 실행
//! - `job list` - 등록된 잡 이름 목록 출력
//!
//! 잡 이름 뒤의 인자는 `--flag value` 쌍으로만 해석하며, 플래그의
//! 대시는 언더스코어로 정규화되어 핸들러에 전달됩니다
//! (`--item-id abc` → `{"item_id": "abc"}`).

pub mod jobs;
pub mod registry;

use log::info;
use serde_json::Value;

use crate::cli::registry::{JobArgs, JobRegistry};
use crate::errors::AppError;

/// 등록된 잡 목록을 출력하는 예약 이름
pub const LIST_JOB: &str = "list";

/// 명령행 인자를 잡 인자 맵으로 파싱합니다.
///
/// # Errors
///
/// * `AppError::ValidationError` - `--flag value` 쌍 형태가 아닌 경우
pub fn parse_job_args(raw: &[String]) -> Result<JobArgs, AppError> {
    let mut args = JobArgs::new();
    let mut iter = raw.iter();

    while let Some(flag) = iter.next() {
        let name = flag.strip_prefix("--").ok_or_else(|| {
            AppError::ValidationError(format!(
                "unexpected argument '{}' (expected --flag value pairs)",
                flag
            ))
        })?;
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "empty flag name is not allowed".to_string(),
            ));
        }

        let value = iter.next().ok_or_else(|| {
            AppError::ValidationError(format!("flag '{}' is missing a value", flag))
        })?;

        args.insert(name.replace('-', "_"), Value::String(value.clone()));
    }

    Ok(args)
}

/// 이름으로 잡을 실행합니다.
///
/// `list`는 예약된 가상 잡으로, 핸들러 실행 없이 등록된 잡 이름을
/// 출력합니다. 알 수 없는 이름이면 유효한 이름 목록을 stderr로
/// 안내하고 에러를 반환합니다.
pub async fn run_job(
    registry: &JobRegistry,
    job_name: &str,
    args: JobArgs,
) -> Result<(), AppError> {
    if job_name == LIST_JOB {
        println!("Available jobs:");
        for name in registry.job_names() {
            println!("  {}", name);
        }
        return Ok(());
    }

    info!("잡 실행: {}", job_name);
    match registry.run(job_name, args).await {
        Err(AppError::UnknownJob(name)) => {
            eprintln!("Unknown job '{}'. Valid jobs: {:?}", name, registry.job_names());
            Err(AppError::UnknownJob(name))
        }
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_job_args_pairs() {
        let args = parse_job_args(&raw(&["--item-id", "abc", "--count", "5"])).unwrap();

        assert_eq!(args.get("item_id"), Some(&json!("abc")));
        assert_eq!(args.get("count"), Some(&json!("5")));
    }

    #[test]
    fn test_parse_job_args_empty() {
        assert!(parse_job_args(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_parse_job_args_rejects_bare_value() {
        let result = parse_job_args(&raw(&["abc"]));
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_parse_job_args_rejects_trailing_flag() {
        let result = parse_job_args(&raw(&["--item-id"]));
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_run_job_list_is_reserved() {
        let registry = JobRegistry::new();
        // 등록된 잡이 없어도 list는 성공한다
        run_job(&registry, LIST_JOB, JobArgs::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_job_unknown_name_fails() {
        let registry = JobRegistry::new();
        let result = run_job(&registry, "nope", JobArgs::new()).await;
        assert!(matches!(result, Err(AppError::UnknownJob(_))));
    }
}
