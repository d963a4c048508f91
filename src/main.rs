//! 아이템 관리 서비스 메인 애플리케이션
//!
//! 하나의 바이너리가 세 가지 엔트리포인트를 제공합니다.
//!
//! ```bash
//! item_service_backend api          # HTTP API 서버
//! item_service_backend worker       # SQS 큐 컨슈머
//! item_service_backend job <name>   # 일회성 관리 잡
//! item_service_backend job list     # 등록된 잡 목록
//! ```
//!
//! 모든 엔트리포인트는 동일한 설정(`Settings`)과 서비스 계층을
//! 공유합니다.

use std::process::ExitCode;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{App, HttpServer, middleware, web};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use tokio_util::sync::CancellationToken;

use item_service_backend::adapters::sqs::SqsQueue;
use item_service_backend::cli;
use item_service_backend::cli::jobs::register_all_jobs;
use item_service_backend::config::Settings;
use item_service_backend::db::Database;
use item_service_backend::errors::AppError;
use item_service_backend::routes::configure_all_routes;
use item_service_backend::services::item_service::ItemService;
use item_service_backend::worker::consumer::QueueConsumer;
use item_service_backend::worker::tasks::register_all_tasks;

/// 명령행 인터페이스 정의
#[derive(Parser)]
#[command(name = "item_service_backend", about = "아이템 관리 서비스", version)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// HTTP API 서버를 실행합니다
    Api,
    /// SQS 큐 컨슈머 워커를 실행합니다
    Worker,
    /// 일회성 관리 잡을 실행합니다 (`job list`로 목록 확인)
    Job {
        /// 실행할 잡 이름
        name: String,
        /// 잡에 전달할 `--flag value` 쌍
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli_args = CliArgs::parse();

    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    match cli_args.command {
        Command::Api => match actix_web::rt::System::new().block_on(run_api()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("API 서버 실행 실패: {}", e);
                ExitCode::FAILURE
            }
        },
        Command::Worker => match build_runtime().block_on(run_worker()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("워커 실행 실패: {}", e);
                ExitCode::FAILURE
            }
        },
        Command::Job { name, args } => {
            match build_runtime().block_on(run_job_command(&name, &args)) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!("잡 '{}' 실행 실패: {}", name, e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// 워커/잡 엔트리포인트용 tokio 런타임을 생성합니다.
fn build_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("tokio 런타임 생성 실패")
}

/// HTTP API 서버를 구성하고 실행합니다
///
/// CORS, 로깅, 경로 정규화 미들웨어를 포함하며 서비스 계층을
/// 애플리케이션 데이터로 주입합니다.
///
/// # Errors
///
/// * 데이터베이스 연결 실패, 포트 바인딩 실패 또는 서버 실행 오류
async fn run_api() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env();

    info!("🚀 아이템 관리 서비스 시작중...");

    let database = Arc::new(Database::connect(&settings).await?);
    let service = web::Data::new(ItemService::new(database));

    let bind_address = format!("{}:{}", settings.host, settings.port);
    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);
    info!("📍 API 엔드포인트: http://{}/api/v1/items", bind_address);

    HttpServer::new(move || {
        let cors = configure_cors();

        App::new()
            .app_data(service.clone())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(&bind_address)?
    .workers(4) // 워커 스레드 수
    .run()
    .await?;

    Ok(())
}

/// SQS 큐 컨슈머 워커를 실행합니다
///
/// 태스크 레지스트리를 구성하고 셧다운 신호(SIGINT/SIGTERM)를
/// 받을 때까지 메시지를 처리합니다. 셧다운 시 진행 중이던 호출은
/// ack 없이 중단되어 큐가 재전달합니다.
///
/// # Errors
///
/// * `AppError::ConfigError` - `SQS_QUEUE_URL` 미설정
/// * 데이터베이스 연결 실패 또는 레지스트리 구성 실패
async fn run_worker() -> Result<(), AppError> {
    let settings = Settings::from_env();

    info!("🚀 아이템 워커 시작중...");

    let database = Arc::new(Database::connect(&settings).await?);
    let service = Arc::new(ItemService::new(database));

    let registry = Arc::new(register_all_tasks(service)?);
    let queue = Arc::new(SqsQueue::connect(&settings).await?);

    let shutdown = CancellationToken::new();
    spawn_shutdown_listener(shutdown.clone());

    let consumer = QueueConsumer::new(
        queue,
        registry,
        settings.worker_max_concurrency,
        settings.sqs_wait_time_seconds,
        shutdown,
    );
    consumer.run().await;

    Ok(())
}

/// 일회성 잡을 실행합니다
///
/// `job list`가 데이터베이스 없이도 동작해야 하므로 ping 검증 없는
/// lazy 연결을 사용합니다. 실제 연결은 잡이 첫 쿼리를 수행하는
/// 시점에 수립됩니다.
async fn run_job_command(name: &str, raw_args: &[String]) -> Result<(), AppError> {
    let settings = Settings::from_env();

    let database = Arc::new(Database::connect_lazy(&settings).await?);
    let service = Arc::new(ItemService::new(database));

    let registry = register_all_jobs(service)?;
    let args = cli::parse_job_args(raw_args)?;

    cli::run_job(&registry, name, args).await
}

/// 셧다운 신호 리스너를 백그라운드로 등록합니다
///
/// SIGINT(Ctrl+C)와 SIGTERM(unix)을 감지하여 취소 토큰을
/// 트리거합니다.
fn spawn_shutdown_listener(shutdown: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    error!("SIGTERM 핸들러 등록 실패: {}", e);
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("SIGINT 수신, 셧다운 시작"),
                _ = sigterm.recv() => info!("SIGTERM 수신, 셧다운 시작"),
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Ctrl+C 핸들러 등록 실패: {}", e);
                return;
            }
            info!("SIGINT 수신, 셧다운 시작");
        }

        shutdown.cancel();
    });
}

/// 환경별 설정 파일을 로드합니다
///
/// PROFILE 환경변수에 따라 적절한 .env 파일을 로드합니다.
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            dotenv::from_filename(".env.prod").ok();
        }
        "dev" => {
            dotenv::from_filename(".env.dev").ok();
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// 환경변수 RUST_LOG를 기반으로 로깅 레벨을 설정합니다.
/// 기본값은 info 레벨이며, actix_web은 debug 레벨로 설정됩니다.
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// CORS 설정을 구성합니다
///
/// 개발환경에서 로컬호스트 간 통신을 허용합니다.
fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_origin("http://localhost:8080")
        .allowed_origin("http://127.0.0.1:8080")
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}
