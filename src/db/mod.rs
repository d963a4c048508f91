//! Database Connection Management Module
//!
//! MongoDB 데이터베이스 연결 관리를 담당하는 모듈입니다.
//! 연결 풀링, 세션 생성, 설정 관리 등의 기능을 제공합니다.
//!
//! # 기본 사용법
//!
//! ```rust,ignore
//! use crate::config::Settings;
//! use crate::db::Database;
//!
//! let settings = Settings::from_env();
//! let database = Database::connect(&settings).await?;
//! let items = database.get_database().collection::<ItemDocument>("items");
//! ```

use log::info;
use mongodb::{Client, options::ClientOptions};

use crate::config::Settings;
use crate::errors::AppError;

/// MongoDB 데이터베이스 연결 래퍼
///
/// MongoDB 클라이언트와 데이터베이스 연결을 관리하며,
/// 어댑터 계층에서 컬렉션/세션 접근을 위한 기본 인터페이스를 제공합니다.
#[derive(Clone)]
pub struct Database {
    /// MongoDB 클라이언트 인스턴스
    client: Client,
    /// 사용할 데이터베이스 이름
    database_name: String,
}

impl Database {
    /// 새 MongoDB 데이터베이스 연결을 생성합니다.
    ///
    /// 설정에서 연결 정보를 읽어와 MongoDB 클라이언트를 초기화하고,
    /// ping으로 연결 상태를 검증한 후 Database 인스턴스를 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::RepositoryError` - URI 파싱 실패 또는 서버 접속 불가
    pub async fn connect(settings: &Settings) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(&settings.mongodb_uri)
            .await
            .map_err(|e| AppError::RepositoryError(e.to_string()))?;

        // 애플리케이션 이름 설정 (모니터링 및 로깅에 유용)
        client_options.app_name = Some("item_service".to_string());

        let client = Client::with_options(client_options)
            .map_err(|e| AppError::RepositoryError(e.to_string()))?;

        // 연결 테스트
        client
            .database(&settings.database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await
            .map_err(|e| AppError::RepositoryError(e.to_string()))?;

        info!("✅ MongoDB 연결 성공: {}", settings.database_name);

        Ok(Self {
            client,
            database_name: settings.database_name.clone(),
        })
    }

    /// ping 검증 없이 MongoDB 연결을 생성합니다.
    ///
    /// 드라이버는 첫 작업 시점에 실제 연결을 수립하므로, 데이터베이스
    /// 접근이 필요 없을 수도 있는 경로(예: `job list`)에서 사용합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::RepositoryError` - URI 파싱 실패
    pub async fn connect_lazy(settings: &Settings) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(&settings.mongodb_uri)
            .await
            .map_err(|e| AppError::RepositoryError(e.to_string()))?;
        client_options.app_name = Some("item_service".to_string());

        let client = Client::with_options(client_options)
            .map_err(|e| AppError::RepositoryError(e.to_string()))?;

        Ok(Self {
            client,
            database_name: settings.database_name.clone(),
        })
    }

    /// MongoDB 데이터베이스 인스턴스를 반환합니다.
    ///
    /// 어댑터에서 컬렉션에 접근할 때 사용됩니다.
    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    /// MongoDB 클라이언트 인스턴스를 반환합니다.
    ///
    /// 세션 관리, 트랜잭션 등 클라이언트 레벨의 작업이
    /// 필요한 경우(Unit of Work)에 사용됩니다.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// 데이터베이스 이름을 반환합니다.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
