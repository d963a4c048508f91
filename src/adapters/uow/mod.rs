//! # MongoDB Unit of Work
//!
//! 여러 리포지토리 쓰기를 하나의 원자적 트랜잭션으로 묶는
//! Unit of Work 구현입니다. `ClientSession`의 생명주기를 소유하며,
//! 해당 세션에 바인딩된 리포지토리 핸들을 제공합니다.
//!
//! ## 계약
//!
//! - `begin()` - 세션과 트랜잭션을 시작합니다
//! - `item_repo()` - 세션에 바인딩된 리포지토리 핸들
//! - `commit()` - 모든 쓰기를 원자적으로 영속화합니다. 유닛을 소비하므로
//!   "유닛당 최대 한 번의 커밋" 불변식이 타입 수준에서 강제됩니다
//! - `rollback()` - 명시적 롤백
//! - 커밋 없이 드롭되면(`?`를 포함한 모든 종료 경로) 드라이버가
//!   진행 중인 트랜잭션을 중단합니다
//!
//! 두 개 이상의 쓰기가 원자적이어야 할 때만 사용합니다.
//! 단건 읽기/쓰기는 `MongoItemRepository::new`로 직접 수행합니다.
//!
//! ## 전제 조건
//!
//! MongoDB 멀티 도큐먼트 트랜잭션은 replica set(또는 샤드 클러스터)
//! 배포에서만 지원됩니다. standalone 서버에서는 `begin()`이
//! `UnsupportedTransaction`으로 실패합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let mut uow = MongoUnitOfWork::begin(&db).await?;
//! {
//!     let mut repo = uow.item_repo();
//!     repo.create(&first).await?;
//!     repo.create(&second).await?;
//! }
//! uow.commit().await?;
//! // 커밋 전에 에러로 빠져나가면 쓰기는 모두 롤백된다
//! ```

use log::{debug, info};
use mongodb::{ClientSession, Collection};

use crate::adapters::repositories::item::{ITEMS_COLLECTION, ItemDocument, MongoItemRepository};
use crate::db::Database;
use crate::errors::AppError;

/// MongoDB 트랜잭션 스코프
///
/// 하나의 논리적 작업 단위 동안 하나의 세션을 소유합니다.
/// 세션은 작업 단위 간에 공유되지 않습니다.
pub struct MongoUnitOfWork {
    session: ClientSession,
    items: Collection<ItemDocument>,
}

impl MongoUnitOfWork {
    /// 새 세션과 트랜잭션을 시작합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::UnsupportedTransaction` - 배포가 트랜잭션을 지원하지 않음
    /// * `AppError::TransactionError` - 세션/트랜잭션 시작 실패
    pub async fn begin(db: &Database) -> Result<Self, AppError> {
        let mut session = db
            .client()
            .start_session()
            .await
            .map_err(map_begin_error)?;

        session
            .start_transaction()
            .await
            .map_err(map_begin_error)?;

        debug!("MongoDB 트랜잭션 시작");

        Ok(Self {
            session,
            items: db.get_database().collection(ITEMS_COLLECTION),
        })
    }

    /// 이 작업 단위의 세션에 바인딩된 아이템 리포지토리를 반환합니다.
    ///
    /// 핸들을 통한 모든 쓰기는 커밋 전까지 외부에서 보이지 않습니다.
    pub fn item_repo(&mut self) -> MongoItemRepository<'_> {
        MongoItemRepository::bound(self.items.clone(), &mut self.session)
    }

    /// 트랜잭션을 커밋합니다.
    ///
    /// `self`를 소비하므로 같은 유닛으로 두 번 커밋할 수 없습니다.
    ///
    /// # Errors
    ///
    /// * `AppError::TransactionError` - 쓰기 충돌 또는 세션이 이미 닫힘
    pub async fn commit(mut self) -> Result<(), AppError> {
        self.session
            .commit_transaction()
            .await
            .map_err(|e| AppError::TransactionError(e.to_string()))?;

        info!("트랜잭션 커밋 완료");
        Ok(())
    }

    /// 트랜잭션을 명시적으로 롤백합니다.
    ///
    /// 커밋하지 않고 드롭해도 동일하게 중단되지만, 호출 지점을
    /// 명시하고 싶을 때 사용합니다.
    pub async fn rollback(mut self) -> Result<(), AppError> {
        self.session
            .abort_transaction()
            .await
            .map_err(|e| AppError::TransactionError(e.to_string()))?;

        debug!("트랜잭션 롤백 완료");
        Ok(())
    }
}

/// 세션/트랜잭션 시작 에러를 분류합니다.
///
/// standalone 배포에서의 실패는 `UnsupportedTransaction`으로 구분하여
/// 호출자가 설정 문제임을 알 수 있게 합니다.
fn map_begin_error(e: mongodb::error::Error) -> AppError {
    let message = e.to_string();
    let lowered = message.to_lowercase();

    if lowered.contains("replica set") || lowered.contains("transaction numbers") {
        AppError::UnsupportedTransaction(message)
    } else {
        AppError::TransactionError(message)
    }
}
