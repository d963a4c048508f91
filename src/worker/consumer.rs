//! # Queue Consumer Loop
//!
//! 큐에서 메시지를 수신하여 태스크 레지스트리로 디스패치하는
//! 컨슈머 루프입니다.
//!
//! ## 동시성 모델
//!
//! - 전체 동시 핸들러 호출 수는 세마포어로 제한됩니다
//! - 같은 FIFO 그룹 키를 가진 메시지는 엄격히 수신 순서대로
//!   처리됩니다 (그룹당 하나의 순차 스트림)
//! - 서로 다른 그룹의 메시지는 동시에 실행될 수 있습니다
//!
//! ## Ack 정책
//!
//! | 결과 | 동작 |
//! |------|------|
//! | 성공 | 메시지 삭제(ack) |
//! | poison 실패 (`MalformedPayload`, `UnknownTask`) | 삭제 + 에러 로그 |
//! | 그 외 실패 | 삭제하지 않음 → 큐 재전달 |
//! | 셧다운으로 취소 | 삭제하지 않음 → at-least-once 재전달 |
//!
//! 재시도는 컨슈머가 관리하지 않고 큐 재전달에 맡깁니다.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::domain::ports::message_queue::{MessageQueue, QueueMessage};
use crate::errors::AppError;
use crate::worker::registry::TaskRegistry;

/// 한 번의 수신으로 가져오는 최대 메시지 수
const RECEIVE_BATCH_SIZE: i32 = 10;

/// 수신 실패 후 재시도 전 대기 시간
const RECEIVE_RETRY_DELAY: Duration = Duration::from_secs(1);

/// 큐 메시지 엔벨로프
///
/// 메시지 본문은 `{"task_name": ..., "payload": {...}}` 형식의
/// JSON이어야 합니다. 해석 불가능한 본문은 poison으로 분류됩니다.
#[derive(Debug, Deserialize)]
pub struct TaskEnvelope {
    pub task_name: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// 큐 컨슈머
///
/// 모든 필드가 공유 가능하므로 그룹별 처리 태스크로 `Clone`하여
/// 전달됩니다.
pub struct QueueConsumer<Q: MessageQueue> {
    queue: Arc<Q>,
    registry: Arc<TaskRegistry>,
    limiter: Arc<Semaphore>,
    wait_time_seconds: i32,
    shutdown: CancellationToken,
}

impl<Q: MessageQueue> Clone for QueueConsumer<Q> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            registry: self.registry.clone(),
            limiter: self.limiter.clone(),
            wait_time_seconds: self.wait_time_seconds,
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<Q: MessageQueue + 'static> QueueConsumer<Q> {
    /// 새 컨슈머를 생성합니다.
    pub fn new(
        queue: Arc<Q>,
        registry: Arc<TaskRegistry>,
        max_concurrency: usize,
        wait_time_seconds: i32,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            queue,
            registry,
            limiter: Arc::new(Semaphore::new(max_concurrency.max(1))),
            wait_time_seconds,
            shutdown,
        }
    }

    /// 셧다운 토큰이 취소될 때까지 메시지를 수신/처리합니다.
    pub async fn run(&self) {
        info!(
            "🚚 큐 컨슈머 시작 (동시성 상한: {}, long polling: {}s)",
            self.limiter.available_permits(),
            self.wait_time_seconds
        );

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            let batch = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                result = self.queue.receive(RECEIVE_BATCH_SIZE, self.wait_time_seconds) => result,
            };

            match batch {
                Ok(messages) if messages.is_empty() => continue,
                Ok(messages) => self.process_batch(messages).await,
                Err(e) => {
                    error!("메시지 수신 실패: {}", e);
                    // 일시적 장애에 대한 busy loop 방지
                    tokio::select! {
                        _ = self.shutdown.cancelled() => break,
                        _ = tokio::time::sleep(RECEIVE_RETRY_DELAY) => {}
                    }
                }
            }
        }

        info!("큐 컨슈머 종료");
    }

    /// 배치를 FIFO 그룹별 순차 스트림으로 나눠 처리합니다.
    ///
    /// 같은 그룹 키의 메시지는 하나의 태스크 안에서 수신 순서대로
    /// 처리되고, 그룹끼리는 동시에 실행됩니다.
    async fn process_batch(&self, messages: Vec<QueueMessage>) {
        // 그룹 키별로 도착 순서를 유지하며 묶는다
        let mut groups: Vec<(Option<String>, Vec<QueueMessage>)> = Vec::new();
        for message in messages {
            match groups.iter_mut().find(|(key, _)| *key == message.group_id) {
                Some((_, bucket)) => bucket.push(message),
                None => groups.push((message.group_id.clone(), vec![message])),
            }
        }

        let mut handles = Vec::with_capacity(groups.len());
        for (_, bucket) in groups {
            let consumer = self.clone();
            handles.push(tokio::spawn(async move {
                for message in bucket {
                    if consumer.shutdown.is_cancelled() {
                        return;
                    }
                    consumer.process_message(message).await;
                }
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!("그룹 처리 태스크 실패: {}", e);
            }
        }
    }

    /// 단일 메시지를 디스패치하고 결과에 따라 ack를 결정합니다.
    async fn process_message(&self, message: QueueMessage) {
        let permit = match self.limiter.clone().acquire_owned().await {
            Ok(permit) => permit,
            // 세마포어가 닫히는 경우는 셧다운뿐
            Err(_) => return,
        };

        let outcome = tokio::select! {
            _ = self.shutdown.cancelled() => {
                // 취소된 호출은 ack하지 않는다 (at-least-once 재전달 보장)
                warn!("셧다운으로 메시지 {} 처리 취소", message.message_id);
                return;
            }
            result = self.dispatch(&message) => result,
        };
        drop(permit);

        match outcome {
            Ok(()) => {
                debug!("메시지 {} 처리 완료", message.message_id);
                self.acknowledge(&message).await;
            }
            Err(e) if e.is_poison() => {
                // 재전달해도 성공할 수 없는 메시지: ack 후 로그만 남긴다
                error!("poison 메시지 {} ack: {}", message.message_id, e);
                self.acknowledge(&message).await;
            }
            Err(e) => {
                error!(
                    "메시지 {} 처리 실패, 재전달을 위해 ack하지 않음: {}",
                    message.message_id, e
                );
            }
        }
    }

    /// 엔벨로프를 해석하고 레지스트리로 디스패치합니다.
    async fn dispatch(&self, message: &QueueMessage) -> Result<(), AppError> {
        let envelope: TaskEnvelope = serde_json::from_str(&message.body)
            .map_err(|e| AppError::MalformedPayload(format!("invalid task envelope: {}", e)))?;

        info!(
            "태스크 디스패치: name={}, message_id={}",
            envelope.task_name, message.message_id
        );

        self.registry
            .dispatch(&envelope.task_name, envelope.payload)
            .await
    }

    /// 메시지를 큐에서 삭제(ack)합니다.
    async fn acknowledge(&self, message: &QueueMessage) {
        if let Err(e) = self.queue.delete(&message.receipt_handle).await {
            // 삭제 실패 시 메시지가 재전달될 수 있으므로 핸들러는 멱등해야 한다
            error!("메시지 {} 삭제 실패: {}", message.message_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// 순서 보장/ack 동작 검증용 인메모리 큐
    struct FakeQueue {
        pending: Mutex<VecDeque<QueueMessage>>,
        deleted: Mutex<Vec<String>>,
    }

    impl FakeQueue {
        fn new(messages: Vec<QueueMessage>) -> Self {
            Self {
                pending: Mutex::new(messages.into_iter().collect()),
                deleted: Mutex::new(Vec::new()),
            }
        }

        fn deleted_handles(&self) -> Vec<String> {
            self.deleted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageQueue for FakeQueue {
        async fn receive(
            &self,
            max_messages: i32,
            _wait_time_seconds: i32,
        ) -> Result<Vec<QueueMessage>, AppError> {
            let mut pending = self.pending.lock().unwrap();
            let count = (max_messages as usize).min(pending.len());
            Ok(pending.drain(..count).collect())
        }

        async fn delete(&self, receipt_handle: &str) -> Result<(), AppError> {
            self.deleted.lock().unwrap().push(receipt_handle.to_string());
            Ok(())
        }

        async fn send(&self, body: &str, group_id: &str) -> Result<String, AppError> {
            let mut pending = self.pending.lock().unwrap();
            let id = format!("m{}", pending.len());
            pending.push_back(QueueMessage {
                message_id: id.clone(),
                receipt_handle: format!("rh-{}", id),
                group_id: Some(group_id.to_string()),
                body: body.to_string(),
            });
            Ok(id)
        }
    }

    fn message(id: &str, group: &str, body: serde_json::Value) -> QueueMessage {
        QueueMessage {
            message_id: id.to_string(),
            receipt_handle: format!("rh-{}", id),
            group_id: Some(group.to_string()),
            body: body.to_string(),
        }
    }

    fn envelope(group: &str, seq: u64) -> serde_json::Value {
        json!({ "task_name": "record", "payload": { "group": group, "seq": seq } })
    }

    fn consumer_with(
        queue: Arc<FakeQueue>,
        registry: TaskRegistry,
        max_concurrency: usize,
    ) -> QueueConsumer<FakeQueue> {
        QueueConsumer::new(
            queue,
            Arc::new(registry),
            max_concurrency,
            0,
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn test_same_group_messages_processed_in_receive_order() {
        // 두 그룹의 메시지가 교차 수신되어도 그룹 내부 순서는 유지되어야 한다
        let observed: Arc<Mutex<Vec<(String, u64)>>> = Arc::new(Mutex::new(Vec::new()));
        let mut registry = TaskRegistry::new();
        {
            let observed = observed.clone();
            registry
                .register("record", move |payload| {
                    let observed = observed.clone();
                    async move {
                        let group = payload["group"].as_str().unwrap_or_default().to_string();
                        let seq = payload["seq"].as_u64().unwrap_or_default();
                        // 핸들러 실행 중 suspension point를 강제해 교차 실행을 유도
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        observed.lock().unwrap().push((group, seq));
                        Ok(())
                    }
                })
                .unwrap();
        }

        let queue = Arc::new(FakeQueue::new(vec![
            message("a1", "group-a", envelope("group-a", 1)),
            message("b1", "group-b", envelope("group-b", 1)),
            message("a2", "group-a", envelope("group-a", 2)),
            message("b2", "group-b", envelope("group-b", 2)),
            message("a3", "group-a", envelope("group-a", 3)),
        ]));

        let consumer = consumer_with(queue.clone(), registry, 4);
        let batch = queue.receive(RECEIVE_BATCH_SIZE, 0).await.unwrap();
        consumer.process_batch(batch).await;

        let observed = observed.lock().unwrap();
        for group in ["group-a", "group-b"] {
            let sequence: Vec<u64> = observed
                .iter()
                .filter(|(g, _)| g == group)
                .map(|(_, seq)| *seq)
                .collect();
            let mut sorted = sequence.clone();
            sorted.sort();
            assert_eq!(sequence, sorted, "{} 그룹의 순서가 깨짐", group);
        }
        assert_eq!(observed.len(), 5);

        // 성공한 메시지는 전부 ack
        assert_eq!(queue.deleted_handles().len(), 5);
    }

    #[tokio::test]
    async fn test_failed_handler_leaves_message_for_redelivery() {
        let mut registry = TaskRegistry::new();
        registry
            .register("process_item", |_| async {
                Err(AppError::ItemNotFound("Item missing not found".to_string()))
            })
            .unwrap();

        let queue = Arc::new(FakeQueue::new(vec![message(
            "m1",
            "group-a",
            json!({ "task_name": "process_item", "payload": { "item_id": "missing" } }),
        )]));

        let consumer = consumer_with(queue.clone(), registry, 1);
        let batch = queue.receive(RECEIVE_BATCH_SIZE, 0).await.unwrap();
        consumer.process_batch(batch).await;

        // 도메인 에러는 poison이 아니므로 ack하지 않는다
        assert!(queue.deleted_handles().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_task_is_acked_as_poison() {
        let registry = TaskRegistry::new();

        let queue = Arc::new(FakeQueue::new(vec![message(
            "m1",
            "group-a",
            json!({ "task_name": "no_such_task", "payload": {} }),
        )]));

        let consumer = consumer_with(queue.clone(), registry, 1);
        let batch = queue.receive(RECEIVE_BATCH_SIZE, 0).await.unwrap();
        consumer.process_batch(batch).await;

        assert_eq!(queue.deleted_handles(), vec!["rh-m1"]);
    }

    #[tokio::test]
    async fn test_malformed_body_is_acked_as_poison() {
        let registry = TaskRegistry::new();

        let queue = Arc::new(FakeQueue::new(vec![QueueMessage {
            message_id: "m1".to_string(),
            receipt_handle: "rh-m1".to_string(),
            group_id: None,
            body: "this is not json".to_string(),
        }]));

        let consumer = consumer_with(queue.clone(), registry, 1);
        let batch = queue.receive(RECEIVE_BATCH_SIZE, 0).await.unwrap();
        consumer.process_batch(batch).await;

        assert_eq!(queue.deleted_handles(), vec!["rh-m1"]);
    }

    #[tokio::test]
    async fn test_cancelled_consumer_does_not_ack() {
        let invoked = Arc::new(Mutex::new(0u32));
        let mut registry = TaskRegistry::new();
        {
            let invoked = invoked.clone();
            registry
                .register("record", move |_| {
                    let invoked = invoked.clone();
                    async move {
                        *invoked.lock().unwrap() += 1;
                        Ok(())
                    }
                })
                .unwrap();
        }

        let queue = Arc::new(FakeQueue::new(vec![message(
            "m1",
            "group-a",
            envelope("group-a", 1),
        )]));

        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let consumer = QueueConsumer::new(queue.clone(), Arc::new(registry), 1, 0, shutdown);

        let batch = queue.receive(RECEIVE_BATCH_SIZE, 0).await.unwrap();
        consumer.process_batch(batch).await;

        // 취소 이후에는 핸들러도 실행되지 않고 ack도 없다
        assert_eq!(*invoked.lock().unwrap(), 0);
        assert!(queue.deleted_handles().is_empty());
    }
}
