//! AWS SQS Queue Adapter
//!
//! `MessageQueue` 포트의 AWS SQS 구현체입니다.
//! FIFO 큐를 대상으로 하며, long polling 수신과 그룹 키 전송을
//! 지원합니다. 자격 증명은 AWS SDK의 기본 credential chain을
//! 따릅니다.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sqs::types::MessageSystemAttributeName;
use log::info;
use uuid::Uuid;

use crate::config::Settings;
use crate::domain::ports::message_queue::{MessageQueue, QueueMessage};
use crate::errors::AppError;

/// AWS SQS 클라이언트 래퍼
///
/// 하나의 큐 URL에 바인딩되어 수신/삭제/전송을 제공합니다.
pub struct SqsQueue {
    client: aws_sdk_sqs::Client,
    queue_url: String,
}

impl SqsQueue {
    /// 설정에서 SQS 클라이언트를 초기화합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigError` - `SQS_QUEUE_URL` 미설정
    pub async fn connect(settings: &Settings) -> Result<Self, AppError> {
        let queue_url = settings.require_queue_url()?.to_string();

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.aws_region.clone()))
            .load()
            .await;

        info!("✅ SQS 클라이언트 초기화: {}", queue_url);

        Ok(Self {
            client: aws_sdk_sqs::Client::new(&config),
            queue_url,
        })
    }

}

#[async_trait]
impl MessageQueue for SqsQueue {
    async fn receive(
        &self,
        max_messages: i32,
        wait_time_seconds: i32,
    ) -> Result<Vec<QueueMessage>, AppError> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(wait_time_seconds)
            .message_system_attribute_names(MessageSystemAttributeName::MessageGroupId)
            .send()
            .await
            .map_err(|e| AppError::QueueError(e.to_string()))?;

        let messages = output
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|m| QueueMessage {
                message_id: m.message_id.unwrap_or_default(),
                receipt_handle: m.receipt_handle.unwrap_or_default(),
                group_id: m
                    .attributes
                    .as_ref()
                    .and_then(|attrs| attrs.get(&MessageSystemAttributeName::MessageGroupId))
                    .cloned(),
                body: m.body.unwrap_or_default(),
            })
            .collect();

        Ok(messages)
    }

    async fn delete(&self, receipt_handle: &str) -> Result<(), AppError> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| AppError::QueueError(e.to_string()))?;

        Ok(())
    }

    async fn send(&self, body: &str, group_id: &str) -> Result<String, AppError> {
        // FIFO 큐는 content-based deduplication이 꺼져 있다고 가정하고
        // 중복 제거 식별자를 직접 생성한다
        let output = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .message_group_id(group_id)
            .message_deduplication_id(Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(|e| AppError::QueueError(e.to_string()))?;

        Ok(output.message_id.unwrap_or_default())
    }
}
