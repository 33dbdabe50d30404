use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, error};

use crate::{
    config::Config,
    homework::{check_response, current_date, parse_status},
    ports::{MessagingPort, StatusSource},
    Result,
};

/// The single polling task: fetch → validate → parse → notify → sleep.
///
/// Owns the `from_date` watermark exclusively; nothing is persisted across
/// restarts.
pub struct Poller {
    cfg: Arc<Config>,
    source: Arc<dyn StatusSource>,
    messenger: Arc<dyn MessagingPort>,
    from_date: i64,
}

impl Poller {
    pub fn new(
        cfg: Arc<Config>,
        source: Arc<dyn StatusSource>,
        messenger: Arc<dyn MessagingPort>,
        from_date: i64,
    ) -> Self {
        Self {
            cfg,
            source,
            messenger,
            from_date,
        }
    }

    /// Run forever. Failures inside a cycle are contained here; the loop
    /// only ends when the process is killed.
    pub async fn run(mut self) {
        loop {
            self.run_cycle().await;
            sleep(self.cfg.poll_interval).await;
        }
    }

    /// One cycle with loop-level failure containment: any cycle error is
    /// logged and forwarded to the chat as a best-effort alert.
    async fn run_cycle(&mut self) {
        if let Err(e) = self.tick().await {
            error!("poll cycle failed: {e}");
            let alert = format!("Сбой в работе программы: {e}");
            self.send_best_effort(&alert).await;
        }
    }

    /// One fetch/validate/notify cycle. Returns the message sent this
    /// cycle, if any. The watermark advances only when the whole cycle
    /// succeeded.
    async fn tick(&mut self) -> Result<Option<String>> {
        debug!(from_date = self.from_date, "requesting status updates");
        let response = self.source.fetch(self.from_date).await?;

        let homeworks = check_response(&response)?;
        let next_from_date = current_date(&response)?;

        // Only the most recent record is reported per cycle; if several
        // statuses changed between polls, the rest wait for later cycles'
        // responses.
        let sent = match homeworks.first() {
            Some(record) => {
                let message = parse_status(record)?;
                self.send_best_effort(&message).await;
                Some(message)
            }
            None => {
                debug!("no new statuses");
                None
            }
        };

        self.from_date = next_from_date;
        Ok(sent)
    }

    /// Delivery failures are logged and absorbed so a broken chat can never
    /// take the loop down.
    async fn send_best_effort(&self, text: &str) {
        match self
            .messenger
            .send_text(self.cfg.telegram_chat_id, text)
            .await
        {
            Ok(()) => debug!("message delivered to chat"),
            Err(e) => error!("failed to deliver message to chat: {e}"),
        }
    }

    pub fn from_date(&self) -> i64 {
        self.from_date
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::{domain::ChatId, errors::Error};

    struct FixedSource(Value);

    #[async_trait]
    impl StatusSource for FixedSource {
        async fn fetch(&self, _from_date: i64) -> Result<Value> {
            Ok(self.0.clone())
        }
    }

    struct UnavailableSource;

    #[async_trait]
    impl StatusSource for UnavailableSource {
        async fn fetch(&self, _from_date: i64) -> Result<Value> {
            Err(Error::Status {
                status: 503,
                reason: "Service Unavailable".to_string(),
                body: "maintenance".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingMessenger {
        sent: Mutex<Vec<String>>,
    }

    impl RecordingMessenger {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessagingPort for RecordingMessenger {
        async fn send_text(&self, _chat_id: ChatId, text: &str) -> Result<()> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct BrokenMessenger;

    #[async_trait]
    impl MessagingPort for BrokenMessenger {
        async fn send_text(&self, _chat_id: ChatId, _text: &str) -> Result<()> {
            Err(Error::Delivery("chat unreachable".to_string()))
        }
    }

    fn test_config() -> Arc<Config> {
        Arc::new(Config {
            practicum_token: "practicum-secret".to_string(),
            telegram_bot_token: "bot-secret".to_string(),
            telegram_chat_id: ChatId(1),
            endpoint: "http://localhost/statuses/".to_string(),
            poll_interval: Duration::from_secs(600),
            request_timeout: Duration::from_secs(30),
        })
    }

    fn poller(
        source: impl StatusSource + 'static,
        messenger: Arc<dyn MessagingPort>,
        from_date: i64,
    ) -> Poller {
        Poller::new(test_config(), Arc::new(source), messenger, from_date)
    }

    #[tokio::test]
    async fn status_change_is_notified_and_watermark_advances() {
        let source = FixedSource(json!({
            "homeworks": [{"homework_name": "proj1", "status": "approved"}],
            "current_date": 1000,
        }));
        let messenger = Arc::new(RecordingMessenger::default());
        let mut poller = poller(source, messenger.clone(), 0);

        let sent = poller.tick().await.unwrap();
        assert_eq!(
            sent.as_deref(),
            Some(
                "Изменился статус проверки работы \"proj1\" \
                 Работа проверена: ревьюеру всё понравилось. Ура!"
            )
        );
        assert_eq!(messenger.sent(), vec![sent.unwrap()]);
        assert_eq!(poller.from_date(), 1000);
    }

    #[tokio::test]
    async fn empty_homeworks_sends_nothing_but_advances_watermark() {
        let source = FixedSource(json!({"homeworks": [], "current_date": 2000}));
        let messenger = Arc::new(RecordingMessenger::default());
        let mut poller = poller(source, messenger.clone(), 0);

        assert!(poller.tick().await.unwrap().is_none());
        assert!(messenger.sent().is_empty());
        assert_eq!(poller.from_date(), 2000);
    }

    #[tokio::test]
    async fn only_first_record_is_reported_per_cycle() {
        let source = FixedSource(json!({
            "homeworks": [
                {"homework_name": "proj2", "status": "rejected"},
                {"homework_name": "proj1", "status": "approved"},
            ],
            "current_date": 3000,
        }));
        let messenger = Arc::new(RecordingMessenger::default());
        let mut poller = poller(source, messenger.clone(), 0);

        poller.tick().await.unwrap();
        let sent = messenger.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("\"proj2\""));
    }

    #[tokio::test]
    async fn fetch_failure_sends_alert_and_keeps_watermark() {
        let messenger = Arc::new(RecordingMessenger::default());
        let mut poller = poller(UnavailableSource, messenger.clone(), 123);

        poller.run_cycle().await;

        let sent = messenger.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("Сбой в работе программы: "));
        assert!(sent[0].contains("503"));
        assert_eq!(poller.from_date(), 123);
    }

    #[tokio::test]
    async fn malformed_record_sends_alert_and_keeps_watermark() {
        let source = FixedSource(json!({
            "homeworks": [{"homework_name": "proj1", "status": "resubmitted"}],
            "current_date": 4000,
        }));
        let messenger = Arc::new(RecordingMessenger::default());
        let mut poller = poller(source, messenger.clone(), 123);

        poller.run_cycle().await;

        let sent = messenger.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("Сбой в работе программы: "));
        assert_eq!(poller.from_date(), 123);
    }

    #[tokio::test]
    async fn delivery_failure_is_absorbed_and_cycle_still_succeeds() {
        let source = FixedSource(json!({
            "homeworks": [{"homework_name": "proj1", "status": "reviewing"}],
            "current_date": 5000,
        }));
        let mut poller = poller(source, Arc::new(BrokenMessenger), 0);

        // The message could not be delivered, but the cycle is not an error
        // and the watermark still advances.
        assert!(poller.tick().await.unwrap().is_some());
        assert_eq!(poller.from_date(), 5000);
    }

    #[tokio::test]
    async fn repeated_fetch_of_same_payload_repeats_the_same_message() {
        let source = FixedSource(json!({
            "homeworks": [{"homework_name": "proj1", "status": "approved"}],
            "current_date": 1000,
        }));
        let messenger = Arc::new(RecordingMessenger::default());
        let mut poller = poller(source, messenger.clone(), 1000);

        let first = poller.tick().await.unwrap();
        let second = poller.tick().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(messenger.sent().len(), 2);
    }
}
