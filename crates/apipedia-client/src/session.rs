use apipedia_core::{ApiResult, ApipediaError, Transport};

use crate::Apipedia;

/// Chain of calls that remembers the most recent result.
///
/// ```rust,ignore
/// let mut session = client.session();
/// session
///     .record(client.ai_chat("Weather today?", "agent-1", ChatFormat::Text).await?)
///     .to_whatsapp("628123456789", "Bot: ")
///     .await?
///     .to_telegram("123456", "")
///     .await?;
/// ```
///
/// Relays need `&mut self`, so one session cannot be driven from two tasks
/// at once. Use one session per conversation.
#[derive(Debug)]
pub struct Session<'a, T> {
    client: &'a Apipedia<T>,
    last: Option<ApiResult>,
}

impl<'a, T: Transport> Session<'a, T> {
    pub fn new(client: &'a Apipedia<T>) -> Self {
        Self { client, last: None }
    }

    /// Replace the stored result.
    pub fn record(&mut self, result: ApiResult) -> &mut Self {
        self.last = Some(result);
        self
    }

    pub fn result(&self) -> Option<&ApiResult> {
        self.last.as_ref()
    }

    pub fn take(&mut self) -> Option<ApiResult> {
        self.last.take()
    }

    pub async fn to_whatsapp(
        &mut self,
        to: &str,
        prefix: &str,
    ) -> Result<&mut Self, ApipediaError> {
        let previous = self.last.as_ref().ok_or(ApipediaError::NoResult)?;
        let next = self.client.to_whatsapp(previous, to, prefix).await?;
        Ok(self.record(next))
    }

    pub async fn to_telegram(
        &mut self,
        receiver: &str,
        prefix: &str,
    ) -> Result<&mut Self, ApipediaError> {
        let previous = self.last.as_ref().ok_or(ApipediaError::NoResult)?;
        let next = self.client.to_telegram(previous, receiver, prefix).await?;
        Ok(self.record(next))
    }

    pub async fn to_sms(&mut self, to: &str, prefix: &str) -> Result<&mut Self, ApipediaError> {
        let previous = self.last.as_ref().ok_or(ApipediaError::NoResult)?;
        let next = self.client.to_sms(previous, to, prefix).await?;
        Ok(self.record(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use apipedia_core::{ChatFormat, Endpoint};

    #[tokio::test]
    async fn fresh_session_has_nothing_to_relay() {
        let api = Apipedia::with_transport("a", "b", MockTransport::new());
        let mut session = api.session();
        let err = session.to_whatsapp("628", "").await.unwrap_err();
        assert!(matches!(err, ApipediaError::NoResult));
        assert_eq!(api.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn relays_overwrite_the_last_result() {
        let api = Apipedia::with_transport(
            "a",
            "b",
            MockTransport::new()
                .respond(200, r#"{"data":{"text":"sunny"}}"#)
                .respond(200, r#"{"message":"sent"}"#)
                .respond(200, r#"{"message":"delivered"}"#),
        );
        let mut session = api.session();
        let reply = api
            .ai_chat("Weather?", "agent", ChatFormat::Text)
            .await
            .unwrap();
        session
            .record(reply)
            .to_whatsapp("628", "AI: ")
            .await
            .unwrap()
            .to_sms("0811", "")
            .await
            .unwrap();

        let reqs = api.transport().requests();
        assert_eq!(reqs[1].field("message").as_deref(), Some("AI: sunny"));
        // second relay forwards the WhatsApp response, not the chat reply
        assert_eq!(reqs[2].field("msg").as_deref(), Some("sent"));

        let last = session.take().unwrap();
        assert_eq!(last.endpoint, Endpoint::Sms(apipedia_core::SmsTier::Regular));
        assert!(session.result().is_none());
    }
}
