//! Web Push (RFC 8030) delivery with VAPID authentication.
//!
//! Payloads are JSON-encoded [`NotificationPayload`]s encrypted with
//! `aes128gcm`. A single attempt is made; callers treat failures as
//! best-effort and log them.

use async_trait::async_trait;
use cheddit_core::push::NotificationPayload;
use web_push::{
    ContentEncoding, IsahcWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushMessageBuilder,
};

use super::{PushError, PushTransport};

fn delivery_error(err: impl std::fmt::Display) -> PushError {
    PushError::Delivery(err.to_string())
}

/// Sends notifications through the browser vendor's push service.
pub struct WebPushTransport {
    client: IsahcWebPushClient,
    /// URL-safe base64 VAPID private key.
    vapid_private_key: String,
    /// VAPID `sub` claim, a `mailto:` or `https:` contact.
    subject: String,
}

impl WebPushTransport {
    pub fn new(
        vapid_private_key: impl Into<String>,
        subject: impl Into<String>,
    ) -> Result<Self, PushError> {
        let client = IsahcWebPushClient::new().map_err(delivery_error)?;
        Ok(Self {
            client,
            vapid_private_key: vapid_private_key.into(),
            subject: subject.into(),
        })
    }
}

#[async_trait]
impl PushTransport for WebPushTransport {
    async fn send(
        &self,
        subscription: &serde_json::Value,
        payload: &NotificationPayload,
    ) -> Result<(), PushError> {
        let info: SubscriptionInfo = serde_json::from_value(subscription.clone())
            .map_err(|e| PushError::InvalidSubscription(e.to_string()))?;

        let mut signature = VapidSignatureBuilder::from_base64(
            &self.vapid_private_key,
            web_push::URL_SAFE_NO_PAD,
            &info,
        )
        .map_err(delivery_error)?;
        signature.add_claim("sub", self.subject.as_str());
        let signature = signature.build().map_err(delivery_error)?;

        let body = serde_json::to_vec(payload).map_err(delivery_error)?;
        let mut message = WebPushMessageBuilder::new(&info);
        message.set_payload(ContentEncoding::Aes128Gcm, &body);
        message.set_vapid_signature(signature);
        let message = message.build().map_err(delivery_error)?;

        self.client.send(message).await.map_err(delivery_error)?;
        tracing::debug!(endpoint = %info.endpoint, "Push notification accepted");
        Ok(())
    }
}
