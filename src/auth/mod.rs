//! One-time-password sign-in

use std::sync::Arc;
use tracing::info;

use crate::backend::{AuthUser, Backend, RequestStatus};
use crate::{AlchemistError, Result};

pub struct AuthStore {
    backend: Arc<dyn Backend>,
    user: Option<AuthUser>,
    /// Address the last code was sent to
    pending_email: Option<String>,
    status: RequestStatus,
}

impl AuthStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            user: None,
            pending_email: None,
            status: RequestStatus::default(),
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn pending_email(&self) -> Option<&str> {
        self.pending_email.as_deref()
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    pub async fn send_otp(&mut self, email: &str) -> Result<()> {
        let email = email.trim();
        self.status.begin();
        let result = self.backend.send_otp(email).await;
        self.status.settle(result)?;

        self.pending_email = Some(email.to_string());
        Ok(())
    }

    /// Verify `code` against the address from the last `send_otp`
    pub async fn verify_otp(&mut self, code: &str) -> Result<&AuthUser> {
        let Some(email) = self.pending_email.clone() else {
            return Err(self.status.fail(AlchemistError::Other(
                "Request a sign-in code first".to_string(),
            )));
        };

        self.status.begin();
        let result = self.backend.verify_otp(&email, code.trim()).await;
        let user = self.status.settle(result)?;

        info!("Signed in as {}", user.email);
        self.pending_email = None;
        Ok(&*self.user.insert(user))
    }

    pub async fn logout(&mut self) -> Result<()> {
        self.status.begin();
        let result = self.backend.logout().await;
        self.status.settle(result)?;

        self.user = None;
        self.pending_email = None;
        Ok(())
    }
}
