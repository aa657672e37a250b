use crate::backend::client::BackendResult;
use crate::AlchemistError;

/// Loading flag and last error shared by the backend-facing containers.
///
/// `begin` before a call, `settle` with its result. Data is only touched by
/// the caller after `settle` returns `Ok`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStatus {
    pub is_loading: bool,
    pub error: Option<String>,
}

impl RequestStatus {
    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn settle<T>(&mut self, result: BackendResult<T>) -> crate::Result<T> {
        self.is_loading = false;
        match result {
            Ok(value) => {
                self.error = None;
                Ok(value)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Record `error` as the visible message and hand it back
    pub fn fail(&mut self, error: AlchemistError) -> AlchemistError {
        self.is_loading = false;
        self.error = Some(match &error {
            AlchemistError::Backend(inner) => inner.to_string(),
            other => other.to_string(),
        });
        error
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;

    #[test]
    fn failure_keeps_backend_message() {
        let mut status = RequestStatus::default();
        status.begin();
        assert!(status.is_loading);

        let result: crate::Result<()> = status.settle(Err(BackendError::NotImplemented));
        assert!(result.is_err());
        assert!(!status.is_loading);
        assert_eq!(status.error.as_deref(), Some("Backend not implemented"));

        status.begin();
        assert!(status.error.is_none(), "a new request hides the previous error");
        assert_eq!(status.settle(Ok(3)).unwrap(), 3);
        assert!(status.error.is_none());
    }
}
