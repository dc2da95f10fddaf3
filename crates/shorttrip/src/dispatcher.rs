use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tripview_itinerary::Itinerary;

use crate::{ApiError, SaveRequest, ShortTripApi, SubmitRequest};

/// Single-slot in-flight guard for one page.
///
/// Cloning shares the slot. [`RequestSlot::try_acquire`] hands out at most one
/// [`SlotToken`] at a time; the slot frees itself when that token is dropped, whichever way
/// the request ended.
#[derive(Debug, Clone, Default)]
pub struct RequestSlot(Arc<AtomicBool>);

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<SlotToken> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SlotToken(self.0.clone()))
    }

    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct SlotToken(Arc<AtomicBool>);

impl Drop for SlotToken {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub enum SaveOutcome {
    /// No credential stored; nothing was sent.
    LoginRequired,
    Saved,
    /// The backend rejected the credential.
    Unauthorized,
    Failed(ApiError),
    /// Another request of this page is still in flight; nothing was sent.
    Busy,
}

#[derive(Debug)]
pub enum RetryOutcome {
    Recommended(Itinerary),
    Failed(ApiError),
    Busy,
}

pub struct ActionDispatcher<A> {
    api: A,
}

impl<A: ShortTripApi> ActionDispatcher<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn save(
        &self,
        slot: &RequestSlot,
        credential: Option<&str>,
        request: &SaveRequest,
    ) -> SaveOutcome {
        let Some(credential) = credential.filter(|c| !c.is_empty()) else {
            return SaveOutcome::LoginRequired;
        };

        let Some(_token) = slot.try_acquire() else {
            tracing::debug!("Save ignored, a request is already in flight");
            return SaveOutcome::Busy;
        };

        match self.api.save(credential, request).await {
            Ok(()) => SaveOutcome::Saved,
            Err(ApiError::Unauthorized) => SaveOutcome::Unauthorized,
            Err(err) => {
                tracing::error!(err = %err, "Failed to save itinerary");
                SaveOutcome::Failed(err)
            }
        }
    }

    pub async fn retry(&self, slot: &RequestSlot, request: &SubmitRequest) -> RetryOutcome {
        let Some(_token) = slot.try_acquire() else {
            tracing::debug!("Retry ignored, a request is already in flight");
            return RetryOutcome::Busy;
        };

        match self.api.submit(request).await {
            Ok(itinerary) => RetryOutcome::Recommended(itinerary),
            Err(err) => {
                tracing::error!(err = %err, "Failed to request a new recommendation");
                RetryOutcome::Failed(err)
            }
        }
    }
}
