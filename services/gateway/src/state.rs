use crate::clock::{Clock, SystemClock};
use crate::error::AppError;
use crate::extractor::Extractor;
use crate::store::PetStore;
use std::sync::{Arc, Mutex, MutexGuard};
use types::variant::ParserVariant;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<PetStore>>,
    pub extractor: Extractor,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(variant: ParserVariant) -> Self {
        Self::with_clock(variant, Arc::new(SystemClock))
    }

    pub fn with_clock(variant: ParserVariant, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(Mutex::new(PetStore::new())),
            extractor: Extractor::new(variant),
            clock,
        }
    }

    /// Lock the store. Never hold the guard across an `.await`.
    pub fn store(&self) -> Result<MutexGuard<'_, PetStore>, AppError> {
        self.store
            .lock()
            .map_err(|_| AppError::InternalError(anyhow::anyhow!("Pet store lock poisoned")))
    }
}
