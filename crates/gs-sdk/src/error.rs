use gs_types::Fingerprint;
use thiserror::Error;

use crate::codec::DecodeError;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("decode failed: {0}")]
    DecodeFailed(#[from] DecodeError),

    #[error("image not found: {0}")]
    NotFound(Fingerprint),

    #[error("store error: {0}")]
    Store(#[from] gs_store::StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type SdkResult<T> = Result<T, SdkError>;
