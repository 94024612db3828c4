use core::cell::{BorrowError, BorrowMutError};
use thiserror::Error;

/// Errors reported by fallible [`SharedHandle`](crate::SharedHandle) accessors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleError {
    /// the handle is in the null state, it has no resource and no counter
    #[error("operation on null handle")]
    NullHandle,

    /// the handle owns a counter but was bound to an absent resource
    #[error("handle manages no resource")]
    EmptyResource,

    /// the resource is already borrowed in a conflicting way
    #[error("resource is already borrowed")]
    Borrowed,
}

impl From<BorrowError> for HandleError {
    #[cold]
    fn from(_: BorrowError) -> Self {
        HandleError::Borrowed
    }
}

impl From<BorrowMutError> for HandleError {
    #[cold]
    fn from(_: BorrowMutError) -> Self {
        HandleError::Borrowed
    }
}

/// result of a fallible handle access
pub type Result<T> = core::result::Result<T, HandleError>;
