//! A reference counted handle for sharing one heap resource.
//!
//! [`SharedHandle`] owns a share of a boxed resource together with a counter
//! kept in the same allocation. Cloning a handle bumps the counter, dropping,
//! detaching or resetting it gives the share back, and the resource is freed
//! when the last share goes away.
//!
//! A handle can also be *null*, holding neither resource nor counter. Every
//! access that needs a resource reports [`HandleError`] instead of touching
//! invalid memory.
//!
//! ```
//! use shared_handle::SharedHandle;
//!
//! let mut a = SharedHandle::some(String::from("hello"));
//! let b = a.clone();
//! assert_eq!(b.reference_count(), Ok(2));
//!
//! b.borrow_mut().unwrap().push_str(" world");
//! assert_eq!(*a.borrow().unwrap(), "hello world");
//!
//! a.detach();
//! assert!(a.is_null());
//! assert_eq!(b.reference_count(), Ok(1));
//! ```
#![no_std]

extern crate alloc;

mod error;
mod handle;
mod share;

pub use error::{HandleError, Result};
pub use handle::SharedHandle;
