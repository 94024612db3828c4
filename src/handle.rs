use alloc::boxed::Box;
use core::cell::{Ref, RefMut};
use core::fmt;
use core::ptr::{self, NonNull};

use crate::error::{HandleError, Result};
use crate::share::Share;

//---------------------------------------------------------------------------------------
// SharedHandle
//---------------------------------------------------------------------------------------

/// A counted handle to a heap resource shared with every clone of it.
///
/// A handle is either *active*, holding a share of a counter and the resource
/// bound to it, or *null*, holding nothing at all. The resource is freed
/// exactly once, when the last active handle of it is dropped, detached or
/// reset to another resource.
///
/// The counter is not atomic, the handle is neither `Send` nor `Sync`.
pub struct SharedHandle<T> {
    share: Option<Share<T>>,
}

impl<T> Default for SharedHandle<T> {
    fn default() -> Self {
        SharedHandle::null()
    }
}

impl<T> From<Box<T>> for SharedHandle<T> {
    fn from(resource: Box<T>) -> Self {
        SharedHandle::new(resource)
    }
}

impl<T> From<Option<Box<T>>> for SharedHandle<T> {
    fn from(resource: Option<Box<T>>) -> Self {
        SharedHandle::new(resource)
    }
}

impl<T> Clone for SharedHandle<T> {
    /// alias the same resource and bump the shared counter, a null handle
    /// clones into another null handle
    #[inline]
    fn clone(&self) -> Self {
        SharedHandle {
            share: self.share.clone(),
        }
    }

    #[inline]
    fn clone_from(&mut self, source: &Self) {
        self.assign(source)
    }
}

impl<T> SharedHandle<T> {
    /// create a null handle, it holds no resource and no counter
    #[inline]
    pub const fn null() -> Self {
        SharedHandle { share: None }
    }

    /// take ownership of a boxed resource and start a new counter at 1
    ///
    /// Passing `None` still yields an active handle with a counter, bound to
    /// an absent resource. Use [`SharedHandle::null`] for a null handle.
    #[inline]
    pub fn new(resource: impl Into<Option<Box<T>>>) -> Self {
        SharedHandle {
            share: Some(Share::new(resource.into())),
        }
    }

    /// box `data` and manage it with a new counter
    #[inline]
    pub fn some(data: T) -> Self {
        Self::new(Box::new(data))
    }

    /// check if the handle is in the null state
    #[inline]
    pub fn is_null(&self) -> bool {
        self.share.is_none()
    }

    /// check if there is no resource to reach through the handle, either
    /// because it is null or because it was bound to an absent resource
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.share.as_ref().map_or(true, Share::is_empty)
    }

    /// check if this is the only active handle of its resource
    #[inline]
    pub fn is_unique(&self) -> bool {
        self.share.as_ref().is_some_and(|share| share.count() == 1)
    }

    #[inline]
    fn share(&self) -> Result<&Share<T>> {
        self.share.as_ref().ok_or(HandleError::NullHandle)
    }

    /// number of active handles sharing the resource
    #[inline]
    pub fn reference_count(&self) -> Result<usize> {
        self.share().map(Share::count)
    }

    /// raw pointer to the resource, null if there is none. The counter is
    /// not touched and the pointer is only valid while a share is alive.
    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.share.as_ref().map_or(ptr::null_mut(), Share::as_ptr)
    }

    /// non null pointer to the resource, fails if there is none to point at
    #[inline]
    pub fn resource_ptr(&self) -> Result<NonNull<T>> {
        NonNull::new(self.share()?.as_ptr()).ok_or(HandleError::EmptyResource)
    }

    /// immutably borrow the resource
    pub fn borrow(&self) -> Result<Ref<'_, T>> {
        let cell = self.share()?.cell().ok_or(HandleError::EmptyResource)?;
        let guard = cell.try_borrow()?;
        Ok(Ref::map(guard, |boxed| &**boxed))
    }

    /// mutably borrow the resource, the change is seen through every handle
    /// sharing it
    pub fn borrow_mut(&self) -> Result<RefMut<'_, T>> {
        let cell = self.share()?.cell().ok_or(HandleError::EmptyResource)?;
        let guard = cell.try_borrow_mut()?;
        Ok(RefMut::map(guard, |boxed| &mut **boxed))
    }

    /// release the current share and alias the share of `other`
    ///
    /// Nothing happens if both handles already share the same counter, or
    /// are both null.
    pub fn assign(&mut self, other: &Self) {
        if Self::ptr_eq(self, other) {
            return;
        }
        self.release();
        self.share = other.share.clone();
    }

    /// release the current share and manage `resource` with a new counter
    /// at 1, other handles of the old resource are not affected
    pub fn reset(&mut self, resource: impl Into<Option<Box<T>>>) {
        self.release();
        self.share = Some(Share::new(resource.into()));
    }

    /// release the current share and leave the handle null
    #[inline]
    pub fn detach(&mut self) {
        self.release();
    }

    /// move the share out into a new handle, leaving this one null. The
    /// counter is not touched.
    #[inline]
    pub fn take(&mut self) -> Self {
        SharedHandle {
            share: self.share.take(),
        }
    }

    /// give the boxed resource back if this is the last handle of it,
    /// otherwise the handle is returned unchanged
    pub fn try_unwrap(mut self) -> core::result::Result<Option<Box<T>>, Self> {
        match self.share.take() {
            None => Ok(None),
            Some(share) => share
                .try_unwrap()
                .map_err(|share| SharedHandle { share: Some(share) }),
        }
    }

    /// check if two handles share the same counter, two null handles are equal
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        match (&this.share, &other.share) {
            (Some(a), Some(b)) => Share::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    #[inline]
    fn release(&mut self) {
        // dropping the share runs the decrement, the last one frees
        drop(self.share.take());
    }
}

struct Placeholder(&'static str);

impl fmt::Debug for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let share = match &self.share {
            Some(share) => share,
            None => {
                return f
                    .debug_tuple("SharedHandle")
                    .field(&Placeholder("null"))
                    .finish()
            }
        };

        let mut d = f.debug_struct("SharedHandle");
        d.field("count", &share.count());
        match share.cell().map(|cell| cell.try_borrow()) {
            Some(Ok(value)) => d.field("resource", &**value),
            Some(Err(_)) => d.field("resource", &Placeholder("<borrowed>")),
            None => d.field("resource", &Placeholder("<empty>")),
        };
        d.finish()
    }
}
