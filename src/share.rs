use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::ptr;

use log::trace;

//---------------------------------------------------------------------------------------
// Share
//---------------------------------------------------------------------------------------

/// The allocation that every handle of one resource points at.
/// The counter lives in the `Rc` header, right next to the resource slot.
struct Inner<T> {
    resource: Option<RefCell<Box<T>>>,
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        trace!(
            "last handle released, freeing share (resource present: {})",
            self.resource.is_some()
        );
    }
}

/// One counted share of a resource, cloning it bumps the counter
pub(crate) struct Share<T>(Rc<Inner<T>>);

impl<T> Clone for Share<T> {
    #[inline]
    fn clone(&self) -> Self {
        Share(Rc::clone(&self.0))
    }
}

impl<T> Share<T> {
    /// start a brand new counter at 1 bound to `resource`
    pub(crate) fn new(resource: Option<Box<T>>) -> Self {
        trace!(
            "new share created (resource present: {})",
            resource.is_some()
        );
        Share(Rc::new(Inner {
            resource: resource.map(RefCell::new),
        }))
    }

    #[inline]
    pub(crate) fn count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    #[inline]
    pub(crate) fn cell(&self) -> Option<&RefCell<Box<T>>> {
        self.0.resource.as_ref()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.0.resource.is_none()
    }

    /// address of the boxed resource, null if the share was bound to nothing
    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut T {
        match &self.0.resource {
            // SAFETY: only the box pointer is read, no reference to the
            // resource is created, so outstanding borrows are not disturbed
            Some(cell) => unsafe { ptr::addr_of_mut!(**cell.as_ptr()) },
            None => ptr::null_mut(),
        }
    }

    #[inline]
    pub(crate) fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.0, &other.0)
    }

    /// hand the resource back if this is the only share left
    pub(crate) fn try_unwrap(self) -> Result<Option<Box<T>>, Self> {
        match Rc::try_unwrap(self.0) {
            Ok(mut inner) => Ok(inner.resource.take().map(RefCell::into_inner)),
            Err(rc) => Err(Share(rc)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn share_counts() {
        let a = Share::new(Some(Box::new(10)));
        assert_eq!(a.count(), 1);
        let b = a.clone();
        assert_eq!(a.count(), 2);
        assert!(Share::ptr_eq(&a, &b));
        drop(b);
        assert_eq!(a.count(), 1);
    }

    #[test]
    fn share_keeps_box_address() {
        let boxed = Box::new(42u64);
        let addr = &*boxed as *const u64 as *mut u64;
        let a = Share::new(Some(boxed));
        assert_eq!(a.as_ptr(), addr);
        let guard = a.cell().unwrap().borrow_mut();
        assert_eq!(a.as_ptr(), addr);
        drop(guard);
    }

    #[test]
    fn empty_share() {
        let a = Share::<u8>::new(None);
        assert!(a.is_empty());
        assert!(a.cell().is_none());
        assert!(a.as_ptr().is_null());
        assert_eq!(a.count(), 1);
    }

    #[test]
    fn share_drops_resource_once() {
        static REF: AtomicUsize = AtomicUsize::new(0);
        struct Foo;
        impl Drop for Foo {
            fn drop(&mut self) {
                REF.fetch_add(1, Ordering::Relaxed);
            }
        }

        let a = Share::new(Some(Box::new(Foo)));
        let b = a.clone();
        drop(a);
        assert_eq!(REF.load(Ordering::Relaxed), 0);
        drop(b);
        assert_eq!(REF.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn share_try_unwrap() {
        let a = Share::new(Some(Box::new(7)));
        let b = a.clone();
        let a = a.try_unwrap().err().unwrap();
        assert_eq!(a.count(), 2);
        drop(b);
        let boxed = a.try_unwrap().ok().unwrap();
        assert_eq!(boxed.as_deref(), Some(&7));
    }
}
