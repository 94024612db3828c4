#![feature(test)]

extern crate test;

use shared_handle::SharedHandle;
use test::Bencher;

use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[bench]
fn handle_clone_drop(b: &mut Bencher) {
    let handle = SharedHandle::some(10);
    b.iter(|| {
        let v = handle.clone();
        test::black_box(&v);
    });
}

#[bench]
fn rc_clone_drop(b: &mut Bencher) {
    let rc = Rc::new(10);
    b.iter(|| {
        let v = rc.clone();
        test::black_box(&v);
    });
}

#[bench]
fn handle_borrow(b: &mut Bencher) {
    let handle = SharedHandle::some(10);
    b.iter(|| {
        let v = handle.borrow().unwrap();
        test::black_box(&*v);
    });
}

#[bench]
fn handle_reset(b: &mut Bencher) {
    static REF: AtomicUsize = AtomicUsize::new(0);

    struct Foo(usize);

    impl Drop for Foo {
        fn drop(&mut self) {
            REF.fetch_add(1, Ordering::Relaxed);
        }
    }

    b.iter(|| {
        REF.store(0, Ordering::Relaxed);
        let mut handle = SharedHandle::some(Foo(0));
        let readers: Vec<_> = (0..8).map(|_| handle.clone()).collect();
        for i in 1..1000 {
            handle.reset(Box::new(Foo(i)));
        }
        assert_eq!(handle.borrow().unwrap().0, 999);
        drop(readers);
        drop(handle);
        assert_eq!(REF.load(Ordering::Relaxed), 1000);
    });
}
