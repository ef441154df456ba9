//! Repeated `sys` calls must not leak argument-vector memory.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicIsize, Ordering};

use eevo_core::eevo::{parse_forms, Evaluator, Value};

struct CountingAlloc;

static LIVE_BYTES: AtomicIsize = AtomicIsize::new(0);

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            LIVE_BYTES.fetch_add(layout.size() as isize, Ordering::SeqCst);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        LIVE_BYTES.fetch_sub(layout.size() as isize, Ordering::SeqCst);
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

#[test]
fn repeated_sys_does_not_grow_the_heap() {
    let forms = parse_forms(r#"(sys "sh" "-c" "exit 3" "padding-argument-to-make-the-vector-larger")"#)
        .expect("parse");
    let mut ev = Evaluator::new();

    for _ in 0..5 {
        assert_eq!(ev.eval_expr(&forms[0]).expect("sys"), Value::Int(3));
    }

    let before = LIVE_BYTES.load(Ordering::SeqCst);
    for _ in 0..50 {
        assert_eq!(ev.eval_expr(&forms[0]).expect("sys"), Value::Int(3));
    }
    let after = LIVE_BYTES.load(Ordering::SeqCst);

    // A leaked vector would cost well over 100 bytes per call.
    assert!(
        after - before < 1024,
        "heap grew by {} bytes over 50 calls",
        after - before
    );
}
