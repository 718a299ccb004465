
use std::{
    cell::Cell,
    rc::Rc,
};

use crate::Array;

macro_rules! log_prelude {
    () => {
        // run single-threaded with --nocapture to read the reallocation trace
        let _ = simple_logger::SimpleLogger::new().without_timestamps().init();
    };
}

mod iter;

/// Counts how many times values sharing the same counter were dropped.
#[derive(Debug, Clone)]
struct DropCounter{
    drops: Rc<Cell<usize>>,
}

impl DropCounter {
    fn new(drops:&Rc<Cell<usize>>) -> Self {
        Self{
            drops: Rc::clone(drops),
        }
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// An array holding `0..n`, grown one push at a time.
fn counted(n:i32) -> Array<i32> {
    let mut holder = Array::new();
    for elem in 0..n {
        holder.push_back(elem).unwrap();
    }
    holder
}
