#![no_main]

use dsforest::core::fuzzing::{arbitrary_ops, check_forest, Op};
use libfuzzer_sys::arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Debug)]
struct TestCase {
    num_nodes: usize,
    ops: Vec<Op>,
}

impl Arbitrary<'_> for TestCase {
    fn arbitrary(u: &mut Unstructured<'_>) -> arbitrary::Result<Self> {
        let (num_nodes, ops) = arbitrary_ops(u)?;
        Ok(TestCase { num_nodes, ops })
    }
}

fuzz_target!(|testcase: TestCase| {
    check_forest(testcase.num_nodes, &testcase.ops);
});
