#![allow(dead_code)]

use rewatch::fs::mock::MockFileSystem;

pub use rewatch_test_utils::builders;
pub use rewatch_test_utils::fake_compiler::{FakeCompiler, FAIL_MARKER};
pub use rewatch_test_utils::{init_tracing, with_timeout, within};

/// The example project used across the integration tests:
///
/// ```text
/// proj/a.src
/// proj/b.src
/// proj/.hidden.src
/// proj/sub/c.src
/// ```
pub fn example_project() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("proj/a.src", "alpha");
    fs.add_file("proj/b.src", "beta");
    fs.add_file("proj/.hidden.src", "hidden");
    fs.add_file("proj/sub/c.src", "gamma");
    fs
}
