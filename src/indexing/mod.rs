pub mod loader;
pub mod locator;
pub mod package;

pub use loader::PackageLoader;
pub use locator::PackageLocator;
pub use package::{PackageScan, ParsedFile};
