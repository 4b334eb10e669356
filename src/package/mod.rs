//! npm package module
//!
//! Reads the `package.json` the installer ships in and resolves sibling
//! packages the way Node's module loader does.

mod meta;
mod resolve;

pub use meta::PackageMeta;
pub use resolve::resolve_package_dir;
