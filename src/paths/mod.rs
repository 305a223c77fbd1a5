// Search-path handling
// - rewriter.rs: version-directory rewriting, packages-dir relocation,
//   existence filtering

pub mod rewriter;
