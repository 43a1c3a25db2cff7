// Block-page classification against vendor signatures.
// Literal substring/regex matching only; no fingerprinting or bypass.

pub mod classifier;

pub use classifier::{classify, extract_block_info, is_blocked, Verdict, NO_NOTES};
