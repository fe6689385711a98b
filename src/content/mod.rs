// Content capture — what we know about each open page before grouping.
//
// The ContentProvider trait is the seam to whatever host actually owns the
// pages. The snapshot provider reads a JSON dump of open pages, which is what
// the CLI uses.

pub mod item;
pub mod provider;
pub mod snapshot;
