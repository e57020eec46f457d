// crates/lino-post/src/lib.rs
//
// lino-post: the post ledger and everything that moves value through posts.
//
// Posts are identified by permlink (author + per-author post id) and carry
// a redistribution split rate, donation/report/upvote/view ledgers, and a
// terminal deleted flag. The donation pipeline settles a donation across the
// target post and, for derivative posts, its source post.

pub mod donation;
pub mod manager;
pub mod model;
pub mod ops;

// Re-export key types for ergonomic access from downstream crates.
pub use donation::{donate, Donation, LegSettlement, Settlement};
pub use manager::{NewPost, PostManager};
pub use model::{Comment, Donations, PostInfo, PostLink, PostMeta, ReportOrUpvote, View};
pub use ops::CreatePost;
