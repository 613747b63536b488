pub mod fixtures;
pub mod snapdir;

#[doc(hidden)]
pub use insta;
