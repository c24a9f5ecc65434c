pub mod binding;
pub mod block;
pub mod interface;
pub mod range;
