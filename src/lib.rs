pub mod extract;
pub mod utils;
pub mod writer;
