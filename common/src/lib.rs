pub mod settings;
pub mod utils;
