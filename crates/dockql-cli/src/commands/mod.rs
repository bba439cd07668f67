pub mod info;
pub mod score;
