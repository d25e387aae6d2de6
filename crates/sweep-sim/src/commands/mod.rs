pub mod expand;
pub mod list;
