pub mod ask;
pub mod index;
pub mod session;
pub mod upload;
