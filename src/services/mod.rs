pub mod providers;
pub mod recommend;
pub mod session;
