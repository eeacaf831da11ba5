pub mod actions;
pub mod case;
pub mod comment;
pub mod dispatch;
pub mod init;
pub mod push;
pub mod shared;
