pub mod attendance;
pub mod role;
pub mod subscription;
pub mod user;
