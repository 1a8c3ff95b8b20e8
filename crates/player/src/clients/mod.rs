pub mod move_session;

pub use move_session::MoveSessionClient;
