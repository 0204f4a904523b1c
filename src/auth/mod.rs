pub mod jwt;
pub mod middleware;

pub use middleware::{ActorContext, actor_middleware};
