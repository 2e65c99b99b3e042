pub mod dispatch;
pub mod event;
pub mod gate;
pub mod holdable;
pub mod level;
pub mod lever;
pub mod map;
pub mod step;
pub mod world;

#[cfg(test)]
pub mod testkit;
