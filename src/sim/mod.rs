pub mod board;
pub mod collision;
pub mod controls;
pub mod event;
pub mod frame;
pub mod game;
pub mod movement;
pub mod round;
pub mod state;

#[cfg(test)]
pub mod testkit;
