pub mod app;
mod board;
mod deck;
mod dialogs;
mod game;
mod grid;
mod hud;
mod quiz;
mod scene;
mod session;
mod state;
mod sync;
