// lib.rs - Library root for the writeonly capture tool

pub mod cli;
pub mod clipboard;
pub mod clock;
pub mod command;
pub mod config;
pub mod document;
pub mod editor;
pub mod event_bus;
pub mod export;
pub mod keymap;
pub mod mode;
pub mod paths;
pub mod plugin;
pub mod plugins;
pub mod render;
pub mod storage;
pub mod syntax;
pub mod ui;
pub mod validate;
