// ui/widgets/mod.rs - UI widgets

pub mod confirm;
pub mod editor_pane;
pub mod settings;
pub mod status_bar;
