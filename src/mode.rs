// mode.rs - What the keyboard is currently driving

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Writing,
    /// Clear requested, waiting for y/n
    ConfirmClear,
    Settings,
}

impl Mode {
    pub fn is_modal(self) -> bool {
        self != Mode::Writing
    }
}
