// command.rs - Editor commands produced by the keymap

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    InsertChar(char),
    DeleteChar,
    Copy,
    ExportFile,
    RequestClear,
    ConfirmClear,
    CancelClear,
    OpenSettings,
    CloseSettings,
    SettingsUp,
    SettingsDown,
    /// Toggle the selected plugin, or cycle its choice forward
    SettingsActivate,
    SettingsNext,
    SettingsPrev,
    Quit,
}
