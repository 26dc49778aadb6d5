//! Catalogue of shortcut actions a command may name.
//!
//! Commands in the settings file refer to actions by their camelCase name
//! (`"newTab"`, `"setColorScheme"`). Anything not listed here is reported as
//! an unknown action by the settings validator.

/// Actions the terminal knows how to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    /// Explicitly removes any binding for the given keys
    Unbound,
    CopyText,
    PasteText,
    NewTab,
    DuplicateTab,
    CloseTab,
    ClosePane,
    CloseWindow,
    NextTab,
    PrevTab,
    SwitchToTab,
    RenameTab,
    SplitPane,
    MoveFocus,
    ResizePane,
    ScrollUp,
    ScrollDown,
    ScrollToTop,
    ScrollToBottom,
    AdjustFontSize,
    ResetFontSize,
    Find,
    ToggleFullscreen,
    ToggleFocusMode,
    OpenSettings,
    OpenNewTabDropdown,
    ToggleCommandPalette,
    SetColorScheme,
    SendInput,
    Quit,
}

impl ShortcutAction {
    /// Every action, in catalogue order.
    pub fn variants() -> &'static [ShortcutAction] {
        use ShortcutAction::*;
        &[
            Unbound,
            CopyText,
            PasteText,
            NewTab,
            DuplicateTab,
            CloseTab,
            ClosePane,
            CloseWindow,
            NextTab,
            PrevTab,
            SwitchToTab,
            RenameTab,
            SplitPane,
            MoveFocus,
            ResizePane,
            ScrollUp,
            ScrollDown,
            ScrollToTop,
            ScrollToBottom,
            AdjustFontSize,
            ResetFontSize,
            Find,
            ToggleFullscreen,
            ToggleFocusMode,
            OpenSettings,
            OpenNewTabDropdown,
            ToggleCommandPalette,
            SetColorScheme,
            SendInput,
            Quit,
        ]
    }

    /// The name used in settings files.
    pub fn name(&self) -> &'static str {
        match self {
            ShortcutAction::Unbound => "unbound",
            ShortcutAction::CopyText => "copy",
            ShortcutAction::PasteText => "paste",
            ShortcutAction::NewTab => "newTab",
            ShortcutAction::DuplicateTab => "duplicateTab",
            ShortcutAction::CloseTab => "closeTab",
            ShortcutAction::ClosePane => "closePane",
            ShortcutAction::CloseWindow => "closeWindow",
            ShortcutAction::NextTab => "nextTab",
            ShortcutAction::PrevTab => "prevTab",
            ShortcutAction::SwitchToTab => "switchToTab",
            ShortcutAction::RenameTab => "renameTab",
            ShortcutAction::SplitPane => "splitPane",
            ShortcutAction::MoveFocus => "moveFocus",
            ShortcutAction::ResizePane => "resizePane",
            ShortcutAction::ScrollUp => "scrollUp",
            ShortcutAction::ScrollDown => "scrollDown",
            ShortcutAction::ScrollToTop => "scrollToTop",
            ShortcutAction::ScrollToBottom => "scrollToBottom",
            ShortcutAction::AdjustFontSize => "adjustFontSize",
            ShortcutAction::ResetFontSize => "resetFontSize",
            ShortcutAction::Find => "find",
            ShortcutAction::ToggleFullscreen => "toggleFullscreen",
            ShortcutAction::ToggleFocusMode => "toggleFocusMode",
            ShortcutAction::OpenSettings => "openSettings",
            ShortcutAction::OpenNewTabDropdown => "openNewTabDropdown",
            ShortcutAction::ToggleCommandPalette => "commandPalette",
            ShortcutAction::SetColorScheme => "setColorScheme",
            ShortcutAction::SendInput => "sendInput",
            ShortcutAction::Quit => "quit",
        }
    }

    /// Look up an action by its settings-file name (exact, case-sensitive).
    pub fn from_name(name: &str) -> Option<ShortcutAction> {
        Self::variants().iter().copied().find(|a| a.name() == name)
    }

    /// Whether this action takes a `colorScheme` argument.
    pub fn accepts_color_scheme(&self) -> bool {
        matches!(
            self,
            ShortcutAction::SetColorScheme
                | ShortcutAction::NewTab
                | ShortcutAction::SplitPane
                | ShortcutAction::DuplicateTab
        )
    }
}
