//! Conversion des événements clavier Winit vers les types Servo.
//!
//! Servo utilise les types de `keyboard_types` (ré-exportés depuis `servo::`)
//! tandis que Winit a ses propres types dans `winit::keyboard`. Les deux
//! suivent les noms W3C : les tables ci-dessous associent les variantes de
//! même nom, et les quelques divergences sont traitées à part.

use servo::{Code, Key, KeyState, KeyboardEvent, Location, Modifiers, NamedKey};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{
    Key as WinitKey, KeyCode, KeyLocation as WinitKeyLocation, ModifiersState,
    NamedKey as WinitNamedKey, PhysicalKey,
};

/// Génère un `match` qui associe chaque variante Winit à la variante
/// Servo de même nom, `$fallback` pour le reste.
macro_rules! same_name {
    ($value:expr, $from:ident => $to:ident, $fallback:expr; $($name:ident),* $(,)?) => {
        match $value {
            $($from::$name => $to::$name,)*
            _ => $fallback,
        }
    };
}

/// Convertit un `KeyEvent` Winit + état des modificateurs en `KeyboardEvent` Servo.
pub fn keyboard_event_from_winit(key_event: &KeyEvent, state: ModifiersState) -> KeyboardEvent {
    KeyboardEvent::new_without_event(
        key_state_from_winit(key_event.state),
        key_from_winit(&key_event.logical_key),
        code_from_winit(&key_event.physical_key),
        location_from_winit(key_event.location),
        modifiers_from_winit(state),
        key_event.repeat,
        false,
    )
}

fn key_state_from_winit(state: ElementState) -> KeyState {
    match state {
        ElementState::Pressed => KeyState::Down,
        ElementState::Released => KeyState::Up,
    }
}

fn key_from_winit(logical_key: &WinitKey) -> Key {
    match logical_key {
        WinitKey::Character(string) => Key::Character(string.to_string()),
        // W3C : la barre d'espace produit le caractère " ", pas une touche nommée.
        WinitKey::Named(WinitNamedKey::Space) => Key::Character(" ".to_string()),
        WinitKey::Named(named) => Key::Named(named_key_from_winit(*named)),
        WinitKey::Unidentified(_) | WinitKey::Dead(_) => Key::Named(NamedKey::Unidentified),
    }
}

#[allow(deprecated)]
fn named_key_from_winit(named: WinitNamedKey) -> NamedKey {
    same_name!(named, WinitNamedKey => NamedKey, NamedKey::Unidentified;
        AVRInput, AVRPower, Accept, Again, AllCandidates, Alphanumeric, Alt, AltGraph,
        AppSwitch, ArrowDown, ArrowLeft, ArrowRight, ArrowUp, Attn, AudioBalanceLeft,
        AudioBalanceRight, AudioBassBoostDown, AudioBassBoostToggle, AudioBassBoostUp,
        AudioFaderFront, AudioFaderRear, AudioSurroundModeNext, AudioTrebleDown,
        AudioTrebleUp, AudioVolumeDown, AudioVolumeMute, AudioVolumeUp, Backspace,
        BrightnessDown, BrightnessUp, BrowserBack, BrowserFavorites, BrowserForward,
        BrowserHome, BrowserRefresh, BrowserSearch, BrowserStop, Call, Camera, CameraFocus,
        Cancel, CapsLock, ChannelDown, ChannelUp, Clear, Close, ClosedCaptionToggle,
        CodeInput, ColorF0Red, ColorF1Green, ColorF2Yellow, ColorF3Blue, ColorF4Grey,
        ColorF5Brown, Compose, ContextMenu, Control, Convert, Copy, CrSel, Cut, DVR, Delete,
        Dimmer, DisplaySwap, Eisu, Eject, End, EndCall, Enter, EraseEof, Escape, ExSel,
        Execute, Exit, F1, F10, F11, F12, F13, F14, F15, F16, F17, F18, F19, F2, F20, F21,
        F22, F23, F24, F25, F26, F27, F28, F29, F3, F30, F31, F32, F33, F34, F35, F4, F5,
        F6, F7, F8, F9, FavoriteClear0, FavoriteClear1, FavoriteClear2, FavoriteClear3,
        FavoriteRecall0, FavoriteRecall1, FavoriteRecall2, FavoriteRecall3, FavoriteStore0,
        FavoriteStore1, FavoriteStore2, FavoriteStore3, FinalMode, Find, Fn, FnLock, GoBack,
        GoHome, GroupFirst, GroupLast, GroupNext, GroupPrevious, Guide, GuideNextDay,
        GuidePreviousDay, HangulMode, HanjaMode, Hankaku, HeadsetHook, Help, Hibernate,
        Hiragana, HiraganaKatakana, Home, Hyper, Info, Insert, InstantReplay, JunjaMode,
        KanaMode, KanjiMode, Katakana, Key11, Key12, LastNumberRedial, LaunchApplication1,
        LaunchApplication2, LaunchCalendar, LaunchContacts, LaunchMail, LaunchMediaPlayer,
        LaunchMusicPlayer, LaunchPhone, LaunchScreenSaver, LaunchSpreadsheet,
        LaunchWebBrowser, LaunchWebCam, LaunchWordProcessor, Link, ListProgram, LiveContent,
        Lock, LogOff, MailForward, MailReply, MailSend, MannerMode, MediaApps,
        MediaAudioTrack, MediaClose, MediaFastForward, MediaLast, MediaPause, MediaPlay,
        MediaPlayPause, MediaRecord, MediaRewind, MediaSkipBackward, MediaSkipForward,
        MediaStepBackward, MediaStepForward, MediaStop, MediaTopMenu, MediaTrackNext,
        MediaTrackPrevious, Meta, MicrophoneToggle, MicrophoneVolumeDown,
        MicrophoneVolumeMute, MicrophoneVolumeUp, ModeChange, NavigateIn, NavigateNext,
        NavigateOut, NavigatePrevious, New, NextCandidate, NextFavoriteChannel,
        NextUserProfile, NonConvert, Notification, NumLock, OnDemand, Open, PageDown,
        PageUp, Pairing, Paste, Pause, PinPDown, PinPMove, PinPToggle, PinPUp, Play,
        PlaySpeedDown, PlaySpeedReset, PlaySpeedUp, Power, PowerOff, PreviousCandidate,
        Print, PrintScreen, Process, Props, RandomToggle, RcLowBattery, RecordSpeedNext,
        Redo, RfBypass, Romaji, STBInput, STBPower, Save, ScanChannelsToggle,
        ScreenModeNext, ScrollLock, Select, Settings, Shift, SingleCandidate, Soft1, Soft2,
        Soft3, Soft4, SpeechCorrectionList, SpeechInputToggle, SpellCheck,
        SplitScreenToggle, Standby, Subtitle, Super, Symbol, SymbolLock, TV, TV3DMode,
        TVAntennaCable, TVAudioDescription, TVAudioDescriptionMixDown,
        TVAudioDescriptionMixUp, TVContentsMenu, TVDataService, TVInput, TVInputComponent1,
        TVInputComponent2, TVInputComposite1, TVInputComposite2, TVInputHDMI1, TVInputHDMI2,
        TVInputHDMI3, TVInputHDMI4, TVInputVGA1, TVMediaContext, TVNetwork, TVNumberEntry,
        TVPower, TVRadioService, TVSatellite, TVSatelliteBS, TVSatelliteCS,
        TVSatelliteToggle, TVTerrestrialAnalog, TVTerrestrialDigital, TVTimer, Tab,
        Teletext, Undo, VideoModeNext, VoiceDial, WakeUp, Wink, Zenkaku, ZenkakuHankaku,
        ZoomIn, ZoomOut, ZoomToggle,
    )
}

fn location_from_winit(location: WinitKeyLocation) -> Location {
    match location {
        WinitKeyLocation::Left => Location::Left,
        WinitKeyLocation::Numpad => Location::Numpad,
        WinitKeyLocation::Right => Location::Right,
        WinitKeyLocation::Standard => Location::Standard,
    }
}

#[allow(deprecated)]
fn code_from_winit(physical_key: &PhysicalKey) -> Code {
    let key_code = match physical_key {
        PhysicalKey::Code(key_code) => *key_code,
        PhysicalKey::Unidentified(_) => return Code::Unidentified,
    };

    match key_code {
        KeyCode::Meta => Code::Super,
        KeyCode::SuperLeft => Code::MetaLeft,
        KeyCode::SuperRight => Code::MetaRight,
        other => same_name!(other, KeyCode => Code, Code::Unidentified;
            Abort, Again, AltLeft, AltRight, ArrowDown, ArrowLeft, ArrowRight, ArrowUp,
            AudioVolumeDown, AudioVolumeMute, AudioVolumeUp, Backquote, Backslash, Backspace,
            BracketLeft, BracketRight, BrowserBack, BrowserFavorites, BrowserForward,
            BrowserHome, BrowserRefresh, BrowserSearch, BrowserStop, CapsLock, Comma,
            ContextMenu, ControlLeft, ControlRight, Convert, Copy, Cut, Delete, Digit0, Digit1,
            Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9, Eject, End, Enter,
            Equal, Escape, F1, F10, F11, F12, F13, F14, F15, F16, F17, F18, F19, F2, F20, F21,
            F22, F23, F24, F25, F26, F27, F28, F29, F3, F30, F31, F32, F33, F34, F35, F4, F5,
            F6, F7, F8, F9, Find, Fn, FnLock, Help, Hiragana, Home, Hyper, Insert,
            IntlBackslash, IntlRo, IntlYen, KanaMode, Katakana, KeyA, KeyB, KeyC, KeyD, KeyE,
            KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR, KeyS,
            KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ, Lang1, Lang2, Lang3, Lang4, Lang5,
            LaunchApp1, LaunchApp2, LaunchMail, MediaPlayPause, MediaSelect, MediaStop,
            MediaTrackNext, MediaTrackPrevious, Minus, NonConvert, NumLock, Numpad0, Numpad1,
            Numpad2, Numpad3, Numpad4, Numpad5, Numpad6, Numpad7, Numpad8, Numpad9, NumpadAdd,
            NumpadBackspace, NumpadClear, NumpadClearEntry, NumpadComma, NumpadDecimal,
            NumpadDivide, NumpadEnter, NumpadEqual, NumpadHash, NumpadMemoryAdd,
            NumpadMemoryClear, NumpadMemoryRecall, NumpadMemoryStore, NumpadMemorySubtract,
            NumpadMultiply, NumpadParenLeft, NumpadParenRight, NumpadStar, NumpadSubtract, Open,
            PageDown, PageUp, Paste, Pause, Period, Power, PrintScreen, Props, Quote, Resume,
            ScrollLock, Select, Semicolon, ShiftLeft, ShiftRight, Slash, Sleep, Space, Suspend,
            Tab, Turbo, Undo, WakeUp,
        ),
    }
}

fn modifiers_from_winit(mods: ModifiersState) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::CONTROL, mods.control_key());
    modifiers.set(Modifiers::SHIFT, mods.shift_key());
    modifiers.set(Modifiers::ALT, mods.alt_key());
    modifiers.set(Modifiers::META, mods.super_key());
    modifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_state() {
        assert_eq!(key_state_from_winit(ElementState::Pressed), KeyState::Down);
        assert_eq!(key_state_from_winit(ElementState::Released), KeyState::Up);
    }

    #[test]
    fn test_character_keys() {
        assert_eq!(
            key_from_winit(&WinitKey::Character("a".into())),
            Key::Character("a".to_string())
        );
        assert_eq!(
            key_from_winit(&WinitKey::Character("é".into())),
            Key::Character("é".to_string())
        );
    }

    #[test]
    fn test_space_is_a_character() {
        assert_eq!(
            key_from_winit(&WinitKey::Named(WinitNamedKey::Space)),
            Key::Character(" ".to_string())
        );
    }

    #[test]
    fn test_named_keys_by_name() {
        let pairs = [
            (WinitNamedKey::Enter, NamedKey::Enter),
            (WinitNamedKey::Escape, NamedKey::Escape),
            (WinitNamedKey::Backspace, NamedKey::Backspace),
            (WinitNamedKey::Tab, NamedKey::Tab),
            (WinitNamedKey::ArrowLeft, NamedKey::ArrowLeft),
            (WinitNamedKey::PageDown, NamedKey::PageDown),
            (WinitNamedKey::F5, NamedKey::F5),
            (WinitNamedKey::Control, NamedKey::Control),
            (WinitNamedKey::BrowserBack, NamedKey::BrowserBack),
        ];
        for (winit_key, servo_key) in pairs {
            assert_eq!(
                key_from_winit(&WinitKey::Named(winit_key)),
                Key::Named(servo_key)
            );
        }
    }

    #[test]
    fn test_uncommon_named_keys_are_mapped() {
        let pairs = [
            (WinitNamedKey::F35, NamedKey::F35),
            (WinitNamedKey::MediaPlayPause, NamedKey::MediaPlayPause),
            (WinitNamedKey::AudioVolumeMute, NamedKey::AudioVolumeMute),
            (WinitNamedKey::TVInputHDMI4, NamedKey::TVInputHDMI4),
            (WinitNamedKey::ZenkakuHankaku, NamedKey::ZenkakuHankaku),
            (WinitNamedKey::ZoomToggle, NamedKey::ZoomToggle),
        ];
        for (winit_key, servo_key) in pairs {
            assert_eq!(named_key_from_winit(winit_key), servo_key);
        }
    }

    #[test]
    fn test_dead_key_is_unidentified() {
        assert_eq!(
            key_from_winit(&WinitKey::Dead(None)),
            Key::Named(NamedKey::Unidentified)
        );
    }

    #[test]
    fn test_location() {
        assert_eq!(location_from_winit(WinitKeyLocation::Standard), Location::Standard);
        assert_eq!(location_from_winit(WinitKeyLocation::Left), Location::Left);
        assert_eq!(location_from_winit(WinitKeyLocation::Right), Location::Right);
        assert_eq!(location_from_winit(WinitKeyLocation::Numpad), Location::Numpad);
    }

    #[test]
    fn test_codes_by_name() {
        let pairs = [
            (KeyCode::KeyA, Code::KeyA),
            (KeyCode::Digit1, Code::Digit1),
            (KeyCode::Space, Code::Space),
            (KeyCode::Enter, Code::Enter),
            (KeyCode::Numpad0, Code::Numpad0),
            (KeyCode::ShiftLeft, Code::ShiftLeft),
            (KeyCode::F12, Code::F12),
            (KeyCode::Backquote, Code::Backquote),
            (KeyCode::NumpadEnter, Code::NumpadEnter),
            (KeyCode::IntlBackslash, Code::IntlBackslash),
        ];
        for (winit_code, servo_code) in pairs {
            assert_eq!(code_from_winit(&PhysicalKey::Code(winit_code)), servo_code);
        }
    }

    #[test]
    fn test_super_keys_map_to_meta_codes() {
        assert_eq!(code_from_winit(&PhysicalKey::Code(KeyCode::Meta)), Code::Super);
        assert_eq!(
            code_from_winit(&PhysicalKey::Code(KeyCode::SuperLeft)),
            Code::MetaLeft
        );
        assert_eq!(
            code_from_winit(&PhysicalKey::Code(KeyCode::SuperRight)),
            Code::MetaRight
        );
    }

    #[test]
    fn test_modifiers() {
        let mods = modifiers_from_winit(ModifiersState::CONTROL | ModifiersState::ALT);
        assert!(mods.contains(Modifiers::CONTROL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert!(!mods.contains(Modifiers::META));
    }
}
