//! Platform and input-kind detection, and the activation profiles that hide
//! platform differences behind one validity predicate.
//!
//! The original duck-typed `if mac ... else if touch ...` dispatch is
//! reframed as a closed set of [`PlatformProfile`] values selected once at
//! startup: each carries the native event names to bind and the rules for
//! what counts as a gesture start and when default actions get suppressed.

#[cfg(test)]
#[path = "platform_test.rs"]
mod platform_test;

/// Host operating system, derived once from environment strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Mac,
    Windows,
    Linux,
    Android,
    Ios,
    Unknown,
}

impl Platform {
    /// Classify from `navigator.platform` and `navigator.userAgent`.
    /// Matching is case-insensitive. iOS is checked before mac because
    /// iPhone user agents also claim "like Mac OS X".
    #[must_use]
    pub fn detect(platform_str: &str, user_agent: &str) -> Self {
        let p = platform_str.to_ascii_lowercase();
        let ua = user_agent.to_ascii_lowercase();

        let ios_device = ["iphone", "ipad", "ipod"]
            .iter()
            .any(|d| p.contains(d) || ua.contains(d));
        if ios_device {
            Self::Ios
        } else if p.contains("mac") || p.contains("darwin") || ua.contains("mac os") {
            Self::Mac
        } else if p.contains("win") {
            Self::Windows
        } else if ua.contains("android") {
            Self::Android
        } else if p.contains("linux") {
            Self::Linux
        } else {
            Self::Unknown
        }
    }

    /// Whether this platform is heuristically a mobile device.
    #[must_use]
    pub fn is_mobile(self) -> bool {
        matches!(self, Self::Android | Self::Ios)
    }

    /// Stable lowercase name, for logging and debug accessors.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Mac => "mac",
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Unknown => "unknown",
        }
    }
}

/// Which family of native input events drives the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Touch events; requires touch capability on a mobile platform.
    Touch,
    /// Pointer events, preferred on desktops that support them.
    Pointer,
    /// Plain mouse events, the fallback.
    Mouse,
}

impl InputKind {
    /// Pick the input kind from capability probes.
    #[must_use]
    pub fn detect(touch_supported: bool, pointer_supported: bool, platform: Platform) -> Self {
        if touch_supported && platform.is_mobile() {
            Self::Touch
        } else if pointer_supported {
            Self::Pointer
        } else {
            Self::Mouse
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Touch => "touch",
            Self::Pointer => "pointer",
            Self::Mouse => "mouse",
        }
    }
}

/// The button/contact rule that makes a native event a valid gesture start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationRule {
    /// Exactly one active touch contact.
    SingleTouch,
    /// The secondary (right) pointer button.
    SecondaryButton,
    /// Secondary or middle mouse button.
    SecondaryOrMiddleButton,
    /// Secondary button, or primary button with the ctrl modifier (mac).
    SecondaryOrCtrlPrimary,
}

/// Immutable per-platform event bindings and policies, derived once at
/// startup from platform/capability probing.
#[derive(Debug, Clone, Copy)]
pub struct PlatformProfile {
    /// Native event names that begin a gesture (bound on the element).
    pub start_events: &'static [&'static str],
    /// Native event names that continue a gesture (bound on document+window).
    pub move_events: &'static [&'static str],
    /// Native event names that finish a gesture (bound on document+window).
    pub end_events: &'static [&'static str],
    /// Context-menu events to police; empty for touch.
    pub context_events: &'static [&'static str],
    /// What counts as a valid gesture start.
    pub activation: ActivationRule,
    /// Whether default actions are suppressed while a gesture is live.
    pub suppress_default: bool,
}

/// DOM button id for the primary (left) button.
pub const BUTTON_PRIMARY: i16 = 0;
/// DOM button id for the middle button.
pub const BUTTON_MIDDLE: i16 = 1;
/// DOM button id for the secondary (right) button.
pub const BUTTON_SECONDARY: i16 = 2;

const TOUCH_PROFILE: PlatformProfile = PlatformProfile {
    start_events: &["touchstart"],
    move_events: &["touchmove"],
    end_events: &["touchend", "touchcancel"],
    context_events: &[],
    activation: ActivationRule::SingleTouch,
    suppress_default: false,
};

const POINTER_PROFILE: PlatformProfile = PlatformProfile {
    start_events: &["pointerdown"],
    move_events: &["pointermove"],
    end_events: &["pointerup", "pointercancel"],
    context_events: &["contextmenu"],
    activation: ActivationRule::SecondaryButton,
    suppress_default: true,
};

const MAC_MOUSE_PROFILE: PlatformProfile = PlatformProfile {
    start_events: &["mousedown"],
    move_events: &["mousemove"],
    end_events: &["mouseup"],
    context_events: &["contextmenu"],
    activation: ActivationRule::SecondaryOrCtrlPrimary,
    suppress_default: true,
};

const MOUSE_PROFILE: PlatformProfile = PlatformProfile {
    start_events: &["mousedown"],
    move_events: &["mousemove"],
    end_events: &["mouseup"],
    context_events: &["contextmenu"],
    activation: ActivationRule::SecondaryOrMiddleButton,
    suppress_default: true,
};

impl PlatformProfile {
    /// Select the active profile for a platform/input-kind pair.
    #[must_use]
    pub fn select(platform: Platform, input: InputKind) -> Self {
        match input {
            InputKind::Touch => TOUCH_PROFILE,
            InputKind::Pointer => POINTER_PROFILE,
            InputKind::Mouse => {
                if platform == Platform::Mac {
                    MAC_MOUSE_PROFILE
                } else {
                    MOUSE_PROFILE
                }
            }
        }
    }

    /// Whether a native start event is a valid gesture activation.
    ///
    /// `button` is the DOM button id (`None` for touch), `ctrl` the ctrl-key
    /// state, `touch_count` the number of active contacts (`None` for
    /// non-touch input).
    #[must_use]
    pub fn is_valid_start(&self, button: Option<i16>, ctrl: bool, touch_count: Option<u32>) -> bool {
        match self.activation {
            ActivationRule::SingleTouch => touch_count == Some(1),
            ActivationRule::SecondaryButton => button == Some(BUTTON_SECONDARY),
            ActivationRule::SecondaryOrMiddleButton => {
                button == Some(BUTTON_SECONDARY) || button == Some(BUTTON_MIDDLE)
            }
            ActivationRule::SecondaryOrCtrlPrimary => {
                button == Some(BUTTON_SECONDARY) || (button == Some(BUTTON_PRIMARY) && ctrl)
            }
        }
    }

    /// Whether the default action of a native event should be suppressed.
    ///
    /// Touch always suppresses (scrolling/zooming would break the gesture);
    /// on mac a ctrl+click suppresses to keep the context menu away; other
    /// cases follow the profile policy.
    #[must_use]
    pub fn should_suppress_default(&self, platform: Platform, input: InputKind, ctrl: bool) -> bool {
        if input == InputKind::Touch {
            true
        } else if platform == Platform::Mac && ctrl {
            true
        } else {
            self.suppress_default
        }
    }
}
