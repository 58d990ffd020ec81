use super::*;

// --- Platform detection ---

#[test]
fn detects_mac_from_platform_string() {
    assert_eq!(Platform::detect("MacIntel", ""), Platform::Mac);
}

#[test]
fn detects_mac_from_user_agent() {
    let ua = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";
    assert_eq!(Platform::detect("", ua), Platform::Mac);
}

#[test]
fn detects_windows() {
    assert_eq!(Platform::detect("Win32", "Mozilla/5.0 (Windows NT 10.0)"), Platform::Windows);
}

#[test]
fn detects_android_before_linux() {
    // Android UAs report a Linux platform string.
    let ua = "Mozilla/5.0 (Linux; Android 14; Pixel 8)";
    assert_eq!(Platform::detect("Linux armv8l", ua), Platform::Android);
}

#[test]
fn detects_desktop_linux() {
    assert_eq!(Platform::detect("Linux x86_64", "Mozilla/5.0 (X11; Linux x86_64)"), Platform::Linux);
}

#[test]
fn detects_ios_despite_mac_like_user_agent() {
    let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";
    assert_eq!(Platform::detect("iPhone", ua), Platform::Ios);
    assert_eq!(Platform::detect("", "Mozilla/5.0 (iPad)"), Platform::Ios);
}

#[test]
fn detection_is_case_insensitive() {
    assert_eq!(Platform::detect("MACINTEL", ""), Platform::Mac);
    assert_eq!(Platform::detect("win32", ""), Platform::Windows);
}

#[test]
fn unknown_environment() {
    assert_eq!(Platform::detect("", ""), Platform::Unknown);
}

#[test]
fn mobile_flags() {
    assert!(Platform::Android.is_mobile());
    assert!(Platform::Ios.is_mobile());
    assert!(!Platform::Mac.is_mobile());
    assert!(!Platform::Unknown.is_mobile());
}

// --- Input-kind selection ---

#[test]
fn touch_requires_mobile_platform() {
    assert_eq!(InputKind::detect(true, true, Platform::Android), InputKind::Touch);
    // A touch-capable desktop still drives with pointer events.
    assert_eq!(InputKind::detect(true, true, Platform::Windows), InputKind::Pointer);
}

#[test]
fn pointer_preferred_over_mouse() {
    assert_eq!(InputKind::detect(false, true, Platform::Linux), InputKind::Pointer);
}

#[test]
fn mouse_is_the_fallback() {
    assert_eq!(InputKind::detect(false, false, Platform::Mac), InputKind::Mouse);
}

// --- Profile selection ---

#[test]
fn touch_profile_binds_touch_events() {
    let profile = PlatformProfile::select(Platform::Android, InputKind::Touch);
    assert_eq!(profile.start_events, &["touchstart"]);
    assert_eq!(profile.end_events, &["touchend", "touchcancel"]);
    assert!(profile.context_events.is_empty());
}

#[test]
fn pointer_profile_binds_pointer_events() {
    let profile = PlatformProfile::select(Platform::Windows, InputKind::Pointer);
    assert_eq!(profile.start_events, &["pointerdown"]);
    assert_eq!(profile.activation, ActivationRule::SecondaryButton);
}

#[test]
fn mac_mouse_profile_accepts_ctrl_click() {
    let profile = PlatformProfile::select(Platform::Mac, InputKind::Mouse);
    assert_eq!(profile.activation, ActivationRule::SecondaryOrCtrlPrimary);
}

#[test]
fn generic_mouse_profile_accepts_middle_button() {
    let profile = PlatformProfile::select(Platform::Linux, InputKind::Mouse);
    assert_eq!(profile.activation, ActivationRule::SecondaryOrMiddleButton);
}

// --- Start validity ---

#[test]
fn single_touch_is_valid() {
    let profile = PlatformProfile::select(Platform::Android, InputKind::Touch);
    assert!(profile.is_valid_start(None, false, Some(1)));
}

#[test]
fn multi_touch_is_invalid() {
    let profile = PlatformProfile::select(Platform::Android, InputKind::Touch);
    assert!(!profile.is_valid_start(None, false, Some(2)));
    assert!(!profile.is_valid_start(None, false, Some(0)));
}

#[test]
fn secondary_button_is_valid() {
    let profile = PlatformProfile::select(Platform::Windows, InputKind::Pointer);
    assert!(profile.is_valid_start(Some(BUTTON_SECONDARY), false, None));
    assert!(!profile.is_valid_start(Some(BUTTON_PRIMARY), false, None));
}

#[test]
fn middle_button_valid_only_on_generic_mouse() {
    let generic = PlatformProfile::select(Platform::Linux, InputKind::Mouse);
    assert!(generic.is_valid_start(Some(BUTTON_MIDDLE), false, None));
    let pointer = PlatformProfile::select(Platform::Windows, InputKind::Pointer);
    assert!(!pointer.is_valid_start(Some(BUTTON_MIDDLE), false, None));
}

#[test]
fn mac_ctrl_primary_is_valid() {
    let profile = PlatformProfile::select(Platform::Mac, InputKind::Mouse);
    assert!(profile.is_valid_start(Some(BUTTON_PRIMARY), true, None));
    assert!(!profile.is_valid_start(Some(BUTTON_PRIMARY), false, None));
    assert!(profile.is_valid_start(Some(BUTTON_SECONDARY), false, None));
}

// --- Default suppression ---

#[test]
fn touch_always_suppresses_default() {
    let profile = PlatformProfile::select(Platform::Android, InputKind::Touch);
    assert!(profile.should_suppress_default(Platform::Android, InputKind::Touch, false));
}

#[test]
fn mac_ctrl_click_suppresses_default() {
    let profile = PlatformProfile::select(Platform::Mac, InputKind::Mouse);
    assert!(profile.should_suppress_default(Platform::Mac, InputKind::Mouse, true));
}

#[test]
fn desktop_profiles_follow_policy() {
    let profile = PlatformProfile::select(Platform::Windows, InputKind::Pointer);
    assert!(profile.should_suppress_default(Platform::Windows, InputKind::Pointer, false));
}
