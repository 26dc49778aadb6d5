//! Integration tests for term-settings-model.
//!
//! These tests drive the full parse → merge → resolve → validate pipeline
//! through the public API and check the resulting snapshots.

use std::collections::HashSet;
use std::fs;

use serde_json::json;
use tempfile::tempdir;
use term_settings_model::defaults::DEFAULTS_JSON;
use term_settings_model::persistence::CONFIG_DIR_ENV;
use term_settings_model::{
    AppearanceSlot, NewTerminalArgs, OriginTag, PersistenceError, Profile, Settings,
    SettingsFragment, SettingsLoadError, WarningContext, WarningKind, parse_guid,
};

const DEFAULTS: &str = r#"{
    "defaultProfile": "{00000000-0000-0000-0000-000000000001}",
    "defaultColorScheme": "Dark",
    "profiles": {
        "defaults": {"colorScheme": "Dark", "font": {"face": "Fira Code", "size": 11}},
        "list": [
            {"guid": "{00000000-0000-0000-0000-000000000001}", "name": "P1", "commandline": "bash"},
            {"guid": "{00000000-0000-0000-0000-000000000002}", "name": "P2", "commandline": "zsh"}
        ]
    },
    "schemes": [{"name": "Dark"}, {"name": "Light"}],
    "actions": [
        {"command": "copy", "keys": "ctrl+shift+c"},
        {"command": "paste", "keys": "ctrl+shift+v"}
    ]
}"#;

fn kinds(settings: &Settings) -> Vec<WarningKind> {
    settings.warnings().iter().map(|w| w.kind).collect()
}

fn scheme_of(profile: &Profile) -> Option<String> {
    profile.color_scheme_name(AppearanceSlot::Default)
}

fn fragment(source: &str, content: &str) -> SettingsFragment {
    SettingsFragment {
        source: source.to_string(),
        content: content.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn user_overlay_changes_only_the_matched_profile() {
    let settings = Settings::from_json(
        DEFAULTS,
        Some(
            r#"{"profiles": [
                {"guid": "{00000000-0000-0000-0000-000000000001}", "colorScheme": "Light"}]}"#,
        ),
    );
    let profiles = settings.all_profiles();
    assert_eq!(scheme_of(&profiles[0]).as_deref(), Some("Light"));
    assert_eq!(scheme_of(&profiles[1]).as_deref(), Some("Dark"));
    assert!(settings.warnings().is_empty());
}

#[test]
fn unknown_profile_scheme_is_repaired_with_one_warning() {
    let settings = Settings::from_json(
        DEFAULTS,
        Some(r#"{"profiles": [{"name": "Mine", "colorScheme": "Nonexistent"}]}"#),
    );
    assert_eq!(kinds(&settings), [WarningKind::UnknownColorScheme]);
    let warning = &settings.warnings()[0];
    assert!(matches!(&warning.context, WarningContext::Profile { name, .. } if name == "Mine"));
    assert!(warning.detail.contains("Nonexistent"));

    let mine = settings.all_profiles().last().unwrap();
    assert_eq!(scheme_of(mine).as_deref(), Some("Dark"));
}

#[test]
fn missing_default_profile_falls_back_to_first_active() {
    let defaults = DEFAULTS.replace(
        "\"defaultProfile\": \"{00000000-0000-0000-0000-000000000001}\"",
        "\"defaultProfile\": \"{00000000-0000-0000-0000-0000000000ff}\"",
    );
    let settings = Settings::from_json(&defaults, None);
    assert_eq!(kinds(&settings), [WarningKind::DefaultProfileNotFound]);
    assert_eq!(settings.default_profile().map(Profile::name).as_deref(), Some("P1"));
}

#[test]
fn defaults_only_load_has_no_warnings() {
    let settings = Settings::load_defaults();
    assert!(settings.load_error().is_none());
    assert!(settings.warnings().is_empty(), "{:?}", kinds(&settings));
    assert!(!settings.active_profiles().is_empty());
    assert_eq!(
        settings.default_profile().map(Profile::name).as_deref(),
        Some("Windows PowerShell")
    );

    let blank = Settings::from_json(DEFAULTS_JSON, Some("   \n"));
    assert!(blank.warnings().is_empty());
    assert_eq!(blank.all_profiles(), settings.all_profiles());
}

#[test]
fn invalid_user_json_is_fatal_but_defaults_still_load() {
    let settings = Settings::from_json(DEFAULTS_JSON, Some(r#"{"profiles": [ oops"#));
    assert_eq!(
        settings.load_error(),
        Some(SettingsLoadError::Deserialization {
            origin: OriginTag::User
        })
    );
    assert!(settings.deserialization_error_message().is_some());
    assert!(Settings::load_defaults().into_result().is_ok());
}

#[test]
fn empty_profile_set_is_fatal() {
    let settings = Settings::from_json(r#"{"schemes": [{"name": "Dark"}]}"#, Some(""));
    assert_eq!(settings.load_error(), Some(SettingsLoadError::NoProfiles));
    assert_eq!(
        settings.into_result().err(),
        Some(SettingsLoadError::NoProfiles)
    );
}

#[test]
fn typed_value_errors_fail_the_layer() {
    let settings = Settings::from_json(DEFAULTS, Some(r#"{"initialCols": "wide"}"#));
    assert!(matches!(
        settings.load_error(),
        Some(SettingsLoadError::Deserialization {
            origin: OriginTag::User
        })
    ));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn loading_twice_gives_identical_profiles() {
    let user = r#"{"profiles": [
        {"name": "A"},
        {"guid": "{00000000-0000-0000-0000-000000000002}", "hidden": true}]}"#;
    let first = Settings::from_json(DEFAULTS, Some(user));
    let second = Settings::from_json(DEFAULTS, Some(user));
    assert_eq!(first.all_profiles(), second.all_profiles());
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn identities_are_unique() {
    let fragments = [fragment(
        "ext",
        r#"{"profiles": [
            {"name": "P1"},
            {"guid": "{00000000-0000-0000-0000-000000000002}", "name": "Taken"}]}"#,
    )];
    let settings = Settings::from_layers(
        DEFAULTS,
        &fragments,
        Some(r#"{"profiles": [{"name": "P1"}, {"name": "P2"}]}"#),
    );
    let ids: HashSet<_> = settings.all_profiles().iter().map(Profile::guid).collect();
    assert_eq!(ids.len(), settings.all_profiles().len());
}

#[test]
fn unset_fields_come_from_the_defaults_template() {
    let settings = Settings::from_json(
        DEFAULTS,
        Some(
            r#"{"profiles": [
                {"guid": "{00000000-0000-0000-0000-000000000002}", "font": {"size": 16}}]}"#,
        ),
    );
    let p1 = &settings.all_profiles()[0];
    assert_eq!(p1.font_face(), "Fira Code");
    assert_eq!(p1.font_size(), 11.0);

    let p2 = &settings.all_profiles()[1];
    assert_eq!(p2.font_face(), "Fira Code");
    assert_eq!(p2.font_size(), 16.0);
    assert_eq!(p2.default_appearance().font_size, 16.0);
}

#[test]
fn empty_diff_round_trips() {
    let settings = Settings::from_json(DEFAULTS, None);
    let diff = settings.to_json().unwrap();
    assert_eq!(diff, json!({}));

    let reloaded = Settings::from_json(DEFAULTS, Some(&diff.to_string()));
    assert_eq!(reloaded.all_profiles(), settings.all_profiles());
    assert!(reloaded.warnings().is_empty());
}

#[test]
fn repaired_settings_reload_without_warnings() {
    let settings = Settings::from_json(
        DEFAULTS,
        Some(
            r#"{"defaultProfile": "gone", "defaultColorScheme": "Missing",
                "profiles": [
                    {"name": "Mine", "colorScheme": "Nope", "backgroundImage": "/no/such/file.png"}],
                "actions": [
                    {"command": "find", "keys": "ctrl+f"},
                    {"command": "newTab", "keys": "ctrl+f"}]}"#,
        ),
    );
    assert!(settings.warnings().len() >= 5, "{:?}", kinds(&settings));

    let diff = settings.to_json().unwrap().to_string();
    let reloaded = Settings::from_json(DEFAULTS, Some(&diff));
    assert!(reloaded.warnings().is_empty(), "{:?}", kinds(&reloaded));
    let names: Vec<_> = reloaded.all_profiles().iter().map(Profile::name).collect();
    assert_eq!(names, ["P1", "P2", "Mine"]);
}

#[test]
fn dropped_default_duplicate_stays_repaired_across_edits() {
    let defaults = r#"{
        "defaultProfile": "{00000000-0000-0000-0000-000000000002}",
        "defaultColorScheme": "Campbell",
        "schemes": [{"name": "Campbell"}],
        "profiles": [
            {"guid": "{00000000-0000-0000-0000-000000000001}", "name": "x"},
            {"guid": "{00000000-0000-0000-0000-000000000002}", "name": "x"},
            {"guid": "{00000000-0000-0000-0000-000000000003}", "name": "y"}
        ]
    }"#;
    let kept = parse_guid("{00000000-0000-0000-0000-000000000001}");

    let settings = Settings::from_json(defaults, None);
    assert_eq!(kinds(&settings), [WarningKind::DuplicateProfile]);
    assert_eq!(settings.default_profile().map(Profile::guid), kept);

    let (edited, _) = settings.create_new_profile();
    assert_eq!(kinds(&edited), [WarningKind::DuplicateProfile]);
    assert_eq!(edited.default_profile().map(Profile::guid), kept);

    // only the duplicate in the defaults layer is reported again
    let reloaded = Settings::from_json(defaults, Some(&edited.to_json().unwrap().to_string()));
    assert_eq!(kinds(&reloaded), [WarningKind::DuplicateProfile]);
    assert_eq!(reloaded.default_profile().map(Profile::guid), kept);
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

#[test]
fn fragment_profiles_sit_between_defaults_and_user() {
    let fragments = [
        fragment(
            "alpha",
            r#"{"profiles": [{"name": "Alpha Shell"}], "schemes": [{"name": "Alpha"}]}"#,
        ),
        fragment("beta", "not json"),
    ];
    let settings = Settings::from_layers(
        DEFAULTS,
        &fragments,
        Some(r#"{"profiles": [{"name": "Mine", "colorScheme": "Alpha"}]}"#),
    );
    assert!(settings.load_error().is_none());
    let profiles = settings.all_profiles();
    let names: Vec<_> = profiles.iter().map(Profile::name).collect();
    assert_eq!(names, ["P1", "P2", "Alpha Shell", "Mine"]);
    assert_eq!(profiles[2].origin(), OriginTag::Fragment);
    // a user profile may use a scheme a fragment contributed
    assert!(settings.warnings().is_empty());
    assert_eq!(scheme_of(&profiles[3]).as_deref(), Some("Alpha"));
}

#[test]
fn fragment_identity_depends_on_its_source() {
    let content = r#"{"profiles": [{"name": "Same"}]}"#;
    let a = Settings::from_layers(DEFAULTS, &[fragment("one", content)], None);
    let b = Settings::from_layers(DEFAULTS, &[fragment("two", content)], None);
    assert_ne!(a.all_profiles()[2].guid(), b.all_profiles()[2].guid());
}

#[test]
fn user_can_overlay_fragment_profiles() {
    let fragments = [fragment(
        "ext",
        r#"{"profiles": [{"name": "Ext", "commandline": "ext-shell"}]}"#,
    )];
    let first = Settings::from_layers(DEFAULTS, &fragments, None);
    let guid = first.all_profiles()[2].guid();

    let user = json!({
        "profiles": [{"guid": term_settings_model::format_guid(&guid), "hidden": true}]
    });
    let second = Settings::from_layers(DEFAULTS, &fragments, Some(&user.to_string()));
    let ext = second.find_profile(&guid).unwrap();
    assert!(ext.hidden());
    assert_eq!(ext.origin(), OriginTag::Fragment);
    assert_eq!(ext.commandline().as_deref(), Some("ext-shell"));
    assert_eq!(second.active_profiles().len(), 2);
}

// ---------------------------------------------------------------------------
// Keybindings
// ---------------------------------------------------------------------------

#[test]
fn user_rebinding_a_default_chord_is_not_a_conflict() {
    let settings = Settings::from_json(
        DEFAULTS,
        Some(r#"{"actions": [{"command": "find", "keys": "ctrl+shift+c"}]}"#),
    );
    assert!(settings.warnings().is_empty());
    let map = settings.action_map();
    assert_eq!(map.lookup_str("ctrl+shift+c").map(|c| c.action.as_str()), Some("find"));
    assert_eq!(map.lookup_str("ctrl+shift+v").map(|c| c.action.as_str()), Some("paste"));
}

#[test]
fn conflicts_within_the_user_layer_warn_once() {
    let settings = Settings::from_json(
        DEFAULTS,
        Some(
            r#"{"actions": [
                {"command": "find", "keys": "ctrl+k"},
                {"command": "newTab", "keys": "Ctrl+K"}]}"#,
        ),
    );
    assert_eq!(kinds(&settings), [WarningKind::KeybindingConflict]);
    assert_eq!(
        settings.action_map().lookup_str("ctrl+k").map(|c| c.action.as_str()),
        Some("newTab")
    );
}

#[test]
fn unbinding_removes_a_default_chord() {
    let settings = Settings::from_json(
        DEFAULTS,
        Some(r#"{"actions": [{"command": null, "keys": "ctrl+shift+c"}]}"#),
    );
    assert!(settings.warnings().is_empty());
    assert!(settings.action_map().lookup_str("ctrl+shift+c").is_none());
    assert_eq!(settings.action_map().chords_for("paste"), ["ctrl+shift+v"]);
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

#[test]
fn readable_background_images_are_kept() {
    let temp = tempdir().unwrap();
    let image = temp.path().join("bg.png");
    fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();
    let missing = temp.path().join("missing.png");

    let user = json!({"profiles": [
        {"name": "Has Image", "backgroundImage": image.to_string_lossy()},
        {"name": "No Image", "unfocusedAppearance": {"backgroundImage": missing.to_string_lossy()}}
    ]});
    let settings = Settings::from_json(DEFAULTS, Some(&user.to_string()));
    assert_eq!(kinds(&settings), [WarningKind::InvalidBackgroundImage]);

    let profiles = settings.all_profiles();
    assert_eq!(
        profiles[2].default_appearance().background_image.as_deref(),
        Some(image.to_string_lossy().as_ref())
    );
    let unfocused = profiles[3].unfocused_appearance().unwrap();
    assert!(unfocused.background_image.is_none());
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn write_is_atomic_and_reloadable() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("settings.json");
    let settings = Settings::from_json(DEFAULTS, Some(r#"{"copyOnSelect": true}"#));
    let (settings, guid) = settings.create_new_profile();

    settings.write_settings_to(&path).unwrap();
    assert!(!temp.path().join("settings.json.tmp").exists());

    let written = fs::read_to_string(&path).unwrap();
    let reloaded = Settings::from_json(DEFAULTS, Some(&written));
    assert!(reloaded.global_settings().copy_on_select());
    let created = reloaded.find_profile(&guid).unwrap();
    assert_eq!(created.name(), "Profile 1");
}

#[test]
fn load_all_reads_the_config_directory() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("fragments").join("ext")).unwrap();
    fs::write(
        root.join("fragments").join("ext").join("profiles.json"),
        r#"{"profiles": [{"name": "Ext Shell"}]}"#,
    )
    .unwrap();
    fs::write(root.join("settings.json"), r#"{"alwaysShowTabs": false}"#).unwrap();

    // SAFETY: this is the only test in this binary that reads or writes the
    // variable.
    unsafe { std::env::set_var(CONFIG_DIR_ENV, root) };

    let settings = Settings::load_all().unwrap();
    assert!(!settings.global_settings().always_show_tabs());
    assert!(settings.all_profiles().iter().any(|p| p.name() == "Ext Shell"));

    let universal = Settings::load_universal().unwrap();
    assert!(universal.is_universal());
    assert!(!universal.global_settings().always_show_tabs());

    let (next, _) = settings.create_new_profile();
    next.write_settings_to_disk().unwrap();
    let reloaded = Settings::load_all().unwrap();
    assert!(reloaded.all_profiles().iter().any(|p| p.name() == "Profile 1"));

    unsafe { std::env::remove_var(CONFIG_DIR_ENV) };
}

#[test]
fn failed_load_survives_edits_and_is_never_written() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("settings.json");
    fs::write(&path, "{ broken").unwrap();

    let settings = Settings::from_json(DEFAULTS, Some("{ broken"));
    let fatal = Some(SettingsLoadError::Deserialization {
        origin: OriginTag::User,
    });
    assert_eq!(settings.load_error(), fatal);

    let (edited, _) = settings.create_new_profile();
    assert_eq!(edited.load_error(), fatal);
    assert_eq!(
        edited.deserialization_error_message(),
        settings.deserialization_error_message()
    );
    assert!(edited.deserialization_error_message().is_some());

    let result = edited.write_settings_to(&path);
    assert!(matches!(result, Err(PersistenceError::Unusable(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ broken");
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[test]
fn default_profile_accepts_a_name() {
    let settings = Settings::from_json(DEFAULTS, Some(r#"{"defaultProfile": "P2"}"#));
    assert!(settings.warnings().is_empty());
    assert_eq!(
        settings.default_profile().map(Profile::guid),
        parse_guid("{00000000-0000-0000-0000-000000000002}")
    );
}

#[test]
fn duplicated_profile_survives_a_round_trip() {
    let settings = Settings::from_json(DEFAULTS, None);
    let p2 = parse_guid("{00000000-0000-0000-0000-000000000002}").unwrap();
    let (copy, guid) = settings.duplicate_profile(&p2).unwrap();

    let reloaded = Settings::from_json(DEFAULTS, Some(&copy.to_json().unwrap().to_string()));
    let dup = reloaded.find_profile(&guid).unwrap();
    assert_eq!(dup.name(), "P2 (Copy)");
    assert_eq!(dup.commandline().as_deref(), Some("zsh"));
}

#[test]
fn commandline_lookup_matches_windows_paths() {
    let settings = Settings::load_defaults();
    let name_for = |commandline: &str| {
        settings
            .get_profile_for_args(&NewTerminalArgs::with_commandline(commandline))
            .map(Profile::name)
    };
    assert_eq!(name_for("cmd.exe").as_deref(), Some("Command Prompt"));
    assert_eq!(
        name_for(r"C:\Windows\System32\cmd.exe /k").as_deref(),
        Some("Command Prompt")
    );
    let powershell = r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe -NoLogo";
    assert_eq!(name_for(powershell).as_deref(), Some("Windows PowerShell"));
}
