use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_playdeck_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("PLAYDECK_CONFIG_PATH", "/tmp/playdeck-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/playdeck-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("playdeck")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("playdeck")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_the_widget_out_of_the_box() {
    let s = Settings::default();
    assert_eq!(s.catalog.path, std::path::PathBuf::from("songs.json"));
    assert_eq!(s.ui.default_artwork, "default-album-art.jpg");
    assert_eq!(s.ui.placeholder_text, "Select a song from the playlist");
    assert!(s.logging.file.is_none());
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
path = "/srv/music/songs.json"

[audio]
tick_ms = 100
quit_fade_out_ms = 0

[controls]
scrub_seconds = 9
volume_step = 0.1

[ui]
header_text = "hello"
placeholder_text = "pick something"
default_artwork = "cover.png"

[logging]
file = "/tmp/playdeck.log"
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("PLAYDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("PLAYDECK__AUDIO__TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(
        s.catalog.path,
        std::path::PathBuf::from("/srv/music/songs.json")
    );
    assert_eq!(s.audio.tick_ms, 100);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert!((s.controls.volume_step - 0.1).abs() < f64::EPSILON);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.placeholder_text, "pick something");
    assert_eq!(s.ui.default_artwork, "cover.png");
    assert_eq!(
        s.logging.file,
        Some(std::path::PathBuf::from("/tmp/playdeck.log"))
    );
    assert_eq!(s.logging.level, "debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
tick_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("PLAYDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("PLAYDECK__AUDIO__TICK_MS", "50");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.tick_ms, 50);
}

#[test]
fn validate_rejects_zero_tick_and_bad_volume_step() {
    let mut s = Settings::default();
    s.audio.tick_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = 1.5;
    assert!(s.validate().is_err());
}
