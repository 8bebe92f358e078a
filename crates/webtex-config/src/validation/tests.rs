use super::*;

#[test]
fn default_config_is_valid() {
    assert!(validate(&WebtexConfig::default()).is_ok());
}

#[test]
fn frame_rate_above_cap_is_rejected() {
    let mut config = WebtexConfig::default();
    config.render.max_frame_rate = 500;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("render.max_frame_rate = 500"));
}

#[test]
fn zero_dirty_rect_cap_is_rejected() {
    let mut config = WebtexConfig::default();
    config.render.coalesce_dirty_rects = 0;
    assert!(validate(&config).is_err());
}

#[test]
fn zero_sized_surface_is_rejected() {
    let mut config = WebtexConfig::default();
    config.surface.width = 0;
    config.surface.height = 20000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("surface.width"));
    assert!(err.contains("surface.height"));
}

#[test]
fn scale_factor_bounds() {
    let mut config = WebtexConfig::default();
    config.surface.device_scale_factor = 0.1;
    assert!(validate(&config).is_err());
    config.surface.device_scale_factor = 2.0;
    assert!(validate(&config).is_ok());
}

#[test]
fn nan_zoom_is_rejected() {
    let mut config = WebtexConfig::default();
    config.surface.zoom_level = f64::NAN;
    assert!(validate(&config).is_err());
}

#[test]
fn background_color_format() {
    let mut config = WebtexConfig::default();
    config.surface.background_color = "#abc".into();
    assert!(validate(&config).is_err());
    config.surface.background_color = "#A0B0C0".into();
    assert!(validate(&config).is_ok());
    config.surface.background_color = "#a0b0c0ff".into();
    assert!(validate(&config).is_ok());
}

#[test]
fn blank_url_is_rejected() {
    let mut config = WebtexConfig::default();
    config.surface.url = "   ".into();
    assert!(validate(&config).is_err());
}

#[test]
fn tiny_queue_is_rejected() {
    let mut config = WebtexConfig::default();
    config.queues.event_capacity = 4;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("queues.event_capacity = 4"));
}

#[test]
fn all_errors_are_collected() {
    let mut config = WebtexConfig::default();
    config.render.max_frame_rate = 999;
    config.queues.command_capacity = 0;
    config.surface.background_color = "red".into();
    let err = validate(&config).unwrap_err().to_string();
    assert_eq!(err.matches("; ").count(), 2);
}
