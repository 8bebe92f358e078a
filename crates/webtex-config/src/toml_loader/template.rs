//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Webtex Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[render]
# accelerated = true            # shared-texture OSR when the GPU backend allows it
# max_frame_rate = 0            # 0-240, 0 = follow the host
# coalesce_dirty_rects = 16     # 1-256

[surface]
# url = "about:blank"
# width = 1280                  # 1-16384
# height = 720                  # 1-16384
# device_scale_factor = 1.0     # 0.25-8.0
# zoom_level = 0.0              # -10.0-10.0
# audio_muted = false
# background_color = "#ffffffff"

[queues]
# event_capacity = 1024         # 16-65536
# command_capacity = 1024       # 16-65536

[logging]
# level = "INFO"                # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
