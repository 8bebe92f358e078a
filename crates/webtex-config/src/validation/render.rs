use crate::schema::WebtexConfig;

use super::helpers::validate_range;

pub(crate) fn validate_render(errors: &mut Vec<String>, config: &WebtexConfig) {
    validate_range(
        errors,
        "render.max_frame_rate",
        config.render.max_frame_rate,
        0,
        240,
    );
    validate_range(
        errors,
        "render.coalesce_dirty_rects",
        config.render.coalesce_dirty_rects,
        1,
        256,
    );
}
