use crate::schema::WebtexConfig;

use super::helpers::validate_range;

pub(crate) fn validate_queues(errors: &mut Vec<String>, config: &WebtexConfig) {
    validate_range(
        errors,
        "queues.event_capacity",
        config.queues.event_capacity,
        16,
        65536,
    );
    validate_range(
        errors,
        "queues.command_capacity",
        config.queues.command_capacity,
        16,
        65536,
    );
}
