pub(crate) mod attempt_codes;
pub(crate) mod attempt_timing;
pub(crate) mod attempts;
pub(crate) mod content_rules;
pub(crate) mod error;
pub(crate) mod sampling;
pub(crate) mod scoring;
