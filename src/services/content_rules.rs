use std::path::Path;

use crate::db::models::QuestionOptions;
use crate::db::types::OptionKind;
use crate::services::error::PortalError;
use crate::store::ExamFields;

const OPTION_TEXT_MAX_LEN: usize = 500;

pub(crate) fn validate_exam(fields: &ExamFields, max_questions: i32) -> Result<(), PortalError> {
    if fields.name.trim().is_empty() {
        return Err(PortalError::validation("Exam name is required"));
    }
    if fields.duration_minutes < 1 {
        return Err(PortalError::validation("Duration must be at least 1 minute"));
    }
    if fields.number_of_questions < 1 || fields.number_of_questions > max_questions {
        return Err(PortalError::validation(format!(
            "Number of questions must be between 1 and {max_questions}"
        )));
    }
    if !(0.0..=100.0).contains(&fields.pass_percentage) {
        return Err(PortalError::validation("Pass percentage must be between 0 and 100"));
    }
    if fields.end_date <= fields.start_date {
        return Err(PortalError::validation("End date must be after start date"));
    }
    Ok(())
}

pub(crate) fn validate_marks(marks: f64) -> Result<(), PortalError> {
    if marks.is_finite() && marks > 0.0 {
        Ok(())
    } else {
        Err(PortalError::validation("Marks must be a positive number"))
    }
}

/// Builds the option set for `kind`. Text questions need four non-empty texts and no
/// images; image questions need four image references and no texts.
pub(crate) fn build_options(
    kind: OptionKind,
    texts: [Option<String>; 4],
    images: [Option<String>; 4],
    allowed_extensions: &[String],
) -> Result<QuestionOptions, PortalError> {
    let has_texts = texts.iter().flatten().any(|value| !value.trim().is_empty());
    let has_images = images.iter().flatten().any(|value| !value.trim().is_empty());

    match kind {
        OptionKind::Text => {
            if has_images {
                return Err(PortalError::validation(
                    "Text questions cannot carry image options",
                ));
            }
            let [a, b, c, d] = texts.map(|value| value.unwrap_or_default().trim().to_string());
            for value in [&a, &b, &c, &d] {
                if value.is_empty() {
                    return Err(PortalError::validation("All four text options are required"));
                }
                if value.chars().count() > OPTION_TEXT_MAX_LEN {
                    return Err(PortalError::validation(format!(
                        "Options are limited to {OPTION_TEXT_MAX_LEN} characters"
                    )));
                }
            }
            Ok(QuestionOptions::Text([a, b, c, d]))
        }
        OptionKind::Image => {
            if has_texts {
                return Err(PortalError::validation(
                    "Image questions cannot carry text options",
                ));
            }
            let [a, b, c, d] = images.map(|value| value.unwrap_or_default().trim().to_string());
            for value in [&a, &b, &c, &d] {
                validate_image_reference(value, allowed_extensions)?;
            }
            Ok(QuestionOptions::Image([a, b, c, d]))
        }
    }
}

pub(crate) fn validate_image_reference(
    reference: &str,
    allowed_extensions: &[String],
) -> Result<(), PortalError> {
    if reference.is_empty() {
        return Err(PortalError::validation("All four image options are required"));
    }
    if reference.split('/').any(|segment| segment == "..") {
        return Err(PortalError::validation(format!("Invalid image reference '{reference}'")));
    }

    let extension = Path::new(reference)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| PortalError::validation("Image references must have an extension"))?;

    if allowed_extensions.iter().any(|allowed| allowed == &extension) {
        Ok(())
    } else {
        Err(PortalError::validation(format!("Image extension '{extension}' is not allowed")))
    }
}
