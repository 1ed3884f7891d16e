//! Inline, advisory validation for the profile and registration forms.
//! Failures here are messages for the user, not hard errors.

/// 5 MB cap on profile images, matching the upload widget.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Checks an uploaded profile image before it is forwarded upstream.
pub fn check_image_upload(content_type: &str, size: u64) -> Result<(), String> {
    if !content_type.starts_with("image/") {
        return Err("Please select an image file (JPG, PNG, etc.)".to_string());
    }
    if size > MAX_IMAGE_BYTES {
        return Err("Image must be smaller than 5MB".to_string());
    }
    Ok(())
}

/// First failing password rule, or `Ok` for a strong password. Rules fire
/// in order: length, uppercase, lowercase, digit.
pub fn password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must include at least one uppercase letter.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must include at least one lowercase letter.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must include at least one number.".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_type_check() {
        assert!(check_image_upload("image/png", 1024).is_ok());
        assert!(check_image_upload("image/jpeg", 1024).is_ok());
        assert!(check_image_upload("application/pdf", 1024).is_err());
        assert!(check_image_upload("", 1024).is_err());
    }

    #[test]
    fn test_image_size_boundary_is_inclusive() {
        assert!(check_image_upload("image/png", MAX_IMAGE_BYTES).is_ok());
        assert!(check_image_upload("image/png", MAX_IMAGE_BYTES + 1).is_err());
    }

    #[test]
    fn test_password_rules_fire_in_order() {
        assert_eq!(
            password_strength("Ab1").unwrap_err(),
            "Password must be at least 8 characters."
        );
        assert_eq!(
            password_strength("alllower1").unwrap_err(),
            "Password must include at least one uppercase letter."
        );
        assert_eq!(
            password_strength("ALLUPPER1").unwrap_err(),
            "Password must include at least one lowercase letter."
        );
        assert_eq!(
            password_strength("NoDigitsHere").unwrap_err(),
            "Password must include at least one number."
        );
        assert!(password_strength("GoodPass1").is_ok());
    }
}
