use super::ApiError;

/// Registration requires all three fields, non-empty.
pub fn validate_registration(
    username: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<(String, String, String), ApiError> {
    match (username, email, password) {
        (Some(username), Some(email), Some(password))
            if !username.is_empty() && !email.is_empty() && !password.is_empty() =>
        {
            Ok((
                username.to_string(),
                email.to_string(),
                password.to_string(),
            ))
        }
        _ => Err(ApiError::validation("All fields required")),
    }
}

/// Add-to-cart requires a product id and a positive integer quantity.
/// The input quantity itself is validated, not the resulting line.
pub fn validate_cart_add(
    product_id: Option<&str>,
    qty: Option<i32>,
) -> Result<(String, i32), ApiError> {
    let (Some(product_id), Some(qty)) = (product_id.map(str::trim), qty) else {
        return Err(ApiError::validation("productId and qty required"));
    };

    if product_id.is_empty() {
        return Err(ApiError::validation("productId and qty required"));
    }

    if qty <= 0 {
        return Err(ApiError::validation("qty must be > 0"));
    }

    Ok((product_id.to_string(), qty))
}

pub fn validate_product_id(product_id: Option<&str>) -> Result<String, ApiError> {
    match product_id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(ApiError::validation("productId required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_registration() {
        assert!(validate_registration(Some("alice"), Some("a@example.com"), Some("pw")).is_ok());
        assert!(validate_registration(None, Some("a@example.com"), Some("pw")).is_err());
        assert!(validate_registration(Some("alice"), None, Some("pw")).is_err());
        assert!(validate_registration(Some("alice"), Some("a@example.com"), None).is_err());
        assert!(validate_registration(Some(""), Some("a@example.com"), Some("pw")).is_err());
    }

    #[test]
    fn test_validate_cart_add() {
        assert_eq!(
            validate_cart_add(Some("wh-100"), Some(2)).unwrap(),
            ("wh-100".to_string(), 2)
        );
        assert!(validate_cart_add(None, Some(2)).is_err());
        assert!(validate_cart_add(Some("wh-100"), None).is_err());
        assert!(validate_cart_add(Some("   "), Some(2)).is_err());
        assert!(validate_cart_add(Some("wh-100"), Some(0)).is_err());
        assert!(validate_cart_add(Some("wh-100"), Some(-3)).is_err());
    }

    #[test]
    fn test_validate_product_id() {
        assert_eq!(validate_product_id(Some("kb-200")).unwrap(), "kb-200");
        assert_eq!(validate_product_id(Some("  kb-200  ")).unwrap(), "kb-200");
        assert!(validate_product_id(Some("")).is_err());
        assert!(validate_product_id(None).is_err());
    }
}
