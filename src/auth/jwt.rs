use crate::models::Claims;
use jsonwebtoken::{DecodingKey, Validation, decode};

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
pub fn issue_test_token(user_id: u64, secret: &str) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let claims = Claims {
        user_id,
        sub: format!("user-{user_id}"),
        exp: (chrono::Utc::now().timestamp() + 600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_tokens_signed_with_the_same_secret() {
        let token = issue_test_token(42, "secret");
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.sub, "user-42");
    }

    #[test]
    fn rejects_foreign_signatures_and_garbage() {
        let token = issue_test_token(42, "secret");
        assert!(verify_token(&token, "other").is_err());
        assert!(verify_token("not-a-jwt", "secret").is_err());
    }
}
