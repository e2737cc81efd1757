//! JWT を使った TokenVerifier 実装
//!
//! トークンの発行元（アカウント管理サービス）は subject を `id` クレームに入れて署名します。

use std::sync::Arc;

use async_trait::async_trait;
use hiroba_shared::time::Clock;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{AuthError, TokenVerifier, UserId};

/// 署名鍵の最小長
pub const MIN_SECRET_LENGTH: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccessTokenClaims {
    id: String,
    iat: i64,
    exp: i64,
}

/// JwtTokenVerifier の構築エラー
#[derive(Debug, Error)]
pub enum JwtConfigError {
    #[error("jwt secret must be at least 32 characters long")]
    SecretTooShort,

    #[error("failed to encode access token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// HS256 の JWT を検証する TokenVerifier
#[derive(Clone)]
pub struct JwtTokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtTokenVerifier {
    /// 共有シークレットから作成
    ///
    /// 発行時刻（iat）は `clock` から取得します。
    pub fn new(secret: &str, clock: Arc<dyn Clock>) -> Result<Self, JwtConfigError> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(JwtConfigError::SecretTooShort);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        })
    }

    /// トークンを発行（開発・テスト用の発行元として使う）
    pub fn issue_token(&self, user_id: &UserId, ttl_seconds: i64) -> Result<String, JwtConfigError> {
        let issued_at = self.clock.now_millis() / 1000;
        let claims = AccessTokenClaims {
            id: user_id.as_str().to_string(),
            iat: issued_at,
            exp: issued_at + ttl_seconds,
        };
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, raw_token: &str) -> Result<UserId, AuthError> {
        let claims = decode::<AccessTokenClaims>(raw_token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?
            .claims;

        UserId::new(claims.id).map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
