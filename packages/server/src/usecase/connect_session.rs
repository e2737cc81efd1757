//! UseCase: セッション接続（ハンドシェイク認証）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSessionUseCase::authenticate() メソッド
//! - トークンの取り出し（明示的なフィールド → Cookie の順）と検証
//!
//! ### なぜこのテストが必要か
//! - 認証はこのサーバーで唯一、呼び出し元にエラーを返す関門
//! - 失敗時はセッションを作らず、ルーム状態にも触れないこと（fail closed）を保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：明示的なトークン、Cookie のトークン
//! - 異常系：トークンなし、不正なトークン

use std::sync::Arc;

use crate::domain::{
    AuthError, MessagePusher, PusherChannel, Session, SessionIdFactory, TokenVerifier, UserId,
};

/// トークンを運ぶ Cookie の名前
pub const TOKEN_COOKIE_NAME: &str = "jwt_token";

/// ハンドシェイクで受け取った認証情報
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandshakeCredentials {
    /// 明示的な認証フィールド（クエリの `token` や `Authorization: Bearer`）
    pub explicit_token: Option<String>,
    /// `Cookie` ヘッダーの生の値
    pub cookie_header: Option<String>,
}

impl HandshakeCredentials {
    /// 明示的なトークンを優先し、なければ Cookie からトークンを取り出す
    pub fn token(&self) -> Option<&str> {
        self.explicit_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| {
                self.cookie_header
                    .as_deref()
                    .and_then(|header| find_cookie(header, TOKEN_COOKIE_NAME))
            })
    }
}

/// `name1=value1; name2=value2` 形式のヘッダーから値を探す
fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// セッション接続のユースケース
pub struct ConnectSessionUseCase {
    /// TokenVerifier（トークン検証の抽象化）
    token_verifier: Arc<dyn TokenVerifier>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
    pub fn new(
        token_verifier: Arc<dyn TokenVerifier>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            token_verifier,
            message_pusher,
        }
    }

    /// ハンドシェイクを認証し、セッションを作成
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - 認証成功（入室中のルームは空）
    /// * `Err(AuthError)` - トークンがない、または検証に失敗
    pub async fn authenticate(
        &self,
        credentials: &HandshakeCredentials,
    ) -> Result<Session, AuthError> {
        let user_id = self.identify(credentials).await?;
        Ok(Session::new(SessionIdFactory::generate(), user_id))
    }

    /// トークンを検証して subject だけを返す（HTTP API の認証用）
    pub async fn identify(&self, credentials: &HandshakeCredentials) -> Result<UserId, AuthError> {
        let token = credentials.token().ok_or(AuthError::MissingToken)?;
        self.token_verifier.verify(token).await
    }

    /// 認証済みセッションの送信キューを登録
    pub async fn attach(&self, session: &Session, sender: PusherChannel) {
        self.message_pusher
            .register_client(session.id.clone(), sender)
            .await;
    }
}
