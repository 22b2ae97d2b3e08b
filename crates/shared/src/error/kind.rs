//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum shared by every crate in the workspace.

use serde::Serialize;

/// エラー種別の列挙体
///
/// コアが呼び出し側へ返す構造化エラーの分類を定義します。
/// HTTP やトランスポートへの変換は呼び出し側の責務であり、
/// ここではドメイン上の意味だけを表します。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::Conflict;
/// assert_eq!(kind.as_str(), "Conflict");
/// assert!(!kind.is_server_error());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 入力が不正（ユーザー名・パスワード・必須フィールド）
    Validation,
    /// 一意性制約と競合（ユーザー名が既に登録済み）
    Conflict,
    /// レート制限超過（ウィンドウ内の試行回数が上限に到達）
    RateLimited,
    /// 認証失敗（資格情報が不正、またはユーザーが存在しない）
    AuthenticationFailed,
    /// 永続化層の障害（接続・タイムアウト・一意性以外の制約違反）
    Storage,
    /// 予期しない内部障害（ハッシュ化のエントロピー障害など）
    Internal,
}

impl ErrorKind {
    /// ユーザー向けの文字列表現を取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Validation.as_str(), "Validation Failed");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Validation Failed",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::RateLimited => "Rate Limit Exceeded",
            ErrorKind::AuthenticationFailed => "Authentication Failed",
            ErrorKind::Storage => "Storage Failure",
            ErrorKind::Internal => "Internal Error",
        }
    }

    /// サーバー側のエラーかどうかを判定
    ///
    /// `Storage` と `Internal` は `true` を返します。
    /// これらのエラーはログに記録すべきです。
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, ErrorKind::Storage | ErrorKind::Internal)
    }

    /// クライアント側のエラーかどうかを判定
    ///
    /// 呼び出し側の入力や状態に起因するエラーは `true` を返します。
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        !self.is_server_error()
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
