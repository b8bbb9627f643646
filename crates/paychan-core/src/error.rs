/// Core protocol errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid coins: {0}")]
    InvalidCoins(String),

    #[error("invalid denomination: {0}")]
    InvalidDenom(String),

    #[error("amount overflow for denomination {0}")]
    AmountOverflow(String),

    #[error("invalid channel id: {0}")]
    InvalidChannelId(String),

    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}
