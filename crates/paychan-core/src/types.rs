use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Identifier of a payment channel. Issued sequentially from 0 and never reused.
pub type ChannelId = i64;

/// Parse a channel id from its decimal string form. Negative ids are rejected.
pub fn parse_channel_id(s: &str) -> Result<ChannelId, CoreError> {
    let id: ChannelId = s
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidChannelId(s.to_string()))?;
    if id < 0 {
        return Err(CoreError::InvalidChannelId(s.to_string()));
    }
    Ok(id)
}

/// Account address: raw bytes, rendered as lowercase hex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub Vec<u8>);

impl Address {
    /// Wrap raw address bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decode from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| CoreError::InvalidAddress(format!("{}: {}", s, e)))?;
        Ok(Self(bytes))
    }

    /// Encode as a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Whether `denom` is an acceptable denomination: `[a-z][a-z0-9]{2,15}`.
pub fn is_valid_denom(denom: &str) -> bool {
    let bytes = denom.as_bytes();
    if bytes.len() < 3 || bytes.len() > 16 {
        return false;
    }
    bytes[0].is_ascii_lowercase()
        && bytes[1..]
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

/// A single amount of one denomination.
///
/// The amount is signed so that negative values coming off the wire can be
/// represented and rejected rather than silently wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: i128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: i128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoreError;

    /// Parse `"<amount><denom>"`, e.g. `"10usd"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| CoreError::InvalidCoins(format!("missing denomination: {}", s)))?;
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() {
            return Err(CoreError::InvalidCoins(format!("missing amount: {}", s)));
        }
        let amount: i128 = amount
            .parse()
            .map_err(|_| CoreError::InvalidCoins(format!("invalid amount: {}", s)))?;
        if !is_valid_denom(denom) {
            return Err(CoreError::InvalidDenom(denom.to_string()));
        }
        Ok(Coin::new(denom, amount))
    }
}

/// A multi-currency amount: a list of coins.
///
/// A well-formed `Coins` value has valid denominations, is strictly sorted by
/// denomination (hence no duplicates) and contains no zero-amount entries.
/// Constructors do not enforce this; callers validate with [`Coins::is_valid`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(pub Vec<Coin>);

impl Coins {
    /// Wrap a list of coins as-is.
    pub fn new(coins: Vec<Coin>) -> Self {
        Self(coins)
    }

    /// The empty amount.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Shorthand for a single-denomination amount.
    pub fn single(denom: impl Into<String>, amount: i128) -> Self {
        Self(vec![Coin::new(denom, amount)])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorted, unique, valid denominations and no zero-amount entries.
    pub fn is_valid(&self) -> bool {
        for (i, coin) in self.0.iter().enumerate() {
            if !is_valid_denom(&coin.denom) || coin.amount == 0 {
                return false;
            }
            if i > 0 && self.0[i - 1].denom >= coin.denom {
                return false;
            }
        }
        true
    }

    /// Non-empty and every entry strictly positive.
    pub fn is_all_positive(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|c| c.amount > 0)
    }

    pub fn is_any_negative(&self) -> bool {
        self.0.iter().any(|c| c.amount < 0)
    }

    /// The amount held of `denom`, zero if absent.
    pub fn amount_of(&self, denom: &str) -> i128 {
        self.0
            .iter()
            .filter(|c| c.denom == denom)
            .map(|c| c.amount)
            .sum()
    }

    /// Add two amounts. The result is sorted with zero entries dropped.
    pub fn checked_add(&self, other: &Coins) -> Result<Coins, CoreError> {
        Self::merge(self.0.iter().chain(other.0.iter()).map(|c| (c, 1)))
    }

    /// Subtract `other` from `self`. The result may hold negative entries.
    pub fn checked_sub(&self, other: &Coins) -> Result<Coins, CoreError> {
        Self::merge(
            self.0
                .iter()
                .map(|c| (c, 1))
                .chain(other.0.iter().map(|c| (c, -1))),
        )
    }

    fn merge<'a>(coins: impl Iterator<Item = (&'a Coin, i128)>) -> Result<Coins, CoreError> {
        let mut totals: BTreeMap<&str, i128> = BTreeMap::new();
        for (coin, sign) in coins {
            let delta = coin
                .amount
                .checked_mul(sign)
                .ok_or_else(|| CoreError::AmountOverflow(coin.denom.clone()))?;
            let entry = totals.entry(coin.denom.as_str()).or_insert(0);
            *entry = entry
                .checked_add(delta)
                .ok_or_else(|| CoreError::AmountOverflow(coin.denom.clone()))?;
        }
        Ok(Coins(
            totals
                .into_iter()
                .filter(|(_, amount)| *amount != 0)
                .map(|(denom, amount)| Coin::new(denom, amount))
                .collect(),
        ))
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl FromStr for Coins {
    type Err = CoreError;

    /// Parse a comma separated list such as `"3eur,10usd"`.
    ///
    /// Entries are sorted by denomination; the result must be well-formed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Coins::empty());
        }
        let mut coins = s
            .split(',')
            .map(Coin::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        let coins = Coins(coins);
        if !coins.is_valid() {
            return Err(CoreError::InvalidCoins(s.to_string()));
        }
        Ok(coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(list: &[(&str, i128)]) -> Coins {
        Coins::new(list.iter().map(|(d, a)| Coin::new(*d, *a)).collect())
    }

    #[test]
    fn test_valid_denoms() {
        assert!(is_valid_denom("usd"));
        assert!(is_valid_denom("atom2"));
        assert!(!is_valid_denom("us"));
        assert!(!is_valid_denom("USD"));
        assert!(!is_valid_denom("1usd"));
        assert!(!is_valid_denom("averyveryverylongdenom"));
    }

    #[test]
    fn test_is_valid_sorted_unique() {
        assert!(coins(&[("eur", 1), ("usd", 2)]).is_valid());
        assert!(!coins(&[("usd", 2), ("eur", 1)]).is_valid());
        assert!(!coins(&[("usd", 2), ("usd", 1)]).is_valid());
        assert!(Coins::empty().is_valid());
    }

    #[test]
    fn test_is_valid_rejects_zero_entry() {
        assert!(!coins(&[("usd", 0)]).is_valid());
    }

    #[test]
    fn test_negative_is_well_formed_but_flagged() {
        let c = coins(&[("usd", -5)]);
        assert!(c.is_valid());
        assert!(c.is_any_negative());
        assert!(!c.is_all_positive());
    }

    #[test]
    fn test_all_positive_requires_non_empty() {
        assert!(!Coins::empty().is_all_positive());
        assert!(Coins::single("usd", 1).is_all_positive());
    }

    #[test]
    fn test_checked_add_merges_denoms() {
        let a = coins(&[("eur", 2), ("usd", 3)]);
        let b = coins(&[("gbp", 1), ("usd", 7)]);
        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum, coins(&[("eur", 2), ("gbp", 1), ("usd", 10)]));
        assert!(sum.is_valid());
    }

    #[test]
    fn test_checked_add_with_empty() {
        let a = Coins::single("usd", 10);
        assert_eq!(a.checked_add(&Coins::empty()).unwrap(), a);
    }

    #[test]
    fn test_checked_sub_drops_zero_and_keeps_negative() {
        let a = coins(&[("eur", 5), ("usd", 10)]);
        let b = coins(&[("eur", 5), ("usd", 12)]);
        let diff = a.checked_sub(&b).unwrap();
        assert_eq!(diff, coins(&[("usd", -2)]));
    }

    #[test]
    fn test_overflow_detected() {
        let a = Coins::single("usd", i128::MAX);
        let result = a.checked_add(&Coins::single("usd", 1));
        assert!(matches!(result, Err(CoreError::AmountOverflow(_))));
    }

    #[test]
    fn test_parse_coins() {
        let parsed: Coins = "10usd,3eur".parse().unwrap();
        assert_eq!(parsed, coins(&[("eur", 3), ("usd", 10)]));
        assert_eq!(parsed.to_string(), "3eur,10usd");
    }

    #[test]
    fn test_parse_empty_coins() {
        let parsed: Coins = "".parse().unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_parse_invalid_coins() {
        assert!("usd".parse::<Coins>().is_err());
        assert!("10".parse::<Coins>().is_err());
        assert!("10usd,5usd".parse::<Coins>().is_err());
        assert!("0usd".parse::<Coins>().is_err());
        assert!("10US".parse::<Coins>().is_err());
    }

    #[test]
    fn test_amount_of() {
        let c = coins(&[("eur", 3), ("usd", 10)]);
        assert_eq!(c.amount_of("usd"), 10);
        assert_eq!(c.amount_of("gbp"), 0);
    }

    #[test]
    fn test_address_hex_serde() {
        let addr = Address::new(vec![0xab, 0xcd]);
        assert_eq!(addr.to_string(), "abcd");
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"abcd\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn test_address_from_bad_hex() {
        assert!(Address::from_hex("zz").is_err());
        assert!(Address::default().is_empty());
    }

    #[test]
    fn test_parse_channel_id() {
        assert_eq!(parse_channel_id("7").unwrap(), 7);
        assert!(parse_channel_id("-1").is_err());
        assert!(parse_channel_id("abc").is_err());
    }
}
