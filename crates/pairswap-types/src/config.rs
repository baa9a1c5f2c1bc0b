//! Configuration types for PairSwap pools.
//!
//! Pools are configured once at creation. Everything here is plain `serde`
//! data so a deployment can keep its pool settings in a JSON file.

use serde::{Deserialize, Serialize};

use crate::{constants, Address, PairswapError, Result};

/// Swap fee as a fraction `numerator / denominator` of the input amount.
///
/// The default `3 / 1000` is the classic 0.3% fee. The invariant gate
/// scales balances by `denominator` and charges `numerator` per unit of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub numerator: u128,
    pub denominator: u128,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            numerator: constants::DEFAULT_FEE_NUMERATOR,
            denominator: constants::DEFAULT_FEE_DENOMINATOR,
        }
    }
}

impl FeeConfig {
    /// A fee-free configuration (useful for isolating rounding in tests).
    #[must_use]
    pub fn zero() -> Self {
        Self {
            numerator: 0,
            denominator: constants::DEFAULT_FEE_DENOMINATOR,
        }
    }

    /// `denominator - numerator`: the share of each input unit that counts
    /// toward the invariant.
    #[must_use]
    pub fn retained(&self) -> u128 {
        self.denominator - self.numerator
    }

    pub fn validate(&self) -> Result<()> {
        if self.denominator == 0 {
            return Err(PairswapError::Configuration(
                "fee denominator must be non-zero".into(),
            ));
        }
        if self.numerator >= self.denominator {
            return Err(PairswapError::Configuration(format!(
                "fee {}/{} must be below 100%",
                self.numerator, self.denominator
            )));
        }
        Ok(())
    }
}

/// Fraction of sqrt(k) growth minted to the protocol fee recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolFeeShare {
    pub numerator: u128,
    pub denominator: u128,
}

impl Default for ProtocolFeeShare {
    fn default() -> Self {
        Self {
            numerator: constants::DEFAULT_PROTOCOL_SHARE_NUMERATOR,
            denominator: constants::DEFAULT_PROTOCOL_SHARE_DENOMINATOR,
        }
    }
}

impl ProtocolFeeShare {
    pub fn validate(&self) -> Result<()> {
        if self.numerator == 0 || self.numerator >= self.denominator {
            return Err(PairswapError::Configuration(format!(
                "protocol fee share {}/{} must satisfy 0 < n < d",
                self.numerator, self.denominator
            )));
        }
        Ok(())
    }
}

/// Protocol fee switch: on when a recipient is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProtocolFeeConfig {
    pub recipient: Option<Address>,
    #[serde(default)]
    pub share: ProtocolFeeShare,
}

impl ProtocolFeeConfig {
    /// Accrual switched off.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Accrual on, paying the default 1/6 share to `recipient`.
    #[must_use]
    pub fn to(recipient: Address) -> Self {
        Self {
            recipient: Some(recipient),
            share: ProtocolFeeShare::default(),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.recipient.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(recipient) = self.recipient {
            if recipient.is_zero() {
                return Err(PairswapError::Configuration(
                    "protocol fee recipient must not be the zero address".into(),
                ));
            }
            self.share.validate()?;
        }
        Ok(())
    }
}

/// Per-pool configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(default)]
    pub fee: FeeConfig,
    #[serde(default)]
    pub protocol_fee: ProtocolFeeConfig,
}

impl PoolConfig {
    pub fn validate(&self) -> Result<()> {
        self.fee.validate()?;
        self.protocol_fee.validate()
    }

    /// Parse and validate a JSON pool configuration.
    ///
    /// Malformed input surfaces as `Configuration`, not `Serialization`,
    /// since it is an operator mistake rather than a wire-format problem.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| PairswapError::Configuration(format!("invalid pool config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_classic() {
        let cfg = PoolConfig::default();
        assert_eq!(cfg.fee.numerator, 3);
        assert_eq!(cfg.fee.denominator, 1000);
        assert_eq!(cfg.fee.retained(), 997);
        assert!(!cfg.protocol_fee.is_enabled());
        assert_eq!(cfg.protocol_fee.share.denominator, 6);
        cfg.validate().unwrap();
    }

    #[test]
    fn fee_of_one_hundred_percent_rejected() {
        let fee = FeeConfig {
            numerator: 1000,
            denominator: 1000,
        };
        assert!(matches!(fee.validate(), Err(PairswapError::Configuration(_))));
        let fee = FeeConfig {
            numerator: 0,
            denominator: 0,
        };
        assert!(fee.validate().is_err());
    }

    #[test]
    fn protocol_share_bounds() {
        let full = ProtocolFeeShare {
            numerator: 1,
            denominator: 1,
        };
        assert!(full.validate().is_err());
        let none = ProtocolFeeShare {
            numerator: 0,
            denominator: 6,
        };
        assert!(none.validate().is_err());
        ProtocolFeeShare::default().validate().unwrap();
    }

    #[test]
    fn zero_recipient_rejected() {
        let cfg = ProtocolFeeConfig {
            recipient: Some(Address::ZERO),
            share: ProtocolFeeShare::default(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn from_json_fills_defaults() {
        let cfg = PoolConfig::from_json_str(r#"{"fee":{"numerator":1,"denominator":100}}"#).unwrap();
        assert_eq!(cfg.fee.numerator, 1);
        assert!(!cfg.protocol_fee.is_enabled());
    }

    #[test]
    fn from_json_rejects_garbage_and_bad_values() {
        assert!(matches!(
            PoolConfig::from_json_str("{not json"),
            Err(PairswapError::Configuration(_))
        ));
        assert!(matches!(
            PoolConfig::from_json_str(r#"{"fee":{"numerator":5,"denominator":5}}"#),
            Err(PairswapError::Configuration(_))
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = PoolConfig {
            fee: FeeConfig::default(),
            protocol_fee: ProtocolFeeConfig::to(Address::from_label("treasury")),
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back = PoolConfig::from_json_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
