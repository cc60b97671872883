use crate::error::Error;
use alloy_primitives::U256;
use serde::{Deserialize, Deserializer};

/// Result of eth_getBlockByNumber with full transaction objects
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecutionBlock {
    #[serde(deserialize_with = "null_as_default")]
    pub number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub base_fee_per_gas: String,
    #[serde(deserialize_with = "null_as_default")]
    pub extra_data: String,
    #[serde(deserialize_with = "null_as_default")]
    pub transactions: Vec<Transaction>,
}

/// Transaction object as returned inside a full block.
///
/// Quantities stay as the raw hex strings the node sent; fields that are
/// missing or `null` for a given transaction type decode as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    #[serde(deserialize_with = "null_as_default")]
    pub hash: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gas: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gas_price: String,
}

/// Decode an explicit JSON `null` the same way as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a 0x-prefixed hex quantity into a 256-bit integer
pub fn parse_hex_quantity(s: &str) -> Result<U256, Error> {
    let digits = s
        .strip_prefix("0x")
        .filter(|d| !d.is_empty())
        .ok_or_else(|| Error::Parse(format!("invalid hex format: {:?}", s)))?;

    U256::from_str_radix(digits, 16)
        .map_err(|e| Error::Parse(format!("failed to parse hex quantity {:?}: {}", s, e)))
}

/// Decode 0x-prefixed hex data into raw bytes
pub fn decode_hex_data(s: &str) -> Result<Vec<u8>, Error> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| Error::Parse(format!("invalid hex data: {:?}", s)))?;

    hex::decode(digits).map_err(|e| Error::Parse(format!("invalid hex data {:?}: {}", s, e)))
}

/// Convert a decimal block number (beacon payload encoding) to the 0x form the
/// execution API expects
pub fn block_number_to_hex(decimal: &str) -> Result<String, Error> {
    let number: u64 = decimal
        .parse()
        .map_err(|e| Error::Parse(format!("invalid block number {:?}: {}", decimal, e)))?;
    Ok(format!("0x{:x}", number))
}
