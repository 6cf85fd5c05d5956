//! ABI type and value model.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::wallet::Address;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AbiError {
    #[error("Invalid method signature: {0}")]
    InvalidSignature(String),

    #[error("Unsupported ABI type: {0}")]
    UnsupportedType(String),

    #[error("Value does not match type {expected}: {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Method {method} takes {expected} arguments, got {found}")]
    ArgumentCount {
        method: String,
        expected: usize,
        found: usize,
    },

    #[error("Cannot decode {0}")]
    Decode(String),

    #[error("No return value logged by {0}")]
    MissingReturn(String),

    #[error("Too many foreign references: {0}")]
    TooManyReferences(String),

    #[error("Composer already built; no more transactions can be added")]
    ComposerLocked,
}

/// Transaction types a method can take as an argument.
///
/// These occupy the group positions right before the application call
/// instead of an application argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionArg {
    /// `txn`: any type.
    Any,
    Pay,
    Keyreg,
    Acfg,
    Axfer,
    Afrz,
    Appl,
}

impl TransactionArg {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Any => "txn",
            Self::Pay => "pay",
            Self::Keyreg => "keyreg",
            Self::Acfg => "acfg",
            Self::Axfer => "axfer",
            Self::Afrz => "afrz",
            Self::Appl => "appl",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "txn" => Some(Self::Any),
            "pay" => Some(Self::Pay),
            "keyreg" => Some(Self::Keyreg),
            "acfg" => Some(Self::Acfg),
            "axfer" => Some(Self::Axfer),
            "afrz" => Some(Self::Afrz),
            "appl" => Some(Self::Appl),
            _ => None,
        }
    }

    /// Whether a transaction carrying the wire type `type_tag` fits.
    pub fn accepts(&self, type_tag: &str) -> bool {
        *self == Self::Any || self.tag() == type_tag
    }
}

/// An ARC-4 style value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiType {
    /// `uintN` with N a multiple of 8 between 8 and 512.
    Uint(u16),
    /// `ufixedNxM`: an N-bit unsigned integer scaled by 10^M.
    Ufixed(u16, u8),
    Bool,
    Byte,
    /// `byte[]`, length-prefixed.
    Bytes,
    /// `byte[N]`.
    StaticBytes(usize),
    /// `T[N]`.
    StaticArray(Box<AbiType>, usize),
    /// `T[]`, length-prefixed.
    DynamicArray(Box<AbiType>),
    String,
    Address,
    Tuple(Vec<AbiType>),
    /// Return type only.
    Void,
    Account,
    Asset,
    Application,
    /// Argument type only; supplied as a separate group member.
    Transaction(TransactionArg),
}

const MAX_UINT_BITS: u16 = 512;
const MAX_UFIXED_PRECISION: u8 = 160;

fn valid_bits(bits: u16) -> bool {
    bits > 0 && bits <= MAX_UINT_BITS && bits % 8 == 0
}

impl AbiType {
    /// Reference types are resolved into the foreign arrays and passed as an index.
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Account | Self::Asset | Self::Application)
    }

    pub fn is_transaction(&self) -> bool {
        matches!(self, Self::Transaction(_))
    }

    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Bytes | Self::String | Self::DynamicArray(_) => true,
            Self::StaticArray(elem, _) => elem.is_dynamic(),
            Self::Tuple(children) => children.iter().any(AbiType::is_dynamic),
            _ => false,
        }
    }

    /// Encoded length of a static type.
    pub fn static_len(&self) -> Result<usize, AbiError> {
        match self {
            Self::Uint(bits) | Self::Ufixed(bits, _) => Ok(*bits as usize / 8),
            Self::Bool | Self::Byte => Ok(1),
            Self::StaticBytes(n) => Ok(*n),
            Self::Address => Ok(32),
            Self::Account | Self::Asset | Self::Application => Ok(1),
            Self::StaticArray(elem, n) if **elem == Self::Bool => Ok(n.div_ceil(8)),
            Self::StaticArray(elem, n) => Ok(elem.static_len()? * n),
            Self::Tuple(children) => {
                let mut len = 0;
                let mut i = 0;
                while i < children.len() {
                    if children[i] == Self::Bool {
                        let run = bool_run(&children[i..]);
                        len += 1;
                        i += run;
                    } else {
                        len += children[i].static_len()?;
                        i += 1;
                    }
                }
                Ok(len)
            }
            Self::Bytes
            | Self::String
            | Self::DynamicArray(_)
            | Self::Void
            | Self::Transaction(_) => {
                Err(AbiError::UnsupportedType(format!("{} has no static length", self)))
            }
        }
    }

    /// Tuple members laid out like an array of `len` elements.
    pub(crate) fn array_members(elem: &AbiType, len: usize) -> Vec<AbiType> {
        vec![elem.clone(); len]
    }
}

/// Length of the run of consecutive bools at the start of `types`, capped at 8.
pub(crate) fn bool_run(types: &[AbiType]) -> usize {
    types
        .iter()
        .take(8)
        .take_while(|ty| **ty == AbiType::Bool)
        .count()
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint(bits) => write!(f, "uint{}", bits),
            Self::Ufixed(bits, precision) => write!(f, "ufixed{}x{}", bits, precision),
            Self::Bool => f.write_str("bool"),
            Self::Byte => f.write_str("byte"),
            Self::Bytes => f.write_str("byte[]"),
            Self::StaticBytes(n) => write!(f, "byte[{}]", n),
            Self::StaticArray(elem, n) => write!(f, "{}[{}]", elem, n),
            Self::DynamicArray(elem) => write!(f, "{}[]", elem),
            Self::String => f.write_str("string"),
            Self::Address => f.write_str("address"),
            Self::Tuple(children) => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
            Self::Void => f.write_str("void"),
            Self::Account => f.write_str("account"),
            Self::Asset => f.write_str("asset"),
            Self::Application => f.write_str("application"),
            Self::Transaction(arg) => f.write_str(arg.tag()),
        }
    }
}

impl FromStr for AbiType {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || AbiError::UnsupportedType(s.to_string());
        match s {
            "bool" => return Ok(Self::Bool),
            "byte" => return Ok(Self::Byte),
            "string" => return Ok(Self::String),
            "address" => return Ok(Self::Address),
            "void" => return Ok(Self::Void),
            "account" => return Ok(Self::Account),
            "asset" => return Ok(Self::Asset),
            "application" => return Ok(Self::Application),
            _ => {}
        }
        if let Some(arg) = TransactionArg::from_tag(s) {
            return Ok(Self::Transaction(arg));
        }

        // Array suffix binds last: `(uint64,bool)[2][]` is an array of arrays.
        if let Some(body) = s.strip_suffix(']') {
            let open = body.rfind('[').ok_or_else(unsupported)?;
            let elem: AbiType = body[..open].parse()?;
            if elem == Self::Void || elem.is_reference() || elem.is_transaction() {
                return Err(unsupported());
            }
            let len = &body[open + 1..];
            if len.is_empty() {
                return Ok(match elem {
                    Self::Byte => Self::Bytes,
                    elem => Self::DynamicArray(Box::new(elem)),
                });
            }
            let len: usize = len.parse().map_err(|_| unsupported())?;
            return Ok(match elem {
                Self::Byte => Self::StaticBytes(len),
                elem => Self::StaticArray(Box::new(elem), len),
            });
        }

        if let Some(spec) = s.strip_prefix("ufixed") {
            let (bits, precision) = spec.split_once('x').ok_or_else(unsupported)?;
            let bits: u16 = bits.parse().map_err(|_| unsupported())?;
            let precision: u8 = precision.parse().map_err(|_| unsupported())?;
            if !valid_bits(bits) || precision == 0 || precision > MAX_UFIXED_PRECISION {
                return Err(unsupported());
            }
            return Ok(Self::Ufixed(bits, precision));
        }

        if let Some(bits) = s.strip_prefix("uint") {
            let bits: u16 = bits.parse().map_err(|_| unsupported())?;
            if !valid_bits(bits) {
                return Err(unsupported());
            }
            return Ok(Self::Uint(bits));
        }

        if let Some(inner) = s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
            let children = split_top_level(inner)
                .ok_or_else(unsupported)?
                .into_iter()
                .map(|child| child.parse::<AbiType>())
                .collect::<Result<Vec<_>, _>>()?;
            if children
                .iter()
                .any(|c| *c == Self::Void || c.is_reference() || c.is_transaction())
            {
                return Err(unsupported());
            }
            return Ok(Self::Tuple(children));
        }

        Err(unsupported())
    }
}

/// Split a comma-separated type list, respecting nested parentheses.
///
/// Returns `None` on unbalanced parentheses.
pub(crate) fn split_top_level(list: &str) -> Option<Vec<&str>> {
    if list.is_empty() {
        return Some(Vec::new());
    }

    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(&list[start..]);
    Some(parts)
}

/// A value to encode, or one decoded from a return log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    /// Also used for `ufixed` (the scaled integer) and for `asset` and
    /// `application` references. Wider types are zero-extended.
    Uint(u128),
    Bool(bool),
    Byte(u8),
    Bytes(Vec<u8>),
    String(String),
    /// Also used for `account` references.
    Address(Address),
    Tuple(Vec<AbiValue>),
    /// Elements of a static or dynamic array.
    Array(Vec<AbiValue>),
}

impl AbiValue {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Uint(v) => format!("uint {}", v),
            Self::Bool(v) => format!("bool {}", v),
            Self::Byte(v) => format!("byte {}", v),
            Self::Bytes(v) => format!("{} bytes", v.len()),
            Self::String(v) => format!("string {:?}", v),
            Self::Address(v) => format!("address {}", v),
            Self::Tuple(v) => format!("tuple of {}", v.len()),
            Self::Array(v) => format!("array of {}", v.len()),
        }
    }
}

impl fmt::Display for AbiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Byte(v) => write!(f, "{}", v),
            Self::Bytes(v) => write!(f, "0x{}", v.iter().map(|b| format!("{:02x}", b)).collect::<String>()),
            Self::String(v) => f.write_str(v),
            Self::Address(v) => write!(f, "{}", v),
            Self::Tuple(values) => write_list(f, "(", values, ")"),
            Self::Array(values) => write_list(f, "[", values, "]"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, open: &str, values: &[AbiValue], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", value)?;
    }
    f.write_str(close)
}

impl From<u64> for AbiValue {
    fn from(v: u64) -> Self {
        Self::Uint(u128::from(v))
    }
}

impl From<u128> for AbiValue {
    fn from(v: u128) -> Self {
        Self::Uint(v)
    }
}

impl From<bool> for AbiValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for AbiValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for AbiValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Address> for AbiValue {
    fn from(v: Address) -> Self {
        Self::Address(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_types() {
        assert_eq!("uint64".parse::<AbiType>().unwrap(), AbiType::Uint(64));
        assert_eq!("uint8".parse::<AbiType>().unwrap(), AbiType::Uint(8));
        assert_eq!("byte[]".parse::<AbiType>().unwrap(), AbiType::Bytes);
        assert_eq!("byte[32]".parse::<AbiType>().unwrap(), AbiType::StaticBytes(32));
        assert_eq!("asset".parse::<AbiType>().unwrap(), AbiType::Asset);
    }

    #[test]
    fn test_parse_wide_and_fixed_point() {
        assert_eq!("uint128".parse::<AbiType>().unwrap(), AbiType::Uint(128));
        assert_eq!("uint512".parse::<AbiType>().unwrap(), AbiType::Uint(512));
        assert_eq!("ufixed64x2".parse::<AbiType>().unwrap(), AbiType::Ufixed(64, 2));
        assert_eq!(AbiType::Ufixed(64, 2).static_len().unwrap(), 8);
    }

    #[test]
    fn test_parse_arrays() {
        assert_eq!(
            "uint64[]".parse::<AbiType>().unwrap(),
            AbiType::DynamicArray(Box::new(AbiType::Uint(64)))
        );
        let pair: AbiType = "address[2]".parse().unwrap();
        assert_eq!(pair, AbiType::StaticArray(Box::new(AbiType::Address), 2));
        assert_eq!(pair.static_len().unwrap(), 64);
        assert!(!pair.is_dynamic());

        let nested: AbiType = "(uint64,bool)[2][]".parse().unwrap();
        assert_eq!(nested.to_string(), "(uint64,bool)[2][]");
        assert!(nested.is_dynamic());
        assert!("string[3]".parse::<AbiType>().unwrap().is_dynamic());
        assert_eq!("bool[9]".parse::<AbiType>().unwrap().static_len().unwrap(), 2);
    }

    #[test]
    fn test_parse_transaction_args() {
        assert_eq!(
            "pay".parse::<AbiType>().unwrap(),
            AbiType::Transaction(TransactionArg::Pay)
        );
        let any: AbiType = "txn".parse().unwrap();
        assert_eq!(any.to_string(), "txn");
        assert!(TransactionArg::Any.accepts("axfer"));
        assert!(TransactionArg::Pay.accepts("pay"));
        assert!(!TransactionArg::Pay.accepts("appl"));
    }

    #[test]
    fn test_parse_rejects_unsupported() {
        assert!("uint7".parse::<AbiType>().is_err());
        assert!("uint520".parse::<AbiType>().is_err());
        assert!("ufixed64x0".parse::<AbiType>().is_err());
        assert!("ufixed64x161".parse::<AbiType>().is_err());
        assert!("(uint64,account)".parse::<AbiType>().is_err());
        assert!("(uint64,pay)".parse::<AbiType>().is_err());
        assert!("pay[2]".parse::<AbiType>().is_err());
        assert!("uint64[two]".parse::<AbiType>().is_err());
    }

    #[test]
    fn test_parse_nested_tuple() {
        let ty: AbiType = "(uint64,(bool,string),address)".parse().unwrap();
        assert_eq!(
            ty,
            AbiType::Tuple(vec![
                AbiType::Uint(64),
                AbiType::Tuple(vec![AbiType::Bool, AbiType::String]),
                AbiType::Address,
            ])
        );
        assert!(ty.is_dynamic());
        assert_eq!(ty.to_string(), "(uint64,(bool,string),address)");
    }

    #[test]
    fn test_static_len_packs_bools() {
        let ty: AbiType = "(bool,bool,bool,uint16,bool)".parse().unwrap();
        assert_eq!(ty.static_len().unwrap(), 1 + 2 + 1);
        let nine = AbiType::Tuple(vec![AbiType::Bool; 9]);
        assert_eq!(nine.static_len().unwrap(), 2);
    }

    #[test]
    fn test_split_unbalanced() {
        assert!(split_top_level("uint64,(bool").is_none());
        assert!(split_top_level("uint64),bool").is_none());
        assert_eq!(split_top_level("").unwrap().len(), 0);
    }
}
