//! Method signatures, selectors and argument layout for application calls.

use std::fmt;
use std::str::FromStr;

use crate::abi::codec;
use crate::abi::types::{split_top_level, AbiError, AbiType, AbiValue, TransactionArg};
use crate::encoding::sha512_256;
use crate::transaction::ApplicationCall;
use crate::wallet::Address;

/// Log prefix marking a method's return value.
pub const RETURN_PREFIX: [u8; 4] = [0x15, 0x1f, 0x7c, 0x75];

/// Application arguments available after the selector.
const MAX_APP_ARGS: usize = 15;

/// Per-call limit on the foreign account, asset and application arrays.
const MAX_FOREIGN_REFS: usize = 8;

/// A parsed method signature such as `add(uint64,uint64)uint64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub args: Vec<AbiType>,
    pub returns: AbiType,
}

impl Method {
    pub fn new(name: impl Into<String>, args: Vec<AbiType>, returns: AbiType) -> Self {
        Self {
            name: name.into(),
            args,
            returns,
        }
    }

    /// Canonical signature text.
    pub fn signature(&self) -> String {
        self.to_string()
    }

    /// First four bytes of the hashed signature.
    pub fn selector(&self) -> [u8; 4] {
        let hash = sha512_256(&[self.signature().as_bytes()]);
        [hash[0], hash[1], hash[2], hash[3]]
    }

    /// Transaction-typed arguments, in order.
    pub fn transaction_args(&self) -> Vec<TransactionArg> {
        self.args
            .iter()
            .filter_map(|arg| match arg {
                AbiType::Transaction(txn) => Some(*txn),
                _ => None,
            })
            .collect()
    }

    /// Arguments passed as values, i.e. all but the transaction-typed ones.
    pub fn value_arg_count(&self) -> usize {
        self.args.iter().filter(|arg| !arg.is_transaction()).count()
    }

    /// Fill in selector, arguments and foreign arrays on `call`.
    ///
    /// `values` covers every argument except transaction-typed ones, which
    /// travel as the preceding group members. Reference arguments are
    /// resolved into the foreign arrays: accounts index from 1 (0 is the
    /// sender), assets from 0, applications from 1 (0 is the called
    /// application).
    pub fn apply_arguments(
        &self,
        call: ApplicationCall,
        sender: Address,
        values: &[AbiValue],
    ) -> Result<ApplicationCall, AbiError> {
        if values.len() != self.value_arg_count() {
            return Err(AbiError::ArgumentCount {
                method: self.signature(),
                expected: self.value_arg_count(),
                found: values.len(),
            });
        }

        let mut call = call;
        let mut types = Vec::with_capacity(values.len());
        let mut resolved = Vec::with_capacity(values.len());
        let value_args = self.args.iter().filter(|arg| !arg.is_transaction());
        for (ty, value) in value_args.zip(values) {
            match (ty, value) {
                (AbiType::Account, AbiValue::Address(addr)) => {
                    let index = if *addr == sender {
                        0
                    } else {
                        position_or_push(&mut call.accounts, *addr) + 1
                    };
                    types.push(AbiType::Uint(8));
                    resolved.push(AbiValue::Uint(index as u128));
                }
                (AbiType::Asset, AbiValue::Uint(asset_id)) => {
                    let asset_id = reference_id(ty, *asset_id)?;
                    let index = position_or_push(&mut call.foreign_assets, asset_id);
                    types.push(AbiType::Uint(8));
                    resolved.push(AbiValue::Uint(index as u128));
                }
                (AbiType::Application, AbiValue::Uint(app_id)) => {
                    let app_id = reference_id(ty, *app_id)?;
                    let index = if app_id == call.app_id {
                        0
                    } else {
                        position_or_push(&mut call.foreign_apps, app_id) + 1
                    };
                    types.push(AbiType::Uint(8));
                    resolved.push(AbiValue::Uint(index as u128));
                }
                (ty, value) if ty.is_reference() => {
                    return Err(AbiError::TypeMismatch {
                        expected: ty.to_string(),
                        found: value.describe(),
                    });
                }
                (ty, value) => {
                    types.push(ty.clone());
                    resolved.push(value.clone());
                }
            }
        }

        for (name, len) in [
            ("accounts", call.accounts.len()),
            ("assets", call.foreign_assets.len()),
            ("applications", call.foreign_apps.len()),
        ] {
            if len > MAX_FOREIGN_REFS {
                return Err(AbiError::TooManyReferences(format!("{} {}", len, name)));
            }
        }

        let mut args = vec![self.selector().to_vec()];
        if types.len() > MAX_APP_ARGS {
            let split = MAX_APP_ARGS - 1;
            for (ty, value) in types[..split].iter().zip(&resolved[..split]) {
                args.push(codec::encode(ty, value)?);
            }
            args.push(codec::encode_tuple(&types[split..], &resolved[split..])?);
        } else {
            for (ty, value) in types.iter().zip(&resolved) {
                args.push(codec::encode(ty, value)?);
            }
        }

        call.args = args;
        Ok(call)
    }

    /// Decode the return value from a confirmed call's logs.
    ///
    /// # Returns
    /// `None` for `void` methods; otherwise the last log entry must carry
    /// the return prefix.
    pub fn decode_return(&self, logs: &[Vec<u8>]) -> Result<(Vec<u8>, Option<AbiValue>), AbiError> {
        if self.returns == AbiType::Void {
            return Ok((Vec::new(), None));
        }

        let raw = logs
            .last()
            .and_then(|entry| entry.strip_prefix(&RETURN_PREFIX[..]))
            .ok_or_else(|| AbiError::MissingReturn(self.signature()))?;
        let value = codec::decode(&self.returns, raw)?;
        Ok((raw.to_vec(), Some(value)))
    }
}

fn reference_id(ty: &AbiType, id: u128) -> Result<u64, AbiError> {
    u64::try_from(id).map_err(|_| AbiError::TypeMismatch {
        expected: ty.to_string(),
        found: format!("id {}", id),
    })
}

fn position_or_push<T: PartialEq + Copy>(list: &mut Vec<T>, item: T) -> usize {
    match list.iter().position(|existing| *existing == item) {
        Some(index) => index,
        None => {
            list.push(item);
            list.len() - 1
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, "){}", self.returns)
    }
}

impl FromStr for Method {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AbiError::InvalidSignature(s.to_string());

        let open = s.find('(').ok_or_else(invalid)?;
        let name = &s[..open];
        if name.is_empty() {
            return Err(invalid());
        }

        let mut depth = 0usize;
        let mut close = None;
        for (i, c) in s[open..].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(open + i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let close = close.ok_or_else(invalid)?;

        let args = split_top_level(&s[open + 1..close])
            .ok_or_else(invalid)?
            .into_iter()
            .map(str::parse::<AbiType>)
            .collect::<Result<Vec<_>, _>>()?;
        if args.contains(&AbiType::Void) {
            return Err(invalid());
        }

        let returns: AbiType = s[close + 1..].parse()?;
        if returns.is_reference() || returns.is_transaction() {
            return Err(invalid());
        }

        Ok(Self::new(name, args, returns))
    }
}
