//! Binary encoding of ABI values.
//!
//! Integers are big-endian and zero-extended to their declared width
//! (`ufixed` encodes its scaled integer the same way). `bool` is one byte
//! with the top bit set for true; dynamic values carry a 2-byte length
//! prefix. In tuples up to eight consecutive bools share one byte (most
//! significant bit first) and dynamic members sit in the tail behind 2-byte
//! offsets from the tuple start.
//! Arrays are laid out like tuples of their elements; dynamic arrays add an
//! element-count prefix.

use crate::abi::types::{bool_run, AbiError, AbiType, AbiValue};
use crate::wallet::Address;

fn mismatch(ty: &AbiType, value: &AbiValue) -> AbiError {
    AbiError::TypeMismatch {
        expected: ty.to_string(),
        found: value.describe(),
    }
}

fn length_prefix(len: usize, ty: &AbiType) -> Result<[u8; 2], AbiError> {
    u16::try_from(len)
        .map(u16::to_be_bytes)
        .map_err(|_| AbiError::TypeMismatch {
            expected: ty.to_string(),
            found: format!("{} elements", len),
        })
}

const U128_WIDTH: usize = 16;

fn encode_uint(ty: &AbiType, bits: u16, value: &AbiValue, v: u128) -> Result<Vec<u8>, AbiError> {
    let width = bits as usize / 8;
    if bits < 128 && v >> bits != 0 {
        return Err(mismatch(ty, value));
    }
    let be = v.to_be_bytes();
    if width >= U128_WIDTH {
        let mut out = vec![0u8; width - U128_WIDTH];
        out.extend_from_slice(&be);
        Ok(out)
    } else {
        Ok(be[U128_WIDTH - width..].to_vec())
    }
}

/// Encode `value` as `ty`.
pub fn encode(ty: &AbiType, value: &AbiValue) -> Result<Vec<u8>, AbiError> {
    match (ty, value) {
        (AbiType::Uint(bits) | AbiType::Ufixed(bits, _), AbiValue::Uint(v)) => {
            encode_uint(ty, *bits, value, *v)
        }
        (AbiType::Bool, AbiValue::Bool(v)) => Ok(vec![if *v { 0x80 } else { 0x00 }]),
        (AbiType::Byte, AbiValue::Byte(v)) => Ok(vec![*v]),
        (AbiType::Bytes, AbiValue::Bytes(v)) => {
            let mut out = length_prefix(v.len(), ty)?.to_vec();
            out.extend_from_slice(v);
            Ok(out)
        }
        (AbiType::StaticBytes(n), AbiValue::Bytes(v)) if v.len() == *n => Ok(v.clone()),
        (AbiType::String, AbiValue::String(v)) => {
            let mut out = length_prefix(v.len(), ty)?.to_vec();
            out.extend_from_slice(v.as_bytes());
            Ok(out)
        }
        (AbiType::Address, AbiValue::Address(v)) => Ok(v.as_bytes().to_vec()),
        (AbiType::Tuple(types), AbiValue::Tuple(values)) => encode_tuple(types, values),
        (AbiType::StaticArray(elem, n), AbiValue::Array(values)) if values.len() == *n => {
            encode_tuple(&AbiType::array_members(elem, *n), values)
        }
        (AbiType::DynamicArray(elem), AbiValue::Array(values)) => {
            let mut out = length_prefix(values.len(), ty)?.to_vec();
            out.extend(encode_tuple(&AbiType::array_members(elem, values.len()), values)?);
            Ok(out)
        }
        _ => Err(mismatch(ty, value)),
    }
}

/// Encode the members of a tuple (or an argument list packed into one).
pub fn encode_tuple(types: &[AbiType], values: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
    if types.len() != values.len() {
        return Err(AbiError::TypeMismatch {
            expected: format!("{} tuple members", types.len()),
            found: format!("{} values", values.len()),
        });
    }

    let mut heads: Vec<Vec<u8>> = Vec::new();
    let mut tails: Vec<Vec<u8>> = Vec::new();
    let mut dynamic: Vec<bool> = Vec::new();

    let mut i = 0;
    while i < types.len() {
        if types[i] == AbiType::Bool {
            let run = bool_run(&types[i..]);
            let mut packed = 0u8;
            for (bit, value) in values[i..i + run].iter().enumerate() {
                match value {
                    AbiValue::Bool(true) => packed |= 0x80 >> bit,
                    AbiValue::Bool(false) => {}
                    other => return Err(mismatch(&AbiType::Bool, other)),
                }
            }
            heads.push(vec![packed]);
            tails.push(Vec::new());
            dynamic.push(false);
            i += run;
        } else if types[i].is_dynamic() {
            heads.push(vec![0, 0]);
            tails.push(encode(&types[i], &values[i])?);
            dynamic.push(true);
            i += 1;
        } else {
            heads.push(encode(&types[i], &values[i])?);
            tails.push(Vec::new());
            dynamic.push(false);
            i += 1;
        }
    }

    let head_len: usize = heads.iter().map(Vec::len).sum();

    let tuple_ty = AbiType::Tuple(types.to_vec());
    let mut offset = head_len;
    for (idx, is_dynamic) in dynamic.iter().enumerate() {
        if *is_dynamic {
            heads[idx] = length_prefix(offset, &tuple_ty)?.to_vec();
            offset += tails[idx].len();
        }
    }

    let mut out = Vec::with_capacity(offset);
    for head in &heads {
        out.extend_from_slice(head);
    }
    for tail in &tails {
        out.extend_from_slice(tail);
    }
    Ok(out)
}

fn short(ty: &AbiType) -> AbiError {
    AbiError::Decode(format!("{}: input too short", ty))
}

fn read_u16(bytes: &[u8], at: usize, ty: &AbiType) -> Result<usize, AbiError> {
    bytes
        .get(at..at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]) as usize)
        .ok_or_else(|| short(ty))
}

/// Decode a complete `ty` value; trailing bytes are an error for static types.
pub fn decode(ty: &AbiType, bytes: &[u8]) -> Result<AbiValue, AbiError> {
    match ty {
        AbiType::Uint(_)
        | AbiType::Ufixed(..)
        | AbiType::Bool
        | AbiType::Byte
        | AbiType::StaticBytes(_)
        | AbiType::Address => {
            let len = ty.static_len()?;
            if bytes.len() != len {
                return Err(AbiError::Decode(format!(
                    "{}: expected {} bytes, got {}",
                    ty,
                    len,
                    bytes.len()
                )));
            }
            decode_static(ty, bytes)
        }
        AbiType::Bytes | AbiType::String => {
            let len = read_u16(bytes, 0, ty)?;
            let body = bytes.get(2..).ok_or_else(|| short(ty))?;
            if body.len() != len {
                return Err(AbiError::Decode(format!(
                    "{}: length prefix {} but {} bytes follow",
                    ty,
                    len,
                    body.len()
                )));
            }
            if *ty == AbiType::String {
                String::from_utf8(body.to_vec())
                    .map(AbiValue::String)
                    .map_err(|_| AbiError::Decode("string is not UTF-8".to_string()))
            } else {
                Ok(AbiValue::Bytes(body.to_vec()))
            }
        }
        AbiType::Tuple(types) => decode_members(types, bytes).map(AbiValue::Tuple),
        AbiType::StaticArray(elem, n) => {
            decode_members(&AbiType::array_members(elem, *n), bytes).map(AbiValue::Array)
        }
        AbiType::DynamicArray(elem) => {
            let len = read_u16(bytes, 0, ty)?;
            let body = bytes.get(2..).ok_or_else(|| short(ty))?;
            decode_members(&AbiType::array_members(elem, len), body).map(AbiValue::Array)
        }
        AbiType::Void
        | AbiType::Account
        | AbiType::Asset
        | AbiType::Application
        | AbiType::Transaction(_) => {
            Err(AbiError::UnsupportedType(format!("cannot decode {}", ty)))
        }
    }
}

fn decode_static(ty: &AbiType, bytes: &[u8]) -> Result<AbiValue, AbiError> {
    match ty {
        AbiType::Uint(_) | AbiType::Ufixed(..) => {
            let split = bytes.len().saturating_sub(U128_WIDTH);
            let (high, low) = bytes.split_at(split);
            if high.iter().any(|b| *b != 0) {
                return Err(AbiError::Decode(format!("{}: value exceeds 128 bits", ty)));
            }
            let mut buf = [0u8; U128_WIDTH];
            buf[U128_WIDTH - low.len()..].copy_from_slice(low);
            Ok(AbiValue::Uint(u128::from_be_bytes(buf)))
        }
        AbiType::Bool => match bytes[0] {
            0x80 => Ok(AbiValue::Bool(true)),
            0x00 => Ok(AbiValue::Bool(false)),
            other => Err(AbiError::Decode(format!("bool byte {:#04x}", other))),
        },
        AbiType::Byte => Ok(AbiValue::Byte(bytes[0])),
        AbiType::StaticBytes(_) => Ok(AbiValue::Bytes(bytes.to_vec())),
        AbiType::Address => {
            let mut key = [0u8; 32];
            key.copy_from_slice(bytes);
            Ok(AbiValue::Address(Address::new(key)))
        }
        _ => decode(ty, bytes),
    }
}

/// Decode tuple members (or array elements laid out as a tuple).
fn decode_members(types: &[AbiType], bytes: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
    let tuple_ty = AbiType::Tuple(types.to_vec());
    let mut values: Vec<Option<AbiValue>> = vec![None; types.len()];
    let mut dynamic: Vec<(usize, usize)> = Vec::new();
    let mut pos = 0;

    let mut i = 0;
    while i < types.len() {
        if types[i] == AbiType::Bool {
            let run = bool_run(&types[i..]);
            let packed = *bytes.get(pos).ok_or_else(|| short(&tuple_ty))?;
            for bit in 0..run {
                values[i + bit] = Some(AbiValue::Bool(packed & (0x80 >> bit) != 0));
            }
            pos += 1;
            i += run;
        } else if types[i].is_dynamic() {
            dynamic.push((i, read_u16(bytes, pos, &tuple_ty)?));
            pos += 2;
            i += 1;
        } else {
            let len = types[i].static_len()?;
            let slice = bytes.get(pos..pos + len).ok_or_else(|| short(&tuple_ty))?;
            values[i] = Some(decode(&types[i], slice)?);
            pos += len;
            i += 1;
        }
    }

    if dynamic.is_empty() && pos != bytes.len() {
        return Err(AbiError::Decode(format!("{}: trailing bytes", tuple_ty)));
    }

    for (n, (idx, start)) in dynamic.iter().enumerate() {
        let end = dynamic.get(n + 1).map(|(_, next)| *next).unwrap_or(bytes.len());
        if *start < pos || end < *start || end > bytes.len() {
            return Err(AbiError::Decode(format!("{}: bad offset {}", tuple_ty, start)));
        }
        values[*idx] = Some(decode(&types[*idx], &bytes[*start..end])?);
    }

    values
        .into_iter()
        .map(|v| v.ok_or_else(|| short(&tuple_ty)))
        .collect()
}
