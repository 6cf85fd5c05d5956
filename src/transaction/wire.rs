//! Canonical msgpack layout of requests and signatures.
//!
//! Every wire struct lists its fields in lexicographic key order and skips
//! zero values, which is what the ledger hashes and verifies.

use serde::Serialize;
use serde_bytes::Bytes;

use crate::encoding::{is_false, is_zero};
use crate::transaction::types::{AssetParams, StateSchema, Transaction, TransactionKind};
use crate::wallet::Address;

#[derive(Serialize)]
pub(crate) struct TxnWire<'a> {
    #[serde(skip_serializing_if = "is_zero")]
    aamt: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    aclose: Option<Address>,
    #[serde(skip_serializing_if = "is_false")]
    afrz: bool,
    #[serde(skip_serializing_if = "is_zero")]
    amt: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    apaa: Vec<&'a Bytes>,
    #[serde(skip_serializing_if = "is_zero")]
    apan: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    apap: Option<&'a Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apar: Option<AssetParamsWire<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    apas: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    apat: Vec<Address>,
    #[serde(skip_serializing_if = "is_zero")]
    apep: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    apfa: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apgs: Option<SchemaWire>,
    #[serde(skip_serializing_if = "is_zero")]
    apid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    apls: Option<SchemaWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apsu: Option<&'a Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arcv: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    asnd: Option<Address>,
    #[serde(skip_serializing_if = "is_zero")]
    caid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    close: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fadd: Option<Address>,
    #[serde(skip_serializing_if = "is_zero")]
    faid: u64,
    #[serde(skip_serializing_if = "is_zero")]
    fee: u64,
    #[serde(skip_serializing_if = "is_zero")]
    fv: u64,
    #[serde(skip_serializing_if = "str::is_empty")]
    gen: &'a str,
    gh: &'a Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    grp: Option<&'a Bytes>,
    #[serde(skip_serializing_if = "is_zero")]
    lv: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    lx: Option<&'a Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rcv: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rekey: Option<Address>,
    snd: Address,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    xaid: u64,
}

#[derive(Serialize)]
struct AssetParamsWire<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    am: Option<&'a Bytes>,
    #[serde(skip_serializing_if = "str::is_empty")]
    an: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    au: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    c: Option<Address>,
    #[serde(skip_serializing_if = "is_zero")]
    dc: u64,
    #[serde(skip_serializing_if = "is_false")]
    df: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    f: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    m: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    r: Option<Address>,
    #[serde(skip_serializing_if = "is_zero")]
    t: u64,
    #[serde(skip_serializing_if = "str::is_empty")]
    un: &'a str,
}

#[derive(Serialize)]
struct SchemaWire {
    #[serde(skip_serializing_if = "is_zero")]
    nbs: u64,
    #[serde(skip_serializing_if = "is_zero")]
    nui: u64,
}

fn schema(schema: &StateSchema) -> Option<SchemaWire> {
    (*schema != StateSchema::default()).then(|| SchemaWire {
        nbs: schema.num_byte_slices,
        nui: schema.num_uints,
    })
}

fn bytes(value: &[u8]) -> Option<&Bytes> {
    (!value.is_empty()).then(|| Bytes::new(value))
}

fn asset_params(params: &AssetParams) -> AssetParamsWire<'_> {
    AssetParamsWire {
        am: params.metadata_hash.as_ref().map(|h| Bytes::new(h)),
        an: &params.asset_name,
        au: &params.url,
        c: params.clawback,
        dc: params.decimals as u64,
        df: params.default_frozen,
        f: params.freeze,
        m: params.manager,
        r: params.reserve,
        t: params.total,
        un: &params.unit_name,
    }
}

impl<'a> TxnWire<'a> {
    pub(crate) fn new(txn: &'a Transaction) -> Self {
        let header = &txn.header;
        let mut wire = TxnWire {
            aamt: 0,
            aclose: None,
            afrz: false,
            amt: 0,
            apaa: Vec::new(),
            apan: 0,
            apap: None,
            apar: None,
            apas: Vec::new(),
            apat: Vec::new(),
            apep: 0,
            apfa: Vec::new(),
            apgs: None,
            apid: 0,
            apls: None,
            apsu: None,
            arcv: None,
            asnd: None,
            caid: 0,
            close: None,
            fadd: None,
            faid: 0,
            fee: header.fee,
            fv: header.first_valid,
            gen: &header.genesis_id,
            gh: Bytes::new(&header.genesis_hash),
            grp: header.group.as_ref().map(|g| Bytes::new(g)),
            lv: header.last_valid,
            lx: header.lease.as_ref().map(|l| Bytes::new(l)),
            note: bytes(&header.note),
            rcv: None,
            rekey: header.rekey_to,
            snd: header.sender,
            kind: txn.kind.type_tag(),
            xaid: 0,
        };

        match &txn.kind {
            TransactionKind::Payment(pay) => {
                wire.amt = pay.amount;
                wire.rcv = Some(pay.receiver).filter(|r| *r != Address::ZERO);
                wire.close = pay.close_remainder_to;
            }
            TransactionKind::AssetConfig(cfg) => {
                wire.caid = cfg.asset_id;
                wire.apar = cfg.params.as_ref().map(asset_params);
            }
            TransactionKind::AssetTransfer(xfer) => {
                wire.xaid = xfer.asset_id;
                wire.aamt = xfer.amount;
                wire.arcv = Some(xfer.receiver).filter(|r| *r != Address::ZERO);
                wire.aclose = xfer.close_to;
                wire.asnd = xfer.revocation_target;
            }
            TransactionKind::AssetFreeze(frz) => {
                wire.faid = frz.asset_id;
                wire.fadd = Some(frz.target);
                wire.afrz = frz.frozen;
            }
            TransactionKind::ApplicationCall(call) => {
                wire.apid = call.app_id;
                wire.apan = call.on_complete as u64;
                wire.apap = bytes(&call.approval_program);
                wire.apsu = bytes(&call.clear_program);
                wire.apgs = schema(&call.global_schema);
                wire.apls = schema(&call.local_schema);
                wire.apep = call.extra_pages as u64;
                wire.apaa = call.args.iter().map(|a| Bytes::new(a)).collect();
                wire.apat = call.accounts.clone();
                wire.apfa = call.foreign_apps.clone();
                wire.apas = call.foreign_assets.clone();
            }
        }
        wire
    }
}

#[derive(Serialize)]
pub(crate) struct SubsigWire<'a> {
    pk: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    s: Option<&'a Bytes>,
}

#[derive(Serialize)]
pub(crate) struct MultisigWire<'a> {
    subsig: Vec<SubsigWire<'a>>,
    thr: u8,
    v: u8,
}

impl<'a> MultisigWire<'a> {
    pub(crate) fn new(sig: &'a crate::transaction::signed::MultisigSignature) -> Self {
        MultisigWire {
            subsig: sig
                .subsignatures
                .iter()
                .map(|sub| SubsigWire {
                    pk: sub.public_key,
                    s: sub.signature.as_ref().map(|s| Bytes::new(s)),
                })
                .collect(),
            thr: sig.threshold,
            v: sig.version,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct LogicSigWire<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    arg: Vec<&'a Bytes>,
    l: &'a Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    msig: Option<MultisigWire<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sig: Option<&'a Bytes>,
}

impl<'a> LogicSigWire<'a> {
    pub(crate) fn new(lsig: &'a crate::transaction::logicsig::LogicSig) -> Self {
        LogicSigWire {
            arg: lsig.args.iter().map(|a| Bytes::new(a)).collect(),
            l: Bytes::new(&lsig.program),
            msig: lsig.multisig.as_ref().map(MultisigWire::new),
            sig: lsig.signature.as_ref().map(|s| Bytes::new(s)),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct SignedTxnWire<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) lsig: Option<LogicSigWire<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) msig: Option<MultisigWire<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) sgnr: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) sig: Option<&'a Bytes>,
    pub(crate) txn: TxnWire<'a>,
}

/// Preimage for a group id: the ordered raw ids of its members.
#[derive(Serialize)]
pub(crate) struct GroupWire<'a> {
    pub(crate) txlist: Vec<&'a Bytes>,
}
