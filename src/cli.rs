//! Command-line surface: one subcommand per example scenario.
//!
//! Secrets are never taken as flags. The sending account's backup phrase is
//! read from `ALGO_SENDER_MNEMONIC`, the counterparty's from
//! `ALGO_RECEIVER_MNEMONIC`.

use std::path::PathBuf;
use std::sync::Arc;

use algorand_workflows::abi::{AbiType, AbiValue, Method};
use algorand_workflows::transaction::{AssetParams, MultisigSigner, Payment};
use algorand_workflows::wallet::{Account, Address};
use algorand_workflows::workflows::programs::{APPROVAL_SOURCE, CLEAR_SOURCE, ESCROW_SOURCE};
use algorand_workflows::workflows::{
    generate_account, multisig_address, recover_account, ApplicationSpec, AssetRoles,
    GroupMember, PaymentRequest, WorkflowRunner,
};
use clap::{Parser, Subcommand};

pub const SENDER_ENV: &str = "ALGO_SENDER_MNEMONIC";
pub const RECEIVER_ENV: &str = "ALGO_RECEIVER_MNEMONIC";

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "algorand-workflows")]
#[command(about = "Example request/sign/submit/confirm workflows against a test network", long_about = None)]
pub struct Cli {
    /// Optional TOML config; public test network endpoints otherwise.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a fresh account and print its address and backup phrase
    GenerateAccount,
    /// Recover the sender account from its backup phrase
    RecoverAccount,
    /// Print the balance of an address (default: sender)
    Balance {
        #[arg(long)]
        address: Option<Address>,
    },
    /// Derive a multisig address from sender and receiver
    MultisigAddress {
        #[arg(long, default_value_t = 2)]
        threshold: u8,
    },
    /// Pay out of the sender/receiver multisig, signed by both
    MultisigPay {
        #[arg(long)]
        to: Address,
        #[arg(long)]
        amount: u64,
    },
    /// Pay from sender to receiver (or --to)
    Pay {
        #[arg(long)]
        to: Option<Address>,
        #[arg(long)]
        amount: u64,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        rekey_to: Option<Address>,
    },
    /// Hand the sender's signing authority to the receiver
    Rekey,
    /// Close the sender account into the receiver
    Close,
    /// Create an asset with the sender in every role
    AssetCreate {
        #[arg(long)]
        unit_name: String,
        #[arg(long)]
        asset_name: String,
        #[arg(long)]
        total: u64,
        #[arg(long, default_value_t = 0)]
        decimals: u32,
    },
    /// Make the receiver the asset manager
    AssetReconfigure {
        #[arg(long)]
        asset: u64,
    },
    /// Opt the receiver into an asset
    AssetOptIn {
        #[arg(long)]
        asset: u64,
    },
    /// Transfer units from sender to receiver
    AssetTransfer {
        #[arg(long)]
        asset: u64,
        #[arg(long)]
        amount: u64,
    },
    /// Freeze or unfreeze the receiver's holding
    AssetFreeze {
        #[arg(long)]
        asset: u64,
        #[arg(long)]
        unfreeze: bool,
    },
    /// Claw units back from the receiver to the sender
    AssetClawback {
        #[arg(long)]
        asset: u64,
        #[arg(long)]
        amount: u64,
    },
    AssetDestroy {
        #[arg(long)]
        asset: u64,
    },
    /// Show asset parameters and the receiver's holding
    AssetInfo {
        #[arg(long)]
        asset: u64,
    },
    /// Swap payments between sender and receiver in one group
    AtomicTransfer {
        #[arg(long)]
        amount: u64,
    },
    /// Compile the bundled escrow program and pay out of it
    EscrowPay {
        #[arg(long)]
        amount: u64,
    },
    /// Pay from the sender under a delegated escrow program
    DelegatedPay {
        #[arg(long)]
        amount: u64,
    },
    /// Compile and deploy the bundled counter application
    AppCreate,
    AppOptIn {
        #[arg(long)]
        app: u64,
    },
    /// Call the application (plain increment)
    AppCall {
        #[arg(long)]
        app: u64,
    },
    /// Redeploy the bundled programs
    AppUpdate {
        #[arg(long)]
        app: u64,
    },
    AppCloseOut {
        #[arg(long)]
        app: u64,
    },
    AppClear {
        #[arg(long)]
        app: u64,
    },
    AppDelete {
        #[arg(long)]
        app: u64,
    },
    /// Print global state, and the sender's local state
    AppState {
        #[arg(long)]
        app: u64,
    },
    /// Call an ABI method, e.g. --method "add(uint64,uint64)uint64" --arg 2 --arg 3
    CallMethod {
        #[arg(long)]
        app: u64,
        #[arg(long)]
        method: String,
        #[arg(long = "arg")]
        args: Vec<String>,
    },
    /// Recent transactions of the sender from the indexer
    History {
        #[arg(long, default_value_t = 10)]
        limit: u64,
    },
}

fn sender() -> CliResult<Account> {
    Ok(Account::from_env(SENDER_ENV)?)
}

fn receiver() -> CliResult<Account> {
    Ok(Account::from_env(RECEIVER_ENV)?)
}

/// Parse a command-line argument as a value of `ty`.
///
/// Array elements are comma-separated; `ufixed` takes decimal text.
pub fn parse_arg(ty: &AbiType, text: &str) -> CliResult<AbiValue> {
    let value = match ty {
        AbiType::Uint(_) | AbiType::Asset | AbiType::Application => AbiValue::Uint(text.parse()?),
        AbiType::Ufixed(_, precision) => AbiValue::Uint(parse_fixed(text, *precision)?),
        AbiType::Bool => AbiValue::Bool(text.parse()?),
        AbiType::Byte => AbiValue::Byte(text.parse()?),
        AbiType::String => AbiValue::String(text.to_string()),
        AbiType::Bytes | AbiType::StaticBytes(_) => AbiValue::Bytes(text.as_bytes().to_vec()),
        AbiType::Address | AbiType::Account => AbiValue::Address(text.parse()?),
        AbiType::StaticArray(elem, _) | AbiType::DynamicArray(elem) => {
            let elements = if text.is_empty() {
                Vec::new()
            } else {
                text.split(',')
                    .map(|part| parse_arg(elem, part.trim()))
                    .collect::<CliResult<Vec<_>>>()?
            };
            AbiValue::Array(elements)
        }
        AbiType::Tuple(_) | AbiType::Void | AbiType::Transaction(_) => {
            return Err(format!("arguments of type {} are not supported on the command line", ty).into())
        }
    };
    Ok(value)
}

/// Scale a decimal such as `12.34` by `10^precision`.
fn parse_fixed(text: &str, precision: u8) -> CliResult<u128> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if fraction.len() > precision as usize {
        return Err(format!("{} has more than {} decimals", text, precision).into());
    }
    let digits = format!("{}{:0<width$}", whole, fraction, width = precision as usize);
    Ok(digits.parse::<u128>()?)
}

pub async fn execute(command: Commands, runner: &WorkflowRunner) -> CliResult<()> {
    match command {
        Commands::GenerateAccount => {
            let account = generate_account();
            println!("address:  {}", account.address());
            println!("mnemonic: {}", account.mnemonic());
        }
        Commands::RecoverAccount => {
            let phrase = std::env::var(SENDER_ENV).map_err(|_| format!("{} is not set", SENDER_ENV))?;
            let account = recover_account(&phrase)?;
            println!("address: {}", account.address());
        }
        Commands::Balance { address } => {
            let address = match address {
                Some(address) => address,
                None => sender()?.address(),
            };
            println!("{}", runner.account_balance(&address).await?);
        }
        Commands::MultisigAddress { threshold } => {
            let descriptor =
                multisig_address(threshold, vec![sender()?.address(), receiver()?.address()])?;
            println!("{}", descriptor.address());
        }
        Commands::MultisigPay { to, amount } => {
            let (alice, bob) = (sender()?, receiver()?);
            let descriptor = multisig_address(2, vec![alice.address(), bob.address()])?;
            let signer = MultisigSigner::new(descriptor, vec![alice, bob])?;
            let confirmation = runner.multisig_payment(&signer, to, amount).await?;
            println!("confirmed in round {}", confirmation.confirmed_round);
        }
        Commands::Pay {
            to,
            amount,
            note,
            rekey_to,
        } => {
            let alice = sender()?;
            let to = match to {
                Some(to) => to,
                None => receiver()?.address(),
            };
            let mut request = PaymentRequest::new(to, amount);
            if let Some(note) = note {
                request = request.note(note);
            }
            if let Some(target) = rekey_to {
                request = request.rekey_to(target);
            }
            let confirmation = runner.send_payment(&alice, request).await?;
            println!("{} confirmed in round {}", confirmation.tx_id, confirmation.confirmed_round);
        }
        Commands::Rekey => {
            let confirmation = runner
                .rekey_account(&sender()?, receiver()?.address())
                .await?;
            println!("rekeyed in round {}", confirmation.confirmed_round);
        }
        Commands::Close => {
            let confirmation = runner.close_account(&sender()?, receiver()?.address()).await?;
            println!(
                "closed in round {}, {} moved",
                confirmation.confirmed_round,
                confirmation.record.closing_amount.unwrap_or_default()
            );
        }
        Commands::AssetCreate {
            unit_name,
            asset_name,
            total,
            decimals,
        } => {
            let alice = sender()?;
            let params = AssetParams {
                total,
                decimals,
                unit_name,
                asset_name,
                manager: Some(alice.address()),
                reserve: Some(alice.address()),
                freeze: Some(alice.address()),
                clawback: Some(alice.address()),
                ..AssetParams::default()
            };
            let (asset_id, _) = runner.create_asset(&alice, params).await?;
            println!("asset id: {}", asset_id);
        }
        Commands::AssetReconfigure { asset } => {
            let alice = sender()?;
            let roles = AssetRoles {
                manager: Some(receiver()?.address()),
                reserve: Some(alice.address()),
                freeze: Some(alice.address()),
                clawback: Some(alice.address()),
            };
            runner.reconfigure_asset(&alice, asset, roles).await?;
        }
        Commands::AssetOptIn { asset } => {
            runner.opt_in_asset(&receiver()?, asset).await?;
        }
        Commands::AssetTransfer { asset, amount } => {
            runner
                .transfer_asset(&sender()?, asset, receiver()?.address(), amount)
                .await?;
        }
        Commands::AssetFreeze { asset, unfreeze } => {
            runner
                .freeze_asset(&sender()?, asset, receiver()?.address(), !unfreeze)
                .await?;
        }
        Commands::AssetClawback { asset, amount } => {
            let alice = sender()?;
            runner
                .clawback_asset(&alice, asset, receiver()?.address(), alice.address(), amount)
                .await?;
        }
        Commands::AssetDestroy { asset } => {
            runner.destroy_asset(&sender()?, asset).await?;
        }
        Commands::AssetInfo { asset } => {
            let info = runner.asset_params(asset).await?;
            println!("{} ({}) total {}", info.params.name.unwrap_or_default(), info.index, info.params.total);
            match runner.asset_holding(&receiver()?.address(), asset).await? {
                Some(holding) => println!("receiver holds {} (frozen: {})", holding.amount, holding.is_frozen),
                None => println!("receiver is not opted in"),
            }
        }
        Commands::AtomicTransfer { amount } => {
            let alice = Arc::new(sender()?);
            let bob = Arc::new(receiver()?);
            let members = vec![
                GroupMember::new(alice.clone(), Payment::new(bob.address(), amount)),
                GroupMember::new(bob.clone(), Payment::new(alice.address(), amount)),
            ];
            let confirmation = runner.atomic_transfer(members).await?;
            println!("group confirmed in round {}", confirmation.confirmed_round);
        }
        Commands::EscrowPay { amount } => {
            let program = runner.compile_program(ESCROW_SOURCE).await?;
            println!("escrow address: {}", program.hash);
            runner
                .escrow_payment(&program, Vec::new(), receiver()?.address(), amount)
                .await?;
        }
        Commands::DelegatedPay { amount } => {
            let program = runner.compile_program(ESCROW_SOURCE).await?;
            runner
                .delegated_payment(&program, Vec::new(), &sender()?, receiver()?.address(), amount)
                .await?;
        }
        Commands::AppCreate => {
            let approval = runner.compile_program(APPROVAL_SOURCE).await?;
            let clear = runner.compile_program(CLEAR_SOURCE).await?;
            let spec = ApplicationSpec::new(approval.bytes, clear.bytes)
                .global_schema(1, 1)
                .local_schema(1, 0);
            let (app_id, _) = runner.create_application(&sender()?, spec).await?;
            println!("app id: {}", app_id);
        }
        Commands::AppOptIn { app } => {
            runner.opt_in_application(&sender()?, app).await?;
        }
        Commands::AppCall { app } => {
            runner.call_application(&sender()?, app, Vec::new()).await?;
        }
        Commands::AppUpdate { app } => {
            let approval = runner.compile_program(APPROVAL_SOURCE).await?;
            let clear = runner.compile_program(CLEAR_SOURCE).await?;
            runner
                .update_application(&sender()?, app, approval.bytes, clear.bytes)
                .await?;
        }
        Commands::AppCloseOut { app } => {
            runner.close_out_application(&sender()?, app).await?;
        }
        Commands::AppClear { app } => {
            runner.clear_application(&sender()?, app).await?;
        }
        Commands::AppDelete { app } => {
            runner.delete_application(&sender()?, app).await?;
        }
        Commands::AppState { app } => {
            for (key, value) in runner.read_global_state(app).await? {
                println!("global {} = {}", key, value);
            }
            for (key, value) in runner.read_local_state(&sender()?.address(), app).await? {
                println!("local  {} = {}", key, value);
            }
        }
        Commands::CallMethod { app, method, args } => {
            let parsed: Method = method.parse()?;
            if parsed.args.len() != args.len() {
                return Err(format!("{} takes {} arguments", parsed, parsed.args.len()).into());
            }
            let values = parsed
                .args
                .iter()
                .zip(&args)
                .map(|(ty, text)| parse_arg(ty, text))
                .collect::<CliResult<Vec<_>>>()?;
            let result = runner
                .call_method(Arc::new(sender()?), app, &method, values)
                .await?;
            match result.return_value {
                Some(value) => println!("{}", value),
                None => println!("(void)"),
            }
        }
        Commands::History { limit } => {
            let page = runner.transaction_history(&sender()?.address(), limit).await?;
            for txn in page.transactions {
                println!("{} {} round {}", txn.id, txn.tx_type, txn.confirmed_round.unwrap_or_default());
            }
        }
    }
    Ok(())
}
