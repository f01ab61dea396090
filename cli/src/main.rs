//! `abi-codec` — the command-line interface for the EVM ABI codec.
//!
//! # Commands
//! ```text
//! abi-codec encode-call --abi <path.json> --function <name> --args <json-array>
//! abi-codec decode-call --abi <path.json> --function <name> --calldata <hex>
//! abi-codec selector     --abi <path.json> --function <name>
//! ```

use abi_core::{AbiSpec, AbiValue, ArrayLen, Argument, ElementType, UintInput};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "abi-codec",
    about = "Encode, decode, and fingerprint Ethereum contract ABI calls",
    version
)]
struct Cli {
    /// Enable verbose (debug-level) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a function call into calldata
    #[command(name = "encode-call")]
    EncodeCall {
        /// Path to the contract's ABI JSON file
        #[arg(long)]
        abi: PathBuf,
        /// Function name as it appears in the ABI
        #[arg(long)]
        function: String,
        /// Arguments as a JSON array, e.g. '["0xabc...", "100"]'
        #[arg(long, default_value = "[]")]
        args: String,
    },

    /// Decode calldata for a known function
    #[command(name = "decode-call")]
    DecodeCall {
        /// Path to the contract's ABI JSON file
        #[arg(long)]
        abi: PathBuf,
        /// Function name as it appears in the ABI
        #[arg(long)]
        function: String,
        /// 0x-prefixed calldata, selector included
        #[arg(long)]
        calldata: String,
    },

    /// Print a function's canonical signature and 4-byte selector
    Selector {
        /// Path to the contract's ABI JSON file
        #[arg(long)]
        abi: PathBuf,
        /// Function name as it appears in the ABI
        #[arg(long)]
        function: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::EncodeCall { abi, function, args } => cmd_encode_call(&abi, &function, &args),
        Commands::DecodeCall { abi, function, calldata } => cmd_decode_call(&abi, &function, &calldata),
        Commands::Selector { abi, function } => cmd_selector(&abi, &function),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_spec(path: &PathBuf) -> Result<AbiSpec> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading ABI file {}", path.display()))?;
    abi_evm::load_spec(&text).with_context(|| format!("parsing ABI file {}", path.display()))
}

fn resolve_inputs<'a>(spec: &'a AbiSpec, function: &str) -> Result<&'a [Argument]> {
    spec.functions
        .get(function)
        .map(|f| f.inputs.as_slice())
        .ok_or_else(|| anyhow!("no function named `{function}` in this ABI"))
}

fn cmd_encode_call(abi: &PathBuf, function: &str, args_json: &str) -> Result<()> {
    let spec = load_spec(abi)?;
    let params = resolve_inputs(&spec, function)?;
    let raw: Vec<serde_json::Value> =
        serde_json::from_str(args_json).context("--args must be a JSON array")?;
    if raw.len() != params.len() {
        anyhow::bail!("expected {} argument(s), got {}", params.len(), raw.len());
    }
    let values: Vec<AbiValue> = params
        .iter()
        .zip(raw)
        .map(|(param, v)| json_to_abi_value(param, &v))
        .collect::<Result<_>>()?;

    let calldata = abi_evm::pack(&spec, function, &values)
        .with_context(|| format!("encoding call to `{function}`"))?;
    println!("0x{}", hex::encode(calldata));
    Ok(())
}

fn cmd_decode_call(abi: &PathBuf, function: &str, calldata_hex: &str) -> Result<()> {
    let spec = load_spec(abi)?;
    let params = resolve_inputs(&spec, function)?;
    let func = spec.functions.get(function).expect("resolved above");
    let calldata = hex::decode(calldata_hex.strip_prefix("0x").unwrap_or(calldata_hex))
        .context("--calldata must be 0x-prefixed hex")?;

    let sig = abi_evm::signature(function, &func.inputs);
    let want_selector = abi_evm::selector(&sig);
    if calldata.len() < 4 {
        anyhow::bail!("calldata shorter than a 4-byte selector");
    }
    if calldata[..4] != want_selector {
        anyhow::bail!(
            "selector mismatch: calldata has {}, `{function}` expects {}",
            hex::encode(&calldata[..4]),
            hex::encode(want_selector)
        );
    }

    let decoded = abi_evm::unpack(params, &calldata[4..])
        .with_context(|| format!("decoding call to `{function}`"))?;
    for (param, value) in params.iter().zip(decoded) {
        println!("{} = {}", param.name, value.display_string());
    }
    Ok(())
}

fn cmd_selector(abi: &PathBuf, function: &str) -> Result<()> {
    let spec = load_spec(abi)?;
    let params = resolve_inputs(&spec, function)?;
    let sig = abi_evm::signature(function, params);
    println!("{sig}");
    println!("0x{}", hex::encode(abi_evm::selector(&sig)));
    Ok(())
}

/// Convert one `serde_json::Value` call argument into an [`AbiValue`],
/// guided by the argument's declared type. Arrays accept either a native
/// JSON array or the `"[a,b,c]"` text form (array-as-string equivalence,
/// `spec.md` §8).
fn json_to_abi_value(param: &Argument, value: &serde_json::Value) -> Result<AbiValue> {
    if !matches!(param.array, ArrayLen::None) {
        return json_to_array_value(param, value);
    }
    json_to_scalar_value(&param.elem, value)
}

fn json_to_array_value(param: &Argument, value: &serde_json::Value) -> Result<AbiValue> {
    match value {
        serde_json::Value::Array(items) => {
            let values = items
                .iter()
                .map(|item| json_to_scalar_value(&param.elem, item))
                .collect::<Result<_>>()?;
            Ok(AbiValue::Array(values))
        }
        serde_json::Value::String(s) => Ok(AbiValue::ArrayText(s.clone())),
        other => Err(anyhow!("argument `{}` expects an array, got {other}", param.name)),
    }
}

fn json_to_scalar_value(elem: &ElementType, value: &serde_json::Value) -> Result<AbiValue> {
    match elem {
        ElementType::Bool => value
            .as_bool()
            .map(AbiValue::Bool)
            .ok_or_else(|| anyhow!("expected a boolean, got {value}")),
        ElementType::Uint(_) => match value {
            serde_json::Value::Number(n) if n.is_u64() => {
                Ok(AbiValue::Uint(UintInput::Small(n.as_u64().unwrap())))
            }
            serde_json::Value::String(s) => Ok(AbiValue::uint_text(s.clone())),
            other => Err(anyhow!("expected an unsigned integer, got {other}")),
        },
        ElementType::Int(_) => match value {
            serde_json::Value::Number(n) if n.is_i64() => {
                Ok(AbiValue::Int(abi_core::IntInput::Small(n.as_i64().unwrap())))
            }
            serde_json::Value::String(s) => Ok(AbiValue::int_text(s.clone())),
            other => Err(anyhow!("expected a signed integer, got {other}")),
        },
        ElementType::Address => {
            let s = value.as_str().ok_or_else(|| anyhow!("expected an address string, got {value}"))?;
            Ok(AbiValue::address_text(s)?)
        }
        ElementType::BytesN(_) | ElementType::Bytes => {
            let s = value.as_str().ok_or_else(|| anyhow!("expected a hex string, got {value}"))?;
            let bytes = match s.strip_prefix("0x") {
                Some(hexed) => hex::decode(hexed).context("invalid hex bytes")?,
                None => s.as_bytes().to_vec(),
            };
            Ok(AbiValue::Bytes(bytes))
        }
        ElementType::String => {
            let s = value.as_str().ok_or_else(|| anyhow!("expected a string, got {value}"))?;
            Ok(AbiValue::Str(s.to_string()))
        }
        ElementType::Fixed { .. } => Err(anyhow!("fixed/ufixed arguments are not supported")),
    }
}
