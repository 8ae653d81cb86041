mod cli;
mod header;
mod jwk;
mod jws;
mod segments;

use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use cli::JwsoxArgs;
use colored::Colorize;
use header::{DisplayFields, Slot};
use jws::{ParsedJws, Unverified};
use log::{debug, error, warn};

const JWS_ICON: char = '✻';

#[inline]
fn title(s: &str) -> String {
    format!("{} {}", JWS_ICON, s)
}

fn read_input(arg: Option<String>) -> anyhow::Result<String> {
    let raw = match arg {
        Some(s) if s != "-" => s,
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("error reading input")?;
            buf
        }
    };

    let token = raw.trim();
    if token.is_empty() {
        bail!("No JWS provided");
    }
    Ok(token.to_string())
}

fn print_segments(token: &str) {
    println!("\n{}", title("Segments").bold().cyan());
    for segment in segments::split_and_decode(token) {
        match segment.indented() {
            Ok(pretty) => println!("{} Part: {}", segment.index, pretty.cyan()),
            Err(e) => {
                debug!("segment {} ({:?}): {}", segment.index, segment.encoded, e);
                println!("{} {}", segment.index, e.to_string().red());
            }
        }
    }
}

fn print_string_slot(prefix: &str, name: &str, slot: &Slot<String>) {
    match slot {
        Slot::Absent => println!("{} No {}", prefix, name),
        Slot::Present(value) => println!("{} {}: {}", prefix, name, value),
        Slot::Invalid(e) => println!("{} {}", prefix, e.to_string().red()),
    }
}

fn print_header(prefix: &str, unverified: Option<Unverified<&header::Header>>, protected: bool) {
    let fields: DisplayFields = header::extract(unverified.map(Unverified::into_unverified));

    print_string_slot(prefix, "kid", &fields.key_id);

    match &fields.jwk {
        Slot::Absent => println!("{} No jwk", prefix),
        Slot::Present(key) => {
            println!("{} UNVERIFIED JWK: {}", prefix, key.json);
            if key.private {
                println!("{} {}", prefix, "jwk carries private key material".bold().red());
            }
        }
        Slot::Invalid(e) => {
            warn!("{}", e);
            println!("{} {}", prefix, e.to_string().red());
        }
    }

    print_string_slot(prefix, "alg", &fields.algorithm);
    print_string_slot(prefix, "nonce", &fields.nonce);
    if !protected && matches!(fields.nonce, Slot::Present(_)) {
        warn!("nonce in unprotected header");
        println!("{} {}", prefix, "nonce is not integrity protected".bold().red());
    }

    if fields.extra.is_empty() {
        println!("{} No extra headers", prefix);
    } else {
        for (name, value) in &fields.extra {
            println!(
                "{} Extra header {:?} -> {}",
                prefix,
                name,
                header::quote_value(value)
            );
        }
    }
}

fn print_signatures(jws: &ParsedJws) {
    println!("\n{}", title("Signatures").bold().magenta());
    for (i, signature) in jws.signatures().iter().enumerate() {
        print_header(&format!("{} Protected:  ", i), signature.unverified_protected(), true);
        print_header(&format!("{} UNPROTECTED:", i), signature.unverified_header(), false);
        println!("{} Signature:   {} bytes", i, signature.signature_bytes().len());
    }
}

fn payload_text(jws: &ParsedJws) -> String {
    let payload = jws.payload_without_verification();
    String::from_utf8_lossy(payload.as_unverified()).into_owned()
}

fn print_payload(jws: &ParsedJws) {
    println!("\n{}", title("UNVERIFIED Payload:").bold().yellow());
    println!("{}", payload_text(jws).yellow());
}

fn run(args: JwsoxArgs) -> anyhow::Result<()> {
    let token = read_input(args.jws_string)?;

    let jws = jws::parse(&token).context("error parsing JWS")?;
    debug!("payload is {} encoded bytes", jws.encoded_payload().len());

    if args.payload_only {
        println!("{}", payload_text(&jws));
        return Ok(());
    }

    if args.headers_only {
        print_signatures(&jws);
        return Ok(());
    }

    println!(">>> Successfully parsed {}", token);
    print_segments(&token);
    print_signatures(&jws);
    print_payload(&jws);

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = JwsoxArgs::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            println!("{}", format!("{:#}", e).red());
            ExitCode::FAILURE
        }
    }
}
